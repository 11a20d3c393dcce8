//! `fmt ` chunk decoding.

use std::io::{Read, Seek, SeekFrom};

use byteorder::{LittleEndian, ReadBytesExt};

use crate::chunks::{chunk_ids, ChunkIndex};
use crate::error::{BwfError, Result};

/// Bit depths the converter accepts.
pub const SUPPORTED_BIT_DEPTHS: [u16; 3] = [16, 24, 32];

/// Decoded `fmt ` chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatInfo {
    /// Wave format tag; 1 for integer PCM.
    pub format_tag: u16,
    /// Interleaved channel count.
    pub num_channels: u16,
    /// Sample rate in Hz.
    pub samples_per_sec: u32,
    /// Average byte rate declared by the source.
    pub avg_bytes_per_sec: u32,
    /// Bytes per interleaved frame declared by the source.
    pub block_align: u16,
    /// Bits per sample.
    pub bits_per_sample: u16,
}

impl FormatInfo {
    /// Reads the 16 little-endian `fmt ` payload bytes from the stream.
    pub fn read_from<R: Read + Seek>(stream: &mut R, index: &ChunkIndex) -> Result<FormatInfo> {
        let info = index
            .get(chunk_ids::FMT)
            .ok_or(BwfError::MissingChunk(chunk_ids::FMT))?;
        stream.seek(SeekFrom::Start(info.data_offset))?;

        let format_info = FormatInfo {
            format_tag: stream.read_u16::<LittleEndian>()?,
            num_channels: stream.read_u16::<LittleEndian>()?,
            samples_per_sec: stream.read_u32::<LittleEndian>()?,
            avg_bytes_per_sec: stream.read_u32::<LittleEndian>()?,
            block_align: stream.read_u16::<LittleEndian>()?,
            bits_per_sample: stream.read_u16::<LittleEndian>()?,
        };
        format_info.validate()?;
        Ok(format_info)
    }

    fn validate(&self) -> Result<()> {
        if self.num_channels == 0 {
            return Err(BwfError::InvalidFormat(
                "fmt chunk declares zero channels".to_string(),
            ));
        }
        if !SUPPORTED_BIT_DEPTHS.contains(&self.bits_per_sample) {
            return Err(BwfError::InvalidFormat(format!(
                "unsupported bits_per_sample {}",
                self.bits_per_sample
            )));
        }
        let frame_bits = u32::from(self.bits_per_sample) * u32::from(self.num_channels);
        if frame_bits == 0 || frame_bits % 8 != 0 {
            return Err(BwfError::InvalidFormat(format!(
                "frame width of {frame_bits} bits is not a positive multiple of eight"
            )));
        }
        Ok(())
    }

    /// Bytes per single-channel sample.
    pub fn bytes_per_sample(&self) -> u32 {
        u32::from(self.bits_per_sample) / 8
    }

    /// Bytes per interleaved frame across all channels.
    pub fn frame_bytes(&self) -> u32 {
        self.bytes_per_sample() * u32::from(self.num_channels)
    }

    /// Samples per channel implied by a `data` chunk size.
    pub fn samples_per_channel(&self, data_chunk_size: u32) -> u32 {
        data_chunk_size / self.frame_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunks::index_chunks;
    use std::io::Cursor;

    fn fmt_payload(num_channels: u16, samples_per_sec: u32, bits_per_sample: u16) -> Vec<u8> {
        let mut payload = Vec::new();
        payload.extend_from_slice(&1u16.to_le_bytes());
        payload.extend_from_slice(&num_channels.to_le_bytes());
        payload.extend_from_slice(&samples_per_sec.to_le_bytes());
        let avg = samples_per_sec * u32::from(num_channels) * u32::from(bits_per_sample) / 8;
        payload.extend_from_slice(&avg.to_le_bytes());
        let block_align = num_channels * bits_per_sample / 8;
        payload.extend_from_slice(&block_align.to_le_bytes());
        payload.extend_from_slice(&bits_per_sample.to_le_bytes());
        payload
    }

    fn wav_with_fmt(payload: &[u8]) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(b"RIFF");
        bytes.extend_from_slice(&((payload.len() + 12) as u32).to_le_bytes());
        bytes.extend_from_slice(b"WAVE");
        bytes.extend_from_slice(b"fmt ");
        bytes.extend_from_slice(&(payload.len() as u32).to_le_bytes());
        bytes.extend_from_slice(payload);
        bytes
    }

    #[test]
    fn test_decodes_fields() {
        let bytes = wav_with_fmt(&fmt_payload(2, 48000, 16));
        let mut cursor = Cursor::new(bytes);
        let index = index_chunks(&mut cursor).unwrap();
        let format_info = FormatInfo::read_from(&mut cursor, &index).unwrap();

        assert_eq!(format_info.format_tag, 1);
        assert_eq!(format_info.num_channels, 2);
        assert_eq!(format_info.samples_per_sec, 48000);
        assert_eq!(format_info.avg_bytes_per_sec, 192000);
        assert_eq!(format_info.block_align, 4);
        assert_eq!(format_info.bits_per_sample, 16);
    }

    #[test]
    fn test_missing_fmt_chunk() {
        let mut cursor = Cursor::new(b"RIFF\x04\x00\x00\x00WAVE".to_vec());
        let index = index_chunks(&mut cursor).unwrap();
        let err = FormatInfo::read_from(&mut cursor, &index).unwrap_err();
        assert!(matches!(err, BwfError::MissingChunk(id) if id == chunk_ids::FMT));
    }

    #[test]
    fn test_rejects_zero_channels() {
        let bytes = wav_with_fmt(&fmt_payload(0, 48000, 16));
        let mut cursor = Cursor::new(bytes);
        let index = index_chunks(&mut cursor).unwrap();
        assert!(matches!(
            FormatInfo::read_from(&mut cursor, &index),
            Err(BwfError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_rejects_unsupported_bit_depth() {
        for bits in [0u16, 8, 12, 20, 64] {
            let bytes = wav_with_fmt(&fmt_payload(1, 48000, bits));
            let mut cursor = Cursor::new(bytes);
            let index = index_chunks(&mut cursor).unwrap();
            assert!(
                FormatInfo::read_from(&mut cursor, &index).is_err(),
                "{bits} bits should be rejected"
            );
        }
    }

    #[test]
    fn test_derived_quantities() {
        let format_info = FormatInfo {
            format_tag: 1,
            num_channels: 3,
            samples_per_sec: 1,
            avg_bytes_per_sec: 6,
            block_align: 6,
            bits_per_sample: 16,
        };

        assert_eq!(format_info.bytes_per_sample(), 2);
        assert_eq!(format_info.frame_bytes(), 6);
        assert_eq!(format_info.samples_per_channel(12), 2);
    }
}
