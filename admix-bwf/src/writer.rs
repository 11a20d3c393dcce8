//! Output WAV writer.
//!
//! Emits a RIFF/WAVE/fmt/data scaffold with placeholder sizes up front and
//! back-patches the `RIFF` outer size and the `data` chunk size on
//! `finalize`. An aborted writer removes its file so no partially written
//! output can pass for a valid WAV; a writer dropped without finalizing
//! leaves the placeholder sizes in place, an obvious stub.

use std::fs::{self, File};
use std::io::{Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use byteorder::{LittleEndian, WriteBytesExt};

use crate::error::{BwfError, Result};
use crate::fmt::SUPPORTED_BIT_DEPTHS;

/// Bytes of the scaffold following the 8-byte `RIFF` header: `WAVE`, the
/// complete `fmt ` chunk, and the `data` chunk header.
const SCAFFOLD_SIZE: u32 = 36;

/// Stream offset of the `RIFF` outer size field.
const RIFF_SIZE_OFFSET: u64 = 4;

/// Stream offset of the `data` chunk size field.
const DATA_SIZE_OFFSET: u64 = 40;

/// Buffered single-file WAV writer for integer PCM.
#[derive(Debug)]
pub struct WavWriter {
    file: File,
    path: PathBuf,
    num_channels: u16,
    sample_rate: u32,
    bits_per_sample: u16,
    data_bytes_written: u64,
}

impl WavWriter {
    /// Creates the output file and writes the header scaffold.
    pub fn create<P: AsRef<Path>>(
        path: P,
        num_channels: u16,
        sample_rate: u32,
        bits_per_sample: u16,
    ) -> Result<WavWriter> {
        if num_channels == 0 {
            return Err(BwfError::InvalidFormat(
                "output WAV requires at least one channel".to_string(),
            ));
        }
        if !SUPPORTED_BIT_DEPTHS.contains(&bits_per_sample) {
            return Err(BwfError::InvalidFormat(format!(
                "unsupported bits_per_sample {bits_per_sample}"
            )));
        }

        let path = path.as_ref().to_path_buf();
        log::debug!("Creating output WAV `{}`", path.display());
        let file = File::create(&path)?;
        let mut writer = WavWriter {
            file,
            path,
            num_channels,
            sample_rate,
            bits_per_sample,
            data_bytes_written: 0,
        };
        writer.write_scaffold()?;
        Ok(writer)
    }

    /// Bytes per interleaved output frame.
    pub fn block_align(&self) -> u16 {
        self.num_channels * (self.bits_per_sample / 8)
    }

    /// Average output byte rate.
    pub fn avg_bytes_per_sec(&self) -> u32 {
        u32::from(self.block_align()) * self.sample_rate
    }

    /// Path of the output file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_scaffold(&mut self) -> Result<()> {
        self.file.write_all(b"RIFF")?;
        self.file.write_u32::<LittleEndian>(SCAFFOLD_SIZE)?;
        self.file.write_all(b"WAVE")?;

        self.file.write_all(b"fmt ")?;
        self.file.write_u32::<LittleEndian>(16)?;
        self.file.write_u16::<LittleEndian>(1)?; // integer PCM
        self.file.write_u16::<LittleEndian>(self.num_channels)?;
        self.file.write_u32::<LittleEndian>(self.sample_rate)?;
        self.file.write_u32::<LittleEndian>(self.avg_bytes_per_sec())?;
        self.file.write_u16::<LittleEndian>(self.block_align())?;
        self.file.write_u16::<LittleEndian>(self.bits_per_sample)?;

        self.file.write_all(b"data")?;
        self.file.write_u32::<LittleEndian>(0)?;
        Ok(())
    }

    /// Appends interleaved sample bytes to the `data` chunk.
    pub fn write_samples(&mut self, samples: &[u8]) -> Result<()> {
        if samples.is_empty() {
            return Ok(());
        }
        if samples.len() % usize::from(self.block_align()) != 0 {
            return Err(BwfError::InvalidFormat(
                "must write an integer number of frames".to_string(),
            ));
        }
        self.file.write_all(samples)?;
        self.data_bytes_written += samples.len() as u64;
        Ok(())
    }

    /// Back-patches the `RIFF` and `data` sizes and closes the file.
    pub fn finalize(mut self) -> Result<()> {
        let data_size = u32::try_from(self.data_bytes_written).map_err(|_| {
            BwfError::InvalidFormat("data chunk exceeds the 4 GiB RIFF limit".to_string())
        })?;
        // The declared data size excludes the odd-size pad byte, which is
        // still written for seeking.
        if data_size % 2 == 1 {
            self.file.write_all(&[0])?;
        }
        let padded_size = data_size + (data_size & 1);

        self.file.seek(SeekFrom::Start(RIFF_SIZE_OFFSET))?;
        self.file
            .write_u32::<LittleEndian>(SCAFFOLD_SIZE + padded_size)?;
        self.file.seek(SeekFrom::Start(DATA_SIZE_OFFSET))?;
        self.file.write_u32::<LittleEndian>(data_size)?;
        self.file.flush()?;
        Ok(())
    }

    /// Releases the file handle without finalizing and removes the file.
    pub fn abort(self) {
        let path = self.path.clone();
        drop(self);
        if let Err(err) = fs::remove_file(&path) {
            log::warn!(
                "Failed to remove aborted output `{}`: {}",
                path.display(),
                err
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_writes_self_consistent_stereo_wav() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.wav");

        let mut writer = WavWriter::create(&path, 2, 1, 16).unwrap();
        writer
            .write_samples(&[0x01, 0x23, 0x45, 0x67, 0x89, 0xab, 0xcd, 0xef])
            .unwrap();
        writer.finalize().unwrap();

        let expected: &[u8] = &[
            b'R', b'I', b'F', b'F', 0x2c, 0x00, 0x00, 0x00, // RIFF size 44
            b'W', b'A', b'V', b'E', //
            b'f', b'm', b't', b' ', 0x10, 0x00, 0x00, 0x00, // fmt size 16
            0x01, 0x00, // PCM
            0x02, 0x00, // 2 channels
            0x01, 0x00, 0x00, 0x00, // 1 Hz
            0x04, 0x00, 0x00, 0x00, // 4 bytes/sec
            0x04, 0x00, // block align
            0x10, 0x00, // 16 bits
            b'd', b'a', b't', b'a', 0x08, 0x00, 0x00, 0x00, // data size 8
            0x01, 0x23, 0x45, 0x67, 0x89, 0xab, 0xcd, 0xef,
        ];
        assert_eq!(fs::read(&path).unwrap(), expected);
    }

    #[test]
    fn test_mono_derived_fields() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("mono.wav");

        let mut writer = WavWriter::create(&path, 1, 1, 16).unwrap();
        assert_eq!(writer.block_align(), 2);
        assert_eq!(writer.avg_bytes_per_sec(), 2);
        writer.write_samples(&[0xaa, 0xbb, 0xcc, 0xdd]).unwrap();
        writer.finalize().unwrap();

        let bytes = fs::read(&path).unwrap();
        assert_eq!(bytes.len(), 48);
        // RIFF outer size.
        assert_eq!(&bytes[4..8], &[0x28, 0x00, 0x00, 0x00]);
        // Channel count.
        assert_eq!(&bytes[22..24], &[0x01, 0x00]);
        // data size.
        assert_eq!(&bytes[40..44], &[0x04, 0x00, 0x00, 0x00]);
    }

    #[test]
    fn test_odd_data_size_is_padded_but_not_counted() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("odd.wav");

        // 24-bit mono frames are 3 bytes each.
        let mut writer = WavWriter::create(&path, 1, 48000, 24).unwrap();
        writer.write_samples(&[0x01, 0x02, 0x03]).unwrap();
        writer.finalize().unwrap();

        let bytes = fs::read(&path).unwrap();
        // Header + 3 payload bytes + 1 pad byte.
        assert_eq!(bytes.len(), 48);
        // Declared data size stays odd.
        assert_eq!(&bytes[40..44], &[0x03, 0x00, 0x00, 0x00]);
        // RIFF outer size counts the pad byte.
        assert_eq!(&bytes[4..8], &[0x28, 0x00, 0x00, 0x00]);
    }

    #[test]
    fn test_rejects_partial_frames() {
        let dir = TempDir::new().unwrap();
        let mut writer = WavWriter::create(dir.path().join("x.wav"), 2, 48000, 16).unwrap();
        assert!(writer.write_samples(&[0x01, 0x02, 0x03]).is_err());
    }

    #[test]
    fn test_rejects_invalid_parameters() {
        let dir = TempDir::new().unwrap();
        assert!(WavWriter::create(dir.path().join("a.wav"), 0, 48000, 16).is_err());
        assert!(WavWriter::create(dir.path().join("b.wav"), 1, 48000, 8).is_err());
    }

    #[test]
    fn test_abort_removes_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("aborted.wav");

        let mut writer = WavWriter::create(&path, 1, 48000, 16).unwrap();
        writer.write_samples(&[0x01, 0x02]).unwrap();
        assert!(path.exists());
        writer.abort();
        assert!(!path.exists());
    }

    #[test]
    fn test_dropped_writer_leaves_stub_sizes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("stub.wav");

        let mut writer = WavWriter::create(&path, 1, 48000, 16).unwrap();
        writer.write_samples(&[0x01, 0x02]).unwrap();
        drop(writer);

        let bytes = fs::read(&path).unwrap();
        // The placeholder sizes never claim the written payload.
        assert_eq!(&bytes[4..8], &SCAFFOLD_SIZE.to_le_bytes());
        assert_eq!(&bytes[40..44], &[0x00, 0x00, 0x00, 0x00]);
    }
}
