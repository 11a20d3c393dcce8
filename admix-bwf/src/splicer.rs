//! Per-object WAV splicing.
//!
//! De-interleaves the `data` chunk into one WAV file per ADM audio
//! object, driven by the object to track map. Frames are processed in
//! input order, so each output preserves the temporal alignment of the
//! input; output files are created in object declaration order with
//! 1-based `_converted` suffixes.

use std::io::{self, Read, Seek, SeekFrom};
use std::path::Path;

use admix_adm::object_track_map;

use crate::chunks::chunk_ids;
use crate::error::{BwfError, Result};
use crate::reader::Bw64Reader;
use crate::writer::WavWriter;

/// Per-object buffers are flushed to their writer once they reach this
/// many bytes.
pub const FLUSH_THRESHOLD: usize = 4096;

/// Splits the `data` chunk of `stream` into one WAV per audio object.
///
/// Output files are named `{file_prefix}_converted{1..N}.wav` inside
/// `output_dir`. On a truncated `data` chunk every writer is aborted, so
/// no partial output survives as a valid WAV.
pub fn splice_wav_files<R: Read + Seek>(
    output_dir: &Path,
    file_prefix: &str,
    reader: &Bw64Reader,
    stream: &mut R,
) -> Result<()> {
    let track_map = object_track_map(&reader.adm.objects)?;
    let format_info = &reader.format_info;

    let mapped_tracks: usize = track_map.iter().map(|entry| entry.channels.len()).sum();
    if mapped_tracks != usize::from(format_info.num_channels) {
        return Err(BwfError::InvalidFormat(format!(
            "ADM maps {mapped_tracks} tracks but the input carries {} channels",
            format_info.num_channels
        )));
    }

    let data_info = reader.chunk_info(chunk_ids::DATA)?;

    let mut writers: Vec<WavWriter> = Vec::with_capacity(track_map.len());
    for (object_index, entry) in track_map.iter().enumerate() {
        let path = output_dir.join(format!("{}_converted{}.wav", file_prefix, object_index + 1));
        match WavWriter::create(
            &path,
            entry.channels.len() as u16,
            format_info.samples_per_sec,
            format_info.bits_per_sample,
        ) {
            Ok(writer) => writers.push(writer),
            Err(err) => {
                abort_all(writers);
                return Err(err);
            }
        }
    }

    stream.seek(SeekFrom::Start(data_info.data_offset))?;

    let bytes_per_sample = format_info.bytes_per_sample() as usize;
    let frame_bytes = format_info.frame_bytes() as usize;
    let data_size = data_info.size as usize;

    let mut buffers: Vec<Vec<u8>> = track_map
        .iter()
        .map(|_| Vec::with_capacity(FLUSH_THRESHOLD + frame_bytes))
        .collect();
    let mut scratch = vec![0u8; frame_bytes];

    let mut position = 0usize;
    while position < data_size {
        for (object_index, entry) in track_map.iter().enumerate() {
            let sample = &mut scratch[..entry.channels.len() * bytes_per_sample];
            if let Err(err) = stream.read_exact(sample) {
                abort_all(writers);
                return Err(if err.kind() == io::ErrorKind::UnexpectedEof {
                    BwfError::TruncatedData
                } else {
                    err.into()
                });
            }

            let buffer = &mut buffers[object_index];
            buffer.extend_from_slice(sample);
            if buffer.len() >= FLUSH_THRESHOLD {
                writers[object_index].write_samples(buffer)?;
                buffer.clear();
            }
        }
        position += frame_bytes;
    }

    // Flush the remaining buffers and finalize the headers.
    for (object_index, mut writer) in writers.into_iter().enumerate() {
        writer.write_samples(&buffers[object_index])?;
        writer.finalize()?;
    }
    Ok(())
}

fn abort_all(writers: Vec<WavWriter>) {
    for writer in writers {
        writer.abort();
    }
}
