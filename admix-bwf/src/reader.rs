//! BW64 reader facade.
//!
//! Composes the chunk indexer, the `fmt ` decoder and the ADM builder
//! into the validated `(adm, format_info, chunk_index)` triple the
//! splicer and the configuration builder consume.

use std::io::{Read, Seek, SeekFrom};

use admix_adm::{parse_adm, Adm};

use crate::chunks::{chunk_ids, index_chunks, ChunkIndex, ChunkInfo, FourCc};
use crate::error::{BwfError, Result};
use crate::fmt::FormatInfo;

/// Indexes and extracts ADM information from a BW64 WAV stream.
///
/// Built from a seekable stream holding a RIFF WAV file with an `axml`
/// chunk. Construction validates the container, decodes the format and
/// parses the ADM; the resulting reader owns the validated graph and the
/// chunk index while the caller keeps the stream for splicing.
#[derive(Debug)]
pub struct Bw64Reader {
    /// The validated, filtered ADM graph.
    pub adm: Adm,
    /// Decoded `fmt ` chunk.
    pub format_info: FormatInfo,
    /// Index of every top-level chunk.
    pub chunk_index: ChunkIndex,
}

impl Bw64Reader {
    /// Builds a reader from a stream.
    ///
    /// `importance_threshold` is clamped to `0..=10`; audio objects below
    /// the threshold are dropped from the ADM.
    pub fn from_stream<R: Read + Seek>(
        importance_threshold: i32,
        stream: &mut R,
    ) -> Result<Bw64Reader> {
        let importance_threshold = importance_threshold.clamp(0, 10);

        let chunk_index = index_chunks(stream)?;
        let format_info = FormatInfo::read_from(stream, &chunk_index)?;
        let axml = read_chunk_payload(stream, &chunk_index, chunk_ids::AXML)?;
        let adm = parse_adm(&axml, importance_threshold)?;

        Ok(Bw64Reader {
            adm,
            format_info,
            chunk_index,
        })
    }

    /// Returns information about a chunk, or `MissingChunk` when absent.
    pub fn chunk_info(&self, id: FourCc) -> Result<ChunkInfo> {
        self.chunk_index.get(id).ok_or(BwfError::MissingChunk(id))
    }
}

/// Reads one chunk's payload bytes.
fn read_chunk_payload<R: Read + Seek>(
    stream: &mut R,
    index: &ChunkIndex,
    id: FourCc,
) -> Result<Vec<u8>> {
    let info = index.get(id).ok_or(BwfError::MissingChunk(id))?;
    stream.seek(SeekFrom::Start(info.data_offset))?;
    let mut payload = vec![0u8; info.size as usize];
    stream.read_exact(&mut payload)?;
    Ok(payload)
}
