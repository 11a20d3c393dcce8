//! The conversion driver.

use std::io::{Read, Seek};

use admix_bwf::{splice_wav_files, Bw64Reader};
use admix_iamf::{ConfigBuilder, IamfConfig};

use crate::error::Result;
use crate::options::ConvertOptions;

/// Converts one ADM BWF stream.
///
/// Reads and validates the container, writes one WAV file per surviving
/// audio object into `options.output_dir`, and returns the configuration
/// record for the downstream IAMF encoder.
///
/// On error, output files already written are left in place for the
/// caller to inspect; aborted files are removed by the splicer itself.
pub fn convert<R: Read + Seek>(options: &ConvertOptions, stream: &mut R) -> Result<IamfConfig> {
    let reader = Bw64Reader::from_stream(options.importance_threshold, stream)?;
    log::debug!(
        "Read BWF stream: {} channels at {} Hz, {} audio objects",
        reader.format_info.num_channels,
        reader.format_info.samples_per_sec,
        reader.adm.objects.len()
    );

    splice_wav_files(&options.output_dir, &options.file_prefix, &reader, stream)?;

    let builder = ConfigBuilder::new(
        &reader.adm,
        reader.format_info.samples_per_sec,
        reader.format_info.bits_per_sample,
    );
    let config = builder.build(
        options.profile_version,
        &options.file_prefix,
        options.frame_duration_ms,
    )?;
    Ok(config)
}
