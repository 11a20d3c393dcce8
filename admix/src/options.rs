//! Conversion options.

use std::path::{Path, PathBuf};

use admix_iamf::ProfileVersion;

/// Options for one conversion run.
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Prefix of the per-object output WAV file names.
    pub file_prefix: String,
    /// Maximum frame duration in milliseconds; the realized frame duration
    /// never exceeds it.
    pub frame_duration_ms: u32,
    /// Importance threshold in `0..=10`; objects below it are dropped.
    /// Out-of-range values are clamped.
    pub importance_threshold: i32,
    /// Directory receiving the output WAV files. Must already exist.
    pub output_dir: PathBuf,
    /// IAMF profile targeted by the sequence header.
    pub profile_version: ProfileVersion,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        ConvertOptions {
            file_prefix: "adm".to_string(),
            frame_duration_ms: 10,
            importance_threshold: 0,
            output_dir: PathBuf::from("."),
            profile_version: ProfileVersion::default(),
        }
    }
}

impl ConvertOptions {
    /// Create options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the output file prefix.
    pub fn file_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.file_prefix = prefix.into();
        self
    }

    /// Set the maximum frame duration in milliseconds.
    pub fn frame_duration_ms(mut self, duration_ms: u32) -> Self {
        self.frame_duration_ms = duration_ms;
        self
    }

    /// Set the importance threshold.
    pub fn importance_threshold(mut self, threshold: i32) -> Self {
        self.importance_threshold = threshold;
        self
    }

    /// Set the output directory.
    pub fn output_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.output_dir = dir.as_ref().to_path_buf();
        self
    }

    /// Set the IAMF profile version.
    pub fn profile_version(mut self, profile_version: ProfileVersion) -> Self {
        self.profile_version = profile_version;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = ConvertOptions::default();
        assert_eq!(options.file_prefix, "adm");
        assert_eq!(options.frame_duration_ms, 10);
        assert_eq!(options.importance_threshold, 0);
        assert_eq!(options.profile_version, ProfileVersion::Base);
    }

    #[test]
    fn test_builder() {
        let options = ConvertOptions::new()
            .file_prefix("mix")
            .frame_duration_ms(20)
            .importance_threshold(5)
            .output_dir("/tmp/out")
            .profile_version(ProfileVersion::Simple);

        assert_eq!(options.file_prefix, "mix");
        assert_eq!(options.frame_duration_ms, 20);
        assert_eq!(options.importance_threshold, 5);
        assert_eq!(options.output_dir, PathBuf::from("/tmp/out"));
        assert_eq!(options.profile_version, ProfileVersion::Simple);
    }
}
