//! Configuration module for diff-chunk-filter
//!
//! Settings come from the command line only; anything not given there takes
//! the hardcoded default. Output therefore depends on nothing but the input
//! file and the arguments.
//!
//! # Priority Logic
//!
//! 1. CLI parameters (highest priority)
//! 2. Hardcoded defaults
//!
//! # Usage
//!
//! ```rust
//! use diff_chunk_filter::config::{AppConfig, CliArgs};
//! use diff_chunk_filter::ChunkFilter;
//!
//! let cli_args = CliArgs {
//!     exclude: vec!["/third_party/".to_owned()],
//!     ..CliArgs::default()
//! };
//!
//! let config = AppConfig::from_cli(cli_args)?;
//! let filter = ChunkFilter::new(config.pattern_set());
//! assert_eq!(filter.patterns().len(), 10);
//! # Ok::<(), diff_chunk_filter::ConfigError>(())
//! ```

pub mod app_config;

pub use app_config::{AppConfig, CliArgs, ConfigBuilder, ConfigError};

#[cfg(test)]
mod integration_tests {
    use super::*;
    use crate::filter::ChunkFilter;
    use std::io::Cursor;

    /// **What is tested:** Required trait implementations for the error type
    /// **Why it is tested:** Errors are compared in tests and printed by the binary
    /// **Test conditions:** Creates a ConfigError instance
    /// **Expectations:** Debug, Display, Error, Clone and PartialEq are available
    #[test]
    fn test_error_type_implements_required_traits() {
        let error = ConfigError::InvalidCliArgument {
            argument: "--match-mode".to_owned(),
            value: "fuzzy".to_owned(),
            expected: "substring or anchored".to_owned(),
        };
        let _debug = format!("{error:?}");
        let _error_trait: &dyn std::error::Error = &error;
        assert_eq!(error.clone(), error);
        assert!(error.to_string().contains("fuzzy"));
    }

    /// **What is tested:** Configuration driving a real filter run
    /// **Why it is tested:** CLI settings must change filtering behaviour end to end
    /// **Test conditions:** Extra needle "/docs/" with the built-in table disabled
    /// **Expectations:** The docs chunk is dropped, the .git chunk is kept
    #[test]
    fn test_config_drives_filter() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let cli_args = CliArgs {
            exclude: vec!["/docs/".to_owned()],
            no_default_excludes: true,
            ..CliArgs::default()
        };
        let config = AppConfig::from_cli(cli_args)?;
        let filter = ChunkFilter::new(config.pattern_set());

        let input = b"diff --git a/docs/x.md b/docs/x.md\n+doc\ndiff --git a/.gitignore b/.gitignore\n+target\n";
        let mut output = Vec::new();
        filter.process(Cursor::new(&input[..]), &mut output)?;

        assert_eq!(output, b"diff --git a/.gitignore b/.gitignore\n+target\n");
        Ok(())
    }
}
