//! diff-chunk-filter library
//!
//! A stream-filter for Git diffs that drops whole file chunks touching
//! vendored submodules, packaging directories or version-control metadata.
//!
//! # Examples
//!
//! Basic usage:
//!
//! ```rust
//! use diff_chunk_filter::ChunkFilter;
//! use std::io::Cursor;
//!
//! let filter = ChunkFilter::with_defaults();
//! let input = "diff --git a/.distro/x.py b/.distro/x.py\n+secret\ndiff --git a/bar.c b/bar.c\n+world\n";
//! let mut output = Vec::new();
//!
//! let stats = filter.process(Cursor::new(input), &mut output)?;
//! assert_eq!(output, b"diff --git a/bar.c b/bar.c\n+world\n");
//! assert_eq!(stats.chunks_suppressed, 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod error;
pub mod filter;
pub mod patterns;
pub mod stream;

pub use config::{AppConfig, CliArgs, ConfigError};
pub use error::{Error, Result};
pub use filter::{ChunkFilter, FilterStats};
pub use patterns::{ExclusionPattern, MatchMode, PatternKind, PatternSet};
pub use stream::filter_file;
