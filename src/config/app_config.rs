//! Application configuration module
//!
//! This module provides the main application configuration structure built from
//! CLI arguments on top of hardcoded defaults.

use crate::patterns::{MatchMode, PatternSet};
use thiserror::Error;
use tracing::debug;

/// Configuration errors that can occur while resolving settings
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Invalid CLI argument value
    #[error("Invalid CLI argument: {argument}='{value}' (expected: {expected})")]
    InvalidCliArgument {
        argument: String,
        value: String,
        expected: String,
    },
}

/// CLI arguments structure
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CliArgs {
    /// Extra exclusion needles
    pub exclude: Vec<String>,
    /// Force the built-in exclusion table on
    pub default_excludes: bool,
    /// Force the built-in exclusion table off
    pub no_default_excludes: bool,
    /// Match mode name
    pub match_mode: Option<String>,
}

/// Main application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Whether the built-in exclusion table applies
    default_excludes: bool,
    /// Extra needles appended after the built-in table
    extra_patterns: Vec<String>,
    /// Where needles have to occur in a boundary line
    match_mode: MatchMode,
}

/// Configuration builder for functional composition
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    default_excludes: Option<bool>,
    extra_patterns: Option<Vec<String>>,
    match_mode: Option<MatchMode>,
}

impl ConfigBuilder {
    /// Create a new configuration builder
    #[must_use]
    pub const fn new() -> Self {
        Self {
            default_excludes: None,
            extra_patterns: None,
            match_mode: None,
        }
    }

    #[must_use]
    pub const fn with_default_excludes(mut self, enabled: bool) -> Self {
        self.default_excludes = Some(enabled);
        self
    }

    #[must_use]
    pub fn with_extra_patterns(mut self, patterns: Vec<String>) -> Self {
        self.extra_patterns = Some(patterns);
        self
    }

    #[must_use]
    pub const fn with_match_mode(mut self, mode: MatchMode) -> Self {
        self.match_mode = Some(mode);
        self
    }

    /// Build the final AppConfig; unset values take the hardcoded defaults
    pub fn build(self) -> AppConfig {
        AppConfig {
            default_excludes: self.default_excludes.unwrap_or(true),
            extra_patterns: self.extra_patterns.unwrap_or_default(),
            match_mode: self.match_mode.unwrap_or_default(),
        }
    }
}

impl AppConfig {
    /// Create AppConfig from CLI arguments
    ///
    /// Priority order:
    /// 1. CLI parameters (highest priority)
    /// 2. Hardcoded defaults
    pub fn from_cli(cli_args: CliArgs) -> Result<Self, ConfigError> {
        Self::validate_cli_patterns(&cli_args.exclude)?;

        let config = ConfigBuilder::new()
            .with_default_excludes(Self::resolve_default_excludes(&cli_args))
            .with_extra_patterns(cli_args.exclude.clone())
            .with_match_mode(Self::resolve_match_mode(&cli_args)?)
            .build();

        debug!(
            default_excludes = config.default_excludes,
            extra_patterns = ?config.extra_patterns,
            match_mode = %config.match_mode,
            "configuration resolved"
        );
        Ok(config)
    }

    fn resolve_default_excludes(cli_args: &CliArgs) -> bool {
        [
            cli_args.default_excludes.then_some(true),
            cli_args.no_default_excludes.then_some(false),
        ]
        .into_iter()
        .flatten()
        .next()
        .unwrap_or(true)
    }

    fn resolve_match_mode(cli_args: &CliArgs) -> Result<MatchMode, ConfigError> {
        cli_args.match_mode.as_ref().map_or(Ok(MatchMode::default()), |value| {
            value.parse().map_err(|_| ConfigError::InvalidCliArgument {
                argument: "--match-mode".to_owned(),
                value: value.clone(),
                expected: "substring or anchored".to_owned(),
            })
        })
    }

    /// A needle that is empty, or only `/`, would match every boundary line
    fn validate_cli_patterns(patterns: &[String]) -> Result<(), ConfigError> {
        patterns
            .iter()
            .find(|pattern| {
                let needle = pattern.as_str();
                needle.strip_prefix('/').unwrap_or(needle).is_empty()
            })
            .map_or(Ok(()), |pattern| {
                Err(ConfigError::InvalidCliArgument {
                    argument: "--exclude".to_owned(),
                    value: pattern.clone(),
                    expected: "non-empty path substring".to_owned(),
                })
            })
    }

    pub fn default_excludes(&self) -> bool {
        self.default_excludes
    }

    pub fn extra_patterns(&self) -> &[String] {
        &self.extra_patterns
    }

    pub fn match_mode(&self) -> MatchMode {
        self.match_mode
    }

    /// The exclusion table described by this configuration
    pub fn pattern_set(&self) -> PatternSet {
        let base = if self.default_excludes {
            PatternSet::defaults()
        } else {
            PatternSet::empty()
        };

        self.extra_patterns
            .iter()
            .fold(base, |set, needle| set.with_custom(needle))
            .with_match_mode(self.match_mode)
    }
}
