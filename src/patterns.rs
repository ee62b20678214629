//! Exclusion patterns
//!
//! A [`PatternSet`] is a data-driven table of byte needles tested against chunk
//! boundary lines. Any single match excludes the chunk; the scan in
//! [`crate::filter`] never changes when the table grows.

use crate::filter::{extract_file_path, strip_line_ending};
use memchr::memmem::Finder;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Built-in exclusions: packaging metadata, git metadata and vendored submodules.
const DEFAULT_EXCLUSIONS: &[(&str, PatternKind, &str)] = &[
    ("distro", PatternKind::Packaging, "/.distro/"),
    // Matches .gitignore, .gitmodules and .github/ as well as .git/
    ("git-metadata", PatternKind::Vcs, "/.git"),
    (
        "openssl",
        PatternKind::Vendored,
        "/CryptoPkg/Library/OpensslLib/openssl",
    ),
    (
        "berkeley-softfloat",
        PatternKind::Vendored,
        "/ArmPkg/Library/ArmSoftFloatLib/berkeley-softfloat-3",
    ),
    (
        "cmocka",
        PatternKind::Vendored,
        "/UnitTestFrameworkPkg/Library/CmockaLib/cmocka",
    ),
    (
        "oniguruma",
        PatternKind::Vendored,
        "/MdeModulePkg/Universal/RegularExpressionDxe/oniguruma",
    ),
    (
        "brotli-decompress",
        PatternKind::Vendored,
        "/MdeModulePkg/Library/BrotliCustomDecompressLib/brotli",
    ),
    (
        "brotli-compress",
        PatternKind::Vendored,
        "/BaseTools/Source/C/BrotliCompress/brotli",
    ),
    (
        "jansson",
        PatternKind::Vendored,
        "/RedfishPkg/Library/JsonLib/jansson",
    ),
];

/// What an exclusion pattern stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternKind {
    /// Internal packaging directories
    Packaging,
    /// Version-control metadata
    Vcs,
    /// Vendored third-party subtrees
    Vendored,
    /// Supplied through the command line
    Custom,
}

/// Where in the boundary line a needle has to occur
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchMode {
    /// Anywhere in the boundary line
    #[default]
    Substring,
    /// At the root of the old-side path; a leading `/` on the needle is optional
    Anchored,
}

/// Error returned when parsing an unknown [`MatchMode`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown match mode '{0}' (expected: substring or anchored)")]
pub struct UnknownMatchMode(pub String);

impl FromStr for MatchMode {
    type Err = UnknownMatchMode;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "substring" => Ok(MatchMode::Substring),
            "anchored" => Ok(MatchMode::Anchored),
            _ => Err(UnknownMatchMode(value.to_owned())),
        }
    }
}

impl fmt::Display for MatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchMode::Substring => f.write_str("substring"),
            MatchMode::Anchored => f.write_str("anchored"),
        }
    }
}

/// A single named byte needle
#[derive(Debug, Clone)]
pub struct ExclusionPattern {
    name: String,
    kind: PatternKind,
    finder: Finder<'static>,
}

impl ExclusionPattern {
    /// Create a pattern from a literal byte needle
    pub fn new<N: Into<String>, B: AsRef<[u8]>>(name: N, kind: PatternKind, needle: B) -> Self {
        Self {
            name: name.into(),
            kind,
            finder: Finder::new(needle.as_ref()).into_owned(),
        }
    }

    /// Create a custom pattern named after its own needle
    pub fn custom<S: AsRef<str>>(needle: S) -> Self {
        let needle = needle.as_ref();
        Self::new(needle, PatternKind::Custom, needle)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> PatternKind {
        self.kind
    }

    pub fn needle(&self) -> &[u8] {
        self.finder.needle()
    }

    /// Test a boundary line (terminator included or not) against this pattern
    pub fn matches(&self, line: &[u8], mode: MatchMode) -> bool {
        match mode {
            MatchMode::Substring => self.finder.find(strip_line_ending(line)).is_some(),
            MatchMode::Anchored => {
                let needle = self.needle();
                let needle = needle.strip_prefix(b"/").unwrap_or(needle);
                // An empty prefix never matches
                !needle.is_empty()
                    && extract_file_path(line).is_some_and(|path| path.starts_with(needle))
            }
        }
    }
}

/// Ordered collection of exclusion patterns sharing one match mode
#[derive(Debug, Clone, Default)]
pub struct PatternSet {
    patterns: Vec<ExclusionPattern>,
    mode: MatchMode,
}

impl PatternSet {
    /// A set that excludes nothing
    pub fn empty() -> Self {
        Self::default()
    }

    /// The built-in exclusion table in substring mode
    pub fn defaults() -> Self {
        DEFAULT_EXCLUSIONS
            .iter()
            .map(|&(name, kind, needle)| ExclusionPattern::new(name, kind, needle))
            .fold(Self::empty(), Self::with_pattern)
    }

    #[must_use]
    pub fn with_pattern(mut self, pattern: ExclusionPattern) -> Self {
        self.patterns.push(pattern);
        self
    }

    #[must_use]
    pub fn with_custom<S: AsRef<str>>(self, needle: S) -> Self {
        self.with_pattern(ExclusionPattern::custom(needle))
    }

    #[must_use]
    pub fn with_match_mode(mut self, mode: MatchMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn match_mode(&self) -> MatchMode {
        self.mode
    }

    pub fn patterns(&self) -> &[ExclusionPattern] {
        &self.patterns
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// First pattern in table order matching the boundary line
    pub fn first_match(&self, line: &[u8]) -> Option<&ExclusionPattern> {
        self.patterns
            .iter()
            .find(|pattern| pattern.matches(line, self.mode))
    }
}

impl Extend<ExclusionPattern> for PatternSet {
    fn extend<I: IntoIterator<Item = ExclusionPattern>>(&mut self, iter: I) {
        self.patterns.extend(iter);
    }
}
