//! Shared helpers for diff-chunk-filter integration tests
//!
//! Builds diff text chunk by chunk and prepares scratch directories, optionally
//! initialised as git repositories, for the binary to run in.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

/// Vendored OpenSSL submodule path from the built-in exclusion table
pub const OPENSSL_PATH: &str = "CryptoPkg/Library/OpensslLib/openssl";

/// Builder for diff text made of `diff --git` chunks
#[derive(Debug, Clone)]
pub struct DiffBuilder {
    text: String,
    line_ending: &'static str,
}

impl DiffBuilder {
    pub fn new() -> Self {
        Self {
            text: String::new(),
            line_ending: "\n",
        }
    }

    /// Terminate every following line with CRLF
    pub fn with_crlf(mut self) -> Self {
        self.line_ending = "\r\n";
        self
    }

    /// Raw line before or between chunks
    pub fn line(mut self, line: &str) -> Self {
        self.text.push_str(line);
        self.text.push_str(self.line_ending);
        self
    }

    /// A modification chunk for `path` with one added line
    pub fn chunk(self, path: &str, added: &str) -> Self {
        self.line(&format!("diff --git a/{path} b/{path}"))
            .line("index 1111111..2222222 100644")
            .line(&format!("--- a/{path}"))
            .line(&format!("+++ b/{path}"))
            .line("@@ -1 +1,2 @@")
            .line(" context")
            .line(&format!("+{added}"))
    }

    /// A submodule pointer update chunk
    pub fn submodule(self, path: &str) -> Self {
        self.line(&format!("diff --git a/{path} b/{path}"))
            .line("index 3333333..4444444 160000")
            .line(&format!("--- a/{path}"))
            .line(&format!("+++ b/{path}"))
            .line("@@ -1 +1 @@")
            .line("-Subproject commit 3333333")
            .line("+Subproject commit 4444444")
    }

    pub fn build(self) -> String {
        self.text
    }
}

/// Scratch directory holding an input diff
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    /// Scratch directory that is also a git repository, `None` when git is missing
    pub fn with_git_repo() -> Option<Self> {
        let workspace = Self::new();
        workspace.git(&["init", "--quiet"])?;
        Some(workspace)
    }

    /// Run a git command inside the workspace, `None` when it did not succeed
    pub fn git(&self, args: &[&str]) -> Option<()> {
        Command::new("git")
            .args(args)
            .current_dir(self.dir.path())
            .output()
            .ok()
            .filter(|output| output.status.success())
            .map(|_| ())
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn file(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    pub fn write(&self, name: &str, content: impl AsRef<[u8]>) -> PathBuf {
        let path = self.file(name);
        fs::write(&path, content).unwrap();
        path
    }

    pub fn read(&self, name: &str) -> Vec<u8> {
        fs::read(self.file(name)).unwrap()
    }

    pub fn read_string(&self, name: &str) -> String {
        String::from_utf8(self.read(name)).unwrap()
    }
}
