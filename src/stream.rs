//! Input and output handling for a single filtering run
//!
//! The input is opened before the output is touched. File outputs are written
//! to a temporary sibling and renamed over the destination only after the run
//! succeeded, so a failed run leaves the destination as it was.

use crate::error::{Error, Result};
use crate::filter::{ChunkFilter, FilterStats};
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, StdoutLock, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

/// Path standing for stdin (as input) or stdout (as output)
pub const STDIO_PATH: &str = "-";

const BUFFER_CAPACITY: usize = 64 * 1024;

fn is_stdio(path: &Path) -> bool {
    path == Path::new(STDIO_PATH)
}

/// Open the diff to filter
pub fn open_input(path: &Path) -> Result<Box<dyn BufRead>> {
    if is_stdio(path) {
        return Ok(Box::new(io::stdin().lock()));
    }

    let file = File::open(path).map_err(|source| Error::OpenInput {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Box::new(BufReader::with_capacity(BUFFER_CAPACITY, file)))
}

/// Destination of the filtered diff
pub enum OutputTarget {
    Stdout(BufWriter<StdoutLock<'static>>),
    File {
        destination: PathBuf,
        temp: BufWriter<NamedTempFile>,
    },
}

impl OutputTarget {
    /// Prepare the destination; nothing is visible at `path` until [`finish`](Self::finish)
    pub fn create(path: &Path) -> Result<Self> {
        if is_stdio(path) {
            return Ok(OutputTarget::Stdout(BufWriter::with_capacity(
                BUFFER_CAPACITY,
                io::stdout().lock(),
            )));
        }

        let directory = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let temp = temp_builder()
            .tempfile_in(directory)
            .map_err(|source| Error::CreateOutput {
                path: path.to_path_buf(),
                source,
            })?;
        debug!(temp = %temp.path().display(), "writing to temporary output");

        Ok(OutputTarget::File {
            destination: path.to_path_buf(),
            temp: BufWriter::with_capacity(BUFFER_CAPACITY, temp),
        })
    }

    /// Flush everything and move a file output into place
    pub fn finish(self) -> Result<()> {
        match self {
            OutputTarget::Stdout(mut writer) => writer.flush().map_err(Error::Write),
            OutputTarget::File { destination, temp } => {
                let temp = temp
                    .into_inner()
                    .map_err(|e| Error::Write(e.into_error()))?;
                temp.as_file().sync_all()?;
                temp.persist(&destination).map_err(|e| Error::Persist {
                    path: destination.clone(),
                    source: e.error,
                })?;
                debug!(output = %destination.display(), "output persisted");
                Ok(())
            }
        }
    }
}

#[cfg(unix)]
fn temp_builder() -> tempfile::Builder<'static, 'static> {
    use std::fs::Permissions;
    use std::os::unix::fs::PermissionsExt;

    let mut builder = tempfile::Builder::new();
    builder
        .prefix(".diff-chunk-filter")
        .suffix(".tmp")
        .permissions(Permissions::from_mode(0o666));
    builder
}

#[cfg(not(unix))]
fn temp_builder() -> tempfile::Builder<'static, 'static> {
    let mut builder = tempfile::Builder::new();
    builder.prefix(".diff-chunk-filter").suffix(".tmp");
    builder
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            OutputTarget::Stdout(writer) => writer.write(buf),
            OutputTarget::File { temp, .. } => temp.write(buf),
        }
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        match self {
            OutputTarget::Stdout(writer) => writer.write_all(buf),
            OutputTarget::File { temp, .. } => temp.write_all(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            OutputTarget::Stdout(writer) => writer.flush(),
            OutputTarget::File { temp, .. } => temp.flush(),
        }
    }
}

/// Filter `input` into `output` in one pass
///
/// Both handles are acquired before filtering starts and dropped on every
/// exit path; a dropped, unfinished temporary output is deleted.
pub fn filter_file(filter: &ChunkFilter, input: &Path, output: &Path) -> Result<FilterStats> {
    let reader = open_input(input)?;
    let mut target = OutputTarget::create(output)?;

    let stats = filter.process(reader, &mut target)?;
    target.finish()?;

    Ok(stats)
}
