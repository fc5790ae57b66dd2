//! All-or-nothing output commit
//!
//! Every output of a pair is first encoded into a hidden temporary file next
//! to its destination. Only when all of them are staged are they renamed into
//! place. A file already sitting at a destination is moved aside first; a
//! failed rename removes the outputs committed for the pair and puts those
//! earlier files back.

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::{NamedTempFile, TempPath};
use tracing::{debug, warn};

use crate::stereo_pipeline::common::error::{PipelineError, Result};

const TEMP_PREFIX: &str = ".stereo-disparity-";

/// An encoded output waiting to be renamed onto its destination.
/// Dropping it deletes the temporary file.
#[derive(Debug)]
pub struct StagedOutput {
    file: NamedTempFile,
    destination: PathBuf,
}

/// A destination written by this commit, with whatever it replaced.
struct Committed {
    destination: PathBuf,
    previous: Option<TempPath>,
}

fn parent_dir(destination: &Path) -> &Path {
    match destination.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

fn write_error(destination: &Path, e: impl std::fmt::Display) -> PipelineError {
    PipelineError::OutputWriteError(format!("{}: {}", destination.display(), e))
}

impl StagedOutput {
    /// Creates a temporary file in the destination's directory and lets
    /// `write` fill it.
    pub fn stage<F>(destination: &Path, write: F) -> Result<Self>
    where
        F: FnOnce(&mut dyn Write) -> Result<()>,
    {
        let mut file = tempfile::Builder::new()
            .prefix(TEMP_PREFIX)
            .suffix(".part")
            .tempfile_in(parent_dir(destination))
            .map_err(|e| write_error(destination, e))?;

        write(&mut file)?;
        file.flush()?;

        debug!("Staged {}", destination.display());
        Ok(Self {
            file,
            destination: destination.to_path_buf(),
        })
    }
}

/// Renames a regular file at `destination` to a hidden temporary name in the
/// same directory. The returned path deletes the old file when dropped.
fn move_aside(destination: &Path) -> Result<Option<TempPath>> {
    match std::fs::symlink_metadata(destination) {
        Ok(meta) if meta.is_file() => {}
        _ => return Ok(None),
    }

    let backup = tempfile::Builder::new()
        .prefix(TEMP_PREFIX)
        .suffix(".bak")
        .tempfile_in(parent_dir(destination))
        .map_err(|e| write_error(destination, e))?
        .into_temp_path();
    std::fs::rename(destination, &backup).map_err(|e| write_error(destination, e))?;

    debug!("Moved previous {} aside", destination.display());
    Ok(Some(backup))
}

fn restore(destination: &Path, previous: Option<TempPath>) {
    let Some(previous) = previous else {
        return;
    };
    match std::fs::rename(&previous, destination) {
        Ok(()) => {
            // Renamed away; nothing left for the drop to delete.
            let _ = previous.keep();
        }
        Err(e) => warn!("Could not restore previous {}: {}", destination.display(), e),
    }
}

fn roll_back(committed: Vec<Committed>) {
    for Committed { destination, previous } in committed.into_iter().rev() {
        if let Err(e) = std::fs::remove_file(&destination) {
            warn!("Could not roll back {}: {}", destination.display(), e);
        }
        restore(&destination, previous);
    }
}

/// Renames every staged file onto its destination, in order.
///
/// Returns the committed paths. On the first failure the outputs committed so
/// far are removed, files they replaced are restored, and the remaining
/// temporary files are discarded.
pub fn commit_all(staged: Vec<StagedOutput>) -> Result<Vec<PathBuf>> {
    let mut committed: Vec<Committed> = Vec::with_capacity(staged.len());

    for output in staged {
        let StagedOutput { file, destination } = output;

        let previous = match move_aside(&destination) {
            Ok(previous) => previous,
            Err(e) => {
                roll_back(committed);
                return Err(e);
            }
        };

        if let Err(e) = file.persist(&destination) {
            restore(&destination, previous);
            roll_back(committed);
            return Err(write_error(&destination, e.error));
        }

        committed.push(Committed { destination, previous });
    }

    // Dropping the moved-aside files deletes them.
    Ok(committed.into_iter().map(|c| c.destination).collect())
}
