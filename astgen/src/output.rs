//! Writing units to disk and formatting them.
//!
//! Units are first written next to their destination as `<module>.tmp.rs`
//! and formatted there. Only once every unit has been written and
//! formatted are they renamed to `<module>.rs`, each previous file moved
//! aside to `<module>.old.rs` first. If anything fails, the staged files
//! are removed, the files moved aside are put back, and the previous
//! output stays as it was.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{info, warn};

use crate::emit::Unit;
use crate::error::{Error, Result};

/// External formatter, invoked once per unit as `program [args...] <file>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Formatter {
    pub program: String,
    pub args: Vec<String>,
}

impl Default for Formatter {
    fn default() -> Self {
        Self::rustfmt()
    }
}

impl Formatter {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn rustfmt() -> Self {
        Self::new("rustfmt").arg("--edition").arg("2024")
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Formats `path` in place. Blocks until the formatter exits.
    pub fn format(&self, path: &Path) -> Result<()> {
        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(path)
            .output()
            .map_err(|source| Error::FormatterUnavailable {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            let mut diagnostic = String::from_utf8_lossy(&output.stderr).into_owned();
            if diagnostic.trim().is_empty() {
                diagnostic = format!("`{}` exited with {}", self.program, output.status);
            }
            return Err(Error::PostProcess {
                path: path.to_owned(),
                diagnostic,
            });
        }

        Ok(())
    }
}

struct Staged {
    staged: PathBuf,
    target: PathBuf,
    backup: PathBuf,
}

/// Writes every unit into `dir`, formatting each one if `formatter` is set.
///
/// Returns the paths of the written files, in unit order.
pub fn write_units(dir: &Path, units: &[Unit], formatter: Option<&Formatter>) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir).map_err(|source| Error::Sink {
        path: dir.to_owned(),
        source,
    })?;

    let mut staged = Vec::with_capacity(units.len());
    if let Err(err) = stage(dir, units, formatter, &mut staged) {
        discard(&staged);
        return Err(err);
    }

    commit(staged)
}

fn stage(
    dir: &Path,
    units: &[Unit],
    formatter: Option<&Formatter>,
    staged: &mut Vec<Staged>,
) -> Result<()> {
    for unit in units {
        let target = dir.join(unit.file_name());
        let path = dir.join(format!("{}.tmp.rs", unit.module));

        fs::write(&path, &unit.source).map_err(|source| Error::Sink {
            path: path.clone(),
            source,
        })?;
        staged.push(Staged {
            staged: path.clone(),
            target,
            backup: dir.join(format!("{}.old.rs", unit.module)),
        });

        if let Some(formatter) = formatter {
            formatter.format(&path)?;
            info!(path = %path.display(), "formatted");
        }
    }
    Ok(())
}

fn commit(staged: Vec<Staged>) -> Result<Vec<PathBuf>> {
    // (entry, whether a previous target was moved aside)
    let mut committed = Vec::with_capacity(staged.len());
    for (i, entry) in staged.iter().enumerate() {
        match replace(entry) {
            Ok(backed_up) => committed.push((entry, backed_up)),
            Err(err) => {
                rollback(&committed);
                discard(&staged[i..]);
                return Err(err);
            }
        }
    }

    let mut written = Vec::with_capacity(committed.len());
    for (entry, backed_up) in committed {
        if backed_up {
            if let Err(err) = fs::remove_file(&entry.backup) {
                warn!(path = %entry.backup.display(), %err, "failed to remove previous output");
            }
        }
        info!(path = %entry.target.display(), "wrote");
        written.push(entry.target.clone());
    }
    Ok(written)
}

/// Moves the staged file over its target. A previous file at the target
/// is moved aside first, and put back if the move fails.
fn replace(entry: &Staged) -> Result<bool> {
    let backed_up = entry.target.is_file();
    if backed_up {
        fs::rename(&entry.target, &entry.backup).map_err(|source| Error::Sink {
            path: entry.backup.clone(),
            source,
        })?;
    }

    if let Err(source) = fs::rename(&entry.staged, &entry.target) {
        if backed_up {
            restore(entry);
        }
        return Err(Error::Sink {
            path: entry.target.clone(),
            source,
        });
    }

    Ok(backed_up)
}

fn rollback(committed: &[(&Staged, bool)]) {
    for &(entry, backed_up) in committed.iter().rev() {
        if backed_up {
            restore(entry);
        } else if let Err(err) = fs::remove_file(&entry.target) {
            warn!(path = %entry.target.display(), %err, "failed to remove new output");
        }
    }
}

fn restore(entry: &Staged) {
    if let Err(err) = fs::rename(&entry.backup, &entry.target) {
        warn!(
            path = %entry.target.display(),
            backup = %entry.backup.display(),
            %err,
            "failed to restore previous output"
        );
    }
}

fn discard(staged: &[Staged]) {
    for Staged { staged, .. } in staged {
        if let Err(err) = fs::remove_file(staged) {
            warn!(path = %staged.display(), %err, "failed to remove staged file");
        }
    }
}
