use std::path::{Path, PathBuf};

use color_eyre::Result;
use log::info;

use f1_core::Session;

#[derive(Debug, Clone)]
pub struct Options {
    /// Write the derivation log to `<text>.csv`.
    pub write_log: bool,
    /// Write the hierarchy listing to `<text> (tree).csv`.
    pub write_hierarchy: bool,
    /// Start the log file with a `line,expression,rule` header.
    pub has_headers: bool,
}

pub const DEFAULT_OPTIONS: Options = Options {
    write_log: true,
    write_hierarchy: true,
    has_headers: true,
};

impl Default for Options {
    fn default() -> Self {
        DEFAULT_OPTIONS
    }
}

pub fn log_path(dir: &Path, session: &Session) -> PathBuf {
    dir.join(format!("{}.csv", session.text()))
}

pub fn hierarchy_path(dir: &Path, session: &Session) -> PathBuf {
    dir.join(format!("{} (tree).csv", session.text()))
}

/// Writes the export files of `session` into `dir`, returning the paths written.
pub fn export(session: &Session, dir: &Path, options: &Options) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();

    if options.write_log {
        let path = log_path(dir, session);
        let mut wrt = csv::WriterBuilder::new()
            .has_headers(options.has_headers)
            .from_path(&path)?;
        for row in session.log() {
            wrt.serialize(row)?;
        }
        wrt.flush()?;
        info!("Derivation log written to '{}'", path.display());
        written.push(path);
    }

    if options.write_hierarchy {
        let path = hierarchy_path(dir, session);
        let mut wrt = csv::WriterBuilder::new().flexible(true).from_path(&path)?;
        for record in session.hierarchy() {
            wrt.write_record(&record)?;
        }
        wrt.flush()?;
        info!("Hierarchy written to '{}'", path.display());
        written.push(path);
    }

    Ok(written)
}
