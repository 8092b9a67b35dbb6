//! The walk-and-concatenate pass: visit every file under the source
//! directory and append one record per readable file to the output.

use std::fmt;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, error, info, warn};

use crate::config::CombineConfig;

#[derive(Debug)]
pub enum CombineError {
    /// The configured source directory does not exist (or is not a directory).
    MissingSourceDir(PathBuf),
    /// The output file could not be opened for (truncating) write.
    OutputOpen { path: PathBuf, source: io::Error },
    /// A write or flush on the already-open output failed.
    OutputWrite { path: PathBuf, source: io::Error },
}

impl fmt::Display for CombineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CombineError::MissingSourceDir(path) => {
                write!(f, "source directory '{}' not found", path.display())
            }
            CombineError::OutputOpen { path, source } => {
                write!(
                    f,
                    "failed to open output file '{}' for writing: {}",
                    path.display(),
                    source
                )
            }
            CombineError::OutputWrite { path, source } => {
                write!(
                    f,
                    "failed to write to output file '{}': {}",
                    path.display(),
                    source
                )
            }
        }
    }
}

impl std::error::Error for CombineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CombineError::MissingSourceDir(_) => None,
            CombineError::OutputOpen { source, .. } => Some(source),
            CombineError::OutputWrite { source, .. } => Some(source),
        }
    }
}

/// Summary of one aggregation run.
#[derive(Debug)]
pub struct CombineReport {
    pub files_written: usize,
    pub files_skipped: usize,
}

/// Run one full aggregation pass according to `config`.
///
/// The source directory is checked before the output file is touched, so a
/// missing source never truncates a previous snapshot. Unreadable files are
/// skipped with a warning; only output-side failures abort the run.
pub fn combine(config: &CombineConfig) -> Result<CombineReport, CombineError> {
    let source_dir = &config.source_dir;
    if !source_dir.is_dir() {
        error!(path = %source_dir.display(), "Source directory not found");
        return Err(CombineError::MissingSourceDir(source_dir.clone()));
    }

    let out_file = File::create(&config.output_file).map_err(|e| {
        error!(
            error = ?e,
            path = %config.output_file.display(),
            "Failed to open output file for writing"
        );
        CombineError::OutputOpen {
            path: config.output_file.clone(),
            source: e,
        }
    })?;
    let mut out = BufWriter::new(out_file);

    let mut report = CombineReport {
        files_written: 0,
        files_skipped: 0,
    };
    visit_dir(source_dir, source_dir, &mut out, config, &mut report)?;

    out.flush().map_err(|e| {
        error!(error = ?e, path = %config.output_file.display(), "Failed to flush output file");
        CombineError::OutputWrite {
            path: config.output_file.clone(),
            source: e,
        }
    })?;

    info!(
        written = report.files_written,
        skipped = report.files_skipped,
        output = %config.output_file.display(),
        "Combine pass finished"
    );
    Ok(report)
}

/// Recursively append a record for every readable file under `dir`.
///
/// Entries are sorted per directory so the whole traversal, and therefore the
/// output file, is deterministic across runs.
fn visit_dir(
    dir: &Path,
    root: &Path,
    out: &mut BufWriter<File>,
    config: &CombineConfig,
    report: &mut CombineReport,
) -> Result<(), CombineError> {
    let read_dir = match fs::read_dir(dir) {
        Ok(rd) => rd,
        Err(e) => {
            warn!(error = ?e, path = %dir.display(), "Failed to list directory, skipping its subtree");
            report.files_skipped += 1;
            return Ok(());
        }
    };

    let mut entries: Vec<PathBuf> = Vec::new();
    for entry_res in read_dir {
        match entry_res {
            Ok(entry) => entries.push(entry.path()),
            Err(e) => {
                warn!(error = ?e, path = %dir.display(), "Failed to read directory entry, skipping");
                report.files_skipped += 1;
            }
        }
    }
    entries.sort();

    for path in entries {
        if path.is_dir() {
            visit_dir(&path, root, out, config, report)?;
            continue;
        }

        let rel_path = path.strip_prefix(root).unwrap_or(path.as_path());

        // Broken symlinks and non-UTF-8 content surface here as read errors.
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => {
                warn!(error = ?e, path = %path.display(), "Failed to read file, skipping");
                report.files_skipped += 1;
                continue;
            }
        };

        write_record(out, &rel_path.display().to_string(), &content).map_err(|e| {
            error!(error = ?e, path = %config.output_file.display(), "Failed to append record");
            CombineError::OutputWrite {
                path: config.output_file.clone(),
                source: e,
            }
        })?;
        report.files_written += 1;
        debug!(file = %rel_path.display(), bytes = content.len(), "Appended record");
    }
    Ok(())
}

/// One record: header line, content (newline-terminated), one blank line.
fn write_record<W: Write>(out: &mut W, relative_path: &str, content: &str) -> io::Result<()> {
    writeln!(out, "---- {} ----", relative_path)?;
    out.write_all(content.as_bytes())?;
    if !content.ends_with('\n') {
        writeln!(out)?;
    }
    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::write_record;

    #[test]
    fn record_has_header_content_and_blank_separator() {
        let mut buf = Vec::new();
        write_record(&mut buf, "sub/b.txt", "world\n").unwrap();
        assert_eq!(buf, b"---- sub/b.txt ----\nworld\n\n");
    }

    #[test]
    fn record_terminates_content_without_trailing_newline() {
        let mut buf = Vec::new();
        write_record(&mut buf, "a.txt", "hello").unwrap();
        assert_eq!(buf, b"---- a.txt ----\nhello\n\n");
    }

    #[test]
    fn empty_content_still_gets_separator() {
        let mut buf = Vec::new();
        write_record(&mut buf, "empty.txt", "").unwrap();
        assert_eq!(buf, b"---- empty.txt ----\n\n\n");
    }
}
