//! Plain-text report files
//!
//! Reports are written as human-readable lines and read back verbatim. The
//! loader does not parse anything: a saved report cannot be turned back into
//! totals.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use log::info;

use crate::error::{PocketError, PocketResult};
use crate::models::Money;

/// Render category totals as `Category: <name>, spent: <total>` lines
pub fn render_category_totals(totals: &BTreeMap<String, Money>) -> Vec<String> {
    totals
        .iter()
        .map(|(category, total)| format!("Category: {}, spent: {}", category, total))
        .collect()
}

/// Write report lines to a file, replacing it atomically
///
/// The lines go to a temporary file next to the target which is then renamed
/// over it, so a failed write never leaves a half-written report.
pub fn save_report<P: AsRef<Path>>(path: P, lines: &[String]) -> PocketResult<()> {
    let path = path.as_ref();

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| {
            PocketError::Report(format!(
                "Failed to create directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }

    let mut temp_name = path.as_os_str().to_owned();
    temp_name.push(".tmp");
    let temp_path = Path::new(&temp_name);

    let file = File::create(temp_path).map_err(|e| {
        PocketError::Report(format!("Unable to open file {}: {}", path.display(), e))
    })?;

    let mut writer = BufWriter::new(file);
    for line in lines {
        writeln!(writer, "{}", line)
            .map_err(|e| PocketError::Report(format!("Failed to write report: {}", e)))?;
    }
    writer
        .flush()
        .map_err(|e| PocketError::Report(format!("Failed to flush report: {}", e)))?;
    writer
        .get_ref()
        .sync_all()
        .map_err(|e| PocketError::Report(format!("Failed to sync report: {}", e)))?;
    drop(writer);

    fs::rename(temp_path, path).map_err(|e| {
        let _ = fs::remove_file(temp_path);
        PocketError::Report(format!("Failed to replace {}: {}", path.display(), e))
    })?;

    info!("saved {} report lines to {}", lines.len(), path.display());
    Ok(())
}

/// Read a text file back line by line, exactly as written
///
/// Only the `\n` terminator is stripped, so a `\r` before it stays part of the
/// line. Bytes that are not valid UTF-8 are replaced rather than rejected.
pub fn load_report<P: AsRef<Path>>(path: P) -> PocketResult<Vec<String>> {
    let path = path.as_ref();

    let file = File::open(path).map_err(|e| {
        PocketError::Report(format!("Failed to open file {}: {}", path.display(), e))
    })?;

    let mut reader = BufReader::new(file);
    let mut lines = Vec::new();
    let mut buf = Vec::new();
    loop {
        buf.clear();
        let read = reader.read_until(b'\n', &mut buf).map_err(|e| {
            PocketError::Report(format!(
                "Failed to read {} line {}: {}",
                path.display(),
                lines.len() + 1,
                e
            ))
        })?;
        if read == 0 {
            break;
        }
        if buf.last() == Some(&b'\n') {
            buf.pop();
        }
        lines.push(String::from_utf8_lossy(&buf).into_owned());
    }

    Ok(lines)
}
