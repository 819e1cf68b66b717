use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tempfile::NamedTempFile;
use tracing::info;

use crate::model::PostRecord;

/// Write `records` as CSV (`title,post_url,polarity,subjectivity`) to `path`.
///
/// Rows go to a temp file beside `path` that is renamed into place once
/// everything is flushed; on error nothing is left at `path`.
pub fn write_records(path: &Path, records: &[PostRecord]) -> Result<usize> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).with_context(|| format!("Failed to create {:?}", dir))?;

    let tmp = temp_file_in(dir)
        .with_context(|| format!("Failed to create temp file in {:?}", dir))?;
    let mut writer = csv::Writer::from_writer(tmp);
    for record in records {
        writer.serialize(record)?;
    }
    if records.is_empty() {
        writer.write_record(["title", "post_url", "polarity", "subjectivity"])?;
    }

    let tmp = writer
        .into_inner()
        .map_err(|e| e.into_error())
        .context("Failed to flush CSV output")?;
    // dropping the temp file with the error removes it
    tmp.persist(path)
        .map_err(|e| e.error)
        .with_context(|| format!("Failed to write {:?}", path))?;

    info!(path = %path.display(), rows = records.len(), "Wrote CSV");
    Ok(records.len())
}

/// Temp file that ends up with the same mode a plain `fs::write` would give.
fn temp_file_in(dir: &Path) -> std::io::Result<NamedTempFile> {
    let mut builder = tempfile::Builder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        // umask still applies
        builder.permissions(fs::Permissions::from_mode(0o666));
    }
    builder.tempfile_in(dir)
}

pub fn read_records(path: &Path) -> Result<Vec<PostRecord>> {
    let mut reader =
        csv::Reader::from_path(path).with_context(|| format!("Failed to open {:?}", path))?;
    reader
        .deserialize()
        .collect::<Result<Vec<PostRecord>, _>>()
        .with_context(|| format!("Failed to parse {:?}", path))
}
