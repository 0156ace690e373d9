//! Daily log repository backed by an append-only CSV file

use anyhow::{anyhow, bail, Context, Result};
use lifemode_shared::models::{DailyLogEntry, DAILY_LOG_HEADER};
use std::fs::{self, File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::debug;

/// Daily log repository
///
/// Appends are serialized through a mutex and performed on the blocking
/// thread pool. Existing rows are never rewritten.
#[derive(Debug, Clone)]
pub struct DailyLogRepository {
    path: PathBuf,
    lock: Arc<Mutex<()>>,
}

impl DailyLogRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one snapshot row, writing the header first on a new file
    pub async fn append(&self, entry: DailyLogEntry) -> Result<()> {
        let path = self.path.clone();
        let lock = Arc::clone(&self.lock);
        tokio::task::spawn_blocking(move || {
            let _guard = lock.lock().map_err(|_| anyhow!("daily log lock poisoned"))?;
            append_row(&path, &entry)
        })
        .await
        .context("daily log append task failed")?
    }

    /// Read every row in file order; a missing file is an empty log
    pub async fn load_all(&self) -> Result<Vec<DailyLogEntry>> {
        let path = self.path.clone();
        let lock = Arc::clone(&self.lock);
        tokio::task::spawn_blocking(move || {
            let _guard = lock.lock().map_err(|_| anyhow!("daily log lock poisoned"))?;
            read_rows(&path)
        })
        .await
        .context("daily log read task failed")?
    }
}

fn is_empty_or_missing(path: &Path) -> bool {
    fs::metadata(path).map(|m| m.len() == 0).unwrap_or(true)
}

/// True when the file has content whose final byte is not a newline
fn lacks_trailing_newline(path: &Path) -> Result<bool> {
    if is_empty_or_missing(path) {
        return Ok(false);
    }
    let mut file = File::open(path).with_context(|| format!("cannot open {}", path.display()))?;
    file.seek(SeekFrom::End(-1))?;
    let mut last = [0u8; 1];
    file.read_exact(&mut last)?;
    Ok(last[0] != b'\n')
}

fn append_row(path: &Path, entry: &DailyLogEntry) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("cannot create {}", parent.display()))?;
    }

    let write_header = is_empty_or_missing(path);
    let needs_newline = lacks_trailing_newline(path)?;
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("cannot open {}", path.display()))?;
    if needs_newline {
        file.write_all(b"\n")?;
    }

    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(file);
    if write_header {
        wtr.write_record(DAILY_LOG_HEADER)?;
    }
    wtr.serialize(entry)?;
    wtr.flush()?;

    debug!(path = %path.display(), date = %entry.date, "Appended daily log row");
    Ok(())
}

fn read_rows(path: &Path) -> Result<Vec<DailyLogEntry>> {
    if is_empty_or_missing(path) {
        return Ok(Vec::new());
    }

    let mut rdr = csv::Reader::from_path(path)
        .with_context(|| format!("cannot open {}", path.display()))?;

    let headers = rdr.headers()?;
    if headers.iter().ne(DAILY_LOG_HEADER.iter().copied()) {
        bail!(
            "unexpected daily log header in {}: {:?}",
            path.display(),
            headers
        );
    }

    rdr.deserialize()
        .enumerate()
        .map(|(i, row)| row.with_context(|| format!("malformed daily log row {}", i + 1)))
        .collect()
}
