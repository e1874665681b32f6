//! Per-round CSV log sink (§6): "agents may additionally write per-round
//! rows to a CSV sink ... the controller opens the file for append on round
//! start, closes on round end, and rotates by numeric suffix if a file of
//! the same name exists." The engine itself never touches the filesystem;
//! this crate is where that I/O lives, ground: `other_examples`
//! (`gabemgem-rust_dt`, `prospectorengine-prospector-btc`) since the
//! teacher has no persistence crate of its own.

use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};

/// An open, round-scoped CSV file. Rows are free-form key/value pairs; each
/// pair becomes one `key=value` cell so rows with differing schemas can
/// share a file.
pub struct RoundCsvSink {
    writer: csv::Writer<std::fs::File>,
    path: PathBuf,
}

impl RoundCsvSink {
    /// Open `base_path` for append, choosing a numeric-suffixed sibling
    /// instead if a file already sits at that path.
    pub fn open(base_path: &Path) -> io::Result<Self> {
        let path = rotate_if_exists(base_path);
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let writer = csv::WriterBuilder::new().has_headers(false).from_writer(file);
        Ok(Self { writer, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one round's accumulated rows and flush/close.
    pub fn write_round(mut self, rows: &[Vec<(String, String)>]) -> io::Result<()> {
        for row in rows {
            let cells: Vec<String> = row.iter().map(|(key, value)| format!("{key}={value}")).collect();
            self.writer.write_record(&cells).map_err(csv_to_io)?;
        }
        self.writer.flush()
    }
}

fn rotate_if_exists(base: &Path) -> PathBuf {
    if !base.exists() {
        return base.to_path_buf();
    }
    let stem = base.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default();
    let ext = base.extension().map(|e| e.to_string_lossy().into_owned());
    let parent = base.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or_else(|| Path::new("."));

    let mut suffix = 1u32;
    loop {
        let name = match &ext {
            Some(ext) => format!("{stem}_{suffix}.{ext}"),
            None => format!("{stem}_{suffix}"),
        };
        let candidate = parent.join(name);
        if !candidate.exists() {
            return candidate;
        }
        suffix += 1;
    }
}

fn csv_to_io(err: csv::Error) -> io::Error {
    io::Error::new(io::ErrorKind::Other, err)
}
