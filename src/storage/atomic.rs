//! Atomic file replacement.
//!
//! Content goes to `<name>.tmp` next to the target, is synced, and is then
//! renamed over the target. Readers see either the old file or the complete
//! new one.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use log::warn;

use crate::error::Result;

/// Write `bytes` to `path` atomically, creating parent directories as needed.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    write_atomic_with(path, |writer| Ok(writer.write_all(bytes)?))
}

/// Stream content into `path` atomically.
///
/// If `write` fails the temporary file is removed and the target is left
/// untouched.
pub fn write_atomic_with<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<File>) -> Result<()>,
{
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }

    let tmp_path = temp_path(path);
    let result = write_temp(&tmp_path, write).and_then(|()| Ok(fs::rename(&tmp_path, path)?));
    if result.is_err()
        && let Err(e) = fs::remove_file(&tmp_path)
    {
        warn!("Failed to remove {}: {e}", tmp_path.display());
    }
    result
}

fn write_temp<F>(tmp_path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<File>) -> Result<()>,
{
    let mut writer = BufWriter::new(File::create(tmp_path)?);
    write(&mut writer)?;
    writer.flush()?;
    writer.get_ref().sync_all()?;
    Ok(())
}

pub(crate) fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}
