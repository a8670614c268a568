use crate::cleaner::Supporter;
use crate::error::{ExportError, Result};
pub use crate::log_info;
use std::fs;
use std::path::Path;

pub fn export_to_csv(rows: &[Supporter], path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if rows.is_empty() {
        return Err(ExportError::EmptyDataset.into());
    }
    ensure_parent(path)?;

    let mut writer = csv::Writer::from_path(path).map_err(ExportError::Csv)?;
    for row in rows {
        writer.serialize(row).map_err(ExportError::Csv)?;
    }
    writer.flush().map_err(ExportError::Io)?;

    log_info!("[export] Wrote {} row(s) to {:?}", rows.len(), path);
    Ok(())
}

pub fn export_to_json(rows: &[Supporter], path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if rows.is_empty() {
        return Err(ExportError::EmptyDataset.into());
    }
    ensure_parent(path)?;

    let json = serde_json::to_string_pretty(rows)?;
    fs::write(path, json).map_err(ExportError::Io)?;

    log_info!("[export] Wrote {} row(s) to {:?}", rows.len(), path);
    Ok(())
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(ExportError::Io)?;
        }
    }
    Ok(())
}
