use crate::error::Result;
pub use crate::log_info;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

pub fn ensure_directory(dir: &str) -> Result<()> {
    if !Path::new(dir).exists() {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}

/// Filesystem-safe slug for a portal name, used in snapshot and diagnostic
/// file names.
pub fn portal_slug(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect::<String>()
        .split('-')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

pub fn save_snapshot(dir: &str, slug: &str, page_number: usize, content: &str) -> Result<PathBuf> {
    ensure_directory(dir)?;

    let path = Path::new(dir).join(format!("{}-page-{}.html", slug, page_number));

    let mut file = File::create(&path)?;
    file.write_all(content.as_bytes())?;

    log_info!("[utils] Saved snapshot to {:?}", path);
    Ok(path)
}

/// Reload a portal's saved snapshots, ordered by page number.
pub fn read_snapshots(dir: &str, slug: &str) -> Result<Vec<(PathBuf, String)>> {
    ensure_directory(dir)?;

    let prefix = format!("{}-page-", slug);
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();

        let is_snapshot = path.extension().and_then(|s| s.to_str()) == Some("html")
            && path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|name| name.starts_with(&prefix));
        if is_snapshot {
            let content = fs::read_to_string(&path)?;
            files.push((path, content));
        }
    }

    files.sort_by_key(|(path, _)| extract_page_number(path).unwrap_or(0));

    Ok(files)
}

fn extract_page_number(path: &Path) -> Option<usize> {
    path.file_stem().and_then(|n| n.to_str()).and_then(|name| {
        name.rsplit('-')
            .next()
            .and_then(|num| num.parse().ok())
    })
}
