use crate::types::RunManifest;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use usfm_model::UsfmDocument;

/// Subdirectory of the output directory holding cached pages.
pub const RAW_DIR: &str = "raw";

/// Manifest file name inside the output directory.
pub const MANIFEST_FILE: &str = "manifest.json";

/// Write a rendered book to `<output_dir>/<CODE>.usfm`, replacing any previous file.
pub fn write_usfm(doc: &UsfmDocument, output_dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(output_dir)?;
    let path = output_dir.join(doc.file_name());
    let text = doc.render();
    fs::write(&path, &text).with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::info!(path = %path.display(), lines = doc.markers.len(), "Saved USFM");
    Ok(path)
}

/// Cache raw HTML under `<output_dir>/raw/` for re-examination without re-fetching.
pub fn cache_html(output_dir: &Path, name: &str, html: &str) -> Result<()> {
    let dir = output_dir.join(RAW_DIR);
    fs::create_dir_all(&dir)?;
    let path = dir.join(format!("{name}.html"));
    fs::write(&path, html)?;
    tracing::debug!(path = %path.display(), bytes = html.len(), "Cached raw HTML");
    Ok(())
}

/// Write the run manifest as pretty JSON.
pub fn write_manifest(manifest: &RunManifest, output_dir: &Path) -> Result<()> {
    fs::create_dir_all(output_dir)?;
    let path = output_dir.join(MANIFEST_FILE);
    let json = serde_json::to_string_pretty(manifest)?;
    fs::write(&path, &json)?;
    tracing::info!(
        path = %path.display(),
        converted = manifest.converted(),
        failed = manifest.failed(),
        "Wrote run manifest"
    );
    Ok(())
}
