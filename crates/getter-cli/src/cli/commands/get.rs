//! `getter get <url>` – download in parallel and write the result to disk.

use anyhow::{Context, Result};
use getter_core::config::GetterConfig;
use getter_core::{Downloader, Target};
use std::fs;
use std::path::{Path, PathBuf};

/// Used when the URL path has no usable last segment.
const DEFAULT_FILENAME: &str = "download.bin";

pub fn run_get(
    cfg: &GetterConfig,
    url: &str,
    workers: Option<usize>,
    output: Option<&Path>,
    queue_capacity: Option<usize>,
) -> Result<()> {
    let target = Target::parse(url).with_context(|| format!("invalid url: {url}"))?;
    let workers = workers.unwrap_or(cfg.workers);
    let output = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| default_output_path(&target));

    let mut options = cfg.download_options();
    if queue_capacity.is_some() {
        options.queue_capacity = queue_capacity;
    }

    let (session, bytes) = Downloader::new(options)
        .get(target, workers)
        .with_context(|| format!("download of {url} failed"))?;
    write_output(&output, &bytes)?;

    println!(
        "Saved {} bytes to {} ({} chunks)",
        bytes.len(),
        output.display(),
        session.task_count()
    );
    Ok(())
}

/// Local file name derived from the URL's last path segment.
pub(crate) fn default_output_path(target: &Target) -> PathBuf {
    let name = target
        .file_name()
        .filter(|n| *n != "." && *n != "..")
        .unwrap_or(DEFAULT_FILENAME);
    PathBuf::from(name)
}

/// Write to `<path>.part` first, then rename into place.
pub(crate) fn write_output(path: &Path, bytes: &[u8]) -> Result<()> {
    let mut part = path.as_os_str().to_owned();
    part.push(".part");
    let part = PathBuf::from(part);

    fs::write(&part, bytes)
        .with_context(|| format!("failed to write {}", part.display()))?;
    fs::rename(&part, path)
        .with_context(|| format!("failed to rename {} to {}", part.display(), path.display()))?;
    tracing::info!("wrote {} bytes to {}", bytes.len(), path.display());
    Ok(())
}
