//! `getter probe <url>` – size the resource and show the chunk plan.

use anyhow::{Context, Result};
use getter_core::config::GetterConfig;
use getter_core::{Downloader, Target};

pub fn run_probe(cfg: &GetterConfig, url: &str, workers: Option<usize>) -> Result<()> {
    let target = Target::parse(url).with_context(|| format!("invalid url: {url}"))?;
    let workers = workers.unwrap_or(cfg.workers);
    let session = Downloader::new(cfg.download_options())
        .probe(target, workers)
        .with_context(|| format!("probe of {url} failed"))?;

    println!("Resource:   {}", session.target());
    println!("Size:       {} bytes", session.resource_size());
    println!("Workers:    {}", session.worker_count());
    println!("Chunk size: {} bytes", session.chunk_size());
    println!("{:<6} {}", "CHUNK", "RANGE");
    for task in session.tasks() {
        println!("{:<6} {}", task.chunk_index(), task.range());
    }
    Ok(())
}
