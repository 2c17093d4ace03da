//! Extracts a record from a saved submission page.
//!
//! Usage: `extract_html <page-url> [file]`. The HTML is read from `file`, or
//! from stdin when no file is given. The record is printed as JSON.
//! Set `RUST_LOG=leetcode_tracker=debug` to trace the strategy chains.

use std::sync::Arc;

use leetcode_tracker::{Extractor, ExtractorConfig, StaticPage};
use tokio::io::{AsyncReadExt, stdin};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: extract_html <page-url> [file]";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let Some(url) = args.next() else {
        eprintln!("{USAGE}");
        std::process::exit(2);
    };
    let html = match args.next() {
        Some(path) => tokio::fs::read_to_string(path).await?,
        None => {
            let mut buf = String::new();
            stdin().read_to_string(&mut buf).await?;
            buf
        }
    };

    // A saved page never hydrates further.
    let config = ExtractorConfig::builder().no_delays().build();
    let page = StaticPage::new(&url, html)?;
    let extractor = Extractor::builder(Arc::new(page)).config(config).build();

    let record = extractor.try_extract().await?;
    let json = serde_json::to_string_pretty(&record)?;
    println!("{json}");
    Ok(())
}
