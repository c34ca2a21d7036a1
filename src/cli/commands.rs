use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use url::Url;

use crate::app::{AppContext, Result};
use crate::browser::ChromeLauncher;
use crate::cli::CrawlOptions;
use crate::crawler::{CrawlerConfig, Crawler};
use crate::domain::CrawlReport;
use crate::unpacker;

/// Apply command-line overrides on top of the configured crawler settings
pub fn crawler_config(base: &CrawlerConfig, options: &CrawlOptions) -> CrawlerConfig {
    let mut config = base.clone();
    if let Some(workers) = options.workers {
        config.workers = workers;
    }
    if let Some(target) = options.target {
        config.per_worker_target = target;
    }
    if let Some(ref marker) = options.marker {
        config.link_marker = marker.clone();
    }
    if options.global_target.is_some() {
        config.global_target = options.global_target;
    }
    if options.headed {
        config.headless = false;
    }
    config
}

pub async fn crawl(ctx: &AppContext, url: &str, options: &CrawlOptions) -> Result<()> {
    let seed = Url::parse(url)?;
    let config = crawler_config(&ctx.config.crawler, options);

    let launcher = Arc::new(ChromeLauncher::launch(config.clone()).await?);
    let crawler = Crawler::new(launcher.clone(), ctx.query.clone(), config);
    let result = crawler.crawl_with_defaults(seed.as_str()).await;

    drop(crawler);
    match Arc::try_unwrap(launcher) {
        Ok(launcher) => launcher.shutdown().await,
        Err(_) => tracing::warn!("Browser still in use, leaving it to exit on drop"),
    }

    let report = result?;

    if let Some(ref path) = options.output {
        write_links(path, &report)?;
        println!("Wrote {} links to {}", report.links.len(), path.display());
    }

    if options.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for link in &report.links {
            println!("{}", link);
        }
        println!(
            "Crawl complete: {} unique links from {} workers ({} failed)",
            report.links.len(),
            report.workers.len(),
            report.failed_workers()
        );
    }

    Ok(())
}

fn write_links(path: &Path, report: &CrawlReport) -> Result<()> {
    let mut content = report.links.join("\n");
    if !content.is_empty() {
        content.push('\n');
    }
    std::fs::write(path, content)?;
    Ok(())
}

pub async fn media(ctx: &AppContext, url: &str, json: bool) -> Result<()> {
    Url::parse(url)?;
    let urls = ctx.media.scrape(ctx.fetcher.as_ref(), url).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&urls)?);
    } else if urls.is_empty() {
        println!("No media URLs found");
    } else {
        println!("Found video URLs:");
        for url in urls {
            println!("{}", url);
        }
    }

    Ok(())
}

pub fn unpack(path: Option<&Path>, raw: bool) -> Result<()> {
    let text = match path {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut text = String::new();
            std::io::stdin().read_to_string(&mut text)?;
            text
        }
    };

    if raw {
        println!("{}", unpacker::unpack(&text)?);
        return Ok(());
    }

    let urls = unpacker::decode(&text);
    if urls.is_empty() {
        println!("No media URLs found");
    }
    for url in urls {
        println!("{}", url);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::collections::HashSet;

    #[test]
    fn test_crawler_config_overrides() {
        let options = CrawlOptions {
            workers: Some(6),
            marker: Some("/p/".into()),
            headed: true,
            ..Default::default()
        };

        let config = crawler_config(&CrawlerConfig::default(), &options);
        assert_eq!(config.workers, 6);
        assert_eq!(config.link_marker, "/p/");
        assert!(!config.headless);
        // Untouched values keep their configured defaults
        assert_eq!(config.per_worker_target, 50);
        assert!(config.global_target.is_none());
    }

    #[test]
    fn test_write_links() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("urls.txt");
        let links: HashSet<String> = ["/a/2", "/a/1"].into_iter().map(String::from).collect();
        let report = CrawlReport::new("https://blog.example.com", Utc::now(), Vec::new(), links);

        write_links(&path, &report).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "/a/1\n/a/2\n");
    }

    #[test]
    fn test_unpack_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("player.js");
        std::fs::write(&path, "}('0.m3u8',36,1,'https://v.io/x'.split('|')))").unwrap();

        assert!(unpack(Some(&path), false).is_ok());
        assert!(unpack(Some(&path), true).is_ok());
    }

    #[test]
    fn test_unpack_raw_reports_malformed_input() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plain.js");
        std::fs::write(&path, "console.log('hi')").unwrap();

        assert!(unpack(Some(&path), true).is_err());
        assert!(unpack(Some(&path), false).is_ok());
    }
}
