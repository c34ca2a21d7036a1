pub mod commands;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "eddy")]
#[command(about = "Scroll-crawl link listings and unpack hidden media URLs", long_about = None)]
pub struct Cli {
    /// Config file to use instead of ~/.config/eddy/config.toml
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Crawl a lazily loaded listing page with parallel browser workers
    Crawl {
        /// Seed URL of the listing page
        url: String,

        #[command(flatten)]
        options: CrawlOptions,
    },
    /// Find .m3u8 URLs hidden in packed scripts on a page
    Media {
        /// URL of the video page
        url: String,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Unpack a packed script from a file or stdin
    Unpack {
        /// File holding the script (reads stdin when omitted)
        path: Option<PathBuf>,

        /// Print the whole unpacked payload instead of media URLs
        #[arg(long)]
        raw: bool,
    },
}

/// Overrides for the `[crawler]` config section
#[derive(Args, Debug, Default, Clone)]
pub struct CrawlOptions {
    /// Number of parallel workers
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Distinct links each worker collects before stopping
    #[arg(short, long)]
    pub target: Option<usize>,

    /// Substring an anchor's href must contain
    #[arg(short, long)]
    pub marker: Option<String>,

    /// Stop all workers once this many unique links are found
    #[arg(long)]
    pub global_target: Option<usize>,

    /// Show the browser window
    #[arg(long)]
    pub headed: bool,

    /// Write the links to this file, one per line
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Print the full crawl report as JSON
    #[arg(long)]
    pub json: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_crawl_with_overrides() {
        let cli = Cli::parse_from([
            "eddy",
            "crawl",
            "https://blog.example.com/c/1",
            "-w",
            "4",
            "--target",
            "80",
            "--marker",
            "/post/",
            "--json",
        ]);

        match cli.command {
            Commands::Crawl { url, options } => {
                assert_eq!(url, "https://blog.example.com/c/1");
                assert_eq!(options.workers, Some(4));
                assert_eq!(options.target, Some(80));
                assert_eq!(options.marker.as_deref(), Some("/post/"));
                assert!(options.json);
                assert!(!options.headed);
            }
            _ => panic!("expected crawl"),
        }
    }

    #[test]
    fn test_parse_unpack_from_stdin() {
        let cli = Cli::parse_from(["eddy", "unpack", "--raw"]);
        match cli.command {
            Commands::Unpack { path, raw } => {
                assert!(path.is_none());
                assert!(raw);
            }
            _ => panic!("expected unpack"),
        }
    }

    #[test]
    fn test_global_config_flag() {
        let cli = Cli::parse_from(["eddy", "media", "https://v.example.com/1", "-c", "eddy.toml"]);
        assert_eq!(cli.config, Some(PathBuf::from("eddy.toml")));
    }
}
