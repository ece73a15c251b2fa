use std::path::PathBuf;

use chrono::Utc;
use clap::{Parser, Subcommand};
use livedash::{
    Command, DashConfig, Dashboard, DashboardBuilder, FeedLoader, ScrapeOutcome, Scraper,
    store::FileStore,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;
use url::Url;

#[derive(Parser)]
#[command(name = "livedash", version, about = "Live news and UF/m² dashboard")]
struct Cli {
    /// JSON config file; keys it omits keep their defaults.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Site the feeds are served from.
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Where the rendered page is written.
    #[arg(long, global = true)]
    output: Option<PathBuf>,

    /// Directory for persisted pins, edits and saved news.
    #[arg(long, global = true)]
    store_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Keep the page up to date; reads commands (`select 2`, `pin 0`, `save`, ...) from stdin.
    Run,
    /// Load both feeds once, write the page, and exit.
    Render,
    /// Scrape the headlines page into a news.json file.
    Scrape {
        /// Output file.
        #[arg(long, default_value = "data/news.json")]
        out: PathBuf,
        /// Page to scrape instead of the default headlines listing.
        #[arg(long)]
        url: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut cfg = match &cli.config {
        Some(path) => DashConfig::load_from_file(path)?,
        None => DashConfig::default(),
    };
    if let Some(base) = cli.base_url {
        cfg.base_url = base;
    }
    if let Some(output) = cli.output {
        cfg.output = output;
    }
    if let Some(dir) = cli.store_dir {
        cfg.store_dir = dir;
    }

    match cli.command {
        Cmd::Run => run(&cfg).await,
        Cmd::Render => render_once(&cfg).await,
        Cmd::Scrape { out, url } => scrape(out, url).await,
    }
}

async fn run(cfg: &DashConfig) -> Result<(), Box<dyn std::error::Error>> {
    let loader = FeedLoader::new(&cfg.client()?);
    let (handle, _pages) = DashboardBuilder::new(&loader, FileStore::new(&cfg.store_dir))
        .config(cfg.runtime())
        .start()?;
    tracing::info!(output = %cfg.output.display(), "dashboard running; ctrl-c to stop");

    let commands = handle.commands();
    let input = tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            if line.trim().is_empty() {
                continue;
            }
            match line.parse::<Command>() {
                Ok(cmd) => {
                    if commands.send(cmd).await.is_err() {
                        break;
                    }
                }
                Err(e) => eprintln!("{e}"),
            }
        }
    });

    tokio::signal::ctrl_c().await?;
    tracing::info!("shutting down");
    input.abort();
    handle.stop().await;
    Ok(())
}

async fn render_once(cfg: &DashConfig) -> Result<(), Box<dyn std::error::Error>> {
    let loader = FeedLoader::new(&cfg.client()?);
    let mut dashboard = Dashboard::new(FileStore::new(&cfg.store_dir));
    dashboard.refresh(&loader).await;

    let html = dashboard.render(Utc::now())?;
    if let Some(parent) = cfg.output.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&cfg.output, html)?;
    println!("wrote {}", cfg.output.display());
    Ok(())
}

async fn scrape(out: PathBuf, url: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let mut builder = Scraper::builder(out);
    if let Some(url) = url {
        builder = builder.page_url(Url::parse(&url)?);
    }
    let scraper = builder.build()?;

    match scraper.run().await? {
        ScrapeOutcome::Updated { items } => {
            println!("OK: saved {items} headlines to {}", scraper.out().display());
        }
        ScrapeOutcome::KeptPrevious { error } => {
            println!("WARN: fetch failed, kept {}. Error: {error}", scraper.out().display());
        }
        ScrapeOutcome::CreatedEmpty { error } => {
            println!(
                "WARN: no previous {}; wrote an empty feed. Error: {error}",
                scraper.out().display()
            );
        }
    }
    Ok(())
}
