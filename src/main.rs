//! Site-Harvest main entry point
//!
//! This is the command-line interface for crawling a site, importing its
//! pages and blog posts as markdown, and reading the result back.

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use site_harvest::config::{load_config_with_hash, Config};
use site_harvest::content::ContentLibrary;
use site_harvest::crawler::run_crawl;
use site_harvest::import::{run_blog_import, run_pages_import};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Site-Harvest: turns a live website into a local markdown corpus
///
/// Crawls every same-origin HTML route reachable from the configured seeds,
/// then imports pages and blog posts as front-matter markdown documents with
/// sorted JSON indexes.
#[derive(Parser, Debug)]
#[command(name = "site-harvest")]
#[command(version = "1.0.0")]
#[command(about = "Mirror a website into versioned markdown", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate config and show what would be crawled without crawling
    Check,
    /// Discover every HTML route and write routes.json
    Crawl,
    /// Import the crawled pages
    ImportPages,
    /// Import blog posts from the feed, or from routes.json as a fallback
    ImportBlog,
    /// Crawl, then import pages and blog posts
    Sync,
    /// List the imported blog posts
    Posts,
    /// Print one imported blog post
    Post { slug: String },
    /// List the imported pages
    Pages,
    /// Print one imported page
    Page { slug: String },
    /// Print the page serving as the site's home
    Home,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load configuration {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    let library = ContentLibrary::new(config.output.clone());

    match cli.command {
        Command::Check => handle_check(&config),
        Command::Crawl => {
            run_crawl(&config).await.context("Crawl failed")?;
        }
        Command::ImportPages => {
            run_pages_import(&config)
                .await
                .context("Pages import failed")?;
        }
        Command::ImportBlog => {
            run_blog_import(&config).await.context("Blog import failed")?;
        }
        Command::Sync => handle_sync(&config).await?,
        Command::Posts => print_json(&library.blog_index()?)?,
        Command::Post { slug } => match library.blog_post(&slug)? {
            Some(post) => print_json(&post)?,
            None => anyhow::bail!("No blog post named '{}'", slug),
        },
        Command::Pages => print_json(&library.pages_index()?)?,
        Command::Page { slug } => match library.page(&slug)? {
            Some(page) => print_json(&page)?,
            None => anyhow::bail!("No page named '{}'", slug),
        },
        Command::Home => match library.home_page()? {
            Some(page) => print_json(&page)?,
            None => anyhow::bail!("No home page has been imported"),
        },
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("site_harvest=info,warn"),
            1 => EnvFilter::new("site_harvest=debug,info"),
            2 => EnvFilter::new("site_harvest=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Prints what a run would do with this configuration
fn handle_check(config: &Config) {
    println!("=== Site-Harvest Check ===\n");

    println!("Site:");
    println!("  Origin: {}", config.site.origin);
    println!("  Feed: {}{}", config.site.origin, config.site.feed_path);
    match &config.site.assessment_path {
        Some(path) => println!("  Assessment path: {}", path),
        None => println!("  Assessment path: (none)"),
    }

    println!("\nSeeds ({}):", config.site.seeds.len());
    for seed in &config.site.seeds {
        println!("  - {}", seed);
    }

    println!("\nClient headers:");
    for component in ["site-crawler", "pages-importer", "blog-importer"] {
        println!("  {}", config.user_agent.user_agent(component));
    }

    println!("\nOutput:");
    println!("  Routes: {}", config.output.routes_file().display());
    println!("  Pages: {}", config.output.pages_dir().display());
    println!("  Pages index: {}", config.output.pages_index_file().display());
    println!("  Blog: {}", config.output.blog_dir().display());
    println!("  Blog index: {}", config.output.blog_index_file().display());

    println!("\n✓ Configuration is valid");
    println!(
        "✓ Would start crawling with {} seed URLs",
        config.site.seeds.len()
    );
}

/// Runs the whole pipeline in order
async fn handle_sync(config: &Config) -> anyhow::Result<()> {
    let manifest = run_crawl(config).await.context("Crawl failed")?;
    tracing::info!("Crawl produced {} routes", manifest.routes.len());

    let pages = run_pages_import(config)
        .await
        .context("Pages import failed")?;
    let posts = run_blog_import(config).await.context("Blog import failed")?;

    tracing::info!(
        "Sync complete: {} pages, {} posts, {} failures",
        pages.imported,
        posts.imported,
        pages.failed() + posts.failed()
    );
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
