mod config;
mod fetch;
mod geo;
mod links;
mod parser;
mod record;
mod report;
mod score;

use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use tracing::warn;

use record::Record;

#[derive(Parser)]
#[command(name = "aparts-scan", about = "Sofia apartment listings scanner and ranker")]
struct Cli {
    /// Enable verbose mode (use -vv for max verbosity)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch listings, extract their attributes, score and render a report
    Scan(ScanArgs),
    /// Discover listing links from search-result pages and print them
    Links {
        /// File with search-result page links
        pages: String,
        /// Take only the first N urls from the file
        #[arg(short = 'n', long)]
        head: Option<usize>,
    },
}

#[derive(Args)]
struct ScanArgs {
    /// File with apartment listing links, one per line
    #[arg(short, long)]
    links: Option<String>,
    /// File with search-result page links to discover listings from
    #[arg(short, long)]
    pages: Option<String>,
    /// Write the report to the given HTML file (default: stdout)
    #[arg(short = 'w', long)]
    html: Option<String>,
    /// Analyze distance to the given location
    #[arg(short, long)]
    distance: Option<String>,
    /// Configuration file with the [WEIGHTS] section
    #[arg(short, long, default_value = "config.txt")]
    config: String,
    /// Take only the first N urls from each input file
    #[arg(short = 'n', long)]
    head: Option<usize>,
    /// Clear cached page fetches first
    #[arg(short = 'r', long)]
    clear_cache: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = match cli.verbose {
        0 => "error",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_level.into()),
        )
        .init();

    let t0 = Instant::now();
    let result = match cli.command {
        Commands::Scan(args) => run_scan(args).await,
        Commands::Links { pages, head } => {
            let client = fetch::client()?;
            let found = links::discover(&client, &pages, head).await?;
            for link in &found {
                println!("{}", link);
            }
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        eprintln!("\nDone in {}", format_duration(elapsed));
    }

    result
}

async fn run_scan(args: ScanArgs) -> Result<()> {
    if args.clear_cache {
        fetch::clear_cache()?;
    }
    fetch::init_cache()?;

    let weights = config::Weights::load(&args.config)?;
    let client = fetch::client()?;

    let mut urls = Vec::new();
    if let Some(path) = &args.links {
        urls.extend(links::from_file(path, args.head)?);
    }
    if let Some(path) = &args.pages {
        urls.extend(links::discover(&client, path, args.head).await?);
    }
    if urls.is_empty() {
        println!("No listing links. Pass --links and/or --pages.");
        return Ok(());
    }

    // Phase 1: fetch every listing (cache-backed)
    let pb = ProgressBar::new(urls.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40} {pos}/{len} ({per_sec}, eta {eta})")?
            .progress_chars("=> "),
    );

    let mut documents = Vec::with_capacity(urls.len());
    for (i, url) in urls.iter().enumerate() {
        let body = fetch::fetch_cached(&client, url).await?;
        documents.push((i + 1, url.clone(), body));
        pb.inc(1);
    }
    pb.finish_and_clear();

    // Phase 2: extract + normalize (pure, parallel across documents)
    let mut records: Vec<Record> = documents
        .par_iter()
        .map(|(id, url, body)| {
            let mut rec = Record::new(*id, url.clone());
            parser::scan_document(&mut rec, body.split(|b| *b == b'\n'));
            rec
        })
        .collect();

    // Phase 3: distance to the reference location (optional)
    if let Some(location) = &args.distance {
        match geo::geocode(&client, location).await? {
            Some(reference) => {
                for rec in &mut records {
                    geo::init_distance(&client, rec, reference, location).await;
                }
            }
            None => warn!("can't geocode '{}', distance calculation disabled", location),
        }
    }

    // Phase 4: score and rank
    for rec in &mut records {
        rec.score = score::score(rec, &weights);
    }
    score::rank(&mut records);

    // Phase 5: render
    let html = report::render(&records);
    match &args.html {
        Some(path) => {
            std::fs::write(path, html).with_context(|| format!("can't write report {}", path))?;
            println!("Report with {} listings written to {}", records.len(), path);
        }
        None => println!("{}", html),
    }

    Ok(())
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
