mod cli;
mod config;
mod error;
mod weights;

use clap::Parser;
use cli::{Cli, Commands};
use config::Config;
use error::Result;
use weights::{FetchOutcome, WeightsFetcher, WeightsManifest};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;

    match cli.command {
        Commands::Fetch { weights } => {
            let fetcher = WeightsFetcher::new(config)?;

            for id in &weights {
                match fetcher.fetch(id)? {
                    FetchOutcome::Skipped { path } => {
                        println!("✓ {} already present", id);
                        println!("  Path: {}", path.display());
                    }
                    FetchOutcome::Fetched(report) => {
                        println!("✓ Downloaded {} in {:.2}s", id, report.elapsed.as_secs_f64());
                        println!("  Path: {}", report.path.display());
                        if let Some(bytes) = report.bytes {
                            println!("  Size: {:.2}MB", bytes as f64 / (1024.0 * 1024.0));
                        }
                        if report.extracted {
                            println!("  Extracted: yes");
                        }
                    }
                }
            }
        }

        Commands::List { weight_type, json } => {
            let manifest = WeightsManifest::load(&config)?;

            let entries = match &weight_type {
                Some(kind) => manifest.entries_by_type(kind),
                None => manifest.entries(),
            };

            if json {
                let items: Vec<serde_json::Value> = entries
                    .iter()
                    .map(|(id, entry)| {
                        serde_json::json!({
                            "id": id,
                            "url": entry.url,
                            "dest": entry.dest,
                            "non_commercial": entry.non_commercial,
                        })
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&items).unwrap());
            } else if entries.is_empty() {
                println!("No weights found in the manifest.");
                println!("Manifest: {}", config.manifest_path.display());
            } else {
                println!("Available weights:\n");
                for (id, entry) in entries {
                    println!("  {}", id);
                    println!("    URL: {}", entry.url);
                    println!("    Destination: {}", entry.dest);
                    if entry.non_commercial {
                        println!("    License: non-commercial use only");
                    }
                    println!();
                }
            }
        }
    }

    Ok(())
}
