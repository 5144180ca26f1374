use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use civic_ledger::AppConfig;

#[derive(Parser, Debug)]
#[command(
    name = "civic-ledger",
    about = "Look up the elected officials for an address and attach campaign-finance data",
    version
)]
struct Cli {
    /// Address to look up (prompted for when omitted)
    #[arg(long)]
    address: Option<String>,

    /// Candidate identifier table (CSV)
    #[arg(long)]
    candidates: Option<PathBuf>,

    /// Directory holding the cache files
    #[arg(long)]
    cache_dir: Option<PathBuf>,

    /// Where to write the representative tree JSON
    #[arg(long)]
    output: Option<PathBuf>,

    /// Skip printing the federal summary
    #[arg(long)]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load().context("Invalid configuration")?;
    if let Some(path) = cli.candidates {
        config.candidates_path = path;
    }
    if let Some(dir) = cli.cache_dir {
        config.cache_dir = dir;
    }
    if let Some(path) = cli.output {
        config.output_path = path;
    }

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(config.log_level.as_str()))
        .init();

    let address = match cli.address {
        Some(address) => address,
        None => prompt_address()?,
    };
    if address.trim().is_empty() {
        eprintln!("❌ No address given");
        std::process::exit(1);
    }

    run(&config, &address, cli.quiet)
}

fn prompt_address() -> Result<String> {
    print!("please submit an address: ");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read address from stdin")?;
    Ok(line.trim().to_string())
}

#[cfg(feature = "http")]
fn run(config: &AppConfig, address: &str, quiet: bool) -> Result<()> {
    use civic_ledger::sources::{CivicInfoClient, OpenSecretsClient};
    use civic_ledger::{write_tree, CandidateTable, Ledger, LedgerError, Stores};

    let civic_key = config
        .civic_api_key
        .as_deref()
        .context("CIVIC_API_KEY is not set")?;
    let finance_key = config
        .finance_api_key
        .as_deref()
        .context("FINANCE_API_KEY is not set")?;

    let candidates = CandidateTable::load_csv(&config.candidates_path)?;
    println!("✓ Loaded {} candidate records", candidates.len());

    let mut stores = Stores::load(config);

    let lookup = CivicInfoClient::new(&config.civic_base_url, civic_key)?;
    let finance = OpenSecretsClient::new(&config.finance_base_url, finance_key)?;
    let ledger = Ledger::new(&lookup, &finance, &config.fallback_cycle);

    let (tree, summary) = match ledger.run(address, &candidates, &mut stores) {
        Ok(result) => result,
        Err(e @ LedgerError::LookupUnavailable(_)) => {
            eprintln!("❌ {}", e);
            eprintln!("   Check the address and your CIVIC_API_KEY, then try again.");
            std::process::exit(1);
        }
        Err(e) => return Err(e.into()),
    };

    write_tree(&config.output_path, &tree)?;
    println!(
        "✓ Tree written to {} ({} officials, {} tracked federal)",
        config.output_path.display(),
        summary.classified,
        summary.promotion.tracked
    );
    if summary.unclassified > 0 {
        println!(
            "⚠️  {} officials had an unrecognised level and were left out",
            summary.unclassified
        );
    }

    if !quiet {
        for rep in &tree.federal {
            println!("\n{}", rep.full_info());
        }
    }

    Ok(())
}

#[cfg(not(feature = "http"))]
fn run(_config: &AppConfig, _address: &str, _quiet: bool) -> Result<()> {
    eprintln!("❌ HTTP lookups not available!");
    eprintln!("   Rebuild with: cargo build --features http");
    std::process::exit(1);
}
