use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use configuration::SimulationDefaults;
use core_types::{Market, PairKey, Tick};
use depth::{Depth, Fill, Limits, Reach};
use portfolio::Account;
use pricing::PriceBoard;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// The main entry point for the Fathom depth simulator.
fn main() {
    // Route diagnostics through the standard RUST_LOG filter.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Parse command-line arguments
    let cli = Cli::parse();

    // Execute the appropriate command
    let result = match cli.command {
        Commands::Simulate(args) => handle_simulate(args),
        Commands::Resolve(args) => handle_resolve(args),
        Commands::Value(args) => handle_value(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Market-depth execution simulation and price discovery over snapshot files.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate a market order against an order book snapshot.
    Simulate(SimulateArgs),
    /// Resolve an asset's USD price from a ticker snapshot.
    Resolve(ResolveArgs),
    /// Value an account snapshot in USD.
    Value(ValueArgs),
}

#[derive(Clone, Copy, ValueEnum)]
enum Side {
    Buy,
    Sell,
}

#[derive(Parser)]
struct SimulateArgs {
    /// Path to a JSON depth snapshot ({"time", "asks", "bids"}).
    #[arg(long)]
    depth: PathBuf,

    /// Order direction: buy spends a quote budget, sell disposes a base quantity.
    #[arg(long, value_enum)]
    side: Side,

    /// Quote budget (buy) or base quantity (sell).
    #[arg(long)]
    amount: Decimal,

    /// Maximum fractional price deviation from the best level (e.g. 0.1).
    #[arg(long)]
    tolerance: Option<Decimal>,

    /// Decimal places the fill amount is truncated to.
    #[arg(long)]
    precision: Option<u32>,

    /// Minimum tradable increment; the fill is floored to a multiple of it.
    #[arg(long)]
    lot: Option<Decimal>,

    /// Optional settings file supplying defaults for the limits above.
    #[arg(long)]
    config: Option<String>,
}

#[derive(Parser)]
struct ResolveArgs {
    /// Path to a JSON ticker snapshot keyed by "BASE/QUOTE.market".
    #[arg(long)]
    ticks: PathBuf,

    /// The asset symbol to price (e.g. "BTC").
    #[arg(long)]
    asset: String,

    /// The market segment to read quotes from.
    #[arg(long, default_value = "spot")]
    market: Market,
}

#[derive(Parser)]
struct ValueArgs {
    /// Path to a JSON account snapshot ({"spot", "margin"} ledgers).
    #[arg(long)]
    account: PathBuf,

    /// Path to a JSON ticker snapshot keyed by "BASE/QUOTE.market".
    #[arg(long)]
    ticks: PathBuf,
}

// ==============================================================================
// Command Handlers
// ==============================================================================

/// Runs one simulated market order and prints the fill report.
fn handle_simulate(args: SimulateArgs) -> anyhow::Result<()> {
    let depth: Depth = read_json(&args.depth)?;

    // Explicit flags win; a settings file fills in whatever they leave out.
    let defaults = match &args.config {
        Some(name) => {
            configuration::load_settings_from(name)
                .with_context(|| format!("loading settings from {name}"))?
                .simulation
        }
        None => SimulationDefaults::default(),
    };
    let limits = Limits {
        tolerance: args.tolerance.or(defaults.tolerance),
        precision: args.precision.or(defaults.quantity_precision),
        lot: args.lot.or(defaults.lot_step),
    };

    let fill = match args.side {
        Side::Buy => depth.market_buy_with(args.amount, &limits)?,
        Side::Sell => depth.market_sell_with(args.amount, &limits)?,
    };

    match args.side {
        Side::Buy => println!("Market buy spending {} (quote):", args.amount),
        Side::Sell => println!("Market sell of {} (base):", args.amount),
    }
    print_fill(&fill);
    Ok(())
}

fn print_fill(fill: &Fill) {
    println!("  base filled:  {}", fill.base_filled);
    println!("  quote filled: {}", fill.quote_filled);
    println!("  best price:   {}", fill.best_price);
    match fill.reach {
        Reach::Level(price) => println!("  reached:      {price}"),
        Reach::Pierced => println!("  reached:      PIERCED (order exceeds visible depth)"),
    }
}

/// Resolves one asset's USD price from a ticker snapshot.
fn handle_resolve(args: ResolveArgs) -> anyhow::Result<()> {
    let ticks: HashMap<PairKey, Tick> = read_json(&args.ticks)?;
    let board = PriceBoard::from_ticks(&ticks);

    let price = board.resolve_usd(&args.asset, args.market)?;
    println!("{} = {} USD ({})", args.asset.to_uppercase(), price, args.market);
    Ok(())
}

/// Values every balance of an account snapshot in USD.
fn handle_value(args: ValueArgs) -> anyhow::Result<()> {
    let account: Account = read_json(&args.account)?;
    let ticks: HashMap<PairKey, Tick> = read_json(&args.ticks)?;
    let board = PriceBoard::from_ticks(&ticks);

    let total = account.total_in_usd(&board)?;
    println!("Account value in USD:");
    println!("  free:     {}", total.free);
    println!("  locked:   {}", total.locked);
    println!("  borrowed: {}", total.borrowed);
    println!("  interest: {}", total.interest);
    println!("  net:      {}", total.net());
    Ok(())
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))
}
