//--------------------------------------------------------------------------------------------------
// MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// A small CLI front-end: reads a file of newline-delimited JSON quotes,
// feeds each one through a fresh `OrderBook` in submission order, and
// prints every trade as it is produced plus a final depth/tape summary.
// Not part of the engine's public contract — a demonstration harness for
// exercising it end to end.
//--------------------------------------------------------------------------------------------------

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use lob_engine::{Config, OrderBook, Quote};

#[derive(Debug, Parser)]
#[command(name = "lob-replay", about = "Replay a file of JSON quotes through the matching engine")]
struct Args {
    /// Path to a file containing one JSON-encoded quote per line.
    quotes_file: PathBuf,

    /// Minimum price increment; incoming prices are rounded to this.
    #[arg(long, default_value = "0.0001")]
    tick_size: rust_decimal::Decimal,

    /// Print each trade as it is produced instead of only the summary.
    #[arg(long)]
    verbose: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let mut book = OrderBook::new(Config::new(args.tick_size));

    let file = File::open(&args.quotes_file)
        .with_context(|| format!("opening quotes file {}", args.quotes_file.display()))?;
    let reader = BufReader::new(file);

    let mut submitted = 0usize;
    for (lineno, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("reading line {}", lineno + 1))?;
        if line.trim().is_empty() {
            continue;
        }
        let quote: Quote = serde_json::from_str(&line)
            .with_context(|| format!("parsing quote on line {}", lineno + 1))?;

        match book.submit(quote) {
            Ok((trades, resting)) => {
                submitted += 1;
                if args.verbose {
                    for trade in &trades {
                        println!(
                            "trade price={} quantity={} maker={}",
                            trade.price, trade.quantity, trade.maker_order_id
                        );
                    }
                    if let Some(qty) = resting {
                        println!("resting quantity={qty}");
                    }
                }
            }
            Err(err) => {
                eprintln!("line {}: rejected quote: {err}", lineno + 1);
            }
        }
    }

    println!("quotes submitted: {submitted}");
    println!("trades executed:  {}", book.tape().count());
    println!(
        "best bid/ask:      {:?} / {:?}",
        book.best_bid(),
        book.best_ask()
    );
    println!(
        "depth (bid/ask):   {} / {}",
        book.depth(lob_engine::Side::Bid),
        book.depth(lob_engine::Side::Ask)
    );

    Ok(())
}
