//! Demo application driving a probabilistic counter against an exact one.
//!
//! Run with:
//! ```bash
//! cargo run --example demo --features demo -- --help
//! ```

use clap::{Parser, ValueEnum};
use std::sync::Arc;
use std::thread;
use stocastico::counters::exact::Exact;
use stocastico::counters::scalable::Scalable;
use stocastico::counters::Observable;
use stocastico::observers::json::JsonObserver;
use stocastico::observers::prometheus::PrometheusObserver;
use stocastico::observers::table::{TableObserver, TableStyle};

/// Output format for counter serialization.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Pretty ASCII table
    Table,
    /// Compact table with multiple columns
    Compact,
    /// JSON format
    Json,
    /// Prometheus exposition format
    Prometheus,
}

/// Table style selection.
#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum StyleChoice {
    Ascii,
    #[default]
    Rounded,
    Sharp,
    Modern,
    Markdown,
    Dots,
    Blank,
}

impl From<StyleChoice> for TableStyle {
    fn from(choice: StyleChoice) -> Self {
        match choice {
            StyleChoice::Ascii => TableStyle::Ascii,
            StyleChoice::Rounded => TableStyle::Rounded,
            StyleChoice::Sharp => TableStyle::Sharp,
            StyleChoice::Modern => TableStyle::Modern,
            StyleChoice::Markdown => TableStyle::Markdown,
            StyleChoice::Dots => TableStyle::Dots,
            StyleChoice::Blank => TableStyle::Blank,
        }
    }
}

/// Demo for stocastico - scalable probabilistic statistics counters.
///
/// Drives a probabilistic counter and an exact counter with the same number
/// of increments from N threads, then renders both so the projection can be
/// compared against the truth.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    format: OutputFormat,

    /// Table style (for table/compact formats)
    #[arg(short, long, value_enum, default_value = "rounded")]
    style: StyleChoice,

    /// Number of columns (for compact format)
    #[arg(short, long, default_value = "2")]
    columns: usize,

    /// Relative standard deviation of the probabilistic counter
    #[arg(short, long, default_value = "0.01")]
    rstdv: f64,

    /// Number of incrementing threads
    #[arg(short, long, default_value = "4")]
    threads: u32,

    /// Number of increments per thread
    #[arg(short, long, default_value = "1000000")]
    iterations: u64,

    /// Pretty print JSON output
    #[arg(long)]
    pretty: bool,

    /// Include timestamp in JSON output
    #[arg(long)]
    timestamp: bool,

    /// Prometheus metric namespace (prefix)
    #[arg(long, default_value = "demo")]
    namespace: String,

    /// Prometheus instance label
    #[arg(long)]
    instance: Option<String>,
}

/// Xorshift step with the shift constants from the scalable statistics
/// counters paper.
#[inline]
fn xorshift(r: &mut u32) -> u32 {
    *r ^= *r << 6;
    *r ^= *r >> 21;
    *r ^= *r << 7;
    *r
}

fn main() {
    let args = Args::parse();

    let estimated = Arc::new(
        Scalable::try_new(args.rstdv)
            .unwrap_or_else(|err| {
                eprintln!("invalid --rstdv: {}", err);
                std::process::exit(2);
            })
            .with_name("requests_estimated"),
    );
    let exact = Arc::new(Exact::new().with_name("requests_exact"));

    let mut handles = vec![];
    for t in 0..args.threads {
        let estimated = Arc::clone(&estimated);
        let exact = Arc::clone(&exact);
        let iterations = args.iterations;
        handles.push(thread::spawn(move || {
            let mut r = 0x9E37_79B9u32 ^ (t + 1);
            for _ in 0..iterations {
                estimated.inc(xorshift(&mut r));
                exact.inc();
            }
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }

    let counters: Vec<&dyn Observable> = vec![estimated.as_ref(), exact.as_ref()];

    match args.format {
        OutputFormat::Table => {
            let observer = TableObserver::new()
                .with_style(args.style.into())
                .with_title(format!(
                    "rstdv={} threads={} iterations={}",
                    args.rstdv, args.threads, args.iterations
                ));
            println!("{}", observer.render(counters.into_iter()));
        }
        OutputFormat::Compact => {
            let observer = TableObserver::new()
                .with_style(args.style.into())
                .compact(true)
                .columns(args.columns);
            println!("{}", observer.render(counters.into_iter()));
        }
        OutputFormat::Json => {
            let observer = JsonObserver::new()
                .pretty(args.pretty)
                .include_timestamp(args.timestamp);
            match observer.to_json(counters.into_iter()) {
                Ok(json) => println!("{}", json),
                Err(err) => {
                    eprintln!("json export failed: {}", err);
                    std::process::exit(1);
                }
            }
        }
        OutputFormat::Prometheus => {
            let mut observer = PrometheusObserver::new().with_namespace(&args.namespace);
            if let Some(instance) = &args.instance {
                observer = observer.with_const_label("instance", instance);
            }
            match observer.render(counters.into_iter()) {
                Ok(output) => print!("{}", output),
                Err(err) => {
                    eprintln!("prometheus export failed: {}", err);
                    std::process::exit(1);
                }
            }
        }
    }

    let total = args.threads as u64 * args.iterations;
    let projected = estimated.value();
    let drift = (projected as f64 - total as f64) / total as f64;
    eprintln!(
        "true count {} projected {} drift {:+.4}% (acceptance probability now {:.3e})",
        total,
        projected,
        drift * 100.0,
        estimated.acceptance_probability()
    );
}
