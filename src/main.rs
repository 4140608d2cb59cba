use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;

use lpfsim::config::{AppConfig, CutoffFrequency};
use lpfsim::data::{DataSource, Signal};
use lpfsim::filter::{FilterCache, FilterParams};
use lpfsim::output::{OutputFormat, RunSummary, create_formatter, write_trace};

#[derive(Parser, Debug)]
#[command(name = "lpfsim")]
#[command(about = "Run sampled voltage data through a single-pole low-pass stage", long_about = None)]
struct Args {
    /// CSV file with `Time (s)` and `Channel 1 (V)` columns
    #[arg(short = 'i', long, conflicts_with = "url")]
    input: Option<PathBuf>,

    /// Fetch the CSV from a URL instead (default: the bundled sample data)
    #[arg(short = 'u', long)]
    url: Option<String>,

    /// Cutoff frequency (e.g., "25", "25rad/s", "4hz")
    #[arg(short = 'c', long, default_value = "25")]
    cutoff: CutoffFrequency,

    /// Feedback resistance in ohms
    #[arg(long)]
    rf: Option<f64>,

    /// Input resistance in ohms
    #[arg(long)]
    ri: Option<f64>,

    /// Output format: text, json, csv
    #[arg(short = 'f', long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Print the filtered trace as CSV instead of a summary
    #[arg(short = 't', long)]
    trace: bool,

    /// Increase output verbosity
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let mut config = AppConfig::default();
    if let Some(rf) = args.rf {
        config.circuit.rf = rf;
    }
    if let Some(ri) = args.ri {
        config.circuit.ri = ri;
    }
    config.circuit.validate()?;

    let source = match (&args.input, &args.url) {
        (Some(path), _) => DataSource::Path(path.clone()),
        (None, Some(url)) => DataSource::Url(url.clone()),
        (None, None) => DataSource::Url(config.source.default_url.clone()),
    };

    let signal =
        Signal::load(&source).with_context(|| format!("Failed to load data from {}", source))?;

    let params = FilterParams::new(args.cutoff.as_rad_per_sec(), &config.circuit);
    log::info!(
        "Filtering {} samples at Wc={} ({:.2} Hz), Rf={} Ri={}",
        signal.len(),
        args.cutoff,
        args.cutoff.as_hz(),
        params.rf,
        params.ri
    );

    let mut cache = FilterCache::new();
    let vout = cache
        .evaluate(&signal.voltage, &signal.time, &params)
        .context("Filter simulation failed")?;

    if args.trace {
        let stdout = std::io::stdout();
        write_trace(stdout.lock(), &signal, &vout)?;
        return Ok(());
    }

    let summary = RunSummary::new(source.to_string(), &signal, &params, &vout);
    let formatter = create_formatter(args.format, args.verbose > 0);
    if let Some(header) = formatter.header() {
        println!("{}", header);
    }
    println!("{}", formatter.format(&summary));

    Ok(())
}
