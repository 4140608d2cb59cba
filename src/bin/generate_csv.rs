use anyhow::{Context, Result};
use clap::Parser;
use lpfsim::data::Signal;
use lpfsim::simulation::{NoiseConfig, Waveform, apply_noise, generate_signal};
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, clap::ValueEnum)]
enum WaveformKind {
    Step,
    Sine,
    Square,
}

#[derive(Parser, Debug)]
#[command(name = "generate_csv")]
#[command(about = "Generate synthetic voltage CSV files for the low-pass filter simulator")]
struct Args {
    /// TOML noise profile
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output directory
    #[arg(short, long, default_value = "data/synthetic")]
    output_dir: PathBuf,

    /// Waveform shape
    #[arg(short, long, value_enum, default_value = "sine")]
    waveform: WaveformKind,

    /// Frequencies in Hz: comma-separated (e.g., "1,5,20") or range (e.g., "1-20:5").
    /// Step waveforms use this list as step times in seconds.
    #[arg(short, long, default_value = "1,4,16")]
    frequencies: String,

    /// Peak amplitude (or step level) in volts
    #[arg(short, long, default_value_t = 1.0)]
    amplitude: f64,

    /// DC offset in volts
    #[arg(long, default_value_t = 0.0)]
    offset: f64,

    /// Number of noisy trials per frequency
    #[arg(short, long, default_value_t = 1)]
    trials: u32,

    /// Base seed for reproducibility
    #[arg(short, long)]
    seed: Option<u64>,

    /// Signal duration in seconds
    #[arg(short, long, default_value_t = 2.0)]
    duration: f64,

    /// Sample rate in Hz
    #[arg(long, default_value_t = 1000.0)]
    sample_rate: f64,

    /// Output filename prefix
    #[arg(long, default_value = "synth")]
    prefix: String,

    /// Generate manifest.json
    #[arg(long)]
    manifest: bool,

    /// AWGN SNR in dB (CLI override)
    #[arg(long)]
    snr: Option<f64>,

    /// Increase output verbosity
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, serde::Serialize)]
struct ManifestEntry {
    file: String,
    parameter: f64,
    trial: u32,
    seed: u64,
}

#[derive(Debug, serde::Serialize)]
struct Manifest {
    waveform: String,
    sample_rate: f64,
    duration: f64,
    amplitude: f64,
    offset: f64,
    files: Vec<ManifestEntry>,
}

fn parse_values(s: &str) -> Result<Vec<f64>> {
    if s.contains(':') {
        let parts: Vec<&str> = s.split(':').collect();
        if parts.len() != 2 {
            anyhow::bail!("Invalid range format. Use 'start-end:step'");
        }
        let step: f64 = parts[1].parse().context("Invalid step value")?;
        if step <= 0.0 {
            anyhow::bail!("Step must be positive");
        }
        let range_parts: Vec<&str> = parts[0].split('-').collect();
        if range_parts.len() != 2 {
            anyhow::bail!("Invalid range format. Use 'start-end:step'");
        }
        let start: f64 = range_parts[0].parse().context("Invalid start value")?;
        let end: f64 = range_parts[1].parse().context("Invalid end value")?;

        let mut values = Vec::new();
        let mut v = start;
        while v <= end {
            values.push(v);
            v += step;
        }
        Ok(values)
    } else {
        s.split(',')
            .map(|p| p.trim().parse::<f64>().context("Invalid value"))
            .collect()
    }
}

fn load_noise_profile(path: &PathBuf) -> Result<NoiseConfig> {
    let content = fs::read_to_string(path).context("Failed to read config file")?;
    toml::from_str(&content).context("Failed to parse config file")
}

fn build_waveform(kind: WaveformKind, parameter: f64, args: &Args) -> Waveform {
    match kind {
        WaveformKind::Step => Waveform::Step {
            level: args.offset + args.amplitude,
            at_secs: parameter,
        },
        WaveformKind::Sine => Waveform::Sine {
            amplitude: args.amplitude,
            freq_hz: parameter,
            offset: args.offset,
        },
        WaveformKind::Square => Waveform::Square {
            amplitude: args.amplitude,
            freq_hz: parameter,
            offset: args.offset,
        },
    }
}

fn build_noise_config(profile: &NoiseConfig, args: &Args, seed: u64) -> NoiseConfig {
    let mut config = profile.clone().with_seed(seed);
    if let Some(snr) = args.snr {
        config = config.with_awgn(snr);
    }
    config
}

fn file_name(prefix: &str, kind: WaveformKind, parameter: f64, trial: u32) -> String {
    let kind = match kind {
        WaveformKind::Step => "step",
        WaveformKind::Sine => "sine",
        WaveformKind::Square => "square",
    };
    // Decimal point replaced so names stay shell friendly
    let parameter = format!("{}", parameter).replace('.', "p");
    format!("{}_{}_{}_t{:02}.csv", prefix, kind, parameter, trial)
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = match args.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    if args.sample_rate <= 0.0 || args.duration <= 0.0 {
        anyhow::bail!("Sample rate and duration must be positive");
    }

    fs::create_dir_all(&args.output_dir).context("Failed to create output directory")?;

    let profile = match args.config {
        Some(ref config_path) => load_noise_profile(config_path)?,
        None => NoiseConfig::default(),
    };

    let parameters = parse_values(&args.frequencies)?;
    let base_seed = args.seed.or(profile.seed).unwrap_or(0);

    let mut manifest_entries = Vec::new();
    let total_files = parameters.len() * args.trials as usize;
    let mut file_count = 0;

    for (index, &parameter) in parameters.iter().enumerate() {
        let waveform = build_waveform(args.waveform, parameter, &args);
        let clean = generate_signal(&waveform, args.duration, args.sample_rate);

        for trial in 0..args.trials {
            let seed = base_seed + trial as u64 * 1000 + index as u64;
            let noise_config = build_noise_config(&profile, &args, seed);
            let voltage = apply_noise(&clean.voltage, &clean.time, &noise_config);
            let signal = Signal::new(clean.time.clone(), voltage)?;

            let filename = file_name(&args.prefix, args.waveform, parameter, trial);
            let filepath = args.output_dir.join(&filename);
            let file = File::create(&filepath)
                .with_context(|| format!("Failed to create {}", filepath.display()))?;
            signal
                .write_csv(BufWriter::new(file))
                .context("Failed to write CSV file")?;
            log::debug!("Wrote {} ({} samples)", filepath.display(), signal.len());

            manifest_entries.push(ManifestEntry {
                file: filename,
                parameter,
                trial,
                seed,
            });

            file_count += 1;
            eprint!("\rGenerating: {}/{}", file_count, total_files);
        }
    }
    eprintln!();

    if args.manifest {
        let manifest = Manifest {
            waveform: format!("{:?}", args.waveform).to_lowercase(),
            sample_rate: args.sample_rate,
            duration: args.duration,
            amplitude: args.amplitude,
            offset: args.offset,
            files: manifest_entries,
        };
        let manifest_path = args.output_dir.join("manifest.json");
        let manifest_json =
            serde_json::to_string_pretty(&manifest).context("Failed to serialize manifest")?;
        fs::write(&manifest_path, manifest_json).context("Failed to write manifest")?;
        eprintln!("Manifest written to: {}", manifest_path.display());
    }

    eprintln!(
        "Generated {} files in {}",
        total_files,
        args.output_dir.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_values_comma_separated() {
        let values = parse_values("1, 2.5,10").unwrap();
        assert_eq!(values, vec![1.0, 2.5, 10.0]);
    }

    #[test]
    fn test_parse_values_range() {
        let values = parse_values("0-20:5").unwrap();
        assert_eq!(values, vec![0.0, 5.0, 10.0, 15.0, 20.0]);
    }

    #[test]
    fn test_parse_values_rejects_bad_input() {
        assert!(parse_values("1-5:0").is_err());
        assert!(parse_values("1-5").is_err());
        assert!(parse_values("a,b").is_err());
    }

    #[test]
    fn test_file_name() {
        assert_eq!(
            file_name("synth", WaveformKind::Sine, 2.5, 3),
            "synth_sine_2p5_t03.csv"
        );
    }
}
