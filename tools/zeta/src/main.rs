//! Command-line front end for the AR wavy-surface generator.
//! Reads a JSON model configuration, runs the pipeline and writes the
//! trimmed surface as JSON. Logs go to stderr (`RUST_LOG`, default `info`).

use anyhow::{Context, Result};
use autoreg_core::{AutoregModel, Grid3, ModelConfig, Size3};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::{fs, path::PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

// ── CLI ───────────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "zeta", about = "Autoregressive wavy surface generator")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a surface and write it as JSON.
    Generate {
        #[command(flatten)]
        model: ModelArgs,

        /// Output file for the trimmed surface.
        #[arg(short, long, default_value = "zeta.json")]
        output: PathBuf,
    },
    /// Fit the AR model only and print the coefficients as JSON.
    Fit {
        #[command(flatten)]
        model: ModelArgs,
    },
    /// Print the default model configuration as JSON.
    Defaults,
    /// Print mean and variance of a surface written by `generate`.
    Stats {
        /// Surface JSON file.
        #[arg(short, long)]
        input: PathBuf,
    },
}

#[derive(clap::Args, Debug)]
struct ModelArgs {
    /// Model configuration JSON; missing keys take their defaults.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Noise seed (overrides the configuration).
    #[arg(long)]
    seed: Option<u64>,

    /// Surface size as T,X,Y (overrides the configuration).
    #[arg(long, value_parser = parse_size3)]
    zsize: Option<Size3>,

    /// ACF / AR filter size as T,X,Y (overrides the configuration).
    #[arg(long, value_parser = parse_size3)]
    acf_size: Option<Size3>,
}

fn parse_size3(s: &str) -> std::result::Result<Size3, String> {
    let parts: Vec<usize> = s
        .split(',')
        .map(|p| p.trim().parse::<usize>().map_err(|e| format!("{p:?}: {e}")))
        .collect::<std::result::Result<_, _>>()?;
    match parts[..] {
        [t, x, y] => Ok(Size3::new(t, x, y)),
        _ => Err(format!("expected T,X,Y, got {s:?}")),
    }
}

impl ModelArgs {
    fn load(&self) -> Result<ModelConfig> {
        let mut cfg = match &self.config {
            Some(path) => {
                let text = fs::read_to_string(path)
                    .with_context(|| format!("reading {}", path.display()))?;
                ModelConfig::from_json(&text)
                    .with_context(|| format!("parsing {}", path.display()))?
            }
            None => ModelConfig::default(),
        };
        if let Some(seed) = self.seed {
            cfg.seed = Some(seed);
        }
        if let Some(zsize) = self.zsize {
            cfg.zsize = zsize;
        }
        if let Some(acf_size) = self.acf_size {
            cfg.acf_size = acf_size;
        }
        Ok(cfg)
    }
}

// ── Output types ──────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct FitReport {
    acf_variance: f64,
    white_noise_variance: f64,
    ar_coefs: Grid3,
}

#[derive(Serialize)]
struct StatsReport {
    size: Size3,
    mean: f64,
    variance: f64,
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    match Args::parse().command {
        Command::Generate { model, output } => {
            let model = AutoregModel::new(model.load()?)?;
            let result = model.act()?;
            fs::write(&output, serde_json::to_string(&result.zeta)?)
                .with_context(|| format!("writing {}", output.display()))?;
            info!(
                path = %output.display(),
                shape = %result.zeta.size,
                ms = result.generation_time_ms,
                "surface written"
            );
        }
        Command::Fit { model } => {
            let model = AutoregModel::new(model.load()?)?;
            model.echo_parameters();
            let fit = model.fit()?;
            let report = FitReport {
                acf_variance: autoreg_core::acf_variance(&fit.acf),
                white_noise_variance: fit.white_noise_variance,
                ar_coefs: fit.ar_coefs,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Command::Defaults => {
            println!("{}", serde_json::to_string_pretty(&ModelConfig::default())?);
        }
        Command::Stats { input } => {
            let text = fs::read_to_string(&input)
                .with_context(|| format!("reading {}", input.display()))?;
            let zeta: Grid3 = serde_json::from_str(&text)
                .with_context(|| format!("parsing {}", input.display()))?;
            let report = StatsReport {
                size: zeta.size,
                mean: autoreg_core::stats::mean(&zeta.data)?,
                variance: autoreg_core::stats::variance(&zeta.data)?,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_size_triples() {
        assert_eq!(parse_size3("16,5,5").unwrap(), Size3::new(16, 5, 5));
        assert_eq!(parse_size3(" 3, 3 ,3").unwrap(), Size3::new(3, 3, 3));
        assert!(parse_size3("3,3").is_err());
        assert!(parse_size3("3,x,3").is_err());
    }

    #[test]
    fn cli_overrides_take_precedence() {
        let args = Args::parse_from(["zeta", "fit", "--seed", "9", "--zsize", "32,8,8"]);
        let Command::Fit { model } = args.command else { panic!("expected fit") };
        let cfg = model.load().unwrap();
        assert_eq!(cfg.seed, Some(9));
        assert_eq!(cfg.zsize, Size3::new(32, 8, 8));
        assert_eq!(cfg.acf_size, ModelConfig::default().acf_size);
    }
}
