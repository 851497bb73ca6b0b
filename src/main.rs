use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use serde::de::DeserializeOwned;
use tracing_subscriber::EnvFilter;

use windinfil::Diagnostics;
use windinfil::io::{read_model, write_model};
use windinfil::model::demo::demo_model;
use windinfil::sim::infiltration::{
    CharacterizationConfig, RawDirectionCount, ZoneResponse, apply_response,
};
use windinfil::sim::network::{
    Airtightness, EntityIndexMap, ExternalRunner, LeakageSpec, SimulationRunner, TranslatorMaps,
};

#[derive(Parser)]
#[command(name = "windinfil")]
#[command(about = "Wind-driven infiltration characterization", long_about = None)]
struct Cli {
    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Writes the four-space demonstration model
    Demo {
        /// Output model file (JSON)
        output: PathBuf,
    },
    /// Writes a characterization config
    Config {
        /// Number of wind directions in the sweep
        #[arg(long)]
        ndirs: Option<String>,

        /// Envelope airtightness (Tight, Average or Leaky)
        #[arg(long, conflicts_with = "flow")]
        level: Option<Airtightness>,

        /// Envelope leakage in m³/h per m² at 75 Pa
        #[arg(long)]
        flow: Option<f64>,

        /// Config to start from (JSON); defaults are used otherwise
        #[arg(long)]
        base: Option<PathBuf>,

        /// Output config file (JSON)
        output: PathBuf,
    },
    /// Runs the configured simulator on one network input file
    Simulate {
        /// Network input file
        input: PathBuf,

        /// Characterization config (JSON) with a `tools` section
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Fits recorded zone responses and writes the infiltration definitions
    Fit {
        /// Model file (JSON)
        #[arg(short, long)]
        model: PathBuf,

        /// Translator zone and path maps (JSON)
        #[arg(long)]
        maps: PathBuf,

        /// Direction-averaged zone flows at the reference speeds (JSON)
        #[arg(short, long)]
        response: PathBuf,

        /// Characterization config (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Air density (kg/m³); overrides the config value
        #[arg(long)]
        density: Option<f64>,

        /// Output model file; defaults to overwriting the input model
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn read_json<T: DeserializeOwned>(path: &Path, what: &str) -> Result<T> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {what}: {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Invalid {what}: {}", path.display()))
}

/// Applies the command-line overrides to `config`.
fn override_config(
    mut config: CharacterizationConfig,
    ndirs: Option<String>,
    level: Option<Airtightness>,
    flow: Option<f64>,
) -> CharacterizationConfig {
    if let Some(ndirs) = ndirs {
        config.direction_count = RawDirectionCount::Text(ndirs);
    }
    if let Some(level) = level {
        config.leakage = LeakageSpec::Level(level);
    }
    if let Some(flow) = flow {
        config.leakage = LeakageSpec::exterior_flow_rate(flow);
    }
    config
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.quiet { "warn" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    match cli.command {
        Commands::Demo { output } => {
            let model = demo_model()?;
            write_model(&output, &model)?;
            tracing::info!("Demo model written to {}", output.display());
        }
        Commands::Config {
            ndirs,
            level,
            flow,
            base,
            output,
        } => {
            let base = match base {
                Some(path) => CharacterizationConfig::from_json_file(&path)?,
                None => CharacterizationConfig::default(),
            };
            let config = override_config(base, ndirs, level, flow);
            let json = serde_json::to_string_pretty(&config)
                .context("Failed to serialize characterization config")?;
            fs::write(&output, json)
                .with_context(|| format!("Failed to write config: {}", output.display()))?;
            tracing::info!("Config written to {}", output.display());
        }
        Commands::Simulate { input, config } => {
            let config = CharacterizationConfig::from_json_file(&config)?;
            let tools = config
                .tools
                .ok_or_else(|| anyhow!("Config has no tools section"))?;
            let results = ExternalRunner::new(tools).run(&input)?;
            println!("{}", results.display());
        }
        Commands::Fit {
            model: model_path,
            maps,
            response,
            config,
            density,
            output,
        } => {
            let config = match config {
                Some(path) => CharacterizationConfig::from_json_file(&path)?,
                None => CharacterizationConfig::default(),
            };
            let density = density.unwrap_or(config.air_density);

            let mut model = read_model(&model_path)?;
            let maps: TranslatorMaps = read_json(&maps, "translator maps")?;
            let response: ZoneResponse = read_json(&response, "zone response")?;

            let index = EntityIndexMap::build(&model, &maps)?;
            let mut diagnostics = Diagnostics::new();
            diagnostics.extend(index.diagnostics().clone());

            let (fits, summary) =
                apply_response(&mut model, &index, &response, density, &mut diagnostics)?;

            let output = output.unwrap_or(model_path);
            write_model(&output, &model)?;

            println!(
                "{} zones fitted, {} definitions written, {} removed, {} warnings",
                fits.iter().filter(|f| f.is_valid()).count(),
                summary.installed.len(),
                summary.removed,
                diagnostics.len()
            );
            for d in diagnostics.items() {
                println!("warning: {d}");
            }
        }
    }

    Ok(())
}
