//! Multiply-Accumulate Model
//!
//! Runs a small synchronous model (a multiplier feeding an accumulator, plus a
//! channel-decoding stage) and writes the introspected signal types of its
//! processes to an XML document.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use forsyde_types::{define_type, IntrospectionConfig, OutputFormat, TypeRegistry};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "forsyde-mulacc")]
#[command(about = "Run the multiply-accumulate model and write its type introspection")]
struct Cli {
    /// Number of synchronous cycles to simulate
    #[arg(short, long, default_value_t = 10)]
    cycles: usize,

    /// Introspection output file (overrides the configured path)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Configuration file
    #[arg(short = 'C', long)]
    config: Option<String>,

    /// Output layout (overrides the configured format)
    #[arg(short, long, value_enum)]
    format: Option<Format>,

    /// Print the registered types as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Pretty,
    Compact,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Pretty => OutputFormat::Pretty,
            Format::Compact => OutputFormat::Compact,
        }
    }
}

/// Samples per granule channel
const GRANULE_SAMPLES: usize = 576;

/// Decoded samples of one granule channel
struct ChanuleSamples([f32; GRANULE_SAMPLES]);

define_type!(ChanuleSamples, "ChanuleSamples");

type ChanuleType = (Vec<ChanuleSamples>, Vec<f32>);

/// A synchronous signal event; `None` is the absent event
type AbstExt<T> = Option<T>;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = match cli.config.as_deref() {
        Some(path) => IntrospectionConfig::load_from(Some(path)),
        None => IntrospectionConfig::load(),
    }
    .context("loading configuration")?;
    if let Some(output) = cli.output {
        config.output.path = output;
    }
    if let Some(format) = cli.format {
        config.output.format = format.into();
    }

    let mut registry = TypeRegistry::with_config(&config);

    println!("⚙️  Simulating {} cycles", cli.cycles);
    let mut acc: AbstExt<i32> = Some(0);
    for cycle in 0..cli.cycles {
        let (a, b) = stimuli(cycle);
        let product = mul_func(&mut registry, a, b)?;
        acc = add_func(&mut registry, product, acc)?;
        debug!(cycle, ?a, ?b, ?product, ?acc, "cycle done");

        let sync = vec![cycle as f32];
        let (samples, _) = chanule_func(&mut registry, &sync)?;
        debug!(
            cycle,
            granules = samples.len(),
            level = samples.first().map_or(0.0, |s| s.0[0]),
            "chanule decoded"
        );
    }
    println!("  Accumulated: {}", acc.unwrap_or(0));
    info!(types = registry.len(), "simulation finished");

    let path = config.output_path();
    registry
        .persist(&path)
        .with_context(|| format!("writing introspection to {}", path.display()))?;
    println!("✅ Wrote {} types to {}", registry.len(), path.display());

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&registry.data_types())?);
    }

    Ok(())
}

/// Test bench input: `a` counts up, `b` is absent on every fourth cycle
fn stimuli(cycle: usize) -> (AbstExt<i32>, AbstExt<i32>) {
    let a = Some(cycle as i32);
    let b = if cycle % 4 == 3 { None } else { Some(3) };
    (a, b)
}

fn mul_func(registry: &mut TypeRegistry, a: AbstExt<i32>, b: AbstExt<i32>) -> anyhow::Result<AbstExt<i32>> {
    registry.traverse::<i32>()?;

    let inp1 = a.unwrap_or(0);
    let inp2 = b.unwrap_or(0);
    Ok(Some(inp1.wrapping_mul(inp2)))
}

fn add_func(registry: &mut TypeRegistry, a: AbstExt<i32>, state: AbstExt<i32>) -> anyhow::Result<AbstExt<i32>> {
    registry.traverse::<i32>()?;

    Ok(Some(a.unwrap_or(0).wrapping_add(state.unwrap_or(0))))
}

fn chanule_func(registry: &mut TypeRegistry, sync: &[f32]) -> anyhow::Result<ChanuleType> {
    registry.traverse::<ChanuleType>()?;
    registry.traverse::<Vec<f32>>()?;

    let level = sync.first().copied().unwrap_or(0.0);
    let samples = ChanuleSamples([level; GRANULE_SAMPLES]);
    Ok((vec![samples], sync.to_vec()))
}
