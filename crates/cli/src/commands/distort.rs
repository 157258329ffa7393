use anyhow::{Context, Result, bail};
use clap::{Args, ValueEnum};
use noise::EngineBuilder;
use ontology::DataResolver;
use phenoimp_core::{Config, NoiseConfig, Phenopacket};
use std::path::{Path, PathBuf};
use tracing::info;

/// How far to generalize phenotype terms
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Approximate {
  Off,
  Parent,
  Grandparent,
}

impl Approximate {
  pub fn hops(self) -> i64 {
    match self {
      Approximate::Off => 0,
      Approximate::Parent => 1,
      Approximate::Grandparent => 2,
    }
  }
}

#[derive(Debug, Args)]
pub struct DistortArgs {
  /// Phenopacket JSON file(s) to distort
  #[arg(short, long = "input", value_name = "FILE", required = true)]
  pub inputs: Vec<PathBuf>,

  /// Output file (single input only; default: <name>.distorted.json next to the input)
  #[arg(short, long, value_name = "FILE")]
  pub output: Option<PathBuf>,

  /// Directory with hp.json and phenotype.hpoa
  #[arg(short, long = "data", value_name = "DIR")]
  pub data_directory: Option<PathBuf>,

  /// Seed for reproducible runs (default: current UNIX epoch second)
  #[arg(long, allow_negative_numbers = true)]
  pub random_seed: Option<i64>,

  /// Number of random phenotypic abnormalities to add
  #[arg(long = "add-n-random-terms", value_name = "N", allow_negative_numbers = true)]
  pub add_n_random_terms: Option<i64>,

  /// Drop one of two variants of a single autosomal recessive disease
  #[arg(long = "drop-ar-variant")]
  pub drop_ar_variant: bool,

  /// Replace phenotype terms with their parent or grandparent
  #[arg(long, value_enum)]
  pub approximate: Option<Approximate>,

  /// Replace phenotype terms with the ancestor this many hops up (overrides --approximate)
  #[arg(long, value_name = "N", allow_negative_numbers = true)]
  pub hops: Option<i64>,
}

impl DistortArgs {
  /// Overlay the command line on top of the loaded configuration
  pub fn apply_to(&self, config: &mut Config) {
    if let Some(dir) = &self.data_directory {
      config.data.directory = dir.clone();
    }
    apply_noise(self, &mut config.noise);
  }
}

fn apply_noise(args: &DistortArgs, noise: &mut NoiseConfig) {
  if let Some(seed) = args.random_seed {
    noise.random_seed = Some(seed);
  }
  if let Some(count) = args.add_n_random_terms {
    noise.add_random_term_count = count;
  }
  if args.drop_ar_variant {
    noise.drop_recessive_variant = true;
  }
  if let Some(hops) = args.hops.or(args.approximate.map(Approximate::hops)) {
    noise.ancestor_hops = hops;
  }
}

/// Where the distorted copy of `input` is written by default
fn distorted_path(input: &Path) -> Result<PathBuf> {
  let name = input
    .file_name()
    .and_then(|n| n.to_str())
    .with_context(|| format!("Invalid input path: {}", input.display()))?;
  let Some(stem) = name.strip_suffix(".json") else {
    bail!("Input must be a *.json file: {}", input.display());
  };
  Ok(input.with_file_name(format!("{}.distorted.json", stem)))
}

/// Pair every input with its output path, checking them all up front
fn plan_outputs(inputs: &[PathBuf], output: Option<&Path>) -> Result<Vec<(PathBuf, PathBuf)>> {
  if output.is_some() && inputs.len() > 1 {
    bail!("--output can only be used with a single --input");
  }

  inputs
    .iter()
    .map(|input| -> Result<(PathBuf, PathBuf)> {
      let default = distorted_path(input)?;
      let target = output.map(Path::to_path_buf).unwrap_or(default);
      Ok((input.clone(), target))
    })
    .collect()
}

fn distort_file(builder: &EngineBuilder, config: &NoiseConfig, input: &Path, output: &Path) -> Result<()> {
  let json = std::fs::read_to_string(input).with_context(|| format!("Failed to read {}", input.display()))?;
  let pp = Phenopacket::from_json_str(&json).with_context(|| format!("Failed to parse {}", input.display()))?;

  let distorted = builder
    .distort(config, pp)
    .with_context(|| format!("Failed to distort {}", input.display()))?;

  std::fs::write(output, distorted.to_json_string_pretty()?)
    .with_context(|| format!("Failed to write {}", output.display()))?;
  info!("Wrote {}", output.display());
  Ok(())
}

/// Distort every input phenopacket with one shared engine
pub fn cmd_distort(args: DistortArgs, mut config: Config) -> Result<()> {
  args.apply_to(&mut config);
  let jobs = plan_outputs(&args.inputs, args.output.as_deref())?;

  // Every input sees the same seed, including when none was configured.
  config.noise.random_seed.get_or_insert_with(noise::default_seed);

  let resolver = DataResolver::from_config(&config.data)?;
  let builder = EngineBuilder::from_data_directory(&resolver).context("Failed to load the ontology")?;

  for (input, output) in &jobs {
    distort_file(&builder, &config.noise, input, output)?;
  }

  info!("Distorted {} phenopacket(s)", jobs.len());
  Ok(())
}
