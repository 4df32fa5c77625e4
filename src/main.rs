//! vecluster CLI - cluster JSON-lines vector files and generate test data

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};
use vecluster::visualization::{self, plot_records, sample_records};
use vecluster::{generate_clusters, ClusterEngine, Dataset, GeneratorConfig, InitMethod, KMeansConfig};

#[derive(Parser)]
#[command(name = "vecluster")]
#[command(about = "Deterministic k-means over JSON-lines vector files", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace); RUST_LOG wins when set
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Cluster a JSON-lines dataset (one array of numbers per line)
    Cluster(ClusterArgs),

    /// Write a synthetic clustered dataset as JSON lines to stdout
    Generate(GenerateArgs),
}

#[derive(clap::Args)]
struct ClusterArgs {
    /// Input file, or `-` for stdin
    #[arg(short, long)]
    input: PathBuf,

    /// Number of clusters
    #[arg(short, long, required_unless_present = "config")]
    k: Option<usize>,

    /// Stop once no centroid moves farther than this
    #[arg(short, long)]
    tolerance: Option<f64>,

    /// Maximum assign/update rounds
    #[arg(short, long)]
    max_iterations: Option<usize>,

    /// Seed for centroid initialization
    #[arg(short, long)]
    seed: Option<u64>,

    #[arg(long, value_enum)]
    init: Option<InitMethod>,

    /// Disable parallel assignment (results are identical either way)
    #[arg(long)]
    sequential: bool,

    /// JSON file with KMeansConfig fields; flags override it
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(short, long, value_enum, default_value_t = OutputFormat::Summary)]
    format: OutputFormat,

    /// Plot format only: emit a seeded sample of this many records
    #[arg(long)]
    sample: Option<usize>,

    /// Plot format only: keep the first two dimensions of every point
    #[arg(long)]
    project: bool,
}

#[derive(clap::Args)]
struct GenerateArgs {
    /// Number of clusters
    #[arg(short, long)]
    clusters: usize,

    /// Points in each cluster
    #[arg(short, long)]
    points: usize,

    #[arg(short, long, default_value_t = 2)]
    dimension: usize,

    /// Centers are drawn from [0, extent) on every axis
    #[arg(long, default_value_t = 100.0)]
    extent: f64,

    /// Side of the box around each center that points fall in
    #[arg(long, default_value_t = 5.0)]
    spread: f64,

    #[arg(short, long, default_value_t = 42)]
    seed: u64,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Labels, centers, and per-cluster statistics
    Summary,
    /// The full result as one JSON object
    Json,
    /// One {"vec", "centroid"} record per line
    Plot,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    match cli.command {
        Commands::Cluster(args) => run_cluster(args),
        Commands::Generate(args) => run_generate(args),
    }
}

fn build_config(args: &ClusterArgs) -> Result<KMeansConfig> {
    let mut config = match &args.config {
        Some(path) => KMeansConfig::from_json_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => KMeansConfig::default(),
    };

    if let Some(k) = args.k {
        config.k = k;
    }
    if let Some(tolerance) = args.tolerance {
        config.tolerance = tolerance;
    }
    if let Some(max_iterations) = args.max_iterations {
        config.max_iterations = max_iterations;
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(init) = args.init {
        config.init = init;
    }
    if args.sequential {
        config.parallel = false;
    }

    Ok(config)
}

fn load_dataset(path: &Path) -> Result<Dataset<f64>> {
    if path == Path::new("-") {
        return Dataset::from_jsonl_reader(io::stdin().lock())
            .context("failed to read dataset from stdin");
    }
    Dataset::from_jsonl_path(path).with_context(|| format!("failed to read {}", path.display()))
}

fn run_cluster(args: ClusterArgs) -> Result<()> {
    let config = build_config(&args)?;
    info!(?config, "clustering");

    let dataset = load_dataset(&args.input)?;
    let result = ClusterEngine::new(config.clone())
        .cluster(&dataset)
        .context("clustering failed")?;

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match args.format {
        OutputFormat::Summary => visualization::write_summary(&result, &mut out)?,
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut out, &result)?;
            writeln!(out)?;
        }
        OutputFormat::Plot => {
            let mut records = plot_records(&dataset, &result)?;
            if args.project {
                records = records.iter().map(|r| r.projected()).collect();
            }
            let records = sample_records(records, args.sample, config.seed);
            visualization::write_jsonl(&records, &mut out)?;
        }
    }

    Ok(())
}

fn run_generate(args: GenerateArgs) -> Result<()> {
    let config = GeneratorConfig {
        clusters: args.clusters,
        points_per_cluster: args.points,
        dimension: args.dimension,
        extent: args.extent,
        spread: args.spread,
        seed: args.seed,
    };

    let generated = generate_clusters(&config).context("invalid generator settings")?;
    info!(
        vectors = generated.dataset.len(),
        clusters = config.clusters,
        "generated dataset"
    );

    let stdout = io::stdout();
    generated.dataset.write_jsonl(stdout.lock())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_flags_override_defaults() {
        let cli = Cli::parse_from([
            "vecluster", "cluster", "-i", "data.jsonl", "-k", "4", "--seed", "7", "--init",
            "plus-plus", "--sequential",
        ]);
        let Commands::Cluster(args) = cli.command else {
            panic!("expected cluster subcommand");
        };

        let config = build_config(&args).unwrap();
        assert_eq!(config.k, 4);
        assert_eq!(config.seed, 7);
        assert_eq!(config.init, InitMethod::PlusPlus);
        assert!(!config.parallel);
        assert_eq!(config.tolerance, KMeansConfig::default().tolerance);
    }

    #[test]
    fn test_k_required_without_config() {
        let parsed = Cli::try_parse_from(["vecluster", "cluster", "-i", "data.jsonl"]);
        assert!(parsed.is_err());
    }
}
