use anyhow::Context;
use clap::{Parser, Subcommand};
use rinkcoach::config::{AppConfig, ConfigManager};
use rinkcoach::engines::generation::{GenomeValidator, MutationEngine};
use rinkcoach::{GenomeCompiler, PrimitiveRegistry, TeamGenome};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

/// Deepest tree the validator accepts
const MAX_TREE_DEPTH: usize = 16;

/// Offline tools for hockey behavior-tree genomes
#[derive(Parser, Debug)]
#[command(name = "rinkcoach")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file (TOML or JSON)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List every registered condition and action
    Catalogue,

    /// Check a genome file and show compile diagnostics
    Validate {
        #[arg(required = true)]
        genome: PathBuf,
    },

    /// Apply structural mutations to a genome and print the result
    Mutate {
        #[arg(required = true)]
        genome: PathBuf,

        /// Number of successive mutations
        #[arg(short = 'n', long, default_value = "1")]
        count: usize,

        /// Random seed (default: random)
        #[arg(short, long)]
        seed: Option<u64>,
    },
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    let result = load_config(args.config.as_deref()).and_then(|config| match args.command {
        Commands::Catalogue => catalogue(),
        Commands::Validate { genome } => validate(&genome, &config),
        Commands::Mutate { genome, count, seed } => mutate(&genome, count, seed, config),
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<AppConfig> {
    let mut manager = ConfigManager::new();
    match path {
        Some(path) => manager.load_from_file(path)?,
        None => manager.load_from_env()?,
    }
    Ok(manager.get())
}

fn load_genome(path: &Path) -> anyhow::Result<TeamGenome> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    TeamGenome::from_json(&json).with_context(|| format!("parsing {}", path.display()))
}

fn catalogue() -> anyhow::Result<()> {
    let registry = PrimitiveRegistry::new();
    for entry in registry.catalogue() {
        let context = entry.context.map(|c| c.to_string()).unwrap_or_default();
        println!(
            "{:<22} {:<5} {:<9} {:<24} {}",
            entry.alias,
            entry.category,
            context,
            entry.params.join(" "),
            entry.description
        );
    }
    Ok(())
}

fn validate(path: &Path, config: &AppConfig) -> anyhow::Result<()> {
    let genome = load_genome(path)?;
    let registry = Arc::new(PrimitiveRegistry::new());

    let issues = GenomeValidator::new(Arc::clone(&registry), MAX_TREE_DEPTH).issues(&genome);
    let compiled = GenomeCompiler::new(registry, config.rink.clone()).compile(&genome);

    println!(
        "{} [{}]: roles {:?}",
        genome.display_name(),
        genome.display_code(),
        compiled.roles().map(|r| r.to_string()).collect::<Vec<_>>()
    );
    for issue in &issues {
        println!("  issue: {}", issue);
    }
    for diagnostic in compiled.diagnostics() {
        println!("  compile: {}", diagnostic);
    }

    if issues.is_empty() {
        println!("OK");
        Ok(())
    } else {
        anyhow::bail!("{} issue(s) found", issues.len())
    }
}

fn mutate(path: &Path, count: usize, seed: Option<u64>, config: AppConfig) -> anyhow::Result<()> {
    let mut genome = load_genome(path)?;
    let mut mutation = config.mutation;
    if seed.is_some() {
        mutation.seed = seed;
    }

    let mut engine = MutationEngine::new(Arc::new(PrimitiveRegistry::new()), mutation)?;
    for _ in 0..count {
        let result = engine.mutate(&genome);
        eprintln!(
            "{} {}",
            if result.applied { "applied" } else { "skipped" },
            result.description
        );
        genome = result.genome;
    }

    println!("{}", genome.to_json_pretty()?);
    Ok(())
}
