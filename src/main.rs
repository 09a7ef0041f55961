use anyhow::{Context, Result, bail};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use sphere_test::cli::{Cli, Commands, ConfigOverrides, InputArgs, RunArgs, SignalArg, ValidateArgs};
use sphere_test::config::SphereConfig;
use sphere_test::ctx::Ctx;
use sphere_test::entity::Entity;
use sphere_test::io::coex::{self, CoexMatrix};
use sphere_test::io::entities::load_entities;
use sphere_test::io::summary;
use sphere_test::pipeline::Pipeline;
use sphere_test::signal::coexpression::attach_coex_indices;
use sphere_test::signal::{
    CoexpressionScore, HistoneDistance, MotifDistance, MotifIndex, ReplicationSpread, Signal,
    SignalKind, SpeciesSpread, TaxonEnrichment,
};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run(args) => run(args)?,
        Commands::Validate(args) => validate(args)?,
        Commands::Signals => print_signals(),
        Commands::PackCoex(args) => {
            let genes = coex::pack_tsv(&args.input, &args.out)?;
            println!("packed {} genes into {}", genes, args.out.display());
        }
    }

    Ok(())
}

trait SignalJob {
    fn execute<S: Signal>(
        self,
        signal: S,
        population: Vec<Entity<S::Payload>>,
        warnings: Vec<String>,
    ) -> Result<()>;
}

struct RunJob {
    input: PathBuf,
    out: PathBuf,
    config: SphereConfig,
    seed: u64,
    json: bool,
    tsv: bool,
    table_name: Option<String>,
}

impl SignalJob for RunJob {
    fn execute<S: Signal>(
        self,
        signal: S,
        population: Vec<Entity<S::Payload>>,
        warnings: Vec<String>,
    ) -> Result<()> {
        let mut ctx = Ctx::new(
            self.input,
            self.out,
            signal,
            population,
            self.config,
            self.seed,
        );
        ctx.write_json = self.json;
        ctx.write_tsv = self.tsv;
        if let Some(name) = self.table_name {
            ctx.table_name = name;
        }
        ctx.warnings.extend(warnings);

        Pipeline::sphere_test().run(&mut ctx)?;
        print_summary(&ctx)
    }
}

struct ValidateJob {
    input: PathBuf,
    config: SphereConfig,
}

impl SignalJob for ValidateJob {
    fn execute<S: Signal>(
        self,
        signal: S,
        population: Vec<Entity<S::Payload>>,
        warnings: Vec<String>,
    ) -> Result<()> {
        let seed = self.config.seed.unwrap_or(0);
        let mut ctx = Ctx::new(
            self.input,
            PathBuf::from("."),
            signal,
            population,
            self.config,
            seed,
        );
        ctx.warnings.extend(warnings);

        Pipeline::validation().run(&mut ctx)?;

        println!("sphere-test validate ok");
        println!("signal: {}", ctx.signal.kind().id());
        println!("entities: {}", ctx.population.len());
        println!("outside box: {}", ctx.outside_box);
        print_warnings(&ctx.warnings);
        Ok(())
    }
}

fn run(args: RunArgs) -> Result<()> {
    let config = resolve_config(args.config.as_deref(), &args.overrides)?;
    let seed = match config.seed {
        Some(seed) => seed,
        None => {
            let seed = rand::random::<u64>();
            info!(seed, "no seed configured, drew one from the OS");
            seed
        }
    };
    let job = RunJob {
        input: args.input.input.clone(),
        out: args.out,
        config: config.clone(),
        seed,
        json: args.json,
        tsv: args.tsv,
        table_name: args.table_name,
    };
    dispatch(&args.input, &config, job)
}

fn validate(args: ValidateArgs) -> Result<()> {
    let config = resolve_config(args.config.as_deref(), &args.overrides)?;
    let job = ValidateJob {
        input: args.input.input.clone(),
        config: config.clone(),
    };
    dispatch(&args.input, &config, job)
}

fn resolve_config(path: Option<&Path>, overrides: &ConfigOverrides) -> Result<SphereConfig> {
    let mut config = match path {
        Some(path) => SphereConfig::load(path)?,
        None => SphereConfig::default(),
    };
    overrides.apply(&mut config);
    config.validate()?;
    Ok(config)
}

fn dispatch<J: SignalJob>(input: &InputArgs, config: &SphereConfig, job: J) -> Result<()> {
    if input.coex.is_some() && input.signal != SignalArg::Coexpression {
        bail!("--coex is only used by the coexpression signal");
    }
    let path = &input.input;
    match input.signal {
        SignalArg::Histone => job.execute(HistoneDistance, load_entities(path)?, Vec::new()),
        SignalArg::MotifDistance => job.execute(MotifDistance, load_entities(path)?, Vec::new()),
        SignalArg::MotifIndex => job.execute(MotifIndex, load_entities(path)?, Vec::new()),
        SignalArg::Species => job.execute(SpeciesSpread, load_entities(path)?, Vec::new()),
        SignalArg::Taxon => {
            let population = load_entities(path)?;
            let signal = TaxonEnrichment::from_population(&population)?;
            job.execute(signal, population, Vec::new())
        }
        SignalArg::ReplicationTiming => {
            let signal = ReplicationSpread {
                min_index_jump: config.min_index_jump,
            };
            job.execute(signal, load_entities(path)?, Vec::new())
        }
        SignalArg::Coexpression => {
            let coex_path = input
                .coex
                .as_ref()
                .context("--coex is required for the coexpression signal")?;
            let matrix = Arc::new(CoexMatrix::open(coex_path)?);
            let entities = load_entities::<()>(path)?;
            let (population, skipped) = attach_coex_indices(entities, &matrix)?;
            let mut warnings = Vec::new();
            if !skipped.is_empty() {
                warn!(skipped = skipped.len(), "entities_without_coexpression_row");
                warnings.push(format!(
                    "{} entities have no coexpression row and were left out",
                    skipped.len()
                ));
            }
            job.execute(CoexpressionScore::new(matrix), population, warnings)
        }
    }
}

fn print_summary<S: Signal>(ctx: &Ctx<S>) -> Result<()> {
    let summary = summary::format_summary(ctx)?;
    print!("{}", summary);
    print_warnings(&ctx.warnings);
    Ok(())
}

fn print_warnings(warnings: &[String]) {
    if !warnings.is_empty() {
        println!("warnings:");
        for warning in warnings {
            println!("- {}", warning);
        }
    }
}

fn print_signals() {
    for kind in SignalKind::ALL {
        println!("{}\t{}\t{}", kind.id(), kind.table_name(), kind.description());
    }
}
