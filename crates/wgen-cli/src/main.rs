mod config;
mod demo;

use std::{fmt, path::PathBuf};

use clap::Parser as _;
use color_eyre::{eyre::bail, Result};
use itertools::Itertools;
use tracing_subscriber::prelude::*;
use wgen::{
    rand::{rngs::SmallRng, SeedableRng},
    BaseCase, Context, Depth, Gen, Generic, Weights,
};

use crate::config::Config;

fn main() -> Result<()> {
    color_eyre::install()?;

    tracing_subscriber::Registry::default()
        .with(tracing_error::ErrorLayer::default())
        .with(
            tracing_subscriber::EnvFilter::builder()
                .with_default_directive(tracing_subscriber::filter::LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();

    run()
}

#[derive(Debug, clap::Parser)]
#[command(version)]
struct Cli {
    #[clap(subcommand)]
    cmd: Cmd,
}

#[derive(Debug, clap::Subcommand)]
enum Cmd {
    /// Print the constructors and fields of a type
    Shape {
        ty: DemoType,
    },
    /// Print randomly generated values
    Sample(Opts),
    /// Print the minimal-depth base cases of a type, one witness per
    /// constructor
    BaseCases {
        ty: DemoType,
        /// The deepest nesting to search
        #[clap(long, short, default_value = "5")]
        depth: usize,
    },
    /// Generate many values and compare how often each outermost constructor
    /// was picked against its weight
    Freq(Opts),
}

#[derive(Debug, clap::Args)]
struct Opts {
    ty: DemoType,
    /// The size budget passed to the generator
    #[clap(long, short)]
    size: Option<u32>,
    /// The number of values to generate
    #[clap(long, short = 'n', visible_alias = "samples")]
    count: Option<usize>,
    /// Seed for the random number generator, random if not given
    #[clap(long)]
    seed: Option<u64>,
    #[clap(long, value_enum, default_value = "base")]
    strategy: Strategy,
    /// The deepest nesting searched for base cases with `--strategy base`
    #[clap(long, short)]
    depth: Option<usize>,
    /// Comma-separated weights, one per constructor
    ///
    /// These only apply to the outermost constructor, nested values use the
    /// type's declared weights.
    #[clap(long, value_delimiter = ',')]
    weights: Option<Vec<u32>>,
    /// TOML file with defaults for the options above
    #[clap(long)]
    config: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum DemoType {
    Tree,
    Expr,
    Nat,
    Color,
    Point,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum Strategy {
    /// Pick constructors by weight without bounding recursion
    Unsized,
    /// Shrink the size at every constructor
    Rec,
    /// Shrink the size and switch to base cases at size zero
    Base,
}

/// Everything the subcommands need to know about a demo type.
trait Demo: Generic + BaseCase + Depth + fmt::Display {}

impl<T: Generic + BaseCase + Depth + fmt::Display> Demo for T {}

macro_rules! with_demo {
    ($ty:expr, $f:ident($($arg:expr),*)) => {
        match $ty {
            DemoType::Tree => $f::<demo::Tree>($($arg),*),
            DemoType::Expr => $f::<demo::Expr>($($arg),*),
            DemoType::Nat => $f::<demo::Nat>($($arg),*),
            DemoType::Color => $f::<demo::Color>($($arg),*),
            DemoType::Point => $f::<demo::Point>($($arg),*),
        }
    };
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.cmd {
        Cmd::Shape { ty } => with_demo!(ty, shape()),
        Cmd::Sample(opts) => {
            let settings = Settings::new(&opts, 10)?;
            with_demo!(opts.ty, sample(&settings))
        }
        Cmd::BaseCases { ty, depth } => with_demo!(ty, base_cases(depth)),
        Cmd::Freq(opts) => {
            let settings = Settings::new(&opts, 10_000)?;
            with_demo!(opts.ty, freq(&settings))
        }
    }
}

/// Command-line options merged with the config file.
struct Settings {
    size: u32,
    count: usize,
    seed: u64,
    strategy: Strategy,
    depth: usize,
    weights: Option<Vec<u32>>,
    config: Config,
}

impl Settings {
    fn new(opts: &Opts, default_count: usize) -> Result<Settings> {
        let config = match &opts.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };
        Ok(Settings::merge(opts, config, default_count))
    }

    /// Flags take precedence over `config`.
    fn merge(opts: &Opts, config: Config, default_count: usize) -> Settings {
        let seed = opts
            .seed
            .or(config.seed)
            .unwrap_or_else(wgen::rand::random);
        Settings {
            size: opts
                .size
                .or(config.size)
                .unwrap_or_else(|| Context::default().size()),
            count: opts.count.or(config.samples).unwrap_or(default_count),
            seed,
            strategy: opts.strategy,
            depth: opts.depth.or(config.base_depth).unwrap_or(5),
            weights: opts.weights.clone(),
            config,
        }
    }

    /// Weights from the command line, then the config file, then the ones
    /// declared on the type.
    fn weights<T: Generic>(&self) -> Result<Weights<T>> {
        if let Some(weights) = &self.weights {
            return Ok(Weights::from_slice(weights)?);
        }
        Ok(self
            .config
            .weights_for::<T>()?
            .unwrap_or_else(Weights::declared))
    }

    fn generator<T: Demo>(&self) -> Result<Gen<T>> {
        let weights = self.weights::<T>()?;
        tracing::info!(
            ty = T::NAME,
            strategy = ?self.strategy,
            size = self.size,
            seed = self.seed,
            ?weights,
            "generating"
        );
        Ok(match self.strategy {
            Strategy::Unsized => wgen::generic(weights),
            Strategy::Rec => wgen::generic_rec(weights),
            Strategy::Base => wgen::generic_with_base(self.depth, weights)?,
        })
    }

    fn rng(&self) -> SmallRng {
        SmallRng::seed_from_u64(self.seed)
    }
}

fn shape<T: Demo>() -> Result<()> {
    println!("{}", T::describe());
    let weights = Weights::<T>::declared();
    for constructor in 0..T::CONSTRUCTORS {
        println!(
            "  {constructor}: {:<8} arity {}  weight {}",
            T::constructor_name(constructor),
            T::arity(constructor),
            weights.get(constructor),
        );
    }
    Ok(())
}

fn sample<T: Demo>(settings: &Settings) -> Result<()> {
    let gen = settings.generator::<T>()?;
    let mut rng = settings.rng();
    for value in gen.samples(settings.size, settings.count, &mut rng) {
        tracing::debug!(depth = value.depth(), "sampled");
        println!("{value}");
    }
    Ok(())
}

fn base_cases<T: Demo>(depth: usize) -> Result<()> {
    let Some(cases) = T::base_case(depth) else {
        bail!(wgen::Error::NoBaseCase { ty: T::NAME, depth });
    };
    println!("{} base cases at depth {}", T::NAME, cases.depth());
    let mut rng = SmallRng::seed_from_u64(0);
    for constructor in cases.constructors() {
        let Some(witness) = cases.witness(constructor) else {
            continue;
        };
        let value = witness.generate(&mut Context::new(0), &mut rng);
        println!("  {:<8} {value}", T::constructor_name(constructor));
    }
    Ok(())
}

/// How often each constructor was picked at the outermost level, and the
/// depths of the generated values.
struct Frequencies {
    counts: Vec<usize>,
    depths: Vec<usize>,
}

fn frequencies<T: Demo>(settings: &Settings) -> Result<Frequencies> {
    let gen = settings.generator::<T>()?;
    let mut rng = settings.rng();
    let values = gen.samples(settings.size, settings.count, &mut rng);
    let picked = values.iter().map(|v| v.constructor_index()).counts();
    Ok(Frequencies {
        counts: (0..T::CONSTRUCTORS)
            .map(|c| picked.get(&c).copied().unwrap_or_default())
            .collect(),
        depths: values.iter().map(|v| v.depth()).collect_vec(),
    })
}

fn freq<T: Demo>(settings: &Settings) -> Result<()> {
    let weights = settings.weights::<T>()?;
    let Frequencies { counts, depths } = frequencies::<T>(settings)?;
    let total = depths.len().max(1) as f64;

    println!(
        "{:<8} {:>7} {:>9} {:>9}",
        "ctor", "weight", "expected", "observed"
    );
    for (constructor, &observed) in counts.iter().enumerate() {
        println!(
            "{:<8} {:>7} {:>8.1}% {:>8.1}%",
            T::constructor_name(constructor),
            weights.get(constructor),
            100.0 * weights.ratio(constructor),
            100.0 * observed as f64 / total,
        );
    }
    if let (Some(min), Some(max)) = (depths.iter().min(), depths.iter().max()) {
        let mean = depths.iter().sum::<usize>() as f64 / depths.len() as f64;
        println!("depth: min {min}, max {max}, mean {mean:.2}");
    }
    Ok(())
}

#[cfg(test)]
mod tests;
