use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Deserialize;
use strum::VariantArray;
use unordered_pair::UnorderedPair;
use witnessline::{Diagram, DiagramStyle, GridGraph, PathCache, Preset, Puzzle, PuzzleBuilder, PuzzleVariant, RegionGrowth, Vertex};

const DEFAULT_CACHE_DIR: &str = ".witnessline-cache";

#[derive(Debug, Parser)]
#[command(name = "solver", about = "Solve single-line grid puzzles by filtering every possible line", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Solve a puzzle file and draw each solution.
    Solve(SolveArgs),

    /// Enumerate the lines of a grid size and store them in the cache.
    Enumerate(EnumerateArgs),

    /// Print the built-in puzzle presets.
    Presets,
}

#[derive(Debug, Args)]
struct SolveArgs {
    /// TOML file describing the puzzle.
    puzzle: PathBuf,

    #[arg(long, default_value = DEFAULT_CACHE_DIR)]
    cache_dir: PathBuf,

    #[arg(long, value_enum, default_value_t = StyleArg::Solution)]
    style: StyleArg,

    /// Draw at most this many solutions; all of them are still counted.
    #[arg(long)]
    limit: Option<usize>,
}

#[derive(Debug, Args)]
struct EnumerateArgs {
    /// Vertices per row.
    #[arg(long)]
    width: usize,

    /// Vertices per column.
    #[arg(long)]
    height: usize,

    #[arg(long, default_value = DEFAULT_CACHE_DIR)]
    cache_dir: PathBuf,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum StyleArg {
    Solution,
    Debug,
}

impl From<StyleArg> for DiagramStyle {
    fn from(value: StyleArg) -> Self {
        match value {
            StyleArg::Solution => DiagramStyle::Solution,
            StyleArg::Debug => DiagramStyle::Debug,
        }
    }
}

/// A puzzle as written down in a TOML file.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PuzzleFile {
    width: usize,
    height: usize,
    preset: String,
    /// One string per row of cells, top row first.
    #[serde(default)]
    cells: Vec<String>,
    /// Pairs of `[x, y]` vertices.
    #[serde(default)]
    broken: Vec<[[usize; 2]; 2]>,
    growth: Option<GrowthSetting>,
}

#[derive(Copy, Clone, Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
enum GrowthSetting {
    Block,
    Pass,
}

impl PuzzleFile {
    fn into_puzzle(self) -> Result<Puzzle> {
        let dims = GridGraph::try_new(self.width, self.height)?.dims();
        let preset = Preset::from_str(&self.preset).with_context(|| format!("unknown preset {:?}", self.preset))?;

        let mut variant = preset.variant();
        match (&mut variant, self.growth) {
            (PuzzleVariant::RegionColor { growth, .. }, Some(setting)) => {
                *growth = match setting {
                    GrowthSetting::Block => RegionGrowth::BrokenEdgesBlock,
                    GrowthSetting::Pass => RegionGrowth::BrokenEdgesPass,
                };
            }
            (PuzzleVariant::TouchCount, Some(_)) => log::warn!("{preset} puzzles have no regions; ignoring growth"),
            (_, None) => {}
        }

        let mut builder = PuzzleBuilder::with_dims(dims);
        builder.variant(variant).break_edges(
            self.broken
                .iter()
                .map(|[a, b]| UnorderedPair(Vertex(a[0], a[1]), Vertex(b[0], b[1]))),
        );
        if !self.cells.is_empty() {
            builder.cells(&self.cells);
        }

        Ok(builder.build()?)
    }
}

fn load_puzzle(path: &Path) -> Result<Puzzle> {
    let text = fs::read_to_string(path).with_context(|| format!("cannot read {}", path.display()))?;
    let file: PuzzleFile = toml::from_str(&text).with_context(|| format!("cannot parse {}", path.display()))?;
    file.into_puzzle().with_context(|| format!("invalid puzzle in {}", path.display()))
}

fn solve(args: SolveArgs) -> Result<()> {
    let puzzle = load_puzzle(&args.puzzle)?;
    log::info!("loaded {}x{} puzzle from {}", puzzle.graph().width(), puzzle.graph().height(), args.puzzle.display());

    let cache = PathCache::new(&args.cache_dir);
    let paths = cache.load_or_compute(puzzle.graph().dims());
    let solutions = puzzle.solutions(&paths)?;

    for (n, solution) in solutions.iter().take(args.limit.unwrap_or(usize::MAX)).enumerate() {
        println!("solution {}:", n + 1);
        println!("{}", Diagram::of_puzzle(&puzzle, solution).style(args.style.into()));
    }
    println!("{} solution(s) among {} complete lines", solutions.len(), paths.complete().len());

    Ok(())
}

fn enumerate(args: EnumerateArgs) -> Result<()> {
    let dims = GridGraph::try_new(args.width, args.height)?.dims();
    let cache = PathCache::new(&args.cache_dir);
    let paths = cache.load_or_compute(dims);
    println!(
        "{}x{}: {} snapshots, {} complete, cached in {}",
        args.width,
        args.height,
        paths.all().len(),
        paths.complete().len(),
        cache.dir().display()
    );
    Ok(())
}

fn presets() {
    for preset in Preset::VARIANTS {
        println!("{:<16} {}", preset.to_string(), preset.description());
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Solve(args) => solve(args),
        Commands::Enumerate(args) => enumerate(args),
        Commands::Presets => {
            presets();
            Ok(())
        }
    }
}
