use std::error::Error;
use std::fs;
use std::path::PathBuf;

use bitspin_demos::parsers::{KernelOptions, TraversalOptions};
use bitspin_demos::timing::{RunReport, time_rotations, verify};
use bitspin_rotate::{
    BitMatrix, ColumnRotate, DEFAULT_SUPER_BLOCK_TILES, DeltaSwap, RotateConfig, Rotator,
    TileTranspose,
};
use clap::Parser;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use tracing::warn;
use tracing_forest::ForestLayer;
use tracing_forest::util::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Side length of the matrix in bits. Must be a positive multiple of 64.
    #[arg(short, long, default_value_t = 8192)]
    side: usize,

    /// Seed for the random matrix. Ignored when `--input` is given.
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Raw packed bits to rotate instead of a random matrix; must be exactly side * side / 8 bytes.
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// The order in which tile cycles are visited.
    #[arg(short, long, ignore_case = true, value_enum, default_value_t = TraversalOptions::SuperBlock)]
    traversal: TraversalOptions,

    /// Side length of a super-block, in tiles.
    #[arg(long, default_value_t = DEFAULT_SUPER_BLOCK_TILES)]
    super_block_tiles: usize,

    /// The kernel used to rotate individual 64x64 tiles.
    #[arg(short, long, ignore_case = true, value_enum, default_value_t = KernelOptions::ColumnRotate)]
    kernel: KernelOptions,

    /// Spread the sweep over the rayon thread pool (needs the `parallel` feature).
    #[arg(long)]
    parallel: bool,

    /// How many timed rotations to run.
    #[arg(short, long, default_value_t = 4)]
    repeat: usize,

    /// Check the rotation before timing it.
    #[arg(long)]
    verify: bool,

    /// Print the run report as JSON on stdout.
    #[arg(long)]
    json: bool,
}

fn run<K: TileTranspose>(
    kernel: K,
    kernel_name: &'static str,
    args: &Args,
    mut matrix: BitMatrix,
) -> Result<RunReport, Box<dyn Error>> {
    let config = RotateConfig::serial(args.traversal.traversal(args.super_block_tiles))
        .with_parallel(args.parallel);
    config.validate()?;
    let rotator = Rotator::new(kernel, config);

    let verified = if args.verify {
        Some(verify(&rotator, &matrix)?)
    } else {
        None
    };

    let durations = time_rotations(&rotator, &mut matrix, args.repeat)?;
    let mut report = RunReport::new(matrix.side(), kernel_name, config, &durations);
    report.verified = verified;
    Ok(report)
}

fn main() -> Result<(), Box<dyn Error>> {
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();

    Registry::default()
        .with(env_filter)
        .with(ForestLayer::default())
        .init();

    let args = Args::parse();
    if args.parallel && !cfg!(feature = "parallel") {
        warn!("--parallel has no effect without the `parallel` feature; rotating serially");
    }

    let matrix = match &args.input {
        Some(path) => BitMatrix::from_bytes(args.side, fs::read(path)?)?,
        None => BitMatrix::random(&mut SmallRng::seed_from_u64(args.seed), args.side)?,
    };

    let report = match args.kernel {
        KernelOptions::ColumnRotate => run(ColumnRotate, "column-rotate", &args, matrix)?,
        KernelOptions::DeltaSwap => run(DeltaSwap, "delta-swap", &args, matrix)?,
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!(
            "Rotated a {side}x{side} bit matrix {n} times with {kernel}: best {best:.6}s, mean {mean:.6}s",
            side = report.side,
            n = report.seconds.len(),
            kernel = report.kernel,
            best = report.best_seconds,
            mean = report.mean_seconds,
        );
        if let Some(ok) = report.verified {
            println!("Verification {}", if ok { "passed" } else { "FAILED" });
        }
    }

    if report.verified == Some(false) {
        return Err("rotation verification failed".into());
    }
    Ok(())
}
