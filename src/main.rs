//! stripecast - erasure-coded file striping with scattered placement
//!
//! Usage:
//!   stripecast encode <file>       - Stripe a file into shard files
//!   stripecast inspect <manifest>  - Summarize an encode manifest

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use stripecast::{
    config::EncodeConfig,
    encoder::FileEncoder,
    manifest::EncodeManifest,
    Result,
};
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "stripecast")]
#[command(author = "stripecast Contributors")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Erasure-coded file striping with scattered placement")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Stripe a file into K+M shard files plus a manifest
    Encode {
        /// Input file to encode
        input: PathBuf,

        /// Number of data shards per stripe (K)
        #[arg(long, default_value_t = 4)]
        data: usize,

        /// Number of parity shards per stripe (M)
        #[arg(long, default_value_t = 2)]
        parity: usize,

        /// Shard block size in bytes
        #[arg(long, default_value_t = 1024)]
        block_size: usize,

        /// Output directory (defaults to the input's directory)
        #[arg(long)]
        out: Option<PathBuf>,

        /// Fixed placement seed (random when omitted)
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Print a summary of an encode manifest
    Inspect {
        /// Manifest file path
        manifest: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set subscriber");

    if let Err(e) = run_command(cli.command) {
        error!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run_command(command: Commands) -> Result<()> {
    match command {
        Commands::Encode {
            input,
            data,
            parity,
            block_size,
            out,
            seed,
        } => cmd_encode(input, data, parity, block_size, out, seed),

        Commands::Inspect { manifest } => cmd_inspect(&manifest),
    }
}

fn cmd_encode(
    input: PathBuf,
    data: usize,
    parity: usize,
    block_size: usize,
    out: Option<PathBuf>,
    seed: Option<u64>,
) -> Result<()> {
    let mut config = EncodeConfig::new(data, parity, block_size);
    if let Some(dir) = out {
        config = config.with_output_dir(dir);
    }

    let mut encoder = FileEncoder::new(config)?;
    if let Some(seed) = seed {
        encoder = encoder.with_placement_seed(seed);
    }

    let report = encoder.run(&input)?;

    info!("Encode complete in {:?}", report.duration);
    println!("Input: {:?} ({} bytes)", input, report.file_size);
    println!("File hash: {}", report.file_hash);
    println!("Stripes: {}", report.stripe_count);
    println!(
        "Destinations: {} files, {} bytes written total",
        report.destination_paths.len(),
        report.bytes_written
    );
    println!("Manifest: {:?}", report.manifest_path);

    Ok(())
}

fn cmd_inspect(path: &PathBuf) -> Result<()> {
    let manifest = EncodeManifest::load(path)?;

    println!("Manifest {:?}", path);
    println!("==========");
    println!("File: {} ({} bytes)", manifest.file_name, manifest.file_size);
    println!("File hash: {}", manifest.file_hash);
    println!(
        "Geometry: K={}, M={}, block size {} bytes",
        manifest.data_shards, manifest.parity_shards, manifest.block_size
    );
    println!("Placement seed: {}", manifest.placement_seed);
    println!("Stripes: {}", manifest.stripe_count());

    for record in &manifest.stripes {
        println!(
            "  stripe {}: placement {:?}",
            record.index,
            record.placement.as_slice()
        );
    }

    Ok(())
}
