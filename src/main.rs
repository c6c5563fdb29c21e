use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};

use cantyper::report;
use cantyper::runner::{self, ClassifyArgs};
use cantyper::storage::Database;

#[derive(Parser)]
#[command(name = "cantyper")]
#[command(version)]
#[command(about = "canSNP-based lineage typing of whole-genome sequences", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify a query assembly against an organism's canSNP tree
    Classify(ClassifyArgs),

    /// Import a tab-separated marker table into the database
    ImportMarkers(ImportMarkersArgs),

    /// Import a tree-structure file into the database
    ImportTree(ImportTreeArgs),

    /// Import a reference genome FASTA into the database
    ImportSequence(ImportSequenceArgs),

    /// Print an organism's marker tree in Newick format
    Newick(TreeArgs),
}

#[derive(Args)]
struct ImportMarkersArgs {
    /// Database directory
    #[arg(short = 'b', long)]
    db: PathBuf,
    /// Organism the markers belong to
    #[arg(short = 'r', long)]
    organism: String,
    /// Marker file: SNP, Organism, Reference, Strain, Position, Derived,
    /// Ancestral (tab-separated, '#' comments)
    file: PathBuf,
}

#[derive(Args)]
struct ImportTreeArgs {
    /// Database directory
    #[arg(short = 'b', long)]
    db: PathBuf,
    /// Organism the tree belongs to
    #[arg(short = 'r', long)]
    organism: String,
    /// Tree file: one semicolon-separated root-to-node path per line
    file: PathBuf,
}

#[derive(Args)]
struct ImportSequenceArgs {
    /// Database directory
    #[arg(short = 'b', long)]
    db: PathBuf,
    /// Organism the strain belongs to
    #[arg(short = 'r', long)]
    organism: String,
    /// Name of the reference strain
    #[arg(long)]
    strain: String,
    /// FASTA file (optionally gzipped)
    file: PathBuf,
}

#[derive(Args)]
struct TreeArgs {
    /// Database directory
    #[arg(short = 'b', long)]
    db: PathBuf,
    /// Organism whose tree to print
    #[arg(short = 'r', long)]
    organism: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Classify(args) => {
            runner::run(args)?;
        }
        Commands::ImportMarkers(args) => {
            let db = Database::open(&args.db);
            let count = db.import_markers(&args.organism, &args.file)?;
            eprintln!("[INFO] imported {count} marker(s) for {}", args.organism);
        }
        Commands::ImportTree(args) => {
            let db = Database::open(&args.db);
            let count = db.import_tree(&args.organism, &args.file)?;
            eprintln!(
                "[INFO] imported tree with {count} node(s) for {}",
                args.organism
            );
        }
        Commands::ImportSequence(args) => {
            let db = Database::open(&args.db);
            db.import_sequence(&args.organism, &args.strain, &args.file)?;
            eprintln!(
                "[INFO] imported sequence for strain {} of {}",
                args.strain, args.organism
            );
        }
        Commands::Newick(args) => {
            let db = Database::open(&args.db);
            let tree = db.tree(&args.organism)?;
            println!("{}", report::to_newick(&tree)?);
        }
    }
    Ok(())
}
