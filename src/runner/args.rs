use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct ClassifyArgs {
    /// FASTA file of the query assembly to type
    #[arg(short = 'i', long)]
    pub query: PathBuf,
    /// Database directory
    #[arg(short = 'b', long)]
    pub db: PathBuf,
    /// Organism whose marker set and tree to classify against
    #[arg(short = 'r', long)]
    pub organism: String,
    /// Number of non-derived markers tolerated along the accepted path
    #[arg(short = 'c', long, default_value_t = 0)]
    pub threshold: usize,
    /// Worker limit for per-reference alignment and parsing (0 = one per core)
    #[arg(short = 'n', long, default_value_t = 0)]
    pub num_threads: usize,
    /// Where temporary files are stored [default: system tmp]
    #[arg(short = 'f', long)]
    pub tmp_path: Option<PathBuf>,
    /// Path to the progressiveMauve binary
    #[arg(short = 'm', long, default_value = "progressiveMauve")]
    pub mauve_path: String,
    /// Reuse alignment files already in the tmp dir instead of aligning
    #[arg(long, default_value_t = false)]
    pub skip_align: bool,
    /// Keep the alignment files after the run
    #[arg(short = 's', long, default_value_t = false)]
    pub save_align: bool,
    /// Print the result as a single tab-separated line
    #[arg(short = 't', long, default_value_t = false)]
    pub tab_sep: bool,
    /// Also list the call state of every marker
    #[arg(short = 'l', long, default_value_t = false)]
    pub list_calls: bool,
    #[arg(short = 'v', long, default_value_t = false)]
    pub verbose: bool,
    /// Write the report here instead of stdout
    #[arg(short = 'o', long)]
    pub out: Option<PathBuf>,
}
