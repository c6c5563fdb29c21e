use std::path::PathBuf;

/// Resolved runtime configuration for one classification run.
///
/// Built once from the parsed command line and passed explicitly to the
/// components that need it.
#[derive(Debug, Clone)]
pub struct Config {
    pub organism: String,
    pub db_path: PathBuf,
    pub tmp_path: PathBuf,
    /// progressiveMauve binary; looked up on PATH when not absolute.
    pub mauve_path: String,
    /// Worker limit for the per-reference fan-out; 0 means one per core.
    pub num_threads: usize,
    /// Maximum number of non-derived markers tolerated along the accepted
    /// path.
    pub threshold: usize,
    /// Reuse alignment files already present in the tmp dir instead of
    /// invoking the aligner.
    pub skip_align: bool,
    /// Keep the per-reference alignment files after the run.
    pub save_align: bool,
    pub verbose: bool,
}
