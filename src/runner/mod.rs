//! Per-reference orchestration: aligner fan-out, call extraction, merge and
//! final classification.
//!
//! One task per reference strain runs the aligner and parses its XMFA;
//! tasks are independent, so they run on the rayon pool and each returns
//! its own call map. The merge is sequential in strain order with the last
//! write winning, so a marker mapped on several references resolves
//! deterministically. A failed reference becomes a warning on the run, not
//! an abort: its siblings still contribute calls.

pub mod args;

pub use args::ClassifyArgs;

use std::fs::{self, File};
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{bail, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;

use crate::classify::{Classification, TreeWalker};
use crate::config::Config;
use crate::model::CallMap;
use crate::report;
use crate::storage::{open_text, Database};
use crate::xmfa;

/// Everything a reporting collaborator needs about one run.
#[derive(Debug)]
pub struct RunSummary {
    pub classification: Classification,
    pub calls: CallMap,
    /// One entry per reference whose alignment or parsing failed.
    pub reference_warnings: Vec<String>,
}

pub fn run(args: ClassifyArgs) -> Result<()> {
    let num_threads = if args.num_threads == 0 {
        num_cpus::get()
    } else {
        args.num_threads
    };
    rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build_global()
        .context("Failed to build thread pool")?;

    let config = Config {
        organism: args.organism.clone(),
        db_path: args.db.clone(),
        tmp_path: args
            .tmp_path
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("cantyper")),
        mauve_path: args.mauve_path.clone(),
        num_threads,
        threshold: args.threshold,
        skip_align: args.skip_align,
        save_align: args.save_align,
        verbose: args.verbose,
    };

    if !args.query.is_file() {
        bail!("no such query file: {}", args.query.display());
    }
    fs::create_dir_all(&config.tmp_path)
        .with_context(|| format!("cannot create tmp dir {}", config.tmp_path.display()))?;

    let db = Database::open(&config.db_path);
    let summary = classify_query(&db, &config, &args.query)?;

    let query_name = args
        .query
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| args.query.display().to_string());

    let stdout = io::stdout();
    let mut writer: Box<dyn Write> = if let Some(path) = &args.out {
        Box::new(BufWriter::new(File::create(path)?))
    } else {
        Box::new(BufWriter::new(stdout.lock()))
    };
    report::write_report(&mut writer, &query_name, &summary, args.tab_sep)?;
    if args.list_calls {
        report::write_calls(&mut writer, &summary.calls)?;
    }
    Ok(())
}

/// Align the query against every reference strain of the organism, merge the
/// per-reference call maps and walk the marker tree.
pub fn classify_query(db: &Database, config: &Config, query: &Path) -> Result<RunSummary> {
    let strains = db.reference_strains(&config.organism)?;
    if strains.is_empty() {
        bail!(
            "no reference strains stored for organism '{}'",
            config.organism
        );
    }
    if config.verbose {
        eprintln!(
            "[INFO] aligning {} against {} reference strain(s)",
            query.display(),
            strains.len()
        );
    }

    let bar = ProgressBar::new(strains.len() as u64);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len}")
            .unwrap(),
    );

    let outcomes: Vec<(String, Result<CallMap>)> = strains
        .par_iter()
        .map(|strain| {
            let result = process_reference(db, config, query, strain);
            bar.inc(1);
            (strain.clone(), result)
        })
        .collect();
    bar.finish_and_clear();

    // Sequential merge in strain order; last write wins for markers mapped
    // on more than one reference.
    let mut calls = CallMap::default();
    let mut reference_warnings = Vec::new();
    for (strain, outcome) in outcomes {
        match outcome {
            Ok(map) => {
                if config.verbose {
                    eprintln!("[INFO] {strain}: {} marker call(s)", map.len());
                }
                calls.extend(map);
            }
            Err(err) => reference_warnings.push(format!("{strain}: {err:#}")),
        }
    }

    let tree = db.tree(&config.organism)?;
    let walker = TreeWalker::new(&tree, &calls, config.threshold);
    let classification = walker.classify()?;

    Ok(RunSummary {
        classification,
        calls,
        reference_warnings,
    })
}

/// Run the aligner for one reference strain and extract its marker calls.
fn process_reference(
    db: &Database,
    config: &Config,
    query: &Path,
    strain: &str,
) -> Result<CallMap> {
    let markers = db.markers_for_strain(&config.organism, strain)?;
    let xmfa_file = xmfa_path(config, query, strain);

    if !config.skip_align {
        align_reference(db, config, query, strain, &xmfa_file)?;
    }

    let mut text = String::new();
    open_text(&xmfa_file)?.read_to_string(&mut text)?;
    let calls = xmfa::extract_calls(&text, strain, &markers)?;

    if !config.save_align && !config.skip_align {
        let _ = fs::remove_file(&xmfa_file);
    }
    Ok(calls)
}

/// Alignment file produced for one query/reference pair.
fn xmfa_path(config: &Config, query: &Path, strain: &str) -> PathBuf {
    let stem = query
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "query".to_string());
    config
        .tmp_path
        .join(format!("{stem}.cantyper.{strain}.xmfa"))
}

/// Invoke progressiveMauve for one reference/query pair.
///
/// The aligner is a black box: stdout is discarded and any stderr output or
/// non-zero exit marks the reference as failed.
fn align_reference(
    db: &Database,
    config: &Config,
    query: &Path,
    strain: &str,
    xmfa_file: &Path,
) -> Result<()> {
    let reference = materialize_reference(db, config, strain)?;

    let output = Command::new(&config.mauve_path)
        .arg(format!("--output={}", xmfa_file.display()))
        .arg(reference.path())
        .arg(query)
        .output()
        .with_context(|| format!("could not start aligner '{}'", config.mauve_path))?;

    let stderr = String::from_utf8_lossy(&output.stderr);
    if !output.status.success() || !stderr.trim().is_empty() {
        bail!("aligner failed for {strain}:\n{}", stderr.trim());
    }
    Ok(())
}

/// Reference FASTA on disk in a form the aligner can read, decompressing
/// into the tmp dir when the stored copy is gzipped.
fn materialize_reference(db: &Database, config: &Config, strain: &str) -> Result<ReferenceFasta> {
    let stored = db.sequence_path(&config.organism, strain)?;
    if stored.extension().is_some_and(|e| e == "gz") {
        let tmp = config
            .tmp_path
            .join(format!("cantyper_reference.{strain}.fa"));
        let mut reader = open_text(&stored)?;
        let mut out = File::create(&tmp)?;
        io::copy(&mut reader, &mut out)?;
        Ok(ReferenceFasta::Temporary(tmp))
    } else {
        Ok(ReferenceFasta::Stored(stored))
    }
}

enum ReferenceFasta {
    Stored(PathBuf),
    Temporary(PathBuf),
}

impl ReferenceFasta {
    fn path(&self) -> &Path {
        match self {
            ReferenceFasta::Stored(p) | ReferenceFasta::Temporary(p) => p,
        }
    }
}

impl Drop for ReferenceFasta {
    fn drop(&mut self) {
        if let ReferenceFasta::Temporary(p) = self {
            let _ = fs::remove_file(p);
        }
    }
}
