//! Flat-file marker database.
//!
//! One directory per organism under the database root:
//!
//! ```text
//! <db>/<organism>/markers.tsv            marker table (7 tab-separated columns)
//! <db>/<organism>/tree.txt               semicolon-path tree structure
//! <db>/<organism>/sequences/<strain>.fa  reference genomes (optionally .gz)
//! ```
//!
//! The marker table uses the exchange format
//! `SNP  Organism  Reference  Strain  Position  Derived  Ancestral`
//! where `Reference` is the publication and `Strain` names the genome whose
//! coordinates `Position` is expressed in. Lines starting with `#` are
//! comments.

use std::fs::{self, File};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use bio::io::fasta;
use flate2::read::MultiGzDecoder;
use rustc_hash::FxHashMap;

use crate::model::{Marker, MarkerTree};

/// Open a text file, transparently decompressing `.gz`.
pub fn open_text(path: &Path) -> Result<Box<dyn BufRead>> {
    let file = File::open(path).with_context(|| format!("cannot open {}", path.display()))?;
    if path.extension().is_some_and(|e| e == "gz") {
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

#[derive(Debug, Clone)]
pub struct Database {
    root: PathBuf,
}

impl Database {
    pub fn open(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn organism_dir(&self, organism: &str) -> PathBuf {
        self.root.join(organism)
    }

    fn markers_path(&self, organism: &str) -> PathBuf {
        self.organism_dir(organism).join("markers.tsv")
    }

    fn tree_path(&self, organism: &str) -> PathBuf {
        self.organism_dir(organism).join("tree.txt")
    }

    fn sequences_dir(&self, organism: &str) -> PathBuf {
        self.organism_dir(organism).join("sequences")
    }

    /// All markers registered for an organism, in file order.
    pub fn markers(&self, organism: &str) -> Result<Vec<Marker>> {
        let path = self.markers_path(organism);
        let reader = open_text(&path)?;
        let mut markers = Vec::new();
        for (lineno, line) in reader.lines().enumerate() {
            let line = line?;
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            match parse_marker_line(&line) {
                Some(marker) => markers.push(marker),
                None => eprintln!(
                    "[WARN] skipping malformed marker line {} in {}",
                    lineno + 1,
                    path.display()
                ),
            }
        }
        Ok(markers)
    }

    /// Markers whose coordinates live on `strain`, in file order.
    pub fn markers_for_strain(&self, organism: &str, strain: &str) -> Result<Vec<Marker>> {
        let mut markers = self.markers(organism)?;
        markers.retain(|m| m.strain == strain);
        Ok(markers)
    }

    /// The organism's marker tree, rebuilt from its semicolon-path file.
    pub fn tree(&self, organism: &str) -> Result<MarkerTree> {
        let path = self.tree_path(organism);
        let reader = open_text(&path)?;
        let mut tree = MarkerTree::new();
        for line in reader.lines() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let nodes: Vec<&str> = line.split(';').filter(|n| !n.is_empty()).collect();
            tree.add_path(&nodes);
        }
        Ok(tree)
    }

    /// Reference strains with a stored genome, sorted by name for a
    /// deterministic processing (and merge) order.
    pub fn reference_strains(&self, organism: &str) -> Result<Vec<String>> {
        let dir = self.sequences_dir(organism);
        let entries = fs::read_dir(&dir)
            .with_context(|| format!("no reference sequences under {}", dir.display()))?;
        let mut strains = Vec::new();
        for entry in entries {
            let name = entry?.file_name();
            let name = name.to_string_lossy();
            if let Some(strain) = name.strip_suffix(".fa.gz").or_else(|| name.strip_suffix(".fa")) {
                strains.push(strain.to_string());
            }
        }
        strains.sort();
        Ok(strains)
    }

    /// Path of a stored reference genome (`.fa`, falling back to `.fa.gz`).
    pub fn sequence_path(&self, organism: &str, strain: &str) -> Result<PathBuf> {
        let plain = self.sequences_dir(organism).join(format!("{strain}.fa"));
        if plain.is_file() {
            return Ok(plain);
        }
        let gz = self.sequences_dir(organism).join(format!("{strain}.fa.gz"));
        if gz.is_file() {
            return Ok(gz);
        }
        bail!("no stored sequence for strain '{strain}' of {organism}")
    }

    /// Import a marker exchange file. Later lines with an already-imported
    /// SNP id replace the earlier entry; short lines are skipped with a
    /// warning. Returns the number of markers stored.
    pub fn import_markers(&self, organism: &str, file: &Path) -> Result<usize> {
        let reader = open_text(file)?;
        let mut order: Vec<String> = Vec::new();
        let mut rows: FxHashMap<String, String> = FxHashMap::default();
        for line in reader.lines() {
            let line = line?;
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let fields: Vec<&str> = line.trim().split('\t').collect();
            if fields.len() != 7 || fields[4].parse::<usize>().is_err() {
                eprintln!("[WARN] skipping: {line}");
                continue;
            }
            let id = fields[0].to_string();
            if !rows.contains_key(&id) {
                order.push(id.clone());
            }
            rows.insert(id, fields.join("\t"));
        }

        let dir = self.organism_dir(organism);
        fs::create_dir_all(&dir)?;
        let mut out = File::create(self.markers_path(organism))?;
        writeln!(out, "#SNP\tOrganism\tReference\tStrain\tPosition\tDerived\tAncestral")?;
        for id in &order {
            writeln!(out, "{}", rows[id])?;
        }
        Ok(order.len())
    }

    /// Import a tree-structure file of semicolon-separated root-to-node
    /// paths (one per line, `#` comments). The assembled tree must have a
    /// unique root. Returns the number of nodes stored.
    pub fn import_tree(&self, organism: &str, file: &Path) -> Result<usize> {
        let reader = open_text(file)?;
        let mut tree = MarkerTree::new();
        let mut kept: Vec<String> = Vec::new();
        for line in reader.lines() {
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let nodes: Vec<&str> = trimmed.split(';').filter(|n| !n.is_empty()).collect();
            tree.add_path(&nodes);
            kept.push(trimmed.to_string());
        }
        tree.root()
            .with_context(|| format!("tree file {} rejected", file.display()))?;

        let dir = self.organism_dir(organism);
        fs::create_dir_all(&dir)?;
        let mut out = File::create(self.tree_path(organism))?;
        for line in &kept {
            writeln!(out, "{line}")?;
        }
        Ok(tree.node_count())
    }

    /// Import a reference genome FASTA (optionally gzipped) for `strain`.
    ///
    /// Every record is validated against the `A,T,C,G,N` alphabet and the
    /// records are stored concatenated under a single
    /// `>{organism}.{strain}` header, which is the shape the aligner is
    /// later fed.
    pub fn import_sequence(&self, organism: &str, strain: &str, file: &Path) -> Result<()> {
        let reader = fasta::Reader::new(open_text(file)?);
        let mut seq: Vec<u8> = Vec::new();
        for record in reader.records() {
            let record = record.with_context(|| format!("bad FASTA in {}", file.display()))?;
            if let Some(offset) = record
                .seq()
                .iter()
                .position(|b| !matches!(b, b'A' | b'T' | b'C' | b'G' | b'N'))
            {
                bail!(
                    "non-ATCGN character in {} (record '{}', position {})",
                    file.display(),
                    record.id(),
                    offset + 1
                );
            }
            seq.extend_from_slice(record.seq());
        }
        if seq.is_empty() {
            bail!("no sequence data in {}", file.display());
        }

        let dir = self.sequences_dir(organism);
        fs::create_dir_all(&dir)?;
        let path = dir.join(format!("{strain}.fa"));
        let mut out = File::create(&path)?;
        writeln!(out, ">{organism}.{strain}")?;
        out.write_all(&seq)?;
        writeln!(out)?;
        Ok(())
    }
}

fn parse_marker_line(line: &str) -> Option<Marker> {
    let fields: Vec<&str> = line.trim().split('\t').collect();
    if fields.len() != 7 {
        return None;
    }
    let position = fields[4].parse().ok()?;
    let derived = *fields[5].as_bytes().first()?;
    let ancestral = *fields[6].as_bytes().first()?;
    Some(Marker {
        id: fields[0].to_string(),
        strain: fields[3].to_string(),
        position,
        derived,
        ancestral,
    })
}
