use crate::error::TyperError;

/// Strand orientation of an aligned sequence relative to its original.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strand {
    Forward,
    Reverse,
}

/// Parsed `> seqid:start-end strand [path]` header of one aligned sequence.
///
/// `start`/`end` are 1-based inclusive coordinates on the original strand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockHeader {
    pub seq_id: String,
    pub start: usize,
    pub end: usize,
    pub strand: Strand,
}

/// One pairwise alignment record: reference row first, target row second,
/// both the same length over `A,C,G,T,N` plus IUPAC codes and `-`.
#[derive(Debug, Clone)]
pub struct AlignmentBlock {
    pub reference: BlockHeader,
    pub target: BlockHeader,
    pub ref_row: String,
    pub target_row: String,
}

/// Parse one sequence header line (without the leading `> `).
pub fn parse_header(line: &str) -> Result<BlockHeader, TyperError> {
    let malformed = || TyperError::MalformedAlignment(line.to_string());

    let mut fields = line.split_whitespace();
    let locus = fields.next().ok_or_else(malformed)?;
    let strand = match fields.next() {
        Some("+") => Strand::Forward,
        Some("-") => Strand::Reverse,
        _ => return Err(malformed()),
    };

    let (seq_id, span) = locus.split_once(':').ok_or_else(malformed)?;
    let (start, end) = span.split_once('-').ok_or_else(malformed)?;
    let start: usize = start.parse().map_err(|_| malformed())?;
    let end: usize = end.parse().map_err(|_| malformed())?;

    Ok(BlockHeader {
        seq_id: seq_id.to_string(),
        start,
        end,
        strand,
    })
}

/// Split whole-file XMFA text into per-block chunks (`=` delimited).
pub fn split_blocks(text: &str) -> impl Iterator<Item = &str> {
    text.split('=')
}

/// Parse one block chunk into a pairwise record.
///
/// Blocks holding fewer than two sequences have no reference/query pairing
/// and yield `None`. Anything before the first `> ` (comment lines, the
/// format header) is ignored.
pub fn parse_block(chunk: &str) -> Result<Option<AlignmentBlock>, TyperError> {
    let mut entries = chunk.trim().split("> ");
    // Leading chunk before the first header; headers only from here on.
    let _preamble = entries.next();

    let mut parsed = Vec::with_capacity(2);
    for entry in entries.take(2) {
        let mut lines = entry.lines();
        let header = lines
            .next()
            .ok_or_else(|| TyperError::MalformedAlignment(entry.to_string()))?;
        let header = parse_header(header)?;
        let row: String = lines.flat_map(|l| l.trim_end().chars()).collect();
        parsed.push((header, row));
    }

    if parsed.len() < 2 {
        return Ok(None);
    }
    let (target, target_row) = parsed.pop().unwrap();
    let (reference, ref_row) = parsed.pop().unwrap();
    if ref_row.len() != target_row.len() {
        return Err(TyperError::MalformedAlignment(format!(
            "rows of unequal length in block {}:{}-{}",
            reference.seq_id, reference.start, reference.end
        )));
    }
    Ok(Some(AlignmentBlock {
        reference,
        target,
        ref_row,
        target_row,
    }))
}
