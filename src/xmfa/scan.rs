use crate::error::TyperError;
use crate::model::{CallMap, Marker, MarkerCall};

use super::block::{parse_block, split_blocks, Strand};

/// IUPAC complement of a single target base. Gaps complement to themselves;
/// anything outside the table is rejected rather than passed through.
pub fn complement(base: u8) -> Result<u8, TyperError> {
    Ok(match base {
        b'A' => b'T',
        b'T' => b'A',
        b'C' => b'G',
        b'G' => b'C',
        b'R' => b'Y',
        b'Y' => b'R',
        b'W' => b'S',
        b'S' => b'W',
        b'K' => b'M',
        b'M' => b'K',
        b'D' => b'H',
        b'H' => b'D',
        b'V' => b'B',
        b'B' => b'V',
        b'N' => b'N',
        b'X' => b'X',
        b'-' => b'-',
        other => return Err(TyperError::InvalidBase(other as char)),
    })
}

/// Alignment column holding the `rel`-th ungapped reference base, walking
/// `columns` in the reference's original 5'->3' direction.
fn locate_column<I>(ref_row: &[u8], rel: usize, columns: I) -> Option<usize>
where
    I: Iterator<Item = usize>,
{
    let mut ungapped = 0usize;
    for col in columns {
        if ref_row[col] != b'-' {
            ungapped += 1;
            if ungapped == rel {
                return Some(col);
            }
        }
    }
    None
}

/// Determine the call state of one marker from a single aligned block pair.
///
/// Walks the reference row converting alignment columns to ungapped
/// reference positions (gap columns do not advance the counter; on `-`
/// strand the columns are walked in decreasing order so the counter still
/// advances along the original strand). The target base at the marker's
/// column is complemented on `-` strand before comparison.
///
/// The marker is expected to lie within the block span starting at
/// `block_start`; positions before the block resolve to `NotFound`.
pub fn call_marker(
    ref_row: &[u8],
    target_row: &[u8],
    strand: Strand,
    block_start: usize,
    marker: &Marker,
) -> Result<MarkerCall, TyperError> {
    debug_assert_eq!(ref_row.len(), target_row.len());

    let Some(rel) = (marker.position + 1).checked_sub(block_start) else {
        return Ok(MarkerCall::NotFound);
    };
    let column = match strand {
        Strand::Forward => locate_column(ref_row, rel, 0..ref_row.len()),
        Strand::Reverse => locate_column(ref_row, rel, (0..ref_row.len()).rev()),
    };

    let observed = match column {
        Some(col) => {
            let base = target_row[col];
            match strand {
                Strand::Forward => base,
                Strand::Reverse => complement(base)?,
            }
        }
        None => return Ok(MarkerCall::NotFound),
    };

    Ok(if observed == marker.derived {
        MarkerCall::Derived
    } else if observed == marker.ancestral {
        MarkerCall::Ancestral
    } else {
        MarkerCall::NotFound
    })
}

/// Scan a whole XMFA file and call every marker of one reference strain.
///
/// Markers are sorted ascending by position and consumed with a single
/// forward cursor, so the scan is linear in the alignment length. A block
/// resolves the pending marker only when the position lies strictly inside
/// its `[start, end]` span, and keeps resolving markers while the next
/// pending position still falls before `end`.
///
/// Precondition: progressiveMauve emits blocks in increasing reference
/// coordinate order. A marker position no block covers stays pending, and
/// it (plus any markers behind it that later blocks have already passed)
/// ends up absent from the map; the classifier reports such markers as
/// missing.
pub fn extract_calls(
    xmfa_text: &str,
    reference: &str,
    markers: &[Marker],
) -> Result<CallMap, TyperError> {
    if markers.is_empty() {
        return Err(TyperError::NoMarkers(reference.to_string()));
    }
    let mut sorted: Vec<&Marker> = markers.iter().collect();
    sorted.sort_by_key(|m| m.position);
    let mut pending = sorted.into_iter().peekable();

    let mut calls = CallMap::default();
    for chunk in split_blocks(xmfa_text) {
        let Some(first) = pending.peek() else { break };
        let Some(block) = parse_block(chunk)? else {
            continue;
        };
        let head = &block.reference;
        if !(head.start < first.position && first.position < head.end) {
            continue;
        }
        while let Some(&marker) = pending.peek() {
            if marker.position >= head.end {
                break;
            }
            let call = call_marker(
                block.ref_row.as_bytes(),
                block.target_row.as_bytes(),
                head.strand,
                head.start,
                marker,
            )?;
            calls.insert(marker.id.clone(), call);
            pending.next();
        }
    }
    Ok(calls)
}
