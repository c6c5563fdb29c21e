use rustc_hash::FxHashMap;

/// A canonical SNP defining one branch point of the lineage tree.
///
/// `position` is 1-based and ungapped, expressed in the coordinates of
/// `strain` (the reference genome the marker was mapped on). A marker belongs
/// to exactly one organism's marker set and is immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    pub id: String,
    /// Reference strain whose coordinate system `position` lives in.
    pub strain: String,
    pub position: usize,
    pub derived: u8,
    pub ancestral: u8,
}

/// Call state of a single marker in the query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerCall {
    /// The query carries the derived allele.
    Derived,
    /// The query carries the ancestral allele.
    Ancestral,
    /// The aligned base matched neither allele (gap or third allele).
    NotFound,
}

impl MarkerCall {
    pub fn as_str(&self) -> &'static str {
        match self {
            MarkerCall::Derived => "derived",
            MarkerCall::Ancestral => "ancestral",
            MarkerCall::NotFound => "not_found",
        }
    }
}

/// Marker id to call state, aggregated across all aligned references.
pub type CallMap = FxHashMap<String, MarkerCall>;
