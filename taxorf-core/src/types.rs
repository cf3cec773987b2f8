use bio::bio_types::strand::Strand;
use thiserror::Error;

/// External taxon identifier as published by the taxonomy source.
///
/// `0` is reserved and means "no taxon" in query results; it never
/// resolves to a node.
pub type TaxId = u32;

/// Location of an open reading frame on one strand of a sequence.
///
/// Offsets are zero-based, `from` inclusive, `to` exclusive, and the stop
/// codon is included in `[from, to)` when one was found. Coordinates on the
/// minus strand are relative to the reverse-complement strand; callers that
/// need forward coordinates reconcile them.
///
/// # Examples
///
/// ```rust
/// use bio::bio_types::strand::Strand;
/// use taxorf_core::types::SequenceLocation;
///
/// let location = SequenceLocation {
///     id: 0,
///     from: 0,
///     to: 9,
///     has_incomplete_start: false,
///     has_incomplete_end: false,
///     strand: Strand::Forward,
/// };
/// assert_eq!(location.to - location.from, 9);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SequenceLocation {
    /// Identifier assigned by the producer (the scanner leaves it at 0).
    pub id: u32,
    /// Inclusive start offset on the strand.
    pub from: usize,
    /// Exclusive end offset on the strand.
    pub to: usize,
    /// No start codon was observed for this region.
    pub has_incomplete_start: bool,
    /// No stop codon was observed; the region runs into the strand end.
    pub has_incomplete_end: bool,
    /// Strand the offsets refer to (`Forward` = plus, `Reverse` = minus).
    pub strand: Strand,
}

/// Error types reported by the taxonomy engine and the ORF finder.
#[derive(Error, Debug)]
pub enum TaxorfError {
    /// Invalid input sequence format or content
    #[error("Invalid sequence: {0}")]
    InvalidSequence(String),
    /// File I/O operation failed
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    /// Error parsing input data
    #[error("Parse error: {0}")]
    ParseError(String),
    /// Taxonomy source files contradict each other
    #[error("Inconsistent taxonomy: {0}")]
    InconsistentTaxonomy(String),
    /// Unsupported genetic code translation table
    #[error("Invalid translation table: {0}")]
    InvalidTranslationTable(u8),
}
