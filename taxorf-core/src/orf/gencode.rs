//! Genetic code tables providing start and stop codon lists.
//!
//! The scanner does not interpret translation tables itself; it consumes the
//! codon lists a [`GeneticCode`] supplies. Tables follow the NCBI numbering
//! (11 for bacteria and archaea, 4 for Mycoplasma, and so on).

use crate::types::TaxorfError;

/// A codon as three uppercase bytes over `{A, C, G, T}` (U-forms are added
/// by the scanner, not the table).
pub type Codon = [u8; 3];

/// Check if the genetic code table uses only ATG as start codon
const fn uses_only_atg(table: u8) -> bool {
    matches!(table, 6 | 10 | 14 | 15 | 16 | 22)
}

/// Check if GTG is not used as start codon in the given translation table
const fn gtg_not_start(table: u8) -> bool {
    matches!(table, 1 | 3 | 12 | 22)
}

/// Check if TTG is not used as start codon in the given translation table
fn ttg_not_start(table: u8) -> bool {
    table < 4 || table == 9 || (21..25).contains(&table)
}

/// Check if TAG is recognized as stop codon in the given translation table
const fn is_tag_stop(table: u8) -> bool {
    !matches!(table, 6 | 15 | 16 | 22)
}

/// Check if TGA is recognized as stop codon in the given translation table
const fn is_tga_stop(table: u8) -> bool {
    !matches!(table, 2..=5 | 9 | 10 | 13 | 14 | 21 | 25)
}

/// Check if TAA is recognized as stop codon in the given translation table
const fn is_taa_stop(table: u8) -> bool {
    !matches!(table, 6 | 14)
}

/// Start and stop codons of one NCBI translation table.
///
/// # Examples
///
/// ```rust
/// use taxorf_core::orf::gencode::GeneticCode;
///
/// let code = GeneticCode::new(11)?;
/// assert_eq!(code.stop_codons(), [*b"TAA", *b"TAG", *b"TGA"]);
/// # Ok::<(), taxorf_core::types::TaxorfError>(())
/// ```
#[derive(Debug, Clone)]
pub struct GeneticCode {
    table: u8,
    start_codons: Vec<Codon>,
    stop_codons: Vec<Codon>,
}

impl GeneticCode {
    /// Builds the codon lists for `table`.
    ///
    /// # Errors
    ///
    /// Returns [`TaxorfError::InvalidTranslationTable`] for the unassigned
    /// NCBI table numbers (7, 8, 17 through 20) and anything outside 1-25.
    pub fn new(table: u8) -> Result<Self, TaxorfError> {
        if !(1..=25).contains(&table) || table == 7 || table == 8 || (17..=20).contains(&table) {
            return Err(TaxorfError::InvalidTranslationTable(table));
        }

        let mut start_codons = vec![*b"ATG"];
        if !uses_only_atg(table) {
            if !gtg_not_start(table) {
                start_codons.push(*b"GTG");
            }
            if !ttg_not_start(table) {
                start_codons.push(*b"TTG");
            }
        }

        let mut stop_codons = Vec::with_capacity(4);
        if is_taa_stop(table) {
            stop_codons.push(*b"TAA");
        }
        if is_tag_stop(table) {
            stop_codons.push(*b"TAG");
        }
        if is_tga_stop(table) {
            stop_codons.push(*b"TGA");
        }
        match table {
            2 => stop_codons.extend([*b"AGA", *b"AGG"]),
            22 => stop_codons.push(*b"TCA"),
            23 => stop_codons.push(*b"TTA"),
            _ => {}
        }

        Ok(Self {
            table,
            start_codons,
            stop_codons,
        })
    }

    /// NCBI table number this code was built from.
    #[must_use]
    pub fn table(&self) -> u8 {
        self.table
    }

    /// Start codons, ATG first.
    #[must_use]
    pub fn start_codons(&self) -> &[Codon] {
        &self.start_codons
    }

    /// Stop codons in TAA, TAG, TGA order plus table-specific extras.
    #[must_use]
    pub fn stop_codons(&self) -> &[Codon] {
        &self.stop_codons
    }
}
