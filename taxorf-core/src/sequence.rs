//! FASTA input for feeding sequences into the ORF finder.

use std::fs::File;
use std::path::Path;

use bio::io::fasta;

use crate::types::TaxorfError;

/// Sequence record as `(id, description, sequence)`.
pub type FastaRecord = (String, Option<String>, Vec<u8>);

/// Reads every record of a FASTA file into memory.
///
/// # Errors
///
/// Returns [`TaxorfError::IoError`] when the file cannot be opened and
/// [`TaxorfError::ParseError`] on malformed records.
pub fn read_fasta_sequences(path: impl AsRef<Path>) -> Result<Vec<FastaRecord>, TaxorfError> {
    let file = File::open(path.as_ref())?;
    let reader = fasta::Reader::new(file);

    let mut sequences = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| TaxorfError::ParseError(e.to_string()))?;
        sequences.push((
            record.id().to_string(),
            record.desc().map(String::from),
            record.seq().to_vec(),
        ));
    }
    Ok(sequences)
}
