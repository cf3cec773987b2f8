//! Textual ORF descriptor embedded in sequence headers.
//!
//! The tag `[Orf: id, from, to, strand, hasIncompleteStart, hasIncompleteEnd]`
//! carries a [`SequenceLocation`] through FASTA headers and back. Strand is
//! serialised as 0 for plus and 1 for minus.

use bio::bio_types::strand::Strand;

use crate::types::{SequenceLocation, TaxorfError};

const TAG_PREFIX: &str = "[Orf:";

/// Formats `location` as the bracketed header tag.
///
/// # Examples
///
/// ```rust
/// use bio::bio_types::strand::Strand;
/// use taxorf_core::orf::header::format_orf_header;
/// use taxorf_core::types::SequenceLocation;
///
/// let location = SequenceLocation {
///     id: 42,
///     from: 0,
///     to: 99,
///     has_incomplete_start: false,
///     has_incomplete_end: true,
///     strand: Strand::Reverse,
/// };
/// assert_eq!(format_orf_header(&location), "[Orf: 42, 0, 99, 1, 0, 1]");
/// ```
#[must_use]
pub fn format_orf_header(location: &SequenceLocation) -> String {
    format!(
        "[Orf: {}, {}, {}, {}, {}, {}]",
        location.id,
        location.from,
        location.to,
        u8::from(location.strand == Strand::Reverse),
        u8::from(location.has_incomplete_start),
        u8::from(location.has_incomplete_end),
    )
}

/// Extracts the ORF location from a whitespace-delimited header line.
///
/// The header is scanned for a token starting with `[Orf:`; the integers are
/// read from there. At least five must parse (a missing sixth leaves
/// `has_incomplete_end` false).
///
/// # Errors
///
/// Returns [`TaxorfError::ParseError`] when no tag is present, fewer than
/// five integers parse, a value is out of range, or the strand is neither
/// 0 nor 1.
pub fn parse_orf_header(header: &str) -> Result<SequenceLocation, TaxorfError> {
    let tag_start = header
        .match_indices(TAG_PREFIX)
        .map(|(offset, _)| offset)
        .find(|&offset| {
            offset == 0 || header.as_bytes()[offset - 1].is_ascii_whitespace()
        })
        .ok_or_else(|| {
            TaxorfError::ParseError(format!("could not find Orf information in header '{header}'"))
        })?;

    let rest = &header[tag_start + TAG_PREFIX.len()..];
    let body = match rest.find(']') {
        Some(end) => &rest[..end],
        None => rest,
    };

    let mut values: Vec<i64> = Vec::with_capacity(6);
    for field in body.split(',').map(str::trim).take(6) {
        match field.parse::<i64>() {
            Ok(value) => values.push(value),
            Err(_) => break,
        }
    }
    if values.len() < 5 {
        return Err(TaxorfError::ParseError(format!(
            "could not parse Orf location from '{}'",
            &header[tag_start..]
        )));
    }

    let out_of_range =
        |what: &str| TaxorfError::ParseError(format!("Orf {what} out of range in '{header}'"));
    let strand = match values[3] {
        0 => Strand::Forward,
        1 => Strand::Reverse,
        other => {
            return Err(TaxorfError::ParseError(format!(
                "invalid Orf strand {other} in '{header}'"
            )));
        }
    };
    Ok(SequenceLocation {
        id: u32::try_from(values[0]).map_err(|_| out_of_range("id"))?,
        from: usize::try_from(values[1]).map_err(|_| out_of_range("from"))?,
        to: usize::try_from(values[2]).map_err(|_| out_of_range("to"))?,
        has_incomplete_start: values[4] != 0,
        has_incomplete_end: values.len() > 5 && values[5] != 0,
        strand,
    })
}
