//! Open reading frame detection over both strands of a nucleotide sequence.
//!
//! The scanner walks a strand once, maintaining three independent state
//! machines (one per codon-start offset) and emitting every maximal region
//! that satisfies the configured start/stop discipline and the gap and
//! length filters. The forward strand and its reverse complement are scanned
//! independently; minus-strand coordinates are relative to the
//! reverse-complement strand.
//!
//! ## Examples
//!
//! ```rust
//! use taxorf_core::config::{OrfScanConfig, StartMode, FRAME_1};
//! use taxorf_core::orf::OrfFinder;
//! use taxorf_core::orf::gencode::GeneticCode;
//!
//! let code = GeneticCode::new(11)?;
//! let mut finder = OrfFinder::new(&code, true);
//! finder.set_sequence(b"ATGAAATAA")?;
//!
//! let config = OrfScanConfig {
//!     start_mode: StartMode::StartToStop,
//!     forward_frames: FRAME_1,
//!     reverse_frames: 0,
//!     ..Default::default()
//! };
//! let orfs = finder.find_all(&config);
//! assert_eq!(orfs.len(), 1);
//! # Ok::<(), taxorf_core::types::TaxorfError>(())
//! ```

use bio::bio_types::strand::Strand;

use crate::config::{FRAME_1, FRAME_2, FRAME_3, OrfScanConfig, StartMode};
use crate::types::{SequenceLocation, TaxorfError};

pub mod complement;
pub mod gencode;
pub mod header;

use complement::{INVALID_COMPLEMENT, complement, reverse_complement};
use gencode::{Codon, GeneticCode};

/// Reading frames per strand.
const FRAMES: usize = 3;
const FRAME_LOOKUP: [u32; FRAMES] = [FRAME_1, FRAME_2, FRAME_3];
const FRAME_OFFSET: [usize; FRAMES] = [0, 1, 2];

/// State of one per-frame scan.
struct FrameState {
    inside_orf: bool,
    has_start_codon: bool,
    gaps: usize,
    length: usize,
    from: usize,
}

/// ORF scanner over one sequence at a time.
///
/// A finder owns the upper-cased forward strand and its reverse complement
/// and is not shareable across threads; create one instance per concurrent
/// scan.
#[derive(Debug)]
pub struct OrfFinder {
    start_codons: Vec<Codon>,
    stop_codons: Vec<Codon>,
    forward: Vec<u8>,
    reverse: Vec<u8>,
    sequence_length: usize,
}

impl OrfFinder {
    /// Creates a scanner for the given genetic code.
    ///
    /// When `use_all_table_starts` is false the table's start list is
    /// replaced by ATG alone. Both lists are then augmented with their
    /// U-form duplicates, appended after the T-forms, so RNA input matches
    /// too.
    #[must_use]
    pub fn new(genetic_code: &GeneticCode, use_all_table_starts: bool) -> Self {
        let mut start_codons = if use_all_table_starts {
            genetic_code.start_codons().to_vec()
        } else {
            vec![*b"ATG"]
        };
        append_u_forms(&mut start_codons);

        let mut stop_codons = genetic_code.stop_codons().to_vec();
        append_u_forms(&mut stop_codons);

        Self {
            start_codons,
            stop_codons,
            forward: Vec::new(),
            reverse: Vec::new(),
            sequence_length: 0,
        }
    }

    /// Installs the sequence to scan, replacing any previous one.
    ///
    /// The forward strand is upper-cased and the reverse complement built
    /// through the IUPAC table.
    ///
    /// # Errors
    ///
    /// Returns [`TaxorfError::InvalidSequence`] for sequences shorter than
    /// one codon and for sequences containing a byte with no IUPAC
    /// complement. On error no sequence is installed.
    pub fn set_sequence(&mut self, sequence: &[u8]) -> Result<(), TaxorfError> {
        self.forward.clear();
        self.reverse.clear();
        self.sequence_length = 0;

        if sequence.len() < 3 {
            return Err(TaxorfError::InvalidSequence(format!(
                "sequence of length {} is shorter than a codon",
                sequence.len()
            )));
        }
        let forward: Vec<u8> = sequence.iter().map(u8::to_ascii_uppercase).collect();
        let reverse = reverse_complement(&forward).ok_or_else(|| {
            TaxorfError::InvalidSequence(
                "sequence contains a byte with no IUPAC complement".to_string(),
            )
        })?;

        self.sequence_length = sequence.len();
        self.forward = forward;
        self.reverse = reverse;
        Ok(())
    }

    /// Length of the installed sequence, 0 before [`Self::set_sequence`].
    #[must_use]
    pub fn sequence_length(&self) -> usize {
        self.sequence_length
    }

    /// Slice of the owned strand covered by `location`, or `None` when the
    /// location is empty or out of bounds.
    #[must_use]
    pub fn view(&self, location: &SequenceLocation) -> Option<&[u8]> {
        if location.to <= location.from {
            return None;
        }
        let strand = match location.strand {
            Strand::Reverse => &self.reverse,
            _ => &self.forward,
        };
        strand.get(location.from..location.to)
    }

    /// Scans both strands and returns every ORF passing the filters.
    ///
    /// Strands whose frame mask is 0 are skipped entirely.
    #[must_use]
    pub fn find_all(&self, config: &OrfScanConfig) -> Vec<SequenceLocation> {
        let mut result = Vec::new();
        if config.forward_frames != 0 {
            self.find_forward(
                &self.forward,
                config,
                config.forward_frames,
                Strand::Forward,
                &mut result,
            );
        }
        if config.reverse_frames != 0 {
            self.find_forward(
                &self.reverse,
                config,
                config.reverse_frames,
                Strand::Reverse,
                &mut result,
            );
        }
        result
    }

    fn is_start(&self, codon: Codon) -> bool {
        self.start_codons.contains(&codon)
    }

    fn is_stop(&self, codon: Codon) -> bool {
        self.stop_codons.contains(&codon)
    }

    /// One pass over `strand`, running the three frame machines in step.
    ///
    /// An ORF can begin at any of the three codon start offsets:
    ///
    /// ```text
    /// Frame 1:  AGA ATT GCC TGA ATA AAA GGA TTA CCT TGA TAG GGT AAA
    /// Frame 2: A GAA TTG CCT GAA TAA AAG GAT TAC CTT GAT AGG GTA AA
    /// Frame 3: AG AAT TGC CTG AAT AAA AGG ATT ACC TTG ATA GGG TAA A
    /// ```
    fn find_forward(
        &self,
        strand: &[u8],
        config: &OrfScanConfig,
        frames: u32,
        strand_label: Strand,
        result: &mut Vec<SequenceLocation>,
    ) {
        let length = self.sequence_length;

        // Each frame starts out inside a synthetic ORF so that a stop codon
        // with no preceding start still yields the leading region, marked
        // with an incomplete start.
        let mut states: [FrameState; FRAMES] = std::array::from_fn(|frame| FrameState {
            inside_orf: true,
            has_start_codon: false,
            gaps: 0,
            length: 0,
            from: FRAME_OFFSET[frame],
        });

        let mut block = 0;
        while block + (FRAMES - 1) < length {
            for position in block..block + FRAMES {
                let frame = position % FRAMES;
                if frames & FRAME_LOOKUP[frame] == 0 {
                    continue;
                }

                let codon = codon_at(strand, position);
                let this_incomplete = is_incomplete(codon);
                let is_last = !this_incomplete && is_incomplete(codon_at(strand, position + FRAMES));

                let state = &mut states[frame];
                let should_start = match config.start_mode {
                    // The synthetic leading region has no start codon yet, so
                    // a start codon may still claim the frame.
                    StartMode::StartToStop => {
                        (!state.inside_orf || !state.has_start_codon) && self.is_start(codon)
                    }
                    StartMode::AnyToStop => !state.inside_orf,
                    StartMode::LastStartToStop => self.is_start(codon),
                };

                // Never open an ORF on the last codon.
                if should_start && !is_last {
                    state.inside_orf = true;
                    state.has_start_codon = true;
                    state.from = position;
                    state.gaps = 0;
                    state.length = 0;
                }

                if state.inside_orf {
                    state.length += 1;
                    if is_gap_or_n(codon) {
                        state.gaps += 1;
                    }
                }

                let stop = self.is_stop(codon);
                if state.inside_orf && (stop || is_last) {
                    state.inside_orf = false;

                    // The stop codon is part of the region.
                    let to = position + if is_last { 3 } else { 0 };
                    if to == state.from {
                        // The very first codon was a stop.
                        continue;
                    }
                    if state.gaps > config.max_gaps
                        || state.length > config.max_length
                        || state.length <= config.min_length
                    {
                        continue;
                    }
                    result.push(SequenceLocation {
                        id: 0,
                        from: state.from,
                        to,
                        has_incomplete_start: !state.has_start_codon,
                        has_incomplete_end: !stop,
                        strand: strand_label,
                    });
                }
            }
            block += FRAMES;
        }
    }
}

fn byte_at(strand: &[u8], position: usize) -> u8 {
    strand.get(position).copied().unwrap_or(0)
}

/// Codon starting at `position`; bytes past the strand end read as 0.
fn codon_at(strand: &[u8], position: usize) -> Codon {
    [
        byte_at(strand, position),
        byte_at(strand, position + 1),
        byte_at(strand, position + 2),
    ]
}

fn is_incomplete(codon: Codon) -> bool {
    codon[0] == 0 || codon[1] == 0 || codon[2] == 0
}

fn is_gap_or_n(codon: Codon) -> bool {
    codon
        .iter()
        .any(|&base| base == b'N' || complement(base) == INVALID_COMPLEMENT)
}

/// Duplicates every codon with T replaced by U, appending the copies after
/// the originals.
fn append_u_forms(codons: &mut Vec<Codon>) {
    let u_forms: Vec<Codon> = codons
        .iter()
        .map(|codon| codon.map(|base| if base == b'T' { b'U' } else { base }))
        .collect();
    codons.extend(u_forms);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ALL_FRAMES, FRAME_2};

    fn finder_for(sequence: &[u8]) -> OrfFinder {
        let code = GeneticCode::new(11).unwrap();
        let mut finder = OrfFinder::new(&code, true);
        finder.set_sequence(sequence).unwrap();
        finder
    }

    fn forward_only(frames: u32, start_mode: StartMode) -> OrfScanConfig {
        OrfScanConfig {
            forward_frames: frames,
            reverse_frames: 0,
            start_mode,
            ..Default::default()
        }
    }

    #[test]
    fn test_start_to_stop_single_orf() {
        let finder = finder_for(b"ATGAAATAA");
        let config = OrfScanConfig {
            max_gaps: 0,
            ..forward_only(FRAME_1, StartMode::StartToStop)
        };
        let orfs = finder.find_all(&config);
        assert_eq!(orfs.len(), 1);
        assert_eq!(
            orfs[0],
            SequenceLocation {
                id: 0,
                from: 0,
                to: 9,
                has_incomplete_start: false,
                has_incomplete_end: false,
                strand: Strand::Forward,
            }
        );
    }

    #[test]
    fn test_any_to_stop_without_start_codon() {
        let finder = finder_for(b"AAATAA");
        let orfs = finder.find_all(&forward_only(FRAME_1, StartMode::AnyToStop));
        assert_eq!(orfs.len(), 1);
        assert_eq!(orfs[0].from, 0);
        assert_eq!(orfs[0].to, 6);
        assert!(orfs[0].has_incomplete_start);
        assert!(!orfs[0].has_incomplete_end);
        assert_eq!(orfs[0].strand, Strand::Forward);
    }

    #[test]
    fn test_any_to_stop_without_stops_spans_each_frame() {
        // No stop codon anywhere: one ORF per enabled frame, from the frame
        // offset to the end of the last complete codon, both ends open.
        let finder = finder_for(b"AAAAAAAAA");
        let orfs = finder.find_all(&forward_only(ALL_FRAMES, StartMode::AnyToStop));
        assert_eq!(orfs.len(), 3);
        for orf in &orfs {
            assert!(orf.has_incomplete_start);
            assert!(orf.has_incomplete_end);
        }
        let mut spans: Vec<(usize, usize)> = orfs.iter().map(|orf| (orf.from, orf.to)).collect();
        spans.sort_unstable();
        assert_eq!(spans, vec![(0, 9), (1, 7), (2, 8)]);
    }

    #[test]
    fn test_start_to_stop_after_leading_stop() {
        // The leading synthetic region ends at the first stop; the next ORF
        // must begin at a start codon.
        let finder = finder_for(b"AAATAAATGAAATAAATT");
        let orfs = finder.find_all(&forward_only(FRAME_1, StartMode::StartToStop));
        assert_eq!(orfs.len(), 2);
        // A mid-sequence stop closes the region in front of itself.
        assert_eq!((orfs[0].from, orfs[0].to), (0, 3));
        assert!(orfs[0].has_incomplete_start);
        assert!(!orfs[0].has_incomplete_end);
        assert_eq!((orfs[1].from, orfs[1].to), (6, 12));
        assert!(!orfs[1].has_incomplete_start);
        assert!(!orfs[1].has_incomplete_end);
    }

    #[test]
    fn test_last_start_to_stop_restarts_on_every_start() {
        let finder = finder_for(b"ATGATGATGTAAATT");
        let orfs = finder.find_all(&forward_only(FRAME_1, StartMode::LastStartToStop));
        assert_eq!(orfs.len(), 1);
        assert_eq!((orfs[0].from, orfs[0].to), (6, 9));
        assert!(!orfs[0].has_incomplete_start);
        assert!(!orfs[0].has_incomplete_end);
    }

    #[test]
    fn test_leading_stop_codon_emits_nothing() {
        // to == from for a stop on the very first codon of the frame.
        let finder = finder_for(b"TAAATTATT");
        let orfs = finder.find_all(&forward_only(FRAME_1, StartMode::AnyToStop));
        assert_eq!(orfs.len(), 1);
        assert_eq!((orfs[0].from, orfs[0].to), (3, 9));
    }

    #[test]
    fn test_min_length_filter_is_exclusive() {
        let finder = finder_for(b"ATGAAATAA");
        let mut config = forward_only(FRAME_1, StartMode::StartToStop);
        config.min_length = 3;
        assert!(finder.find_all(&config).is_empty());
        config.min_length = 2;
        assert_eq!(finder.find_all(&config).len(), 1);
    }

    #[test]
    fn test_max_length_filter_rejects_long_orfs() {
        let finder = finder_for(b"ATGAAAAAATAA");
        let mut config = forward_only(FRAME_1, StartMode::StartToStop);
        config.max_length = 3;
        assert!(finder.find_all(&config).is_empty());
        config.max_length = 4;
        assert_eq!(finder.find_all(&config).len(), 1);
    }

    #[test]
    fn test_max_gaps_filter_counts_n_codons() {
        let finder = finder_for(b"ATGANATAA");
        let mut config = forward_only(FRAME_1, StartMode::StartToStop);
        config.max_gaps = 0;
        assert!(finder.find_all(&config).is_empty());
        config.max_gaps = 1;
        let orfs = finder.find_all(&config);
        assert_eq!(orfs.len(), 1);
        assert_eq!((orfs[0].from, orfs[0].to), (0, 9));
    }

    #[test]
    fn test_frame_mask_limits_the_scan() {
        let finder = finder_for(b"AAAAAAAAA");
        let orfs = finder.find_all(&forward_only(FRAME_2, StartMode::AnyToStop));
        assert_eq!(orfs.len(), 1);
        assert_eq!(orfs[0].from, 1);
    }

    #[test]
    fn test_reverse_strand_coordinates() {
        // Reverse complement of the sequence is TTATTTCAT: an ORF in frame 1
        // of the minus strand, coordinates relative to that strand.
        let finder = finder_for(b"ATGAAATAA");
        let config = OrfScanConfig {
            forward_frames: 0,
            reverse_frames: FRAME_1,
            start_mode: StartMode::AnyToStop,
            ..Default::default()
        };
        let orfs = finder.find_all(&config);
        assert_eq!(orfs.len(), 1);
        assert_eq!(orfs[0].strand, Strand::Reverse);
        assert_eq!((orfs[0].from, orfs[0].to), (0, 9));
        assert_eq!(finder.view(&orfs[0]).unwrap(), b"TTATTTCAT");
    }

    #[test]
    fn test_rna_input_matches_u_form_codons() {
        let code = GeneticCode::new(11).unwrap();
        let mut finder = OrfFinder::new(&code, true);
        finder.set_sequence(b"augaaauaa").unwrap();
        let config = OrfScanConfig {
            max_gaps: 0,
            ..forward_only(FRAME_1, StartMode::StartToStop)
        };
        let orfs = finder.find_all(&config);
        assert_eq!(orfs.len(), 1);
        assert!(!orfs[0].has_incomplete_start);
        assert!(!orfs[0].has_incomplete_end);
    }

    #[test]
    fn test_atg_only_start_list() {
        let code = GeneticCode::new(11).unwrap();
        let finder = OrfFinder::new(&code, false);
        assert_eq!(finder.start_codons, vec![*b"ATG", *b"AUG"]);
        let all = OrfFinder::new(&code, true);
        assert_eq!(
            all.start_codons,
            vec![*b"ATG", *b"GTG", *b"TTG", *b"AUG", *b"GUG", *b"UUG"]
        );
    }

    #[test]
    fn test_u_forms_follow_t_forms() {
        let code = GeneticCode::new(11).unwrap();
        let finder = OrfFinder::new(&code, true);
        assert_eq!(
            finder.stop_codons,
            vec![*b"TAA", *b"TAG", *b"TGA", *b"UAA", *b"UAG", *b"UGA"]
        );
    }

    #[test]
    fn test_set_sequence_rejects_short_input() {
        let code = GeneticCode::new(11).unwrap();
        let mut finder = OrfFinder::new(&code, true);
        assert!(finder.set_sequence(b"AT").is_err());
        assert!(finder.set_sequence(b"").is_err());
        assert_eq!(finder.sequence_length(), 0);
    }

    #[test]
    fn test_set_sequence_rejects_invalid_bytes_without_partial_state() {
        let code = GeneticCode::new(11).unwrap();
        let mut finder = OrfFinder::new(&code, true);
        finder.set_sequence(b"ATGAAATAA").unwrap();
        assert!(finder.set_sequence(b"ATG-AATAA").is_err());
        assert_eq!(finder.sequence_length(), 0);
        assert!(finder.find_all(&OrfScanConfig::default()).is_empty());
    }

    #[test]
    fn test_set_sequence_accepts_ambiguity_codes() {
        let code = GeneticCode::new(11).unwrap();
        let mut finder = OrfFinder::new(&code, true);
        assert!(finder.set_sequence(b"ATGRYSWKMN").is_ok());
    }

    #[test]
    fn test_view() {
        let finder = finder_for(b"ATGAAATAA");
        let location = SequenceLocation {
            id: 0,
            from: 0,
            to: 3,
            has_incomplete_start: false,
            has_incomplete_end: false,
            strand: Strand::Forward,
        };
        assert_eq!(finder.view(&location).unwrap(), b"ATG");
        let empty = SequenceLocation { to: 0, ..location };
        assert!(finder.view(&empty).is_none());
        let beyond = SequenceLocation { to: 100, ..location };
        assert!(finder.view(&beyond).is_none());
    }
}
