/// Start discipline for the ORF scanner.
///
/// Controls where an open reading frame is allowed to begin relative to the
/// start codons of the configured genetic code.
///
/// # Examples
///
/// ```rust
/// use taxorf_core::config::{OrfScanConfig, StartMode};
///
/// let config = OrfScanConfig {
///     start_mode: StartMode::StartToStop,
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StartMode {
    /// Longest fragment whose first codon is a start codon.
    StartToStop,

    /// Longest fragment regardless of start codons.
    #[default]
    AnyToStop,

    /// Last encountered start codon to stop; the frame restarts on every
    /// start codon, so emitted regions contain no start codon in the middle.
    LastStartToStop,
}

/// Reading frame at codon-start offset 0.
pub const FRAME_1: u32 = 1 << 0;
/// Reading frame at codon-start offset 1.
pub const FRAME_2: u32 = 1 << 1;
/// Reading frame at codon-start offset 2.
pub const FRAME_3: u32 = 1 << 2;
/// All three reading frames of a strand.
pub const ALL_FRAMES: u32 = FRAME_1 | FRAME_2 | FRAME_3;

/// Configuration settings for an ORF scan.
///
/// Lengths and gap counts are measured in codons. The defaults accept every
/// maximal region on all six frames.
///
/// # Examples
///
/// ## Default configuration
///
/// ```rust
/// use taxorf_core::config::OrfScanConfig;
///
/// let config = OrfScanConfig::default();
/// ```
///
/// ## Forward-only scan with a length floor
///
/// ```rust
/// use taxorf_core::config::{OrfScanConfig, StartMode, ALL_FRAMES};
///
/// let config = OrfScanConfig {
///     min_length: 10,
///     forward_frames: ALL_FRAMES,
///     reverse_frames: 0,
///     start_mode: StartMode::StartToStop,
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct OrfScanConfig {
    /// Regions of `min_length` codons or fewer are dropped.
    ///
    /// **Default**: `0` (single-codon regions already pass)
    pub min_length: usize,

    /// Regions longer than `max_length` codons are dropped.
    ///
    /// **Default**: `usize::MAX`
    pub max_length: usize,

    /// Regions containing more than `max_gaps` gap or `N` codons are dropped.
    ///
    /// **Default**: `usize::MAX`
    pub max_gaps: usize,

    /// Bitmask of frames scanned on the forward strand.
    ///
    /// **Default**: [`ALL_FRAMES`]; `0` skips the strand entirely.
    pub forward_frames: u32,

    /// Bitmask of frames scanned on the reverse-complement strand.
    ///
    /// **Default**: [`ALL_FRAMES`]; `0` skips the strand entirely.
    pub reverse_frames: u32,

    /// Start discipline, see [`StartMode`].
    ///
    /// **Default**: [`StartMode::AnyToStop`]
    pub start_mode: StartMode,
}

impl Default for OrfScanConfig {
    fn default() -> Self {
        Self {
            min_length: 0,
            max_length: usize::MAX,
            max_gaps: usize::MAX,
            forward_frames: ALL_FRAMES,
            reverse_frames: ALL_FRAMES,
            start_mode: StartMode::AnyToStop,
        }
    }
}
