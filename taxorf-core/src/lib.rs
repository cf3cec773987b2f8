//! # taxorf-core
//!
//! Algorithmic cores of the taxorf toolkit: a read-only NCBI-style taxonomy
//! index with constant-time lowest-common-ancestor queries, and a streaming
//! open reading frame finder over both strands of a nucleotide sequence.
//!
//! ## Overview
//!
//! The taxonomy engine loads the `nodes`, `names` and `merged` dump files,
//! flattens the tree into an Euler tour and indexes the tour depths with a
//! sparse table, reducing LCA to an O(1) range-minimum query. On top of that
//! sit ancestry tests, rank projections, lineage strings and clade-count
//! aggregation.
//!
//! The ORF finder upper-cases a sequence, builds its IUPAC reverse
//! complement, and runs three per-frame state machines over each strand,
//! emitting every maximal region that satisfies the configured start/stop
//! discipline and the gap and length filters. A small codec carries ORF
//! locations through FASTA headers.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use taxorf_core::taxonomy::NcbiTaxonomy;
//!
//! let taxonomy = NcbiTaxonomy::from_files("nodes.dmp", "names.dmp", "merged.dmp")?;
//! assert_eq!(taxonomy.lca_pair(9606, 9606), 9606);
//! # Ok::<(), taxorf_core::types::TaxorfError>(())
//! ```
//!
//! ```rust
//! use taxorf_core::config::OrfScanConfig;
//! use taxorf_core::orf::OrfFinder;
//! use taxorf_core::orf::gencode::GeneticCode;
//!
//! let code = GeneticCode::new(11)?;
//! let mut finder = OrfFinder::new(&code, true);
//! finder.set_sequence(b"ATGAAACGCATTAGCACCACCATT")?;
//! let orfs = finder.find_all(&OrfScanConfig::default());
//! # Ok::<(), taxorf_core::types::TaxorfError>(())
//! ```
//!
//! ## Module Organization
//!
//! - [`taxonomy`]: taxonomy loading and the LCA query surface
//! - [`orf`]: ORF scanning, IUPAC complements, genetic codes, header codec
//! - [`config`]: scan configuration
//! - [`sequence`]: FASTA input
//! - [`types`]: shared data types and the error enum
//!
//! ## Concurrency
//!
//! A built [`NcbiTaxonomy`] is immutable; all queries are pure reads and may
//! run from any number of threads. An [`OrfFinder`] owns mutable strand
//! buffers and is one-per-concurrent-scan.
//!
//! ## Error Handling
//!
//! Fallible operations return [`Result<T, TaxorfError>`](types::TaxorfError).
//! Construction-time problems (unreadable or inconsistent taxonomy files)
//! are fatal to construction; query-time problems (unknown taxa) warn via
//! [`log`] and degrade per operation.

pub mod config;
pub mod orf;
pub mod sequence;
pub mod taxonomy;
pub mod types;

pub use orf::OrfFinder;
pub use taxonomy::NcbiTaxonomy;
