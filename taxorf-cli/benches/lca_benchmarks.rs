use std::collections::HashMap;
use std::fmt::Write as _;
use std::fs;

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use tempfile::TempDir;

use taxorf_core::NcbiTaxonomy;
use taxorf_core::types::TaxId;

use criterion_config::configure_criterion;

const NUM_NODES: TaxId = 100_000;

/// Writes a synthetic binary-tree taxonomy with `NUM_NODES` nodes: taxon i
/// hangs below taxon i/2, ranks cycle through a few levels.
fn write_synthetic_taxonomy(dir: &TempDir) -> NcbiTaxonomy {
    let ranks = ["no_rank", "superkingdom", "phylum", "class", "genus", "species"];
    let mut nodes = String::new();
    let mut names = String::new();
    for taxon in 1..=NUM_NODES {
        let parent = if taxon == 1 { 1 } else { taxon / 2 };
        let rank = ranks[(taxon as usize).trailing_zeros() as usize % ranks.len()];
        writeln!(nodes, "{taxon}\t|\t{parent}\t|\t{rank}\t|").unwrap();
        writeln!(names, "{taxon}\t|\tTaxon {taxon}\t|\t\t|\tscientific name\t|").unwrap();
    }

    let nodes_path = dir.path().join("nodes.dmp");
    let names_path = dir.path().join("names.dmp");
    let merged_path = dir.path().join("merged.dmp");
    fs::write(&nodes_path, nodes).unwrap();
    fs::write(&names_path, names).unwrap();
    fs::write(&merged_path, "").unwrap();

    NcbiTaxonomy::from_files(nodes_path, names_path, merged_path).unwrap()
}

/// Small deterministic generator so runs are comparable.
struct Lcg(u64);

impl Lcg {
    fn next_taxon(&mut self) -> TaxId {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        ((self.0 >> 33) % NUM_NODES as u64) as TaxId + 1
    }
}

fn bench_construction(c: &mut Criterion) {
    c.bench_function("taxonomy_construction", |b| {
        b.iter(|| {
            let dir = TempDir::new().unwrap();
            black_box(write_synthetic_taxonomy(&dir));
        });
    });
}

fn bench_lca_pair(c: &mut Criterion) {
    let dir = TempDir::new().unwrap();
    let taxonomy = write_synthetic_taxonomy(&dir);
    let mut lcg = Lcg(42);
    let pairs: Vec<(TaxId, TaxId)> = (0..1024)
        .map(|_| (lcg.next_taxon(), lcg.next_taxon()))
        .collect();

    c.bench_function("lca_pair", |b| {
        let mut index = 0;
        b.iter(|| {
            let (a, z) = pairs[index % pairs.len()];
            index += 1;
            black_box(taxonomy.lca_pair(a, z))
        });
    });
}

fn bench_clade_counts(c: &mut Criterion) {
    let dir = TempDir::new().unwrap();
    let taxonomy = write_synthetic_taxonomy(&dir);
    let mut lcg = Lcg(7);
    let mut counts: HashMap<TaxId, u32> = HashMap::new();
    for _ in 0..10_000 {
        *counts.entry(lcg.next_taxon()).or_insert(0) += 1;
    }

    c.bench_function("clade_counts", |b| {
        b.iter(|| black_box(taxonomy.clade_counts(&counts, 1)));
    });
}

criterion_group! {
    name = benches;
    config = configure_criterion();
    targets = bench_construction, bench_lca_pair, bench_clade_counts
}
criterion_main!(benches);
