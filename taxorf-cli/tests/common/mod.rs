#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

/// Writes the six-node test taxonomy (root 1, superkingdom 2, phyla 3/4,
/// species 5/6, taxon 7 merged into 5) and returns the three file paths.
pub fn write_tiny_taxonomy(dir: &TempDir) -> (PathBuf, PathBuf, PathBuf) {
    let nodes = dir.path().join("nodes.dmp");
    fs::write(
        &nodes,
        "1\t|\t1\t|\tno_rank\t|\n\
         2\t|\t1\t|\tsuperkingdom\t|\n\
         3\t|\t2\t|\tphylum\t|\n\
         4\t|\t2\t|\tphylum\t|\n\
         5\t|\t3\t|\tspecies\t|\n\
         6\t|\t4\t|\tspecies\t|\n",
    )
    .unwrap();

    let names = dir.path().join("names.dmp");
    fs::write(
        &names,
        "1\t|\troot\t|\t\t|\tscientific name\t|\n\
         2\t|\tBacteria\t|\t\t|\tscientific name\t|\n\
         3\t|\tProteobacteria\t|\t\t|\tscientific name\t|\n\
         4\t|\tFirmicutes\t|\t\t|\tscientific name\t|\n\
         5\t|\tEscherichia coli\t|\t\t|\tscientific name\t|\n\
         6\t|\tBacillus subtilis\t|\t\t|\tscientific name\t|\n",
    )
    .unwrap();

    let merged = dir.path().join("merged.dmp");
    fs::write(&merged, "7\t|\t5\t|\n").unwrap();

    (nodes, names, merged)
}

/// Writes `content` as a FASTA file inside `dir`.
pub fn write_fasta(dir: &TempDir, content: &str) -> PathBuf {
    let path = dir.path().join("input.fasta");
    fs::write(&path, content).unwrap();
    path
}
