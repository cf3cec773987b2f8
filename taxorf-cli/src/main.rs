//! # taxorf CLI
//!
//! Command-line front end for the taxorf cores.
//!
//! ## Usage
//!
//! ```bash
//! # Lowest common ancestor of a set of taxa
//! taxorf lca --nodes nodes.dmp --names names.dmp --merged merged.dmp 562 28901
//!
//! # Clade-count report from per-taxon observation counts
//! taxorf report --nodes nodes.dmp --names names.dmp --merged merged.dmp \
//!     --counts observations.tsv
//!
//! # Extract ORFs from a FASTA file
//! taxorf orf --input contigs.fasta --min-length 10 --start-mode start-to-stop
//! ```
//!
//! ## Subcommands
//!
//! - `lca`: resolve the lowest common ancestor of the given TaxIDs and print
//!   its id, rank, name and lineage
//! - `report`: aggregate a `taxId<TAB>count` table over every clade
//! - `orf`: scan FASTA records on both strands and write the ORFs as FASTA
//!   with a `[Orf: ...]` tag in each header

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};

use clap::{Arg, ArgAction, ArgMatches, Command};
use rayon::prelude::*;

use taxorf_core::NcbiTaxonomy;
use taxorf_core::config::{FRAME_1, FRAME_2, FRAME_3, OrfScanConfig, StartMode};
use taxorf_core::orf::OrfFinder;
use taxorf_core::orf::gencode::GeneticCode;
use taxorf_core::orf::header::format_orf_header;
use taxorf_core::sequence::read_fasta_sequences;
use taxorf_core::types::TaxId;

fn taxonomy_args(command: Command) -> Command {
    command
        .arg(
            Arg::new("nodes")
                .long("nodes")
                .value_name("FILE")
                .required(true)
                .help("Taxonomy nodes file (nodes.dmp)"),
        )
        .arg(
            Arg::new("names")
                .long("names")
                .value_name("FILE")
                .required(true)
                .help("Taxonomy names file (names.dmp)"),
        )
        .arg(
            Arg::new("merged")
                .long("merged")
                .value_name("FILE")
                .required(true)
                .help("Merged taxon identifiers file (merged.dmp)"),
        )
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let matches = Command::new("taxorf")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Taxonomy LCA queries and open reading frame extraction")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            taxonomy_args(Command::new("lca"))
                .about("Lowest common ancestor of a set of taxa")
                .arg(
                    Arg::new("taxa")
                        .value_name("TAXID")
                        .num_args(1..)
                        .required(true)
                        .help("Taxon identifiers to reduce"),
                ),
        )
        .subcommand(
            taxonomy_args(Command::new("report"))
                .about("Clade-count report from per-taxon counts")
                .arg(
                    Arg::new("counts")
                        .short('c')
                        .long("counts")
                        .value_name("FILE")
                        .required(true)
                        .help("Tab-separated taxId/count table"),
                )
                .arg(
                    Arg::new("root")
                        .long("root")
                        .value_name("TAXID")
                        .default_value("1")
                        .help("Taxon to aggregate below"),
                ),
        )
        .subcommand(
            Command::new("orf")
                .about("Extract open reading frames from FASTA sequences")
                .arg(
                    Arg::new("input")
                        .short('i')
                        .long("input")
                        .value_name("FILE")
                        .required(true)
                        .help("Input FASTA file"),
                )
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .value_name("FILE")
                        .help("Output FASTA file (default: stdout)"),
                )
                .arg(
                    Arg::new("min-length")
                        .long("min-length")
                        .value_name("CODONS")
                        .default_value("0")
                        .help("Drop ORFs of this many codons or fewer"),
                )
                .arg(
                    Arg::new("max-length")
                        .long("max-length")
                        .value_name("CODONS")
                        .help("Drop ORFs longer than this many codons"),
                )
                .arg(
                    Arg::new("max-gaps")
                        .long("max-gaps")
                        .value_name("CODONS")
                        .help("Drop ORFs with more than this many gap codons"),
                )
                .arg(
                    Arg::new("start-mode")
                        .long("start-mode")
                        .value_name("MODE")
                        .default_value("any-to-stop")
                        .help("start-to-stop, any-to-stop or last-start-to-stop"),
                )
                .arg(
                    Arg::new("forward-frames")
                        .long("forward-frames")
                        .value_name("LIST")
                        .default_value("1,2,3")
                        .help("Forward-strand frames to scan (comma separated, 'none' to skip)"),
                )
                .arg(
                    Arg::new("reverse-frames")
                        .long("reverse-frames")
                        .value_name("LIST")
                        .default_value("1,2,3")
                        .help("Reverse-strand frames to scan (comma separated, 'none' to skip)"),
                )
                .arg(
                    Arg::new("translation-table")
                        .short('g')
                        .long("translation-table")
                        .value_name("TABLE")
                        .default_value("11")
                        .help("NCBI genetic code table (1-25)"),
                )
                .arg(
                    Arg::new("all-table-starts")
                        .long("all-table-starts")
                        .action(ArgAction::SetTrue)
                        .help("Accept every start codon of the table instead of ATG only"),
                ),
        )
        .get_matches();

    match matches.subcommand() {
        Some(("lca", sub)) => run_lca(sub),
        Some(("report", sub)) => run_report(sub),
        Some(("orf", sub)) => run_orf(sub),
        _ => unreachable!("a subcommand is required"),
    }
}

fn load_taxonomy(matches: &ArgMatches) -> Result<NcbiTaxonomy, Box<dyn std::error::Error>> {
    let nodes = matches.get_one::<String>("nodes").unwrap();
    let names = matches.get_one::<String>("names").unwrap();
    let merged = matches.get_one::<String>("merged").unwrap();
    Ok(NcbiTaxonomy::from_files(nodes, names, merged)?)
}

fn run_lca(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let taxonomy = load_taxonomy(matches)?;
    let taxa = matches
        .get_many::<String>("taxa")
        .unwrap()
        .map(|taxon| taxon.parse::<TaxId>().map_err(|_| format!("invalid taxon id '{taxon}'")))
        .collect::<Result<Vec<_>, _>>()?;

    let node = taxonomy
        .lca(&taxa)
        .ok_or("none of the given taxa exist in the taxonomy")?;
    println!(
        "{}\t{}\t{}\t{}",
        node.tax_id,
        node.rank,
        node.name,
        taxonomy.lineage(node)
    );
    Ok(())
}

fn run_report(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let taxonomy = load_taxonomy(matches)?;
    let root: TaxId = matches
        .get_one::<String>("root")
        .unwrap()
        .parse()
        .map_err(|_| "invalid root taxon id")?;

    let counts_file = matches.get_one::<String>("counts").unwrap();
    let mut taxon_counts = std::collections::HashMap::new();
    for line in BufReader::new(File::open(counts_file)?).lines() {
        let line = line?;
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let mut fields = line.split_whitespace();
        let (Some(taxon), Some(count)) = (fields.next(), fields.next()) else {
            return Err(format!("malformed counts entry '{line}'").into());
        };
        let taxon: TaxId = taxon
            .parse()
            .map_err(|_| format!("invalid taxon id '{taxon}'"))?;
        let count: u32 = count
            .parse()
            .map_err(|_| format!("invalid count '{count}'"))?;
        *taxon_counts.entry(taxon).or_insert(0) += count;
    }

    let clade_counts = taxonomy.clade_counts(&taxon_counts, root);
    let mut rows: Vec<_> = clade_counts.into_iter().collect();
    rows.sort_unstable_by_key(|&(taxon, _)| taxon);

    let stdout = io::stdout();
    let mut writer = BufWriter::new(stdout.lock());
    for (taxon, count) in rows {
        if let Some(node) = taxonomy.taxon_node(taxon) {
            writeln!(writer, "{count}\t{taxon}\t{}\t{}", node.rank, node.name)?;
        }
    }
    writer.flush()?;
    Ok(())
}

fn parse_frame_mask(list: &str) -> Result<u32, String> {
    if list == "none" || list == "0" {
        return Ok(0);
    }
    let mut mask = 0;
    for frame in list.split(',') {
        mask |= match frame.trim() {
            "1" => FRAME_1,
            "2" => FRAME_2,
            "3" => FRAME_3,
            other => return Err(format!("invalid frame '{other}', expected 1, 2 or 3")),
        };
    }
    Ok(mask)
}

fn parse_start_mode(mode: &str) -> Result<StartMode, String> {
    match mode {
        "start-to-stop" => Ok(StartMode::StartToStop),
        "any-to-stop" => Ok(StartMode::AnyToStop),
        "last-start-to-stop" => Ok(StartMode::LastStartToStop),
        other => Err(format!("invalid start mode '{other}'")),
    }
}

fn run_orf(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let table: u8 = matches
        .get_one::<String>("translation-table")
        .unwrap()
        .parse()
        .map_err(|_| "invalid translation table number")?;
    let genetic_code = GeneticCode::new(table)?;
    let use_all_table_starts = matches.get_flag("all-table-starts");

    let parse_codons = |name: &str, fallback: usize| -> Result<usize, String> {
        match matches.get_one::<String>(name) {
            Some(value) => value.parse().map_err(|_| format!("invalid {name} value")),
            None => Ok(fallback),
        }
    };
    let config = OrfScanConfig {
        min_length: parse_codons("min-length", 0)?,
        max_length: parse_codons("max-length", usize::MAX)?,
        max_gaps: parse_codons("max-gaps", usize::MAX)?,
        forward_frames: parse_frame_mask(matches.get_one::<String>("forward-frames").unwrap())?,
        reverse_frames: parse_frame_mask(matches.get_one::<String>("reverse-frames").unwrap())?,
        start_mode: parse_start_mode(matches.get_one::<String>("start-mode").unwrap())?,
    };

    let input = matches.get_one::<String>("input").unwrap();
    let records = read_fasta_sequences(input)?;

    // One scanner per record; the finder owns mutable strand buffers.
    let chunks: Vec<String> = records
        .par_iter()
        .map(|(id, _description, sequence)| {
            let mut finder = OrfFinder::new(&genetic_code, use_all_table_starts);
            if let Err(e) = finder.set_sequence(sequence) {
                log::warn!("skipping record {id}: {e}");
                return String::new();
            }
            let mut chunk = String::new();
            for (index, mut location) in finder.find_all(&config).into_iter().enumerate() {
                location.id = index as u32;
                if let Some(orf) = finder.view(&location) {
                    chunk.push_str(&format!(
                        ">{id}_{index} {}\n{}\n",
                        format_orf_header(&location),
                        String::from_utf8_lossy(orf)
                    ));
                }
            }
            chunk
        })
        .collect();

    let mut writer: Box<dyn Write> = match matches.get_one::<String>("output") {
        Some(output) => Box::new(BufWriter::new(File::create(output)?)),
        None => Box::new(BufWriter::new(io::stdout())),
    };
    for chunk in &chunks {
        writer.write_all(chunk.as_bytes())?;
    }
    writer.flush()?;
    Ok(())
}
