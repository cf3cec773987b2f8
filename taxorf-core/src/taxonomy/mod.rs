//! NCBI-style taxonomy engine with constant-time LCA queries.
//!
//! The engine is built once from the three taxonomy dump files (`nodes`,
//! `names`, `merged`) and is immutable afterwards. Construction flattens the
//! tree into an Euler tour and indexes the tour with a sparse table, so
//! [`NcbiTaxonomy::lca_pair`] and friends run in O(1) per query. All query
//! operations are pure reads and safe to call from any number of threads.
//!
//! ## Examples
//!
//! ```rust,no_run
//! use taxorf_core::taxonomy::NcbiTaxonomy;
//!
//! let taxonomy = NcbiTaxonomy::from_files("nodes.dmp", "names.dmp", "merged.dmp")?;
//! let lca = taxonomy.lca_pair(562, 28901);
//! if let Some(node) = taxonomy.taxon_node(lca) {
//!     println!("{} ({})", node.name, node.rank);
//! }
//! # Ok::<(), taxorf_core::types::TaxorfError>(())
//! ```

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::{debug, info, warn};

use crate::types::{TaxId, TaxorfError};

pub mod ranks;

mod euler;
use euler::EulerTour;

/// One node of the taxonomy tree.
#[derive(Debug, Clone)]
pub struct TaxonNode {
    /// Dense index into the node arena, assigned in load order.
    pub id: usize,
    /// External taxon identifier.
    pub tax_id: TaxId,
    /// TaxID of the parent; the root is its own parent.
    pub parent_tax_id: TaxId,
    /// Rank name as spelled in the nodes file (may contain spaces).
    pub rank: String,
    /// Scientific name, filled from the names file.
    pub name: String,
    /// Child TaxIDs in load order.
    pub children: Vec<TaxId>,
}

/// Read-only taxonomy index answering LCA and lineage queries.
#[derive(Debug)]
pub struct NcbiTaxonomy {
    /// Node arena in load order.
    nodes: Vec<TaxonNode>,
    /// Dense TaxID -> internal id map; index 0 stays reserved.
    node_ids: Vec<Option<u32>>,
    tour: EulerTour,
}

/// TaxID of the canonical root node.
const ROOT_TAX_ID: TaxId = 1;

/// Rank sentinel for nodes without a ranked level.
const NO_RANK: &str = "no_rank";

/// Splits a taxonomy dump line on the literal `\t|\t` delimiter. NCBI dump
/// lines carry a trailing `\t|` which would otherwise stick to the last
/// column.
fn split_dump_line(line: &str) -> Vec<&str> {
    let line = line.strip_suffix("\t|").unwrap_or(line);
    line.split("\t|\t").collect()
}

fn parse_tax_id(field: &str) -> Result<TaxId, TaxorfError> {
    field
        .trim()
        .parse()
        .map_err(|_| TaxorfError::ParseError(format!("invalid taxon id '{field}'")))
}

impl NcbiTaxonomy {
    /// Loads the three taxonomy files and builds the LCA index.
    ///
    /// The files are consumed in order: nodes, then merged, then names.
    /// Construction either returns a fully built engine or an error; a
    /// partially constructed engine is never observable.
    ///
    /// # Errors
    ///
    /// Returns [`TaxorfError`] on unreadable files, malformed lines, a node
    /// whose parent is missing, a scientific name for an unknown TaxID, or
    /// a nodes file that does not form a single tree rooted at TaxID 1.
    pub fn from_files(
        nodes_file: impl AsRef<Path>,
        names_file: impl AsRef<Path>,
        merged_file: impl AsRef<Path>,
    ) -> Result<Self, TaxorfError> {
        let (mut nodes, mut node_ids) = load_nodes(nodes_file.as_ref())?;
        link_children(&mut nodes, &node_ids)?;
        load_merged(merged_file.as_ref(), &mut node_ids)?;
        load_names(names_file.as_ref(), &mut nodes, &node_ids)?;

        let root = lookup(&node_ids, ROOT_TAX_ID).ok_or_else(|| {
            TaxorfError::InconsistentTaxonomy(format!(
                "root taxon {ROOT_TAX_ID} missing from nodes file"
            ))
        })?;

        info!("building LCA index over {} nodes", nodes.len());
        let children = children_as_internal_ids(&nodes, &node_ids);
        let tour = EulerTour::new(&children, root as u32)?;
        Ok(Self {
            nodes,
            node_ids,
            tour,
        })
    }

    /// Number of nodes in the arena.
    #[must_use]
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Whether `tax_id` resolves to a node, directly or via a merged alias.
    #[must_use]
    pub fn node_exists(&self, tax_id: TaxId) -> bool {
        self.internal_id(tax_id).is_some()
    }

    /// Node for `tax_id`, following merged aliases. `None` for TaxID 0 and
    /// for identifiers absent from the source files.
    #[must_use]
    pub fn taxon_node(&self, tax_id: TaxId) -> Option<&TaxonNode> {
        self.internal_id(tax_id).map(|id| &self.nodes[id])
    }

    /// Lowest common ancestor of two taxa.
    ///
    /// An identifier that does not resolve to a node yields the other
    /// argument, so `lca_pair(0, b) == b` and `lca_pair(0, 0) == 0`.
    #[must_use]
    pub fn lca_pair(&self, taxon_a: TaxId, taxon_b: TaxId) -> TaxId {
        let Some(a) = self.internal_id(taxon_a) else {
            return taxon_b;
        };
        let Some(b) = self.internal_id(taxon_b) else {
            return taxon_a;
        };
        self.nodes[self.tour.lca(a, b)].tax_id
    }

    /// Lowest common ancestor of a list of taxa.
    ///
    /// Identifiers that do not resolve are skipped with a warning. Returns
    /// `None` when nothing is left after filtering.
    #[must_use]
    pub fn lca(&self, taxa: &[TaxId]) -> Option<&TaxonNode> {
        let mut iter = taxa.iter();
        let mut reduced = loop {
            let &taxon = iter.next()?;
            match self.internal_id(taxon) {
                Some(id) => break id,
                None => warn!("no node for taxon {taxon}, ignoring it"),
            }
        };
        for &taxon in iter {
            match self.internal_id(taxon) {
                Some(id) => reduced = self.tour.lca(reduced, id),
                None => warn!("no node for taxon {taxon}, ignoring it"),
            }
        }
        Some(&self.nodes[reduced])
    }

    /// Whether `ancestor` lies on the path from `child` to the root.
    ///
    /// A taxon is its own ancestor. TaxID 0 on either side is false, and
    /// identifiers that do not resolve warn and return false.
    #[must_use]
    pub fn is_ancestor(&self, ancestor: TaxId, child: TaxId) -> bool {
        if ancestor == child {
            return true;
        }
        if ancestor == 0 || child == 0 {
            return false;
        }
        let Some(child_id) = self.internal_id(child) else {
            warn!("no node for taxon {child}");
            return false;
        };
        let Some(ancestor_id) = self.internal_id(ancestor) else {
            warn!("no node for taxon {ancestor}");
            return false;
        };
        self.tour.lca(child_id, ancestor_id) == ancestor_id
    }

    /// Ranked ancestors of `node` as a rank -> name mapping.
    ///
    /// Walking towards the root, the first occurrence of each rank (the one
    /// closest to `node`) wins; `no_rank` ancestors are skipped. The root
    /// node is recorded unconditionally.
    #[must_use]
    pub fn all_ranks<'a>(&'a self, node: &'a TaxonNode) -> HashMap<&'a str, &'a str> {
        let mut result = HashMap::new();
        let mut node = node;
        loop {
            if node.tax_id == ROOT_TAX_ID {
                result.entry(node.rank.as_str()).or_insert(node.name.as_str());
                return result;
            }
            if node.rank != NO_RANK {
                result.entry(node.rank.as_str()).or_insert(node.name.as_str());
            }
            match self.taxon_node(node.parent_tax_id) {
                Some(parent) => node = parent,
                None => return result,
            }
        }
    }

    /// Projects `node` onto the requested rank names.
    ///
    /// For each entry of `levels`: the recorded ancestor name if one exists;
    /// otherwise `"uc_" + node.name` when the requested rank is strictly
    /// below the node's own ranked level (unclassified at a sub-level of a
    /// known taxon); otherwise `"unknown"`.
    #[must_use]
    pub fn at_ranks(&self, node: &TaxonNode, levels: &[&str]) -> Vec<String> {
        let all_ranks = self.all_ranks(node);
        let base_level = ranks::level_of(&node.rank);
        let unclassified = format!("uc_{}", node.name);
        levels
            .iter()
            .map(|&level| {
                if let Some(&name) = all_ranks.get(level) {
                    return name.to_string();
                }
                match (ranks::level_of(level), base_level) {
                    (Some(requested), Some(base)) if requested < base => unclassified.clone(),
                    _ => "unknown".to_string(),
                }
            })
            .collect()
    }

    /// Names from the root down to `node`, joined with `;`.
    #[must_use]
    pub fn lineage(&self, node: &TaxonNode) -> String {
        let mut names = Vec::new();
        let mut node = node;
        loop {
            names.push(node.name.as_str());
            if node.parent_tax_id == node.tax_id {
                break;
            }
            match self.taxon_node(node.parent_tax_id) {
                Some(parent) => node = parent,
                None => break,
            }
        }
        names.reverse();
        names.join(";")
    }

    /// Sums per-taxon counts over every subtree below `root_taxon`.
    ///
    /// The result maps each TaxID in the subtree to the total of
    /// `taxon_counts` over the clade rooted there; taxa absent from
    /// `taxon_counts` contribute 0 of their own but still aggregate their
    /// descendants. An unresolvable `root_taxon` yields an empty map.
    ///
    /// The summation walks the tree with an explicit stack, one frame per
    /// open node, so arbitrarily deep taxonomies are fine.
    #[must_use]
    pub fn clade_counts(
        &self,
        taxon_counts: &HashMap<TaxId, u32>,
        root_taxon: TaxId,
    ) -> HashMap<TaxId, u32> {
        struct Frame {
            id: usize,
            next_child: usize,
            sum: u32,
        }

        let mut clade_counts = HashMap::new();
        let Some(root_id) = self.internal_id(root_taxon) else {
            warn!("no node for taxon {root_taxon}");
            return clade_counts;
        };

        debug!("calculating clade counts below taxon {root_taxon}");
        let own = |id: usize| {
            taxon_counts
                .get(&self.nodes[id].tax_id)
                .copied()
                .unwrap_or(0)
        };
        let mut stack = vec![Frame {
            id: root_id,
            next_child: 0,
            sum: own(root_id),
        }];
        while let Some(top) = stack.last() {
            let (id, next_child) = (top.id, top.next_child);
            if let Some(&child_tax) = self.nodes[id].children.get(next_child) {
                if let Some(top) = stack.last_mut() {
                    top.next_child += 1;
                }
                if let Some(child_id) = self.internal_id(child_tax) {
                    stack.push(Frame {
                        id: child_id,
                        next_child: 0,
                        sum: own(child_id),
                    });
                }
            } else if let Some(done) = stack.pop() {
                clade_counts.insert(self.nodes[done.id].tax_id, done.sum);
                if let Some(parent) = stack.last_mut() {
                    parent.sum += done.sum;
                }
            }
        }
        clade_counts
    }

    fn internal_id(&self, tax_id: TaxId) -> Option<usize> {
        lookup(&self.node_ids, tax_id)
    }
}

fn lookup(node_ids: &[Option<u32>], tax_id: TaxId) -> Option<usize> {
    node_ids
        .get(tax_id as usize)
        .copied()
        .flatten()
        .map(|id| id as usize)
}

/// Parses the nodes file into the arena and the dense TaxID map.
fn load_nodes(path: &Path) -> Result<(Vec<TaxonNode>, Vec<Option<u32>>), TaxorfError> {
    debug!("loading nodes file {}", path.display());
    let reader = BufReader::new(File::open(path)?);

    let mut nodes = Vec::new();
    let mut max_tax_id: TaxId = 0;
    for line in reader.lines() {
        let line = line?;
        let fields = split_dump_line(&line);
        if fields.len() < 3 {
            return Err(TaxorfError::ParseError(format!(
                "malformed nodes entry '{line}'"
            )));
        }
        let tax_id = parse_tax_id(fields[0])?;
        let parent_tax_id = parse_tax_id(fields[1])?;
        max_tax_id = max_tax_id.max(tax_id);
        nodes.push(TaxonNode {
            id: nodes.len(),
            tax_id,
            parent_tax_id,
            rank: fields[2].to_string(),
            name: String::new(),
            children: Vec::new(),
        });
    }
    debug!("got {} nodes", nodes.len());

    let mut node_ids = vec![None; max_tax_id as usize + 1];
    for node in &nodes {
        // First occurrence wins for duplicated TaxIDs.
        let slot = &mut node_ids[node.tax_id as usize];
        if slot.is_none() {
            *slot = Some(node.id as u32);
        }
    }
    Ok((nodes, node_ids))
}

/// Appends every non-root node to its parent's child list, erroring on the
/// first node whose parent is unknown.
fn link_children(nodes: &mut [TaxonNode], node_ids: &[Option<u32>]) -> Result<(), TaxorfError> {
    for i in 0..nodes.len() {
        let tax_id = nodes[i].tax_id;
        let parent_tax_id = nodes[i].parent_tax_id;
        let Some(parent_id) = lookup(node_ids, parent_tax_id) else {
            return Err(TaxorfError::InconsistentTaxonomy(format!(
                "cannot find parent taxon {parent_tax_id} of taxon {tax_id}"
            )));
        };
        if parent_tax_id != tax_id {
            nodes[parent_id].children.push(tax_id);
        }
    }
    Ok(())
}

fn children_as_internal_ids(nodes: &[TaxonNode], node_ids: &[Option<u32>]) -> Vec<Vec<u32>> {
    nodes
        .iter()
        .map(|node| {
            node.children
                .iter()
                // Children were linked from loaded nodes, so they resolve.
                .filter_map(|&child| lookup(node_ids, child))
                .map(|id| id as u32)
                .collect()
        })
        .collect()
}

/// Aliases old identifiers from the merged file onto their replacements.
fn load_merged(path: &Path, node_ids: &mut Vec<Option<u32>>) -> Result<(), TaxorfError> {
    debug!("loading merged file {}", path.display());
    let reader = BufReader::new(File::open(path)?);
    let mut count = 0usize;
    for line in reader.lines() {
        let line = line?;
        let fields = split_dump_line(&line);
        if fields.len() != 2 {
            return Err(TaxorfError::ParseError(format!(
                "malformed merged entry '{line}'"
            )));
        }
        let old_id = parse_tax_id(fields[0])?;
        let merged_id = parse_tax_id(fields[1])?;
        if lookup(node_ids, old_id).is_none()
            && let Some(id) = lookup(node_ids, merged_id)
        {
            if old_id as usize >= node_ids.len() {
                node_ids.resize(old_id as usize + 1, None);
            }
            node_ids[old_id as usize] = Some(id as u32);
            count += 1;
        }
    }
    debug!("added {count} merged nodes");
    Ok(())
}

/// Fills in scientific names. Lines without `scientific name` are skipped;
/// a retained line for an unknown TaxID is fatal.
fn load_names(
    path: &Path,
    nodes: &mut [TaxonNode],
    node_ids: &[Option<u32>],
) -> Result<(), TaxorfError> {
    debug!("loading names file {}", path.display());
    let reader = BufReader::new(File::open(path)?);
    for line in reader.lines() {
        let line = line?;
        if !line.contains("scientific name") {
            continue;
        }
        let fields = split_dump_line(&line);
        if fields.len() < 2 {
            return Err(TaxorfError::ParseError(format!(
                "malformed name entry '{line}'"
            )));
        }
        let tax_id = parse_tax_id(fields[0])?;
        let Some(id) = lookup(node_ids, tax_id) else {
            return Err(TaxorfError::InconsistentTaxonomy(format!(
                "taxon {tax_id} has a name but is not present in the nodes file"
            )));
        };
        nodes[id].name = fields[1].to_string();
    }
    Ok(())
}
