//! Euler tour and sparse-table RMQ over the taxonomy tree.
//!
//! Flattening the tree into an Euler tour reduces lowest-common-ancestor
//! queries to range-minimum queries over the tour depths, which the sparse
//! table answers in O(1) after O(N log N) preprocessing.

use crate::types::TaxorfError;

/// Euler tour of a rooted tree over dense internal node ids, together with
/// the RMQ index answering LCA queries on it.
#[derive(Debug)]
pub(crate) struct EulerTour {
    /// Internal ids in DFS visit order, one entry per edge traversal plus
    /// the initial root visit. Padded to `2N` with a trailing zero slot
    /// that no valid query addresses.
    tour: Vec<u32>,
    /// Depth at each tour position, root depth 0.
    depths: Vec<u32>,
    /// First tour position of each internal id.
    first_visit: Vec<u32>,
    rmq: SparseTable,
}

impl EulerTour {
    /// Walks the tree from `root` and builds the tour arrays and the RMQ
    /// index. `children` holds the ordered child lists per internal id.
    ///
    /// The walk is iterative with an explicit stack and per-node child
    /// cursor; taxonomies can be deep enough to overflow the call stack.
    pub(crate) fn new(children: &[Vec<u32>], root: u32) -> Result<Self, TaxorfError> {
        let num_nodes = children.len();
        let mut tour = Vec::with_capacity(num_nodes * 2);
        let mut depths = Vec::with_capacity(num_nodes * 2);
        let mut first_visit = vec![0u32; num_nodes];

        let mut stack: Vec<(u32, usize)> = vec![(root, 0)];
        tour.push(root);
        depths.push(0);

        while let Some(&(node, cursor)) = stack.last() {
            if let Some(&child) = children[node as usize].get(cursor) {
                if let Some(top) = stack.last_mut() {
                    top.1 += 1;
                }
                first_visit[child as usize] = tour.len() as u32;
                tour.push(child);
                depths.push(stack.len() as u32);
                stack.push((child, 0));
            } else {
                stack.pop();
                if let Some(&(parent, _)) = stack.last() {
                    tour.push(parent);
                    depths.push(stack.len() as u32 - 1);
                }
            }
        }

        if tour.len() != num_nodes * 2 - 1 {
            return Err(TaxorfError::InconsistentTaxonomy(format!(
                "tree rooted at internal id {root} does not reach all {num_nodes} nodes"
            )));
        }
        tour.resize(num_nodes * 2, 0);
        depths.resize(num_nodes * 2, 0);

        let rmq = SparseTable::new(&depths);
        Ok(Self {
            tour,
            depths,
            first_visit,
            rmq,
        })
    }

    /// Lowest common ancestor of two internal ids.
    pub(crate) fn lca(&self, a: usize, b: usize) -> usize {
        if a == b {
            return a;
        }
        let mut v1 = self.first_visit[a] as usize;
        let mut v2 = self.first_visit[b] as usize;
        if v1 > v2 {
            std::mem::swap(&mut v1, &mut v2);
        }
        self.tour[self.rmq.query(v1, v2, &self.depths)] as usize
    }

    #[cfg(test)]
    fn first_visit_of(&self, id: usize) -> usize {
        self.first_visit[id] as usize
    }
}

/// Sparse table answering range-minimum queries over the tour depths.
///
/// `M[i][j]` is the position of the minimum depth in `[i, i + 2^j - 1]`,
/// ties resolved towards the lower position. Stored as one contiguous
/// row-major buffer.
#[derive(Debug)]
struct SparseTable {
    table: Vec<u32>,
    cols: usize,
}

impl SparseTable {
    fn new(depths: &[u32]) -> Self {
        let rows = depths.len();
        let cols = rows.ilog2() as usize + 1;
        let mut table = vec![0u32; rows * cols];

        for i in 0..rows {
            table[i * cols] = i as u32;
        }

        let mut j = 1;
        while (1 << j) <= rows {
            for i in 0..rows {
                if i + (1 << j) - 1 >= rows {
                    break;
                }
                let a = table[i * cols + j - 1];
                let b = table[(i + (1 << (j - 1))) * cols + j - 1];
                table[i * cols + j] = if depths[a as usize] <= depths[b as usize] {
                    a
                } else {
                    b
                };
            }
            j += 1;
        }

        Self { table, cols }
    }

    /// Position of the minimum depth in `[i, j]`, `i <= j`, preferring the
    /// lower position on ties.
    fn query(&self, i: usize, j: usize, depths: &[u32]) -> usize {
        debug_assert!(i <= j);
        let k = (j - i + 1).ilog2() as usize;
        let a = self.table[i * self.cols + k] as usize;
        let b = self.table[(j + 1 - (1 << k)) * self.cols + k] as usize;
        if depths[a] <= depths[b] { a } else { b }
    }
}
