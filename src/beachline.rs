//! The beach line: the sequence of parabolic arcs currently facing the
//! sweepline, ordered left to right by breakpoint position.
//!
//! Arcs are identified by a small dense id, not by their tree slot, so that
//! other components (the event queue, `breakpoint_edge_index`) can refer to
//! an arc without caring where in the tree it currently lives.

use crate::avl_tree::{AvlTree, Index};
use crate::error::VoronoiError;
use crate::geometry::{self, Point};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Arc {
    site: usize,
    arc_id: usize,
}

pub struct BeachLine {
    tree: AvlTree<Arc>,
    node_by_arc: Vec<Option<Index>>,
    free_ids: Vec<usize>,
    max_arcs: usize,
}

impl BeachLine {
    /// `max_arcs` bounds the number of arcs alive at once; for `n` sites
    /// this is `max(2n - 1, 1)`, the most arcs Fortune's algorithm can have
    /// on the beach line simultaneously.
    pub fn new(max_arcs: usize) -> Self {
        BeachLine {
            tree: AvlTree::new(),
            node_by_arc: vec![None; max_arcs],
            free_ids: (0..max_arcs).rev().collect(),
            max_arcs,
        }
    }

    pub fn max_arc_count(&self) -> usize {
        self.max_arcs
    }

    fn alloc_id(&mut self) -> Result<usize, VoronoiError> {
        self.free_ids
            .pop()
            .ok_or(VoronoiError::CapacityExceeded {
                max_arcs: self.max_arcs,
            })
    }

    fn locate(&self, x: f64, sweep_y: f64, sites: &[Point]) -> Option<Index> {
        self.tree.search(|idx| {
            let arc = self.tree.get(idx);
            if let Some(l) = self.tree.prev(idx) {
                let left_site = self.tree.get(l).site;
                let bx = geometry::breakpoint_x(sites[left_site], sites[arc.site], sweep_y, false);
                if x < bx {
                    return -1;
                }
            }
            if let Some(r) = self.tree.next(idx) {
                let right_site = self.tree.get(r).site;
                let bx = geometry::breakpoint_x(sites[arc.site], sites[right_site], sweep_y, true);
                if x > bx {
                    return 1;
                }
            }
            0
        })
    }

    /// Inserts a new arc for `site`, splitting whichever existing arc
    /// currently sits above `site`'s x coordinate (or creating the very
    /// first arc, if the beach line is empty). Returns the new arc's id.
    pub fn insert_arc(
        &mut self,
        site: usize,
        sweep_y: f64,
        sites: &[Point],
    ) -> Result<usize, VoronoiError> {
        let base = self.locate(sites[site].x, sweep_y, sites);

        let base = match base {
            None => {
                let arc_id = self.alloc_id()?;
                let node = self.tree.insert_before(None, Arc { site, arc_id });
                self.node_by_arc[arc_id] = Some(node);
                return Ok(arc_id);
            }
            Some(base) => base,
        };

        let base_site = self.tree.get(base).site;

        let left_id = self.alloc_id()?;
        let left_node = self
            .tree
            .insert_before(Some(base), Arc { site: base_site, arc_id: left_id });
        self.node_by_arc[left_id] = Some(left_node);

        match self.alloc_id() {
            Ok(new_id) => {
                let new_node = self
                    .tree
                    .insert_before(Some(base), Arc { site, arc_id: new_id });
                self.node_by_arc[new_id] = Some(new_node);
                Ok(new_id)
            }
            Err(e) => {
                // Undo the left-half split so a failed insert leaves the
                // beach line exactly as it was.
                self.remove_arc(left_id);
                Err(e)
            }
        }
    }

    pub fn remove_arc(&mut self, arc_id: usize) {
        let node = match self.node_by_arc[arc_id].take() {
            Some(node) => node,
            None => return,
        };
        let BeachLine {
            tree, node_by_arc, ..
        } = self;
        tree.erase(node, |moved_node, arc| {
            node_by_arc[arc.arc_id] = Some(moved_node);
        });
        self.free_ids.push(arc_id);
    }

    pub fn origin_site(&self, arc_id: usize) -> usize {
        let node = self.node_by_arc[arc_id].expect("origin_site on a removed arc");
        self.tree.get(node).site
    }

    pub fn left(&self, arc_id: usize) -> Option<usize> {
        let node = self.node_by_arc[arc_id]?;
        let prev = self.tree.prev(node)?;
        Some(self.tree.get(prev).arc_id)
    }

    pub fn right(&self, arc_id: usize) -> Option<usize> {
        let node = self.node_by_arc[arc_id]?;
        let next = self.tree.next(node)?;
        Some(self.tree.get(next).arc_id)
    }

    pub fn leftmost(&self) -> Option<usize> {
        self.tree.leftmost().map(|idx| self.tree.get(idx).arc_id)
    }

    pub fn rightmost(&self) -> Option<usize> {
        self.tree.rightmost().map(|idx| self.tree.get(idx).arc_id)
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }
}
