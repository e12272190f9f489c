use log::{debug, trace};

use crate::beachline::BeachLine;
use crate::diagram::{HalfEdgeIndex, VoronoiDiagram};
use crate::error::VoronoiError;
use crate::event::{self, EventKind, Priority};
use crate::geometry::{self, Point};
use crate::queue::IndexedPriorityQueue;

/// Drives Fortune's sweep one event at a time.
///
/// `Algorithm` owns all of the mutable state of the sweep — the beach line,
/// the event queue, and the diagram under construction — so the sweep can
/// be paused, inspected (`sweepline_y`, `voronoi_vertex_count`) and resumed,
/// which is mostly useful for tests asserting on intermediate states.
pub struct Algorithm {
    sites: Vec<Point>,
    beach_line: BeachLine,
    queue: IndexedPriorityQueue<Priority>,
    diagram: VoronoiDiagram,
    breakpoint_edge_index: Vec<Option<HalfEdgeIndex>>,
    sweep_y: f64,
}

impl Algorithm {
    pub fn new(sites: &[Point]) -> Self {
        let n = sites.len();
        let max_arcs = (2 * n).saturating_sub(1).max(1);

        let mut queue = IndexedPriorityQueue::new(n + max_arcs);
        for (site, point) in sites.iter().enumerate() {
            queue.set(event::site_event_key(site), Priority::new(point.y, point.x));
        }

        Algorithm {
            sites: sites.to_vec(),
            beach_line: BeachLine::new(max_arcs),
            queue,
            diagram: VoronoiDiagram::new(n),
            breakpoint_edge_index: vec![None; max_arcs],
            sweep_y: f64::NEG_INFINITY,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn sweepline_y(&self) -> f64 {
        self.sweep_y
    }

    pub fn voronoi_vertex_count(&self) -> usize {
        self.diagram.vertex_count()
    }

    pub fn diagram(&self) -> &VoronoiDiagram {
        &self.diagram
    }

    pub fn into_diagram(self) -> VoronoiDiagram {
        self.diagram
    }

    /// Processes the single next event, or does nothing if the sweep is
    /// already finished. Finalizes the diagram's unbounded edges the moment
    /// the queue runs dry.
    pub fn step(&mut self) -> Result<(), VoronoiError> {
        if self.queue.is_empty() {
            return Ok(());
        }

        let (key, priority) = self.queue.pop();
        self.sweep_y = priority.y;

        match event::decode_event_key(self.sites.len(), key) {
            EventKind::Site(site) => self.handle_site_event(site)?,
            EventKind::Circle(arc_id) => self.handle_circle_event(arc_id),
        }

        if self.queue.is_empty() {
            self.finalize_unbounded_edges();
        }
        Ok(())
    }

    pub fn finish(&mut self) -> Result<(), VoronoiError> {
        while !self.is_finished() {
            self.step()?;
        }
        Ok(())
    }

    fn handle_site_event(&mut self, site: usize) -> Result<(), VoronoiError> {
        trace!("site event: site {}", site);
        let arc_id = self.beach_line.insert_arc(site, self.sweep_y, &self.sites)?;

        let left = self.beach_line.left(arc_id);
        let right = self.beach_line.right(arc_id);

        if let Some(right_id) = right {
            debug_assert!(
                left.is_some(),
                "a split always produces a left half alongside the right half"
            );

            self.queue
                .clear(event::circle_event_key(self.sites.len(), right_id));

            if let Some(left_id) = left {
                self.try_add_circle_event(left_id);
            }
            self.try_add_circle_event(right_id);

            let base_site = self.beach_line.origin_site(right_id);
            let (he_left, he_right) = self.diagram.add_edge(base_site, site);

            if let Some(left_id) = left {
                self.breakpoint_edge_index[left_id] = Some(he_left);
            }
            self.breakpoint_edge_index[arc_id] = Some(he_right);
        }

        Ok(())
    }

    fn handle_circle_event(&mut self, middle: usize) {
        trace!("circle event: arc {}", middle);

        let (left_id, right_id) = match (self.beach_line.left(middle), self.beach_line.right(middle)) {
            (Some(l), Some(r)) => (l, r),
            _ => {
                debug_assert!(false, "circle event fired for an arc without two neighbors");
                return;
            }
        };

        let left_site = self.beach_line.origin_site(left_id);
        let site = self.beach_line.origin_site(middle);
        let right_site = self.beach_line.origin_site(right_id);
        let vertex_position = geometry::circumcenter(self.sites[left_site], self.sites[site], self.sites[right_site]);

        let left_edge = self.breakpoint_edge_index[left_id];
        let right_edge = self.breakpoint_edge_index[middle];
        let (new_out, new_in) = self.diagram.add_edge(left_site, right_site);

        match (left_edge, right_edge) {
            (Some(left_edge), Some(right_edge)) => {
                self.diagram.add_vertex(vertex_position, new_in, left_edge, right_edge);
            }
            _ => debug_assert!(false, "circle event fired before both breakpoints had an edge"),
        }
        self.breakpoint_edge_index[left_id] = Some(new_out);

        self.queue
            .clear(event::circle_event_key(self.sites.len(), left_id));
        self.queue
            .clear(event::circle_event_key(self.sites.len(), right_id));

        self.beach_line.remove_arc(middle);

        self.try_add_circle_event(left_id);
        self.try_add_circle_event(right_id);
    }

    fn try_add_circle_event(&mut self, arc_id: usize) {
        let (left_id, right_id) = match (self.beach_line.left(arc_id), self.beach_line.right(arc_id)) {
            (Some(l), Some(r)) => (l, r),
            _ => return,
        };

        let left = self.sites[self.beach_line.origin_site(left_id)];
        let middle = self.sites[self.beach_line.origin_site(arc_id)];
        let right = self.sites[self.beach_line.origin_site(right_id)];

        if !geometry::is_ccw(left, middle, right) {
            return;
        }

        // Clamp to the current sweepline height: round-off in
        // `circumcircle_top_y` can otherwise schedule an event slightly
        // behind the sweep, which would break its non-decreasing invariant.
        let y = geometry::circumcircle_top_y(left, middle, right).max(self.sweep_y);
        self.queue
            .set(event::circle_event_key(self.sites.len(), arc_id), Priority::new(y, 0.0));
        debug!("scheduled circle event: arc {} at y={}", arc_id, y);
    }

    /// Once the queue is empty, every arc still on the beach line borders an
    /// unbounded edge; stitch those edges' `next`/`prev` links into the same
    /// cycle a circle event would have formed, had one existed.
    fn finalize_unbounded_edges(&mut self) {
        let leftmost = match self.beach_line.leftmost() {
            Some(arc) => arc,
            None => return,
        };
        let rightmost = self.beach_line.rightmost().expect("non-empty beach line has a rightmost arc");
        if leftmost == rightmost {
            return;
        }

        let mut arc1 = self
            .beach_line
            .left(rightmost)
            .expect("more than one arc remains, so the rightmost has a left neighbor");
        let mut arc2 = leftmost;
        while arc2 != rightmost {
            let e2 = self.breakpoint_edge_index[arc2].expect("every surviving breakpoint has an edge");
            let e1 = self.breakpoint_edge_index[arc1].expect("every surviving breakpoint has an edge");
            let twin1 = self.diagram.twin(e1);
            self.diagram.consecutive(e2, twin1);
            arc1 = arc2;
            arc2 = self
                .beach_line
                .right(arc2)
                .expect("walking toward the rightmost arc, a right neighbor must exist");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pts(coords: &[(f64, f64)]) -> Vec<Point> {
        coords.iter().map(|&(x, y)| Point::new(x, y)).collect()
    }

    #[test]
    fn empty_input_finishes_immediately() {
        let mut a = Algorithm::new(&[]);
        assert!(a.is_finished());
        a.finish().unwrap();
        assert_eq!(a.diagram().face_count(), 0);
    }

    #[test]
    fn single_site_produces_one_faceless_vertex_free_diagram() {
        let sites = pts(&[(0.0, 0.0)]);
        let mut a = Algorithm::new(&sites);
        a.finish().unwrap();
        assert_eq!(a.diagram().face_count(), 1);
        assert_eq!(a.voronoi_vertex_count(), 0);
        assert_eq!(a.diagram().edge_count(), 0);
    }

    #[test]
    fn two_sites_produce_a_single_unbounded_edge_pair() {
        let sites = pts(&[(0.0, 0.0), (2.0, 0.0)]);
        let mut a = Algorithm::new(&sites);
        a.finish().unwrap();
        assert_eq!(a.voronoi_vertex_count(), 0);
        assert_eq!(a.diagram().edge_count(), 2);
    }

    #[test]
    fn three_sites_in_a_triangle_produce_one_vertex() {
        let sites = pts(&[(0.0, 0.0), (4.0, 0.0), (2.0, 4.0)]);
        let mut a = Algorithm::new(&sites);
        a.finish().unwrap();
        assert_eq!(a.voronoi_vertex_count(), 1);
        assert_eq!(a.diagram().edge_count(), 6);
    }

    #[test]
    fn sweepline_is_monotonically_non_decreasing() {
        let sites = pts(&[(0.0, 0.0), (4.0, 0.0), (2.0, 4.0), (2.0, -4.0)]);
        let mut a = Algorithm::new(&sites);
        let mut last = f64::NEG_INFINITY;
        while !a.is_finished() {
            a.step().unwrap();
            assert!(a.sweepline_y() >= last);
            last = a.sweepline_y();
        }
    }
}
