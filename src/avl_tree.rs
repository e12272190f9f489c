//! A self-balancing binary search tree addressed by stable slot indices
//! rather than by key comparison.
//!
//! This is deliberately not a keyed `BTreeMap`-style structure: the beach
//! line's ordering depends on the current sweepline height, which no stored
//! key can capture, so every lookup is a one-off comparator descent
//! (`search`) and every mutation is positional (`insert_before`, relative to
//! an existing slot or to the end).

/// A slot index into an [`AvlTree`]. Stable across rotations; only
/// invalidated by [`AvlTree::erase`] removing that exact slot (erase instead
/// moves other nodes' *values*, which their owners are notified of via a
/// callback).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Index(usize);

struct Node<T> {
    value: T,
    parent: Option<Index>,
    left: Option<Index>,
    right: Option<Index>,
    height: i32,
}

enum Slot<T> {
    Occupied(Node<T>),
    Free { next_free: Option<usize> },
}

pub struct AvlTree<T> {
    slots: Vec<Slot<T>>,
    free_head: Option<usize>,
    root: Option<Index>,
}

impl<T: Copy> AvlTree<T> {
    pub fn new() -> Self {
        AvlTree {
            slots: Vec::new(),
            free_head: None,
            root: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn get(&self, idx: Index) -> T {
        self.node(idx).value
    }

    fn node(&self, idx: Index) -> &Node<T> {
        match &self.slots[idx.0] {
            Slot::Occupied(node) => node,
            Slot::Free { .. } => panic!("stale AvlTree index"),
        }
    }

    fn node_mut(&mut self, idx: Index) -> &mut Node<T> {
        match &mut self.slots[idx.0] {
            Slot::Occupied(node) => node,
            Slot::Free { .. } => panic!("stale AvlTree index"),
        }
    }

    fn height(&self, idx: Option<Index>) -> i32 {
        idx.map_or(0, |i| self.node(i).height)
    }

    fn update_height(&mut self, idx: Index) {
        let l = self.node(idx).left;
        let r = self.node(idx).right;
        let h = 1 + self.height(l).max(self.height(r));
        self.node_mut(idx).height = h;
    }

    fn balance_factor(&self, idx: Index) -> i32 {
        let l = self.node(idx).left;
        let r = self.node(idx).right;
        self.height(l) - self.height(r)
    }

    fn alloc(&mut self, node: Node<T>) -> Index {
        match self.free_head {
            Some(slot) => {
                self.free_head = match self.slots[slot] {
                    Slot::Free { next_free } => next_free,
                    Slot::Occupied(_) => unreachable!(),
                };
                self.slots[slot] = Slot::Occupied(node);
                Index(slot)
            }
            None => {
                self.slots.push(Slot::Occupied(node));
                Index(self.slots.len() - 1)
            }
        }
    }

    fn free(&mut self, idx: Index) {
        self.slots[idx.0] = Slot::Free {
            next_free: self.free_head,
        };
        self.free_head = Some(idx.0);
    }

    fn rotate_left(&mut self, x: Index) -> Index {
        let y = self.node(x).right.expect("rotate_left needs a right child");
        let b = self.node(y).left;
        let parent = self.node(x).parent;

        self.node_mut(x).right = b;
        if let Some(b) = b {
            self.node_mut(b).parent = Some(x);
        }

        self.node_mut(y).left = Some(x);
        self.node_mut(x).parent = Some(y);
        self.node_mut(y).parent = parent;
        self.reparent(parent, x, y);

        self.update_height(x);
        self.update_height(y);
        y
    }

    fn rotate_right(&mut self, x: Index) -> Index {
        let y = self.node(x).left.expect("rotate_right needs a left child");
        let b = self.node(y).right;
        let parent = self.node(x).parent;

        self.node_mut(x).left = b;
        if let Some(b) = b {
            self.node_mut(b).parent = Some(x);
        }

        self.node_mut(y).right = Some(x);
        self.node_mut(x).parent = Some(y);
        self.node_mut(y).parent = parent;
        self.reparent(parent, x, y);

        self.update_height(x);
        self.update_height(y);
        y
    }

    fn reparent(&mut self, parent: Option<Index>, old_child: Index, new_child: Index) {
        match parent {
            None => self.root = Some(new_child),
            Some(p) => {
                if self.node(p).left == Some(old_child) {
                    self.node_mut(p).left = Some(new_child);
                } else {
                    self.node_mut(p).right = Some(new_child);
                }
            }
        }
    }

    fn retrace(&mut self, start: Option<Index>) {
        let mut cur = start;
        while let Some(idx) = cur {
            self.update_height(idx);
            let bf = self.balance_factor(idx);
            let new_sub_root = if bf > 1 {
                let left = self.node(idx).left.unwrap();
                if self.balance_factor(left) < 0 {
                    self.rotate_left(left);
                }
                self.rotate_right(idx)
            } else if bf < -1 {
                let right = self.node(idx).right.unwrap();
                if self.balance_factor(right) > 0 {
                    self.rotate_right(right);
                }
                self.rotate_left(idx)
            } else {
                idx
            };
            cur = self.node(new_sub_root).parent;
        }
    }

    pub fn leftmost(&self) -> Option<Index> {
        self.root.map(|r| self.leftmost_from(r))
    }

    pub fn rightmost(&self) -> Option<Index> {
        self.root.map(|r| self.rightmost_from(r))
    }

    fn leftmost_from(&self, mut idx: Index) -> Index {
        while let Some(l) = self.node(idx).left {
            idx = l;
        }
        idx
    }

    fn rightmost_from(&self, mut idx: Index) -> Index {
        while let Some(r) = self.node(idx).right {
            idx = r;
        }
        idx
    }

    /// In-order predecessor of `idx`, or `None` if it is the leftmost node.
    pub fn prev(&self, idx: Index) -> Option<Index> {
        if let Some(l) = self.node(idx).left {
            return Some(self.rightmost_from(l));
        }
        let mut cur = idx;
        while let Some(p) = self.node(cur).parent {
            if self.node(p).right == Some(cur) {
                return Some(p);
            }
            cur = p;
        }
        None
    }

    /// In-order successor of `idx`, or `None` if it is the rightmost node.
    pub fn next(&self, idx: Index) -> Option<Index> {
        if let Some(r) = self.node(idx).right {
            return Some(self.leftmost_from(r));
        }
        let mut cur = idx;
        while let Some(p) = self.node(cur).parent {
            if self.node(p).left == Some(cur) {
                return Some(p);
            }
            cur = p;
        }
        None
    }

    /// Descend from the root using `compare`, which should return `<0` to go
    /// left, `>0` to go right, `0` on a match. Returns the matching slot, or
    /// `None` for an empty tree.
    pub fn search<F: FnMut(Index) -> i32>(&self, mut compare: F) -> Option<Index> {
        let mut cur = self.root;
        while let Some(idx) = cur {
            let d = compare(idx);
            if d == 0 {
                return Some(idx);
            } else if d < 0 {
                cur = self.node(idx).left;
            } else {
                cur = self.node(idx).right;
            }
        }
        None
    }

    /// Inserts `value` immediately before `cursor` in in-order position, or
    /// at the end if `cursor` is `None`.
    pub fn insert_before(&mut self, cursor: Option<Index>, value: T) -> Index {
        let node = Node {
            value,
            parent: None,
            left: None,
            right: None,
            height: 1,
        };

        if self.root.is_none() {
            let idx = self.alloc(node);
            self.root = Some(idx);
            return idx;
        }

        let (parent, as_left_child) = match cursor {
            None => (self.rightmost_from(self.root.unwrap()), false),
            Some(target) => match self.node(target).left {
                None => (target, true),
                Some(left) => (self.rightmost_from(left), false),
            },
        };

        let idx = self.alloc(node);
        self.node_mut(idx).parent = Some(parent);
        if as_left_child {
            self.node_mut(parent).left = Some(idx);
        } else {
            self.node_mut(parent).right = Some(idx);
        }
        self.retrace(Some(parent));
        idx
    }

    /// Removes `idx` from the tree. While the node has two children, its
    /// value is overwritten with its predecessor's (or successor's, if no
    /// left child) and the walk continues from there; `on_value_moved` is
    /// invoked for every slot whose value changes this way, so the caller
    /// can keep an external key-to-slot map in sync. The final, now-leaf
    /// slot is freed and its index must not be used again.
    pub fn erase<F: FnMut(Index, T)>(&mut self, mut idx: Index, mut on_value_moved: F) {
        loop {
            let left = self.node(idx).left;
            let right = self.node(idx).right;
            match (left, right) {
                (None, None) => {
                    let parent = self.node(idx).parent;
                    match parent {
                        None => self.root = None,
                        Some(p) => {
                            if self.node(p).left == Some(idx) {
                                self.node_mut(p).left = None;
                            } else {
                                self.node_mut(p).right = None;
                            }
                        }
                    }
                    self.free(idx);
                    self.retrace(parent);
                    return;
                }
                (Some(l), _) => {
                    let pred = self.rightmost_from(l);
                    let moved = self.node(pred).value;
                    self.node_mut(idx).value = moved;
                    on_value_moved(idx, moved);
                    idx = pred;
                }
                (None, Some(r)) => {
                    let succ = self.leftmost_from(r);
                    let moved = self.node(succ).value;
                    self.node_mut(idx).value = moved;
                    on_value_moved(idx, moved);
                    idx = succ;
                }
            }
        }
    }
}

impl<T: Copy> Default for AvlTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn in_order(tree: &AvlTree<i32>) -> Vec<i32> {
        let mut out = Vec::new();
        let mut cur = tree.leftmost();
        while let Some(idx) = cur {
            out.push(tree.get(idx));
            cur = tree.next(idx);
        }
        out
    }

    #[test]
    fn insert_before_end_appends() {
        let mut t: AvlTree<i32> = AvlTree::new();
        t.insert_before(None, 1);
        t.insert_before(None, 2);
        t.insert_before(None, 3);
        assert_eq!(in_order(&t), vec![1, 2, 3]);
    }

    #[test]
    fn insert_before_cursor_splits() {
        let mut t: AvlTree<i32> = AvlTree::new();
        let a = t.insert_before(None, 10);
        t.insert_before(Some(a), 5);
        assert_eq!(in_order(&t), vec![5, 10]);
    }

    #[test]
    fn prev_next_walk_in_order() {
        let mut t: AvlTree<i32> = AvlTree::new();
        let mut idxs = Vec::new();
        for v in 0..20 {
            idxs.push(t.insert_before(None, v));
        }
        assert_eq!(in_order(&t), (0..20).collect::<Vec<_>>());
        assert_eq!(t.prev(idxs[0]), None);
        assert_eq!(t.next(idxs[19]), None);
        assert_eq!(t.get(t.next(idxs[5]).unwrap()), 6);
        assert_eq!(t.get(t.prev(idxs[5]).unwrap()), 4);
    }

    #[test]
    fn erase_leaf_preserves_order() {
        let mut t: AvlTree<i32> = AvlTree::new();
        let idxs: Vec<_> = (0..5).map(|v| t.insert_before(None, v)).collect();
        t.erase(idxs[2], |_, _| panic!("leaf removal should not move values"));
        assert_eq!(in_order(&t), vec![0, 1, 3, 4]);
    }

    #[test]
    fn erase_internal_node_keeps_remaining_order() {
        let mut t: AvlTree<i32> = AvlTree::new();
        let idxs: Vec<_> = (0..10).map(|v| t.insert_before(None, v)).collect();
        t.erase(idxs[0], |_, _| {});
        assert_eq!(in_order(&t), (1..10).collect::<Vec<_>>());
    }

    #[test]
    fn stays_balanced_under_sequential_insertion() {
        let mut t: AvlTree<i32> = AvlTree::new();
        for v in 0..1000 {
            t.insert_before(None, v);
        }
        let height = t.height(t.root);
        // A perfectly balanced tree of 1000 nodes has height ~10; an
        // unbalanced chain would have height 1000.
        assert!(height < 30, "tree degenerated: height = {}", height);
    }

    #[test]
    fn freed_slots_are_reused() {
        let mut t: AvlTree<i32> = AvlTree::new();
        let idxs: Vec<_> = (0..5).map(|v| t.insert_before(None, v)).collect();
        t.erase(idxs[2], |_, _| {});
        let before = t.slots.len();
        t.insert_before(None, 99);
        assert_eq!(t.slots.len(), before, "reused a free slot instead of growing");
    }
}
