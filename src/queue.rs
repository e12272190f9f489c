/// A binary min-heap over a fixed, dense key space, with O(log n) priority
/// change and cancellation by key. This is what lets the algorithm cancel a
/// circle event it knows the key of without scanning the heap for it.
pub struct IndexedPriorityQueue<P> {
    priorities: Vec<Option<P>>,
    heap: Vec<usize>,
    heap_index: Vec<usize>,
}

impl<P: Ord + Copy> IndexedPriorityQueue<P> {
    pub fn new(key_count: usize) -> Self {
        IndexedPriorityQueue {
            priorities: vec![None; key_count],
            heap: Vec::with_capacity(key_count),
            heap_index: vec![0; key_count],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Sets (or replaces) the priority of `key`.
    pub fn set(&mut self, key: usize, priority: P) {
        self.clear(key);
        self.priorities[key] = Some(priority);
        let idx = self.heap.len();
        self.heap.push(key);
        self.heap_index[key] = idx;
        self.sift_up(idx);
    }

    /// Removes `key` from the queue if present; a no-op otherwise.
    pub fn clear(&mut self, key: usize) {
        if self.priorities[key].is_none() {
            return;
        }
        self.priorities[key] = None;
        let idx = self.heap_index[key];
        self.remove_from_heap(idx);
    }

    /// Removes and returns the key with the lowest priority.
    ///
    /// Panics in debug builds if the queue is empty; the driver only calls
    /// this after checking `is_empty`.
    pub fn pop(&mut self) -> (usize, P) {
        debug_assert!(!self.is_empty(), "pop on an empty indexed priority queue");
        let key = self.heap[0];
        let priority = self.priorities[key].take().expect("heap top has no priority");
        self.remove_from_heap(0);
        (key, priority)
    }

    fn has_higher_priority(&self, heap_idx_a: usize, heap_idx_b: usize) -> bool {
        let a = self.priorities[self.heap[heap_idx_a]].expect("heap entry without a priority");
        let b = self.priorities[self.heap[heap_idx_b]].expect("heap entry without a priority");
        a < b
    }

    fn swap_heap(&mut self, i: usize, j: usize) {
        self.heap.swap(i, j);
        self.heap_index[self.heap[i]] = i;
        self.heap_index[self.heap[j]] = j;
    }

    fn sift_up(&mut self, mut idx: usize) {
        while idx != 0 {
            let parent = (idx - 1) / 2;
            if self.has_higher_priority(parent, idx) {
                break;
            }
            self.swap_heap(idx, parent);
            idx = parent;
        }
    }

    fn remove_from_heap(&mut self, heap_idx: usize) {
        let last = self.heap.len() - 1;
        if heap_idx == last {
            self.heap.pop();
            return;
        }
        self.heap[heap_idx] = self.heap[last];
        self.heap_index[self.heap[heap_idx]] = heap_idx;
        self.heap.pop();

        let mut idx = heap_idx;
        loop {
            let left = 2 * idx + 1;
            let right = 2 * idx + 2;
            if left >= self.heap.len() {
                break;
            }
            let child = if right >= self.heap.len() || self.has_higher_priority(left, right) {
                left
            } else {
                right
            };
            if self.has_higher_priority(idx, child) {
                break;
            }
            self.swap_heap(idx, child);
            idx = child;
        }
    }
}
