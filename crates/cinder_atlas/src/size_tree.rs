//! # Size Tree
//!
//! Height-balanced binary tree of `(width, height)`-tagged leaves, used by
//! the packer as its free-rectangle index.
//!
//! Every branch stores the tight bounding box and height of its subtree, so
//! a best-fit search can discard whole subtrees that cannot hold a request.
//! Nodes live in a pre-allocated slot arena with a free list; callers hold
//! opaque leaf handles, never node references.

/// Opaque handle to a stored leaf.
///
/// Valid only until the leaf is removed; the slot may be recycled afterwards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LeafId(u32);

/// Payload or children - a node is exactly one of the two.
enum NodeKind<T> {
    /// Terminal node carrying caller data.
    Leaf(T),
    /// Branching node with exactly two children.
    Branch([u32; 2]),
}

/// One arena slot.
struct Node<T> {
    /// Bounding-box width: own width for leaves, max of children for branches.
    w: u32,
    /// Bounding-box height, same rule.
    h: u32,
    /// Subtree height; leaves are 0.
    height: u32,
    /// Parent slot, `None` for the root.
    parent: Option<u32>,
    /// Leaf payload or branch children.
    kind: NodeKind<T>,
}

/// A balanced binary tree keyed purely on item size.
///
/// Supports greedy minimum-cost insertion, removal by handle, and a pruning
/// best-fit search. All operations are total: an empty tree is a valid
/// state and searches on it simply return `None`.
///
/// # Thread Safety
///
/// NOT thread-safe. The owning packer serializes access.
pub struct SizeTree<T> {
    /// Slot arena; freed slots are `None` until recycled.
    nodes: Vec<Option<Node<T>>>,
    /// Free list - indices of recyclable slots.
    free: Vec<u32>,
    /// Root slot, `None` when empty.
    root: Option<u32>,
    /// Number of stored leaves.
    leaves: usize,
}

impl<T> SizeTree<T> {
    /// Creates an empty tree.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            nodes: Vec::new(),
            free: Vec::new(),
            root: None,
            leaves: 0,
        }
    }

    /// Returns the number of stored leaves.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.leaves
    }

    /// Returns true when no leaves are stored.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.leaves == 0
    }

    /// Returns the payload of a live leaf, `None` for stale handles.
    #[must_use]
    pub fn get(&self, leaf: LeafId) -> Option<&T> {
        match &self.nodes.get(leaf.0 as usize)?.as_ref()?.kind {
            NodeKind::Leaf(data) => Some(data),
            NodeKind::Branch(_) => None,
        }
    }

    /// Returns the `(width, height)` of a live leaf, `None` for stale handles.
    #[must_use]
    pub fn dims(&self, leaf: LeafId) -> Option<(u32, u32)> {
        let node = self.nodes.get(leaf.0 as usize)?.as_ref()?;
        match node.kind {
            NodeKind::Leaf(_) => Some((node.w, node.h)),
            NodeKind::Branch(_) => None,
        }
    }

    /// Inserts a leaf of size `(w, h)` at the greedy minimum-cost position.
    ///
    /// Descends from the root, at each branch weighing the cost of pairing
    /// with the whole branch against descending into either child, then
    /// splices a new branch above the chosen sibling and rebalances every
    /// ancestor. O(log n) amortized.
    pub fn insert(&mut self, data: T, w: u32, h: u32) -> LeafId {
        let leaf = self.alloc(Node {
            w,
            h,
            height: 0,
            parent: None,
            kind: NodeKind::Leaf(data),
        });
        self.leaves += 1;

        let Some(root) = self.root else {
            self.root = Some(leaf);
            return LeafId(leaf);
        };

        // Pick the sibling the new leaf will pair with.
        let mut current = root;
        loop {
            let node = self.node(current);
            let NodeKind::Branch([child0, child1]) = node.kind else {
                break;
            };
            let ncost = node.w.max(w) + node.h.max(h);
            let inherit = ncost - (node.w + node.h);
            let cost0 = self.descend_cost(child0, w, h, inherit);
            let cost1 = self.descend_cost(child1, w, h, inherit);
            // Strictly cheaper, or keep descending. A branch child's cost
            // never exceeds ncost, so pairing only ever happens against a
            // leaf or a two-leaf branch - one rotation per ancestor is then
            // enough to restore balance.
            if ncost < cost0 && ncost < cost1 {
                break;
            }
            current = if cost0 <= cost1 { child0 } else { child1 };
        }

        // Splice a new branch above the chosen sibling.
        let old_parent = self.node(current).parent;
        let branch = self.alloc(Node {
            w: 0,
            h: 0,
            height: 0,
            parent: old_parent,
            kind: NodeKind::Branch([current, leaf]),
        });
        self.node_mut(current).parent = Some(branch);
        self.node_mut(leaf).parent = Some(branch);
        match old_parent {
            None => self.root = Some(branch),
            Some(parent) => self.replace_child(parent, current, branch),
        }
        self.refresh(branch);
        if let Some(parent) = old_parent {
            self.filter_up(parent);
        }

        LeafId(leaf)
    }

    /// Incremental cost of descending into `child` with a `(w, h)` leaf.
    ///
    /// `inherit` is the growth cost of the current node; a branch child's
    /// own growth cost is subtracted back out so it is not counted twice.
    fn descend_cost(&self, child: u32, w: u32, h: u32, inherit: u32) -> u32 {
        let node = self.node(child);
        let pair = node.w.max(w) + node.h.max(h);
        match node.kind {
            NodeKind::Leaf(_) => pair + inherit,
            NodeKind::Branch(_) => pair + inherit - (pair - (node.w + node.h)),
        }
    }

    /// Removes a leaf, promoting its sibling and rebalancing ancestors.
    ///
    /// # Returns
    ///
    /// The leaf payload, or `None` for a stale or already-removed handle.
    pub fn remove(&mut self, leaf: LeafId) -> Option<T> {
        let id = leaf.0;
        let is_live_leaf = matches!(
            self.nodes.get(id as usize),
            Some(Some(Node {
                kind: NodeKind::Leaf(_),
                ..
            }))
        );
        if !is_live_leaf {
            return None;
        }

        let parent = self.node(id).parent;
        let node = self.dealloc(id);
        let NodeKind::Leaf(data) = node.kind else {
            return None;
        };
        self.leaves -= 1;

        match parent {
            None => self.root = None,
            Some(parent_id) => {
                // Promote the sibling into the parent's position.
                let [child0, child1] = self.children(parent_id);
                let sibling = if child0 == id { child1 } else { child0 };
                let grand = self.node(parent_id).parent;
                let _ = self.dealloc(parent_id);
                self.node_mut(sibling).parent = grand;
                match grand {
                    None => self.root = Some(sibling),
                    Some(grand_id) => {
                        self.replace_child(grand_id, parent_id, sibling);
                        self.filter_up(grand_id);
                    }
                }
            }
        }
        Some(data)
    }

    /// Finds the cheapest leaf at least `(w, h)` large.
    ///
    /// Depth-first over an explicit stack, pruning any subtree whose
    /// bounding box is too small in either dimension. `cost(w, h, data)`
    /// returning `None` marks a perfect fit and ends the search at once;
    /// otherwise the first leaf with the strictly-smallest finite cost wins.
    pub fn search_best_fit<F>(&self, w: u32, h: u32, mut cost: F) -> Option<LeafId>
    where
        F: FnMut(u32, u32, &T) -> Option<f32>,
    {
        let mut stack = vec![self.root?];
        let mut best: Option<(f32, u32)> = None;

        while let Some(id) = stack.pop() {
            let node = self.node(id);
            if node.w < w || node.h < h {
                continue;
            }
            match &node.kind {
                NodeKind::Branch([child0, child1]) => {
                    // Child 0 is explored first - keeps tie-breaking stable.
                    stack.push(*child1);
                    stack.push(*child0);
                }
                NodeKind::Leaf(data) => match cost(w, h, data) {
                    None => return Some(LeafId(id)),
                    Some(c) if c.is_finite() => {
                        if best.map_or(true, |(b, _)| c < b) {
                            best = Some((c, id));
                        }
                    }
                    Some(_) => {}
                },
            }
        }
        best.map(|(_, id)| LeafId(id))
    }

    /// Generic depth-first walk.
    ///
    /// `visit(w, h, data)` receives each node's bounding box, with the
    /// payload for leaves, and returns whether to descend into children
    /// (meaningless for leaves - they have none).
    pub fn traverse<F>(&self, mut visit: F)
    where
        F: FnMut(u32, u32, Option<&T>) -> bool,
    {
        let Some(root) = self.root else {
            return;
        };
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let node = self.node(id);
            let data = match &node.kind {
                NodeKind::Leaf(data) => Some(data),
                NodeKind::Branch(_) => None,
            };
            if visit(node.w, node.h, data) {
                if let NodeKind::Branch([child0, child1]) = node.kind {
                    stack.push(child1);
                    stack.push(child0);
                }
            }
        }
    }

    // ------------------------------------------------------------------
    // Arena plumbing
    // ------------------------------------------------------------------

    /// Stores a node, recycling a freed slot when one is available.
    fn alloc(&mut self, node: Node<T>) -> u32 {
        match self.free.pop() {
            Some(id) => {
                self.nodes[id as usize] = Some(node);
                id
            }
            None => {
                let id = u32::try_from(self.nodes.len()).expect("node arena exceeds u32 indices");
                self.nodes.push(Some(node));
                id
            }
        }
    }

    /// Empties a slot and queues it for reuse.
    fn dealloc(&mut self, id: u32) -> Node<T> {
        let node = self.nodes[id as usize]
            .take()
            .expect("dealloc of an empty node slot");
        self.free.push(id);
        node
    }

    fn node(&self, id: u32) -> &Node<T> {
        self.nodes[id as usize]
            .as_ref()
            .expect("node id points at an empty slot")
    }

    fn node_mut(&mut self, id: u32) -> &mut Node<T> {
        self.nodes[id as usize]
            .as_mut()
            .expect("node id points at an empty slot")
    }

    /// Children of a branch. Panics on leaves - branches always have two.
    fn children(&self, id: u32) -> [u32; 2] {
        match self.node(id).kind {
            NodeKind::Branch(children) => children,
            NodeKind::Leaf(_) => panic!("leaf node has no children"),
        }
    }

    /// Swaps `old` for `new` in the parent's child slots.
    fn replace_child(&mut self, parent: u32, old: u32, new: u32) {
        let node = self.node_mut(parent);
        if let NodeKind::Branch(children) = &mut node.kind {
            for child in children {
                if *child == old {
                    *child = new;
                    return;
                }
            }
        }
        panic!("child link not found during relink");
    }

    // ------------------------------------------------------------------
    // Balancing
    // ------------------------------------------------------------------

    /// Recomputes a branch's bounding box and height from its children.
    fn refresh(&mut self, id: u32) {
        if let NodeKind::Branch([child0, child1]) = self.node(id).kind {
            let (w0, h0, height0) = {
                let child = self.node(child0);
                (child.w, child.h, child.height)
            };
            let (w1, h1, height1) = {
                let child = self.node(child1);
                (child.w, child.h, child.height)
            };
            let node = self.node_mut(id);
            node.w = w0.max(w1);
            node.h = h0.max(h1);
            node.height = 1 + height0.max(height1);
        }
    }

    /// Rebalances and refreshes every node from `start` up to the root.
    fn filter_up(&mut self, start: u32) {
        let mut current = Some(start);
        while let Some(id) = current {
            let id = self.balance(id);
            self.refresh(id);
            current = self.node(id).parent;
        }
    }

    /// Single AVL-style rotation when a branch's children differ in height
    /// by more than one.
    ///
    /// The taller child (`rotate`) keeps its taller grandchild and takes
    /// this node as its other child; the shorter grandchild (`swing`) moves
    /// into the vacated slot. Returns the node now occupying the original
    /// position.
    fn balance(&mut self, id: u32) -> u32 {
        let node = self.node(id);
        let NodeKind::Branch([child0, child1]) = node.kind else {
            return id;
        };
        if node.height < 2 {
            return id;
        }
        let height0 = self.node(child0).height;
        let height1 = self.node(child1).height;
        if height0.abs_diff(height1) <= 1 {
            return id;
        }

        let rotate = if height0 > height1 { child0 } else { child1 };
        // The taller child of an unbalanced branch is itself a branch.
        let [grand0, grand1] = self.children(rotate);
        let swing = if self.node(grand0).height >= self.node(grand1).height {
            grand1
        } else {
            grand0
        };

        let parent = self.node(id).parent;
        self.replace_child(id, rotate, swing);
        self.replace_child(rotate, swing, id);
        self.node_mut(rotate).parent = parent;
        self.node_mut(id).parent = Some(rotate);
        self.node_mut(swing).parent = Some(id);
        match parent {
            None => self.root = Some(rotate),
            Some(parent_id) => self.replace_child(parent_id, id, rotate),
        }

        self.refresh(id);
        self.refresh(rotate);
        rotate
    }
}

impl<T> Default for SizeTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    /// Walks the whole tree checking every structural invariant:
    /// parent links, tight bounding boxes, heights, and AVL balance.
    fn assert_invariants<T>(tree: &SizeTree<T>) {
        let Some(root) = tree.root else {
            assert_eq!(tree.leaves, 0);
            return;
        };
        assert_eq!(tree.node(root).parent, None);

        let mut leaf_count = 0;
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let node = tree.node(id);
            match &node.kind {
                NodeKind::Leaf(_) => {
                    assert_eq!(node.height, 0, "leaf height must be 0");
                    leaf_count += 1;
                }
                NodeKind::Branch([child0, child1]) => {
                    let first = tree.node(*child0);
                    let second = tree.node(*child1);
                    assert_eq!(first.parent, Some(id));
                    assert_eq!(second.parent, Some(id));
                    assert_eq!(node.w, first.w.max(second.w), "loose bounding width");
                    assert_eq!(node.h, first.h.max(second.h), "loose bounding height");
                    assert_eq!(node.height, 1 + first.height.max(second.height));
                    assert!(
                        first.height.abs_diff(second.height) <= 1,
                        "balance violated: {} vs {}",
                        first.height,
                        second.height
                    );
                    stack.push(*child0);
                    stack.push(*child1);
                }
            }
        }
        assert_eq!(leaf_count, tree.leaves);
    }

    /// Cost by wasted area, no perfect-fit sentinel.
    #[allow(clippy::cast_precision_loss)]
    fn waste(w: u32, h: u32, dims: &(u32, u32)) -> Option<f32> {
        Some((dims.0 * dims.1) as f32 - (w * h) as f32)
    }

    #[test]
    fn test_single_leaf_tree() {
        let mut tree = SizeTree::new();
        let leaf = tree.insert("only", 8, 4);

        assert_eq!(tree.len(), 1);
        assert_eq!(tree.get(leaf), Some(&"only"));
        assert_eq!(tree.dims(leaf), Some((8, 4)));
        assert_invariants(&tree);

        assert_eq!(tree.remove(leaf), Some("only"));
        assert!(tree.is_empty());
        assert_invariants(&tree);
    }

    #[test]
    fn test_stale_handle_is_rejected() {
        let mut tree = SizeTree::new();
        let leaf = tree.insert(1, 2, 2);
        assert_eq!(tree.remove(leaf), Some(1));
        assert_eq!(tree.remove(leaf), None);
        assert_eq!(tree.get(leaf), None);
    }

    #[test]
    fn test_exact_match_ends_search_early() {
        let mut tree = SizeTree::new();
        tree.insert((10, 10), 10, 10);
        tree.insert((10, 10), 10, 10);
        tree.insert((20, 5), 20, 5);
        assert_invariants(&tree);

        let mut evaluated = 0;
        let found = tree
            .search_best_fit(10, 10, |w, h, dims| {
                evaluated += 1;
                if dims.0 == w && dims.1 == h {
                    None
                } else {
                    waste(w, h, dims)
                }
            })
            .expect("an exact fit exists");

        assert_eq!(tree.dims(found), Some((10, 10)));
        // The sentinel fires on the first (10,10) leaf evaluated.
        assert_eq!(evaluated, 1);
    }

    #[test]
    fn test_search_prunes_undersized_subtrees() {
        let mut tree = SizeTree::new();
        tree.insert((4, 4), 4, 4);
        tree.insert((6, 2), 6, 2);
        tree.insert((30, 30), 30, 30);

        let mut evaluated = 0;
        let found = tree.search_best_fit(20, 20, |w, h, dims| {
            evaluated += 1;
            waste(w, h, dims)
        });

        assert_eq!(tree.dims(found.expect("large leaf fits")), Some((30, 30)));
        // The two small leaves are never costed - their subtree is pruned.
        assert_eq!(evaluated, 1);
    }

    #[test]
    fn test_search_empty_tree() {
        let tree: SizeTree<u32> = SizeTree::default();
        assert_eq!(tree.search_best_fit(1, 1, |_, _, _| Some(0.0)), None);
    }

    #[test]
    fn test_search_ignores_non_finite_costs() {
        let mut tree = SizeTree::new();
        tree.insert(1, 5, 5);
        let found = tree.search_best_fit(1, 1, |_, _, _| Some(f32::INFINITY));
        assert_eq!(found, None);
    }

    #[test]
    fn test_traverse_visits_all_leaves() {
        let mut tree = SizeTree::new();
        for size in 1..=6_u32 {
            tree.insert(size, size, size);
        }

        let mut visited = Vec::new();
        tree.traverse(|_, _, data| {
            if let Some(size) = data {
                visited.push(*size);
                false
            } else {
                true
            }
        });

        visited.sort_unstable();
        assert_eq!(visited, vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_sequential_inserts_stay_balanced() {
        let mut tree = SizeTree::new();
        for i in 0..64_u32 {
            // Monotonically growing sizes - worst case for a naive tree.
            tree.insert(i, i + 1, i + 1);
            assert_invariants(&tree);
        }
        assert_eq!(tree.len(), 64);
    }

    #[test]
    fn test_identical_sizes_stay_balanced() {
        // Equal sizes make every pairing cost tie; the descent must keep
        // going to the bottom instead of stacking a spine off the root.
        let mut tree = SizeTree::new();
        for i in 0..64_u32 {
            tree.insert(i, 10, 10);
            assert_invariants(&tree);
        }
    }

    #[test]
    fn test_random_churn_preserves_invariants() {
        let mut rng = ChaCha8Rng::seed_from_u64(0x512E);
        let mut tree = SizeTree::new();
        let mut handles = Vec::new();

        for step in 0..500 {
            if handles.is_empty() || rng.gen_bool(0.6) {
                let w = rng.gen_range(1..=512);
                let h = rng.gen_range(1..=512);
                handles.push(tree.insert(step, w, h));
            } else {
                let index = rng.gen_range(0..handles.len());
                let handle = handles.swap_remove(index);
                assert!(tree.remove(handle).is_some());
            }
            assert_invariants(&tree);
            assert_eq!(tree.len(), handles.len());
        }
    }
}
