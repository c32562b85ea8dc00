use core::cmp::Ordering;
use core::ops::AddAssign;

use log::{debug, trace};

use super::arena::Arena;
use super::link::Link;
use super::node::{Color, Node, Side};
use crate::error::InvariantViolation;
use crate::{Count, Id};

/// The red-black tree backing `OrderedCountIndex`.
///
/// Nodes live in an arena and refer to each other through [`Link`]s. Child
/// links own the structure; parent links are back-references used to walk
/// upward during rebalancing, aggregate refreshes and in-order stepping.
#[derive(Clone)]
pub(crate) struct RawCountTree {
    /// Arena storing all tree nodes.
    nodes: Arena<Node>,
    /// Link to the root node, if the tree is non-empty.
    root: Option<Link>,
}

/// Where a descent for an id ended.
enum Search {
    /// The tree has no nodes.
    Empty,
    /// A node with the id exists.
    Found(Link),
    /// The id is absent; it belongs in the empty `Side` slot of this node.
    Vacant(Link, Side),
}

impl RawCountTree {
    /// Creates a new, empty tree.
    pub(crate) const fn new() -> Self {
        Self {
            nodes: Arena::new(),
            root: None,
        }
    }

    /// Creates a new tree with room for `capacity` nodes.
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Arena::with_capacity(capacity),
            root: None,
        }
    }

    /// Returns the number of ids in the tree.
    pub(crate) const fn len(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) const fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub(crate) fn capacity(&self) -> usize {
        self.nodes.capacity()
    }

    pub(crate) fn clear(&mut self) {
        debug!("clearing index of {} ids", self.len());
        self.nodes.clear();
        self.root = None;
    }

    /// Returns a reference to a node by link.
    #[inline]
    pub(crate) fn node(&self, link: Link) -> &Node {
        &self.nodes[link]
    }

    /// Sum of every count in the tree.
    pub(crate) fn total(&self) -> u128 {
        self.sum_of(self.root)
    }

    // ─── Aggregates and colors of possibly-absent children ─────────────────

    #[inline]
    fn is_red(&self, link: Option<Link>) -> bool {
        link.is_some_and(|link| self.nodes[link].is_red())
    }

    #[inline]
    fn size_of(&self, link: Option<Link>) -> usize {
        link.map_or(0, |link| self.nodes[link].size)
    }

    #[inline]
    fn sum_of(&self, link: Option<Link>) -> u128 {
        link.map_or(0, |link| self.nodes[link].sum)
    }

    /// Recomputes `size` and `sum` of one node from its children.
    fn refresh(&mut self, link: Link) {
        let node = &self.nodes[link];
        let size = 1 + self.size_of(node.left) + self.size_of(node.right);
        let sum = u128::from(node.count) + self.sum_of(node.left) + self.sum_of(node.right);

        let node = &mut self.nodes[link];
        node.size = size;
        node.sum = sum;
    }

    /// Recomputes aggregates from `start` up to the root.
    fn refresh_upward(&mut self, start: Option<Link>) {
        let mut cursor = start;
        while let Some(link) = cursor {
            self.refresh(link);
            cursor = self.nodes[link].parent;
        }
    }

    // ─── Structural helpers ────────────────────────────────────────────────

    /// The side of `parent` that `child` hangs from.
    fn side_in_parent(&self, parent: Link, child: Link) -> Side {
        self.nodes[parent]
            .side_of(child)
            .expect("`RawCountTree::side_in_parent()` - `child` is not a child of `parent`!")
    }

    /// Points whatever referenced `old` (its parent's slot, or the root) at `new`.
    /// The parent link of `new` is left for the caller.
    fn replace_child(&mut self, parent: Option<Link>, old: Link, new: Option<Link>) {
        match parent {
            None => self.root = new,
            Some(parent) => {
                let side = self.side_in_parent(parent, old);
                self.nodes[parent].set_child(side, new);
            }
        }
    }

    /// Rotates the subtree at `pivot` toward `toward`: the child on the other
    /// side rises into `pivot`'s place and `pivot` becomes its `toward` child.
    fn rotate(&mut self, pivot: Link, toward: Side) {
        let rising = self.nodes[pivot]
            .child(toward.opposite())
            .expect("`RawCountTree::rotate()` - no child to rotate into place!");
        let inner = self.nodes[rising].child(toward);
        let parent = self.nodes[pivot].parent;

        self.nodes[pivot].set_child(toward.opposite(), inner);
        if let Some(inner) = inner {
            self.nodes[inner].parent = Some(pivot);
        }

        self.replace_child(parent, pivot, Some(rising));
        self.nodes[rising].parent = parent;

        self.nodes[rising].set_child(toward, Some(pivot));
        self.nodes[pivot].parent = Some(rising);

        // `rising` now spans exactly what `pivot` used to.
        let (size, sum) = (self.nodes[pivot].size, self.nodes[pivot].sum);
        let node = &mut self.nodes[rising];
        node.size = size;
        node.sum = sum;
        self.refresh(pivot);
    }

    fn extreme(&self, mut link: Link, side: Side) -> Link {
        while let Some(child) = self.nodes[link].child(side) {
            link = child;
        }
        link
    }

    // ─── Lookup ────────────────────────────────────────────────────────────

    fn search(&self, id: Id) -> Search {
        let Some(mut current) = self.root else {
            return Search::Empty;
        };

        loop {
            let node = &self.nodes[current];
            let side = match id.cmp(&node.id) {
                Ordering::Equal => return Search::Found(current),
                Ordering::Less => Side::Left,
                Ordering::Greater => Side::Right,
            };
            match node.child(side) {
                Some(child) => current = child,
                None => return Search::Vacant(current, side),
            }
        }
    }

    pub(crate) fn find(&self, id: Id) -> Option<Link> {
        match self.search(id) {
            Search::Found(link) => Some(link),
            Search::Empty | Search::Vacant(..) => None,
        }
    }

    pub(crate) fn get(&self, id: Id) -> Option<Count> {
        self.find(id).map(|link| self.nodes[link].count)
    }

    // ─── Insertion ─────────────────────────────────────────────────────────

    /// Inserts `id` with `count`. An existing id keeps its node and has its
    /// count replaced; the previous count is returned.
    pub(crate) fn insert(&mut self, id: Id, count: Count) -> Option<Count> {
        match self.search(id) {
            Search::Found(link) => Some(self.set_count(link, count)),
            vacancy => {
                self.attach(vacancy, id, count);
                None
            }
        }
    }

    /// Adds `delta` to the count of `id`, inserting it when absent.
    /// Returns the resulting count.
    pub(crate) fn increase(&mut self, id: Id, delta: Count) -> Count {
        match self.search(id) {
            Search::Found(link) => {
                let count = self.nodes[link].count.saturating_add(delta);
                self.set_count(link, count);
                count
            }
            _ if delta == 0 => 0,
            vacancy => {
                self.attach(vacancy, id, delta);
                delta
            }
        }
    }

    /// Subtracts `delta` from the count of `id`, clamping at zero and removing
    /// the id once its count reaches zero. Returns the resulting count.
    pub(crate) fn reduce(&mut self, id: Id, delta: Count) -> Count {
        let Some(link) = self.find(id) else {
            return 0;
        };
        let current = self.nodes[link].count;
        if delta == 0 {
            return current;
        }

        let remaining = current.saturating_sub(delta);
        if remaining == 0 {
            self.remove_link(link);
        } else {
            self.set_count(link, remaining);
        }
        remaining
    }

    /// Overwrites the count stored at `link`, returning the old one.
    fn set_count(&mut self, link: Link, count: Count) -> Count {
        let previous = core::mem::replace(&mut self.nodes[link].count, count);
        if previous != count {
            self.refresh_upward(Some(link));
        }
        previous
    }

    /// Hangs a new red node in the vacancy a failed search found, then
    /// restores the red-black invariants.
    fn attach(&mut self, vacancy: Search, id: Id, count: Count) {
        let mut node = Node::new(id, count, Color::Red);
        let link = match vacancy {
            Search::Empty => {
                let link = self.nodes.insert(node);
                self.root = Some(link);
                link
            }
            Search::Vacant(parent, side) => {
                node.parent = Some(parent);
                let link = self.nodes.insert(node);
                self.nodes[parent].set_child(side, Some(link));
                self.refresh_upward(Some(parent));
                link
            }
            Search::Found(_) => unreachable!("`RawCountTree::attach()` - id is already present"),
        };
        self.insert_fixup(link);
    }

    fn insert_fixup(&mut self, mut node: Link) {
        loop {
            let Some(parent) = self.nodes[node].parent else {
                // A: the root is always black.
                self.nodes[node].color = Color::Black;
                return;
            };

            if !self.nodes[parent].is_red() {
                // B: a red child under a black parent breaks nothing.
                return;
            }

            let grandparent = self.nodes[parent]
                .parent
                .expect("`RawCountTree::insert_fixup()` - red node without a parent!");
            let parent_side = self.side_in_parent(grandparent, parent);
            let uncle = self.nodes[grandparent].child(parent_side.opposite());

            if let Some(uncle) = uncle
                && self.nodes[uncle].is_red()
            {
                // C: push the red up a level and retry from the grandparent.
                trace!("insert fixup: recolor below {}", self.nodes[grandparent].id);
                self.nodes[parent].color = Color::Black;
                self.nodes[uncle].color = Color::Black;
                self.nodes[grandparent].color = Color::Red;
                node = grandparent;
                continue;
            }

            let mut parent = parent;
            if self.nodes[parent].child(parent_side.opposite()) == Some(node) {
                // D: an inner grandchild is turned into an outer one.
                trace!("insert fixup: inner rotation at {}", self.nodes[parent].id);
                self.rotate(parent, parent_side);
                parent = node;
            }

            // E: the outer case finishes with one rotation at the grandparent.
            trace!("insert fixup: outer rotation at {}", self.nodes[grandparent].id);
            self.nodes[parent].color = Color::Black;
            self.nodes[grandparent].color = Color::Red;
            self.rotate(grandparent, parent_side.opposite());
            return;
        }
    }

    // ─── Deletion ──────────────────────────────────────────────────────────

    /// Deletes `id`, returning its count. Absent ids are a no-op.
    pub(crate) fn remove(&mut self, id: Id) -> Option<Count> {
        self.find(id).map(|link| self.remove_link(link))
    }

    /// Deletes the entry stored at `target` and returns its count.
    fn remove_link(&mut self, target: Link) -> Count {
        let removed = self.nodes[target].count;

        let mut victim = target;
        if let (Some(left), Some(_)) = (self.nodes[target].left, self.nodes[target].right) {
            // Relabel with the in-order predecessor, which has no right child,
            // and physically remove that node instead.
            let predecessor = self.extreme(left, Side::Right);
            let (id, count) = (self.nodes[predecessor].id, self.nodes[predecessor].count);
            let node = &mut self.nodes[target];
            node.id = id;
            node.count = count;
            self.refresh_upward(Some(target));
            victim = predecessor;
        }

        self.splice_out(victim);
        removed
    }

    /// Unlinks a node with at most one child and frees its slot.
    fn splice_out(&mut self, victim: Link) {
        let node = &self.nodes[victim];
        let (parent, color, id) = (node.parent, node.color, node.id);
        trace!("removing node {id}");

        match node.left.or(node.right) {
            Some(child) => {
                self.replace_child(parent, victim, Some(child));
                self.nodes[child].parent = parent;
                self.refresh_upward(parent);

                if color == Color::Black {
                    if self.nodes[child].is_red() {
                        self.nodes[child].color = Color::Black;
                    } else {
                        self.remove_fixup(child);
                    }
                }
            }
            None => {
                // A black leaf leaves its path one black short. Rebalance while
                // it is still attached, so it stands in for the empty slot.
                if color == Color::Black && parent.is_some() {
                    self.remove_fixup(victim);
                }
                let parent = self.nodes[victim].parent;
                self.replace_child(parent, victim, None);
                self.refresh_upward(parent);
            }
        }

        self.nodes.remove(victim);
    }

    fn sibling(&self, parent: Link, side: Side) -> Link {
        self.nodes[parent]
            .child(side.opposite())
            .expect("`RawCountTree::remove_fixup()` - short path has no sibling!")
    }

    /// Resolves a missing black on every path through `node`.
    ///
    /// The cases are tested in a fixed order; later tests rely on earlier
    /// ones having failed.
    fn remove_fixup(&mut self, mut node: Link) {
        loop {
            // 1: at the root the deficit is shared by every path.
            let Some(parent) = self.nodes[node].parent else {
                return;
            };
            let side = self.side_in_parent(parent, node);
            let mut sibling = self.sibling(parent, side);

            if self.nodes[sibling].is_red() {
                // 2: make the sibling black, then carry on with cases 3-6.
                trace!("remove fixup: red sibling at {}", self.nodes[parent].id);
                self.nodes[sibling].color = Color::Black;
                self.nodes[parent].color = Color::Red;
                self.rotate(parent, side);
                sibling = self.sibling(parent, side);
            }

            let near = self.nodes[sibling].child(side);
            let far = self.nodes[sibling].child(side.opposite());
            let nephews_black = !self.is_red(near) && !self.is_red(far);
            let sibling_black = !self.nodes[sibling].is_red();

            if !self.nodes[parent].is_red() && sibling_black && nephews_black {
                // 3: shorten the sibling's side too and move the deficit up.
                trace!("remove fixup: push deficit above {}", self.nodes[parent].id);
                self.nodes[sibling].color = Color::Red;
                node = parent;
                continue;
            }

            if self.nodes[parent].is_red() && sibling_black && nephews_black {
                // 4
                trace!("remove fixup: swap colors at {}", self.nodes[parent].id);
                self.nodes[sibling].color = Color::Red;
                self.nodes[parent].color = Color::Black;
                return;
            }

            if sibling_black
                && let Some(near) = near
                && self.nodes[near].is_red()
                && !self.is_red(far)
            {
                // 5: move the red nephew to the far side.
                trace!("remove fixup: near nephew rotation at {}", self.nodes[sibling].id);
                self.nodes[sibling].color = Color::Red;
                self.nodes[near].color = Color::Black;
                self.rotate(sibling, side.opposite());
                sibling = self.sibling(parent, side);
            }

            // 6
            trace!("remove fixup: far nephew rotation at {}", self.nodes[parent].id);
            let far = self.nodes[sibling]
                .child(side.opposite())
                .expect("`RawCountTree::remove_fixup()` - far nephew must be red here!");
            self.nodes[sibling].color = self.nodes[parent].color;
            self.nodes[parent].color = Color::Black;
            self.nodes[far].color = Color::Black;
            self.rotate(parent, side);
            return;
        }
    }

    // ─── Bulk build ────────────────────────────────────────────────────────

    /// Builds a height-balanced tree from entries sorted by id, in O(n).
    ///
    /// Every level is black except the deepest one, which is red whenever it
    /// is not full; that keeps every path's black count equal.
    ///
    /// # Panics
    ///
    /// Panics if the ids are not strictly ascending.
    pub(crate) fn from_sorted(entries: &[(Id, Count)]) -> Self {
        assert!(
            entries.windows(2).all(|pair| pair[0].0 < pair[1].0),
            "`RawCountTree::from_sorted()` - ids must be strictly ascending!"
        );

        let mut tree = Self::with_capacity(entries.len());
        if entries.is_empty() {
            return tree;
        }

        let deepest = entries.len().ilog2() as usize;
        let red_level = (!(entries.len() + 1).is_power_of_two()).then_some(deepest);
        tree.root = Some(tree.build_subtree(entries, None, 0, red_level));

        debug!("built index of {} ids, height {}", tree.len(), tree.height());
        tree
    }

    fn build_subtree(&mut self, entries: &[(Id, Count)], parent: Option<Link>, depth: usize, red_level: Option<usize>) -> Link {
        let middle = entries.len() / 2;
        let (id, count) = entries[middle];
        let color = if red_level == Some(depth) { Color::Red } else { Color::Black };

        let mut node = Node::new(id, count, color);
        node.parent = parent;
        let link = self.nodes.insert(node);

        let (before, after) = (&entries[..middle], &entries[middle + 1..]);
        let left = (!before.is_empty()).then(|| self.build_subtree(before, Some(link), depth + 1, red_level));
        let right = (!after.is_empty()).then(|| self.build_subtree(after, Some(link), depth + 1, red_level));

        let node = &mut self.nodes[link];
        node.left = left;
        node.right = right;
        self.refresh(link);
        link
    }

    // ─── Navigation ────────────────────────────────────────────────────────

    pub(crate) fn first(&self) -> Option<Link> {
        self.root.map(|root| self.extreme(root, Side::Left))
    }

    pub(crate) fn last(&self) -> Option<Link> {
        self.root.map(|root| self.extreme(root, Side::Right))
    }

    /// In-order neighbor of `link` on `side`, found through parent links.
    fn step(&self, link: Link, side: Side) -> Option<Link> {
        if let Some(child) = self.nodes[link].child(side) {
            return Some(self.extreme(child, side.opposite()));
        }

        let mut current = link;
        while let Some(parent) = self.nodes[current].parent {
            if self.nodes[parent].child(side) != Some(current) {
                return Some(parent);
            }
            current = parent;
        }
        None
    }

    pub(crate) fn successor(&self, link: Link) -> Option<Link> {
        self.step(link, Side::Right)
    }

    pub(crate) fn predecessor(&self, link: Link) -> Option<Link> {
        self.step(link, Side::Left)
    }

    /// Smallest id strictly greater than `id`.
    pub(crate) fn next_id(&self, id: Id) -> Option<Id> {
        let link = match self.search(id) {
            Search::Empty => None,
            Search::Found(link) | Search::Vacant(link, Side::Right) => self.successor(link),
            Search::Vacant(link, Side::Left) => Some(link),
        };
        link.map(|link| self.nodes[link].id)
    }

    /// Largest id strictly less than `id`.
    pub(crate) fn previous_id(&self, id: Id) -> Option<Id> {
        let link = match self.search(id) {
            Search::Empty => None,
            Search::Found(link) | Search::Vacant(link, Side::Left) => self.predecessor(link),
            Search::Vacant(link, Side::Right) => Some(link),
        };
        link.map(|link| self.nodes[link].id)
    }

    // ─── Order statistics ──────────────────────────────────────────────────

    /// Folds an aggregate over `[low, high]`.
    ///
    /// Descends to the first node inside the range, then walks each boundary
    /// down, adding whole subtrees that lie entirely inside. O(log n).
    fn fold_range<T, O, W>(&self, low: Id, high: Id, own: O, whole: W) -> T
    where
        T: Default + AddAssign,
        O: Fn(&Node) -> T,
        W: Fn(&Self, Option<Link>) -> T,
    {
        let mut total = T::default();
        if low > high {
            return total;
        }

        let mut cursor = self.root;
        let split = loop {
            let Some(link) = cursor else {
                return total;
            };
            let node = &self.nodes[link];
            if node.id < low {
                cursor = node.right;
            } else if node.id > high {
                cursor = node.left;
            } else {
                break node;
            }
        };
        total += own(split);

        let mut cursor = split.left;
        while let Some(link) = cursor {
            let node = &self.nodes[link];
            if node.id >= low {
                total += own(node);
                total += whole(self, node.right);
                cursor = node.left;
            } else {
                cursor = node.right;
            }
        }

        let mut cursor = split.right;
        while let Some(link) = cursor {
            let node = &self.nodes[link];
            if node.id <= high {
                total += own(node);
                total += whole(self, node.left);
                cursor = node.right;
            } else {
                cursor = node.left;
            }
        }

        total
    }

    /// Sum of the counts of every id in `[low, high]`.
    pub(crate) fn range_sum(&self, low: Id, high: Id) -> u128 {
        self.fold_range(low, high, |node| u128::from(node.count), Self::sum_of)
    }

    /// Number of ids in `[low, high]`.
    pub(crate) fn range_len(&self, low: Id, high: Id) -> usize {
        self.fold_range(low, high, |_| 1, Self::size_of)
    }

    /// Zero-based position of `id` in ascending order.
    pub(crate) fn rank_of(&self, id: Id) -> Option<usize> {
        let mut cursor = self.root;
        let mut rank = 0;

        while let Some(link) = cursor {
            let node = &self.nodes[link];
            match id.cmp(&node.id) {
                Ordering::Less => cursor = node.left,
                Ordering::Equal => return Some(rank + self.size_of(node.left)),
                Ordering::Greater => {
                    rank += self.size_of(node.left) + 1;
                    cursor = node.right;
                }
            }
        }
        None
    }

    /// The node at zero-based position `rank` in ascending order.
    pub(crate) fn link_by_rank(&self, rank: usize) -> Option<Link> {
        if rank >= self.len() {
            return None;
        }

        let mut cursor = self.root;
        let mut remaining = rank;
        while let Some(link) = cursor {
            let node = &self.nodes[link];
            let left_size = self.size_of(node.left);
            match remaining.cmp(&left_size) {
                Ordering::Less => cursor = node.left,
                Ordering::Equal => return Some(link),
                Ordering::Greater => {
                    remaining -= left_size + 1;
                    cursor = node.right;
                }
            }
        }
        None
    }

    // ─── Shape ─────────────────────────────────────────────────────────────

    /// Number of nodes on the longest root-to-leaf path.
    pub(crate) fn height(&self) -> usize {
        fn depth(tree: &RawCountTree, link: Option<Link>) -> usize {
            link.map_or(0, |link| {
                let node = &tree.nodes[link];
                1 + depth(tree, node.left).max(depth(tree, node.right))
            })
        }

        depth(self, self.root)
    }

    /// Checks every structural invariant and returns the number of black
    /// nodes on each path from the root down to an absent child.
    pub(crate) fn check_invariants(&self) -> Result<usize, InvariantViolation> {
        let Some(root) = self.root else {
            return Ok(0);
        };

        let node = &self.nodes[root];
        if node.parent.is_some() {
            return Err(InvariantViolation::BrokenParentLink { id: node.id });
        }
        if node.is_red() {
            return Err(InvariantViolation::RedRoot { id: node.id });
        }

        let mut previous = None;
        let black_height = self.check_subtree(root, &mut previous)?;

        if node.size != self.nodes.len() {
            return Err(InvariantViolation::SizeMismatch {
                id: node.id,
                stored: node.size,
                expected: self.nodes.len(),
            });
        }
        Ok(black_height)
    }

    fn check_subtree(&self, link: Link, previous: &mut Option<Id>) -> Result<usize, InvariantViolation> {
        let node = &self.nodes[link];

        for child in [node.left, node.right].into_iter().flatten() {
            let child_node = &self.nodes[child];
            if child_node.parent != Some(link) {
                return Err(InvariantViolation::BrokenParentLink { id: child_node.id });
            }
            if node.is_red() && child_node.is_red() {
                return Err(InvariantViolation::RedChildOfRed { id: child_node.id });
            }
        }

        let left = match node.left {
            Some(left) => self.check_subtree(left, previous)?,
            None => 0,
        };

        if let Some(previous) = *previous
            && previous >= node.id
        {
            return Err(InvariantViolation::OutOfOrder { id: node.id });
        }
        *previous = Some(node.id);

        let right = match node.right {
            Some(right) => self.check_subtree(right, previous)?,
            None => 0,
        };

        if left != right {
            return Err(InvariantViolation::BlackHeightMismatch { id: node.id, left, right });
        }

        let expected_size = 1 + self.size_of(node.left) + self.size_of(node.right);
        if node.size != expected_size {
            return Err(InvariantViolation::SizeMismatch {
                id: node.id,
                stored: node.size,
                expected: expected_size,
            });
        }

        let expected_sum = u128::from(node.count) + self.sum_of(node.left) + self.sum_of(node.right);
        if node.sum != expected_sum {
            return Err(InvariantViolation::SumMismatch {
                id: node.id,
                stored: node.sum,
                expected: expected_sum,
            });
        }

        Ok(left + usize::from(!node.is_red()))
    }
}
