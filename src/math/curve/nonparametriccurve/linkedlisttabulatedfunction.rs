use std::iter::successors;

use slotmap::{
    new_key_type,
    SlotMap
};
use tracing::{
    debug,
    trace
};

use crate::math::curve::curve::Curve;
use crate::math::curve::nonparametriccurve::accesscache::AccessCache;
use crate::math::curve::nonparametriccurve::nonparametriccurve::{
    NonparametricCurve,
    Point2D
};
use crate::math::curve::nonparametriccurve::tabulatedfunction::{
    check_between,
    check_deletable,
    check_index,
    check_unique,
    evaluate,
    uniform_grid,
    TabulatedFunction
};
use crate::math::curve::nonparametriccurve::tabulatedfunctionerror::TabulatedFunctionError;

// ─────────────────────────────────────────────
// LinkedListTabulatedFunction
// ─────────────────────────────────────────────
//
// Points live in a cyclic doubly-linked ring stored in a slot-map arena.
// Links are arena keys, so unlinking a node can never leave a dangling
// reference behind. The ring passes through a sentinel node `head`:
//
//   head.next = first point, head.prev = last point
//
// which makes both borders O(1) and lets inserts at either end use the same
// splice as inserts in the middle.
//
// The cache remembers the key of the last node reached by index. A lookup
// walks from the cached node when it is at most count / 2 steps away, and
// from the first node otherwise.

new_key_type! {
    struct NodeKey;
}

/// Payload of the sentinel. Never read and never handed out.
const SENTINEL_POINT: Point2D = Point2D::new(f64::NAN, f64::NAN);

#[derive(Debug, Clone, Copy)]
struct FunctionNode {
    point: Point2D,
    prev: NodeKey,
    next: NodeKey,
}

#[derive(Debug, Clone)]
pub struct LinkedListTabulatedFunction {
    nodes: SlotMap<NodeKey, FunctionNode>,
    head: NodeKey,
    count: usize,
    cache: AccessCache<NodeKey>,
}

impl LinkedListTabulatedFunction {
    /// `point_count` points evenly spread over `[left_x, right_x]`, all with y = 0.
    pub fn new(left_x: f64, right_x: f64, point_count: usize) -> Result<LinkedListTabulatedFunction, TabulatedFunctionError> {
        let grid = uniform_grid(left_x, right_x, point_count, |_| 0.0)?;
        Ok(Self::from_grid(grid))
    }

    /// One point per entry of `values`, evenly spread over `[left_x, right_x]`.
    pub fn from_values(left_x: f64, right_x: f64, values: &[f64]) -> Result<LinkedListTabulatedFunction, TabulatedFunctionError> {
        let grid = uniform_grid(left_x, right_x, values.len(), |i| values[i])?;
        Ok(Self::from_grid(grid))
    }

    fn from_grid(grid: impl Iterator<Item = Point2D>) -> LinkedListTabulatedFunction {
        let mut nodes = SlotMap::with_key();
        let head = nodes.insert_with_key(|key| FunctionNode {
            point: SENTINEL_POINT,
            prev: key,
            next: key,
        });
        let mut func = LinkedListTabulatedFunction {
            nodes,
            head,
            count: 0,
            cache: AccessCache::new(),
        };
        for point in grid {
            func.push_back(point);
        }
        debug!(count = func.count, "linked list tabulated function created");
        func
    }

    /// Copies of the points in ascending x order. Does not touch the cache.
    pub fn iter(&self) -> impl Iterator<Item = Point2D> + '_ {
        let first = self.link(self.nodes[self.head].next);
        successors(first, move |&key| self.link(self.nodes[key].next))
            .map(move |key| self.nodes[key].point)
    }

    /// Splices `point` in so that it becomes the point at `index`; `index ==
    /// count` appends. The x must lie strictly between the x of the points
    /// that end up on either side of it.
    pub fn insert_at(&mut self, index: usize, point: Point2D) -> Result<(), TabulatedFunctionError> {
        if index > self.count {
            return Err(TabulatedFunctionError::index_out_of_range(index, self.count));
        }
        let next = if index == self.count { self.head } else { self.walk_to(index) };
        let left = self.link(self.nodes[next].prev).map(|k| self.nodes[k].point.x());
        let right = self.link(next).map(|k| self.nodes[k].point.x());
        check_between(point.x(), left, right)?;

        self.link_before(next, point);
        self.cache.shift_for_insert(index);
        debug_assert!(self.cache_is_live());

        debug!(index, x = point.x(), count = self.count, "point inserted");
        Ok(())
    }

    /// `Some(key)` unless `key` is the sentinel.
    fn link(&self, key: NodeKey) -> Option<NodeKey> {
        (key != self.head).then_some(key)
    }

    fn first(&self) -> NodeKey {
        self.nodes[self.head].next
    }

    fn last(&self) -> NodeKey {
        self.nodes[self.head].prev
    }

    fn push_back(&mut self, point: Point2D) -> NodeKey {
        let key = self.link_before(self.head, point);
        self.cache.refresh(self.count - 1, key);
        key
    }

    /// Splices a new node holding `point` in front of `next`.
    fn link_before(&mut self, next: NodeKey, point: Point2D) -> NodeKey {
        let prev = self.nodes[next].prev;
        let key = self.nodes.insert(FunctionNode { point, prev, next });
        self.nodes[prev].next = key;
        self.nodes[next].prev = key;
        self.count += 1;
        key
    }

    fn unlink(&mut self, key: NodeKey) -> Point2D {
        let FunctionNode { point, prev, next } = self.nodes[key];
        self.nodes[prev].next = next;
        self.nodes[next].prev = prev;
        self.nodes.remove(key);
        self.count -= 1;
        point
    }

    /// Key of the node at `index`, which must already be validated. Starts
    /// from the cached node when that is close enough; leaves the cache alone.
    fn walk_to(&self, index: usize) -> NodeKey {
        let (mut position, mut key) = match self.cache.entry() {
            Some((cached_index, cached_key)) if cached_index.abs_diff(index) <= self.count / 2 => {
                (cached_index, cached_key)
            },
            _ => (0, self.first())
        };
        trace!(index, from = position, steps = position.abs_diff(index), "walking ring");

        while position < index {
            key = self.nodes[key].next;
            position += 1;
        }
        while position > index {
            key = self.nodes[key].prev;
            position -= 1;
        }
        key
    }

    /// Key of the node at `index`; the cache is moved there.
    fn node_at(&self, index: usize) -> Result<NodeKey, TabulatedFunctionError> {
        check_index(index, self.count)?;
        let key = self.walk_to(index);
        self.cache.refresh(index, key);
        Ok(key)
    }

    fn neighbors_x(&self, key: NodeKey) -> (Option<f64>, Option<f64>) {
        let FunctionNode { prev, next, .. } = self.nodes[key];
        let left = self.link(prev).map(|k| self.nodes[k].point.x());
        let right = self.link(next).map(|k| self.nodes[k].point.x());
        (left, right)
    }

    fn cache_is_live(&self) -> bool {
        self.cache.is_consistent(self.count, |_, key| key != self.head && self.nodes.contains_key(key))
    }
}

impl Curve for LinkedListTabulatedFunction {
    fn value(&self, x: f64) -> f64 {
        evaluate(self.iter(), self.left_border(), self.right_border(), x)
    }
}

impl NonparametricCurve for LinkedListTabulatedFunction {
    fn points(&self) -> Vec<Point2D> {
        self.iter().collect()
    }

    fn left_border(&self) -> f64 {
        self.nodes[self.first()].point.x()
    }

    fn right_border(&self) -> f64 {
        self.nodes[self.last()].point.x()
    }
}

impl TabulatedFunction for LinkedListTabulatedFunction {
    fn count(&self) -> usize {
        self.count
    }

    fn point(&self, index: usize) -> Result<Point2D, TabulatedFunctionError> {
        let key = self.node_at(index)?;
        Ok(self.nodes[key].point)
    }

    fn set_point(&mut self, index: usize, point: Point2D) -> Result<(), TabulatedFunctionError> {
        let key = self.node_at(index)?;
        let (left, right) = self.neighbors_x(key);
        check_between(point.x(), left, right)?;
        self.nodes[key].point = point;
        Ok(())
    }

    fn point_x(&self, index: usize) -> Result<f64, TabulatedFunctionError> {
        let key = self.node_at(index)?;
        Ok(self.nodes[key].point.x())
    }

    fn set_point_x(&mut self, index: usize, x: f64) -> Result<(), TabulatedFunctionError> {
        let key = self.node_at(index)?;
        let (left, right) = self.neighbors_x(key);
        check_between(x, left, right)?;
        let node = &mut self.nodes[key];
        node.point = node.point.with_x(x);
        Ok(())
    }

    fn point_y(&self, index: usize) -> Result<f64, TabulatedFunctionError> {
        let key = self.node_at(index)?;
        Ok(self.nodes[key].point.y())
    }

    fn set_point_y(&mut self, index: usize, y: f64) -> Result<(), TabulatedFunctionError> {
        let key = self.node_at(index)?;
        let node = &mut self.nodes[key];
        node.point = node.point.with_y(y);
        Ok(())
    }

    fn add_point(&mut self, point: Point2D) -> Result<usize, TabulatedFunctionError> {
        check_unique(self.iter(), point.x())?;

        // Full scan from the first node; the cache does not help here.
        let mut index = 0;
        let mut next = self.first();
        while next != self.head && self.nodes[next].point.x() < point.x() {
            next = self.nodes[next].next;
            index += 1;
        }
        let key = self.link_before(next, point);
        self.cache.refresh(index, key);
        debug_assert!(self.cache_is_live());

        debug!(index, x = point.x(), count = self.count, "point added");
        Ok(index)
    }

    fn delete_point(&mut self, index: usize) -> Result<Point2D, TabulatedFunctionError> {
        check_index(index, self.count)?;
        check_deletable(self.count)?;

        let key = self.walk_to(index);
        let removed = self.unlink(key);
        self.cache.shift_for_remove(index);
        debug_assert!(self.cache_is_live());

        debug!(index, count = self.count, cached = ?self.cache.entry().map(|(i, _)| i), "point deleted");
        Ok(removed)
    }
}
