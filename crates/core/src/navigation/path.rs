//! Waypoint path store
//!
//! Fixed-capacity, index-addressed buffer of recorded waypoints. The head
//! (origin) is always index 0 and the tail (most recent waypoint, current
//! guidance target) is always `len - 1`, so appends, tail removals and loop
//! truncation are plain index updates with no allocation.
//!
//! Only the owning controller mutates the store. External readers get
//! positions by value through [`ReturnPathIter`].

use heapless::Vec;

use super::types::{Position, Waypoint};
use crate::error::RtbError;

/// Default waypoint capacity
pub const RTB_POINTS_MAX: usize = 300;

/// Ordered waypoint sequence, oldest first
#[derive(Debug, Clone)]
pub struct WaypointPath<const N: usize = RTB_POINTS_MAX> {
    points: Vec<Waypoint, N>,
}

impl<const N: usize> Default for WaypointPath<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> WaypointPath<N> {
    /// Create an empty path (const fn for static initialization)
    pub const fn new() -> Self {
        Self { points: Vec::new() }
    }

    /// Number of stored waypoints
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if no waypoints are stored
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Check if the buffer has no free slot
    pub fn is_full(&self) -> bool {
        self.points.is_full()
    }

    /// Maximum number of waypoints
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Drop every waypoint
    pub fn clear(&mut self) {
        self.points.clear();
    }

    /// Origin waypoint
    pub fn head(&self) -> Option<&Waypoint> {
        self.points.first()
    }

    /// Most recent waypoint
    pub fn tail(&self) -> Option<&Waypoint> {
        self.points.last()
    }

    /// Waypoint at `index` (0 = origin)
    pub fn get(&self, index: usize) -> Option<&Waypoint> {
        self.points.get(index)
    }

    /// Append at the tail
    pub fn push(&mut self, waypoint: Waypoint) -> Result<(), RtbError> {
        self.points
            .push(waypoint)
            .map_err(|_| RtbError::StorageExhausted)
    }

    /// Remove the tail waypoint
    pub fn pop(&mut self) -> Option<Waypoint> {
        self.points.pop()
    }

    /// Keep waypoints `0..=index`, dropping everything after
    ///
    /// Returns the number of waypoints removed.
    pub fn truncate_after(&mut self, index: usize) -> usize {
        let keep = (index + 1).min(self.points.len());
        let removed = self.points.len() - keep;
        self.points.truncate(keep);
        removed
    }

    /// Remove an interior waypoint and shift the remainder toward the head
    pub fn remove(&mut self, index: usize) -> Option<Waypoint> {
        if index < self.points.len() {
            Some(self.points.remove(index))
        } else {
            None
        }
    }

    /// Subtract `delta` from the cumulative distance of waypoints `index..`
    pub fn shorten_from(&mut self, index: usize, delta: f32) {
        if let Some(rest) = self.points.get_mut(index..) {
            for wp in rest {
                wp.distance_from_start -= delta;
            }
        }
    }

    /// Iterate waypoints from origin to tail
    pub fn iter(&self) -> core::slice::Iter<'_, Waypoint> {
        self.points.iter()
    }

    /// Mutable access for whole-path distance refresh
    pub(crate) fn as_mut_slice(&mut self) -> &mut [Waypoint] {
        &mut self.points
    }

    /// Positions from the tail (next target) back to the origin
    pub fn return_path(&self) -> ReturnPathIter<'_> {
        ReturnPathIter {
            inner: self.points.iter().rev(),
        }
    }
}

/// Iterator over the return route, yielding positions by value
pub struct ReturnPathIter<'a> {
    inner: core::iter::Rev<core::slice::Iter<'a, Waypoint>>,
}

impl Iterator for ReturnPathIter<'_> {
    type Item = Position;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|wp| wp.position)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for ReturnPathIter<'_> {}

#[cfg(test)]
mod tests {
    use super::*;

    fn wp(x: f64, dist: f32) -> Waypoint {
        Waypoint::new(Position::new(x, 0.0), dist)
    }

    fn filled(n: usize) -> WaypointPath<8> {
        let mut path = WaypointPath::new();
        for i in 0..n {
            path.push(wp(i as f64 * 10.0, i as f32 * 10.0)).unwrap();
        }
        path
    }

    #[test]
    fn test_path_creation() {
        let path: WaypointPath<8> = WaypointPath::new();
        assert!(path.is_empty());
        assert_eq!(path.capacity(), 8);
        assert!(path.head().is_none());
        assert!(path.tail().is_none());
    }

    #[test]
    fn test_head_and_tail() {
        let path = filled(3);
        assert!((path.head().unwrap().position.x - 0.0).abs() < 1e-9);
        assert!((path.tail().unwrap().position.x - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_push_until_full() {
        let mut path = filled(8);
        assert!(path.is_full());
        assert_eq!(path.push(wp(80.0, 80.0)), Err(RtbError::StorageExhausted));
        assert_eq!(path.len(), 8);
    }

    #[test]
    fn test_pop_removes_tail() {
        let mut path = filled(3);
        let popped = path.pop().unwrap();
        assert!((popped.position.x - 20.0).abs() < 1e-9);
        assert_eq!(path.len(), 2);
    }

    #[test]
    fn test_truncate_after() {
        let mut path = filled(6);
        assert_eq!(path.truncate_after(1), 4);
        assert_eq!(path.len(), 2);
        assert!((path.tail().unwrap().position.x - 10.0).abs() < 1e-9);

        // Index past the end removes nothing
        assert_eq!(path.truncate_after(10), 0);
        assert_eq!(path.len(), 2);
    }

    #[test]
    fn test_remove_interior() {
        let mut path = filled(4);
        let removed = path.remove(1).unwrap();
        assert!((removed.position.x - 10.0).abs() < 1e-9);
        assert_eq!(path.len(), 3);
        assert!((path.get(1).unwrap().position.x - 20.0).abs() < 1e-9);
        assert!(path.remove(3).is_none());
    }

    #[test]
    fn test_shorten_from() {
        let mut path = filled(4);
        path.shorten_from(2, 5.0);
        assert!((path.get(1).unwrap().distance_from_start - 10.0).abs() < 1e-6);
        assert!((path.get(2).unwrap().distance_from_start - 15.0).abs() < 1e-6);
        assert!((path.get(3).unwrap().distance_from_start - 25.0).abs() < 1e-6);

        // Out-of-range start is a no-op
        path.shorten_from(9, 5.0);
        assert!((path.get(3).unwrap().distance_from_start - 25.0).abs() < 1e-6);
    }

    #[test]
    fn test_return_path_order() {
        let path = filled(3);
        let xs: heapless::Vec<f64, 8> = path.return_path().map(|p| p.x).collect();
        assert_eq!(xs.as_slice(), &[20.0, 10.0, 0.0]);
        assert_eq!(path.return_path().len(), 3);
    }
}
