//! Fixture tree
//!
//! A show rig is an owned n-ary tree of fixtures. Leaves carry emitted
//! points and a network identity; nodes with an empty name are synthetic
//! grouping nodes that contribute bounds but are never addressed directly.
//! The tree is assembled once at startup and never restructured afterward;
//! the only runtime mutation is the per-frame color write on each point.

use std::net::SocketAddr;

use glam::DVec4;

use crate::Bounds;

/// One emitted LED point: a fixed position and the color computed for the
/// current frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LedPoint {
    /// Working-space color, overwritten every frame
    pub color: DVec4,
    /// Physical position, immutable after construction
    pub position: DVec4,
}

/// A node in the fixture tree.
#[derive(Debug, Clone, Default)]
pub struct Fixture {
    /// Display name; empty means a non-addressable grouping node
    pub name: String,
    /// Network endpoint of the controller driving this fixture
    pub endpoint: Option<SocketAddr>,
    /// Protocol universes assigned to this fixture, in chunk order
    pub universes: Vec<u16>,
    /// Accumulated union of point and child bounds
    pub bounds: Bounds,
    /// Child fixtures, in traversal order
    pub fixtures: Vec<Fixture>,
    /// Emitted points, in wire order
    pub points: Vec<LedPoint>,
}

impl Fixture {
    /// Create a synthetic grouping node.
    pub fn group() -> Self {
        Self::default()
    }

    /// Create a named, addressable fixture.
    pub fn new(name: impl Into<String>, endpoint: SocketAddr, universes: Vec<u16>) -> Self {
        Self {
            name: name.into(),
            endpoint: Some(endpoint),
            universes,
            ..Self::default()
        }
    }

    /// Append an emitted point, growing this fixture's bounds.
    pub fn push_point(&mut self, position: DVec4) {
        self.bounds.add_point(position);
        self.points.push(LedPoint {
            color: DVec4::ZERO,
            position,
        });
    }

    /// Append a child fixture, folding its bounds into this node's.
    pub fn push_fixture(&mut self, child: Fixture) {
        self.bounds.add_bounds(&child.bounds);
        self.fixtures.push(child);
    }

    /// Total number of points in this subtree.
    pub fn point_count(&self) -> usize {
        self.points.len() + self.fixtures.iter().map(Fixture::point_count).sum::<usize>()
    }

    /// Visit every point in the subtree, depth-first, writing the visitor's
    /// result back as the point's color.
    ///
    /// The visitor receives the stack of ancestor bounds, most specific
    /// first, and the point's fixed position. This is the only mutation path
    /// for point colors.
    pub fn walk_points<F>(&mut self, visit: &mut F)
    where
        F: FnMut(&[Bounds], DVec4) -> DVec4,
    {
        let mut stack = Vec::new();
        self.walk_points_inner(visit, &mut stack);
    }

    fn walk_points_inner<F>(&mut self, visit: &mut F, stack: &mut Vec<Bounds>)
    where
        F: FnMut(&[Bounds], DVec4) -> DVec4,
    {
        stack.insert(0, self.bounds);
        for child in &mut self.fixtures {
            child.walk_points_inner(visit, stack);
        }
        for point in &mut self.points {
            point.color = visit(stack, point.position);
        }
        stack.remove(0);
    }

    /// Visit every fixture in the subtree, the root included, with the stack
    /// of ancestor fixtures, most specific first. Children are visited
    /// before their parent.
    pub fn walk_fixtures<'a, F>(&'a self, visit: &mut F)
    where
        F: FnMut(&[&'a Fixture]),
    {
        let mut stack: Vec<&'a Fixture> = vec![self];
        self.walk_fixtures_inner(visit, &mut stack);
        visit(&stack);
    }

    fn walk_fixtures_inner<'a, F>(&'a self, visit: &mut F, stack: &mut Vec<&'a Fixture>)
    where
        F: FnMut(&[&'a Fixture]),
    {
        for child in &self.fixtures {
            stack.insert(0, child);
            child.walk_fixtures_inner(visit, stack);
            visit(stack);
            stack.remove(0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn endpoint(last: u8) -> SocketAddr {
        format!("10.0.0.{}:6454", last).parse().unwrap()
    }

    fn strand(name: &str, last: u8, n: usize, z0: f64, dz: f64) -> Fixture {
        let mut f = Fixture::new(name, endpoint(last), vec![0, 1]);
        for i in 0..n {
            f.push_point(DVec4::new(0.0, 0.0, z0 + dz * i as f64, 0.0));
        }
        f
    }

    #[test]
    fn test_bounds_accumulate_through_groups() {
        let mut root = Fixture::group();
        root.push_fixture(strand("a", 1, 10, 0.0, 10.0));
        root.push_fixture(strand("b", 2, 10, 100.0, 10.0));

        assert_eq!(root.bounds.min.z, 0.0);
        assert_eq!(root.bounds.max.z, 190.0);
        assert_eq!(root.point_count(), 20);
    }

    #[test]
    fn test_walk_points_writes_colors_back() {
        let mut root = Fixture::group();
        root.push_fixture(strand("a", 1, 4, 0.0, 10.0));

        root.walk_points(&mut |stack, position| {
            // Outermost bounds is the last stack entry
            let unit = stack[stack.len() - 1].map_unit(position);
            DVec4::new(unit.z, 0.0, 0.0, 0.0)
        });

        let pts = &root.fixtures[0].points;
        assert!((pts[0].color.x - 0.0).abs() < 1e-12);
        assert!((pts[3].color.x - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_walk_points_stack_is_most_specific_first() {
        let mut inner = strand("inner", 1, 2, 0.0, 1.0);
        inner.push_point(DVec4::new(0.0, 0.0, 2.0, 0.0));
        let mut root = Fixture::group();
        root.push_point(DVec4::new(0.0, 0.0, -100.0, 0.0));
        root.push_fixture(inner);

        let mut depths = Vec::new();
        root.walk_points(&mut |stack, _| {
            depths.push(stack.len());
            DVec4::ZERO
        });

        // Three points in the inner strand see two stack levels, the root's
        // own point sees one
        assert_eq!(depths, vec![2, 2, 2, 1]);
    }

    #[test]
    fn test_walk_fixtures_visits_children_then_root() {
        let mut group = Fixture::group();
        group.push_fixture(strand("a", 1, 1, 0.0, 1.0));
        group.push_fixture(strand("b", 2, 1, 0.0, 1.0));
        let mut root = Fixture::group();
        root.push_fixture(group);

        let mut names = Vec::new();
        root.walk_fixtures(&mut |stack| {
            names.push(stack[0].name.clone());
        });

        // a, b, their group, then the root (both groups unnamed)
        assert_eq!(names, vec!["a", "b", "", ""]);
    }

    #[test]
    fn test_walk_fixtures_empty_tree() {
        let root = Fixture::group();
        let mut visits = 0;
        root.walk_fixtures(&mut |stack| {
            assert!(!stack.is_empty());
            visits += 1;
        });
        assert_eq!(visits, 1);
    }

    #[test]
    fn test_walk_points_empty_tree() {
        let mut root = Fixture::group();
        let mut visits = 0;
        root.walk_points(&mut |_, _| {
            visits += 1;
            DVec4::ZERO
        });
        assert_eq!(visits, 0);
    }
}
