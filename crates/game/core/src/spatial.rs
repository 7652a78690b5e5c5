//! Deterministic spatial queries over the tile grid.
//!
//! Everything here is exact integer arithmetic on tile indices so that every
//! peer derives the same ranges and the same paths.

use std::collections::VecDeque;

use crate::state::{Footprint, MapDimensions, Position, Step};

/// Axis-aligned box overlap test over tile indices.
///
/// A box covers the tiles `x..x + w` and `y..y + h`; boxes that merely touch
/// along an edge do not overlap.
#[allow(clippy::too_many_arguments)]
pub const fn rect_intersect(
    ax: i32,
    ay: i32,
    aw: i32,
    ah: i32,
    bx: i32,
    by: i32,
    bw: i32,
    bh: i32,
) -> bool {
    ax < bx + bw && bx < ax + aw && ay < by + bh && by < ay + ah
}

/// Tile rectangle used for occupancy and range checks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Footprint rectangle of an entity anchored at `position`.
    pub const fn of(position: Position, footprint: Footprint) -> Self {
        Self::new(
            position.x,
            position.y,
            footprint.width as i32,
            footprint.height as i32,
        )
    }

    /// Single tile rectangle.
    pub const fn tile(position: Position) -> Self {
        Self::new(position.x, position.y, 1, 1)
    }

    /// Grows the rectangle by `range` tiles on every side.
    pub const fn inflate(self, range: u32) -> Self {
        let range = range as i32;
        Self::new(
            self.x - range,
            self.y - range,
            self.width + 2 * range,
            self.height + 2 * range,
        )
    }

    pub const fn intersects(&self, other: &Rect) -> bool {
        rect_intersect(
            self.x,
            self.y,
            self.width,
            self.height,
            other.x,
            other.y,
            other.width,
            other.height,
        )
    }

    pub const fn contains(&self, position: Position) -> bool {
        self.intersects(&Rect::tile(position))
    }
}

/// Cross directions in the fixed visitation order used by [`flood_fill`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    /// North, East, South, West. Tie-breaks between equal-cost paths depend
    /// on this order.
    pub const CROSS: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    pub const fn step(self) -> Step {
        match self {
            Direction::North => Step::new(0, -1),
            Direction::East => Step::new(1, 0),
            Direction::South => Step::new(0, 1),
            Direction::West => Step::new(-1, 0),
        }
    }
}

/// Validity classification of a reached tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NodeState {
    Valid,
    /// Terrain blocks this movement class.
    InvalidPassability,
    /// A unit stands there that the mover may not end on (or pass).
    InvalidOccupancy,
    /// Enemy-held ground that may not be captured under current rules.
    InvalidAllegiance,
}

/// One tile of a flood fill result. `parent` indexes into the same arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FillNode {
    pub position: Position,
    pub parent: Option<usize>,
    pub cost: u32,
    pub state: NodeState,
}

impl FillNode {
    pub fn is_valid(&self) -> bool {
        self.state == NodeState::Valid
    }
}

/// Breadth-first expansion from `origin` up to `max_cost` cross steps.
///
/// The root node (cost 0, `Valid`) is always the first element. `visit` is
/// called once per newly discovered in-bounds tile with the child and its
/// parent; it may reclassify the child and returns whether the child should
/// be expanded further. The child is recorded either way, and each tile is
/// recorded at most once.
pub fn flood_fill<F>(
    origin: Position,
    max_cost: u32,
    width: u32,
    height: u32,
    mut visit: F,
) -> Vec<FillNode>
where
    F: FnMut(&mut FillNode, &FillNode) -> bool,
{
    let dimensions = MapDimensions::new(width, height);
    if !dimensions.contains(origin) {
        return Vec::new();
    }

    let index = |position: Position| position.y as usize * width as usize + position.x as usize;
    let mut closed = vec![false; width as usize * height as usize];
    closed[index(origin)] = true;

    let mut nodes = vec![FillNode {
        position: origin,
        parent: None,
        cost: 0,
        state: NodeState::Valid,
    }];
    let mut open = VecDeque::from([0usize]);

    while let Some(parent_index) = open.pop_front() {
        let parent = nodes[parent_index];
        if parent.cost >= max_cost {
            continue;
        }

        for direction in Direction::CROSS {
            let position = parent.position.offset(direction.step());
            if !dimensions.contains(position) || closed[index(position)] {
                continue;
            }
            closed[index(position)] = true;

            let mut child = FillNode {
                position,
                parent: Some(parent_index),
                cost: parent.cost + 1,
                state: NodeState::Valid,
            };
            let expand = visit(&mut child, &parent);
            nodes.push(child);
            if expand {
                open.push_back(nodes.len() - 1);
            }
        }
    }

    nodes
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn range_inflation_reaches_diagonal_neighbours() {
        let attacker = Rect::tile(Position::new(3, 3)).inflate(1);

        assert!(attacker.intersects(&Rect::tile(Position::new(4, 4))));
        assert!(attacker.intersects(&Rect::tile(Position::new(2, 3))));
        assert!(!attacker.intersects(&Rect::tile(Position::new(5, 3))));
    }

    #[test]
    fn touching_edges_do_not_overlap() {
        assert!(!rect_intersect(0, 0, 1, 1, 1, 0, 1, 1));
        assert!(rect_intersect(0, 0, 2, 2, 1, 1, 1, 1));
        assert!(!rect_intersect(0, 0, 0, 0, 0, 0, 1, 1));
    }

    #[test]
    fn flood_fill_records_each_tile_once_within_budget() {
        let nodes = flood_fill(Position::new(4, 4), 3, 10, 10, |_, _| true);

        let unique: HashSet<_> = nodes.iter().map(|node| node.position).collect();
        assert_eq!(unique.len(), nodes.len());
        assert_eq!(nodes.len(), 25);
        for node in &nodes {
            let hops = (node.position.x - 4).abs() + (node.position.y - 4).abs();
            assert!(node.cost <= 3);
            assert_eq!(node.cost as i32, hops);
        }
    }

    #[test]
    fn flood_fill_visits_north_east_south_west() {
        let nodes = flood_fill(Position::new(1, 1), 1, 3, 3, |_, _| true);
        let positions: Vec<_> = nodes.iter().map(|node| node.position).collect();

        assert_eq!(
            positions,
            vec![
                Position::new(1, 1),
                Position::new(1, 0),
                Position::new(2, 1),
                Position::new(1, 2),
                Position::new(0, 1),
            ]
        );
    }

    #[test]
    fn rejected_tiles_are_recorded_but_not_expanded() {
        // Column x = 2 is a wall.
        let nodes = flood_fill(Position::new(0, 0), 6, 5, 1, |child, _| {
            if child.position.x == 2 {
                child.state = NodeState::InvalidPassability;
                return false;
            }
            true
        });

        assert_eq!(nodes.len(), 3);
        assert_eq!(nodes[2].position, Position::new(2, 0));
        assert_eq!(nodes[2].state, NodeState::InvalidPassability);
    }

    #[test]
    fn origin_outside_map_yields_nothing() {
        assert!(flood_fill(Position::new(-1, 0), 3, 4, 4, |_, _| true).is_empty());
    }
}
