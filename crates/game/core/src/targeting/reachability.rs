//! Move reachability over the flood fill.

use crate::config::GameConfig;
use crate::spatial::{FillNode, NodeState, Rect, flood_fill};
use crate::state::{EntityId, Position, Step, Tile, UnitFlags, UnitState, UnitStatus};
use crate::view::WorldView;

/// Flood-fills the tiles `unit_id` may move to, classifying every reached tile.
///
/// The result keeps invalid tiles too: overlays render them and path
/// extraction walks through bypassable ones. Empty if the unit is unknown.
pub fn generate_reachable_tiles<W>(world: &W, unit_id: EntityId) -> Vec<FillNode>
where
    W: WorldView + ?Sized,
{
    let Some(unit) = world.unit(unit_id) else {
        return Vec::new();
    };
    let dimensions = world.dimensions();

    // A unit standing on ground it could not walk onto may not capture its
    // way out of it.
    let stranded = !is_walkable(world, unit, unit.position);

    flood_fill(
        unit.position,
        unit.move_range,
        dimensions.width,
        dimensions.height,
        |child, _parent| classify(world, unit, stranded, child),
    )
}

/// Returns true when `unit` could stand at `position` without capturing it.
pub fn is_walkable<W>(world: &W, unit: &UnitState, position: Position) -> bool
where
    W: WorldView + ?Sized,
{
    let config = world.config();
    footprint_tiles(world, unit, position).is_some_and(|tiles| {
        tiles
            .iter()
            .all(|tile| config.is_passable(unit.movement, tile.terrain) && !enemy_held(config, unit, tile))
    })
}

/// Returns true when `mover` may path through a tile held by `occupant`.
pub fn can_bypass(config: &GameConfig, mover: &UnitState, occupant: &UnitState) -> bool {
    config.is_allied(mover.team, occupant.team)
        || mover.has(UnitFlags::FLYING)
        || (mover.has(UnitFlags::CLOAKED) && occupant.has(UnitFlags::CLOAKED))
}

/// Walks the parent chain of the valid node at `target` back to the root.
///
/// Returns the unit steps in travel order, origin excluded, or `None` when no
/// valid node sits at `target`.
pub fn extract_path(nodes: &[FillNode], target: Position) -> Option<Vec<Step>> {
    let mut current = nodes
        .iter()
        .position(|node| node.position == target && node.is_valid())?;

    let mut steps = Vec::with_capacity(nodes[current].cost as usize);
    while let Some(parent) = nodes[current].parent {
        steps.push(Step::between(nodes[parent].position, nodes[current].position));
        current = parent;
    }
    steps.reverse();
    Some(steps)
}

fn classify<W>(world: &W, unit: &UnitState, stranded: bool, child: &mut FillNode) -> bool
where
    W: WorldView + ?Sized,
{
    let config = world.config();

    let Some(tiles) = footprint_tiles(world, unit, child.position) else {
        child.state = NodeState::InvalidPassability;
        return false;
    };
    if !tiles
        .iter()
        .all(|tile| config.is_passable(unit.movement, tile.terrain))
    {
        child.state = NodeState::InvalidPassability;
        return false;
    }

    let held = tiles.iter().any(|tile| enemy_held(config, unit, tile));

    let footprint = Rect::of(child.position, unit.footprint);
    if let Some(occupant) = world
        .units()
        .iter()
        .filter(|other| other.id != unit.id && other.status != UnitStatus::Dead)
        .find(|other| Rect::of(other.position, other.footprint).intersects(&footprint))
    {
        // Enemy ground stops expansion even under a unit we could pass.
        child.state = NodeState::InvalidOccupancy;
        return !held && can_bypass(config, unit, occupant);
    }

    if held {
        // Capture on arrival: the tile is a destination, never a corridor.
        child.state = if stranded || unit.has(UnitFlags::COWARD) {
            NodeState::InvalidAllegiance
        } else {
            NodeState::Valid
        };
        return false;
    }

    true
}

fn enemy_held(config: &GameConfig, unit: &UnitState, tile: &Tile) -> bool {
    tile.owner
        .is_some_and(|owner| !config.is_allied(owner, unit.team))
}

/// Tiles covered by `unit` if it stood at `position`; `None` if any is off-map.
fn footprint_tiles<W>(world: &W, unit: &UnitState, position: Position) -> Option<Vec<Tile>>
where
    W: WorldView + ?Sized,
{
    let mut tiles = Vec::with_capacity((unit.footprint.width * unit.footprint.height) as usize);
    for dy in 0..unit.footprint.height as i32 {
        for dx in 0..unit.footprint.width as i32 {
            tiles.push(world.tile(Position::new(position.x + dx, position.y + dy))?);
        }
    }
    Some(tiles)
}
