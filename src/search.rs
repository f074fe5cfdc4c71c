//! Surface flood-fill for the area tool.
//!
//! Starting next to the clicked face, the search spreads breadth-first
//! across cells that rest on the same block type as the one clicked. It is
//! a 2D fill over the supporting surface: only the eight neighbors in the
//! plane perpendicular to the face are expanded.

use crate::location::*;
use crate::world::*;
use fnv::FnvHashSet;
use log::*;
use std::collections::VecDeque;

/// Flood-fill from `seed`, collecting up to `max_count` placeable cells in
/// discovery order.
///
/// A cell is supported if `is_supported` holds for the cell one step back
/// against `face`. Only supported cells are expanded; among those, cells
/// passing `is_placeable` are collected. No cell is visited twice.
pub fn flood_fill<P, S>(
    seed: Position,
    face: Direction,
    max_count: usize,
    is_placeable: P,
    is_supported: S,
) -> Vec<Position>
where
    P: Fn(Position) -> bool,
    S: Fn(Position) -> bool,
{
    let mut found = Vec::new();
    if max_count == 0 {
        return found;
    }

    let back = face.opposite();
    let neighbors = face.plane_neighbors();
    let mut visited: FnvHashSet<Position> = FnvHashSet::default();
    let mut queue: VecDeque<Position> = VecDeque::new();
    queue.push_back(seed);

    while let Some(candidate) = queue.pop_front() {
        if !visited.insert(candidate) {
            continue;
        }

        if !is_supported(candidate.relative(back)) {
            continue;
        }

        if is_placeable(candidate) {
            found.push(candidate);
            if found.len() >= max_count {
                break;
            }
        }

        for &(dx, dy, dz) in &neighbors {
            let next = candidate.offset(dx, dy, dz);
            if !visited.contains(&next) {
                queue.push_back(next);
            }
        }
    }

    trace!(
        "Flood fill from {}: visited={}, found={}",
        seed,
        visited.len(),
        found.len()
    );

    found
}

/// Search the surface of the block at `clicked`, on the side facing `face`.
///
/// The reference type is whatever occupies `clicked`. Clicking air yields
/// nothing.
pub fn search_surface<W: WorldView + ?Sized>(
    world: &W,
    clicked: Position,
    face: Direction,
    max_count: usize,
) -> Vec<Position> {
    let reference = world.occupant(clicked);
    if reference.is_air() {
        return Vec::new();
    }

    flood_fill(
        clicked.relative(face),
        face,
        max_count,
        |p| world.is_placeable(p),
        |support| world.occupant(support) == reference,
    )
}
