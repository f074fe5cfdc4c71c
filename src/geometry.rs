//! Candidate geometry for the connector tool.
//!
//! Every function here is pure: anchors and a mode go in, an ordered list
//! of positions comes out. Nothing reads the world or any ledger, so
//! previews may call these freely.

use crate::constants::*;
use crate::location::*;
use itertools::iproduct;
use serde::{Deserialize, Serialize};

/// How a batch turns its inputs into candidate positions. Fixed per batch.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
pub enum PlacementMode {
    /// Axis-aligned run between two anchors.
    Line,
    /// Every position in the box spanned by two anchors.
    PlaneFill,
    /// Trunk with perpendicular branches, defined by three anchors.
    PlaneBranching,
    /// Flood-fill across a supporting surface (area tool).
    Contiguous { max_count: usize },
}

impl PlacementMode {
    /// The connector modes, in tool cycling order.
    pub const CONNECTOR_MODES: [PlacementMode; 3] = [
        PlacementMode::Line,
        PlacementMode::PlaneFill,
        PlacementMode::PlaneBranching,
    ];

    /// Number of anchors that must be captured before a batch can run.
    pub fn required_anchors(self) -> usize {
        match self {
            PlacementMode::Line | PlacementMode::PlaneFill => TWO_POINT_ANCHORS,
            PlacementMode::PlaneBranching => THREE_POINT_ANCHORS,
            PlacementMode::Contiguous { .. } => 1,
        }
    }

    pub fn is_connector_mode(self) -> bool {
        !matches!(self, PlacementMode::Contiguous { .. })
    }
}

/// Generate the ordered candidates for a connector mode.
///
/// Returns an empty list when the anchor count does not match the mode, and
/// for `Contiguous`, whose candidates come from the surface search instead.
pub fn generate(anchors: &[Position], mode: PlacementMode) -> Vec<Position> {
    if anchors.len() != mode.required_anchors() {
        return Vec::new();
    }

    match mode {
        PlacementMode::Line => line(anchors[0], anchors[1]),
        PlacementMode::PlaneFill => plane_fill(anchors[0], anchors[1]),
        PlacementMode::PlaneBranching => plane_branching(anchors[0], anchors[1], anchors[2]),
        PlacementMode::Contiguous { .. } => Vec::new(),
    }
}

/// Axis-aligned run from `from` to `to`.
///
/// Exactly aligned anchors produce the inclusive run. Otherwise a line that
/// is long on one axis and nearly flat on the other two is snapped onto the
/// dominant axis, keeping `from`'s other coordinates. Diagonals produce
/// nothing.
pub fn line(from: Position, to: Position) -> Vec<Position> {
    let (dx, dy, dz) = from.abs_delta(to);
    let deltas = [(Axis::X, dx), (Axis::Y, dy), (Axis::Z, dz)];

    let moving: Vec<Axis> = deltas
        .iter()
        .filter(|(_, d)| *d > 0)
        .map(|(axis, _)| *axis)
        .collect();

    let axis = if moving.len() == 1 {
        moving[0]
    } else {
        let (dominant, length) = deltas
            .iter()
            .copied()
            .fold((Axis::X, 0), |best, cur| if cur.1 > best.1 { cur } else { best });
        let flat = deltas
            .iter()
            .filter(|(axis, _)| *axis != dominant)
            .all(|(_, d)| *d <= SNAP_MAX_DEVIATION);

        if length >= SNAP_MIN_LENGTH && flat {
            dominant
        } else {
            return Vec::new();
        }
    };

    axis_run(from, axis, to.coord(axis))
}

/// Every integer position in the inclusive box between two corners,
/// x-major then y then z.
pub fn plane_fill(a: Position, b: Position) -> Vec<Position> {
    let (min_x, max_x) = (a.x().min(b.x()), a.x().max(b.x()));
    let (min_y, max_y) = (a.y().min(b.y()), a.y().max(b.y()));
    let (min_z, max_z) = (a.z().min(b.z()), a.z().max(b.z()));

    iproduct!(min_x..=max_x, min_y..=max_y, min_z..=max_z)
        .map(|(x, y, z)| Position::new(x, y, z))
        .collect()
}

/// Trunk from `origin` with branches at a fixed interval.
///
/// `interval_end` picks the trunk axis (the larger horizontal delta, ties to
/// X) and the branch interval (horizontal Manhattan distance, at least 1).
/// `extent` sets the trunk length along that axis and the branch length and
/// side along the other horizontal axis. Everything stays at `origin`'s
/// height; each trunk cell is followed by its branch cells.
pub fn plane_branching(origin: Position, interval_end: Position, extent: Position) -> Vec<Position> {
    let to_interval = (interval_end.x() - origin.x(), interval_end.z() - origin.z());
    let (trunk_axis, branch_axis, trunk_delta) = if to_interval.0.abs() >= to_interval.1.abs() {
        (Axis::X, Axis::Z, to_interval.0)
    } else {
        (Axis::Z, Axis::X, to_interval.1)
    };
    let trunk_dir = direction_sign(trunk_delta);
    let interval = (to_interval.0.abs() + to_interval.1.abs()).max(1);

    let trunk_length = (extent.coord(trunk_axis) - origin.coord(trunk_axis)).abs();
    let branch_delta = extent.coord(branch_axis) - origin.coord(branch_axis);
    let branch_length = branch_delta.abs();
    let branch_dir = direction_sign(branch_delta);

    let mut out = Vec::new();
    for step in 0..=trunk_length {
        let trunk_cell = origin.step_along(trunk_axis, step * trunk_dir);
        out.push(trunk_cell);

        if step % interval == 0 {
            for offset in 1..=branch_length {
                out.push(trunk_cell.step_along(branch_axis, offset * branch_dir));
            }
        }
    }

    out
}

fn axis_run(from: Position, axis: Axis, end: i32) -> Vec<Position> {
    let delta = end - from.coord(axis);
    let dir = direction_sign(delta);

    (0..=delta.abs())
        .map(|step| from.step_along(axis, step * dir))
        .collect()
}

fn direction_sign(delta: i32) -> i32 {
    if delta < 0 {
        -1
    } else {
        1
    }
}
