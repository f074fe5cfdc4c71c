/// Minimum extent along the dominant axis before a slightly crooked line is
/// snapped onto that axis.
pub const SNAP_MIN_LENGTH: u32 = 10;

/// Largest deviation allowed on each of the two minor axes for a snap.
pub const SNAP_MAX_DEVIATION: u32 = 3;

/// Chebyshev radius around a batch inside which an undo request is honored.
pub const DEFAULT_UNDO_RADIUS: i32 = 3;

/// Number of recolored connectors paid for by one secondary (dye) unit.
pub const DEFAULT_DYE_RATIO: u32 = 8;

/// Energy charged for each unit actually placed.
pub const DEFAULT_ENERGY_PER_UNIT: f64 = 10.0;

/// Upper bound on a single contiguous (flood-fill) request.
pub const DEFAULT_MAX_CONTIGUOUS: usize = 256;

/// Anchors needed by the two-point connector modes.
pub const TWO_POINT_ANCHORS: usize = 2;

/// Anchors needed by the branching connector mode.
pub const THREE_POINT_ANCHORS: usize = 3;
