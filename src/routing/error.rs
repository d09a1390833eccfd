use thiserror::Error;

use crate::geometry::Trans;

pub type Result<T> = std::result::Result<T, RouteError>;

/// Everything the routers can refuse to do. Each variant is raised at the
/// point of detection and propagates to the caller unchanged; a failed
/// route is never papered over with an approximated path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    /// Source and destination coincide in both position and orientation.
    #[error("identically oriented ports at {trans} cannot be connected")]
    IdenticalPorts { trans: Trans },

    /// The relative geometry matches no implemented case, either because
    /// the bend attempt limit ran out or because the configuration is an
    /// intentionally unimplemented 180-degree sub-case.
    #[error("unsupported routing configuration between {start} and {end}: {reason}")]
    Unsupported {
        start: Trans,
        end: Trans,
        reason: String,
    },

    /// The two ports of a pair have different widths where matching widths
    /// are required.
    #[error("port widths differ: source is {source_width}, destination is {dest_width}")]
    WidthMismatch { source_width: i64, dest_width: i64 },

    /// A per-pair margin list was given with the wrong number of entries.
    #[error("{margins} straight-margin entries for {pairs} port pairs")]
    MarginCountMismatch { margins: usize, pairs: usize },

    /// A bundle pair sits too close together for the requested bend radius
    /// and separation; its route would fold over itself.
    #[error("pair {index} is too close for bend radius {bend_radius}")]
    InsufficientClearance { index: usize, bend_radius: i64 },
}
