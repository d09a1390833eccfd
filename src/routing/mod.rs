//! Manhattan path planning between directional ports.
//!
//! All routers emit waypoint polylines on the integer grid: axis-aligned
//! segments only, first point on the source port, last point on the
//! destination port. [`route`] connects a single pair with 90-degree
//! bends, [`route_180`] covers the configurations that need a hairpin,
//! and [`route_bundle`] fans a whole group of pairs out so their paths
//! keep a minimum separation.

mod bundle;
mod error;
mod manhattan;
mod simplify;

use serde::{Deserialize, Serialize};

use crate::geometry::Point;
use crate::port::Port;

pub use bundle::route_bundle;
pub use error::{Result, RouteError};
pub use manhattan::{route, route_180, route_180_um, route_um};
pub use simplify::{simplified, simplify};

/// A planned connection between two ports together with the parameters
/// that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    pub source: Port,
    pub dest: Port,
    /// Simplified axis-aligned polyline from source to destination.
    pub waypoints: Vec<Point>,
    pub bend_radius: i64,
    pub start_straight: i64,
    pub end_straight: i64,
}

impl Route {
    /// Trace width shared by both ports.
    pub fn width(&self) -> i64 {
        self.source.width
    }
}

/// A group of routes planned together by [`route_bundle`], in the order
/// the port pairs were given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bundle {
    pub routes: Vec<Route>,
    pub bend_radius: i64,
    pub separation: i64,
}
