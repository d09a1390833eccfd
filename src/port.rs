use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geometry::{Point, Trans};

/// A directional anchor point where a path may attach.
///
/// The port's facing direction is where its transform's local +x axis
/// points; by convention a port looks outward from the body it belongs to.
/// A route leaves its source port along the facing direction and arrives
/// at the destination port against the destination's facing direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Port {
    pub trans: Trans,
    /// Trace/waveguide width in grid units, > 0.
    pub width: i64,
}

impl Port {
    pub fn new(trans: Trans, width: i64) -> Port {
        Port { trans, width }
    }

    /// Absolute anchor position.
    pub fn position(&self) -> Point {
        self.trans.apply(Point::ORIGIN)
    }

    /// Facing direction in quarter turns, 0..=3. Mirroring does not affect
    /// the facing since the local +x axis is on the mirror line.
    pub fn angle(&self) -> u8 {
        self.trans.angle % 4
    }
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "port {} width {}", self.trans, self.width)
    }
}

/// Anything that can stand in for a port position in a routing call.
///
/// The routers only ever need the rigid transform, so both `Port` and a
/// bare `Trans` qualify; the choice is resolved at compile time.
pub trait HasTrans {
    fn trans(&self) -> Trans;
}

impl HasTrans for Trans {
    fn trans(&self) -> Trans {
        *self
    }
}

impl HasTrans for Port {
    fn trans(&self) -> Trans {
        self.trans
    }
}

impl<T: HasTrans> HasTrans for &T {
    fn trans(&self) -> Trans {
        (**self).trans()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_is_transform_displacement() {
        let port = Port::new(Trans::new(2, false, 300, -40), 1000);
        assert_eq!(port.position(), Point::new(300, -40));
        assert_eq!(port.angle(), 2);
    }

    #[test]
    fn bare_transforms_route_like_ports() {
        let t = Trans::new(1, false, 8, 9);
        assert_eq!(HasTrans::trans(&t), t);
        assert_eq!(Port::new(t, 500).trans(), t);
    }
}
