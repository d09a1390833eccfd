pub mod geometry;
pub mod grid;
pub mod port;
pub mod route_dump;
pub mod routing;

pub use geometry::{Point, Trans, Vector};
pub use grid::Grid;
pub use port::{HasTrans, Port};
pub use routing::{
    Bundle, Result, Route, RouteError, route, route_180, route_180_um, route_bundle, route_um,
    simplified, simplify,
};
