use crate::grid::Grid;
use crate::routing::{Bundle, Route};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// JSON snapshot of a planned bundle, with lengths duplicated in
/// micrometers so the file is readable without knowing the grid.
#[derive(Debug, Serialize)]
pub struct RouteDump {
    pub dbu: f64,
    pub bend_radius: i64,
    pub separation: i64,
    pub routes: Vec<RouteEntry>,
}

#[derive(Debug, Serialize)]
pub struct RouteEntry {
    pub width: i64,
    pub start_straight: i64,
    pub end_straight: i64,
    pub waypoints: Vec<[i64; 2]>,
    pub waypoints_um: Vec<[f64; 2]>,
    pub length: i64,
}

impl RouteDump {
    pub fn from_bundle(bundle: &Bundle, grid: &Grid) -> Self {
        let routes = bundle
            .routes
            .iter()
            .map(|route| RouteEntry::from_route(route, grid))
            .collect();
        RouteDump {
            dbu: grid.dbu,
            bend_radius: bundle.bend_radius,
            separation: bundle.separation,
            routes,
        }
    }
}

impl RouteEntry {
    pub fn from_route(route: &Route, grid: &Grid) -> Self {
        let length = route
            .waypoints
            .windows(2)
            .map(|pair| (pair[1] - pair[0]).manhattan_len())
            .sum();
        RouteEntry {
            width: route.width(),
            start_straight: route.start_straight,
            end_straight: route.end_straight,
            waypoints: route.waypoints.iter().map(|p| [p.x, p.y]).collect(),
            waypoints_um: route
                .waypoints
                .iter()
                .map(|p| [grid.to_um(p.x), grid.to_um(p.y)])
                .collect(),
            length,
        }
    }
}

pub fn write_route_dump(path: &Path, bundle: &Bundle, grid: &Grid) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let dump = RouteDump::from_bundle(bundle, grid);
    serde_json::to_writer_pretty(writer, &dump)?;
    Ok(())
}
