use std::collections::BTreeMap;

use crate::geometry::Trans;
use crate::port::Port;

use super::error::{Result, RouteError};
use super::manhattan::{local_displacement, rel_angle, route_180, route_with_diagnostics};
use super::{Bundle, Route};

/// Routes many port pairs concurrently so that no two paths run parallel
/// within `separation` of each other.
///
/// Pairs leaving the same side (same source facing) fan out together:
/// sorted by their lateral position along that side, each rank gets a
/// start straight of `rank * separation`, mirrored at the destination side
/// so the fan closes again in reverse. `margins`, when given, supplies a
/// per-pair base `(start, end)` straight that the fan offsets add to, and
/// is rejected unless it has one entry per pair. Pairs that sit
/// back-to-back on one line
/// go through the 180-degree router with a hairpin radius of twice the
/// bend radius; everything else uses the single-connection router.
///
/// The returned routes keep the caller's pair order, and the whole
/// assignment is deterministic: identical input produces an identical
/// bundle. The first failing pair aborts the call; a partial bundle is
/// never returned as if it were complete.
pub fn route_bundle(
    pairs: &[(Port, Port)],
    bend_radius: i64,
    separation: i64,
    margins: Option<&[(i64, i64)]>,
) -> Result<Bundle> {
    if let Some(margins) = margins
        && margins.len() != pairs.len()
    {
        return Err(RouteError::MarginCountMismatch {
            margins: margins.len(),
            pairs: pairs.len(),
        });
    }

    for (source, dest) in pairs {
        if source.width != dest.width {
            return Err(RouteError::WidthMismatch {
                source_width: source.width,
                dest_width: dest.width,
            });
        }
    }

    // Group by the side the routes originate from.
    let mut groups: BTreeMap<u8, Vec<usize>> = BTreeMap::new();
    for (idx, (source, _)) in pairs.iter().enumerate() {
        groups.entry(source.angle()).or_default().push(idx);
    }

    let mut start_straights = vec![0i64; pairs.len()];
    let mut end_straights = vec![0i64; pairs.len()];
    for (&angle, indices) in groups.iter_mut() {
        let inv = Trans::rotation(angle).inverted();
        // Sort by the coordinate orthogonal to the facing direction; the
        // sort is stable, so insertion order breaks ties.
        indices.sort_by_key(|&idx| inv.apply_vector(pairs[idx].0.trans.disp).y);
        let last = indices.len() as i64 - 1;
        for (rank, &idx) in indices.iter().enumerate() {
            let (start_base, end_base) = margins.map_or((0, 0), |m| m[idx]);
            start_straights[idx] = start_base + rank as i64 * separation;
            end_straights[idx] = end_base + (last - rank as i64) * separation;
        }
    }

    let mut routes = Vec::with_capacity(pairs.len());
    for (idx, (source, dest)) in pairs.iter().enumerate() {
        let tv = local_displacement(&source.trans, &dest.trans);
        let back_to_back = rel_angle(&source.trans, &dest.trans) == 2 && tv.y == 0 && tv.x <= 0;
        let waypoints = if back_to_back {
            route_180(
                source,
                dest,
                bend_radius,
                2 * bend_radius,
                start_straights[idx],
                end_straights[idx],
            )?
        } else {
            let (points, cramped) = route_with_diagnostics(
                source.trans,
                dest.trans,
                bend_radius,
                start_straights[idx],
                end_straights[idx],
            )?;
            if cramped {
                return Err(RouteError::InsufficientClearance {
                    index: idx,
                    bend_radius,
                });
            }
            points
        };
        routes.push(Route {
            source: *source,
            dest: *dest,
            waypoints,
            bend_radius,
            start_straight: start_straights[idx],
            end_straight: end_straights[idx],
        });
    }

    Ok(Bundle {
        routes,
        bend_radius,
        separation,
    })
}
