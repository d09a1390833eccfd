use crate::geometry::{Point, Trans, Vector};
use crate::grid::Grid;
use crate::port::HasTrans;

use super::error::{Result, RouteError};
use super::simplify::simplified;

/// Upper bound on turn/advance decisions in the general case. Every
/// iteration either turns toward the target or finishes, so any reachable
/// configuration resolves well inside this bound; exhausting it means the
/// geometry matches no implemented case and routing fails instead of
/// guessing a path.
const MAX_BEND_ATTEMPTS: usize = 20;

/// Displacement of `t2` expressed in `t1`'s local frame. Its sign and
/// axis, together with the relative angle, fully determine the routing
/// case.
pub(crate) fn local_displacement(t1: &Trans, t2: &Trans) -> Vector {
    t1.inverted().apply_vector(t2.disp - t1.disp)
}

/// Relative facing of `t2` seen from `t1`, in quarter turns: 2 means the
/// frames face each other, 0 means they face the same way.
pub(crate) fn rel_angle(t1: &Trans, t2: &Trans) -> u8 {
    (t2.angle as i32 - t1.angle as i32).rem_euclid(4) as u8
}

/// Calculates a minimal-distance Manhattan route between two ports using
/// only 90-degree bends.
///
/// `bend_radius` is the clearance a bend needs before and after its corner;
/// `start_straight`/`end_straight` are minimum straight runs to keep after
/// the source port and before the destination port. The returned waypoint
/// list starts at the source position, ends at the destination position,
/// and is already simplified.
pub fn route<A, B>(
    port1: &A,
    port2: &B,
    bend_radius: i64,
    start_straight: i64,
    end_straight: i64,
) -> Result<Vec<Point>>
where
    A: HasTrans,
    B: HasTrans,
{
    let (points, _) = route_with_diagnostics(
        port1.trans(),
        port2.trans(),
        bend_radius,
        start_straight,
        end_straight,
    )?;
    Ok(points)
}

/// [`route`] plus a flag telling whether the stepping engine had to hook
/// through a pocket tighter than the bend radius. The bundle router treats
/// that as an error; for a single route the caller may still accept it.
pub(crate) fn route_with_diagnostics(
    t1: Trans,
    t2: Trans,
    bend_radius: i64,
    start_straight: i64,
    end_straight: i64,
) -> Result<(Vec<Point>, bool)> {
    let mut t1 = t1;
    t1.mirror = false;
    let mut t2 = t2;
    t2.mirror = false;

    if t1.disp == t2.disp && t1.angle == t2.angle {
        return Err(RouteError::IdenticalPorts { trans: t1 });
    }

    let p1 = t1.apply(Point::ORIGIN);
    let p2 = t2.apply(Point::ORIGIN);
    let tv = local_displacement(&t1, &t2);

    // Ports facing each other on one line connect with a single straight.
    if rel_angle(&t1, &t2) == 2 && tv.y == 0 && tv.x > 0 {
        return Ok((vec![p1, p2], false));
    }

    // Perpendicular ports with enough clearance on both legs and no
    // explicit straight margins connect with a single jog.
    let swing = (tv.y.signum() * (t2.angle as i64 - t1.angle as i64)).rem_euclid(4);
    if swing == 3
        && tv.y.abs() > bend_radius + end_straight
        && tv.x >= bend_radius + start_straight
        && start_straight == 0
        && end_straight == 0
    {
        return Ok((
            vec![p1, p1 + t1.apply_vector(Vector::new(tv.x, 0)), p2],
            false,
        ));
    }

    let mut router = ManhattanRouter::new(t1, t2, bend_radius, start_straight, end_straight);
    let points = simplified(router.auto_route()?);
    Ok((points, router.is_cramped()))
}

/// [`route`] with micrometer lengths, converted through an explicit grid
/// context.
pub fn route_um<A, B>(
    grid: &Grid,
    port1: &A,
    port2: &B,
    bend_radius_um: f64,
    start_straight_um: f64,
    end_straight_um: f64,
) -> Result<Vec<Point>>
where
    A: HasTrans,
    B: HasTrans,
{
    route(
        port1,
        port2,
        grid.to_units(bend_radius_um),
        grid.to_units(start_straight_um),
        grid.to_units(end_straight_um),
    )
}

/// Calculates a Manhattan route for ports whose connection needs a
/// 180-degree bend rather than a straight pass-through.
///
/// `bend180_radius` is the lateral extent of a hairpin bend and must not be
/// smaller than `bend90_radius`. Implemented configurations: head-on on one
/// line (straight or zero-length), the bracket of two advanced frames, and
/// the back-to-back hairpin. Every other arrangement returns
/// [`RouteError::Unsupported`] so the caller can fall back to a manual
/// route instead of receiving a guessed bend sequence.
pub fn route_180<A, B>(
    port1: &A,
    port2: &B,
    bend90_radius: i64,
    bend180_radius: i64,
    start_straight: i64,
    end_straight: i64,
) -> Result<Vec<Point>>
where
    A: HasTrans,
    B: HasTrans,
{
    let mut t1 = port1.trans();
    t1.mirror = false;
    let mut t2 = port2.trans();
    t2.mirror = false;

    if bend180_radius < bend90_radius {
        return Err(RouteError::Unsupported {
            start: t1,
            end: t2,
            reason: format!(
                "a 180-degree bend radius of {bend180_radius} cannot clear \
                 90-degree bends of radius {bend90_radius}"
            ),
        });
    }
    if t1.disp == t2.disp && t1.angle == t2.angle {
        return Err(RouteError::IdenticalPorts { trans: t1 });
    }

    let p1 = t1.apply(Point::ORIGIN);
    let p2 = t2.apply(Point::ORIGIN);

    let tv = local_displacement(&t1, &t2);
    if rel_angle(&t1, &t2) == 2 && tv.y == 0 {
        if tv.x > 0 {
            return Ok(vec![p1, p2]);
        }
        if tv.x == 0 {
            // Coincident anchors facing each other: a zero-length
            // connection, nothing to realize.
            return Ok(Vec::new());
        }
    }

    t1 = t1 * Trans::shift(start_straight, 0);
    let tv = local_displacement(&t1, &t2);
    if rel_angle(&t1, &t2) == 2 && tv.y == 0 && tv.x > 0 {
        return Ok(vec![p1, p2]);
    }

    // The destination frame advances by the same start margin; if the two
    // frames then coincide or face each other on one line, the route is a
    // bracket of the advanced anchor points.
    let t2_orig = t2;
    t2 = t2 * Trans::shift(start_straight, 0);
    let mut points = if start_straight != 0 {
        vec![p1]
    } else {
        Vec::new()
    };
    let mut end_points = if end_straight != 0 {
        vec![t2.apply(Point::ORIGIN), p2]
    } else {
        vec![p2]
    };
    let tv = local_displacement(&t1, &t2);
    if tv.is_zero() || (rel_angle(&t1, &t2) == 2 && tv.x > 0 && tv.y == 0) {
        points.append(&mut end_points);
        return Ok(simplified(points));
    }

    // Back-to-back on one line: hairpin out to the side, run past the
    // destination, and come back in against its facing. Both lateral
    // offsets are taken in the start frame so the turnaround lane is a
    // single axis-aligned segment.
    let t2 = t2_orig * Trans::shift(end_straight, 0);
    let tv = local_displacement(&t1, &t2);
    if rel_angle(&t1, &t2) == 2 && tv.y == 0 && tv.x < 0 {
        let s = t1.apply(Point::ORIGIN);
        let e = t2.apply(Point::ORIGIN);
        let lateral = Trans::rotation(t1.angle).apply_vector(Vector::new(0, bend180_radius));
        let mut pts = Vec::with_capacity(6);
        if start_straight != 0 {
            pts.push(p1);
        }
        pts.extend([s, s + lateral, e + lateral, e]);
        if end_straight != 0 {
            pts.push(p2);
        }
        return Ok(simplified(pts));
    }

    Err(RouteError::Unsupported {
        start: t1,
        end: t2,
        reason: "this 180-degree configuration has no implemented bend sequence".into(),
    })
}

/// [`route_180`] with micrometer lengths, converted through an explicit
/// grid context.
pub fn route_180_um<A, B>(
    grid: &Grid,
    port1: &A,
    port2: &B,
    bend90_radius_um: f64,
    bend180_radius_um: f64,
    start_straight_um: f64,
    end_straight_um: f64,
) -> Result<Vec<Point>>
where
    A: HasTrans,
    B: HasTrans,
{
    route_180(
        port1,
        port2,
        grid.to_units(bend90_radius_um),
        grid.to_units(bend180_radius_um),
        grid.to_units(start_straight_um),
        grid.to_units(end_straight_um),
    )
}

/// One advancing frame of the stepping engine plus the corner points it
/// has laid down so far.
struct Side {
    t: Trans,
    pts: Vec<Point>,
}

impl Side {
    fn new(mut t: Trans) -> Side {
        t.mirror = false;
        Side {
            pts: vec![t.disp.to_point()],
            t,
        }
    }

    /// Advances along the current facing without laying a corner.
    fn straight(&mut self, d: i64) {
        self.t = self.t * Trans::shift(d, 0);
    }
}

/// Stepping engine for the general case: both port frames advance by their
/// straight margins, then the start frame turns and advances toward the
/// end frame until the two face each other on one line. Corners laid by a
/// turn are always a full bend radius apart, so emitted segments never
/// undercut the radius; geometry so cramped that the engine has to hook
/// around through its own pocket is recorded in `cramped`.
pub(crate) struct ManhattanRouter {
    bend_radius: i64,
    start: Side,
    end: Side,
    cramped: bool,
}

impl ManhattanRouter {
    pub(crate) fn new(
        t1: Trans,
        t2: Trans,
        bend_radius: i64,
        start_straight: i64,
        end_straight: i64,
    ) -> ManhattanRouter {
        let mut start = Side::new(t1);
        let mut end = Side::new(t2);
        start.straight(start_straight);
        end.straight(end_straight);
        ManhattanRouter {
            bend_radius,
            start,
            end,
            cramped: false,
        }
    }

    /// The pair's route folds over itself for this bend radius.
    pub(crate) fn is_cramped(&self) -> bool {
        self.cramped
    }

    fn local(&self) -> Vector {
        local_displacement(&self.start.t, &self.end.t)
    }

    fn rel(&self) -> u8 {
        rel_angle(&self.start.t, &self.end.t)
    }

    /// 90-degree left turn: lays the corner one bend radius ahead and
    /// leaves the frame one radius past it on the new heading.
    fn left(&mut self) {
        let r = self.bend_radius;
        self.start.pts.push(self.start.t.apply(Point::new(r, 0)));
        self.start.t = self.start.t * Trans::new(1, false, r, r);
    }

    fn right(&mut self) {
        let r = self.bend_radius;
        self.start.pts.push(self.start.t.apply(Point::new(r, 0)));
        self.start.t = self.start.t * Trans::new(3, false, r, -r);
    }

    fn turn(&mut self, toward_left: bool) {
        if toward_left {
            self.left();
        } else {
            self.right();
        }
    }

    pub(crate) fn auto_route(&mut self) -> Result<Vec<Point>> {
        for _ in 0..MAX_BEND_ATTEMPTS {
            let tv = self.local();
            let (x, y) = (tv.x, tv.y);
            let y_abs = y.abs();
            let r = self.bend_radius;
            match self.rel() {
                0 => {
                    // Same facing: swing out sideways, or loop around like
                    // a P when the anchors sit too close.
                    if y_abs >= 2 * r {
                        if x > 0 {
                            self.start.straight(x);
                        }
                        self.turn(y > 0);
                    } else {
                        if x > 0 {
                            self.start.straight((2 * r - x).max(0));
                        }
                        self.turn(y <= 0);
                    }
                }
                2 => {
                    if y == 0 {
                        return self.finish();
                    }
                    if y_abs < 2 * r {
                        // S-bend tighter than two bend radii: take the
                        // short side first.
                        self.turn(y <= 0);
                    } else {
                        self.turn(y > 0);
                    }
                }
                rel => {
                    // The two perpendicular cases mirror each other in y
                    // and in turn direction.
                    let left_is_left = rel == 3;
                    let yy = if left_is_left { y } else { -y };
                    if x >= r && yy >= r {
                        self.start.straight(x - r);
                        self.turn(left_is_left);
                        return self.finish();
                    }
                    if x >= 3 * r {
                        self.turn(!left_is_left);
                    } else if yy >= 3 * r {
                        self.start.straight((r + x).max(0));
                        self.turn(left_is_left);
                    } else if yy <= -r || x <= 0 {
                        self.start.straight((x + r).max(0));
                        self.turn(!left_is_left);
                    } else if x < r && y_abs < r {
                        // Both legs undercut the radius: hook out of the
                        // pocket and come back around.
                        self.cramped = true;
                        self.turn(!left_is_left);
                        self.start.straight((r - yy).max(0));
                        self.turn(left_is_left);
                    } else {
                        self.turn(!left_is_left);
                    }
                }
            }
        }
        Err(self.unsupported("no implemented case matched within the bend attempt limit"))
    }

    fn finish(&mut self) -> Result<Vec<Point>> {
        let tv = self.local();
        if self.rel() != 2 || tv.y != 0 {
            return Err(self.unsupported("the frames never ended up facing each other"));
        }
        if tv.x < 0 {
            return Err(self.unsupported("the remaining forward gap is negative"));
        }
        let mut pts = std::mem::take(&mut self.start.pts);
        if pts.last() != self.end.pts.last() {
            pts.extend(self.end.pts.iter().rev().copied());
        }
        Ok(pts)
    }

    fn unsupported(&self, reason: &str) -> RouteError {
        RouteError::Unsupported {
            start: self.start.t,
            end: self.end.t,
            reason: reason.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::Port;

    fn assert_manhattan(points: &[Point]) {
        for pair in points.windows(2) {
            let v = pair[1] - pair[0];
            assert!(
                (v.x == 0) != (v.y == 0),
                "segment {} -> {} is not a proper axis-aligned segment",
                pair[0],
                pair[1]
            );
        }
    }

    fn assert_no_redundant_bends(points: &[Point]) {
        for triple in points.windows(3) {
            let v1 = triple[1] - triple[0];
            let v2 = triple[2] - triple[1];
            assert!(
                !(v1.x.signum() == v2.x.signum() && v1.y.signum() == v2.y.signum()),
                "redundant corner at {}",
                triple[1]
            );
        }
    }

    #[test]
    fn facing_ports_connect_with_one_straight() {
        let t1 = Trans::new(0, false, 0, 0);
        let t2 = Trans::new(2, false, 20_000, 0);
        let pts = route(&t1, &t2, 0, 0, 0).unwrap();
        assert_eq!(pts, vec![Point::new(0, 0), Point::new(20_000, 0)]);
    }

    #[test]
    fn perpendicular_ports_connect_with_one_jog() {
        let t1 = Trans::new(0, false, 0, 0);
        let t2 = Trans::new(3, false, 10_000, 10_000);
        let pts = route(&t1, &t2, 5_000, 0, 0).unwrap();
        assert_eq!(
            pts,
            vec![
                Point::new(0, 0),
                Point::new(10_000, 0),
                Point::new(10_000, 10_000)
            ]
        );
    }

    #[test]
    fn identical_ports_are_rejected() {
        let t = Trans::new(1, false, 4_000, 4_000);
        let err = route(&t, &t, 1_000, 0, 0).unwrap_err();
        assert!(matches!(err, RouteError::IdenticalPorts { .. }));
        let port = Port::new(t, 500);
        let err = route(&port, &port, 1_000, 0, 0).unwrap_err();
        assert!(matches!(err, RouteError::IdenticalPorts { .. }));
    }

    #[test]
    fn coincident_but_rotated_ports_are_not_identical() {
        let t1 = Trans::new(0, false, 0, 0);
        let t2 = Trans::new(1, false, 0, 0);
        // Not an identical-port error; whatever else happens is geometry.
        if let Err(err) = route(&t1, &t2, 1_000, 0, 0) {
            assert!(!matches!(err, RouteError::IdenticalPorts { .. }));
        }
    }

    #[test]
    fn s_bend_between_facing_ports() {
        let t1 = Trans::new(0, false, 0, 0);
        let t2 = Trans::new(2, false, 60_000, 30_000);
        let pts = route(&t1, &t2, 5_000, 0, 0).unwrap();
        assert_eq!(pts.first(), Some(&Point::new(0, 0)));
        assert_eq!(pts.last(), Some(&Point::new(60_000, 30_000)));
        assert_manhattan(&pts);
        assert_no_redundant_bends(&pts);
    }

    #[test]
    fn straight_margins_push_the_first_and_last_corners_out() {
        let t1 = Trans::new(0, false, 0, 0);
        let t2 = Trans::new(2, false, 60_000, 30_000);
        let pts = route(&t1, &t2, 5_000, 12_000, 9_000).unwrap();
        assert_manhattan(&pts);
        // First corner respects the start margin, last corner the end one.
        assert!((pts[1] - pts[0]).manhattan_len() >= 12_000);
        let n = pts.len();
        assert!((pts[n - 1] - pts[n - 2]).manhattan_len() >= 9_000);
    }

    #[test]
    fn same_facing_ports_take_a_detour() {
        let t1 = Trans::new(0, false, 0, 0);
        let t2 = Trans::new(0, false, 0, 40_000);
        let pts = route(&t1, &t2, 5_000, 0, 0).unwrap();
        assert_eq!(pts.first(), Some(&Point::new(0, 0)));
        assert_eq!(pts.last(), Some(&Point::new(0, 40_000)));
        assert_manhattan(&pts);
        assert_no_redundant_bends(&pts);
    }

    #[test]
    fn back_to_back_ports_are_unsupported() {
        let t1 = Trans::new(0, false, 0, 0);
        let t2 = Trans::new(2, false, -10_000, 0);
        let err = route(&t1, &t2, 5_000, 0, 0).unwrap_err();
        assert!(matches!(err, RouteError::Unsupported { .. }));
    }

    #[test]
    fn mirrored_ports_route_like_unmirrored_ones() {
        let plain = Trans::new(0, false, 0, 0);
        let mirrored = Trans::new(0, true, 0, 0);
        let t2 = Trans::new(2, false, 20_000, 0);
        assert_eq!(
            route(&plain, &t2, 0, 0, 0).unwrap(),
            route(&mirrored, &t2, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn zero_radius_routes_still_hold_the_invariants() {
        let t1 = Trans::new(0, false, 0, 0);
        let t2 = Trans::new(1, false, 7_000, -9_000);
        let pts = route(&t1, &t2, 0, 500, 500).unwrap();
        assert_eq!(pts.first(), Some(&Point::new(0, 0)));
        assert_eq!(pts.last(), Some(&Point::new(7_000, -9_000)));
        assert_manhattan(&pts);
        assert_no_redundant_bends(&pts);
    }

    #[test]
    fn um_entry_point_matches_unit_entry_point() {
        let grid = Grid::default();
        let t1 = Trans::new(0, false, 0, 0);
        let t2 = Trans::new(2, false, 60_000, 30_000);
        assert_eq!(
            route_um(&grid, &t1, &t2, 5.0, 1.0, 1.0).unwrap(),
            route(&t1, &t2, 5_000, 1_000, 1_000).unwrap()
        );
    }

    #[test]
    fn head_on_180_degenerates_to_a_straight() {
        let t1 = Trans::new(0, false, 0, 0);
        let t2 = Trans::new(2, false, 20_000, 0);
        let pts = route_180(&t1, &t2, 1_000, 2_000, 0, 0).unwrap();
        assert_eq!(pts, vec![Point::new(0, 0), Point::new(20_000, 0)]);
    }

    #[test]
    fn coincident_facing_ports_yield_a_zero_length_connection() {
        let t1 = Trans::new(0, false, 5_000, 5_000);
        let t2 = Trans::new(2, false, 5_000, 5_000);
        assert_eq!(route_180(&t1, &t2, 1_000, 2_000, 0, 0).unwrap(), Vec::new());
    }

    #[test]
    fn bracket_when_the_advanced_frames_coincide() {
        // Advancing both frames by the start margin makes them meet at
        // (5000, 0); the route brackets that meeting point.
        let t1 = Trans::new(0, false, 0, 0);
        let t2 = Trans::new(1, false, 5_000, -5_000);
        let pts = route_180(&t1, &t2, 1_000, 2_000, 5_000, 1_000).unwrap();
        assert_eq!(
            pts,
            vec![
                Point::new(0, 0),
                Point::new(5_000, 0),
                Point::new(5_000, -5_000)
            ]
        );
    }

    #[test]
    fn back_to_back_180_takes_a_hairpin() {
        let t1 = Trans::new(0, false, 0, 0);
        let t2 = Trans::new(2, false, -20_000, 0);
        let pts = route_180(&t1, &t2, 1_000, 2_000, 0, 0).unwrap();
        assert_eq!(
            pts,
            vec![
                Point::new(0, 0),
                Point::new(0, 2_000),
                Point::new(-20_000, 2_000),
                Point::new(-20_000, 0),
            ]
        );
    }

    #[test]
    fn hairpin_honors_straight_margins() {
        let t1 = Trans::new(0, false, 0, 0);
        let t2 = Trans::new(2, false, -20_000, 0);
        let pts = route_180(&t1, &t2, 1_000, 2_000, 1_000, 500).unwrap();
        assert_eq!(
            pts,
            vec![
                Point::new(0, 0),
                Point::new(1_000, 0),
                Point::new(1_000, 2_000),
                Point::new(-20_500, 2_000),
                Point::new(-20_500, 0),
                Point::new(-20_000, 0),
            ]
        );
    }

    #[test]
    fn undersized_180_radius_is_rejected() {
        let t1 = Trans::new(0, false, 0, 0);
        let t2 = Trans::new(2, false, 20_000, 0);
        let err = route_180(&t1, &t2, 2_000, 1_000, 0, 0).unwrap_err();
        assert!(matches!(err, RouteError::Unsupported { .. }));
    }

    #[test]
    fn unimplemented_180_configurations_are_surfaced() {
        let t1 = Trans::new(0, false, 0, 0);
        let t2 = Trans::new(0, false, 0, 10_000);
        let err = route_180(&t1, &t2, 1_000, 2_000, 0, 0).unwrap_err();
        assert!(matches!(err, RouteError::Unsupported { .. }));
    }
}
