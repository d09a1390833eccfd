use crate::geometry::Point;

/// Removes duplicate points and redundant collinear corners from a
/// waypoint list, in place.
///
/// Consecutive duplicates collapse first; afterwards a point is dropped
/// when the segments on either side of it continue in the same direction
/// (the corner does not actually turn). Running the two steps separately
/// keeps a corner that happens to be listed twice: treating the zero
/// vector between the duplicates as removable on both sides would delete
/// the corner itself and leave a diagonal. The marking pass repeats until
/// nothing is removable, so the result is maximal and the operation is
/// idempotent. Inputs with fewer than two distinct points pass through
/// untouched, and the first and last points are always preserved.
pub fn simplify(points: &mut Vec<Point>) {
    points.dedup();
    while points.len() > 2 {
        let before = points.len();
        sweep(points);
        if points.len() == before {
            break;
        }
    }
}

/// Consuming convenience around [`simplify`].
pub fn simplified(mut points: Vec<Point>) -> Vec<Point> {
    simplify(&mut points);
    points
}

/// One backward-marking pass: flag interior points whose bend does not
/// change direction, then filter. Expects no consecutive duplicates.
fn sweep(points: &mut Vec<Point>) {
    let mut keep = vec![true; points.len()];
    let mut prev = points[0];
    let mut cur = points[1];
    for (i, &next) in points.iter().enumerate().skip(2) {
        let v1 = cur - prev;
        let v2 = next - cur;
        if v1.x.signum() == v2.x.signum() && v1.y.signum() == v2.y.signum() {
            keep[i - 1] = false;
        }
        prev = cur;
        cur = next;
    }
    let mut it = keep.iter();
    points.retain(|_| *it.next().unwrap());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pts(raw: &[(i64, i64)]) -> Vec<Point> {
        raw.iter().map(|&(x, y)| Point::new(x, y)).collect()
    }

    #[test]
    fn drops_collinear_interior_points() {
        let cleaned = simplified(pts(&[(0, 0), (5, 0), (10, 0), (10, 7)]));
        assert_eq!(cleaned, pts(&[(0, 0), (10, 0), (10, 7)]));
    }

    #[test]
    fn drops_duplicate_points() {
        let cleaned = simplified(pts(&[(0, 0), (5, 0), (5, 0), (5, 9)]));
        assert_eq!(cleaned, pts(&[(0, 0), (5, 0), (5, 9)]));
    }

    #[test]
    fn duplicated_corner_keeps_its_bend() {
        // The corner at (7, 0) is listed three times; collapsing it must
        // not delete the turn and join (0, 0) to (7, 4) diagonally.
        let cleaned = simplified(pts(&[(0, 0), (7, 0), (7, 0), (7, 0), (7, 4)]));
        assert_eq!(cleaned, pts(&[(0, 0), (7, 0), (7, 4)]));
        for pair in cleaned.windows(2) {
            let v = pair[1] - pair[0];
            assert!((v.x == 0) != (v.y == 0));
        }
    }

    #[test]
    fn drops_leading_duplicate() {
        let cleaned = simplified(pts(&[(0, 0), (0, 0), (4, 0)]));
        assert_eq!(cleaned, pts(&[(0, 0), (4, 0)]));
    }

    #[test]
    fn is_idempotent() {
        let once = simplified(pts(&[
            (0, 0),
            (2, 0),
            (4, 0),
            (4, 0),
            (4, 3),
            (4, 8),
            (9, 8),
        ]));
        assert_eq!(simplified(once.clone()), once);
        assert_eq!(once, pts(&[(0, 0), (4, 0), (4, 8), (9, 8)]));
    }

    #[test]
    fn duplicate_runs_collapse_with_collinear_neighbors() {
        let cleaned = simplified(pts(&[(0, 0), (3, 0), (3, 0), (6, 0), (6, 4)]));
        assert_eq!(cleaned, pts(&[(0, 0), (6, 0), (6, 4)]));
    }

    #[test]
    fn trivial_inputs_pass_through() {
        assert_eq!(simplified(Vec::new()), Vec::new());
        assert_eq!(simplified(pts(&[(1, 2)])), pts(&[(1, 2)]));
        assert_eq!(simplified(pts(&[(1, 2), (3, 2)])), pts(&[(1, 2), (3, 2)]));
        assert_eq!(simplified(pts(&[(1, 2), (1, 2)])), pts(&[(1, 2)]));
    }

    #[test]
    fn preserves_endpoints() {
        let input = pts(&[(0, 0), (5, 0), (5, 5), (5, 9), (2, 9)]);
        let cleaned = simplified(input.clone());
        assert_eq!(cleaned.first(), input.first());
        assert_eq!(cleaned.last(), input.last());
    }
}
