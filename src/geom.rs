//! Scalar geometry helpers.
//!
//! Small free functions over [`nalgebra`] points and vectors that the mesh
//! algorithms share: angles, point/line and point/segment distances, line
//! projection, and a 2D orientation predicate. Positions are `Point3<f64>`
//! throughout; there is no bespoke point type.

use nalgebra::{Point3, Vector3};

/// Geometric coincidence tolerance.
///
/// Two points closer than this are considered the same point.
pub const EPSILON: f64 = 1e-10;

/// Check whether two points coincide within [`EPSILON`].
#[inline]
pub fn points_coincide(a: &Point3<f64>, b: &Point3<f64>) -> bool {
    (a - b).norm() < EPSILON
}

/// Compute the angle between two vectors, in radians.
///
/// Uses `atan2(|a × b|, a · b)`, which is stable for near-parallel vectors.
/// The result is in `[0, π]`.
pub fn angle(a: &Vector3<f64>, b: &Vector3<f64>) -> f64 {
    a.cross(b).norm().atan2(a.dot(b))
}

/// Distance from point `p` to the infinite line through `a` and `b`.
///
/// A degenerate line (`a` and `b` coincident) is reported with a warning and
/// the distance to `a` is returned instead of dividing by a vanishing length.
pub fn distance_from_line(p: &Point3<f64>, a: &Point3<f64>, b: &Point3<f64>) -> f64 {
    let ba = b - a;
    let len = ba.norm();
    if len < EPSILON {
        tracing::warn!("degenerate line passed to distance_from_line");
        return (p - a).norm();
    }
    (p - a).cross(&ba).norm() / len
}

/// Distance from point `p` to the segment `[a, b]`.
///
/// Falls back to the distance to the nearer endpoint when the projection of
/// `p` lands outside the segment. A zero-length segment yields the distance
/// to `a`.
pub fn distance_from_segment(p: &Point3<f64>, a: &Point3<f64>, b: &Point3<f64>) -> f64 {
    let ap = a - p;
    let bp = b - p;
    let ap_len = ap.norm();
    let bp_len = bp.norm();
    if ap_len < EPSILON || bp_len < EPSILON {
        return 0.0;
    }

    let ab = b - a;
    if ab.norm() < EPSILON {
        return ap_len;
    }

    // Projection outside the segment: the nearer endpoint wins.
    if angle(&ab, &(-ap)) > std::f64::consts::FRAC_PI_2 {
        return ap_len;
    }
    if angle(&(-ab), &(-bp)) > std::f64::consts::FRAC_PI_2 {
        return bp_len;
    }

    distance_from_line(p, a, b)
}

/// Project point `p` onto the line through `a` and `b`.
///
/// A degenerate line projects everything onto `a`.
pub fn project_on_line(p: &Point3<f64>, a: &Point3<f64>, b: &Point3<f64>) -> Point3<f64> {
    let ab = b - a;
    let len = ab.norm();
    if len < EPSILON {
        tracing::warn!("degenerate line passed to project_on_line");
        return *a;
    }
    let n = ab / len;
    a + n * (p - a).dot(&n)
}

/// The point of segment `[a, b]` closest to `p`.
///
/// A zero-length segment yields `a`.
pub fn closest_point_on_segment(
    p: &Point3<f64>,
    a: &Point3<f64>,
    b: &Point3<f64>,
) -> Point3<f64> {
    let ab = b - a;
    let len2 = ab.norm_squared();
    if len2 < EPSILON {
        return *a;
    }
    let t = (p - a).dot(&ab) / len2;
    a + ab * t.clamp(0.0, 1.0)
}

/// Signed distance from `p` to the plane through `origin` with unit `normal`.
#[inline]
pub fn distance_from_plane(p: &Point3<f64>, origin: &Point3<f64>, normal: &Vector3<f64>) -> f64 {
    (p - origin).dot(normal)
}

/// 2D orientation predicate over the XY plane.
///
/// Returns `1` if `p → q → r` turns clockwise, `-1` if counter-clockwise,
/// and `0` if the three points are collinear (z coordinates are ignored).
pub fn orientation_2d(p: &Point3<f64>, q: &Point3<f64>, r: &Point3<f64>) -> i32 {
    let pq = q - p;
    let pr = r - p;
    let det = pq.x * pr.y - pr.x * pq.y;
    if det < 0.0 {
        1
    } else if det > 0.0 {
        -1
    } else {
        0
    }
}

/// Check whether `p` lies on the segment `[a, b]`, with a relative tolerance.
pub fn is_in_segment(p: &Point3<f64>, a: &Point3<f64>, b: &Point3<f64>) -> bool {
    let l = (b - a).norm();
    if l < EPSILON {
        return points_coincide(p, a);
    }
    let w1 = (p - a).norm() / l;
    let w2 = (b - p).norm() / l;
    w1 + w2 <= 1.0 + 1e-5
}
