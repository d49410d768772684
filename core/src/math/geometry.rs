use serde::{Deserialize, Serialize};

/// Planar point used by the triangulation. The analysis layer maps
/// longitude onto `x` and latitude onto `y`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Degeneracy cutoff for twice-signed-area values; coordinates are degrees,
/// so anything below this is numerically collinear.
pub const AREA_EPSILON: f64 = 1e-12;

/// Twice the signed area of triangle (a, b, c); positive when the vertices
/// run counter-clockwise.
pub fn orient2d(a: Vec2, b: Vec2, c: Vec2) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

/// Circumcircle of triangle (a, b, c) as (center, squared radius); `None`
/// when the vertices are collinear.
pub fn circumcircle(a: Vec2, b: Vec2, c: Vec2) -> Option<(Vec2, f64)> {
    let d = 2.0 * orient2d(a, b, c);
    if d.abs() < AREA_EPSILON {
        return None;
    }
    let a_sq = a.x * a.x + a.y * a.y;
    let b_sq = b.x * b.x + b.y * b.y;
    let c_sq = c.x * c.x + c.y * c.y;
    let center = Vec2::new(
        (a_sq * (b.y - c.y) + b_sq * (c.y - a.y) + c_sq * (a.y - b.y)) / d,
        (a_sq * (c.x - b.x) + b_sq * (a.x - c.x) + c_sq * (b.x - a.x)) / d,
    );
    let dx = a.x - center.x;
    let dy = a.y - center.y;
    Some((center, dx * dx + dy * dy))
}

/// Barycentric weights of `p` within triangle (a, b, c); `None` when the
/// triangle is degenerate. Weights sum to one and go negative outside.
pub fn barycentric(p: Vec2, a: Vec2, b: Vec2, c: Vec2) -> Option<[f64; 3]> {
    let denom = orient2d(a, b, c);
    if denom.abs() < AREA_EPSILON {
        return None;
    }
    let w_a = orient2d(b, c, p) / denom;
    let w_b = orient2d(c, a, p) / denom;
    Some([w_a, w_b, 1.0 - w_a - w_b])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orientation_sign_matches_winding() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(1.0, 0.0);
        let c = Vec2::new(0.0, 1.0);
        assert!(orient2d(a, b, c) > 0.0);
        assert!(orient2d(a, c, b) < 0.0);
        assert_eq!(orient2d(a, b, Vec2::new(2.0, 0.0)), 0.0);
    }

    #[test]
    fn circumcircle_of_right_triangle_sits_on_the_hypotenuse() {
        let (center, radius_sq) = circumcircle(
            Vec2::new(0.0, 0.0),
            Vec2::new(2.0, 0.0),
            Vec2::new(0.0, 2.0),
        )
        .unwrap();
        assert!((center.x - 1.0).abs() < 1e-12);
        assert!((center.y - 1.0).abs() < 1e-12);
        assert!((radius_sq - 2.0).abs() < 1e-12);
    }

    #[test]
    fn circumcircle_rejects_collinear_vertices() {
        assert!(circumcircle(
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(2.0, 2.0)
        )
        .is_none());
    }

    #[test]
    fn barycentric_weights_recover_vertices_and_centroid() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(1.0, 0.0);
        let c = Vec2::new(0.0, 1.0);

        let at_a = barycentric(a, a, b, c).unwrap();
        assert!((at_a[0] - 1.0).abs() < 1e-12);
        assert!(at_a[1].abs() < 1e-12);

        let centroid = Vec2::new(1.0 / 3.0, 1.0 / 3.0);
        let weights = barycentric(centroid, a, b, c).unwrap();
        for weight in weights {
            assert!((weight - 1.0 / 3.0).abs() < 1e-12);
        }

        let outside = barycentric(Vec2::new(2.0, 2.0), a, b, c).unwrap();
        assert!(outside.iter().any(|&weight| weight < 0.0));
    }
}
