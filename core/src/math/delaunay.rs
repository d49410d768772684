use super::geometry::{circumcircle, Vec2};

/// Triangle as indices into the site list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Triangle {
    pub a: usize,
    pub b: usize,
    pub c: usize,
}

#[derive(Debug, Clone, Copy)]
struct CachedTriangle {
    tri: Triangle,
    center: Vec2,
    radius_sq: f64,
}

impl CachedTriangle {
    fn new(vertices: &[Vec2], a: usize, b: usize, c: usize) -> Option<Self> {
        circumcircle(vertices[a], vertices[b], vertices[c]).map(|(center, radius_sq)| Self {
            tri: Triangle { a, b, c },
            center,
            radius_sq,
        })
    }

    fn circumcircle_contains(&self, p: Vec2) -> bool {
        let dx = p.x - self.center.x;
        let dy = p.y - self.center.y;
        dx * dx + dy * dy <= self.radius_sq
    }

    fn edges(&self) -> [(usize, usize); 3] {
        [
            (self.tri.a, self.tri.b),
            (self.tri.b, self.tri.c),
            (self.tri.c, self.tri.a),
        ]
    }
}

/// Planar Delaunay triangulation built incrementally (Bowyer-Watson).
///
/// An all-collinear site set produces an empty triangle list; callers treat
/// that as insufficient data rather than an error here.
#[derive(Debug, Clone)]
pub struct Triangulation {
    sites: Vec<Vec2>,
    triangles: Vec<Triangle>,
}

impl Triangulation {
    pub fn build(sites: &[Vec2]) -> Self {
        let triangles = if sites.len() < 3 {
            Vec::new()
        } else {
            Self::bowyer_watson(sites)
        };
        Self {
            sites: sites.to_vec(),
            triangles,
        }
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    pub fn is_degenerate(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Corner coordinates of a triangle, in index order.
    pub fn corners(&self, tri: Triangle) -> (Vec2, Vec2, Vec2) {
        (self.sites[tri.a], self.sites[tri.b], self.sites[tri.c])
    }

    fn bowyer_watson(sites: &[Vec2]) -> Vec<Triangle> {
        let site_count = sites.len();

        let mut min_x = f64::INFINITY;
        let mut min_y = f64::INFINITY;
        let mut max_x = f64::NEG_INFINITY;
        let mut max_y = f64::NEG_INFINITY;
        for site in sites {
            min_x = min_x.min(site.x);
            min_y = min_y.min(site.y);
            max_x = max_x.max(site.x);
            max_y = max_y.max(site.y);
        }
        let span = (max_x - min_x).max(max_y - min_y).max(1.0);
        let mid_x = (min_x + max_x) / 2.0;
        let mid_y = (min_y + max_y) / 2.0;

        // Super-triangle far enough out that its circumcircles cover every site.
        let mut vertices = sites.to_vec();
        vertices.push(Vec2::new(mid_x - 20.0 * span, mid_y - span));
        vertices.push(Vec2::new(mid_x + 20.0 * span, mid_y - span));
        vertices.push(Vec2::new(mid_x, mid_y + 20.0 * span));

        let mut triangles: Vec<CachedTriangle> = Vec::new();
        if let Some(seed) = CachedTriangle::new(&vertices, site_count, site_count + 1, site_count + 2)
        {
            triangles.push(seed);
        }

        for index in 0..site_count {
            let site = vertices[index];

            let (bad, kept): (Vec<CachedTriangle>, Vec<CachedTriangle>) = triangles
                .into_iter()
                .partition(|cached| cached.circumcircle_contains(site));
            triangles = kept;

            let mut cavity_edges: Vec<(usize, usize)> = Vec::new();
            for cached in &bad {
                cavity_edges.extend(cached.edges());
            }

            // The cavity boundary is every edge that only one bad triangle owns.
            for (edge_index, &(start, end)) in cavity_edges.iter().enumerate() {
                let shared = cavity_edges.iter().enumerate().any(|(other_index, &(a, b))| {
                    other_index != edge_index && ((a == start && b == end) || (a == end && b == start))
                });
                if shared {
                    continue;
                }
                if let Some(cached) = CachedTriangle::new(&vertices, start, end, index) {
                    triangles.push(cached);
                }
            }
        }

        triangles
            .into_iter()
            .map(|cached| cached.tri)
            .filter(|tri| tri.a < site_count && tri.b < site_count && tri.c < site_count)
            .collect()
    }
}
