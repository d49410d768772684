use crate::math::geometry::{barycentric, Vec2};
use crate::math::Triangulation;
use crate::model::CanonicalMeasurement;
use crate::prelude::{FieldConfig, SurveyError, SurveyResult};
use log::debug;
use ndarray::Array2;

/// Weight slack when deciding whether a lattice node sits inside a
/// triangle; keeps hull-edge nodes from dropping out to rounding.
const EDGE_TOLERANCE: f64 = 1e-9;

/// Regular lattice of estimated dose rates over the padded bounding box of
/// a survey. Rows follow latitude, columns longitude. Nodes outside the
/// convex hull of the samples hold NaN and read back as `None`; the field
/// never extrapolates.
#[derive(Debug, Clone)]
pub struct InterpolatedField {
    values: Array2<f64>,
    lat_start: f64,
    lon_start: f64,
    lat_step: f64,
    lon_step: f64,
}

impl InterpolatedField {
    pub(crate) fn from_parts(
        values: Array2<f64>,
        lat_start: f64,
        lon_start: f64,
        lat_step: f64,
        lon_step: f64,
    ) -> Self {
        Self {
            values,
            lat_start,
            lon_start,
            lat_step,
            lon_step,
        }
    }

    /// Lattice dimensions as (rows, columns).
    pub fn resolution(&self) -> (usize, usize) {
        self.values.dim()
    }

    /// Fractional grid coordinates mapped back to (lat, lon).
    pub fn coords_of(&self, row: f64, col: f64) -> (f64, f64) {
        (
            self.lat_start + row * self.lat_step,
            self.lon_start + col * self.lon_step,
        )
    }

    /// Estimated value at a lattice node, `None` outside the sample hull.
    pub fn value_at(&self, row: usize, col: usize) -> Option<f64> {
        let value = self.values[[row, col]];
        if value.is_nan() {
            None
        } else {
            Some(value)
        }
    }

    /// Smallest and largest defined node values, `None` when the hull
    /// missed every node.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        let mut range: Option<(f64, f64)> = None;
        for &value in self.values.iter() {
            if value.is_nan() {
                continue;
            }
            range = Some(match range {
                Some((min, max)) => (min.min(value), max.max(value)),
                None => (value, value),
            });
        }
        range
    }
}

/// One interpolation site after merging: coincident measurements collapse
/// into their mean so the triangulation never sees duplicate vertices.
fn collapse_sites(points: &[CanonicalMeasurement]) -> Vec<(Vec2, f64)> {
    let mut samples: Vec<(f64, f64, f64)> = points
        .iter()
        .map(|measurement| {
            (
                measurement.point.latitude,
                measurement.point.longitude,
                measurement.value_msv_per_hour,
            )
        })
        .collect();
    // Total order makes the triangulation independent of input order.
    samples.sort_by(|left, right| {
        left.0
            .total_cmp(&right.0)
            .then(left.1.total_cmp(&right.1))
            .then(left.2.total_cmp(&right.2))
    });

    let mut merged: Vec<(Vec2, f64, usize)> = Vec::new();
    for (lat, lon, value) in samples {
        match merged.last_mut() {
            Some((site, sum, count)) if site.y == lat && site.x == lon => {
                *sum += value;
                *count += 1;
            }
            _ => merged.push((Vec2::new(lon, lat), value, 1)),
        }
    }

    merged
        .into_iter()
        .map(|(site, sum, count)| (site, sum / count as f64))
        .collect()
}

/// Builds the continuous field estimate via piecewise-linear barycentric
/// interpolation over the Delaunay triangulation of the sample sites. The
/// estimate reproduces sample values exactly at the sample locations and
/// varies linearly within each triangle.
pub fn interpolate(
    points: &[CanonicalMeasurement],
    config: &FieldConfig,
) -> SurveyResult<InterpolatedField> {
    let sites = collapse_sites(points);
    if sites.len() < 3 {
        return Err(SurveyError::InsufficientData(format!(
            "{} distinct sites, need at least 3",
            sites.len()
        )));
    }

    let coords: Vec<Vec2> = sites.iter().map(|(site, _)| *site).collect();
    let values: Vec<f64> = sites.iter().map(|(_, value)| *value).collect();

    let triangulation = Triangulation::build(&coords);
    if triangulation.is_degenerate() {
        return Err(SurveyError::InsufficientData(
            "sample sites are collinear".to_string(),
        ));
    }

    let resolution = config.grid_resolution.max(2);

    let mut lat_min = f64::INFINITY;
    let mut lat_max = f64::NEG_INFINITY;
    let mut lon_min = f64::INFINITY;
    let mut lon_max = f64::NEG_INFINITY;
    for site in &coords {
        lat_min = lat_min.min(site.y);
        lat_max = lat_max.max(site.y);
        lon_min = lon_min.min(site.x);
        lon_max = lon_max.max(site.x);
    }
    let lat_pad = (config.padding_ratio * (lat_max - lat_min)).max(config.min_padding_deg);
    let lon_pad = (config.padding_ratio * (lon_max - lon_min)).max(config.min_padding_deg);
    let lat_start = lat_min - lat_pad;
    let lon_start = lon_min - lon_pad;
    let lat_step = (lat_max + lat_pad - lat_start) / (resolution - 1) as f64;
    let lon_step = (lon_max + lon_pad - lon_start) / (resolution - 1) as f64;

    let mut grid = Array2::from_elem((resolution, resolution), f64::NAN);

    // Rasterize triangle by triangle; nodes no triangle claims stay NaN.
    for tri in triangulation.triangles() {
        let (a, b, c) = triangulation.corners(*tri);
        let (value_a, value_b, value_c) = (values[tri.a], values[tri.b], values[tri.c]);

        let tri_lat_min = a.y.min(b.y).min(c.y);
        let tri_lat_max = a.y.max(b.y).max(c.y);
        let tri_lon_min = a.x.min(b.x).min(c.x);
        let tri_lon_max = a.x.max(b.x).max(c.x);

        // Scan one node beyond the bounding box on every side; the weight
        // test below is the real inclusion gate.
        let last_index = resolution as isize - 1;
        let row_first =
            ((((tri_lat_min - lat_start) / lat_step).floor() as isize) - 1).clamp(0, last_index)
                as usize;
        let row_last =
            ((((tri_lat_max - lat_start) / lat_step).ceil() as isize) + 1).clamp(0, last_index)
                as usize;
        let col_first =
            ((((tri_lon_min - lon_start) / lon_step).floor() as isize) - 1).clamp(0, last_index)
                as usize;
        let col_last =
            ((((tri_lon_max - lon_start) / lon_step).ceil() as isize) + 1).clamp(0, last_index)
                as usize;

        for row in row_first..=row_last {
            for col in col_first..=col_last {
                if !grid[[row, col]].is_nan() {
                    continue;
                }
                let node = Vec2::new(
                    lon_start + col as f64 * lon_step,
                    lat_start + row as f64 * lat_step,
                );
                if let Some(weights) = barycentric(node, a, b, c) {
                    if weights.iter().all(|&weight| weight >= -EDGE_TOLERANCE) {
                        grid[[row, col]] =
                            weights[0] * value_a + weights[1] * value_b + weights[2] * value_c;
                    }
                }
            }
        }
    }

    debug!(
        "interpolated {}x{} lattice from {} sites across {} triangles",
        resolution,
        resolution,
        coords.len(),
        triangulation.triangles().len()
    );

    Ok(InterpolatedField::from_parts(
        grid, lat_start, lon_start, lat_step, lon_step,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DoseUnit, MeasurementPoint};

    fn canonical(lat: f64, lon: f64, value_msv: f64) -> CanonicalMeasurement {
        CanonicalMeasurement {
            point: MeasurementPoint::new(lat, lon, value_msv, DoseUnit::MilliSievertPerHour, ""),
            value_msv_per_hour: value_msv,
        }
    }

    /// Resolution 13 over a unit square padded by 0.1 puts lattice nodes
    /// exactly on the sample corners (step 0.1).
    fn square_config() -> FieldConfig {
        FieldConfig {
            grid_resolution: 13,
            padding_ratio: 0.10,
            min_padding_deg: 0.05,
        }
    }

    fn square_samples() -> Vec<CanonicalMeasurement> {
        vec![
            canonical(0.0, 0.0, 1.0),
            canonical(0.0, 1.0, 2.0),
            canonical(1.0, 0.0, 3.0),
            canonical(1.0, 1.0, 4.0),
        ]
    }

    #[test]
    fn samples_are_reproduced_at_coincident_lattice_nodes() {
        let field = interpolate(&square_samples(), &square_config()).unwrap();
        assert_eq!(field.resolution(), (13, 13));

        // (0, 0) lands on node (1, 1), (1, 1) on node (11, 11).
        assert!((field.value_at(1, 1).unwrap() - 1.0).abs() < 1e-9);
        assert!((field.value_at(1, 11).unwrap() - 2.0).abs() < 1e-9);
        assert!((field.value_at(11, 1).unwrap() - 3.0).abs() < 1e-9);
        assert!((field.value_at(11, 11).unwrap() - 4.0).abs() < 1e-9);
    }

    #[test]
    fn interior_nodes_interpolate_linearly() {
        let field = interpolate(&square_samples(), &square_config()).unwrap();
        // The square center averages the diagonal regardless of which
        // diagonal the triangulation picked.
        assert!((field.value_at(6, 6).unwrap() - 2.5).abs() < 1e-9);
    }

    #[test]
    fn nodes_outside_the_hull_stay_undefined() {
        let field = interpolate(&square_samples(), &square_config()).unwrap();
        // Padded corners sit outside the sample hull.
        assert!(field.value_at(0, 0).is_none());
        assert!(field.value_at(12, 0).is_none());
        assert!(field.value_at(0, 12).is_none());
        assert!(field.value_at(12, 12).is_none());
    }

    #[test]
    fn value_range_ignores_undefined_nodes() {
        let field = interpolate(&square_samples(), &square_config()).unwrap();
        let (min, max) = field.value_range().unwrap();
        assert!(min >= 1.0 - 1e-9);
        assert!(max <= 4.0 + 1e-9);
    }

    #[test]
    fn collinear_points_are_insufficient() {
        let samples = vec![
            canonical(0.0, 0.0, 1.0),
            canonical(0.5, 0.5, 2.0),
            canonical(1.0, 1.0, 3.0),
        ];
        assert!(matches!(
            interpolate(&samples, &FieldConfig::default()),
            Err(SurveyError::InsufficientData(_))
        ));
    }

    #[test]
    fn three_non_collinear_points_suffice() {
        let samples = vec![
            canonical(0.0, 0.0, 1.0),
            canonical(0.0, 1.0, 2.0),
            canonical(1.0, 0.5, 3.0),
        ];
        assert!(interpolate(&samples, &FieldConfig::default()).is_ok());
    }

    #[test]
    fn fewer_than_three_distinct_sites_are_insufficient() {
        let samples = vec![
            canonical(0.0, 0.0, 1.0),
            canonical(0.0, 0.0, 2.0),
            canonical(1.0, 1.0, 3.0),
        ];
        assert!(matches!(
            interpolate(&samples, &FieldConfig::default()),
            Err(SurveyError::InsufficientData(_))
        ));
    }

    #[test]
    fn coincident_measurements_average_before_triangulating() {
        let mut samples = square_samples();
        // A second reading at the (0, 0) corner pulls its site value from
        // 1.0 to the mean of 1.0 and 3.0.
        samples.push(canonical(0.0, 0.0, 3.0));
        let field = interpolate(&samples, &square_config()).unwrap();
        assert!((field.value_at(1, 1).unwrap() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn point_order_does_not_change_the_field() {
        let forward = interpolate(&square_samples(), &square_config()).unwrap();
        let mut shuffled = square_samples();
        shuffled.reverse();
        shuffled.swap(0, 2);
        let reordered = interpolate(&shuffled, &square_config()).unwrap();

        let (rows, cols) = forward.resolution();
        for row in 0..rows {
            for col in 0..cols {
                match (forward.value_at(row, col), reordered.value_at(row, col)) {
                    (None, None) => {}
                    (Some(left), Some(right)) => assert!((left - right).abs() < 1e-12),
                    mismatch => panic!("node ({row}, {col}) differs: {mismatch:?}"),
                }
            }
        }
    }
}
