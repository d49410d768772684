use crate::analysis::field::InterpolatedField;
use crate::model::{ContourLine, ContourSet, GeoPoint};
use log::debug;

/// Matching tolerance, in grid units, when chaining segments that share an
/// edge-crossing point.
const JOIN_EPSILON: f64 = 1e-6;

/// Fractional lattice coordinate of a contour vertex.
#[derive(Debug, Clone, Copy, PartialEq)]
struct GridPoint {
    row: f64,
    col: f64,
}

impl GridPoint {
    fn close_to(self, other: GridPoint) -> bool {
        (self.row - other.row).abs() < JOIN_EPSILON && (self.col - other.col).abs() < JOIN_EPSILON
    }
}

#[derive(Debug, Clone, Copy)]
struct GridSegment {
    start: GridPoint,
    end: GridPoint,
}

/// Extracts iso-value polylines from `field` at each requested level.
///
/// Cells with any undefined corner are skipped outright, so contours never
/// cross into unsampled territory. Levels outside the sampled value range
/// simply produce nothing for that level.
pub fn extract_contours(field: &InterpolatedField, levels: &[f64]) -> ContourSet {
    let mut lines = Vec::new();
    for &level in levels {
        let segments = march_cells(field, level);
        for (grid_vertices, closed) in connect_segments(&segments) {
            let vertices = grid_vertices
                .into_iter()
                .map(|vertex| {
                    let (lat, lon) = field.coords_of(vertex.row, vertex.col);
                    GeoPoint { lat, lon }
                })
                .collect();
            lines.push(ContourLine {
                level,
                vertices,
                closed,
            });
        }
    }
    debug!(
        "extracted {} contour polylines across {} levels",
        lines.len(),
        levels.len()
    );
    ContourSet { lines }
}

/// Walks every grid cell and emits a segment wherever the corner values
/// straddle the level (marching squares).
fn march_cells(field: &InterpolatedField, level: f64) -> Vec<GridSegment> {
    let (rows, cols) = field.resolution();
    let mut segments = Vec::new();

    for row in 0..rows.saturating_sub(1) {
        for col in 0..cols.saturating_sub(1) {
            let corners = (
                field.value_at(row, col),
                field.value_at(row, col + 1),
                field.value_at(row + 1, col + 1),
                field.value_at(row + 1, col),
            );
            let (Some(top_left), Some(top_right), Some(bottom_right), Some(bottom_left)) = corners
            else {
                continue;
            };

            let mut cell_index = 0u8;
            if top_left >= level {
                cell_index |= 1;
            }
            if top_right >= level {
                cell_index |= 2;
            }
            if bottom_right >= level {
                cell_index |= 4;
            }
            if bottom_left >= level {
                cell_index |= 8;
            }

            segments.extend(cell_segments(
                cell_index,
                row as f64,
                col as f64,
                top_left,
                top_right,
                bottom_right,
                bottom_left,
                level,
            ));
        }
    }

    segments
}

/// Crossing point on the cell edge between two corners, by linear
/// interpolation of the corner values.
fn edge_crossing(
    first: GridPoint,
    second: GridPoint,
    first_value: f64,
    second_value: f64,
    level: f64,
) -> GridPoint {
    if (second_value - first_value).abs() < 1e-12 {
        return GridPoint {
            row: (first.row + second.row) / 2.0,
            col: (first.col + second.col) / 2.0,
        };
    }
    let t = ((level - first_value) / (second_value - first_value)).clamp(0.0, 1.0);
    GridPoint {
        row: first.row + t * (second.row - first.row),
        col: first.col + t * (second.col - first.col),
    }
}

#[allow(clippy::too_many_arguments)]
fn cell_segments(
    cell_index: u8,
    row: f64,
    col: f64,
    top_left: f64,
    top_right: f64,
    bottom_right: f64,
    bottom_left: f64,
    level: f64,
) -> Vec<GridSegment> {
    let tl = GridPoint { row, col };
    let tr = GridPoint { row, col: col + 1.0 };
    let br = GridPoint {
        row: row + 1.0,
        col: col + 1.0,
    };
    let bl = GridPoint {
        row: row + 1.0,
        col,
    };

    let top = edge_crossing(tl, tr, top_left, top_right, level);
    let right = edge_crossing(tr, br, top_right, bottom_right, level);
    let bottom = edge_crossing(bl, br, bottom_left, bottom_right, level);
    let left = edge_crossing(tl, bl, top_left, bottom_left, level);

    let segment = |start: GridPoint, end: GridPoint| GridSegment { start, end };

    match cell_index {
        0 | 15 => vec![],
        1 | 14 => vec![segment(left, top)],
        2 | 13 => vec![segment(top, right)],
        3 | 12 => vec![segment(left, right)],
        4 | 11 => vec![segment(right, bottom)],
        // Saddles resolve as two independent segments.
        5 => vec![segment(left, top), segment(right, bottom)],
        6 | 9 => vec![segment(top, bottom)],
        7 | 8 => vec![segment(left, bottom)],
        10 => vec![segment(top, right), segment(left, bottom)],
        _ => vec![],
    }
}

/// Chains segments sharing an endpoint into polylines, extending from both
/// ends so a seed segment in the middle of a line still yields one chain.
fn connect_segments(segments: &[GridSegment]) -> Vec<(Vec<GridPoint>, bool)> {
    let mut polylines = Vec::new();
    let mut used = vec![false; segments.len()];

    for seed in 0..segments.len() {
        if used[seed] {
            continue;
        }
        used[seed] = true;
        let mut points = vec![segments[seed].start, segments[seed].end];

        // Grow at the tail, then flip and grow at the other end.
        for _ in 0..2 {
            loop {
                let tail = points[points.len() - 1];
                let next = segments.iter().enumerate().find(|(index, candidate)| {
                    !used[*index]
                        && (candidate.start.close_to(tail) || candidate.end.close_to(tail))
                });
                match next {
                    Some((index, candidate)) => {
                        used[index] = true;
                        points.push(if candidate.start.close_to(tail) {
                            candidate.end
                        } else {
                            candidate.start
                        });
                    }
                    None => break,
                }
            }
            points.reverse();
        }

        let closed = points.len() > 2 && points[0].close_to(points[points.len() - 1]);
        polylines.push((points, closed));
    }

    polylines
}
