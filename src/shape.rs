//! The 2D heart silhouette and helpers for turning paths into polygons.

use glam::Vec2;
use lyon::math::point;
use lyon::path::iterator::PathIterator;
use lyon::path::{Path, PathEvent};

/// Where the outline starts: the notch between the two lobes.
pub const HEART_START: [f32; 2] = [5.0, 5.0];

/// Cubic segments of the heart, each as `[ctrl1, ctrl2, to]`.
///
/// Together with the initial move to [`HEART_START`] these are the seven
/// commands of the outline. The last segment lands back on the start point.
pub const HEART_SEGMENTS: [[[f32; 2]; 3]; 6] = [
    [[5.0, 5.0], [4.0, 0.0], [0.0, 0.0]],
    [[-6.0, 0.0], [-6.0, 7.0], [-6.0, 7.0]],
    [[-6.0, 11.0], [-3.0, 15.4], [5.0, 19.0]],
    [[12.0, 15.4], [16.0, 11.0], [16.0, 7.0]],
    [[16.0, 7.0], [16.0, 0.0], [10.0, 0.0]],
    [[7.0, 0.0], [5.0, 5.0], [5.0, 5.0]],
];

/// Points closer than this are merged when flattening.
const MERGE_DISTANCE: f32 = 1e-4;

/// Builds the closed heart outline.
pub fn heart_outline() -> Path {
    let mut builder = Path::builder();
    builder.begin(point(HEART_START[0], HEART_START[1]));
    for [ctrl1, ctrl2, to] in HEART_SEGMENTS {
        builder.cubic_bezier_to(
            point(ctrl1[0], ctrl1[1]),
            point(ctrl2[0], ctrl2[1]),
            point(to[0], to[1]),
        );
    }
    builder.close();
    builder.build()
}

/// Approximates the first sub-path of `path` with line segments.
///
/// The result has no repeated neighbours and does not repeat the first point
/// at the end.
pub fn flatten_contour(path: &Path, tolerance: f32) -> Vec<Vec2> {
    let mut contour: Vec<Vec2> = Vec::new();

    for event in path.iter().flattened(tolerance) {
        match event {
            PathEvent::Begin { at } => contour.push(Vec2::new(at.x, at.y)),
            PathEvent::Line { to, .. } => {
                let to = Vec2::new(to.x, to.y);
                let repeated = contour
                    .last()
                    .is_some_and(|last| last.distance(to) < MERGE_DISTANCE);
                if !repeated {
                    contour.push(to);
                }
            }
            PathEvent::End { .. } => break,
            _ => {}
        }
    }

    while contour.len() > 1 && contour[0].distance(contour[contour.len() - 1]) < MERGE_DISTANCE
    {
        contour.pop();
    }
    contour
}

/// Shoelace area; positive for counter-clockwise polygons.
pub fn signed_area(polygon: &[Vec2]) -> f32 {
    let n = polygon.len();
    (0..n)
        .map(|i| polygon[i].perp_dot(polygon[(i + 1) % n]))
        .sum::<f32>()
        * 0.5
}

/// Reverses `polygon` in place if it winds clockwise.
pub fn make_counter_clockwise(polygon: &mut [Vec2]) {
    if signed_area(polygon) < 0.0 {
        polygon.reverse();
    }
}

/// A closed polygon path through `polygon`.
pub fn polygon_path(polygon: &[Vec2]) -> Path {
    let mut builder = Path::builder();
    if let Some((first, rest)) = polygon.split_first() {
        builder.begin(point(first.x, first.y));
        for p in rest {
            builder.line_to(point(p.x, p.y));
        }
        builder.close();
    }
    builder.build()
}
