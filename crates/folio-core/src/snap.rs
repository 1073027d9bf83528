//! Grid snapping for dragged blocks.

use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Grid granularity for block dragging, in CSS pixels.
pub const GRID_SIZE: f64 = 15.0;

/// Distance within which a point is pulled onto the grid.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SnapRange {
    /// Always snap, no matter how far the nearest grid point is.
    #[default]
    Infinite,
    /// Snap only when the nearest grid point is within this distance.
    Within(f64),
}

/// Snap a point to the nearest grid intersection.
pub fn snap_to_grid(point: Point, grid_size: f64) -> Point {
    Point::new(
        (point.x / grid_size).round() * grid_size,
        (point.y / grid_size).round() * grid_size,
    )
}

/// Snap a point to the grid, honoring a snap range. Points outside the range
/// are returned unchanged.
///
/// A non-positive grid size disables snapping.
pub fn snap_point(point: Point, grid_size: f64, range: SnapRange) -> Point {
    if grid_size <= 0.0 {
        return point;
    }
    let snapped = snap_to_grid(point, grid_size);
    match range {
        SnapRange::Infinite => snapped,
        SnapRange::Within(limit) if snapped.distance(point) <= limit => snapped,
        SnapRange::Within(_) => point,
    }
}
