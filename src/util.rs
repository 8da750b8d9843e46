//! Geometry helpers and color-name lookup.

use crate::draw::{Color, Point, color::*};

// ============================================================================
// Arrowhead Geometry
// ============================================================================

/// Half-angle between each arrowhead barb and the shaft.
pub const ARROWHEAD_ANGLE_DEGREES: f64 = 30.0;

/// Calculates the two barb endpoints of an arrowhead drawn at `tip`.
///
/// The arrow runs from `tail` to `tip`; each barb is `length` pixels long and
/// swept back by [`ARROWHEAD_ANGLE_DEGREES`] on either side of the shaft.
/// A zero-length arrow still gets a head, pointing along +x.
///
/// # Returns
/// `[left, right]` barb endpoints.
pub fn arrowhead_points(tail: Point, tip: Point, length: f64) -> [Point; 2] {
    let angle = (tip.y - tail.y).atan2(tip.x - tail.x);
    let spread = ARROWHEAD_ANGLE_DEGREES.to_radians();

    let barb = |offset: f64| {
        Point::new(
            tip.x - length * (angle + offset).cos(),
            tip.y - length * (angle + offset).sin(),
        )
    };

    [barb(-spread), barb(spread)]
}

// ============================================================================
// Color Mapping
// ============================================================================

/// Maps color name strings to Color values.
///
/// Used by the configuration system to parse color names from the config file.
///
/// # Supported Names (case-insensitive)
/// - "red", "green", "blue", "yellow", "orange", "white", "black"
pub fn name_to_color(name: &str) -> Option<Color> {
    match name.trim().to_lowercase().as_str() {
        "red" => Some(RED),
        "green" => Some(GREEN),
        "blue" => Some(BLUE),
        "yellow" => Some(YELLOW),
        "orange" => Some(ORANGE),
        "white" => Some(WHITE),
        "black" => Some(BLACK),
        _ => None,
    }
}
