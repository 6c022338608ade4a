//! Color palettes used by the map view.

use glam::Vec3;

/// One color per image pyramid level, coarsest last.
pub const LEVEL_COLORS: [Vec3; 4] = [
    Vec3::new(1.0, 0.0, 0.0),
    Vec3::new(1.0, 1.0, 0.0),
    Vec3::new(0.0, 1.0, 0.0),
    Vec3::new(0.0, 0.0, 0.7),
];

const UPDATED_COLOR: Vec3 = Vec3::new(0.0, 1.0, 0.0);
const STALE_COLOR: Vec3 = Vec3::new(1.0, 0.0, 0.0);
const UNTAGGED_COLOR: Vec3 = Vec3::new(0.5, 0.5, 0.5);

/// Color for a point first seen at the given pyramid level.
///
/// Levels past the end of the palette share its last entry.
#[must_use]
pub fn level_color(level: usize) -> Vec3 {
    LEVEL_COLORS[level.min(LEVEL_COLORS.len() - 1)]
}

/// Green for points touched by the last map update, red otherwise.
#[must_use]
pub fn update_state_color(updated: bool) -> Vec3 {
    if updated {
        UPDATED_COLOR
    } else {
        STALE_COLOR
    }
}

/// Tint for a keyframe marker from its producer tag.
#[must_use]
#[allow(clippy::match_same_arms)] // tags 1 and 5 are both magenta on purpose
pub fn keyframe_tag_color(tag: i32) -> Vec3 {
    match tag {
        1 => Vec3::new(1.0, 0.0, 1.0),
        2 => Vec3::new(0.0, 1.0, 0.0),
        3 => Vec3::new(0.0, 0.0, 1.0),
        4 => Vec3::new(0.0, 1.0, 1.0),
        5 => Vec3::new(1.0, 0.0, 1.0),
        6 => Vec3::new(1.0, 1.0, 0.0),
        10 => Vec3::new(1.0, 0.0, 0.0),
        _ => UNTAGGED_COLOR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_color_clamps() {
        assert_eq!(level_color(0), Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(level_color(3), Vec3::new(0.0, 0.0, 0.7));
        assert_eq!(level_color(17), level_color(3));
    }

    #[test]
    fn test_update_state_color() {
        assert_eq!(update_state_color(true), Vec3::Y);
        assert_eq!(update_state_color(false), Vec3::X);
    }

    #[test]
    fn test_keyframe_tag_color() {
        assert_eq!(keyframe_tag_color(10), Vec3::X);
        assert_eq!(keyframe_tag_color(0), Vec3::splat(0.5));
        assert_eq!(keyframe_tag_color(-3), Vec3::splat(0.5));
    }
}
