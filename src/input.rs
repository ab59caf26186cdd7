use crate::flow::ElementKind;
use crate::vec2::Vec2;

/// Pick radius around the cursor, in window pixels.
pub const PICK_RADIUS_PX: f64 = 5.0;

/// Pointer state sampled on a button press.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Gesture {
    pub left: bool,
    pub right: bool,
    /// Element key held during the press (`S`, `V` or `D`).
    pub kind_key: Option<ElementKind>,
    /// Cursor in unit-domain coordinates.
    pub cursor: Vec2,
}

/// Element edit requested by the user. Applied on the physics thread.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Action {
    /// Free every element within `radius` of `at`.
    Remove { at: Vec2, radius: f64 },
    /// Put a new element into the first free slot of its kind.
    Place { kind: ElementKind, at: Vec2, strength: f64 },
    /// Grow (`grow = true`) or shrink every element within `radius` of `at`.
    Adjust { at: Vec2, radius: f64, grow: bool },
}

/// Convert a window pixel position (origin top-left) to domain coordinates
/// (origin bottom-left).
pub fn cursor_to_domain(mx: f32, my: f32, width_px: usize, height_px: usize) -> Vec2 {
    Vec2::new(
        (mx as f64 / width_px as f64).clamp(0.0, 1.0),
        (1.0 - my as f64 / height_px as f64).clamp(0.0, 1.0),
    )
}

/// Both buttons remove; one button with a kind key places (right = negative
/// strength); one button alone grows (left) or shrinks (right).
pub fn map_gesture(g: &Gesture, pick_radius: f64) -> Option<Action> {
    if !g.left && !g.right {
        return None;
    }
    if g.left && g.right {
        return Some(Action::Remove { at: g.cursor, radius: pick_radius });
    }
    match g.kind_key {
        Some(kind) => {
            let sign = if g.right { -1.0 } else { 1.0 };
            Some(Action::Place {
                kind,
                at: g.cursor,
                strength: sign * kind.default_strength(),
            })
        }
        None => Some(Action::Adjust {
            at: g.cursor,
            radius: pick_radius,
            grow: g.left,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gesture(left: bool, right: bool, kind_key: Option<ElementKind>) -> Gesture {
        Gesture { left, right, kind_key, cursor: Vec2::new(0.25, 0.75) }
    }

    #[test]
    fn test_no_button_no_action() {
        assert_eq!(map_gesture(&gesture(false, false, Some(ElementKind::Source)), 0.01), None);
    }

    #[test]
    fn test_both_buttons_remove_even_with_key() {
        let action = map_gesture(&gesture(true, true, Some(ElementKind::Vortex)), 0.01);
        assert_eq!(action, Some(Action::Remove { at: Vec2::new(0.25, 0.75), radius: 0.01 }));
    }

    #[test]
    fn test_left_with_key_places_positive() {
        let action = map_gesture(&gesture(true, false, Some(ElementKind::Source)), 0.01);
        assert_eq!(
            action,
            Some(Action::Place { kind: ElementKind::Source, at: Vec2::new(0.25, 0.75), strength: 1.0 })
        );
    }

    #[test]
    fn test_right_with_key_places_negative() {
        let action = map_gesture(&gesture(false, true, Some(ElementKind::Dipole)), 0.01);
        assert_eq!(
            action,
            Some(Action::Place { kind: ElementKind::Dipole, at: Vec2::new(0.25, 0.75), strength: -0.01 })
        );
        let action = map_gesture(&gesture(false, true, Some(ElementKind::Vortex)), 0.01);
        assert!(matches!(action, Some(Action::Place { strength, .. }) if strength == -0.5));
    }

    #[test]
    fn test_single_button_adjusts() {
        assert_eq!(
            map_gesture(&gesture(true, false, None), 0.02),
            Some(Action::Adjust { at: Vec2::new(0.25, 0.75), radius: 0.02, grow: true })
        );
        assert_eq!(
            map_gesture(&gesture(false, true, None), 0.02),
            Some(Action::Adjust { at: Vec2::new(0.25, 0.75), radius: 0.02, grow: false })
        );
    }

    #[test]
    fn test_cursor_to_domain_flips_y() {
        assert_eq!(cursor_to_domain(0.0, 0.0, 600, 400), Vec2::new(0.0, 1.0));
        assert_eq!(cursor_to_domain(600.0, 400.0, 600, 400), Vec2::new(1.0, 0.0));
        assert_eq!(cursor_to_domain(150.0, 100.0, 600, 400), Vec2::new(0.25, 0.75));
    }

    #[test]
    fn test_cursor_to_domain_clamps() {
        assert_eq!(cursor_to_domain(-10.0, 900.0, 600, 400), Vec2::new(0.0, 0.0));
    }
}
