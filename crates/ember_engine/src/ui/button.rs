//! Button widget - interactive clickable buttons
//!
//! State tracking, per-state colors, and rectangle hit testing. Geometry for
//! the background comes from [`build_quad`]; a text label composes with the
//! text builder at the call site.

use crate::foundation::math::{Vec2, Vec3, Vec4};

use super::geometry::{build_quad, Quad, QuadParams, ViewportConfig};

/// Button state for visual feedback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonState {
    /// Normal resting state
    Normal,
    /// Mouse is hovering over the button
    Hovered,
    /// Button is being pressed
    Pressed,
    /// Button is disabled (non-interactive)
    Disabled,
}

/// UI button
#[derive(Debug, Clone)]
pub struct Button {
    /// Center of the button in screen-space pixels; z carried for depth
    pub center: Vec3,
    /// Width and height in pixels
    pub size: Vec2,
    /// Current state
    pub state: ButtonState,
    /// Resting color
    pub normal_color: Vec4,
    /// Hover color
    pub hover_color: Vec4,
    /// Pressed color
    pub pressed_color: Vec4,
    /// Disabled color
    pub disabled_color: Vec4,
    /// Whether the button reacts to input
    pub enabled: bool,
}

impl Default for Button {
    fn default() -> Self {
        Self {
            center: Vec3::zeros(),
            size: Vec2::new(100.0, 40.0),
            state: ButtonState::Normal,
            normal_color: Vec4::new(0.3, 0.3, 0.3, 0.9),
            hover_color: Vec4::new(0.4, 0.4, 0.5, 1.0),
            pressed_color: Vec4::new(0.5, 0.5, 0.6, 1.0),
            disabled_color: Vec4::new(0.2, 0.2, 0.2, 0.5),
            enabled: true,
        }
    }
}

impl Button {
    /// Create a button centered at `center` with the given pixel size
    pub fn new(center: Vec3, size: Vec2) -> Self {
        Self {
            center,
            size,
            ..Default::default()
        }
    }

    /// Check if a screen-space point is inside the button's bounds
    pub fn contains(&self, point_x: f32, point_y: f32) -> bool {
        let half_w = self.size.x * 0.5;
        let half_h = self.size.y * 0.5;
        point_x >= self.center.x - half_w
            && point_x <= self.center.x + half_w
            && point_y >= self.center.y - half_h
            && point_y <= self.center.y + half_h
    }

    /// Update state from the current cursor position and mouse button
    ///
    /// Returns `true` on the frame the button is clicked (released while
    /// pressed with the cursor still inside).
    pub fn update_state(&mut self, cursor_x: f32, cursor_y: f32, mouse_down: bool) -> bool {
        if !self.enabled {
            self.state = ButtonState::Disabled;
            return false;
        }

        let inside = self.contains(cursor_x, cursor_y);
        let was_pressed = self.state == ButtonState::Pressed;

        self.state = match (inside, mouse_down) {
            (true, true) => ButtonState::Pressed,
            (true, false) => ButtonState::Hovered,
            (false, _) => ButtonState::Normal,
        };

        was_pressed && inside && !mouse_down
    }

    /// Color for the current state
    pub fn current_color(&self) -> Vec4 {
        if !self.enabled {
            return self.disabled_color;
        }
        match self.state {
            ButtonState::Normal => self.normal_color,
            ButtonState::Hovered => self.hover_color,
            ButtonState::Pressed => self.pressed_color,
            ButtonState::Disabled => self.disabled_color,
        }
    }

    /// Background quad in the current state's color
    pub fn background_quad(&self, viewport: ViewportConfig) -> Quad {
        build_quad(
            &QuadParams::screen(self.center, self.size).with_color(self.current_color()),
            viewport,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn button() -> Button {
        Button::new(Vec3::new(100.0, 100.0, 0.0), Vec2::new(80.0, 40.0))
    }

    #[test]
    fn test_hit_testing_bounds() {
        let button = button();
        assert!(button.contains(100.0, 100.0));
        assert!(button.contains(60.0, 80.0));
        assert!(button.contains(140.0, 120.0));
        assert!(!button.contains(59.9, 100.0));
        assert!(!button.contains(100.0, 120.1));
    }

    #[test]
    fn test_click_fires_on_release_inside() {
        let mut button = button();
        assert!(!button.update_state(100.0, 100.0, true));
        assert_eq!(button.state, ButtonState::Pressed);
        assert!(button.update_state(100.0, 100.0, false));
        assert_eq!(button.state, ButtonState::Hovered);
    }

    #[test]
    fn test_drag_off_cancels_click() {
        let mut button = button();
        button.update_state(100.0, 100.0, true);
        assert!(!button.update_state(500.0, 500.0, false));
        assert_eq!(button.state, ButtonState::Normal);
    }

    #[test]
    fn test_disabled_button_ignores_input() {
        let mut button = Button {
            enabled: false,
            ..button()
        };
        assert!(!button.update_state(100.0, 100.0, true));
        assert_eq!(button.state, ButtonState::Disabled);
        assert_eq!(button.current_color(), button.disabled_color);
    }

    #[test]
    fn test_state_colors() {
        let mut button = button();
        assert_eq!(button.current_color(), button.normal_color);
        button.update_state(100.0, 100.0, false);
        assert_eq!(button.current_color(), button.hover_color);
        button.update_state(100.0, 100.0, true);
        assert_eq!(button.current_color(), button.pressed_color);
    }
}
