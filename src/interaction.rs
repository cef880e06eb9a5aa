//! Drag-to-look pointer handling.
//!
//! A press anchors the drag; while held, the pointer's displacement from the
//! anchor maps linearly onto latitude (vertical) and longitude (horizontal,
//! inverted). Releasing ends the drag. The stored angles are not clamped;
//! [`look_direction`](crate::camera::look_direction) clamps when it turns
//! them into a view.

use glam::Vec2;
use winit::event::{ElementState, WindowEvent};

/// Degrees of latitude/longitude per pixel of pointer travel.
pub const DRAG_SENSITIVITY: f32 = 0.1;

/// Whether an event should continue on to other listeners.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Propagation {
    Continue,
    Stop,
}

#[derive(Clone, Debug, Default)]
pub struct PointerInteraction {
    is_user_interacting: bool,
    latitude: f32,
    longitude: f32,
    pointer_down_position: Vec2,
    pointer_down_latitude: f32,
    pointer_down_longitude: f32,
    cursor: Vec2,
}

impl PointerInteraction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_user_interacting(&self) -> bool {
        self.is_user_interacting
    }

    pub fn latitude(&self) -> f32 {
        self.latitude
    }

    pub fn longitude(&self) -> f32 {
        self.longitude
    }

    /// Starts a drag at `position`. Ignored while a drag is already running.
    pub fn pointer_down(&mut self, position: Vec2) {
        if self.is_user_interacting {
            return;
        }
        self.is_user_interacting = true;
        self.pointer_down_position = position;
        self.pointer_down_latitude = self.latitude;
        self.pointer_down_longitude = self.longitude;
    }

    pub fn pointer_move(&mut self, position: Vec2) -> Propagation {
        if !self.is_user_interacting {
            return Propagation::Continue;
        }

        let anchor = self.pointer_down_position;
        self.latitude = (position.y - anchor.y) * DRAG_SENSITIVITY + self.pointer_down_latitude;
        self.longitude = (anchor.x - position.x) * DRAG_SENSITIVITY + self.pointer_down_longitude;
        Propagation::Stop
    }

    pub fn pointer_up(&mut self) {
        self.is_user_interacting = false;
    }

    /// Feeds a window event through the drag handlers.
    ///
    /// winit reports button presses without coordinates, so the last cursor
    /// position is tracked here. Any mouse button drags.
    pub fn handle_event(&mut self, event: &WindowEvent) -> Propagation {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = Vec2::new(position.x as f32, position.y as f32);
                self.pointer_move(self.cursor)
            }
            WindowEvent::MouseInput { state, .. } => {
                match state {
                    ElementState::Pressed => self.pointer_down(self.cursor),
                    ElementState::Released => self.pointer_up(),
                }
                Propagation::Stop
            }
            WindowEvent::CursorLeft { .. } => {
                self.pointer_up();
                Propagation::Continue
            }
            _ => Propagation::Continue,
        }
    }
}

#[cfg(test)]
mod tests {
    use winit::dpi::PhysicalPosition;
    use winit::event::{DeviceId, MouseButton};

    use super::*;

    fn device() -> DeviceId {
        // SAFETY: the id is only compared, never handed to the platform.
        unsafe { DeviceId::dummy() }
    }

    fn cursor_moved(x: f64, y: f64) -> WindowEvent {
        WindowEvent::CursorMoved {
            device_id: device(),
            position: PhysicalPosition::new(x, y),
        }
    }

    fn button(state: ElementState) -> WindowEvent {
        WindowEvent::MouseInput {
            device_id: device(),
            state,
            button: MouseButton::Left,
        }
    }

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn drag_maps_displacement_to_angles() {
        let mut pointer = PointerInteraction::new();
        pointer.pointer_down(Vec2::new(100.0, 100.0));
        assert_eq!(pointer.pointer_move(Vec2::new(150.0, 80.0)), Propagation::Stop);

        assert!(approx(pointer.latitude(), -2.0));
        assert!(approx(pointer.longitude(), -5.0));
    }

    #[test]
    fn second_drag_continues_from_previous_angles() {
        let mut pointer = PointerInteraction::new();
        pointer.pointer_down(Vec2::new(100.0, 100.0));
        pointer.pointer_move(Vec2::new(150.0, 80.0));
        pointer.pointer_up();

        pointer.pointer_down(Vec2::new(0.0, 0.0));
        pointer.pointer_move(Vec2::new(-10.0, 30.0));

        assert!(approx(pointer.latitude(), -2.0 + 3.0));
        assert!(approx(pointer.longitude(), -5.0 + 1.0));
    }

    #[test]
    fn moves_without_a_press_propagate_and_change_nothing() {
        let mut pointer = PointerInteraction::new();
        assert_eq!(
            pointer.pointer_move(Vec2::new(40.0, 40.0)),
            Propagation::Continue
        );
        assert_eq!(pointer.latitude(), 0.0);
        assert_eq!(pointer.longitude(), 0.0);
    }

    #[test]
    fn moves_after_release_change_nothing() {
        let mut pointer = PointerInteraction::new();
        pointer.pointer_down(Vec2::new(100.0, 100.0));
        pointer.pointer_move(Vec2::new(110.0, 120.0));
        pointer.pointer_up();

        let (lat, lon) = (pointer.latitude(), pointer.longitude());
        assert_eq!(
            pointer.pointer_move(Vec2::new(500.0, 500.0)),
            Propagation::Continue
        );
        assert_eq!((pointer.latitude(), pointer.longitude()), (lat, lon));
        assert!(!pointer.is_user_interacting());
    }

    #[test]
    fn repeated_press_keeps_the_first_anchor() {
        let mut pointer = PointerInteraction::new();
        pointer.pointer_down(Vec2::new(100.0, 100.0));
        pointer.pointer_down(Vec2::new(300.0, 300.0));
        pointer.pointer_move(Vec2::new(100.0, 110.0));

        assert!(approx(pointer.latitude(), 1.0));
        assert!(approx(pointer.longitude(), 0.0));
    }

    #[test]
    fn latitude_is_not_clamped() {
        let mut pointer = PointerInteraction::new();
        pointer.pointer_down(Vec2::ZERO);
        pointer.pointer_move(Vec2::new(0.0, 5000.0));
        assert!(approx(pointer.latitude(), 500.0));
    }

    #[test]
    fn window_events_drive_a_drag() {
        let mut pointer = PointerInteraction::new();

        assert_eq!(
            pointer.handle_event(&cursor_moved(100.0, 100.0)),
            Propagation::Continue
        );
        assert_eq!(
            pointer.handle_event(&button(ElementState::Pressed)),
            Propagation::Stop
        );
        assert!(pointer.is_user_interacting());
        assert_eq!(
            pointer.handle_event(&cursor_moved(150.0, 80.0)),
            Propagation::Stop
        );
        pointer.handle_event(&button(ElementState::Released));

        assert!(approx(pointer.latitude(), -2.0));
        assert!(approx(pointer.longitude(), -5.0));
        assert!(!pointer.is_user_interacting());

        pointer.handle_event(&cursor_moved(0.0, 0.0));
        assert!(approx(pointer.latitude(), -2.0));
        assert!(approx(pointer.longitude(), -5.0));
    }

    #[test]
    fn press_before_any_cursor_movement_anchors_at_origin() {
        let mut pointer = PointerInteraction::new();
        pointer.handle_event(&button(ElementState::Pressed));
        pointer.handle_event(&cursor_moved(20.0, 30.0));

        assert!(approx(pointer.latitude(), 3.0));
        assert!(approx(pointer.longitude(), -2.0));
    }

    #[test]
    fn leaving_the_window_ends_the_drag() {
        let mut pointer = PointerInteraction::new();
        pointer.handle_event(&cursor_moved(100.0, 100.0));
        pointer.handle_event(&button(ElementState::Pressed));
        pointer.handle_event(&cursor_moved(110.0, 100.0));

        assert_eq!(
            pointer.handle_event(&WindowEvent::CursorLeft {
                device_id: device()
            }),
            Propagation::Continue
        );
        assert!(!pointer.is_user_interacting());

        pointer.handle_event(&cursor_moved(300.0, 300.0));
        assert!(approx(pointer.longitude(), -1.0));
        assert!(approx(pointer.latitude(), 0.0));
    }
}
