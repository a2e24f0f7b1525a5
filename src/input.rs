//! Pointer input for the card.
//!
//! Raw winit window events are reduced to [`PointerEvent`]s: one press,
//! move or release at a position in physical pixels. Only the left button
//! grabs the card; other buttons are ignored.
//!
//! ```ignore
//! if let Some(event) = pointer.handle_event(&window_event) {
//!     driver.handle_pointer(event);
//! }
//! ```

use glam::Vec2;
use winit::event::{ElementState, MouseButton, WindowEvent};

/// What the pointer did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Press,
    Move,
    Release,
}

/// A pointer event in physical pixels, origin at the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub position: Vec2,
}

impl PointerEvent {
    pub fn press(position: Vec2) -> Self {
        Self { kind: PointerKind::Press, position }
    }

    pub fn moved(position: Vec2) -> Self {
        Self { kind: PointerKind::Move, position }
    }

    pub fn release(position: Vec2) -> Self {
        Self { kind: PointerKind::Release, position }
    }
}

/// Tracks the cursor so button events can carry a position.
#[derive(Debug, Default)]
pub struct Pointer {
    position: Vec2,
    held: bool,
}

impl Pointer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last known cursor position in pixels.
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Whether the left button is down.
    pub fn is_held(&self) -> bool {
        self.held
    }

    /// Record a cursor move.
    pub fn cursor_moved(&mut self, position: Vec2) -> PointerEvent {
        self.position = position;
        PointerEvent::moved(position)
    }

    /// Record a button change. Returns `None` for buttons other than left
    /// and for repeated states.
    pub fn button(&mut self, button: MouseButton, state: ElementState) -> Option<PointerEvent> {
        if !matches!(button, MouseButton::Left) {
            return None;
        }
        match state {
            ElementState::Pressed if !self.held => {
                self.held = true;
                Some(PointerEvent::press(self.position))
            }
            ElementState::Released if self.held => {
                self.held = false;
                Some(PointerEvent::release(self.position))
            }
            _ => None,
        }
    }

    /// Forget a held button, e.g. when the cursor leaves the window.
    /// Returns a release if one was pending.
    pub fn cancel(&mut self) -> Option<PointerEvent> {
        self.button(MouseButton::Left, ElementState::Released)
    }

    /// Process a winit window event.
    pub fn handle_event(&mut self, event: &WindowEvent) -> Option<PointerEvent> {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                Some(self.cursor_moved(Vec2::new(position.x as f32, position.y as f32)))
            }
            WindowEvent::MouseInput { state, button, .. } => {
                self.button(*button, *state)
            }
            WindowEvent::Focused(false) => self.cancel(),
            _ => None,
        }
    }
}
