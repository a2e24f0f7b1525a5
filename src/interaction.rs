//! Pointer interaction with the card: hover, press-to-drag, release.
//!
//! The controller is a three-state machine:
//!
//! ```text
//!            hit on move              press with hit
//!   Idle  ───────────────▶ Hovering ─────────────────▶ Dragging
//!    ▲  ◀───────────────             ◀─ (re-evaluated    │
//!    │       miss on move                on next move)   │
//!    └──────────────────────── release ◀─────────────────┘
//! ```
//!
//! Idle can also go straight to Dragging on a press with a hit. Pointer
//! events mutate the controller immediately; the frame driver reads the
//! card position and material on its next tick.

use glam::Vec3;

use crate::camera::Ray;
use crate::card::Card;
use crate::material::BandMaterial;

/// Interaction state. Exactly one holds at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InteractionState {
    #[default]
    Idle,
    Hovering,
    Dragging,
}

/// Cursor shape the window should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorHint {
    #[default]
    Default,
    /// Over the card, ready to grab.
    Grab,
    /// Dragging the card.
    Grabbing,
}

/// Drives the hover/drag state machine from pointer rays.
#[derive(Debug, Clone)]
pub struct InteractionController {
    state: InteractionState,
    /// Hit point minus card origin, captured at press.
    drag_offset: Vec3,
    /// Unblended target from the latest drag move.
    drag_target: Option<Vec3>,
    /// Whether the band currently shows the glass preset.
    glass: bool,
    cursor: CursorHint,
    drag_blend: f32,
    base_material: BandMaterial,
    glass_material: BandMaterial,
}

impl InteractionController {
    pub fn new(drag_blend: f32, base_material: BandMaterial, glass_material: BandMaterial) -> Self {
        Self {
            state: InteractionState::Idle,
            drag_offset: Vec3::ZERO,
            drag_target: None,
            glass: false,
            cursor: CursorHint::Default,
            drag_blend,
            base_material,
            glass_material,
        }
    }

    #[inline]
    pub fn state(&self) -> InteractionState {
        self.state
    }

    #[inline]
    pub fn is_dragging(&self) -> bool {
        self.state == InteractionState::Dragging
    }

    #[inline]
    pub fn is_hovered(&self) -> bool {
        self.state == InteractionState::Hovering
    }

    /// Offset recorded at the most recent drag start. Keeps its value after
    /// release.
    #[inline]
    pub fn drag_offset(&self) -> Vec3 {
        self.drag_offset
    }

    /// `pointer_world - drag_offset` from the latest drag move, before
    /// easing.
    #[inline]
    pub fn drag_target(&self) -> Option<Vec3> {
        self.drag_target
    }

    #[inline]
    pub fn cursor(&self) -> CursorHint {
        self.cursor
    }

    /// Whether the band is showing the hover (glass) appearance.
    #[inline]
    pub fn is_glass(&self) -> bool {
        self.glass
    }

    /// Material the band should currently use.
    pub fn band_material(&self) -> BandMaterial {
        if self.glass {
            self.glass_material
        } else {
            self.base_material
        }
    }

    /// Handle a button press. `ray` is `None` when the pointer is outside
    /// the viewport.
    ///
    /// Returns `true` if a drag started.
    pub fn pointer_pressed(&mut self, ray: Option<&Ray>, card: &Card) -> bool {
        if self.is_dragging() {
            return false;
        }
        let Some(hit) = ray.and_then(|r| card.raycast(r)) else {
            return false;
        };

        self.drag_offset = hit.point - card.position;
        self.drag_target = None;
        self.state = InteractionState::Dragging;
        self.cursor = CursorHint::Grabbing;
        log::debug!("Drag started, offset {:?}", self.drag_offset);
        true
    }

    /// Handle pointer motion.
    ///
    /// While dragging, eases the card toward the pointer on the plane at
    /// the card's depth. Otherwise updates hover state from a hit test.
    ///
    /// The drag offset keeps the z of the grabbed face, so each drag move
    /// also eases the card back by `drag_offset.z`. Long drags sink the
    /// card away from the camera even when the pointer holds still.
    pub fn pointer_moved(&mut self, ray: Option<&Ray>, card: &mut Card) {
        if self.is_dragging() {
            if let Some(ray) = ray {
                let pointer_world = ray.point_on_z_plane(card.position.z);
                let target = pointer_world - self.drag_offset;
                self.drag_target = Some(target);
                card.position = card.position.lerp(target, self.drag_blend);
            }
            return;
        }

        let hit = ray.and_then(|r| card.raycast(r)).is_some();
        if hit {
            if self.state == InteractionState::Idle {
                log::debug!("Hover enter");
            }
            self.state = InteractionState::Hovering;
            self.cursor = CursorHint::Grab;
            self.glass = true;
        } else {
            if self.state == InteractionState::Hovering {
                log::debug!("Hover exit");
            }
            self.state = InteractionState::Idle;
            self.cursor = CursorHint::Default;
            self.glass = false;
        }
    }

    /// Handle a button release. Ends a drag; otherwise does nothing.
    pub fn pointer_released(&mut self) {
        if self.is_dragging() {
            self.state = InteractionState::Idle;
            self.cursor = CursorHint::Default;
            log::debug!("Drag ended");
        }
    }
}

impl Default for InteractionController {
    fn default() -> Self {
        Self::new(0.35, BandMaterial::base(), BandMaterial::glass())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::CardMesh;

    fn card() -> Card {
        Card::new(CardMesh::cuboid(Vec3::new(1.6, 1.0, 0.04)), Vec3::new(0.6, 0.0, 0.0), 0.0)
    }

    fn ray_at(x: f32, y: f32) -> Ray {
        Ray::new(Vec3::new(x, y, 6.0), Vec3::NEG_Z)
    }

    #[test]
    fn test_hover_enter_and_exit() {
        let mut ctl = InteractionController::default();
        let mut card = card();

        ctl.pointer_moved(Some(&ray_at(0.6, 0.1)), &mut card);
        assert_eq!(ctl.state(), InteractionState::Hovering);
        assert_eq!(ctl.cursor(), CursorHint::Grab);
        assert_eq!(ctl.band_material(), BandMaterial::glass());

        ctl.pointer_moved(Some(&ray_at(3.0, 0.1)), &mut card);
        assert_eq!(ctl.state(), InteractionState::Idle);
        assert_eq!(ctl.band_material(), BandMaterial::base());
    }

    #[test]
    fn test_press_miss_stays_idle() {
        let mut ctl = InteractionController::default();
        assert!(!ctl.pointer_pressed(Some(&ray_at(3.0, 3.0)), &card()));
        assert!(!ctl.pointer_pressed(None, &card()));
        assert_eq!(ctl.state(), InteractionState::Idle);
    }

    #[test]
    fn test_drag_moves_card_with_easing() {
        let mut ctl = InteractionController::default();
        let mut card = card();

        assert!(ctl.pointer_pressed(Some(&ray_at(0.7, 0.1)), &card));
        let offset = ctl.drag_offset();
        assert!((offset - Vec3::new(0.1, 0.1, 0.02)).length() < 1e-4);

        ctl.pointer_moved(Some(&ray_at(1.7, 0.1)), &mut card);
        let target = ctl.drag_target().unwrap();
        assert!((target - (Vec3::new(1.7, 0.1, 0.0) - offset)).length() < 1e-4);
        // Eased 35% of the way from 0.6 toward 1.6.
        assert!((card.position.x - 0.95).abs() < 1e-4);
        assert_eq!(ctl.drag_offset(), offset);
    }

    #[test]
    fn test_drag_moves_sink_card_along_z() {
        let mut ctl = InteractionController::default();
        let mut card = card();
        assert!(ctl.pointer_pressed(Some(&ray_at(0.6, 0.0)), &card));
        let offset = ctl.drag_offset();
        assert!((offset.z - 0.02).abs() < 1e-4);

        for _ in 0..10 {
            ctl.pointer_moved(Some(&ray_at(0.6, 0.0)), &mut card);
        }
        // Every move eases 35% of the offset depth backwards.
        assert!((card.position.z - (-10.0 * 0.35 * offset.z)).abs() < 1e-4);
        assert!((card.position.x - 0.6).abs() < 1e-4);
        assert!(card.position.y.abs() < 1e-4);
    }

    #[test]
    fn test_release_keeps_offset() {
        let mut ctl = InteractionController::default();
        let card = card();
        ctl.pointer_pressed(Some(&ray_at(0.6, 0.1)), &card);
        let offset = ctl.drag_offset();
        ctl.pointer_released();
        assert_eq!(ctl.state(), InteractionState::Idle);
        assert_eq!(ctl.drag_offset(), offset);
        assert_eq!(ctl.cursor(), CursorHint::Default);
    }

    #[test]
    fn test_drag_suppresses_hover() {
        let mut ctl = InteractionController::default();
        let mut card = card();
        ctl.pointer_moved(Some(&ray_at(0.6, 0.1)), &mut card);
        ctl.pointer_pressed(Some(&ray_at(0.6, 0.1)), &card);
        // Far away from the card: still dragging, glass unchanged.
        ctl.pointer_moved(Some(&ray_at(5.0, 5.0)), &mut card);
        assert_eq!(ctl.state(), InteractionState::Dragging);
        assert!(ctl.is_glass());
    }

    #[test]
    fn test_release_without_drag_is_noop() {
        let mut ctl = InteractionController::default();
        let mut card = card();
        ctl.pointer_moved(Some(&ray_at(0.6, 0.1)), &mut card);
        ctl.pointer_released();
        assert_eq!(ctl.state(), InteractionState::Hovering);
    }
}
