//! Per-frame orchestration of the band, the card and pointer input.
//!
//! [`FrameDriver`] owns the whole simulated scene. Pointer events are
//! applied as they arrive; everything else happens in [`FrameDriver::tick`],
//! which always runs the same sequence:
//!
//! 1. cap the frame time
//! 2. gravity and Verlet integration
//! 3. pin the top of the band to its anchor
//! 4. pin the bottom of the band to the card
//! 5. relax segment lengths
//! 6. rebuild the band mesh
//! 7. tilt the card along the last band segment
//! 8. push card transform, band material and cursor to the sink
//! 9. present

use glam::{Vec2, Vec3};

use crate::assets::SceneAssets;
use crate::camera::Camera;
use crate::card::Card;
use crate::config::LanyardConfig;
use crate::input::{PointerEvent, PointerKind};
use crate::interaction::InteractionController;
use crate::render::RenderSink;
use crate::rope::Rope;
use crate::time::clamp_delta;
use crate::tube::{build_band_mesh, TubeParams};

/// Owns the rope, card, camera and interaction state and advances them.
#[derive(Debug, Clone)]
pub struct FrameDriver {
    config: LanyardConfig,
    rope: Rope,
    card: Card,
    interaction: InteractionController,
    camera: Camera,
    viewport: (u32, u32),
    tube: TubeParams,
    lanyard_available: bool,
    frames: u64,
}

impl FrameDriver {
    /// Build the scene around an already placed card.
    ///
    /// The band starts as a straight line from the anchor to
    /// `config.rope.initial_end` with both ends pinned.
    pub fn new(config: LanyardConfig, card: Card, lanyard_available: bool, viewport: (u32, u32)) -> Self {
        let rope_cfg = &config.rope;
        let mut rope = Rope::new(rope_cfg.anchor, rope_cfg.initial_end, rope_cfg.particle_count.max(2))
            .with_damping(rope_cfg.damping)
            .with_relaxation_iterations(rope_cfg.relaxation_iterations);
        let last = rope.last_index();
        rope.pin(0, rope_cfg.anchor);
        rope.pin(last, card.attach_point(config.card.attach_offset));

        let interaction = InteractionController::new(
            config.interaction.drag_blend,
            config.band.base_material,
            config.band.glass_material,
        );
        let (w, h) = viewport;
        let aspect = if w > 0 && h > 0 { w as f32 / h as f32 } else { 1.0 };
        let camera = Camera::new(&config.camera, aspect);
        let tube = TubeParams::for_particle_count(rope.len(), &config.band);

        log::info!(
            "Lanyard with {} particles, rest length {:.4}",
            rope.len(),
            rope.rest_segment_length()
        );

        Self {
            config,
            rope,
            card,
            interaction,
            camera,
            viewport,
            tube,
            lanyard_available,
            frames: 0,
        }
    }

    /// Build the scene from loaded assets.
    pub fn from_assets(config: LanyardConfig, assets: &SceneAssets, viewport: (u32, u32)) -> Self {
        Self::new(config, assets.card.clone(), assets.has_band_texture(), viewport)
    }

    /// Advance one frame by `elapsed` seconds and render it into `sink`.
    pub fn tick<S: RenderSink>(&mut self, elapsed: f32, sink: &mut S) -> Result<(), S::Error> {
        let dt = clamp_delta(elapsed, self.config.rope.max_frame_delta);

        self.rope.step(dt, self.config.rope.gravity);
        let last = self.rope.last_index();
        self.rope.pin(0, self.config.rope.anchor);
        self.rope.pin(last, self.attach_point());
        self.rope.relax();

        let mesh = build_band_mesh(&self.rope.positions(), &self.tube);
        sink.replace_band_mesh(&mesh);

        self.update_tilt();

        sink.set_card_transform(self.card.transform());
        sink.set_band_material(&self.interaction.band_material().resolved(self.lanyard_available));
        sink.set_cursor(self.interaction.cursor());

        self.frames += 1;
        sink.present()
    }

    /// Ease the card's yaw toward the direction of the last band segment.
    fn update_tilt(&mut self) {
        let dir = self.rope.last_segment_direction();
        if dir == Vec3::ZERO {
            return;
        }
        let target = dir.x.atan2(dir.y) * self.config.interaction.tilt_factor;
        let blend = self.config.interaction.tilt_blend;
        self.card.rotation_y += (target - self.card.rotation_y) * blend;
    }

    /// Route a pointer event to the interaction controller.
    pub fn handle_pointer(&mut self, event: PointerEvent) {
        let ray = self.camera.ray_from_pixel(event.position, self.viewport);
        match event.kind {
            PointerKind::Press => {
                self.interaction.pointer_pressed(ray.as_ref(), &self.card);
            }
            PointerKind::Move => self.interaction.pointer_moved(ray.as_ref(), &mut self.card),
            PointerKind::Release => self.interaction.pointer_released(),
        }
    }

    /// Track a new surface size. A zero size disables hit-testing until the
    /// next non-zero resize.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.viewport = (width, height);
        self.camera.set_viewport(width, height);
    }

    /// Where the bottom of the band is pinned this frame.
    pub fn attach_point(&self) -> Vec3 {
        self.card.attach_point(self.config.card.attach_offset)
    }

    /// Pixel position of a world point, for mapping scene positions back to
    /// pointer coordinates.
    pub fn project_to_pixel(&self, world: Vec3) -> Vec2 {
        let ndc = self.camera.view_proj().project_point3(world);
        let (w, h) = (self.viewport.0 as f32, self.viewport.1 as f32);
        Vec2::new((ndc.x + 1.0) * 0.5 * w, (1.0 - ndc.y) * 0.5 * h)
    }

    pub fn rope(&self) -> &Rope {
        &self.rope
    }

    pub fn card(&self) -> &Card {
        &self.card
    }

    pub fn interaction(&self) -> &InteractionController {
        &self.interaction
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn config(&self) -> &LanyardConfig {
        &self.config
    }

    pub fn viewport(&self) -> (u32, u32) {
        self.viewport
    }

    pub fn tube_params(&self) -> &TubeParams {
        &self.tube
    }

    /// Frames ticked so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }
}
