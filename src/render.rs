//! The boundary between the scene and whatever draws it.

use glam::Mat4;

use crate::interaction::CursorHint;
use crate::material::BandMaterial;
use crate::tube::TubeMesh;

/// Receives per-frame render state from the [`FrameDriver`](crate::frame::FrameDriver).
///
/// Calls arrive in a fixed order each tick: band mesh, card transform,
/// band material, cursor, then [`present`](Self::present). Implementors
/// only store what they are given; nothing is read back.
pub trait RenderSink {
    type Error;

    /// Replace the whole band surface. The previous mesh is discarded.
    fn replace_band_mesh(&mut self, mesh: &TubeMesh);

    fn set_card_transform(&mut self, transform: Mat4);

    fn set_band_material(&mut self, material: &BandMaterial);

    fn set_cursor(&mut self, cursor: CursorHint);

    /// Draw the frame.
    fn present(&mut self) -> Result<(), Self::Error>;
}
