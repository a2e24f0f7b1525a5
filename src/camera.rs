//! Perspective camera and pointer unprojection.

use glam::{Mat4, Vec2, Vec3};

use crate::config::CameraConfig;

/// Guard for rays parallel to a plane.
const MIN_RAY_DIR: f32 = 1e-6;

/// A half-line in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    /// Unit direction.
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    /// Point at distance `t` along the ray.
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Where the ray's line crosses the plane `z = plane_z`.
    ///
    /// A ray parallel to the plane uses a tiny stand-in for its z direction
    /// rather than failing, which throws the point far away.
    pub fn point_on_z_plane(&self, plane_z: f32) -> Vec3 {
        let dz = if self.direction.z == 0.0 {
            MIN_RAY_DIR
        } else {
            self.direction.z
        };
        self.at((plane_z - self.origin.z) / dz)
    }
}

/// Fixed perspective camera looking at a target point.
#[derive(Debug, Clone)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    /// Vertical field of view in radians.
    pub fov_y: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    pub fn new(config: &CameraConfig, aspect: f32) -> Self {
        Self {
            eye: config.eye,
            target: config.target,
            fov_y: config.fov_degrees.to_radians(),
            aspect,
            near: config.near,
            far: config.far,
        }
    }

    /// Update the aspect ratio after a viewport resize.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect, self.near, self.far)
    }

    pub fn view_proj(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// World-space ray through normalised device coordinates.
    pub fn ray_from_ndc(&self, ndc: Vec2) -> Ray {
        let inv = self.view_proj().inverse();
        let far = inv.project_point3(Vec3::new(ndc.x, ndc.y, 1.0));
        Ray::new(self.eye, far - self.eye)
    }

    /// World-space ray through a pixel of a `viewport`-sized surface.
    ///
    /// Returns `None` for pixels outside the viewport or an empty viewport.
    pub fn ray_from_pixel(&self, pixel: Vec2, viewport: (u32, u32)) -> Option<Ray> {
        pixel_to_ndc(pixel, viewport).map(|ndc| self.ray_from_ndc(ndc))
    }
}

/// Convert a pixel position (origin top-left, y down) to NDC (y up).
pub fn pixel_to_ndc(pixel: Vec2, viewport: (u32, u32)) -> Option<Vec2> {
    let (w, h) = viewport;
    if w == 0 || h == 0 || !pixel.is_finite() {
        return None;
    }
    let (w, h) = (w as f32, h as f32);
    if pixel.x < 0.0 || pixel.y < 0.0 || pixel.x > w || pixel.y > h {
        return None;
    }
    Some(Vec2::new(pixel.x / w * 2.0 - 1.0, 1.0 - pixel.y / h * 2.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> Camera {
        Camera::new(&CameraConfig::default(), 16.0 / 9.0)
    }

    #[test]
    fn test_center_ray_hits_target() {
        let cam = camera();
        let ray = cam.ray_from_ndc(Vec2::ZERO);
        let to_target = (cam.target - cam.eye).normalize();
        assert!((ray.direction - to_target).length() < 1e-4);
    }

    #[test]
    fn test_pixel_to_ndc() {
        assert_eq!(pixel_to_ndc(Vec2::new(400.0, 300.0), (800, 600)), Some(Vec2::ZERO));
        assert_eq!(pixel_to_ndc(Vec2::new(0.0, 0.0), (800, 600)), Some(Vec2::new(-1.0, 1.0)));
        assert_eq!(pixel_to_ndc(Vec2::new(-1.0, 10.0), (800, 600)), None);
        assert_eq!(pixel_to_ndc(Vec2::new(10.0, 10.0), (0, 600)), None);
        assert_eq!(pixel_to_ndc(Vec2::new(f32::NAN, 10.0), (800, 600)), None);
    }

    #[test]
    fn test_ray_projects_back_to_same_ndc() {
        let cam = camera();
        let ndc = Vec2::new(0.3, -0.4);
        let ray = cam.ray_from_ndc(ndc);
        let p = cam.view_proj().project_point3(ray.at(4.0));
        assert!((p.x - ndc.x).abs() < 1e-3);
        assert!((p.y - ndc.y).abs() < 1e-3);
    }

    #[test]
    fn test_point_on_z_plane() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 1.0, -1.0));
        let p = ray.point_on_z_plane(0.0);
        assert!((p - Vec3::new(0.0, 5.0, 0.0)).length() < 1e-4);
    }

    #[test]
    fn test_parallel_ray_stays_finite() {
        let ray = Ray::new(Vec3::ZERO, Vec3::X);
        assert!(ray.point_on_z_plane(1.0).is_finite());
    }
}
