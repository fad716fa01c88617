use crate::constants::*;
use glam::{Mat4, Vec2};

/// Fixed orthographic view centered on the origin.
///
/// The grid scrolls underneath it, so the camera itself never moves; it only
/// maps between window pixels and world units.
pub struct Camera {
    /// Physical pixels
    pub viewport_width: f32,
    pub viewport_height: f32,
    /// World units spanned by the viewport's height
    pub world_height: f32,
    /// Window scale factor as reported by the platform
    pub scale_factor: f32,
}

impl Camera {
    pub fn new(viewport_width: f32, viewport_height: f32, world_height: f32) -> Self {
        Self {
            viewport_width: viewport_width.max(1.0),
            viewport_height: viewport_height.max(1.0),
            world_height,
            scale_factor: 1.0,
        }
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        // Minimized windows report zero; keep the last usable size
        if width >= 1.0 && height >= 1.0 {
            self.viewport_width = width;
            self.viewport_height = height;
        }
    }

    pub fn set_scale_factor(&mut self, scale_factor: f32) {
        if scale_factor.is_finite() && scale_factor > 0.0 {
            self.scale_factor = scale_factor;
        }
    }

    /// Device pixel ratio used for shading, clamped to keep fill cost bounded
    pub fn pixel_ratio(&self) -> f32 {
        self.scale_factor
            .clamp(VIEW_MIN_PIXEL_RATIO, VIEW_MAX_PIXEL_RATIO)
    }

    /// Physical pixels per world unit
    pub fn pixels_per_unit(&self) -> f32 {
        self.viewport_height / self.world_height
    }

    /// Shading pixels per world unit: logical pixels times the clamped ratio
    pub fn shading_pixels_per_unit(&self) -> f32 {
        self.pixels_per_unit() / self.scale_factor * self.pixel_ratio()
    }

    pub fn half_extents(&self) -> Vec2 {
        let half_height = self.world_height / 2.0;
        Vec2::new(half_height * self.aspect(), half_height)
    }

    pub fn aspect(&self) -> f32 {
        self.viewport_width / self.viewport_height
    }

    pub fn screen_to_world(&self, screen_x: f32, screen_y: f32) -> Vec2 {
        let ndc_x = (screen_x / self.viewport_width) * 2.0 - 1.0;
        let ndc_y = 1.0 - (screen_y / self.viewport_height) * 2.0;
        let half = self.half_extents();
        Vec2::new(ndc_x * half.x, ndc_y * half.y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        let half = self.half_extents();
        Mat4::orthographic_rh(-half.x, half.x, -half.y, half.y, -1.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_screen_center_is_origin() {
        let camera = Camera::new(800.0, 600.0, 3.0);
        assert!(camera.screen_to_world(400.0, 300.0).length() < 1e-6);
    }

    #[test]
    fn test_screen_corners() {
        let camera = Camera::new(800.0, 600.0, 3.0);
        let top_left = camera.screen_to_world(0.0, 0.0);
        assert!((top_left.x + 2.0).abs() < 1e-6);
        assert!((top_left.y - 1.5).abs() < 1e-6);
        let bottom_right = camera.screen_to_world(800.0, 600.0);
        assert!((bottom_right.x - 2.0).abs() < 1e-6);
        assert!((bottom_right.y + 1.5).abs() < 1e-6);
    }

    #[test]
    fn test_projection_maps_view_edge_to_ndc() {
        let camera = Camera::new(800.0, 600.0, 3.0);
        let edge = camera.projection_matrix() * glam::Vec4::new(2.0, 1.5, 0.0, 1.0);
        assert!((edge.x - 1.0).abs() < 1e-6);
        assert!((edge.y - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_pixel_ratio_is_clamped() {
        let mut camera = Camera::new(800.0, 600.0, 3.0);
        camera.set_scale_factor(3.0);
        assert_eq!(camera.pixel_ratio(), 1.5);
        camera.set_scale_factor(0.5);
        assert_eq!(camera.pixel_ratio(), 1.0);
        camera.set_scale_factor(1.25);
        assert_eq!(camera.pixel_ratio(), 1.25);
    }

    #[test]
    fn test_shading_pixels_follow_clamped_ratio() {
        let mut camera = Camera::new(1200.0, 1200.0, 3.0);
        camera.set_scale_factor(3.0);
        // 400 logical pixels tall, shaded at ratio 1.5
        assert!((camera.shading_pixels_per_unit() - 200.0).abs() < 1e-3);
    }

    #[test]
    fn test_resize_ignores_zero_size() {
        let mut camera = Camera::new(800.0, 600.0, 3.0);
        camera.resize(0.0, 0.0);
        assert_eq!(camera.viewport_width, 800.0);
        camera.resize(1024.0, 768.0);
        assert_eq!(camera.viewport_height, 768.0);
    }
}
