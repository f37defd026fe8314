//! Viewer configuration.
//!
//! There are no config files; [`ViewerConfig::default`] carries the values
//! the viewer ships with and callers override fields directly.

use std::path::PathBuf;

use crate::colors::Color;
use crate::math::vec3::Vec3;

pub const SCREEN_WIDTH: u32 = 640;
pub const SCREEN_HEIGHT: u32 = 480;
pub const TICKS_PER_SECOND: u32 = 60;

#[derive(Debug, Clone)]
pub struct ViewerConfig {
    pub mesh_path: PathBuf,

    /// Logical screen size reported by `Game::layout`.
    pub screen_width: u32,
    pub screen_height: u32,
    /// Window size in physical pixels; the screen is stretched to fit.
    pub window_width: u32,
    pub window_height: u32,
    pub window_title: String,
    pub ticks_per_second: u32,

    /// Region of the rendered frame that is blitted to the screen.
    pub frame_x: i32,
    pub frame_y: i32,
    pub frame_width: u32,
    pub frame_height: u32,

    /// Size of the resampled frame.
    pub output_width: u32,
    pub output_height: u32,
    /// Supersampling factor: the offscreen buffer is `output * supersample`.
    pub supersample: u32,

    pub fovy_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub eye: Vec3,
    pub center: Vec3,
    pub up: Vec3,
    /// Direction towards the light; normalized on use.
    pub light: Vec3,
    pub object_color: Color,
    pub background: Color,
    /// Normals further apart than this stay unsmoothed.
    pub smoothing_angle_degrees: f32,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            mesh_path: PathBuf::from("test.stl"),
            screen_width: SCREEN_WIDTH,
            screen_height: SCREEN_HEIGHT,
            window_width: SCREEN_WIDTH * 2,
            window_height: SCREEN_HEIGHT * 2,
            window_title: "Phong View".to_string(),
            ticks_per_second: TICKS_PER_SECOND,
            frame_x: 0,
            frame_y: 0,
            frame_width: 640,
            frame_height: 480,
            output_width: 640,
            output_height: 480,
            supersample: 1,
            fovy_degrees: 30.0,
            near: 1.0,
            far: 10.0,
            eye: Vec3::new(-3.0, 1.0, -0.75),
            center: Vec3::new(0.0, -0.07, 0.0),
            up: Vec3::UP,
            light: Vec3::new(-0.75, 1.0, 0.25),
            object_color: Color::from_rgb8(0xFF, 0x00, 0x00),
            background: Color::from_rgb8(0x33, 0x4F, 0xFF),
            smoothing_angle_degrees: 30.0,
        }
    }
}

impl ViewerConfig {
    /// Size of the offscreen render buffer.
    pub fn render_size(&self) -> (u32, u32) {
        let scale = self.supersample.max(1);
        (self.output_width * scale, self.output_height * scale)
    }

    /// Aspect ratio used for the projection.
    pub fn aspect_ratio(&self) -> f32 {
        self.output_width as f32 / self.output_height as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_render_at_output_size() {
        let config = ViewerConfig::default();
        assert_eq!(config.render_size(), (640, 480));
        assert_eq!(config.background.to_rgba8(), [0x33, 0x4F, 0xFF, 0xFF]);
    }

    #[test]
    fn supersample_scales_render_buffer() {
        let config = ViewerConfig {
            supersample: 4,
            ..ViewerConfig::default()
        };
        assert_eq!(config.render_size(), (2560, 1920));
        assert_eq!(config.aspect_ratio(), 640.0 / 480.0);
    }
}
