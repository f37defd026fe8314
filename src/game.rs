//! The per-tick callbacks the host drives, and the mesh viewer that
//! implements them.

use crate::config::ViewerConfig;
use crate::jitter::EyeJitter;
use crate::math::vec3::Vec3;
use crate::render::{PhongShader, RenderContext};
use crate::resample::resample;
use crate::scene::Scene;
use crate::surface::{DrawOptions, Rect, Surface};

/// What the game-loop host needs from a game.
///
/// Every tick the host calls `update` once and then `draw` once, strictly
/// in that order and never concurrently.
pub trait Game {
    /// Advance the game state by one tick.
    fn update(&mut self);

    /// Render the current state onto `screen`, which has the logical size
    /// last returned by `layout`.
    fn draw(&mut self, screen: &mut Surface);

    /// Logical screen size for a window whose drawable area is
    /// `outside_width` x `outside_height`. The host scales the logical
    /// screen to fill the window.
    fn layout(&self, outside_width: u32, outside_height: u32) -> (u32, u32);
}

/// Renders a Phong-shaded mesh offscreen each frame and shows it.
pub struct Viewer<J> {
    scene: Scene,
    context: RenderContext,
    config: ViewerConfig,
    jitter: J,
    /// Ticks seen so far. Nothing reads it yet.
    count: u64,
}

impl<J: EyeJitter> Viewer<J> {
    pub fn new(scene: Scene, config: ViewerConfig, jitter: J) -> Self {
        let (width, height) = config.render_size();
        Self {
            scene,
            context: RenderContext::new(width, height),
            config,
            jitter,
            count: 0,
        }
    }

    pub fn frame_count(&self) -> u64 {
        self.count
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Render the scene from a freshly jittered eye and return the
    /// resampled frame, ready for blitting.
    pub fn render_frame(&mut self) -> Surface {
        let eye = self.scene.eye;
        self.scene.eye = Vec3::new(eye.x, eye.y, self.jitter.eye_z());

        self.context.clear_color_buffer_with(self.config.background);
        self.context.clear_depth_buffer();

        let matrix = self.scene.view_projection(self.config.aspect_ratio());
        let mut shader = PhongShader::new(matrix, self.scene.light, self.scene.eye);
        shader.object_color = self.scene.color;
        self.context.set_shader(Box::new(shader));

        let stats = self.context.draw_mesh(&self.scene.mesh);
        log::trace!("frame {}: eye {:?}, {stats:?}", self.count, self.scene.eye);

        let resampled = resample(
            self.context.image(),
            self.config.output_width,
            self.config.output_height,
        );
        Surface::from_rgba(&resampled)
    }
}

impl<J: EyeJitter> Game for Viewer<J> {
    fn update(&mut self) {
        self.count += 1;
    }

    fn draw(&mut self, screen: &mut Surface) {
        let frame = self.render_frame();
        let region = Rect::new(
            self.config.frame_x,
            self.config.frame_y,
            self.config.frame_width,
            self.config.frame_height,
        );
        screen.draw_image(&frame.sub_image(region), &DrawOptions::default());
    }

    fn layout(&self, _outside_width: u32, _outside_height: u32) -> (u32, u32) {
        (self.config.screen_width, self.config.screen_height)
    }
}
