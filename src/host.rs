//! SDL2 game-loop host.
//!
//! [`run_game`] owns the window and the timing loop. Each tick it asks the
//! game for its logical screen size, calls `update` then `draw`, uploads
//! the screen surface to a streaming texture and stretches it over the
//! window. The loop ends when the window is closed or Escape is pressed.

use std::time::Duration;

use sdl2::event::Event;
use sdl2::keyboard::Keycode;
use sdl2::pixels::PixelFormatEnum;
use sdl2::render::Texture;

use crate::colors::Color;
use crate::config::ViewerConfig;
use crate::error::HostError;
use crate::game::Game;
use crate::surface::Surface;

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub title: String,
    pub window_width: u32,
    pub window_height: u32,
    pub ticks_per_second: u32,
}

impl From<&ViewerConfig> for RunOptions {
    fn from(config: &ViewerConfig) -> Self {
        Self {
            title: config.window_title.clone(),
            window_width: config.window_width,
            window_height: config.window_height,
            ticks_per_second: config.ticks_per_second,
        }
    }
}

/// Keeps the loop at a fixed tick rate.
///
/// Works on millisecond timestamps so it can be driven by SDL's timer or
/// by a test.
pub struct FrameLimiter {
    previous_frame_time: u64,
    frame_target_time: u64,
}

impl FrameLimiter {
    pub fn new(now: u64, ticks_per_second: u32) -> Self {
        Self {
            previous_frame_time: now,
            frame_target_time: 1000 / u64::from(ticks_per_second.max(1)),
        }
    }

    /// How long to sleep before the next tick is due, if at all.
    pub fn remaining(&self, now: u64) -> Option<Duration> {
        let elapsed = now.saturating_sub(self.previous_frame_time);
        (elapsed < self.frame_target_time)
            .then(|| Duration::from_millis(self.frame_target_time - elapsed))
    }

    /// Start a new tick at `now`, returning the milliseconds since the last.
    pub fn mark(&mut self, now: u64) -> u64 {
        let delta = now.saturating_sub(self.previous_frame_time);
        self.previous_frame_time = now;
        delta
    }

    /// Waits if necessary to maintain the tick rate and returns the delta
    /// time in milliseconds.
    pub fn wait_and_get_delta(&mut self, timer: &sdl2::TimerSubsystem) -> u64 {
        if let Some(wait) = self.remaining(timer.ticks64()) {
            std::thread::sleep(wait);
        }
        self.mark(timer.ticks64())
    }
}

/// Run `game` until the window is closed.
///
/// Blocks the calling thread. Only SDL failures are reported as errors.
pub fn run_game<G: Game>(game: &mut G, options: &RunOptions) -> Result<(), HostError> {
    let sdl_context = sdl2::init().map_err(HostError::Init)?;
    let video_subsystem = sdl_context.video().map_err(HostError::Init)?;
    let timer_subsystem = sdl_context.timer().map_err(HostError::Init)?;

    let window = video_subsystem
        .window(&options.title, options.window_width, options.window_height)
        .position_centered()
        .resizable()
        .build()
        .map_err(|e| HostError::Window(e.to_string()))?;

    let mut canvas = window
        .into_canvas()
        .build()
        .map_err(|e| HostError::Window(e.to_string()))?;
    let texture_creator = canvas.texture_creator();
    let mut event_pump = sdl_context.event_pump().map_err(HostError::Init)?;

    // Recreated whenever the game's logical size changes
    let mut screen: Option<(Surface, Texture)> = None;
    let mut limiter = FrameLimiter::new(timer_subsystem.ticks64(), options.ticks_per_second);

    log::info!(
        "starting game loop: {:?} {}x{} at {} TPS",
        options.title,
        options.window_width,
        options.window_height,
        options.ticks_per_second
    );

    'running: loop {
        for event in event_pump.poll_iter() {
            match event {
                Event::Quit { .. }
                | Event::KeyDown {
                    keycode: Some(Keycode::Escape),
                    ..
                } => break 'running,
                _ => {}
            }
        }

        let (outside_width, outside_height) = canvas.output_size().map_err(HostError::Present)?;
        let (width, height) = game.layout(outside_width, outside_height);
        let (width, height) = (width.max(1), height.max(1));

        let resized = screen
            .as_ref()
            .is_none_or(|(surface, _)| (surface.width(), surface.height()) != (width, height));
        if resized {
            log::debug!("logical screen is {width}x{height}");
            let texture = texture_creator
                .create_texture_streaming(PixelFormatEnum::ARGB8888, width, height)
                .map_err(|e| HostError::Texture(e.to_string()))?;
            screen = Some((Surface::new(width, height), texture));
        }
        let Some((surface, texture)) = screen.as_mut() else {
            continue;
        };

        game.update();
        surface.fill(Color::TRANSPARENT);
        game.draw(surface);

        texture
            .update(None, surface.as_bytes(), (width * 4) as usize)
            .map_err(|e| HostError::Texture(e.to_string()))?;

        canvas.set_draw_color(sdl2::pixels::Color::RGB(0, 0, 0));
        canvas.clear();
        canvas
            .copy(texture, None, None)
            .map_err(HostError::Present)?;
        canvas.present();

        let delta = limiter.wait_and_get_delta(&timer_subsystem);
        log::trace!("tick took {delta} ms");
    }

    log::info!("window closed, leaving game loop");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limiter_waits_out_the_rest_of_the_tick() {
        let limiter = FrameLimiter::new(1000, 50); // 20 ms ticks
        assert_eq!(limiter.remaining(1005), Some(Duration::from_millis(15)));
        assert_eq!(limiter.remaining(1020), None);
        assert_eq!(limiter.remaining(1100), None);
    }

    #[test]
    fn limiter_reports_delta_between_ticks() {
        let mut limiter = FrameLimiter::new(0, 60);
        assert_eq!(limiter.mark(16), 16);
        assert_eq!(limiter.mark(40), 24);
    }

    #[test]
    fn zero_tick_rate_does_not_divide_by_zero() {
        let limiter = FrameLimiter::new(0, 0);
        assert_eq!(limiter.remaining(0), Some(Duration::from_millis(1000)));
    }
}
