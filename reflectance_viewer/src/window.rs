use std::time::Instant;

use anyhow::{anyhow, Context, Result};
use log::{debug, info};
use rasterizer::Rasterizer;
use reflectance_viewer::{render_frame, Scene, ViewerConfig};
use sdl2::event::Event;
use sdl2::keyboard::Keycode;
use sdl2::rect::Rect;
use sdl2::{pixels::PixelFormatEnum, render::TextureAccess};

/// Interactive loop: `Tab` switches the reflectance model, `Esc` quits.
pub fn run(config: &ViewerConfig, scene: &mut Scene) -> Result<()> {
    let (width, height) = (config.render.width, config.render.height);

    let sdl_context = sdl2::init().map_err(|e| anyhow!(e))?;
    let video_subsystem = sdl_context.video().map_err(|e| anyhow!(e))?;
    let window = video_subsystem
        .window("Reflectance viewer", width, height)
        .position_centered()
        .build()
        .context("failed to create window")?;

    let mut canvas = window
        .into_canvas()
        .build()
        .context("failed to create canvas")?;
    let fullscreen_rect = Rect::new(0, 0, width, height);
    let texture_creator = canvas.texture_creator();
    let mut display_texture = texture_creator
        .create_texture(
            PixelFormatEnum::RGBA32,
            TextureAccess::Streaming,
            width,
            height,
        )
        .context("failed to create texture")?;

    let mut rasterizer = Rasterizer::new(width, height);
    let mut model = config.render.model;
    let mut event_pump = sdl_context.event_pump().map_err(|e| anyhow!(e))?;
    let start = Instant::now();
    let mut timer = Instant::now();
    info!("window open, {}", model);
    'running: loop {
        let delta = timer.elapsed().as_secs_f32();
        timer = Instant::now();
        canvas
            .window_mut()
            .set_title(&format!("{} | FPS : {:.02}", model, 1.0 / delta))
            .context("failed to set window title")?;

        for event in event_pump.poll_iter() {
            match event {
                Event::Quit { .. }
                | Event::KeyDown {
                    keycode: Some(Keycode::Escape),
                    ..
                } => break 'running,
                Event::KeyDown {
                    keycode: Some(Keycode::Tab),
                    repeat: false,
                    ..
                } => {
                    model = model.toggle();
                    info!("switched to {}", model);
                }
                _ => {}
            }
        }

        let time = config.render.start_time + start.elapsed().as_secs_f32();
        render_frame(&mut rasterizer, scene, model, time);

        let pixels = rasterizer.framebuffer().to_rgba8();
        display_texture
            .update(fullscreen_rect, &pixels, (4 * width) as usize)
            .context("failed to upload frame")?;
        canvas
            .copy(&display_texture, fullscreen_rect, fullscreen_rect)
            .map_err(|e| anyhow!(e))?;
        canvas.present();
        debug!("{}", rasterizer.frametime());
    }
    Ok(())
}
