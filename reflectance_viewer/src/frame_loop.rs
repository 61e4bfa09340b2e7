//! Per-frame driving of the scene: a fixed rate clock for headless runs, the
//! update and draw submission of a single frame, and a background writer that
//! turns finished frames into PNG files.

use std::{
    fs, io,
    path::{Path, PathBuf},
    thread::{self, JoinHandle},
};

use crossbeam::channel::{self, Sender};
use log::{debug, info};
use rasterizer::{Framebuffer, Rasterizer};
use shading::ReflectanceModel;
use thiserror::Error;

use crate::{
    scene::Scene,
    shaders::{ObjectUniform, ReflectanceFragmentShader, SurfaceVertexShader},
};

/// Yields `(index, seconds)` for `frames` frames spaced `1 / fps` apart.
#[derive(Debug, Clone)]
pub struct FrameClock {
    fps: f32,
    start_time: f32,
    frames: u32,
    next: u32,
}

impl FrameClock {
    pub fn new(fps: f32, start_time: f32, frames: u32) -> Self {
        debug_assert!(fps > 0.0);
        Self {
            fps,
            start_time,
            frames,
            next: 0,
        }
    }

    pub fn time_of(&self, index: u32) -> f32 {
        self.start_time + index as f32 / self.fps
    }
}

impl Iterator for FrameClock {
    type Item = (u32, f32);

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.frames {
            return None;
        }
        let index = self.next;
        self.next += 1;
        Some((index, self.time_of(index)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.frames - self.next) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for FrameClock {}

/// Updates every transform for `time` and draws the whole scene into a
/// cleared framebuffer.
pub fn render_frame(
    rasterizer: &mut Rasterizer,
    scene: &mut Scene,
    model: ReflectanceModel,
    time: f32,
) {
    let frame = scene.update(time);
    let eye = frame.eye();

    rasterizer.clear();
    for object in &scene.objects {
        let uniform = ObjectUniform {
            transforms: object.transforms,
            eye,
            material: object.material.clone(),
            lights: scene.lights.clone(),
            model,
        };
        rasterizer.render_mesh(
            &object.mesh.vertices,
            &object.mesh.indices,
            &SurfaceVertexShader,
            &ReflectanceFragmentShader,
            &uniform,
        );
    }
    debug!("{} at {:.3}s: {}", model, time, rasterizer.frametime());
}

#[derive(Debug, Error)]
pub enum FrameLoopError {
    #[error("failed to create output directory {path}")]
    OutputDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write {path}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("frame writer stopped unexpectedly")]
    WriterStopped,
}

pub fn frame_path(directory: &Path, index: u32) -> PathBuf {
    directory.join(format!("frame_{:04}.png", index))
}

struct FinishedFrame {
    index: u32,
    width: u32,
    height: u32,
    rgba: Vec<u8>,
}

/// Writes frames on a separate thread so encoding overlaps with rendering.
pub struct FrameWriter {
    sender: Sender<FinishedFrame>,
    handle: JoinHandle<Result<usize, FrameLoopError>>,
}

impl FrameWriter {
    const QUEUE_SIZE: usize = 4;

    pub fn spawn(directory: &Path) -> Result<Self, FrameLoopError> {
        fs::create_dir_all(directory).map_err(|source| FrameLoopError::OutputDir {
            path: directory.to_path_buf(),
            source,
        })?;

        let (sender, receiver) = channel::bounded::<FinishedFrame>(Self::QUEUE_SIZE);
        let directory = directory.to_path_buf();
        let handle = thread::spawn(move || -> Result<usize, FrameLoopError> {
            let mut written = 0;
            for frame in receiver {
                let path = frame_path(&directory, frame.index);
                image::save_buffer(
                    &path,
                    &frame.rgba,
                    frame.width,
                    frame.height,
                    image::ColorType::Rgba8,
                )
                .map_err(|source| FrameLoopError::Image {
                    path: path.clone(),
                    source,
                })?;
                info!("wrote {}", path.display());
                written += 1;
            }
            Ok(written)
        });

        Ok(Self { sender, handle })
    }

    pub fn submit(&self, index: u32, framebuffer: &Framebuffer) -> Result<(), FrameLoopError> {
        let frame = FinishedFrame {
            index,
            width: framebuffer.width(),
            height: framebuffer.height(),
            rgba: framebuffer.to_rgba8(),
        };
        self.sender
            .send(frame)
            .map_err(|_| FrameLoopError::WriterStopped)
    }

    /// Waits for every queued frame, returns how many were written.
    pub fn finish(self) -> Result<usize, FrameLoopError> {
        let Self { sender, handle } = self;
        drop(sender);
        handle.join().map_err(|_| FrameLoopError::WriterStopped)?
    }
}

/// Renders every frame of `clock` into `output`.
pub fn render_sequence(
    rasterizer: &mut Rasterizer,
    scene: &mut Scene,
    model: ReflectanceModel,
    clock: FrameClock,
    output: &Path,
) -> Result<usize, FrameLoopError> {
    let writer = FrameWriter::spawn(output)?;
    for (index, time) in clock {
        render_frame(rasterizer, scene, model, time);
        if writer.submit(index, rasterizer.framebuffer()).is_err() {
            // the writer failed, its error comes out of finish
            break;
        }
    }
    writer.finish()
}
