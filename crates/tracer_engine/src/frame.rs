//! Caller-owned render targets.

use tracer_core::Buffer;
use tracer_math::Vec3;

/// The output image plus the per-pixel history buffer at the same resolution.
///
/// The history buffer is reset with every [`clear`](FrameBuffers::clear) and
/// nothing accumulates into it yet.
#[derive(Debug, Clone)]
pub struct FrameBuffers<RT> {
    output: Buffer<RT>,
    history: Buffer<Vec3>,
}

impl<RT: Clone + Default> FrameBuffers<RT> {
    /// Allocate output and history buffers for a `width x height` viewport.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            output: Buffer::new_2d(width, height),
            history: Buffer::new_2d(width, height),
        }
    }
}

impl<RT: Clone> FrameBuffers<RT> {
    /// Fill the output with `clear_value` and zero the history.
    pub fn clear(&mut self, clear_value: RT) {
        self.output.fill(clear_value);
        self.history.fill(Vec3::ZERO);
    }
}

impl<RT> FrameBuffers<RT> {
    pub fn width(&self) -> usize {
        self.output.width()
    }

    pub fn height(&self) -> usize {
        self.output.height()
    }

    pub fn output(&self) -> &Buffer<RT> {
        &self.output
    }

    pub fn output_mut(&mut self) -> &mut Buffer<RT> {
        &mut self.output
    }

    pub fn history(&self) -> &Buffer<Vec3> {
        &self.history
    }

    /// Consume the frame, keeping only the output image.
    pub fn into_output(self) -> Buffer<RT> {
        self.output
    }
}
