//! A surface that records draw calls instead of drawing.
//!
//! Useful for testing code that drives a [`ParticleField`](crate::ParticleField)
//! without a real framebuffer:
//!
//! ```ignore
//! let surface = RecordingSurface::new(800, 600);
//! let mut field = ParticleField::with_seed(surface, FieldConfig::default(), 1)?;
//! field.frame()?;
//! assert_eq!(field.surface().circles().count(), 100);
//! ```

use glam::Vec2;

use crate::error::SurfaceError;
use crate::surface::DrawingSurface;
use crate::visuals::Color;

/// One recorded surface operation.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear {
        color: Color,
    },
    Circle {
        center: Vec2,
        radius: f32,
        color: Color,
    },
    Glow {
        center: Vec2,
        radius: f32,
        blur: f32,
        color: Color,
    },
    Line {
        from: Vec2,
        to: Vec2,
        color: Color,
        width: f32,
    },
    Resize {
        width: u32,
        height: u32,
    },
}

/// A [`DrawingSurface`] that keeps a log of every call.
///
/// Can be told to fail after a number of operations to exercise error paths.
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    width: u32,
    height: u32,
    commands: Vec<DrawCommand>,
    has_context: bool,
    fail_after: Option<usize>,
    operations: usize,
}

impl RecordingSurface {
    /// Create a recorder reporting the given size.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            commands: Vec::new(),
            has_context: true,
            fail_after: None,
            operations: 0,
        }
    }

    /// A recorder whose drawing context can never be acquired.
    pub fn without_context(width: u32, height: u32) -> Self {
        Self {
            has_context: false,
            ..Self::new(width, height)
        }
    }

    /// Succeed for `operations` draw calls, then report [`SurfaceError::Detached`].
    pub fn fail_after(mut self, operations: usize) -> Self {
        self.fail_after = Some(operations);
        self
    }

    /// Every command recorded so far.
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Take the recorded commands, leaving the log empty.
    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Recorded circle fills as `(center, radius, color)`.
    pub fn circles(&self) -> impl Iterator<Item = (Vec2, f32, Color)> + '_ {
        self.commands.iter().filter_map(|cmd| match *cmd {
            DrawCommand::Circle {
                center,
                radius,
                color,
            } => Some((center, radius, color)),
            _ => None,
        })
    }

    /// Recorded line strokes as `(from, to, color)`.
    pub fn lines(&self) -> impl Iterator<Item = (Vec2, Vec2, Color)> + '_ {
        self.commands.iter().filter_map(|cmd| match *cmd {
            DrawCommand::Line {
                from, to, color, ..
            } => Some((from, to, color)),
            _ => None,
        })
    }

    /// Number of recorded clears.
    pub fn clear_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|cmd| matches!(cmd, DrawCommand::Clear { .. }))
            .count()
    }

    fn record(&mut self, command: DrawCommand) -> Result<(), SurfaceError> {
        if let Some(limit) = self.fail_after {
            if self.operations >= limit {
                return Err(SurfaceError::Detached);
            }
        }
        self.operations += 1;
        self.commands.push(command);
        Ok(())
    }
}

impl DrawingSurface for RecordingSurface {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn ensure_context(&mut self) -> Result<(), SurfaceError> {
        if self.has_context {
            Ok(())
        } else {
            Err(SurfaceError::ContextUnavailable)
        }
    }

    fn clear(&mut self, color: Color) -> Result<(), SurfaceError> {
        self.record(DrawCommand::Clear { color })
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) -> Result<(), SurfaceError> {
        self.record(DrawCommand::Circle {
            center,
            radius,
            color,
        })
    }

    fn fill_glow(
        &mut self,
        center: Vec2,
        radius: f32,
        blur: f32,
        color: Color,
    ) -> Result<(), SurfaceError> {
        self.record(DrawCommand::Glow {
            center,
            radius,
            blur,
            color,
        })
    }

    fn stroke_line(
        &mut self,
        from: Vec2,
        to: Vec2,
        color: Color,
        width: f32,
    ) -> Result<(), SurfaceError> {
        self.record(DrawCommand::Line {
            from,
            to,
            color,
            width,
        })
    }

    fn resize(&mut self, width: u32, height: u32) -> Result<(), SurfaceError> {
        if width == 0 || height == 0 {
            return Err(SurfaceError::ZeroArea { width, height });
        }
        self.record(DrawCommand::Resize { width, height })?;
        self.width = width;
        self.height = height;
        Ok(())
    }
}
