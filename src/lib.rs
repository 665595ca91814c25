//! # particle-field
//!
//! Ambient particle animations: points drift across a 2D surface and nearby
//! points are joined by lines that fade with distance.
//!
//! The crate separates the animation from where it is drawn. A
//! [`ParticleField`] owns the particles and renders each frame through any
//! [`DrawingSurface`]; a [`Simulation`] drives the field from a
//! [`FrameScheduler`] until it is stopped.
//!
//! [`DriftField`] is a second, quieter effect: colored motes that ease back
//! and forth around fixed anchor points with a soft halo and no lines. Both
//! implement [`Animation`], so a [`Simulation`] or the [`Viewer`] can drive
//! either one.
//!
//! ## Quick Start
//!
//! ```ignore
//! use particle_field::prelude::*;
//!
//! let surface = PixelSurface::new(800, 600);
//! let field = ParticleField::new(surface, FieldConfig::hero(800))?;
//!
//! let mut sim = Simulation::new(field, ManualScheduler::new(120));
//! let summary = sim.run();
//!
//! let (field, _) = sim.into_parts();
//! field.into_surface().save_png("frame.png")?;
//! ```
//!
//! ## Presets
//!
//! | Preset | Particles | Link distance | Links per particle | Refresh | Edges |
//! |--------|-----------|---------------|--------------------|---------|-------|
//! | [`FieldConfig::hero`] | 100 (60 narrow) | 120 | 5 | every 10 frames | wrap |
//! | [`FieldConfig::hologram`] | 35 (25 narrow) | 100 | 3 | every 15 frames | bounce |
//!
//! "Narrow" means a surface under 768 pixels wide.
//!
//! [`DriftConfig::default`] gives 80 motes, 2-10px across, in a four-color
//! palette, each wandering up to 20% of the surface from its anchor over
//! 20-45 second legs.
//!
//! ## Surfaces
//!
//! - [`PixelSurface`]: anti-aliased CPU raster, exportable as PNG
//! - [`RecordingSurface`]: records draw commands, useful in tests
//! - [`Viewer`]: a window that presents a [`PixelSurface`] through wgpu
//!
//! ## Connections
//!
//! Connections are recomputed every `refresh_interval` frames, not every
//! frame. Between refreshes the cached set is redrawn at the particles'
//! current positions. A pair connects when its distance is strictly below
//! `connection_distance` and neither particle already has
//! `max_connections` links.

pub mod animation;
pub mod config;
pub mod connections;
pub mod drift;
pub mod error;
pub mod field;
mod gpu;
pub mod particle;
pub mod raster;
pub mod recording;
pub mod resize;
pub mod rules;
pub mod scheduler;
pub mod simulation;
pub mod spawn;
pub mod surface;
pub mod time;
pub mod visuals;
pub mod window;

pub use animation::Animation;
pub use config::{FieldConfig, Interval};
pub use connections::{Connection, ConnectionSet};
pub use drift::{DriftConfig, DriftField, DriftPhase, Mote};
pub use error::{
    ConfigError, ExportError, FieldError, FrameError, FrameStep, GpuError, SurfaceError,
    ViewerError,
};
pub use field::{ParticleField, ResizeOutcome};
pub use glam::Vec2;
pub use particle::Particle;
pub use raster::PixelSurface;
pub use recording::{DrawCommand, RecordingSurface};
pub use resize::{ResizeDebouncer, ResizeSender, ResizeSignal};
pub use rules::Boundary;
pub use scheduler::{FixedRateScheduler, FrameScheduler, FrameToken, ManualScheduler};
pub use simulation::{RunSummary, RunningSimulation, Simulation, StopHandle, StopReason};
pub use spawn::SpawnContext;
pub use surface::DrawingSurface;
pub use time::FrameClock;
pub use visuals::{Color, Glow, VisualConfig};
pub use window::{Scene, Viewer};

/// Common imports.
///
/// ```ignore
/// use particle_field::prelude::*;
/// ```
pub mod prelude {
    pub use crate::animation::Animation;
    pub use crate::config::{FieldConfig, Interval};
    pub use crate::drift::{DriftConfig, DriftField};
    pub use crate::field::ParticleField;
    pub use crate::raster::PixelSurface;
    pub use crate::recording::RecordingSurface;
    pub use crate::rules::Boundary;
    pub use crate::scheduler::{FixedRateScheduler, FrameScheduler, ManualScheduler};
    pub use crate::simulation::{Simulation, StopHandle, StopReason};
    pub use crate::surface::DrawingSurface;
    pub use crate::visuals::{Color, VisualConfig};
    pub use crate::window::Viewer;
    pub use crate::Vec2;
}
