//! Windowed viewer.
//!
//! Opens a window and animates a particle field or floating motes in it.
//! Winit's redraw
//! requests act as the frame scheduler; window resizes go through a
//! [`ResizeDebouncer`] and are applied between frames.
//!
//! ```ignore
//! Viewer::new(FieldConfig::hologram(1280))
//!     .with_title("Hologram")
//!     .run()?;
//!
//! Viewer::new(DriftConfig::default()).run()?;
//! ```

use std::sync::Arc;
use std::time::Duration;

use log::{error, info, warn};
use winit::{
    application::ApplicationHandler,
    event::{ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use crate::animation::Animation;
use crate::config::FieldConfig;
use crate::drift::{DriftConfig, DriftField};
use crate::error::{FieldError, ViewerError};
use crate::field::ParticleField;
use crate::gpu::Presenter;
use crate::raster::PixelSurface;
use crate::resize::ResizeDebouncer;
use crate::simulation::StopHandle;
use crate::surface::DrawingSurface;
use crate::time::FrameClock;
use crate::visuals::Color;

/// What a [`Viewer`] animates.
#[derive(Debug, Clone, PartialEq)]
pub enum Scene {
    Field(FieldConfig),
    Drift(DriftConfig),
}

impl Scene {
    fn resize_quiet_period(&self) -> Duration {
        match self {
            Scene::Field(config) => config.resize_quiet_period(),
            Scene::Drift(config) => config.resize_quiet_period(),
        }
    }

    /// Build the animation on a fresh pixel buffer.
    ///
    /// The window shows color channels only, so a translucent background is
    /// replaced by an opaque backdrop.
    fn build(
        &self,
        width: u32,
        height: u32,
    ) -> Result<Box<dyn Animation<Surface = PixelSurface>>, FieldError> {
        let surface = PixelSurface::new(width, height);
        match self {
            Scene::Field(config) => {
                let mut config = config.clone();
                config.visuals.background = opaque(config.visuals.background);
                Ok(Box::new(ParticleField::new(surface, config)?))
            }
            Scene::Drift(config) => {
                let mut config = config.clone();
                config.background = opaque(config.background);
                Ok(Box::new(DriftField::new(surface, config)?))
            }
        }
    }
}

impl From<FieldConfig> for Scene {
    fn from(config: FieldConfig) -> Self {
        Scene::Field(config)
    }
}

impl From<DriftConfig> for Scene {
    fn from(config: DriftConfig) -> Self {
        Scene::Drift(config)
    }
}

fn opaque(background: Color) -> Color {
    if background.alpha < 1.0 {
        Color::from_rgb8(12, 12, 14)
    } else {
        background
    }
}

/// Opens a window showing an animation.
pub struct Viewer {
    scene: Scene,
    title: String,
    width: u32,
    height: u32,
    stop: StopHandle,
}

impl Viewer {
    /// A 1280x720 viewer for a [`FieldConfig`] or [`DriftConfig`].
    pub fn new(scene: impl Into<Scene>) -> Self {
        Self {
            scene: scene.into(),
            title: "particle-field".to_string(),
            width: 1280,
            height: 720,
            stop: StopHandle::new(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Initial window size in logical pixels.
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Handle that closes the viewer before its next frame.
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Run until the window is closed. Blocks the calling thread.
    pub fn run(self) -> Result<(), ViewerError> {
        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut app = App::new(self);
        event_loop.run_app(&mut app)?;

        match app.failure.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

struct App {
    viewer: Viewer,
    window: Option<Arc<Window>>,
    presenter: Option<Presenter>,
    animation: Option<Box<dyn Animation<Surface = PixelSurface>>>,
    resize: ResizeDebouncer,
    clock: FrameClock,
    failure: Option<ViewerError>,
}

impl App {
    fn new(viewer: Viewer) -> Self {
        let resize = ResizeDebouncer::new(viewer.scene.resize_quiet_period());
        Self {
            viewer,
            window: None,
            presenter: None,
            animation: None,
            resize,
            clock: FrameClock::new(),
            failure: None,
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<(), ViewerError> {
        let window_attrs = Window::default_attributes()
            .with_title(self.viewer.title.clone())
            .with_inner_size(winit::dpi::LogicalSize::new(self.viewer.width, self.viewer.height));

        let window = Arc::new(event_loop.create_window(window_attrs)?);
        let size = window.inner_size();

        let presenter = pollster::block_on(Presenter::new(window.clone()))?;

        let animation = self.viewer.scene.build(size.width, size.height)?;
        info!(
            "viewer opened at {}x{} with {} particles",
            size.width,
            size.height,
            animation.particle_count()
        );

        self.window = Some(window);
        self.presenter = Some(presenter);
        self.animation = Some(animation);
        Ok(())
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        if self.viewer.stop.is_stopped() {
            event_loop.exit();
            return;
        }
        let (Some(animation), Some(presenter)) = (&mut self.animation, &mut self.presenter) else {
            return;
        };

        if let Some((width, height)) = self.resize.poll() {
            if let Err(e) = animation.resize(width, height) {
                warn!("keeping previous surface size: {}", e);
            }
        }

        if let Err(e) = animation.frame() {
            error!("stopping animation: {}", e);
            self.viewer.stop.stop();
            event_loop.exit();
            return;
        }
        self.clock.tick();

        let surface = animation.surface();
        let (width, height) = surface.size();
        match presenter.present(surface.as_bytes(), width, height) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => presenter.reconfigure(),
            Err(wgpu::SurfaceError::OutOfMemory) => {
                error!("GPU out of memory");
                event_loop.exit();
                return;
            }
            Err(e) => warn!("present error: {:?}", e),
        }

        if let Some(window) = &self.window {
            if self.clock.frames() % 30 == 0 {
                window.set_title(&format!("{} - {:.0} FPS", self.viewer.title, self.clock.fps()));
            }
            window.request_redraw();
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(e) = self.init(event_loop) {
                error!("viewer initialization failed: {}", e);
                self.failure = Some(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                self.viewer.stop.stop();
                event_loop.exit();
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => {
                self.viewer.stop.stop();
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                if let Some(presenter) = &mut self.presenter {
                    presenter.resize(physical_size.width, physical_size.height);
                }
                self.resize.notify(physical_size.width, physical_size.height);
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }
}
