use std::sync::Arc;
use std::time::Instant;
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::ActiveEventLoop;
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId, WindowLevel};

use crate::config::{Settings, SurfacePositioning};
use crate::gpu::GpuBackend;
use crate::scheduler::{FrameScheduler, TickOutcome, Viewport};
use crate::simulation::SurfaceRect;

/// Window host for the overlay: owns the window, mounts and unmounts the
/// pipeline, and forwards pointer, resize and visibility events to it.
pub struct App {
    settings: Settings,
    window: Option<Arc<Window>>,
    overlay: Option<FrameScheduler<GpuBackend>>,
    /// Set once the environment proved unable to run the effect
    disabled: bool,
    /// Whether the pointer is over the window; a faded-out overlay only
    /// comes back when it returns
    cursor_inside: bool,
    mounted_at: Instant,
    fps_counter: FpsCounter,
}

impl App {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            window: None,
            overlay: None,
            disabled: false,
            cursor_inside: true,
            mounted_at: Instant::now(),
            fps_counter: FpsCounter::new(),
        }
    }

    fn viewport(window: &Window) -> Viewport {
        let size = window.inner_size();
        Viewport::new(size.width, size.height, window.scale_factor() as f32)
    }

    /// Mount the pipeline if the viewport qualifies. Capability failures
    /// disable the effect for the rest of the session.
    fn mount(&mut self) {
        if self.disabled || self.overlay.is_some() {
            return;
        }
        let Some(window) = self.window.clone() else {
            return;
        };

        let viewport = Self::viewport(&window);
        if !self.settings.should_mount(viewport.logical_size().x) {
            log::info!(
                "Viewport {:.0} px wide is below {:.0} px, not mounting",
                viewport.logical_size().x,
                self.settings.min_viewport_width
            );
            return;
        }

        let mounted = pollster::block_on(GpuBackend::new(window.clone()))
            .and_then(|backend| FrameScheduler::mount_faded(backend, self.settings.clone(), viewport));

        match mounted {
            Ok(overlay) => {
                self.overlay = Some(overlay);
                self.mounted_at = Instant::now();
                window.request_redraw();
            }
            Err(e) => {
                log::warn!("Ink overlay disabled: {}", e);
                self.disabled = true;
            }
        }
    }

    fn unmount(&mut self) {
        // Dropping the scheduler also ends pointer forwarding
        if let Some(mut overlay) = self.overlay.take() {
            overlay.unmount();
        }
    }

    fn resized(&mut self, viewport: Viewport) {
        if !viewport.is_empty() && !self.settings.should_mount(viewport.logical_size().x) {
            self.unmount();
            return;
        }

        if let Some(overlay) = self.overlay.as_mut() {
            overlay.request_resize(viewport);
        } else if self.remounts_on_resize() {
            self.mount();
        }
        self.request_redraw();
    }

    /// A resize brings the overlay back only if the pointer is still over it
    fn remounts_on_resize(&self) -> bool {
        self.overlay.is_none() && self.cursor_inside && !self.disabled
    }

    fn cursor_entered(&mut self) {
        self.cursor_inside = true;
        match self.overlay.as_mut() {
            Some(overlay) => overlay.fade_in(),
            None => self.mount(),
        }
        self.request_redraw();
    }

    fn cursor_left(&mut self) {
        self.cursor_inside = false;
        if let Some(overlay) = self.overlay.as_mut() {
            overlay.fade_out();
        }
    }

    fn request_redraw(&self) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn render(&mut self) {
        let Some(overlay) = self.overlay.as_mut() else {
            return;
        };

        let elapsed = self.mounted_at.elapsed().as_secs_f32();
        match overlay.tick(elapsed) {
            Ok(TickOutcome::Presented) => {
                let wants_frame = overlay.wants_frame();
                if let Some(fps) = self.fps_counter.tick() {
                    log::debug!("{:.0} FPS", fps);
                    if let Some(window) = &self.window {
                        window.set_title(&format!("Dither Ink - {:.0} FPS", fps));
                    }
                }
                if wants_frame {
                    self.request_redraw();
                }
            }
            // Hidden or zero-area: the next visibility change or resize asks again
            Ok(TickOutcome::Skipped) => {}
            Ok(TickOutcome::FadedOut) => self.unmount(),
            Err(e) if e.is_capability_failure() => {
                log::warn!("Ink overlay disabled: {}", e);
                self.unmount();
                self.disabled = true;
            }
            Err(e) => {
                log::error!("Frame failed: {}", e);
                self.request_redraw();
            }
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        log::info!("Initializing dither ink overlay...");

        let mut window_attrs = Window::default_attributes()
            .with_title("Dither Ink")
            .with_transparent(true)
            .with_decorations(false);
        window_attrs = match self.settings.surface_positioning {
            SurfacePositioning::Fixed => window_attrs
                .with_window_level(WindowLevel::AlwaysOnTop)
                .with_maximized(true),
            SurfacePositioning::Absolute => window_attrs.with_inner_size(LogicalSize::new(1280.0, 800.0)),
        };

        let window = match event_loop.create_window(window_attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("Failed to create window: {}", e);
                event_loop.exit();
                return;
            }
        };

        self.window = Some(window);
        self.mount();
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested, exiting...");
                self.unmount();
                event_loop.exit();
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if event.state.is_pressed() && event.physical_key == PhysicalKey::Code(KeyCode::Escape) {
                    log::info!("Escape pressed, exiting...");
                    self.unmount();
                    event_loop.exit();
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                if let (Some(overlay), Some(window)) = (self.overlay.as_mut(), &self.window) {
                    let size = window.inner_size();
                    let rect = SurfaceRect::from_size(size.width as f32, size.height as f32);
                    overlay.pointer_moved(position.x as f32, position.y as f32, rect);
                }
            }
            WindowEvent::CursorEntered { .. } => self.cursor_entered(),
            WindowEvent::CursorLeft { .. } => self.cursor_left(),
            WindowEvent::Resized(new_size) => {
                if let Some(window) = &self.window {
                    log::info!("Window resized to {}x{}", new_size.width, new_size.height);
                    let viewport =
                        Viewport::new(new_size.width, new_size.height, window.scale_factor() as f32);
                    self.resized(viewport);
                }
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                if let Some(window) = &self.window {
                    let size = window.inner_size();
                    self.resized(Viewport::new(size.width, size.height, scale_factor as f32));
                }
            }
            WindowEvent::Occluded(occluded) => {
                if let Some(overlay) = self.overlay.as_mut() {
                    overlay.set_visible(!occluded);
                }
                if !occluded {
                    self.request_redraw();
                }
            }
            WindowEvent::RedrawRequested => {
                self.render();
            }
            _ => {}
        }
    }
}

/// Simple FPS counter
struct FpsCounter {
    last_update: Instant,
    frame_count: u32,
}

impl FpsCounter {
    fn new() -> Self {
        Self {
            last_update: Instant::now(),
            frame_count: 0,
        }
    }

    /// Tick the counter, returns Some(fps) every second
    fn tick(&mut self) -> Option<f64> {
        self.frame_count += 1;
        let elapsed = self.last_update.elapsed();

        if elapsed.as_secs_f64() >= 1.0 {
            let fps = self.frame_count as f64 / elapsed.as_secs_f64();
            self.frame_count = 0;
            self.last_update = Instant::now();
            Some(fps)
        } else {
            None
        }
    }
}
