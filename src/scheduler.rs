//! Per-tick sequencing and resource lifetime of the ink overlay.
//!
//! One tick: sample the pointer, run the simulation pass into the inactive
//! buffer, flip parity, dither the buffer just written, present. Resizes and
//! parameter changes are queued and applied only at the start of a tick.

use glam::Vec2;

use crate::config::Settings;
use crate::error::InkError;
use crate::fade::OpacityFade;
use crate::simulation::field::FieldSize;
use crate::simulation::params::{DitherParams, SimParams};
use crate::simulation::pointer::{PointerTracker, SurfaceRect};

/// Output surface description supplied by the host. Fields stay private so
/// the pixel ratio is always finite and positive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    width: u32,
    height: u32,
    pixel_ratio: f32,
}

impl Viewport {
    pub fn new(width: u32, height: u32, pixel_ratio: f32) -> Self {
        let pixel_ratio = if pixel_ratio.is_finite() && pixel_ratio > 0.0 {
            pixel_ratio
        } else {
            1.0
        };
        Self {
            width,
            height,
            pixel_ratio,
        }
    }

    /// Width in device pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in device pixels
    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel_ratio(&self) -> f32 {
        self.pixel_ratio
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Size in logical (CSS-like) pixels
    pub fn logical_size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32) / self.pixel_ratio
    }

    /// Simulation buffer size for this viewport, at least 1x1
    pub fn field_size(&self, resolution_scale: f32) -> FieldSize {
        let scaled = (self.logical_size() * resolution_scale).round();
        FieldSize::new(scaled.x as u32, scaled.y as u32)
    }
}

/// The stages a rendering backend performs for the scheduler. The scheduler
/// decides order and timing; backends own the actual buffers.
pub trait InkBackend {
    /// Drop any existing buffers and allocate both simulation buffers
    /// zero-filled at `field`, sizing the output for `viewport`.
    fn allocate(&mut self, field: FieldSize, viewport: &Viewport) -> Result<(), InkError>;

    /// Simulation pass: read the active buffer, write the inactive one.
    fn advance(&mut self, params: &SimParams) -> Result<(), InkError>;

    /// Flip the parity flag.
    fn swap(&mut self);

    /// Dither pass over the buffer the last `advance` wrote.
    fn dither(&mut self, params: &DitherParams) -> Result<(), InkError>;

    fn present(&mut self) -> Result<(), InkError>;

    /// Release every buffer. Called exactly once per mount.
    fn release(&mut self);

    /// Whether the output expects premultiplied colour
    fn premultiplied(&self) -> bool {
        false
    }
}

/// Result of one call to [`FrameScheduler::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// A frame went through all stages
    Presented,
    /// Nothing ran: unmounted, hidden, or zero-area surface
    Skipped,
    /// A frame was presented and the fade-out has completed; unmount now
    FadedOut,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lifecycle {
    Running,
    Hidden,
    Unmounted,
}

/// Drives one overlay instance from mount to unmount.
pub struct FrameScheduler<B: InkBackend> {
    backend: B,
    settings: Settings,
    pending_settings: Option<Settings>,
    pointer: PointerTracker,
    fade: OpacityFade,
    viewport: Viewport,
    field: FieldSize,
    pending_resize: Option<Viewport>,
    lifecycle: Lifecycle,
    tick_scheduled: bool,
    frame_number: u64,
}

impl<B: InkBackend> FrameScheduler<B> {
    /// Allocate buffers for `viewport` and start ticking, fully visible.
    pub fn mount(backend: B, settings: Settings, viewport: Viewport) -> Result<Self, InkError> {
        Self::mount_with_fade(backend, settings, viewport, OpacityFade::visible())
    }

    /// Like [`mount`](Self::mount), but easing in from transparent.
    pub fn mount_faded(backend: B, settings: Settings, viewport: Viewport) -> Result<Self, InkError> {
        Self::mount_with_fade(backend, settings, viewport, OpacityFade::from_transparent())
    }

    fn mount_with_fade(
        mut backend: B,
        settings: Settings,
        viewport: Viewport,
        fade: OpacityFade,
    ) -> Result<Self, InkError> {
        let field = viewport.field_size(settings.clamped_resolution_scale());
        backend.allocate(field, &viewport)?;

        log::info!(
            "Mounted ink overlay: surface {}x{} @{}x, field {}x{}",
            viewport.width,
            viewport.height,
            viewport.pixel_ratio,
            field.width,
            field.height
        );

        Ok(Self {
            backend,
            settings,
            pending_settings: None,
            pointer: PointerTracker::new(),
            fade,
            viewport,
            field,
            pending_resize: None,
            lifecycle: Lifecycle::Running,
            tick_scheduled: true,
            frame_number: 0,
        })
    }

    /// Forward a raw pointer move in surface coordinates.
    pub fn pointer_moved(&mut self, x: f32, y: f32, rect: SurfaceRect) {
        self.pointer.on_pointer_move(x, y, rect);
    }

    /// Queue a resize for the next tick boundary. The latest request wins.
    pub fn request_resize(&mut self, viewport: Viewport) {
        if self.lifecycle == Lifecycle::Unmounted {
            return;
        }
        log::debug!("Resize to {}x{} deferred to next tick", viewport.width, viewport.height);
        self.pending_resize = Some(viewport);
    }

    /// Swap parameters at the next tick boundary.
    pub fn reconfigure(&mut self, settings: Settings) {
        if self.lifecycle == Lifecycle::Unmounted {
            return;
        }
        self.pending_settings = Some(settings);
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.lifecycle = match (self.lifecycle, visible) {
            (Lifecycle::Unmounted, _) => Lifecycle::Unmounted,
            (_, true) => Lifecycle::Running,
            (_, false) => Lifecycle::Hidden,
        };
        self.tick_scheduled = self.lifecycle == Lifecycle::Running;
    }

    /// Ease the overlay back towards full opacity from wherever it is.
    pub fn fade_in(&mut self) {
        self.fade.fade_in();
    }

    /// Ease the overlay out; `tick` reports `FadedOut` when done.
    pub fn fade_out(&mut self) {
        self.fade.fade_out();
    }

    /// Whether the host should schedule another tick
    pub fn wants_frame(&self) -> bool {
        self.tick_scheduled
    }

    pub fn is_mounted(&self) -> bool {
        self.lifecycle != Lifecycle::Unmounted
    }

    pub fn frame_number(&self) -> u64 {
        self.frame_number
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn field_size(&self) -> FieldSize {
        self.field
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Run one frame. `elapsed` is seconds since mount and drives the flow field.
    pub fn tick(&mut self, elapsed: f32) -> Result<TickOutcome, InkError> {
        if self.lifecycle == Lifecycle::Unmounted {
            return Ok(TickOutcome::Skipped);
        }

        self.apply_pending()?;

        if self.lifecycle == Lifecycle::Hidden || self.viewport.is_empty() {
            return Ok(TickOutcome::Skipped);
        }

        let opacity = self.settings.opacity * self.fade.advance(self.settings.fade_step);
        let pointer = self.pointer.sample();
        let logical = self.viewport.logical_size();

        let sim = SimParams {
            field_width: self.field.width,
            field_height: self.field.height,
            time: elapsed,
            radius: self.settings.normalized_radius(logical.y),
            pointer: pointer.position.to_array(),
            direction: pointer.direction.to_array(),
            speed: pointer.speed,
            decay: self.settings.decay,
            intensity: self.settings.intensity,
            _padding: 0.0,
        };
        self.backend.advance(&sim)?;
        self.backend.swap();

        let [r, g, b] = self.settings.color.to_array();
        let dither = DitherParams {
            surface_size: [self.viewport.width as f32, self.viewport.height as f32],
            field_size: [self.field.width, self.field.height],
            color: [r, g, b, 1.0],
            dither_size: self.settings.dither_size,
            exponent: self.settings.exponent,
            opacity,
            pixel_ratio: self.viewport.pixel_ratio,
            premultiply: self.backend.premultiplied() as u32,
            _padding: [0; 3],
        };
        self.backend.dither(&dither)?;
        self.backend.present()?;

        self.frame_number += 1;

        if self.fade.finished_out() {
            self.tick_scheduled = false;
            Ok(TickOutcome::FadedOut)
        } else {
            Ok(TickOutcome::Presented)
        }
    }

    /// Cancel the scheduled tick, then release buffers. Idempotent.
    pub fn unmount(&mut self) {
        if self.lifecycle == Lifecycle::Unmounted {
            return;
        }
        self.tick_scheduled = false;
        self.pending_resize = None;
        self.pending_settings = None;
        self.lifecycle = Lifecycle::Unmounted;
        self.backend.release();
        log::info!("Unmounted ink overlay after {} frames", self.frame_number);
    }

    fn apply_pending(&mut self) -> Result<(), InkError> {
        let mut reallocate = false;

        if let Some(settings) = self.pending_settings.take() {
            reallocate |= settings.clamped_resolution_scale() != self.settings.clamped_resolution_scale();
            self.settings = settings;
        }

        if let Some(viewport) = self.pending_resize.take() {
            self.viewport = viewport;
            reallocate = true;
        }

        if reallocate {
            // The field restarts from zero at the new resolution
            self.field = self.viewport.field_size(self.settings.clamped_resolution_scale());
            self.backend.allocate(self.field, &self.viewport)?;
            log::info!(
                "Resized ink overlay: surface {}x{}, field {}x{}",
                self.viewport.width,
                self.viewport.height,
                self.field.width,
                self.field.height
            );
        }

        Ok(())
    }
}

impl<B: InkBackend> Drop for FrameScheduler<B> {
    fn drop(&mut self) {
        self.unmount();
    }
}
