use std::sync::Arc;
use wgpu::{CompositeAlphaMode, Device, Instance, Queue, Surface, SurfaceConfiguration};
use winit::window::Window;

use crate::error::InkError;

/// GPU context holding device, queue, and the overlay window's surface
pub struct GpuContext {
    pub surface: Surface<'static>,
    pub device: Device,
    pub queue: Queue,
    pub config: SurfaceConfiguration,
}

impl GpuContext {
    /// Create a new GPU context for the given window.
    ///
    /// Any missing capability is returned as an error so the host can carry
    /// on without the effect.
    pub async fn new(window: Arc<Window>) -> Result<Self, InkError> {
        let instance = Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance.create_surface(window.clone())?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(InkError::NoAdapter)?;

        log::info!("Using GPU: {}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("dither-ink-device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                },
                None,
            )
            .await?;

        let size = window.inner_size();
        let mut config = surface
            .get_default_config(&adapter, size.width.max(1), size.height.max(1))
            .ok_or(InkError::SurfaceUnsupported)?;

        let caps = surface.get_capabilities(&adapter);
        config.alpha_mode = match pick_alpha_mode(&caps.alpha_modes) {
            Some(mode) => mode,
            None => {
                log::warn!("Surface has no transparent alpha mode ({:?})", caps.alpha_modes);
                return Err(InkError::SurfaceUnsupported);
            }
        };

        surface.configure(&device, &config);

        Ok(Self {
            surface,
            device,
            queue,
            config,
        })
    }

    /// Reconfigure the surface for a new size; zero-area sizes are ignored
    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.config.width = width;
            self.config.height = height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    /// Reapply the current configuration after the surface was lost
    pub fn reconfigure(&self) {
        self.surface.configure(&self.device, &self.config);
    }

    /// Get current surface texture format
    pub fn format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    /// Whether the compositor expects premultiplied colour
    pub fn premultiplied(&self) -> bool {
        self.config.alpha_mode == CompositeAlphaMode::PreMultiplied
    }
}

/// The overlay only works if the compositor honours per-pixel alpha. An
/// opaque surface would cover whatever is underneath, so it is rejected.
fn pick_alpha_mode(modes: &[CompositeAlphaMode]) -> Option<CompositeAlphaMode> {
    [
        CompositeAlphaMode::PreMultiplied,
        CompositeAlphaMode::PostMultiplied,
        CompositeAlphaMode::Inherit,
    ]
    .into_iter()
    .find(|preferred| modes.contains(preferred))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opaque_only_surface_is_rejected() {
        assert_eq!(pick_alpha_mode(&[CompositeAlphaMode::Opaque]), None);
        assert_eq!(pick_alpha_mode(&[]), None);
    }

    #[test]
    fn test_prefers_premultiplied() {
        let modes = [
            CompositeAlphaMode::Opaque,
            CompositeAlphaMode::Inherit,
            CompositeAlphaMode::PostMultiplied,
            CompositeAlphaMode::PreMultiplied,
        ];
        assert_eq!(pick_alpha_mode(&modes), Some(CompositeAlphaMode::PreMultiplied));
        assert_eq!(
            pick_alpha_mode(&[CompositeAlphaMode::Opaque, CompositeAlphaMode::PostMultiplied]),
            Some(CompositeAlphaMode::PostMultiplied)
        );
        assert_eq!(
            pick_alpha_mode(&[CompositeAlphaMode::Opaque, CompositeAlphaMode::Inherit]),
            Some(CompositeAlphaMode::Inherit)
        );
    }
}
