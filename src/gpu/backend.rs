use std::sync::Arc;

use winit::window::Window;

use crate::error::InkError;
use crate::gpu::{ComputePipeline, FieldBuffers, GpuContext, RenderPipeline};
use crate::scheduler::{InkBackend, Viewport};
use crate::simulation::{DitherParams, FieldSize, SimParams};

/// Work recorded for the current tick, submitted on present
struct InFlightFrame {
    encoder: wgpu::CommandEncoder,
    output: Option<wgpu::SurfaceTexture>,
}

/// wgpu implementation of the stages: compute pass for the simulation,
/// fullscreen fragment pass for the dither, onto the window surface.
pub struct GpuBackend {
    gpu: GpuContext,
    compute: ComputePipeline,
    render: RenderPipeline,
    buffers: Option<FieldBuffers>,
    frame: Option<InFlightFrame>,
}

impl GpuBackend {
    pub async fn new(window: Arc<Window>) -> Result<Self, InkError> {
        let gpu = GpuContext::new(window).await?;

        log::info!("Creating simulation pipeline...");
        let compute = ComputePipeline::new(&gpu.device);

        log::info!("Creating dither pipeline...");
        let render = RenderPipeline::new(&gpu.device, gpu.format(), gpu.premultiplied());

        Ok(Self {
            gpu,
            compute,
            render,
            buffers: None,
            frame: None,
        })
    }

    fn submit(&self, frame: InFlightFrame) {
        self.gpu.queue.submit(std::iter::once(frame.encoder.finish()));
        if let Some(output) = frame.output {
            output.present();
        }
    }
}

impl InkBackend for GpuBackend {
    fn allocate(&mut self, field: FieldSize, viewport: &Viewport) -> Result<(), InkError> {
        // Old buffers go first; nothing may still reference them
        if let Some(stale) = self.frame.take() {
            self.submit(stale);
        }
        self.buffers = None;

        self.gpu.resize(viewport.width(), viewport.height());
        self.buffers = Some(FieldBuffers::new(&self.gpu.device, field));
        Ok(())
    }

    fn advance(&mut self, params: &SimParams) -> Result<(), InkError> {
        // A tick that failed after its compute pass still owes a submit
        if let Some(stale) = self.frame.take() {
            self.submit(stale);
        }
        let Some(buffers) = self.buffers.as_ref() else {
            return Ok(());
        };

        buffers.update_params(&self.gpu.queue, params);

        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("ink-frame-encoder"),
            });

        let (input, output) = buffers.fields.io();
        let bind_group =
            self.compute
                .create_bind_group(&self.gpu.device, input, output, &buffers.params_buffer);
        self.compute.dispatch(&mut encoder, &bind_group, buffers.size);

        self.frame = Some(InFlightFrame {
            encoder,
            output: None,
        });
        Ok(())
    }

    fn swap(&mut self) {
        if let Some(buffers) = self.buffers.as_mut() {
            buffers.fields.swap();
        }
    }

    fn dither(&mut self, params: &DitherParams) -> Result<(), InkError> {
        let (Some(buffers), Some(frame)) = (self.buffers.as_ref(), self.frame.as_mut()) else {
            return Ok(());
        };

        buffers.update_dither_params(&self.gpu.queue, params);

        let output = match self.gpu.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                // The simulation pass still runs; only this frame's image is dropped
                self.gpu.reconfigure();
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => {
                log::debug!("Surface acquire timed out, skipping frame");
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let bind_group = self.render.create_bind_group(
            &self.gpu.device,
            buffers.fields.latest(),
            &buffers.dither_params_buffer,
        );
        self.render.draw(&mut frame.encoder, &view, &bind_group);
        frame.output = Some(output);
        Ok(())
    }

    fn present(&mut self) -> Result<(), InkError> {
        if let Some(frame) = self.frame.take() {
            self.submit(frame);
        }
        Ok(())
    }

    fn release(&mut self) {
        // Dropping unsubmitted work is fine once the overlay is gone
        self.frame = None;
        self.buffers = None;
    }

    fn premultiplied(&self) -> bool {
        self.gpu.premultiplied()
    }
}
