use crate::error::InkError;
use crate::scheduler::{InkBackend, Viewport};
use crate::simulation::dither::dither;
use crate::simulation::field::{Field, FieldSize, PingPong};
use crate::simulation::params::{DitherParams, SimParams};
use crate::simulation::stage::advance;

/// Reference backend: both stages on the CPU into plain buffers. Used by
/// tests and by hosts that composite the frame themselves.
#[derive(Debug, Default)]
pub struct CpuBackend {
    fields: Option<PingPong<Field>>,
    /// Surface width and height in device pixels
    surface: (usize, usize),
    mask: Vec<u8>,
    frame: Vec<[u8; 4]>,
    presented: u64,
    releases: u32,
}

impl CpuBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Field written by the most recent tick, if mounted
    pub fn field(&self) -> Option<&Field> {
        self.fields.as_ref().map(PingPong::latest)
    }

    /// Mutable access to the field the next tick reads from
    pub fn field_mut(&mut self) -> Option<&mut Field> {
        self.fields.as_mut().map(PingPong::latest_mut)
    }

    /// Mask bits of the last dithered frame, row 0 at the bottom
    pub fn mask(&self) -> &[u8] {
        &self.mask
    }

    /// Straight-alpha RGBA of the last dithered frame, row 0 at the bottom
    pub fn frame(&self) -> &[[u8; 4]] {
        &self.frame
    }

    pub fn surface_size(&self) -> (usize, usize) {
        self.surface
    }

    pub fn presented_frames(&self) -> u64 {
        self.presented
    }

    pub fn release_count(&self) -> u32 {
        self.releases
    }
}

impl InkBackend for CpuBackend {
    fn allocate(&mut self, field: FieldSize, viewport: &Viewport) -> Result<(), InkError> {
        self.fields = Some(PingPong::new(Field::new(field), Field::new(field)));

        let width = viewport.width().max(1) as usize;
        let height = viewport.height().max(1) as usize;
        self.surface = (width, height);
        self.mask = vec![0; width * height];
        self.frame = vec![[0; 4]; width * height];
        Ok(())
    }

    fn advance(&mut self, params: &SimParams) -> Result<(), InkError> {
        if let Some(fields) = self.fields.as_mut() {
            let (read, write) = fields.io_mut();
            advance(read, write, params);
        }
        Ok(())
    }

    fn swap(&mut self) {
        if let Some(fields) = self.fields.as_mut() {
            fields.swap();
        }
    }

    fn dither(&mut self, params: &DitherParams) -> Result<(), InkError> {
        if let Some(fields) = self.fields.as_ref() {
            dither(fields.latest(), params, &mut self.mask, &mut self.frame);
        }
        Ok(())
    }

    fn present(&mut self) -> Result<(), InkError> {
        self.presented += 1;
        Ok(())
    }

    fn release(&mut self) {
        self.fields = None;
        self.mask = Vec::new();
        self.frame = Vec::new();
        self.releases += 1;
    }
}
