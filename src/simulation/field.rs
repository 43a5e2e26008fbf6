use glam::Vec2;

/// Width and height of a simulation buffer, in texels. Never zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSize {
    pub width: u32,
    pub height: u32,
}

impl FieldSize {
    /// Build a size, clamping each axis to at least one texel
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
        }
    }

    pub fn texel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// Size of one texel in uv units
    pub fn texel(&self) -> Vec2 {
        Vec2::new(1.0 / self.width as f32, 1.0 / self.height as f32)
    }
}

/// Scalar ink density grid. Row 0 is the bottom row (v = 0).
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    size: FieldSize,
    data: Vec<f32>,
}

impl Field {
    /// Zero-initialized field
    pub fn new(size: FieldSize) -> Self {
        Self {
            size,
            data: vec![0.0; size.texel_count()],
        }
    }

    pub fn size(&self) -> FieldSize {
        self.size
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    pub fn fill(&mut self, value: f32) {
        self.data.fill(value);
    }

    pub fn get(&self, x: u32, y: u32) -> f32 {
        self.data[self.index(x, y)]
    }

    pub fn set(&mut self, x: u32, y: u32, value: f32) {
        let idx = self.index(x, y);
        self.data[idx] = value;
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.size.width as usize + x as usize
    }

    /// Nearest-texel lookup with clamp-to-edge addressing
    pub fn sample(&self, uv: Vec2) -> f32 {
        let x = texel_coord(uv.x, self.size.width);
        let y = texel_coord(uv.y, self.size.height);
        self.get(x, y)
    }

    /// Uv of the centre of texel (x, y)
    pub fn texel_center(&self, x: u32, y: u32) -> Vec2 {
        Vec2::new(
            (x as f32 + 0.5) / self.size.width as f32,
            (y as f32 + 0.5) / self.size.height as f32,
        )
    }

    pub fn max_value(&self) -> f32 {
        self.data.iter().copied().fold(0.0, f32::max)
    }
}

fn texel_coord(u: f32, extent: u32) -> u32 {
    let scaled = (u * extent as f32).floor();
    if scaled.is_nan() || scaled <= 0.0 {
        0
    } else {
        (scaled as u32).min(extent - 1)
    }
}

/// Two same-shaped buffers and a parity flag. Each tick reads one and writes
/// the other; `swap` flips the flag and never copies contents.
#[derive(Debug)]
pub struct PingPong<T> {
    /// Buffer A - ping
    pub a: T,
    /// Buffer B - pong
    pub b: T,
    /// Which buffer is the current input (true = A is input, false = B is input)
    read_from_a: bool,
}

impl<T> PingPong<T> {
    /// The first tick writes A
    pub fn new(a: T, b: T) -> Self {
        Self {
            a,
            b,
            read_from_a: false,
        }
    }

    /// Get (input, output) for the current tick
    pub fn io(&self) -> (&T, &T) {
        if self.read_from_a {
            (&self.a, &self.b)
        } else {
            (&self.b, &self.a)
        }
    }

    /// Get (input, output) for the current tick, output writable
    pub fn io_mut(&mut self) -> (&T, &mut T) {
        if self.read_from_a {
            (&self.a, &mut self.b)
        } else {
            (&self.b, &mut self.a)
        }
    }

    /// Buffer written by the last simulation pass, valid after `swap`
    pub fn latest(&self) -> &T {
        // After swap the freshly written buffer became the input side
        if self.read_from_a {
            &self.a
        } else {
            &self.b
        }
    }

    pub fn latest_mut(&mut self) -> &mut T {
        if self.read_from_a {
            &mut self.a
        } else {
            &mut self.b
        }
    }

    /// Flip roles after a simulation pass
    pub fn swap(&mut self) {
        self.read_from_a = !self.read_from_a;
    }
}
