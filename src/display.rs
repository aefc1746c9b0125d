pub const WIDTH: usize = 64;
pub const HEIGHT: usize = 32;

/// The 64x32 monochrome grid, indexed `[row][column]`.
#[derive(Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    bit_buffer: [[bool; WIDTH]; HEIGHT],
}

impl FrameBuffer {
    pub fn new() -> Self {
        Self {
            bit_buffer: [[false; WIDTH]; HEIGHT],
        }
    }

    pub fn clear_buffer(&mut self) {
        self.bit_buffer = [[false; WIDTH]; HEIGHT];
    }

    pub fn is_set(&self, x: usize, y: usize) -> bool {
        self.bit_buffer
            .get(y)
            .and_then(|row| row.get(x))
            .copied()
            .unwrap_or(false)
    }

    pub fn rows(&self) -> &[[bool; WIDTH]; HEIGHT] {
        &self.bit_buffer
    }

    pub fn is_blank(&self) -> bool {
        self.bit_buffer.iter().flatten().all(|&px| !px)
    }

    /// XOR `sprite` onto the grid with its top-left corner at (x, y).
    ///
    /// Each byte is one row, most significant bit leftmost. Pixels past the
    /// right or bottom edge are dropped. Returns true if any lit pixel was
    /// turned off.
    pub fn paint(&mut self, x: u8, y: u8, sprite: &[u8]) -> bool {
        let mut collision = false;
        for (i, row) in sprite.iter().enumerate() {
            let ny = y as usize + i;
            if ny >= HEIGHT {
                break;
            }
            for j in 0..8 {
                let nx = x as usize + j;
                if nx >= WIDTH {
                    break;
                }
                let bit = (row >> (7 - j)) & 1 == 1;
                let pixel = &mut self.bit_buffer[ny][nx];
                // collision is judged on the old pixel, before the xor
                collision |= *pixel && bit;
                *pixel ^= bit;
            }
        }
        collision
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for FrameBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in &self.bit_buffer {
            let line: String = row.iter().map(|&px| if px { '#' } else { '.' }).collect();
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}
