//! Reusable RGBA8 render surfaces.
//!
//! One surface is kept per clip by the frame resolution engine and reused
//! across frames; reallocation only happens when the clip's display size
//! changes.

/// An RGBA8 pixel surface in CPU memory.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderSurface {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl RenderSurface {
    /// Create a surface filled with transparent black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0u8; (width as usize) * (height as usize) * 4],
        }
    }

    /// Width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA bytes, row-major, no padding.
    #[inline]
    pub fn as_rgba(&self) -> &[u8] {
        &self.data
    }

    /// Resize if the requested size differs; contents are undefined after a
    /// resize. Returns true when a reallocation happened.
    pub fn ensure_size(&mut self, width: u32, height: u32) -> bool {
        if self.width == width && self.height == height {
            return false;
        }
        self.width = width;
        self.height = height;
        self.data = vec![0u8; (width as usize) * (height as usize) * 4];
        true
    }

    /// Fill the whole surface with a single color.
    pub fn fill(&mut self, rgba: [u8; 4]) {
        for px in self.data.chunks_exact_mut(4) {
            px.copy_from_slice(&rgba);
        }
    }

    /// Draw source pixels into the surface, nearest-neighbor scaled to cover
    /// it entirely. `src` must be tightly packed RGBA8 of `src_w * src_h`.
    pub fn draw_scaled(&mut self, src: &[u8], src_w: u32, src_h: u32) {
        if src_w == 0 || src_h == 0 || self.width == 0 || self.height == 0 {
            return;
        }
        debug_assert_eq!(src.len(), (src_w as usize) * (src_h as usize) * 4);

        for y in 0..self.height {
            let sy = (y as u64 * src_h as u64 / self.height as u64) as usize;
            let src_row = &src[sy * src_w as usize * 4..(sy + 1) * src_w as usize * 4];
            let dst_row = &mut self.data
                [y as usize * self.width as usize * 4..(y as usize + 1) * self.width as usize * 4];
            for x in 0..self.width as usize {
                let sx = (x as u64 * src_w as u64 / self.width as u64) as usize;
                dst_row[x * 4..x * 4 + 4].copy_from_slice(&src_row[sx * 4..sx * 4 + 4]);
            }
        }
    }
}
