use std::ops::{Deref, DerefMut};

use crate::core::{PixelRect, SurfaceSize};
use crate::error::{TrendError, TrendResult};
use crate::render::{Color, color::blend_packed};

/// Fixed-size block of packed `0xAARRGGBB` pixels, row-major at `y * width + x`.
///
/// The public accessors are bounds-checked. Rasterizers address pixels by
/// index through the crate-internal `overwrite_at`/`blend_at` after clipping
/// their coordinates to the buffer, so the hot loops carry no extra checks
/// beyond slice indexing.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    pixels: Vec<u32>,
    generation: u64,
    dirty: Option<PixelRect>,
}

impl PixelBuffer {
    /// Creates an opaque black buffer.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        let size = SurfaceSize::new(width, height);
        Self {
            width,
            height,
            pixels: vec![Color::BLACK.packed(); size.pixel_count()],
            generation: 0,
            dirty: None,
        }
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[must_use]
    pub fn size(&self) -> SurfaceSize {
        SurfaceSize::new(self.width, self.height)
    }

    #[must_use]
    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    /// Pixel bytes in `B, G, R, A` order, the layout of 32-bit BGRA surfaces.
    #[must_use]
    pub fn to_bgra_bytes(&self) -> Vec<u8> {
        self.pixels
            .iter()
            .flat_map(|pixel| pixel.to_le_bytes())
            .collect()
    }

    /// Number of completed write scopes; changes whenever new content is displayable.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Area changed by write scopes since the last call; cleared on read.
    pub fn take_dirty_rect(&mut self) -> Option<PixelRect> {
        self.dirty.take()
    }

    #[must_use]
    pub fn pixel(&self, x: i32, y: i32) -> Option<Color> {
        self.index_of(x, y)
            .map(|index| Color::from_packed(self.pixels[index]))
    }

    /// Fills every pixel with `color` made opaque.
    pub fn clear(&mut self, color: Color) {
        self.pixels.fill(color.opaque().packed());
    }

    /// Copies every pixel of `source`, which must have the same size.
    pub fn fill_from(&mut self, source: &PixelBuffer) -> TrendResult<()> {
        if source.size() != self.size() {
            return Err(TrendError::SizeMismatch {
                expected_width: self.width,
                expected_height: self.height,
                width: source.width,
                height: source.height,
            });
        }
        self.pixels.copy_from_slice(&source.pixels);
        Ok(())
    }

    /// Overwrites one pixel with `color` made opaque.
    pub fn set_pixel(&mut self, x: i32, y: i32, color: Color) -> TrendResult<()> {
        let index = self.checked_index(x, y)?;
        self.overwrite_at(index, color.opaque().packed());
        Ok(())
    }

    /// Blends `color` over one pixel using the color's own alpha.
    pub fn draw_pixel(&mut self, x: i32, y: i32, color: Color) -> TrendResult<()> {
        let index = self.checked_index(x, y)?;
        self.blend_at(index, color.packed(), color.alpha());
        Ok(())
    }

    /// Starts an exclusive write scope.
    ///
    /// The display consumer may read the buffer again once the returned guard
    /// is dropped; dropping it also advances `generation`.
    pub fn lock(&mut self) -> PixelBufferLock<'_> {
        PixelBufferLock { buffer: self }
    }

    #[must_use]
    pub fn bounds(&self) -> PixelRect {
        self.size().bounds()
    }

    #[inline]
    pub(crate) fn pixels_mut(&mut self) -> &mut [u32] {
        &mut self.pixels
    }

    #[inline]
    pub(crate) fn overwrite_at(&mut self, index: usize, packed: u32) {
        self.pixels[index] = packed;
    }

    #[inline]
    pub(crate) fn blend_at(&mut self, index: usize, packed: u32, alpha: u8) {
        let pixel = &mut self.pixels[index];
        *pixel = blend_packed(*pixel, packed, alpha);
    }

    #[inline]
    pub(crate) fn row_stride(&self) -> usize {
        self.width as usize
    }

    fn index_of(&self, x: i32, y: i32) -> Option<usize> {
        let x = u32::try_from(x).ok().filter(|&x| x < self.width)?;
        let y = u32::try_from(y).ok().filter(|&y| y < self.height)?;
        Some(y as usize * self.width as usize + x as usize)
    }

    fn checked_index(&self, x: i32, y: i32) -> TrendResult<usize> {
        self.index_of(x, y).ok_or(TrendError::OutOfBounds {
            x,
            y,
            width: self.width,
            height: self.height,
        })
    }
}

/// Exclusive write scope over a buffer that is also used for display.
pub struct PixelBufferLock<'a> {
    buffer: &'a mut PixelBuffer,
}

impl PixelBufferLock<'_> {
    /// Records `rect` as changed so the consumer can limit its refresh.
    pub fn mark_dirty(&mut self, rect: PixelRect) {
        let rect = rect.intersect(self.buffer.bounds());
        if rect.is_empty() {
            return;
        }
        self.buffer.dirty = Some(match self.buffer.dirty {
            Some(existing) => existing.union(rect),
            None => rect,
        });
    }

    pub fn mark_all_dirty(&mut self) {
        let bounds = self.buffer.bounds();
        self.mark_dirty(bounds);
    }
}

impl Deref for PixelBufferLock<'_> {
    type Target = PixelBuffer;

    fn deref(&self) -> &Self::Target {
        self.buffer
    }
}

impl DerefMut for PixelBufferLock<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.buffer
    }
}

impl Drop for PixelBufferLock<'_> {
    fn drop(&mut self) {
        self.buffer.generation = self.buffer.generation.wrapping_add(1);
    }
}
