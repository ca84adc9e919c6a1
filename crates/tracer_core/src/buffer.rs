//! Flat storage addressable by linear index or by (x, y) coordinate.
//!
//! A `Buffer` backs the output image, the per-pixel history values and the
//! vertex/index data of each mesh. Its element count is fixed at
//! construction.

use std::mem;

/// A contiguous, fixed-size sequence of `T`.
///
/// Created either in 1D mode (`stride == 0`, only linear indexing is valid)
/// or in 2D mode (`stride == width`, element `(x, y)` lives at
/// `y * stride + x`).
///
/// Indexing outside the buffer is a caller error. Debug builds assert on the
/// coordinates; release builds still stop at the slice bounds check.
#[derive(Clone, Debug, PartialEq)]
pub struct Buffer<T> {
    data: Vec<T>,
    stride: usize,
}

impl<T: Clone + Default> Buffer<T> {
    /// Create a 1D buffer of `size` default elements.
    pub fn new(size: usize) -> Self {
        Self {
            data: vec![T::default(); size],
            stride: 0,
        }
    }

    /// Create a 2D buffer of `width * height` default elements.
    pub fn new_2d(width: usize, height: usize) -> Self {
        Self {
            data: vec![T::default(); width * height],
            stride: width,
        }
    }
}

impl<T> Buffer<T> {
    /// Wrap existing data as a 1D buffer.
    pub fn from_vec(data: Vec<T>) -> Self {
        Self { data, stride: 0 }
    }

    /// Mutable access by linear index.
    #[inline]
    pub fn item(&mut self, i: usize) -> &mut T {
        debug_assert!(i < self.data.len(), "index {i} out of range {}", self.data.len());
        &mut self.data[i]
    }

    /// Mutable access by 2D coordinate. Only valid for 2D buffers.
    #[inline]
    pub fn item_xy(&mut self, x: usize, y: usize) -> &mut T {
        let i = self.offset(x, y);
        &mut self.data[i]
    }

    /// Shared access by linear index.
    #[inline]
    pub fn get(&self, i: usize) -> &T {
        debug_assert!(i < self.data.len(), "index {i} out of range {}", self.data.len());
        &self.data[i]
    }

    /// Shared access by 2D coordinate. Only valid for 2D buffers.
    #[inline]
    pub fn get_xy(&self, x: usize, y: usize) -> &T {
        &self.data[self.offset(x, y)]
    }

    #[inline]
    fn offset(&self, x: usize, y: usize) -> usize {
        debug_assert!(self.stride > 0, "2D access on a 1D buffer");
        debug_assert!(x < self.stride, "x = {x} out of range {}", self.stride);
        debug_assert!(y < self.height(), "y = {y} out of range {}", self.height());
        y * self.stride + x
    }

    /// Total number of elements.
    pub fn count(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Size of the stored data in bytes.
    pub fn size_bytes(&self) -> usize {
        self.data.len() * mem::size_of::<T>()
    }

    /// Row stride in elements; 0 for 1D buffers.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Width in elements (the element count for 1D buffers).
    pub fn width(&self) -> usize {
        if self.stride == 0 {
            self.data.len()
        } else {
            self.stride
        }
    }

    /// Height in rows (1 for 1D buffers).
    pub fn height(&self) -> usize {
        if self.stride == 0 {
            1
        } else {
            self.data.len() / self.stride
        }
    }

    /// Raw contiguous storage, e.g. for encoding to an image format.
    pub fn get_data(&self) -> &[T] {
        &self.data
    }

    pub fn get_data_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.data.iter()
    }
}

impl<T: Clone> Buffer<T> {
    /// Overwrite every element with `value`.
    pub fn fill(&mut self, value: T) {
        self.data.fill(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_1d_buffer() {
        let mut buffer: Buffer<u32> = Buffer::new(6);

        assert_eq!(buffer.count(), 6);
        assert_eq!(buffer.stride(), 0);
        assert_eq!(buffer.height(), 1);
        assert_eq!(buffer.size_bytes(), 24);

        *buffer.item(4) = 7;
        assert_eq!(*buffer.get(4), 7);
        assert_eq!(buffer.get_data(), &[0, 0, 0, 0, 7, 0]);
    }

    #[test]
    fn test_2d_indexing_is_row_major() {
        let mut buffer: Buffer<u32> = Buffer::new_2d(4, 3);

        assert_eq!(buffer.count(), 12);
        assert_eq!(buffer.stride(), 4);
        assert_eq!(buffer.width(), 4);
        assert_eq!(buffer.height(), 3);

        *buffer.item_xy(1, 2) = 9;
        assert_eq!(*buffer.get(2 * 4 + 1), 9);
        assert_eq!(*buffer.get_xy(1, 2), 9);
    }

    #[test]
    fn test_fill() {
        let mut buffer: Buffer<f32> = Buffer::new_2d(2, 2);
        buffer.fill(0.5);
        assert!(buffer.iter().all(|&v| v == 0.5));
    }

    #[test]
    fn test_from_vec() {
        let buffer = Buffer::from_vec(vec![0u32, 1, 2]);
        assert_eq!(buffer.count(), 3);
        assert_eq!(buffer.stride(), 0);
    }

    #[test]
    #[should_panic]
    fn test_out_of_range_panics() {
        let mut buffer: Buffer<u8> = Buffer::new(2);
        *buffer.item(2) = 1;
    }
}
