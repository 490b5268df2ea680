use crate::error::{Error, Result};

/// Largest value of the 5-bit global brightness field.
pub const MAX_BRIGHTNESS5: u8 = 31;

/// One LED entry, fields in wire order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Pixel {
    pub brightness5: u8,
    pub blue: u8,
    pub green: u8,
    pub red: u8,
}

/// Quantize a brightness in [0.0, 1.0] to the 5-bit field.
///
/// Out-of-range input is clamped first and the scaled value is truncated,
/// so `0.2` maps to `6` and `1.0` to `31`. NaN maps to `0`.
pub fn quantize_brightness(brightness: f32) -> u8 {
    let clamped = brightness.clamp(0.0, 1.0);
    // `as` saturates and sends NaN to zero
    (clamped * MAX_BRIGHTNESS5 as f32) as u8
}

/// Fixed-size pixel store, zeroed ("all off") on creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    pixels: Box<[Pixel]>,
}

impl PixelBuffer {
    pub fn new(led_count: usize) -> Self {
        PixelBuffer {
            pixels: vec![Pixel::default(); led_count].into_boxed_slice(),
        }
    }

    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Store a color and quantized brightness at `index`.
    ///
    /// The buffer is untouched when `index` is out of range.
    pub fn set(&mut self, index: usize, red: u8, green: u8, blue: u8, brightness: f32) -> Result<()> {
        let len = self.pixels.len();
        let pixel = self
            .pixels
            .get_mut(index)
            .ok_or(Error::IndexOutOfRange { index, len })?;

        *pixel = Pixel {
            brightness5: quantize_brightness(brightness),
            blue,
            green,
            red,
        };

        Ok(())
    }

    /// Store the same color and brightness in every entry.
    pub fn fill(&mut self, red: u8, green: u8, blue: u8, brightness: f32) {
        let pixel = Pixel {
            brightness5: quantize_brightness(brightness),
            blue,
            green,
            red,
        };
        self.pixels.iter_mut().for_each(|p| *p = pixel);
    }

    pub fn clear(&mut self) {
        self.pixels.fill(Pixel::default());
    }

    pub(crate) fn pixels(&self) -> &[Pixel] {
        &self.pixels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_buffer_is_dark() {
        let buffer = PixelBuffer::new(8);
        assert_eq!(buffer.len(), 8);
        assert!(buffer.pixels().iter().all(|p| *p == Pixel::default()));
    }

    #[test]
    fn test_set_stores_fields() {
        let mut buffer = PixelBuffer::new(8);
        buffer.set(5, 10, 20, 30, 0.5).unwrap();

        assert_eq!(
            buffer.pixels()[5],
            Pixel { brightness5: 15, blue: 30, green: 20, red: 10 }
        );
    }

    #[test]
    fn test_quantization_boundaries() {
        assert_eq!(quantize_brightness(1.0), 31);
        assert_eq!(quantize_brightness(0.0), 0);
        assert_eq!(quantize_brightness(-1.0), 0);
        assert_eq!(quantize_brightness(2.0), 31);
        assert_eq!(quantize_brightness(0.2), 6);
        assert_eq!(quantize_brightness(0.99), 30);
        assert_eq!(quantize_brightness(f32::NAN), 0);
    }

    #[test]
    fn test_out_of_range_leaves_buffer_unchanged() {
        let mut buffer = PixelBuffer::new(8);
        buffer.set(0, 1, 2, 3, 1.0).unwrap();
        let before = buffer.clone();

        for index in [8, 9, usize::MAX] {
            let err = buffer.set(index, 255, 255, 255, 1.0).unwrap_err();
            assert!(matches!(err, Error::IndexOutOfRange { index: i, len: 8 } if i == index));
        }

        assert_eq!(buffer, before);
        assert_eq!(buffer.pixels()[0], Pixel { brightness5: 31, blue: 3, green: 2, red: 1 });
    }

    #[test]
    fn test_clear_zeroes_everything() {
        let mut buffer = PixelBuffer::new(4);
        for i in 0..4 {
            buffer.set(i, 255, 128, 64, 0.7).unwrap();
        }
        buffer.clear();
        assert_eq!(buffer, PixelBuffer::new(4));
    }

    #[test]
    fn test_fill_sets_every_entry() {
        let mut buffer = PixelBuffer::new(5);
        buffer.fill(1, 2, 3, 2.0);

        let expected = Pixel { brightness5: 31, blue: 3, green: 2, red: 1 };
        assert!(buffer.pixels().iter().all(|p| *p == expected));
    }

    #[test]
    fn test_last_write_wins() {
        let mut buffer = PixelBuffer::new(8);
        buffer.set(3, 255, 0, 0, 1.0).unwrap();
        buffer.set(3, 0, 255, 0, 0.0).unwrap();
        assert_eq!(buffer.pixels()[3], Pixel { brightness5: 0, blue: 0, green: 255, red: 0 });
    }
}
