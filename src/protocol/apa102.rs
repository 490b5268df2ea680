use crate::pixel_buffer::Pixel;

/// Start frame: 32 zero bits reset the first LED's frame counter.
pub const START_FRAME: [u8; 4] = [0x00; 4];

/// Top three bits of every LED frame's first byte.
pub const LED_FRAME_MARKER: u8 = 0xE0;

pub const BYTES_PER_LED: usize = 4;

/// End frame length used for any chain of up to 64 LEDs.
pub const MIN_END_FRAME_LEN: usize = 4;

const END_FRAME_BYTE: u8 = 0xFF;

/// Number of `0xFF` bytes closing a frame for `led_count` LEDs.
///
/// Each LED delays the data by half a clock, so the chain needs at least
/// `led_count / 2` extra clock pulses. Never shorter than 4 bytes.
pub fn end_frame_len(led_count: usize) -> usize {
    MIN_END_FRAME_LEN.max(led_count.div_ceil(16))
}

/// Total wire length of one frame for `led_count` LEDs.
pub fn frame_len(led_count: usize) -> usize {
    START_FRAME.len() + led_count * BYTES_PER_LED + end_frame_len(led_count)
}

/// Build a complete APA102 frame
pub fn build_apa102_frame(pixels: &[Pixel]) -> Vec<u8> {
    let mut frame = Vec::with_capacity(frame_len(pixels.len()));

    frame.extend_from_slice(&START_FRAME);

    // LED frames: 111bbbbb, blue, green, red
    for pixel in pixels {
        frame.push(LED_FRAME_MARKER | (pixel.brightness5 & 0x1F));
        frame.push(pixel.blue);
        frame.push(pixel.green);
        frame.push(pixel.red);
    }

    frame.resize(frame.len() + end_frame_len(pixels.len()), END_FRAME_BYTE);

    frame
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dark_frame_for_eight_leds() {
        let frame = build_apa102_frame(&[Pixel::default(); 8]);

        let mut expected = vec![0x00; 4];
        for _ in 0..8 {
            expected.extend_from_slice(&[0xE0, 0x00, 0x00, 0x00]);
        }
        expected.extend_from_slice(&[0xFF; 4]);

        assert_eq!(frame, expected);
    }

    #[test]
    fn test_led_frame_field_order() {
        let pixel = Pixel { brightness5: 17, blue: 0x0B, green: 0x06, red: 0x0F };
        let frame = build_apa102_frame(&[pixel]);
        assert_eq!(&frame[4..8], &[0xF1, 0x0B, 0x06, 0x0F]);
    }

    #[test]
    fn test_frame_length_and_framing() {
        for led_count in [0, 1, 8, 33, 64] {
            let pixel = Pixel { brightness5: 31, blue: 0xFF, green: 0xFF, red: 0xFF };
            let frame = build_apa102_frame(&vec![pixel; led_count]);

            assert_eq!(frame.len(), 4 + 4 * led_count + 4);
            assert_eq!(frame.len(), frame_len(led_count));
            assert_eq!(&frame[..4], &[0x00; 4]);
            assert_eq!(&frame[frame.len() - 4..], &[0xFF; 4]);
        }
    }

    #[test]
    fn test_end_frame_grows_for_long_chains() {
        assert_eq!(end_frame_len(8), 4);
        assert_eq!(end_frame_len(64), 4);
        assert_eq!(end_frame_len(65), 5);
        assert_eq!(end_frame_len(100), 7);

        let frame = build_apa102_frame(&vec![Pixel::default(); 100]);
        assert_eq!(frame.len(), 4 + 400 + 7);
        assert!(frame[404..].iter().all(|&b| b == 0xFF));
    }
}
