use everyday_core::{BYTES_PER_PIXEL, OffscreenBufferView};

/// Fill the buffer with a gradient: blue follows `x`, green follows `y`.
///
/// Both channels wrap at 256, so the offsets scroll the pattern.
pub fn render_gradient(buffer: &mut OffscreenBufferView<'_>, blue_offset: i32, green_offset: i32) {
    for (y, row) in buffer.rows_mut() {
        let green = (y as i32).wrapping_add(green_offset) as u8;
        for (x, pixel) in row.chunks_exact_mut(BYTES_PER_PIXEL).enumerate() {
            let blue = (x as i32).wrapping_add(blue_offset) as u8;
            let value = (u32::from(green) << 8) | u32::from(blue);
            pixel.copy_from_slice(&value.to_le_bytes());
        }
    }
}
