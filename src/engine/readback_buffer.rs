#[allow(unused_imports)]
use log::{debug, info, warn};

use crate::Framebuffer;
use js_sys::Error;
use std::marker::PhantomData;
use std::mem::size_of;
use web_sys::{WebGl2RenderingContext as Context, WebGlBuffer};
use zerocopy::{AsBytes, FromBytes};

/// Pixel pack buffer used to copy framebuffer contents back to the host.
///
/// Reads are synchronous: `read_pixels` only returns once the GPU has
/// finished rendering into the framebuffer and the data has been copied.
#[derive(Debug)]
pub struct ReadbackBuffer<T: ?Sized> {
    gl: Context,
    handle: Option<WebGlBuffer>,
    pub len: usize,
    phantom: PhantomData<T>,
}

impl<T: AsBytes + FromBytes> ReadbackBuffer<[T]> {
    pub fn create(&mut self, len: usize) {
        if self.len != len || self.handle.is_none() {
            self.create_and_allocate(len * size_of::<T>());
            self.len = len;
        }
    }

    /// Reads a `cols` by `rows` RGBA float rectangle from the framebuffer.
    ///
    /// The rectangle is anchored at the framebuffer origin (bottom left) and
    /// `data` must hold exactly four elements per pixel.
    pub fn read_pixels(
        &mut self,
        framebuffer: &Framebuffer,
        attachment: usize,
        cols: usize,
        rows: usize,
        data: &mut [T],
    ) -> Result<(), Error> {
        assert_eq!(data.len(), cols * rows * 4, "readback size mismatch");
        assert!(data.len() <= self.len, "readback buffer too small");

        self.gl
            .bind_framebuffer(Context::READ_FRAMEBUFFER, framebuffer.handle());
        self.gl
            .read_buffer(Context::COLOR_ATTACHMENT0 + attachment as u32);

        self.gl
            .bind_buffer(Context::PIXEL_PACK_BUFFER, self.handle.as_ref());

        self.gl.read_pixels_with_i32(
            0,
            0,
            cols as i32,
            rows as i32,
            Context::RGBA,
            Context::FLOAT,
            0,
        )?;

        self.gl.bind_framebuffer(Context::READ_FRAMEBUFFER, None);

        // this stalls until the pack above has completed
        self.gl.get_buffer_sub_data_with_i32_and_u8_array(
            Context::PIXEL_PACK_BUFFER,
            0,
            data.as_bytes_mut(),
        );

        self.gl.bind_buffer(Context::PIXEL_PACK_BUFFER, None);

        Ok(())
    }
}

impl<T: ?Sized> ReadbackBuffer<T> {
    pub fn new(gl: Context) -> Self {
        Self {
            gl,
            handle: None,
            len: 0,
            phantom: PhantomData,
        }
    }

    pub fn invalidate(&mut self) {
        self.handle = None;
    }

    fn create_and_allocate(&mut self, size: usize) {
        if let Some(buffer_handle) = &self.handle {
            self.gl.delete_buffer(Some(buffer_handle));
        }

        self.handle = self.gl.create_buffer();

        self.gl
            .bind_buffer(Context::PIXEL_PACK_BUFFER, self.handle.as_ref());
        self.gl.buffer_data_with_i32(
            Context::PIXEL_PACK_BUFFER,
            size as i32,
            Context::STREAM_READ,
        );
        self.gl.bind_buffer(Context::PIXEL_PACK_BUFFER, None);
    }
}

impl<T: ?Sized> Drop for ReadbackBuffer<T> {
    fn drop(&mut self) {
        if let Some(buffer_handle) = &self.handle {
            self.gl.delete_buffer(Some(buffer_handle));
        }
    }
}

/// Compacts interleaved RGBA data into tightly packed RGB data in place.
///
/// Returns the number of elements making up the packed RGB prefix.
pub fn pack_rgba_to_rgb<T: Copy>(data: &mut [T]) -> usize {
    let pixels = data.len() / 4;

    for pixel in 0..pixels {
        data.copy_within(4 * pixel..4 * pixel + 3, 3 * pixel);
    }

    pixels * 3
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packs_rgba_pixels_into_rgb_prefix() {
        let mut data = [
            1.0, 2.0, 3.0, 1.0, //
            4.0, 5.0, 6.0, 1.0, //
            7.0, 8.0, 9.0, 1.0,
        ];

        let len = pack_rgba_to_rgb(&mut data);

        assert_eq!(len, 9);
        assert_eq!(&data[..len], &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0]);
    }

    #[test]
    fn packing_empty_data_is_a_no_op() {
        let mut data: [f32; 0] = [];

        assert_eq!(pack_rgba_to_rgb(&mut data), 0);
    }
}
