#[allow(unused_imports)]
use log::{debug, info, warn};

use crate::{Color, RenderTarget};
use js_sys::{Array, Error};
use web_sys::{WebGl2RenderingContext as Context, WebGlFramebuffer, WebGlTexture};

pub trait AsAttachment {
    type Target: RenderTarget;

    fn as_attachment(&self) -> Option<&WebGlTexture>;

    fn attachment_dimensions(&self) -> (usize, usize);
}

#[derive(Debug)]
pub struct Framebuffer {
    gl: Context,
    handle: Option<WebGlFramebuffer>,
    cols: usize,
    rows: usize,
}

impl Framebuffer {
    pub fn new(gl: Context) -> Self {
        Self {
            gl,
            handle: None,
            cols: 0,
            rows: 0,
        }
    }

    pub fn handle(&self) -> Option<&WebGlFramebuffer> {
        self.handle.as_ref()
    }

    pub fn invalidate(&mut self) {
        self.handle = None;
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Recreates the framebuffer with the given color attachments.
    ///
    /// Fails if float color buffers aren't supported or if the driver does
    /// not report the resulting framebuffer as complete.
    pub fn rebuild(
        &mut self,
        attachments: &[&dyn AsAttachment<Target = Color>],
    ) -> Result<(), Error> {
        if let Err(_) | Ok(None) = self.gl.get_extension("EXT_color_buffer_float") {
            return Err(Error::new("extension `EXT_color_buffer_float' missing"));
        }

        assert!(!attachments.is_empty());

        let (cols, rows) = attachments[0].attachment_dimensions();

        if let Some(framebuffer_handle) = &self.handle {
            self.gl.delete_framebuffer(Some(framebuffer_handle));
        }

        self.handle = self.gl.create_framebuffer();

        self.gl
            .bind_framebuffer(Context::DRAW_FRAMEBUFFER, self.handle.as_ref());

        let array = Array::new();

        for (index, attachment) in attachments.iter().enumerate() {
            let (next_cols, next_rows) = attachment.attachment_dimensions();

            if (next_cols, next_rows) != (cols, rows) {
                panic!("inconsistent framebuffer attachment dimensions");
            }

            let attachment_index = Context::COLOR_ATTACHMENT0 + index as u32;

            self.gl.framebuffer_texture_2d(
                Context::DRAW_FRAMEBUFFER,
                attachment_index,
                Context::TEXTURE_2D,
                attachment.as_attachment(),
                0,
            );

            array.push(&attachment_index.into());
        }

        self.gl.draw_buffers(&array);

        let status = self.gl.check_framebuffer_status(Context::DRAW_FRAMEBUFFER);

        self.gl.bind_framebuffer(Context::DRAW_FRAMEBUFFER, None);

        if status != Context::FRAMEBUFFER_COMPLETE && !self.gl.is_context_lost() {
            return Err(Error::new(&format!(
                "framebuffer incomplete (status 0x{:04X})",
                status
            )));
        }

        self.cols = cols;
        self.rows = rows;

        Ok(())
    }
}

impl Drop for Framebuffer {
    fn drop(&mut self) {
        if let Some(framebuffer_handle) = &self.handle {
            self.gl.delete_framebuffer(Some(framebuffer_handle));
        }
    }
}
