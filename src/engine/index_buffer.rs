#[allow(unused_imports)]
use log::{debug, info, warn};

use web_sys::{WebGl2RenderingContext as Context, WebGlBuffer};
use zerocopy::AsBytes;

/// Primitive assembled from the indices of an index buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Primitive {
    Triangles,
    Lines,
}

impl Primitive {
    pub(crate) fn gl_mode(self) -> u32 {
        match self {
            Self::Triangles => Context::TRIANGLES,
            Self::Lines => Context::LINES,
        }
    }
}

/// Element array buffer of 32-bit vertex indices.
///
/// The buffer is not tied to a vertex array; it gets attached to whichever
/// vertex array is bound at draw time.
#[derive(Debug)]
pub struct IndexBuffer {
    gl: Context,
    handle: Option<WebGlBuffer>,
    len: usize,
}

impl IndexBuffer {
    pub fn new(gl: Context) -> Self {
        Self {
            gl,
            handle: None,
            len: 0,
        }
    }

    pub fn handle(&self) -> Option<&WebGlBuffer> {
        self.handle.as_ref()
    }

    /// Returns the number of indices in the buffer.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn invalidate(&mut self) {
        self.handle = None;
        self.len = 0;
    }

    pub fn upload(&mut self, indices: &[u32]) {
        if self.handle.is_none() {
            self.handle = self.gl.create_buffer();
        }

        // never leave a previously bound vertex array pointing at this buffer
        self.gl.bind_vertex_array(None);

        self.gl
            .bind_buffer(Context::ELEMENT_ARRAY_BUFFER, self.handle.as_ref());
        self.gl.buffer_data_with_u8_array(
            Context::ELEMENT_ARRAY_BUFFER,
            indices.as_bytes(),
            Context::STATIC_DRAW,
        );
        self.gl.bind_buffer(Context::ELEMENT_ARRAY_BUFFER, None);

        self.len = indices.len();
    }
}

impl Drop for IndexBuffer {
    fn drop(&mut self) {
        if let Some(buffer_handle) = &self.handle {
            self.gl.delete_buffer(Some(buffer_handle));
        }
    }
}
