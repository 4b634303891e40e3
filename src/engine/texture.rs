#[allow(unused_imports)]
use log::{debug, info, warn};

use crate::{AsAttachment, AsBindTarget, BindTarget};
use js_sys::{Error, Float32Array, Object};
use std::marker::PhantomData;
use web_sys::{WebGl2RenderingContext as Context, WebGlTexture};

pub trait Boolean {
    const VALUE: bool;
}

pub struct True;
pub struct False;

impl Boolean for True {
    const VALUE: bool = true;
}
impl Boolean for False {
    const VALUE: bool = false;
}

pub trait RenderTarget {}

pub struct Color;
pub struct NotRenderable;

impl RenderTarget for Color {}
impl RenderTarget for NotRenderable {}

/// Texture target a texture handle should be bound to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextureKind {
    Texture2D,
    CubeMap,
}

impl TextureKind {
    pub(crate) fn gl_target(self) -> u32 {
        match self {
            Self::Texture2D => Context::TEXTURE_2D,
            Self::CubeMap => Context::TEXTURE_CUBE_MAP,
        }
    }
}

#[derive(Debug)]
pub struct Texture<T> {
    gl: Context,

    handle: Option<WebGlTexture>,
    layout: (usize, usize),
    format: PhantomData<T>,
}

impl<T> Texture<T> {
    pub fn new(gl: Context) -> Self {
        Self {
            gl,
            handle: None,
            layout: (0, 0),
            format: PhantomData,
        }
    }

    pub fn cols(&self) -> usize {
        self.layout.0
    }

    pub fn rows(&self) -> usize {
        self.layout.1
    }

    pub fn invalidate(&mut self) {
        self.layout = (0, 0);
        self.handle = None;
    }

    fn create_texture(&mut self, cols: usize, rows: usize) -> bool {
        assert!(cols > 0 && rows > 0, "invalid texture layout requested");

        if self.layout != (cols, rows) || self.handle.is_none() {
            if let Some(texture_handle) = &self.handle {
                self.gl.delete_texture(Some(texture_handle));
            }

            self.handle = self.gl.create_texture();
            self.layout = (cols, rows);

            false
        } else {
            true
        }
    }
}

impl<T: TextureFormat> Texture<T> {
    pub fn create(&mut self, cols: usize, rows: usize) {
        if self.create_texture(cols, rows) {
            return; // texture already created
        }

        self.gl
            .bind_texture(Context::TEXTURE_2D, self.handle.as_ref());

        self.gl.tex_storage_2d(
            Context::TEXTURE_2D,
            1,
            T::GL_INTERNAL_FORMAT,
            cols as i32,
            rows as i32,
        );

        let filter = filter_mode_for_format::<T>();

        self.gl
            .tex_parameteri(Context::TEXTURE_2D, Context::TEXTURE_MAG_FILTER, filter);
        self.gl
            .tex_parameteri(Context::TEXTURE_2D, Context::TEXTURE_MIN_FILTER, filter);

        self.gl.tex_parameteri(
            Context::TEXTURE_2D,
            Context::TEXTURE_WRAP_S,
            Context::CLAMP_TO_EDGE as i32,
        );

        self.gl.tex_parameteri(
            Context::TEXTURE_2D,
            Context::TEXTURE_WRAP_T,
            Context::CLAMP_TO_EDGE as i32,
        );
    }

    pub fn upload(&mut self, cols: usize, rows: usize, data: &[T::Data]) -> Result<(), Error> {
        self.create(cols, rows);

        self.gl
            .bind_texture(Context::TEXTURE_2D, self.handle.as_ref());

        self.gl
            .tex_sub_image_2d_with_i32_and_i32_and_u32_and_type_and_opt_array_buffer_view(
                Context::TEXTURE_2D,
                0,
                0,
                0,
                cols as i32,
                rows as i32,
                T::GL_FORMAT,
                T::GL_TYPE,
                Some(&T::into_texture_source_data(cols, rows, data)),
            )?;

        Ok(())
    }
}

impl<T: TextureFormat> AsAttachment for Texture<T> {
    type Target = T::Renderable;

    fn as_attachment(&self) -> Option<&WebGlTexture> {
        self.handle.as_ref()
    }

    fn attachment_dimensions(&self) -> (usize, usize) {
        (self.cols(), self.rows())
    }
}

impl<T> AsBindTarget for Texture<T> {
    fn bind_target(&self) -> BindTarget {
        BindTarget::Texture(self.handle.as_ref(), TextureKind::Texture2D)
    }
}

impl<T> Drop for Texture<T> {
    fn drop(&mut self) {
        if let Some(texture_handle) = &self.handle {
            self.gl.delete_texture(Some(texture_handle));
        }
    }
}

/// Mipmapped cube texture with square faces.
///
/// Storage for every face and level is allocated up front; the faces are
/// then filled in one level at a time with `upload_face`.
#[derive(Debug)]
pub struct CubeTexture<T> {
    gl: Context,

    handle: Option<WebGlTexture>,
    layout: (usize, usize),
    format: PhantomData<T>,
}

impl<T> CubeTexture<T> {
    pub fn new(gl: Context) -> Self {
        Self {
            gl,
            handle: None,
            layout: (0, 0),
            format: PhantomData,
        }
    }

    /// Returns the resolution of the base level.
    pub fn size(&self) -> usize {
        self.layout.0
    }

    pub fn levels(&self) -> usize {
        self.layout.1
    }

    pub fn invalidate(&mut self) {
        self.layout = (0, 0);
        self.handle = None;
    }
}

impl<T: TextureFormat> CubeTexture<T> {
    pub fn create(&mut self, size: usize, levels: usize) {
        assert!(size > 0 && levels > 0, "invalid cube texture layout requested");

        if self.layout == (size, levels) && self.handle.is_some() {
            return; // texture already created
        }

        // immutable storage can't be resized so always start over
        if let Some(texture_handle) = &self.handle {
            self.gl.delete_texture(Some(texture_handle));
        }

        self.handle = self.gl.create_texture();
        self.layout = (size, levels);

        self.gl
            .bind_texture(Context::TEXTURE_CUBE_MAP, self.handle.as_ref());

        self.gl.tex_storage_2d(
            Context::TEXTURE_CUBE_MAP,
            levels as i32,
            T::GL_INTERNAL_FORMAT,
            size as i32,
            size as i32,
        );
    }

    pub fn upload_face(
        &mut self,
        face: usize,
        level: usize,
        size: usize,
        data: &[T::Data],
    ) -> Result<(), Error> {
        assert!(face < 6, "cube textures only have six faces");
        assert!(level < self.levels(), "mip level out of range");
        assert_eq!(size, (self.size() >> level).max(1), "mip level size mismatch");

        self.gl
            .bind_texture(Context::TEXTURE_CUBE_MAP, self.handle.as_ref());

        self.gl
            .tex_sub_image_2d_with_i32_and_i32_and_u32_and_type_and_opt_array_buffer_view(
                Context::TEXTURE_CUBE_MAP_POSITIVE_X + face as u32,
                level as i32,
                0,
                0,
                size as i32,
                size as i32,
                T::GL_FORMAT,
                T::GL_TYPE,
                Some(&T::into_texture_source_data(size, size, data)),
            )?;

        Ok(())
    }

    /// Configures trilinear sampling across the whole mip chain.
    ///
    /// Cube map filtering is always seamless in WebGL2, samples near an edge
    /// are taken from the neighbouring face without any extra state.
    pub fn set_mipmap_sampling(&mut self) {
        let target = Context::TEXTURE_CUBE_MAP;

        self.gl.bind_texture(target, self.handle.as_ref());

        for &wrap in &[
            Context::TEXTURE_WRAP_S,
            Context::TEXTURE_WRAP_T,
            Context::TEXTURE_WRAP_R,
        ] {
            self.gl
                .tex_parameteri(target, wrap, Context::CLAMP_TO_EDGE as i32);
        }

        let (min_filter, mag_filter) = if T::Filterable::VALUE {
            (Context::LINEAR_MIPMAP_LINEAR, Context::LINEAR)
        } else {
            (Context::NEAREST_MIPMAP_NEAREST, Context::NEAREST)
        };

        self.gl
            .tex_parameteri(target, Context::TEXTURE_MIN_FILTER, min_filter as i32);
        self.gl
            .tex_parameteri(target, Context::TEXTURE_MAG_FILTER, mag_filter as i32);

        self.gl.tex_parameteri(target, Context::TEXTURE_BASE_LEVEL, 0);
        self.gl.tex_parameteri(
            target,
            Context::TEXTURE_MAX_LEVEL,
            self.levels() as i32 - 1,
        );
    }
}

impl<T> AsBindTarget for CubeTexture<T> {
    fn bind_target(&self) -> BindTarget {
        BindTarget::Texture(self.handle.as_ref(), TextureKind::CubeMap)
    }
}

impl<T> Drop for CubeTexture<T> {
    fn drop(&mut self) {
        if let Some(texture_handle) = &self.handle {
            self.gl.delete_texture(Some(texture_handle));
        }
    }
}

fn filter_mode_for_format<T: TextureFormat>() -> i32 {
    if T::Filterable::VALUE {
        Context::LINEAR as i32
    } else {
        Context::NEAREST as i32
    }
}

pub trait TextureFormat {
    type Data;

    type Filterable: Boolean;
    type Renderable: RenderTarget;

    const GL_INTERNAL_FORMAT: u32;
    const GL_FORMAT: u32;
    const GL_TYPE: u32;

    /// Number of `Data` elements per texel in uploaded data.
    const CHANNELS: usize;

    fn into_texture_source_data(cols: usize, rows: usize, data: &[Self::Data]) -> Object;
}

#[derive(Debug)]
pub struct RGBA32F;
#[derive(Debug)]
pub struct RGB16F;

impl TextureFormat for RGBA32F {
    type Data = f32;

    type Filterable = False;
    type Renderable = Color;

    const GL_INTERNAL_FORMAT: u32 = Context::RGBA32F;
    const GL_FORMAT: u32 = Context::RGBA;
    const GL_TYPE: u32 = Context::FLOAT;

    const CHANNELS: usize = 4;

    fn into_texture_source_data(cols: usize, rows: usize, data: &[Self::Data]) -> Object {
        assert!(data.len() == cols * rows * Self::CHANNELS);

        Float32Array::from(data).into()
    }
}

// Half-float storage fed from full-precision RGB data; this is the only
// filterable float format which doesn't need OES_texture_float_linear.
impl TextureFormat for RGB16F {
    type Data = f32;

    type Filterable = True;
    type Renderable = NotRenderable;

    const GL_INTERNAL_FORMAT: u32 = Context::RGB16F;
    const GL_FORMAT: u32 = Context::RGB;
    const GL_TYPE: u32 = Context::FLOAT;

    const CHANNELS: usize = 3;

    fn into_texture_source_data(cols: usize, rows: usize, data: &[Self::Data]) -> Object {
        assert!(data.len() == cols * rows * Self::CHANNELS);

        Float32Array::from(data).into()
    }
}
