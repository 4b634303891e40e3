use js_sys::Error;
use web_sys::WebGl2RenderingContext as Context;

use crate::*;

#[derive(Debug)]
pub struct Device {
    pub(crate) gl: Context,

    pub(crate) bake_shader: Shader,
    pub(crate) display_shader: Shader,

    pub(crate) envmap_texture: Texture<RGB16F>,

    // Offscreen target every face and level is rendered into before readback
    pub(crate) bake_target: Texture<RGBA32F>,
    pub(crate) bake_fbo: Framebuffer,
    pub(crate) bake_readback: ReadbackBuffer<[f32]>,

    pub(crate) screen_quad: VertexArray<[QuadVertex]>,
    pub(crate) screen_quad_indices: IndexBuffer,

    pub(crate) sphere_vertices: VertexArray<[SphereVertex]>,
    pub(crate) sphere_triangles: IndexBuffer,
    pub(crate) sphere_edges: IndexBuffer,

    pub(crate) cubemap: CubeTexture<RGB16F>,
    pub(crate) mip_chain: MipChain,

    pub(crate) allocator: Allocator,

    device_lost: bool,
}

impl Device {
    /// Creates a new device using a WebGL2 context.
    pub fn new(gl: &Context) -> Result<Self, Error> {
        Ok(Self {
            gl: gl.clone(),
            bake_shader: Shader::new(gl.clone(), &shader::VS_CUBEMAP, &shader::FS_CUBEMAP),
            display_shader: Shader::new(gl.clone(), &shader::VS_SPHERE, &shader::FS_ENVMAP),
            envmap_texture: Texture::new(gl.clone()),
            bake_target: Texture::new(gl.clone()),
            bake_fbo: Framebuffer::new(gl.clone()),
            bake_readback: ReadbackBuffer::new(gl.clone()),
            screen_quad: VertexArray::new(gl.clone()),
            screen_quad_indices: IndexBuffer::new(gl.clone()),
            sphere_vertices: VertexArray::new(gl.clone()),
            sphere_triangles: IndexBuffer::new(gl.clone()),
            sphere_edges: IndexBuffer::new(gl.clone()),
            cubemap: CubeTexture::new(gl.clone()),
            mip_chain: MipChain::new(0, 0),
            allocator: Allocator::new(),
            device_lost: true,
        })
    }

    /// Signals the context was lost.
    pub fn context_lost(&mut self) {
        self.device_lost = true;
    }

    /// Number of prefiltered levels in the current cube map.
    pub fn baked_levels(&self) -> usize {
        self.mip_chain.len()
    }

    /// Face resolution of the current cube map's first level.
    pub fn cubemap_resolution(&self) -> usize {
        self.mip_chain.base_resolution()
    }

    /// Updates this device to render a given scene or returns an error.
    ///
    /// Returns whether the cube map was baked again during this update.
    pub fn update(&mut self, scene: &mut Scene) -> Result<bool, Error> {
        if self.device_lost && !self.try_restore(scene)? {
            return Ok(false); // context currently lost
        }

        self.bake_shader.rebuild()?;
        self.display_shader.rebuild()?;

        Dirty::clean(&mut scene.sphere, |sphere| self.update_sphere(sphere))?;

        let assets = &scene.assets;

        let rebaked = Dirty::clean(&mut scene.environment, |environment| {
            self.update_environment(assets, environment)
        })?;

        self.allocator.shrink_to_watermark();

        Ok(rebaked)
    }

    /// Renders one frame of the viewer into the context's canvas.
    pub fn render(&mut self, state: &ViewerState, scene: &Scene) -> Result<(), Error> {
        if self.device_lost {
            return Ok(());
        }

        self.render_sphere(state, scene);

        Ok(())
    }

    fn try_restore(&mut self, scene: &mut Scene) -> Result<bool, Error> {
        if self.gl.is_context_lost() {
            return Ok(false);
        }

        self.bake_shader.invalidate();
        self.display_shader.invalidate();
        self.envmap_texture.invalidate();
        self.bake_target.invalidate();
        self.bake_fbo.invalidate();
        self.bake_readback.invalidate();
        self.screen_quad.invalidate();
        self.screen_quad_indices.invalidate();
        self.sphere_vertices.invalidate();
        self.sphere_triangles.invalidate();
        self.sphere_edges.invalidate();
        self.cubemap.invalidate();

        scene.dirty_all_fields();
        self.device_lost = false;

        Ok(true)
    }
}
