#[allow(unused_imports)]
use log::{debug, error, info, warn};

use crate::{shader::ShaderInfo, Framebuffer, IndexBuffer, Primitive, TextureKind};
use js_sys::Error;
use regex::Regex;
use std::collections::HashMap;
use web_sys::{
    WebGl2RenderingContext as Context, WebGlProgram, WebGlShader, WebGlTexture,
    WebGlUniformLocation, WebGlVertexArrayObject,
};

const SOURCE_HEADER: &str = "#version 300 es
precision highp float;
precision highp int;
precision highp sampler2D;
precision highp samplerCube;
";

#[derive(Debug)]
pub struct Shader {
    gl: Context,
    invalidated: bool,
    handle: Option<WebGlProgram>,
    vertex: &'static ShaderInfo,
    fragment: &'static ShaderInfo,

    texture_units: HashMap<&'static str, u32>,
    uniforms: HashMap<&'static str, Option<WebGlUniformLocation>>,
}

fn merge_sort_dedup(lhs: &[&'static str], rhs: &[&'static str]) -> Vec<&'static str> {
    let mut vec = Vec::with_capacity(lhs.len() + rhs.len());

    vec.extend_from_slice(lhs);
    vec.extend_from_slice(rhs);
    vec.sort_unstable();
    vec.dedup();
    vec
}

impl Shader {
    pub fn new(gl: Context, vertex: &'static ShaderInfo, fragment: &'static ShaderInfo) -> Self {
        let mut texture_units = HashMap::new();

        for (index, &key) in merge_sort_dedup(vertex.texture_units, fragment.texture_units)
            .iter()
            .enumerate()
        {
            texture_units.insert(key, index as u32);
        }

        let mut uniforms = HashMap::new();

        for key in merge_sort_dedup(vertex.uniforms, fragment.uniforms) {
            uniforms.insert(key, None);
        }

        Self {
            gl,
            handle: None,
            vertex,
            fragment,
            texture_units,
            uniforms,
            invalidated: true,
        }
    }

    pub fn begin_draw(&self) -> DrawCommand {
        DrawCommand::new(self)
    }

    pub fn invalidate(&mut self) {
        self.invalidated = true;
        self.handle = None;
    }

    /// Rebuilds the shader with the current source.
    pub fn rebuild(&mut self) -> Result<(), Error> {
        if !self.invalidated {
            return Ok(());
        }

        if let Some(handle) = &self.handle {
            self.gl.delete_program(Some(handle));
        }

        self.invalidated = false;

        let vert = self.compile_shader(Context::VERTEX_SHADER, self.vertex)?;
        let frag = self.compile_shader(Context::FRAGMENT_SHADER, self.fragment)?;

        if let (Some(vert), Some(frag)) = (&vert, &frag) {
            self.handle = self.link_program(vert, frag)?;
            self.configure_binds(); // initialize shader
        } else {
            self.handle = None;
        }

        Ok(())
    }

    fn configure_binds(&mut self) {
        if let Some(program) = &self.handle {
            self.gl.use_program(Some(program));

            for (&name, &slot) in &self.texture_units {
                let location = self.gl.get_uniform_location(program, name);

                if let Some(location) = location {
                    self.gl.uniform1i(Some(&location), slot as i32);
                } else {
                    warn!("no such shader binding point: {}", name);
                }
            }

            for (&name, location) in &mut self.uniforms {
                *location = self.gl.get_uniform_location(program, name);

                if location.is_none() {
                    warn!("no such shader uniform: {}", name);
                }
            }
        }
    }

    fn compile_shader(
        &self,
        kind: u32,
        info: &'static ShaderInfo,
    ) -> Result<Option<WebGlShader>, Error> {
        let shader = self.gl.create_shader(kind);

        if let Some(shader) = &shader {
            self.gl.shader_source(shader, &Self::generate_source(info.code));
            self.gl.compile_shader(shader);

            if let Some(error) = self.get_shader_build_error(shader) {
                error!("{}", Self::remap_error_lines(info.name, &error));
                return Err(Error::new("failed to compile shader source"));
            }
        }

        Ok(shader)
    }

    fn link_program(
        &self,
        vert: &WebGlShader,
        frag: &WebGlShader,
    ) -> Result<Option<WebGlProgram>, Error> {
        let program = self.gl.create_program();

        if let Some(program) = &program {
            self.gl.attach_shader(program, vert);
            self.gl.attach_shader(program, frag);

            self.gl.link_program(program);

            self.gl.delete_shader(Some(vert));
            self.gl.delete_shader(Some(frag));

            if let Some(error) = self.get_program_link_error(program) {
                error!("{}", error);
                return Err(Error::new("failed to link shader program"));
            }
        }

        Ok(program)
    }

    fn get_shader_build_error(&self, shader: &WebGlShader) -> Option<String> {
        if self.gl.is_context_lost() {
            return None;
        }

        let status = self
            .gl
            .get_shader_parameter(shader, Context::COMPILE_STATUS);

        if status.as_bool().unwrap_or(false) {
            return None;
        }

        if let Some(error) = self.gl.get_shader_info_log(shader) {
            Some(error)
        } else {
            Some(String::from("unknown shader building error"))
        }
    }

    fn get_program_link_error(&self, program: &WebGlProgram) -> Option<String> {
        if self.gl.is_context_lost() {
            return None;
        }

        let status = self.gl.get_program_parameter(program, Context::LINK_STATUS);

        if status.as_bool().unwrap_or(false) {
            return None;
        }

        if let Some(error) = self.gl.get_program_info_log(program) {
            Some(error)
        } else {
            Some(String::from("unknown program linking error"))
        }
    }

    fn generate_source(glsl_source: &str) -> String {
        let mut source = String::with_capacity(SOURCE_HEADER.len() + glsl_source.len());

        source += SOURCE_HEADER;
        source += glsl_source;
        source
    }

    /// Rewrites `0:LINE:` markers in a driver log to point into the shader file.
    fn remap_error_lines(name: &str, log: &str) -> String {
        let header_lines = SOURCE_HEADER.lines().count();
        let pattern = Regex::new(r#"0:([0-9]+):"#).unwrap();

        pattern
            .replace_all(log, |caps: &regex::Captures| {
                let line = caps[1].parse::<usize>().unwrap_or(0);

                format!("{}:{}:", name, line.saturating_sub(header_lines))
            })
            .into_owned()
    }
}

#[derive(Debug)]
pub struct DrawCommand<'a> {
    shader: &'a Shader,
}

#[derive(Debug)]
pub enum BindTarget<'a> {
    Texture(Option<&'a WebGlTexture>, TextureKind),
}

pub trait AsBindTarget {
    fn bind_target(&self) -> BindTarget;
}

pub trait AsVertexArray {
    fn vertex_array(&self) -> Option<&WebGlVertexArrayObject>;
}

impl<'a> DrawCommand<'a> {
    fn new(shader: &'a Shader) -> Self {
        shader.gl.use_program(shader.handle.as_ref());

        shader.gl.disable(Context::BLEND);
        shader.gl.disable(Context::DEPTH_TEST);
        shader.gl.disable(Context::SCISSOR_TEST);
        shader.gl.disable(Context::STENCIL_TEST);
        shader.gl.viewport(0, 0, 0, 0);

        Self { shader }
    }

    pub fn bind(&self, target: &dyn AsBindTarget, slot: &str) {
        match target.bind_target() {
            BindTarget::Texture(handle, kind) => self.bind_texture(handle, slot, kind),
        }
    }

    pub fn set_viewport(&self, x: i32, y: i32, w: i32, h: i32) {
        self.shader.gl.viewport(x, y, w, h);
    }

    pub fn set_depth_test(&self, enabled: bool) {
        if enabled {
            self.shader.gl.enable(Context::DEPTH_TEST);
            self.shader.gl.depth_func(Context::LESS);
        } else {
            self.shader.gl.disable(Context::DEPTH_TEST);
        }
    }

    /// Clears the color and depth buffers of the current framebuffer.
    pub fn clear(&self, color: [f32; 4]) {
        self.shader
            .gl
            .clear_color(color[0], color[1], color[2], color[3]);
        self.shader.gl.clear_depth(1.0);
        self.shader
            .gl
            .clear(Context::COLOR_BUFFER_BIT | Context::DEPTH_BUFFER_BIT);
    }

    pub fn set_vertex_array(&self, target: &dyn AsVertexArray) {
        self.shader.gl.bind_vertex_array(target.vertex_array());
    }

    pub fn unset_vertex_array(&self) {
        self.shader.gl.bind_vertex_array(None);
    }

    pub fn set_framebuffer(&self, target: &Framebuffer) {
        self.shader
            .gl
            .bind_framebuffer(Context::DRAW_FRAMEBUFFER, target.handle());
    }

    pub fn set_canvas_framebuffer(&self) {
        self.shader
            .gl
            .bind_framebuffer(Context::DRAW_FRAMEBUFFER, None);
    }

    /// Draws every index in the buffer using the bound vertex array.
    pub fn draw_indexed(&self, indices: &IndexBuffer, primitive: Primitive) {
        self.shader
            .gl
            .bind_buffer(Context::ELEMENT_ARRAY_BUFFER, indices.handle());

        self.shader.gl.draw_elements_with_i32(
            primitive.gl_mode(),
            indices.len() as i32,
            Context::UNSIGNED_INT,
            0,
        );
    }

    pub fn set_uniform_f32(&self, name: &str, value: f32) {
        self.shader.gl.uniform1f(self.location(name), value);
    }

    pub fn set_uniform_i32(&self, name: &str, value: i32) {
        self.shader.gl.uniform1i(self.location(name), value);
    }

    pub fn set_uniform_vec2(&self, name: &str, x: f32, y: f32) {
        self.shader.gl.uniform2f(self.location(name), x, y);
    }

    pub fn set_uniform_mat4(&self, name: &str, matrix: &impl AsRef<[f32; 16]>) {
        self.shader.gl.uniform_matrix4fv_with_f32_array(
            self.location(name),
            false,
            &matrix.as_ref()[..],
        );
    }

    fn location(&self, name: &str) -> Option<&WebGlUniformLocation> {
        match self.shader.uniforms.get(name) {
            Some(location) => location.as_ref(),
            None => panic!("uniform '{}' is not declared by the shader", name),
        }
    }

    fn bind_texture(&self, handle: Option<&WebGlTexture>, slot: &str, kind: TextureKind) {
        if let Some(&slot) = self.shader.texture_units.get(slot) {
            self.shader.gl.active_texture(Context::TEXTURE0 + slot);
            self.shader.gl.bind_texture(kind.gl_target(), handle);
        } else {
            panic!("slot '{}' does not map to a binding point", slot);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merged_names_are_sorted_and_unique() {
        let merged = merge_sort_dedup(&["viewMatrix", "transMat"], &["viewMatrix", "exposure"]);

        assert_eq!(merged, vec!["exposure", "transMat", "viewMatrix"]);
    }

    #[test]
    fn error_lines_point_into_shader_file() {
        let header_lines = SOURCE_HEADER.lines().count();
        let log = format!("ERROR: 0:{}: 'foo' : undeclared identifier", header_lines + 7);

        assert_eq!(
            Shader::remap_error_lines("envmap.frag", &log),
            "ERROR: envmap.frag:7: 'foo' : undeclared identifier"
        );
    }

    #[test]
    fn generated_source_starts_with_version_directive() {
        let source = Shader::generate_source("void main() {}\n");

        assert!(source.starts_with("#version 300 es\n"));
        assert!(source.ends_with("void main() {}\n"));
    }
}
