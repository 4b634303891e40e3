#[allow(unused_imports)]
use log::{debug, info, warn};

use crate::{
    pack_rgba_to_rgb, CubeFace, Device, Environment, MipChain, Primitive, VertexAttribute,
    VertexAttributeKind, VertexLayout,
};
use js_sys::Error;
use zerocopy::{AsBytes, FromBytes};

/// Screen-covering quad vertex carrying the cube direction to sample.
#[repr(C)]
#[derive(AsBytes, FromBytes, Clone, Copy, Debug, Default)]
pub struct QuadVertex {
    pub position: [f32; 3],
    pub direction: [f32; 3],
}

impl VertexLayout for QuadVertex {
    fn vertex_layout() -> Vec<VertexAttribute> {
        vec![
            VertexAttribute::new(0, 0, VertexAttributeKind::Float3),
            VertexAttribute::new(1, 12, VertexAttributeKind::Float3),
        ]
    }
}

const QUAD_POSITIONS: [[f32; 3]; 4] = [
    [1.0, 1.0, 0.0],
    [1.0, -1.0, 0.0],
    [-1.0, -1.0, 0.0],
    [-1.0, 1.0, 0.0],
];

const QUAD_INDICES: [u32; 6] = [0, 1, 3, 1, 2, 3];

const INV_ATAN: [f32; 2] = [0.1591, 0.3183];

const PI: f32 = 3.141_592_653_589_79;

fn face_quad(face: CubeFace) -> [QuadVertex; 4] {
    let mut quad = [QuadVertex::default(); 4];

    for ((vertex, &position), &direction) in quad
        .iter_mut()
        .zip(&QUAD_POSITIONS)
        .zip(&face.corner_directions())
    {
        vertex.position = position;
        vertex.direction = direction;
    }

    quad
}

impl Device {
    /// Renders the environment map into every face and level of the cube map.
    ///
    /// Each level is drawn offscreen with a progressively wider specular lobe
    /// and copied back through host memory into the cube texture. The mip
    /// chain stays empty until every face and level has been written.
    pub(crate) fn bake_cubemap(&mut self, environment: &Environment) -> Result<(), Error> {
        self.mip_chain = MipChain::new(0, 0);

        environment.validate().map_err(Error::new)?;

        let chain = MipChain::new(
            environment.base_resolution as usize,
            environment.mip_levels as usize,
        );

        let base = chain.base_resolution();

        self.bake_target.create(base, base);
        self.bake_fbo.rebuild(&[&self.bake_target])?;
        self.bake_readback.create(base * base * 4);

        self.cubemap.create(base, chain.len());
        self.screen_quad_indices.upload(&QUAD_INDICES);

        let command = self.bake_shader.begin_draw();

        command.set_framebuffer(&self.bake_fbo);
        command.bind(&self.envmap_texture, "envmap");

        command.set_uniform_f32("numOfPoints", environment.sample_count as f32);
        command.set_uniform_f32("PI", PI);
        command.set_uniform_vec2("invAtan", INV_ATAN[0], INV_ATAN[1]);

        for face in CubeFace::ALL.iter().copied() {
            self.screen_quad.upload(&face_quad(face));
            command.set_vertex_array(&self.screen_quad);

            for (level, resolution) in chain.iter() {
                command.set_viewport(0, 0, resolution as i32, resolution as i32);
                command.set_uniform_f32("specular", chain.specular_power(level));
                command.draw_indexed(&self.screen_quad_indices, Primitive::Triangles);

                let pixels: &mut [f32] = self.allocator.allocate(resolution * resolution * 4);

                self.bake_readback.read_pixels(
                    &self.bake_fbo,
                    0,
                    resolution,
                    resolution,
                    pixels,
                )?;

                let len = pack_rgba_to_rgb(pixels);

                self.cubemap
                    .upload_face(face.index(), level, resolution, &pixels[..len])?;
            }

            debug!("baked {:?} cube face", face);
        }

        command.unset_vertex_array();
        command.set_canvas_framebuffer();

        self.cubemap.set_mipmap_sampling();

        info!(
            "baked {}x{} cube map with {} levels",
            base,
            base,
            chain.len()
        );

        self.mip_chain = chain;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn face_quad_pairs_screen_corners_with_face_corners() {
        let quad = face_quad(CubeFace::Right);

        assert_eq!(quad[0].position, [1.0, 1.0, 0.0]);
        assert_eq!(quad[2].position, [-1.0, -1.0, 0.0]);

        assert_eq!(quad[0].direction, [1.0, -1.0, -1.0]);
        assert_eq!(quad[1].direction, [1.0, 1.0, -1.0]);
        assert_eq!(quad[2].direction, [1.0, 1.0, 1.0]);
        assert_eq!(quad[3].direction, [1.0, -1.0, 1.0]);
    }

    #[test]
    fn quad_indices_cover_both_triangles() {
        assert!(QUAD_INDICES.iter().all(|&index| index < 4));
        assert_eq!(QUAD_INDICES.len(), 6);
    }
}
