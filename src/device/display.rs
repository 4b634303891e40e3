use crate::{Device, FillMode, Primitive, Scene, ViewerState};

const CLEAR_COLOR: [f32; 4] = [0.2, 0.3, 0.6, 1.0];

impl Device {
    pub(crate) fn render_sphere(&self, state: &ViewerState, scene: &Scene) {
        let camera = &scene.camera;
        let raster = &scene.raster;

        let command = self.display_shader.begin_draw();

        command.set_canvas_framebuffer();
        command.set_viewport(0, 0, raster.width as i32, raster.height as i32);
        command.set_depth_test(true);
        command.clear(CLEAR_COLOR);

        if self.mip_chain.is_empty() {
            return; // no complete cube map to sample
        }

        command.bind(&self.cubemap, "envmap");

        command.set_uniform_mat4("transMat", &state.model());
        command.set_uniform_mat4(
            "projMatrix",
            &camera.projection_matrix(raster.aspect_ratio()),
        );
        command.set_uniform_mat4("viewMatrix", &camera.view_matrix());
        command.set_uniform_f32("roughness", state.roughness());
        command.set_uniform_i32("mipLevels", self.mip_chain.max_level() as i32);
        command.set_uniform_f32("exposure", state.exposure());

        command.set_vertex_array(&self.sphere_vertices);

        match state.fill_mode() {
            FillMode::Fill => command.draw_indexed(&self.sphere_triangles, Primitive::Triangles),
            FillMode::Wireframe => command.draw_indexed(&self.sphere_edges, Primitive::Lines),
        }

        command.unset_vertex_array();
    }
}
