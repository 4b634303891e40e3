#[allow(unused_imports)]
use log::{debug, info, warn};

use crate::{
    Device, SphereMesh, SphereParameters, SphereVertex, VertexAttribute, VertexAttributeKind,
    VertexLayout,
};
use js_sys::Error;

impl VertexLayout for SphereVertex {
    fn vertex_layout() -> Vec<VertexAttribute> {
        vec![
            VertexAttribute::new(0, 0, VertexAttributeKind::Float3),
            VertexAttribute::new(1, 12, VertexAttributeKind::Float3),
            VertexAttribute::new(2, 24, VertexAttributeKind::Float2),
        ]
    }
}

impl Device {
    pub(crate) fn update_sphere(&mut self, parameters: &SphereParameters) -> Result<(), Error> {
        parameters.validate().map_err(Error::new)?;

        let mesh = SphereMesh::generate(parameters);

        self.sphere_vertices.upload(&mesh.vertices);
        self.sphere_triangles.upload(&mesh.indices);
        self.sphere_edges.upload(&mesh.edge_indices());

        debug!(
            "tessellated sphere into {} vertices and {} triangles",
            mesh.vertices.len(),
            mesh.indices.len() / 3
        );

        Ok(())
    }
}
