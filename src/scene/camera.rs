use cgmath::{perspective, Deg, Matrix4, Point3, Vector3};
use serde::{Deserialize, Serialize};
use smart_default::SmartDefault;

/// Fixed viewpoint looking at the sphere.
#[derive(Clone, Debug, Deserialize, PartialEq, SmartDefault, Serialize)]
#[serde(default)]
pub struct Camera {
    #[default([0.0, 0.0, 1.5])]
    pub eye: [f32; 3],

    #[default([0.0; 3])]
    pub target: [f32; 3],

    #[default([0.0, 1.0, 0.0])]
    pub up_vector: [f32; 3],

    /// Vertical field of view in degrees.
    #[default(90.0)]
    pub field_of_view: f32,

    #[default(0.1)]
    pub near_plane: f32,

    #[default(100.0)]
    pub far_plane: f32,
}

impl Camera {
    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at(
            Point3::from(self.eye),
            Point3::from(self.target),
            Vector3::from(self.up_vector),
        )
    }

    pub fn projection_matrix(&self, aspect_ratio: f32) -> Matrix4<f32> {
        perspective(
            Deg(self.field_of_view),
            aspect_ratio,
            self.near_plane,
            self.far_plane,
        )
    }
}
