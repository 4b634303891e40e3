use itertools::Itertools;
use serde::{Deserialize, Serialize};
use smart_default::SmartDefault;
use std::f32::consts::PI;
use zerocopy::{AsBytes, FromBytes};

/// Tessellation of the displayed UV sphere.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize, SmartDefault)]
#[serde(default)]
pub struct SphereParameters {
    #[default(1.0)]
    pub radius: f32,
    /// Subdivisions around the pole axis.
    #[default(144)]
    pub sectors: u32,
    /// Subdivisions from pole to pole.
    #[default(72)]
    pub stacks: u32,
}

impl SphereParameters {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.sectors == 0 || self.stacks < 2 {
            return Err("sphere needs at least one sector and two stacks");
        }

        // also rejects NaN
        if !(self.radius > 0.0) {
            return Err("sphere radius must be positive");
        }

        Ok(())
    }
}

#[repr(C)]
#[derive(AsBytes, FromBytes, Clone, Copy, Debug, PartialEq)]
pub struct SphereVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

#[derive(Clone, Debug, Default)]
pub struct SphereMesh {
    pub vertices: Vec<SphereVertex>,
    pub indices: Vec<u32>,
}

impl SphereMesh {
    /// Builds a UV sphere around the z axis with counter-clockwise triangles.
    ///
    /// The first and last stacks each collapse to a pole, so only the one
    /// non-degenerate triangle per sector is emitted for them.
    pub fn generate(parameters: &SphereParameters) -> Self {
        let SphereParameters {
            radius,
            sectors,
            stacks,
        } = *parameters;

        assert!(sectors >= 1 && stacks >= 2, "sphere needs at least two stacks");

        let length_inv = 1.0 / radius;

        let mut vertices = Vec::with_capacity(((sectors + 1) * (stacks + 1)) as usize);

        for i in 0..=stacks {
            let stack_angle = PI / 2.0 - PI * (i as f32 / stacks as f32);
            let ring = radius * stack_angle.cos();
            let z = radius * stack_angle.sin();

            for j in 0..=sectors {
                let sector_angle = 2.0 * PI * (j as f32 / sectors as f32);

                let x = ring * sector_angle.cos();
                let y = ring * sector_angle.sin();

                vertices.push(SphereVertex {
                    position: [x, y, z],
                    normal: [x * length_inv, y * length_inv, z * length_inv],
                    uv: [j as f32 / sectors as f32, i as f32 / stacks as f32],
                });
            }
        }

        let mut indices = Vec::with_capacity(Self::index_count(sectors, stacks));

        for i in 0..stacks {
            let mut s1 = i * (sectors + 1);
            let mut s2 = s1 + sectors + 1;

            for _ in 0..sectors {
                if i != 0 {
                    indices.extend_from_slice(&[s1, s2, s1 + 1]);
                }

                if i != stacks - 1 {
                    indices.extend_from_slice(&[s1 + 1, s2, s2 + 1]);
                }

                s1 += 1;
                s2 += 1;
            }
        }

        Self { vertices, indices }
    }

    /// Number of triangle indices generated for a given tessellation.
    pub fn index_count(sectors: u32, stacks: u32) -> usize {
        (6 * sectors * stacks - 6 * sectors) as usize
    }

    /// Returns every distinct triangle edge as a pair of line indices.
    pub fn edge_indices(&self) -> Vec<u32> {
        self.indices
            .chunks_exact(3)
            .flat_map(|t| vec![(t[0], t[1]), (t[1], t[2]), (t[2], t[0])])
            .map(|(a, b)| (a.min(b), a.max(b)))
            .unique()
            .flat_map(|(a, b)| vec![a, b])
            .collect()
    }
}
