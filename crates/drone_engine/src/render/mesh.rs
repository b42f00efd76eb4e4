//! Static shape meshes
//!
//! Position-only geometry for the three shapes the drone is assembled from.
//! All shapes are centred on the origin and fit the unit cube `[-0.5, 0.5]^3`
//! (the sphere has unit radius and is scaled down by its part recipe).

use serde::{Deserialize, Serialize};

use crate::foundation::math::constants::PI;
use crate::render::backend::Topology;

/// Shapes known to the geometry provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Shape {
    /// Unit cube, 36 unindexed vertices
    Cube,
    /// Unit cube with a ridged top and bottom, 16 vertices / 72 indices
    BeveledCube,
    /// UV sphere drawn as one triangle strip
    Sphere,
}

impl Shape {
    /// All shapes, in upload order
    pub const ALL: [Self; 3] = [Self::Cube, Self::BeveledCube, Self::Sphere];
}

/// Largest accepted sphere stack or slice count
pub const MAX_SPHERE_RESOLUTION: u32 = 1024;

/// CPU-side mesh data ready to upload
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeMesh {
    /// Vertex positions
    pub positions: Vec<[f32; 3]>,
    /// Triangle indices, if the mesh is indexed
    pub indices: Option<Vec<u32>>,
    /// How the vertices (or indices) are assembled
    pub topology: Topology,
}

/// Unit cube: 6 faces x 2 triangles, counter-clockwise seen from outside
const CUBE_POSITIONS: [[f32; 3]; 36] = [
    // front
    [-0.5, -0.5,  0.5], [ 0.5, -0.5,  0.5], [ 0.5,  0.5,  0.5],
    [ 0.5,  0.5,  0.5], [-0.5,  0.5,  0.5], [-0.5, -0.5,  0.5],
    // back
    [-0.5, -0.5, -0.5], [-0.5,  0.5, -0.5], [ 0.5,  0.5, -0.5],
    [ 0.5,  0.5, -0.5], [ 0.5, -0.5, -0.5], [-0.5, -0.5, -0.5],
    // left
    [-0.5,  0.5,  0.5], [-0.5,  0.5, -0.5], [-0.5, -0.5, -0.5],
    [-0.5, -0.5, -0.5], [-0.5, -0.5,  0.5], [-0.5,  0.5,  0.5],
    // right
    [ 0.5,  0.5,  0.5], [ 0.5, -0.5,  0.5], [ 0.5, -0.5, -0.5],
    [ 0.5, -0.5, -0.5], [ 0.5,  0.5, -0.5], [ 0.5,  0.5,  0.5],
    // top
    [-0.5,  0.5, -0.5], [-0.5,  0.5,  0.5], [ 0.5,  0.5,  0.5],
    [ 0.5,  0.5,  0.5], [ 0.5,  0.5, -0.5], [-0.5,  0.5, -0.5],
    // bottom
    [-0.5, -0.5, -0.5], [ 0.5, -0.5, -0.5], [ 0.5, -0.5,  0.5],
    [ 0.5, -0.5,  0.5], [-0.5, -0.5,  0.5], [-0.5, -0.5, -0.5],
];

/// Beveled cube triangles, four per face
///
/// Vertices 0..8 are corners, 8..16 edge midpoints (see `beveled_cube`).
/// Front/back faces and both slopes of the ridge split along x = 0, the
/// left/right faces along z = 0.
const BEVELED_CUBE_INDICES: [u32; 72] = [
    // front
    0, 12, 8,   0, 8, 3,    12, 1, 2,   12, 2, 8,
    // back
    4, 7, 9,    4, 9, 13,   13, 9, 6,   13, 6, 5,
    // top (left slope, right slope)
    3, 8, 9,    3, 9, 7,    8, 2, 6,    8, 6, 9,
    // bottom
    0, 13, 12,  0, 4, 13,   12, 5, 1,   12, 13, 5,
    // left
    0, 3, 10,   0, 10, 14,  14, 10, 7,  14, 7, 4,
    // right
    1, 11, 2,   1, 15, 11,  15, 6, 11,  15, 5, 6,
];

impl ShapeMesh {
    /// Build the mesh for a shape
    pub fn for_shape(shape: Shape, bevel: f32, sphere_stacks: u32, sphere_slices: u32) -> Self {
        match shape {
            Shape::Cube => Self::unit_cube(),
            Shape::BeveledCube => Self::beveled_cube(bevel),
            Shape::Sphere => Self::uv_sphere(sphere_stacks, sphere_slices),
        }
    }

    /// Unit cube as 36 position-only vertices, no shared indexing
    pub fn unit_cube() -> Self {
        Self {
            positions: CUBE_POSITIONS.to_vec(),
            indices: None,
            topology: Topology::Triangles,
        }
    }

    /// Indexed cube whose top and bottom rise to a ridge running front to back
    ///
    /// 8 corner vertices sit at `±(0.5 - bevel)` vertically; the midpoints of the
    /// front/back horizontal edges are pushed out to `±0.5`, the midpoints of the
    /// left/right horizontal edges stay on their edges.
    pub fn beveled_cube(bevel: f32) -> Self {
        let h = 0.5_f32;
        let t = h - bevel;
        let positions = vec![
            // corners: bottom-front, top-front, then the same at the back
            [-h, -t, h], [h, -t, h], [h, t, h], [-h, t, h],
            [-h, -t, -h], [h, -t, -h], [h, t, -h], [-h, t, -h],
            // top ridge ends, top left/right midpoints
            [0.0, h, h], [0.0, h, -h], [-h, t, 0.0], [h, t, 0.0],
            // bottom ridge ends, bottom left/right midpoints
            [0.0, -h, h], [0.0, -h, -h], [-h, -t, 0.0], [h, -t, 0.0],
        ];

        Self {
            positions,
            indices: Some(BEVELED_CUBE_INDICES.to_vec()),
            topology: Topology::Triangles,
        }
    }

    /// Unit sphere sampled by latitude/longitude into one triangle strip
    ///
    /// Each stack contributes `slices + 1` vertex pairs (lower ring, upper ring),
    /// so the strip holds `stacks * (slices + 1) * 2` vertices. Consecutive stacks
    /// are joined by the strip itself; the few degenerate seam triangles that
    /// produces are left in.
    #[allow(clippy::cast_precision_loss)]
    pub fn uv_sphere(stacks: u32, slices: u32) -> Self {
        let mut positions = Vec::with_capacity(stacks as usize * (slices as usize + 1) * 2);

        for i in 0..stacks {
            let phi0 = PI * (-0.5 + i as f32 / stacks as f32);
            let phi1 = PI * (-0.5 + (i + 1) as f32 / stacks as f32);
            let (y0, r0) = phi0.sin_cos();
            let (y1, r1) = phi1.sin_cos();

            for j in 0..=slices {
                let theta = 2.0 * PI * (j as f32 / slices as f32);
                let (z, x) = theta.sin_cos();
                positions.push([x * r0, y0, z * r0]);
                positions.push([x * r1, y1, z * r1]);
            }
        }

        Self {
            positions,
            indices: None,
            topology: Topology::TriangleStrip,
        }
    }

    /// Whether the mesh is drawn through an index buffer
    pub const fn is_indexed(&self) -> bool {
        self.indices.is_some()
    }

    /// Number of vertices (or indices) one draw of this mesh consumes
    ///
    /// Saturates at `u32::MAX`; sphere resolutions above
    /// [`MAX_SPHERE_RESOLUTION`] are rejected by config validation long before that.
    pub fn draw_count(&self) -> u32 {
        let count = self.indices.as_ref().map_or(self.positions.len(), Vec::len);
        u32::try_from(count).unwrap_or(u32::MAX)
    }

    /// Triangles as position triples; strips are unrolled with alternating winding
    #[cfg(test)]
    pub(crate) fn triangles(&self) -> Vec<[[f32; 3]; 3]> {
        let vertex = |i: u32| self.positions[i as usize];
        let order: Vec<u32> = match &self.indices {
            Some(indices) => indices.clone(),
            None => (0..self.draw_count()).collect(),
        };

        match self.topology {
            Topology::Triangles => order
                .chunks_exact(3)
                .map(|tri| [vertex(tri[0]), vertex(tri[1]), vertex(tri[2])])
                .collect(),
            Topology::TriangleStrip => order
                .windows(3)
                .enumerate()
                .map(|(n, w)| {
                    if n % 2 == 0 {
                        [vertex(w[0]), vertex(w[1]), vertex(w[2])]
                    } else {
                        [vertex(w[1]), vertex(w[0]), vertex(w[2])]
                    }
                })
                .collect(),
        }
    }
}
