//! Normal computation for the displaced plane.

use glam::Vec3;

use super::DepthMesh;

impl DepthMesh {
    /// Computes vertex normals as the area-weighted average of incident
    /// triangle normals.
    pub(super) fn compute_vertex_normals(&mut self) {
        self.normals.clear();
        self.normals.resize(self.positions.len(), Vec3::ZERO);

        for tri in self.indices.chunks_exact(3) {
            let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
            let p0 = self.positions[a];
            let e1 = self.positions[b] - p0;
            let e2 = self.positions[c] - p0;

            // The cross product's length is twice the triangle area.
            let weighted_normal = e1.cross(e2);
            self.normals[a] += weighted_normal;
            self.normals[b] += weighted_normal;
            self.normals[c] += weighted_normal;
        }

        for normal in &mut self.normals {
            *normal = normal.normalize_or(Vec3::Z);
        }
    }
}
