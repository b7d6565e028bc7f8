/// Cube vertex: position and texture coordinate
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub pos: [f32; 3],
    pub uv: [f32; 2],
}

impl Vertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x2];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

const fn v(pos: [f32; 3], uv: [f32; 2]) -> Vertex {
    Vertex { pos, uv }
}

/// Four vertices per face so every face gets its own texture coordinates
pub const VERTICES: [Vertex; 24] = [
    // -Z
    v([-1.0, -1.0, -1.0], [0.0, 1.0]),
    v([-1.0, 1.0, -1.0], [0.0, 0.0]),
    v([1.0, 1.0, -1.0], [1.0, 0.0]),
    v([1.0, -1.0, -1.0], [1.0, 1.0]),
    // -Y
    v([-1.0, -1.0, -1.0], [0.0, 1.0]),
    v([-1.0, -1.0, 1.0], [0.0, 0.0]),
    v([1.0, -1.0, 1.0], [1.0, 0.0]),
    v([1.0, -1.0, -1.0], [1.0, 1.0]),
    // +X
    v([1.0, -1.0, -1.0], [0.0, 1.0]),
    v([1.0, -1.0, 1.0], [1.0, 1.0]),
    v([1.0, 1.0, 1.0], [1.0, 0.0]),
    v([1.0, 1.0, -1.0], [0.0, 0.0]),
    // +Y
    v([1.0, 1.0, -1.0], [0.0, 1.0]),
    v([1.0, 1.0, 1.0], [0.0, 0.0]),
    v([-1.0, 1.0, 1.0], [1.0, 0.0]),
    v([-1.0, 1.0, -1.0], [1.0, 1.0]),
    // -X
    v([-1.0, 1.0, -1.0], [1.0, 0.0]),
    v([-1.0, 1.0, 1.0], [0.0, 0.0]),
    v([-1.0, -1.0, 1.0], [0.0, 1.0]),
    v([-1.0, -1.0, -1.0], [1.0, 1.0]),
    // +Z
    v([-1.0, -1.0, 1.0], [1.0, 1.0]),
    v([1.0, -1.0, 1.0], [0.0, 1.0]),
    v([1.0, 1.0, 1.0], [0.0, 0.0]),
    v([-1.0, 1.0, 1.0], [1.0, 0.0]),
];

/// Counter-clockwise when seen from outside the cube
pub const INDICES: [u32; 36] = [
    2, 0, 1, 2, 3, 0, // -Z
    4, 6, 5, 4, 7, 6, // -Y
    8, 10, 9, 8, 11, 10, // +X
    12, 14, 13, 12, 15, 14, // +Y
    16, 18, 17, 16, 19, 18, // -X
    20, 21, 22, 20, 22, 23, // +Z
];

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn corner(i: u32) -> Vec3 {
        Vec3::from_array(VERTICES[i as usize].pos)
    }

    #[test]
    fn test_indices_are_in_range() {
        assert!(INDICES.iter().all(|&i| (i as usize) < VERTICES.len()));
    }

    #[test]
    fn test_vertex_stride() {
        assert_eq!(Vertex::layout().array_stride, 20);
    }

    #[test]
    fn test_triangles_face_outward() {
        for tri in INDICES.chunks(3) {
            let (a, b, c) = (corner(tri[0]), corner(tri[1]), corner(tri[2]));
            let normal = (b - a).cross(c - a);
            let center = (a + b + c) / 3.0;
            assert!(normal.dot(center) > 0.0, "triangle {:?} faces inward", tri);
        }
    }

    #[test]
    fn test_uvs_in_unit_square() {
        for vertex in &VERTICES {
            assert!(vertex.uv.iter().all(|&c| (0.0..=1.0).contains(&c)));
        }
    }
}
