use bytemuck::{Pod, Zeroable};

use super::gfx::{ShaderDesc, ShaderStage, VertexFormat};

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub(crate) struct TriangleVertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
}

/// Interleaved position/color, matching shader locations 0 and 1.
pub(crate) const VERTEX_ATTRS: [VertexFormat; 2] = [VertexFormat::Float3, VertexFormat::Float3];

pub(crate) const VERTICES: [TriangleVertex; 3] = [
    // top (red)
    TriangleVertex {
        position: [0.0, 0.5, 0.0],
        color: [1.0, 0.0, 0.0],
    },
    // bottom-left (green)
    TriangleVertex {
        position: [-0.5, -0.5, 0.0],
        color: [0.0, 1.0, 0.0],
    },
    // bottom-right (blue)
    TriangleVertex {
        position: [0.5, -0.5, 0.0],
        color: [0.0, 0.0, 1.0],
    },
];

pub(crate) const VERTEX_COUNT: u32 = VERTICES.len() as u32;

const SHADER_SRC: &str = include_str!("shaders/triangle.wgsl");

pub(crate) fn shader_desc() -> ShaderDesc<'static> {
    ShaderDesc {
        label: "triangle-shader",
        vertex: ShaderStage {
            source: SHADER_SRC,
            entry: "vs_main",
        },
        fragment: ShaderStage {
            source: SHADER_SRC,
            entry: "fs_main",
        },
    }
}
