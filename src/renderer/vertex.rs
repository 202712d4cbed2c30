//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Colors for map and units
pub mod colors {
    pub const GROUND: [f32; 4] = [0.22, 0.26, 0.2, 1.0];
    pub const WALL: [f32; 4] = [0.45, 0.45, 0.5, 1.0];
    pub const COVER: [f32; 4] = [0.5, 0.38, 0.22, 1.0];
    pub const BUSH: [f32; 4] = [0.15, 0.42, 0.18, 1.0];
    /// Never-seen tiles
    pub const FOG: [f32; 4] = [0.03, 0.03, 0.05, 1.0];
    /// Brightness of explored-but-not-visible tiles
    pub const EXPLORED_DIM: f32 = 0.4;

    pub const SOLDIER: [f32; 4] = [0.3, 0.6, 1.0, 1.0];
    pub const SOLDIER_SPENT: [f32; 4] = [0.2, 0.35, 0.55, 1.0];
    pub const SECTOID: [f32; 4] = [0.7, 0.75, 0.7, 1.0];
    pub const FLOATER: [f32; 4] = [0.8, 0.4, 0.6, 1.0];
    pub const MUTON: [f32; 4] = [0.3, 0.75, 0.3, 1.0];
    pub const SELECTION: [f32; 4] = [1.0, 0.9, 0.3, 1.0];
    pub const MOVE_PREVIEW: [f32; 4] = [0.3, 0.6, 1.0, 0.18];
    pub const HEALTH_BAR: [f32; 4] = [0.9, 0.2, 0.2, 1.0];
    pub const BACKGROUND: [f32; 4] = [0.02, 0.02, 0.05, 1.0];

    /// Scale RGB, keep alpha
    pub fn dim(color: [f32; 4], factor: f32) -> [f32; 4] {
        [
            color[0] * factor,
            color[1] * factor,
            color[2] * factor,
            color[3],
        ]
    }
}
