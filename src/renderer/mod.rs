//! WebGPU rendering module
//!
//! The tactical view is rebuilt on the CPU every frame as flat-colored
//! triangles (tiles, fog, units, overlays) and drawn in a single pass.

pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use pipeline::RenderState;
pub use scene::Overlay;
pub use vertex::Vertex;
