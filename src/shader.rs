/// WGSL source for the mesh pipeline (band and card).
pub const MESH_SHADER: &str = include_str!("shader.wgsl");

/// Vertex entry point in [`MESH_SHADER`].
pub const VERTEX_ENTRY: &str = "vs_main";
/// Fragment entry point in [`MESH_SHADER`].
pub const FRAGMENT_ENTRY: &str = "fs_main";
