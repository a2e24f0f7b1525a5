//! The mesh shader parses, validates and agrees with the uniform layouts.

use lanyard::shader::{FRAGMENT_ENTRY, MESH_SHADER, VERTEX_ENTRY};
use lanyard::uniforms::{ObjectUniforms, SceneUniforms};
use lanyard::MeshVertex;

fn parse() -> naga::Module {
    naga::front::wgsl::parse_str(MESH_SHADER).unwrap_or_else(|e| panic!("WGSL parse error: {}", e.emit_to_string(MESH_SHADER)))
}

fn struct_size(module: &naga::Module, name: &str) -> u32 {
    module
        .types
        .iter()
        .find_map(|(_, ty)| match (&ty.name, &ty.inner) {
            (Some(n), naga::TypeInner::Struct { span, .. }) if n == name => Some(*span),
            _ => None,
        })
        .unwrap_or_else(|| panic!("struct {} not found", name))
}

#[test]
fn test_mesh_shader_validates() {
    let module = parse();
    let mut validator = naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::all(),
    );
    if let Err(e) = validator.validate(&module) {
        panic!("WGSL validation error: {:?}", e);
    }
}

#[test]
fn test_entry_points_exist() {
    let module = parse();
    let stage_of = |name: &str| {
        module
            .entry_points
            .iter()
            .find(|ep| ep.name == name)
            .map(|ep| ep.stage)
    };
    assert_eq!(stage_of(VERTEX_ENTRY), Some(naga::ShaderStage::Vertex));
    assert_eq!(stage_of(FRAGMENT_ENTRY), Some(naga::ShaderStage::Fragment));
}

#[test]
fn test_uniform_structs_match_rust_layout() {
    let module = parse();
    assert_eq!(struct_size(&module, "Scene") as usize, std::mem::size_of::<SceneUniforms>());
    assert_eq!(struct_size(&module, "Object") as usize, std::mem::size_of::<ObjectUniforms>());
}

#[test]
fn test_vertex_input_matches_mesh_vertex() {
    let module = parse();
    let vs = module
        .entry_points
        .iter()
        .find(|ep| ep.name == VERTEX_ENTRY)
        .expect("vertex entry");
    let input = &vs.function.arguments[0];
    let members = match &module.types[input.ty].inner {
        naga::TypeInner::Struct { members, .. } => members.len(),
        other => panic!("vertex input is not a struct: {:?}", other),
    };
    // position, normal, uv
    assert_eq!(members, 3);
    assert_eq!(std::mem::size_of::<MeshVertex>(), 32);
}
