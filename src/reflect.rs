//! Reflection: flatten a module's interface into input/output signatures,
//! constant-block and read-only-resource tables, and the fixed-size
//! input-attribute map. Runs on the parsed module independently of the
//! text pipeline.

use std::cmp::Ordering;

use log::warn;

use crate::decompile::types::type_name;
use crate::model::{Decoration, Module, OpIdx, TypeKind};
use crate::spv::{BuiltIn, DecorationKind, Dim, StorageClass};

pub const INPUT_ATTRIBUTE_COUNT: usize = 16;

/// Closed system-value semantic table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SystemValue {
    Position,
    PointSize,
    ClipDistance,
    CullDistance,
    VertexIndex,
    InstanceIndex,
    PrimitiveIndex,
    InvocationIndex,
    RenderTargetIndex,
    ViewportIndex,
    OuterTessFactor,
    InsideTessFactor,
    PatchNumVertices,
    IsFrontFace,
    SampleIndex,
    SamplePosition,
    SampleCoverage,
    ColourOutput,
    DepthOutput,
    /// Plain user semantics sort after every system value.
    None,
}

pub fn builtin_system_value(b: BuiltIn) -> SystemValue {
    match b {
        BuiltIn::Position => SystemValue::Position,
        BuiltIn::PointSize => SystemValue::PointSize,
        BuiltIn::ClipDistance => SystemValue::ClipDistance,
        BuiltIn::CullDistance => SystemValue::CullDistance,
        BuiltIn::VertexId => SystemValue::VertexIndex,
        BuiltIn::InstanceId => SystemValue::InstanceIndex,
        BuiltIn::PrimitiveId => SystemValue::PrimitiveIndex,
        BuiltIn::InvocationId => SystemValue::InvocationIndex,
        BuiltIn::Layer => SystemValue::RenderTargetIndex,
        BuiltIn::ViewportIndex => SystemValue::ViewportIndex,
        BuiltIn::TessLevelOuter => SystemValue::OuterTessFactor,
        BuiltIn::TessLevelInner => SystemValue::InsideTessFactor,
        BuiltIn::PatchVertices => SystemValue::PatchNumVertices,
        BuiltIn::FrontFacing => SystemValue::IsFrontFace,
        BuiltIn::SampleId => SystemValue::SampleIndex,
        BuiltIn::SamplePosition => SystemValue::SamplePosition,
        BuiltIn::SampleMask => SystemValue::SampleCoverage,
        BuiltIn::FragColor => SystemValue::ColourOutput,
        BuiltIn::FragDepth => SystemValue::DepthOutput,
        _ => SystemValue::None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompType {
    Float,
    UInt,
    SInt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Texture1D,
    Texture1DArray,
    Texture2D,
    Texture2DArray,
    Texture2DMS,
    Texture2DMSArray,
    Texture3D,
    TextureCube,
    TextureCubeArray,
    TextureRect,
    Buffer,
    Unknown,
}

#[derive(Debug, Clone)]
pub struct SigParameter {
    pub var_name: String,
    pub system_value: SystemValue,
    pub comp_type: CompType,
    pub comp_count: u32,
    pub reg_index: u32,
    pub channel_mask: u32,
    pub stream: u32,
}

/// Where a block or resource binds: descriptor set and binding from
/// decorations; a missing binding is recorded as -1 and sorted to the
/// end, then rewritten to 0 once the table order is fixed.
#[derive(Debug, Clone, Copy)]
pub struct BindPoint {
    pub set: i32,
    pub bind: i32,
    pub used: bool,
    pub array_size: u32,
    pub bind_point: i32,
}

impl Default for BindPoint {
    fn default() -> Self {
        BindPoint {
            set: 0,
            bind: -1,
            used: false,
            array_size: 1,
            bind_point: -1,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ShaderConstant {
    pub name: String,
    pub type_name: String,
    pub comp_type: CompType,
    pub rows: u32,
    pub cols: u32,
    pub elements: u32,
    pub row_major: bool,
    pub members: Vec<ShaderConstant>,
}

#[derive(Debug, Clone)]
pub struct ConstantBlockReflection {
    pub name: String,
    pub buffer_backed: bool,
    pub bind: BindPoint,
    pub variables: Vec<ShaderConstant>,
}

#[derive(Debug, Clone)]
pub struct ResourceReflection {
    pub name: String,
    pub kind: ResourceKind,
    pub comp_type: CompType,
    pub bind: BindPoint,
}

#[derive(Debug, Clone)]
pub struct Reflection {
    pub inputs: Vec<SigParameter>,
    pub outputs: Vec<SigParameter>,
    pub constant_blocks: Vec<ConstantBlockReflection>,
    pub resources: Vec<ResourceReflection>,
    /// location -> input signature index, for plain (non-system) inputs.
    pub input_attributes: [i32; INPUT_ATTRIBUTE_COUNT],
}

fn comp_type_of(m: &Module, ty_idx: OpIdx) -> CompType {
    let kind = m.instr(ty_idx).ty().map(|t| t.kind);
    match kind {
        Some(TypeKind::Bool) | Some(TypeKind::UInt) => CompType::UInt,
        Some(TypeKind::SInt) => CompType::SInt,
        Some(TypeKind::Float) => CompType::Float,
        _ => {
            warn!("unexpected component type for reflection entry");
            CompType::Float
        }
    }
}

/// Expand one input/output variable into signature entries: one per
/// variable for scalars and vectors, one per row (or column) for
/// matrices, recursing into structs.
fn add_signature_parameter(
    m: &Module,
    id: u32,
    child_idx: Option<u32>,
    var_name: String,
    ty_idx: OpIdx,
    decorations: &[Decoration],
    sigarray: &mut Vec<SigParameter>,
    input_attrs: &mut Option<&mut [i32; INPUT_ATTRIBUTE_COUNT]>,
) {
    let mut reg_index = 0u32;
    let mut system_value = SystemValue::None;
    let mut rowmajor = true;

    for d in decorations {
        match d.kind {
            DecorationKind::Location => reg_index = d.val,
            DecorationKind::BuiltIn => system_value = builtin_system_value(BuiltIn::from_word(d.val)),
            DecorationKind::RowMajor => rowmajor = true,
            DecorationKind::ColMajor => rowmajor = false,
            _ => {}
        }
    }

    debug_assert!((reg_index as usize) < INPUT_ATTRIBUTE_COUNT);

    let mut ty_idx = ty_idx;
    if let Some(t) = m.instr(ty_idx).ty() {
        if t.kind == TypeKind::Pointer {
            if let Some(b) = t.base {
                ty_idx = b;
            }
        }
    }

    let Some(t) = m.instr(ty_idx).ty() else {
        warn!("signature variable {} has no resolvable type", id);
        return;
    };

    if t.kind == TypeKind::Struct {
        // nested structs are flattened one level at a time
        debug_assert!(child_idx.is_none());
        for (c, (member_ty, member_name)) in t.members.iter().enumerate() {
            let empty = Vec::new();
            let member_decorations = t.member_decorations.get(c).unwrap_or(&empty);
            add_signature_parameter(
                m,
                id,
                Some(c as u32),
                format!("{}.{}", var_name, member_name),
                *member_ty,
                member_decorations,
                sigarray,
                input_attrs,
            );
        }
        return;
    }

    let comp_type = comp_type_of(m, t.base.unwrap_or(ty_idx));
    let comp_count = t.vector_size;
    let channel_mask = (1u32 << t.vector_size) - 1;

    if t.matrix_size == 1 {
        let sig = SigParameter {
            var_name,
            system_value,
            comp_type,
            comp_count,
            reg_index,
            channel_mask,
            stream: 0,
        };
        if system_value == SystemValue::None && (reg_index as usize) < INPUT_ATTRIBUTE_COUNT {
            if let Some(attrs) = input_attrs {
                attrs[reg_index as usize] = sigarray.len() as i32;
            }
        }
        sigarray.push(sig);
    } else {
        // row-major matrices expand per row, column-major per column
        for row in 0..t.matrix_size {
            let reg = reg_index + row;
            debug_assert!((reg as usize) < INPUT_ATTRIBUTE_COUNT);
            let sig = SigParameter {
                var_name: format!(
                    "{}:{}{}",
                    var_name,
                    if rowmajor { "row" } else { "col" },
                    row
                ),
                system_value,
                comp_type,
                comp_count,
                reg_index: reg,
                channel_mask,
                stream: 0,
            };
            if system_value == SystemValue::None && (reg as usize) < INPUT_ATTRIBUTE_COUNT {
                if let Some(attrs) = input_attrs {
                    attrs[reg as usize] = sigarray.len() as i32;
                }
            }
            sigarray.push(sig);
        }
    }
}

/// Member walk for a uniform block, recursing into nested structs and
/// flattening arrays into element counts.
fn make_constant_block_variables(m: &Module, ty_idx: OpIdx) -> Vec<ShaderConstant> {
    let Some(t) = m.instr(ty_idx).ty() else {
        return Vec::new();
    };
    debug_assert!(!t.members.is_empty());

    let mut out = Vec::with_capacity(t.members.len());

    for (i, (member_ty, member_name)) in t.members.iter().enumerate() {
        let mut elements = 1;
        let mut suffix = String::new();
        let mut mt_idx = *member_ty;

        if let Some(mt) = m.instr(mt_idx).ty() {
            if mt.kind == TypeKind::Array {
                suffix = format!("[{}]", mt.array_size);
                elements = mt.array_size;
                if let Some(b) = mt.base {
                    mt_idx = b;
                }
            }
        }

        let empty = Vec::new();
        let decorations = t.member_decorations.get(i).unwrap_or(&empty);
        let row_major = decorations
            .iter()
            .any(|d| d.kind == DecorationKind::RowMajor);

        let constant = match m.instr(mt_idx).ty() {
            Some(mt) if mt.kind == TypeKind::Vector || mt.kind == TypeKind::Matrix => {
                let (rows, cols) = if mt.kind == TypeKind::Matrix {
                    (mt.vector_size, mt.matrix_size)
                } else {
                    (1, mt.vector_size)
                };
                ShaderConstant {
                    name: member_name.clone(),
                    type_name: type_name(m, mt_idx) + &suffix,
                    comp_type: comp_type_of(m, mt.base.unwrap_or(mt_idx)),
                    rows,
                    cols,
                    elements,
                    row_major,
                    members: Vec::new(),
                }
            }
            Some(mt) if mt.kind.is_scalar() => ShaderConstant {
                name: member_name.clone(),
                type_name: type_name(m, mt_idx) + &suffix,
                comp_type: comp_type_of(m, mt_idx),
                rows: 1,
                cols: 1,
                elements,
                row_major: false,
                members: Vec::new(),
            },
            _ => ShaderConstant {
                name: member_name.clone(),
                type_name: type_name(m, mt_idx) + &suffix,
                comp_type: CompType::Float,
                rows: 0,
                cols: 0,
                elements,
                row_major: false,
                members: make_constant_block_variables(m, mt_idx),
            },
        };

        out.push(constant);
    }

    out
}

fn resource_kind(m: &Module, ty_idx: OpIdx) -> ResourceKind {
    let Some(t) = m.instr(ty_idx).ty() else {
        return ResourceKind::Unknown;
    };
    if t.multisampled {
        return if t.arrayed {
            ResourceKind::Texture2DMSArray
        } else {
            ResourceKind::Texture2DMS
        };
    }
    match t.dim {
        Dim::Dim1D => {
            if t.arrayed {
                ResourceKind::Texture1DArray
            } else {
                ResourceKind::Texture1D
            }
        }
        Dim::Dim2D => {
            if t.arrayed {
                ResourceKind::Texture2DArray
            } else {
                ResourceKind::Texture2D
            }
        }
        Dim::Cube => {
            if t.arrayed {
                ResourceKind::TextureCubeArray
            } else {
                ResourceKind::TextureCube
            }
        }
        Dim::Dim3D => ResourceKind::Texture3D,
        Dim::Rect => ResourceKind::TextureRect,
        Dim::Buffer => ResourceKind::Buffer,
        _ => ResourceKind::Unknown,
    }
}

fn bindpoint_from(m: &Module, g: OpIdx, array_size: u32) -> BindPoint {
    let mut bind = BindPoint {
        array_size,
        ..BindPoint::default()
    };

    // the set can be implicitly 0 but a binding has to be explicit; an
    // absent binding sorts to the end of the table
    for d in &m.instr(g).decorations {
        match d.kind {
            DecorationKind::DescriptorSet => bind.set = d.val as i32,
            DecorationKind::Binding => bind.bind = d.val as i32,
            _ => {}
        }
    }

    bind.used = global_is_used(m, g);
    bind
}

fn global_is_used(m: &Module, g: OpIdx) -> bool {
    for inst in &m.ops {
        if let Some(op) = inst.op() {
            if op.args.contains(&g) {
                return true;
            }
        }
    }
    false
}

fn bind_order(a: &BindPoint, b: &BindPoint) -> Ordering {
    if a.set != b.set {
        return a.set.cmp(&b.set);
    }
    match (a.bind, b.bind) {
        (-1, -1) => Ordering::Equal,
        (-1, _) => Ordering::Greater,
        (_, -1) => Ordering::Less,
        (x, y) => x.cmp(&y),
    }
}

/// Extract the reflection record from a parsed module.
pub fn reflect_module(m: &Module) -> Reflection {
    let mut inputs: Vec<SigParameter> = Vec::new();
    let mut outputs: Vec<SigParameter> = Vec::new();
    let mut cblocks: Vec<ConstantBlockReflection> = Vec::new();
    let mut resources: Vec<ResourceReflection> = Vec::new();
    let mut input_attributes = [-1i32; INPUT_ATTRIBUTE_COUNT];

    for &g in &m.globals {
        let Some(var) = m.instr(g).var() else { continue };
        let (var_ty, storage) = (var.ty, var.storage);

        match storage {
            StorageClass::Input | StorageClass::Output => {
                let is_input = storage == StorageClass::Input;

                // instance name, then type name for structs, then the ID
                let name = if !m.instr(g).name.is_empty() {
                    m.instr(g).name.clone()
                } else {
                    let struct_name = m
                        .instr(var_ty)
                        .ty()
                        .filter(|t| t.kind == TypeKind::Pointer)
                        .and_then(|t| t.base)
                        .and_then(|b| m.instr(b).ty())
                        .filter(|t| t.kind == TypeKind::Struct)
                        .map(|t| t.cached_name.borrow().clone())
                        .filter(|n| !n.is_empty());
                    struct_name.unwrap_or_else(|| format!("sig{}", m.instr(g).id))
                };

                let sigarray = if is_input { &mut inputs } else { &mut outputs };
                let mut attrs = if is_input {
                    Some(&mut input_attributes)
                } else {
                    None
                };
                add_signature_parameter(
                    m,
                    m.instr(g).id,
                    None,
                    name,
                    var_ty,
                    &m.instr(g).decorations,
                    sigarray,
                    &mut attrs,
                );
            }
            StorageClass::Uniform | StorageClass::UniformConstant | StorageClass::PushConstant => {
                let push_const = storage == StorageClass::PushConstant;

                let mut ty = var_ty;
                if let Some(t) = m.instr(ty).ty().filter(|t| t.kind == TypeKind::Pointer) {
                    if let Some(b) = t.base {
                        ty = b;
                    }
                }

                let mut array_size = 1;
                if let Some(t) = m.instr(ty).ty().filter(|t| t.kind == TypeKind::Array) {
                    array_size = t.array_size;
                    if let Some(b) = t.base {
                        ty = b;
                    }
                }

                let bind = bindpoint_from(m, g, array_size);

                if m.instr(ty).ty().map_or(false, |t| t.kind == TypeKind::Struct) {
                    let name = if !m.instr(g).name.is_empty() {
                        m.instr(g).name.clone()
                    } else {
                        let tn = m.instr(ty).ty().unwrap().cached_name.borrow().clone();
                        if tn.is_empty() {
                            format!("uniforms{}", m.instr(g).id)
                        } else {
                            tn
                        }
                    };

                    let buffer_backed = !push_const;
                    // a used buffer-backed block must carry a binding
                    debug_assert!(!bind.used || !buffer_backed || bind.bind >= 0);

                    cblocks.push(ConstantBlockReflection {
                        name,
                        buffer_backed,
                        bind,
                        variables: make_constant_block_variables(m, ty),
                    });
                } else {
                    let name = if m.instr(g).name.is_empty() {
                        format!("res{}", m.instr(g).id)
                    } else {
                        m.instr(g).name.clone()
                    };

                    // sampled-image wrappers reflect their inner image
                    let mut img_ty = ty;
                    if let Some(t) = m
                        .instr(img_ty)
                        .ty()
                        .filter(|t| t.kind == TypeKind::SampledImage)
                    {
                        if let Some(b) = t.base {
                            img_ty = b;
                        }
                    }

                    let mut sampled_ty = img_ty;
                    if let Some(t) = m.instr(img_ty).ty().and_then(|t| t.base) {
                        sampled_ty = t;
                    }

                    debug_assert!(!bind.used || bind.bind >= 0);

                    resources.push(ResourceReflection {
                        name,
                        kind: resource_kind(m, img_ty),
                        comp_type: comp_type_of(m, sampled_ty),
                        bind,
                    });
                }
            }
            _ => {
                warn!(
                    "unexpected storage class for global: {}",
                    storage.name()
                );
            }
        }
    }

    // system-value semantics sort to the start, then by register
    inputs.sort_by_key(|s| (s.system_value, s.reg_index));
    outputs.sort_by_key(|s| (s.system_value, s.reg_index));

    cblocks.sort_by(|a, b| bind_order(&a.bind, &b.bind));
    resources.sort_by(|a, b| bind_order(&a.bind, &b.bind));

    // bind points marked -1 were sorted to the end; from here on they are
    // plain indices with no special casing
    for (i, c) in cblocks.iter_mut().enumerate() {
        if c.bind.bind == -1 {
            c.bind.bind = 0;
        }
        c.bind.bind_point = i as i32;
    }
    for (i, r) in resources.iter_mut().enumerate() {
        if r.bind.bind == -1 {
            r.bind.bind = 0;
        }
        r.bind.bind_point = i as i32;
    }

    Reflection {
        inputs,
        outputs,
        constant_blocks: cblocks,
        resources,
        input_attributes,
    }
}
