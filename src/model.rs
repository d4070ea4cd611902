use std::cell::RefCell;

use log::warn;

use crate::spv::{
    BuiltIn, Capability, DecorationKind, Dim, ExecutionMode, ExecutionModel, ImageFormat, Op,
    SourceLanguage, StorageClass,
};

/// Index of an instruction inside the module arena.
pub type OpIdx = usize;

/// Depth cap for expression folding; see the inliner.
pub const NO_INLINE_COMPLEXITY: i32 = 3;

#[derive(Debug, Clone, Default)]
pub struct SourceLoc {
    pub file: String,
    pub line: u32,
    pub col: u32,
}

#[derive(Debug, Clone)]
pub struct Decoration {
    pub kind: DecorationKind,
    pub val: u32,
}

impl Decoration {
    /// Disassembly form. Bare flags print their name; valued decorations
    /// print short `Name=value` forms matching the listing style.
    pub fn str(&self) -> String {
        match self.kind {
            DecorationKind::RowMajor
            | DecorationKind::ColMajor
            | DecorationKind::NoPerspective
            | DecorationKind::Flat
            | DecorationKind::Centroid
            | DecorationKind::GlslShared
            | DecorationKind::Block
            | DecorationKind::BufferBlock
            | DecorationKind::RelaxedPrecision => self.kind.name(),
            DecorationKind::ArrayStride => format!("ArrayStride={}", self.val),
            DecorationKind::MatrixStride => format!("MatrixStride={}", self.val),
            DecorationKind::Location => format!("Location={}", self.val),
            DecorationKind::Binding => format!("Bind={}", self.val),
            DecorationKind::DescriptorSet => format!("DescSet={}", self.val),
            DecorationKind::Offset => format!("Offset={}", self.val),
            DecorationKind::BuiltIn => format!("Builtin {}", BuiltIn::from_word(self.val).name()),
            DecorationKind::SpecId => format!("Specialize[{}]", self.val),
            _ => format!("{}={}", self.kind.name(), self.val),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    Void,
    Bool,
    Float,
    SInt,
    UInt,
    Vector,
    Matrix,
    Array,
    Pointer,
    Struct,
    Image,
    Sampler,
    SampledImage,
    Function,
}

impl TypeKind {
    pub fn is_scalar(self) -> bool {
        matches!(
            self,
            TypeKind::Bool | TypeKind::Float | TypeKind::SInt | TypeKind::UInt
        )
    }

    pub fn is_basic_int(self) -> bool {
        matches!(self, TypeKind::SInt | TypeKind::UInt)
    }
}

#[derive(Debug, Clone)]
pub struct TypeData {
    pub kind: TypeKind,
    /// Component type for vectors, pointee for pointers, element type for
    /// arrays, sampled type for images, return type for function types.
    pub base: Option<OpIdx>,
    /// Canonical short name, computed lazily and cached once. An OpName
    /// seen during the annotation pass pre-fills it.
    pub cached_name: RefCell<String>,
    /// Struct members or function parameters: (type, member name).
    pub members: Vec<(OpIdx, String)>,
    pub member_decorations: Vec<Vec<Decoration>>,
    // pointer
    pub storage: StorageClass,
    // image
    pub dim: Dim,
    pub sampled: u32,
    pub arrayed: bool,
    pub depth: bool,
    pub multisampled: bool,
    pub format: ImageFormat,
    // scalars
    pub bit_count: u32,
    pub vector_size: u32,
    pub matrix_size: u32,
    pub array_size: u32,
}

impl TypeData {
    pub fn new(kind: TypeKind) -> Self {
        TypeData {
            kind,
            base: None,
            cached_name: RefCell::new(String::new()),
            members: Vec::new(),
            member_decorations: Vec::new(),
            storage: StorageClass::UniformConstant,
            dim: Dim::Dim2D,
            sampled: 2,
            arrayed: false,
            depth: false,
            multisampled: false,
            format: ImageFormat::Unknown,
            bit_count: 32,
            vector_size: 1,
            matrix_size: 1,
            array_size: 1,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SamplerLiteral {
    pub addressing: u32,
    pub normalised: bool,
    pub filter: u32,
}

#[derive(Debug, Clone)]
pub struct ConstantData {
    pub ty: OpIdx,
    /// Raw payload, holding anything up to 64 bits.
    pub raw: u64,
    /// Child constants for composites.
    pub children: Vec<OpIdx>,
    pub sampler: Option<SamplerLiteral>,
}

impl ConstantData {
    pub fn as_f32(&self) -> f32 {
        f32::from_bits(self.raw as u32)
    }

    pub fn as_f64(&self) -> f64 {
        f64::from_bits(self.raw)
    }

    pub fn as_i32(&self) -> i32 {
        self.raw as i32
    }
}

#[derive(Debug, Clone)]
pub struct VariableData {
    pub ty: OpIdx,
    pub storage: StorageClass,
    pub initialiser: Option<OpIdx>,
}

#[derive(Debug, Clone)]
pub struct OperationData {
    /// Result type; stores and copies have none.
    pub ty: Option<OpIdx>,
    pub args: Vec<OpIdx>,
    /// Literal words: shuffle selectors, composite indices, ext-inst number.
    pub literals: Vec<u32>,
    /// Memory access mask for loads/stores/copies.
    pub access: u32,
    /// Target function ID for OpFunctionCall.
    pub func_call: u32,
    /// Binary/unary math shape; mathop operands get bracketed when nested.
    pub mathop: bool,
    /// Rendered expression-tree depth, grown by the inliner and capped to
    /// gate further folding.
    pub complexity: i32,
    /// Bit i set means argument i renders inline by its expression rather
    /// than by its ID name.
    pub inline_args: u32,
}

impl OperationData {
    pub fn new(ty: Option<OpIdx>) -> Self {
        OperationData {
            ty,
            args: Vec::new(),
            literals: Vec::new(),
            access: 0,
            func_call: 0,
            mathop: false,
            complexity: 0,
            inline_args: 0,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct FlowData {
    /// Selection or loop control mask, depending on the opcode.
    pub control: u32,
    pub condition: Option<OpIdx>,
    /// Branch weights or switch cases.
    pub literals: Vec<u32>,
    /// Target IDs; flow control may reference labels defined later, so
    /// these stay as IDs and resolve through the arena.
    pub targets: Vec<u32>,
}

#[derive(Debug, Clone, Default)]
pub struct BlockData {
    pub insns: Vec<OpIdx>,
    /// OpSelectionMerge / OpLoopMerge annotation, if any.
    pub merge_flow: Option<OpIdx>,
    /// Terminator; a parsed block always has one.
    pub exit_flow: Option<OpIdx>,
}

#[derive(Debug, Clone)]
pub struct FunctionData {
    pub ret_type: OpIdx,
    pub func_type: OpIdx,
    pub params: Vec<OpIdx>,
    pub control: u32,
    /// Ordered; the first block is the entry.
    pub blocks: Vec<OpIdx>,
    pub variables: Vec<OpIdx>,
}

#[derive(Debug, Clone)]
pub struct ModeData {
    pub mode: ExecutionMode,
    pub x: u32,
    pub y: u32,
    pub z: u32,
}

#[derive(Debug, Clone)]
pub struct EntryPointData {
    /// Entry points precede the function they name, so the function is
    /// referenced by ID.
    pub func: u32,
    pub model: ExecutionModel,
    pub name: String,
    pub modes: Vec<ModeData>,
}

#[derive(Debug, Clone)]
pub struct ExtSetData {
    pub setname: String,
    /// Debug name table; empty for sets we only know by name.
    pub names: &'static [&'static str],
}

/// Exactly one payload per instruction, tagged by what the opcode declares.
#[derive(Debug, Clone)]
pub enum Payload {
    None,
    Type(TypeData),
    Constant(ConstantData),
    Variable(VariableData),
    Op(OperationData),
    Flow(FlowData),
    Block(BlockData),
    Function(FunctionData),
    EntryPoint(EntryPointData),
    ExtInstSet(ExtSetData),
}

/// The universal node: every parsed instruction becomes one of these in
/// the module arena, cross-referenced by arena index.
#[derive(Debug, Clone)]
pub struct Instruction {
    pub opcode: Op,
    /// SSA result-ID; 0 means no result.
    pub id: u32,
    /// Textual name from OpName (or filled in from related instructions).
    pub name: String,
    pub source: Option<SourceLoc>,
    /// Line number in the flattened listing, for debugger cross-references.
    pub line: i32,
    pub decorations: Vec<Decoration>,
    pub payload: Payload,
}

impl Instruction {
    pub fn new(opcode: Op) -> Self {
        Instruction {
            opcode,
            id: 0,
            name: String::new(),
            source: None,
            line: -1,
            decorations: Vec::new(),
            payload: Payload::None,
        }
    }

    pub fn ty(&self) -> Option<&TypeData> {
        match &self.payload {
            Payload::Type(t) => Some(t),
            _ => None,
        }
    }

    pub fn ty_mut(&mut self) -> Option<&mut TypeData> {
        match &mut self.payload {
            Payload::Type(t) => Some(t),
            _ => None,
        }
    }

    pub fn constant(&self) -> Option<&ConstantData> {
        match &self.payload {
            Payload::Constant(c) => Some(c),
            _ => None,
        }
    }

    pub fn var(&self) -> Option<&VariableData> {
        match &self.payload {
            Payload::Variable(v) => Some(v),
            _ => None,
        }
    }

    pub fn op(&self) -> Option<&OperationData> {
        match &self.payload {
            Payload::Op(o) => Some(o),
            _ => None,
        }
    }

    pub fn op_mut(&mut self) -> Option<&mut OperationData> {
        match &mut self.payload {
            Payload::Op(o) => Some(o),
            _ => None,
        }
    }

    pub fn flow(&self) -> Option<&FlowData> {
        match &self.payload {
            Payload::Flow(f) => Some(f),
            _ => None,
        }
    }

    pub fn block(&self) -> Option<&BlockData> {
        match &self.payload {
            Payload::Block(b) => Some(b),
            _ => None,
        }
    }

    pub fn block_mut(&mut self) -> Option<&mut BlockData> {
        match &mut self.payload {
            Payload::Block(b) => Some(b),
            _ => None,
        }
    }

    pub fn func(&self) -> Option<&FunctionData> {
        match &self.payload {
            Payload::Function(f) => Some(f),
            _ => None,
        }
    }

    pub fn func_mut(&mut self) -> Option<&mut FunctionData> {
        match &mut self.payload {
            Payload::Function(f) => Some(f),
            _ => None,
        }
    }

    pub fn entry(&self) -> Option<&EntryPointData> {
        match &self.payload {
            Payload::EntryPoint(e) => Some(e),
            _ => None,
        }
    }

    pub fn entry_mut(&mut self) -> Option<&mut EntryPointData> {
        match &mut self.payload {
            Payload::EntryPoint(e) => Some(e),
            _ => None,
        }
    }

    pub fn ext(&self) -> Option<&ExtSetData> {
        match &self.payload {
            Payload::ExtInstSet(e) => Some(e),
            _ => None,
        }
    }
}

/// A decoded module. The arena (`ops`) is the sole ownership root; every
/// other collection holds indices into it.
#[derive(Debug, Default)]
pub struct Module {
    pub version: u32,
    pub generator: u32,
    pub source_lang: SourceLanguage,
    pub source_ver: u32,

    /// Every instruction ever allocated, owning storage.
    pub ops: Vec<Instruction>,
    /// Result-ID -> arena index; None until the ID is defined.
    pub ids: Vec<Option<OpIdx>>,

    pub entries: Vec<OpIdx>,
    pub structs: Vec<OpIdx>,
    pub globals: Vec<OpIdx>,
    pub funcs: Vec<OpIdx>,
    pub source_exts: Vec<OpIdx>,
    pub capabilities: Vec<Capability>,
}

impl Module {
    pub fn id_bound(&self) -> u32 {
        self.ids.len() as u32
    }

    pub fn instr(&self, idx: OpIdx) -> &Instruction {
        &self.ops[idx]
    }

    /// O(1) ID lookup.
    pub fn by_id(&self, id: u32) -> Option<OpIdx> {
        self.ids.get(id as usize).copied().flatten()
    }

    pub fn alloc(&mut self, instr: Instruction) -> OpIdx {
        self.ops.push(instr);
        self.ops.len() - 1
    }

    pub fn assign_id(&mut self, id: u32, idx: OpIdx) {
        if (id as usize) >= self.ids.len() {
            self.ids.resize(id as usize + 1, None);
        }
        self.ops[idx].id = id;
        self.ids[id as usize] = Some(idx);
    }

    /// Resolve an ID, allocating a placeholder instruction for references
    /// to IDs that have not been defined yet (or never will be).
    pub fn get_or_dummy(&mut self, id: u32) -> OpIdx {
        if let Some(idx) = self.by_id(id) {
            return idx;
        }
        warn!(
            "expected to find ID {} but didn't - allocating a dummy instruction",
            id
        );
        let idx = self.alloc(Instruction::new(Op::Unknown));
        self.assign_id(id, idx);
        idx
    }

    /// Storage-class rank used to order globals: inputs, then outputs,
    /// then uniform-likes, then everything else.
    pub fn storage_sort_rank(storage: StorageClass) -> u32 {
        match storage {
            StorageClass::Input => 0,
            StorageClass::Output => 1,
            StorageClass::Uniform | StorageClass::UniformConstant | StorageClass::PushConstant => 2,
            _ => 3,
        }
    }

    /// The known-generator table, just for the disassembly banner.
    pub fn generator_name(generator: u32) -> &'static str {
        match generator {
            0x051a_00bb => "glslang",
            _ => "Unrecognised",
        }
    }
}

pub fn decoration_list_str(decorations: &[Decoration]) -> String {
    decorations
        .iter()
        .map(|d| d.str())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dummy_allocation_resolves_forward_reference() {
        let mut m = Module::default();
        let idx = m.get_or_dummy(5);
        assert_eq!(m.instr(idx).opcode, Op::Unknown);
        assert_eq!(m.instr(idx).id, 5);
        assert_eq!(m.by_id(5), Some(idx));
        // a second lookup must not allocate again
        assert_eq!(m.get_or_dummy(5), idx);
    }

    #[test]
    fn decoration_strings() {
        let d = Decoration { kind: DecorationKind::Location, val: 3 };
        assert_eq!(d.str(), "Location=3");
        let d = Decoration { kind: DecorationKind::BuiltIn, val: 0 };
        assert_eq!(d.str(), "Builtin Position");
        let d = Decoration { kind: DecorationKind::RowMajor, val: 0 };
        assert_eq!(d.str(), "RowMajor");
    }

    #[test]
    fn storage_rank_groups_globals() {
        assert!(
            Module::storage_sort_rank(StorageClass::Input)
                < Module::storage_sort_rank(StorageClass::Output)
        );
        assert!(
            Module::storage_sort_rank(StorageClass::Output)
                < Module::storage_sort_rank(StorageClass::Uniform)
        );
        assert_eq!(
            Module::storage_sort_rank(StorageClass::Uniform),
            Module::storage_sort_rank(StorageClass::PushConstant)
        );
    }
}
