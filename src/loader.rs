use anyhow::{bail, Result};
use byteorder::{ByteOrder, LittleEndian};
use log::{debug, warn};

use crate::model::{
    BlockData, ConstantData, Decoration, EntryPointData, ExtSetData, FlowData, FunctionData,
    Instruction, ModeData, Module, OpIdx, OperationData, Payload, SamplerLiteral, SourceLoc,
    TypeData, TypeKind, VariableData,
};
use crate::spv::{
    self, Capability, DecorationKind, Dim, ExecutionMode, ExecutionModel, ImageFormat, Op,
    SourceLanguage, StorageClass,
};

/// Reinterpret a little-endian byte buffer as the 32-bit word stream.
pub fn words_from_bytes(buf: &[u8]) -> Result<Vec<u32>> {
    if buf.len() % 4 != 0 {
        bail!("SPIR-V buffer length {} is not a multiple of 4", buf.len());
    }
    let mut words = vec![0u32; buf.len() / 4];
    LittleEndian::read_u32_into(buf, &mut words);
    Ok(words)
}

/// Decode a SPIR-V word stream into a module.
///
/// A bad magic number or unsupported version aborts the decode; everything
/// else is best-effort: unknown opcodes and dangling references become
/// placeholder instructions and the parse continues.
pub fn parse_module(words: &[u32]) -> Result<Module> {
    if words.len() < 5 {
        bail!("SPIR-V module too small: {} words", words.len());
    }
    if words[0] != spv::SPIRV_MAGIC {
        bail!("unrecognised SPIR-V magic number {:08x}", words[0]);
    }
    if words[1] != spv::SPIRV_VERSION {
        bail!("unsupported SPIR-V version: {:08x}", words[1]);
    }

    let mut m = Module {
        version: words[1],
        generator: words[2],
        ..Module::default()
    };
    let id_bound = words[3] as usize;
    m.ids = vec![None; id_bound];
    debug_assert_eq!(words[4], 0, "reserved header word must be zero");

    structural_pass(&mut m, words)?;
    annotation_pass(&mut m, words)?;
    finalise(&mut m);

    Ok(m)
}

fn read_string(words: &[u32]) -> String {
    let mut bytes = Vec::new();
    'words: for w in words {
        for b in w.to_le_bytes() {
            if b == 0 {
                break 'words;
            }
            bytes.push(b);
        }
    }
    String::from_utf8_lossy(&bytes).into_owned()
}

fn is_binary_math(op: Op) -> bool {
    matches!(
        op,
        Op::IAdd
            | Op::FAdd
            | Op::ISub
            | Op::FSub
            | Op::IMul
            | Op::FMul
            | Op::UDiv
            | Op::SDiv
            | Op::FDiv
            | Op::UMod
            | Op::SRem
            | Op::SMod
            | Op::FRem
            | Op::FMod
            | Op::VectorTimesScalar
            | Op::MatrixTimesScalar
            | Op::VectorTimesMatrix
            | Op::MatrixTimesVector
            | Op::MatrixTimesMatrix
            | Op::IEqual
            | Op::INotEqual
            | Op::ULessThan
            | Op::SLessThan
            | Op::ULessThanEqual
            | Op::SLessThanEqual
            | Op::UGreaterThan
            | Op::SGreaterThan
            | Op::UGreaterThanEqual
            | Op::SGreaterThanEqual
            | Op::FOrdEqual
            | Op::FOrdNotEqual
            | Op::FOrdLessThan
            | Op::FOrdLessThanEqual
            | Op::FOrdGreaterThan
            | Op::FOrdGreaterThanEqual
            | Op::FUnordEqual
            | Op::FUnordNotEqual
            | Op::FUnordLessThan
            | Op::FUnordLessThanEqual
            | Op::FUnordGreaterThan
            | Op::FUnordGreaterThanEqual
            | Op::LogicalEqual
            | Op::LogicalNotEqual
            | Op::LogicalAnd
            | Op::LogicalOr
            | Op::ShiftLeftLogical
            | Op::ShiftRightLogical
            | Op::ShiftRightArithmetic
            | Op::BitwiseOr
            | Op::BitwiseXor
            | Op::BitwiseAnd
    )
}

fn is_unary_math(op: Op) -> bool {
    matches!(op, Op::FNegate | Op::SNegate | Op::Not | Op::LogicalNot)
}

fn structural_pass(m: &mut Module, words: &[u32]) -> Result<()> {
    let mut cur_func: Option<OpIdx> = None;
    let mut cur_block: Option<OpIdx> = None;

    let mut it = 5usize;
    while it < words.len() {
        let word_count = (words[it] >> spv::WORD_COUNT_SHIFT) as usize;
        let opcode = Op::from_word((words[it] & spv::OPCODE_MASK) as u16);
        if word_count == 0 {
            bail!("zero-length instruction at word {}", it);
        }
        if it + word_count > words.len() {
            bail!(
                "truncated instruction at word {}: need {}, have {}",
                it,
                word_count,
                words.len() - it
            );
        }
        let insn = &words[it..it + word_count];
        let wc = word_count;

        let idx = m.alloc(Instruction::new(opcode));

        match opcode {
            //////////////////////////////////////////////////////////////
            // Module-level opcodes
            Op::Source => {
                m.source_lang = SourceLanguage::from_word(insn[1]);
                m.source_ver = insn[2];
                if wc > 3 {
                    debug!("OpSource carries a filename id; ignored");
                }
            }
            Op::SourceContinued => {
                debug!("OpSourceContinued ignored");
            }
            Op::SourceExtension => {
                m.ops[idx].name = read_string(&insn[1..]);
                m.source_exts.push(idx);
            }
            Op::Capability => {
                m.capabilities.push(Capability::from_word(insn[1]));
            }
            Op::MemoryModel | Op::Extension => {}
            Op::EntryPoint => {
                m.ops[idx].payload = Payload::EntryPoint(EntryPointData {
                    func: insn[2],
                    model: ExecutionModel::from_word(insn[1]),
                    name: read_string(&insn[3..]),
                    modes: Vec::new(),
                });
                m.entries.push(idx);
            }
            Op::ExecutionMode => {
                let func = insn[1];
                let mode = ModeData {
                    mode: ExecutionMode::from_word(insn[2]),
                    x: if wc > 3 { insn[3] } else { 0 },
                    y: if wc > 4 { insn[4] } else { 0 },
                    z: if wc > 5 { insn[5] } else { 0 },
                };
                let entries = m.entries.clone();
                for e in entries {
                    if m.ops[e].entry().map_or(false, |ep| ep.func == func) {
                        m.ops[e].entry_mut().unwrap().modes.push(mode.clone());
                        break;
                    }
                }
            }
            Op::ExtInstImport => {
                let setname = read_string(&insn[2..]);
                let names: &'static [&'static str] = if setname == "GLSL.std.450" {
                    spv::glsl450_debug_names()
                } else {
                    &[]
                };
                m.ops[idx].payload = Payload::ExtInstSet(ExtSetData { setname, names });
                m.assign_id(insn[1], idx);
            }
            Op::String => {
                m.ops[idx].name = read_string(&insn[2..]);
                m.assign_id(insn[1], idx);
            }
            //////////////////////////////////////////////////////////////
            // Type opcodes
            Op::TypeVoid => {
                m.ops[idx].payload = Payload::Type(TypeData::new(TypeKind::Void));
                m.assign_id(insn[1], idx);
            }
            Op::TypeBool => {
                m.ops[idx].payload = Payload::Type(TypeData::new(TypeKind::Bool));
                m.assign_id(insn[1], idx);
            }
            Op::TypeInt => {
                let kind = if insn[3] != 0 { TypeKind::SInt } else { TypeKind::UInt };
                let mut t = TypeData::new(kind);
                t.bit_count = insn[2];
                m.ops[idx].payload = Payload::Type(t);
                m.assign_id(insn[1], idx);
            }
            Op::TypeFloat => {
                let mut t = TypeData::new(TypeKind::Float);
                t.bit_count = insn[2];
                m.ops[idx].payload = Payload::Type(t);
                m.assign_id(insn[1], idx);
            }
            Op::TypeVector => {
                let base = m.get_or_dummy(insn[2]);
                debug_assert!(m.ops[base].ty().is_some());
                let mut t = TypeData::new(TypeKind::Vector);
                t.base = Some(base);
                t.vector_size = insn[3];
                m.ops[idx].payload = Payload::Type(t);
                m.assign_id(insn[1], idx);
            }
            Op::TypeMatrix => {
                // the base of a matrix is the component type of its column
                // vector, with the vector size folded into the matrix type
                let col = m.get_or_dummy(insn[2]);
                let mut t = TypeData::new(TypeKind::Matrix);
                if let Some(coltype) = m.ops[col].ty() {
                    debug_assert_eq!(coltype.kind, TypeKind::Vector);
                    t.base = coltype.base;
                    t.vector_size = coltype.vector_size;
                } else {
                    t.base = Some(col);
                }
                t.matrix_size = insn[3];
                m.ops[idx].payload = Payload::Type(t);
                m.assign_id(insn[1], idx);
            }
            Op::TypeArray => {
                let base = m.get_or_dummy(insn[2]);
                let size = m.get_or_dummy(insn[3]);
                let mut t = TypeData::new(TypeKind::Array);
                t.base = Some(base);
                debug_assert!(m.ops[size]
                    .constant()
                    .map_or(false, |c| m.ops[c.ty].ty().map_or(false, |t| t.kind.is_basic_int())));
                t.array_size = m.ops[size].constant().map_or(1, |c| c.raw as u32);
                m.ops[idx].payload = Payload::Type(t);
                m.assign_id(insn[1], idx);
            }
            Op::TypeStruct => {
                let mut t = TypeData::new(TypeKind::Struct);
                for &w in &insn[2..] {
                    let member = m.get_or_dummy(w);
                    debug_assert!(m.ops[member].ty().is_some());
                    // names might come later from OpMemberName instructions
                    t.members.push((member, String::new()));
                    t.member_decorations.push(Vec::new());
                }
                m.ops[idx].payload = Payload::Type(t);
                m.structs.push(idx);
                m.assign_id(insn[1], idx);
            }
            Op::TypePointer => {
                let base = m.get_or_dummy(insn[3]);
                let mut t = TypeData::new(TypeKind::Pointer);
                t.base = Some(base);
                t.storage = StorageClass::from_word(insn[2]);
                m.ops[idx].payload = Payload::Type(t);
                m.assign_id(insn[1], idx);
            }
            Op::TypeImage => {
                let base = m.get_or_dummy(insn[2]);
                let mut t = TypeData::new(TypeKind::Image);
                t.base = Some(base);
                t.dim = Dim::from_word(insn[3]);
                t.depth = insn[4] != 0;
                t.arrayed = insn[5] != 0;
                t.multisampled = insn[6] != 0;
                t.sampled = insn[7];
                t.format = ImageFormat::from_word(insn[8]);
                // not checking the access qualifier
                m.ops[idx].payload = Payload::Type(t);
                m.assign_id(insn[1], idx);
            }
            Op::TypeSampler => {
                m.ops[idx].payload = Payload::Type(TypeData::new(TypeKind::Sampler));
                m.assign_id(insn[1], idx);
            }
            Op::TypeSampledImage => {
                let base = m.get_or_dummy(insn[2]);
                let mut t = TypeData::new(TypeKind::SampledImage);
                t.base = Some(base);
                m.ops[idx].payload = Payload::Type(t);
                m.assign_id(insn[1], idx);
            }
            Op::TypeFunction => {
                let ret = m.get_or_dummy(insn[2]);
                let mut t = TypeData::new(TypeKind::Function);
                t.base = Some(ret);
                for &w in &insn[3..] {
                    let arg = m.get_or_dummy(w);
                    // function parameters carry no name at the type level
                    t.members.push((arg, String::new()));
                    t.member_decorations.push(Vec::new());
                }
                m.ops[idx].payload = Payload::Type(t);
                m.assign_id(insn[1], idx);
            }
            Op::TypeRuntimeArray => {
                let base = m.get_or_dummy(insn[2]);
                let mut t = TypeData::new(TypeKind::Array);
                t.base = Some(base);
                // unsized; the declarator prints a zero extent
                t.array_size = 0;
                m.ops[idx].payload = Payload::Type(t);
                m.assign_id(insn[1], idx);
            }
            Op::TypeOpaque => {
                let t = TypeData::new(TypeKind::Struct);
                *t.cached_name.borrow_mut() = read_string(&insn[2..]);
                m.ops[idx].payload = Payload::Type(t);
                m.assign_id(insn[1], idx);
            }
            //////////////////////////////////////////////////////////////
            // Constants
            Op::ConstantTrue | Op::ConstantFalse => {
                let ty = m.get_or_dummy(insn[1]);
                m.ops[idx].payload = Payload::Constant(ConstantData {
                    ty,
                    raw: if opcode == Op::ConstantTrue { 1 } else { 0 },
                    children: Vec::new(),
                    sampler: None,
                });
                m.assign_id(insn[2], idx);
            }
            Op::Constant => {
                let ty = m.get_or_dummy(insn[1]);
                let mut raw = insn[3] as u64;
                if wc > 4 {
                    raw |= (insn[4] as u64) << 32;
                }
                if wc > 5 {
                    // wider constants are not representable; keep 64 bits
                    warn!("OpConstant with {} payload words truncated to 64 bits", wc - 3);
                }
                m.ops[idx].payload = Payload::Constant(ConstantData {
                    ty,
                    raw,
                    children: Vec::new(),
                    sampler: None,
                });
                m.assign_id(insn[2], idx);
            }
            Op::ConstantNull => {
                let ty = m.get_or_dummy(insn[1]);
                m.ops[idx].payload = Payload::Constant(ConstantData {
                    ty,
                    raw: 0,
                    children: Vec::new(),
                    sampler: None,
                });
                m.assign_id(insn[2], idx);
            }
            Op::ConstantComposite => {
                let ty = m.get_or_dummy(insn[1]);
                let mut children = Vec::new();
                for &w in &insn[3..] {
                    let child = m.get_or_dummy(w);
                    debug_assert!(m.ops[child].constant().is_some());
                    children.push(child);
                }
                m.ops[idx].payload = Payload::Constant(ConstantData {
                    ty,
                    raw: 0,
                    children,
                    sampler: None,
                });
                m.assign_id(insn[2], idx);
            }
            Op::ConstantSampler => {
                let ty = m.get_or_dummy(insn[1]);
                m.ops[idx].payload = Payload::Constant(ConstantData {
                    ty,
                    raw: 0,
                    children: Vec::new(),
                    sampler: Some(SamplerLiteral {
                        addressing: insn[3],
                        normalised: insn[4] != 0,
                        filter: insn[5],
                    }),
                });
                m.assign_id(insn[2], idx);
            }
            //////////////////////////////////////////////////////////////
            // Functions
            Op::Function => {
                let ret_type = m.get_or_dummy(insn[1]);
                let func_type = m.get_or_dummy(insn[4]);
                m.ops[idx].payload = Payload::Function(FunctionData {
                    ret_type,
                    func_type,
                    params: Vec::new(),
                    control: insn[3],
                    blocks: Vec::new(),
                    variables: Vec::new(),
                });
                m.funcs.push(idx);
                m.assign_id(insn[2], idx);
                cur_func = Some(idx);
            }
            Op::FunctionEnd => {
                if let Some(f) = cur_func {
                    let blocks = m.ops[f].func().unwrap().blocks.clone();
                    for b in blocks {
                        if m.ops[b].block().map_or(true, |bd| bd.exit_flow.is_none()) {
                            bail!(
                                "block {{{}}} in function {{{}}} has no terminator",
                                m.ops[b].id,
                                m.ops[f].id
                            );
                        }
                    }
                }
                cur_func = None;
                cur_block = None;
            }
            Op::FunctionParameter => {
                let ty = m.get_or_dummy(insn[1]);
                m.ops[idx].payload = Payload::Variable(VariableData {
                    ty,
                    storage: StorageClass::Function,
                    initialiser: None,
                });
                m.assign_id(insn[2], idx);
                match cur_func {
                    Some(f) => m.ops[f].func_mut().unwrap().params.push(idx),
                    None => warn!("OpFunctionParameter outside a function"),
                }
            }
            Op::Variable => {
                let ty = m.get_or_dummy(insn[1]);
                let initialiser = if wc > 4 {
                    let init = m.get_or_dummy(insn[4]);
                    debug_assert!(m.ops[init].constant().is_some());
                    Some(init)
                } else {
                    None
                };
                m.ops[idx].payload = Payload::Variable(VariableData {
                    ty,
                    storage: StorageClass::from_word(insn[3]),
                    initialiser,
                });
                m.assign_id(insn[2], idx);
                match cur_func {
                    Some(f) => m.ops[f].func_mut().unwrap().variables.push(idx),
                    None => m.globals.push(idx),
                }
            }
            //////////////////////////////////////////////////////////////
            // Branching and flow control
            Op::Label => {
                m.ops[idx].payload = Payload::Block(BlockData::default());
                m.assign_id(insn[1], idx);
                match cur_func {
                    Some(f) => {
                        m.ops[f].func_mut().unwrap().blocks.push(idx);
                        cur_block = Some(idx);
                    }
                    None => warn!("OpLabel outside a function"),
                }
            }
            Op::Kill | Op::Unreachable | Op::Return => {
                m.ops[idx].payload = Payload::Flow(FlowData::default());
                match cur_block.take() {
                    Some(b) => m.ops[b].block_mut().unwrap().exit_flow = Some(idx),
                    None => warn!("terminator outside a block"),
                }
            }
            Op::ReturnValue => {
                let mut f = FlowData::default();
                f.targets.push(insn[1]);
                m.ops[idx].payload = Payload::Flow(f);
                match cur_block.take() {
                    Some(b) => m.ops[b].block_mut().unwrap().exit_flow = Some(idx),
                    None => warn!("terminator outside a block"),
                }
            }
            Op::Branch => {
                let mut f = FlowData::default();
                f.targets.push(insn[1]);
                m.ops[idx].payload = Payload::Flow(f);
                match cur_block.take() {
                    Some(b) => m.ops[b].block_mut().unwrap().exit_flow = Some(idx),
                    None => warn!("terminator outside a block"),
                }
            }
            Op::BranchConditional => {
                let cond = m.get_or_dummy(insn[1]);
                let mut f = FlowData::default();
                f.condition = Some(cond);
                f.targets.push(insn[2]);
                f.targets.push(insn[3]);
                if wc == 6 {
                    // branch weights
                    f.literals.push(insn[4]);
                    f.literals.push(insn[5]);
                }
                m.ops[idx].payload = Payload::Flow(f);
                match cur_block.take() {
                    Some(b) => m.ops[b].block_mut().unwrap().exit_flow = Some(idx),
                    None => warn!("terminator outside a block"),
                }
            }
            Op::Switch => {
                // selector, default target, then (case value, label) pairs
                let cond = m.get_or_dummy(insn[1]);
                let mut f = FlowData::default();
                f.condition = Some(cond);
                f.targets.push(insn[2]);
                let mut pair = 3;
                while pair + 1 < wc {
                    f.literals.push(insn[pair]);
                    f.targets.push(insn[pair + 1]);
                    pair += 2;
                }
                m.ops[idx].payload = Payload::Flow(f);
                match cur_block.take() {
                    Some(b) => m.ops[b].block_mut().unwrap().exit_flow = Some(idx),
                    None => warn!("terminator outside a block"),
                }
            }
            Op::SelectionMerge | Op::LoopMerge => {
                let mut f = FlowData::default();
                f.targets.push(insn[1]);
                f.control = insn[2];
                m.ops[idx].payload = Payload::Flow(f);
                match cur_block {
                    Some(b) => m.ops[b].block_mut().unwrap().merge_flow = Some(idx),
                    None => warn!("merge annotation outside a block"),
                }
            }
            //////////////////////////////////////////////////////////////
            // Operations with special layouts
            Op::Load => {
                let ty = m.get_or_dummy(insn[1]);
                let ptr = m.get_or_dummy(insn[3]);
                let mut op = OperationData::new(Some(ty));
                op.args.push(ptr);
                if wc > 4 {
                    op.access = insn[4];
                }
                m.ops[idx].payload = Payload::Op(op);
                m.assign_id(insn[2], idx);
                push_to_block(m, cur_block, idx);
            }
            Op::Store | Op::CopyMemory => {
                let ptr = m.get_or_dummy(insn[1]);
                let val = m.get_or_dummy(insn[2]);
                let mut op = OperationData::new(None);
                op.args.push(ptr);
                op.args.push(val);
                if wc > 3 {
                    op.access = insn[3];
                }
                m.ops[idx].payload = Payload::Op(op);
                push_to_block(m, cur_block, idx);
            }
            Op::CopyMemorySized => {
                let target = m.get_or_dummy(insn[1]);
                let source = m.get_or_dummy(insn[2]);
                let size = m.get_or_dummy(insn[3]);
                let mut op = OperationData::new(None);
                op.args.push(target);
                op.args.push(source);
                op.args.push(size);
                if wc > 4 {
                    op.access = insn[4];
                }
                m.ops[idx].payload = Payload::Op(op);
                push_to_block(m, cur_block, idx);
            }
            Op::ImageSampleImplicitLod
            | Op::ImageSampleExplicitLod
            | Op::ImageSampleDrefImplicitLod
            | Op::ImageSampleDrefExplicitLod
            | Op::ImageFetch
            | Op::ImageRead => {
                let ty = m.get_or_dummy(insn[1]);
                let mut op = OperationData::new(Some(ty));
                // image and coordinate, plus the depth reference for the
                // Dref forms; optional image-operand words are not decoded
                let id_operands = match opcode {
                    Op::ImageSampleDrefImplicitLod | Op::ImageSampleDrefExplicitLod => 3,
                    _ => 2,
                };
                let mut word = 3;
                while word < wc && word < 3 + id_operands {
                    let arg = m.get_or_dummy(insn[word]);
                    op.args.push(arg);
                    word += 1;
                }
                m.ops[idx].payload = Payload::Op(op);
                m.assign_id(insn[2], idx);
                push_to_block(m, cur_block, idx);
            }
            Op::ImageWrite => {
                // image, coordinate, texel; optional image-operand words
                // are not decoded
                let mut op = OperationData::new(None);
                let mut word = 1;
                while word < wc && word < 4 {
                    let arg = m.get_or_dummy(insn[word]);
                    op.args.push(arg);
                    word += 1;
                }
                m.ops[idx].payload = Payload::Op(op);
                push_to_block(m, cur_block, idx);
            }
            // conversions are treated as if they were function calls
            Op::ConvertFToU
            | Op::ConvertFToS
            | Op::ConvertSToF
            | Op::ConvertUToF
            | Op::Bitcast
            | Op::FunctionCall => {
                let ty = m.get_or_dummy(insn[1]);
                let mut op = OperationData::new(Some(ty));
                let mut word = 3;
                if opcode == Op::FunctionCall {
                    op.func_call = insn[3];
                    word = 4;
                }
                while word < wc {
                    let arg = m.get_or_dummy(insn[word]);
                    op.args.push(arg);
                    word += 1;
                }
                m.ops[idx].payload = Payload::Op(op);
                m.assign_id(insn[2], idx);
                push_to_block(m, cur_block, idx);
            }
            Op::VectorShuffle => {
                let ty = m.get_or_dummy(insn[1]);
                let a = m.get_or_dummy(insn[3]);
                let b = m.get_or_dummy(insn[4]);
                let mut op = OperationData::new(Some(ty));
                op.args.push(a);
                op.args.push(b);
                op.literals.extend_from_slice(&insn[5..]);
                m.ops[idx].payload = Payload::Op(op);
                m.assign_id(insn[2], idx);
                push_to_block(m, cur_block, idx);
            }
            Op::ExtInst => {
                let ty = m.get_or_dummy(insn[1]);
                let set = m.get_or_dummy(insn[3]);
                let mut op = OperationData::new(Some(ty));
                op.args.push(set);
                op.literals.push(insn[4]);
                for &w in &insn[5..] {
                    let arg = m.get_or_dummy(w);
                    op.args.push(arg);
                }
                m.ops[idx].payload = Payload::Op(op);
                m.assign_id(insn[2], idx);
                push_to_block(m, cur_block, idx);
            }
            Op::CompositeExtract | Op::CompositeInsert => {
                let ty = m.get_or_dummy(insn[1]);
                let mut op = OperationData::new(Some(ty));
                if opcode == Op::CompositeInsert {
                    let object = m.get_or_dummy(insn[3]);
                    let composite = m.get_or_dummy(insn[4]);
                    op.args.push(composite);
                    op.args.push(object);
                    op.literals.extend_from_slice(&insn[5..]);
                } else {
                    let composite = m.get_or_dummy(insn[3]);
                    op.args.push(composite);
                    op.literals.extend_from_slice(&insn[4..]);
                }
                m.ops[idx].payload = Payload::Op(op);
                m.assign_id(insn[2], idx);
                push_to_block(m, cur_block, idx);
            }
            Op::ArrayLength => {
                let ty = m.get_or_dummy(insn[1]);
                let structure = m.get_or_dummy(insn[3]);
                let mut op = OperationData::new(Some(ty));
                op.args.push(structure);
                // the trailing word is the literal member index
                op.literals.push(insn[4]);
                m.ops[idx].payload = Payload::Op(op);
                m.assign_id(insn[2], idx);
                push_to_block(m, cur_block, idx);
            }
            //////////////////////////////////////////////////////////////
            // Everything with a plain (type, result, ids...) layout
            _ if is_binary_math(opcode)
                || is_unary_math(opcode)
                || matches!(
                    opcode,
                    Op::CompositeConstruct
                        | Op::AccessChain
                        | Op::InBoundsAccessChain
                        | Op::Dot
                        | Op::Select
                ) =>
            {
                let ty = m.get_or_dummy(insn[1]);
                let mut op = OperationData::new(Some(ty));
                op.mathop = is_binary_math(opcode) || is_unary_math(opcode);
                for &w in &insn[3..] {
                    let arg = m.get_or_dummy(w);
                    op.args.push(arg);
                }
                m.ops[idx].payload = Payload::Op(op);
                m.assign_id(insn[2], idx);
                push_to_block(m, cur_block, idx);
            }
            // handled in the annotation pass once all IDs are in place
            Op::Name
            | Op::MemberName
            | Op::Line
            | Op::Decorate
            | Op::MemberDecorate
            | Op::GroupDecorate
            | Op::GroupMemberDecorate => {}
            Op::DecorationGroup => {
                // declare the group's ID so OpDecorate can target it
                m.assign_id(insn[1], idx);
            }
            Op::Nop => {}
            _ => {
                // named instructions without a dedicated case keep their
                // declared result ID and their trailing words as generic
                // operands, so references resolve to the real instruction
                // rather than a placeholder
                let (has_type, has_result) = opcode.result_layout();
                let min_words = 1 + usize::from(has_type) + usize::from(has_result);
                if has_result && wc >= min_words {
                    warn!("unhandled opcode {} - kept as an opaque operation", opcode.name());
                    let mut word = 1;
                    let ty = if has_type {
                        let t = m.get_or_dummy(insn[word]);
                        word += 1;
                        Some(t)
                    } else {
                        None
                    };
                    let result = insn[word];
                    word += 1;
                    let mut op = OperationData::new(ty);
                    while word < wc {
                        let arg = m.get_or_dummy(insn[word]);
                        op.args.push(arg);
                        word += 1;
                    }
                    m.ops[idx].payload = Payload::Op(op);
                    m.assign_id(result, idx);
                } else {
                    // a truly unrecognised opcode has no known layout
                    warn!(
                        "unhandled opcode {} - result ID will be missing",
                        opcode.name()
                    );
                }
                if cur_block.is_some() {
                    push_to_block(m, cur_block, idx);
                }
            }
        }

        it += word_count;
    }

    Ok(())
}

fn push_to_block(m: &mut Module, cur_block: Option<OpIdx>, idx: OpIdx) {
    match cur_block {
        Some(b) => m.ops[b].block_mut().unwrap().insns.push(idx),
        None => warn!("operation outside a block"),
    }
}

/// Second pass: names, line info and decorations, applied now that every
/// ID is in place.
fn annotation_pass(m: &mut Module, words: &[u32]) -> Result<()> {
    let mut it = 5usize;
    while it < words.len() {
        let word_count = (words[it] >> spv::WORD_COUNT_SHIFT) as usize;
        let opcode = Op::from_word((words[it] & spv::OPCODE_MASK) as u16);
        let insn = &words[it..it + word_count];
        let wc = word_count;

        match opcode {
            Op::Name => {
                let idx = m.get_or_dummy(insn[1]);
                let mut name = read_string(&insn[2..]);
                // some producers encode a mangled parameter list in
                // function names; strip it at the first bracket
                if m.ops[idx].opcode == Op::Function {
                    if let Some(bracket) = name.find('(') {
                        name.truncate(bracket);
                    }
                }
                m.ops[idx].name = name.clone();
                if let Some(t) = m.ops[idx].ty() {
                    *t.cached_name.borrow_mut() = name;
                }
            }
            Op::MemberName => {
                let idx = m.get_or_dummy(insn[1]);
                let member = insn[2] as usize;
                let name = read_string(&insn[3..]);
                match m.ops[idx].ty_mut() {
                    Some(t) if member < t.members.len() => t.members[member].1 = name,
                    _ => warn!("OpMemberName for {{{}}} does not match a struct member", insn[1]),
                }
            }
            Op::Line => {
                let idx = m.get_or_dummy(insn[1]);
                let file = m.get_or_dummy(insn[2]);
                let filename = m.ops[file].name.clone();
                m.ops[idx].source = Some(SourceLoc {
                    file: filename,
                    line: insn[3],
                    col: insn[4],
                });
            }
            Op::Decorate => {
                let idx = m.get_or_dummy(insn[1]);
                if wc > 4 {
                    warn!("OpDecorate with {} literal words; extra words dropped", wc - 3);
                }
                let d = Decoration {
                    kind: DecorationKind::from_word(insn[2]),
                    val: if wc > 3 { insn[3] } else { 0 },
                };
                m.ops[idx].decorations.push(d);
            }
            Op::MemberDecorate => {
                let idx = m.get_or_dummy(insn[1]);
                let member = insn[2] as usize;
                if wc > 5 {
                    warn!(
                        "OpMemberDecorate with {} literal words; extra words dropped",
                        wc - 4
                    );
                }
                let d = Decoration {
                    kind: DecorationKind::from_word(insn[3]),
                    val: if wc > 4 { insn[4] } else { 0 },
                };
                match m.ops[idx].ty_mut() {
                    Some(t) if member < t.member_decorations.len() => {
                        t.member_decorations[member].push(d)
                    }
                    _ => warn!(
                        "OpMemberDecorate for {{{}}} does not match a struct member",
                        insn[1]
                    ),
                }
            }
            Op::GroupDecorate => {
                // groups collect decorations via OpDecorate on the group ID;
                // expand them onto each target here
                let group = m.get_or_dummy(insn[1]);
                let decorations = m.ops[group].decorations.clone();
                for &w in &insn[2..] {
                    let target = m.get_or_dummy(w);
                    m.ops[target].decorations.extend(decorations.iter().cloned());
                }
            }
            Op::GroupMemberDecorate => {
                let group = m.get_or_dummy(insn[1]);
                let decorations = m.ops[group].decorations.clone();
                let mut pair = 2;
                while pair + 1 < wc {
                    let target = m.get_or_dummy(insn[pair]);
                    let member = insn[pair + 1] as usize;
                    match m.ops[target].ty_mut() {
                        Some(t) if member < t.member_decorations.len() => {
                            t.member_decorations[member].extend(decorations.iter().cloned())
                        }
                        _ => warn!(
                            "OpGroupMemberDecorate target {{{}}} has no member {}",
                            insn[pair], member
                        ),
                    }
                    pair += 2;
                }
            }
            _ => {}
        }

        it += word_count;
    }

    Ok(())
}

fn finalise(m: &mut Module) {
    // touch every flow-control target so label chasing never mutates
    let mut targets = Vec::new();
    for idx in 0..m.ops.len() {
        if let Some(f) = m.ops[idx].flow() {
            targets.extend_from_slice(&f.targets);
        }
    }
    for t in targets {
        m.get_or_dummy(t);
    }

    // backfill unassigned slots so lookup is total over the ID bound
    for id in 0..m.ids.len() {
        if m.ids[id].is_none() {
            let idx = m.alloc(Instruction::new(Op::Unknown));
            m.assign_id(id as u32, idx);
        }
    }

    // functions with no OpName inherit the name of an entry point that
    // targets them
    let entries = m.entries.clone();
    for e in entries {
        let Some(ep) = m.ops[e].entry() else { continue };
        let (func, name) = (ep.func, ep.name.clone());
        if let Some(fidx) = m.by_id(func) {
            if m.ops[fidx].name.is_empty() {
                m.ops[fidx].name = name;
            }
        }
    }

    // group inputs, then outputs, then uniforms; stable so declaration
    // order is kept within each group
    let mut globals = std::mem::take(&mut m.globals);
    globals.sort_by_key(|&g| {
        m.ops[g]
            .var()
            .map_or(u32::MAX, |v| Module::storage_sort_rank(v.storage))
    });
    m.globals = globals;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn insn(opcode: u16, operands: &[u32]) -> Vec<u32> {
        let mut v = vec![((operands.len() as u32 + 1) << 16) | opcode as u32];
        v.extend_from_slice(operands);
        v
    }

    #[test]
    fn bad_magic_is_rejected() {
        let words = [0xdead_beef, spv::SPIRV_VERSION, 0, 10, 0];
        let err = parse_module(&words).unwrap_err();
        assert!(err.to_string().contains("magic"));
    }

    #[test]
    fn bad_version_is_rejected() {
        let words = [spv::SPIRV_MAGIC, 0x0003_0000, 0, 10, 0];
        let err = parse_module(&words).unwrap_err();
        assert!(err.to_string().contains("version"));
    }

    #[test]
    fn lookup_is_total_after_parse() {
        let mut words = vec![spv::SPIRV_MAGIC, spv::SPIRV_VERSION, 0, 8, 0];
        words.extend(insn(19, &[1])); // OpTypeVoid %1
        let m = parse_module(&words).unwrap();
        for id in 0..m.id_bound() {
            assert!(m.by_id(id).is_some(), "id {} did not resolve", id);
        }
    }

    #[test]
    fn words_from_bytes_rejects_ragged_buffers() {
        assert!(words_from_bytes(&[1, 2, 3]).is_err());
        let words = words_from_bytes(&[0x03, 0x02, 0x23, 0x07]).unwrap();
        assert_eq!(words, vec![spv::SPIRV_MAGIC]);
    }
}
