// SPDX-License-Identifier: MIT
//
// SPIR-V enum tables.
//
// Every closed enum of the binary format gets a Rust enum with a
// `from_word` decoder and a total `name` function. Unknown values are kept
// as `Unrecognised(n)` so they survive round trips through diagnostics.
// All other modules go through these tables; no raw enum knowledge lives
// anywhere else.

pub const SPIRV_MAGIC: u32 = 0x0723_0203;
pub const SPIRV_VERSION: u32 = 0x0001_0000;

pub const WORD_COUNT_SHIFT: u32 = 16;
pub const OPCODE_MASK: u32 = 0xffff;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Nop,
    Undef,
    SourceContinued,
    Source,
    SourceExtension,
    Name,
    MemberName,
    String,
    Line,
    Extension,
    ExtInstImport,
    ExtInst,
    MemoryModel,
    EntryPoint,
    ExecutionMode,
    Capability,
    TypeVoid,
    TypeBool,
    TypeInt,
    TypeFloat,
    TypeVector,
    TypeMatrix,
    TypeImage,
    TypeSampler,
    TypeSampledImage,
    TypeArray,
    TypeRuntimeArray,
    TypeStruct,
    TypeOpaque,
    TypePointer,
    TypeFunction,
    ConstantTrue,
    ConstantFalse,
    Constant,
    ConstantComposite,
    ConstantSampler,
    ConstantNull,
    Function,
    FunctionParameter,
    FunctionEnd,
    FunctionCall,
    Variable,
    ImageTexelPointer,
    Load,
    Store,
    CopyMemory,
    CopyMemorySized,
    AccessChain,
    InBoundsAccessChain,
    ArrayLength,
    Decorate,
    MemberDecorate,
    DecorationGroup,
    GroupDecorate,
    GroupMemberDecorate,
    VectorExtractDynamic,
    VectorInsertDynamic,
    VectorShuffle,
    CompositeConstruct,
    CompositeExtract,
    CompositeInsert,
    CopyObject,
    Transpose,
    SampledImage,
    ImageSampleImplicitLod,
    ImageSampleExplicitLod,
    ImageSampleDrefImplicitLod,
    ImageSampleDrefExplicitLod,
    ImageFetch,
    ImageRead,
    ImageWrite,
    Image,
    ImageQuerySizeLod,
    ImageQuerySize,
    ImageQueryLod,
    ImageQueryLevels,
    ImageQuerySamples,
    ConvertFToU,
    ConvertFToS,
    ConvertSToF,
    ConvertUToF,
    UConvert,
    SConvert,
    FConvert,
    QuantizeToF16,
    Bitcast,
    SNegate,
    FNegate,
    IAdd,
    FAdd,
    ISub,
    FSub,
    IMul,
    FMul,
    UDiv,
    SDiv,
    FDiv,
    UMod,
    SRem,
    SMod,
    FRem,
    FMod,
    VectorTimesScalar,
    MatrixTimesScalar,
    VectorTimesMatrix,
    MatrixTimesVector,
    MatrixTimesMatrix,
    OuterProduct,
    Dot,
    LogicalEqual,
    LogicalNotEqual,
    LogicalOr,
    LogicalAnd,
    LogicalNot,
    Select,
    IEqual,
    INotEqual,
    UGreaterThan,
    SGreaterThan,
    UGreaterThanEqual,
    SGreaterThanEqual,
    ULessThan,
    SLessThan,
    ULessThanEqual,
    SLessThanEqual,
    FOrdEqual,
    FUnordEqual,
    FOrdNotEqual,
    FUnordNotEqual,
    FOrdLessThan,
    FUnordLessThan,
    FOrdGreaterThan,
    FUnordGreaterThan,
    FOrdLessThanEqual,
    FUnordLessThanEqual,
    FOrdGreaterThanEqual,
    FUnordGreaterThanEqual,
    ShiftRightLogical,
    ShiftRightArithmetic,
    ShiftLeftLogical,
    BitwiseOr,
    BitwiseXor,
    BitwiseAnd,
    Not,
    Phi,
    LoopMerge,
    SelectionMerge,
    Label,
    Branch,
    BranchConditional,
    Switch,
    Kill,
    Return,
    ReturnValue,
    Unreachable,
    /// Dummy opcode for placeholder instructions (dangling references).
    Unknown,
    Unrecognised(u16),
}

impl Op {
    pub fn from_word(w: u16) -> Op {
        match w {
            0 => Op::Nop,
            1 => Op::Undef,
            2 => Op::SourceContinued,
            3 => Op::Source,
            4 => Op::SourceExtension,
            5 => Op::Name,
            6 => Op::MemberName,
            7 => Op::String,
            8 => Op::Line,
            10 => Op::Extension,
            11 => Op::ExtInstImport,
            12 => Op::ExtInst,
            14 => Op::MemoryModel,
            15 => Op::EntryPoint,
            16 => Op::ExecutionMode,
            17 => Op::Capability,
            19 => Op::TypeVoid,
            20 => Op::TypeBool,
            21 => Op::TypeInt,
            22 => Op::TypeFloat,
            23 => Op::TypeVector,
            24 => Op::TypeMatrix,
            25 => Op::TypeImage,
            26 => Op::TypeSampler,
            27 => Op::TypeSampledImage,
            28 => Op::TypeArray,
            29 => Op::TypeRuntimeArray,
            30 => Op::TypeStruct,
            31 => Op::TypeOpaque,
            32 => Op::TypePointer,
            33 => Op::TypeFunction,
            41 => Op::ConstantTrue,
            42 => Op::ConstantFalse,
            43 => Op::Constant,
            44 => Op::ConstantComposite,
            45 => Op::ConstantSampler,
            46 => Op::ConstantNull,
            54 => Op::Function,
            55 => Op::FunctionParameter,
            56 => Op::FunctionEnd,
            57 => Op::FunctionCall,
            59 => Op::Variable,
            60 => Op::ImageTexelPointer,
            61 => Op::Load,
            62 => Op::Store,
            63 => Op::CopyMemory,
            64 => Op::CopyMemorySized,
            65 => Op::AccessChain,
            66 => Op::InBoundsAccessChain,
            68 => Op::ArrayLength,
            71 => Op::Decorate,
            72 => Op::MemberDecorate,
            73 => Op::DecorationGroup,
            74 => Op::GroupDecorate,
            75 => Op::GroupMemberDecorate,
            77 => Op::VectorExtractDynamic,
            78 => Op::VectorInsertDynamic,
            79 => Op::VectorShuffle,
            80 => Op::CompositeConstruct,
            81 => Op::CompositeExtract,
            82 => Op::CompositeInsert,
            83 => Op::CopyObject,
            84 => Op::Transpose,
            86 => Op::SampledImage,
            87 => Op::ImageSampleImplicitLod,
            88 => Op::ImageSampleExplicitLod,
            89 => Op::ImageSampleDrefImplicitLod,
            90 => Op::ImageSampleDrefExplicitLod,
            95 => Op::ImageFetch,
            98 => Op::ImageRead,
            99 => Op::ImageWrite,
            100 => Op::Image,
            103 => Op::ImageQuerySizeLod,
            104 => Op::ImageQuerySize,
            105 => Op::ImageQueryLod,
            106 => Op::ImageQueryLevels,
            107 => Op::ImageQuerySamples,
            109 => Op::ConvertFToU,
            110 => Op::ConvertFToS,
            111 => Op::ConvertSToF,
            112 => Op::ConvertUToF,
            113 => Op::UConvert,
            114 => Op::SConvert,
            115 => Op::FConvert,
            116 => Op::QuantizeToF16,
            124 => Op::Bitcast,
            126 => Op::SNegate,
            127 => Op::FNegate,
            128 => Op::IAdd,
            129 => Op::FAdd,
            130 => Op::ISub,
            131 => Op::FSub,
            132 => Op::IMul,
            133 => Op::FMul,
            134 => Op::UDiv,
            135 => Op::SDiv,
            136 => Op::FDiv,
            137 => Op::UMod,
            138 => Op::SRem,
            139 => Op::SMod,
            140 => Op::FRem,
            141 => Op::FMod,
            142 => Op::VectorTimesScalar,
            143 => Op::MatrixTimesScalar,
            144 => Op::VectorTimesMatrix,
            145 => Op::MatrixTimesVector,
            146 => Op::MatrixTimesMatrix,
            147 => Op::OuterProduct,
            148 => Op::Dot,
            164 => Op::LogicalEqual,
            165 => Op::LogicalNotEqual,
            166 => Op::LogicalOr,
            167 => Op::LogicalAnd,
            168 => Op::LogicalNot,
            169 => Op::Select,
            170 => Op::IEqual,
            171 => Op::INotEqual,
            172 => Op::UGreaterThan,
            173 => Op::SGreaterThan,
            174 => Op::UGreaterThanEqual,
            175 => Op::SGreaterThanEqual,
            176 => Op::ULessThan,
            177 => Op::SLessThan,
            178 => Op::ULessThanEqual,
            179 => Op::SLessThanEqual,
            180 => Op::FOrdEqual,
            181 => Op::FUnordEqual,
            182 => Op::FOrdNotEqual,
            183 => Op::FUnordNotEqual,
            184 => Op::FOrdLessThan,
            185 => Op::FUnordLessThan,
            186 => Op::FOrdGreaterThan,
            187 => Op::FUnordGreaterThan,
            188 => Op::FOrdLessThanEqual,
            189 => Op::FUnordLessThanEqual,
            190 => Op::FOrdGreaterThanEqual,
            191 => Op::FUnordGreaterThanEqual,
            194 => Op::ShiftRightLogical,
            195 => Op::ShiftRightArithmetic,
            196 => Op::ShiftLeftLogical,
            197 => Op::BitwiseOr,
            198 => Op::BitwiseXor,
            199 => Op::BitwiseAnd,
            200 => Op::Not,
            245 => Op::Phi,
            246 => Op::LoopMerge,
            247 => Op::SelectionMerge,
            248 => Op::Label,
            249 => Op::Branch,
            250 => Op::BranchConditional,
            251 => Op::Switch,
            252 => Op::Kill,
            253 => Op::Return,
            254 => Op::ReturnValue,
            255 => Op::Unreachable,
            n => Op::Unrecognised(n),
        }
    }

    pub fn name(self) -> String {
        match self {
            Op::Unrecognised(n) => format!("Unrecognised{{{}}}", n),
            _ => self.static_name().to_string(),
        }
    }

    /// Word-layout classification: whether the instruction carries a
    /// result-type word and a result-ID word, in that order, before its
    /// operands. `Unrecognised` opcodes have no known layout.
    pub fn result_layout(self) -> (bool, bool) {
        match self {
            // instructions that declare an ID without a result type
            Op::ExtInstImport
            | Op::String
            | Op::Label
            | Op::DecorationGroup
            | Op::TypeVoid
            | Op::TypeBool
            | Op::TypeInt
            | Op::TypeFloat
            | Op::TypeVector
            | Op::TypeMatrix
            | Op::TypeImage
            | Op::TypeSampler
            | Op::TypeSampledImage
            | Op::TypeArray
            | Op::TypeRuntimeArray
            | Op::TypeStruct
            | Op::TypeOpaque
            | Op::TypePointer
            | Op::TypeFunction => (false, true),
            // instructions with no result at all
            Op::Nop
            | Op::SourceContinued
            | Op::Source
            | Op::SourceExtension
            | Op::Name
            | Op::MemberName
            | Op::Line
            | Op::Extension
            | Op::MemoryModel
            | Op::EntryPoint
            | Op::ExecutionMode
            | Op::Capability
            | Op::FunctionEnd
            | Op::Store
            | Op::CopyMemory
            | Op::CopyMemorySized
            | Op::Decorate
            | Op::MemberDecorate
            | Op::GroupDecorate
            | Op::GroupMemberDecorate
            | Op::ImageWrite
            | Op::LoopMerge
            | Op::SelectionMerge
            | Op::Branch
            | Op::BranchConditional
            | Op::Switch
            | Op::Kill
            | Op::Return
            | Op::ReturnValue
            | Op::Unreachable
            | Op::Unknown
            | Op::Unrecognised(_) => (false, false),
            // everything else: result type, then result, then operands
            _ => (true, true),
        }
    }

    fn static_name(self) -> &'static str {
        match self {
            Op::Nop => "Nop",
            Op::Undef => "Undef",
            Op::SourceContinued => "SourceContinued",
            Op::Source => "Source",
            Op::SourceExtension => "SourceExtension",
            Op::Name => "Name",
            Op::MemberName => "MemberName",
            Op::String => "String",
            Op::Line => "Line",
            Op::Extension => "Extension",
            Op::ExtInstImport => "ExtInstImport",
            Op::ExtInst => "ExtInst",
            Op::MemoryModel => "MemoryModel",
            Op::EntryPoint => "EntryPoint",
            Op::ExecutionMode => "ExecutionMode",
            Op::Capability => "Capability",
            Op::TypeVoid => "TypeVoid",
            Op::TypeBool => "TypeBool",
            Op::TypeInt => "TypeInt",
            Op::TypeFloat => "TypeFloat",
            Op::TypeVector => "TypeVector",
            Op::TypeMatrix => "TypeMatrix",
            Op::TypeImage => "TypeImage",
            Op::TypeSampler => "TypeSampler",
            Op::TypeSampledImage => "TypeSampledImage",
            Op::TypeArray => "TypeArray",
            Op::TypeRuntimeArray => "TypeRuntimeArray",
            Op::TypeStruct => "TypeStruct",
            Op::TypeOpaque => "TypeOpaque",
            Op::TypePointer => "TypePointer",
            Op::TypeFunction => "TypeFunction",
            Op::ConstantTrue => "ConstantTrue",
            Op::ConstantFalse => "ConstantFalse",
            Op::Constant => "Constant",
            Op::ConstantComposite => "ConstantComposite",
            Op::ConstantSampler => "ConstantSampler",
            Op::ConstantNull => "ConstantNull",
            Op::Function => "Function",
            Op::FunctionParameter => "FunctionParameter",
            Op::FunctionEnd => "FunctionEnd",
            Op::FunctionCall => "FunctionCall",
            Op::Variable => "Variable",
            Op::ImageTexelPointer => "ImageTexelPointer",
            Op::Load => "Load",
            Op::Store => "Store",
            Op::CopyMemory => "CopyMemory",
            Op::CopyMemorySized => "CopyMemorySized",
            Op::AccessChain => "AccessChain",
            Op::InBoundsAccessChain => "InBoundsAccessChain",
            Op::ArrayLength => "ArrayLength",
            Op::Decorate => "Decorate",
            Op::MemberDecorate => "MemberDecorate",
            Op::DecorationGroup => "DecorationGroup",
            Op::GroupDecorate => "GroupDecorate",
            Op::GroupMemberDecorate => "GroupMemberDecorate",
            Op::VectorExtractDynamic => "VectorExtractDynamic",
            Op::VectorInsertDynamic => "VectorInsertDynamic",
            Op::VectorShuffle => "VectorShuffle",
            Op::CompositeConstruct => "CompositeConstruct",
            Op::CompositeExtract => "CompositeExtract",
            Op::CompositeInsert => "CompositeInsert",
            Op::CopyObject => "CopyObject",
            Op::Transpose => "Transpose",
            Op::SampledImage => "SampledImage",
            Op::ImageSampleImplicitLod => "ImageSampleImplicitLod",
            Op::ImageSampleExplicitLod => "ImageSampleExplicitLod",
            Op::ImageSampleDrefImplicitLod => "ImageSampleDrefImplicitLod",
            Op::ImageSampleDrefExplicitLod => "ImageSampleDrefExplicitLod",
            Op::ImageFetch => "ImageFetch",
            Op::ImageRead => "ImageRead",
            Op::ImageWrite => "ImageWrite",
            Op::Image => "Image",
            Op::ImageQuerySizeLod => "ImageQuerySizeLod",
            Op::ImageQuerySize => "ImageQuerySize",
            Op::ImageQueryLod => "ImageQueryLod",
            Op::ImageQueryLevels => "ImageQueryLevels",
            Op::ImageQuerySamples => "ImageQuerySamples",
            Op::ConvertFToU => "ConvertFToU",
            Op::ConvertFToS => "ConvertFToS",
            Op::ConvertSToF => "ConvertSToF",
            Op::ConvertUToF => "ConvertUToF",
            Op::UConvert => "UConvert",
            Op::SConvert => "SConvert",
            Op::FConvert => "FConvert",
            Op::QuantizeToF16 => "QuantizeToF16",
            Op::Bitcast => "Bitcast",
            Op::SNegate => "SNegate",
            Op::FNegate => "FNegate",
            Op::IAdd => "IAdd",
            Op::FAdd => "FAdd",
            Op::ISub => "ISub",
            Op::FSub => "FSub",
            Op::IMul => "IMul",
            Op::FMul => "FMul",
            Op::UDiv => "UDiv",
            Op::SDiv => "SDiv",
            Op::FDiv => "FDiv",
            Op::UMod => "UMod",
            Op::SRem => "SRem",
            Op::SMod => "SMod",
            Op::FRem => "FRem",
            Op::FMod => "FMod",
            Op::VectorTimesScalar => "VectorTimesScalar",
            Op::MatrixTimesScalar => "MatrixTimesScalar",
            Op::VectorTimesMatrix => "VectorTimesMatrix",
            Op::MatrixTimesVector => "MatrixTimesVector",
            Op::MatrixTimesMatrix => "MatrixTimesMatrix",
            Op::OuterProduct => "OuterProduct",
            Op::Dot => "Dot",
            Op::LogicalEqual => "LogicalEqual",
            Op::LogicalNotEqual => "LogicalNotEqual",
            Op::LogicalOr => "LogicalOr",
            Op::LogicalAnd => "LogicalAnd",
            Op::LogicalNot => "LogicalNot",
            Op::Select => "Select",
            Op::IEqual => "IEqual",
            Op::INotEqual => "INotEqual",
            Op::UGreaterThan => "UGreaterThan",
            Op::SGreaterThan => "SGreaterThan",
            Op::UGreaterThanEqual => "UGreaterThanEqual",
            Op::SGreaterThanEqual => "SGreaterThanEqual",
            Op::ULessThan => "ULessThan",
            Op::SLessThan => "SLessThan",
            Op::ULessThanEqual => "ULessThanEqual",
            Op::SLessThanEqual => "SLessThanEqual",
            Op::FOrdEqual => "FOrdEqual",
            Op::FUnordEqual => "FUnordEqual",
            Op::FOrdNotEqual => "FOrdNotEqual",
            Op::FUnordNotEqual => "FUnordNotEqual",
            Op::FOrdLessThan => "FOrdLessThan",
            Op::FUnordLessThan => "FUnordLessThan",
            Op::FOrdGreaterThan => "FOrdGreaterThan",
            Op::FUnordGreaterThan => "FUnordGreaterThan",
            Op::FOrdLessThanEqual => "FOrdLessThanEqual",
            Op::FUnordLessThanEqual => "FUnordLessThanEqual",
            Op::FOrdGreaterThanEqual => "FOrdGreaterThanEqual",
            Op::FUnordGreaterThanEqual => "FUnordGreaterThanEqual",
            Op::ShiftRightLogical => "ShiftRightLogical",
            Op::ShiftRightArithmetic => "ShiftRightArithmetic",
            Op::ShiftLeftLogical => "ShiftLeftLogical",
            Op::BitwiseOr => "BitwiseOr",
            Op::BitwiseXor => "BitwiseXor",
            Op::BitwiseAnd => "BitwiseAnd",
            Op::Not => "Not",
            Op::Phi => "Phi",
            Op::LoopMerge => "LoopMerge",
            Op::SelectionMerge => "SelectionMerge",
            Op::Label => "Label",
            Op::Branch => "Branch",
            Op::BranchConditional => "BranchConditional",
            Op::Switch => "Switch",
            Op::Kill => "Kill",
            Op::Return => "Return",
            Op::ReturnValue => "ReturnValue",
            Op::Unreachable => "Unreachable",
            Op::Unknown => "Unknown",
            Op::Unrecognised(_) => unreachable!(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SourceLanguage {
    #[default]
    Unknown,
    Essl,
    Glsl,
    OpenClC,
    OpenClCpp,
    Unrecognised(u32),
}

impl SourceLanguage {
    pub fn from_word(w: u32) -> Self {
        match w {
            0 => SourceLanguage::Unknown,
            1 => SourceLanguage::Essl,
            2 => SourceLanguage::Glsl,
            3 => SourceLanguage::OpenClC,
            4 => SourceLanguage::OpenClCpp,
            n => SourceLanguage::Unrecognised(n),
        }
    }

    pub fn name(self) -> String {
        match self {
            SourceLanguage::Unknown => "Unknown".to_string(),
            SourceLanguage::Essl => "ESSL".to_string(),
            SourceLanguage::Glsl => "GLSL".to_string(),
            SourceLanguage::OpenClC => "OpenCL C".to_string(),
            SourceLanguage::OpenClCpp => "OpenCL C++".to_string(),
            SourceLanguage::Unrecognised(n) => format!("Unrecognised{{{}}}", n),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionModel {
    Vertex,
    TessellationControl,
    TessellationEvaluation,
    Geometry,
    Fragment,
    GlCompute,
    Kernel,
    Unrecognised(u32),
}

impl ExecutionModel {
    pub fn from_word(w: u32) -> Self {
        match w {
            0 => ExecutionModel::Vertex,
            1 => ExecutionModel::TessellationControl,
            2 => ExecutionModel::TessellationEvaluation,
            3 => ExecutionModel::Geometry,
            4 => ExecutionModel::Fragment,
            5 => ExecutionModel::GlCompute,
            6 => ExecutionModel::Kernel,
            n => ExecutionModel::Unrecognised(n),
        }
    }

    pub fn name(self) -> String {
        match self {
            ExecutionModel::Vertex => "Vertex Shader".to_string(),
            ExecutionModel::TessellationControl => "Tessellation Control Shader".to_string(),
            ExecutionModel::TessellationEvaluation => "Tessellation Evaluation Shader".to_string(),
            ExecutionModel::Geometry => "Geometry Shader".to_string(),
            ExecutionModel::Fragment => "Fragment Shader".to_string(),
            ExecutionModel::GlCompute => "Compute Shader".to_string(),
            ExecutionModel::Kernel => "Kernel".to_string(),
            ExecutionModel::Unrecognised(n) => format!("Unrecognised{{{}}}", n),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum StorageClass {
    UniformConstant,
    Input,
    Uniform,
    Output,
    Workgroup,
    CrossWorkgroup,
    Private,
    Function,
    Generic,
    PushConstant,
    AtomicCounter,
    Image,
    Unrecognised(u32),
}

impl StorageClass {
    pub fn from_word(w: u32) -> Self {
        match w {
            0 => StorageClass::UniformConstant,
            1 => StorageClass::Input,
            2 => StorageClass::Uniform,
            3 => StorageClass::Output,
            4 => StorageClass::Workgroup,
            5 => StorageClass::CrossWorkgroup,
            6 => StorageClass::Private,
            7 => StorageClass::Function,
            8 => StorageClass::Generic,
            9 => StorageClass::PushConstant,
            10 => StorageClass::AtomicCounter,
            11 => StorageClass::Image,
            n => StorageClass::Unrecognised(n),
        }
    }

    pub fn name(self) -> String {
        match self {
            StorageClass::UniformConstant => "UniformConstant".to_string(),
            StorageClass::Input => "Input".to_string(),
            StorageClass::Uniform => "Uniform".to_string(),
            StorageClass::Output => "Output".to_string(),
            StorageClass::Workgroup => "Workgroup".to_string(),
            StorageClass::CrossWorkgroup => "CrossWorkgroup".to_string(),
            StorageClass::Private => "Private".to_string(),
            StorageClass::Function => "Function".to_string(),
            StorageClass::Generic => "Generic".to_string(),
            StorageClass::PushConstant => "PushConstant".to_string(),
            StorageClass::AtomicCounter => "AtomicCounter".to_string(),
            StorageClass::Image => "Image".to_string(),
            StorageClass::Unrecognised(n) => format!("Unrecognised{{{}}}", n),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dim {
    Dim1D,
    Dim2D,
    Dim3D,
    Cube,
    Rect,
    Buffer,
    SubpassData,
    Unrecognised(u32),
}

impl Dim {
    pub fn from_word(w: u32) -> Self {
        match w {
            0 => Dim::Dim1D,
            1 => Dim::Dim2D,
            2 => Dim::Dim3D,
            3 => Dim::Cube,
            4 => Dim::Rect,
            5 => Dim::Buffer,
            6 => Dim::SubpassData,
            n => Dim::Unrecognised(n),
        }
    }

    pub fn name(self) -> String {
        match self {
            Dim::Dim1D => "1D".to_string(),
            Dim::Dim2D => "2D".to_string(),
            Dim::Dim3D => "3D".to_string(),
            Dim::Cube => "Cube".to_string(),
            Dim::Rect => "Rect".to_string(),
            Dim::Buffer => "Buffer".to_string(),
            Dim::SubpassData => "SubpassData".to_string(),
            Dim::Unrecognised(n) => format!("Unrecognised{{{}}}", n),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Unknown,
    Rgba32f,
    Rgba16f,
    R32f,
    Rgba8,
    Rgba8Snorm,
    Rg32f,
    Rg16f,
    R11fG11fB10f,
    R16f,
    Rgba16,
    Rgb10A2,
    Rg16,
    Rg8,
    R16,
    R8,
    Rgba16Snorm,
    Rg16Snorm,
    Rg8Snorm,
    R16Snorm,
    R8Snorm,
    Rgba32i,
    Rgba16i,
    Rgba8i,
    R32i,
    Rg32i,
    Rg16i,
    Rg8i,
    R16i,
    R8i,
    Rgba32ui,
    Rgba16ui,
    Rgba8ui,
    R32ui,
    Rgb10a2ui,
    Rg32ui,
    Rg16ui,
    Rg8ui,
    R16ui,
    R8ui,
    Unrecognised(u32),
}

impl ImageFormat {
    pub fn from_word(w: u32) -> Self {
        match w {
            0 => ImageFormat::Unknown,
            1 => ImageFormat::Rgba32f,
            2 => ImageFormat::Rgba16f,
            3 => ImageFormat::R32f,
            4 => ImageFormat::Rgba8,
            5 => ImageFormat::Rgba8Snorm,
            6 => ImageFormat::Rg32f,
            7 => ImageFormat::Rg16f,
            8 => ImageFormat::R11fG11fB10f,
            9 => ImageFormat::R16f,
            10 => ImageFormat::Rgba16,
            11 => ImageFormat::Rgb10A2,
            12 => ImageFormat::Rg16,
            13 => ImageFormat::Rg8,
            14 => ImageFormat::R16,
            15 => ImageFormat::R8,
            16 => ImageFormat::Rgba16Snorm,
            17 => ImageFormat::Rg16Snorm,
            18 => ImageFormat::Rg8Snorm,
            19 => ImageFormat::R16Snorm,
            20 => ImageFormat::R8Snorm,
            21 => ImageFormat::Rgba32i,
            22 => ImageFormat::Rgba16i,
            23 => ImageFormat::Rgba8i,
            24 => ImageFormat::R32i,
            25 => ImageFormat::Rg32i,
            26 => ImageFormat::Rg16i,
            27 => ImageFormat::Rg8i,
            28 => ImageFormat::R16i,
            29 => ImageFormat::R8i,
            30 => ImageFormat::Rgba32ui,
            31 => ImageFormat::Rgba16ui,
            32 => ImageFormat::Rgba8ui,
            33 => ImageFormat::R32ui,
            34 => ImageFormat::Rgb10a2ui,
            35 => ImageFormat::Rg32ui,
            36 => ImageFormat::Rg16ui,
            37 => ImageFormat::Rg8ui,
            38 => ImageFormat::R16ui,
            39 => ImageFormat::R8ui,
            n => ImageFormat::Unrecognised(n),
        }
    }

    pub fn name(self) -> String {
        match self {
            ImageFormat::Unknown => "Unknown".to_string(),
            ImageFormat::Rgba32f => "RGBA32f".to_string(),
            ImageFormat::Rgba16f => "RGBA16f".to_string(),
            ImageFormat::R32f => "R32f".to_string(),
            ImageFormat::Rgba8 => "RGBA8".to_string(),
            ImageFormat::Rgba8Snorm => "RGBA8Snorm".to_string(),
            ImageFormat::Rg32f => "RG32f".to_string(),
            ImageFormat::Rg16f => "RG16f".to_string(),
            ImageFormat::R11fG11fB10f => "R11fG11fB10f".to_string(),
            ImageFormat::R16f => "R16f".to_string(),
            ImageFormat::Rgba16 => "RGBA16".to_string(),
            ImageFormat::Rgb10A2 => "RGB10A2".to_string(),
            ImageFormat::Rg16 => "RG16".to_string(),
            ImageFormat::Rg8 => "RG8".to_string(),
            ImageFormat::R16 => "R16".to_string(),
            ImageFormat::R8 => "R8".to_string(),
            ImageFormat::Rgba16Snorm => "RGBA16Snorm".to_string(),
            ImageFormat::Rg16Snorm => "RG16Snorm".to_string(),
            ImageFormat::Rg8Snorm => "RG8Snorm".to_string(),
            ImageFormat::R16Snorm => "R16Snorm".to_string(),
            ImageFormat::R8Snorm => "R8Snorm".to_string(),
            ImageFormat::Rgba32i => "RGBA32i".to_string(),
            ImageFormat::Rgba16i => "RGBA16i".to_string(),
            ImageFormat::Rgba8i => "RGBA8i".to_string(),
            ImageFormat::R32i => "R32i".to_string(),
            ImageFormat::Rg32i => "RG32i".to_string(),
            ImageFormat::Rg16i => "RG16i".to_string(),
            ImageFormat::Rg8i => "RG8i".to_string(),
            ImageFormat::R16i => "R16i".to_string(),
            ImageFormat::R8i => "R8i".to_string(),
            ImageFormat::Rgba32ui => "RGBA32ui".to_string(),
            ImageFormat::Rgba16ui => "RGBA16ui".to_string(),
            ImageFormat::Rgba8ui => "RGBA8ui".to_string(),
            ImageFormat::R32ui => "R32ui".to_string(),
            ImageFormat::Rgb10a2ui => "RGB10A2ui".to_string(),
            ImageFormat::Rg32ui => "RG32ui".to_string(),
            ImageFormat::Rg16ui => "RG16ui".to_string(),
            ImageFormat::Rg8ui => "RG8ui".to_string(),
            ImageFormat::R16ui => "R16ui".to_string(),
            ImageFormat::R8ui => "R8ui".to_string(),
            ImageFormat::Unrecognised(n) => format!("Unrecognised{{{}}}", n),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltIn {
    Position,
    PointSize,
    ClipDistance,
    CullDistance,
    VertexId,
    InstanceId,
    PrimitiveId,
    InvocationId,
    Layer,
    ViewportIndex,
    TessLevelOuter,
    TessLevelInner,
    TessCoord,
    PatchVertices,
    FragCoord,
    PointCoord,
    FrontFacing,
    SampleId,
    SamplePosition,
    SampleMask,
    FragColor,
    FragDepth,
    HelperInvocation,
    NumWorkgroups,
    WorkgroupSize,
    WorkgroupId,
    LocalInvocationId,
    GlobalInvocationId,
    LocalInvocationIndex,
    VertexIndex,
    InstanceIndex,
    Unrecognised(u32),
}

impl BuiltIn {
    pub fn from_word(w: u32) -> Self {
        match w {
            0 => BuiltIn::Position,
            1 => BuiltIn::PointSize,
            3 => BuiltIn::ClipDistance,
            4 => BuiltIn::CullDistance,
            5 => BuiltIn::VertexId,
            6 => BuiltIn::InstanceId,
            7 => BuiltIn::PrimitiveId,
            8 => BuiltIn::InvocationId,
            9 => BuiltIn::Layer,
            10 => BuiltIn::ViewportIndex,
            11 => BuiltIn::TessLevelOuter,
            12 => BuiltIn::TessLevelInner,
            13 => BuiltIn::TessCoord,
            14 => BuiltIn::PatchVertices,
            15 => BuiltIn::FragCoord,
            16 => BuiltIn::PointCoord,
            17 => BuiltIn::FrontFacing,
            18 => BuiltIn::SampleId,
            19 => BuiltIn::SamplePosition,
            20 => BuiltIn::SampleMask,
            21 => BuiltIn::FragColor,
            22 => BuiltIn::FragDepth,
            23 => BuiltIn::HelperInvocation,
            24 => BuiltIn::NumWorkgroups,
            25 => BuiltIn::WorkgroupSize,
            26 => BuiltIn::WorkgroupId,
            27 => BuiltIn::LocalInvocationId,
            28 => BuiltIn::GlobalInvocationId,
            29 => BuiltIn::LocalInvocationIndex,
            42 => BuiltIn::VertexIndex,
            43 => BuiltIn::InstanceIndex,
            n => BuiltIn::Unrecognised(n),
        }
    }

    pub fn name(self) -> String {
        match self {
            BuiltIn::Position => "Position".to_string(),
            BuiltIn::PointSize => "PointSize".to_string(),
            BuiltIn::ClipDistance => "ClipDistance".to_string(),
            BuiltIn::CullDistance => "CullDistance".to_string(),
            BuiltIn::VertexId => "VertexId".to_string(),
            BuiltIn::InstanceId => "InstanceId".to_string(),
            BuiltIn::PrimitiveId => "PrimitiveId".to_string(),
            BuiltIn::InvocationId => "InvocationId".to_string(),
            BuiltIn::Layer => "Layer".to_string(),
            BuiltIn::ViewportIndex => "ViewportIndex".to_string(),
            BuiltIn::TessLevelOuter => "TessLevelOuter".to_string(),
            BuiltIn::TessLevelInner => "TessLevelInner".to_string(),
            BuiltIn::TessCoord => "TessCoord".to_string(),
            BuiltIn::PatchVertices => "PatchVertices".to_string(),
            BuiltIn::FragCoord => "FragCoord".to_string(),
            BuiltIn::PointCoord => "PointCoord".to_string(),
            BuiltIn::FrontFacing => "FrontFacing".to_string(),
            BuiltIn::SampleId => "SampleId".to_string(),
            BuiltIn::SamplePosition => "SamplePosition".to_string(),
            BuiltIn::SampleMask => "SampleMask".to_string(),
            BuiltIn::FragColor => "FragColor".to_string(),
            BuiltIn::FragDepth => "FragDepth".to_string(),
            BuiltIn::HelperInvocation => "HelperInvocation".to_string(),
            BuiltIn::NumWorkgroups => "NumWorkgroups".to_string(),
            BuiltIn::WorkgroupSize => "WorkgroupSize".to_string(),
            BuiltIn::WorkgroupId => "WorkgroupId".to_string(),
            BuiltIn::LocalInvocationId => "LocalInvocationId".to_string(),
            BuiltIn::GlobalInvocationId => "GlobalInvocationId".to_string(),
            BuiltIn::LocalInvocationIndex => "LocalInvocationIndex".to_string(),
            BuiltIn::VertexIndex => "VertexIndex".to_string(),
            BuiltIn::InstanceIndex => "InstanceIndex".to_string(),
            BuiltIn::Unrecognised(n) => format!("Unrecognised{{{}}}", n),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecorationKind {
    RelaxedPrecision,
    SpecId,
    Block,
    BufferBlock,
    RowMajor,
    ColMajor,
    ArrayStride,
    MatrixStride,
    GlslShared,
    GlslPacked,
    CPacked,
    BuiltIn,
    NoPerspective,
    Flat,
    Patch,
    Centroid,
    Sample,
    Invariant,
    Restrict,
    Aliased,
    Volatile,
    Constant,
    Coherent,
    NonWritable,
    NonReadable,
    Uniform,
    SaturatedConversion,
    Stream,
    Location,
    Component,
    Index,
    Binding,
    DescriptorSet,
    Offset,
    XfbBuffer,
    XfbStride,
    FuncParamAttr,
    FpRoundingMode,
    FpFastMathMode,
    LinkageAttributes,
    NoContraction,
    InputAttachmentIndex,
    Alignment,
    Unrecognised(u32),
}

impl DecorationKind {
    pub fn from_word(w: u32) -> Self {
        match w {
            0 => DecorationKind::RelaxedPrecision,
            1 => DecorationKind::SpecId,
            2 => DecorationKind::Block,
            3 => DecorationKind::BufferBlock,
            4 => DecorationKind::RowMajor,
            5 => DecorationKind::ColMajor,
            6 => DecorationKind::ArrayStride,
            7 => DecorationKind::MatrixStride,
            8 => DecorationKind::GlslShared,
            9 => DecorationKind::GlslPacked,
            10 => DecorationKind::CPacked,
            11 => DecorationKind::BuiltIn,
            13 => DecorationKind::NoPerspective,
            14 => DecorationKind::Flat,
            15 => DecorationKind::Patch,
            16 => DecorationKind::Centroid,
            17 => DecorationKind::Sample,
            18 => DecorationKind::Invariant,
            19 => DecorationKind::Restrict,
            20 => DecorationKind::Aliased,
            21 => DecorationKind::Volatile,
            22 => DecorationKind::Constant,
            23 => DecorationKind::Coherent,
            24 => DecorationKind::NonWritable,
            25 => DecorationKind::NonReadable,
            26 => DecorationKind::Uniform,
            28 => DecorationKind::SaturatedConversion,
            29 => DecorationKind::Stream,
            30 => DecorationKind::Location,
            31 => DecorationKind::Component,
            32 => DecorationKind::Index,
            33 => DecorationKind::Binding,
            34 => DecorationKind::DescriptorSet,
            35 => DecorationKind::Offset,
            36 => DecorationKind::XfbBuffer,
            37 => DecorationKind::XfbStride,
            38 => DecorationKind::FuncParamAttr,
            39 => DecorationKind::FpRoundingMode,
            40 => DecorationKind::FpFastMathMode,
            41 => DecorationKind::LinkageAttributes,
            42 => DecorationKind::NoContraction,
            43 => DecorationKind::InputAttachmentIndex,
            44 => DecorationKind::Alignment,
            n => DecorationKind::Unrecognised(n),
        }
    }

    pub fn name(self) -> String {
        match self {
            DecorationKind::RelaxedPrecision => "RelaxedPrecision".to_string(),
            DecorationKind::SpecId => "SpecId".to_string(),
            DecorationKind::Block => "Block".to_string(),
            DecorationKind::BufferBlock => "BufferBlock".to_string(),
            DecorationKind::RowMajor => "RowMajor".to_string(),
            DecorationKind::ColMajor => "ColMajor".to_string(),
            DecorationKind::ArrayStride => "ArrayStride".to_string(),
            DecorationKind::MatrixStride => "MatrixStride".to_string(),
            DecorationKind::GlslShared => "GLSLShared".to_string(),
            DecorationKind::GlslPacked => "GLSLPacked".to_string(),
            DecorationKind::CPacked => "CPacked".to_string(),
            DecorationKind::BuiltIn => "BuiltIn".to_string(),
            DecorationKind::NoPerspective => "NoPerspective".to_string(),
            DecorationKind::Flat => "Flat".to_string(),
            DecorationKind::Patch => "Patch".to_string(),
            DecorationKind::Centroid => "Centroid".to_string(),
            DecorationKind::Sample => "Sample".to_string(),
            DecorationKind::Invariant => "Invariant".to_string(),
            DecorationKind::Restrict => "Restrict".to_string(),
            DecorationKind::Aliased => "Aliased".to_string(),
            DecorationKind::Volatile => "Volatile".to_string(),
            DecorationKind::Constant => "Constant".to_string(),
            DecorationKind::Coherent => "Coherent".to_string(),
            DecorationKind::NonWritable => "NonWritable".to_string(),
            DecorationKind::NonReadable => "NonReadable".to_string(),
            DecorationKind::Uniform => "Uniform".to_string(),
            DecorationKind::SaturatedConversion => "SaturatedConversion".to_string(),
            DecorationKind::Stream => "Stream".to_string(),
            DecorationKind::Location => "Location".to_string(),
            DecorationKind::Component => "Component".to_string(),
            DecorationKind::Index => "Index".to_string(),
            DecorationKind::Binding => "Binding".to_string(),
            DecorationKind::DescriptorSet => "DescriptorSet".to_string(),
            DecorationKind::Offset => "Offset".to_string(),
            DecorationKind::XfbBuffer => "XfbBuffer".to_string(),
            DecorationKind::XfbStride => "XfbStride".to_string(),
            DecorationKind::FuncParamAttr => "FuncParamAttr".to_string(),
            DecorationKind::FpRoundingMode => "FPRoundingMode".to_string(),
            DecorationKind::FpFastMathMode => "FPFastMathMode".to_string(),
            DecorationKind::LinkageAttributes => "LinkageAttributes".to_string(),
            DecorationKind::NoContraction => "NoContraction".to_string(),
            DecorationKind::InputAttachmentIndex => "InputAttachmentIndex".to_string(),
            DecorationKind::Alignment => "Alignment".to_string(),
            DecorationKind::Unrecognised(n) => format!("Unrecognised{{{}}}", n),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionMode {
    Invocations,
    SpacingEqual,
    SpacingFractionalEven,
    SpacingFractionalOdd,
    VertexOrderCw,
    VertexOrderCcw,
    PixelCenterInteger,
    OriginUpperLeft,
    OriginLowerLeft,
    EarlyFragmentTests,
    PointMode,
    Xfb,
    DepthReplacing,
    DepthGreater,
    DepthLess,
    DepthUnchanged,
    LocalSize,
    LocalSizeHint,
    InputPoints,
    InputLines,
    InputLinesAdjacency,
    Triangles,
    InputTrianglesAdjacency,
    Quads,
    Isolines,
    OutputVertices,
    OutputPoints,
    OutputLineStrip,
    OutputTriangleStrip,
    VecTypeHint,
    ContractionOff,
    Unrecognised(u32),
}

impl ExecutionMode {
    pub fn from_word(w: u32) -> Self {
        match w {
            0 => ExecutionMode::Invocations,
            1 => ExecutionMode::SpacingEqual,
            2 => ExecutionMode::SpacingFractionalEven,
            3 => ExecutionMode::SpacingFractionalOdd,
            4 => ExecutionMode::VertexOrderCw,
            5 => ExecutionMode::VertexOrderCcw,
            6 => ExecutionMode::PixelCenterInteger,
            7 => ExecutionMode::OriginUpperLeft,
            8 => ExecutionMode::OriginLowerLeft,
            9 => ExecutionMode::EarlyFragmentTests,
            10 => ExecutionMode::PointMode,
            11 => ExecutionMode::Xfb,
            12 => ExecutionMode::DepthReplacing,
            14 => ExecutionMode::DepthGreater,
            15 => ExecutionMode::DepthLess,
            16 => ExecutionMode::DepthUnchanged,
            17 => ExecutionMode::LocalSize,
            18 => ExecutionMode::LocalSizeHint,
            19 => ExecutionMode::InputPoints,
            20 => ExecutionMode::InputLines,
            21 => ExecutionMode::InputLinesAdjacency,
            22 => ExecutionMode::Triangles,
            23 => ExecutionMode::InputTrianglesAdjacency,
            24 => ExecutionMode::Quads,
            25 => ExecutionMode::Isolines,
            26 => ExecutionMode::OutputVertices,
            27 => ExecutionMode::OutputPoints,
            28 => ExecutionMode::OutputLineStrip,
            29 => ExecutionMode::OutputTriangleStrip,
            30 => ExecutionMode::VecTypeHint,
            31 => ExecutionMode::ContractionOff,
            n => ExecutionMode::Unrecognised(n),
        }
    }

    pub fn name(self) -> String {
        match self {
            ExecutionMode::Invocations => "Invocations".to_string(),
            ExecutionMode::SpacingEqual => "SpacingEqual".to_string(),
            ExecutionMode::SpacingFractionalEven => "SpacingFractionalEven".to_string(),
            ExecutionMode::SpacingFractionalOdd => "SpacingFractionalOdd".to_string(),
            ExecutionMode::VertexOrderCw => "VertexOrderCw".to_string(),
            ExecutionMode::VertexOrderCcw => "VertexOrderCcw".to_string(),
            ExecutionMode::PixelCenterInteger => "PixelCenterInteger".to_string(),
            ExecutionMode::OriginUpperLeft => "OriginUpperLeft".to_string(),
            ExecutionMode::OriginLowerLeft => "OriginLowerLeft".to_string(),
            ExecutionMode::EarlyFragmentTests => "EarlyFragmentTests".to_string(),
            ExecutionMode::PointMode => "PointMode".to_string(),
            ExecutionMode::Xfb => "Xfb".to_string(),
            ExecutionMode::DepthReplacing => "DepthReplacing".to_string(),
            ExecutionMode::DepthGreater => "DepthGreater".to_string(),
            ExecutionMode::DepthLess => "DepthLess".to_string(),
            ExecutionMode::DepthUnchanged => "DepthUnchanged".to_string(),
            ExecutionMode::LocalSize => "LocalSize".to_string(),
            ExecutionMode::LocalSizeHint => "LocalSizeHint".to_string(),
            ExecutionMode::InputPoints => "InputPoints".to_string(),
            ExecutionMode::InputLines => "InputLines".to_string(),
            ExecutionMode::InputLinesAdjacency => "InputLinesAdjacency".to_string(),
            ExecutionMode::Triangles => "Triangles".to_string(),
            ExecutionMode::InputTrianglesAdjacency => "InputTrianglesAdjacency".to_string(),
            ExecutionMode::Quads => "Quads".to_string(),
            ExecutionMode::Isolines => "Isolines".to_string(),
            ExecutionMode::OutputVertices => "OutputVertices".to_string(),
            ExecutionMode::OutputPoints => "OutputPoints".to_string(),
            ExecutionMode::OutputLineStrip => "OutputLineStrip".to_string(),
            ExecutionMode::OutputTriangleStrip => "OutputTriangleStrip".to_string(),
            ExecutionMode::VecTypeHint => "VecTypeHint".to_string(),
            ExecutionMode::ContractionOff => "ContractionOff".to_string(),
            ExecutionMode::Unrecognised(n) => format!("Unrecognised{{{}}}", n),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    Matrix,
    Shader,
    Geometry,
    Tessellation,
    Addresses,
    Linkage,
    Kernel,
    Vector16,
    Float16Buffer,
    Float16,
    Float64,
    Int64,
    Int64Atomics,
    ImageBasic,
    ImageReadWrite,
    ImageMipmap,
    Pipes,
    Groups,
    DeviceEnqueue,
    LiteralSampler,
    AtomicStorage,
    Int16,
    TessellationPointSize,
    GeometryPointSize,
    ImageGatherExtended,
    StorageImageMultisample,
    UniformBufferArrayDynamicIndexing,
    SampledImageArrayDynamicIndexing,
    StorageBufferArrayDynamicIndexing,
    StorageImageArrayDynamicIndexing,
    ClipDistance,
    CullDistance,
    ImageCubeArray,
    SampleRateShading,
    ImageRect,
    SampledRect,
    GenericPointer,
    Int8,
    InputAttachment,
    SparseResidency,
    MinLod,
    Sampled1D,
    Image1D,
    SampledCubeArray,
    SampledBuffer,
    ImageBuffer,
    ImageMSArray,
    StorageImageExtendedFormats,
    ImageQuery,
    DerivativeControl,
    InterpolationFunction,
    TransformFeedback,
    Unrecognised(u32),
}

impl Capability {
    pub fn from_word(w: u32) -> Self {
        match w {
            0 => Capability::Matrix,
            1 => Capability::Shader,
            2 => Capability::Geometry,
            3 => Capability::Tessellation,
            4 => Capability::Addresses,
            5 => Capability::Linkage,
            6 => Capability::Kernel,
            7 => Capability::Vector16,
            8 => Capability::Float16Buffer,
            9 => Capability::Float16,
            10 => Capability::Float64,
            11 => Capability::Int64,
            12 => Capability::Int64Atomics,
            13 => Capability::ImageBasic,
            14 => Capability::ImageReadWrite,
            15 => Capability::ImageMipmap,
            17 => Capability::Pipes,
            18 => Capability::Groups,
            19 => Capability::DeviceEnqueue,
            20 => Capability::LiteralSampler,
            21 => Capability::AtomicStorage,
            22 => Capability::Int16,
            23 => Capability::TessellationPointSize,
            24 => Capability::GeometryPointSize,
            25 => Capability::ImageGatherExtended,
            27 => Capability::StorageImageMultisample,
            28 => Capability::UniformBufferArrayDynamicIndexing,
            29 => Capability::SampledImageArrayDynamicIndexing,
            30 => Capability::StorageBufferArrayDynamicIndexing,
            31 => Capability::StorageImageArrayDynamicIndexing,
            32 => Capability::ClipDistance,
            33 => Capability::CullDistance,
            34 => Capability::ImageCubeArray,
            35 => Capability::SampleRateShading,
            36 => Capability::ImageRect,
            37 => Capability::SampledRect,
            38 => Capability::GenericPointer,
            39 => Capability::Int8,
            40 => Capability::InputAttachment,
            41 => Capability::SparseResidency,
            42 => Capability::MinLod,
            43 => Capability::Sampled1D,
            44 => Capability::Image1D,
            45 => Capability::SampledCubeArray,
            46 => Capability::SampledBuffer,
            47 => Capability::ImageBuffer,
            48 => Capability::ImageMSArray,
            49 => Capability::StorageImageExtendedFormats,
            50 => Capability::ImageQuery,
            51 => Capability::DerivativeControl,
            52 => Capability::InterpolationFunction,
            53 => Capability::TransformFeedback,
            n => Capability::Unrecognised(n),
        }
    }

    pub fn name(self) -> String {
        match self {
            Capability::Matrix => "Matrix".to_string(),
            Capability::Shader => "Shader".to_string(),
            Capability::Geometry => "Geometry".to_string(),
            Capability::Tessellation => "Tessellation".to_string(),
            Capability::Addresses => "Addresses".to_string(),
            Capability::Linkage => "Linkage".to_string(),
            Capability::Kernel => "Kernel".to_string(),
            Capability::Vector16 => "Vector16".to_string(),
            Capability::Float16Buffer => "Float16Buffer".to_string(),
            Capability::Float16 => "Float16".to_string(),
            Capability::Float64 => "Float64".to_string(),
            Capability::Int64 => "Int64".to_string(),
            Capability::Int64Atomics => "Int64Atomics".to_string(),
            Capability::ImageBasic => "ImageBasic".to_string(),
            Capability::ImageReadWrite => "ImageReadWrite".to_string(),
            Capability::ImageMipmap => "ImageMipmap".to_string(),
            Capability::Pipes => "Pipes".to_string(),
            Capability::Groups => "Groups".to_string(),
            Capability::DeviceEnqueue => "DeviceEnqueue".to_string(),
            Capability::LiteralSampler => "LiteralSampler".to_string(),
            Capability::AtomicStorage => "AtomicStorage".to_string(),
            Capability::Int16 => "Int16".to_string(),
            Capability::TessellationPointSize => "TessellationPointSize".to_string(),
            Capability::GeometryPointSize => "GeometryPointSize".to_string(),
            Capability::ImageGatherExtended => "ImageGatherExtended".to_string(),
            Capability::StorageImageMultisample => "StorageImageMultisample".to_string(),
            Capability::UniformBufferArrayDynamicIndexing => {
                "UniformBufferArrayDynamicIndexing".to_string()
            }
            Capability::SampledImageArrayDynamicIndexing => {
                "SampledImageArrayDynamicIndexing".to_string()
            }
            Capability::StorageBufferArrayDynamicIndexing => {
                "StorageBufferArrayDynamicIndexing".to_string()
            }
            Capability::StorageImageArrayDynamicIndexing => {
                "StorageImageArrayDynamicIndexing".to_string()
            }
            Capability::ClipDistance => "ClipDistance".to_string(),
            Capability::CullDistance => "CullDistance".to_string(),
            Capability::ImageCubeArray => "ImageCubeArray".to_string(),
            Capability::SampleRateShading => "SampleRateShading".to_string(),
            Capability::ImageRect => "ImageRect".to_string(),
            Capability::SampledRect => "SampledRect".to_string(),
            Capability::GenericPointer => "GenericPointer".to_string(),
            Capability::Int8 => "Int8".to_string(),
            Capability::InputAttachment => "InputAttachment".to_string(),
            Capability::SparseResidency => "SparseResidency".to_string(),
            Capability::MinLod => "MinLod".to_string(),
            Capability::Sampled1D => "Sampled1D".to_string(),
            Capability::Image1D => "Image1D".to_string(),
            Capability::SampledCubeArray => "SampledCubeArray".to_string(),
            Capability::SampledBuffer => "SampledBuffer".to_string(),
            Capability::ImageBuffer => "ImageBuffer".to_string(),
            Capability::ImageMSArray => "ImageMSArray".to_string(),
            Capability::StorageImageExtendedFormats => "StorageImageExtendedFormats".to_string(),
            Capability::ImageQuery => "ImageQuery".to_string(),
            Capability::DerivativeControl => "DerivativeControl".to_string(),
            Capability::InterpolationFunction => "InterpolationFunction".to_string(),
            Capability::TransformFeedback => "TransformFeedback".to_string(),
            Capability::Unrecognised(n) => format!("Unrecognised{{{}}}", n),
        }
    }
}

// Flag masks stay raw words; formatters render comma-separated flag names.

pub const FUNCTION_CONTROL_INLINE: u32 = 0x1;
pub const FUNCTION_CONTROL_DONT_INLINE: u32 = 0x2;
pub const FUNCTION_CONTROL_PURE: u32 = 0x4;
pub const FUNCTION_CONTROL_CONST: u32 = 0x8;

pub fn function_control_str(mask: u32) -> String {
    let mut flags = Vec::new();
    if mask & FUNCTION_CONTROL_INLINE != 0 {
        flags.push("Inline");
    }
    if mask & FUNCTION_CONTROL_DONT_INLINE != 0 {
        flags.push("DontInline");
    }
    if mask & FUNCTION_CONTROL_PURE != 0 {
        flags.push("Pure");
    }
    if mask & FUNCTION_CONTROL_CONST != 0 {
        flags.push("Const");
    }
    flags.join(", ")
}

pub fn selection_control_str(mask: u32) -> String {
    let mut flags = Vec::new();
    if mask & 0x1 != 0 {
        flags.push("Flatten");
    }
    if mask & 0x2 != 0 {
        flags.push("DontFlatten");
    }
    flags.join(", ")
}

pub fn loop_control_str(mask: u32) -> String {
    let mut flags = Vec::new();
    if mask & 0x1 != 0 {
        flags.push("Unroll");
    }
    if mask & 0x2 != 0 {
        flags.push("DontUnroll");
    }
    flags.join(", ")
}

pub fn memory_access_str(mask: u32) -> String {
    let mut flags = Vec::new();
    if mask & 0x1 != 0 {
        flags.push("Volatile");
    }
    if mask & 0x2 != 0 {
        flags.push("Aligned");
    }
    if mask & 0x4 != 0 {
        flags.push("Nontemporal");
    }
    flags.join(", ")
}

/// ` [Flags]` when the rendered mask is non-empty, nothing otherwise.
pub fn optional_flag_str(flags: &str) -> String {
    if flags.is_empty() {
        String::new()
    } else {
        format!(" [{}]", flags)
    }
}

/// Debug name table for the "GLSL.std.450" extended instruction set,
/// indexed by instruction number. Other sets are represented by name only.
pub fn glsl450_debug_names() -> &'static [&'static str] {
    &[
        "Bad", // 0 is not a valid instruction
        "Round",
        "RoundEven",
        "Trunc",
        "FAbs",
        "SAbs",
        "FSign",
        "SSign",
        "Floor",
        "Ceil",
        "Fract",
        "Radians",
        "Degrees",
        "Sin",
        "Cos",
        "Tan",
        "Asin",
        "Acos",
        "Atan",
        "Sinh",
        "Cosh",
        "Tanh",
        "Asinh",
        "Acosh",
        "Atanh",
        "Atan2",
        "Pow",
        "Exp",
        "Log",
        "Exp2",
        "Log2",
        "Sqrt",
        "InverseSqrt",
        "Determinant",
        "MatrixInverse",
        "Modf",
        "ModfStruct",
        "FMin",
        "UMin",
        "SMin",
        "FMax",
        "UMax",
        "SMax",
        "FClamp",
        "UClamp",
        "SClamp",
        "FMix",
        "IMix",
        "Step",
        "SmoothStep",
        "Fma",
        "Frexp",
        "FrexpStruct",
        "Ldexp",
        "PackSnorm4x8",
        "PackUnorm4x8",
        "PackSnorm2x16",
        "PackUnorm2x16",
        "PackHalf2x16",
        "PackDouble2x32",
        "UnpackSnorm2x16",
        "UnpackUnorm2x16",
        "UnpackHalf2x16",
        "UnpackSnorm4x8",
        "UnpackUnorm4x8",
        "UnpackDouble2x32",
        "Length",
        "Distance",
        "Cross",
        "Normalize",
        "FaceForward",
        "Reflect",
        "Refract",
        "FindILsb",
        "FindSMsb",
        "FindUMsb",
        "InterpolateAtCentroid",
        "InterpolateAtSample",
        "InterpolateAtOffset",
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opcode_roundtrip_for_core_ops() {
        for (word, op) in [
            (19u16, Op::TypeVoid),
            (43, Op::Constant),
            (54, Op::Function),
            (62, Op::Store),
            (248, Op::Label),
            (250, Op::BranchConditional),
        ] {
            assert_eq!(Op::from_word(word), op);
        }
    }

    #[test]
    fn unknown_values_render_as_unrecognised() {
        assert_eq!(Op::from_word(9999).name(), "Unrecognised{9999}");
        assert_eq!(StorageClass::from_word(77).name(), "Unrecognised{77}");
        assert_eq!(BuiltIn::from_word(2).name(), "Unrecognised{2}");
    }

    #[test]
    fn flag_masks_render_comma_separated() {
        assert_eq!(function_control_str(0x5), "Inline, Pure");
        assert_eq!(optional_flag_str(""), "");
        assert_eq!(optional_flag_str("Volatile"), " [Volatile]");
    }

    #[test]
    fn result_layouts_classify_the_operand_prefix() {
        assert_eq!(Op::Phi.result_layout(), (true, true));
        assert_eq!(Op::Undef.result_layout(), (true, true));
        assert_eq!(Op::Label.result_layout(), (false, true));
        assert_eq!(Op::TypeRuntimeArray.result_layout(), (false, true));
        assert_eq!(Op::Switch.result_layout(), (false, false));
        assert_eq!(Op::from_word(9999).result_layout(), (false, false));
    }
}
