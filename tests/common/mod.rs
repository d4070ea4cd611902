//! Hand-assembly of SPIR-V word streams for the end-to-end tests.

#![allow(dead_code)]

pub const MAGIC: u32 = 0x0723_0203;
pub const VERSION: u32 = 0x0001_0000;

pub const OP_UNDEF: u16 = 1;
pub const OP_NAME: u16 = 5;
pub const OP_MEMBER_NAME: u16 = 6;
pub const OP_ENTRY_POINT: u16 = 15;
pub const OP_CAPABILITY: u16 = 17;
pub const OP_TYPE_VOID: u16 = 19;
pub const OP_TYPE_BOOL: u16 = 20;
pub const OP_TYPE_INT: u16 = 21;
pub const OP_TYPE_FLOAT: u16 = 22;
pub const OP_TYPE_VECTOR: u16 = 23;
pub const OP_TYPE_MATRIX: u16 = 24;
pub const OP_TYPE_STRUCT: u16 = 30;
pub const OP_TYPE_POINTER: u16 = 32;
pub const OP_TYPE_FUNCTION: u16 = 33;
pub const OP_CONSTANT_TRUE: u16 = 41;
pub const OP_CONSTANT_FALSE: u16 = 42;
pub const OP_CONSTANT: u16 = 43;
pub const OP_CONSTANT_COMPOSITE: u16 = 44;
pub const OP_FUNCTION: u16 = 54;
pub const OP_FUNCTION_PARAMETER: u16 = 55;
pub const OP_FUNCTION_END: u16 = 56;
pub const OP_FUNCTION_CALL: u16 = 57;
pub const OP_VARIABLE: u16 = 59;
pub const OP_LOAD: u16 = 61;
pub const OP_STORE: u16 = 62;
pub const OP_ACCESS_CHAIN: u16 = 65;
pub const OP_DECORATE: u16 = 71;
pub const OP_MEMBER_DECORATE: u16 = 72;
pub const OP_VECTOR_SHUFFLE: u16 = 79;
pub const OP_PHI: u16 = 245;
pub const OP_LOOP_MERGE: u16 = 246;
pub const OP_SELECTION_MERGE: u16 = 247;
pub const OP_LABEL: u16 = 248;
pub const OP_BRANCH: u16 = 249;
pub const OP_BRANCH_CONDITIONAL: u16 = 250;
pub const OP_SWITCH: u16 = 251;
pub const OP_RETURN: u16 = 253;

pub const SC_INPUT: u32 = 1;
pub const SC_UNIFORM: u32 = 2;
pub const SC_OUTPUT: u32 = 3;
pub const SC_FUNCTION: u32 = 7;

pub const DEC_BUILTIN: u32 = 11;
pub const DEC_LOCATION: u32 = 30;
pub const DEC_BINDING: u32 = 33;
pub const DEC_DESCRIPTOR_SET: u32 = 34;

pub const BUILTIN_POSITION: u32 = 0;

pub const MODEL_VERTEX: u32 = 0;

pub struct ModuleWords {
    words: Vec<u32>,
}

impl ModuleWords {
    pub fn new(id_bound: u32) -> Self {
        ModuleWords {
            words: vec![MAGIC, VERSION, 0, id_bound, 0],
        }
    }

    pub fn op(&mut self, opcode: u16, operands: &[u32]) -> &mut Self {
        self.words
            .push(((operands.len() as u32 + 1) << 16) | opcode as u32);
        self.words.extend_from_slice(operands);
        self
    }

    /// An instruction whose operands embed a NUL-terminated string.
    pub fn op_str(&mut self, opcode: u16, pre: &[u32], s: &str, post: &[u32]) -> &mut Self {
        let mut operands = pre.to_vec();
        operands.extend(str_words(s));
        operands.extend_from_slice(post);
        self.op(opcode, &operands)
    }

    pub fn words(&self) -> &[u32] {
        &self.words
    }
}

pub fn str_words(s: &str) -> Vec<u32> {
    let mut bytes = s.as_bytes().to_vec();
    bytes.push(0);
    while bytes.len() % 4 != 0 {
        bytes.push(0);
    }
    bytes
        .chunks(4)
        .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect()
}
