//! End-to-end decompilation scenarios over hand-assembled modules.

mod common;

use common::*;
use pretty_assertions::assert_eq;

use spvdec::{disassemble_module, parse_module};

fn decompile(words: &[u32]) -> String {
    let mut module = parse_module(words).expect("parse module");
    disassemble_module(&mut module)
}

#[test]
fn rejects_bad_magic_with_no_instructions() {
    let words = [0xdead_beef, VERSION, 0, 4, 0];
    let err = parse_module(&words).unwrap_err();
    assert!(err.to_string().contains("magic"));
}

#[test]
fn lookup_succeeds_for_every_id_below_the_bound() {
    let mut b = ModuleWords::new(40);
    b.op(OP_TYPE_VOID, &[1]);
    b.op(OP_TYPE_FLOAT, &[17, 32]);
    let m = parse_module(b.words()).unwrap();
    for id in 0..m.id_bound() {
        assert!(m.by_id(id).is_some(), "id {} did not resolve", id);
    }
}

// void main() {}
#[test]
fn empty_entry_point_function() {
    let mut b = ModuleWords::new(5);
    b.op(OP_CAPABILITY, &[1]);
    b.op_str(OP_ENTRY_POINT, &[MODEL_VERTEX, 3], "main", &[]);
    b.op(OP_TYPE_VOID, &[1]);
    b.op(OP_TYPE_FUNCTION, &[2, 1]);
    b.op(OP_FUNCTION, &[1, 3, 0, 2]);
    b.op(OP_LABEL, &[4]);
    b.op(OP_RETURN, &[]);
    b.op(OP_FUNCTION_END, &[]);

    let text = decompile(b.words());
    assert!(
        text.contains("void main() {\n} // main\n"),
        "unexpected listing:\n{}",
        text
    );
}

// gl_Position = float4(1.0, 0.0, 0.0, 1.0); with no intermediate temps
#[test]
fn constant_vector_store_folds_into_one_line() {
    let mut b = ModuleWords::new(12);
    b.op(OP_CAPABILITY, &[1]);
    b.op_str(OP_ENTRY_POINT, &[MODEL_VERTEX, 3], "main", &[]);
    b.op_str(OP_NAME, &[8], "gl_Position", &[]);
    b.op(OP_DECORATE, &[8, DEC_BUILTIN, BUILTIN_POSITION]);
    b.op(OP_TYPE_VOID, &[1]);
    b.op(OP_TYPE_FUNCTION, &[2, 1]);
    b.op(OP_TYPE_FLOAT, &[5, 32]);
    b.op(OP_TYPE_VECTOR, &[6, 5, 4]);
    b.op(OP_TYPE_POINTER, &[7, SC_OUTPUT, 6]);
    b.op(OP_VARIABLE, &[7, 8, SC_OUTPUT]);
    b.op(OP_CONSTANT, &[5, 9, 1.0f32.to_bits()]);
    b.op(OP_CONSTANT, &[5, 10, 0.0f32.to_bits()]);
    b.op(OP_CONSTANT_COMPOSITE, &[6, 11, 9, 10, 10, 9]);
    b.op(OP_FUNCTION, &[1, 3, 0, 2]);
    b.op(OP_LABEL, &[4]);
    b.op(OP_STORE, &[8, 11]);
    b.op(OP_RETURN, &[]);
    b.op(OP_FUNCTION_END, &[]);

    let text = decompile(b.words());
    assert!(
        text.contains("gl_Position = float4(1.0, 0.0, 0.0, 1.0);"),
        "unexpected listing:\n{}",
        text
    );
    assert!(!text.contains("{11}"), "temporary leaked:\n{}", text);
}

// if (c) { } else { } with the merge label consumed
#[test]
fn selection_merge_rebuilds_if_else() {
    let mut b = ModuleWords::new(10);
    b.op(OP_CAPABILITY, &[1]);
    b.op_str(OP_ENTRY_POINT, &[MODEL_VERTEX, 3], "main", &[]);
    b.op(OP_TYPE_VOID, &[1]);
    b.op(OP_TYPE_FUNCTION, &[2, 1]);
    b.op(OP_TYPE_BOOL, &[5]);
    b.op(OP_CONSTANT_TRUE, &[5, 6]);
    b.op(OP_FUNCTION, &[1, 3, 0, 2]);
    b.op(OP_LABEL, &[4]);
    b.op(OP_SELECTION_MERGE, &[7, 0]);
    b.op(OP_BRANCH_CONDITIONAL, &[6, 8, 9]);
    b.op(OP_LABEL, &[8]);
    b.op(OP_BRANCH, &[7]);
    b.op(OP_LABEL, &[9]);
    b.op(OP_BRANCH, &[7]);
    b.op(OP_LABEL, &[7]);
    b.op(OP_RETURN, &[]);
    b.op(OP_FUNCTION_END, &[]);

    let text = decompile(b.words());
    assert!(text.contains("if (true) {"), "missing if:\n{}", text);
    assert!(text.contains("} else {"), "missing else:\n{}", text);
    assert!(!text.contains("SelectionMerge"), "merge leaked:\n{}", text);
    assert!(!text.contains("Label"), "label leaked:\n{}", text);
    assert!(!text.contains("goto"), "goto leaked:\n{}", text);
}

// while (cond) { ... break; }
#[test]
fn loop_merge_rebuilds_while_with_break() {
    let mut b = ModuleWords::new(13);
    b.op(OP_CAPABILITY, &[1]);
    b.op_str(OP_ENTRY_POINT, &[MODEL_VERTEX, 3], "main", &[]);
    b.op(OP_TYPE_VOID, &[1]);
    b.op(OP_TYPE_FUNCTION, &[2, 1]);
    b.op(OP_TYPE_BOOL, &[11]);
    b.op(OP_CONSTANT_TRUE, &[11, 7]);
    b.op(OP_CONSTANT_FALSE, &[11, 12]);
    b.op(OP_FUNCTION, &[1, 3, 0, 2]);
    b.op(OP_LABEL, &[4]);
    b.op(OP_BRANCH, &[5]);
    // loop header: merge is {8}, body begins at {6}
    b.op(OP_LABEL, &[5]);
    b.op(OP_LOOP_MERGE, &[8, 0]);
    b.op(OP_BRANCH_CONDITIONAL, &[7, 6, 8]);
    // body: an if whose true path breaks out
    b.op(OP_LABEL, &[6]);
    b.op(OP_SELECTION_MERGE, &[10, 0]);
    b.op(OP_BRANCH_CONDITIONAL, &[12, 9, 10]);
    b.op(OP_LABEL, &[9]);
    b.op(OP_BRANCH, &[8]);
    b.op(OP_LABEL, &[10]);
    b.op(OP_BRANCH, &[5]);
    b.op(OP_LABEL, &[8]);
    b.op(OP_RETURN, &[]);
    b.op(OP_FUNCTION_END, &[]);

    let text = decompile(b.words());
    assert!(text.contains("while (true) {"), "missing while:\n{}", text);
    assert!(text.contains("break;"), "missing break:\n{}", text);
    assert!(!text.contains("LoopMerge"), "merge leaked:\n{}", text);
    assert!(!text.contains("goto"), "goto leaked:\n{}", text);
    assert!(!text.contains("Label"), "label leaked:\n{}", text);
}

fn inout_call_module() -> Vec<u32> {
    let mut b = ModuleWords::new(16);
    b.op(OP_CAPABILITY, &[1]);
    b.op_str(OP_ENTRY_POINT, &[MODEL_VERTEX, 9], "main", &[]);
    b.op_str(OP_NAME, &[6], "f", &[]);
    b.op_str(OP_NAME, &[11], "v", &[]);
    b.op_str(OP_NAME, &[12], "_tmp_t", &[]);
    b.op(OP_TYPE_VOID, &[1]);
    b.op(OP_TYPE_FUNCTION, &[2, 1]);
    b.op(OP_TYPE_FLOAT, &[3, 32]);
    b.op(OP_TYPE_POINTER, &[4, SC_FUNCTION, 3]);
    b.op(OP_TYPE_FUNCTION, &[5, 1, 4]);
    // void f(float*)
    b.op(OP_FUNCTION, &[1, 6, 0, 5]);
    b.op(OP_FUNCTION_PARAMETER, &[4, 7]);
    b.op(OP_LABEL, &[8]);
    b.op(OP_RETURN, &[]);
    b.op(OP_FUNCTION_END, &[]);
    // main: the temp exists only to pass v by reference
    b.op(OP_FUNCTION, &[1, 9, 0, 2]);
    b.op(OP_LABEL, &[10]);
    b.op(OP_VARIABLE, &[4, 11, SC_FUNCTION]);
    b.op(OP_VARIABLE, &[4, 12, SC_FUNCTION]);
    b.op(OP_LOAD, &[3, 13, 11]);
    b.op(OP_STORE, &[12, 13]);
    b.op(OP_FUNCTION_CALL, &[1, 14, 6, 12]);
    b.op(OP_LOAD, &[3, 15, 12]);
    b.op(OP_STORE, &[11, 15]);
    b.op(OP_RETURN, &[]);
    b.op(OP_FUNCTION_END, &[]);
    b.words().to_vec()
}

// Store t, Load v; f(t); Store v, Load t collapses to f(v)
#[test]
fn inout_parameter_temp_is_elided() {
    let text = decompile(&inout_call_module());
    assert!(text.contains("f(v);"), "call site not collapsed:\n{}", text);
    assert!(!text.contains("_tmp_t"), "temp survived:\n{}", text);
}

// selectors (0,1,4,5) over two float4s read as a.xy, b.xy
#[test]
fn vector_shuffle_synthesizes_swizzles() {
    let mut b = ModuleWords::new(15);
    b.op(OP_CAPABILITY, &[1]);
    b.op_str(OP_ENTRY_POINT, &[MODEL_VERTEX, 3], "main", &[]);
    b.op_str(OP_NAME, &[8], "a", &[]);
    b.op_str(OP_NAME, &[9], "b", &[]);
    b.op_str(OP_NAME, &[11], "o", &[]);
    b.op(OP_TYPE_VOID, &[1]);
    b.op(OP_TYPE_FUNCTION, &[2, 1]);
    b.op(OP_TYPE_FLOAT, &[5, 32]);
    b.op(OP_TYPE_VECTOR, &[6, 5, 4]);
    b.op(OP_TYPE_POINTER, &[7, SC_INPUT, 6]);
    b.op(OP_TYPE_POINTER, &[10, SC_OUTPUT, 6]);
    b.op(OP_VARIABLE, &[7, 8, SC_INPUT]);
    b.op(OP_VARIABLE, &[7, 9, SC_INPUT]);
    b.op(OP_VARIABLE, &[10, 11, SC_OUTPUT]);
    b.op(OP_FUNCTION, &[1, 3, 0, 2]);
    b.op(OP_LABEL, &[4]);
    b.op(OP_LOAD, &[6, 12, 8]);
    b.op(OP_LOAD, &[6, 13, 9]);
    b.op(OP_VECTOR_SHUFFLE, &[6, 14, 12, 13, 0, 1, 4, 5]);
    b.op(OP_STORE, &[11, 14]);
    b.op(OP_RETURN, &[]);
    b.op(OP_FUNCTION_END, &[]);

    let text = decompile(b.words());
    assert!(
        text.contains("o = float4(a.xy, b.xy);"),
        "unexpected shuffle rendering:\n{}",
        text
    );
}

// a load folds to the latest store's view of the variable, and a
// twice-stored variable is never elided
#[test]
fn loads_respect_intervening_stores() {
    let mut b = ModuleWords::new(13);
    b.op(OP_CAPABILITY, &[1]);
    b.op_str(OP_ENTRY_POINT, &[MODEL_VERTEX, 3], "main", &[]);
    b.op_str(OP_NAME, &[8], "v", &[]);
    b.op_str(OP_NAME, &[9], "myout", &[]);
    b.op(OP_TYPE_VOID, &[1]);
    b.op(OP_TYPE_FUNCTION, &[2, 1]);
    b.op(OP_TYPE_FLOAT, &[5, 32]);
    b.op(OP_TYPE_POINTER, &[6, SC_FUNCTION, 5]);
    b.op(OP_TYPE_POINTER, &[7, SC_OUTPUT, 5]);
    b.op(OP_VARIABLE, &[7, 9, SC_OUTPUT]);
    b.op(OP_CONSTANT, &[5, 10, 1.0f32.to_bits()]);
    b.op(OP_CONSTANT, &[5, 11, 2.0f32.to_bits()]);
    b.op(OP_FUNCTION, &[1, 3, 0, 2]);
    b.op(OP_LABEL, &[4]);
    b.op(OP_VARIABLE, &[6, 8, SC_FUNCTION]);
    b.op(OP_STORE, &[8, 10]);
    b.op(OP_STORE, &[8, 11]);
    b.op(OP_LOAD, &[5, 12, 8]);
    b.op(OP_STORE, &[9, 12]);
    b.op(OP_RETURN, &[]);
    b.op(OP_FUNCTION_END, &[]);

    let text = decompile(b.words());
    // first store declares at first use, second remains an assignment
    assert!(text.contains("float* v = 1.0;"), "declaration missing:\n{}", text);
    assert!(text.contains("v = 2.0;"), "second store lost:\n{}", text);
    // the load folds to the variable, not to either stored value
    assert!(text.contains("myout = v;"), "load folded wrongly:\n{}", text);
}

// Branch L; Label L with no other reference to L produces neither line
#[test]
fn redundant_branch_label_pairs_collapse() {
    let mut b = ModuleWords::new(6);
    b.op(OP_CAPABILITY, &[1]);
    b.op_str(OP_ENTRY_POINT, &[MODEL_VERTEX, 3], "main", &[]);
    b.op(OP_TYPE_VOID, &[1]);
    b.op(OP_TYPE_FUNCTION, &[2, 1]);
    b.op(OP_FUNCTION, &[1, 3, 0, 2]);
    b.op(OP_LABEL, &[4]);
    b.op(OP_BRANCH, &[5]);
    b.op(OP_LABEL, &[5]);
    b.op(OP_RETURN, &[]);
    b.op(OP_FUNCTION_END, &[]);

    let text = decompile(b.words());
    assert!(!text.contains("goto"), "branch survived:\n{}", text);
    assert!(!text.contains("Label"), "label survived:\n{}", text);
    assert!(text.contains("void main() {\n} // main\n"), "body not empty:\n{}", text);
}

// a switch terminates its block and keeps every case target visible
#[test]
fn switch_terminates_the_block_and_renders_its_cases() {
    let mut b = ModuleWords::new(9);
    b.op(OP_CAPABILITY, &[1]);
    b.op_str(OP_ENTRY_POINT, &[MODEL_VERTEX, 3], "main", &[]);
    b.op(OP_TYPE_VOID, &[1]);
    b.op(OP_TYPE_FUNCTION, &[2, 1]);
    b.op(OP_TYPE_INT, &[7, 32, 1]);
    b.op(OP_CONSTANT, &[7, 8, 0]);
    b.op(OP_FUNCTION, &[1, 3, 0, 2]);
    b.op(OP_LABEL, &[4]);
    b.op(OP_SWITCH, &[8, 5, 1, 6]);
    b.op(OP_LABEL, &[6]);
    b.op(OP_BRANCH, &[5]);
    b.op(OP_LABEL, &[5]);
    b.op(OP_RETURN, &[]);
    b.op(OP_FUNCTION_END, &[]);

    let text = decompile(b.words());
    assert!(
        text.contains("Switch(0) [default: Label5, 1: Label6];"),
        "unexpected switch rendering:\n{}",
        text
    );
}

// an instruction without a dedicated parse case keeps its declared
// result ID instead of resolving to a placeholder
#[test]
fn unmodelled_instructions_keep_their_result_id() {
    let mut b = ModuleWords::new(11);
    b.op(OP_CAPABILITY, &[1]);
    b.op_str(OP_ENTRY_POINT, &[MODEL_VERTEX, 3], "main", &[]);
    b.op_str(OP_NAME, &[9], "myout", &[]);
    b.op(OP_TYPE_VOID, &[1]);
    b.op(OP_TYPE_FUNCTION, &[2, 1]);
    b.op(OP_TYPE_FLOAT, &[5, 32]);
    b.op(OP_TYPE_POINTER, &[6, SC_OUTPUT, 5]);
    b.op(OP_VARIABLE, &[6, 9, SC_OUTPUT]);
    b.op(OP_FUNCTION, &[1, 3, 0, 2]);
    b.op(OP_LABEL, &[4]);
    b.op(OP_UNDEF, &[5, 10]);
    b.op(OP_STORE, &[9, 10]);
    b.op(OP_RETURN, &[]);
    b.op(OP_FUNCTION_END, &[]);

    let m = parse_module(b.words()).unwrap();
    let idx = m.by_id(10).expect("undef id resolves");
    assert_eq!(m.instr(idx).opcode, spvdec::spv::Op::Undef);

    let mut m = parse_module(b.words()).unwrap();
    let text = disassemble_module(&mut m);
    assert!(text.contains("myout = Undef();"), "unexpected listing:\n{}", text);
}

// the generic fallback renders every operand of an opaque operation
#[test]
fn opaque_operations_render_their_arguments() {
    let mut b = ModuleWords::new(12);
    b.op(OP_CAPABILITY, &[1]);
    b.op_str(OP_ENTRY_POINT, &[MODEL_VERTEX, 3], "main", &[]);
    b.op_str(OP_NAME, &[9], "myout", &[]);
    b.op(OP_TYPE_VOID, &[1]);
    b.op(OP_TYPE_FUNCTION, &[2, 1]);
    b.op(OP_TYPE_FLOAT, &[5, 32]);
    b.op(OP_TYPE_POINTER, &[6, SC_OUTPUT, 5]);
    b.op(OP_VARIABLE, &[6, 9, SC_OUTPUT]);
    b.op(OP_CONSTANT, &[5, 10, 1.0f32.to_bits()]);
    b.op(OP_CONSTANT, &[5, 11, 2.0f32.to_bits()]);
    b.op(OP_FUNCTION, &[1, 3, 0, 2]);
    b.op(OP_LABEL, &[4]);
    b.op(OP_BRANCH, &[8]);
    b.op(OP_LABEL, &[8]);
    // %7 = Phi float [1.0, %4], [2.0, %8]
    b.op(OP_PHI, &[5, 7, 10, 4, 11, 8]);
    b.op(OP_STORE, &[9, 7]);
    b.op(OP_RETURN, &[]);
    b.op(OP_FUNCTION_END, &[]);

    let text = decompile(b.words());
    assert!(
        text.contains("myout = Phi(1.0, {4}, 2.0, {8});"),
        "operands lost in the fallback:\n{}",
        text
    );
}

// running the optimizer twice leaves the same annotations as running it
// once
#[test]
fn inliner_annotations_are_idempotent() {
    let words = inout_call_module();
    let mut m = parse_module(&words).unwrap();
    let funcs = m.funcs.clone();

    for &f in &funcs {
        let _ = spvdec::decompile::inline::optimise_function(&mut m, f);
    }
    let once: Vec<_> = m
        .ops
        .iter()
        .map(|i| i.op().map(|o| (o.inline_args, o.complexity)))
        .collect();

    for &f in &funcs {
        let _ = spvdec::decompile::inline::optimise_function(&mut m, f);
    }
    let twice: Vec<_> = m
        .ops
        .iter()
        .map(|i| i.op().map(|o| (o.inline_args, o.complexity)))
        .collect();

    assert_eq!(once, twice);
}
