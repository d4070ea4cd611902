//! Reflection extraction over hand-assembled modules.

mod common;

use common::*;

use spvdec::reflect::{reflect_module, SystemValue};
use spvdec::parse_module;

#[test]
fn blocks_sort_by_set_and_binding_with_missing_binds_last() {
    let mut b = ModuleWords::new(12);
    b.op(OP_CAPABILITY, &[1]);
    b.op_str(OP_ENTRY_POINT, &[MODEL_VERTEX, 3], "main", &[]);
    b.op_str(OP_NAME, &[8], "u1", &[]);
    b.op_str(OP_NAME, &[9], "u2", &[]);
    b.op_str(OP_NAME, &[10], "u3", &[]);
    b.op_str(OP_MEMBER_NAME, &[6, 0], "x", &[]);
    b.op(OP_DECORATE, &[8, DEC_DESCRIPTOR_SET, 0]);
    b.op(OP_DECORATE, &[8, DEC_BINDING, 3]);
    b.op(OP_DECORATE, &[10, DEC_BINDING, 1]);
    b.op(OP_TYPE_VOID, &[1]);
    b.op(OP_TYPE_FUNCTION, &[2, 1]);
    b.op(OP_TYPE_FLOAT, &[5, 32]);
    b.op(OP_TYPE_STRUCT, &[6, 5]);
    b.op(OP_TYPE_POINTER, &[7, SC_UNIFORM, 6]);
    b.op(OP_VARIABLE, &[7, 8, SC_UNIFORM]);
    b.op(OP_VARIABLE, &[7, 9, SC_UNIFORM]);
    b.op(OP_VARIABLE, &[7, 10, SC_UNIFORM]);
    b.op(OP_FUNCTION, &[1, 3, 0, 2]);
    b.op(OP_LABEL, &[4]);
    // reference u1 so its used bit is set
    b.op(OP_LOAD, &[6, 11, 8]);
    b.op(OP_RETURN, &[]);
    b.op(OP_FUNCTION_END, &[]);

    let m = parse_module(b.words()).unwrap();
    let r = reflect_module(&m);

    let names: Vec<&str> = r.constant_blocks.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["u3", "u1", "u2"]);

    let binds: Vec<i32> = r.constant_blocks.iter().map(|c| c.bind.bind).collect();
    // u2 had no binding: sorted last, then rewritten from -1 to 0
    assert_eq!(binds, [1, 3, 0]);

    let points: Vec<i32> = r
        .constant_blocks
        .iter()
        .map(|c| c.bind.bind_point)
        .collect();
    assert_eq!(points, [0, 1, 2]);

    assert!(r.constant_blocks[1].bind.used, "u1 is referenced");
    assert!(!r.constant_blocks[0].bind.used);
    assert!(!r.constant_blocks[2].bind.used);

    // the member walk picked up the single float member
    assert_eq!(r.constant_blocks[0].variables.len(), 1);
    assert_eq!(r.constant_blocks[0].variables[0].name, "x");
    assert_eq!(r.constant_blocks[0].variables[0].rows, 1);
    assert_eq!(r.constant_blocks[0].variables[0].cols, 1);
}

#[test]
fn signatures_expand_matrices_and_sort_system_values_first() {
    let mut b = ModuleWords::new(15);
    b.op(OP_CAPABILITY, &[1]);
    b.op_str(OP_ENTRY_POINT, &[MODEL_VERTEX, 3], "main", &[]);
    b.op_str(OP_NAME, &[11], "a", &[]);
    b.op_str(OP_NAME, &[12], "im", &[]);
    b.op_str(OP_NAME, &[13], "pos", &[]);
    b.op_str(OP_NAME, &[14], "col", &[]);
    b.op(OP_DECORATE, &[11, DEC_LOCATION, 2]);
    b.op(OP_DECORATE, &[12, DEC_LOCATION, 4]);
    b.op(OP_DECORATE, &[13, DEC_BUILTIN, BUILTIN_POSITION]);
    b.op(OP_DECORATE, &[14, DEC_LOCATION, 0]);
    b.op(OP_TYPE_VOID, &[1]);
    b.op(OP_TYPE_FUNCTION, &[2, 1]);
    b.op(OP_TYPE_FLOAT, &[5, 32]);
    b.op(OP_TYPE_VECTOR, &[6, 5, 4]);
    b.op(OP_TYPE_MATRIX, &[7, 6, 4]);
    b.op(OP_TYPE_POINTER, &[8, SC_INPUT, 6]);
    b.op(OP_TYPE_POINTER, &[9, SC_INPUT, 7]);
    b.op(OP_TYPE_POINTER, &[10, SC_OUTPUT, 6]);
    b.op(OP_VARIABLE, &[8, 11, SC_INPUT]);
    b.op(OP_VARIABLE, &[9, 12, SC_INPUT]);
    b.op(OP_VARIABLE, &[10, 13, SC_OUTPUT]);
    b.op(OP_VARIABLE, &[10, 14, SC_OUTPUT]);
    b.op(OP_FUNCTION, &[1, 3, 0, 2]);
    b.op(OP_LABEL, &[4]);
    b.op(OP_RETURN, &[]);
    b.op(OP_FUNCTION_END, &[]);

    let m = parse_module(b.words()).unwrap();
    let r = reflect_module(&m);

    // the matrix expands into one row entry per register
    let input_names: Vec<&str> = r.inputs.iter().map(|s| s.var_name.as_str()).collect();
    assert_eq!(
        input_names,
        ["a", "im:row0", "im:row1", "im:row2", "im:row3"]
    );
    let regs: Vec<u32> = r.inputs.iter().map(|s| s.reg_index).collect();
    assert_eq!(regs, [2, 4, 5, 6, 7]);

    // non-system inputs land in the location-indexed attribute table
    assert_eq!(r.input_attributes[2], 0);
    assert_eq!(r.input_attributes[4], 1);
    assert_eq!(r.input_attributes[7], 4);
    assert_eq!(r.input_attributes[0], -1);

    // the builtin output sorts ahead of the user output
    assert_eq!(r.outputs[0].system_value, SystemValue::Position);
    assert_eq!(r.outputs[0].var_name, "pos");
    assert_eq!(r.outputs[1].system_value, SystemValue::None);
    assert_eq!(r.outputs[1].var_name, "col");
    assert_eq!(r.outputs[1].comp_count, 4);
}
