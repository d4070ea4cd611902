//! Structured source emission: converts the flattened emit list of a
//! function back into nested `if`/`else`/`while`/`continue`/`break` using
//! the merge-block annotations, declares variables at first use, and
//! writes the function body text.

use crate::model::{Module, OpIdx};
use crate::spv::{function_control_str, optional_flag_str, Op};

use super::expr::{arg_str, disassemble};
use super::inline::EmitList;
use super::types::{declare_variable, id_name, type_name};

const TAB: usize = 2;

/// Collapse `Branch L; Label L` pairs where nothing else targets `L`; a
/// label that is referenced elsewhere keeps its line but loses the
/// redundant branch.
fn sweep_redundant_labels(m: &Module, ops: &mut Vec<OpIdx>) {
    let mut l = 0;
    while l + 1 < ops.len() {
        let is_pair = m.ops[ops[l]].opcode == Op::Branch
            && m.ops[ops[l + 1]].opcode == Op::Label
            && m.ops[ops[l]]
                .flow()
                .map_or(false, |f| f.targets[0] == m.ops[ops[l + 1]].id);

        if is_pair {
            let label = m.ops[ops[l + 1]].id;

            let mut refd = false;
            for (b, &other) in ops.iter().enumerate() {
                if b == l {
                    continue;
                }
                if let Some(f) = m.ops[other].flow() {
                    if f.targets.contains(&label) {
                        refd = true;
                        break;
                    }
                }
            }

            if !refd {
                ops.remove(l);
                ops.remove(l);
            } else {
                ops.remove(l);
            }
            continue;
        }

        l += 1;
    }
}

fn func_display_name(m: &Module, func_idx: OpIdx) -> String {
    let inst = m.instr(func_idx);
    if inst.name.is_empty() {
        format!("func{}", inst.id)
    } else {
        inst.name.clone()
    }
}

/// Emit one function: signature, first-use declarations, structured body.
/// Appends to `out`; `emit` is consumed in place (the redundant-label
/// sweep edits its op list).
pub fn emit_function(m: &mut Module, func_idx: OpIdx, emit: &mut EmitList, out: &mut String) {
    let (ret_type, func_type, params, control) = {
        let f = m.ops[func_idx].func().expect("emission runs on functions");
        (f.ret_type, f.func_type, f.params.clone(), f.control)
    };

    let fname = func_display_name(m, func_idx);

    let ftype_members = m.ops[func_type]
        .ty()
        .map(|t| t.members.clone())
        .unwrap_or_default();
    let mut args = String::new();
    for (a, (arg_ty, _)) in ftype_members.iter().enumerate() {
        let pname = params.get(a).map(|&p| m.ops[p].name.clone()).unwrap_or_default();
        if pname.is_empty() {
            args += &type_name(m, *arg_ty);
        } else {
            args += &format!("{} {}", type_name(m, *arg_ty), pname);
        }
        if a + 1 < ftype_members.len() {
            args += ", ";
        }
    }

    out.push_str(&format!(
        "{} {}({}){} {{\n",
        type_name(m, ret_type),
        fname,
        args,
        optional_flag_str(&function_control_str(control))
    ));

    sweep_redundant_labels(m, &mut emit.ops);

    let ops = emit.ops.clone();
    let mut declared = vec![false; emit.vars.len()];

    let mut selectionstack: Vec<u32> = Vec::new();
    let mut elsestack: Vec<u32> = Vec::new();
    let mut loopheadstack: Vec<u32> = Vec::new();
    let mut loopstartstack: Vec<u32> = Vec::new();
    let mut loopmergestack: Vec<u32> = Vec::new();

    let mut indent = TAB;
    let mut body = String::new();

    let mut o = 0usize;
    while o < ops.len() {
        let idx = ops[o];
        m.ops[idx].line = o as i32;
        let opcode = m.ops[idx].opcode;

        match opcode {
            Op::Label => {
                let id = m.ops[idx].id;

                if elsestack.last() == Some(&id) {
                    body += &" ".repeat(indent - TAB);
                    body += "} else {\n";
                    elsestack.pop();
                } else if selectionstack.last() == Some(&id) {
                    indent -= TAB;
                    body += &" ".repeat(indent);
                    body += "}\n";
                    selectionstack.pop();
                } else if loopmergestack.last() == Some(&id) {
                    indent -= TAB;
                    body += &" ".repeat(indent);
                    body += "}\n";
                    loopmergestack.pop();
                    loopstartstack.pop();
                    loopheadstack.pop();
                } else if loopstartstack.last() == Some(&id) {
                    // the label at the start of the loop body is implicit
                    // in the braces
                } else if m.ops[idx]
                    .block()
                    .and_then(|b| b.merge_flow)
                    .map_or(false, |mf| m.ops[mf].opcode == Op::LoopMerge)
                {
                    // loop header: the conditional exit becomes the while
                    let (merge_flow, exit_flow) = {
                        let b = m.ops[idx].block().unwrap();
                        (b.merge_flow.unwrap(), b.exit_flow)
                    };
                    let cond = exit_flow
                        .and_then(|e| m.ops[e].flow().and_then(|f| f.condition))
                        .map(|c| disassemble(m, c, true))
                        .unwrap_or_default();

                    body += &" ".repeat(indent);
                    body += &format!("while ({}) {{\n", cond);

                    let merge_target = m.ops[merge_flow].flow().unwrap().targets[0];
                    let exit_targets = exit_flow
                        .and_then(|e| m.ops[e].flow().map(|f| f.targets.clone()))
                        .unwrap_or_default();

                    loopheadstack.push(id);
                    loopstartstack.push(exit_targets.first().copied().unwrap_or(0));
                    loopmergestack.push(merge_target);

                    // false from the condition must jump straight to the
                    // merge block
                    debug_assert!(
                        exit_targets.len() < 2 || exit_targets[1] == merge_target,
                        "loop exit's false edge must reach the merge block"
                    );

                    indent += TAB;
                } else {
                    body += &(disassemble(m, idx, false) + "\n");
                }
            }

            Op::Branch => {
                let target = m.ops[idx].flow().expect("branch carries flow data").targets[0];

                if selectionstack.last() == Some(&target) {
                    // the goto to the merge block before the false path's
                    // label is implied by the closing brace
                } else if loopheadstack.last() == Some(&target) {
                    let implicit_backedge = o + 1 < ops.len()
                        && m.ops[ops[o + 1]].opcode == Op::Label
                        && loopmergestack.last() == Some(&m.ops[ops[o + 1]].id);
                    if !implicit_backedge {
                        body += &" ".repeat(indent);
                        body += "continue;\n";
                    }
                } else if loopmergestack.last() == Some(&target) {
                    // leaving the loop without the branch conditional
                    body += &" ".repeat(indent);
                    body += "break;\n";
                } else {
                    body += &" ".repeat(indent);
                    body += &(disassemble(m, idx, false) + ";\n");
                }
            }

            Op::LoopMerge => {
                // handled when the header block's label started the while;
                // skip the branch conditional too
                o += 1;
            }

            Op::SelectionMerge => {
                let merge_target = m.ops[idx].flow().expect("merge carries flow data").targets[0];

                if o + 1 < ops.len() && m.ops[ops[o + 1]].opcode == Op::BranchConditional {
                    selectionstack.push(merge_target);
                    o += 1;
                    let bc = ops[o];
                    m.ops[bc].line = o as i32;

                    body += &" ".repeat(indent);
                    body += &format!("if ({}) {{\n", disassemble(m, bc, false));
                    indent += TAB;

                    let targets = m.ops[bc].flow().unwrap().targets.clone();
                    // a false target that isn't the merge block is an else
                    if targets[1] != merge_target {
                        elsestack.push(targets[1]);
                    }

                    // the true target's label follows and becomes the brace
                    debug_assert!(
                        o + 1 < ops.len()
                            && m.ops[ops[o + 1]].opcode == Op::Label
                            && m.ops[ops[o + 1]].id == targets[0],
                        "selection's true target must open the next block"
                    );
                    o += 1;
                } else {
                    // a selection over a switch or other shape we don't
                    // restructure; keep the literal line
                    body += &" ".repeat(indent);
                    body += &(disassemble(m, idx, false) + ";\n");
                }
            }

            Op::CompositeInsert
                if o + 1 < ops.len() && m.ops[ops[o + 1]].opcode == Op::Store =>
            {
                // try to merge the load-hit-store construct:
                //   {id} = CompositeInsert <somevar> <value> indices...
                //   Store <somevar>, {id}
                let ci = idx;
                let store = ops[o + 1];

                let load_id = {
                    let ci_comp = m.ops[ci].op().unwrap().args[0];
                    if m.ops[ci_comp].opcode == Op::Load {
                        let ptr = m.ops[ci_comp].op().unwrap().args[0];
                        Some(m.ops[ptr].id)
                    } else {
                        None
                    }
                };
                let store_dst = m.ops[store].op().unwrap().args[0];

                if load_id == Some(m.ops[store_dst].id) {
                    o += 1;
                    m.ops[store].line = o as i32;

                    let mut printed = false;

                    // declare the stored-to variable at first use
                    if let Some(v) = emit.vars.iter().position(|&v| v == store_dst) {
                        if !declared[v] {
                            let var_ty = m.ops[store_dst].var().unwrap().ty;
                            let decorations = m.ops[store_dst].decorations.clone();
                            let decl =
                                declare_variable(m, var_ty, &decorations, &id_name(m, store_dst));
                            if indent > TAB {
                                // the variable might be used after this
                                // scope; hoist the bare declaration
                                out.push_str(&" ".repeat(TAB));
                                out.push_str(&(decl + ";\n"));
                            } else {
                                body += &" ".repeat(indent);
                                body += &decl;
                                printed = true;
                            }
                            declared[v] = true;
                        }
                    }

                    if !printed {
                        let storearg = {
                            let sop = m.ops[store].op().unwrap();
                            arg_str(m, sop, 0)
                        };
                        body += &" ".repeat(indent);
                        body += &storearg;
                    }
                    // the inlined composite insert includes its own ` = `
                    body += &disassemble(m, ci, true);
                    body += ";\n";
                } else {
                    // no shared base; print the two statements separately
                    body += &" ".repeat(indent);
                    body += &(disassemble(m, ci, false) + ";\n");

                    o += 1;
                    m.ops[store].line = o as i32;
                    emit_store(m, store, emit, &mut declared, indent, out, &mut body);
                }
            }

            Op::Return if o == ops.len() - 1 => {
                // the trailing return of a function is implicit
                break;
            }

            Op::Store => {
                emit_store(m, idx, emit, &mut declared, indent, out, &mut body);
            }

            _ => {
                body += &" ".repeat(indent);
                body += &(disassemble(m, idx, false) + ";\n");
            }
        }

        o += 1;
    }

    debug_assert!(
        selectionstack.is_empty() && elsestack.is_empty() && loopmergestack.is_empty(),
        "control-flow stacks must be balanced after emission"
    );

    out.push_str(&body);
    out.push_str(&format!("}} // {}\n\n", fname));
}

/// Emit a store statement, declaring its destination variable in place if
/// this is the first store into it.
fn emit_store(
    m: &Module,
    store: OpIdx,
    emit: &EmitList,
    declared: &mut [bool],
    indent: usize,
    out: &mut String,
    body: &mut String,
) {
    let store_dst = m.ops[store].op().unwrap().args[0];

    let mut printed = false;

    if let Some(v) = emit.vars.iter().position(|&v| v == store_dst) {
        if !declared[v] {
            let var_ty = m.ops[store_dst].var().unwrap().ty;
            let decl = declare_variable(
                m,
                var_ty,
                &m.ops[store_dst].decorations,
                &id_name(m, store_dst),
            );
            if indent > TAB {
                // conservative: the variable might be used after this
                // scope, so the bare declaration moves out of it
                out.push_str(&" ".repeat(TAB));
                out.push_str(&(decl + ";\n"));
            } else {
                body.push_str(&" ".repeat(indent));
                body.push_str(&decl);
                body.push_str(" = ");
                body.push_str(&(disassemble(m, store, true) + ";\n"));
                printed = true;
            }
            declared[v] = true;
        }
    }

    if !printed {
        body.push_str(&" ".repeat(indent));
        body.push_str(&(disassemble(m, store, false) + ";\n"));
    }
}
