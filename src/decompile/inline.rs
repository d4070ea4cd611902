//! Per-function dataflow optimization: decides which temporaries fold into
//! their single use, merges load-after-store pairs, and elides the
//! temporary pointer variables compilers introduce for call-by-reference
//! parameter passing. Runs after parse and before control-flow
//! reconstruction; the only state it mutates is the `inline_args` /
//! `complexity` annotations and the emit list it returns.

use std::collections::HashSet;

use crate::model::{Module, OpIdx, NO_INLINE_COMPLEXITY};
use crate::spv::Op;

/// The flattened per-function emit list: instructions that still render as
/// statements, plus the local variables that survived elision.
pub struct EmitList {
    pub ops: Vec<OpIdx>,
    pub vars: Vec<OpIdx>,
}

fn erase_item(vec: &mut Vec<OpIdx>, item: OpIdx) -> bool {
    if let Some(pos) = vec.iter().position(|&x| x == item) {
        vec.remove(pos);
        true
    } else {
        false
    }
}

/// Purity: would evaluating `from` at `to`'s program point yield the same
/// value as at its own? Constants and variables are pure; a load is pure
/// unless a store to the same variable sits between the two points in
/// block order; any other operation is pure iff its operands are (a
/// store's destination operand is exempt from the recursion).
pub fn is_unmodified(m: &Module, func_idx: OpIdx, from: OpIdx, to: OpIdx) -> bool {
    let Some(fop) = m.ops[from].op() else {
        return true;
    };

    if m.ops[from].opcode == Op::Load && m.ops[fop.args[0]].var().is_some() {
        let var = fop.args[0];

        let Some(f) = m.ops[func_idx].func() else {
            return true;
        };

        let mut looking = false;
        for &b in &f.blocks {
            let Some(block) = m.ops[b].block() else { continue };
            for &i in &block.insns {
                if i == from {
                    looking = true;
                } else if i == to {
                    return true;
                } else if looking
                    && m.ops[i].opcode == Op::Store
                    && m.ops[i].op().map_or(false, |o| o.args[0] == var)
                {
                    return false;
                }
            }
        }

        return true;
    }

    let opcode = m.ops[from].opcode;
    for (i, &a) in fop.args.iter().enumerate() {
        if opcode == Op::Store && i == 0 {
            continue;
        }
        if !is_unmodified(m, func_idx, a, to) {
            return false;
        }
    }

    true
}

/// Run the optimizer over one function, producing its emit list.
pub fn optimise_function(m: &mut Module, func_idx: OpIdx) -> EmitList {
    let (blocks, mut vars) = {
        let f = m.ops[func_idx].func().expect("optimiser runs on functions");
        (f.blocks.clone(), f.variables.clone())
    };

    let mut funcops: Vec<OpIdx> = Vec::new();

    for (b, &block_idx) in blocks.iter().enumerate() {
        // the first label in a function is implicit in its opening brace
        if b > 0 {
            funcops.push(block_idx);
        }

        let insns = m.ops[block_idx].block().expect("labels carry blocks").insns.clone();
        let mut ignored: HashSet<OpIdx> = HashSet::new();

        for (i, &inst_idx) in insns.iter().enumerate() {
            if !ignored.contains(&inst_idx) {
                funcops.push(inst_idx);
            }

            if m.ops[inst_idx].op().is_none() {
                continue;
            }

            inline_arguments(m, func_idx, inst_idx, &mut funcops);
            elide_single_store_load(m, func_idx, inst_idx, &blocks, &mut funcops, &mut vars);
            merge_adjacent_store(m, inst_idx, &mut funcops);
            elide_call_parameters(
                m,
                func_idx,
                block_idx,
                inst_idx,
                &insns,
                i,
                &mut funcops,
                &mut vars,
                &mut ignored,
            );
        }

        let (merge, exit) = {
            let bd = m.ops[block_idx].block().unwrap();
            (bd.merge_flow, bd.exit_flow)
        };
        if let Some(mf) = merge {
            funcops.push(mf);
        }
        if let Some(ef) = exit {
            // branch conditions are inlined
            if let Some(cond) = m.ops[ef].flow().and_then(|f| f.condition) {
                erase_item(&mut funcops, cond);
            }
            // so are return values
            if m.ops[ef].opcode == Op::ReturnValue {
                let target = m.ops[ef].flow().unwrap().targets[0];
                if let Some(arg) = m.by_id(target) {
                    erase_item(&mut funcops, arg);
                }
            }
            funcops.push(ef);
        }
    }

    EmitList { ops: funcops, vars }
}

/// Fold eligible operands into this operation and update its complexity.
fn inline_arguments(m: &mut Module, func_idx: OpIdx, inst_idx: OpIdx, funcops: &mut Vec<OpIdx>) {
    let opcode = m.ops[inst_idx].opcode;
    let args = m.ops[inst_idx].op().unwrap().args.clone();

    let mut maxcomplex = 0;
    let mut folded_bits = 0u32;

    for (a, &arg) in args.iter().enumerate() {
        // labels referenced as operands (phi parents) are not expressions
        // and must keep their place in the emit list
        if m.ops[arg].block().is_some() {
            continue;
        }

        if let Some(argop) = m.ops[arg].op() {
            // composite constructs take less folding before they turn
            // unreadable
            let limit = if opcode == Op::CompositeConstruct {
                NO_INLINE_COMPLEXITY.min(2)
            } else {
                NO_INLINE_COMPLEXITY
            };

            // wide operations stay as named statements, except the few
            // shapes that read fine with many operands
            let arg_opcode = m.ops[arg].opcode;
            if argop.complexity >= limit
                || (argop.args.len() > 2
                    && arg_opcode != Op::AccessChain
                    && arg_opcode != Op::InBoundsAccessChain
                    && arg_opcode != Op::Select
                    && arg_opcode != Op::CompositeConstruct)
            {
                continue;
            }

            // folding must not move a load across a store it depends on;
            // a store's destination pointer is exempt
            if (opcode != Op::Store || a > 0) && !is_unmodified(m, func_idx, arg, inst_idx) {
                continue;
            }

            maxcomplex = m.ops[arg].op().unwrap().complexity.max(maxcomplex);
        }

        erase_item(funcops, arg);
        folded_bits |= 1 << a;
    }

    let op = m.ops[inst_idx].op_mut().unwrap();
    op.inline_args |= folded_bits;
    op.complexity = maxcomplex;
    if opcode != Op::Store
        && opcode != Op::Load
        && opcode != Op::CompositeExtract
        && op.inline_args != 0
    {
        op.complexity += 1;
    }
}

/// Merge temp variables used for a single store followed by a single load:
/// remove the store, rewrite the load to read the stored value directly,
/// and drop the variable.
fn elide_single_store_load(
    m: &mut Module,
    func_idx: OpIdx,
    inst_idx: OpIdx,
    blocks: &[OpIdx],
    funcops: &mut Vec<OpIdx>,
    vars: &mut Vec<OpIdx>,
) {
    if m.ops[inst_idx].opcode != Op::Load || funcops.len() <= 1 {
        return;
    }

    let var = m.ops[inst_idx].op().unwrap().args[0];
    if m.ops[var].var().is_none() {
        return;
    }

    // exactly one store to this variable so far
    let mut prevstore = None;
    let mut storecount = 0;
    for &o in funcops.iter() {
        if m.ops[o].opcode == Op::Store && m.ops[o].op().map_or(false, |op| op.args[0] == var) {
            prevstore = Some(o);
            storecount += 1;
            if storecount > 1 {
                break;
            }
        }
    }
    let Some(prevstore) = prevstore else { return };
    if storecount != 1 || !is_unmodified(m, func_idx, prevstore, inst_idx) {
        return;
    }

    // variables have function scope; no other load may exist in any block
    for &b in blocks {
        let Some(block) = m.ops[b].block() else { continue };
        for &other in &block.insns {
            if other != inst_idx
                && m.ops[other].opcode == Op::Load
                && m.ops[other].op().map_or(false, |op| op.args[0] == var)
            {
                return;
            }
        }
    }

    let store_complexity = m.ops[prevstore].op().unwrap().complexity;
    erase_item(vars, var);
    erase_item(funcops, prevstore);
    let op = m.ops[inst_idx].op_mut().unwrap();
    op.complexity = op.complexity.max(store_complexity);
    op.args[0] = prevstore;
}

/// A store of a temp ID immediately after the op that produced it can be
/// combined trivially.
fn merge_adjacent_store(m: &mut Module, inst_idx: OpIdx, funcops: &mut Vec<OpIdx>) {
    let opcode = m.ops[inst_idx].opcode;
    if (opcode != Op::Store && opcode != Op::CompositeInsert) || funcops.len() <= 1 {
        return;
    }

    let value = m.ops[inst_idx].op().unwrap().args[1];
    if funcops[funcops.len() - 2] != value {
        return;
    }

    erase_item(funcops, value);
    let value_complexity = m.ops[value].op().map(|o| o.complexity);
    let op = m.ops[inst_idx].op_mut().unwrap();
    if let Some(c) = value_complexity {
        op.complexity = op.complexity.max(c);
    }
    op.inline_args |= 2;
}

/// Does any flow-control condition in this function read the given ID?
fn used_in_flow_condition(m: &Module, func_idx: OpIdx, arg: OpIdx) -> bool {
    let Some(f) = m.ops[func_idx].func() else {
        return false;
    };
    for &b in &f.blocks {
        let Some(block) = m.ops[b].block() else { continue };
        if let Some(exit) = block.exit_flow {
            if m.ops[exit].flow().and_then(|fl| fl.condition) == Some(arg) {
                return true;
            }
        }
    }
    false
}

/// Classify each pointer argument of a call as in / out / inout and
/// collapse the temporary variable each classification implies.
#[allow(clippy::too_many_arguments)]
fn elide_call_parameters(
    m: &mut Module,
    func_idx: OpIdx,
    _block_idx: OpIdx,
    call_idx: OpIdx,
    insns: &[OpIdx],
    call_pos: usize,
    funcops: &mut Vec<OpIdx>,
    vars: &mut Vec<OpIdx>,
    ignored: &mut HashSet<OpIdx>,
) {
    if m.ops[call_idx].opcode != Op::FunctionCall {
        return;
    }

    let nargs = m.ops[call_idx].op().unwrap().args.len();

    for a in 0..nargs {
        let arg = m.ops[call_idx].op().unwrap().args[a];
        if m.ops[arg].var().is_none() {
            continue;
        }

        let mut can_replace = true;
        let mut store_before: Option<OpIdx> = None;
        let mut load_after: Option<(OpIdx, usize)> = None;

        // before the call: the temp may appear only as the destination of
        // a single store
        for j in 0..call_pos {
            let si = insns[j];
            if let Some(sop) = m.ops[si].op() {
                for &aa in &sop.args {
                    if aa == arg {
                        if m.ops[si].opcode == Op::Store && sop.args[0] == arg {
                            if store_before.is_some() {
                                can_replace = false;
                                break;
                            }
                            store_before = Some(si);
                        } else {
                            can_replace = false;
                            break;
                        }
                    }
                }
            }
            if !can_replace {
                break;
            }
        }

        // after the call: only as the pointer of a single load
        if can_replace {
            for j in call_pos + 1..insns.len() {
                let si = insns[j];
                if let Some(sop) = m.ops[si].op() {
                    for &aa in &sop.args {
                        if aa == arg {
                            if m.ops[si].opcode == Op::Load {
                                if load_after.is_some() {
                                    can_replace = false;
                                    break;
                                }
                                load_after = Some((si, j));
                            } else {
                                can_replace = false;
                                break;
                            }
                        }
                    }
                }
                if !can_replace {
                    break;
                }
            }
        }

        if used_in_flow_condition(m, func_idx, arg) {
            can_replace = false;
        }

        if !can_replace {
            continue;
        }

        // in parameter: pass the stored value directly
        if let (Some(sb), None) = (store_before, load_after) {
            erase_item(funcops, sb);
            erase_item(vars, arg);
            let value = m.ops[sb].op().unwrap().args[1];
            m.ops[call_idx].op_mut().unwrap().args[a] = value;
            continue;
        }

        // out or inout parameter
        let Some((la, la_pos)) = load_after else { continue };

        // the post-call load must feed exactly one store
        let mut store_use: Option<OpIdx> = None;
        for j in la_pos + 1..insns.len() {
            let si = insns[j];
            if let Some(sop) = m.ops[si].op() {
                for &aa in &sop.args {
                    if aa == la {
                        if m.ops[si].opcode == Op::Store {
                            if store_use.is_some() {
                                can_replace = false;
                                break;
                            }
                            store_use = Some(si);
                        } else {
                            can_replace = false;
                            break;
                        }
                    }
                }
            }
            if !can_replace {
                break;
            }
        }

        let Some(su) = store_use else { continue };
        if !can_replace {
            continue;
        }

        if let Some(sb) = store_before {
            // inout: the store before the call must itself read the same
            // variable the post-call store writes back to
            let sb_value = m.ops[sb].op().unwrap().args[1];
            let inout_shape = m.ops[sb_value].opcode == Op::Load
                && m.ops[sb_value].op().map_or(false, |o| {
                    o.args[0] == m.ops[su].op().unwrap().args[0]
                });
            if !inout_shape {
                continue;
            }
            erase_item(funcops, sb);
        }

        // the write-back pair hasn't been reached yet; mark it folded
        ignored.insert(su);
        ignored.insert(la);
        erase_item(vars, arg);
        let user_var = m.ops[su].op().unwrap().args[0];
        m.ops[call_idx].op_mut().unwrap().args[a] = user_var;
    }
}
