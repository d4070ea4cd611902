//! Per-instruction rendering. `disassemble(idx, inline)` returns a pure
//! expression when `inline` is set; otherwise it owns a whole statement
//! (`type name = expr`). An operation's `inline_args` bitset decides per
//! argument whether to recurse or emit the argument's ID name.

use crate::model::{Module, OpIdx, OperationData, TypeKind};
use crate::spv::{
    loop_control_str, memory_access_str, optional_flag_str, selection_control_str, Op,
};

use super::types::{default_id_name, id_name, type_name};

pub fn arg_str(m: &Module, op: &OperationData, i: usize) -> String {
    if op.inline_args & (1 << i) != 0 {
        disassemble(m, op.args[i], true)
    } else {
        id_name(m, op.args[i])
    }
}

fn result_type_name(m: &Module, op: &OperationData) -> String {
    op.ty
        .map(|t| type_name(m, t))
        .unwrap_or_else(|| "unknown".to_string())
}

/// The declared type of a value-producing instruction, whatever payload
/// shape it has.
fn value_type(m: &Module, idx: OpIdx) -> Option<OpIdx> {
    let inst = m.instr(idx);
    if let Some(o) = inst.op() {
        return o.ty;
    }
    if let Some(c) = inst.constant() {
        return Some(c.ty);
    }
    if let Some(v) = inst.var() {
        return Some(v.ty);
    }
    None
}

fn binary_op_str(op: Op) -> Option<&'static str> {
    Some(match op {
        Op::IAdd | Op::FAdd => "+",
        Op::ISub | Op::FSub => "-",
        Op::IMul
        | Op::FMul
        | Op::VectorTimesScalar
        | Op::MatrixTimesScalar
        | Op::VectorTimesMatrix
        | Op::MatrixTimesVector
        | Op::MatrixTimesMatrix => "*",
        Op::UDiv | Op::SDiv | Op::FDiv => "/",
        Op::UMod | Op::SMod | Op::SRem | Op::FRem | Op::FMod => "%",
        Op::IEqual | Op::FOrdEqual | Op::FUnordEqual | Op::LogicalEqual => "==",
        Op::INotEqual | Op::FOrdNotEqual | Op::FUnordNotEqual | Op::LogicalNotEqual => "!=",
        Op::ULessThan | Op::SLessThan | Op::FOrdLessThan | Op::FUnordLessThan => "<",
        Op::ULessThanEqual
        | Op::SLessThanEqual
        | Op::FOrdLessThanEqual
        | Op::FUnordLessThanEqual => "<=",
        Op::UGreaterThan | Op::SGreaterThan | Op::FOrdGreaterThan | Op::FUnordGreaterThan => ">",
        Op::UGreaterThanEqual
        | Op::SGreaterThanEqual
        | Op::FOrdGreaterThanEqual
        | Op::FUnordGreaterThanEqual => ">=",
        Op::LogicalAnd => "&&",
        Op::LogicalOr => "||",
        Op::ShiftLeftLogical => "<<",
        Op::ShiftRightLogical | Op::ShiftRightArithmetic => ">>",
        Op::BitwiseOr => "|",
        Op::BitwiseXor => "^",
        Op::BitwiseAnd => "&",
        _ => return None,
    })
}

fn unary_op_str(op: Op) -> Option<&'static str> {
    Some(match op {
        Op::FNegate | Op::SNegate => "-",
        Op::Not => "~",
        Op::LogicalNot => "!",
        _ => return None,
    })
}

fn vector_component(idx: i32) -> String {
    match idx {
        0 => ".x".to_string(),
        1 => ".y".to_string(),
        2 => ".z".to_string(),
        3 => ".w".to_string(),
        _ => format!("._{}", idx),
    }
}

pub fn disassemble(m: &Module, idx: OpIdx, inline: bool) -> String {
    let inst = m.instr(idx);

    match inst.opcode {
        // leaves render by name or literal
        Op::Constant
        | Op::ConstantComposite
        | Op::ConstantTrue
        | Op::ConstantFalse
        | Op::ConstantNull
        | Op::Variable
        | Op::FunctionParameter => id_name(m, idx),

        Op::Label => {
            debug_assert!(!inline);
            format!("Label{}:", inst.id)
        }
        Op::Return => {
            debug_assert!(!inline);
            "Return".to_string()
        }
        Op::ReturnValue => {
            debug_assert!(!inline);
            let f = inst.flow().expect("return value carries flow data");
            let arg = m
                .by_id(f.targets[0])
                .map(|a| disassemble(m, a, true))
                .unwrap_or_else(|| default_id_name(f.targets[0]));
            format!("Return {}", arg)
        }
        Op::Branch => {
            debug_assert!(!inline);
            format!(
                "goto Label{}",
                inst.flow().expect("branch carries flow data").targets[0]
            )
        }
        Op::BranchConditional => {
            debug_assert!(!inline);
            // targets are consumed by the control-flow rebuilder; only the
            // condition is rendered here
            let f = inst.flow().expect("conditional branch carries flow data");
            let cond = f
                .condition
                .map(|c| disassemble(m, c, true))
                .unwrap_or_default();

            if f.literals.len() < 2 {
                return cond;
            }

            let weight_a = f.literals[0] as f32;
            let weight_b = f.literals[1] as f32;
            let a = weight_a * 100.0 / (weight_a + weight_b);
            let b = weight_b * 100.0 / (weight_a + weight_b);
            format!("{} [true: {:.2}%, false: {:.2}%]", cond, a, b)
        }
        Op::SelectionMerge => {
            debug_assert!(!inline);
            let f = inst.flow().expect("merge carries flow data");
            format!(
                "SelectionMerge Label{}{}",
                f.targets[0],
                optional_flag_str(&selection_control_str(f.control))
            )
        }
        Op::LoopMerge => {
            debug_assert!(!inline);
            let f = inst.flow().expect("merge carries flow data");
            format!(
                "LoopMerge Label{}{}",
                f.targets[0],
                optional_flag_str(&loop_control_str(f.control))
            )
        }
        Op::Switch => {
            debug_assert!(!inline);
            // switches are not restructured; render the whole case table
            // so every target stays visible
            let f = inst.flow().expect("switch carries flow data");
            let cond = f
                .condition
                .map(|c| disassemble(m, c, true))
                .unwrap_or_default();
            let mut ret = format!("Switch({}) [default: Label{}", cond, f.targets[0]);
            for (i, &t) in f.targets.iter().skip(1).enumerate() {
                let case = f.literals.get(i).copied().unwrap_or(0);
                ret += &format!(", {}: Label{}", case, t);
            }
            ret + "]"
        }

        Op::Store => {
            let op = inst.op().expect("store carries operands");
            let dest = arg_str(m, op, 0);
            let src = arg_str(m, op, 1);

            // inlined only in function parameters; just the stored value
            if inline {
                return src;
            }

            // a folded composite insert supplies its own ` = ` and chain
            let assign = if m.instr(op.args[1]).opcode == Op::CompositeInsert
                && (op.inline_args & 2) != 0
            {
                ""
            } else {
                " = "
            };

            format!(
                "{}{}{}{}",
                dest,
                optional_flag_str(&memory_access_str(op.access)),
                assign,
                src
            )
        }
        Op::CopyMemory => {
            debug_assert!(!inline);
            let op = inst.op().expect("copy carries operands");
            let flags = optional_flag_str(&memory_access_str(op.access));
            format!(
                "{}{} = {}{}",
                arg_str(m, op, 0),
                flags,
                arg_str(m, op, 1),
                flags
            )
        }
        Op::Load => {
            let op = inst.op().expect("load carries operands");
            let arg = arg_str(m, op, 0);
            let flags = optional_flag_str(&memory_access_str(op.access));

            if inline {
                return format!("{}{}", arg, flags);
            }

            format!(
                "{} {} = {}{}",
                result_type_name(m, op),
                id_name(m, idx),
                arg,
                flags
            )
        }

        Op::CompositeConstruct => {
            let op = inst.op().expect("construct carries operands");
            let mut ret = String::new();
            if !inline {
                ret = format!("{} {} = ", result_type_name(m, op), id_name(m, idx));
            }
            ret += &result_type_name(m, op);
            ret.push('(');
            for i in 0..op.args.len() {
                ret += &arg_str(m, op, i);
                if i + 1 < op.args.len() {
                    ret += ", ";
                }
            }
            ret.push(')');
            ret
        }

        Op::CompositeExtract | Op::CompositeInsert | Op::AccessChain | Op::InBoundsAccessChain => {
            access_chain(m, idx, inline)
        }

        Op::ExtInst => {
            let op = inst.op().expect("ext inst carries operands");
            let mut ret = String::new();
            if !inline {
                ret = format!("{} {} = ", result_type_name(m, op), id_name(m, idx));
            }

            let set = m.instr(op.args[0]);
            let num = op.literals.first().copied().unwrap_or(0) as usize;
            match set.ext() {
                Some(e) => {
                    ret += &e.setname;
                    ret += "::";
                    match e.names.get(num) {
                        Some(n) => ret += n,
                        None => ret += &format!("Inst{}", num),
                    }
                }
                None => ret += &format!("{}::Inst{}", default_id_name(set.id), num),
            }

            ret.push('(');
            for i in 1..op.args.len() {
                ret += &arg_str(m, op, i);
                if i + 1 < op.args.len() {
                    ret += ", ";
                }
            }
            ret.push(')');
            ret
        }

        // texture samples are almost identical to function calls, and
        // conversions can be treated the same way
        Op::ImageSampleImplicitLod
        | Op::ImageSampleExplicitLod
        | Op::ConvertFToS
        | Op::ConvertFToU
        | Op::ConvertUToF
        | Op::ConvertSToF
        | Op::Bitcast
        | Op::FunctionCall => {
            let op = inst.op().expect("call carries operands");
            let mut ret = String::new();

            let returns_void = op.ty.map_or(false, |t| {
                m.instr(t).ty().map_or(false, |td| td.kind == TypeKind::Void)
            });
            if !inline && !returns_void {
                ret = format!("{} {} = ", result_type_name(m, op), id_name(m, idx));
            }

            if inst.opcode == Op::FunctionCall {
                let head = m
                    .by_id(op.func_call)
                    .map(|f| id_name(m, f))
                    .unwrap_or_else(|| default_id_name(op.func_call));
                ret += &head;
            } else if inst.opcode == Op::Bitcast {
                ret += &format!("Bitcast<{}>", result_type_name(m, op));
            } else {
                ret += &inst.opcode.name();
            }

            ret.push('(');
            for i in 0..op.args.len() {
                ret += &arg_str(m, op, i);
                if i + 1 < op.args.len() {
                    ret += ", ";
                }
            }
            ret.push(')');
            ret
        }

        Op::VectorShuffle => {
            let op = inst.op().expect("shuffle carries operands");
            let mut ret = String::new();
            if !inline {
                ret = format!("{} {} = ", result_type_name(m, op), id_name(m, idx));
            }

            let vec1_size = value_type(m, op.args[0])
                .and_then(|t| m.instr(t).ty().map(|td| td.vector_size))
                .unwrap_or(4);

            // fold each selector into (source vector, component); an
            // all-ones selector is an undefined component
            let mut folded: Vec<(i32, u32)> = Vec::with_capacity(op.literals.len());
            let mut sane = true;
            for &s in &op.literals {
                if s == 0xffff_ffff {
                    folded.push((0, 4));
                } else if s >= vec1_size {
                    let c = s - vec1_size;
                    folded.push((1, c));
                    sane &= c < 4;
                } else {
                    folded.push((0, s));
                    sane &= s < 4;
                }
            }

            ret += &result_type_name(m, op);
            ret.push('(');

            let swizzle = ['x', 'y', 'z', 'w', '_'];
            let mut lastvec = -1;
            for (i, &(vec, comp)) in folded.iter().enumerate() {
                if vec != lastvec {
                    lastvec = vec;
                    if i > 0 {
                        ret += ", ";
                    }
                    ret += &arg_str(m, op, vec as usize);
                    ret.push('.');
                }
                if sane || comp == 4 {
                    ret.push(swizzle[comp.min(4) as usize]);
                } else {
                    // components beyond .w have no swizzle letter
                    ret += &format!("_{}", comp);
                }
            }

            ret.push(')');
            ret
        }

        Op::Dot => {
            let op = inst.op().expect("dot carries operands");
            let a = arg_str(m, op, 0);
            let b = arg_str(m, op, 1);

            if inline {
                return format!("{}({}, {})", inst.opcode.name(), a, b);
            }

            format!(
                "{} {} = {}({}, {})",
                result_type_name(m, op),
                id_name(m, idx),
                inst.opcode.name(),
                a,
                b
            )
        }

        Op::Select => {
            let op = inst.op().expect("select carries operands");
            let a = arg_str(m, op, 0);
            let b = arg_str(m, op, 1);
            let c = arg_str(m, op, 2);

            if inline {
                return format!("({}) ? ({}) : ({})", a, b, c);
            }

            format!(
                "{} {} = ({}) ? ({}) : ({})",
                result_type_name(m, op),
                id_name(m, idx),
                a,
                b,
                c
            )
        }

        _ if unary_op_str(inst.opcode).is_some() => {
            let op = inst.op().expect("unary math carries operands");
            let opstr = unary_op_str(inst.opcode).unwrap();

            let mut a = arg_str(m, op, 0);
            if m.instr(op.args[0]).op().map_or(false, |o| o.mathop) {
                a = format!("({})", a);
            }

            if inline {
                return format!("{}{}", opstr, a);
            }

            format!(
                "{} {} = {}{}",
                result_type_name(m, op),
                id_name(m, idx),
                opstr,
                a
            )
        }

        _ if binary_op_str(inst.opcode).is_some() => {
            let op = inst.op().expect("binary math carries operands");
            let opstr = binary_op_str(inst.opcode).unwrap();

            let mut a = arg_str(m, op, 0);
            let mut b = arg_str(m, op, 1);

            // bracket nested mathops so order of operations stays clear
            if m.instr(op.args[0]).op().map_or(false, |o| o.mathop) {
                a = format!("({})", a);
            }
            if m.instr(op.args[1]).op().map_or(false, |o| o.mathop) {
                b = format!("({})", b);
            }

            if inline {
                return format!("{} {} {}", a, opstr, b);
            }

            format!(
                "{} {} = {} {} {}",
                result_type_name(m, op),
                id_name(m, idx),
                a,
                opstr,
                b
            )
        }

        Op::Unknown => {
            // this ID came from nowhere we recognise; render the dummy
            format!("UnknownOp({})", id_name(m, idx))
        }

        // fallback for operations without a dedicated rendering
        _ => {
            let mut ret = inst.opcode.name();
            ret.push('(');
            if let Some(op) = inst.op() {
                for (i, &a) in op.args.iter().enumerate() {
                    ret += &id_name(m, a);
                    if i + 1 < op.args.len() {
                        ret += ", ";
                    }
                }
            }
            ret.push(')');
            ret
        }
    }
}

/// Access-chain / composite-extract / composite-insert walker: follow the
/// index list against the nested type, producing `.member`, `[index]` and
/// swizzle steps.
fn access_chain(m: &Module, idx: OpIdx, inline: bool) -> String {
    let inst = m.instr(idx);
    let op = inst.op().expect("access chain carries operands");

    let composite = arg_str(m, op, 0);

    let arg0 = m.instr(op.args[0]);
    let base_ty = if let Some(v) = arg0.var() {
        Some(v.ty)
    } else {
        arg0.op().and_then(|o| o.ty)
    };

    // unknown base; we can't walk its type
    let Some(base_ty) = base_ty else {
        let mut ret = String::new();
        if !inline {
            ret = format!("{} {} = ", result_type_name(m, op), id_name(m, idx));
        }
        ret += &composite;
        ret += "....";
        return ret;
    };

    let mut ty = Some(base_ty);
    if let Some(td) = m.instr(base_ty).ty() {
        if td.kind == TypeKind::Pointer {
            ty = td.base;
        }
    }

    let is_chain = matches!(inst.opcode, Op::AccessChain | Op::InBoundsAccessChain);
    let start = if is_chain { 1 } else { 0 };
    let count = if is_chain { op.args.len() } else { op.literals.len() };

    let mut access = String::new();
    let mut i = start;
    while i < count {
        let (constant, index) = if !is_chain {
            (true, op.literals[i] as i32)
        } else if let Some(c) = m.instr(op.args[i]).constant() {
            debug_assert!(m.instr(c.ty).ty().map_or(false, |t| t.kind.is_basic_int()));
            (true, c.as_i32())
        } else {
            (false, -1)
        };

        let Some(tidx) = ty else { break };
        let Some(td) = m.instr(tidx).ty() else { break };

        match td.kind {
            TypeKind::Struct => {
                // a structure can't be indexed dynamically
                debug_assert!(constant);
                match td.members.get(index.max(0) as usize) {
                    Some((mt, name)) if !name.is_empty() => {
                        access += &format!(".{}", name);
                        ty = Some(*mt);
                    }
                    Some((mt, _)) => {
                        access += &format!("._member{}", index);
                        ty = Some(*mt);
                    }
                    None => {
                        access += &format!("._member{}", index);
                        ty = None;
                    }
                }
            }
            TypeKind::Array => {
                if constant {
                    access += &format!("[{}]", index);
                } else {
                    access += &format!("[{}]", arg_str(m, op, i));
                }
                ty = td.base;
            }
            TypeKind::Matrix => {
                if constant {
                    access += &format!("[{}]", index);
                } else {
                    access += &format!("[{}]", arg_str(m, op, i));
                }

                // one more index drills into the row vector
                if i == count - 1 {
                    break;
                }
                i += 1;

                let comp = if !is_chain {
                    op.literals[i] as i32
                } else {
                    // a dynamic vector index would be a shuffle instead
                    m.instr(op.args[i]).constant().map_or(-1, |c| c.as_i32())
                };
                access += &vector_component(comp);

                debug_assert!(i == count - 1, "scalar granularity reached early");
                ty = None;
            }
            _ => {
                // vector: down to scalar granularity, must be the last index
                if constant {
                    access += &vector_component(index);
                } else {
                    access += &format!("[{}]", arg_str(m, op, i));
                }
                debug_assert!(i == count - 1, "scalar granularity reached early");
                ty = None;
            }
        }

        i += 1;
    }

    if inst.opcode == Op::CompositeInsert {
        let insert_obj = arg_str(m, op, 1);

        // when inlined there is a store of this insert's result back to
        // the same composite; the access and assignment stand alone
        if inline {
            format!("{} = {}", access, insert_obj)
        } else {
            let name = id_name(m, idx);
            format!(
                "{} {} = {}; {}{} = {}",
                result_type_name(m, op),
                name,
                composite,
                name,
                access,
                insert_obj
            )
        }
    } else {
        let mut ret = String::new();
        if !inline {
            ret = format!("{} {} = ", result_type_name(m, op), id_name(m, idx));
        }
        ret + &composite + &access
    }
}
