//! Text pipeline: module banner, struct and global declarations, then
//! per-function inlining and structured emission.

pub mod expr;
pub mod inline;
pub mod structurize;
pub mod types;

use crate::model::{Module, TypeKind};
use crate::spv::ExecutionMode;

use types::{declare_variable, type_name};

/// Produce the full pseudo-C disassembly of a module.
///
/// Runs the inliner over each function first; the inliner's annotations
/// are only valid for the emission that follows them, so the pipeline is
/// strictly sequenced per function.
pub fn disassemble_module(m: &mut Module) -> String {
    let mut out = String::from("SPIR-V:\n\n");

    out += &format!(
        "Version {:08x}, Generator {:08x} ({})\n",
        m.version,
        m.generator,
        Module::generator_name(m.generator)
    );
    out += &format!("IDs up to {{{}}}\n", m.id_bound());
    out += "\n";

    out += &format!("Source is {} {}\n", m.source_lang.name(), m.source_ver);
    for &s in &m.source_exts {
        out += &format!(" + {}\n", m.ops[s].name);
    }
    out += "\n";

    out += "Capabilities:";
    for &c in &m.capabilities {
        out += &format!(" {}", c.name());
    }
    out += "\n";

    for &e in &m.entries {
        let Some(entry) = m.ops[e].entry() else { continue };
        let func_name = m
            .by_id(entry.func)
            .map(|f| m.ops[f].name.clone())
            .unwrap_or_default();
        out += &format!("Entry point '{}' ({})\n", func_name, entry.model.name());

        for mode in &entry.modes {
            out += &format!("            {}", mode.mode.name());
            match mode.mode {
                ExecutionMode::Invocations | ExecutionMode::OutputVertices => {
                    out += &format!(" = {}", mode.x);
                }
                ExecutionMode::LocalSize | ExecutionMode::LocalSizeHint => {
                    out += &format!(" = <{}, {}, {}>", mode.x, mode.y, mode.z);
                }
                ExecutionMode::VecTypeHint => {
                    // one operand word: scalar type code in the low half,
                    // component count in the high half
                    let data_type = mode.x & 0xffff;
                    let num_comps = (mode.x >> 16) & 0xffff;
                    let scalar = match data_type {
                        0 => "byte",
                        1 => "short",
                        2 => "int",
                        3 => "long",
                        4 => "half",
                        5 => "float",
                        6 => "double",
                        _ => "invalid",
                    };
                    out += &format!(" = {}{}", scalar, num_comps);
                }
                _ => {}
            }
            out += "\n";
        }
    }

    out += "\n";

    for &s in &m.structs {
        let name = type_name(m, s);
        out += &format!("struct {} {{\n", name);
        let members = m.ops[s].ty().map(|t| t.members.clone()).unwrap_or_default();
        for (c, (member_ty, member_name)) in members.iter().enumerate() {
            let var_name = if member_name.is_empty() {
                format!("member{}", c)
            } else {
                member_name.clone()
            };
            let decorations = m.ops[s]
                .ty()
                .and_then(|t| t.member_decorations.get(c).cloned())
                .unwrap_or_default();
            out += &format!(
                "  {};\n",
                declare_variable(m, *member_ty, &decorations, &var_name)
            );
        }
        out += &format!("}}; // struct {}\n\n", name);
    }

    // a global with no name inherits one from its type, so later
    // references have something readable to point at
    let globals = m.globals.clone();
    for &g in &globals {
        if !m.ops[g].name.is_empty() {
            continue;
        }
        let Some(var) = m.ops[g].var() else { continue };
        let ty = var.ty;
        let name = {
            let direct = m.ops[ty].ty().map(|t| t.cached_name.borrow().clone());
            match direct {
                Some(n) if !n.is_empty() => n,
                _ => m.ops[ty]
                    .ty()
                    .filter(|t| t.kind == TypeKind::Pointer)
                    .and_then(|t| t.base)
                    .and_then(|b| m.ops[b].ty())
                    .map(|t| t.cached_name.borrow().clone())
                    .unwrap_or_default(),
            }
        };
        if !name.is_empty() {
            m.ops[g].name = name;
        }
    }

    for &g in &m.globals {
        let Some(var) = m.ops[g].var() else { continue };
        let (ty, storage) = (var.ty, var.storage);
        let var_name = types::id_name(m, g);
        out += &format!(
            "{} {};\n",
            storage.name(),
            declare_variable(m, ty, &m.ops[g].decorations, &var_name)
        );
    }

    out += "\n";

    let funcs = m.funcs.clone();
    for f in funcs {
        let mut emit = inline::optimise_function(m, f);
        structurize::emit_function(m, f, &mut emit, &mut out);
    }

    out
}
