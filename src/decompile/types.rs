//! Type and constant printing: canonical short names for type nodes,
//! declarator strings, and value literals for constants.

use crate::model::{ConstantData, Decoration, Module, OpIdx, TypeKind};
use crate::spv::{BuiltIn, DecorationKind, ImageFormat};

/// Default display name for an ID without any better name.
pub fn default_id_name(id: u32) -> String {
    format!("{{{}}}", id)
}

/// The display name of an instruction: its textual name if one was given,
/// a value literal for constants, `{id}` otherwise.
pub fn id_name(m: &Module, idx: OpIdx) -> String {
    let inst = m.instr(idx);
    if !inst.name.is_empty() {
        return inst.name.clone();
    }
    if let Some(c) = inst.constant() {
        return constant_id_name(m, c);
    }
    default_id_name(inst.id)
}

/// Canonical short name for a type node, computed lazily and cached once.
pub fn type_name(m: &Module, idx: OpIdx) -> String {
    let inst = m.instr(idx);
    let Some(t) = inst.ty() else {
        return if inst.name.is_empty() {
            default_id_name(inst.id)
        } else {
            inst.name.clone()
        };
    };

    {
        let cached = t.cached_name.borrow();
        if !cached.is_empty() {
            return cached.clone();
        }
    }

    let base_name = || {
        t.base
            .map(|b| type_name(m, b))
            .unwrap_or_else(|| "unknown".to_string())
    };

    let name = match t.kind {
        TypeKind::Void => "void".to_string(),
        TypeKind::Bool => "bool".to_string(),
        TypeKind::Float => {
            debug_assert!(matches!(t.bit_count, 16 | 32 | 64));
            match t.bit_count {
                64 => "double",
                32 => "float",
                _ => "half",
            }
            .to_string()
        }
        TypeKind::SInt => {
            debug_assert!(matches!(t.bit_count, 8 | 16 | 32 | 64));
            match t.bit_count {
                64 => "long",
                32 => "int",
                16 => "short",
                _ => "byte",
            }
            .to_string()
        }
        TypeKind::UInt => {
            debug_assert!(matches!(t.bit_count, 8 | 16 | 32 | 64));
            match t.bit_count {
                64 => "ulong",
                32 => "uint",
                16 => "ushort",
                _ => "ubyte",
            }
            .to_string()
        }
        TypeKind::Vector => format!("{}{}", base_name(), t.vector_size),
        TypeKind::Matrix => format!("{}{}x{}", base_name(), t.vector_size, t.matrix_size),
        TypeKind::Pointer => format!("{}*", base_name()),
        TypeKind::Array => format!("{}[{}]", base_name(), t.array_size),
        TypeKind::Image => {
            let mut typestring = base_name();
            if t.format != ImageFormat::Unknown {
                typestring += &format!(", {}", t.format.name());
            }
            format!(
                "{}{}{}Image{}<{}>",
                if t.depth { "Depth" } else { "" },
                if t.multisampled { "MS" } else { "" },
                if t.arrayed { "Array" } else { "" },
                t.dim.name(),
                typestring
            )
        }
        TypeKind::SampledImage => format!("Sampled{}", base_name()),
        TypeKind::Sampler => "Sampler".to_string(),
        TypeKind::Struct => format!("struct{}", inst.id),
        TypeKind::Function => "function".to_string(),
    };

    *t.cached_name.borrow_mut() = name.clone();
    name
}

/// Declarator form: decorations, the type, the variable name, array
/// brackets where the type calls for them, and the builtin it aliases.
pub fn declare_variable(
    m: &Module,
    ty_idx: OpIdx,
    decorations: &[Decoration],
    var_name: &str,
) -> String {
    let mut ret = String::new();

    let mut builtin: Option<&Decoration> = None;
    for d in decorations {
        if d.kind == DecorationKind::BuiltIn {
            builtin = Some(d);
            continue;
        }
        ret += &d.str();
        ret.push(' ');
    }

    let t = m.instr(ty_idx).ty();
    let pointee_array = t.filter(|t| t.kind == TypeKind::Pointer).and_then(|t| {
        let b = t.base?;
        let pt = m.instr(b).ty()?;
        (pt.kind == TypeKind::Array).then_some(pt)
    });

    if let Some(pt) = pointee_array {
        let elem = pt
            .base
            .map(|e| type_name(m, e))
            .unwrap_or_else(|| "unknown".to_string());
        ret += &format!("{}* {}[{}]", elem, var_name, pt.array_size);
    } else if let Some(t) = t.filter(|t| t.kind == TypeKind::Array) {
        let elem = t
            .base
            .map(|e| type_name(m, e))
            .unwrap_or_else(|| "unknown".to_string());
        ret += &format!("{} {}[{}]", elem, var_name, t.array_size);
    } else {
        ret += &format!("{} {}", type_name(m, ty_idx), var_name);
    }

    if let Some(b) = builtin {
        ret += &format!(" = {}", BuiltIn::from_word(b.val).name());
    }

    ret
}

fn ensure_decimal(mut s: String) -> String {
    if !s.contains('.') && !s.contains('e') && !s.contains("inf") && !s.contains("NaN") {
        s.push_str(".0");
    }
    s
}

/// Floats always carry a decimal point, without restricting precision.
pub fn float_str32(v: f32) -> String {
    ensure_decimal(format!("{}", v))
}

pub fn float_str64(v: f64) -> String {
    ensure_decimal(format!("{}", v))
}

/// Widen a 16-bit float to 32 bits for printing.
pub fn half_to_f32(h: u16) -> f32 {
    let sign = (h >> 15) as u32 & 1;
    let exp = (h >> 10) as u32 & 0x1f;
    let man = h as u32 & 0x3ff;

    if exp == 0 {
        // zero or subnormal
        let mag = man as f32 / 16_777_216.0; // man * 2^-24
        return if sign == 1 { -mag } else { mag };
    }
    if exp == 31 {
        if man == 0 {
            return if sign == 1 {
                f32::NEG_INFINITY
            } else {
                f32::INFINITY
            };
        }
        return f32::NAN;
    }

    f32::from_bits((sign << 31) | ((exp + 112) << 23) | (man << 13))
}

/// Scalar value literal with the format matched to bit width and
/// signedness.
pub fn constant_value_str(m: &Module, c: &ConstantData) -> String {
    debug_assert!(c.children.is_empty());

    let Some(t) = m.instr(c.ty).ty() else {
        return format!("!{}!", c.raw as u32);
    };

    match t.kind {
        TypeKind::Float => match t.bit_count {
            64 => float_str64(c.as_f64()),
            32 => float_str32(c.as_f32()),
            16 => float_str32(half_to_f32(c.raw as u16)),
            _ => format!("!{}!", c.raw as u32),
        },
        TypeKind::SInt => match t.bit_count {
            64 => format!("{}", c.raw as i64),
            32 => format!("{}", c.raw as i32),
            16 => format!("{}", c.raw as u16 as i16),
            8 => format!("{}", c.raw as u8 as i8),
            _ => format!("!{}!", c.raw as u32),
        },
        TypeKind::UInt => match t.bit_count {
            64 => format!("{}", c.raw),
            32 => format!("{}", c.raw as u32),
            16 => format!("{}", c.raw as u16),
            8 => format!("{}", c.raw as u8),
            _ => format!("!{}!", c.raw as u32),
        },
        TypeKind::Bool => if c.raw != 0 { "true" } else { "false" }.to_string(),
        _ => format!("!{}!", c.raw as u32),
    }
}

/// Display name for a constant: scalars print their value, replicated
/// vectors collapse to `<scalar>.xxxx`, composites print constructor
/// form, array constants wrap their elements across lines.
pub fn constant_id_name(m: &Module, c: &ConstantData) -> String {
    let t = m.instr(c.ty).ty();
    let kind = t.map(|t| t.kind);

    if kind.map_or(false, |k| k.is_scalar()) && c.children.is_empty() {
        return constant_value_str(m, c);
    }

    // special case vectors with the same constant replicated across all
    // channels
    if kind == Some(TypeKind::Vector) && !c.children.is_empty() {
        let first = m.instr(c.children[0]).constant().map(|cc| cc.raw);
        let identical = first.is_some()
            && c.children
                .iter()
                .all(|&ch| m.instr(ch).constant().map(|cc| cc.raw) == first);
        if identical {
            let mut ret = m
                .instr(c.children[0])
                .constant()
                .map(|cc| constant_value_str(m, cc))
                .unwrap_or_default();
            ret.push('.');
            for _ in 0..c.children.len() {
                ret.push('x');
            }
            return ret;
        }
    }

    let mut ret = match t {
        Some(t) if t.kind == TypeKind::Array => {
            let elem = t
                .base
                .map(|b| type_name(m, b))
                .unwrap_or_else(|| "unknown".to_string());
            format!("{}[{}]", elem, c.children.len())
        }
        _ => type_name(m, c.ty),
    };

    ret.push('(');
    if c.children.is_empty() {
        ret += &constant_value_str(m, c);
    }
    for (i, &ch) in c.children.iter().enumerate() {
        match m.instr(ch).constant() {
            Some(cc) => ret += &constant_id_name(m, cc),
            None => ret += &default_id_name(m.instr(ch).id),
        }
        if i + 1 < c.children.len() {
            ret += ", ";
            // each array element goes on its own line with an estimated
            // indent; a blindly-appending writer can't match it exactly
            if kind == Some(TypeKind::Array) {
                ret += "\n                        ";
            }
        }
    }
    ret.push(')');

    ret
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn floats_always_carry_a_decimal_point() {
        assert_eq!(float_str32(1.0), "1.0");
        assert_eq!(float_str32(0.0), "0.0");
        assert_eq!(float_str32(-2.0), "-2.0");
        assert_eq!(float_str32(0.5), "0.5");
        assert_eq!(float_str64(100.0), "100.0");
    }

    #[test]
    fn half_widening() {
        assert_eq!(half_to_f32(0x3c00), 1.0);
        assert_eq!(half_to_f32(0xbc00), -1.0);
        assert_eq!(half_to_f32(0x0000), 0.0);
        assert_eq!(half_to_f32(0x3800), 0.5);
        assert!(half_to_f32(0x7c00).is_infinite());
        assert!(half_to_f32(0x7e00).is_nan());
    }
}
