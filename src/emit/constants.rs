//! Compile-time constants rendered as `static constexpr` members.

use std::collections::HashSet;

use log::warn;

use crate::{
    descriptor, mangle,
    model::{ConstantValue, Field, Primitive, TypeDescriptor},
    resolver,
};

/// One `static constexpr` declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstantView {
    pub name: String,
    /// JNI type, or `auto` for strings.
    pub native_type: &'static str,
    pub literal: String,
    /// Set when the value could not be determined and `literal` is a stand-in.
    pub diagnostic: Option<String>,
}

impl ConstantView {
    /// `static constexpr jint MAX = 10;`
    pub fn declaration(&self) -> String {
        let mut line = format!(
            "static constexpr {} {} = {};",
            self.native_type, self.name, self.literal
        );
        if let Some(diagnostic) = &self.diagnostic {
            line.push_str(&format!(" /* {diagnostic} */"));
        }
        line
    }
}

fn is_string(ty: &TypeDescriptor) -> bool {
    matches!(ty, TypeDescriptor::Declared(name) if name == "java.lang.String")
}

/// Views for the constants among `fields`.
///
/// `taken` holds the other member names of the enclosing C++ scope. A
/// constant whose name is reserved, taken, or used by an earlier constant
/// gets trailing `_`s until it is unique.
pub fn constant_views<'a>(
    fields: impl IntoIterator<Item = &'a Field>,
    taken: &HashSet<String>,
) -> Vec<ConstantView> {
    let mut used = taken.clone();
    fields
        .into_iter()
        .filter(|f| f.is_constant())
        .map(|field| {
            let mut view = constant_view(field);
            view.name = unique_name(view.name, &used);
            used.insert(view.name.clone());
            view
        })
        .collect()
}

fn unique_name(mut name: String, used: &HashSet<String>) -> String {
    while resolver::is_reserved_word(&name) || used.contains(&name) {
        name.push('_');
    }
    name
}

pub fn constant_view(field: &Field) -> ConstantView {
    let name = mangle::cpp_identifier(&field.name);
    let native_type = if is_string(&field.ty) {
        "auto"
    } else {
        descriptor::native_type_name(&field.ty).unwrap_or("jobject")
    };

    match field.constant.as_ref().and_then(|v| literal(&field.ty, v)) {
        Some(literal) => ConstantView {
            name,
            native_type,
            literal,
            diagnostic: None,
        },
        None => {
            warn!(
                "no usable constant value for {}.{}, emitting zero",
                field.declaring_class, field.name
            );
            ConstantView {
                name,
                native_type,
                literal: zero_literal(&field.ty).to_owned(),
                diagnostic: Some(format!("Unknown constant value for '{}'", field.name)),
            }
        }
    }
}

fn zero_literal(ty: &TypeDescriptor) -> &'static str {
    match ty {
        TypeDescriptor::Primitive(Primitive::Boolean) => "JNI_FALSE",
        TypeDescriptor::Primitive(_) => "0",
        _ => "u8\"\"",
    }
}

fn literal(ty: &TypeDescriptor, value: &ConstantValue) -> Option<String> {
    let primitive = match ty {
        TypeDescriptor::Primitive(p) => *p,
        _ if is_string(ty) => {
            return match value {
                ConstantValue::String(s) => Some(format!("u8\"{}\"", escape_string(s))),
                _ => None,
            }
        }
        _ => return None,
    };

    let integer = match value {
        ConstantValue::Int(v) => Some(i64::from(*v)),
        ConstantValue::Long(v) => Some(*v),
        ConstantValue::Boolean(b) => Some(i64::from(*b)),
        _ => None,
    };

    match primitive {
        Primitive::Boolean => {
            integer.map(|v| String::from(if v != 0 { "JNI_TRUE" } else { "JNI_FALSE" }))
        }
        Primitive::Char => match value {
            ConstantValue::String(s) if s.chars().count() == 1 => s.chars().next().map(char_literal),
            _ => integer
                .and_then(|v| u32::try_from(v).ok())
                .and_then(char::from_u32)
                .map(char_literal),
        },
        Primitive::Byte => integer.filter(|v| i8::try_from(*v).is_ok()).map(|v| v.to_string()),
        Primitive::Short => integer
            .filter(|v| i16::try_from(*v).is_ok())
            .map(|v| v.to_string()),
        Primitive::Int => integer.and_then(|v| i32::try_from(v).ok()).map(int_literal),
        Primitive::Long => integer.map(long_literal),
        Primitive::Float => floating(value, integer).map(|v| format!("{v:?}f")),
        Primitive::Double => floating(value, integer).map(|v| format!("{v:?}")),
        Primitive::Void => None,
    }
}

fn floating(value: &ConstantValue, integer: Option<i64>) -> Option<f64> {
    let v = match value {
        ConstantValue::Double(v) => *v,
        _ => integer? as f64,
    };
    v.is_finite().then_some(v)
}

fn int_literal(v: i32) -> String {
    if v == i32::MIN {
        "(-2147483647 - 1)".to_owned()
    } else {
        v.to_string()
    }
}

fn long_literal(v: i64) -> String {
    if v == i64::MIN {
        "(-9223372036854775807LL - 1)".to_owned()
    } else {
        format!("{v}LL")
    }
}

fn char_literal(c: char) -> String {
    match c {
        '\'' | '\\' => format!("'\\{c}'"),
        ' '..='~' => format!("'{c}'"),
        _ => (c as u32).to_string(),
    }
}

/// Escape text for a C++ string literal. Control characters use three-digit
/// octal escapes so following digits can't extend them.
pub fn escape_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '?' => out.push_str("\\?"),
            c if (c as u32) < 0x20 || c == '\u{7f}' => {
                out.push_str(&format!("\\{:03o}", c as u32));
            }
            c => out.push(c),
        }
    }
    out
}
