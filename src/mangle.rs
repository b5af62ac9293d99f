//! Native symbol names and C++-safe identifiers.

use std::fmt::Write;

/// Escape a name for use inside a JNI symbol.
///
/// `_` becomes `_1`; every character outside `[A-Za-z0-9]` becomes `_` followed
/// by its code point as five lowercase hex digits.
pub fn escape_to_ascii(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '_' => result.push_str("_1"),
            _ if c.is_ascii_alphanumeric() => result.push(c),
            _ => push_code_point(&mut result, c),
        }
    }
    result
}

fn push_code_point(out: &mut String, c: char) {
    // writing to a String never fails
    let _ = write!(out, "_{:05x}", c as u32);
}

/// The JNI form of a dotted binary class name: `com.example.Foo_Bar` becomes
/// `com_example_Foo_1Bar`, `a.Outer$Inner` becomes `a_Outer_00024Inner`.
pub fn jni_class_name(binary_name: &str) -> String {
    binary_name
        .split('.')
        .map(escape_to_ascii)
        .collect::<Vec<_>>()
        .join("_")
}

/// `Java_<class>_<method>`, the symbol the JVM looks up for a native method.
pub fn native_symbol_name(jni_class_name: &str, method_name: &str) -> String {
    format!("Java_{}_{}", jni_class_name, escape_to_ascii(method_name))
}

/// The overloaded form `Java_<class>_<method>__<args>`, where `args` is the
/// parameter part of the method descriptor.
pub fn native_overloaded_symbol_name(
    jni_class_name: &str,
    method_name: &str,
    parameter_descriptor: &str,
) -> String {
    let mut result = native_symbol_name(jni_class_name, method_name);
    result.push_str("__");
    for c in parameter_descriptor.chars() {
        match c {
            '_' => result.push_str("_1"),
            ';' => result.push_str("_2"),
            '[' => result.push_str("_3"),
            '/' => result.push('_'),
            _ if c.is_ascii_alphanumeric() => result.push(c),
            _ => push_code_point(&mut result, c),
        }
    }
    result
}

/// Turn the parameter part of a method descriptor into a token usable in a C++
/// identifier: `_` to `_1`, `/` to `_`, `;` to `_2`, other non-alphanumerics
/// escaped as code points.
pub fn signature_token(parameter_descriptor: &str) -> String {
    let mut result = String::with_capacity(parameter_descriptor.len());
    for c in parameter_descriptor.chars() {
        match c {
            '_' => result.push_str("_1"),
            '/' => result.push('_'),
            ';' => result.push_str("_2"),
            _ if c.is_ascii_alphanumeric() => result.push(c),
            _ => push_code_point(&mut result, c),
        }
    }
    result
}

/// Make a Java identifier a valid C++ identifier, leaving plain ASCII names
/// untouched and escaping everything else (`$`, non-ASCII letters).
pub fn cpp_identifier(name: &str) -> String {
    if name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        return name.to_owned();
    }
    let mut result = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_ascii_alphanumeric() || c == '_' {
            result.push(c);
        } else {
            push_code_point(&mut result, c);
        }
    }
    result
}
