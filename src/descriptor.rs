//! JVM binary descriptors and the JNI types that stand for Java types in C++.

use crate::{
    error::{Error, Result},
    model::{Member, Method, Primitive, TypeDescriptor},
};

/// Encode a type as its JVM binary descriptor (`I`, `[J`, `Ljava/lang/String;`).
pub fn encode(ty: &TypeDescriptor) -> Result<String> {
    let mut out = String::new();
    encode_into(ty, &mut out)?;
    Ok(out)
}

fn encode_into(ty: &TypeDescriptor, out: &mut String) -> Result<()> {
    match ty {
        TypeDescriptor::Primitive(p) => out.push_str(&p.to_string()),
        TypeDescriptor::Array(component) => {
            out.push('[');
            encode_into(component, out)?;
        }
        TypeDescriptor::Declared(name) => {
            out.push('L');
            out.push_str(&name.replace('.', "/"));
            out.push(';');
        }
        TypeDescriptor::Null => return Err(unsupported(ty)),
    }
    Ok(())
}

fn unsupported(ty: &TypeDescriptor) -> Error {
    Error::UnsupportedType {
        member: String::new(),
        kind: ty.java_name(),
    }
}

/// The concatenated descriptors of `params`, without parentheses.
pub fn encode_parameters<'a>(
    params: impl IntoIterator<Item = &'a TypeDescriptor>,
) -> Result<String> {
    let mut out = String::new();
    for param in params {
        encode_into(param, &mut out)?;
    }
    Ok(out)
}

/// `(` + parameter descriptors + `)` + return descriptor.
pub fn encode_method<'a>(
    params: impl IntoIterator<Item = &'a TypeDescriptor>,
    return_type: &TypeDescriptor,
) -> Result<String> {
    let mut out = String::from("(");
    out.push_str(&encode_parameters(params)?);
    out.push(')');
    encode_into(return_type, &mut out)?;
    Ok(out)
}

/// Parameter types the JVM sees for `method`.
///
/// Constructors of an inner class take the enclosing instance as hidden first
/// parameter; `enclosing_instance` is that type when the declaring class is an
/// inner class.
pub fn jvm_parameters<'a>(
    method: &'a Method,
    enclosing_instance: Option<&'a TypeDescriptor>,
) -> Vec<&'a TypeDescriptor> {
    let implicit = enclosing_instance.filter(|_| method.is_constructor());
    implicit
        .into_iter()
        .chain(method.parameters.iter().map(|p| &p.ty))
        .collect()
}

/// Full method descriptor of `method` as the class file declares it.
pub fn method_descriptor(
    method: &Method,
    enclosing_instance: Option<&TypeDescriptor>,
) -> Result<String> {
    encode_method(
        jvm_parameters(method, enclosing_instance),
        &method.return_type,
    )
    .map_err(|e| e.in_member(|| java_declaration(method)))
}

/// `name(type, type)` for diagnostics.
pub fn java_declaration(member: &dyn Member) -> String {
    let params = member
        .parameters()
        .iter()
        .map(|p| p.ty.java_name())
        .collect::<Vec<_>>()
        .join(", ");
    format!("{}.{}({})", member.declaring_class(), member.name(), params)
}

/// The JNI C type used for `ty` in function signatures (`jint`, `jstring`, ...).
pub fn native_type_name(ty: &TypeDescriptor) -> Result<&'static str> {
    Ok(match ty {
        TypeDescriptor::Primitive(p) => primitive_native_name(*p),
        TypeDescriptor::Array(component) => match component.as_ref() {
            TypeDescriptor::Primitive(Primitive::Boolean) => "jbooleanArray",
            TypeDescriptor::Primitive(Primitive::Byte) => "jbyteArray",
            TypeDescriptor::Primitive(Primitive::Char) => "jcharArray",
            TypeDescriptor::Primitive(Primitive::Short) => "jshortArray",
            TypeDescriptor::Primitive(Primitive::Int) => "jintArray",
            TypeDescriptor::Primitive(Primitive::Long) => "jlongArray",
            TypeDescriptor::Primitive(Primitive::Float) => "jfloatArray",
            TypeDescriptor::Primitive(Primitive::Double) => "jdoubleArray",
            TypeDescriptor::Primitive(Primitive::Void) | TypeDescriptor::Null => {
                return Err(unsupported(ty))
            }
            _ => "jobjectArray",
        },
        TypeDescriptor::Declared(name) => match name.as_str() {
            "java.lang.String" => "jstring",
            "java.lang.Class" => "jclass",
            _ if is_throwable(name) => "jthrowable",
            _ => "jobject",
        },
        TypeDescriptor::Null => return Err(unsupported(ty)),
    })
}

fn primitive_native_name(p: Primitive) -> &'static str {
    match p {
        Primitive::Boolean => "jboolean",
        Primitive::Byte => "jbyte",
        Primitive::Char => "jchar",
        Primitive::Short => "jshort",
        Primitive::Int => "jint",
        Primitive::Long => "jlong",
        Primitive::Float => "jfloat",
        Primitive::Double => "jdouble",
        Primitive::Void => "void",
    }
}

// Throwables whose names do not follow the `Exception`/`Error` suffix rule.
const KNOWN_THROWABLES: &[&str] = &[
    "java.lang.Throwable",
    "java.lang.Exception",
    "java.lang.Error",
    "java.lang.RuntimeException",
    "java.lang.ThreadDeath",
];

/// Whether a declared class is `java.lang.Throwable` or one of its subclasses.
///
/// Class models carry no type hierarchy, so subclasses are recognised by the
/// `Exception`/`Error` naming convention every JDK and Android throwable follows.
///
/// The check is by name only. An ordinary class that happens to end in one of
/// those suffixes, e.g. a `com.example.ValidationError` value object, is also
/// reported as throwable and maps to `jthrowable`. That only changes the C++
/// handle type. `jthrowable` converts to `jobject` implicitly, but a caller
/// holding a plain `jobject` needs a cast to pass it in.
pub fn is_throwable(name: &str) -> bool {
    if KNOWN_THROWABLES.contains(&name) {
        return true;
    }
    let simple = crate::model::simple_name_of(name);
    simple.ends_with("Exception") || simple.ends_with("Error")
}

/// The `<Type>` part of `Call<Type>Method`, `Get<Type>Field` and friends.
pub fn call_selector(ty: &TypeDescriptor) -> &'static str {
    match ty {
        TypeDescriptor::Primitive(Primitive::Boolean) => "Boolean",
        TypeDescriptor::Primitive(Primitive::Byte) => "Byte",
        TypeDescriptor::Primitive(Primitive::Char) => "Char",
        TypeDescriptor::Primitive(Primitive::Short) => "Short",
        TypeDescriptor::Primitive(Primitive::Int) => "Int",
        TypeDescriptor::Primitive(Primitive::Long) => "Long",
        TypeDescriptor::Primitive(Primitive::Float) => "Float",
        TypeDescriptor::Primitive(Primitive::Double) => "Double",
        TypeDescriptor::Primitive(Primitive::Void) => "Void",
        _ => "Object",
    }
}

/// `CallObjectMethod` and `GetObjectField` return a bare `jobject`; these JNI
/// types need a `reinterpret_cast` to get there.
pub fn needs_cast(native_type: &str) -> bool {
    matches!(native_type, "jclass" | "jstring" | "jthrowable" | "jweak")
        || native_type.ends_with("Array")
}

/// The value a generated stub returns when it has nothing better to say.
pub fn zero_value(ty: &TypeDescriptor) -> &'static str {
    match ty {
        TypeDescriptor::Primitive(Primitive::Boolean) => "JNI_FALSE",
        TypeDescriptor::Primitive(_) => "0",
        _ => "nullptr",
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::model::{Modifiers, Parameter};

    fn int() -> TypeDescriptor {
        TypeDescriptor::Primitive(Primitive::Int)
    }

    fn string() -> TypeDescriptor {
        TypeDescriptor::declared("java.lang.String")
    }

    #[test]
    fn primitive_codes() {
        let expected = [
            (Primitive::Boolean, "Z"),
            (Primitive::Byte, "B"),
            (Primitive::Char, "C"),
            (Primitive::Short, "S"),
            (Primitive::Int, "I"),
            (Primitive::Long, "J"),
            (Primitive::Float, "F"),
            (Primitive::Double, "D"),
            (Primitive::Void, "V"),
        ];
        for (primitive, code) in expected {
            assert_eq!(encode(&primitive.into()).unwrap(), code);
        }
    }

    #[test]
    fn array_nesting_becomes_leading_brackets() {
        let mut ty = string();
        for depth in 1..=5 {
            ty = TypeDescriptor::array_of(ty);
            let encoded = encode(&ty).unwrap();
            assert_eq!(encoded.chars().take_while(|&c| c == '[').count(), depth);
            assert!(encoded.ends_with("Ljava/lang/String;"));
        }
    }

    #[test]
    fn method_descriptors() {
        let params = [int(), TypeDescriptor::array_of(string())];
        assert_eq!(
            encode_method(&params, &Primitive::Boolean.into()).unwrap(),
            "(I[Ljava/lang/String;)Z"
        );
        assert_eq!(
            encode_method(&[int(), string()], &Primitive::Boolean.into()).unwrap(),
            "(ILjava/lang/String;)Z"
        );
        assert_eq!(
            encode_method(std::iter::empty(), &TypeDescriptor::VOID).unwrap(),
            "()V"
        );
    }

    #[test]
    fn inner_class_constructor_takes_outer_instance() {
        let outer = TypeDescriptor::declared("a.Outer");
        let ctor = Method::constructor(
            "a.Outer$Inner",
            vec![Parameter::new("x", int())],
            Modifiers::PUBLIC,
        );
        assert_eq!(method_descriptor(&ctor, Some(&outer)).unwrap(), "(La/Outer;I)V");
        assert_eq!(method_descriptor(&ctor, None).unwrap(), "(I)V");

        let method = Method::new("a.Outer$Inner", "f", int(), vec![], Modifiers::PUBLIC);
        assert_eq!(method_descriptor(&method, Some(&outer)).unwrap(), "()I");
    }

    #[test]
    fn null_type_is_unsupported() {
        assert_matches!(
            encode(&TypeDescriptor::Null),
            Err(Error::UnsupportedType { .. })
        );
        let method = Method::new(
            "a.B",
            "f",
            TypeDescriptor::VOID,
            vec![Parameter::new("x", TypeDescriptor::Null)],
            Modifiers::PUBLIC,
        );
        assert_matches!(
            method_descriptor(&method, None),
            Err(Error::UnsupportedType { member, .. }) if member == "a.B.f(null)"
        );
    }

    #[test]
    fn native_types() {
        assert_eq!(native_type_name(&Primitive::Boolean.into()).unwrap(), "jboolean");
        assert_eq!(native_type_name(&TypeDescriptor::VOID).unwrap(), "void");
        assert_eq!(native_type_name(&string()).unwrap(), "jstring");
        assert_eq!(
            native_type_name(&TypeDescriptor::declared("java.lang.Class")).unwrap(),
            "jclass"
        );
        assert_eq!(
            native_type_name(&TypeDescriptor::declared("java.lang.Throwable")).unwrap(),
            "jthrowable"
        );
        assert_eq!(
            native_type_name(&TypeDescriptor::declared("java.io.IOException")).unwrap(),
            "jthrowable"
        );
        assert_eq!(
            native_type_name(&TypeDescriptor::declared("java.util.List")).unwrap(),
            "jobject"
        );
        // naming false positive, see `is_throwable`
        assert_eq!(
            native_type_name(&TypeDescriptor::declared("com.example.ValidationError")).unwrap(),
            "jthrowable"
        );
        assert_eq!(
            native_type_name(&TypeDescriptor::array_of(int())).unwrap(),
            "jintArray"
        );
        assert_eq!(
            native_type_name(&TypeDescriptor::array_of(string())).unwrap(),
            "jobjectArray"
        );
        assert_eq!(
            native_type_name(&TypeDescriptor::array_of(TypeDescriptor::array_of(int()))).unwrap(),
            "jobjectArray"
        );
    }

    #[test]
    fn selectors_and_casts() {
        assert_eq!(call_selector(&int()), "Int");
        assert_eq!(call_selector(&TypeDescriptor::VOID), "Void");
        assert_eq!(call_selector(&string()), "Object");
        assert!(needs_cast("jstring"));
        assert!(needs_cast("jobjectArray"));
        assert!(!needs_cast("jobject"));
        assert_eq!(zero_value(&Primitive::Boolean.into()), "JNI_FALSE");
        assert_eq!(zero_value(&Primitive::Double.into()), "0");
        assert_eq!(zero_value(&string()), "nullptr");
    }
}
