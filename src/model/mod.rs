//! Source-agnostic description of a Java class.
//!
//! Code generation only ever talks to a [`ClassModel`]. Two adapters produce
//! one: [`SymbolicSource`] reads a JSON symbol table (what an annotation
//! processor or IDE plugin would export) and [`ReflectedSource`] reads a
//! compiled `.class` file.

use std::fmt;

use bitflags::bitflags;
use serde::Deserialize;

pub mod reflected;
pub mod symbolic;
pub mod types;

pub use reflected::ReflectedSource;
pub use symbolic::SymbolicSource;
pub use types::{Primitive, TypeDescriptor};

/// Name the JVM gives to every constructor.
pub const CONSTRUCTOR_NAME: &str = "<init>";

bitflags! {
    /// Java modifiers, declared in the order they are printed in.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u16 {
        const PUBLIC = 1 << 0;
        const PRIVATE = 1 << 1;
        const DEFAULT = 1 << 2;
        const STRICT = 1 << 3;
        const PROTECTED = 1 << 4;
        const STATIC = 1 << 5;
        const FINAL = 1 << 6;
        const VOLATILE = 1 << 7;
        const TRANSIENT = 1 << 8;
        const NATIVE = 1 << 9;
        const ABSTRACT = 1 << 10;
        const SYNCHRONIZED = 1 << 11;
    }
}

impl Modifiers {
    /// Look up a modifier by its Java keyword.
    pub fn from_keyword(keyword: &str) -> Option<Modifiers> {
        Some(match keyword {
            "public" => Modifiers::PUBLIC,
            "private" => Modifiers::PRIVATE,
            "default" => Modifiers::DEFAULT,
            "strictfp" | "strict" => Modifiers::STRICT,
            "protected" => Modifiers::PROTECTED,
            "static" => Modifiers::STATIC,
            "final" => Modifiers::FINAL,
            "volatile" => Modifiers::VOLATILE,
            "transient" => Modifiers::TRANSIENT,
            "native" => Modifiers::NATIVE,
            "abstract" => Modifiers::ABSTRACT,
            "synchronized" => Modifiers::SYNCHRONIZED,
            _ => return None,
        })
    }

    pub fn is_public(self) -> bool {
        self.contains(Modifiers::PUBLIC)
    }

    pub fn is_static(self) -> bool {
        self.contains(Modifiers::STATIC)
    }

    pub fn is_final(self) -> bool {
        self.contains(Modifiers::FINAL)
    }

    pub fn is_native(self) -> bool {
        self.contains(Modifiers::NATIVE)
    }
}

impl fmt::Display for Modifiers {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut first = true;
        for (name, flag) in self.iter_names() {
            if !first {
                f.write_str(" ")?;
            }
            first = false;
            if flag == Modifiers::STRICT {
                f.write_str("strictfp")?;
            } else {
                f.write_str(&name.to_ascii_lowercase())?;
            }
        }
        Ok(())
    }
}

/// Generation hints attached to a member.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Annotation {
    /// Explicit accessor request for a field; overrides the
    /// all-fields setting in either direction.
    FieldAccessors {
        #[serde(default)]
        getter: bool,
        #[serde(default)]
        setter: bool,
    },
    /// Explicit opt-in or opt-out of a method from the proxy.
    MethodProxy {
        #[serde(default = "enabled_by_default")]
        enabled: bool,
    },
    /// Any annotation without meaning to the generator.
    #[serde(other)]
    Other,
}

fn enabled_by_default() -> bool {
    true
}

/// A compile-time constant value as found in the class model.
///
/// The value kind is what the source delivered (class files store every
/// `int`-sized constant as `Int`); the declared field type decides how it is
/// rendered.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ConstantValue {
    Boolean(bool),
    Int(i32),
    Long(i64),
    Double(f64),
    String(String),
}

/// A method or constructor parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub name: String,
    pub ty: TypeDescriptor,
}

impl Parameter {
    pub fn new(name: impl Into<String>, ty: TypeDescriptor) -> Self {
        Parameter {
            name: name.into(),
            ty,
        }
    }
}

/// Whether a member is a constructor, a method or a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberKind {
    Constructor,
    Method,
    Field,
}

/// Read-only view shared by methods, constructors and fields.
pub trait Member {
    fn name(&self) -> &str;

    /// Return type for methods (`void` for constructors), declared type for fields.
    fn ty(&self) -> &TypeDescriptor;

    fn modifiers(&self) -> Modifiers;

    /// Binary name of the class declaring this member.
    ///
    /// Members refer to their class by name only and never own it.
    fn declaring_class(&self) -> &str;

    fn annotations(&self) -> &[Annotation];

    fn kind(&self) -> MemberKind;

    fn parameters(&self) -> &[Parameter] {
        &[]
    }

    fn is_static(&self) -> bool {
        self.modifiers().is_static()
    }
}

/// A method or constructor.
#[derive(Debug, Clone, PartialEq)]
pub struct Method {
    pub name: String,
    pub return_type: TypeDescriptor,
    pub parameters: Vec<Parameter>,
    pub modifiers: Modifiers,
    /// Declared exception classes, binary names.
    pub exceptions: Vec<String>,
    pub annotations: Vec<Annotation>,
    pub declaring_class: String,
}

impl Method {
    pub fn new(
        declaring_class: impl Into<String>,
        name: impl Into<String>,
        return_type: TypeDescriptor,
        parameters: Vec<Parameter>,
        modifiers: Modifiers,
    ) -> Self {
        Method {
            name: name.into(),
            return_type,
            parameters,
            modifiers,
            exceptions: Vec::new(),
            annotations: Vec::new(),
            declaring_class: declaring_class.into(),
        }
    }

    pub fn constructor(
        declaring_class: impl Into<String>,
        parameters: Vec<Parameter>,
        modifiers: Modifiers,
    ) -> Self {
        Method::new(
            declaring_class,
            CONSTRUCTOR_NAME,
            TypeDescriptor::VOID,
            parameters,
            modifiers,
        )
    }

    pub fn is_constructor(&self) -> bool {
        self.name == CONSTRUCTOR_NAME
    }

    /// The explicit proxy opt-in/opt-out, if annotated.
    pub fn proxy_override(&self) -> Option<bool> {
        self.annotations.iter().find_map(|a| match a {
            Annotation::MethodProxy { enabled } => Some(*enabled),
            _ => None,
        })
    }
}

impl Member for Method {
    fn name(&self) -> &str {
        &self.name
    }

    fn ty(&self) -> &TypeDescriptor {
        &self.return_type
    }

    fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    fn declaring_class(&self) -> &str {
        &self.declaring_class
    }

    fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    fn kind(&self) -> MemberKind {
        if self.is_constructor() {
            MemberKind::Constructor
        } else {
            MemberKind::Method
        }
    }

    fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }
}

/// A field, possibly carrying a compile-time constant.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub ty: TypeDescriptor,
    pub modifiers: Modifiers,
    pub annotations: Vec<Annotation>,
    pub constant: Option<ConstantValue>,
    pub declaring_class: String,
}

impl Field {
    pub fn new(
        declaring_class: impl Into<String>,
        name: impl Into<String>,
        ty: TypeDescriptor,
        modifiers: Modifiers,
    ) -> Self {
        Field {
            name: name.into(),
            ty,
            modifiers,
            annotations: Vec::new(),
            constant: None,
            declaring_class: declaring_class.into(),
        }
    }

    /// Compile-time constant candidates: `static final` primitives and strings.
    /// These are emitted as `constexpr` members rather than accessors.
    pub fn is_constant(&self) -> bool {
        let constant_type = match &self.ty {
            TypeDescriptor::Primitive(_) => true,
            TypeDescriptor::Declared(name) => name == "java.lang.String",
            _ => false,
        };
        constant_type && self.modifiers.is_static() && self.modifiers.is_final()
    }

    /// The explicit `(getter, setter)` request, if annotated.
    pub fn accessor_override(&self) -> Option<(bool, bool)> {
        self.annotations.iter().find_map(|a| match a {
            Annotation::FieldAccessors { getter, setter } => Some((*getter, *setter)),
            _ => None,
        })
    }
}

impl Member for Field {
    fn name(&self) -> &str {
        &self.name
    }

    fn ty(&self) -> &TypeDescriptor {
        &self.ty
    }

    fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    fn declaring_class(&self) -> &str {
        &self.declaring_class
    }

    fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    fn kind(&self) -> MemberKind {
        MemberKind::Field
    }
}

/// The capability interface every class model origin implements.
///
/// Collections are returned in declaration order; overload resolution relies
/// on that order being stable.
pub trait ClassModel {
    /// Binary name in dotted form, `$` separating nested classes
    /// (`com.example.Outer$Inner`).
    fn name(&self) -> &str;

    /// Name without package or enclosing classes (`Inner`).
    fn simple_name(&self) -> &str;

    fn modifiers(&self) -> Modifiers;

    /// For inner (non-static nested) classes, the type of the enclosing
    /// instance every constructor implicitly receives first.
    fn enclosing_instance(&self) -> Option<&TypeDescriptor>;

    fn constructors(&self) -> &[Method];

    fn methods(&self) -> &[Method];

    /// All fields, constants included.
    fn fields(&self) -> &[Field];

    fn constants(&self) -> Vec<&Field> {
        self.fields().iter().filter(|f| f.is_constant()).collect()
    }

    fn has_method(&self, name: &str) -> bool {
        self.methods().iter().any(|m| m.name == name)
    }
}

/// Simple name of a binary class name: the part after the last `.` or `$`.
pub(crate) fn simple_name_of(binary_name: &str) -> &str {
    binary_name
        .rsplit(['.', '$'])
        .next()
        .unwrap_or(binary_name)
}
