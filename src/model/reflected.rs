//! Class model read from a compiled `.class` file

use std::{fs, path::Path};

use cafebabe::{
    attributes::AttributeData, constant_pool::LiteralConstant, ClassAccessFlags, ClassFile,
    FieldAccessFlags, MethodAccessFlags,
};

use super::{
    simple_name_of, ClassModel, ConstantValue, Field, Method, Modifiers, Parameter,
    TypeDescriptor, CONSTRUCTOR_NAME,
};
use crate::error::{Error, Result};

/// A class model recovered from bytecode.
///
/// Bytecode keeps no parameter names unless compiled with `-parameters`, so
/// parameters are named `arg0`, `arg1`, ... in declaration order.
#[derive(Debug, Clone)]
pub struct ReflectedSource {
    name: String,
    simple_name: String,
    modifiers: Modifiers,
    enclosing_instance: Option<TypeDescriptor>,
    constructors: Vec<Method>,
    methods: Vec<Method>,
    fields: Vec<Field>,
}

impl ReflectedSource {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let bytes = fs::read(path.as_ref())?;
        ReflectedSource::from_bytes(&bytes)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let class = cafebabe::parse_class(bytes)?;
        ReflectedSource::from_class_file(&class)
    }

    /// Build the model from an already parsed class file.
    pub fn from_class_file(class: &ClassFile) -> Result<Self> {
        let name = class.this_class.to_string().replace('/', ".");
        if name.is_empty() {
            return Err(Error::InvalidInput("class file without a class name".into()));
        }

        let mut fields = Vec::new();
        let mut enclosing_instance = None;
        for field in &class.fields {
            let field_name = field.name.to_string();
            let ty = TypeDescriptor::from_descriptor(&field.descriptor.to_string())?;
            if field.access_flags.contains(FieldAccessFlags::SYNTHETIC) {
                // javac stores the enclosing instance of an inner class in `this$N`
                if field_name.starts_with("this$") && name.contains('$') {
                    enclosing_instance = Some(ty);
                }
                continue;
            }

            let mut converted = Field::new(
                name.as_str(),
                field_name,
                ty,
                field_modifiers(field.access_flags),
            );
            converted.constant = field.attributes.iter().find_map(|attr| match &attr.data {
                AttributeData::ConstantValue(value) => literal_value(value),
                _ => None,
            });
            fields.push(converted);
        }

        let mut constructors = Vec::new();
        let mut methods = Vec::new();
        for method in &class.methods {
            if method
                .access_flags
                .intersects(MethodAccessFlags::SYNTHETIC | MethodAccessFlags::BRIDGE)
            {
                continue;
            }
            let method_name = method.name.to_string();
            if method_name == "<clinit>" {
                continue;
            }

            let (mut params, return_type) =
                TypeDescriptor::from_method_descriptor(&method.descriptor.to_string())?;
            if method_name == CONSTRUCTOR_NAME {
                if let Some(outer) = &enclosing_instance {
                    if params.first() == Some(outer) {
                        params.remove(0);
                    }
                }
            }

            let parameters = params
                .into_iter()
                .enumerate()
                .map(|(i, ty)| Parameter::new(format!("arg{i}"), ty))
                .collect();
            let mut converted = Method::new(
                name.as_str(),
                method_name,
                return_type,
                parameters,
                method_modifiers(method.access_flags),
            );
            converted.exceptions = method
                .attributes
                .iter()
                .find_map(|attr| match &attr.data {
                    AttributeData::Exceptions(names) => Some(
                        names
                            .iter()
                            .map(|n| n.to_string().replace('/', "."))
                            .collect(),
                    ),
                    _ => None,
                })
                .unwrap_or_default();

            if converted.is_constructor() {
                constructors.push(converted);
            } else {
                methods.push(converted);
            }
        }

        Ok(ReflectedSource {
            simple_name: simple_name_of(&name).to_owned(),
            modifiers: class_modifiers(class.access_flags),
            name,
            enclosing_instance,
            constructors,
            methods,
            fields,
        })
    }
}

fn literal_value(value: &LiteralConstant) -> Option<ConstantValue> {
    match value {
        LiteralConstant::Integer(v) => Some(ConstantValue::Int(*v)),
        LiteralConstant::Long(v) => Some(ConstantValue::Long(*v)),
        LiteralConstant::Float(v) => Some(ConstantValue::Double(f64::from(*v))),
        LiteralConstant::Double(v) => Some(ConstantValue::Double(*v)),
        LiteralConstant::String(s) => Some(ConstantValue::String(s.to_string())),
        _ => None,
    }
}

fn class_modifiers(flags: ClassAccessFlags) -> Modifiers {
    let mut modifiers = Modifiers::empty();
    modifiers.set(Modifiers::PUBLIC, flags.contains(ClassAccessFlags::PUBLIC));
    modifiers.set(Modifiers::FINAL, flags.contains(ClassAccessFlags::FINAL));
    modifiers.set(Modifiers::ABSTRACT, flags.contains(ClassAccessFlags::ABSTRACT));
    modifiers
}

fn field_modifiers(flags: FieldAccessFlags) -> Modifiers {
    let mut modifiers = Modifiers::empty();
    modifiers.set(Modifiers::PUBLIC, flags.contains(FieldAccessFlags::PUBLIC));
    modifiers.set(Modifiers::PRIVATE, flags.contains(FieldAccessFlags::PRIVATE));
    modifiers.set(Modifiers::PROTECTED, flags.contains(FieldAccessFlags::PROTECTED));
    modifiers.set(Modifiers::STATIC, flags.contains(FieldAccessFlags::STATIC));
    modifiers.set(Modifiers::FINAL, flags.contains(FieldAccessFlags::FINAL));
    modifiers.set(Modifiers::VOLATILE, flags.contains(FieldAccessFlags::VOLATILE));
    modifiers.set(Modifiers::TRANSIENT, flags.contains(FieldAccessFlags::TRANSIENT));
    modifiers
}

fn method_modifiers(flags: MethodAccessFlags) -> Modifiers {
    let mut modifiers = Modifiers::empty();
    modifiers.set(Modifiers::PUBLIC, flags.contains(MethodAccessFlags::PUBLIC));
    modifiers.set(Modifiers::PRIVATE, flags.contains(MethodAccessFlags::PRIVATE));
    modifiers.set(Modifiers::PROTECTED, flags.contains(MethodAccessFlags::PROTECTED));
    modifiers.set(Modifiers::STATIC, flags.contains(MethodAccessFlags::STATIC));
    modifiers.set(Modifiers::FINAL, flags.contains(MethodAccessFlags::FINAL));
    modifiers.set(
        Modifiers::SYNCHRONIZED,
        flags.contains(MethodAccessFlags::SYNCHRONIZED),
    );
    modifiers.set(Modifiers::NATIVE, flags.contains(MethodAccessFlags::NATIVE));
    modifiers.set(Modifiers::ABSTRACT, flags.contains(MethodAccessFlags::ABSTRACT));
    modifiers.set(Modifiers::STRICT, flags.contains(MethodAccessFlags::STRICT));
    modifiers
}

impl ClassModel for ReflectedSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn simple_name(&self) -> &str {
        &self.simple_name
    }

    fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    fn enclosing_instance(&self) -> Option<&TypeDescriptor> {
        self.enclosing_instance.as_ref()
    }

    fn constructors(&self) -> &[Method] {
        &self.constructors
    }

    fn methods(&self) -> &[Method] {
        &self.methods
    }

    fn fields(&self) -> &[Field] {
        &self.fields
    }
}
