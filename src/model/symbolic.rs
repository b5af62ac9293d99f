//! Class model read from a JSON symbol table.
//!
//! The format mirrors what a compile-time symbol walk reports: type names are
//! written the way Java source spells them and modifiers as keywords.
//!
//! ```json
//! {
//!   "name": "com.example.Foo",
//!   "modifiers": ["public"],
//!   "methods": [
//!     {
//!       "name": "add",
//!       "return_type": "int",
//!       "modifiers": ["public", "static", "native"],
//!       "parameters": [{ "name": "a", "type": "int" }, { "name": "b", "type": "int" }]
//!     }
//!   ],
//!   "fields": [{ "name": "name", "type": "java.lang.String", "modifiers": ["public"] }]
//! }
//! ```

use std::{fs, path::Path};

use serde::Deserialize;

use super::{
    simple_name_of, Annotation, ClassModel, ConstantValue, Field, Method, Modifiers, Parameter,
    TypeDescriptor,
};
use crate::error::{Error, Result};

#[derive(Debug, Deserialize)]
struct RawClass {
    #[serde(default)]
    name: String,
    #[serde(default)]
    simple_name: Option<String>,
    #[serde(default)]
    modifiers: Vec<String>,
    #[serde(default)]
    enclosing_instance: Option<String>,
    #[serde(default)]
    constructors: Vec<RawMethod>,
    #[serde(default)]
    methods: Vec<RawMethod>,
    #[serde(default)]
    fields: Vec<RawField>,
}

#[derive(Debug, Deserialize)]
struct RawMethod {
    #[serde(default)]
    name: String,
    #[serde(default = "void_type")]
    return_type: String,
    #[serde(default)]
    modifiers: Vec<String>,
    #[serde(default)]
    parameters: Vec<RawParameter>,
    #[serde(default)]
    exceptions: Vec<String>,
    #[serde(default)]
    annotations: Vec<Annotation>,
}

#[derive(Debug, Deserialize)]
struct RawParameter {
    name: String,
    #[serde(rename = "type")]
    ty: String,
}

#[derive(Debug, Deserialize)]
struct RawField {
    name: String,
    #[serde(rename = "type")]
    ty: String,
    #[serde(default)]
    modifiers: Vec<String>,
    #[serde(default)]
    annotations: Vec<Annotation>,
    #[serde(default)]
    constant: Option<ConstantValue>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(RawClass),
    Many(Vec<RawClass>),
}

fn void_type() -> String {
    "void".to_owned()
}

/// A class model built from compile-time symbols.
#[derive(Debug, Clone)]
pub struct SymbolicSource {
    name: String,
    simple_name: String,
    modifiers: Modifiers,
    enclosing_instance: Option<TypeDescriptor>,
    constructors: Vec<Method>,
    methods: Vec<Method>,
    fields: Vec<Field>,
}

impl SymbolicSource {
    /// An empty public class, to be filled with the `with_*` methods.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        SymbolicSource {
            simple_name: simple_name_of(&name).to_owned(),
            name,
            modifiers: Modifiers::PUBLIC,
            enclosing_instance: None,
            constructors: Vec::new(),
            methods: Vec::new(),
            fields: Vec::new(),
        }
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Mark the class as inner class of `outer`.
    pub fn with_enclosing_instance(mut self, outer: TypeDescriptor) -> Self {
        self.enclosing_instance = Some(outer);
        self
    }

    pub fn with_constructor(mut self, parameters: Vec<Parameter>, modifiers: Modifiers) -> Self {
        let ctor = Method::constructor(self.name.clone(), parameters, modifiers);
        self.constructors.push(ctor);
        self
    }

    pub fn with_method(
        mut self,
        name: impl Into<String>,
        return_type: TypeDescriptor,
        parameters: Vec<Parameter>,
        modifiers: Modifiers,
    ) -> Self {
        let method = Method::new(self.name.clone(), name, return_type, parameters, modifiers);
        self.methods.push(method);
        self
    }

    /// Add a fully populated method, e.g. one carrying annotations.
    pub fn with_method_decl(mut self, mut method: Method) -> Self {
        method.declaring_class = self.name.clone();
        if method.is_constructor() {
            self.constructors.push(method);
        } else {
            self.methods.push(method);
        }
        self
    }

    pub fn with_field(mut self, mut field: Field) -> Self {
        field.declaring_class = self.name.clone();
        self.fields.push(field);
        self
    }

    /// Parse a single class description.
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: RawClass = serde_json::from_str(json)?;
        SymbolicSource::from_raw(raw)
    }

    /// Parse a file holding either one class description or an array of them.
    pub fn load(path: impl AsRef<Path>) -> Result<Vec<Self>> {
        let json = fs::read_to_string(path.as_ref())?;
        SymbolicSource::from_json_many(&json)
    }

    /// Parse either one class description or an array of them.
    pub fn from_json_many(json: &str) -> Result<Vec<Self>> {
        match serde_json::from_str(json)? {
            OneOrMany::One(raw) => Ok(vec![SymbolicSource::from_raw(raw)?]),
            OneOrMany::Many(raws) => raws.into_iter().map(SymbolicSource::from_raw).collect(),
        }
    }

    fn from_raw(raw: RawClass) -> Result<Self> {
        let name = raw.name;
        let simple_name = raw
            .simple_name
            .unwrap_or_else(|| simple_name_of(&name).to_owned());
        let enclosing_instance = raw
            .enclosing_instance
            .as_deref()
            .map(TypeDescriptor::from_java_name)
            .transpose()?;

        let constructors = raw
            .constructors
            .into_iter()
            .map(|mut raw_ctor| {
                raw_ctor.name = super::CONSTRUCTOR_NAME.to_owned();
                raw_ctor.return_type = void_type();
                convert_method(&name, raw_ctor)
            })
            .collect::<Result<Vec<_>>>()?;
        let methods = raw
            .methods
            .into_iter()
            .map(|raw_method| convert_method(&name, raw_method))
            .collect::<Result<Vec<_>>>()?;
        let fields = raw
            .fields
            .into_iter()
            .map(|raw_field| convert_field(&name, raw_field))
            .collect::<Result<Vec<_>>>()?;

        Ok(SymbolicSource {
            modifiers: parse_modifiers(&raw.modifiers)?,
            name,
            simple_name,
            enclosing_instance,
            constructors,
            methods,
            fields,
        })
    }
}

fn parse_modifiers(keywords: &[String]) -> Result<Modifiers> {
    keywords.iter().try_fold(Modifiers::empty(), |acc, keyword| {
        Modifiers::from_keyword(keyword)
            .map(|m| acc | m)
            .ok_or_else(|| Error::Parse(format!("unknown modifier `{keyword}`")))
    })
}

fn convert_method(class_name: &str, raw: RawMethod) -> Result<Method> {
    if raw.name.is_empty() {
        return Err(Error::InvalidInput(format!(
            "method without a name in {class_name}"
        )));
    }
    let parameters = raw
        .parameters
        .into_iter()
        .map(|p| Ok(Parameter::new(p.name, TypeDescriptor::from_java_name(&p.ty)?)))
        .collect::<Result<Vec<_>>>()?;
    let mut method = Method::new(
        class_name,
        raw.name,
        TypeDescriptor::from_java_name(&raw.return_type)?,
        parameters,
        parse_modifiers(&raw.modifiers)?,
    );
    method.exceptions = raw.exceptions;
    method.annotations = raw.annotations;
    Ok(method)
}

fn convert_field(class_name: &str, raw: RawField) -> Result<Field> {
    let mut field = Field::new(
        class_name,
        raw.name,
        TypeDescriptor::from_java_name(&raw.ty)?,
        parse_modifiers(&raw.modifiers)?,
    );
    field.annotations = raw.annotations;
    field.constant = raw.constant;
    Ok(field)
}

impl ClassModel for SymbolicSource {
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

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::model::{Member, Primitive};

    const FOO: &str = r#"{
        "name": "com.example.Foo",
        "modifiers": ["public"],
        "constructors": [
            { "modifiers": ["public"], "parameters": [{ "name": "seed", "type": "long" }] }
        ],
        "methods": [
            {
                "name": "add",
                "return_type": "int",
                "modifiers": ["public", "static", "native"],
                "parameters": [{ "name": "a", "type": "int" }, { "name": "b", "type": "int" }]
            },
            {
                "name": "names",
                "return_type": "java.util.List<java.lang.String>",
                "modifiers": ["public"],
                "exceptions": ["java.io.IOException"],
                "annotations": [{ "kind": "method_proxy", "enabled": false }, { "kind": "nullable" }]
            }
        ],
        "fields": [
            { "name": "MAX", "type": "int", "modifiers": ["public", "static", "final"], "constant": 10 },
            { "name": "name", "type": "java.lang.String", "modifiers": ["public"],
              "annotations": [{ "kind": "field_accessors", "getter": true }] }
        ]
    }"#;

    #[test]
    fn parse_class_description() {
        let class = SymbolicSource::from_json(FOO).unwrap();
        assert_eq!(class.name(), "com.example.Foo");
        assert_eq!(class.simple_name(), "Foo");
        assert_eq!(class.constructors().len(), 1);
        assert!(class.constructors()[0].is_constructor());

        let add = &class.methods()[0];
        assert_eq!(add.modifiers().to_string(), "public static native");
        assert_eq!(add.parameters()[1].name, "b");
        assert_eq!(add.return_type, TypeDescriptor::Primitive(Primitive::Int));

        let names = &class.methods()[1];
        assert_eq!(names.return_type, TypeDescriptor::declared("java.util.List"));
        assert_eq!(names.exceptions, vec!["java.io.IOException".to_owned()]);
        assert_eq!(names.proxy_override(), Some(false));
        assert_eq!(names.annotations[1], Annotation::Other);

        let constants = class.constants();
        assert_eq!(constants.len(), 1);
        assert_eq!(constants[0].constant, Some(ConstantValue::Int(10)));
        assert_eq!(class.fields()[1].accessor_override(), Some((true, false)));
    }

    #[test]
    fn parse_many() {
        let json = format!("[{FOO}, {{ \"name\": \"com.example.Bar\" }}]");
        let classes = SymbolicSource::from_json_many(&json).unwrap();
        assert_eq!(classes.len(), 2);
        assert_eq!(classes[1].simple_name(), "Bar");
    }

    #[test]
    fn reject_unknown_modifier() {
        let json = r#"{ "name": "a.B", "modifiers": ["sealed"] }"#;
        assert_matches!(SymbolicSource::from_json(json), Err(Error::Parse(_)));
    }

    #[test]
    fn reject_bad_type_name() {
        let json = r#"{ "name": "a.B", "fields": [{ "name": "x", "type": "int[" }] }"#;
        assert_matches!(SymbolicSource::from_json(json), Err(Error::Parse(_)));
    }

    #[test]
    fn builder_methods() {
        let class = SymbolicSource::new("a.Outer$Inner")
            .with_enclosing_instance(TypeDescriptor::declared("a.Outer"))
            .with_constructor(vec![], Modifiers::PUBLIC)
            .with_field(Field::new(
                "",
                "count",
                TypeDescriptor::Primitive(Primitive::Int),
                Modifiers::PRIVATE,
            ));
        assert_eq!(class.simple_name(), "Inner");
        assert_eq!(class.fields()[0].declaring_class(), "a.Outer$Inner");
        assert_eq!(
            class.enclosing_instance(),
            Some(&TypeDescriptor::declared("a.Outer"))
        );
    }
}
