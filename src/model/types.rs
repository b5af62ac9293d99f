use std::{fmt, str::FromStr};

use combine::{
    between, eof, many, many1, optional, parser, parser::char::string, satisfy, skip_many,
    skip_many1, token, ParseError, Parser, StdParseResult, Stream,
};

use crate::error::{Error, Result};

/// A primitive java type, including `void`.
#[allow(missing_docs)]
#[derive(Eq, PartialEq, Hash, Debug, Clone, Copy)]
pub enum Primitive {
    Boolean, // Z
    Byte,    // B
    Char,    // C
    Short,   // S
    Int,     // I
    Long,    // J
    Float,   // F
    Double,  // D
    Void,    // V
}

impl Primitive {
    /// The keyword used for this type in Java source.
    pub fn java_name(self) -> &'static str {
        match self {
            Primitive::Boolean => "boolean",
            Primitive::Byte => "byte",
            Primitive::Char => "char",
            Primitive::Short => "short",
            Primitive::Int => "int",
            Primitive::Long => "long",
            Primitive::Float => "float",
            Primitive::Double => "double",
            Primitive::Void => "void",
        }
    }

    fn from_java_name(name: &str) -> Option<Primitive> {
        Some(match name {
            "boolean" => Primitive::Boolean,
            "byte" => Primitive::Byte,
            "char" => Primitive::Char,
            "short" => Primitive::Short,
            "int" => Primitive::Int,
            "long" => Primitive::Long,
            "float" => Primitive::Float,
            "double" => Primitive::Double,
            "void" => Primitive::Void,
            _ => return None,
        })
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Primitive::Boolean => write!(f, "Z"),
            Primitive::Byte => write!(f, "B"),
            Primitive::Char => write!(f, "C"),
            Primitive::Short => write!(f, "S"),
            Primitive::Int => write!(f, "I"),
            Primitive::Long => write!(f, "J"),
            Primitive::Float => write!(f, "F"),
            Primitive::Double => write!(f, "D"),
            Primitive::Void => write!(f, "V"),
        }
    }
}

/// The semantic type of a member, parameter or return value.
///
/// `Declared` carries the binary class name in dotted form, with `$` separating
/// nested classes (`java.util.Map$Entry`). `Null` is the type of the `null`
/// literal; it can appear in a class model but has no descriptor.
#[derive(Eq, PartialEq, Hash, Debug, Clone)]
pub enum TypeDescriptor {
    Primitive(Primitive),
    Array(Box<TypeDescriptor>),
    Declared(String),
    Null,
}

impl TypeDescriptor {
    pub const VOID: TypeDescriptor = TypeDescriptor::Primitive(Primitive::Void);

    pub fn declared(name: impl Into<String>) -> Self {
        TypeDescriptor::Declared(name.into())
    }

    pub fn array_of(component: TypeDescriptor) -> Self {
        TypeDescriptor::Array(Box::new(component))
    }

    pub fn is_void(&self) -> bool {
        matches!(self, TypeDescriptor::Primitive(Primitive::Void))
    }

    pub fn is_primitive(&self) -> bool {
        matches!(self, TypeDescriptor::Primitive(_))
    }

    pub fn is_array(&self) -> bool {
        matches!(self, TypeDescriptor::Array(_))
    }

    /// Number of array nesting levels (`0` for non-arrays).
    pub fn array_dimensions(&self) -> usize {
        match self {
            TypeDescriptor::Array(component) => 1 + component.array_dimensions(),
            _ => 0,
        }
    }

    /// The innermost non-array type.
    pub fn element(&self) -> &TypeDescriptor {
        match self {
            TypeDescriptor::Array(component) => component.element(),
            other => other,
        }
    }

    /// Parse a JVM field descriptor such as `[Ljava/lang/String;`.
    pub fn from_descriptor(descriptor: &str) -> Result<TypeDescriptor> {
        (parser(parse_field_type), eof())
            .map(|(ty, _)| ty)
            .parse(descriptor)
            .map(|res| res.0)
            .map_err(|e| Error::Parse(format!("{e} in descriptor `{descriptor}`")))
    }

    /// Parse a JVM method descriptor such as `(I[J)Ljava/lang/String;` into its
    /// parameter types and return type.
    pub fn from_method_descriptor(
        descriptor: &str,
    ) -> Result<(Vec<TypeDescriptor>, TypeDescriptor)> {
        (parser(parse_method), eof())
            .map(|(sig, _)| sig)
            .parse(descriptor)
            .map(|res| res.0)
            .map_err(|e| Error::Parse(format!("{e} in method descriptor `{descriptor}`")))
    }

    /// Parse a type name as written in Java source or reported by reflection:
    /// `int`, `java.lang.String[]`, `java.util.List<java.lang.String>`, `Object...`.
    ///
    /// Type arguments are dropped, varargs become one more array level.
    pub fn from_java_name(name: &str) -> Result<TypeDescriptor> {
        let trimmed = name.trim();
        (parser(parse_java_name), eof())
            .map(|(ty, _)| ty)
            .parse(trimmed)
            .map(|res| res.0)
            .map_err(|e| Error::Parse(format!("{e} in type name `{name}`")))
    }

    /// The type as Java source spells it.
    pub fn java_name(&self) -> String {
        match self {
            TypeDescriptor::Primitive(p) => p.java_name().to_owned(),
            TypeDescriptor::Array(component) => format!("{}[]", component.java_name()),
            TypeDescriptor::Declared(name) => name.clone(),
            TypeDescriptor::Null => "null".to_owned(),
        }
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.java_name())
    }
}

impl FromStr for TypeDescriptor {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        TypeDescriptor::from_java_name(s)
    }
}

impl From<Primitive> for TypeDescriptor {
    fn from(primitive: Primitive) -> Self {
        TypeDescriptor::Primitive(primitive)
    }
}

fn parse_primitive<S: Stream<Token = char>>(input: &mut S) -> StdParseResult<Primitive, S>
where
    S::Error: ParseError<char, S::Range, S::Position>,
{
    let boolean = token('Z').map(|_| Primitive::Boolean);
    let byte = token('B').map(|_| Primitive::Byte);
    let char_type = token('C').map(|_| Primitive::Char);
    let short = token('S').map(|_| Primitive::Short);
    let int = token('I').map(|_| Primitive::Int);
    let long = token('J').map(|_| Primitive::Long);
    let float = token('F').map(|_| Primitive::Float);
    let double = token('D').map(|_| Primitive::Double);
    let void = token('V').map(|_| Primitive::Void);

    (boolean
        .or(byte)
        .or(char_type)
        .or(short)
        .or(int)
        .or(long)
        .or(float)
        .or(double)
        .or(void))
    .parse_stream(input)
    .into()
}

fn parse_array<S: Stream<Token = char>>(input: &mut S) -> StdParseResult<TypeDescriptor, S>
where
    S::Error: ParseError<char, S::Range, S::Position>,
{
    (token('['), parser(parse_field_type))
        .map(|(_, ty)| TypeDescriptor::array_of(ty))
        .parse_stream(input)
        .into()
}

fn parse_object<S: Stream<Token = char>>(input: &mut S) -> StdParseResult<TypeDescriptor, S>
where
    S::Error: ParseError<char, S::Range, S::Position>,
{
    between(
        token('L'),
        token(';'),
        many1::<String, _, _>(satisfy(|c: char| c != ';')),
    )
    .map(|internal| TypeDescriptor::Declared(internal.replace('/', ".")))
    .parse_stream(input)
    .into()
}

fn parse_field_type<S: Stream<Token = char>>(input: &mut S) -> StdParseResult<TypeDescriptor, S>
where
    S::Error: ParseError<char, S::Range, S::Position>,
{
    parser(parse_primitive)
        .map(TypeDescriptor::Primitive)
        .or(parser(parse_array))
        .or(parser(parse_object))
        .parse_stream(input)
        .into()
}

fn parse_method<S: Stream<Token = char>>(
    input: &mut S,
) -> StdParseResult<(Vec<TypeDescriptor>, TypeDescriptor), S>
where
    S::Error: ParseError<char, S::Range, S::Position>,
{
    (
        between(
            token('('),
            token(')'),
            many::<Vec<_>, _, _>(parser(parse_field_type)),
        ),
        parser(parse_field_type),
    )
        .parse_stream(input)
        .into()
}

fn skip_type_arguments<S: Stream<Token = char>>(input: &mut S) -> StdParseResult<(), S>
where
    S::Error: ParseError<char, S::Range, S::Position>,
{
    between(
        token('<'),
        token('>'),
        skip_many(parser(skip_type_arguments).or(skip_many1(satisfy(|c: char| c != '<' && c != '>')))),
    )
    .parse_stream(input)
    .into()
}

fn parse_java_name<S: Stream<Token = char>>(input: &mut S) -> StdParseResult<TypeDescriptor, S>
where
    S::Error: ParseError<char, S::Range, S::Position>,
{
    let name = many1::<String, _, _>(satisfy(|c: char| {
        c.is_alphanumeric() || c == '_' || c == '$' || c == '.'
    }));
    let dimensions = many::<Vec<_>, _, _>(string("[]")).map(|dims| dims.len());
    let varargs = optional(string("...")).map(|dots| usize::from(dots.is_some()));

    (name, optional(parser(skip_type_arguments)), dimensions, varargs)
        .map(|(name, _, dimensions, varargs)| {
            // `Object...` lexes as one dotted name
            let (name, varargs) = match name.strip_suffix("...") {
                Some(stripped) => (stripped.to_owned(), varargs + 1),
                None => (name, varargs),
            };
            let base = match Primitive::from_java_name(&name) {
                Some(primitive) => TypeDescriptor::Primitive(primitive),
                None if name == "null" => TypeDescriptor::Null,
                None => TypeDescriptor::Declared(name),
            };
            (0..dimensions + varargs).fold(base, |ty, _| TypeDescriptor::array_of(ty))
        })
        .parse_stream(input)
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_field_descriptors() {
        assert_eq!(
            TypeDescriptor::from_descriptor("I").unwrap(),
            TypeDescriptor::Primitive(Primitive::Int)
        );
        assert_eq!(
            TypeDescriptor::from_descriptor("[[Ljava/lang/String;").unwrap(),
            TypeDescriptor::array_of(TypeDescriptor::array_of(TypeDescriptor::declared(
                "java.lang.String"
            )))
        );
        assert_eq!(
            TypeDescriptor::from_descriptor("Lcom/example/Outer$Inner;").unwrap(),
            TypeDescriptor::declared("com.example.Outer$Inner")
        );
    }

    #[test]
    fn parse_method_descriptor() {
        let (params, ret) = TypeDescriptor::from_method_descriptor("(I[JLjava/lang/String;)V")
            .unwrap();
        assert_eq!(
            params,
            vec![
                TypeDescriptor::Primitive(Primitive::Int),
                TypeDescriptor::array_of(TypeDescriptor::Primitive(Primitive::Long)),
                TypeDescriptor::declared("java.lang.String"),
            ]
        );
        assert!(ret.is_void());

        let (params, _) = TypeDescriptor::from_method_descriptor("()Z").unwrap();
        assert!(params.is_empty());
    }

    #[test]
    fn reject_malformed_descriptors() {
        assert!(TypeDescriptor::from_descriptor("Ljava/lang/String").is_err());
        assert!(TypeDescriptor::from_descriptor("Q").is_err());
        assert!(TypeDescriptor::from_descriptor("II").is_err());
        assert!(TypeDescriptor::from_method_descriptor("(I").is_err());
    }

    #[test]
    fn parse_java_names() {
        assert_eq!(
            "long".parse::<TypeDescriptor>().unwrap(),
            TypeDescriptor::Primitive(Primitive::Long)
        );
        assert_eq!(
            "java.lang.String[][]".parse::<TypeDescriptor>().unwrap(),
            TypeDescriptor::array_of(TypeDescriptor::array_of(TypeDescriptor::declared(
                "java.lang.String"
            )))
        );
        assert_eq!(
            "java.util.Map<java.lang.String, java.util.List<Integer>>"
                .parse::<TypeDescriptor>()
                .unwrap(),
            TypeDescriptor::declared("java.util.Map")
        );
        assert_eq!(
            "java.lang.Object...".parse::<TypeDescriptor>().unwrap(),
            TypeDescriptor::array_of(TypeDescriptor::declared("java.lang.Object"))
        );
        assert_eq!("null".parse::<TypeDescriptor>().unwrap(), TypeDescriptor::Null);
        assert!("int[".parse::<TypeDescriptor>().is_err());
        assert!("".parse::<TypeDescriptor>().is_err());
    }

    #[test]
    fn java_names_and_dimensions() {
        let ty = TypeDescriptor::from_descriptor("[[[B").unwrap();
        assert_eq!(ty.array_dimensions(), 3);
        assert_eq!(ty.element(), &TypeDescriptor::Primitive(Primitive::Byte));
        assert_eq!(ty.java_name(), "byte[][][]");
        assert_eq!(TypeDescriptor::VOID.to_string(), "void");
    }
}
