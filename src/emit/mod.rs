//! C++ code emission.
//!
//! Each emitter first turns a class model into a context of plain,
//! pre-computed views (names, JNI types, descriptors, cache slots) and then
//! hands that context to a renderer. The builtin renderers build the text
//! directly; another renderer (a template engine, say) only has to implement
//! [`GlueRenderer`] or [`ProxyRenderer`].

use crate::model::{Member, MemberKind};

pub mod constants;
pub mod glue;
pub mod helper;
pub mod params;
pub mod proxy;

pub use constants::ConstantView;
pub use glue::{DefaultGlueRenderer, GlueContext, GlueEmitter, GlueRenderer, NativeMethodView};
pub use helper::{jni_helper_header, JNI_HELPER_HEADER};
pub use params::ParamView;
pub use proxy::{
    ConstructorView, DefaultProxyRenderer, FieldView, MethodView, ProxyContext, ProxyEmitter,
    ProxyRenderer,
};

/// Banner at the top of every generated file.
pub const NOTICE: &str = "\
/**
 * Generated by jni-cppgen. Do not edit: changes are lost when the file is regenerated.
 */
";

/// A generated file: a name relative to its output directory plus content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub name: String,
    pub content: String,
}

/// Everything generated for one class by one emitter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedClass {
    pub header: GeneratedFile,
    pub source: Option<GeneratedFile>,
}

impl GeneratedClass {
    pub fn files(&self) -> impl Iterator<Item = &GeneratedFile> {
        std::iter::once(&self.header).chain(self.source.as_ref())
    }
}

/// The Java declaration of a member, for comments:
/// `public static native int add(int a, int b)`.
pub(crate) fn java_signature(member: &dyn Member, params: &[ParamView], simple_name: &str) -> String {
    let modifiers = member.modifiers().to_string();
    let prefix = if modifiers.is_empty() {
        String::new()
    } else {
        format!("{modifiers} ")
    };
    match member.kind() {
        MemberKind::Constructor => format!(
            "{prefix}{simple_name}({})",
            params::java_parameters(params)
        ),
        MemberKind::Method => format!(
            "{prefix}{} {}({})",
            member.ty().java_name(),
            member.name(),
            params::java_parameters(params)
        ),
        MemberKind::Field => format!("{prefix}{} {}", member.ty().java_name(), member.name()),
    }
}

/// Push `text` followed by a newline, unless `text` is empty.
pub(crate) fn push_line(out: &mut String, text: &str) {
    if !text.is_empty() {
        out.push_str(text);
        out.push('\n');
    }
}
