use std::collections::HashSet;

use once_cell::sync::Lazy;

use crate::{
    descriptor, mangle,
    model::{Member, Parameter},
    resolver, Result,
};

/// Parameter names every generated function may already use.
static GENERATED_PARAMETERS: Lazy<HashSet<&'static str>> =
    Lazy::new(|| HashSet::from(["env", "thiz", "clazz", "enclosingClass", "state"]));

/// A parameter ready to be written into C++.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamView {
    /// C++-safe name, never clashing with keywords or generated parameters.
    pub name: String,
    pub native_type: &'static str,
    pub java_type: String,
    pub is_object: bool,
}

impl ParamView {
    /// `jint count` (raw) or `const ::jnicpp::LocalRef<jstring>& name` (helper).
    pub fn declaration(&self, helper: bool) -> String {
        if helper && self.is_object {
            format!("const {}& {}", helper_ref(self.native_type), self.name)
        } else {
            format!("{} {}", self.native_type, self.name)
        }
    }

    /// Expression passing the parameter on to JNI.
    pub fn argument(&self, helper: bool) -> String {
        if helper && self.is_object {
            format!("{}.get()", self.name)
        } else {
            self.name.clone()
        }
    }
}

/// `::jnicpp::LocalRef<jstring>`
pub fn helper_ref(native_type: &str) -> String {
    format!("::jnicpp::LocalRef<{native_type}>")
}

pub(crate) fn sanitize(name: &str, position: usize) -> String {
    let name = if name.trim().is_empty() {
        format!("arg{position}")
    } else {
        mangle::cpp_identifier(name.trim())
    };
    if resolver::is_reserved_word(&name) || GENERATED_PARAMETERS.contains(name.as_str()) {
        format!("{name}_")
    } else {
        name
    }
}

pub fn param_views(member: &dyn Member) -> Result<Vec<ParamView>> {
    param_list(member.parameters())
        .map_err(|e| e.in_member(|| descriptor::java_declaration(member)))
}

fn param_list(params: &[Parameter]) -> Result<Vec<ParamView>> {
    params
        .iter()
        .enumerate()
        .map(|(i, p)| {
            Ok(ParamView {
                name: sanitize(&p.name, i),
                native_type: descriptor::native_type_name(&p.ty)?,
                java_type: p.ty.java_name(),
                is_object: !p.ty.is_primitive(),
            })
        })
        .collect()
}

/// `, jint a, jint b` for appending after the leading JNI parameters.
pub fn declarations(params: &[ParamView], helper: bool) -> String {
    params
        .iter()
        .map(|p| format!(", {}", p.declaration(helper)))
        .collect()
}

/// `, a, b` for appending after the id argument of a JNI call.
pub fn arguments(params: &[ParamView], helper: bool) -> String {
    params
        .iter()
        .map(|p| format!(", {}", p.argument(helper)))
        .collect()
}

/// `int a, java.lang.String b` for comments.
pub fn java_parameters(params: &[ParamView]) -> String {
    params
        .iter()
        .map(|p| format!("{} {}", p.java_type, p.name))
        .collect::<Vec<_>>()
        .join(", ")
}
