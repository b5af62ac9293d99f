//! Overload resolution.
//!
//! C++ proxies expose every Java method as a C++ function, and every member
//! gets a cache slot in the class init state. Overloads and names that are
//! C++ keywords need a suffix; every member needs an index that makes its
//! slot unique among members of the same name.

use std::collections::{HashMap, HashSet};

use log::debug;
use once_cell::sync::Lazy;

use crate::{
    class_info::ClassInfo,
    descriptor, mangle,
    model::{Member, MemberKind, Method, TypeDescriptor},
    Result,
};

/// Name every constructor factory gets in the proxy.
pub const CONSTRUCTOR_FACTORY: &str = "newInstance";

/// C++ keywords and alternative tokens, plus the names of functions every
/// proxy already defines.
static RESERVED_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    HashSet::from([
        "alignas", "alignof", "and", "and_eq", "asm", "auto", "bitand", "bitor", "bool", "break",
        "case", "catch", "char", "char8_t", "char16_t", "char32_t", "class", "compl", "concept",
        "const", "consteval", "constexpr", "constinit", "const_cast", "continue", "co_await",
        "co_return", "co_yield", "decltype", "default", "delete", "do", "double", "dynamic_cast",
        "else", "enum", "explicit", "export", "extern", "false", "float", "for", "friend", "goto",
        "if", "inline", "int", "long", "mutable", "namespace", "new", "noexcept", "not", "not_eq",
        "nullptr", "operator", "or", "or_eq", "private", "protected", "public", "register",
        "reinterpret_cast", "requires", "return", "short", "signed", "sizeof", "static",
        "static_assert", "static_cast", "struct", "switch", "template", "this", "thread_local",
        "throw", "true", "try", "typedef", "typeid", "typename", "union", "unsigned", "using",
        "virtual", "void", "volatile", "wchar_t", "while", "xor", "xor_eq", "NULL", "assert",
        // generated into every proxy
        "initClazz", "releaseClazz", "assertInited", "getClassInitState", "newInstance",
        "getThis", "FULL_CLASS_NAME",
    ])
});

/// Whether `name` cannot be used verbatim as a generated C++ function name.
pub fn is_reserved_word(name: &str) -> bool {
    RESERVED_WORDS.contains(name)
}

/// A member annotated with its overload index and optional name suffix.
///
/// Created by [`OverloadResolver::resolve`] and only read afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedMember<'a, M> {
    member: &'a M,
    index: usize,
    suffix: Option<String>,
}

impl<'a, M: Member> ResolvedMember<'a, M> {
    pub fn member(&self) -> &'a M {
        self.member
    }

    /// Zero-based occurrence of this member among members of the same name.
    pub fn index(&self) -> usize {
        self.index
    }

    /// `__` + signature token, appended verbatim to methods and to the
    /// constructor factory name alike.
    pub fn suffix(&self) -> Option<&str> {
        self.suffix.as_deref()
    }

    /// Identifier of the cached id in the class init state.
    pub fn slot_name(&self) -> String {
        let name = mangle::cpp_identifier(self.member.name());
        match self.member.kind() {
            MemberKind::Constructor => format!("sConstruct_{}", self.index),
            MemberKind::Method => format!("sMethod_{}_{}", name, self.index),
            MemberKind::Field => format!("sField_{}_{}", name, self.index),
        }
    }
}

impl ResolvedMember<'_, Method> {
    /// Name of the generated C++ function.
    pub fn cpp_name(&self) -> String {
        if self.member.is_constructor() {
            return format!("{}{}", CONSTRUCTOR_FACTORY, self.suffix().unwrap_or_default());
        }
        let name = mangle::cpp_identifier(&self.member.name);
        match self.suffix() {
            Some(suffix) => format!("{name}{suffix}"),
            None => name,
        }
    }
}

/// Decides suffixes and indices for the members of one class.
#[derive(Debug, Clone, Copy)]
pub struct OverloadResolver<'c> {
    enclosing_instance: Option<&'c TypeDescriptor>,
}

impl<'c> OverloadResolver<'c> {
    pub fn new(class: &'c ClassInfo) -> Self {
        OverloadResolver {
            enclosing_instance: class.enclosing_instance(),
        }
    }

    /// Resolve `members` in the given order.
    ///
    /// Input order is the only ordering guarantee: indices count occurrences
    /// in iteration order and nothing is sorted.
    pub fn resolve<'m, M: Member>(&self, members: &'m [M]) -> Result<Vec<ResolvedMember<'m, M>>> {
        let mut name_counts: HashMap<&str, usize> = HashMap::new();
        for member in members {
            *name_counts.entry(member.name()).or_default() += 1;
        }

        let mut seen: HashMap<&str, usize> = HashMap::new();
        let mut resolved = Vec::with_capacity(members.len());
        for member in members {
            let occurrence = seen.entry(member.name()).or_default();
            let index = *occurrence;
            *occurrence += 1;

            let overloaded = name_counts[member.name()] > 1;
            let needs_suffix = match member.kind() {
                MemberKind::Field => false,
                MemberKind::Constructor => overloaded,
                MemberKind::Method => overloaded || is_reserved_word(member.name()),
            };
            let suffix = if needs_suffix {
                Some(self.suffix_for(member)?)
            } else {
                None
            };
            debug!(
                "resolved {}: index {}, suffix {:?}",
                descriptor::java_declaration(member),
                index,
                suffix
            );

            resolved.push(ResolvedMember {
                member,
                index,
                suffix,
            });
        }
        Ok(resolved)
    }

    fn suffix_for<M: Member>(&self, member: &M) -> Result<String> {
        let implicit = self
            .enclosing_instance
            .filter(|_| member.kind() == MemberKind::Constructor);
        let params = implicit
            .into_iter()
            .chain(member.parameters().iter().map(|p| &p.ty));
        let encoded = descriptor::encode_parameters(params)
            .map_err(|e| e.in_member(|| descriptor::java_declaration(member)))?;
        Ok(format!("__{}", mangle::signature_token(&encoded)))
    }
}
