//! Aggregation of every proxy's `initClazz` into one `initAllProxies`.
//!
//! The fusion header is its own persistence: the set of classes already
//! merged is read back from the generated text between the two init-block
//! markers, one [`FusionRegistry`] per file, and never cached elsewhere.

use std::{fs, io, path::Path};

use combine::{
    attempt, between, eof, many1, optional, parser, parser::char::spaces,
    parser::char::string, satisfy, sep_by1, token, ParseError, Parser, StdParseResult, Stream,
};
use log::{debug, info};

use crate::{
    config::Namespace,
    emit::NOTICE,
    error::{Error, Result},
};

pub const BEGIN_MARKER: &str = "// begin-init-block";
pub const END_MARKER: &str = "// end-init-block";

/// Namespace everything the fusion header defines lives in.
pub const FUSION_NAMESPACE: &str = "jnicpp";

/// One proxy to be merged into a fusion header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FusionEntry {
    /// `a::b`, empty for the global namespace.
    pub namespace: String,
    /// Proxy class name (`FooProxy`).
    pub class_name: String,
    /// Header declaring the proxy, as it is `#include`d.
    pub header: String,
}

impl FusionEntry {
    pub fn new(namespace: &Namespace, class_name: impl Into<String>, header: impl Into<String>) -> Self {
        FusionEntry {
            namespace: namespace.path(),
            class_name: class_name.into(),
            header: header.into(),
        }
    }
}

/// The `(namespace, class)` pairs and includes a fusion header holds, in
/// insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FusionRegistry {
    includes: Vec<String>,
    entries: Vec<(String, String)>,
}

impl FusionRegistry {
    pub fn new() -> Self {
        FusionRegistry::default()
    }

    /// Rebuild the registry from a fusion header.
    ///
    /// Content without a begin marker (an empty or foreign file) yields an
    /// empty registry.
    pub fn parse(content: &str) -> Result<Self> {
        let mut registry = FusionRegistry::new();
        for line in content.lines() {
            if let Some(include) = parse_include(line.trim()) {
                if !registry.includes.contains(&include) {
                    registry.includes.push(include);
                }
            }
        }

        let Some(begin) = content.find(BEGIN_MARKER) else {
            return Ok(registry);
        };
        let block = &content[begin + BEGIN_MARKER.len()..];
        let end = block
            .find(END_MARKER)
            .ok_or_else(|| Error::Parse(format!("`{BEGIN_MARKER}` without `{END_MARKER}`")))?;

        for line in block[..end].lines().map(str::trim).filter(|l| !l.is_empty()) {
            let (namespace, class_name) = parse_term(line)?;
            if !registry.contains(&namespace, &class_name) {
                registry.entries.push((namespace, class_name));
            }
        }
        Ok(registry)
    }

    pub fn includes(&self) -> &[String] {
        &self.includes
    }

    pub fn entries(&self) -> &[(String, String)] {
        &self.entries
    }

    pub fn contains(&self, namespace: &str, class_name: &str) -> bool {
        self.entries
            .iter()
            .any(|(ns, class)| ns == namespace && class == class_name)
    }

    /// Add `entry` unless present; its include is added independently, so
    /// neither is ever duplicated. Returns whether anything changed.
    pub fn insert(&mut self, entry: &FusionEntry) -> bool {
        let mut changed = false;
        if !self.includes.contains(&entry.header) {
            self.includes.push(entry.header.clone());
            changed = true;
        }
        if !self.contains(&entry.namespace, &entry.class_name) {
            self.entries
                .push((entry.namespace.clone(), entry.class_name.clone()));
            changed = true;
        }
        changed
    }

    pub fn render(&self) -> String {
        let mut out = String::from(NOTICE);
        out.push_str("#pragma once\n\n#include <jni.h>\n");
        for include in &self.includes {
            out.push_str(&format!("#include \"{include}\"\n"));
        }
        out.push('\n');
        out.push_str(&format!("namespace {FUSION_NAMESPACE} {{\n\n"));
        out.push_str("inline bool initAllProxies(JNIEnv* env) {\n");
        out.push_str("    bool success = true\n");
        out.push_str(&format!("            {BEGIN_MARKER}\n"));
        for (namespace, class_name) in &self.entries {
            out.push_str(&format!("            && {}\n", init_term(namespace, class_name)));
        }
        out.push_str(&format!("            {END_MARKER}\n"));
        out.push_str("            ;\n");
        out.push_str("    return success;\n");
        out.push_str("}\n\n");
        out.push_str(&format!("}} // endof namespace {FUSION_NAMESPACE}\n"));
        out
    }
}

/// `::a::b::FooProxy::initClazz(env)`
fn init_term(namespace: &str, class_name: &str) -> String {
    format!("::{}::initClazz(env)", Namespace::new(namespace).qualify(class_name))
}

/// Merge `entry` into the fusion header `existing` (empty for a new file).
pub fn merge(existing: &str, entry: &FusionEntry) -> Result<String> {
    let mut registry = FusionRegistry::parse(existing)?;
    if !registry.insert(entry) {
        debug!("{} already fused", entry.class_name);
    }
    Ok(registry.render())
}

/// Read-modify-write of the fusion header at `path`, creating it if needed.
///
/// Each call is one logical step; concurrent callers on the same file must be
/// serialised by the caller.
pub fn merge_into_file(path: &Path, entry: &FusionEntry) -> Result<()> {
    let existing = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == io::ErrorKind::NotFound => String::new(),
        Err(err) => return Err(err.into()),
    };
    let merged = merge(&existing, entry)?;
    if merged != existing {
        fs::write(path, merged)?;
        info!("Fused {} into {}", entry.class_name, path.display());
    }
    Ok(())
}

fn identifier<S: Stream<Token = char>>(input: &mut S) -> StdParseResult<String, S>
where
    S::Error: ParseError<char, S::Range, S::Position>,
{
    many1::<String, _, _>(satisfy(|c: char| c.is_ascii_alphanumeric() || c == '_'))
        .parse_stream(input)
        .into()
}

fn init_call<S: Stream<Token = char>>(input: &mut S) -> StdParseResult<Vec<String>, S>
where
    S::Error: ParseError<char, S::Range, S::Position>,
{
    (
        string("&&"),
        spaces(),
        optional(attempt(string("::"))),
        sep_by1::<Vec<_>, _, _, _>(parser(identifier), attempt(string("::"))),
        between(token('('), token(')'), string("env")),
        spaces(),
    )
        .map(|(_, _, _, path, _, _)| path)
        .parse_stream(input)
        .into()
}

/// Split `&& ::a::b::FooProxy::initClazz(env)` into `("a::b", "FooProxy")`.
fn parse_term(line: &str) -> Result<(String, String)> {
    let invalid = || Error::Parse(format!("unexpected line in init block: `{line}`"));
    let (mut path, _) = (parser(init_call), eof())
        .map(|(path, _)| path)
        .parse(line)
        .map_err(|_| invalid())?;

    if path.pop().as_deref() != Some("initClazz") {
        return Err(invalid());
    }
    let class_name = path.pop().ok_or_else(invalid)?;
    Ok((path.join("::"), class_name))
}

fn parse_include(line: &str) -> Option<String> {
    (
        string("#include"),
        spaces(),
        between(token('"'), token('"'), many1::<String, _, _>(satisfy(|c: char| c != '"'))),
    )
        .map(|(_, _, header)| header)
        .parse(line)
        .ok()
        .map(|(header, _)| header)
}
