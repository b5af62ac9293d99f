//! Proxy emission: a C++ class that calls back into a Java class through ids
//! cached in a lazily initialised class init state.
//!
//! The generated `initClazz` moves the state from uninitialised to
//! initialised in one step: it resolves the class, then every constructor,
//! method and field id in that order. The first failed lookup clears
//! everything resolved so far and returns `false`. With `thread_safe` the
//! transition is guarded by a double-checked lock.

use std::collections::HashSet;

use log::{debug, warn};

use super::{
    constants::{self, ConstantView},
    helper,
    java_signature,
    params::{self, ParamView},
    push_line, GeneratedClass, GeneratedFile, NOTICE,
};
use crate::{
    class_info::ClassInfo,
    config::GenerationConfig,
    descriptor,
    mangle,
    model::{ClassModel, Field, Method, Modifiers, Primitive, TypeDescriptor},
    resolver::OverloadResolver,
    Result,
};

/// Macro the generated `initClazz` checks every lookup with.
const CHECK_NULL: &str = "JNICPP_CHECK_NULL";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstructorView {
    pub cpp_name: String,
    pub slot: String,
    /// Descriptor including the implicit outer instance of inner classes.
    pub descriptor: String,
    pub java_signature: String,
    pub params: Vec<ParamView>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodView {
    pub cpp_name: String,
    pub slot: String,
    pub java_name: String,
    pub descriptor: String,
    pub java_signature: String,
    pub is_static: bool,
    pub return_type: &'static str,
    pub selector: &'static str,
    pub needs_cast: bool,
    pub returns_object: bool,
    pub params: Vec<ParamView>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldView {
    pub java_name: String,
    pub slot: String,
    pub descriptor: String,
    pub java_signature: String,
    pub is_static: bool,
    pub native_type: &'static str,
    pub selector: &'static str,
    pub needs_cast: bool,
    pub is_object: bool,
    pub getter: Option<String>,
    pub setter: Option<String>,
    /// Name of the value parameter of the setter.
    pub setter_param: String,
}

/// Everything a proxy renderer needs for one class.
#[derive(Debug, Clone)]
pub struct ProxyContext<'a> {
    pub class: &'a ClassInfo,
    pub config: &'a GenerationConfig,
    pub header_name: String,
    pub source_name: String,
    pub constants: Vec<ConstantView>,
    pub constructors: Vec<ConstructorView>,
    pub methods: Vec<MethodView>,
    pub fields: Vec<FieldView>,
}

impl ProxyContext<'_> {
    fn helper(&self) -> bool {
        self.config.use_jni_helper()
    }

    /// Slot name and id type of every cached id, in resolution order.
    fn slots(&self) -> impl Iterator<Item = (&str, &'static str)> {
        let ctors = self.constructors.iter().map(|c| (c.slot.as_str(), "jmethodID"));
        let methods = self.methods.iter().map(|m| (m.slot.as_str(), "jmethodID"));
        let fields = self.fields.iter().map(|f| (f.slot.as_str(), "jfieldID"));
        ctors.chain(methods).chain(fields)
    }
}

/// Turns a [`ProxyContext`] into text.
pub trait ProxyRenderer {
    fn header(&self, ctx: &ProxyContext) -> Result<String>;

    /// Not called when the proxy is header-only.
    fn source(&self, ctx: &ProxyContext) -> Result<String>;
}

impl<T: ProxyRenderer + ?Sized> ProxyRenderer for &T {
    fn header(&self, ctx: &ProxyContext) -> Result<String> {
        (**self).header(ctx)
    }

    fn source(&self, ctx: &ProxyContext) -> Result<String> {
        (**self).source(ctx)
    }
}

/// Builds the proxy files for a class model.
#[derive(Debug, Clone)]
pub struct ProxyEmitter<'c, R = DefaultProxyRenderer> {
    config: &'c GenerationConfig,
    renderer: R,
}

impl<'c> ProxyEmitter<'c> {
    pub fn new(config: &'c GenerationConfig) -> Self {
        ProxyEmitter::with_renderer(config, DefaultProxyRenderer)
    }
}

impl<'c, R: ProxyRenderer> ProxyEmitter<'c, R> {
    pub fn with_renderer(config: &'c GenerationConfig, renderer: R) -> Self {
        ProxyEmitter { config, renderer }
    }

    fn visible(&self, modifiers: Modifiers) -> bool {
        !self.config.only_public_members() || modifiers.is_public()
    }

    pub fn context<'a>(
        &'a self,
        class: &'a ClassInfo,
        model: &dyn ClassModel,
    ) -> Result<ProxyContext<'a>> {
        let resolver = OverloadResolver::new(class);
        let prefix = self.config.namespace().file_prefix();

        let constructors = self.constructors(model);
        let constructors = resolver
            .resolve(&constructors)?
            .into_iter()
            .map(|resolved| {
                let ctor = resolved.member();
                let params = params::param_views(ctor)?;
                Ok(ConstructorView {
                    cpp_name: resolved.cpp_name(),
                    slot: resolved.slot_name(),
                    descriptor: descriptor::method_descriptor(ctor, class.enclosing_instance())?,
                    java_signature: java_signature(ctor, &params, class.simple_name()),
                    params,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let methods = self.methods(model);
        let methods = resolver
            .resolve(&methods)?
            .into_iter()
            .map(|resolved| {
                let method = resolved.member();
                let params = params::param_views(method)?;
                let return_type = descriptor::native_type_name(&method.return_type)
                    .map_err(|e| e.in_member(|| descriptor::java_declaration(method)))?;
                Ok(MethodView {
                    cpp_name: resolved.cpp_name(),
                    slot: resolved.slot_name(),
                    java_name: method.name.clone(),
                    descriptor: descriptor::method_descriptor(method, None)?,
                    java_signature: java_signature(method, &params, class.simple_name()),
                    is_static: method.modifiers.is_static(),
                    return_type,
                    selector: descriptor::call_selector(&method.return_type),
                    needs_cast: descriptor::needs_cast(return_type),
                    returns_object: !method.return_type.is_primitive(),
                    params,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let (fields, accessors): (Vec<Field>, Vec<(bool, bool)>) = model
            .fields()
            .iter()
            .filter(|f| !f.is_constant())
            .filter_map(|f| {
                let (getter, setter) = self.accessors(model, f);
                if getter || setter {
                    Some((f.clone(), (getter, setter)))
                } else {
                    debug!("no accessors for field {}.{}", f.declaring_class, f.name);
                    None
                }
            })
            .unzip();
        let fields = resolver
            .resolve(&fields)?
            .into_iter()
            .zip(accessors)
            .map(|(resolved, (getter, setter))| {
                let field = resolved.member();
                let native_type = descriptor::native_type_name(&field.ty)
                    .map_err(|e| e.in_member(|| format!("{}.{}", field.declaring_class, field.name)))?;
                let name = mangle::cpp_identifier(&field.name);
                Ok(FieldView {
                    java_name: field.name.clone(),
                    slot: resolved.slot_name(),
                    descriptor: descriptor::encode(&field.ty)
                        .map_err(|e| e.in_member(|| format!("{}.{}", field.declaring_class, field.name)))?,
                    java_signature: java_signature(field, &[], class.simple_name()),
                    is_static: field.modifiers.is_static(),
                    native_type,
                    selector: descriptor::call_selector(&field.ty),
                    needs_cast: descriptor::needs_cast(native_type),
                    is_object: !field.ty.is_primitive(),
                    getter: getter.then(|| format!("get{name}")),
                    setter: setter.then(|| format!("set{name}")),
                    setter_param: params::sanitize(&field.name, 0),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let taken: HashSet<String> = constructors
            .iter()
            .map(|c| c.cpp_name.clone())
            .chain(methods.iter().map(|m| m.cpp_name.clone()))
            .chain(
                fields
                    .iter()
                    .flat_map(|f| f.getter.iter().chain(f.setter.iter()).cloned()),
            )
            .collect();

        Ok(ProxyContext {
            class,
            config: self.config,
            header_name: format!("{prefix}{}.h", class.cpp_class_name()),
            source_name: format!("{prefix}{}.cpp", class.cpp_class_name()),
            constants: constants::constant_views(model.fields(), &taken),
            constructors,
            methods,
            fields,
        })
    }

    fn constructors(&self, model: &dyn ClassModel) -> Vec<Method> {
        if model.modifiers().contains(Modifiers::ABSTRACT) {
            return Vec::new();
        }
        model
            .constructors()
            .iter()
            .filter(|c| c.proxy_override().unwrap_or_else(|| self.visible(c.modifiers)))
            .cloned()
            .collect()
    }

    fn methods(&self, model: &dyn ClassModel) -> Vec<Method> {
        model
            .methods()
            .iter()
            .filter(|m| {
                let included = m.proxy_override().unwrap_or_else(|| {
                    self.config.generate_all_methods() && self.visible(m.modifiers)
                });
                if !included {
                    debug!("leaving {} out of the proxy", descriptor::java_declaration(*m));
                }
                included
            })
            .cloned()
            .collect()
    }

    /// Whether `field` gets a getter and a setter.
    fn accessors(&self, model: &dyn ClassModel, field: &Field) -> (bool, bool) {
        let (getter, setter) = match field.accessor_override() {
            Some(requested) => requested,
            None if self.config.generate_all_field_accessors() && self.visible(field.modifiers) => {
                let capitalized = capitalize(&field.name);
                let is_boolean = field.ty == TypeDescriptor::Primitive(Primitive::Boolean);
                let has_getter = model.has_method(&format!("get{capitalized}"))
                    || model.has_method(&format!("get{}", field.name))
                    || (is_boolean && model.has_method(&format!("is{capitalized}")));
                let has_setter = model.has_method(&format!("set{capitalized}"))
                    || model.has_method(&format!("set{}", field.name));
                if has_getter {
                    warn!(
                        "{} already has a getter for field {}, not generating one",
                        field.declaring_class, field.name
                    );
                }
                if has_setter {
                    warn!(
                        "{} already has a setter for field {}, not generating one",
                        field.declaring_class, field.name
                    );
                }
                (!has_getter, !has_setter)
            }
            None => (false, false),
        };
        (getter, setter && !field.modifiers.is_final())
    }

    /// Render the header and, unless the proxy is header-only, the source.
    pub fn emit(&self, class: &ClassInfo, model: &dyn ClassModel) -> Result<GeneratedClass> {
        let ctx = self.context(class, model)?;
        let header = GeneratedFile {
            name: ctx.header_name.clone(),
            content: self.renderer.header(&ctx)?,
        };
        let source = if self.config.header_only_proxy() {
            None
        } else {
            Some(GeneratedFile {
                name: ctx.source_name.clone(),
                content: self.renderer.source(&ctx)?,
            })
        };
        Ok(GeneratedClass { header, source })
    }
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// The builtin text renderer.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultProxyRenderer;

impl DefaultProxyRenderer {
    /// Opening line of a forwarding function, up to and including `{`.
    fn head(
        ctx: &ProxyContext,
        is_static: bool,
        return_type: &str,
        name: &str,
        leading: Option<&str>,
        params: &[ParamView],
    ) -> String {
        let helper = ctx.helper();
        let mut args = Vec::new();
        if !helper {
            args.push(String::from("JNIEnv* env"));
            if !is_static {
                args.push(String::from("jobject thiz"));
            }
        }
        args.extend(leading.map(str::to_owned));
        args.extend(params.iter().map(|p| p.declaration(helper)));

        let qualifier = if is_static || !helper { "static " } else { "" };
        let constness = if helper && !is_static { " const" } else { "" };
        format!(
            "    {qualifier}{return_type} {name}({}){constness} {{\n",
            args.join(", ")
        )
    }

    fn prologue(helper: bool) -> &'static str {
        if helper {
            "        ::jnicpp::Env env;\n        assertInited(env.get());\n"
        } else {
            "        assertInited(env);\n"
        }
    }

    fn receiver(helper: bool, is_static: bool) -> &'static str {
        match (is_static, helper) {
            (true, _) => "getClassInitState().sClazz",
            (false, true) => "getThis()",
            (false, false) => "thiz",
        }
    }

    fn return_type(helper: bool, native_type: &str, is_object: bool) -> String {
        if helper && is_object {
            params::helper_ref(native_type)
        } else {
            native_type.to_owned()
        }
    }

    fn returned(helper: bool, native_type: &str, needs_cast: bool, is_object: bool, call: String) -> String {
        if native_type == "void" {
            return format!("        {call};\n");
        }
        let value = if needs_cast {
            format!("reinterpret_cast<{native_type}>({call})")
        } else {
            call
        };
        if helper && is_object {
            format!("        return {}({value});\n", params::helper_ref(native_type))
        } else {
            format!("        return {value};\n")
        }
    }

    fn constructors(out: &mut String, ctx: &ProxyContext) {
        let helper = ctx.helper();
        let cpp_class = ctx.class.cpp_class_name();
        let (leading, leading_arg) = match (ctx.class.is_inner_class(), helper) {
            (false, _) => (None, ""),
            (true, false) => (Some("jobject enclosingClass"), ", enclosingClass"),
            (true, true) => (
                Some("const ::jnicpp::LocalRef<jobject>& enclosingClass"),
                ", enclosingClass.get()",
            ),
        };
        let return_type = if helper { cpp_class } else { "jobject" };

        for ctor in &ctx.constructors {
            out.push_str(&format!("    // {}\n", ctor.java_signature));
            out.push_str(&Self::head(ctx, true, return_type, &ctor.cpp_name, leading, &ctor.params));
            out.push_str(Self::prologue(helper));
            let call = format!(
                "env->NewObject(getClassInitState().sClazz, getClassInitState().{}{}{})",
                ctor.slot,
                leading_arg,
                params::arguments(&ctor.params, helper)
            );
            if helper {
                out.push_str(&format!(
                    "        return {cpp_class}({}({call}));\n",
                    params::helper_ref("jobject")
                ));
            } else {
                out.push_str(&format!("        return {call};\n"));
            }
            out.push_str("    }\n\n");
        }
    }

    fn methods(out: &mut String, ctx: &ProxyContext) {
        let helper = ctx.helper();
        for method in &ctx.methods {
            out.push_str(&format!("    // {}\n", method.java_signature));
            out.push_str(&Self::head(
                ctx,
                method.is_static,
                &Self::return_type(helper, method.return_type, method.returns_object),
                &method.cpp_name,
                None,
                &method.params,
            ));
            out.push_str(Self::prologue(helper));
            let call = format!(
                "env->Call{}{}Method({}, getClassInitState().{}{})",
                if method.is_static { "Static" } else { "" },
                method.selector,
                Self::receiver(helper, method.is_static),
                method.slot,
                params::arguments(&method.params, helper)
            );
            out.push_str(&Self::returned(
                helper,
                method.return_type,
                method.needs_cast,
                method.returns_object,
                call,
            ));
            out.push_str("    }\n\n");
        }
    }

    fn fields(out: &mut String, ctx: &ProxyContext) {
        let helper = ctx.helper();
        for field in &ctx.fields {
            let kind = if field.is_static { "Static" } else { "" };
            let receiver = Self::receiver(helper, field.is_static);

            if let Some(getter) = &field.getter {
                out.push_str(&format!("    // {}\n", field.java_signature));
                out.push_str(&Self::head(
                    ctx,
                    field.is_static,
                    &Self::return_type(helper, field.native_type, field.is_object),
                    getter,
                    None,
                    &[],
                ));
                out.push_str(Self::prologue(helper));
                let call = format!(
                    "env->Get{kind}{}Field({receiver}, getClassInitState().{})",
                    field.selector, field.slot
                );
                out.push_str(&Self::returned(
                    helper,
                    field.native_type,
                    field.needs_cast,
                    field.is_object,
                    call,
                ));
                out.push_str("    }\n\n");
            }

            if let Some(setter) = &field.setter {
                let value = ParamView {
                    name: field.setter_param.clone(),
                    native_type: field.native_type,
                    java_type: String::new(),
                    is_object: field.is_object,
                };
                out.push_str(&format!("    // {}\n", field.java_signature));
                out.push_str(&Self::head(
                    ctx,
                    field.is_static,
                    "void",
                    setter,
                    None,
                    std::slice::from_ref(&value),
                ));
                out.push_str(Self::prologue(helper));
                out.push_str(&format!(
                    "        env->Set{kind}{}Field({receiver}, getClassInitState().{}, {});\n",
                    field.selector,
                    field.slot,
                    value.argument(helper)
                ));
                out.push_str("    }\n\n");
            }
        }
    }

    fn helper_members(out: &mut String, ctx: &ProxyContext) {
        let cpp_class = ctx.class.cpp_class_name();
        out.push_str(&format!(
            "    explicit {cpp_class}(::jnicpp::LocalRef<jobject> local) : _local(std::move(local)) {{}}\n\n"
        ));
        out.push_str(&format!(
            "    explicit {cpp_class}(::jnicpp::GlobalRef<jobject> global) : _global(std::move(global)) {{}}\n\n"
        ));
        out.push_str("    jobject getThis() const {\n");
        out.push_str("        return _global.get() != nullptr ? _global.get() : _local.get();\n");
        out.push_str("    }\n\n");
    }

    fn init_state(out: &mut String, ctx: &ProxyContext) {
        out.push_str("    struct ClassInitState {\n");
        if ctx.config.thread_safe() {
            out.push_str("        std::atomic_bool sInited {};\n");
            out.push_str("        std::mutex sInitLock {};\n");
        } else {
            out.push_str("        bool sInited = false;\n");
        }
        out.push_str("        jclass sClazz = nullptr;\n");
        for (slot, id_type) in ctx.slots() {
            out.push_str(&format!("        {id_type} {slot} = nullptr;\n"));
        }
        out.push_str("    }; // endof struct ClassInitState\n\n");
        out.push_str("    static inline ClassInitState& getClassInitState() {\n");
        out.push_str("        static ClassInitState sState;\n");
        out.push_str("        return sState;\n");
        out.push_str("    }\n");
    }

    fn logger_declaration(ctx: &ProxyContext) -> String {
        match ctx.config.error_logger() {
            Some(logger) if !logger.contains("::") => format!(
                "// error logger declared by the embedding project\nvoid {logger}(JNIEnv* env, const char* error);\n\n"
            ),
            _ => String::new(),
        }
    }

    /// Lines guarded by `sInited`: the whole resolution sequence.
    fn resolution(ctx: &ProxyContext) -> Vec<String> {
        let check = |value: &str| format!("{CHECK_NULL}({value});");
        let mut lines = vec![
            String::from(
                "jclass clazz = env->FindClass(reinterpret_cast<const char*>(FULL_CLASS_NAME));",
            ),
            check("clazz"),
            String::from("state.sClazz = reinterpret_cast<jclass>(env->NewGlobalRef(clazz));"),
            String::from("env->DeleteLocalRef(clazz);"),
            check("state.sClazz"),
            String::new(),
        ];

        for ctor in &ctx.constructors {
            lines.push(format!(
                "state.{} = env->GetMethodID(state.sClazz, \"<init>\", \"{}\");",
                ctor.slot, ctor.descriptor
            ));
            lines.push(check(&format!("state.{}", ctor.slot)));
            lines.push(String::new());
        }
        for method in &ctx.methods {
            lines.push(format!(
                "state.{} = env->Get{}MethodID(state.sClazz, \"{}\", \"{}\");",
                method.slot,
                if method.is_static { "Static" } else { "" },
                constants::escape_string(&method.java_name),
                method.descriptor
            ));
            lines.push(check(&format!("state.{}", method.slot)));
            lines.push(String::new());
        }
        for field in &ctx.fields {
            lines.push(format!(
                "state.{} = env->Get{}FieldID(state.sClazz, \"{}\", \"{}\");",
                field.slot,
                if field.is_static { "Static" } else { "" },
                constants::escape_string(&field.java_name),
                field.descriptor
            ));
            lines.push(check(&format!("state.{}", field.slot)));
            lines.push(String::new());
        }
        lines.push(String::from("state.sInited = true;"));
        lines
    }

    /// Wrap `lines` in the `sInited` check, double-checked under the lock
    /// when thread safe.
    fn guarded(out: &mut String, ctx: &ProxyContext, condition: &str, lines: &[String]) {
        let thread_safe = ctx.config.thread_safe();
        out.push_str(&format!("    if ({condition}) {{\n"));
        let mut indent = "        ";
        if thread_safe {
            out.push_str("        std::lock_guard<std::mutex> lg(state.sInitLock);\n");
            out.push_str(&format!("        if ({condition}) {{\n"));
            indent = "            ";
        }
        for line in lines {
            if line.is_empty() {
                out.push('\n');
            } else {
                out.push_str(&format!("{indent}{line}\n"));
            }
        }
        if thread_safe {
            out.push_str("        }\n");
        }
        out.push_str("    }\n");
    }

    fn check_null_macro(ctx: &ProxyContext) -> String {
        let report = match ctx.config.error_logger() {
            Some(logger) => format!(
                "{logger}(env, \"can't init {}::\" #val);",
                ctx.class.cpp_class_name()
            ),
            None => String::from("env->ExceptionDescribe();"),
        };
        let lines = [
            format!("#define {CHECK_NULL}(val)"),
            String::from("    do {"),
            String::from("        if ((val) == nullptr) {"),
            format!("            {report}"),
            String::from("            rollback();"),
            String::from("            return false;"),
            String::from("        }"),
            String::from("    } while (false)"),
        ];
        let width = lines.iter().map(|l| l.len()).max().unwrap_or_default() + 1;
        let last = lines.len() - 1;
        lines
            .iter()
            .enumerate()
            .map(|(i, line)| {
                if i == last {
                    format!("{line}\n")
                } else {
                    format!("{line:<width$}\\\n")
                }
            })
            .collect()
    }

    /// `initClazz` and `releaseClazz` definitions.
    fn definitions(ctx: &ProxyContext, inline: bool) -> String {
        let cpp_class = ctx.class.cpp_class_name();
        let qualifier = if inline { "inline " } else { "" };
        let mut out = String::new();

        out.push_str(&format!(
            "/*static*/ {qualifier}bool {cpp_class}::initClazz(JNIEnv* env) {{\n"
        ));
        out.push_str(&Self::check_null_macro(ctx));
        out.push('\n');
        out.push_str("    auto& state = getClassInitState();\n");
        out.push_str("    auto rollback = [env, &state]() {\n");
        out.push_str("        if (state.sClazz != nullptr) {\n");
        out.push_str("            env->DeleteGlobalRef(state.sClazz);\n");
        out.push_str("            state.sClazz = nullptr;\n");
        out.push_str("        }\n");
        for (slot, _) in ctx.slots() {
            out.push_str(&format!("        state.{slot} = nullptr;\n"));
        }
        out.push_str("    };\n\n");
        Self::guarded(&mut out, ctx, "!state.sInited", &Self::resolution(ctx));
        out.push_str(&format!("#undef {CHECK_NULL}\n"));
        out.push_str("    return true;\n}\n\n");

        out.push_str(&format!(
            "/*static*/ {qualifier}void {cpp_class}::releaseClazz(JNIEnv* env) {{\n"
        ));
        out.push_str("    auto& state = getClassInitState();\n");
        let mut release = vec![
            String::from("env->DeleteGlobalRef(state.sClazz);"),
            String::from("state.sClazz = nullptr;"),
        ];
        release.extend(ctx.slots().map(|(slot, _)| format!("state.{slot} = nullptr;")));
        release.push(String::from("state.sInited = false;"));
        Self::guarded(&mut out, ctx, "state.sInited", &release);
        out.push_str("}\n");
        out
    }
}

impl ProxyRenderer for DefaultProxyRenderer {
    fn header(&self, ctx: &ProxyContext) -> Result<String> {
        let helper = ctx.helper();
        let header_only = ctx.config.header_only_proxy();
        let cpp_class = ctx.class.cpp_class_name();

        let mut out = String::from(NOTICE);
        out.push_str(&format!(
            "/* C++ proxy for class {} */\n#pragma once\n\n",
            ctx.class.slash_name()
        ));
        out.push_str("#include <jni.h>\n#include <assert.h>\n");
        if ctx.config.thread_safe() {
            out.push_str("#include <atomic>\n#include <mutex>\n");
        }
        if helper {
            out.push_str(&format!("#include <utility>\n#include \"{}\"\n", helper::JNI_HELPER_HEADER));
        }
        out.push('\n');
        if header_only {
            out.push_str(&Self::logger_declaration(ctx));
        }

        push_line(&mut out, &ctx.config.namespace().begin());
        out.push_str(&format!("class {cpp_class} {{\n\npublic:\n"));
        out.push_str(&format!(
            "    static constexpr auto FULL_CLASS_NAME = u8\"{}\";\n\n",
            ctx.class.slash_name()
        ));
        if !ctx.constants.is_empty() {
            for constant in &ctx.constants {
                out.push_str(&format!("    {}\n", constant.declaration()));
            }
            out.push('\n');
        }

        if helper {
            Self::helper_members(&mut out, ctx);
        }
        out.push_str("    static bool initClazz(JNIEnv* env);\n\n");
        out.push_str("    static void releaseClazz(JNIEnv* env);\n\n");
        out.push_str("    static void assertInited(JNIEnv* env) {\n");
        out.push_str("        auto initClazzSuccess = initClazz(env);\n");
        out.push_str("        assert(initClazzSuccess);\n");
        out.push_str("        (void) initClazzSuccess;\n");
        out.push_str("    }\n\n");

        Self::constructors(&mut out, ctx);
        Self::methods(&mut out, ctx);
        Self::fields(&mut out, ctx);

        out.push_str("private:\n");
        Self::init_state(&mut out, ctx);
        if helper {
            out.push_str("\n    ::jnicpp::LocalRef<jobject> _local;\n");
            out.push_str("    ::jnicpp::GlobalRef<jobject> _global;\n");
        }
        out.push_str(&format!("}}; // endof class {cpp_class}\n\n"));

        if header_only {
            out.push_str(&Self::definitions(ctx, true));
            out.push('\n');
        }
        push_line(&mut out, &ctx.config.namespace().end());
        Ok(out)
    }

    fn source(&self, ctx: &ProxyContext) -> Result<String> {
        let mut out = String::from(NOTICE);
        out.push_str(&format!("#include \"{}\"\n\n", ctx.header_name));
        out.push_str(&Self::logger_declaration(ctx));
        push_line(&mut out, &ctx.config.namespace().begin());
        out.push('\n');
        out.push_str(&Self::definitions(ctx, false));
        out.push('\n');
        push_line(&mut out, &ctx.config.namespace().end());
        Ok(out)
    }
}
