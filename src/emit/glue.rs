//! Glue emission: `extern "C"` entry points for the native methods of a class.

use std::collections::{HashMap, HashSet};

use log::debug;

use super::{
    constants::{self, ConstantView},
    java_signature,
    params::{self, ParamView},
    push_line, GeneratedClass, GeneratedFile, NOTICE,
};
use crate::{
    class_info::ClassInfo,
    config::GenerationConfig,
    descriptor, mangle,
    model::{ClassModel, Method},
    Result,
};

/// A `native` method as the glue needs it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeMethodView {
    pub java_name: String,
    /// Exported symbol, in long form when the method is overloaded.
    pub symbol: String,
    pub descriptor: String,
    pub java_signature: String,
    pub is_static: bool,
    pub return_type: &'static str,
    pub zero_value: &'static str,
    pub params: Vec<ParamView>,
}

impl NativeMethodView {
    /// `jint JNICALL Java_a_B_f(JNIEnv* env, jclass clazz, jint x)` without
    /// the `JNIEXPORT` prefix.
    pub fn prototype(&self) -> String {
        let receiver = if self.is_static {
            "jclass clazz"
        } else {
            "jobject thiz"
        };
        format!(
            "{} JNICALL {}(JNIEnv* env, {}{})",
            self.return_type,
            self.symbol,
            receiver,
            params::declarations(&self.params, false)
        )
    }

    fn comment(&self, class: &ClassInfo) -> String {
        format!(
            "/*\n * Class:     {}\n * Method:    {}\n * Signature: {}\n */",
            class.qualified_name(),
            self.java_signature,
            self.descriptor
        )
    }
}

/// Everything a glue renderer needs for one class.
#[derive(Debug, Clone)]
pub struct GlueContext<'a> {
    pub class: &'a ClassInfo,
    pub config: &'a GenerationConfig,
    pub header_name: String,
    pub source_name: String,
    pub constants: Vec<ConstantView>,
    pub methods: Vec<NativeMethodView>,
}

/// Turns a [`GlueContext`] into text.
pub trait GlueRenderer {
    fn header(&self, ctx: &GlueContext) -> Result<String>;

    fn source(&self, ctx: &GlueContext) -> Result<String>;
}

impl<T: GlueRenderer + ?Sized> GlueRenderer for &T {
    fn header(&self, ctx: &GlueContext) -> Result<String> {
        (**self).header(ctx)
    }

    fn source(&self, ctx: &GlueContext) -> Result<String> {
        (**self).source(ctx)
    }
}

/// Builds the glue files for a class model.
#[derive(Debug, Clone)]
pub struct GlueEmitter<'c, R = DefaultGlueRenderer> {
    config: &'c GenerationConfig,
    renderer: R,
}

impl<'c> GlueEmitter<'c> {
    pub fn new(config: &'c GenerationConfig) -> Self {
        GlueEmitter::with_renderer(config, DefaultGlueRenderer)
    }
}

impl<'c, R: GlueRenderer> GlueEmitter<'c, R> {
    pub fn with_renderer(config: &'c GenerationConfig, renderer: R) -> Self {
        GlueEmitter { config, renderer }
    }

    pub fn context<'a>(
        &'a self,
        class: &'a ClassInfo,
        model: &dyn ClassModel,
    ) -> Result<GlueContext<'a>> {
        let prefix = self.config.namespace().file_prefix();
        let natives: Vec<&Method> = model
            .methods()
            .iter()
            .filter(|m| m.modifiers.is_native())
            .collect();

        let mut counts: HashMap<&str, usize> = HashMap::new();
        for method in &natives {
            *counts.entry(method.name.as_str()).or_default() += 1;
        }

        let methods = natives
            .iter()
            .map(|method| {
                native_method_view(class, method, counts[method.name.as_str()] > 1)
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(GlueContext {
            class,
            config: self.config,
            header_name: format!("{prefix}{}.h", class.simple_name()),
            source_name: format!("{prefix}{}.cpp", class.simple_name()),
            constants: constants::constant_views(
                model.fields(),
                &HashSet::from(["registerNativeFunctions".to_owned()]),
            ),
            methods,
        })
    }

    /// Render the header and, when configured, the source.
    pub fn emit(&self, class: &ClassInfo, model: &dyn ClassModel) -> Result<GeneratedClass> {
        let ctx = self.context(class, model)?;
        let header = GeneratedFile {
            name: ctx.header_name.clone(),
            content: self.renderer.header(&ctx)?,
        };
        let source = if self.config.glue_source() {
            Some(GeneratedFile {
                name: ctx.source_name.clone(),
                content: self.renderer.source(&ctx)?,
            })
        } else {
            None
        };
        Ok(GeneratedClass { header, source })
    }
}

fn native_method_view(class: &ClassInfo, method: &Method, overloaded: bool) -> Result<NativeMethodView> {
    let jvm_descriptor = descriptor::method_descriptor(method, None)?;
    let symbol = if overloaded {
        let args = descriptor::encode_parameters(method.parameters.iter().map(|p| &p.ty))?;
        mangle::native_overloaded_symbol_name(class.jni_name(), &method.name, &args)
    } else {
        mangle::native_symbol_name(class.jni_name(), &method.name)
    };
    debug!("native {} -> {}", descriptor::java_declaration(method), symbol);

    let params = params::param_views(method)?;
    Ok(NativeMethodView {
        java_name: method.name.clone(),
        java_signature: java_signature(method, &params, class.simple_name()),
        is_static: method.modifiers.is_static(),
        return_type: descriptor::native_type_name(&method.return_type)
            .map_err(|e| e.in_member(|| descriptor::java_declaration(method)))?,
        zero_value: descriptor::zero_value(&method.return_type),
        symbol,
        descriptor: jvm_descriptor,
        params,
    })
}

/// The builtin text renderer.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultGlueRenderer;

impl DefaultGlueRenderer {
    fn open_namespaces(out: &mut String, ctx: &GlueContext) {
        push_line(out, &ctx.config.namespace().begin());
        out.push_str(&format!("namespace {} {{\n\n", ctx.class.simple_name()));
    }

    fn close_namespaces(out: &mut String, ctx: &GlueContext) {
        out.push_str(&format!("}} // endof namespace {}\n", ctx.class.simple_name()));
        push_line(out, &ctx.config.namespace().end());
    }

    fn register_natives(ctx: &GlueContext, inline: bool) -> String {
        let mut out = String::new();
        let qualifier = if inline { "inline " } else { "" };
        out.push_str(&format!("{qualifier}bool registerNativeFunctions(JNIEnv* env) {{\n"));
        if ctx.methods.is_empty() {
            out.push_str("    return true;\n}\n");
            return out;
        }

        out.push_str("    static const JNINativeMethod gsNativeMethods[] = {\n");
        for method in &ctx.methods {
            out.push_str(&format!(
                "        {{const_cast<char *>(\"{}\"), const_cast<char *>(\"{}\"), reinterpret_cast<void *>({})}},\n",
                method.java_name, method.descriptor, method.symbol
            ));
        }
        out.push_str("    };\n\n");
        out.push_str(
            "    jclass clazz = env->FindClass(reinterpret_cast<const char*>(FULL_CLASS_NAME));\n",
        );
        out.push_str("    if (clazz == nullptr) {\n        return false;\n    }\n");
        out.push_str(
            "    bool registered = env->RegisterNatives(clazz, gsNativeMethods,\n            \
             sizeof(gsNativeMethods) / sizeof(gsNativeMethods[0])) == JNI_OK;\n",
        );
        out.push_str("    env->DeleteLocalRef(clazz);\n");
        out.push_str("    return registered;\n}\n");
        out
    }
}

impl GlueRenderer for DefaultGlueRenderer {
    fn header(&self, ctx: &GlueContext) -> Result<String> {
        let mut out = String::from(NOTICE);
        out.push_str(&format!(
            "/* C++ header file for class {} */\n#pragma once\n\n#include <jni.h>\n\n",
            ctx.class.slash_name()
        ));
        Self::open_namespaces(&mut out, ctx);

        out.push_str("// DO NOT modify\n");
        out.push_str(&format!(
            "static constexpr auto FULL_CLASS_NAME = u8\"{}\";\n\n",
            ctx.class.slash_name()
        ));
        if !ctx.constants.is_empty() {
            for constant in &ctx.constants {
                push_line(&mut out, &constant.declaration());
            }
            out.push('\n');
        }

        out.push_str("#ifdef __cplusplus\nextern \"C\" {\n#endif\n\n");
        for method in &ctx.methods {
            push_line(&mut out, &method.comment(ctx.class));
            out.push_str(&format!("JNIEXPORT {};\n\n", method.prototype()));
        }
        out.push_str("#ifdef __cplusplus\n}\n#endif\n\n");

        if ctx.config.glue_source() {
            out.push_str("bool registerNativeFunctions(JNIEnv* env);\n\n");
        } else {
            out.push_str(&Self::register_natives(ctx, true));
            out.push('\n');
        }

        Self::close_namespaces(&mut out, ctx);
        Ok(out)
    }

    fn source(&self, ctx: &GlueContext) -> Result<String> {
        let mut out = String::from(NOTICE);
        out.push_str(&format!("#include \"{}\"\n\n", ctx.header_name));
        Self::open_namespaces(&mut out, ctx);

        for method in &ctx.methods {
            push_line(&mut out, &method.comment(ctx.class));
            out.push_str(&format!("JNIEXPORT {} {{\n", method.prototype()));
            out.push_str("    // TODO(jni-cppgen): generated method stub.\n");
            if method.return_type != "void" {
                out.push_str(&format!("    return {};\n", method.zero_value));
            }
            out.push_str("}\n\n");
        }

        out.push_str(&Self::register_natives(ctx, false));
        out.push('\n');
        Self::close_namespaces(&mut out, ctx);
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Modifiers, Parameter, Primitive, SymbolicSource, TypeDescriptor};

    fn int() -> TypeDescriptor {
        TypeDescriptor::Primitive(Primitive::Int)
    }

    fn foo() -> SymbolicSource {
        SymbolicSource::new("com.example.Foo")
            .with_method(
                "add",
                int(),
                vec![Parameter::new("a", int()), Parameter::new("b", int())],
                Modifiers::PUBLIC | Modifiers::STATIC | Modifiers::NATIVE,
            )
            .with_method(
                "isReady",
                Primitive::Boolean.into(),
                vec![],
                Modifiers::PRIVATE | Modifiers::NATIVE,
            )
            .with_method("plain", int(), vec![], Modifiers::PUBLIC)
    }

    fn emit(model: &SymbolicSource, config: &GenerationConfig) -> GeneratedClass {
        let class = ClassInfo::new(model).unwrap();
        GlueEmitter::new(config).emit(&class, model).unwrap()
    }

    #[test]
    fn header_declares_natives() {
        let config = GenerationConfig::default();
        let out = emit(&foo(), &config);
        assert_eq!(out.header.name, "Foo.h");
        let header = &out.header.content;
        assert!(header.contains("#pragma once"));
        assert!(header.contains("static constexpr auto FULL_CLASS_NAME = u8\"com/example/Foo\";"));
        assert!(header.contains(
            "JNIEXPORT jint JNICALL Java_com_example_Foo_add(JNIEnv* env, jclass clazz, jint a, jint b);"
        ));
        assert!(header.contains(
            "JNIEXPORT jboolean JNICALL Java_com_example_Foo_isReady(JNIEnv* env, jobject thiz);"
        ));
        assert!(header.contains(" * Method:    public static native int add(int a, int b)"));
        assert!(!header.contains("plain"));
        assert!(header.contains("bool registerNativeFunctions(JNIEnv* env);"));
    }

    #[test]
    fn source_has_stubs_and_registration() {
        let config = GenerationConfig::default();
        let source = emit(&foo(), &config).source.unwrap();
        assert_eq!(source.name, "Foo.cpp");
        let text = &source.content;
        assert!(text.contains("#include \"Foo.h\""));
        assert!(text.contains("    return 0;\n"));
        assert!(text.contains("    return JNI_FALSE;\n"));
        assert!(text.contains(
            "{const_cast<char *>(\"add\"), const_cast<char *>(\"(II)I\"), reinterpret_cast<void *>(Java_com_example_Foo_add)},"
        ));
        assert!(text.contains("RegisterNatives"));
    }

    #[test]
    fn header_only_glue_inlines_registration() {
        let config = GenerationConfig::builder()
            .glue_source(false)
            .namespace("gen::jni")
            .build();
        let out = emit(&foo(), &config);
        assert!(out.source.is_none());
        assert_eq!(out.header.name, "gen_jni_Foo.h");
        let header = &out.header.content;
        assert!(header.contains("inline bool registerNativeFunctions(JNIEnv* env) {"));
        assert!(header.contains("namespace gen { namespace jni {\nnamespace Foo {"));
        assert!(header.ends_with("} // endof namespace Foo\n} } // endof namespace gen::jni\n"));
    }

    #[test]
    fn overloaded_natives_use_long_symbols() {
        let model = SymbolicSource::new("p.C")
            .with_method(
                "f",
                TypeDescriptor::VOID,
                vec![Parameter::new("x", int())],
                Modifiers::NATIVE,
            )
            .with_method(
                "f",
                TypeDescriptor::VOID,
                vec![Parameter::new(
                    "s",
                    TypeDescriptor::array_of(TypeDescriptor::declared("java.lang.String")),
                )],
                Modifiers::NATIVE,
            );
        let config = GenerationConfig::default();
        let class = ClassInfo::new(&model).unwrap();
        let emitter = GlueEmitter::new(&config);
        let ctx = emitter.context(&class, &model).unwrap();
        let symbols: Vec<_> = ctx.methods.iter().map(|m| m.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["Java_p_C_f__I", "Java_p_C_f___3Ljava_lang_String_2"]);

        let source = emitter.emit(&class, &model).unwrap().source.unwrap().content;
        assert!(!source.contains("return 0;"));
        assert!(source.contains("JNIEXPORT void JNICALL Java_p_C_f__I(JNIEnv* env, jobject thiz, jint x) {"));
    }

    #[test]
    fn class_without_natives_registers_nothing() {
        let model = SymbolicSource::new("p.Empty");
        let config = GenerationConfig::default();
        let source = emit(&model, &config).source.unwrap().content;
        assert!(source.contains("bool registerNativeFunctions(JNIEnv* env) {\n    return true;\n}"));
    }
}
