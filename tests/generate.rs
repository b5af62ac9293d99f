//! End-to-end tests: class descriptions in, C++ files on disk out.

use std::fs;
use std::path::PathBuf;

use jni_cppgen::{
    model::{ClassModel, SymbolicSource},
    Error, GenerationConfig, Generator, OutputKind,
};

/// Helper function to set up a clean test output directory
fn setup_test_output(test_name: &str) -> PathBuf {
    let out_dir = PathBuf::from(env!("CARGO_TARGET_TMPDIR"))
        .join("jni_cppgen_tests")
        .join(test_name);

    if out_dir.exists() {
        fs::remove_dir_all(&out_dir).expect("Failed to clean output directory");
    }
    fs::create_dir_all(&out_dir).expect("Failed to create output directory");

    out_dir
}

const FOO: &str = r#"{
    "name": "com.example.Foo",
    "modifiers": ["public"],
    "methods": [
        {
            "name": "add",
            "return_type": "int",
            "modifiers": ["public", "static", "native"],
            "parameters": [{ "name": "a", "type": "int" }, { "name": "b", "type": "int" }]
        },
        {
            "name": "size",
            "return_type": "int",
            "modifiers": ["public"]
        }
    ],
    "fields": [{ "name": "name", "type": "java.lang.String", "modifiers": ["public"] }]
}"#;

#[test]
fn test_glue_for_static_native() {
    let out_dir = setup_test_output("glue_for_static_native");
    let foo = SymbolicSource::from_json(FOO).unwrap();
    let generator = Generator::new(GenerationConfig::default());

    let files = generator
        .write_class(&foo, &out_dir, &[OutputKind::Glue])
        .unwrap();
    assert_eq!(
        files,
        vec![out_dir.join("glue").join("Foo.h"), out_dir.join("glue").join("Foo.cpp")]
    );

    let header = fs::read_to_string(out_dir.join("glue/Foo.h")).unwrap();
    assert!(header.contains(
        "JNIEXPORT jint JNICALL Java_com_example_Foo_add(JNIEnv* env, jclass clazz, jint a, jint b);"
    ));
    assert!(header.contains("static constexpr auto FULL_CLASS_NAME = u8\"com/example/Foo\";"));
    assert!(!header.contains("Java_com_example_Foo_size"));

    let source = fs::read_to_string(out_dir.join("glue/Foo.cpp")).unwrap();
    assert!(source.contains("#include \"Foo.h\""));
    assert!(source.contains("\"add\"), const_cast<char *>(\"(II)I\")"));
    assert!(source.contains("reinterpret_cast<void *>(Java_com_example_Foo_add)"));
    assert!(source.contains("return 0;"));
}

#[test]
fn test_proxy_field_accessors() {
    let out_dir = setup_test_output("proxy_field_accessors");
    let foo = SymbolicSource::from_json(FOO).unwrap();
    let generator = Generator::new(GenerationConfig::default());

    generator
        .write_class(&foo, &out_dir, &[OutputKind::Proxy])
        .unwrap();

    let header = fs::read_to_string(out_dir.join("proxy/FooProxy.h")).unwrap();
    assert!(header.contains("class FooProxy {"));
    assert!(header.contains("jstring getname("));
    assert!(header.contains("void setname("));
    assert!(header.contains("jstring name)"));
    assert_eq!(header.matches("jfieldID sField_name_0").count(), 1);
    assert!(header.contains("static jint size(JNIEnv* env, jobject thiz) {"));

    let source = fs::read_to_string(out_dir.join("proxy/FooProxy.cpp")).unwrap();
    assert!(source.contains("bool FooProxy::initClazz(JNIEnv* env)"));
    assert!(source.contains("env->FindClass(reinterpret_cast<const char*>(FULL_CLASS_NAME));"));
}

#[test]
fn test_both_kinds_with_namespace() {
    let out_dir = setup_test_output("both_kinds_with_namespace");
    let foo = SymbolicSource::from_json(FOO).unwrap();
    let config = GenerationConfig::builder().namespace("my::jni").build();
    let generator = Generator::new(config);

    let files = generator
        .write_class(&foo, &out_dir, &[OutputKind::Glue, OutputKind::Proxy])
        .unwrap();
    assert_eq!(files.len(), 4);

    let glue = fs::read_to_string(out_dir.join("glue/my_jni_Foo.h")).unwrap();
    assert!(glue.contains("namespace my {"));
    assert!(glue.contains("namespace jni {"));

    let proxy = fs::read_to_string(out_dir.join("proxy/my_jni_FooProxy.h")).unwrap();
    assert!(proxy.contains("namespace jni {"));
}

#[test]
fn test_helper_mode_writes_support_header() {
    let out_dir = setup_test_output("helper_mode_writes_support_header");
    let foo = SymbolicSource::from_json(FOO).unwrap();
    let config = GenerationConfig::builder().use_jni_helper(true).build();
    let generator = Generator::new(config);

    let files = generator
        .write_class(&foo, &out_dir, &[OutputKind::Proxy])
        .unwrap();
    assert!(files.contains(&out_dir.join("proxy").join("jnihelper.h")));

    let proxy = fs::read_to_string(out_dir.join("proxy/FooProxy.h")).unwrap();
    assert!(proxy.contains("#include \"jnihelper.h\""));

    let helper = fs::read_to_string(out_dir.join("proxy/jnihelper.h")).unwrap();
    assert!(helper.contains("namespace jnicpp {"));
    assert!(helper.contains("class LocalRef {"));
    assert!(helper.contains("class GlobalRef {"));
    assert!(helper.contains("class Env {"));
    assert!(helper.contains("JNIEnv* operator->() const {"));
}

#[test]
fn test_raw_mode_writes_no_support_header() {
    let out_dir = setup_test_output("raw_mode_writes_no_support_header");
    let foo = SymbolicSource::from_json(FOO).unwrap();
    let generator = Generator::new(GenerationConfig::default());

    generator
        .write_class(&foo, &out_dir, &[OutputKind::Proxy])
        .unwrap();
    assert!(!out_dir.join("proxy/jnihelper.h").exists());
}

#[test]
fn test_class_without_natives_skips_glue() {
    let out_dir = setup_test_output("class_without_natives_skips_glue");
    let bar = SymbolicSource::from_json(r#"{ "name": "com.example.Bar", "modifiers": ["public"] }"#)
        .unwrap();
    let generator = Generator::new(GenerationConfig::default());

    let files = generator
        .write_class(&bar, &out_dir, &[OutputKind::Glue])
        .unwrap();
    assert!(files.is_empty());
    assert!(!out_dir.join("glue").exists());
}

#[test]
fn test_fusion_header_is_idempotent() {
    let out_dir = setup_test_output("fusion_header_is_idempotent");
    let classes = SymbolicSource::from_json_many(&format!(
        "[{FOO}, {{ \"name\": \"com.example.Bar\", \"modifiers\": [\"public\"] }}]"
    ))
    .unwrap();
    let config = GenerationConfig::builder()
        .namespace("my::jni")
        .fusion_file_name("proxies.h")
        .build();
    let generator = Generator::new(config);

    for _ in 0..2 {
        for class in &classes {
            generator
                .write_class(class, &out_dir, &[OutputKind::Proxy])
                .unwrap();
        }
    }

    let fusion = fs::read_to_string(out_dir.join("proxy/proxies.h")).unwrap();
    assert!(fusion.contains("inline bool initAllProxies(JNIEnv* env) {"));
    assert_eq!(fusion.matches("&& ::my::jni::FooProxy::initClazz(env)").count(), 1);
    assert_eq!(fusion.matches("&& ::my::jni::BarProxy::initClazz(env)").count(), 1);
    assert_eq!(fusion.matches("#include \"my_jni_FooProxy.h\"").count(), 1);
    assert!(
        fusion.find("FooProxy::initClazz").unwrap() < fusion.find("BarProxy::initClazz").unwrap()
    );
}

#[test]
fn test_batch_isolates_failures() {
    let out_dir = setup_test_output("batch_isolates_failures");
    let good = SymbolicSource::from_json(FOO).unwrap();
    let bad = SymbolicSource::from_json(r#"{ "name": "com/example/Bad" }"#).unwrap();
    let generator = Generator::new(GenerationConfig::default());

    let models: [&dyn ClassModel; 2] = [&bad, &good];
    let report = generator.process_batch(models, &out_dir, &[OutputKind::Glue, OutputKind::Proxy]);

    assert!(!report.is_success());
    assert_eq!(report.generated, vec!["com.example.Foo"]);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].0, "com/example/Bad");
    assert!(matches!(report.failures[0].1, Error::InvalidInput(_)));
    assert!(out_dir.join("proxy/FooProxy.h").is_file());
    assert!(out_dir.join("glue/Foo.h").is_file());
}
