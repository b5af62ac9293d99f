use jni_cppgen::{
    descriptor, mangle,
    model::{ClassModel, Method, Modifiers, Parameter, Primitive, SymbolicSource, TypeDescriptor},
    ClassInfo, OverloadResolver,
};

#[test]
fn test_descriptors_of_java_names() {
    let cases = [
        ("boolean", "Z"),
        ("long[]", "[J"),
        ("java.lang.String", "Ljava/lang/String;"),
        ("java.util.List<java.lang.String>", "Ljava/util/List;"),
        ("byte[][]", "[[B"),
        ("Object...", "[LObject;"),
    ];
    for (java, jvm) in cases {
        let ty = TypeDescriptor::from_java_name(java).unwrap();
        assert_eq!(descriptor::encode(&ty).unwrap(), jvm, "{java}");
    }
}

#[test]
fn test_descriptor_parses_back() {
    for jvm in ["I", "[[D", "Ljava/lang/Object;", "[Ljava/lang/String;"] {
        let ty = TypeDescriptor::from_descriptor(jvm).unwrap();
        assert_eq!(descriptor::encode(&ty).unwrap(), jvm);
    }
}

#[test]
fn test_method_descriptor() {
    let params = [
        TypeDescriptor::from(Primitive::Int),
        TypeDescriptor::declared("java.lang.String"),
    ];
    let descriptor = descriptor::encode_method(&params, &Primitive::Boolean.into()).unwrap();
    assert_eq!(descriptor, "(ILjava/lang/String;)Z");
}

#[test]
fn test_native_symbols() {
    let class = mangle::jni_class_name("com.example.My_Class");
    assert_eq!(class, "com_example_My_1Class");
    assert_eq!(
        mangle::native_symbol_name(&class, "run"),
        "Java_com_example_My_1Class_run"
    );
    assert_eq!(
        mangle::native_overloaded_symbol_name(&class, "run", "[ILjava/lang/String;"),
        "Java_com_example_My_1Class_run___3ILjava_lang_String_2"
    );
    assert_eq!(mangle::escape_to_ascii("caf\u{e9}"), "caf_000e9");
}

#[test]
fn test_overloads_get_distinct_names() {
    let string = || TypeDescriptor::declared("java.lang.String");
    let model = SymbolicSource::new("com.example.Foo")
        .with_method("foo", TypeDescriptor::VOID, vec![], Modifiers::PUBLIC)
        .with_method(
            "foo",
            TypeDescriptor::VOID,
            vec![Parameter::new("i", Primitive::Int.into())],
            Modifiers::PUBLIC,
        )
        .with_method(
            "foo",
            TypeDescriptor::VOID,
            vec![Parameter::new("s", string())],
            Modifiers::PUBLIC,
        )
        .with_method("bar", TypeDescriptor::VOID, vec![], Modifiers::PUBLIC);

    let class = ClassInfo::new(&model).unwrap();
    let methods: Vec<Method> = model.methods().to_vec();
    let resolved = OverloadResolver::new(&class).resolve(&methods).unwrap();

    let names: Vec<_> = resolved.iter().map(|m| m.cpp_name()).collect();
    assert_eq!(names, ["foo__", "foo__I", "foo__Ljava_lang_String_2", "bar"]);
    let slots: Vec<_> = resolved.iter().map(|m| m.slot_name()).collect();
    assert_eq!(
        slots,
        ["sMethod_foo_0", "sMethod_foo_1", "sMethod_foo_2", "sMethod_bar_0"]
    );
}
