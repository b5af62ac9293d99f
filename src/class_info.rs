use crate::{
    error::{Error, Result},
    mangle,
    model::{ClassModel, TypeDescriptor},
};

/// Suffix appended to a class's simple name to name its C++ proxy.
pub const PROXY_SUFFIX: &str = "Proxy";

/// Every name form of one class, derived once from its model.
///
/// All forms are computed together in [`ClassInfo::new`] and never change, so
/// they always agree with the qualified name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassInfo {
    simple_name: String,
    qualified_name: String,
    slash_name: String,
    jni_name: String,
    cpp_class_name: String,
    enclosing_instance: Option<TypeDescriptor>,
}

impl ClassInfo {
    pub fn new(model: &dyn ClassModel) -> Result<Self> {
        let qualified_name = model.name().trim();
        if qualified_name.is_empty() {
            return Err(Error::InvalidInput(
                "class model has no qualified name".into(),
            ));
        }
        let simple_name = model.simple_name().trim();
        if simple_name.is_empty() {
            return Err(Error::InvalidInput(format!(
                "class model `{qualified_name}` has no simple name"
            )));
        }
        if qualified_name.contains(['/', ';', '[', ' ']) {
            return Err(Error::InvalidInput(format!(
                "`{qualified_name}` is not a dotted binary class name"
            )));
        }

        let simple_name = mangle::cpp_identifier(simple_name);
        Ok(ClassInfo {
            cpp_class_name: format!("{simple_name}{PROXY_SUFFIX}"),
            simple_name,
            slash_name: qualified_name.replace('.', "/"),
            jni_name: mangle::jni_class_name(qualified_name),
            qualified_name: qualified_name.to_owned(),
            enclosing_instance: model.enclosing_instance().cloned(),
        })
    }

    /// Simple name, usable as a C++ identifier.
    pub fn simple_name(&self) -> &str {
        &self.simple_name
    }

    /// Dotted binary name (`com.example.Outer$Inner`).
    pub fn qualified_name(&self) -> &str {
        &self.qualified_name
    }

    /// Internal name as `FindClass` expects it (`com/example/Outer$Inner`).
    pub fn slash_name(&self) -> &str {
        &self.slash_name
    }

    /// Class part of native symbols (`com_example_Outer_00024Inner`).
    pub fn jni_name(&self) -> &str {
        &self.jni_name
    }

    /// Name of the generated C++ proxy class.
    pub fn cpp_class_name(&self) -> &str {
        &self.cpp_class_name
    }

    /// Enclosing instance type when the class is an inner class.
    pub fn enclosing_instance(&self) -> Option<&TypeDescriptor> {
        self.enclosing_instance.as_ref()
    }

    pub fn is_inner_class(&self) -> bool {
        self.enclosing_instance.is_some()
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::model::SymbolicSource;

    #[test]
    fn name_forms() {
        let info = ClassInfo::new(&SymbolicSource::new("com.my_app.Outer$Inner")).unwrap();
        assert_eq!(info.simple_name(), "Inner");
        assert_eq!(info.qualified_name(), "com.my_app.Outer$Inner");
        assert_eq!(info.slash_name(), "com/my_app/Outer$Inner");
        assert_eq!(info.jni_name(), "com_my_1app_Outer_00024Inner");
        assert_eq!(info.cpp_class_name(), "InnerProxy");
        assert!(!info.is_inner_class());
    }

    #[test]
    fn missing_names_are_rejected() {
        assert_matches!(
            ClassInfo::new(&SymbolicSource::new("")),
            Err(Error::InvalidInput(_))
        );
        assert_matches!(
            ClassInfo::new(&SymbolicSource::new("com.example.")),
            Err(Error::InvalidInput(_))
        );
        assert_matches!(
            ClassInfo::new(&SymbolicSource::new("com/example/Foo")),
            Err(Error::InvalidInput(_))
        );
    }
}
