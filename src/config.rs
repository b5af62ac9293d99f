//! Generation options.

/// A C++ namespace path such as `a::b`, possibly empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Namespace {
    segments: Vec<String>,
}

impl Namespace {
    /// Parse `a::b`. Empty segments are dropped, so `""` and `"::"` are the
    /// global namespace.
    pub fn new(path: &str) -> Self {
        Namespace {
            segments: path
                .split("::")
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_owned)
                .collect(),
        }
    }

    pub fn is_global(&self) -> bool {
        self.segments.is_empty()
    }

    /// `a::b`
    pub fn path(&self) -> String {
        self.segments.join("::")
    }

    /// `namespace a { namespace b {`, or nothing for the global namespace.
    pub fn begin(&self) -> String {
        self.segments
            .iter()
            .map(|s| format!("namespace {s} {{"))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// `} } // endof namespace a::b`, or nothing for the global namespace.
    pub fn end(&self) -> String {
        if self.is_global() {
            return String::new();
        }
        format!(
            "{} // endof namespace {}",
            vec!["}"; self.segments.len()].join(" "),
            self.path()
        )
    }

    /// Prefix for generated file names: `a_b_`.
    pub fn file_prefix(&self) -> String {
        self.segments.iter().map(|s| format!("{s}_")).collect()
    }

    /// `a::b::Name`, or `Name` in the global namespace.
    pub fn qualify(&self, name: &str) -> String {
        if self.is_global() {
            name.to_owned()
        } else {
            format!("{}::{}", self.path(), name)
        }
    }
}

/// Options for one generation run.
///
/// Built once, with [`GenerationConfig::builder`] or `Default`, and passed by
/// reference to every stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationConfig {
    thread_safe: bool,
    use_jni_helper: bool,
    header_only_proxy: bool,
    only_public_members: bool,
    generate_all_field_accessors: bool,
    generate_all_methods: bool,
    glue_source: bool,
    error_logger: Option<String>,
    namespace: Namespace,
    fusion_file_name: Option<String>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        GenerationConfig {
            thread_safe: true,
            use_jni_helper: false,
            header_only_proxy: false,
            only_public_members: true,
            generate_all_field_accessors: true,
            generate_all_methods: true,
            glue_source: true,
            error_logger: None,
            namespace: Namespace::default(),
            fusion_file_name: None,
        }
    }
}

impl GenerationConfig {
    pub fn builder() -> GenerationConfigBuilder {
        GenerationConfigBuilder {
            config: GenerationConfig::default(),
        }
    }

    /// Guard class init with a double-checked lock.
    pub fn thread_safe(&self) -> bool {
        self.thread_safe
    }

    /// Emit proxies over the RAII reference wrappers of `jnihelper.h`.
    pub fn use_jni_helper(&self) -> bool {
        self.use_jni_helper
    }

    /// Put every proxy definition in the header and emit no `.cpp`.
    pub fn header_only_proxy(&self) -> bool {
        self.header_only_proxy
    }

    /// Leave non-public members out of proxies.
    pub fn only_public_members(&self) -> bool {
        self.only_public_members
    }

    /// Generate getters and setters for fields without an explicit request.
    pub fn generate_all_field_accessors(&self) -> bool {
        self.generate_all_field_accessors
    }

    /// Proxy methods without an explicit opt-in.
    pub fn generate_all_methods(&self) -> bool {
        self.generate_all_methods
    }

    /// Emit the glue `.cpp` with stub bodies.
    pub fn glue_source(&self) -> bool {
        self.glue_source
    }

    /// Function called instead of `ExceptionDescribe` when class init fails.
    pub fn error_logger(&self) -> Option<&str> {
        self.error_logger.as_deref()
    }

    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    /// File the init calls of all proxies are aggregated into.
    pub fn fusion_file_name(&self) -> Option<&str> {
        self.fusion_file_name.as_deref()
    }
}

/// Builder for [`GenerationConfig`]; unset options keep their defaults.
#[derive(Debug, Clone)]
pub struct GenerationConfigBuilder {
    config: GenerationConfig,
}

impl GenerationConfigBuilder {
    pub fn thread_safe(mut self, value: bool) -> Self {
        self.config.thread_safe = value;
        self
    }

    pub fn use_jni_helper(mut self, value: bool) -> Self {
        self.config.use_jni_helper = value;
        self
    }

    pub fn header_only_proxy(mut self, value: bool) -> Self {
        self.config.header_only_proxy = value;
        self
    }

    pub fn only_public_members(mut self, value: bool) -> Self {
        self.config.only_public_members = value;
        self
    }

    pub fn generate_all_field_accessors(mut self, value: bool) -> Self {
        self.config.generate_all_field_accessors = value;
        self
    }

    pub fn generate_all_methods(mut self, value: bool) -> Self {
        self.config.generate_all_methods = value;
        self
    }

    pub fn glue_source(mut self, value: bool) -> Self {
        self.config.glue_source = value;
        self
    }

    /// An empty name means no logger.
    pub fn error_logger(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.config.error_logger = if name.trim().is_empty() {
            None
        } else {
            Some(name.trim().to_owned())
        };
        self
    }

    pub fn namespace(mut self, path: &str) -> Self {
        self.config.namespace = Namespace::new(path);
        self
    }

    /// An empty name disables fusion output.
    pub fn fusion_file_name(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.config.fusion_file_name = if name.trim().is_empty() {
            None
        } else {
            Some(name.trim().to_owned())
        };
        self
    }

    pub fn build(self) -> GenerationConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn namespace_forms() {
        let ns = Namespace::new("a::b");
        assert_eq!(ns.begin(), "namespace a { namespace b {");
        assert_eq!(ns.end(), "} } // endof namespace a::b");
        assert_eq!(ns.file_prefix(), "a_b_");
        assert_eq!(ns.qualify("FooProxy"), "a::b::FooProxy");
    }

    #[test]
    fn global_namespace() {
        for path in ["", "::", " "] {
            let ns = Namespace::new(path);
            assert!(ns.is_global());
            assert_eq!(ns.begin(), "");
            assert_eq!(ns.end(), "");
            assert_eq!(ns.file_prefix(), "");
            assert_eq!(ns.qualify("FooProxy"), "FooProxy");
        }
    }

    #[test]
    fn defaults() {
        let config = GenerationConfig::default();
        assert!(config.thread_safe());
        assert!(!config.use_jni_helper());
        assert!(!config.header_only_proxy());
        assert!(config.only_public_members());
        assert!(config.generate_all_field_accessors());
        assert_eq!(config.error_logger(), None);
        assert_eq!(config.fusion_file_name(), None);
    }

    #[test]
    fn builder_overrides() {
        let config = GenerationConfig::builder()
            .thread_safe(false)
            .namespace("jni::gen")
            .error_logger("  ")
            .fusion_file_name("proxies.h")
            .build();
        assert!(!config.thread_safe());
        assert_eq!(config.namespace().path(), "jni::gen");
        assert_eq!(config.error_logger(), None);
        assert_eq!(config.fusion_file_name(), Some("proxies.h"));
    }
}
