//! The per-class pipeline and the output writer.
//!
//! Classes are processed one at a time, to completion: names are derived
//! once into a [`ClassInfo`], both emitters render from it, the files are
//! written and the proxy is merged into the fusion header.

use std::{
    fs,
    path::{Path, PathBuf},
};

use log::{info, warn};

use crate::{
    class_info::ClassInfo,
    config::GenerationConfig,
    emit::{
        jni_helper_header, DefaultGlueRenderer, DefaultProxyRenderer, GeneratedClass,
        GlueEmitter, GlueRenderer, ProxyEmitter, ProxyRenderer,
    },
    error::{Error, Result},
    fusion::{self, FusionEntry},
    model::ClassModel,
};

/// Sub-directory glue files are written to.
pub const GLUE_DIR: &str = "glue";
/// Sub-directory proxy files and the fusion header are written to.
pub const PROXY_DIR: &str = "proxy";

/// Which artifacts to produce for a class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputKind {
    Glue,
    Proxy,
}

/// Outcome of [`Generator::process_batch`].
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Classes that were fully processed.
    pub generated: Vec<String>,
    /// Every file written, in order.
    pub files: Vec<PathBuf>,
    /// Classes that failed, with the reason. Other classes were unaffected.
    pub failures: Vec<(String, Error)>,
}

impl BatchReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Drives glue and proxy generation with one configuration.
#[derive(Debug, Clone)]
pub struct Generator<G = DefaultGlueRenderer, P = DefaultProxyRenderer> {
    config: GenerationConfig,
    glue: G,
    proxy: P,
}

impl Generator {
    pub fn new(config: GenerationConfig) -> Self {
        Generator::with_renderers(config, DefaultGlueRenderer, DefaultProxyRenderer)
    }
}

impl<G: GlueRenderer, P: ProxyRenderer> Generator<G, P> {
    pub fn with_renderers(config: GenerationConfig, glue: G, proxy: P) -> Self {
        Generator {
            config,
            glue,
            proxy,
        }
    }

    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    pub fn generate_glue(&self, model: &dyn ClassModel) -> Result<GeneratedClass> {
        let class = ClassInfo::new(model)?;
        self.glue_for(&class, model)
    }

    pub fn generate_proxy(&self, model: &dyn ClassModel) -> Result<GeneratedClass> {
        let class = ClassInfo::new(model)?;
        self.proxy_for(&class, model)
    }

    fn glue_for(&self, class: &ClassInfo, model: &dyn ClassModel) -> Result<GeneratedClass> {
        GlueEmitter::with_renderer(&self.config, &self.glue).emit(class, model)
    }

    fn proxy_for(&self, class: &ClassInfo, model: &dyn ClassModel) -> Result<GeneratedClass> {
        ProxyEmitter::with_renderer(&self.config, &self.proxy).emit(class, model)
    }

    /// Generate `kinds` for one class under `out_dir` and return the files
    /// written. A fusion header, when configured, is updated next to the
    /// proxies.
    pub fn write_class(
        &self,
        model: &dyn ClassModel,
        out_dir: &Path,
        kinds: &[OutputKind],
    ) -> Result<Vec<PathBuf>> {
        let class = ClassInfo::new(model)?;
        let mut written = Vec::new();

        if kinds.contains(&OutputKind::Glue) {
            if model.methods().iter().any(|m| m.modifiers.is_native()) {
                let glue = self.glue_for(&class, model)?;
                written.extend(write_files(&out_dir.join(GLUE_DIR), &glue)?);
            } else {
                info!("{} has no native methods, skipping glue", class.qualified_name());
            }
        }

        if kinds.contains(&OutputKind::Proxy) {
            let proxy = self.proxy_for(&class, model)?;
            let dir = out_dir.join(PROXY_DIR);
            written.extend(write_files(&dir, &proxy)?);

            if self.config.use_jni_helper() {
                let helper = jni_helper_header();
                let path = dir.join(&helper.name);
                fs::write(&path, &helper.content)?;
                info!("Generated {}", path.display());
                written.push(path);
            }

            if let Some(name) = self.config.fusion_file_name() {
                let entry = FusionEntry::new(
                    self.config.namespace(),
                    class.cpp_class_name(),
                    proxy.header.name.clone(),
                );
                let path = dir.join(name);
                fusion::merge_into_file(&path, &entry)?;
                if !written.contains(&path) {
                    written.push(path);
                }
            }
        }
        Ok(written)
    }

    /// Run [`Generator::write_class`] for every model. A failing class is
    /// logged and recorded; the rest of the batch still runs.
    pub fn process_batch<'m>(
        &self,
        models: impl IntoIterator<Item = &'m dyn ClassModel>,
        out_dir: &Path,
        kinds: &[OutputKind],
    ) -> BatchReport {
        let mut report = BatchReport::default();
        for model in models {
            let name = model.name().to_owned();
            match self.write_class(model, out_dir, kinds) {
                Ok(files) => {
                    report.generated.push(name);
                    report.files.extend(files);
                }
                Err(err) => {
                    warn!("Failed to generate {name}: {err}");
                    report.failures.push((name, err));
                }
            }
        }
        report
    }
}

fn write_files(dir: &Path, generated: &GeneratedClass) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)?;
    generated
        .files()
        .map(|file| {
            let path = dir.join(&file.name);
            fs::write(&path, &file.content)?;
            info!("Generated {}", path.display());
            Ok(path)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::model::{Modifiers, Primitive, SymbolicSource, TypeDescriptor};

    #[test]
    fn glue_and_proxy_share_class_names() {
        let model = SymbolicSource::new("com.example.Foo").with_method(
            "run",
            TypeDescriptor::VOID,
            vec![],
            Modifiers::PUBLIC | Modifiers::NATIVE,
        );
        let generator = Generator::new(GenerationConfig::default());
        let glue = generator.generate_glue(&model).unwrap();
        let proxy = generator.generate_proxy(&model).unwrap();
        assert_eq!(glue.header.name, "Foo.h");
        assert_eq!(proxy.header.name, "FooProxy.h");
        assert!(glue.header.content.contains("u8\"com/example/Foo\""));
        assert!(proxy.header.content.contains("u8\"com/example/Foo\""));
    }

    #[test]
    fn invalid_class_fails_alone() {
        let broken = SymbolicSource::new("");
        let fine = SymbolicSource::new("a.Fine").with_method(
            "size",
            Primitive::Int.into(),
            vec![],
            Modifiers::PUBLIC,
        );
        let dir = std::env::temp_dir().join("jni_cppgen_generator_unit");
        let generator = Generator::new(GenerationConfig::default());
        let models: [&dyn ClassModel; 2] = [&broken, &fine];
        let report = generator.process_batch(models, &dir, &[OutputKind::Proxy]);

        assert!(!report.is_success());
        assert_eq!(report.generated, vec!["a.Fine"]);
        assert_eq!(report.failures.len(), 1);
        assert_matches!(report.failures[0].1, Error::InvalidInput(_));
        assert!(dir.join(PROXY_DIR).join("FineProxy.h").is_file());
    }
}
