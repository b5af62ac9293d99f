//! Generate C++ JNI bindings from a description of a Java class.
//!
//! Two kinds of output are produced per class:
//!
//! - **glue**: `extern "C"` entry points for the class's `native` methods,
//!   with stub bodies and a `registerNativeFunctions` helper;
//! - **proxy**: a C++ class that calls back into Java through method and
//!   field ids resolved lazily, once, by a generated `initClazz`.
//!
//! Proxies can additionally be aggregated into one fusion header whose
//! `initAllProxies` initialises all of them.
//!
//! ```
//! use jni_cppgen::{
//!     model::{Modifiers, Parameter, Primitive, SymbolicSource, TypeDescriptor},
//!     GenerationConfig, Generator,
//! };
//!
//! let int = || TypeDescriptor::from(Primitive::Int);
//! let foo = SymbolicSource::new("com.example.Foo").with_method(
//!     "add",
//!     int(),
//!     vec![Parameter::new("a", int()), Parameter::new("b", int())],
//!     Modifiers::PUBLIC | Modifiers::STATIC | Modifiers::NATIVE,
//! );
//!
//! let generator = Generator::new(GenerationConfig::default());
//! let glue = generator.generate_glue(&foo).unwrap();
//! assert!(glue.header.content.contains(
//!     "JNIEXPORT jint JNICALL Java_com_example_Foo_add(JNIEnv* env, jclass clazz, jint a, jint b);"
//! ));
//! ```

// crate errors
pub mod error;

// where class descriptions come from
pub mod model;

// JVM descriptors and JNI type names
pub mod descriptor;
// JNI symbols and C++ identifiers
pub mod mangle;

pub mod class_info;
pub mod config;
pub mod resolver;

// C++ text for glue and proxies
pub mod emit;
pub mod fusion;

pub mod generator;

pub use class_info::ClassInfo;
pub use config::{GenerationConfig, GenerationConfigBuilder, Namespace};
pub use error::{Error, Result};
pub use generator::{BatchReport, Generator, OutputKind};
pub use resolver::{OverloadResolver, ResolvedMember};
