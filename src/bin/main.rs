//! jni-cppgen CLI - Generate C++ JNI glue and proxies from Java classes

use clap::{Args as ClapArgs, Parser, Subcommand};
use jni_cppgen::{
    model::{ClassModel, ReflectedSource, SymbolicSource},
    GenerationConfig, Generator, OutputKind,
};
use std::path::{Path, PathBuf};
use std::process;

/// Generate C++ JNI glue stubs and callback proxies from .class files or
/// JSON class descriptions
#[derive(Parser, Debug)]
#[command(name = "jni-cppgen")]
#[command(version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate extern "C" stubs for native methods
    Glue(Options),
    /// Generate C++ proxy classes calling back into Java
    Proxy(Options),
    /// Generate both glue and proxies
    Both(Options),
}

#[derive(ClapArgs, Debug)]
struct Options {
    /// .class files or JSON class descriptions (one class or an array)
    #[arg(long = "input", value_name = "FILE", required = true)]
    inputs: Vec<PathBuf>,

    /// Output directory; files go to its glue/ and proxy/ sub-directories
    #[arg(short, long, value_name = "DIR")]
    out: PathBuf,

    /// C++ namespace for generated code (e.g. "my::jni")
    #[arg(long, default_value = "", value_name = "PATH")]
    namespace: String,

    /// Do not guard class initialisation with a lock
    #[arg(long)]
    no_thread_safe: bool,

    /// Generate proxies over the jnihelper.h reference wrappers
    #[arg(long)]
    use_jni_helper: bool,

    /// Put all proxy code in the header
    #[arg(long)]
    header_only: bool,

    /// Include non-public members in proxies
    #[arg(long)]
    all_members: bool,

    /// Only generate field accessors requested by annotation
    #[arg(long)]
    no_field_accessors: bool,

    /// Only proxy methods requested by annotation
    #[arg(long)]
    no_all_methods: bool,

    /// Emit only glue headers, with registerNativeFunctions inline
    #[arg(long)]
    no_glue_source: bool,

    /// Function called as fn(JNIEnv*, const char*) when class init fails
    #[arg(long, value_name = "FUNCTION")]
    error_logger: Option<String>,

    /// File name of the header aggregating every proxy's initClazz
    #[arg(long, value_name = "FILE")]
    fusion: Option<String>,
}

impl Options {
    fn config(&self) -> GenerationConfig {
        GenerationConfig::builder()
            .thread_safe(!self.no_thread_safe)
            .use_jni_helper(self.use_jni_helper)
            .header_only_proxy(self.header_only)
            .only_public_members(!self.all_members)
            .generate_all_field_accessors(!self.no_field_accessors)
            .generate_all_methods(!self.no_all_methods)
            .glue_source(!self.no_glue_source)
            .error_logger(self.error_logger.clone().unwrap_or_default())
            .namespace(&self.namespace)
            .fusion_file_name(self.fusion.clone().unwrap_or_default())
            .build()
    }
}

fn load(input: &Path) -> jni_cppgen::Result<Vec<Box<dyn ClassModel>>> {
    let extension = input.extension().and_then(|s| s.to_str()).unwrap_or("");
    Ok(match extension {
        "class" => vec![Box::new(ReflectedSource::from_file(input)?) as Box<dyn ClassModel>],
        _ => SymbolicSource::load(input)?
            .into_iter()
            .map(|source| Box::new(source) as Box<dyn ClassModel>)
            .collect(),
    })
}

fn main() {
    pretty_env_logger::formatted_timed_builder()
        .filter_module("jni_cppgen", log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let args = Args::parse();

    let (options, kinds): (Options, &[OutputKind]) = match args.command {
        Command::Glue(options) => (options, &[OutputKind::Glue]),
        Command::Proxy(options) => (options, &[OutputKind::Proxy]),
        Command::Both(options) => (options, &[OutputKind::Glue, OutputKind::Proxy]),
    };

    let mut models = Vec::new();
    for input in &options.inputs {
        if !input.exists() {
            eprintln!("Error: Input file not found: {}", input.display());
            process::exit(1);
        }
        match load(input) {
            Ok(loaded) => models.extend(loaded),
            Err(e) => {
                eprintln!("Error reading {}: {}", input.display(), e);
                process::exit(1);
            }
        }
    }

    let generator = Generator::new(options.config());
    let report = generator.process_batch(
        models.iter().map(|m| &**m as &dyn ClassModel),
        &options.out,
        kinds,
    );

    eprintln!(
        "Generated {} class(es), {} file(s) in {}",
        report.generated.len(),
        report.files.len(),
        options.out.display()
    );
    if !report.is_success() {
        for (class, err) in &report.failures {
            eprintln!("Error generating {}: {}", class, err);
        }
        process::exit(1);
    }
}
