//! Command-line interface for mau
//! This binary compiles a mau file and prints the resulting tree in one of the output formats.
//!
//! Usage:
//!   mau `<path>` [--format `<format>`] [--config `<file>`] [--set `<key=value>`]...
//!   mau --list-formats                                   - List all available formats

use clap::{Arg, ArgAction, Command};
use log::debug;
use mau::mau::config::Loader;
use mau::mau::error::format_source_context;
use mau::mau::formats::FormatRegistry;
use mau::mau::loader::DocumentLoader;
use mau::mau::{Environment, MauError};

fn main() {
    env_logger::init();

    let matches = Command::new("mau")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Compile mau documents and inspect the resulting tree")
        .arg_required_else_help(true)
        .arg(
            Arg::new("path")
                .help("Path to the mau file")
                .required_unless_present("list-formats")
                .index(1),
        )
        .arg(
            Arg::new("format")
                .long("format")
                .short('f')
                .help("Output format (json, yaml, treeviz)")
                .default_value("treeviz"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .help("TOML file layered over the built-in defaults"),
        )
        .arg(
            Arg::new("set")
                .long("set")
                .short('s')
                .help("Override a configuration key, e.g. mau.parser.wrap_document=false")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("list-formats")
                .long("list-formats")
                .help("List available output formats")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    let registry = FormatRegistry::with_defaults();

    if matches.get_flag("list-formats") {
        handle_list_formats_command(&registry);
        return;
    }

    let Some(path) = matches.get_one::<String>("path") else {
        eprintln!("A path is required");
        std::process::exit(2);
    };
    let format = matches
        .get_one::<String>("format")
        .map(String::as_str)
        .unwrap_or("treeviz");
    let config = matches.get_one::<String>("config");
    let overrides: Vec<&String> = matches
        .get_many::<String>("set")
        .map(|values| values.collect())
        .unwrap_or_default();

    let environment = load_environment(config, &overrides).unwrap_or_else(|err| {
        eprintln!("{}", err);
        std::process::exit(1);
    });

    handle_compile_command(path, format, environment, &registry);
}

fn load_environment(config: Option<&String>, overrides: &[&String]) -> Result<Environment, MauError> {
    let mut loader = Loader::new();
    if let Some(config) = config {
        loader = loader.with_file(config);
    }
    for assignment in overrides {
        loader = loader.set_assignment(assignment)?;
    }
    loader.build()
}

/// Handle the compile command
fn handle_compile_command(
    path: &str,
    format: &str,
    environment: Environment,
    registry: &FormatRegistry,
) {
    if !registry.has(format) {
        eprintln!("Format '{}' not supported", format);
        eprintln!("Available formats: {}", registry.list_formats().join(", "));
        std::process::exit(1);
    }

    let loader = DocumentLoader::from_path(path)
        .unwrap_or_else(|err| {
            eprintln!("{}", err);
            std::process::exit(1);
        })
        .with_environment(environment);

    let compilation = loader.parse().unwrap_or_else(|err| {
        report(&err, path, loader.source());
        std::process::exit(1);
    });
    debug!("compiled {} nodes", compilation.ast.len());

    match registry.serialize(&compilation.ast, compilation.document, format) {
        Ok(output) => print!("{}", output),
        Err(err) => {
            eprintln!("Error formatting output: {}", err);
            std::process::exit(1);
        }
    }
}

/// Print a fatal error, with an excerpt when it points into the main file
fn report(err: &MauError, path: &str, source: &str) {
    eprintln!("{}", err);
    if let Some(context) = err.context() {
        let in_main_file = context.source.as_deref().map_or(true, |source| source == path);
        if in_main_file {
            eprintln!("\n{}", format_source_context(source, context));
        }
    }
}

/// Handle the list-formats command
fn handle_list_formats_command(registry: &FormatRegistry) {
    println!("Available output formats:\n");

    for name in registry.list_formats() {
        println!("  {}", name);
        if let Some(formatter) = registry.get(&name) {
            println!("    {}", formatter.description());
        }
        println!();
    }
}
