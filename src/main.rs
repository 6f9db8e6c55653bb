use clap::{Arg, ArgAction, ArgMatches, Command};
use owo_colors::OwoColorize;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use impostor::canonical::{Canonicalize, Gofmt, Identity};
use impostor::schema;

/// Settings for one `generate` run, as given on the command line.
#[derive(Debug)]
struct Options {
    schema: PathBuf,
    output: Option<PathBuf>,
    canonicalize: bool,
    gofmt: Option<String>,
    command_line: Option<String>,
    write_invalid: bool,
}

impl Options {
    fn from_matches(submatches: &ArgMatches) -> Options {
        Options {
            schema: submatches
                .get_one::<String>("schema")
                .map(PathBuf::from)
                .unwrap_or_default(),
            output: submatches
                .get_one::<String>("output")
                .map(PathBuf::from),
            canonicalize: submatches
                .get_one::<String>("canonicalize")
                .map(|choice| choice != "none")
                .unwrap_or(true),
            gofmt: submatches
                .get_one::<String>("gofmt")
                .cloned(),
            command_line: submatches
                .get_one::<String>("command-line")
                .cloned(),
            write_invalid: submatches.get_flag("write-invalid"),
        }
    }
}

fn main() {
    const VERSION: &str = concat!("v", env!("CARGO_PKG_VERSION"));

    let matches = Command::new("impostor")
        .version(VERSION)
        .propagate_version(true)
        .about("Generate call-recording fakes of Go interfaces for use in tests.")
        .disable_help_subcommand(true)
        .subcommand(
            Command::new("generate")
                .about("Render fakes for the interfaces described in a schema file")
                .arg(
                    Arg::new("verbose")
                        .short('v')
                        .long("verbose")
                        .action(ArgAction::SetTrue)
                        .help("Log progress to standard error. IMPOSTOR_LOG takes precedence if set."),
                )
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .value_name("FILE")
                        .help("Write the generated source to this file instead of standard output."),
                )
                .arg(
                    Arg::new("canonicalize")
                        .long("canonicalize")
                        .value_parser(["gofmt", "none"])
                        .default_value("gofmt")
                        .help("How to format and check the generated source."),
                )
                .arg(
                    Arg::new("gofmt")
                        .long("gofmt")
                        .value_name("PROGRAM")
                        .help("The gofmt executable to canonicalize with, if it is not the one on PATH."),
                )
                .arg(
                    Arg::new("command-line")
                        .long("command-line")
                        .value_name("TEXT")
                        .help("Command line to record in the header comment. Defaults to the one in the schema, or failing that this invocation."),
                )
                .arg(
                    Arg::new("write-invalid")
                        .long("write-invalid")
                        .action(ArgAction::SetTrue)
                        .help("If the generated source fails to canonicalize, write the raw text anyway so it can be inspected."),
                )
                .arg(
                    Arg::new("schema")
                        .required(true)
                        .help("The JSON file describing the interfaces to generate fakes for."),
                ),
        )
        .get_matches();

    match matches.subcommand() {
        Some(("generate", submatches)) => {
            init_logging(submatches.get_flag("verbose"));

            let options = Options::from_matches(submatches);
            debug!(?options);

            std::process::exit(run(&options));
        }
        Some(_) => {
            println!("No valid subcommand was used")
        }
        None => {
            println!("usage: impostor [COMMAND] ...");
            println!("Try '--help' for more information.");
        }
    }
}

fn init_logging(verbose: bool) {
    let filter = match EnvFilter::try_from_env("IMPOSTOR_LOG") {
        Ok(filter) => filter,
        Err(_) if verbose => EnvFilter::new("debug"),
        Err(_) => return,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    debug!("tracing initialized");
}

fn run(options: &Options) -> i32 {
    let content = match schema::load(&options.schema) {
        Ok(content) => content,
        Err(error) => {
            report(&error.to_string());
            return 1;
        }
    };

    let mut schema = match schema::parse(&options.schema, &content) {
        Ok(schema) => schema,
        Err(error) => {
            report(&error.to_string());
            return 1;
        }
    };

    if let Some(command_line) = &options.command_line {
        schema.command_line = command_line.clone();
    } else if schema
        .command_line
        .is_empty()
    {
        schema.command_line = invocation();
    }

    let canonicalizer: Box<dyn Canonicalize> = if options.canonicalize {
        match &options.gofmt {
            Some(program) => Box::new(Gofmt::with_program(program)),
            None => Box::new(Gofmt::new()),
        }
    } else {
        Box::new(Identity)
    };

    match impostor::generate(&schema, canonicalizer.as_ref()) {
        Ok(text) => match write_output(options.output.as_deref(), &text) {
            Ok(()) => 0,
            Err(error) => {
                report(&format!("Failed writing output: {}", error));
                1
            }
        },
        Err(error) => {
            report(&error.to_string());

            if options.write_invalid {
                if let Some(raw) = error.raw() {
                    if let Err(error) = write_output(options.output.as_deref(), raw) {
                        report(&format!("Failed writing output: {}", error));
                    }
                }
            }
            1
        }
    }
}

fn report(problem: &str) {
    eprintln!("{}: {}", "error".bright_red(), problem.bold());
}

// What was actually run, with the program reduced to its file name.
fn invocation() -> String {
    let mut args: Vec<String> = std::env::args().collect();

    let program = args
        .first()
        .and_then(|first| {
            Path::new(first)
                .file_name()
                .map(|name| {
                    name.to_string_lossy()
                        .to_string()
                })
        });
    if let Some(program) = program {
        args[0] = program;
    }

    args.join(" ")
}

fn write_output(target: Option<&Path>, text: &str) -> std::io::Result<()> {
    match target {
        Some(path) => {
            info!("Writing {}", path.display());
            std::fs::write(path, text)
        }
        None => std::io::stdout().write_all(text.as_bytes()),
    }
}
