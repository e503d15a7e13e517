//! minisheet - A small CSV spreadsheet driven from the command line

mod config;
mod error;
mod render;
mod session;

use anyhow::Context;
use minisheet_core::Document;
use session::{Flow, Session};
use std::env;
use std::io::Read;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn print_usage() {
    eprintln!("Usage: minisheet [OPTIONS] [FILE]");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  [FILE]                    CSV file to open");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -c, --command <FORMULA>   Evaluate a formula against the sheet and print it");
    eprintln!("  -x, --exec <CMD>          Run a session command (can be repeated)");
    eprintln!("  -s, --script <FILE|->     Run session commands from a file or stdin");
    eprintln!("  -o, --output <FILE>       Export evaluated CSV after running commands");
    eprintln!("  --config <FILE>           Read settings from FILE");
    eprintln!("  -h, --help                Print help");
    eprintln!();
    eprintln!("{}", session::HELP);
    eprintln!();
    eprintln!("Set MINISHEET_LOG (e.g. MINISHEET_LOG=debug) to enable logging on stderr.");
}

/// Install the stderr log subscriber. Defaults to warnings only.
fn init_tracing() {
    let filter = EnvFilter::try_from_env("MINISHEET_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

struct Options {
    file_path: Option<PathBuf>,
    command: Option<String>,
    exec: Vec<String>,
    script: Option<String>,
    output_file: Option<PathBuf>,
    config_file: Option<PathBuf>,
}

fn next_value(args: &[String], i: &mut usize, what: &str) -> String {
    *i += 1;
    if *i >= args.len() {
        eprintln!("Error: {} requires {}", args[*i - 1], what);
        std::process::exit(1);
    }
    args[*i].clone()
}

fn parse_args(args: &[String]) -> Options {
    let mut opts = Options {
        file_path: None,
        command: None,
        exec: Vec::new(),
        script: None,
        output_file: None,
        config_file: None,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                print_usage();
                std::process::exit(0);
            }
            "-c" | "--command" => {
                opts.command = Some(next_value(args, &mut i, "a formula"));
            }
            "-x" | "--exec" => {
                opts.exec.push(next_value(args, &mut i, "a command"));
            }
            "-s" | "--script" => {
                opts.script = Some(next_value(args, &mut i, "a file path"));
            }
            "-o" | "--output" => {
                opts.output_file = Some(PathBuf::from(next_value(args, &mut i, "a file path")));
            }
            "--config" => {
                opts.config_file = Some(PathBuf::from(next_value(args, &mut i, "a file path")));
            }
            arg if arg.starts_with('-') => {
                eprintln!("Error: Unknown option: {}", arg);
                print_usage();
                std::process::exit(1);
            }
            _ => {
                if opts.file_path.is_none() {
                    opts.file_path = Some(PathBuf::from(&args[i]));
                } else {
                    eprintln!("Error: Unexpected argument: {}", args[i]);
                    print_usage();
                    std::process::exit(1);
                }
            }
        }
        i += 1;
    }
    opts
}

fn read_script(source: &str) -> anyhow::Result<String> {
    if source == "-" {
        let mut content = String::new();
        std::io::stdin()
            .read_to_string(&mut content)
            .context("Failed to read script from stdin")?;
        Ok(content)
    } else {
        std::fs::read_to_string(source).with_context(|| format!("Failed to read script {}", source))
    }
}

/// Run everything the options ask for. Returns the process exit code.
fn run(opts: Options) -> anyhow::Result<i32> {
    let (config, warnings) = config::load_config(opts.config_file.as_deref());
    for warning in warnings {
        eprintln!("Warning: {}", warning);
    }

    let doc = match &opts.file_path {
        Some(path) => Document::with_file(Some(path.clone()), config)
            .with_context(|| format!("Failed to open {}", path.display()))?,
        None => Document::with_config(config),
    };

    let table_only = opts.command.is_none()
        && opts.exec.is_empty()
        && opts.script.is_none()
        && opts.output_file.is_none();

    let stdout = std::io::stdout();
    let mut session = Session::new(doc, stdout.lock());

    let mut flow = Flow::Continue;
    for (idx, line) in opts.exec.iter().enumerate() {
        flow = session.run_line(line, idx + 1);
        if flow == Flow::Quit {
            break;
        }
    }
    if flow == Flow::Continue
        && let Some(source) = &opts.script
    {
        let script = read_script(source)?;
        session.run_script(&script);
    }

    let mut code = if session.failures() > 0 { 1 } else { 0 };

    if let Some(formula) = &opts.command {
        let formula = if formula.starts_with('=') {
            formula.clone()
        } else {
            format!("={}", formula)
        };
        match session.doc.evaluate(&formula) {
            Ok(value) => println!("{}", minisheet_engine::engine::format_number(value)),
            Err(err) => {
                println!("{}", err.marker());
                code = 1;
            }
        }
    }

    if let Some(output_path) = &opts.output_file {
        session
            .doc
            .export_csv(output_path)
            .with_context(|| format!("Failed to write {}", output_path.display()))?;
        eprintln!("Exported to {}", output_path.display());
    }

    if table_only {
        render::write_table(&mut std::io::stdout().lock(), &session.doc)?;
    }

    Ok(code)
}

fn main() {
    init_tracing();
    let args: Vec<String> = env::args().collect();
    let opts = parse_args(&args);

    match run(opts) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}
