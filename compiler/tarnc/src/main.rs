//! Tarn CLI
//!
//! Runs scripts inside the sandboxed interpreter.

mod commands;
mod tracing_setup;

use commands::{check_file, eval_source, parse_options, run_file};

fn main() {
    tracing_setup::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        return;
    }

    let command = &args[1];

    let code = match command.as_str() {
        "run" => {
            let Some((path, options)) = file_and_options(&args, "run") else {
                std::process::exit(1);
            };
            run_file(path, &options)
        }
        "eval" => {
            let Some((source, options)) = file_and_options(&args, "eval") else {
                std::process::exit(1);
            };
            eval_source(source, &options)
        }
        "check" => {
            if args.len() < 3 {
                eprintln!("Usage: tarn check <file.tn>");
                std::process::exit(1);
            }
            check_file(&args[2])
        }
        "help" | "--help" | "-h" => {
            print_usage();
            0
        }
        "version" | "--version" | "-V" => {
            println!("tarn {}", env!("CARGO_PKG_VERSION"));
            0
        }
        _ => {
            // Treat a bare path as `tarn run <file>`
            if std::path::Path::new(command).exists() {
                match parse_options(&args[2..]) {
                    Ok(options) => run_file(command, &options),
                    Err(message) => {
                        eprintln!("{message}");
                        1
                    }
                }
            } else {
                eprintln!("Unknown command: {command}");
                eprintln!();
                print_usage();
                1
            }
        }
    };

    if code != 0 {
        std::process::exit(code);
    }
}

/// Split `tarn <cmd> <target> [options]`, printing usage when the target is missing.
fn file_and_options<'a>(args: &'a [String], command: &str) -> Option<(&'a str, commands::Options)> {
    let Some(target) = args.get(2) else {
        match command {
            "eval" => eprintln!("Usage: tarn eval <source> [options]"),
            _ => eprintln!("Usage: tarn {command} <file.tn> [options]"),
        }
        return None;
    };
    match parse_options(&args[3..]) {
        Ok(options) => Some((target.as_str(), options)),
        Err(message) => {
            eprintln!("{message}");
            None
        }
    }
}

fn print_usage() {
    println!("Tarn sandboxed script runner");
    println!();
    println!("Usage: tarn <command> [options]");
    println!();
    println!("Commands:");
    println!("  run <file>       Run a script and print its failures");
    println!("  eval <source>    Evaluate source text and print the result");
    println!("  check <file>     Parse a script without running it");
    println!("  help             Show this help message");
    println!("  version          Show version information");
    println!();
    println!("Options:");
    println!("  --max-time=<secs>   Wall-clock limit per run (default 2)");
    println!("  --max-steps=<n>     Step limit per run (default 1000000)");
    println!("  --max-depth=<n>     Procedure call depth limit (default 200)");
    println!("  --debug             Disable the time limit (steps still apply)");
    println!("  --arrays            Enable the numeric array builtins");
    println!("  --trace             Print per-statement trace lines to stderr");
    println!();
    println!("Environment:");
    println!("  TARN_LOG=<filter>   Enable diagnostic logging (e.g. TARN_LOG=debug)");
    println!("  TARN_LOG_TREE=1     Render diagnostic spans as an indented tree");
    println!();
    println!("Examples:");
    println!("  tarn run script.tn");
    println!("  tarn eval 'sum(range(10))' --max-steps=500");
    println!("  tarn script.tn --arrays");
}
