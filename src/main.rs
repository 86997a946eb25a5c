use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::{Parser, ValueEnum};
use colored::Colorize;
use resub::{CodeUnit, Engine, Matcher, Status, Utf16Matcher, Utf32Matcher, Utf8Matcher};
use similar::{ChangeTag, TextDiff};
use std::fs;
use std::path::{Path, PathBuf};
use std::process;

// Exit statuses: 1 usage error, 2 file-open failure, 3 fatal compile error.
const EXIT_USAGE: i32 = 1;
const EXIT_FILE: i32 = 2;
const EXIT_COMPILE: i32 = 3;

#[derive(Parser)]
#[command(name = "resub")]
#[command(about = "Sed-style regex substitution over a file", long_about = None)]
#[command(version)]
struct Cli {
    /// Substitution commands followed by the file to transform,
    /// e.g. '/foo/bar/g' '/(\w+)=/\1: /' input.txt
    #[arg(required = true)]
    args: Vec<String>,

    /// Code-unit width of the engine instantiation
    #[arg(short, long, value_enum, default_value_t = Width::W8)]
    width: Width,

    /// Print a unified diff of the transformation instead of the result
    #[arg(long)]
    diff: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Width {
    #[value(name = "8")]
    W8,
    #[value(name = "16")]
    W16,
    #[value(name = "32")]
    W32,
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
                _ => EXIT_USAGE,
            };
            let _ = e.print();
            process::exit(code);
        }
    };

    if cli.args.len() < 2 {
        eprintln!(
            "{} need at least 2 arguments: <command> [<command2> ...] <file>",
            "error:".red().bold()
        );
        process::exit(EXIT_USAGE);
    }

    let mut commands = cli.args;
    let file = PathBuf::from(commands.pop().unwrap_or_default());

    let result = match cli.width {
        Width::W8 => run::<Utf8Matcher>(&commands, &file, cli.diff),
        Width::W16 => run::<Utf16Matcher>(&commands, &file, cli.diff),
        Width::W32 => run::<Utf32Matcher>(&commands, &file, cli.diff),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("{} {e:#}", "error:".red().bold());
            process::exit(EXIT_USAGE);
        }
    }
}

/// Compile the commands, transform the file, write the result to stdout.
fn run<M: Matcher>(commands: &[String], file: &Path, show_diff: bool) -> Result<i32> {
    let mut engine = Engine::<M>::new();

    for command in commands {
        let units = M::Unit::units_from_str(command);
        match engine.add_job(&units) {
            Status::Ok => {}
            Status::Warning => {
                eprintln!(
                    "{} compiling {command}: {}",
                    "warning:".yellow().bold(),
                    engine.last_error_message()
                );
            }
            Status::Fatal => {
                eprintln!(
                    "{} compiling {command}: {}",
                    "fatal:".red().bold(),
                    engine.last_error_message()
                );
                return Ok(EXIT_COMPILE);
            }
        }
    }

    let input = match fs::read_to_string(file) {
        Ok(input) => input,
        Err(e) => {
            eprintln!(
                "{} unable to open {}: {e}",
                "error:".red().bold(),
                file.display()
            );
            return Ok(EXIT_FILE);
        }
    };

    // Width conversion happens here at the boundary only; the engine works
    // in native code units throughout.
    let mut buffer = M::Unit::units_from_str(&input);
    if engine.replace_inplace(&mut buffer).is_fatal() {
        eprintln!(
            "{} while substituting: {}",
            "warning:".yellow().bold(),
            engine.last_error_message()
        );
    }

    let output = M::Unit::units_to_string(&buffer)
        .context("rewritten buffer is not valid text for the output encoding")?;

    if show_diff {
        display_diff(file, &input, &output);
    } else {
        println!("{output}");
    }
    Ok(0)
}

/// Show a unified diff between the original and rewritten text.
fn display_diff(file: &Path, original: &str, modified: &str) {
    println!("{}", format!("--- {} (original)", file.display()).dimmed());
    println!("{}", format!("+++ {} (rewritten)", file.display()).dimmed());

    let diff = TextDiff::from_lines(original, modified);

    for change in diff.iter_all_changes() {
        let sign = match change.tag() {
            ChangeTag::Delete => format!("-{change}").red(),
            ChangeTag::Insert => format!("+{change}").green(),
            ChangeTag::Equal => format!(" {change}").normal(),
        };
        print!("{sign}");
    }
}
