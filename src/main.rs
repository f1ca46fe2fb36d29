use anyhow::Context;
use serde_json::{Value, json};

use csharp_format_usings::FormatCommand;
use csharp_format_usings::types::LineEnding;

fn main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    let Some(first) = args.next() else {
        return csharp_format_usings::run_stdio_server();
    };

    match first.as_str() {
        "format" => {
            let command = parse_format_args(args)?;
            env_logger::init();
            csharp_format_usings::run_format(&command)
        }
        "-V" | "--version" => {
            print_version();
            Ok(())
        }
        "-h" | "--help" => {
            print_usage();
            Ok(())
        }
        other => Err(anyhow::anyhow!("unknown subcommand {other}")),
    }
}

fn parse_format_args<I>(mut args: I) -> anyhow::Result<FormatCommand>
where
    I: Iterator<Item = String>,
{
    let mut command = FormatCommand::default();
    while let Some(arg) = args.next() {
        let (flag, inline) = match arg.split_once('=') {
            Some((flag, value)) if flag.starts_with("--") => {
                (flag.to_string(), Some(value.to_string()))
            }
            _ => (arg.clone(), None),
        };
        let mut value = |name: &str, hint: &str| -> anyhow::Result<String> {
            match inline.clone() {
                Some(value) => Ok(value),
                None => args
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("{name} requires {hint}")),
            }
        };

        match flag.as_str() {
            "--settings" => command.settings = Some(value("--settings", "PATH")?.into()),
            "--sort-order" => {
                let order = value("--sort-order", "a space separated list")?;
                command.set_option("sortOrder", Value::String(order));
            }
            "--before" => {
                let count = parse_count("--before", &value("--before", "N")?)?;
                command.set_option("numEmptyLinesBeforeUsings", json!(count));
            }
            "--after" => {
                let count = parse_count("--after", &value("--after", "N")?)?;
                command.set_option("numEmptyLinesAfterUsings", json!(count));
            }
            "--eol" => {
                let raw = value("--eol", "lf|crlf")?;
                let eol = LineEnding::parse(&raw)
                    .ok_or_else(|| anyhow::anyhow!("--eol must be lf or crlf, got {raw}"))?;
                command.line_ending = Some(eol);
            }
            "--unused-line" => {
                let raw = value("--unused-line", "LINE")?;
                let line = raw
                    .parse::<u32>()
                    .with_context(|| format!("parse --unused-line {raw}"))?;
                command.unused_lines.push(line);
            }
            "--no-split-groups" => command.set_option("splitGroups", json!(false)),
            "--keep-unused" => command.set_option("removeUnnecessaryUsings", json!(false)),
            "--within-namespace" => command.set_option("usingsWithinNamespace", json!(true)),
            "-h" | "--help" => {
                print_format_usage();
                std::process::exit(0);
            }
            "-" => command.input = None,
            other if other.starts_with('-') => {
                return Err(anyhow::anyhow!("unknown format flag {other}"));
            }
            path => {
                if command.input.is_some() {
                    return Err(anyhow::anyhow!("format accepts a single FILE, got {path}"));
                }
                command.input = Some(path.into());
            }
        }
    }
    Ok(command)
}

fn parse_count(flag: &str, value: &str) -> anyhow::Result<u64> {
    value
        .trim()
        .parse::<u64>()
        .with_context(|| format!("{flag} must be a non-negative number, got {value}"))
}

fn print_usage() {
    eprintln!(
        "Usage:\n  csharp-format-usings\n  csharp-format-usings format [FILE] [OPTIONS]\n\nWithout arguments the language server runs on stdio.\n"
    );
}

fn print_format_usage() {
    eprintln!(
        "Usage:\n  csharp-format-usings format [FILE] [--settings PATH] [--sort-order LIST]\n      [--no-split-groups] [--keep-unused] [--before N] [--after N]\n      [--within-namespace] [--eol lf|crlf] [--unused-line N]...\n"
    );
}

fn print_version() {
    println!("csharp-format-usings {}", env!("CARGO_PKG_VERSION"));
}
