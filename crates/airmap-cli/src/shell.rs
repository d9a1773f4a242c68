//! Interactive read-eval loop over the map commands.
//!
//! Each input line is parsed with the same clap grammar as the one-shot CLI.
//! Edits stay in memory until `save` is run.

use std::io::{BufRead, Write};

use anyhow::{bail, Result};
use clap::{error::ErrorKind, Parser, Subcommand};
use tracing::debug;

use airmap_lib::AirMap;

use crate::commands::{execute, CommandContext, MapCommand};
use crate::output::describe_failure;

const PROMPT: &str = "airmap> ";

#[derive(Parser, Debug)]
#[command(
    name = "airmap",
    no_binary_name = true,
    disable_version_flag = true,
    about = "AirMap interactive shell"
)]
struct ShellLine {
    #[command(subcommand)]
    command: ShellCommand,
}

#[derive(Subcommand, Debug)]
enum ShellCommand {
    #[command(flatten)]
    Map(MapCommand),
    /// Leave the shell; unsaved edits are discarded.
    #[command(alias = "quit")]
    Exit,
}

/// Run the shell until `exit` or end of input.
pub fn run_shell<R: BufRead, W: Write>(
    map: &mut AirMap,
    ctx: &CommandContext,
    input: R,
    out: &mut W,
) -> Result<()> {
    writeln!(
        out,
        "AirMap shell: {} cities loaded. Type 'help' for commands, 'exit' to quit.",
        map.graph().len()
    )?;

    let mut lines = input.lines();
    loop {
        write!(out, "{PROMPT}")?;
        out.flush()?;

        let Some(line) = lines.next() else {
            writeln!(out)?;
            break;
        };
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let tokens = match split_line(trimmed) {
            Ok(tokens) => tokens,
            Err(err) => {
                writeln!(out, "error: {err}")?;
                continue;
            }
        };
        let parsed = match ShellLine::try_parse_from(&tokens) {
            Ok(parsed) => parsed,
            Err(err) => {
                if !matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) {
                    debug!(line = trimmed, "unparseable shell input");
                }
                write!(out, "{}", err.render())?;
                continue;
            }
        };

        match parsed.command {
            ShellCommand::Exit => break,
            ShellCommand::Map(command) => match execute(map, &command, ctx) {
                Ok(text) => write!(out, "{text}")?,
                Err(err) => writeln!(out, "error: {}", describe_failure(&err))?,
            },
        }
    }
    Ok(())
}

/// Split a shell line into arguments.
///
/// `add-city CODE JSON` keeps everything after the code as one argument so
/// the JSON needs no quoting; other commands honour single and double quotes.
pub fn split_line(line: &str) -> Result<Vec<String>> {
    let trimmed = line.trim();
    if let Some(rest) = trimmed
        .strip_prefix("add-city")
        .filter(|rest| rest.starts_with(char::is_whitespace))
    {
        let rest = rest.trim_start();
        let (code, json) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
        let mut tokens = vec!["add-city".to_string(), code.to_string()];
        if !json.trim().is_empty() {
            tokens.push(json.trim().to_string());
        }
        return Ok(tokens);
    }
    tokenize(trimmed)
}

fn tokenize(line: &str) -> Result<Vec<String>> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut quote: Option<char> = None;

    for ch in line.chars() {
        match quote {
            Some(open) if ch == open => quote = None,
            Some(_) => current.push(ch),
            None if ch == '"' || ch == '\'' => {
                quote = Some(ch);
                in_token = true;
            }
            None if ch.is_whitespace() => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            None => {
                current.push(ch);
                in_token = true;
            }
        }
    }
    if let Some(open) = quote {
        bail!("unterminated {open} quote");
    }
    if in_token {
        tokens.push(current);
    }
    Ok(tokens)
}
