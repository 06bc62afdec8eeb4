use std::fs;
use std::io::{self, BufRead, Write};
use std::path::Path;

use anyhow::{Context, Result};
use blocks_model::TableWorld;
use serde::Serialize;

use crate::interpreter::{interpret, FAREWELL};

/// Ordered record of a scripted session, written out as JSON on request.
#[derive(Debug, Default, Serialize)]
pub struct Transcript {
    pub entries: Vec<TranscriptEntry>,
}

#[derive(Debug, Serialize)]
pub struct TranscriptEntry {
    pub command: String,
    pub response: String,
}

/// Blocking prompt/read/respond loop. Ends on an exit command or on
/// end-of-input; both paths say goodbye.
pub fn run_interactive(world: &mut TableWorld) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    println!("Block World Command Shell");
    println!("Type 'help' for available commands, 'quit' to exit");
    println!();
    println!("{}", world.render_state());
    println!();

    let mut line = String::new();
    loop {
        print!("blocks> ");
        stdout.flush().context("flushing prompt")?;

        line.clear();
        let read = stdin
            .lock()
            .read_line(&mut line)
            .context("reading command input")?;
        if read == 0 {
            println!();
            println!("{FAREWELL}");
            return Ok(());
        }

        let command = line.trim();
        if command.is_empty() {
            continue;
        }

        let reply = interpret(world, command);
        println!("{}", reply.text);
        println!();

        if reply.terminate {
            return Ok(());
        }
    }
}

/// Feed commands from a file, echoing each one with its response. Blank
/// lines and `#` comments are skipped; an exit command stops the run early.
pub fn run_script(world: &mut TableWorld, path: &Path) -> Result<Transcript> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read command script: {}", path.display()))?;

    let mut transcript = Transcript::default();
    for line in raw.lines() {
        let command = line.trim();
        if command.is_empty() || command.starts_with('#') {
            continue;
        }

        let reply = interpret(world, command);
        println!("> {command}");
        println!("{}", reply.text);
        println!();

        transcript.entries.push(TranscriptEntry {
            command: command.to_string(),
            response: reply.text,
        });

        if reply.terminate {
            break;
        }
    }

    log::debug!(
        "script {} produced {} responses",
        path.display(),
        transcript.entries.len()
    );
    Ok(transcript)
}
