use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(about = "Interactive command shell for a stacked block world", version)]
pub struct Args {
    /// Optional JSON scene file overriding the built-in six-object layout
    #[arg(long)]
    pub scene: Option<PathBuf>,

    /// Run commands from a file instead of the interactive prompt
    #[arg(long)]
    pub script: Option<PathBuf>,

    /// Path to write the command/response transcript as JSON (requires --script)
    #[arg(long)]
    pub transcript_json: Option<PathBuf>,

    /// Path to write the final world snapshot as JSON
    #[arg(long)]
    pub world_json: Option<PathBuf>,
}

#[derive(Debug)]
pub enum Command {
    RunScript(ScriptArgs),
    Interactive(InteractiveArgs),
}

#[derive(Debug)]
pub struct ScriptArgs {
    pub scene: Option<PathBuf>,
    pub script: PathBuf,
    pub transcript_json: Option<PathBuf>,
    pub world_json: Option<PathBuf>,
}

#[derive(Debug)]
pub struct InteractiveArgs {
    pub scene: Option<PathBuf>,
    pub world_json: Option<PathBuf>,
}

pub fn parse() -> Result<Command> {
    let args = Args::parse();
    args.into_command()
}

impl Args {
    fn into_command(self) -> Result<Command> {
        if let Some(script) = self.script {
            Ok(Command::RunScript(ScriptArgs {
                scene: self.scene,
                script,
                transcript_json: self.transcript_json,
                world_json: self.world_json,
            }))
        } else {
            if let Some(path) = self.transcript_json.as_ref() {
                eprintln!(
                    "[blocks_engine] warning: --transcript-json={} is ignored without --script",
                    path.display()
                );
            }
            Ok(Command::Interactive(InteractiveArgs {
                scene: self.scene,
                world_json: self.world_json,
            }))
        }
    }
}
