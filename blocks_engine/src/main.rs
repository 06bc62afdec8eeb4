use std::{fs, path::Path};

use anyhow::{Context, Result};
use blocks_model::{SceneConfig, TableWorld};

mod cli;
mod interpreter;
mod shell;

use cli::{Command, InteractiveArgs, ScriptArgs};

fn main() -> Result<()> {
    env_logger::init();

    match cli::parse()? {
        Command::RunScript(args) => run_script(args),
        Command::Interactive(args) => run_interactive(args),
    }
}

fn run_script(args: ScriptArgs) -> Result<()> {
    let mut world = load_world(args.scene.as_deref())?;
    let transcript = shell::run_script(&mut world, &args.script)?;

    if let Some(path) = args.transcript_json.as_ref() {
        let json =
            serde_json::to_string_pretty(&transcript).context("serializing transcript to JSON")?;
        fs::write(path, json)
            .with_context(|| format!("writing transcript to {}", path.display()))?;
        println!("Saved transcript to {}", path.display());
    }

    write_world_snapshot(&world, args.world_json.as_deref())
}

fn run_interactive(args: InteractiveArgs) -> Result<()> {
    let mut world = load_world(args.scene.as_deref())?;
    shell::run_interactive(&mut world)?;
    write_world_snapshot(&world, args.world_json.as_deref())
}

fn load_world(scene: Option<&Path>) -> Result<TableWorld> {
    match scene {
        Some(path) => {
            let config = SceneConfig::from_json_file(path)?;
            let world = TableWorld::from_config(config)
                .with_context(|| format!("invalid scene layout in {}", path.display()))?;
            log::info!(
                "loaded scene with {} objects from {}",
                world.object_count(),
                path.display()
            );
            Ok(world)
        }
        None => Ok(TableWorld::standard_scene()),
    }
}

fn write_world_snapshot(world: &TableWorld, path: Option<&Path>) -> Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let json = serde_json::to_string_pretty(&world.snapshot())
        .context("serializing world snapshot to JSON")?;
    fs::write(path, json)
        .with_context(|| format!("writing world snapshot to {}", path.display()))?;
    println!("Saved world snapshot to {}", path.display());
    Ok(())
}
