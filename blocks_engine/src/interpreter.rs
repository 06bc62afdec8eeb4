use blocks_model::{AttributeQuery, TableWorld};

pub const FAREWELL: &str = "Goodbye!";

const NOT_FOUND: &str = "I can't find any blocks matching that description.";

/// Outcome of one interpreted command. `terminate` is set only by the exit
/// intent; acting on it belongs to the shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub terminate: bool,
}

impl Reply {
    fn text(text: impl Into<String>) -> Self {
        Reply {
            text: text.into(),
            terminate: false,
        }
    }

    fn farewell() -> Self {
        Reply {
            text: FAREWELL.to_string(),
            terminate: true,
        }
    }
}

/// Classify one line of input and run the matching handler.
///
/// Keywords are checked in a fixed priority order because one sentence can
/// satisfy several predicates at once ("show me where things are" must stay
/// a display, not a find). Every failure mode comes back as ordinary
/// response text.
pub fn interpret(world: &mut TableWorld, input: &str) -> Reply {
    let command = input.trim().to_lowercase();

    if matches!(command.as_str(), "quit" | "exit" | "bye") {
        return Reply::farewell();
    }
    if matches!(command.as_str(), "help" | "?") {
        return Reply::text(HELP_TEXT);
    }
    if contains_any(&command, &["show", "display", "what"]) {
        return Reply::text(world.render_state());
    }
    if contains_any(&command, &["pick up", "grab"]) {
        return Reply::text(handle_pickup(world, &command));
    }
    if contains_any(&command, &["put", "place"]) {
        return Reply::text(handle_put(world, &command));
    }
    if command.contains("move") {
        // Known gap carried over from the interpreter this replaces.
        return Reply::text("Move commands not fully implemented yet.");
    }
    if contains_any(&command, &["find", "where"]) {
        return Reply::text(handle_find(world, &command));
    }
    if command.contains("stack") {
        return Reply::text("Stack commands not fully implemented yet.");
    }

    Reply::text("I don't understand that command. Type 'help' for available commands.")
}

fn contains_any(command: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|keyword| command.contains(keyword))
}

/// Picking up is a stateless acknowledgment: the world has no held-object
/// state, so a successful pickup reports the grip without mutating anything.
fn handle_pickup(world: &TableWorld, command: &str) -> String {
    let matches = world.find_matching(&AttributeQuery::from_text(command));

    if matches.is_empty() {
        return NOT_FOUND.to_string();
    }
    if matches.len() > 1 {
        let descriptions: Vec<String> = matches
            .iter()
            .map(|object| object.description())
            .collect();
        return format!("Which one? I see: {}", descriptions.join(", "));
    }

    let object = matches[0];
    let is_topmost = world
        .top_object_at(object.x, object.y)
        .map_or(false, |top| top.id == object.id);
    if !is_topmost {
        return format!(
            "I can't pick up the {} because there's something on top of it.",
            object.description()
        );
    }

    format!("OK, I'm holding the {}.", object.description())
}

fn handle_put(world: &mut TableWorld, command: &str) -> String {
    let parts: Vec<&str> = command.split(" on ").collect();
    if parts.len() != 2 {
        return "I don't understand where you want me to put it.".to_string();
    }

    let source_text = parts[0].replace("put", "").replace("place", "");
    let source_query = AttributeQuery::from_text(source_text.trim());
    let target_query = AttributeQuery::from_text(parts[1].trim());

    // Both sides take the first candidate when several match. Only pickup
    // asks the user to disambiguate; put stays lenient.
    let (source_id, source_description) = match world.find_matching(&source_query).first() {
        Some(object) => (object.id.clone(), object.description()),
        None => return "I can't find the block you want to move.".to_string(),
    };
    let (target_x, target_y, target_description) = match world.find_matching(&target_query).first()
    {
        Some(object) => (object.x, object.y, object.description()),
        None => return "I can't find the target block.".to_string(),
    };

    if world.move_object(&source_id, target_x, target_y) {
        format!("OK, I put the {source_description} on the {target_description}.")
    } else {
        // Refusals deliberately do not say which placement rule tripped.
        format!("I can't put the {source_description} on the {target_description}.")
    }
}

fn handle_find(world: &TableWorld, command: &str) -> String {
    let matches = world.find_matching(&AttributeQuery::from_text(command));

    if matches.is_empty() {
        return NOT_FOUND.to_string();
    }

    matches
        .iter()
        .map(|object| {
            format!(
                "The {} is at position ({},{})",
                object.description(),
                object.x,
                object.y
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

const HELP_TEXT: &str = r#"Available commands:
- show/display/what - Show the current world state
- pick up <description> - Pick up a block (e.g., "pick up the red block")
- put <block> on <target> - Put one block on another
- find/where <description> - Find blocks matching description
- help/? - Show this help
- quit/exit/bye - Exit the program

Block descriptions can include:
- Colors: red, green, blue, yellow, white, black
- Shapes: block, pyramid, box, cube
- Sizes: small, medium, large, big, little

Example: "pick up the small red pyramid""#;
