use mission_core::Language;

use super::constants::catalog_role;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiCommand {
    Launch,
    Toggle(String),
    Location(String),
    Language(Language),
    Roles,
    Refresh,
    Export,
    Help,
    Quit,
}

/// Parses one line of user input. Blank lines yield `Ok(None)`.
pub fn parse_command(line: &str) -> Result<Option<UiCommand>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word.to_ascii_lowercase().as_str() {
        "launch" | "start" => UiCommand::Launch,
        "toggle" | "role" => {
            if rest.is_empty() {
                return Err("usage: toggle <role>".to_string());
            }
            let role = catalog_role(rest).map(str::to_string).unwrap_or_else(|| rest.to_string());
            UiCommand::Toggle(role)
        }
        "location" => {
            if rest.is_empty() {
                return Err("usage: location <text>".to_string());
            }
            UiCommand::Location(rest.to_string())
        }
        "language" | "lang" => UiCommand::Language(rest.parse()?),
        "roles" => UiCommand::Roles,
        "refresh" => UiCommand::Refresh,
        "export" | "download" => UiCommand::Export,
        "help" | "?" => UiCommand::Help,
        "quit" | "exit" => UiCommand::Quit,
        other => return Err(format!("unknown command: {other} (type `help`)")),
    };
    Ok(Some(command))
}
