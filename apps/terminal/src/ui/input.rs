use client_core::{VoteControl, VoteControls};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminalCommand {
    Vote(VoteControl),
    Quit,
    Help,
    Redraw,
    Unknown(String),
}

pub fn parse_line(line: &str, controls: &VoteControls) -> TerminalCommand {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return TerminalCommand::Redraw;
    }
    match trimmed.to_ascii_lowercase().as_str() {
        "q" | "quit" | "exit" => return TerminalCommand::Quit,
        "h" | "?" | "help" => return TerminalCommand::Help,
        _ => {}
    }
    match controls.find(trimmed) {
        Some(control) => TerminalCommand::Vote(*control),
        None => TerminalCommand::Unknown(trimmed.to_string()),
    }
}
