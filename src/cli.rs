//! Line-oriented terminal front end: command parsing and view rendering

use crate::content::ContentView;
use crate::conversation::state::MENU_OPTIONS;
use crate::conversation::{ChatView, Origin};
use crate::remote::RecordId;
use std::fmt::Write as _;
use thiserror::Error;

pub const HELP: &str = "\
chat:    open | close | pick <n|label> | say <text>
content: list | add | edit <id> | title <text> | text <text> | save | cancel
         menu <id> | delete <id> | yes | no
other:   help | quit";

/// One parsed input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Open,
    Close,
    /// Menu label, already resolved from a 1-based index if one was given
    Pick(String),
    Say(String),
    List,
    Add,
    Edit(RecordId),
    Title(String),
    Text(String),
    Save,
    Cancel,
    Menu(RecordId),
    Delete(RecordId),
    Yes,
    No,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("empty input")]
    Empty,
    #[error("unknown command: {0} (try `help`)")]
    Unknown(String),
    #[error("`{0}` needs an argument")]
    MissingArgument(&'static str),
    #[error("not a record id: {0}")]
    InvalidId(String),
    #[error("no menu option {0}")]
    OptionOutOfRange(usize),
}

/// Parse one input line
pub fn parse_command(line: &str) -> Result<Command, CommandError> {
    let line = line.trim();
    if line.is_empty() {
        return Err(CommandError::Empty);
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word.to_ascii_lowercase().as_str() {
        "open" => Command::Open,
        "close" => Command::Close,
        "pick" => Command::Pick(parse_pick(rest)?),
        "say" => Command::Say(required("say", rest)?),
        "list" => Command::List,
        "add" => Command::Add,
        "edit" => Command::Edit(parse_id("edit", rest)?),
        // Title and text may be set to blank; the editor rejects blanks on save
        "title" => Command::Title(rest.to_string()),
        "text" => Command::Text(rest.to_string()),
        "save" => Command::Save,
        "cancel" => Command::Cancel,
        "menu" => Command::Menu(parse_id("menu", rest)?),
        "delete" => Command::Delete(parse_id("delete", rest)?),
        "yes" | "y" => Command::Yes,
        "no" | "n" => Command::No,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(CommandError::Unknown(other.to_string())),
    };
    Ok(command)
}

fn required(command: &'static str, rest: &str) -> Result<String, CommandError> {
    if rest.is_empty() {
        Err(CommandError::MissingArgument(command))
    } else {
        Ok(rest.to_string())
    }
}

fn parse_id(command: &'static str, rest: &str) -> Result<RecordId, CommandError> {
    let raw = required(command, rest)?;
    raw.parse::<i64>()
        .map(RecordId)
        .map_err(|_| CommandError::InvalidId(raw))
}

fn parse_pick(rest: &str) -> Result<String, CommandError> {
    let raw = required("pick", rest)?;
    match raw.parse::<usize>() {
        Ok(n) => n
            .checked_sub(1)
            .and_then(|i| MENU_OPTIONS.get(i))
            .map(ToString::to_string)
            .ok_or(CommandError::OptionOutOfRange(n)),
        Err(_) => Ok(raw),
    }
}

// ============================================================================
// Rendering
// ============================================================================

pub fn render_chat(view: &ChatView) -> String {
    let mut out = String::new();
    if !view.visible {
        out.push_str("[chat closed]");
        return out;
    }
    for turn in &view.transcript {
        let who = match turn.origin {
            Origin::Bot => "bot",
            Origin::User => "you",
        };
        let _ = writeln!(out, "{who:>4}: {}", turn.text);
        for (i, option) in turn.options.iter().enumerate() {
            let _ = writeln!(out, "      {}. {option}", i + 1);
        }
    }
    if !view.input_enabled {
        out.push_str("      (waiting for reply)");
    }
    out.trim_end().to_string()
}

pub fn render_content(view: &ContentView) -> String {
    let mut out = String::new();
    if view.records.is_empty() {
        out.push_str("(no content)\n");
    }
    for record in &view.records {
        let marker = if view.menu_open_for == Some(record.id) {
            "  [edit | delete]"
        } else {
            ""
        };
        let _ = writeln!(out, "#{} {}: {}{marker}", record.id, record.title, record.text);
    }
    if let Some(editor) = &view.editor {
        let _ = writeln!(out, "== {} ==", editor.heading);
        let _ = writeln!(out, "  title: {}", editor.draft.title);
        let _ = writeln!(out, "  text:  {}", editor.draft.text);
        let state = if editor.locked { " (saving...)" } else { "" };
        let _ = writeln!(out, "  [{}]{state}", editor.submit_label);
    }
    if let Some(notice) = &view.notice {
        let at = notice.acknowledged_at.format("%H:%M:%S");
        let _ = writeln!(out, "** {} ({at}) **", notice.text);
    }
    out.trim_end().to_string()
}
