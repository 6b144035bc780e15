use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::runner::CommandResult;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TranscriptEntry {
    pub at: DateTime<Utc>,
    #[serde(flatten)]
    pub kind: EntryKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EntryKind {
    Command { line: String },
    Output { text: String },
    Error { text: String },
    Section { title: String },
}

impl EntryKind {
    pub fn render(&self) -> String {
        match self {
            EntryKind::Command { line } => format!("$ {}", line),
            EntryKind::Output { text } => text.trim_end_matches('\n').to_string(),
            EntryKind::Error { text } => format!("error: {}", text.trim_end_matches('\n')),
            EntryKind::Section { title } => format!("=== {} ===", title),
        }
    }
}

/// Append-only log of commands and what they printed. Entries are never
/// edited once pushed; `clear` drops all of them at once.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Transcript {
    entries: Vec<TranscriptEntry>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, kind: EntryKind) {
        self.entries.push(TranscriptEntry {
            at: Utc::now(),
            kind,
        });
    }

    pub fn push_command(&mut self, line: &str) {
        self.push(EntryKind::Command {
            line: line.to_string(),
        });
    }

    pub fn push_result(&mut self, result: &CommandResult) {
        if result.succeeded {
            self.push(EntryKind::Output {
                text: result.output.clone(),
            });
        } else {
            self.push(EntryKind::Error {
                text: result.display_text().to_string(),
            });
        }
    }

    /// A titled block: the title and output on success, or the failing
    /// command line followed by its error text.
    pub fn push_section(&mut self, title: &str, result: &CommandResult) {
        if result.succeeded {
            self.push(EntryKind::Section {
                title: title.to_string(),
            });
            self.push(EntryKind::Output {
                text: result.output.clone(),
            });
        } else {
            self.push(EntryKind::Error {
                text: format!("{}\n{}", result.command, result.display_text()),
            });
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Renders entries from `start` onward, one per line.
    pub fn render_from(&self, start: usize) -> String {
        self.entries()
            .iter()
            .skip(start)
            .map(|e| e.kind.render())
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn render(&self) -> String {
        self.render_from(0)
    }
}
