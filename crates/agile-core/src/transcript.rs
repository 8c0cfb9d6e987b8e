use crate::context::ProjectContext;
use crate::error::Result;
use crate::paths;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Message
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Agent,
    User,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Agent => f.write_str("agent"),
            Role::User => f.write_str("user"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

// ---------------------------------------------------------------------------
// Transcript
// ---------------------------------------------------------------------------

/// Append-only conversation log. Only [`Transcript::clear`] removes entries.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, role: Role, content: impl Into<String>) {
        self.messages.push(Message {
            role,
            content: content.into(),
        });
    }

    pub fn push_agent(&mut self, content: impl Into<String>) {
        self.push(Role::Agent, content);
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.push(Role::User, content);
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }
}

// ---------------------------------------------------------------------------
// Export
// ---------------------------------------------------------------------------

/// Envelope handed to a [`TranscriptSink`].
#[derive(Debug, Serialize)]
pub struct TranscriptExport<'a> {
    pub session_id: &'a str,
    pub exported_at: DateTime<Utc>,
    pub context: &'a ProjectContext,
    pub messages: &'a [Message],
}

/// Destination for exported transcripts. The consultation records the
/// outcome in its own transcript; sinks only persist.
pub trait TranscriptSink {
    /// Human-readable destination used in transcript notes and errors.
    fn destination(&self) -> String;

    fn write(&self, export: &TranscriptExport<'_>) -> Result<()>;
}

/// Writes the envelope as pretty JSON, atomically.
#[derive(Debug, Clone)]
pub struct JsonFileSink {
    path: PathBuf,
}

impl JsonFileSink {
    /// A `.json` extension is appended when missing.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: paths::with_export_extension(path.as_ref()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TranscriptSink for JsonFileSink {
    fn destination(&self) -> String {
        self.path.display().to_string()
    }

    fn write(&self, export: &TranscriptExport<'_>) -> Result<()> {
        let data = serde_json::to_string_pretty(export)?;
        crate::io::atomic_write(&self.path, data.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn transcript_appends_in_order() {
        let mut t = Transcript::new();
        t.push_agent("hello");
        t.push_user("hi");
        assert_eq!(t.len(), 2);
        assert_eq!(t.messages()[0].role, Role::Agent);
        assert_eq!(t.messages()[1].content, "hi");
        t.clear();
        assert!(t.is_empty());
    }

    #[test]
    fn json_sink_adds_extension() {
        let sink = JsonFileSink::new("advice");
        assert_eq!(sink.path(), Path::new("advice.json"));
    }

    #[test]
    fn json_sink_writes_envelope() {
        let dir = TempDir::new().unwrap();
        let sink = JsonFileSink::new(dir.path().join("session"));
        let mut t = Transcript::new();
        t.push_user("How do I set up a Kanban board?");
        let ctx = ProjectContext::new();
        sink.write(&TranscriptExport {
            session_id: "abc",
            exported_at: Utc::now(),
            context: &ctx,
            messages: t.messages(),
        })
        .unwrap();

        let raw = std::fs::read_to_string(dir.path().join("session.json")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["session_id"], "abc");
        assert_eq!(value["messages"][0]["role"], "user");
        assert!(value["exported_at"].is_string());
    }
}
