//! Conversion of a [`Dialogue`] into chat-completion messages.
//!
//! Chat APIs only understand a handful of roles, not speaker names. When
//! asking an LLM to produce the next turn for `speaker`, we pretend the LLM
//! wrote all of that speaker's earlier turns (`assistant`) and that everyone
//! else is the `user`.
//!
//! With more than two speakers those two roles can no longer tell the
//! speakers apart, so by default the speaker names are written into the
//! message contents and consecutive `user` messages are compressed into one.
//! Both behaviours can be forced on or off through [`FormatOptions`].

use crate::dialogue::Dialogue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Role of a chat-completion message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
    Tool,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::Tool => "tool",
        }
    }
}

/// A single role-tagged message sent to a text generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            name: None,
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    pub fn tool(content: impl Into<String>) -> Self {
        Self::new(Role::Tool, content)
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// Options for [`format_as_messages`].
///
/// Every field is optional. `speaker_names` and `compress` default to `true`
/// exactly when the dialogue (plus the new speaker) has more than two
/// distinct speakers.
///
/// # Examples
///
/// ```rust
/// use argubot::message::FormatOptions;
///
/// let options = FormatOptions::default()
///     .with_system("You are a helpful debate partner.")
///     .with_compress(false);
/// assert_eq!(options.compress, Some(false));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatOptions {
    /// System message placed at the start of the prompt.
    pub system: Option<String>,
    /// System message placed at the end of the prompt.
    pub system_last: Option<String>,
    /// Whether to prefix each message with its speaker's name.
    pub speaker_names: Option<bool>,
    /// Whether to merge runs of consecutive `user` messages.
    pub compress: Option<bool>,
    /// Output of a tool, attached after the trailing system message.
    pub tool: Option<String>,
    /// Name of that tool.
    pub tool_name: Option<String>,
}

impl FormatOptions {
    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    pub fn with_system_last(mut self, system_last: impl Into<String>) -> Self {
        self.system_last = Some(system_last.into());
        self
    }

    pub fn with_speaker_names(mut self, speaker_names: bool) -> Self {
        self.speaker_names = Some(speaker_names);
        self
    }

    pub fn with_compress(mut self, compress: bool) -> Self {
        self.compress = Some(compress);
        self
    }

    pub fn with_tool(mut self, output: impl Into<String>, name: Option<String>) -> Self {
        self.tool = Some(output.into());
        self.tool_name = name;
        self
    }
}

/// Converts `dialogue` into the messages that ask an LLM to speak next as `speaker`.
///
/// # Examples
///
/// ```rust
/// use argubot::dialogue::Dialogue;
/// use argubot::message::{format_as_messages, FormatOptions, Role};
///
/// let d = Dialogue::new().add("Alice", "Hi").add("Bob", "Hello");
/// let messages = format_as_messages(&d, "Bob", &FormatOptions::default());
///
/// assert_eq!(messages[0].role, Role::User);
/// assert_eq!(messages[1].role, Role::Assistant);
/// assert_eq!(messages[1].content, "Hello");
/// ```
pub fn format_as_messages(
    dialogue: &Dialogue,
    speaker: &str,
    options: &FormatOptions,
) -> Vec<ChatMessage> {
    let mut speakers: BTreeSet<&str> = dialogue.iter().map(|t| t.speaker.as_str()).collect();
    speakers.insert(speaker);
    let many_speakers = speakers.len() > 2;
    let speaker_names = options.speaker_names.unwrap_or(many_speakers);
    let compress = options.compress.unwrap_or(many_speakers);

    let mut messages = Vec::with_capacity(dialogue.len() + 3);
    if let Some(system) = &options.system {
        messages.push(ChatMessage::system(system.clone()));
    }
    for turn in dialogue {
        let role = if turn.speaker == speaker {
            Role::Assistant
        } else {
            Role::User
        };
        let content = if speaker_names {
            format!("{}: {}", turn.speaker, turn.content)
        } else {
            turn.content.clone()
        };
        messages.push(ChatMessage::new(role, content));
    }
    if let Some(system_last) = &options.system_last {
        messages.push(ChatMessage::system(system_last.clone()));
    }
    if let Some(tool) = &options.tool {
        let mut message = ChatMessage::tool(tool.clone());
        message.name = options.tool_name.clone();
        messages.push(message);
    }

    if compress {
        compress_user_runs(messages)
    } else {
        messages
    }
}

/// Merges every maximal run of consecutive `user` messages into one.
fn compress_user_runs(messages: Vec<ChatMessage>) -> Vec<ChatMessage> {
    let mut compressed = Vec::with_capacity(messages.len());
    let mut run: Vec<String> = Vec::new();

    for message in messages {
        if message.role == Role::User {
            run.push(message.content);
            continue;
        }
        flush_run(&mut run, &mut compressed);
        compressed.push(message);
    }
    flush_run(&mut run, &mut compressed);

    compressed
}

fn flush_run(run: &mut Vec<String>, out: &mut Vec<ChatMessage>) {
    if run.is_empty() {
        return;
    }
    let joined = run.join("\n\n");
    run.clear();
    out.push(ChatMessage::user(format!("\"\"\"\n{joined}\n\"\"\"")));
}
