//! Transcript-related types.

use chrono::{DateTime, Utc};

use crate::extract::ParsedReply;

/// The speaker of a transcript message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Role {
    /// The person typing into the client.
    User,
    /// The generation service.
    Model,
}

impl Role {
    /// Returns the label used for this speaker in exports and message
    /// bubbles.
    #[inline]
    pub fn speaker_label(self) -> &'static str {
        match self {
            Role::User => "You",
            Role::Model => "Gemini",
        }
    }
}

/// One transcript entry.
#[derive(Clone, Debug)]
pub struct Message {
    /// Who said it.
    pub role: Role,
    /// Plain text content.
    pub text: String,
    /// Image URLs extracted from `text`.
    pub images: Vec<String>,
    /// Every URL extracted from `text`; may repeat entries of `images`.
    pub urls: Vec<String>,
    /// When this message was created. Never updated, not even by edits.
    pub timestamp: DateTime<Utc>,
}

impl Message {
    /// Creates a user message. User text is never link-scanned.
    pub fn user<S: Into<String>>(text: S) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
            images: Vec::new(),
            urls: Vec::new(),
            timestamp: Utc::now(),
        }
    }

    /// Creates a model message from a parsed reply.
    pub fn model(reply: ParsedReply) -> Self {
        Self {
            role: Role::Model,
            text: reply.text,
            images: reply.images,
            urls: reply.urls,
            timestamp: Utc::now(),
        }
    }
}

/// Identifier of an exchange, stable for the transcript's lifetime.
///
/// Ids are never recycled, not even across a clear.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExchangeId(u64);

/// One conversational turn: a user message and its correlated reply.
///
/// Keeping both halves in one record is what upholds the pairing rule:
/// a reply can neither go missing nor double up, no matter how often
/// the turn is edited.
#[derive(Clone, Debug)]
pub struct Exchange {
    /// Stable identifier of this turn.
    pub id: ExchangeId,
    /// The user half.
    pub user: Message,
    /// The model half; `None` while a reply is pending.
    pub reply: Option<Message>,
}

/// Ordered log of exchanges for the current session.
///
/// The transcript lives and dies with the session; export is the only
/// way anything leaves it, and export never mutates.
#[derive(Clone, Default, Debug)]
pub struct Transcript {
    exchanges: Vec<Exchange>,
    next_id: u64,
}

impl Transcript {
    /// Returns the exchanges in display order.
    #[inline]
    pub fn exchanges(&self) -> &[Exchange] {
        &self.exchanges
    }

    /// Returns whether the transcript has no exchanges.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.exchanges.is_empty()
    }

    /// Appends a new turn with a pending reply and returns its id.
    pub(crate) fn append_user<S: Into<String>>(
        &mut self,
        text: S,
    ) -> ExchangeId {
        let id = ExchangeId(self.next_id);
        self.next_id += 1;
        self.exchanges.push(Exchange {
            id,
            user: Message::user(text),
            reply: None,
        });
        id
    }

    pub(crate) fn get(&self, id: ExchangeId) -> Option<&Exchange> {
        self.exchanges.iter().find(|exchange| exchange.id == id)
    }

    pub(crate) fn get_mut(
        &mut self,
        id: ExchangeId,
    ) -> Option<&mut Exchange> {
        self.exchanges.iter_mut().find(|exchange| exchange.id == id)
    }

    pub(crate) fn clear(&mut self) {
        self.exchanges.clear();
    }

    /// Flattened message view: user and reply halves in display order.
    pub fn messages(&self) -> impl Iterator<Item = &Message> {
        self.exchanges
            .iter()
            .flat_map(|exchange| {
                std::iter::once(&exchange.user).chain(exchange.reply.as_ref())
            })
    }

    /// Serializes the transcript to its export form: one
    /// `"<Speaker>: <text>"` line per message, newline-joined, with no
    /// trailing newline.
    pub fn export_text(&self) -> String {
        self.messages()
            .map(|msg| format!("{}: {}", msg.role.speaker_label(), msg.text))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
