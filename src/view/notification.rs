//! Outbound notifications and the sink they are delivered to.

use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use super::projection::{CardView, FieldView};
use crate::core::{Audience, GameState, PlayerId, PlayerMap, Slot};
use crate::questions::{Answer, Prompt, QuestionToken, Throw};

/// Why a field view was sent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuelAction {
    /// Full field at duel start. Clients reset their state.
    Start,
    /// Any other mutation.
    Duel,
    NewCard,
    Chat,
    ShuffleDeck(PlayerId),
    ShuffleHand(PlayerId),
}

/// Which pile a reveal or view came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RevealReason {
    Top,
    Bottom,
    Deck,
    Extra,
    Excavated,
    Hand,
    /// A private look at a pile, sent to the requester only.
    View,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatChannel {
    Duelists,
    Spectators,
}

/// One observer's copy of a field update.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ViewPayload {
    pub action: DuelAction,
    pub state: GameState,
    pub field: FieldView,
    pub slot: Slot,
}

/// Everything the engine tells the outside world.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Notification {
    ViewChanged {
        names: PlayerMap<String>,
        p0: ViewPayload,
        p1: ViewPayload,
        spectator: ViewPayload,
    },
    Reveal {
        audience: Audience,
        player: PlayerId,
        reason: RevealReason,
        cards: Vec<CardView>,
    },
    Announcement {
        slot: Slot,
        message: serde_json::Value,
    },
    Question {
        token: QuestionToken,
        #[serde(flatten)]
        prompt: Prompt,
    },
    Answer {
        token: QuestionToken,
        answer: Answer,
    },
    RpsOutcome {
        throws: [Throw; 2],
        winner: Option<PlayerId>,
    },
    Chat {
        channel: ChatChannel,
        speaker: String,
        message: String,
    },
}

impl Notification {
    /// The payload for one slot, if this is a field update.
    #[must_use]
    pub fn view_for(&self, slot: Slot) -> Option<&ViewPayload> {
        match self {
            Notification::ViewChanged { p0, p1, spectator, .. } => match slot {
                Slot::Player(p) if p.index() == 0 => Some(p0),
                Slot::Player(_) => Some(p1),
                Slot::Spectator => Some(spectator),
            },
            _ => None,
        }
    }
}

/// Receives every notification a duel emits, in order.
pub trait NotificationSink {
    fn notify(&mut self, notification: &Notification);
}

impl<F> NotificationSink for F
where
    F: FnMut(&Notification),
{
    fn notify(&mut self, notification: &Notification) {
        self(notification);
    }
}

/// Drops everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl NotificationSink for NullSink {
    fn notify(&mut self, _notification: &Notification) {}
}

/// Keeps every notification for later inspection.
///
/// Clones share the same buffer, so one clone can be handed to a duel and
/// the other kept to read from.
#[derive(Clone, Debug, Default)]
pub struct Recorder {
    buffer: Arc<Mutex<Vec<Notification>>>,
}

impl Recorder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Drain everything recorded so far.
    pub fn take(&self) -> Vec<Notification> {
        let mut buffer = self.buffer.lock().unwrap_or_else(|e| e.into_inner());
        std::mem::take(&mut *buffer)
    }

    /// The most recent notification, if any.
    #[must_use]
    pub fn last(&self) -> Option<Notification> {
        let buffer = self.buffer.lock().unwrap_or_else(|e| e.into_inner());
        buffer.last().cloned()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.buffer.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl NotificationSink for Recorder {
    fn notify(&mut self, notification: &Notification) {
        self.buffer
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(notification.clone());
    }
}
