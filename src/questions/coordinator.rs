//! Token-correlated prompts.
//!
//! Asking stores a continuation under a fresh, unguessable token; answering
//! with that token hands the continuation back exactly once. The coordinator
//! is generic over the context the continuation runs against so that it
//! can live inside that context: the duel removes the continuation first and
//! only then runs it with `&mut self`.

use std::time::{Duration, Instant};

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::core::{Audience, DuelError};

/// Answer payload: the chosen option values.
pub type Answer = SmallVec<[i64; 4]>;

/// Work to run once a question is answered.
pub type Continuation<Ctx> = Box<dyn FnOnce(&mut Ctx, Answer) -> Result<(), DuelError> + Send>;

/// Correlation token of one pending question.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionToken(pub Uuid);

impl QuestionToken {
    /// A fresh random token.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for QuestionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One selectable answer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionOption {
    pub id: String,
    pub value: i64,
}

impl QuestionOption {
    pub fn new(id: impl Into<String>, value: i64) -> Self {
        Self { id: id.into(), value }
    }
}

/// Inclusive bounds on how many values an answer carries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerLength {
    pub min: usize,
    pub max: usize,
}

impl AnswerLength {
    #[must_use]
    pub const fn exactly(n: usize) -> Self {
        Self { min: n, max: n }
    }

    #[must_use]
    pub const fn between(min: usize, max: usize) -> Self {
        Self { min, max }
    }

    #[must_use]
    pub const fn contains(self, len: usize) -> bool {
        self.min <= len && len <= self.max
    }
}

impl Default for AnswerLength {
    fn default() -> Self {
        Self::exactly(1)
    }
}

/// What is being asked, and of whom.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prompt {
    pub audience: Audience,
    /// Free-form question type the client dispatches on.
    pub kind: String,
    #[serde(default)]
    pub options: Vec<QuestionOption>,
    #[serde(default)]
    pub answer_length: AnswerLength,
}

impl Prompt {
    pub fn new(audience: Audience, kind: impl Into<String>) -> Self {
        Self {
            audience,
            kind: kind.into(),
            options: Vec::new(),
            answer_length: AnswerLength::default(),
        }
    }

    /// Add an option (builder pattern).
    #[must_use]
    pub fn with_option(mut self, id: impl Into<String>, value: i64) -> Self {
        self.options.push(QuestionOption::new(id, value));
        self
    }

    /// Set the answer length bounds (builder pattern).
    #[must_use]
    pub fn with_answer_length(mut self, answer_length: AnswerLength) -> Self {
        self.answer_length = answer_length;
        self
    }

    /// Check an answer against the length bounds and the offered options.
    /// A prompt without options accepts any values.
    pub fn validate(&self, answer: &[i64]) -> Result<(), DuelError> {
        if !self.answer_length.contains(answer.len()) {
            return Err(DuelError::AnswerLength {
                len: answer.len(),
                min: self.answer_length.min,
                max: self.answer_length.max,
            });
        }
        if !self.options.is_empty() {
            let offered = |v: i64| self.options.iter().any(|o| o.value == v);
            if let Some(&bad) = answer.iter().find(|v| !offered(**v)) {
                return Err(DuelError::UnknownOption(bad));
            }
        }
        Ok(())
    }
}

struct Pending<Ctx> {
    prompt: Prompt,
    continuation: Continuation<Ctx>,
    asked_at: Instant,
    echo: bool,
}

/// An answered question, ready to run.
pub struct Resolved<Ctx> {
    pub token: QuestionToken,
    pub answer: Answer,
    pub continuation: Continuation<Ctx>,
    /// Send the answer back out as a notification.
    pub echo: bool,
}

/// Pending questions of one duel.
pub struct QuestionCoordinator<Ctx> {
    pending: FxHashMap<QuestionToken, Pending<Ctx>>,
    /// Pending tokens, oldest first.
    order: Vec<QuestionToken>,
    ttl: Option<Duration>,
}

impl<Ctx> QuestionCoordinator<Ctx> {
    #[must_use]
    pub fn new(ttl: Option<Duration>) -> Self {
        Self {
            pending: FxHashMap::default(),
            order: Vec::new(),
            ttl,
        }
    }

    /// Store a continuation and return the token to send with the prompt.
    pub fn ask(
        &mut self,
        prompt: Prompt,
        continuation: Continuation<Ctx>,
        echo: bool,
    ) -> QuestionToken {
        let token = QuestionToken::generate();
        debug!(token = %token, kind = %prompt.kind, "question asked");
        self.pending.insert(
            token,
            Pending {
                prompt,
                continuation,
                asked_at: Instant::now(),
                echo,
            },
        );
        self.order.push(token);
        token
    }

    fn is_stale(&self, pending: &Pending<Ctx>, now: Instant) -> bool {
        self.ttl
            .is_some_and(|ttl| now.saturating_duration_since(pending.asked_at) > ttl)
    }

    /// Claim the continuation for an answer.
    ///
    /// `Ok(None)` for tokens that are unknown, already consumed or expired.
    /// An invalid answer is an error and the question stays pending.
    pub fn take(
        &mut self,
        token: QuestionToken,
        answer: &[i64],
        now: Instant,
    ) -> Result<Option<Resolved<Ctx>>, DuelError> {
        let Some(pending) = self.pending.get(&token) else {
            return Ok(None);
        };
        if self.is_stale(pending, now) {
            warn!(token = %token, "answer arrived after the question expired");
            self.forget(token);
            return Ok(None);
        }
        pending.prompt.validate(answer)?;

        let Some(pending) = self.forget(token) else {
            return Ok(None);
        };
        debug!(token = %token, "question answered");
        Ok(Some(Resolved {
            token,
            answer: Answer::from_slice(answer),
            continuation: pending.continuation,
            echo: pending.echo,
        }))
    }

    fn forget(&mut self, token: QuestionToken) -> Option<Pending<Ctx>> {
        self.order.retain(|&t| t != token);
        self.pending.remove(&token)
    }

    /// Move the most recent pending question to a new token.
    ///
    /// Answered, cancelled and expired questions are skipped, so an older
    /// question still waiting is replayed once the newer ones are gone. The
    /// old token stops working, so at most one continuation exists per
    /// prompt.
    pub fn reissue_last(&mut self) -> Result<(QuestionToken, Prompt), DuelError> {
        let old = self.last().ok_or(DuelError::NothingToReplay)?;
        let mut pending = self.forget(old).ok_or(DuelError::NothingToReplay)?;
        pending.asked_at = Instant::now();
        let prompt = pending.prompt.clone();

        let token = QuestionToken::generate();
        debug!(old = %old, new = %token, "question reissued");
        self.pending.insert(token, pending);
        self.order.push(token);
        Ok((token, prompt))
    }

    /// Token of the most recent question still pending.
    #[must_use]
    pub fn last(&self) -> Option<QuestionToken> {
        self.order.last().copied()
    }

    /// Drop a pending question. Returns whether it existed.
    pub fn cancel(&mut self, token: QuestionToken) -> bool {
        self.forget(token).is_some()
    }

    /// Drop every question older than the ttl. Returns the dropped tokens.
    pub fn expire(&mut self, now: Instant) -> Vec<QuestionToken> {
        let stale: Vec<QuestionToken> = self
            .order
            .iter()
            .copied()
            .filter(|t| self.pending.get(t).is_some_and(|p| self.is_stale(p, now)))
            .collect();
        for &token in &stale {
            warn!(token = %token, "question expired");
            self.forget(token);
        }
        stale
    }

    #[must_use]
    pub fn is_pending(&self, token: QuestionToken) -> bool {
        self.pending.contains_key(&token)
    }

    #[must_use]
    pub fn prompt(&self, token: QuestionToken) -> Option<&Prompt> {
        self.pending.get(&token).map(|p| &p.prompt)
    }

    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
        self.order.clear();
    }
}

impl<Ctx> std::fmt::Debug for QuestionCoordinator<Ctx> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuestionCoordinator")
            .field("pending", &self.pending.len())
            .field("last", &self.last())
            .field("ttl", &self.ttl)
            .finish()
    }
}
