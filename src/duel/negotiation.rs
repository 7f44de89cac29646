//! Questions asked of the seats, and rock-paper-scissors on top of them.

use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::Duel;
use crate::core::{DuelError, PlayerId};
use crate::questions::{
    throw_prompt, Answer, Continuation, Prompt, QuestionToken, RoundState, RpsRound,
};
use crate::view::Notification;

/// What happened to a submitted answer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerOutcome {
    /// The continuation ran.
    Resolved,
    /// The token was unknown, expired or already used.
    Ignored,
}

/// Runs once rock-paper-scissors has a winner.
pub type RpsResolver = Box<dyn FnOnce(&mut Duel, PlayerId) -> Result<(), DuelError> + Send>;

pub(crate) struct RpsSession {
    round: RpsRound,
    resolver: RpsResolver,
}

impl Duel {
    fn ask_with(
        &mut self,
        prompt: Prompt,
        continuation: Continuation<Duel>,
        echo: bool,
    ) -> QuestionToken {
        let token = self.questions.ask(prompt.clone(), continuation, echo);
        self.notify(Notification::Question { token, prompt });
        token
    }

    /// Ask a question and run `continuation` with the answer.
    pub fn ask(
        &mut self,
        prompt: Prompt,
        continuation: impl FnOnce(&mut Duel, Answer) -> Result<(), DuelError> + Send + 'static,
    ) -> QuestionToken {
        self.ask_with(prompt, Box::new(continuation), false)
    }

    /// Ask a question on behalf of a client. The answer is sent back out as
    /// an [`Notification::Answer`].
    pub fn ask_question(&mut self, prompt: Prompt) -> QuestionToken {
        self.ask_with(prompt, Box::new(|_, _| Ok(())), true)
    }

    /// Hand an answer to the question it belongs to.
    ///
    /// Unknown, expired and already answered tokens are ignored. An answer
    /// that does not fit the prompt is an error and leaves the question
    /// pending.
    pub fn submit_answer(
        &mut self,
        token: QuestionToken,
        answer: &[i64],
    ) -> Result<AnswerOutcome, DuelError> {
        let Some(resolved) = self.questions.take(token, answer, Instant::now())? else {
            warn!(duel = %self.id, token = %token, "ignoring answer to unknown question");
            return Ok(AnswerOutcome::Ignored);
        };
        if resolved.echo {
            self.notify(Notification::Answer {
                token,
                answer: resolved.answer.clone(),
            });
        }
        (resolved.continuation)(self, resolved.answer)?;
        Ok(AnswerOutcome::Resolved)
    }

    /// Send the most recent pending question again under a new token.
    pub fn replay_last_question(&mut self) -> Result<QuestionToken, DuelError> {
        let old = self.questions.last();
        let (token, prompt) = self.questions.reissue_last()?;
        if let (Some(session), Some(old)) = (self.rps.as_mut(), old) {
            for player in PlayerId::all() {
                if session.round.token(player) == Some(old) {
                    session.round.asked(player, token);
                }
            }
        }
        self.notify(Notification::Question { token, prompt });
        Ok(token)
    }

    /// Drop a pending question. Returns whether it was pending.
    pub fn cancel_question(&mut self, token: QuestionToken) -> bool {
        self.questions.cancel(token)
    }

    /// Drop questions older than the configured ttl.
    pub fn expire_questions(&mut self) -> Vec<QuestionToken> {
        self.expire_questions_at(Instant::now())
    }

    /// Drop questions that are past the ttl at `now`.
    pub fn expire_questions_at(&mut self, now: Instant) -> Vec<QuestionToken> {
        self.questions.expire(now)
    }

    /// Play rock-paper-scissors until somebody wins, then run `resolver`
    /// with the winning seat.
    ///
    /// Both seats are asked at once. Ties re-ask both seats with no limit;
    /// a host that gives up cancels or expires the outstanding questions.
    /// Starting a new game abandons one still in progress along with its
    /// unanswered throws.
    pub fn rock_paper_scissors(
        &mut self,
        resolver: impl FnOnce(&mut Duel, PlayerId) -> Result<(), DuelError> + Send + 'static,
    ) {
        for token in self.pending_throws() {
            debug!(duel = %self.id, token = %token, "abandoning rock-paper-scissors throw");
            self.questions.cancel(token);
        }
        self.rps = Some(RpsSession {
            round: RpsRound::new(),
            resolver: Box::new(resolver),
        });
        self.ask_throws();
    }

    fn ask_throws(&mut self) {
        for player in PlayerId::all() {
            let token = self.ask_with(
                throw_prompt(player),
                Box::new(move |duel: &mut Duel, answer: Answer| {
                    let value = answer.first().copied().ok_or(DuelError::AnswerLength {
                        len: 0,
                        min: 1,
                        max: 1,
                    })?;
                    duel.record_throw(player, value)
                }),
                false,
            );
            if let Some(session) = self.rps.as_mut() {
                session.round.asked(player, token);
            }
        }
    }

    fn record_throw(&mut self, player: PlayerId, value: i64) -> Result<(), DuelError> {
        let Some(session) = self.rps.as_mut() else {
            return Ok(());
        };
        match session.round.record(player, value)? {
            RoundState::Waiting => Ok(()),
            RoundState::Tie(throws) => {
                debug!(duel = %self.id, ?throws, "rock-paper-scissors tie");
                self.notify(Notification::RpsOutcome { throws, winner: None });
                self.ask_throws();
                Ok(())
            }
            RoundState::Decided { throws, winner } => {
                debug!(duel = %self.id, ?throws, winner = winner.0, "rock-paper-scissors decided");
                self.notify(Notification::RpsOutcome {
                    throws,
                    winner: Some(winner),
                });
                match self.rps.take() {
                    Some(session) => (session.resolver)(self, winner),
                    None => Ok(()),
                }
            }
        }
    }

    /// Tokens the current rock-paper-scissors round is waiting on.
    #[must_use]
    pub fn pending_throws(&self) -> Vec<QuestionToken> {
        self.rps
            .as_ref()
            .map(|s| PlayerId::all().filter_map(|p| s.round.token(p)).collect())
            .unwrap_or_default()
    }
}
