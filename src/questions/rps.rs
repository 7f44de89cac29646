//! Rock-paper-scissors, used to decide who goes first.

use serde::{Deserialize, Serialize};

use super::coordinator::{AnswerLength, Prompt, QuestionToken};
use crate::core::{Audience, DuelError, PlayerId, PlayerMap};

/// Question kind sent with each throw prompt.
pub const RPS_KIND: &str = "rps";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Throw {
    Rock = 0,
    Paper = 1,
    Scissors = 2,
}

impl Throw {
    pub const ALL: [Throw; 3] = [Throw::Rock, Throw::Paper, Throw::Scissors];

    #[must_use]
    pub const fn value(self) -> i64 {
        self as i64
    }

    #[must_use]
    pub fn from_value(value: i64) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.value() == value)
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Throw::Rock => "rock",
            Throw::Paper => "paper",
            Throw::Scissors => "scissors",
        }
    }
}

/// Winning seat for seat 0 throwing `a` against seat 1 throwing `b`.
/// `None` on a tie.
///
/// ```
/// use duel_field::core::PlayerId;
/// use duel_field::questions::{rps_winner, Throw};
///
/// assert_eq!(rps_winner(Throw::Paper, Throw::Rock), Some(PlayerId::new(0)));
/// assert_eq!(rps_winner(Throw::Paper, Throw::Scissors), Some(PlayerId::new(1)));
/// assert_eq!(rps_winner(Throw::Rock, Throw::Rock), None);
/// ```
#[must_use]
pub fn rps_winner(a: Throw, b: Throw) -> Option<PlayerId> {
    match (3 + a.value() - b.value()) % 3 - 1 {
        0 => Some(PlayerId::new(0)),
        1 => Some(PlayerId::new(1)),
        _ => None,
    }
}

/// The prompt each seat gets.
#[must_use]
pub fn throw_prompt(player: PlayerId) -> Prompt {
    Throw::ALL
        .into_iter()
        .fold(Prompt::new(Audience::seat(player), RPS_KIND), |p, t| {
            p.with_option(t.name(), t.value())
        })
        .with_answer_length(AnswerLength::exactly(1))
}

/// What a recorded throw led to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoundState {
    /// Still waiting for the other seat.
    Waiting,
    /// Both seats threw the same; the throws have been cleared.
    Tie([Throw; 2]),
    Decided { throws: [Throw; 2], winner: PlayerId },
}

/// Buffers the two throws of a round.
///
/// Answers may arrive in any order; the round resolves when both are in.
#[derive(Clone, Debug)]
pub struct RpsRound {
    throws: PlayerMap<Option<Throw>>,
    tokens: PlayerMap<Option<QuestionToken>>,
}

impl RpsRound {
    #[must_use]
    pub fn new() -> Self {
        Self {
            throws: PlayerMap::with_default(),
            tokens: PlayerMap::with_default(),
        }
    }

    /// Remember which token a seat was asked with.
    pub fn asked(&mut self, player: PlayerId, token: QuestionToken) {
        self.tokens[player] = Some(token);
    }

    #[must_use]
    pub fn token(&self, player: PlayerId) -> Option<QuestionToken> {
        self.tokens[player]
    }

    /// Record a throw. A seat throwing twice overwrites its first throw.
    pub fn record(&mut self, player: PlayerId, value: i64) -> Result<RoundState, DuelError> {
        let throw = Throw::from_value(value).ok_or(DuelError::UnknownOption(value))?;
        self.throws[player] = Some(throw);
        self.tokens[player] = None;

        let (Some(a), Some(b)) = (self.throws[PlayerId::new(0)], self.throws[PlayerId::new(1)])
        else {
            return Ok(RoundState::Waiting);
        };
        let throws = [a, b];
        match rps_winner(a, b) {
            Some(winner) => Ok(RoundState::Decided { throws, winner }),
            None => {
                self.throws = PlayerMap::with_default();
                Ok(RoundState::Tie(throws))
            }
        }
    }
}
