//! Asynchronous questions and their answers.
//!
//! Some decisions cannot be applied directly: the engine asks, and the
//! answer comes back later, possibly after other mutations. Each question
//! carries a token; the coordinator maps tokens to the work that should run
//! on the answer.

pub mod coordinator;
pub mod rps;

pub use coordinator::{
    Answer, AnswerLength, Continuation, Prompt, QuestionCoordinator, QuestionOption, QuestionToken,
    Resolved,
};
pub use rps::{rps_winner, throw_prompt, RoundState, RpsRound, Throw, RPS_KIND};
