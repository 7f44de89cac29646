//! Question coordination tests.
//!
//! Questions are answered out of order, late, twice, or not at all.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use duel_field::cards::{CardCode, CardRegistry};
use duel_field::core::{Audience, DuelConfig, DuelError, PlayerId, Slot};
use duel_field::duel::{AnswerOutcome, CommandOutcome, Decklist, Duel, DuelCommand};
use duel_field::questions::{AnswerLength, Prompt, Throw, RPS_KIND};
use duel_field::view::{Notification, Recorder};
use duel_field::zones::Zone;

const P0: PlayerId = PlayerId::new(0);
const P1: PlayerId = PlayerId::new(1);

fn duel(config: DuelConfig) -> (Duel, Recorder) {
    let recorder = Recorder::new();
    let mut duel = Duel::new(config, Arc::new(CardRegistry::new())).with_sink(recorder.clone());
    let deck = Decklist::new((1..=20).map(CardCode::new).collect());
    duel.start_duel([deck.clone(), deck]).unwrap();
    recorder.take();
    (duel, recorder)
}

fn pick(seat: PlayerId) -> Prompt {
    Prompt::new(Audience::seat(seat), "pick")
        .with_option("one", 1)
        .with_option("two", 2)
        .with_option("three", 3)
}

// =============================================================================
// Asking and answering
// =============================================================================

#[test]
fn test_answers_in_any_order() {
    let (mut duel, _) = duel(DuelConfig::new());
    let first = duel.ask(pick(P0), |duel, answer| {
        duel.draw(PlayerId::new(0), answer[0] as usize).map(|_| ())
    });
    let second = duel.ask(pick(P1), |duel, answer| {
        duel.draw(PlayerId::new(1), answer[0] as usize).map(|_| ())
    });

    assert_eq!(duel.submit_answer(second, &[3]).unwrap(), AnswerOutcome::Resolved);
    assert_eq!(duel.submit_answer(first, &[1]).unwrap(), AnswerOutcome::Resolved);

    assert_eq!(duel.stack().zone_len(P0, Zone::Hand), 1);
    assert_eq!(duel.stack().zone_len(P1, Zone::Hand), 3);
    assert_eq!(duel.pending_questions(), 0);
}

#[test]
fn test_invalid_answer_keeps_question() {
    let (mut duel, _) = duel(DuelConfig::new());
    let token = duel.ask_question(pick(P0).with_answer_length(AnswerLength::between(1, 2)));

    assert!(matches!(
        duel.submit_answer(token, &[]),
        Err(DuelError::AnswerLength { len: 0, min: 1, max: 2 })
    ));
    assert!(matches!(duel.submit_answer(token, &[7]), Err(DuelError::UnknownOption(7))));
    assert_eq!(duel.pending_questions(), 1);

    assert_eq!(duel.submit_answer(token, &[1, 3]).unwrap(), AnswerOutcome::Resolved);
}

#[test]
fn test_second_answer_is_ignored() {
    let (mut duel, _) = duel(DuelConfig::new());
    let runs = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&runs);
    let token = duel.ask(pick(P0), move |_, _| {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(())
    });

    duel.submit_answer(token, &[2]).unwrap();
    assert_eq!(duel.submit_answer(token, &[2]).unwrap(), AnswerOutcome::Ignored);

    assert_eq!(runs.load(Ordering::SeqCst), 1);
}

#[test]
fn test_continuation_error_is_returned() {
    let (mut duel, _) = duel(DuelConfig::new());
    let token = duel.ask(pick(P0), |duel, _| duel.draw(PlayerId::new(0), 50).map(|_| ()));

    assert!(matches!(
        duel.submit_answer(token, &[1]),
        Err(DuelError::NotEnoughCards { .. })
    ));
    assert_eq!(duel.pending_questions(), 0);
}

#[test]
fn test_question_notification_shape() {
    let (mut duel, recorder) = duel(DuelConfig::new());

    let token = duel.ask_question(pick(P1));

    let json = serde_json::to_value(recorder.last().unwrap()).unwrap();
    assert_eq!(json["type"], "question");
    assert_eq!(json["token"], token.to_string());
    assert_eq!(json["kind"], "pick");
    assert_eq!(json["options"].as_array().unwrap().len(), 3);
    assert_eq!(json["audience"], serde_json::json!({ "slot": { "player": 1 } }));
}

// =============================================================================
// Replay, cancel, expiry
// =============================================================================

#[test]
fn test_replay_rekeys_last_question() {
    let (mut duel, recorder) = duel(DuelConfig::new());
    let old = duel.ask_question(pick(P0));
    recorder.take();

    let new = duel.replay_last_question().unwrap();

    assert_ne!(old, new);
    assert!(matches!(recorder.last(), Some(Notification::Question { token, .. }) if token == new));
    assert_eq!(duel.submit_answer(old, &[1]).unwrap(), AnswerOutcome::Ignored);
    assert_eq!(duel.submit_answer(new, &[1]).unwrap(), AnswerOutcome::Resolved);
}

#[test]
fn test_nothing_to_replay() {
    let (mut duel, _) = duel(DuelConfig::new());
    assert!(matches!(duel.replay_last_question(), Err(DuelError::NothingToReplay)));

    let token = duel.ask_question(pick(P0));
    duel.submit_answer(token, &[1]).unwrap();
    assert!(matches!(duel.replay_last_question(), Err(DuelError::NothingToReplay)));
}

#[test]
fn test_cancel() {
    let (mut duel, _) = duel(DuelConfig::new());
    let token = duel.ask_question(pick(P0));

    assert!(duel.cancel_question(token));
    assert!(!duel.cancel_question(token));
    assert_eq!(duel.submit_answer(token, &[1]).unwrap(), AnswerOutcome::Ignored);
}

#[test]
fn test_expiry_only_drops_old_questions() {
    let (mut duel, _) = duel(DuelConfig::new().with_question_ttl(Duration::from_secs(30)));
    let token = duel.ask_question(pick(P0));

    assert!(duel.expire_questions().is_empty());
    assert_eq!(
        duel.expire_questions_at(Instant::now() + Duration::from_secs(31)),
        vec![token]
    );
    assert_eq!(duel.pending_questions(), 0);
}

#[test]
fn test_new_round_drops_pending_questions() {
    let (mut duel, _) = duel(DuelConfig::new());
    let token = duel.ask_question(pick(P0));

    duel.rematch().unwrap();

    assert_eq!(duel.pending_questions(), 0);
    assert_eq!(duel.submit_answer(token, &[1]).unwrap(), AnswerOutcome::Ignored);
}

// =============================================================================
// Rock-paper-scissors
// =============================================================================

#[test]
fn test_rps_prompts_go_to_each_seat() {
    let (mut duel, recorder) = duel(DuelConfig::new());

    duel.rock_paper_scissors(|_, _| Ok(()));

    let audiences: Vec<Audience> = recorder
        .take()
        .into_iter()
        .filter_map(|n| match n {
            Notification::Question { prompt, .. } if prompt.kind == RPS_KIND => {
                Some(prompt.audience)
            }
            _ => None,
        })
        .collect();
    assert_eq!(audiences, vec![Audience::seat(P0), Audience::seat(P1)]);
    assert!(!audiences[0].includes(Slot::Spectator));
}

#[test]
fn test_rps_ties_until_decided() {
    let (mut duel, recorder) = duel(DuelConfig::new());
    duel.apply(DuelCommand::RockPaperScissors).unwrap();

    for _ in 0..3 {
        let tokens = duel.pending_throws();
        duel.submit_answer(tokens[1], &[Throw::Scissors.value()]).unwrap();
        duel.submit_answer(tokens[0], &[Throw::Scissors.value()]).unwrap();
    }
    let tokens = duel.pending_throws();
    duel.submit_answer(tokens[0], &[Throw::Rock.value()]).unwrap();
    duel.submit_answer(tokens[1], &[Throw::Scissors.value()]).unwrap();

    let outcomes: Vec<Option<PlayerId>> = recorder
        .take()
        .into_iter()
        .filter_map(|n| match n {
            Notification::RpsOutcome { winner, .. } => Some(winner),
            _ => None,
        })
        .collect();
    assert_eq!(outcomes, vec![None, None, None, Some(P0)]);
    assert_eq!(duel.state().active_player, P0);
    assert!(duel.pending_throws().is_empty());
}

#[test]
fn test_rps_throw_survives_replay() {
    let (mut duel, _) = duel(DuelConfig::new());
    duel.apply(DuelCommand::RockPaperScissors).unwrap();
    let before = duel.pending_throws();

    let replayed = duel.replay_last_question().unwrap();

    let after = duel.pending_throws();
    assert_eq!(after, vec![before[0], replayed]);
    duel.submit_answer(after[0], &[Throw::Paper.value()]).unwrap();
    duel.submit_answer(after[1], &[Throw::Scissors.value()]).unwrap();
    assert_eq!(duel.state().active_player, P1);
}

#[test]
fn test_replay_reaches_seat_still_throwing() {
    let (mut duel, recorder) = duel(DuelConfig::new());
    duel.apply(DuelCommand::RockPaperScissors).unwrap();
    let throws = duel.pending_throws();
    duel.submit_answer(throws[1], &[Throw::Rock.value()]).unwrap();
    assert_eq!(duel.pending_questions(), 1);
    recorder.take();

    let replayed = duel.replay_last_question().unwrap();

    match recorder.last() {
        Some(Notification::Question { token, prompt }) => {
            assert_eq!(token, replayed);
            assert_eq!(prompt.audience, Audience::seat(P0));
        }
        other => panic!("expected a question, got {other:?}"),
    }
    assert_eq!(duel.pending_throws(), vec![replayed]);
    assert_eq!(
        duel.submit_answer(throws[0], &[Throw::Paper.value()]).unwrap(),
        AnswerOutcome::Ignored
    );
    assert_eq!(
        duel.submit_answer(replayed, &[Throw::Paper.value()]).unwrap(),
        AnswerOutcome::Resolved
    );
    assert_eq!(duel.state().active_player, P0);
}

#[test]
fn test_restarting_rps_abandons_old_throws() {
    let (mut duel, _) = duel(DuelConfig::new());
    duel.rock_paper_scissors(|_, _| Err(DuelError::NothingToReplay));
    let abandoned = duel.pending_throws();

    duel.apply(DuelCommand::RockPaperScissors).unwrap();

    let current = duel.pending_throws();
    assert_eq!(duel.pending_questions(), 2);
    assert!(abandoned.iter().all(|t| !current.contains(t)));
    assert_eq!(
        duel.submit_answer(abandoned[0], &[Throw::Scissors.value()]).unwrap(),
        AnswerOutcome::Ignored
    );
    assert_eq!(duel.pending_throws(), current);

    duel.submit_answer(current[0], &[Throw::Rock.value()]).unwrap();
    duel.submit_answer(current[1], &[Throw::Paper.value()]).unwrap();
    assert_eq!(duel.state().active_player, P1);
    assert_eq!(duel.pending_questions(), 0);
}

#[test]
fn test_answer_command_round_trip() {
    let (mut duel, _) = duel(DuelConfig::new());
    let asked = duel
        .apply(serde_json::from_value(serde_json::json!({
            "command": "ask",
            "prompt": { "audience": "all", "kind": "confirm" }
        }))
        .unwrap())
        .unwrap();
    let CommandOutcome::Asked(token) = asked else {
        panic!("expected a token, got {asked:?}");
    };

    let answered = duel
        .apply(DuelCommand::Answer {
            token,
            answer: vec![1],
        })
        .unwrap();

    assert_eq!(answered, CommandOutcome::Answered(AnswerOutcome::Resolved));
}
