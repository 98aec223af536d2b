//! Drop-cycle scenarios driven through the synchronous game state.

use prime_drop::core::{ActionOutcome, CascadePhase, CascadeStep, ExplosionEvent, GameState, SimpleRng};
use prime_drop::types::{ExplosionKind, GameAction, Operation, COMBO_BONUS, SPAWN_X};

fn started(seed: u32) -> GameState {
    let mut state = GameState::new(seed);
    state.start();
    state
}

/// Run a landing to completion, collecting every explosion.
fn run_cycle(state: &mut GameState, outcome: ActionOutcome) -> (Vec<ExplosionEvent>, CascadeStep) {
    let ActionOutcome::Landed(mut step) = outcome else {
        panic!("expected a landing, got {outcome:?}");
    };
    let mut explosions = Vec::new();
    while let CascadeStep::Exploding(event) = step {
        explosions.push(event);
        step = state.resume_cascade().expect("cascade should be waiting");
    }
    (explosions, step)
}

#[test]
fn prime_without_neighbours_settles_and_respawns() {
    let mut state = started(1);
    state.set_falling_value(7);

    let outcome = state.apply_action(GameAction::Drop);
    let (explosions, step) = run_cycle(&mut state, outcome);

    assert!(explosions.is_empty());
    assert_eq!(step, CascadeStep::Settled { score_gained: 0, level_up: false });
    assert_eq!(state.grid().value(5, 15), Some(7));
    let next = state.falling().unwrap();
    assert_eq!((next.x, next.y), (SPAWN_X, 0));
    assert_eq!(state.cascade().phase(), CascadePhase::Idle);
}

#[test]
fn equal_values_stack_and_explode() {
    let mut state = started(1);
    state.grid_mut().set(5, 15, Some(12));
    state.set_falling_value(12);

    let outcome = state.apply_action(GameAction::Drop);
    let (explosions, step) = run_cycle(&mut state, outcome);

    assert_eq!(explosions.len(), 1);
    assert_eq!(explosions[0].kind, ExplosionKind::Normal);
    assert_eq!(explosions[0].score_delta, 80);
    assert_eq!(step, CascadeStep::Settled { score_gained: 80, level_up: false });
    assert_eq!(state.score(), 80);
    assert_eq!(state.grid().filled_count(), 0);
}

#[test]
fn add_writes_result_below_and_original_above() {
    let mut state = started(1);
    state.grid_mut().set(5, 15, Some(5));
    state.set_falling_value(5);
    assert!(state.select_operation(Operation::Add));

    let outcome = state.apply_action(GameAction::Drop);
    let (explosions, _) = run_cycle(&mut state, outcome);

    assert!(explosions.is_empty());
    assert_eq!(state.grid().value(5, 15), Some(10));
    assert_eq!(state.grid().value(5, 14), Some(5));
    assert_eq!(state.selected_operation(), Operation::None);
}

#[test]
fn add_result_is_the_detection_target() {
    let mut state = started(1);
    state.grid_mut().set(5, 15, Some(5));
    state.grid_mut().set(4, 15, Some(10));
    state.set_falling_value(5);
    state.select_operation(Operation::Add);

    let outcome = state.apply_action(GameAction::Drop);
    let (explosions, _) = run_cycle(&mut state, outcome);

    assert_eq!(explosions.len(), 1);
    assert_eq!(explosions[0].origin, (5, 15));
    assert_eq!(explosions[0].value, 10);
    // The original 5 drops into the hole left by the 10.
    assert_eq!(state.grid().value(5, 15), Some(5));
    assert_eq!(state.score(), 80);
}

#[test]
fn subtract_uses_absolute_difference() {
    let mut state = started(1);
    state.grid_mut().set(5, 15, Some(3));
    state.set_falling_value(10);
    state.select_operation(Operation::Subtract);

    let outcome = state.apply_action(GameAction::Drop);
    run_cycle(&mut state, outcome);
    assert_eq!(state.grid().value(5, 15), Some(7));
}

#[test]
fn top_row_landing_without_match_ends_game() {
    let mut state = started(1);
    for y in 1..16 {
        state.grid_mut().set(SPAWN_X, y, Some(40 + y as u32));
    }
    state.set_falling_value(9);

    let outcome = state.apply_action(GameAction::Drop);
    let (_, step) = run_cycle(&mut state, outcome);

    assert_eq!(step, CascadeStep::GameOver { final_score: 0 });
    assert!(state.game_over());
    assert_eq!(state.cascade().phase(), CascadePhase::GameOver);
    assert_eq!(state.apply_action(GameAction::Drop), ActionOutcome::Ignored);

    assert_eq!(state.apply_action(GameAction::Restart), ActionOutcome::Applied);
    assert!(!state.game_over());
    assert_eq!(state.grid().filled_count(), 0);
}

#[test]
fn top_row_landing_with_match_keeps_playing() {
    let mut state = started(1);
    for y in 1..16 {
        state.grid_mut().set(SPAWN_X, y, Some(40 + y as u32));
    }
    state.grid_mut().set(SPAWN_X - 1, 0, Some(9));
    state.set_falling_value(9);

    let outcome = state.apply_action(GameAction::Drop);
    let (explosions, step) = run_cycle(&mut state, outcome);

    assert_eq!(explosions.len(), 1);
    assert!(matches!(step, CascadeStep::Settled { score_gained: 80, .. }));
    assert!(!state.game_over());
}

#[test]
fn second_post_gravity_match_is_a_combo() {
    let mut state = started(1);
    for (x, y, v) in [(4, 15, 12), (4, 14, 6), (4, 13, 8), (3, 15, 6), (3, 14, 8)] {
        state.grid_mut().set(x, y, Some(v));
    }
    state.set_falling_value(12);

    let outcome = state.apply_action(GameAction::Drop);
    let (explosions, step) = run_cycle(&mut state, outcome);

    let kinds: Vec<ExplosionKind> = explosions.iter().map(|e| e.kind).collect();
    assert_eq!(
        kinds,
        vec![ExplosionKind::Normal, ExplosionKind::Normal, ExplosionKind::Combo]
    );
    let deltas: Vec<u32> = explosions.iter().map(|e| e.score_delta).collect();
    assert_eq!(deltas, vec![80, 80, 80 + COMBO_BONUS]);
    assert_eq!(explosions[1].value, 8);
    assert_eq!(explosions[2].value, 6);
    assert_eq!(step, CascadeStep::Settled { score_gained: 390, level_up: false });
    assert_eq!(state.score(), 390);
    assert_eq!(state.grid().filled_count(), 0);
}

#[test]
fn combo_count_does_not_carry_into_next_drop() {
    let mut state = started(1);
    for (x, y, v) in [(4, 15, 12), (4, 14, 6), (4, 13, 8), (3, 15, 6), (3, 14, 8)] {
        state.grid_mut().set(x, y, Some(v));
    }
    state.set_falling_value(12);
    let outcome = state.apply_action(GameAction::Drop);
    run_cycle(&mut state, outcome);

    // Next drop: exactly one post-gravity match, which must not be a combo.
    for (x, y, v) in [(1, 15, 3), (1, 14, 20), (0, 15, 3)] {
        state.grid_mut().set(x, y, Some(v));
    }
    state.set_falling_value(20);
    for _ in 0..4 {
        state.apply_action(GameAction::MoveLeft);
    }
    assert_eq!(state.falling().unwrap().x, 1);

    let outcome = state.apply_action(GameAction::Drop);
    let (explosions, _) = run_cycle(&mut state, outcome);
    let kinds: Vec<ExplosionKind> = explosions.iter().map(|e| e.kind).collect();
    assert_eq!(kinds, vec![ExplosionKind::Normal, ExplosionKind::Prime]);
}

#[test]
fn pending_score_is_committed_only_on_settle() {
    let mut state = started(1);
    state.grid_mut().set(5, 15, Some(12));
    state.set_falling_value(12);

    let ActionOutcome::Landed(CascadeStep::Exploding(_)) = state.apply_action(GameAction::Drop)
    else {
        panic!("expected an explosion");
    };
    let snap = state.snapshot();
    assert_eq!(snap.score, 0);
    assert_eq!(snap.pending_score, 80);
    assert!(snap.busy.explosion_active);

    state.resume_cascade();
    let snap = state.snapshot();
    assert_eq!(snap.score, 80);
    assert_eq!(snap.pending_score, 0);
}

#[test]
fn score_never_decreases_within_an_episode() {
    let mut state = started(2024);
    let mut rng = SimpleRng::new(99);
    let mut last = (state.episode_id(), 0);

    for _ in 0..5_000 {
        let action = match rng.next_range(8) {
            0 => GameAction::MoveLeft,
            1 => GameAction::MoveRight,
            2 => GameAction::SelectOperation(Operation::Add),
            3 => GameAction::SelectOperation(Operation::Subtract),
            4 => GameAction::Drop,
            5 if state.game_over() => GameAction::Restart,
            _ => GameAction::Tick,
        };
        let outcome = state.apply_action(action);
        if let ActionOutcome::Landed(_) = outcome {
            run_cycle(&mut state, outcome);
        }
        if state.level_transition() {
            state.dismiss_level_transition();
        }

        if state.episode_id() == last.0 {
            assert!(state.score() >= last.1);
        }
        assert_eq!(state.level(), state.score() / 1300 + 1);
        last = (state.episode_id(), state.score());
    }
}
