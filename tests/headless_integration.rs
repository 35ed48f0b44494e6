use std::collections::BTreeSet;
use std::time::{Duration, Instant};

use assert_matches::assert_matches;
use sortscope::{
    emitter::CheckpointTag, util::is_sorted, Algorithm, Error, Mode, RunState, Session,
    VisualizerConfig,
};

// Headless integration: drive real worker-thread runs through the public
// session API, the same calls the TUI makes, without a terminal.

fn session(delay_unit: Duration) -> Session {
    Session::new(VisualizerConfig {
        seed: Some(99),
        delay_unit,
        ..VisualizerConfig::default()
    })
    .unwrap()
}

fn pump_until(session: &mut Session, cond: impl Fn(&Session) -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_secs(5);
    while Instant::now() < deadline {
        session.pump_timeout(Duration::from_millis(10));
        if cond(session) {
            return true;
        }
    }
    false
}

fn completed(session: &Session) -> bool {
    session.state().run_state == RunState::Completed
}

#[test]
fn every_algorithm_sorts_in_auto_mode() {
    for algorithm in Algorithm::ALL {
        let mut s = session(Duration::ZERO);
        s.set_speed(100);
        let mut expected = s.state().array.clone();
        expected.sort_unstable();

        assert!(s.start(algorithm).unwrap());
        assert!(pump_until(&mut s, completed), "{algorithm} did not finish");

        let state = s.state();
        assert!(is_sorted(&state.array));
        assert_eq!(state.array, expected);
        assert_eq!(state.sorted, (0..state.array.len()).collect::<BTreeSet<_>>());
        assert_eq!(
            (state.highlight_a, state.highlight_b, state.highlight_c),
            (None, None, None)
        );
        assert!(state.comparisons > 0);
    }
}

#[test]
fn textbook_example_counts_match() {
    let mut s = session(Duration::ZERO);
    s.set_array(vec![5, 3, 8, 1]);
    s.start(Algorithm::Bubble).unwrap();
    assert!(pump_until(&mut s, completed));

    let state = s.state();
    assert_eq!(state.array, vec![1, 3, 5, 8]);
    assert_eq!(state.comparisons, 6);
    assert_eq!(state.swaps, 4);
}

#[test]
fn start_while_running_is_ignored() {
    let mut s = session(Duration::ZERO);
    s.set_mode(Mode::Step);
    assert!(s.start(Algorithm::Quick).unwrap());
    assert!(!s.start(Algorithm::Merge).unwrap());
    assert!(!s.set_mode(Mode::Auto));
    assert!(!s.select_algorithm(Algorithm::Merge));
    assert!(!s.set_array(vec![1, 2, 3]));

    let state = s.state();
    assert_eq!(state.algorithm, Algorithm::Quick);
    assert_eq!(state.mode, Mode::Step);
    assert_eq!(state.array.len(), 20);
}

#[test]
fn unknown_algorithm_selector_is_an_error() {
    let mut s = session(Duration::ZERO);
    assert_matches!(s.start_named("shell"), Err(Error::UnknownAlgorithm(name)) if name == "shell");
    assert_eq!(s.state().run_state, RunState::Idle);
    assert!(s.start_named("merge").unwrap());
}

#[test]
fn step_mode_advances_one_checkpoint_per_signal() {
    let mut s = session(Duration::ZERO);
    s.set_mode(Mode::Step);
    s.set_array(vec![2, 1]);
    s.start(Algorithm::Bubble).unwrap();

    // Parked after the first comparison is announced.
    assert!(pump_until(&mut s, Session::is_awaiting_step));
    s.pump();
    let parked = s.snapshot();
    assert_eq!(parked.comparisons, 1);
    assert_eq!(parked.swaps, 0);
    assert_eq!((parked.highlight_a, parked.highlight_b), (Some(0), Some(1)));

    // Nothing moves without a signal.
    std::thread::sleep(Duration::from_millis(30));
    s.pump();
    assert_eq!(s.snapshot(), parked);

    // One signal releases one paced delay: the swap, then parked again.
    assert!(s.advance_step());
    assert!(pump_until(&mut s, Session::is_awaiting_step));
    s.pump();
    assert_eq!(s.state().swaps, 1);
    assert_eq!(s.state().comparisons, 1);
    assert_eq!(s.state().current_tag, Some(CheckpointTag::Swap));
    assert_eq!(s.state().array, vec![1, 2]);
    assert_eq!(s.state().run_state, RunState::Running);

    assert!(s.advance_step());
    assert!(pump_until(&mut s, completed));
}

#[test]
fn stop_returns_to_idle_promptly_and_freezes_counters() {
    // speed 1 -> 100 units of 10ms: one second per paced delay
    let mut s = session(Duration::from_millis(10));
    s.set_speed(1);
    s.start(Algorithm::Merge).unwrap();
    assert!(pump_until(&mut s, |s| s.state().step_count > 0));

    let started = Instant::now();
    assert!(s.stop());
    assert!(started.elapsed() < Duration::from_millis(500));

    let state = s.snapshot();
    assert_eq!(state.run_state, RunState::Idle);
    assert_eq!((state.step_count, state.comparisons, state.swaps), (0, 0, 0));
    assert!(state.sorted.is_empty());
    assert_eq!(state.highlight_a, None);

    std::thread::sleep(Duration::from_millis(30));
    assert!(!s.pump());
    assert_eq!(s.snapshot(), state);
    assert!(!s.stop());
}

#[test]
fn pause_holds_the_run_until_resumed() {
    let mut s = session(Duration::from_millis(1));
    s.set_speed(90);
    s.start(Algorithm::Bubble).unwrap();
    assert!(pump_until(&mut s, |s| s.state().comparisons > 0));

    assert!(s.toggle_pause());
    assert_eq!(s.state().run_state, RunState::Paused);
    // drain whatever was already in flight
    std::thread::sleep(Duration::from_millis(100));
    s.pump();
    let frozen = s.state().step_count;
    std::thread::sleep(Duration::from_millis(60));
    s.pump();
    assert_eq!(s.state().step_count, frozen);

    // starting while paused is still ignored
    assert!(!s.start(Algorithm::Quick).unwrap());

    assert!(s.toggle_pause());
    assert_eq!(s.state().run_state, RunState::Running);
    assert!(pump_until(&mut s, |s| s.state().step_count > frozen));
    s.set_speed(100);
    assert!(pump_until(&mut s, completed));
}

#[test]
fn reset_mid_run_gives_a_fresh_idle_session() {
    let mut s = session(Duration::ZERO);
    s.set_mode(Mode::Step);
    s.start(Algorithm::Quick).unwrap();
    assert!(pump_until(&mut s, Session::is_awaiting_step));

    s.reset();
    let state = s.state();
    assert_eq!(state.run_state, RunState::Idle);
    assert_eq!(state.step_count, 0);
    assert_eq!((state.algorithm, state.mode), (Algorithm::Bubble, Mode::Auto));
    assert!(!s.is_awaiting_step());
    assert!(!s.advance_step());
}

#[test]
fn completed_run_can_be_restarted() {
    let mut s = session(Duration::ZERO);
    s.start(Algorithm::Quick).unwrap();
    assert!(pump_until(&mut s, completed));
    let first = s.snapshot();

    assert!(s.start(Algorithm::Bubble).unwrap());
    assert!(pump_until(&mut s, completed));
    let second = s.state();
    assert_eq!(second.array, first.array);
    // already sorted: a single early-exit round
    assert_eq!(second.swaps, 0);
    assert_eq!(second.comparisons, first.array.len() as u64 - 1);
}

#[test]
fn dropping_a_session_mid_run_does_not_hang() {
    let mut s = session(Duration::ZERO);
    s.set_mode(Mode::Step);
    s.start(Algorithm::Merge).unwrap();
    assert!(pump_until(&mut s, Session::is_awaiting_step));
    drop(s);
}
