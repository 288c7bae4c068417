// Copyright 2026 the Memaddr Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Leaderboard phase transitions.

use memaddr::{Format, LboardEvaluation, LboardState, Leaderboard};
use memaddr_conformance::Ram;

const BOARD: &str = "STA:0xH0000=1::CAN:0xH0001=1::SUB:0xH0002=1::VAL:0xH0003::PRO:0xH0004";

fn frame(board: &mut Leaderboard, ram: &mut Ram) -> LboardEvaluation {
    board.evaluate(ram)
}

#[test]
fn start_and_submit_on_the_same_frame() {
    let mut board = Leaderboard::parse(BOARD).unwrap();
    let mut ram = Ram::new(8);
    ram.set(0, 1);
    ram.set(2, 1);
    ram.set(3, 77);

    assert_eq!(frame(&mut board, &mut ram), LboardEvaluation {
        state: LboardState::Triggered,
        value: 77
    });
    assert!(board.is_submitted());
    assert!(!board.is_started());

    // Start still true: no re-trigger.
    for _ in 0..3 {
        assert_eq!(frame(&mut board, &mut ram).state, LboardState::Inactive);
        assert!(board.is_submitted());
    }

    // Start drops: re-armed.
    ram.set(0, 0);
    assert_eq!(frame(&mut board, &mut ram).state, LboardState::Inactive);
    assert!(!board.is_submitted());
    ram.set(0, 1);
    assert_eq!(frame(&mut board, &mut ram).state, LboardState::Triggered);
}

#[test]
fn started_then_active_reports_progress() {
    let mut board = Leaderboard::parse(BOARD).unwrap();
    let mut ram = Ram::new(8);
    ram.set(0, 1);
    ram.set(3, 50);
    ram.set(4, 5);

    assert_eq!(frame(&mut board, &mut ram), LboardEvaluation {
        state: LboardState::Started,
        value: 5
    });
    ram.set(4, 6);
    assert_eq!(frame(&mut board, &mut ram), LboardEvaluation {
        state: LboardState::Active,
        value: 6
    });
    // Start going false does not stop a running attempt.
    ram.set(0, 0);
    assert_eq!(frame(&mut board, &mut ram).state, LboardState::Active);

    ram.set(2, 1);
    assert_eq!(frame(&mut board, &mut ram), LboardEvaluation {
        state: LboardState::Triggered,
        value: 50
    });
}

#[test]
fn value_is_reported_while_running_without_progress() {
    let mut board = Leaderboard::parse("STA:0xH0000=1::CAN:0=1::SUB:0=1::VAL:0xH0003").unwrap();
    let mut ram = Ram::new(8);
    ram.set(0, 1);
    ram.set(3, 12);
    assert_eq!(frame(&mut board, &mut ram).value, 12);
}

#[test]
fn cancel_reports_once_with_zero() {
    let mut board = Leaderboard::parse(BOARD).unwrap();
    let mut ram = Ram::new(8);
    ram.set(0, 1);
    ram.set(3, 9);
    assert_eq!(frame(&mut board, &mut ram).state, LboardState::Started);

    ram.set(1, 1);
    assert_eq!(frame(&mut board, &mut ram), LboardEvaluation {
        state: LboardState::Canceled,
        value: 0
    });
    for _ in 0..3 {
        assert_eq!(frame(&mut board, &mut ram), LboardEvaluation {
            state: LboardState::Inactive,
            value: 0
        });
    }
}

#[test]
fn cancel_blocks_start() {
    let mut board = Leaderboard::parse(BOARD).unwrap();
    let mut ram = Ram::new(8);
    ram.set(0, 1);
    ram.set(1, 1);
    assert_eq!(frame(&mut board, &mut ram).state, LboardState::Inactive);
    assert!(!board.is_started());
}

#[test]
fn empty_start_never_starts() {
    let mut board = Leaderboard::parse("STA:::CAN:0=1::SUB:0=1::VAL:0xH0003").unwrap();
    let mut ram = Ram::new(8);
    assert_eq!(frame(&mut board, &mut ram).state, LboardState::Inactive);
    assert!(!board.is_started());
}

#[test]
fn reset_rearms_a_submitted_board() {
    let mut board = Leaderboard::parse(BOARD).unwrap();
    let mut ram = Ram::new(8);
    ram.set(0, 1);
    ram.set(2, 1);
    assert_eq!(frame(&mut board, &mut ram).state, LboardState::Triggered);
    board.reset();
    assert_eq!(frame(&mut board, &mut ram).state, LboardState::Triggered);
}

#[test]
fn formats_render_submitted_values() {
    assert_eq!(Format::parse("FRAMES").render(3600).to_string(), "01:00.00");
    assert_eq!(Format::parse("SCORE").render(150).to_string(), "000150 Points");
    assert_eq!(Format::parse("unknown").render(7).to_string(), "7");
}
