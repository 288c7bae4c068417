// Copyright 2026 the Memaddr Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Engine behavior across frames, loads and threads.

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use memaddr::Format;
use memaddr_runtime::{
    AchievementDef, ActiveMode, AddressSpace, ConsoleId, DefinitionKind, Engine, EngineConfig,
    EngineSlot, Event, GameDefinitions, LeaderboardDef, MemoryMap, MemoryRegion,
};

fn cheevo(id: u32, memaddr: &str) -> AchievementDef {
    AchievementDef {
        id,
        title: format!("cheevo {id}"),
        points: 5,
        memaddr: memaddr.to_string(),
        ..AchievementDef::default()
    }
}

fn nes(bytes: &[(usize, u8)]) -> MemoryMap {
    let mut map = MemoryMap::new();
    let mut ram = vec![0; 0x800];
    for &(a, v) in bytes {
        ram[a] = v;
    }
    map.set_region(MemoryRegion::SystemRam, ram);
    map
}

fn poke(map: &mut MemoryMap, address: usize, value: u8) {
    map.bytes_mut(AddressSpace::Region(MemoryRegion::SystemRam))
        .unwrap()[address] = value;
}

#[test]
fn award_requires_a_false_frame_first() {
    let mut defs = GameDefinitions::new(ConsoleId::NINTENDO);
    defs.core.push(cheevo(1, "0xH0010=1"));
    defs.core.push(cheevo(2, "0xH0011=1"));
    let mut engine = Engine::load(defs, EngineConfig::default()).unwrap();

    let mut mem = nes(&[(0x10, 1)]);
    let mut events = Vec::<Event>::new();
    engine.do_frame(&mem, &mut events, None);
    assert!(events.is_empty());

    // Achievement 2 was false on the first frame, so it fires as soon as it holds.
    poke(&mut mem, 0x11, 1);
    engine.do_frame(&mem, &mut events, None);
    assert_eq!(events, [Event::AchievementUnlocked {
        id: 2,
        mode: ActiveMode::SOFTCORE
    }]);

    // Achievement 1 was true on the first frame; it needs to go false once.
    poke(&mut mem, 0x10, 0);
    engine.do_frame(&mem, &mut events, None);
    poke(&mut mem, 0x10, 1);
    engine.do_frame(&mem, &mut events, None);
    assert_eq!(events.len(), 2);
    assert_eq!(events[1], Event::AchievementUnlocked {
        id: 1,
        mode: ActiveMode::SOFTCORE
    });

    // Awarded achievements are no longer tested in that mode.
    poke(&mut mem, 0x10, 0);
    engine.do_frame(&mem, &mut events, None);
    poke(&mut mem, 0x10, 1);
    engine.do_frame(&mem, &mut events, None);
    assert_eq!(events.len(), 2);
}

#[test]
fn load_fails_on_a_bad_leaderboard() {
    let mut defs = GameDefinitions::new(ConsoleId::NINTENDO);
    defs.core.push(cheevo(1, "0xH0010=1"));
    defs.leaderboards.push(LeaderboardDef {
        id: 40,
        mem: "STA:0xH0=1::CAN:0xH0=2::VAL:0xH1".to_string(),
        ..LeaderboardDef::default()
    });
    let err = Engine::load(defs, EngineConfig::default()).unwrap_err();
    assert_eq!(err.kind, DefinitionKind::Leaderboard);
    assert_eq!(err.id, 40);
    assert_eq!(err.error, memaddr::ParseError::MissingSubmit);
}

#[test]
fn leaderboard_submission_in_hardcore() {
    let mut defs = GameDefinitions::new(ConsoleId::NINTENDO);
    defs.leaderboards.push(LeaderboardDef {
        id: 7,
        title: "Fastest".to_string(),
        format: "FRAMES".to_string(),
        mem: "STA:0xH0000=1::CAN:0xH0000=9::SUB:0xH0000=2::VAL:0x0002".to_string(),
        ..LeaderboardDef::default()
    });
    let config = EngineConfig {
        hardcore: true,
        ..EngineConfig::default()
    };
    let mut engine = Engine::load(defs, config).unwrap();
    let mut mem = nes(&[(0, 1), (2, 0x10), (3, 0x0E)]);
    let mut events = Vec::<Event>::new();

    engine.do_frame(&mem, &mut events, None);
    poke(&mut mem, 0, 2);
    engine.do_frame(&mem, &mut events, None);

    assert_eq!(events, [
        Event::LeaderboardStarted { id: 7 },
        Event::LeaderboardSubmitted {
            id: 7,
            value: 0x0E10,
            formatted: Format::Frames.render(0x0E10),
        },
    ]);
    if let Event::LeaderboardSubmitted { formatted, .. } = events[1] {
        assert_eq!(formatted.to_string(), "01:00.00");
    }

    // Pausing hardcore stops leaderboards.
    events.clear();
    engine.set_hardcore_paused(true);
    poke(&mut mem, 0, 0);
    engine.do_frame(&mem, &mut events, None);
    poke(&mut mem, 0, 1);
    engine.do_frame(&mem, &mut events, None);
    assert!(events.is_empty());
}

#[test]
fn slot_separates_loading_from_frames() {
    let slot = EngineSlot::new();
    let loaded = AtomicBool::new(false);

    thread::scope(|s| {
        s.spawn(|| {
            let mut defs = GameDefinitions::new(ConsoleId::NINTENDO);
            defs.core.push(cheevo(1, "0xH0000=1"));
            let engine = Engine::load(defs, EngineConfig::default()).unwrap();
            assert!(slot.install(engine).is_none());
            loaded.store(true, Ordering::Release);
        });

        let mut mem = nes(&[]);
        let mut events = Vec::<Event>::new();
        while !loaded.load(Ordering::Acquire) {
            // Frames before the load completes are skipped, not queued.
            let _ = slot.do_frame(&mem, &mut events, None);
            thread::yield_now();
        }
        assert!(slot.do_frame(&mem, &mut events, None));
        poke(&mut mem, 0, 1);
        assert!(slot.do_frame(&mem, &mut events, None));
        assert_eq!(events, [Event::AchievementUnlocked {
            id: 1,
            mode: ActiveMode::SOFTCORE
        }]);
    });

    assert!(slot.unload().is_some());
    assert!(!slot.is_loaded());
}
