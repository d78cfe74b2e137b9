mod common;

use common::{GameImage, TestPlayer, full_lobby, state_changes};
use crewsense::GamePhase;
use crewsense::config::phase::MENU_DEBOUNCE_TICKS;

fn phase_after_tick(engine: &mut common::TestEngine) -> GamePhase {
    engine.tick().unwrap();
    engine.snapshot_handle().current().phase
}

#[test]
fn joining_lobby_is_debounced_until_roster_settles() {
    let image = GameImage::new();
    image.set_players(&[TestPlayer::crew(0, "Red").local()]);
    let (_, mut engine) = image.engine();

    for raw in [0, 0, 1] {
        image.set_raw_phase(raw);
        assert_eq!(phase_after_tick(&mut engine), GamePhase::Menu);
    }

    // Roster stabilizes with a connected local player
    image.set_players(&full_lobby());
    let mut ticks = 0;
    while phase_after_tick(&mut engine) != GamePhase::Lobby {
        ticks += 1;
        assert!(ticks < MENU_DEBOUNCE_TICKS, "still Menu after {ticks} ticks");
    }
}

#[test]
fn reallocated_items_array_ends_debounce_immediately() {
    let mut image = GameImage::new();
    image.set_players(&full_lobby());
    let (_, mut engine) = image.engine();
    assert_eq!(phase_after_tick(&mut engine), GamePhase::Menu);

    image.set_raw_phase(1);
    image.reallocate_items();
    assert_eq!(phase_after_tick(&mut engine), GamePhase::Lobby);
}

#[test]
fn moved_list_object_keeps_debounce() {
    let mut image = GameImage::new();
    image.set_players(&full_lobby());
    let (_, mut engine) = image.engine();
    assert_eq!(phase_after_tick(&mut engine), GamePhase::Menu);

    image.set_raw_phase(1);
    image.move_player_list();
    assert_eq!(phase_after_tick(&mut engine), GamePhase::Menu);
}

#[test]
fn meeting_and_tasks() {
    let image = GameImage::new();
    image.set_players(&full_lobby());
    image.set_raw_phase(2);
    let (_, mut engine) = image.engine();
    assert_eq!(phase_after_tick(&mut engine), GamePhase::Tasks);

    image.start_meeting();
    assert_eq!(phase_after_tick(&mut engine), GamePhase::Discussion);

    // Crewmate voted out, game goes on
    image.end_meeting(1);
    assert_eq!(phase_after_tick(&mut engine), GamePhase::Tasks);
    image.close_meeting_hud();
    assert_eq!(phase_after_tick(&mut engine), GamePhase::Tasks);
}

#[test]
fn exiling_last_impostor_latches_lobby() {
    let image = GameImage::new();
    image.set_players(&full_lobby());
    image.set_raw_phase(2);
    image.set_game_code(1);
    let (_, mut engine) = image.engine();

    image.start_meeting();
    assert_eq!(phase_after_tick(&mut engine), GamePhase::Discussion);

    image.end_meeting(3);
    assert_eq!(phase_after_tick(&mut engine), GamePhase::Lobby);

    // Raw state still says in-game; latch holds
    image.start_meeting();
    assert_eq!(phase_after_tick(&mut engine), GamePhase::Lobby);
    image.close_meeting_hud();
    assert_eq!(phase_after_tick(&mut engine), GamePhase::Lobby);

    image.set_raw_phase(1);
    assert_eq!(phase_after_tick(&mut engine), GamePhase::Lobby);
    image.set_raw_phase(2);
    assert_eq!(phase_after_tick(&mut engine), GamePhase::Tasks);

    let phases: Vec<GamePhase> = state_changes(engine.sink())
        .iter()
        .map(|s| s.phase)
        .collect();
    assert_eq!(
        phases,
        vec![
            GamePhase::Discussion,
            GamePhase::Lobby,
            GamePhase::Tasks
        ]
    );
}

#[test]
fn impostor_parity_after_exile_ends_game() {
    let image = GameImage::new();
    image.set_players(&[
        TestPlayer::crew(0, "Red").local(),
        TestPlayer::crew(1, "Blue"),
        TestPlayer::crew(2, "Green").dead(),
        TestPlayer::crew(3, "Pink").impostor(),
    ]);
    image.set_raw_phase(2);
    let (_, mut engine) = image.engine();

    image.start_meeting();
    assert_eq!(phase_after_tick(&mut engine), GamePhase::Discussion);

    // Blue exiled: one crewmate left against one impostor
    image.end_meeting(1);
    assert_eq!(phase_after_tick(&mut engine), GamePhase::Lobby);
}

#[test]
fn lobby_code_follows_phase() {
    let image = GameImage::new();
    image.set_players(&full_lobby());
    image.set_game_code(0x1234_5678);
    let (_, mut engine) = image.engine();

    engine.tick().unwrap();
    assert_eq!(engine.snapshot_handle().current().lobby_code, "MENU");

    image.set_raw_phase(2);
    engine.tick().unwrap();
    assert_eq!(engine.snapshot_handle().current().lobby_code, "EMJYAK");
}
