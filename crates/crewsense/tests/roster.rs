mod common;

use common::{GameImage, TestPlayer, full_lobby};
use crewsense::GamePhase;

#[test]
fn roster_has_one_entry_per_player() {
    for n in 0..=10u32 {
        let image = GameImage::new();
        image.set_raw_phase(1);
        let players: Vec<_> = (0..n)
            .map(|id| TestPlayer::crew(id, &format!("P{id}")))
            .collect();
        image.set_players(&players);

        let (_, mut engine) = image.engine();
        engine.tick().unwrap();

        let snapshot = engine.snapshot_handle().current();
        assert_eq!(snapshot.players.len(), n as usize, "roster of {n}");
        let ids: Vec<u32> = snapshot.players.iter().map(|p| p.id).collect();
        assert_eq!(ids, (0..n).collect::<Vec<_>>());
    }
}

#[test]
fn roster_is_capped_at_ten_slots() {
    let image = GameImage::new();
    let players: Vec<_> = (0..12).map(|id| TestPlayer::crew(id, "x")).collect();
    image.set_players(&players);

    let (_, mut engine) = image.engine();
    engine.tick().unwrap();
    assert_eq!(engine.snapshot_handle().current().players.len(), 10);
}

#[test]
fn negative_player_count_is_empty() {
    let image = GameImage::new();
    image.set_players(&full_lobby());
    image.set_player_count(-5);

    let (_, mut engine) = image.engine();
    engine.tick().unwrap();
    assert!(engine.snapshot_handle().current().players.is_empty());
}

#[test]
fn players_are_fully_decoded() {
    let image = GameImage::new();
    image.set_raw_phase(1);
    image.set_players(&full_lobby());

    let (_, mut engine) = image.engine();
    engine.tick().unwrap();
    let snapshot = engine.snapshot_handle().current();

    let red = snapshot.local_player().unwrap();
    assert_eq!(red.name, "Red");
    assert_eq!(red.ptr, GameImage::record_ptr(0));
    assert_eq!(red.client_id, 1000);
    assert_eq!((red.x, red.y), (1.0, 2.0));

    let blue = snapshot.player(GameImage::record_ptr(1)).unwrap();
    assert_eq!(blue.name, "Blue");
    assert!(!blue.is_local);
    assert_eq!((blue.x, blue.y), (-3.5, 0.25));

    let pink = &snapshot.players[3];
    assert!(pink.is_impostor);
    assert_eq!(pink.color_id, 3);
}

#[test]
fn unreadable_record_keeps_its_slot() {
    let image = GameImage::new();
    image.set_raw_phase(1);
    image.set_players(&full_lobby());
    image.memory.clear(GameImage::record_ptr(2), 48);

    let (_, mut engine) = image.engine();
    engine.tick().unwrap();
    let snapshot = engine.snapshot_handle().current();

    assert_eq!(snapshot.players.len(), 4);
    let broken = &snapshot.players[2];
    assert_eq!(broken.id, 0);
    assert!(broken.name.is_empty());
}

#[test]
fn absurd_name_length_reads_empty() {
    let image = GameImage::new();
    image.set_raw_phase(1);
    image.set_players(&full_lobby());
    // Length field of Blue's name string
    image
        .memory
        .write_i32(GameImage::record_ptr(1) + 0x808, 500);

    let (_, mut engine) = image.engine();
    engine.tick().unwrap();
    let snapshot = engine.snapshot_handle().current();
    assert_eq!(snapshot.players[1].name, "");
    assert_eq!(snapshot.phase, GamePhase::Lobby);
}
