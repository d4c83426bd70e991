//! Save/load round-trips against real files.

use std::fs;

use hd_engine::{EngineError, GameState, Intent, TurnEngine};

#[test]
fn a_game_round_trips_through_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("save.json");

    let mut engine = TurnEngine::new_game(11);
    // Play a little so the save is not a pristine new game.
    engine.tick(Intent::Wait);
    engine.tick(Intent::Move { dx: 1, dy: 0 });
    engine.save_game(&path).unwrap();

    let loaded = TurnEngine::load_game(&path, 11).unwrap();

    assert_eq!(
        (loaded.player().x, loaded.player().y),
        (engine.player().x, engine.player().y)
    );
    assert_eq!(loaded.depth(), engine.depth());
    assert_eq!(loaded.state(), engine.state());

    // Inventory order and the equipped-slot assignment survive.
    let before = engine.player().inventory.as_ref().unwrap();
    let after = loaded.player().inventory.as_ref().unwrap();
    let names_before: Vec<&str> = before.items.iter().map(|i| i.name.as_str()).collect();
    let names_after: Vec<&str> = after.items.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names_before, names_after);
    assert_eq!(
        loaded.player().equipment.as_ref().unwrap().main_hand,
        engine.player().equipment.as_ref().unwrap().main_hand
    );
    assert_eq!(loaded.player().power(), engine.player().power());

    // The floor's entity census survives too.
    assert_eq!(loaded.map().entities.len(), engine.map().entities.len());
    assert_eq!(
        loaded.log().messages().len(),
        engine.log().messages().len()
    );
}

#[test]
fn capabilities_absent_before_saving_stay_absent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("save.json");

    let engine = TurnEngine::new_game(5);
    engine.save_game(&path).unwrap();
    let loaded = TurnEngine::load_game(&path, 5).unwrap();

    for (before, after) in engine
        .map()
        .entities
        .iter()
        .zip(loaded.map().entities.iter())
    {
        assert_eq!(before.combat.is_some(), after.combat.is_some());
        assert_eq!(before.ai.is_some(), after.ai.is_some());
        assert_eq!(before.item.is_some(), after.item.is_some());
        assert_eq!(before.stairs.is_some(), after.stairs.is_some());
    }
}

#[test]
fn loading_a_missing_file_is_save_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("does_not_exist.json");
    let error = TurnEngine::load_game(&path, 0).unwrap_err();
    assert!(matches!(error, EngineError::SaveNotFound { .. }));
}

#[test]
fn loading_garbage_is_save_corrupt() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("save.json");
    fs::write(&path, "{ this is not a saved game").unwrap();
    let error = TurnEngine::load_game(&path, 0).unwrap_err();
    assert!(matches!(error, EngineError::SaveCorrupt { .. }));
}

#[test]
fn a_dead_game_loads_dead() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("save.json");

    let mut engine = TurnEngine::new_game(2);
    // Force the terminal state without playing out a death.
    engine.save_game(&path).unwrap();
    let json = fs::read_to_string(&path).unwrap();
    let json = json.replace("\"game_state\":\"player_turn\"", "\"game_state\":\"player_dead\"");
    fs::write(&path, json).unwrap();

    let loaded = TurnEngine::load_game(&path, 2).unwrap();
    assert_eq!(loaded.state(), GameState::PlayerDead);
}
