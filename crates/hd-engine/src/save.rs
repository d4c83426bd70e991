//! Saving and loading whole games.
//!
//! The on-disk document is JSON with the shape
//! `{player, dungeon: {depth: floor}, message_log, game_state,
//! current_level}`. Absent capabilities round-trip as absent, and owner
//! back-references are rebuilt after decoding.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use hd_core::entity::Entity;
use hd_core::map::GameMap;
use hd_core::message::MessageLog;
use hd_dungeon::LayoutConfig;

use crate::engine::TurnEngine;
use crate::error::{EngineError, EngineResult};
use crate::nav::GridNav;
use crate::state::GameState;

#[derive(Serialize, Deserialize)]
struct SaveGame {
    player: Entity,
    dungeon: BTreeMap<u32, GameMap>,
    message_log: MessageLog,
    game_state: GameState,
    current_level: u32,
}

impl TurnEngine {
    /// Write the whole game to `path` as JSON.
    pub fn save_game(&self, path: &Path) -> EngineResult<()> {
        let document = SaveGame {
            player: self.player.clone(),
            dungeon: self.levels.clone(),
            message_log: self.log.clone(),
            game_state: self.state,
            current_level: self.depth,
        };
        let json = serde_json::to_string(&document)?;
        fs::write(path, json)?;
        tracing::info!(path = %path.display(), depth = self.depth, "game saved");
        Ok(())
    }

    /// Load a saved game from `path`.
    ///
    /// A missing file is [`EngineError::SaveNotFound`]; a file that exists
    /// but cannot be decoded is [`EngineError::SaveCorrupt`]. The RNG is
    /// reseeded from `seed`; the world state itself comes entirely from the
    /// save document.
    pub fn load_game(path: &Path, seed: u64) -> EngineResult<Self> {
        let json = match fs::read_to_string(path) {
            Ok(json) => json,
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                return Err(EngineError::SaveNotFound {
                    path: path.to_path_buf(),
                });
            }
            Err(error) => return Err(error.into()),
        };

        let mut document: SaveGame =
            serde_json::from_str(&json).map_err(|source| EngineError::SaveCorrupt {
                path: path.to_path_buf(),
                source,
            })?;

        document.player.restore_owners();
        for floor in document.dungeon.values_mut() {
            for entity in &mut floor.entities {
                entity.restore_owners();
            }
        }

        let mut engine = TurnEngine {
            player: document.player,
            levels: document.dungeon,
            depth: document.current_level,
            state: document.game_state,
            previous_state: GameState::PlayerTurn,
            log: document.message_log,
            rng: StdRng::seed_from_u64(seed),
            nav: Box::new(GridNav),
            config: LayoutConfig::default(),
            targeting_item: None,
            visible: Vec::new(),
        };
        engine.refresh_fov();
        tracing::info!(path = %path.display(), depth = engine.depth, "game loaded");
        Ok(engine)
    }
}
