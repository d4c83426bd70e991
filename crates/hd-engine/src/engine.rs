use std::collections::BTreeMap;

use rand::SeedableRng;
use rand::rngs::StdRng;

use hd_core::combat::{self, Combat, CombatEvent};
use hd_core::entity::{Entity, EntityId, EntityKind, palette};
use hd_core::equipment::{EquipChange, Equipment, Equippable, Slot};
use hd_core::inventory::Inventory;
use hd_core::item::ItemEffect;
use hd_core::level::Level;
use hd_core::map::GameMap;
use hd_core::message::{Message, MessageLog};
use hd_dungeon::{Catalog, LayoutConfig, build_floor};

use crate::ai::{self, AiAction};
use crate::effects::{self, EffectCx, UseOutcome};
use crate::intent::{Intent, LevelUpChoice};
use crate::nav::{GridNav, Nav};
use crate::state::GameState;

const FOV_RADIUS: i32 = 10;
const LOG_WIDTH: usize = 60;
const LOG_HEIGHT: usize = 9;
const INVENTORY_CAPACITY: usize = 26;
const MISSING_FLOOR: &str = "the current depth always has a generated floor";

/// The turn engine: consumes one [`Intent`] per tick and resolves the whole
/// cascade it triggers (movement, combat, deaths, leveling, buff expiry,
/// item effects, floor transitions).
///
/// The player entity lives here, outside any floor's entity list, so combat
/// between the player and a monster borrows two disjoint places.
#[derive(Debug)]
pub struct TurnEngine {
    pub(crate) player: Entity,
    pub(crate) levels: BTreeMap<u32, GameMap>,
    pub(crate) depth: u32,
    pub(crate) state: GameState,
    pub(crate) previous_state: GameState,
    pub(crate) log: MessageLog,
    pub(crate) rng: StdRng,
    pub(crate) nav: Box<dyn Nav>,
    pub(crate) config: LayoutConfig,
    pub(crate) targeting_item: Option<usize>,
    pub(crate) visible: Vec<bool>,
}

impl TurnEngine {
    /// Start a new game with the default layout configuration.
    pub fn new_game(seed: u64) -> Self {
        Self::with_config(LayoutConfig::default(), seed)
    }

    /// Start a new game with an explicit layout configuration.
    pub fn with_config(config: LayoutConfig, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut player = Self::new_player();
        let first_floor = build_floor(&config, 1, &mut rng, Catalog::global());
        player.x = first_floor.entry.0;
        player.y = first_floor.entry.1;

        let mut levels = BTreeMap::new();
        levels.insert(1, first_floor);

        let mut engine = Self {
            player,
            levels,
            depth: 1,
            state: GameState::PlayerTurn,
            previous_state: GameState::PlayerTurn,
            log: MessageLog::new(LOG_WIDTH, LOG_HEIGHT),
            rng,
            nav: Box::new(GridNav),
            config,
            targeting_item: None,
            visible: Vec::new(),
        };
        engine.log.add(Message::colored(
            "You descend into the Hollowdeep. Good luck, adventurer.",
            palette::LIGHT_VIOLET,
        ));
        engine.refresh_fov();
        tracing::info!(seed, "new game started");
        engine
    }

    /// The player, already wielding a dagger before the first turn.
    fn new_player() -> Entity {
        let mut player = Entity::new(EntityKind::Player, "Player", 0, 0, '@')
            .with_combat(Combat::new(100, 1, 2, 0))
            .with_inventory(Inventory::new(INVENTORY_CAPACITY))
            .with_level(Level::new())
            .with_equipment(Equipment::default());

        let dagger = Entity::new(EntityKind::Item, "Dagger", 0, 0, '-')
            .with_fg(palette::SKY)
            .with_equippable(Equippable::new(Slot::MainHand, 2, 0, 0));
        let dagger_id = dagger.id;
        if let Some(inventory) = player.inventory.as_mut() {
            let _ = inventory.try_add(dagger);
        }
        if let Some(equipment) = player.equipment.as_mut() {
            equipment.toggle(dagger_id, Slot::MainHand);
        }
        player
    }

    // -----------------------------------------------------------------------
    // Read access for front ends
    // -----------------------------------------------------------------------

    /// The player entity.
    pub fn player(&self) -> &Entity {
        &self.player
    }

    /// The current engine state.
    pub fn state(&self) -> GameState {
        self.state
    }

    /// The current dungeon depth, 1-based.
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// The message log.
    pub fn log(&self) -> &MessageLog {
        &self.log
    }

    /// The floor the player is on.
    pub fn map(&self) -> &GameMap {
        self.levels.get(&self.depth).expect(MISSING_FLOOR)
    }

    /// Whether the player currently sees the given tile.
    pub fn is_visible(&self, x: i32, y: i32) -> bool {
        let map = self.map();
        map.in_bounds(x, y)
            && self
                .visible
                .get(usize::try_from(y * map.width + x).unwrap_or(usize::MAX))
                .copied()
                .unwrap_or(false)
    }

    // -----------------------------------------------------------------------
    // The tick
    // -----------------------------------------------------------------------

    /// Consume one intent and resolve everything it triggers, including the
    /// enemy phase when the player's action ends their turn.
    pub fn tick(&mut self, intent: Intent) {
        tracing::debug!(state = ?self.state, ?intent, "tick");
        match self.state {
            GameState::PlayerTurn => self.player_turn(intent),
            GameState::PlayerDead => self.dead_turn(intent),
            GameState::ShowInventory | GameState::DropInventory => self.inventory_turn(intent),
            GameState::Targeting => self.targeting_turn(intent),
            GameState::LevelUp => self.level_up_turn(intent),
            GameState::CharacterScreen | GameState::MessageBox => self.modal_turn(intent),
            GameState::EnemyTurn => {}
        }

        if self.state == GameState::EnemyTurn {
            self.enemy_phase();
            if self.state == GameState::EnemyTurn {
                self.state = GameState::PlayerTurn;
            }
        }
    }

    fn player_turn(&mut self, intent: Intent) {
        match intent {
            Intent::Move { dx, dy } => self.player_move(dx.clamp(-1, 1), dy.clamp(-1, 1)),
            Intent::Wait => self.end_player_turn(),
            Intent::Pickup => self.pickup(),
            Intent::TakeStairs => self.take_stairs(),
            Intent::OpenInventory => self.open_modal(GameState::ShowInventory),
            Intent::OpenDropMenu => self.open_modal(GameState::DropInventory),
            Intent::OpenCharacterScreen => self.open_modal(GameState::CharacterScreen),
            Intent::SelectItem(_)
            | Intent::LevelUp(_)
            | Intent::Click { .. }
            | Intent::Cancel => {}
        }
    }

    fn dead_turn(&mut self, intent: Intent) {
        match intent {
            Intent::OpenInventory => self.open_modal(GameState::ShowInventory),
            Intent::OpenCharacterScreen => self.open_modal(GameState::CharacterScreen),
            _ => {}
        }
    }

    fn inventory_turn(&mut self, intent: Intent) {
        match intent {
            Intent::SelectItem(index) => {
                if self.previous_state == GameState::PlayerDead {
                    return;
                }
                let count = self.player.inventory.as_ref().map_or(0, Inventory::len);
                if index >= count {
                    self.log.add(Message::colored(
                        "There is no item in that slot.",
                        palette::YELLOW,
                    ));
                    return;
                }
                if self.state == GameState::ShowInventory {
                    self.use_item(index);
                } else {
                    self.drop_item(index);
                }
            }
            Intent::Cancel => self.state = self.previous_state,
            _ => {}
        }
    }

    fn targeting_turn(&mut self, intent: Intent) {
        match intent {
            Intent::Click { x, y } => {
                let Some(index) = self.targeting_item else {
                    return;
                };
                let effect = self
                    .player
                    .inventory
                    .as_ref()
                    .and_then(|inv| inv.items.get(index))
                    .and_then(|entity| entity.item.as_ref())
                    .and_then(|item| item.effect);
                if let Some(effect) = effect {
                    self.apply_item(index, effect, Some((x, y)));
                }
            }
            Intent::Cancel => {
                self.state = self.previous_state;
                self.targeting_item = None;
                self.log.add(Message::new("Targeting cancelled."));
            }
            _ => {}
        }
    }

    fn level_up_turn(&mut self, intent: Intent) {
        let Intent::LevelUp(choice) = intent else {
            return;
        };
        if let Some(combat) = self.player.combat.as_mut() {
            match choice {
                LevelUpChoice::Hp => {
                    combat.base_max_hp += 20;
                    combat.hp += 20;
                }
                LevelUpChoice::Strength => combat.base_power += 1,
                LevelUpChoice::Defense => combat.base_defense += 1,
            }
        }
        self.state = self.previous_state;
    }

    fn modal_turn(&mut self, intent: Intent) {
        if intent == Intent::Cancel {
            self.state = self.previous_state;
        }
    }

    fn open_modal(&mut self, state: GameState) {
        self.previous_state = self.state;
        self.state = state;
    }

    // -----------------------------------------------------------------------
    // Player actions
    // -----------------------------------------------------------------------

    fn player_move(&mut self, dx: i32, dy: i32) {
        let (nx, ny) = (self.player.x + dx, self.player.y + dy);
        let (walkable, blocker) = {
            let map = self.map();
            (map.is_walkable(nx, ny), map.blocking_entity_at(nx, ny))
        };
        if !walkable {
            // Bumping a wall costs nothing.
            return;
        }

        if let Some(index) = blocker {
            let map = self.levels.get_mut(&self.depth).expect(MISSING_FLOOR);
            let target = &mut map.entities[index];
            let events = combat::attack(&self.player, target);
            self.end_player_turn();
            self.process_events(events);
        } else {
            self.player.x = nx;
            self.player.y = ny;
            self.refresh_fov();
            self.end_player_turn();
        }
    }

    fn pickup(&mut self) {
        let map = self.levels.get_mut(&self.depth).expect(MISSING_FLOOR);
        let Some(index) = map.item_at(self.player.x, self.player.y) else {
            self.log.add(Message::colored(
                "There is nothing here to pick up.",
                palette::YELLOW,
            ));
            return;
        };
        let Some(inventory) = self.player.inventory.as_mut() else {
            return;
        };
        if inventory.is_full() {
            self.log.add(Message::colored(
                "You cannot carry any more, your inventory is full.",
                palette::YELLOW,
            ));
            return;
        }

        let item = map.entities.remove(index);
        self.log.add(Message::colored(
            format!("You pick up the {}!", item.name),
            palette::LIGHT_BLUE,
        ));
        let _ = inventory.try_add(item);
        self.end_player_turn();
    }

    fn use_item(&mut self, index: usize) {
        let Some(inventory) = self.player.inventory.as_ref() else {
            return;
        };
        let entity = &inventory.items[index];
        let name = entity.name.clone();
        let id = entity.id;
        let slot = entity.equippable.as_ref().map(|e| e.slot);
        let effect = entity.item.as_ref().and_then(|item| item.effect);
        let targeting_message = entity
            .item
            .as_ref()
            .and_then(|item| item.targeting_message.clone());

        let Some(effect) = effect else {
            if let Some(slot) = slot {
                self.toggle_equip(id, slot);
                self.end_player_turn();
            } else {
                self.log.add(Message::colored(
                    format!("The {name} cannot be used."),
                    palette::YELLOW,
                ));
            }
            return;
        };

        if effect.needs_target() {
            self.previous_state = GameState::PlayerTurn;
            self.state = GameState::Targeting;
            self.targeting_item = Some(index);
            self.log.add(targeting_message.unwrap_or_else(|| {
                Message::colored(format!("Select a target for the {name}."), palette::LIGHT_CYAN)
            }));
            return;
        }

        self.apply_item(index, effect, None);
    }

    fn apply_item(&mut self, index: usize, effect: ItemEffect, target: Option<(i32, i32)>) {
        let map = self.levels.get_mut(&self.depth).expect(MISSING_FLOOR);
        let (outcome, events) = effects::apply(
            effect,
            target,
            EffectCx {
                player: &mut self.player,
                map,
                visible: &self.visible,
            },
        );

        if outcome == UseOutcome::Consumed {
            if let Some(inventory) = self.player.inventory.as_mut() {
                inventory.remove(index);
            }
            self.targeting_item = None;
            self.end_player_turn();
        }
        self.process_events(events);
    }

    fn toggle_equip(&mut self, id: EntityId, slot: Slot) {
        let Some(equipment) = self.player.equipment.as_mut() else {
            return;
        };
        let changes = equipment.toggle(id, slot);
        for change in changes {
            let (verb, item_id) = match change {
                EquipChange::Equipped(item_id) => ("equipped", item_id),
                EquipChange::Dequipped(item_id) => ("dequipped", item_id),
            };
            let name = self
                .player
                .inventory
                .as_ref()
                .and_then(|inv| inv.find(item_id))
                .map_or_else(|| "item".to_owned(), |e| e.name.clone());
            self.log.add(Message::new(format!("You {verb} the {name}.")));
        }
    }

    fn drop_item(&mut self, index: usize) {
        let Some(inventory) = self.player.inventory.as_mut() else {
            return;
        };
        let mut item = inventory.remove(index);

        if let (Some(equipment), Some(equippable)) =
            (self.player.equipment.as_mut(), item.equippable.as_ref())
            && equipment.is_equipped(item.id)
        {
            equipment.toggle(item.id, equippable.slot);
        }

        item.x = self.player.x;
        item.y = self.player.y;
        self.log.add(Message::colored(
            format!("You dropped the {}.", item.name),
            palette::YELLOW,
        ));
        self.levels
            .get_mut(&self.depth)
            .expect(MISSING_FLOOR)
            .entities
            .push(item);
        self.end_player_turn();
    }

    fn take_stairs(&mut self) {
        let map = self.map();
        let direction = map
            .stairs_at(self.player.x, self.player.y)
            .and_then(|index| map.entities[index].stairs.as_ref())
            .map(|stairs| stairs.direction);

        match direction {
            Some(hd_core::stairs::StairDirection::Down) => self.descend(),
            Some(hd_core::stairs::StairDirection::Up) => self.ascend(),
            None => self.log.add(Message::colored(
                "There are no stairs here.",
                palette::YELLOW,
            )),
        }
    }

    /// Move one floor down, generating it on first visit.
    ///
    /// First-time generation also grants the rest bonus: half the player's
    /// maximum hit points. Revisits reuse the cached floor untouched.
    fn descend(&mut self) {
        self.depth += 1;
        if !self.levels.contains_key(&self.depth) {
            let floor = build_floor(&self.config, self.depth, &mut self.rng, Catalog::global());
            self.levels.insert(self.depth, floor);
            let amount = self.player.max_hp() / 2;
            combat::heal(&mut self.player, amount);
            self.log.add(Message::colored(
                "You take a moment to rest, and recover your strength.",
                palette::LIGHT_VIOLET,
            ));
            tracing::info!(depth = self.depth, "generated new floor");
        }
        let entry = self.map().entry;
        self.player.x = entry.0;
        self.player.y = entry.1;
        self.refresh_fov();
    }

    /// Move one floor up. Upstairs only exist below depth 1, so the target
    /// floor is always cached; the player lands at its recorded exit.
    fn ascend(&mut self) {
        self.depth -= 1;
        let exit = self.map().exit;
        self.player.x = exit.0;
        self.player.y = exit.1;
        self.refresh_fov();
    }

    // -----------------------------------------------------------------------
    // Turn bookkeeping
    // -----------------------------------------------------------------------

    /// Tick the player's buffs and hand over to the enemy phase.
    fn end_player_turn(&mut self) {
        for expiry in self.player.tick_buffs() {
            self.log.add(expiry);
        }
        self.state = GameState::EnemyTurn;
    }

    fn process_events(&mut self, events: Vec<CombatEvent>) {
        for event in events {
            match event {
                CombatEvent::Message(message) => self.log.add(message),
                CombatEvent::Death { victim, xp } => self.handle_death(victim, xp),
            }
        }
    }

    fn handle_death(&mut self, victim: EntityId, xp: i32) {
        if victim == self.player.id {
            let message = combat::kill_player(&mut self.player);
            self.log.add(message);
            self.state = GameState::PlayerDead;
            tracing::info!("player died");
            return;
        }

        let map = self.levels.get_mut(&self.depth).expect(MISSING_FLOOR);
        if let Some(index) = map.entity_index(victim) {
            let message = combat::kill_monster(&mut map.entities[index]);
            self.log.add(message);
        }
        self.award_xp(xp);
    }

    fn award_xp(&mut self, xp: i32) {
        let Some(level) = self.player.level.as_mut() else {
            return;
        };
        self.log.add(Message::colored(
            format!("You gain {xp} experience points."),
            palette::YELLOW,
        ));
        if level.add_xp(xp) {
            let reached = level.current_level;
            self.log.add(Message::colored(
                format!("Your battle skills grow stronger! You reached level {reached}!"),
                palette::YELLOW,
            ));
            // Two level-ups in one action share a single modal; never record
            // the modal itself as the state to return to.
            if self.state != GameState::LevelUp {
                self.previous_state = self.state;
            }
            self.state = GameState::LevelUp;
        }
    }

    // -----------------------------------------------------------------------
    // Enemy phase
    // -----------------------------------------------------------------------

    /// Let every monster act, in registration order. A player death aborts
    /// the remaining iteration immediately.
    fn enemy_phase(&mut self) {
        let ids: Vec<EntityId> = self
            .map()
            .entities
            .iter()
            .filter(|e| e.ai.is_some())
            .map(|e| e.id)
            .collect();

        for id in ids {
            self.take_enemy_turn(id);
            if self.state != GameState::EnemyTurn {
                break;
            }
        }
    }

    fn take_enemy_turn(&mut self, id: EntityId) {
        let plan = {
            let map = self.levels.get(&self.depth).expect(MISSING_FLOOR);
            let Some(index) = map.entity_index(id) else {
                return;
            };
            let monster = &map.entities[index];
            let Some(current_ai) = monster.ai.clone() else {
                return;
            };
            ai::plan(
                monster,
                current_ai,
                &self.player,
                map,
                &self.visible,
                self.nav.as_ref(),
                &mut self.rng,
            )
        };

        for message in plan.messages {
            self.log.add(message);
        }

        let map = self.levels.get_mut(&self.depth).expect(MISSING_FLOOR);
        let Some(index) = map.entity_index(id) else {
            return;
        };
        let monster = &mut map.entities[index];
        monster.ai = Some(plan.next_ai);
        let events = match plan.action {
            AiAction::None => Vec::new(),
            AiAction::Move(x, y) => {
                monster.x = x;
                monster.y = y;
                Vec::new()
            }
            AiAction::Attack => combat::attack(monster, &mut self.player),
        };
        self.process_events(events);
    }

    // -----------------------------------------------------------------------
    // Visibility
    // -----------------------------------------------------------------------

    /// Recompute the player's field of view and mark what it covers as
    /// explored.
    pub(crate) fn refresh_fov(&mut self) {
        let map = self.levels.get(&self.depth).expect(MISSING_FLOOR);
        self.visible = self
            .nav
            .fov(map, (self.player.x, self.player.y), FOV_RADIUS);

        let map = self.levels.get_mut(&self.depth).expect(MISSING_FLOOR);
        for y in 0..map.height {
            for x in 0..map.width {
                if self
                    .visible
                    .get(usize::try_from(y * map.width + x).unwrap_or(usize::MAX))
                    .copied()
                    .unwrap_or(false)
                {
                    map.mark_explored(x, y);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hd_core::ai::Ai;
    use hd_core::buff::{Buff, BuffKind};
    use hd_core::item::Item;
    use hd_core::stairs::Stairs;

    /// An engine whose first floor is a clean 20x20 arena with no monsters.
    fn arena_engine() -> TurnEngine {
        let config = LayoutConfig::default()
            .with_max_rooms(20)
            .with_room_size(4, 8)
            .with_map_size(40, 40);
        let mut engine = TurnEngine::with_config(config, 7);

        let mut map = GameMap::new(20, 20, 1);
        for y in 1..19 {
            for x in 1..19 {
                map.carve(x, y);
            }
        }
        map.entry = (5, 5);
        map.exit = (15, 15);
        engine.levels.clear();
        engine.levels.insert(1, map);
        engine.depth = 1;
        engine.player.x = 5;
        engine.player.y = 5;
        engine.state = GameState::PlayerTurn;
        engine.refresh_fov();
        engine
    }

    fn orc(x: i32, y: i32) -> Entity {
        Catalog::global().monster("orc").unwrap().spawn(x, y)
    }

    fn last_text(engine: &TurnEngine) -> &str {
        &engine.log.messages().last().unwrap().text
    }

    #[test]
    fn new_game_starts_with_an_equipped_dagger() {
        let engine = TurnEngine::new_game(1);
        let player = engine.player();

        assert_eq!(engine.state(), GameState::PlayerTurn);
        assert_eq!(player.power(), 4, "base 2 plus dagger +2");
        assert_eq!(player.max_hp(), 100);
        assert_eq!(player.inventory.as_ref().unwrap().len(), 1);
        assert!(player.equipment.as_ref().unwrap().main_hand.is_some());
        assert_eq!((player.x, player.y), engine.map().entry);
    }

    #[test]
    fn bumping_a_wall_costs_no_turn() {
        let mut engine = arena_engine();
        engine.player.add_buff(Buff::new(BuffKind::Power, 3, 1));
        engine.player.x = 1;
        engine.player.y = 1;

        engine.tick(Intent::Move { dx: -1, dy: 0 });

        assert_eq!(engine.state(), GameState::PlayerTurn);
        assert_eq!(engine.player().buffs.len(), 1, "buffs did not tick");
    }

    #[test]
    fn moving_steps_and_returns_to_player_turn() {
        let mut engine = arena_engine();
        engine.tick(Intent::Move { dx: 1, dy: 0 });
        assert_eq!((engine.player().x, engine.player().y), (6, 5));
        assert_eq!(engine.state(), GameState::PlayerTurn);
    }

    #[test]
    fn moving_into_a_monster_attacks_and_it_hits_back() {
        let mut engine = arena_engine();
        engine
            .levels
            .get_mut(&1)
            .unwrap()
            .entities
            .push(orc(6, 5));

        engine.tick(Intent::Move { dx: 1, dy: 0 });

        let map = engine.map();
        assert_eq!(map.entities[0].combat.as_ref().unwrap().hp, 16);
        assert_eq!((engine.player().x, engine.player().y), (5, 5));
        // The orc answered during the enemy phase: power 4 vs defense 1.
        assert_eq!(engine.player().combat.as_ref().unwrap().hp, 97);
    }

    #[test]
    fn wait_ticks_buffs() {
        let mut engine = arena_engine();
        engine.player.add_buff(Buff::new(BuffKind::Power, 3, 1));
        assert_eq!(engine.player().power(), 7);

        engine.tick(Intent::Wait);

        assert!(engine.player().buffs.is_empty());
        assert_eq!(engine.player().power(), 4);
    }

    #[test]
    fn pickup_with_nothing_underfoot_costs_no_turn() {
        let mut engine = arena_engine();
        engine.player.add_buff(Buff::new(BuffKind::Power, 3, 1));

        engine.tick(Intent::Pickup);

        assert!(last_text(&engine).contains("nothing here"));
        assert_eq!(engine.player().buffs.len(), 1);
        assert_eq!(engine.state(), GameState::PlayerTurn);
    }

    #[test]
    fn pickup_moves_the_item_into_the_inventory_and_ends_the_turn() {
        let mut engine = arena_engine();
        let potion = Catalog::global().item("healing_potion").unwrap().spawn(5, 5);
        engine.levels.get_mut(&1).unwrap().entities.push(potion);
        engine.player.add_buff(Buff::new(BuffKind::Power, 3, 1));

        engine.tick(Intent::Pickup);

        assert_eq!(engine.player().inventory.as_ref().unwrap().len(), 2);
        assert!(engine.map().item_at(5, 5).is_none());
        assert!(engine.player().buffs.is_empty(), "the pickup took a turn");
    }

    #[test]
    fn pickup_at_capacity_fails_without_a_turn() {
        let mut engine = arena_engine();
        engine.player.inventory.as_mut().unwrap().capacity = 1;
        let potion = Catalog::global().item("healing_potion").unwrap().spawn(5, 5);
        engine.levels.get_mut(&1).unwrap().entities.push(potion);

        engine.tick(Intent::Pickup);

        assert!(last_text(&engine).contains("inventory is full"));
        assert!(engine.map().item_at(5, 5).is_some(), "item stays on the floor");
        assert_eq!(engine.state(), GameState::PlayerTurn);
    }

    #[test]
    fn using_a_potion_heals_and_consumes_it() {
        let mut engine = arena_engine();
        let potion = Catalog::global().item("healing_potion").unwrap().spawn(0, 0);
        engine
            .player
            .inventory
            .as_mut()
            .unwrap()
            .try_add(potion)
            .unwrap();
        engine.player.combat.as_mut().unwrap().hp = 50;

        engine.tick(Intent::OpenInventory);
        engine.tick(Intent::SelectItem(1));

        assert_eq!(engine.player().combat.as_ref().unwrap().hp, 90);
        assert_eq!(engine.player().inventory.as_ref().unwrap().len(), 1);
        assert_eq!(engine.state(), GameState::PlayerTurn);
    }

    #[test]
    fn potion_at_full_health_stays_in_the_inventory() {
        let mut engine = arena_engine();
        let potion = Catalog::global().item("healing_potion").unwrap().spawn(0, 0);
        engine
            .player
            .inventory
            .as_mut()
            .unwrap()
            .try_add(potion)
            .unwrap();

        engine.tick(Intent::OpenInventory);
        engine.tick(Intent::SelectItem(1));

        assert_eq!(engine.player().inventory.as_ref().unwrap().len(), 2);
        assert_eq!(engine.state(), GameState::ShowInventory);
        assert!(last_text(&engine).contains("full health"));
    }

    #[test]
    fn out_of_range_index_logs_and_changes_nothing() {
        let mut engine = arena_engine();
        engine.tick(Intent::OpenInventory);
        engine.tick(Intent::SelectItem(99));
        assert!(last_text(&engine).contains("no item in that slot"));
        assert_eq!(engine.state(), GameState::ShowInventory);
    }

    #[test]
    fn confusion_scroll_goes_through_targeting() {
        let mut engine = arena_engine();
        engine.levels.get_mut(&1).unwrap().entities.push(orc(7, 5));
        let scroll = Catalog::global()
            .item("confusion_scroll")
            .unwrap()
            .spawn(0, 0);
        engine
            .player
            .inventory
            .as_mut()
            .unwrap()
            .try_add(scroll)
            .unwrap();

        engine.tick(Intent::OpenInventory);
        engine.tick(Intent::SelectItem(1));
        assert_eq!(engine.state(), GameState::Targeting);

        engine.tick(Intent::Click { x: 7, y: 5 });

        let victim = &engine.map().entities[0];
        assert!(matches!(victim.ai, Some(Ai::Confused { .. })));
        assert_eq!(engine.player().inventory.as_ref().unwrap().len(), 1);
    }

    #[test]
    fn cancelling_targeting_keeps_the_scroll() {
        let mut engine = arena_engine();
        let scroll = Catalog::global()
            .item("fireball_scroll")
            .unwrap()
            .spawn(0, 0);
        engine
            .player
            .inventory
            .as_mut()
            .unwrap()
            .try_add(scroll)
            .unwrap();

        engine.tick(Intent::OpenInventory);
        engine.tick(Intent::SelectItem(1));
        engine.tick(Intent::Cancel);

        assert_eq!(engine.state(), GameState::PlayerTurn);
        assert_eq!(engine.player().inventory.as_ref().unwrap().len(), 2);
        assert!(last_text(&engine).contains("Targeting cancelled"));
    }

    #[test]
    fn using_equipment_toggles_it_and_ends_the_turn() {
        let mut engine = arena_engine();

        // The dagger from character creation sits at index 0, equipped.
        engine.tick(Intent::OpenInventory);
        engine.tick(Intent::SelectItem(0));

        assert!(engine.player().equipment.as_ref().unwrap().main_hand.is_none());
        assert_eq!(engine.player().power(), 2);
        assert_eq!(engine.state(), GameState::PlayerTurn);
    }

    #[test]
    fn dropping_an_equipped_item_unequips_it_first() {
        let mut engine = arena_engine();

        engine.tick(Intent::OpenDropMenu);
        engine.tick(Intent::SelectItem(0));

        let player = engine.player();
        assert!(player.equipment.as_ref().unwrap().main_hand.is_none());
        assert!(player.inventory.as_ref().unwrap().is_empty());
        let map = engine.map();
        let index = map.item_at(5, 5).unwrap();
        assert_eq!(map.entities[index].name, "Dagger");
    }

    #[test]
    fn stairs_descend_generates_heals_and_relocates() {
        let mut engine = arena_engine();
        engine.player.combat.as_mut().unwrap().hp = 40;
        engine
            .levels
            .get_mut(&1)
            .unwrap()
            .entities
            .push(Entity::new(EntityKind::Stairs, "Stairs", 5, 5, '>').with_stairs(Stairs::down()));

        engine.tick(Intent::TakeStairs);

        assert_eq!(engine.depth(), 2);
        assert_eq!(engine.player().combat.as_ref().unwrap().hp, 90);
        assert_eq!((engine.player().x, engine.player().y), engine.map().entry);
        assert_eq!(engine.state(), GameState::PlayerTurn);
    }

    #[test]
    fn ascending_returns_to_the_previous_floor_exit() {
        let mut engine = arena_engine();
        engine
            .levels
            .get_mut(&1)
            .unwrap()
            .entities
            .push(Entity::new(EntityKind::Stairs, "Stairs", 5, 5, '>').with_stairs(Stairs::down()));

        engine.tick(Intent::TakeStairs);
        assert_eq!(engine.depth(), 2);
        // The generated floor puts upstairs at its entry, where we stand.
        engine.tick(Intent::TakeStairs);

        assert_eq!(engine.depth(), 1);
        assert_eq!((engine.player().x, engine.player().y), (15, 15));
    }

    #[test]
    fn descending_twice_reuses_the_cached_floor() {
        let mut engine = arena_engine();
        engine
            .levels
            .get_mut(&1)
            .unwrap()
            .entities
            .push(Entity::new(EntityKind::Stairs, "Stairs", 5, 5, '>').with_stairs(Stairs::down()));

        engine.tick(Intent::TakeStairs);
        let names: Vec<String> = engine.map().entities.iter().map(|e| e.name.clone()).collect();
        engine.tick(Intent::TakeStairs); // back up via the entry upstairs
        engine.player.x = 15;
        engine.player.y = 15;
        engine
            .levels
            .get_mut(&1)
            .unwrap()
            .entities
            .push(Entity::new(EntityKind::Stairs, "Stairs", 15, 15, '>').with_stairs(Stairs::down()));
        engine.tick(Intent::TakeStairs);

        let revisited: Vec<String> = engine.map().entities.iter().map(|e| e.name.clone()).collect();
        assert_eq!(names, revisited);
    }

    #[test]
    fn no_stairs_underfoot_logs_a_notice() {
        let mut engine = arena_engine();
        engine.tick(Intent::TakeStairs);
        assert!(last_text(&engine).contains("no stairs here"));
        assert_eq!(engine.depth(), 1);
    }

    #[test]
    fn killing_a_monster_awards_xp_and_can_level_up() {
        let mut engine = arena_engine();
        let mut weakling = orc(6, 5);
        weakling.combat.as_mut().unwrap().hp = 1;
        weakling.combat.as_mut().unwrap().xp = 400;
        engine.levels.get_mut(&1).unwrap().entities.push(weakling);

        engine.tick(Intent::Move { dx: 1, dy: 0 });

        assert_eq!(engine.state(), GameState::LevelUp);
        let corpse = &engine.map().entities[0];
        assert_eq!(corpse.kind, EntityKind::Corpse);
        assert!(!corpse.blocks);
        assert_eq!(engine.player().level.as_ref().unwrap().current_level, 2);
        assert_eq!(engine.player().level.as_ref().unwrap().current_xp, 50);

        engine.tick(Intent::LevelUp(LevelUpChoice::Hp));

        assert_eq!(engine.player().max_hp(), 120);
        assert_eq!(engine.player().combat.as_ref().unwrap().hp, 120);
        assert_eq!(engine.state(), GameState::PlayerTurn);
    }

    #[test]
    fn a_monster_can_kill_the_player() {
        let mut engine = arena_engine();
        engine.player.combat.as_mut().unwrap().hp = 1;
        engine.levels.get_mut(&1).unwrap().entities.push(orc(6, 5));

        engine.tick(Intent::Wait);

        assert_eq!(engine.state(), GameState::PlayerDead);
        assert!(engine
            .log
            .messages()
            .iter()
            .any(|m| m.text.contains("You died!")));
    }

    #[test]
    fn dead_players_can_browse_but_not_use_the_inventory() {
        let mut engine = arena_engine();
        engine.player.combat.as_mut().unwrap().hp = 1;
        engine.levels.get_mut(&1).unwrap().entities.push(orc(6, 5));
        engine.tick(Intent::Wait);
        assert_eq!(engine.state(), GameState::PlayerDead);

        engine.tick(Intent::OpenInventory);
        assert_eq!(engine.state(), GameState::ShowInventory);
        engine.tick(Intent::SelectItem(0));
        // The dagger is still equipped; selection was ignored.
        assert!(engine.player().equipment.as_ref().unwrap().main_hand.is_some());
        engine.tick(Intent::Cancel);
        assert_eq!(engine.state(), GameState::PlayerDead);
    }

    #[test]
    fn character_screen_restores_the_previous_state() {
        let mut engine = arena_engine();
        engine.tick(Intent::OpenCharacterScreen);
        assert_eq!(engine.state(), GameState::CharacterScreen);
        engine.tick(Intent::Cancel);
        assert_eq!(engine.state(), GameState::PlayerTurn);
    }

    #[test]
    fn cannot_be_used_items_do_not_cost_a_turn() {
        let mut engine = arena_engine();
        let rock = Entity::new(EntityKind::Item, "Rock", 0, 0, '*').with_item(Item::passive());
        engine
            .player
            .inventory
            .as_mut()
            .unwrap()
            .try_add(rock)
            .unwrap();

        engine.tick(Intent::OpenInventory);
        engine.tick(Intent::SelectItem(1));

        assert!(last_text(&engine).contains("cannot be used"));
        assert_eq!(engine.state(), GameState::ShowInventory);
        assert_eq!(engine.player().inventory.as_ref().unwrap().len(), 2);
    }
}
