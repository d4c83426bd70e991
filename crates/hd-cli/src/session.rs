//! The interactive session: text commands in, plain-text world out.

use std::io::{self, BufRead, Write};

use hd_core::entity::EntityKind;
use hd_core::map::GameMap;
use hd_engine::{EngineResult, GameState, Intent, LevelUpChoice, TurnEngine};

use crate::Args;

/// One parsed line of input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    /// Forward an intent to the engine.
    Intent(Intent),
    /// Use the inventory item at an index (opens and closes the menu).
    Use(usize),
    /// Drop the inventory item at an index.
    Drop(usize),
    /// Print the inventory.
    Inventory,
    /// Print everything currently visible.
    Look,
    /// Print the character sheet.
    Stats,
    /// Write the game to the configured save path.
    Save,
    /// Print the command list.
    Help,
    /// End the session.
    Quit,
}

/// Run the session loop until `quit` or end of input.
pub(crate) fn run(args: &Args) -> EngineResult<()> {
    let mut engine = match &args.load {
        Some(path) => TurnEngine::load_game(path, args.seed)?,
        None => TurnEngine::new_game(args.seed),
    };

    println!("Hollowdeep. Type 'help' for commands.");
    render(&engine);

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("> ");
        io::stdout().flush()?;
        let Some(line) = lines.next() else { break };
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        match parse(&line) {
            None => println!("unknown command; type 'help'"),
            Some(Command::Quit) => break,
            Some(Command::Help) => help(),
            Some(Command::Save) => {
                engine.save_game(&args.save_path)?;
                println!("saved to {}", args.save_path.display());
            }
            Some(Command::Inventory) => {
                engine.tick(Intent::OpenInventory);
                print_inventory(&engine);
                engine.tick(Intent::Cancel);
            }
            Some(Command::Stats) => {
                engine.tick(Intent::OpenCharacterScreen);
                print_stats(&engine);
                engine.tick(Intent::Cancel);
            }
            Some(Command::Look) => look(&engine),
            Some(Command::Use(index)) => {
                engine.tick(Intent::OpenInventory);
                engine.tick(Intent::SelectItem(index));
                if engine.state() == GameState::ShowInventory {
                    engine.tick(Intent::Cancel);
                }
                render(&engine);
            }
            Some(Command::Drop(index)) => {
                engine.tick(Intent::OpenDropMenu);
                engine.tick(Intent::SelectItem(index));
                if engine.state() == GameState::DropInventory {
                    engine.tick(Intent::Cancel);
                }
                render(&engine);
            }
            Some(Command::Intent(intent)) => {
                engine.tick(intent);
                render(&engine);
            }
        }
    }
    Ok(())
}

fn parse(line: &str) -> Option<Command> {
    let mut parts = line.split_whitespace();
    let head = parts.next()?;
    let command = match head {
        "move" | "m" => Command::Intent(Intent::Move {
            dx: parts.next()?.parse().ok()?,
            dy: parts.next()?.parse().ok()?,
        }),
        "wait" => Command::Intent(Intent::Wait),
        "pickup" | "get" => Command::Intent(Intent::Pickup),
        "stairs" => Command::Intent(Intent::TakeStairs),
        "use" => Command::Use(parts.next()?.parse().ok()?),
        "drop" => Command::Drop(parts.next()?.parse().ok()?),
        "click" => Command::Intent(Intent::Click {
            x: parts.next()?.parse().ok()?,
            y: parts.next()?.parse().ok()?,
        }),
        "cancel" => Command::Intent(Intent::Cancel),
        "levelup" => {
            let choice = match parts.next()? {
                "hp" => LevelUpChoice::Hp,
                "str" => LevelUpChoice::Strength,
                "def" => LevelUpChoice::Defense,
                _ => return None,
            };
            Command::Intent(Intent::LevelUp(choice))
        }
        "inv" | "i" => Command::Inventory,
        "look" => Command::Look,
        "stats" => Command::Stats,
        "save" => Command::Save,
        "help" => Command::Help,
        "quit" | "q" => Command::Quit,
        _ => return None,
    };
    if parts.next().is_some() {
        return None;
    }
    Some(command)
}

fn help() {
    println!("commands:");
    println!("  move <dx> <dy>   step or attack (offsets in -1..=1)");
    println!("  wait             pass the turn");
    println!("  pickup           pick up the item underfoot");
    println!("  inv              list carried items");
    println!("  use <index>      use or equip an inventory item");
    println!("  drop <index>     drop an inventory item");
    println!("  stairs           take the stairs underfoot");
    println!("  levelup <hp|str|def>  resolve a pending level-up");
    println!("  click <x> <y>    target a tile");
    println!("  cancel           leave targeting or a menu");
    println!("  look             list visible entities");
    println!("  stats            show the character sheet");
    println!("  save             write the game to disk");
    println!("  quit             end the session");
}

fn render(engine: &TurnEngine) {
    let map = engine.map();
    for y in 0..map.height {
        let mut row = String::with_capacity(usize::try_from(map.width).unwrap_or(0));
        for x in 0..map.width {
            row.push(glyph_at(engine, map, x, y));
        }
        println!("{row}");
    }

    for message in recent_messages(engine) {
        println!("| {message}");
    }
    print_status(engine);
}

fn glyph_at(engine: &TurnEngine, map: &GameMap, x: i32, y: i32) -> char {
    let tile_glyph = map.tile(x, y).map_or(' ', |t| t.glyph);
    if engine.is_visible(x, y) {
        let player = engine.player();
        if (player.x, player.y) == (x, y) {
            return player.glyph;
        }
        // Blocking entities draw over loot, loot over corpses.
        map.entities
            .iter()
            .filter(|e| (e.x, e.y) == (x, y))
            .max_by_key(|e| (e.blocks, e.kind != EntityKind::Corpse))
            .map_or(tile_glyph, |e| e.glyph)
    } else if map.tile(x, y).is_some_and(|t| t.explored) {
        tile_glyph
    } else {
        ' '
    }
}

fn recent_messages(engine: &TurnEngine) -> Vec<String> {
    engine
        .log()
        .messages()
        .iter()
        .rev()
        .take(4)
        .rev()
        .map(|m| m.text.clone())
        .collect()
}

fn print_status(engine: &TurnEngine) {
    let player = engine.player();
    let hp = player.combat.as_ref().map_or(0, |c| c.hp);
    let level = player.level.as_ref().map_or(1, |l| l.current_level);
    println!(
        "HP {}/{}  depth {}  level {}",
        hp,
        player.max_hp(),
        engine.depth(),
        level
    );

    match engine.state() {
        GameState::LevelUp => println!("level up! choose: levelup hp | levelup str | levelup def"),
        GameState::Targeting => println!("targeting: click <x> <y>, or cancel"),
        GameState::PlayerDead => println!("you are dead. inv, stats and quit still work."),
        _ => {}
    }
}

fn print_inventory(engine: &TurnEngine) {
    let Some(inventory) = engine.player().inventory.as_ref() else {
        return;
    };
    if inventory.is_empty() {
        println!("your inventory is empty");
        return;
    }
    let equipment = engine.player().equipment.as_ref();
    for (index, item) in inventory.items.iter().enumerate() {
        let marker = if equipment.is_some_and(|e| e.is_equipped(item.id)) {
            " (equipped)"
        } else {
            ""
        };
        println!("  {index}) {}{marker}", item.name);
    }
}

fn print_stats(engine: &TurnEngine) {
    let player = engine.player();
    let (hp, xp_line) = (
        player.combat.as_ref().map_or(0, |c| c.hp),
        player.level.as_ref().map_or_else(String::new, |l| {
            format!(
                "level {}  xp {}/{}",
                l.current_level,
                l.current_xp,
                l.experience_to_next_level()
            )
        }),
    );
    println!("{}", player.name);
    println!("  hp {}/{}", hp, player.max_hp());
    println!("  power {}  defense {}", player.power(), player.defense());
    if !xp_line.is_empty() {
        println!("  {xp_line}");
    }
}

fn look(engine: &TurnEngine) {
    let map = engine.map();
    let mut seen = false;
    for entity in &map.entities {
        if engine.is_visible(entity.x, entity.y) {
            println!("  {} at ({}, {})", entity.name, entity.x, entity.y);
            seen = true;
        }
    }
    if !seen {
        println!("nothing of note in sight");
    }
}
