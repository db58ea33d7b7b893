//! Plain-text session output.

use console::style;
use delver_core::state::{EntityKind, Named};
use delver_core::{EnemyKind, GameState, InputState, Position};

pub fn summary(state: &GameState, keys: u32) {
    println!("{}", style("Session Summary").bold().cyan());
    println!("{}", style("─".repeat(60)).dim());

    let outcome = match state.input() {
        InputState::Victory => style("victory").green().bold(),
        InputState::Defeat => style("defeat").red().bold(),
        _ => style("in progress").yellow(),
    };
    println!("  {:<12} {}", style("Seed:").bold(), state.seed);
    println!("  {:<12} {}", style("Outcome:").bold(), outcome);
    println!("  {:<12} {} ({} keys)", style("Turns:").bold(), state.turn.turn, keys);
    println!("  {:<12} {}", style("Level:").bold(), state.level());
    if let Some(stats) = state.player_stats() {
        println!(
            "  {:<12} {}/{} with a {}",
            style("Health:").bold(),
            stats.hp,
            stats.max_hp,
            stats.tool
        );
    }

    let pack = state.inventory().map(|inventory| inventory.labels()).unwrap_or_default();
    println!("  {:<12} {}", style("Pack:").bold(), join_or_empty(&pack));
    let stock = state.stockpile().map(|stockpile| stockpile.labels()).unwrap_or_default();
    println!("  {:<12} {}", style("Stockpile:").bold(), join_or_empty(&stock));
    println!("  {:<12} {}", style("Wallet:").bold(), state.balance());

    println!();
    println!("{}", style("Recent messages").bold());
    for line in state.log.lines() {
        println!("  {line}");
    }
}

/// Renders the level: the player, then indexed entities, then terrain.
pub fn dump(state: &GameState) {
    println!();
    println!("{}", style(format!("Level {}", state.level())).bold());
    let player = state.player_position();
    for (y, row) in state.map.to_ascii().into_iter().enumerate() {
        let line: String = row
            .chars()
            .enumerate()
            .map(|(x, terrain)| {
                let position = Position::new(x as i32, y as i32);
                if position == player {
                    '@'
                } else {
                    glyph_at(state, position).unwrap_or(terrain)
                }
            })
            .collect();
        println!("{line}");
    }
}

fn glyph_at(state: &GameState, position: Position) -> Option<char> {
    let id = *state.entities_at(position).first()?;
    let named = state.entities.get::<Named>(id)?;
    Some(match named.kind {
        EntityKind::Ladder => '>',
        EntityKind::Enemy(EnemyKind::Normal) => 'e',
        EntityKind::Enemy(EnemyKind::Elite) => 'E',
        EntityKind::Item(_) => '*',
    })
}

fn join_or_empty(labels: &[String]) -> String {
    if labels.is_empty() {
        "(empty)".to_string()
    } else {
        labels.join(", ")
    }
}
