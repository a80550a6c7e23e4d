use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;

use tutorly_lib::review::algorithm::format_interval;
use tutorly_lib::review::{load_states, save_states, Deck, Quality, ReviewSession};

use super::prompt;
use crate::app::App;
use crate::render::terminal::{paint, Color};

pub fn run(app: &App, deck_path: &Path, all: bool, use_color: bool) -> Result<()> {
    let raw = std::fs::read_to_string(deck_path)
        .with_context(|| format!("Failed to read {}", deck_path.display()))?;
    let deck: Deck = serde_json::from_str(&raw).context("Deck is not valid JSON")?;
    let name = if deck.name.is_empty() { deck.id.clone() } else { deck.name.clone() };

    let states = load_states(&app.store, &deck.id).context("Failed to load review progress")?;
    let mut session = if all {
        ReviewSession::new(deck, states)
    } else {
        ReviewSession::due(deck, states, Utc::now())
    };

    let (_, total) = session.progress();
    if total == 0 {
        println!("Nothing due in {}.", name);
        return Ok(());
    }
    println!("{}", paint(&format!("Reviewing {} ({} cards)", name, total), Color::BOLD, use_color));

    while let Some(card) = session.current() {
        let (position, total) = session.progress();
        println!("\n[{}/{}] {}", position, total, card.front);
        prompt("Press Enter to show the answer")?;

        let card = session.reveal()?;
        println!("{}", paint(&card.back, Color::YELLOW, use_color));

        let quality = read_quality()?;
        let record = session.rate(quality, Utc::now())?;
        println!(
            "{}",
            paint(&format!("Next review in {}", format_interval(record.interval)), Color::DIM, use_color)
        );

        // Saved per card so quitting midway keeps what was rated
        save_states(&app.store, session.deck_id(), session.states())
            .context("Failed to save review progress")?;
    }

    let summary = session.summary();
    println!(
        "\n{}",
        paint(
            &format!("Done: {} reviewed, {} correct", summary.reviewed, summary.correct),
            Color::GREEN,
            use_color
        )
    );
    Ok(())
}

fn read_quality() -> Result<Quality> {
    loop {
        let answer = prompt("How well did you recall it? 0 (forgot) - 5 (perfect)")?;
        match answer.trim().parse::<u8>().map(Quality::new) {
            Ok(Ok(quality)) => return Ok(quality),
            Ok(Err(e)) => eprintln!("{}", e),
            Err(_) => eprintln!("Enter a number from 0 to 5"),
        }
    }
}
