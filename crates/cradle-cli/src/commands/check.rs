//! Event file validation command

use std::fmt::{self, Write as _};
use std::path::Path;

use anyhow::{Context, Result};
use cradle_core::{Category, Event};

use super::load_event_file;

pub fn cmd_check(file: &Path) -> Result<()> {
    let events = load_event_file(file)?;
    print!("{}", render_check(file, &events)?);
    Ok(())
}

pub fn render_check(file: &Path, events: &[Event]) -> Result<String> {
    let mut out = String::new();
    write_check(&mut out, file, events).context("Failed to format summary")?;
    Ok(out)
}

fn write_check(out: &mut String, file: &Path, events: &[Event]) -> fmt::Result {
    writeln!(out, "✅ {} is valid", file.display())?;
    writeln!(out, "   Events: {}", events.len())?;

    for category in Category::all() {
        let count = events.iter().filter(|e| e.category() == *category).count();
        writeln!(out, "   {:<8} {}", category.as_str(), count)?;
    }

    let first = events.iter().map(|e| e.timestamp).min();
    let last = events.iter().map(|e| e.timestamp).max();
    if let (Some(first), Some(last)) = (first, last) {
        writeln!(
            out,
            "   Range: {} → {}",
            first.to_rfc3339(),
            last.to_rfc3339()
        )?;
    }

    Ok(())
}
