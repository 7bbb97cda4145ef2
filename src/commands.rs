use crate::clipboard::{Clipboard, SystemClipboard};
use crate::codec;
use crate::config::Config;
use crate::daystrip;
use crate::journal::Journal;
use crate::storage::{self, DiskStore, JournalStore};
use crate::ui;
use anyhow::{bail, Context, Result};

fn open_store(config: &Config) -> Result<DiskStore> {
    match &config.journal_dir {
        Some(dir) => Ok(DiskStore::new(dir.clone())),
        None => DiskStore::open_default(),
    }
}

pub fn add(config: &Config, text: Option<String>) -> Result<()> {
    let mut store = open_store(config)?;
    let text = match text {
        Some(text) => text,
        None => SystemClipboard::new()
            .read_text()
            .context("reading item text from clipboard")?,
    };
    if text.trim().is_empty() {
        bail!("nothing to add");
    }
    let today = storage::today_string();
    let day = store.append_item(&today, text.trim())?;
    println!("Added item {} for {}", day.count, day.date);
    Ok(())
}

pub fn list(config: &Config, date: Option<String>) -> Result<()> {
    let mut store = open_store(config)?;
    let date = date.unwrap_or_else(storage::today_string);
    let day = store.items_for_date(&date)?;
    println!(
        "{} ({} item{})",
        daystrip::format_view_date(&date),
        day.count,
        if day.count == 1 { "" } else { "s" }
    );
    for item in &day.items {
        let parsed = codec::parse_task_item(item);
        let mark = if parsed.checked { "x" } else { " " };
        for (idx, line) in parsed.text.split('\n').enumerate() {
            if idx == 0 {
                println!("  [{mark}] {line}");
            } else {
                println!("      {line}");
            }
        }
    }
    Ok(())
}

pub fn days(config: &Config, recent: Option<usize>) -> Result<()> {
    let mut store = open_store(config)?;
    let mut counts = store.day_counts()?;
    if let Some(recent) = recent {
        let skip = counts.len().saturating_sub(recent);
        counts = counts.split_off(skip);
    }
    if counts.is_empty() {
        println!("(no journal files)");
        return Ok(());
    }
    for entry in counts {
        println!(
            "{}  {:>3}  {}",
            entry.date,
            entry.count,
            daystrip::format_view_date(&entry.date)
        );
    }
    Ok(())
}

pub fn copy(config: &Config, date: Option<String>, to_stdout: bool) -> Result<()> {
    let mut store = open_store(config)?;
    let date = date.unwrap_or_else(storage::today_string);
    let day = store.items_for_date(&date)?;
    if day.items.is_empty() {
        bail!("no items for {}", date);
    }
    let heading = format!("### {date}");
    let block = codec::format_markdown_checklist(&day.items, Some(&heading));
    if to_stdout {
        println!("{block}");
    } else {
        SystemClipboard::new()
            .write_text(&block)
            .context("copying checklist to clipboard")?;
        println!("Copied {} items for {}", day.count, date);
    }
    Ok(())
}

pub fn archive(config: &Config, line: usize, date: Option<String>) -> Result<()> {
    let store = open_store(config)?;
    let date = date.unwrap_or_else(storage::today_string);
    let result = store.archive_item(&storage::journal_filename(&date), line)?;
    print_sections(&date, &result);
    Ok(())
}

pub fn restore(config: &Config, line: usize, date: Option<String>) -> Result<()> {
    let store = open_store(config)?;
    let date = date.unwrap_or_else(storage::today_string);
    let result = store.restore_item(&storage::journal_filename(&date), line)?;
    print_sections(&date, &result);
    Ok(())
}

fn print_sections(date: &str, result: &crate::model::ArchiveResult) {
    let sections = crate::archive::split_archived(&result.text);
    let archived = sections
        .archived
        .iter()
        .filter(|line| !line.trim().is_empty())
        .count();
    println!(
        "{}: {} active, {} archived ({} items across {} files)",
        date,
        sections.visible_active().len(),
        archived,
        result.counts.total,
        result.counts.files
    );
}

pub fn tui(config: &Config) -> Result<()> {
    let store = open_store(config)?;
    let journal = Journal::boot(store, storage::today_string())?;
    ui::run(journal, config)
}
