use crate::archive;
use crate::model::{ActiveFile, ArchiveResult, Counts, DayCount, DayItems, JournalError};
use anyhow::{Context, Result};
use chrono::Local;
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};

const ITEM_DIVIDER: &str = "---";
const TRASH_FILENAME: &str = "trash.md";

pub fn journal_filename(date: &str) -> String {
    format!("{date}.md")
}

pub fn date_from_filename(filename: &str) -> &str {
    filename.trim_end_matches(".md")
}

pub fn today_string() -> String {
    Local::now().format(crate::daystrip::ISO_DATE).to_string()
}

/// Splits a day file into items on `---` divider lines. Leading blank
/// lines inside an item are skipped, trailing whitespace is trimmed,
/// and whitespace-only items are dropped.
pub fn split_items(text: &str) -> Vec<String> {
    let mut items = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    let flush = |current: &mut Vec<&str>, items: &mut Vec<String>| {
        let item = current.join("\n").trim_end().to_string();
        if !item.trim().is_empty() {
            items.push(item);
        }
        current.clear();
    };

    for line in text.lines() {
        if current.is_empty() && line.trim().is_empty() {
            continue;
        }
        if line.trim() == ITEM_DIVIDER {
            flush(&mut current, &mut items);
            continue;
        }
        current.push(line);
    }
    flush(&mut current, &mut items);

    items
}

pub fn append_item_to_text(existing: &str, item: &str) -> String {
    let item = item.trim_end();
    if item.trim().is_empty() {
        return existing.to_string();
    }

    let mut out = existing.trim_end().to_string();
    if !out.is_empty() {
        out.push_str("\n\n---\n\n");
    }
    out.push_str(item);
    out.push('\n');
    out
}

pub fn count_items(text: &str) -> usize {
    split_items(text).len()
}

fn items_to_text(items: &[String]) -> String {
    if items.is_empty() {
        return String::new();
    }
    format!("{}\n", items.join("\n\n---\n\n"))
}

fn day_items(date: &str, items: Vec<String>) -> DayItems {
    DayItems {
        date: date.to_string(),
        count: items.len(),
        items,
    }
}

/// The request/response seam between the view-state layer and durable
/// storage. The store is the sole arbiter of truth: every mutation
/// returns the authoritative item list for the touched date.
pub trait JournalStore {
    /// Loads a day's record, creating the file if it does not exist yet.
    fn load_day(&mut self, date: &str) -> Result<DayItems, JournalError>;
    /// Reads a day's record without creating anything on disk.
    fn items_for_date(&mut self, date: &str) -> Result<DayItems, JournalError>;
    fn append_item(&mut self, date: &str, text: &str) -> Result<DayItems, JournalError>;
    fn update_item(&mut self, date: &str, index: usize, item: &str)
        -> Result<DayItems, JournalError>;
    fn delete_item(&mut self, date: &str, index: usize) -> Result<DayItems, JournalError>;
    fn day_counts(&mut self) -> Result<Vec<DayCount>, JournalError>;
}

#[derive(Debug, Clone)]
pub struct DiskStore {
    root: PathBuf,
}

impl DiskStore {
    pub fn new(root: PathBuf) -> Self {
        DiskStore { root }
    }

    pub fn open_default() -> Result<Self> {
        Ok(DiskStore::new(default_root()?))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn load_or_create(&self, filename: &str) -> Result<String> {
        fs::create_dir_all(&self.root).with_context(|| format!("creating {:?}", self.root))?;
        let path = self.root.join(filename);
        if !path.exists() {
            fs::write(&path, "").with_context(|| format!("creating {:?}", path))?;
            return Ok(String::new());
        }
        fs::read_to_string(&path).with_context(|| format!("reading {:?}", path))
    }

    fn write_file(&self, filename: &str, text: &str) -> Result<()> {
        fs::create_dir_all(&self.root).with_context(|| format!("creating {:?}", self.root))?;
        let path = self.root.join(filename);
        fs::write(&path, text).with_context(|| format!("writing {:?}", path))
    }

    fn markdown_files(&self) -> Vec<String> {
        let mut files = Vec::new();
        if let Ok(entries) = fs::read_dir(&self.root) {
            for entry in entries.flatten() {
                let path = entry.path();
                if path.extension().and_then(|ext| ext.to_str()) != Some("md") {
                    continue;
                }
                if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                    if name != TRASH_FILENAME {
                        files.push(name.to_string());
                    }
                }
            }
        }
        files.sort();
        files
    }

    fn counts_for(&self, active_filename: &str, active_text: &str) -> Counts {
        let mut files = self.markdown_files();
        if !files.iter().any(|name| name == active_filename) {
            files.push(active_filename.to_string());
            files.sort();
        }

        let mut total = 0;
        for name in &files {
            if name == active_filename {
                total += count_items(active_text);
                continue;
            }
            if let Ok(text) = fs::read_to_string(self.root.join(name)) {
                total += count_items(&text);
            }
        }

        Counts {
            current: count_items(active_text),
            total,
            files: files.len(),
        }
    }

    /// Load-or-create for the single-file-with-sections variant, with
    /// root-wide tallies.
    pub fn active_file(&self, date: &str) -> Result<ActiveFile, JournalError> {
        let filename = journal_filename(date);
        let text = self
            .load_or_create(&filename)
            .map_err(|_| JournalError::LoadFailed(date.to_string()))?;
        let counts = self.counts_for(&filename, &text);
        Ok(ActiveFile {
            filename,
            text,
            counts,
        })
    }

    pub fn save_active_file(&self, filename: &str, text: &str) -> Result<Counts, JournalError> {
        self.write_file(filename, text)
            .map_err(|_| JournalError::SaveFailed(date_from_filename(filename).to_string()))?;
        Ok(self.counts_for(filename, text))
    }

    /// Moves one rendered line of the active region below the archive
    /// heading and persists the rewritten file.
    pub fn archive_item(&self, filename: &str, line_idx: usize) -> Result<ArchiveResult, JournalError> {
        self.rewrite_sections(filename, |text| archive::archive_line(text, line_idx))
    }

    pub fn restore_item(&self, filename: &str, line_idx: usize) -> Result<ArchiveResult, JournalError> {
        self.rewrite_sections(filename, |text| archive::restore_line(text, line_idx))
    }

    fn rewrite_sections<F>(&self, filename: &str, rewrite: F) -> Result<ArchiveResult, JournalError>
    where
        F: FnOnce(&str) -> String,
    {
        let date = date_from_filename(filename).to_string();
        let text = self
            .load_or_create(filename)
            .map_err(|_| JournalError::LoadFailed(date.clone()))?;
        let updated = rewrite(&text);
        let counts = self.save_active_file(filename, &updated)?;
        Ok(ArchiveResult {
            text: updated,
            counts,
        })
    }
}

impl JournalStore for DiskStore {
    fn load_day(&mut self, date: &str) -> Result<DayItems, JournalError> {
        let text = self
            .load_or_create(&journal_filename(date))
            .map_err(|_| JournalError::LoadFailed(date.to_string()))?;
        Ok(day_items(date, split_items(&text)))
    }

    fn items_for_date(&mut self, date: &str) -> Result<DayItems, JournalError> {
        let path = self.root.join(journal_filename(date));
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => String::new(),
            Err(_) => return Err(JournalError::LoadFailed(date.to_string())),
        };
        Ok(day_items(date, split_items(&text)))
    }

    fn append_item(&mut self, date: &str, text: &str) -> Result<DayItems, JournalError> {
        let filename = journal_filename(date);
        let existing = self
            .load_or_create(&filename)
            .map_err(|_| JournalError::LoadFailed(date.to_string()))?;
        let updated = append_item_to_text(&existing, text);
        self.write_file(&filename, &updated)
            .map_err(|_| JournalError::SaveFailed(date.to_string()))?;
        Ok(day_items(date, split_items(&updated)))
    }

    fn update_item(
        &mut self,
        date: &str,
        index: usize,
        item: &str,
    ) -> Result<DayItems, JournalError> {
        let filename = journal_filename(date);
        let text = self
            .load_or_create(&filename)
            .map_err(|_| JournalError::LoadFailed(date.to_string()))?;
        let mut items = split_items(&text);
        if index >= items.len() {
            return Err(JournalError::IndexOutOfRange {
                date: date.to_string(),
                index,
            });
        }
        items[index] = item.trim_end().to_string();
        self.write_file(&filename, &items_to_text(&items))
            .map_err(|_| JournalError::SaveFailed(date.to_string()))?;
        Ok(day_items(date, items))
    }

    fn delete_item(&mut self, date: &str, index: usize) -> Result<DayItems, JournalError> {
        let filename = journal_filename(date);
        let text = self
            .load_or_create(&filename)
            .map_err(|_| JournalError::LoadFailed(date.to_string()))?;
        let mut items = split_items(&text);
        if index >= items.len() {
            return Err(JournalError::IndexOutOfRange {
                date: date.to_string(),
                index,
            });
        }
        let removed = items.remove(index);

        // The trash entry goes in first: losing the day-file write
        // leaves a duplicate in trash, never a silent loss.
        let timestamp = Local::now().format("%Y-%m-%d %H:%M").to_string();
        let trash_entry = format!("[{timestamp}]\n{removed}");
        let trash_text = fs::read_to_string(self.root.join(TRASH_FILENAME)).unwrap_or_default();
        self.write_file(TRASH_FILENAME, &append_item_to_text(&trash_text, &trash_entry))
            .map_err(|_| JournalError::DeleteFailed {
                date: date.to_string(),
                index,
            })?;

        self.write_file(&filename, &items_to_text(&items))
            .map_err(|_| JournalError::DeleteFailed {
                date: date.to_string(),
                index,
            })?;
        Ok(day_items(date, items))
    }

    fn day_counts(&mut self) -> Result<Vec<DayCount>, JournalError> {
        let mut out = Vec::new();
        for name in self.markdown_files() {
            // A single unreadable file should not blank the whole strip.
            let text = fs::read_to_string(self.root.join(&name)).unwrap_or_default();
            out.push(DayCount {
                date: date_from_filename(&name).to_string(),
                count: count_items(&text),
            });
        }
        Ok(out)
    }
}

pub fn default_root() -> Result<PathBuf> {
    let dirs = ProjectDirs::from("", "", "daybook").context("locating data directory")?;
    Ok(dirs.data_dir().to_path_buf())
}
