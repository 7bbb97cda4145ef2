//! Journal view state.
//!
//! Holds today's items, the currently viewed day's items and the
//! per-date count index, and reconciles them across the five external
//! events: boot, editor blur, window focus, toggle/delete on the viewed
//! list, and switching the viewed day. The store is the arbiter of
//! truth: every mutation adopts the authoritative item list it returns,
//! and a rejected call leaves every in-memory collection untouched.

use crate::codec;
use crate::model::{DayItems, JournalError};
use crate::storage::JournalStore;
use std::collections::BTreeMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppendOutcome {
    Appended,
    /// Whitespace-only pending text is discarded without a round trip.
    EmptyInput,
    /// A save was already in flight; the text is dropped with a visible
    /// warning rather than queued.
    DroppedWhileSaving,
    Failed,
}

pub struct Journal<S: JournalStore> {
    store: S,
    today_date: String,
    today_items: Vec<String>,
    viewed_date: String,
    viewed_items: Vec<String>,
    day_counts: BTreeMap<String, usize>,
    saving: bool,
    error: Option<String>,
    status: Option<String>,
}

impl<S: JournalStore> Journal<S> {
    /// Loads today's record and seeds the count index, merging the bulk
    /// day-count listing when the store provides one. Today's live
    /// count always wins over a stale listed value.
    pub fn boot(mut store: S, today: String) -> Result<Self, JournalError> {
        let day = store.load_day(&today)?;
        let mut journal = Journal {
            store,
            today_date: today.clone(),
            viewed_date: today,
            viewed_items: day.items.clone(),
            today_items: day.items,
            day_counts: BTreeMap::new(),
            saving: false,
            error: None,
            status: None,
        };
        match journal.store.day_counts() {
            Ok(listing) => {
                for entry in listing {
                    journal.day_counts.insert(entry.date, entry.count);
                }
            }
            Err(err) => journal.error = Some(err.to_string()),
        }
        journal.sync_today_count();
        Ok(journal)
    }

    pub fn today_date(&self) -> &str {
        &self.today_date
    }

    pub fn viewed_date(&self) -> &str {
        &self.viewed_date
    }

    pub fn today_items(&self) -> &[String] {
        &self.today_items
    }

    pub fn viewed_items(&self) -> &[String] {
        &self.viewed_items
    }

    pub fn count_for(&self, date: &str) -> usize {
        self.day_counts.get(date).copied().unwrap_or(0)
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }

    /// The one user-visible message: an active error outranks any
    /// transient status until it is cleared by the next event.
    pub fn display_message(&self) -> Option<&str> {
        self.error.as_deref().or(self.status.as_deref())
    }

    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = Some(status.into());
    }

    pub fn report_error(&mut self, err: &JournalError) {
        self.error = Some(err.to_string());
    }

    fn sync_today_count(&mut self) {
        self.day_counts
            .insert(self.today_date.clone(), self.today_items.len());
    }

    /// Re-resolves "today" lazily. If the calendar date rolled over
    /// since the last event, the new day's record is loaded in full so
    /// later appends land in the correct file. The viewed date is left
    /// alone; it simply becomes a historical day.
    fn resolve_today(&mut self, today: &str) -> Result<(), JournalError> {
        if today == self.today_date {
            return Ok(());
        }
        let day = self.store.load_day(today)?;
        self.today_date = today.to_string();
        self.today_items = day.items;
        self.sync_today_count();
        Ok(())
    }

    /// Window-focus event: check for a day rollover. The caller clears
    /// its pending editor text afterwards; the editor is a single-shot
    /// capture box, not a persistent draft.
    pub fn refresh_on_focus(&mut self, today: &str) {
        self.error = None;
        self.status = None;
        if let Err(err) = self.resolve_today(today) {
            self.error = Some(err.to_string());
        }
    }

    /// Editor-blur event: append the pending text to today's record.
    /// At most one append is in flight; a blur during a save drops the
    /// text with a warning instead of queueing.
    pub fn append_on_blur(&mut self, today: &str, text: &str) -> AppendOutcome {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return AppendOutcome::EmptyInput;
        }
        if self.saving {
            self.status = Some("save in progress, text discarded".to_string());
            return AppendOutcome::DroppedWhileSaving;
        }
        self.error = None;
        self.saving = true;
        let outcome = self.append_now(today, trimmed);
        self.saving = false;
        outcome
    }

    fn append_now(&mut self, today: &str, trimmed: &str) -> AppendOutcome {
        if let Err(err) = self.resolve_today(today) {
            self.error = Some(err.to_string());
            return AppendOutcome::Failed;
        }

        // Optimistic push, reconciled against the store's reply below
        // and rolled back on rejection.
        self.today_items.push(trimmed.to_string());
        self.sync_today_count();

        match self.store.append_item(&self.today_date, trimmed) {
            Ok(day) => {
                self.today_items = day.items;
                self.sync_today_count();
                if self.viewed_date == self.today_date {
                    self.viewed_items = self.today_items.clone();
                } else {
                    // Appends always target today; the viewed day is
                    // refetched so its copy stays authoritative.
                    match self.store.items_for_date(&self.viewed_date) {
                        Ok(day) => self.viewed_items = day.items,
                        Err(err) => self.error = Some(err.to_string()),
                    }
                }
                AppendOutcome::Appended
            }
            Err(err) => {
                self.today_items.pop();
                self.sync_today_count();
                self.error = Some(err.to_string());
                AppendOutcome::Failed
            }
        }
    }

    /// Flips the checked marker of the viewed item at `index`.
    pub fn toggle_item(&mut self, index: usize) {
        self.error = None;
        let Some(stored) = self.viewed_items.get(index) else {
            self.error = Some(
                JournalError::IndexOutOfRange {
                    date: self.viewed_date.clone(),
                    index,
                }
                .to_string(),
            );
            return;
        };
        let parsed = codec::parse_task_item(stored);
        let updated = codec::format_task_item(&parsed.text, !parsed.checked);
        match self.store.update_item(&self.viewed_date, index, &updated) {
            Ok(day) => self.adopt(day),
            Err(err) => self.error = Some(err.to_string()),
        }
    }

    pub fn delete_item(&mut self, index: usize) {
        self.error = None;
        match self.store.delete_item(&self.viewed_date, index) {
            Ok(day) => self.adopt(day),
            Err(err) => self.error = Some(err.to_string()),
        }
    }

    /// Switches the viewed day. Today is served from memory without a
    /// round trip; a failed fetch leaves the previous day's data on
    /// screen with the error slot set.
    pub fn set_view_date(&mut self, date: &str) {
        self.error = None;
        if date == self.today_date {
            self.viewed_date = date.to_string();
            self.viewed_items = self.today_items.clone();
            return;
        }
        match self.store.items_for_date(date) {
            Ok(day) => {
                self.viewed_date = day.date.clone();
                self.viewed_items = day.items;
                self.day_counts.insert(day.date, day.count);
            }
            Err(err) => self.error = Some(err.to_string()),
        }
    }

    /// Adopts an authoritative per-date reply from the store.
    fn adopt(&mut self, day: DayItems) {
        self.day_counts.insert(day.date.clone(), day.count);
        self.viewed_items = day.items;
        if day.date == self.today_date {
            self.today_items = self.viewed_items.clone();
        }
        self.sync_today_count();
    }

    #[cfg(test)]
    fn store(&self) -> &S {
        &self.store
    }

    #[cfg(test)]
    fn mark_saving(&mut self) {
        self.saving = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DayCount;

    #[derive(Default)]
    struct MockStore {
        days: BTreeMap<String, Vec<String>>,
        listing: Vec<DayCount>,
        fail_appends: bool,
        fail_fetches: bool,
        fetched: Vec<String>,
    }

    impl MockStore {
        fn with_day(mut self, date: &str, items: &[&str]) -> Self {
            self.days
                .insert(date.to_string(), items.iter().map(|s| s.to_string()).collect());
            self
        }

        fn reply(&self, date: &str) -> DayItems {
            let items = self.days.get(date).cloned().unwrap_or_default();
            DayItems {
                date: date.to_string(),
                count: items.len(),
                items,
            }
        }
    }

    impl JournalStore for MockStore {
        fn load_day(&mut self, date: &str) -> Result<DayItems, JournalError> {
            self.days.entry(date.to_string()).or_default();
            Ok(self.reply(date))
        }

        fn items_for_date(&mut self, date: &str) -> Result<DayItems, JournalError> {
            self.fetched.push(date.to_string());
            if self.fail_fetches {
                return Err(JournalError::LoadFailed(date.to_string()));
            }
            Ok(self.reply(date))
        }

        fn append_item(&mut self, date: &str, text: &str) -> Result<DayItems, JournalError> {
            if self.fail_appends {
                return Err(JournalError::SaveFailed(date.to_string()));
            }
            self.days
                .entry(date.to_string())
                .or_default()
                .push(text.to_string());
            Ok(self.reply(date))
        }

        fn update_item(
            &mut self,
            date: &str,
            index: usize,
            item: &str,
        ) -> Result<DayItems, JournalError> {
            let items = self.days.entry(date.to_string()).or_default();
            if index >= items.len() {
                return Err(JournalError::IndexOutOfRange {
                    date: date.to_string(),
                    index,
                });
            }
            items[index] = item.to_string();
            Ok(self.reply(date))
        }

        fn delete_item(&mut self, date: &str, index: usize) -> Result<DayItems, JournalError> {
            let items = self.days.entry(date.to_string()).or_default();
            if index >= items.len() {
                return Err(JournalError::IndexOutOfRange {
                    date: date.to_string(),
                    index,
                });
            }
            items.remove(index);
            Ok(self.reply(date))
        }

        fn day_counts(&mut self) -> Result<Vec<DayCount>, JournalError> {
            Ok(self.listing.clone())
        }
    }

    const TODAY: &str = "2026-01-13";
    const YESTERDAY: &str = "2026-01-12";

    fn booted(store: MockStore) -> Journal<MockStore> {
        Journal::boot(store, TODAY.to_string()).unwrap()
    }

    #[test]
    fn boot_prefers_live_today_count_over_stale_listing() {
        let mut store = MockStore::default().with_day(TODAY, &["a", "b"]);
        store.listing = vec![
            DayCount { date: TODAY.into(), count: 99 },
            DayCount { date: YESTERDAY.into(), count: 3 },
        ];
        let journal = booted(store);
        assert_eq!(journal.count_for(TODAY), 2);
        assert_eq!(journal.count_for(YESTERDAY), 3);
        assert_eq!(journal.viewed_date(), TODAY);
    }

    #[test]
    fn blank_pending_text_is_discarded() {
        let mut journal = booted(MockStore::default());
        assert_eq!(journal.append_on_blur(TODAY, "  \n "), AppendOutcome::EmptyInput);
        assert!(journal.today_items().is_empty());
    }

    #[test]
    fn blur_while_saving_drops_with_warning() {
        let mut journal = booted(MockStore::default());
        journal.mark_saving();
        assert_eq!(
            journal.append_on_blur(TODAY, "lost text"),
            AppendOutcome::DroppedWhileSaving
        );
        assert!(journal.display_message().unwrap().contains("discarded"));
        assert!(journal.today_items().is_empty());
    }

    #[test]
    fn append_grows_today_and_count_index() {
        let mut journal = booted(MockStore::default().with_day(TODAY, &["first"]));
        assert_eq!(journal.append_on_blur(TODAY, "second\n"), AppendOutcome::Appended);
        assert_eq!(journal.today_items(), ["first", "second"]);
        assert_eq!(journal.viewed_items(), ["first", "second"]);
        assert_eq!(journal.count_for(TODAY), 2);
    }

    #[test]
    fn append_while_viewing_past_date_refetches_viewed_day() {
        let store = MockStore::default()
            .with_day(TODAY, &["today item"])
            .with_day(YESTERDAY, &["old item"]);
        let mut journal = booted(store);
        journal.set_view_date(YESTERDAY);
        assert_eq!(journal.viewed_items(), ["old item"]);

        assert_eq!(journal.append_on_blur(TODAY, "new"), AppendOutcome::Appended);
        assert_eq!(journal.today_items(), ["today item", "new"]);
        assert_eq!(journal.count_for(TODAY), 2);
        // The viewed day was refetched and its content is unchanged.
        assert_eq!(journal.viewed_items(), ["old item"]);
        assert_eq!(
            journal.store().fetched,
            vec![YESTERDAY.to_string(), YESTERDAY.to_string()]
        );
    }

    #[test]
    fn append_after_midnight_lands_in_the_new_day() {
        let mut journal = booted(MockStore::default().with_day(TODAY, &["late"]));
        let tomorrow = "2026-01-14";
        assert_eq!(journal.append_on_blur(tomorrow, "fresh"), AppendOutcome::Appended);
        assert_eq!(journal.today_date(), tomorrow);
        assert_eq!(journal.today_items(), ["fresh"]);
        assert_eq!(journal.count_for(tomorrow), 1);
        assert_eq!(journal.store().days[tomorrow], vec!["fresh"]);
        assert_eq!(journal.store().days[TODAY], vec!["late"]);
    }

    #[test]
    fn failed_append_rolls_back_the_optimistic_push() {
        let mut store = MockStore::default().with_day(TODAY, &["kept"]);
        store.fail_appends = true;
        let mut journal = booted(store);
        assert_eq!(journal.append_on_blur(TODAY, "doomed"), AppendOutcome::Failed);
        assert_eq!(journal.today_items(), ["kept"]);
        assert_eq!(journal.count_for(TODAY), 1);
        assert!(journal.has_error());
        assert!(!journal.is_saving());
    }

    #[test]
    fn toggle_flips_marker_and_adopts_reply() {
        let mut journal = booted(MockStore::default().with_day(TODAY, &["- [ ] task"]));
        journal.toggle_item(0);
        assert_eq!(journal.viewed_items(), ["- [x] task"]);
        assert_eq!(journal.today_items(), ["- [x] task"]);
        journal.toggle_item(0);
        assert_eq!(journal.viewed_items(), ["- [ ] task"]);
    }

    #[test]
    fn toggle_marks_plain_lines_checked() {
        let mut journal = booted(MockStore::default().with_day(TODAY, &["plain note"]));
        journal.toggle_item(0);
        assert_eq!(journal.viewed_items(), ["- [x] plain note"]);
    }

    #[test]
    fn rejected_mutation_leaves_memory_untouched() {
        let store = MockStore::default()
            .with_day(TODAY, &["a"])
            .with_day(YESTERDAY, &["b"]);
        let mut journal = booted(store);
        journal.set_view_date(YESTERDAY);
        journal.delete_item(7);
        assert!(journal.has_error());
        assert_eq!(journal.viewed_items(), ["b"]);
        assert_eq!(journal.count_for(YESTERDAY), 1);
    }

    #[test]
    fn delete_adopts_authoritative_list() {
        let mut journal = booted(MockStore::default().with_day(TODAY, &["a", "b"]));
        journal.delete_item(0);
        assert_eq!(journal.viewed_items(), ["b"]);
        assert_eq!(journal.today_items(), ["b"]);
        assert_eq!(journal.count_for(TODAY), 1);
    }

    #[test]
    fn viewing_today_skips_the_round_trip() {
        let store = MockStore::default()
            .with_day(TODAY, &["now"])
            .with_day(YESTERDAY, &["then"]);
        let mut journal = booted(store);
        journal.set_view_date(YESTERDAY);
        journal.set_view_date(TODAY);
        assert_eq!(journal.viewed_items(), ["now"]);
        // Only the historical day was ever fetched.
        assert_eq!(journal.store().fetched, vec![YESTERDAY.to_string()]);
    }

    #[test]
    fn failed_day_switch_keeps_previous_view() {
        let mut store = MockStore::default().with_day(TODAY, &["now"]);
        store.fail_fetches = true;
        let mut journal = booted(store);
        journal.set_view_date(YESTERDAY);
        assert!(journal.has_error());
        assert_eq!(journal.viewed_date(), TODAY);
        assert_eq!(journal.viewed_items(), ["now"]);
    }

    #[test]
    fn focus_rolls_the_day_over() {
        let mut journal = booted(MockStore::default().with_day(TODAY, &["a"]));
        let tomorrow = "2026-01-14";
        journal.refresh_on_focus(tomorrow);
        assert_eq!(journal.today_date(), tomorrow);
        assert!(journal.today_items().is_empty());
        // Yesterday's view is still on screen as a historical day.
        assert_eq!(journal.viewed_date(), TODAY);
        assert_eq!(journal.viewed_items(), ["a"]);
    }

    #[test]
    fn error_outranks_transient_status() {
        let mut journal = booted(MockStore::default());
        journal.set_status("Copied");
        journal.toggle_item(9);
        assert!(journal.display_message().unwrap().contains("no longer exists"));
    }
}
