//! Active/archived document sections.
//!
//! A day file may carry a `## Archived` heading; everything below it is
//! inert cargo that the editor never touches. Only the first occurrence
//! of the heading partitions the document; later occurrences are
//! ordinary archived lines.

use crate::codec::parse_task_item;

pub const ARCHIVED_HEADING: &str = "## Archived";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sections {
    pub active: Vec<String>,
    pub archived: Vec<String>,
}

impl Sections {
    /// The active region as editor text, trailing whitespace stripped.
    pub fn active_text(&self) -> String {
        self.active.join("\n").trim_end().to_string()
    }

    /// Active lines with visible content, in render order. Archive and
    /// restore indices count over this filtered view.
    pub fn visible_active(&self) -> Vec<&str> {
        self.active
            .iter()
            .map(String::as_str)
            .filter(|line| !line.trim().is_empty())
            .collect()
    }
}

pub fn split_archived(text: &str) -> Sections {
    let mut active = Vec::new();
    let mut archived = Vec::new();
    let mut in_archived = false;

    for line in text.split('\n') {
        let line = line.strip_suffix('\r').unwrap_or(line);
        if !in_archived && line.trim() == ARCHIVED_HEADING {
            in_archived = true;
            continue;
        }
        if in_archived {
            archived.push(line.to_string());
        } else {
            active.push(line.to_string());
        }
    }

    // The blank separator ahead of the heading is an artifact of
    // combine_with_archived, not content.
    while active.last().is_some_and(|line| line.trim().is_empty()) {
        active.pop();
    }

    Sections { active, archived }
}

pub fn combine_with_archived(active_text: &str, archived: &[String]) -> String {
    let trimmed = active_text.trim_end();
    if archived.iter().all(|line| line.trim().is_empty()) {
        return trimmed.to_string();
    }

    let archived_text = archived.join("\n");
    if trimmed.is_empty() {
        format!("{ARCHIVED_HEADING}\n{archived_text}")
    } else {
        format!("{trimmed}\n\n{ARCHIVED_HEADING}\n{archived_text}")
    }
}

fn nth_visible(lines: &[String], wanted: usize) -> Option<usize> {
    lines
        .iter()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .nth(wanted)
        .map(|(idx, _)| idx)
}

/// Moves the nth visible active line below the archive heading. The
/// index is positional over the rendered checklist; an index that no
/// longer exists leaves the document unchanged.
pub fn archive_line(text: &str, line_idx: usize) -> String {
    let mut sections = split_archived(text);
    let Some(pos) = nth_visible(&sections.active, line_idx) else {
        return text.to_string();
    };
    let moved = sections.active.remove(pos);
    let parsed = parse_task_item(&moved);
    sections
        .archived
        .push(crate::codec::format_task_item(&parsed.text, true));
    combine_with_archived(&sections.active_text(), &sections.archived)
}

/// Moves the nth visible archived line back to the end of the active
/// region, clearing its checked marker.
pub fn restore_line(text: &str, line_idx: usize) -> String {
    let mut sections = split_archived(text);
    let Some(pos) = nth_visible(&sections.archived, line_idx) else {
        return text.to_string();
    };
    let moved = sections.archived.remove(pos);
    let parsed = parse_task_item(&moved);
    sections
        .active
        .push(crate::codec::format_task_item(&parsed.text, false));
    combine_with_archived(&sections.active_text(), &sections.archived)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn split_without_heading_keeps_everything_active() {
        let sections = split_archived("alpha\nbravo");
        assert_eq!(sections.active, lines(&["alpha", "bravo"]));
        assert!(sections.archived.is_empty());
    }

    #[test]
    fn split_partitions_on_heading() {
        let sections = split_archived("alpha\n\n## Archived\nold one\nold two");
        assert_eq!(sections.active, lines(&["alpha"]));
        assert_eq!(sections.archived, lines(&["old one", "old two"]));
    }

    #[test]
    fn second_heading_is_ordinary_archived_cargo() {
        let sections = split_archived("top\n## Archived\nkept\n## Archived\nalso kept");
        assert_eq!(sections.active, lines(&["top"]));
        assert_eq!(sections.archived, lines(&["kept", "## Archived", "also kept"]));
    }

    #[test]
    fn combine_drops_empty_archive_section() {
        assert_eq!(combine_with_archived("alpha\n", &[]), "alpha");
        assert_eq!(
            combine_with_archived("alpha", &lines(&["", "   "])),
            "alpha"
        );
    }

    #[test]
    fn combine_omits_separator_when_active_is_empty() {
        assert_eq!(
            combine_with_archived("", &lines(&["old"])),
            "## Archived\nold"
        );
    }

    #[test]
    fn split_combine_round_trips() {
        let active = "alpha\nbravo\n\ncharlie";
        let archived = lines(&["one", "", "two"]);
        let combined = combine_with_archived(active, &archived);
        let sections = split_archived(&combined);
        assert_eq!(sections.active.join("\n"), active);
        assert_eq!(sections.archived, archived);
    }

    #[test]
    fn archive_line_moves_visible_line_below_heading() {
        let text = "first\n\nsecond\nthird";
        let updated = archive_line(text, 1);
        let sections = split_archived(&updated);
        assert_eq!(sections.visible_active(), vec!["first", "third"]);
        assert_eq!(sections.archived, lines(&["- [x] second"]));
    }

    #[test]
    fn archive_line_out_of_range_is_a_no_op() {
        let text = "only\n\n## Archived\nold";
        assert_eq!(archive_line(text, 5), text);
    }

    #[test]
    fn restore_line_returns_item_to_active() {
        let text = "first\n\n## Archived\n- [x] done task";
        let updated = restore_line(text, 0);
        let sections = split_archived(&updated);
        assert_eq!(sections.visible_active(), vec!["first", "- [ ] done task"]);
        assert!(sections.archived.is_empty() || sections.archived.iter().all(|l| l.trim().is_empty()));
    }
}
