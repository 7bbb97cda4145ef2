//! Checklist item codec.
//!
//! Two renderings exist on purpose: the storage form keeps continuation
//! lines verbatim so stored bodies round-trip, while the export form
//! indents continuations under the bullet for sharing. Conflating them
//! would corrupt re-parsing of stored items with intentional whitespace.

const UNCHECKED_MARKER: &str = "- [ ] ";
const CHECKED_MARKER: &str = "- [x] ";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TaskItem {
    pub checked: bool,
    pub text: String,
}

/// Splits a leading `- [ ] ` / `- [x] ` marker off the first line.
/// The checked token is case-insensitive; at least one whitespace
/// character must follow the closing bracket.
fn strip_marker(first: &str) -> Option<(bool, &str)> {
    let rest = first.strip_prefix("- [")?;
    let mut chars = rest.chars();
    let checked = match chars.next()? {
        ' ' => false,
        'x' | 'X' => true,
        _ => return None,
    };
    let rest = chars.as_str().strip_prefix(']')?;
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    Some((checked, rest.trim_start_matches(char::is_whitespace)))
}

/// Total parse: every string is a valid item. Lines without a marker are
/// implicitly-unchecked tasks with the text passed through unchanged.
pub fn parse_task_item(item: &str) -> TaskItem {
    let (first, rest) = match item.split_once('\n') {
        Some((first, rest)) => (first, Some(rest)),
        None => (item, None),
    };
    if let Some((checked, stripped)) = strip_marker(first) {
        let text = match rest {
            Some(rest) => format!("{stripped}\n{rest}"),
            None => stripped.to_string(),
        };
        return TaskItem { checked, text };
    }
    TaskItem {
        checked: false,
        text: item.to_string(),
    }
}

/// Storage rendering: canonical marker on the first line, every other
/// line untouched.
pub fn format_task_item(text: &str, checked: bool) -> String {
    let marker = if checked {
        CHECKED_MARKER
    } else {
        UNCHECKED_MARKER
    };
    format!("{marker}{text}")
}

/// Export rendering: continuation lines with content are indented two
/// spaces under the bullet; whitespace-only continuations collapse to
/// empty lines.
pub fn format_markdown_checklist_item(text: &str, checked: bool) -> String {
    let mut out = String::new();
    for (idx, line) in text.split('\n').enumerate() {
        if idx == 0 {
            out.push_str(if checked {
                CHECKED_MARKER
            } else {
                UNCHECKED_MARKER
            });
            out.push_str(line);
            continue;
        }
        out.push('\n');
        if !line.trim().is_empty() {
            out.push_str("  ");
            out.push_str(line);
        }
    }
    out
}

/// Renders a whole day as a shareable checklist block. Each item is
/// first re-parsed so a stored `- [x] ...` keeps its checked state no
/// matter how it is currently formatted in memory.
pub fn format_markdown_checklist(items: &[String], heading: Option<&str>) -> String {
    let rendered: Vec<String> = items
        .iter()
        .map(|item| {
            let parsed = parse_task_item(item);
            format_markdown_checklist_item(&parsed.text, parsed.checked)
        })
        .collect();
    let body = rendered.join("\n\n");
    match heading {
        Some(heading) => format!("{heading}\n\n{body}"),
        None => body,
    }
}
