//! Date arithmetic for the navigational day strip.

use chrono::NaiveDate;

pub const ISO_DATE: &str = "%Y-%m-%d";

fn parse_iso(date: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(date, ISO_DATE).ok()
}

/// Renders an ISO date as e.g. `"Wed, Jan 7"`. The components are read
/// literally as a local calendar date, no timezone conversion. Malformed
/// input is passed through unchanged.
pub fn format_view_date(date: &str) -> String {
    match parse_iso(date) {
        Some(parsed) => parsed.format("%a, %b %-d").to_string(),
        None => date.to_string(),
    }
}

/// The `count` most recent dates ending at (and including) the anchor,
/// strictly descending, stepping back one calendar day at a time.
pub fn build_recent_dates(anchor: &str, count: usize) -> Vec<String> {
    let Some(mut date) = parse_iso(anchor) else {
        return Vec::new();
    };
    let mut out = Vec::with_capacity(count);
    for _ in 0..count {
        out.push(date.format(ISO_DATE).to_string());
        match date.pred_opt() {
            Some(prev) => date = prev,
            None => break,
        }
    }
    out
}

/// How many fixed-size tiles fit a strip of the given width, with a
/// fixed gap between tiles and no gap counted past the last one. Zero
/// width means the strip has not been measured yet; once it has, at
/// least one tile is considered visible.
pub fn visible_date_count(container_width: usize, tile_size: usize, gap: usize) -> usize {
    if container_width == 0 {
        return 0;
    }
    let stride = tile_size + gap;
    if stride == 0 {
        return 1;
    }
    ((container_width + gap) / stride).max(1)
}
