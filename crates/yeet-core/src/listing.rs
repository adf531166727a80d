//! Human-readable rendering of the bin contents.

use std::fmt::Write;

use chrono::DateTime;

use crate::record::RecordSet;

/// Shown by `--list` when nothing is held.
pub const EMPTY_LISTING: &str = "No yeeted files (yet). Try yeeting some files!";

/// Render an expiry timestamp as `DD/MM/YYYY at HH:MM:SS` (UTC).
#[must_use]
pub fn format_expiry(secs: i64) -> String {
    DateTime::from_timestamp(secs, 0).map_or_else(
        || format!("{secs}s since epoch"),
        |dt| dt.format("%d/%m/%Y at %H:%M:%S").to_string(),
    )
}

/// Render every record in store order.
#[must_use]
pub fn render_listing(records: &RecordSet) -> String {
    if records.is_empty() {
        return format!("{EMPTY_LISTING}\n");
    }

    let mut out = String::from("Yeeted files:\n");
    for record in records {
        let _ = writeln!(out, "{}:", record.name);
        let _ = writeln!(out, "  Expiry: {}", format_expiry(record.expires_at));
        let _ = writeln!(out, "  Original Path: {}", record.original_path.display());
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::TrashRecord;

    #[test]
    fn format_expiry_uses_day_month_year_utc() {
        assert_eq!(format_expiry(0), "01/01/1970 at 00:00:00");
        // 2023-11-21T22:13:20Z
        assert_eq!(format_expiry(1_700_604_800), "21/11/2023 at 22:13:20");
    }

    #[test]
    fn format_expiry_out_of_range_falls_back_to_seconds() {
        assert_eq!(format_expiry(i64::MAX), format!("{}s since epoch", i64::MAX));
    }

    #[test]
    fn empty_listing_is_friendly() {
        assert_eq!(render_listing(&RecordSet::new()), format!("{EMPTY_LISTING}\n"));
    }

    #[test]
    fn listing_shows_each_record_in_insertion_order() {
        let mut records = RecordSet::new();
        records
            .insert(TrashRecord::new("zz.txt", "/home/u/zz.txt", 0))
            .unwrap();
        records
            .insert(TrashRecord::new("aa.txt", "/home/u/aa.txt", 0))
            .unwrap();

        let text = render_listing(&records);

        assert!(text.starts_with("Yeeted files:\n"));
        assert!(text.contains("zz.txt:\n  Expiry: 08/01/1970 at 00:00:00\n  Original Path: /home/u/zz.txt\n"));
        assert!(text.find("zz.txt").unwrap() < text.find("aa.txt").unwrap());
    }
}
