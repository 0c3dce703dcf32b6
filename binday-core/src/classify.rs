//! Service-label classification and display-date formatting.

use chrono::{NaiveDate, NaiveDateTime};

use crate::model::CollectionEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Broad category of a collection service.
pub enum ServiceKind {
    /// Food waste caddy.
    Food,
    /// Mixed recycling.
    Recycling,
    /// Garden/green waste.
    Garden,
    /// Domestic/general refuse.
    Waste,
    /// Anything the keywords don't cover.
    Other,
}

impl ServiceKind {
    /// Classify a raw service label.
    ///
    /// Case-insensitive substring match, first hit wins. The order matters:
    /// labels like "Food Waste Collection Service" contain several keywords
    /// and must land on the most specific one.
    #[must_use]
    pub fn classify(service: &str) -> Self {
        let label = service.to_lowercase();
        if label.contains("food") {
            Self::Food
        } else if label.contains("recycling") {
            Self::Recycling
        } else if label.contains("garden") || label.contains("green") {
            Self::Garden
        } else if label.contains("domestic") || label.contains("general") {
            Self::Waste
        } else {
            Self::Other
        }
    }

    /// Emoji used next to the service name.
    #[must_use]
    pub fn icon(self) -> &'static str {
        match self {
            Self::Food => "\u{1f34e}",
            Self::Recycling => "\u{267b}\u{fe0f}",
            Self::Garden => "\u{1f33f}",
            Self::Waste => "\u{1f5d1}\u{fe0f}",
            Self::Other => "\u{1f4e6}",
        }
    }

    /// Short display name for tiles and list rows.
    #[must_use]
    pub fn short_name(self) -> &'static str {
        match self {
            Self::Food => "Food",
            Self::Recycling => "Recycling",
            Self::Garden => "Garden",
            Self::Waste => "Waste",
            Self::Other => "Other",
        }
    }

    /// Stable style class the presentation layer keys colors on.
    #[must_use]
    pub fn slug(self) -> &'static str {
        match self {
            Self::Food => "food",
            Self::Recycling => "recycling",
            Self::Garden => "garden",
            Self::Waste => "waste",
            Self::Other => "default",
        }
    }
}

/// Parse the raw `date` field of a collection event.
///
/// Two incompatible formats occur upstream depending on which backend
/// system answered: ISO (`YYYY-MM-DD`, with or without a time part) and
/// `DD/MM/YYYY HH:MM:SS`. The parser branches on shape rather than
/// assuming one.
#[must_use]
pub fn parse_event_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    for format in ["%d/%m/%Y %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(parsed.date());
        }
    }
    for format in ["%Y-%m-%d", "%d/%m/%Y"] {
        if let Ok(parsed) = NaiveDate::parse_from_str(trimmed, format) {
            return Some(parsed);
        }
    }
    None
}

/// Human-facing date line for a collection event.
///
/// Uses the server's pre-formatted `read_date` verbatim when present,
/// prefixed with "Today (…)" / "Tomorrow (…)" when the event's calendar
/// date matches; otherwise falls back to a short formatted date parsed
/// from the raw field, and to the raw string when neither format matches.
/// The caller supplies today's date so the function stays pure.
#[must_use]
pub fn display_date(event: &CollectionEvent, today: NaiveDate) -> String {
    let parsed = parse_event_date(&event.date);
    let tomorrow = today.succ_opt();

    if let Some(read_date) = event
        .read_date
        .as_deref()
        .filter(|value| !value.trim().is_empty())
    {
        return match parsed {
            Some(date) if date == today => format!("Today ({read_date})"),
            Some(date) if Some(date) == tomorrow => format!("Tomorrow ({read_date})"),
            _ => read_date.to_owned(),
        };
    }

    match parsed {
        Some(date) => {
            let formatted = date.format("%a, %-d %b").to_string();
            if date == today {
                format!("Today ({formatted})")
            } else if Some(date) == tomorrow {
                format!("Tomorrow ({formatted})")
            } else {
                formatted
            }
        }
        None => event.date.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(date: &str, read_date: Option<&str>) -> CollectionEvent {
        CollectionEvent {
            service: "Domestic Waste Collection Service".to_owned(),
            round: String::new(),
            schedule: String::new(),
            day: "Saturday".to_owned(),
            date: date.to_owned(),
            read_date: read_date.map(str::to_owned),
        }
    }

    #[test]
    fn classify_prefers_food_over_waste_keywords() {
        assert_eq!(
            ServiceKind::classify("Food Waste Collection Service"),
            ServiceKind::Food
        );
    }

    #[test]
    fn classify_covers_all_keyword_groups() {
        assert_eq!(
            ServiceKind::classify("Recycling Collection Service"),
            ServiceKind::Recycling
        );
        assert_eq!(
            ServiceKind::classify("Garden Waste Collection Service"),
            ServiceKind::Garden
        );
        assert_eq!(
            ServiceKind::classify("GREEN BIN"),
            ServiceKind::Garden
        );
        assert_eq!(
            ServiceKind::classify("Domestic Waste Collection Service"),
            ServiceKind::Waste
        );
        assert_eq!(
            ServiceKind::classify("General refuse"),
            ServiceKind::Waste
        );
        assert_eq!(ServiceKind::classify("Bulky items"), ServiceKind::Other);
    }

    #[test]
    fn short_names_and_slugs_match_kinds() {
        assert_eq!(ServiceKind::Food.short_name(), "Food");
        assert_eq!(ServiceKind::Food.slug(), "food");
        assert_eq!(ServiceKind::Other.slug(), "default");
    }

    #[test]
    fn parses_both_upstream_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2025, 3, 15).expect("valid date");
        assert_eq!(parse_event_date("15/03/2025 00:00:00"), Some(expected));
        assert_eq!(parse_event_date("2025-03-15"), Some(expected));
        assert_eq!(parse_event_date("2025-03-15T06:30:00"), Some(expected));
        assert_eq!(parse_event_date("soon"), None);
    }

    #[test]
    fn display_date_falls_back_to_short_format() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 10).expect("valid date");
        let line = display_date(&event("15/03/2025 00:00:00", None), today);
        assert_eq!(line, "Sat, 15 Mar");
    }

    #[test]
    fn display_date_uses_read_date_verbatim() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 10).expect("valid date");
        let line = display_date(&event("2025-03-15", Some("Sat 15 Mar")), today);
        assert_eq!(line, "Sat 15 Mar");
    }

    #[test]
    fn display_date_marks_today_and_tomorrow() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 15).expect("valid date");
        assert_eq!(
            display_date(&event("2025-03-15", Some("Sat 15 Mar")), today),
            "Today (Sat 15 Mar)"
        );
        assert_eq!(
            display_date(&event("16/03/2025 00:00:00", None), today),
            "Tomorrow (Sun, 16 Mar)"
        );
    }

    #[test]
    fn display_date_passes_unparseable_input_through() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 15).expect("valid date");
        assert_eq!(display_date(&event("whenever", None), today), "whenever");
    }
}
