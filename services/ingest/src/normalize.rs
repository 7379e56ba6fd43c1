//! Label and date normalization for spreadsheet content.
//!
//! Every free-text label that ends up in a dimension table (sheet titles,
//! parameter row labels) goes through `clean_name`, and every comparison
//! against a dimension goes through `lookup_key`, so "Mortgage loans",
//! " mortgage   loans " and "MORTGAGE LOANS" resolve to the same row.

use chrono::NaiveDate;

/// Month names exactly as the published header row spells them.
const RUSSIAN_MONTHS: [(&str, u32); 12] = [
    ("январь", 1),
    ("февраль", 2),
    ("март", 3),
    ("апрель", 4),
    ("май", 5),
    ("июнь", 6),
    ("июль", 7),
    ("август", 8),
    ("сентябрь", 9),
    ("октябрь", 10),
    ("ноябрь", 11),
    ("декабрь", 12),
];

/// Textual cell values the source files use for zero.
pub const ZERO_SENTINELS: [&str; 2] = ["0,0", "0,00"];

/// Collapse whitespace runs to single spaces, trim, and uppercase only the
/// first character. The rest of the string is left as published.
pub fn clean_name(raw: &str) -> String {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    let mut chars = collapsed.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => collapsed,
    }
}

/// Case-folded form of the cleaned name, used as the dimension cache key.
pub fn lookup_key(raw: &str) -> String {
    clean_name(raw).to_lowercase()
}

/// Result of header-date conversion. Conversion never fails: labels that
/// don't look like "<month name> <year>" come back as `Unparsed` and the
/// loader decides how strict to be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConvertedDate {
    /// Recognized "<month name> <4-digit year>", first day of that month.
    Canonical(NaiveDate),
    /// Everything else, unchanged.
    Unparsed(String),
}

impl ConvertedDate {
    /// Canonical rendering is "01.MM.YYYY"; unparsed labels render as-is.
    pub fn render(&self) -> String {
        match self {
            ConvertedDate::Canonical(date) => date.format("%d.%m.%Y").to_string(),
            ConvertedDate::Unparsed(raw) => raw.clone(),
        }
    }
}

/// Convert a header label like "Август 2023" to the first day of that month.
pub fn convert_date(label: &str) -> ConvertedDate {
    let lower = label.trim().to_lowercase();
    let mut tokens = lower.split_whitespace();
    let (Some(month_name), Some(year_str), None) = (tokens.next(), tokens.next(), tokens.next())
    else {
        return ConvertedDate::Unparsed(label.to_string());
    };

    let Some(&(_, month)) = RUSSIAN_MONTHS.iter().find(|(name, _)| *name == month_name) else {
        return ConvertedDate::Unparsed(label.to_string());
    };

    if year_str.len() != 4 || !year_str.chars().all(|c| c.is_ascii_digit()) {
        return ConvertedDate::Unparsed(label.to_string());
    }
    let Ok(year) = year_str.parse::<i32>() else {
        return ConvertedDate::Unparsed(label.to_string());
    };

    match NaiveDate::from_ymd_opt(year, month, 1) {
        Some(date) => ConvertedDate::Canonical(date),
        None => ConvertedDate::Unparsed(label.to_string()),
    }
}
