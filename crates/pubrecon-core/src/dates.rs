//! Lenient publication-date handling.
//!
//! Registries disagree about date precision: full dates, year-month,
//! bare years, and occasionally `00` placeholders for unknown parts.
//! Everything here degrades to `None` instead of failing.

use chrono::NaiveDate;

/// Parse a date-like string at whatever precision it carries: `YYYY`,
/// `YYYY-MM`, or `YYYY-MM-DD`, with `-` or `/` separators and an
/// optional trailing time component. Missing or zero month/day parts
/// default to January / the 1st.
pub fn parse_partial(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    let date_part = trimmed.split(['T', ' ']).next().unwrap_or_default();
    if date_part.is_empty() {
        return None;
    }

    let mut parts = date_part.split(['-', '/']);
    let year: i32 = parts.next()?.trim().parse().ok()?;
    if !(1000..=9999).contains(&year) {
        return None;
    }
    let month: u32 = match parts.next() {
        None => 1,
        Some(m) => m.trim().parse().ok()?,
    };
    let day: u32 = match parts.next() {
        None => 1,
        Some(d) => d.trim().parse().ok()?,
    };

    let month = if month == 0 { 1 } else { month };
    let day = if day == 0 { 1 } else { day };

    NaiveDate::from_ymd_opt(year, month, day)
}

/// Earliest successfully parsed date among the candidates; unparseable
/// entries are skipped, never an error.
pub fn earliest<'a, I>(candidates: I) -> Option<NaiveDate>
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    candidates
        .into_iter()
        .flatten()
        .filter_map(parse_partial)
        .min()
}

/// January 1 of the given year. This is the year-only fallback used by
/// the activity metrics; merging never invents a date from a bare year.
pub fn year_start(year: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, 1, 1)
}
