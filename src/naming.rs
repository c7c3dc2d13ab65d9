//! Article filename convention.
//!
//! Every article is named `YYYY-MM-DD-<slug-suffix>.md`. The first ten
//! characters are the publish date; the whole stem (date included) is the
//! post slug, used verbatim for the output filename and feed ids:
//!
//! - `2024-03-09-hello-world.md` → date=2024-03-09, slug=`2024-03-09-hello-world`
//! - `2024-03-09.md` → date=2024-03-09, slug=`2024-03-09`
//! - `notes.md` → rejected, name shorter than the date prefix
//! - `2024-13-01-x.md` → rejected, not a calendar date
//!
//! Anything after the date prefix is taken as-is. The separator after the
//! date is conventional, not checked.

use chrono::NaiveDate;
use thiserror::Error;

/// Length of the `YYYY-MM-DD` prefix.
pub const DATE_PREFIX_LEN: usize = 10;

/// Why an article filename was rejected.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NameError {
    #[error("filename shorter than the 10-character date prefix")]
    TooShort,
    #[error("'{0}' is not a YYYY-MM-DD date")]
    BadDate(String),
}

/// Result of parsing an article stem like `2024-03-09-hello-world`.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedName {
    pub date: NaiveDate,
    /// The full stem, date prefix included.
    pub slug: String,
}

/// Parse an article filename stem (extension already removed).
pub fn parse_post_name(stem: &str) -> Result<ParsedName, NameError> {
    if stem.chars().count() < DATE_PREFIX_LEN {
        return Err(NameError::TooShort);
    }
    let prefix: String = stem.chars().take(DATE_PREFIX_LEN).collect();
    let date = parse_date_prefix(&prefix).ok_or(NameError::BadDate(prefix))?;
    Ok(ParsedName {
        date,
        slug: stem.to_string(),
    })
}

/// Strictly parse `YYYY-MM-DD`: four, two and two ASCII digits.
fn parse_date_prefix(prefix: &str) -> Option<NaiveDate> {
    let bytes = prefix.as_bytes();
    let shaped = bytes.len() == DATE_PREFIX_LEN
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !shaped {
        return None;
    }
    NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn dated_name_with_suffix() {
        let p = parse_post_name("2024-03-09-hello-world").unwrap();
        assert_eq!(p.date, date(2024, 3, 9));
        assert_eq!(p.slug, "2024-03-09-hello-world");
    }

    #[test]
    fn date_only_name() {
        let p = parse_post_name("2024-03-09").unwrap();
        assert_eq!(p.date, date(2024, 3, 9));
        assert_eq!(p.slug, "2024-03-09");
    }

    #[test]
    fn separator_is_not_checked() {
        let p = parse_post_name("2024-03-09_notes").unwrap();
        assert_eq!(p.slug, "2024-03-09_notes");
    }

    #[test]
    fn short_name_rejected() {
        assert_eq!(parse_post_name("notes"), Err(NameError::TooShort));
        assert_eq!(parse_post_name(""), Err(NameError::TooShort));
        assert_eq!(parse_post_name("2024-03-0"), Err(NameError::TooShort));
    }

    #[test]
    fn undated_long_name_rejected() {
        assert_eq!(
            parse_post_name("about-this-site"),
            Err(NameError::BadDate("about-this".to_string()))
        );
    }

    #[test]
    fn impossible_dates_rejected() {
        assert!(matches!(
            parse_post_name("2024-13-01-x"),
            Err(NameError::BadDate(_))
        ));
        assert!(matches!(
            parse_post_name("2023-02-29-x"),
            Err(NameError::BadDate(_))
        ));
    }

    #[test]
    fn leap_day_accepted() {
        assert_eq!(parse_post_name("2024-02-29-x").unwrap().date, date(2024, 2, 29));
    }

    #[test]
    fn single_digit_fields_rejected() {
        assert!(matches!(
            parse_post_name("2024-3-9-hello"),
            Err(NameError::BadDate(_))
        ));
    }

    #[test]
    fn non_ascii_prefix_rejected() {
        assert!(matches!(
            parse_post_name("２０２４-03-09-x"),
            Err(NameError::BadDate(_))
        ));
    }

    #[test]
    fn error_messages() {
        assert_eq!(
            NameError::TooShort.to_string(),
            "filename shorter than the 10-character date prefix"
        );
        assert_eq!(
            NameError::BadDate("2024-99-99".into()).to_string(),
            "'2024-99-99' is not a YYYY-MM-DD date"
        );
    }
}
