//! Date and time based note names

use std::fmt::Write;

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, FixedOffset, Local, Offset, Utc};
use chrono_tz::Tz;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum TimestampError {
    #[error("invalid timezone {0}: expected 'local', a zone name like 'Asia/Tokyo' or an offset like '+09:00'")]
    InvalidTimezone(String),
}

/// Kinds of timestamp-based note names
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StampKind {
    /// `YYYY-MM-DD-HHMM`
    Default,
    /// `YYYY-MM-DD`
    Daily,
    /// `YYYY-MM-DD-FHHMMSS`
    Fleeting,
    /// `YYYY-MM-DD-VTHHMMSS`
    Voice,
    /// `YYYY-MM`
    Monthly,
    /// `YYYY`
    Yearly,
}

impl StampKind {
    fn builtin_layout(self) -> &'static str {
        match self {
            StampKind::Default => "%Y-%m-%d-%H%M",
            StampKind::Daily => "%Y-%m-%d",
            StampKind::Fleeting => "%Y-%m-%d-F%H%M%S",
            StampKind::Voice => "%Y-%m-%d-VT%H%M%S",
            StampKind::Monthly => "%Y-%m",
            StampKind::Yearly => "%Y",
        }
    }
}

/// strftime overrides for the default and daily stamps
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Layouts {
    pub default: Option<String>,
    pub daily: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Zone {
    Local,
    Fixed(FixedOffset),
    Named(Tz),
}

/// Produces timestamp strings in a configured timezone
#[derive(Debug, Clone)]
pub struct TimestampGenerator {
    zone: Zone,
    layouts: Layouts,
}

impl TimestampGenerator {
    /// Creates a generator for `timezone`.
    ///
    /// Empty or `local` uses the system timezone. `UTC`/`Z`, fixed offsets
    /// such as `+09:00` and IANA names such as `Asia/Tokyo` are also
    /// accepted.
    pub fn new(timezone: &str) -> Result<Self, TimestampError> {
        let tz = timezone.trim();
        let zone = if tz.is_empty() || tz.eq_ignore_ascii_case("local") {
            Zone::Local
        } else if tz.eq_ignore_ascii_case("utc") || tz == "Z" {
            Zone::Fixed(Utc.fix())
        } else if let Ok(offset) = tz.parse::<FixedOffset>() {
            Zone::Fixed(offset)
        } else {
            let named = tz
                .parse::<Tz>()
                .map_err(|_| TimestampError::InvalidTimezone(tz.to_string()))?;
            Zone::Named(named)
        };

        Ok(Self {
            zone,
            layouts: Layouts::default(),
        })
    }

    /// Replaces the default/daily layouts with any valid overrides.
    /// Returns false if an override was rejected.
    pub fn apply_layouts(&mut self, layouts: Layouts) -> bool {
        let mut all_valid = true;
        for (slot, candidate) in [
            (&mut self.layouts.default, layouts.default),
            (&mut self.layouts.daily, layouts.daily),
        ] {
            match candidate {
                Some(layout) if is_valid_layout(&layout) => *slot = Some(layout),
                Some(_) => all_valid = false,
                None => {}
            }
        }
        all_valid
    }

    /// Current time in the configured zone
    pub fn now(&self) -> DateTime<FixedOffset> {
        match self.zone {
            Zone::Local => Local::now().fixed_offset(),
            Zone::Fixed(offset) => Utc::now().with_timezone(&offset),
            Zone::Named(tz) => Utc::now().with_timezone(&tz).fixed_offset(),
        }
    }

    pub fn stamp(&self, kind: StampKind) -> String {
        self.render(kind, &self.now())
    }

    /// Renders `kind` at a given instant
    pub fn render(&self, kind: StampKind, at: &DateTime<FixedOffset>) -> String {
        let layout = match kind {
            StampKind::Default => self.layouts.default.as_deref(),
            StampKind::Daily => self.layouts.daily.as_deref(),
            _ => None,
        };

        if let Some(layout) = layout {
            let mut out = String::new();
            if write!(out, "{}", at.format(layout)).is_ok() {
                return out;
            }
        }

        at.format(kind.builtin_layout()).to_string()
    }

    /// Today's date as `YYYY-MM-DD`, the scope key for analog counters.
    /// Layout overrides never apply here.
    pub fn current_date(&self) -> String {
        date_key(&self.now())
    }
}

/// `YYYY-MM-DD` for an instant
pub fn date_key(at: &DateTime<FixedOffset>) -> String {
    at.format("%Y-%m-%d").to_string()
}

fn is_valid_layout(layout: &str) -> bool {
    !layout.is_empty() && !StrftimeItems::new(layout).any(|item| matches!(item, Item::Error))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn instant() -> DateTime<FixedOffset> {
        FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2025, 11, 12, 9, 5, 7)
            .unwrap()
    }

    #[test]
    fn builtin_layouts() {
        let gen = TimestampGenerator::new("UTC").unwrap();
        let at = instant();

        assert_eq!(gen.render(StampKind::Default, &at), "2025-11-12-0905");
        assert_eq!(gen.render(StampKind::Daily, &at), "2025-11-12");
        assert_eq!(gen.render(StampKind::Fleeting, &at), "2025-11-12-F090507");
        assert_eq!(gen.render(StampKind::Voice, &at), "2025-11-12-VT090507");
        assert_eq!(gen.render(StampKind::Monthly, &at), "2025-11");
        assert_eq!(gen.render(StampKind::Yearly, &at), "2025");
    }

    #[test]
    fn accepts_timezones() {
        assert!(TimestampGenerator::new("").is_ok());
        assert!(TimestampGenerator::new("local").is_ok());
        assert!(TimestampGenerator::new("utc").is_ok());
        assert!(TimestampGenerator::new("+09:00").is_ok());
        assert!(TimestampGenerator::new("-05:30").is_ok());
    }

    #[test]
    fn accepts_named_zones() {
        let gen = TimestampGenerator::new("Asia/Tokyo").unwrap();
        assert_eq!(gen.now().offset().local_minus_utc(), 9 * 3600);

        assert!(TimestampGenerator::new("Europe/Berlin").is_ok());
        assert_eq!(
            TimestampGenerator::new("Invalid/Zone").unwrap_err(),
            TimestampError::InvalidTimezone("Invalid/Zone".into())
        );
    }

    #[test]
    fn rejects_unknown_timezone() {
        let err = TimestampGenerator::new("Mars/Olympus").unwrap_err();
        assert_eq!(err, TimestampError::InvalidTimezone("Mars/Olympus".into()));
    }

    #[test]
    fn layout_overrides_apply_to_default_and_daily_only() {
        let mut gen = TimestampGenerator::new("UTC").unwrap();
        assert!(gen.apply_layouts(Layouts {
            default: Some("%Y%m%d%H%M".into()),
            daily: Some("%d.%m.%Y".into()),
        }));

        let at = instant();
        assert_eq!(gen.render(StampKind::Default, &at), "202511120905");
        assert_eq!(gen.render(StampKind::Daily, &at), "12.11.2025");
        assert_eq!(gen.render(StampKind::Monthly, &at), "2025-11");
    }

    #[test]
    fn invalid_layout_is_ignored() {
        let mut gen = TimestampGenerator::new("UTC").unwrap();
        assert!(!gen.apply_layouts(Layouts {
            default: None,
            daily: Some("%d broken %".into()),
        }));

        assert_eq!(gen.render(StampKind::Daily, &instant()), "2025-11-12");
        assert_eq!(gen.render(StampKind::Default, &instant()), "2025-11-12-0905");
    }

    #[test]
    fn date_key_ignores_daily_override() {
        let mut gen = TimestampGenerator::new("UTC").unwrap();
        gen.apply_layouts(Layouts {
            default: None,
            daily: Some("%d.%m.%Y".into()),
        });

        let key = gen.current_date();
        assert_eq!(key.len(), 10);
        assert_eq!(&key[4..5], "-");
        assert_eq!(date_key(&instant()), "2025-11-12");
    }
}
