//! Calendar invite (.ics) export for a single tour stop.

use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;
use icalendar::{Calendar, Component, EventLike};

use crate::config::{INVITE_DURATION_HOURS, InviteSettings};
use crate::error::{TourError, TourResult};

const UTC_FORMAT: &str = "%Y%m%dT%H%M%SZ";

/// Time zone the placeholder start hour is interpreted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InviteZone {
    Local,
    Named(Tz),
}

impl InviteZone {
    pub fn from_config(name: Option<&str>) -> TourResult<Self> {
        match name {
            None => Ok(InviteZone::Local),
            Some(name) => name
                .parse::<Tz>()
                .map(InviteZone::Named)
                .map_err(|e| TourError::Config(format!("Unknown timezone '{}': {}", name, e))),
        }
    }
}

/// A generated calendar invite, ready to be saved or served.
#[derive(Debug, Clone)]
pub struct Invite {
    pub uid: String,
    pub title: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub stamp: DateTime<Utc>,
    ics: String,
}

impl Invite {
    /// Build an invite for `date` (YYYY-MM-DD) at the configured start hour
    /// in `tz`. Fails with `InvalidDate` for malformed or missing dates.
    pub fn build<T: TimeZone>(
        title: &str,
        date: &str,
        tz: &T,
        stamp: DateTime<Utc>,
        settings: &InviteSettings,
    ) -> TourResult<Self> {
        let day = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
            .map_err(|_| TourError::InvalidDate(date.to_string()))?;
        let local_start = day
            .and_hms_opt(settings.start_hour, 0, 0)
            .ok_or_else(|| TourError::InvalidDate(date.to_string()))?;

        // A start hour inside a DST gap has no local instant
        let start = tz
            .from_local_datetime(&local_start)
            .earliest()
            .ok_or_else(|| TourError::InvalidDate(date.to_string()))?
            .with_timezone(&Utc);
        let end = Some(settings.duration_hours)
            .filter(|h| INVITE_DURATION_HOURS.contains(h))
            .and_then(Duration::try_hours)
            .and_then(|length| start.checked_add_signed(length))
            .ok_or_else(|| {
                TourError::Config(format!(
                    "invite.duration_hours must be 1-24, got {}",
                    settings.duration_hours
                ))
            })?;

        let uid = uuid::Uuid::new_v4().to_string();
        let ics = generate_ics(&uid, title, start, end, stamp, settings);

        Ok(Invite {
            uid,
            title: title.to_string(),
            start,
            end,
            stamp,
            ics,
        })
    }

    /// Build with the current time as DTSTAMP.
    pub fn for_zone(
        title: &str,
        date: &str,
        zone: InviteZone,
        settings: &InviteSettings,
    ) -> TourResult<Self> {
        let now = Utc::now();
        match zone {
            InviteZone::Local => Self::build(title, date, &chrono::Local, now, settings),
            InviteZone::Named(tz) => Self::build(title, date, &tz, now, settings),
        }
    }

    pub fn ics(&self) -> &str {
        &self.ics
    }

    pub fn file_name(&self) -> String {
        file_name_for(&self.title)
    }

    /// Write the invite into `dir`. The content goes to a temporary file
    /// first and is moved into place once complete.
    pub fn save(&self, dir: &Path) -> TourResult<PathBuf> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(self.file_name());

        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(self.ics.as_bytes())?;
        tmp.persist(&path).map_err(|e| TourError::Io(e.error))?;

        tracing::info!(path = %path.display(), uid = %self.uid, "Saved calendar invite");
        Ok(path)
    }
}

/// Invite file name: whitespace runs become `_`, path separators and quotes
/// are replaced, control characters dropped, `.ics` is appended. The result
/// is safe inside a quoted `Content-Disposition` filename.
pub fn file_name_for(title: &str) -> String {
    let mut name = String::with_capacity(title.len() + 4);
    let mut in_space = false;

    for c in title.chars() {
        if c.is_whitespace() {
            if !in_space {
                name.push('_');
            }
            in_space = true;
            continue;
        }
        in_space = false;
        match c {
            '/' | '\\' | ':' | '"' => name.push('_'),
            c if c.is_control() => {}
            _ => name.push(c),
        }
    }

    if name.is_empty() {
        name.push_str("invite");
    }
    name.push_str(".ics");
    name
}

fn generate_ics(
    uid: &str,
    title: &str,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    stamp: DateTime<Utc>,
    settings: &InviteSettings,
) -> String {
    let mut cal = Calendar::new();

    let mut ics_event = icalendar::Event::new();
    ics_event.uid(uid);
    ics_event.add_property("DTSTAMP", stamp.format(UTC_FORMAT).to_string());
    ics_event.add_property("DTSTART", start.format(UTC_FORMAT).to_string());
    ics_event.add_property("DTEND", end.format(UTC_FORMAT).to_string());
    ics_event.summary(title);
    ics_event.description(&settings.description);

    cal.push(ics_event.done());
    let cal = cal.done();

    strip_ics_bloat(&cal.to_string(), &settings.product_id)
}

/// Swap in our PRODID and drop the default CALSCALE line, normalizing
/// line endings to CRLF.
fn strip_ics_bloat(ics: &str, product_id: &str) -> String {
    let mut result = String::with_capacity(ics.len());

    for line in ics.lines() {
        if line.starts_with("PRODID:") {
            result.push_str("PRODID:");
            result.push_str(product_id);
            result.push_str("\r\n");
            continue;
        }

        if line == "CALSCALE:GREGORIAN" {
            continue;
        }

        result.push_str(line);
        result.push_str("\r\n");
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;
    use icalendar::{
        CalendarDateTime, DatePerhapsTime,
        parser::{read_calendar, unfold},
    };

    fn stamp() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 10, 1, 9, 30, 0).unwrap()
    }

    fn parsed_utc(ics: &str, name: &str) -> DateTime<Utc> {
        let unfolded = unfold(ics);
        let calendar = read_calendar(&unfolded).unwrap();
        let vevent = calendar.components.iter().find(|c| c.name == "VEVENT").unwrap();
        match DatePerhapsTime::try_from(vevent.find_prop(name).unwrap()).unwrap() {
            DatePerhapsTime::DateTime(CalendarDateTime::Utc(dt)) => dt,
            other => panic!("{} should be a UTC datetime, got {:?}", name, other),
        }
    }

    #[test]
    fn test_start_is_local_afternoon_in_utc() {
        let tz: Tz = "America/New_York".parse().unwrap();
        let invite = Invite::build(
            "University Swings at University of Michigan",
            "2025-11-08",
            &tz,
            stamp(),
            &InviteSettings::default(),
        )
        .unwrap();

        // 14:00 EST
        assert_eq!(invite.start, Utc.with_ymd_and_hms(2025, 11, 8, 19, 0, 0).unwrap());
        assert_eq!(invite.end - invite.start, Duration::hours(2));
        assert!(invite.ics().contains("DTSTART:20251108T190000Z\r\n"), "{}", invite.ics());
        assert!(invite.ics().contains("DTEND:20251108T210000Z\r\n"));
        assert!(invite.ics().contains("DTSTAMP:20251001T093000Z\r\n"));
    }

    #[test]
    fn test_document_fields() {
        let invite = Invite::build("Test Stop", "2025-09-06", &Utc, stamp(), &InviteSettings::default()).unwrap();
        let ics = invite.ics();

        assert!(ics.starts_with("BEGIN:VCALENDAR\r\n"));
        assert!(ics.contains("VERSION:2.0\r\n"));
        assert!(ics.contains("PRODID:-//University Swings//EN\r\n"));
        assert!(!ics.contains("CALSCALE"));
        assert!(ics.contains(&format!("UID:{}\r\n", invite.uid)));
        assert!(ics.contains("SUMMARY:Test Stop\r\n"));
        assert!(ics.contains("DESCRIPTION:Mobile golf simulator campus tour\r\n"));
        assert_eq!(ics.matches("BEGIN:VEVENT").count(), 1);
        assert_eq!(ics.lines().filter(|l| l.starts_with("DTSTAMP:")).count(), 1);
        assert_eq!(ics.lines().filter(|l| l.starts_with("UID:")).count(), 1);
    }

    #[test]
    fn test_round_trip_through_parser() {
        let tz = FixedOffset::west_opt(5 * 3600).unwrap();
        let title = "University Swings at Purdue University";
        let invite = Invite::build(title, "2025-11-15", &tz, stamp(), &InviteSettings::default()).unwrap();

        let start = parsed_utc(invite.ics(), "DTSTART");
        let end = parsed_utc(invite.ics(), "DTEND");
        assert_eq!(start, invite.start);
        assert_eq!(end - start, Duration::hours(2));

        let unfolded = unfold(invite.ics());
        let calendar = read_calendar(&unfolded).unwrap();
        let vevent = calendar.components.iter().find(|c| c.name == "VEVENT").unwrap();
        assert_eq!(vevent.find_prop("SUMMARY").unwrap().val.as_ref(), title);
    }

    #[test]
    fn test_uids_are_fresh() {
        let settings = InviteSettings::default();
        let a = Invite::build("A", "2025-09-06", &Utc, stamp(), &settings).unwrap();
        let b = Invite::build("A", "2025-09-06", &Utc, stamp(), &settings).unwrap();
        assert_ne!(a.uid, b.uid);
    }

    #[test]
    fn test_malformed_date_is_reported() {
        let settings = InviteSettings::default();
        for bad in ["", "2025-13-01", "Nov 8", "2025-02-30"] {
            let err = Invite::build("X", bad, &Utc, stamp(), &settings).unwrap_err();
            assert!(matches!(err, TourError::InvalidDate(_)), "{:?} -> {:?}", bad, err);
        }
    }

    #[test]
    fn test_custom_settings() {
        let settings = InviteSettings {
            start_hour: 18,
            duration_hours: 3,
            ..InviteSettings::default()
        };
        let invite = Invite::build("Night", "2025-11-15", &Utc, stamp(), &settings).unwrap();
        assert_eq!(invite.start, Utc.with_ymd_and_hms(2025, 11, 15, 18, 0, 0).unwrap());
        assert_eq!(invite.end, Utc.with_ymd_and_hms(2025, 11, 15, 21, 0, 0).unwrap());
    }

    #[test]
    fn test_file_name() {
        assert_eq!(
            file_name_for("University Swings at Penn State University"),
            "University_Swings_at_Penn_State_University.ics"
        );
        assert_eq!(file_name_for("a  \t b"), "a_b.ics");
        assert_eq!(file_name_for("../etc/passwd"), ".._etc_passwd.ics");
        assert_eq!(file_name_for(""), "invite.ics");
        assert_eq!(file_name_for("The \"U\"\u{7}"), "The__U_.ics");
    }

    #[test]
    fn test_save_writes_complete_file() {
        let dir = tempfile::tempdir().unwrap();
        let invite = Invite::build("Club Night", "2025-11-15", &Utc, stamp(), &InviteSettings::default()).unwrap();

        let path = invite.save(&dir.path().join("downloads")).unwrap();
        assert_eq!(path.file_name().unwrap(), "Club_Night.ics");
        assert_eq!(std::fs::read_to_string(&path).unwrap(), invite.ics());

        // Only the final file remains
        let entries = std::fs::read_dir(dir.path().join("downloads")).unwrap().count();
        assert_eq!(entries, 1);
    }

    #[test]
    fn test_zone_from_config() {
        assert_eq!(InviteZone::from_config(None).unwrap(), InviteZone::Local);
        assert!(matches!(
            InviteZone::from_config(Some("Europe/Berlin")).unwrap(),
            InviteZone::Named(_)
        ));
        assert!(InviteZone::from_config(Some("Mars/Olympus")).is_err());
    }

    #[test]
    fn test_duration_outside_range_is_refused() {
        for hours in [-2, 0, 25, 10_000_000_000, i64::MAX] {
            let settings = InviteSettings {
                duration_hours: hours,
                ..InviteSettings::default()
            };
            let err = Invite::build("X", "2025-11-15", &Utc, stamp(), &settings).unwrap_err();
            assert!(matches!(err, TourError::Config(_)), "{} -> {:?}", hours, err);
        }
    }
}
