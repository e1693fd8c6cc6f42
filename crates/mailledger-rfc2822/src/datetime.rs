//! Date and time (RFC 2822 section 3.3 and the obsolete forms of 4.3).
//!
//! ```text
//! date-time   = [ day-of-week "," ] date FWS time [CFWS]
//! date        = day month year
//! time        = hour ":" minute [ ":" second ] FWS zone
//! zone        = ( "+" / "-" ) 4DIGIT / obs-zone
//! ```
//!
//! Following the obsolete grammar, CFWS is accepted around every token,
//! years may have two or three digits and zones may be named.

use std::fmt;

use chrono::{FixedOffset, Month, NaiveDate, NaiveTime, TimeZone, Weekday};

use crate::abnf::combinator::{alt, between, exactly, label, opt};
use crate::abnf::core_rules::{ALPHA, digit};
use crate::abnf::literal::{literal, one_of_ci};
use crate::cursor::{Cursor, PResult};
use crate::error::Error;
use crate::quoted::{cfws, opt_cfws};

const DAY_NAMES: &[&str] = &["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];
const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

const MONTH_NAMES: &[&str] = &[
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];
const MONTHS: [Month; 12] = [
    Month::January,
    Month::February,
    Month::March,
    Month::April,
    Month::May,
    Month::June,
    Month::July,
    Month::August,
    Month::September,
    Month::October,
    Month::November,
    Month::December,
];

// "UTC" is not RFC 2822 but is common in stored mail; it must precede "UT".
const ZONE_NAMES: &[&str] = &[
    "UTC", "UT", "GMT", "EST", "EDT", "CST", "CDT", "MST", "MDT", "PST", "PDT",
];
const ZONE_HOURS: [i32; 11] = [0, 0, 0, -5, -4, -6, -5, -7, -6, -8, -7];

/// UTC offset of a date-time.
///
/// An unknown zone (`-0000`, or an unrecognised letter) has offset zero and
/// `unknown` set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Zone {
    /// Signed offset from UTC in minutes.
    pub offset_minutes: i32,
    /// True if the message declared that the zone is not known.
    pub unknown: bool,
}

impl Zone {
    /// The unknown zone, written `-0000`.
    pub const UNKNOWN: Self = Self {
        offset_minutes: 0,
        unknown: true,
    };

    /// UTC.
    pub const UTC: Self = Self::from_minutes(0);

    /// Creates a known zone from an offset in minutes.
    #[must_use]
    pub const fn from_minutes(offset_minutes: i32) -> Self {
        Self {
            offset_minutes,
            unknown: false,
        }
    }

    /// Offset for a military zone letter, `None` for `J`.
    const fn military(letter: char) -> Option<Self> {
        let hours = match letter.to_ascii_uppercase() {
            c @ 'A'..='I' => c as i32 - 'A' as i32 + 1,
            c @ 'K'..='M' => c as i32 - 'K' as i32 + 10,
            c @ 'N'..='Y' => -(c as i32 - 'N' as i32 + 1),
            'Z' => 0,
            _ => return None,
        };
        Some(Self::from_minutes(hours * 60))
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.unknown {
            return f.write_str("-0000");
        }
        let sign = if self.offset_minutes < 0 { '-' } else { '+' };
        let minutes = self.offset_minutes.unsigned_abs();
        write!(f, "{sign}{:02}{:02}", minutes / 60, minutes % 60)
    }
}

/// A parsed RFC 2822 date-time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DateTime {
    /// Day of week, if given.
    pub day_of_week: Option<Weekday>,
    /// Day of month.
    pub day: u32,
    /// Month.
    pub month: Month,
    /// Four-digit year; two- and three-digit years are normalised.
    pub year: i32,
    /// Hour.
    pub hour: u32,
    /// Minute.
    pub minute: u32,
    /// Second, if given.
    pub second: Option<u32>,
    /// UTC offset.
    pub zone: Zone,
}

impl DateTime {
    /// Offset from UTC in minutes (zero for an unknown zone).
    #[must_use]
    pub const fn offset_minutes(&self) -> i32 {
        self.zone.offset_minutes
    }

    /// Returns true if the zone was declared unknown.
    #[must_use]
    pub const fn is_zone_unknown(&self) -> bool {
        self.zone.unknown
    }

    /// Converts to a `chrono` timestamp.
    ///
    /// Returns `None` if the fields do not form a valid calendar date and
    /// time (e.g. 31 February). An unknown zone converts as UTC.
    #[must_use]
    pub fn to_chrono(&self) -> Option<chrono::DateTime<FixedOffset>> {
        let offset = FixedOffset::east_opt(self.zone.offset_minutes * 60)?;
        let date = NaiveDate::from_ymd_opt(self.year, self.month.number_from_month(), self.day)?;
        let time = NaiveTime::from_hms_opt(self.hour, self.minute, self.second.unwrap_or(0))?;
        offset.from_local_datetime(&date.and_time(time)).single()
    }
}

impl fmt::Display for DateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(day_of_week) = self.day_of_week {
            write!(f, "{day_of_week}, ")?;
        }
        let month = MONTH_NAMES[self.month.number_from_month() as usize - 1];
        write!(
            f,
            "{} {month} {:04} {:02}:{:02}",
            self.day, self.year, self.hour, self.minute
        )?;
        if let Some(second) = self.second {
            write!(f, ":{second:02}")?;
        }
        write!(f, " {}", self.zone)
    }
}

/// Matches a full date-time, including surrounding CFWS.
///
/// # Errors
///
/// Fails if the date, hour, minute or zone is missing or malformed.
pub fn date_time(input: Cursor<'_>) -> PResult<'_, DateTime> {
    let ((), cursor) = opt_cfws(input)?;
    let (day_of_week, cursor) = opt(day_of_week)(cursor)?;
    let (day, cursor) = label("day", number(1, 2))(cursor)?;
    let ((), cursor) = cfws(cursor)?;
    let (month, cursor) = one_of_ci("month", MONTH_NAMES)(cursor)?;
    let ((), cursor) = cfws(cursor)?;
    let (year, cursor) = year(cursor)?;
    let ((), cursor) = cfws(cursor)?;
    let (hour, cursor) = label("hour", number(2, 2))(cursor)?;
    let (_, cursor) = time_colon(cursor)?;
    let (minute, cursor) = label("minute", number(2, 2))(cursor)?;
    let (second, cursor) = opt(seconds)(cursor)?;
    let ((), cursor) = cfws(cursor)?;
    let (zone, cursor) = zone(cursor)?;
    let ((), cursor) = opt_cfws(cursor)?;

    let value = DateTime {
        day_of_week,
        day,
        month: MONTHS[month],
        year,
        hour,
        minute,
        second,
        zone,
    };
    Ok((value, cursor))
}

fn day_of_week(input: Cursor<'_>) -> PResult<'_, Weekday> {
    let (index, cursor) = one_of_ci("day of week", DAY_NAMES)(input)?;
    let ((), cursor) = opt_cfws(cursor)?;
    let (_, cursor) = literal(",")(cursor)?;
    let ((), cursor) = opt_cfws(cursor)?;
    Ok((WEEKDAYS[index], cursor))
}

fn year(input: Cursor<'_>) -> PResult<'_, i32> {
    let (digits, cursor) = label("year", between(2, 4, digit))(input)?;
    let value = to_number(&digits);
    let value = match digits.len() {
        2 if value < 50 => value + 2000,
        2 | 3 => value + 1900,
        _ => value,
    };
    let year = i32::try_from(value).map_err(|_| input.fail("year"))?;
    Ok((year, cursor))
}

fn time_colon(input: Cursor<'_>) -> PResult<'_, ()> {
    let ((), cursor) = opt_cfws(input)?;
    let (_, cursor) = literal(":")(cursor)?;
    let ((), cursor) = opt_cfws(cursor)?;
    Ok(((), cursor))
}

fn seconds(input: Cursor<'_>) -> PResult<'_, u32> {
    let ((), cursor) = time_colon(input)?;
    label("second", number(2, 2))(cursor)
}

/// Matches a numeric or named zone.
///
/// # Errors
///
/// Fails if no zone is present.
pub fn zone(input: Cursor<'_>) -> PResult<'_, Zone> {
    label("zone", alt((numeric_zone, named_zone, military_zone)))(input)
}

fn numeric_zone(input: Cursor<'_>) -> PResult<'_, Zone> {
    let (sign, cursor) = alt((literal("+"), literal("-")))(input)?;
    let (digits, cursor) = exactly(4, digit)(cursor)?;
    let hours = to_number(&digits[..2]);
    let minutes = to_number(&digits[2..]);
    if minutes > 59 {
        return Err(input.fail("zone"));
    }
    let total = i32::try_from(hours * 60 + minutes).map_err(|_| input.fail("zone"))?;
    let zone = match (sign, total) {
        ("-", 0) => Zone::UNKNOWN,
        ("-", total) => Zone::from_minutes(-total),
        (_, total) => Zone::from_minutes(total),
    };
    Ok((zone, cursor))
}

fn named_zone(input: Cursor<'_>) -> PResult<'_, Zone> {
    let (index, cursor) = one_of_ci("zone", ZONE_NAMES)(input)?;
    not_followed_by_letter(cursor)?;
    Ok((Zone::from_minutes(ZONE_HOURS[index] * 60), cursor))
}

fn military_zone(input: Cursor<'_>) -> PResult<'_, Zone> {
    let (letter, cursor) = ALPHA.parse(input)?;
    not_followed_by_letter(cursor)?;
    Ok((Zone::military(letter).unwrap_or(Zone::UNKNOWN), cursor))
}

fn not_followed_by_letter(cursor: Cursor<'_>) -> Result<(), Error> {
    match cursor.peek() {
        Some(c) if ALPHA.contains(c) => Err(cursor.fail("zone")),
        _ => Ok(()),
    }
}

fn number<'a>(min: usize, max: usize) -> impl Fn(Cursor<'a>) -> PResult<'a, u32> {
    move |input| {
        let (digits, cursor) = between(min, max, digit)(input)?;
        Ok((to_number(&digits), cursor))
    }
}

fn to_number(digits: &[char]) -> u32 {
    digits
        .iter()
        .filter_map(|c| c.to_digit(10))
        .fold(0, |acc, d| acc * 10 + d)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::ParserConfig;

    fn parse(text: &str) -> DateTime {
        let (value, rest) = date_time(Cursor::new(text)).unwrap();
        assert!(rest.is_eof(), "residual input {:?}", rest.rest());
        value
    }

    #[test]
    fn test_full_date_time() {
        let dt = parse("Fri, 21 Nov 1997 09:55:06 -0600");
        assert_eq!(dt.day_of_week, Some(Weekday::Fri));
        assert_eq!(dt.day, 21);
        assert_eq!(dt.month, Month::November);
        assert_eq!(dt.year, 1997);
        assert_eq!((dt.hour, dt.minute, dt.second), (9, 55, Some(6)));
        assert_eq!(dt.offset_minutes(), -360);
        assert!(!dt.is_zone_unknown());
    }

    #[test]
    fn test_optional_fields_absent() {
        let dt = parse("1 Jan 2004 23:59 +0000");
        assert_eq!(dt.day_of_week, None);
        assert_eq!(dt.second, None);
        assert_eq!(dt.zone, Zone::UTC);
    }

    #[test]
    fn test_two_digit_years() {
        assert_eq!(parse("21 Nov 78 09:55 GMT").year, 1978);
        assert_eq!(parse("21 Nov 04 09:55 GMT").year, 2004);
        assert_eq!(parse("21 Nov 49 09:55 GMT").year, 2049);
        assert_eq!(parse("21 Nov 50 09:55 GMT").year, 1950);
    }

    #[test]
    fn test_three_digit_year() {
        assert_eq!(parse("21 Nov 103 09:55 GMT").year, 2003);
    }

    #[test]
    fn test_named_zones() {
        assert_eq!(parse("1 Jan 2000 00:00 EST").offset_minutes(), -300);
        assert_eq!(parse("1 Jan 2000 00:00 pdt").offset_minutes(), -420);
        assert_eq!(parse("1 Jan 2000 00:00 UT").offset_minutes(), 0);
    }

    #[test]
    fn test_military_zones() {
        assert_eq!(parse("1 Jan 2000 00:00 A").offset_minutes(), 60);
        assert_eq!(parse("1 Jan 2000 00:00 M").offset_minutes(), 720);
        assert_eq!(parse("1 Jan 2000 00:00 Y").offset_minutes(), -720);
        assert_eq!(parse("1 Jan 2000 00:00 Z").zone, Zone::UTC);
        assert_eq!(parse("1 Jan 2000 00:00 J").zone, Zone::UNKNOWN);
    }

    #[test]
    fn test_minus_zero_is_unknown() {
        let dt = parse("1 Jan 2000 00:00 -0000");
        assert!(dt.is_zone_unknown());
        assert_eq!(dt.offset_minutes(), 0);
        assert!(!parse("1 Jan 2000 00:00 +0000").is_zone_unknown());
    }

    #[test]
    fn test_comments_and_folds() {
        let dt = parse("Fri (day),\r\n 21 Nov (month) 1997\r\n 09 : 55 : 06 (zone) -0600 (CST)");
        assert_eq!(dt.day, 21);
        assert_eq!(dt.second, Some(6));
        assert_eq!(dt.offset_minutes(), -360);
    }

    #[test]
    fn test_lenient_fold() {
        let config = ParserConfig::stored();
        let (dt, _) = date_time(Cursor::with_config("21 Nov 1997\n 09:55 +0100", &config)).unwrap();
        assert_eq!(dt.offset_minutes(), 60);
        assert!(date_time(Cursor::new("21 Nov 1997\n 09:55 +0100")).is_err());
    }

    #[test]
    fn test_missing_zone_fails() {
        let err = date_time(Cursor::new("21 Nov 1997 09:55")).unwrap_err();
        assert_eq!(err.position(), 17);
    }

    #[test]
    fn test_missing_minute_fails() {
        let err = date_time(Cursor::new("21 Nov 1997 09 +0000")).unwrap_err();
        assert_eq!(err.expected(), ":");
        assert_eq!(err.position(), 15);
    }

    #[test]
    fn test_display_round_trip() {
        let text = "Fri, 21 Nov 1997 09:55:06 -0600";
        assert_eq!(parse(text).to_string(), text);
        assert_eq!(parse("1 Jan 04 00:00 -0000").to_string(), "1 Jan 2004 00:00 -0000");
    }

    #[test]
    fn test_zone_minutes_out_of_range() {
        let err = date_time(Cursor::new("21 Nov 1997 09:55 +0960")).unwrap_err();
        assert_eq!(err.expected(), "zone");
        assert_eq!(err.position(), 18);
        assert_eq!(parse("1 Jan 2000 00:00 +9959").to_string(), "1 Jan 2000 00:00 +9959");
    }

    #[test]
    fn test_to_chrono() {
        let dt = parse("Fri, 21 Nov 1997 09:55:06 -0600").to_chrono().unwrap();
        assert_eq!(dt.to_rfc3339(), "1997-11-21T09:55:06-06:00");
        assert!(parse("31 Feb 2000 00:00 +0000").to_chrono().is_none());
    }
}
