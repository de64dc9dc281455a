//! Display formatting for todo timestamps.
//!
//! The format string is a feature mask, not a template: each recognised
//! token switches a field on, and the fields are laid out in en-US order
//! (`MM/DD/YY, h:mm AM`) whatever order the tokens appear in.
//!
//! | token | effect                                 |
//! |-------|----------------------------------------|
//! | `YY`  | 2-digit year                           |
//! | `MM`  | 2-digit month                          |
//! | `DD`  | 2-digit day                            |
//! | `hh`  | hour                                   |
//! | `mm`  | minute                                 |
//! | `A`   | 12-hour clock with AM/PM, else 24-hour |
//! | `z`   | render in UTC instead of the local zone |

use chrono::{DateTime, Datelike, Duration, Local, NaiveDate, NaiveDateTime, Offset, TimeZone, Timelike, Utc};

pub const DEFAULT_FORMAT: &str = "YY-MM-DD hh:mm A";

/// Output for anything that does not describe a valid instant.
pub const INVALID_DATE: &str = "Invalid Date";

/// Minute-precision date-times carrying an offset. `Z` is rewritten to
/// `+00:00` before matching.
const OFFSET_PATTERNS: &[&str] = &["%Y-%m-%dT%H:%M%:z"];

/// Offset-less date-times are read as wall time in the formatter's zone.
const LOCAL_PATTERNS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S%.f"];

/// Which fields a format string selects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FormatSpec {
    pub year: bool,
    pub month: bool,
    pub day: bool,
    pub hour: bool,
    pub minute: bool,
    pub hour12: bool,
    pub utc: bool,
}

impl FormatSpec {
    pub fn parse(format: &str) -> Self {
        Self {
            year: format.contains("YY"),
            month: format.contains("MM"),
            day: format.contains("DD"),
            hour: format.contains("hh"),
            minute: format.contains("mm"),
            hour12: format.contains('A'),
            utc: format.contains('z'),
        }
    }

    fn has_fields(&self) -> bool {
        self.year || self.month || self.day || self.hour || self.minute
    }
}

/// Format `input` in the local zone. See [`DateTimeFormatter::format`].
pub fn format_date_time(input: &str, offset_hours: Option<f64>, format: Option<&str>) -> String {
    DateTimeFormatter::new(Local).format(input, offset_hours, format)
}

/// Formatter bound to the zone that stands in for "local time".
#[derive(Debug, Clone)]
pub struct DateTimeFormatter<Tz: TimeZone> {
    zone: Tz,
}

impl<Tz: TimeZone> DateTimeFormatter<Tz> {
    pub fn new(zone: Tz) -> Self {
        Self { zone }
    }

    /// Current offset of the zone from UTC, in hours.
    pub fn current_offset_hours(&self) -> f64 {
        self.offset_seconds_at(&Utc::now()) as f64 / 3600.0
    }

    /// Render `input` shifted by `offset_hours`.
    ///
    /// The parsed instant is first normalised by subtracting the zone's own
    /// offset at that instant, then moved by `offset_hours` (default: the
    /// zone's current offset). Unparseable input, a non-finite offset or an
    /// out-of-range result yields [`INVALID_DATE`].
    pub fn format(&self, input: &str, offset_hours: Option<f64>, format: Option<&str>) -> String {
        let offset_hours = offset_hours.unwrap_or_else(|| self.current_offset_hours());
        let spec = FormatSpec::parse(format.unwrap_or(DEFAULT_FORMAT));
        match self.display_instant(input, offset_hours) {
            Some(instant) => self.render(instant, spec),
            None => INVALID_DATE.to_string(),
        }
    }

    fn display_instant(&self, input: &str, offset_hours: f64) -> Option<DateTime<Utc>> {
        if !offset_hours.is_finite() {
            return None;
        }
        let instant = self.parse(input)?;
        let utc_equivalent = instant.checked_sub_signed(Duration::seconds(self.offset_seconds_at(&instant)))?;
        let shift = Duration::try_milliseconds((offset_hours * 3_600_000.0).round() as i64)?;
        utc_equivalent.checked_add_signed(shift)
    }

    fn parse(&self, input: &str) -> Option<DateTime<Utc>> {
        let input = input.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
            return Some(dt.with_timezone(&Utc));
        }
        let zulu = match input.strip_suffix('Z') {
            Some(rest) => format!("{rest}+00:00"),
            None => input.to_string(),
        };
        if let Some(dt) = OFFSET_PATTERNS
            .iter()
            .find_map(|pattern| DateTime::parse_from_str(&zulu, pattern).ok())
        {
            return Some(dt.with_timezone(&Utc));
        }
        if let Some(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d").ok().or_else(|| partial_date(input)) {
            return Some(Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0)?));
        }
        LOCAL_PATTERNS.iter().find_map(|pattern| {
            let naive = NaiveDateTime::parse_from_str(input, pattern).ok()?;
            self.zone
                .from_local_datetime(&naive)
                .earliest()
                .map(|dt| dt.with_timezone(&Utc))
        })
    }

    fn offset_seconds_at(&self, instant: &DateTime<Utc>) -> i64 {
        let offset = self.zone.offset_from_utc_datetime(&instant.naive_utc());
        i64::from(offset.fix().local_minus_utc())
    }

    fn render(&self, instant: DateTime<Utc>, spec: FormatSpec) -> String {
        let wall = if spec.utc {
            instant.naive_utc()
        } else {
            instant.with_timezone(&self.zone).naive_local()
        };
        render_fields(&wall, spec)
    }
}

/// `YYYY` or `YYYY-MM`, pinned to the first day of the period.
fn partial_date(input: &str) -> Option<NaiveDate> {
    let digits = |part: &str, len: usize| part.len() == len && part.bytes().all(|b| b.is_ascii_digit());
    match input.split_once('-') {
        None if digits(input, 4) => NaiveDate::from_ymd_opt(input.parse().ok()?, 1, 1),
        Some((year, month)) if digits(year, 4) && digits(month, 2) => {
            NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, 1)
        }
        _ => None,
    }
}

fn render_fields(wall: &NaiveDateTime, spec: FormatSpec) -> String {
    if !spec.has_fields() {
        return format!("{}/{}/{}", wall.month(), wall.day(), wall.year());
    }

    let mut date = Vec::with_capacity(3);
    if spec.month {
        date.push(format!("{:02}", wall.month()));
    }
    if spec.day {
        date.push(format!("{:02}", wall.day()));
    }
    if spec.year {
        date.push(format!("{:02}", wall.year().rem_euclid(100)));
    }
    let date = date.join("/");

    let time = match (spec.hour, spec.minute) {
        (true, true) => with_meridiem(format!("{}:{:02}", hour_text(wall, spec), wall.minute()), wall, spec),
        (true, false) => with_meridiem(hour_text(wall, spec), wall, spec),
        (false, true) => wall.minute().to_string(),
        (false, false) => String::new(),
    };

    match (date.is_empty(), time.is_empty()) {
        (false, false) => format!("{date}, {time}"),
        (false, true) => date,
        _ => time,
    }
}

fn hour_text(wall: &NaiveDateTime, spec: FormatSpec) -> String {
    if spec.hour12 {
        wall.hour12().1.to_string()
    } else {
        format!("{:02}", wall.hour())
    }
}

fn with_meridiem(time: String, wall: &NaiveDateTime, spec: FormatSpec) -> String {
    if !spec.hour12 {
        return time;
    }
    let marker = if wall.hour12().0 { "PM" } else { "AM" };
    format!("{time} {marker}")
}
