use time::macros::format_description;
use time::{Date, OffsetDateTime};

pub trait Clock {
    fn today(&self) -> Date;
}

/// Local calendar date, or UTC when the local offset cannot be determined.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> Date {
        OffsetDateTime::now_local()
            .unwrap_or_else(|_| OffsetDateTime::now_utc())
            .date()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub Date);

impl Clock for FixedClock {
    fn today(&self) -> Date {
        self.0
    }
}

pub fn format_date(date: Date) -> String {
    date.format(format_description!("[year]-[month]-[day]")).unwrap_or_default()
}

pub fn parse_date(raw: &str) -> Option<Date> {
    Date::parse(raw.trim(), format_description!("[year]-[month]-[day]")).ok()
}

pub fn today_iso(clock: &dyn Clock) -> String {
    format_date(clock.today())
}

pub fn resolve(word: &str, clock: &dyn Clock) -> Option<String> {
    let today = clock.today();
    let date = match word.trim().to_lowercase().as_str() {
        "today" => Some(today),
        "tomorrow" => today.next_day(),
        "yesterday" => today.previous_day(),
        _ => None,
    }?;
    Some(format_date(date))
}
