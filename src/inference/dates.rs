use crate::table::Value;
use chrono::NaiveDate;
use chrono::NaiveDateTime;
use chrono::NaiveTime;
use regex::Captures;
use regex::Regex;
use std::sync::LazyLock;

/// Time of day suffix shared by both layouts
const TIME: &str = r"(?:[ T]+(\d{1,2}):(\d{2})(?::(\d{2})(?:[.,](\d{1,9}))?)?)?";

/// D/M/Y, D-M-Y or D.M.Y with a 2 or 4 digit year
static DAY_FIRST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"^(\d{{1,2}})[/.\-](\d{{1,2}})[/.\-](\d{{4}}|\d{{2}}){TIME}$")).expect("Hardcode regex pattern")
});

/// Y-M-D or Y/M/D
static YEAR_FIRST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"^(\d{{4}})[/.\-](\d{{1,2}})[/.\-](\d{{1,2}}){TIME}$")).expect("Hardcode regex pattern")
});

/// Two digit years below this pivot are in the 2000s.
const CENTURY_PIVOT: i32 = 69;

/// Parses a date written day before month. When the day-first reading is not
/// a calendar date but the month-first one is, the month-first one is used.
pub fn parse_day_first(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    if let Some(captures) = DAY_FIRST.captures(text) {
        let first = number(&captures, 1)?;
        let second = number(&captures, 2)?;
        let year = expand_year(&captures[3])?;
        let date = NaiveDate::from_ymd_opt(year, second, first).or_else(|| NaiveDate::from_ymd_opt(year, first, second))?;
        return Some(date.and_time(time_of_day(&captures)?));
    }
    if let Some(captures) = YEAR_FIRST.captures(text) {
        let year = captures[1].parse::<i32>().ok()?;
        let date = NaiveDate::from_ymd_opt(year, number(&captures, 2)?, number(&captures, 3)?)?;
        return Some(date.and_time(time_of_day(&captures)?));
    }
    None
}

/// Date reading of a cell: dates are kept, text is parsed, anything else is missing.
pub fn to_date(value: &Value) -> Value {
    match value {
        Value::Date(date) => Value::Date(*date),
        Value::Text(text) => parse_day_first(text).map(Value::Date).unwrap_or_default(),
        _ => Value::Missing,
    }
}

fn number(captures: &Captures, index: usize) -> Option<u32> {
    captures.get(index)?.as_str().parse().ok()
}

fn expand_year(digits: &str) -> Option<i32> {
    let year = digits.parse::<i32>().ok()?;
    Some(match digits.len() {
        2 if year < CENTURY_PIVOT => 2000 + year,
        2 => 1900 + year,
        _ => year,
    })
}

fn time_of_day(captures: &Captures) -> Option<NaiveTime> {
    let Some(hour) = number(captures, 4) else {
        return Some(NaiveTime::MIN);
    };
    let minute = number(captures, 5)?;
    let second = number(captures, 6).unwrap_or(0);
    let nanosecond = match captures.get(7) {
        Some(fraction) => format!("{:0<9}", fraction.as_str()).parse::<u32>().ok()?,
        None => 0,
    };
    NaiveTime::from_hms_nano_opt(hour, minute, second, nanosecond)
}
