use crate::table::Value;
use chrono::Duration;
use chrono::NaiveDate;
use chrono::NaiveDateTime;
use chrono::NaiveTime;

/// Largest serial number Excel can display as a date (9999-12-31).
const MAX_DATE_SERIAL: f64 = 2_958_465.0;

/// Types of cell data in spreadsheet files.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub(crate) enum CellType {
    #[default]
    Empty,
    /// Boolean values (true/false)
    Boolean,
    /// Numeric values
    Number,
    /// Date/time values stored as numbers from 1900 epoch
    NumberDateTime1900,
    /// Date values stored as numbers from 1900 epoch
    NumberDate1900,
    /// Time values stored as numbers from 1900 epoch
    NumberTime1900,
    /// Date/time values stored as numbers from 1904 epoch
    NumberDateTime1904,
    /// Date values stored as numbers from 1904 epoch
    NumberDate1904,
    /// Time values stored as numbers from 1904 epoch
    NumberTime1904,
    /// ISO 8601 date/time strings
    IsoDateTime,
    /// Inline string values
    InlineString,
    /// Shared string table references
    SharedString,
    /// Error values
    Error,
}

impl CellType {
    /// Parses built-in Excel number format IDs to determine cell type.
    pub(crate) fn parse_builtin_number_format_id(id: &str, is_1904: bool) -> Option<Self> {
        match id {
            "22" => Some(if is_1904 { Self::NumberDateTime1904 } else { Self::NumberDateTime1900 }),
            "14" | "15" | "16" | "17" => Some(if is_1904 { Self::NumberDate1904 } else { Self::NumberDate1900 }),
            "18" | "19" | "20" | "21" | "45" | "46" | "47" => {
                Some(if is_1904 { Self::NumberTime1904 } else { Self::NumberTime1900 })
            }
            _ => None,
        }
    }

    /// Parses custom number format strings to determine cell type.
    /// Quoted literals, escapes and bracketed sections (colors, locales) are ignored.
    pub(crate) fn parse_custom_number_format(format: &str, is_1904: bool) -> Self {
        let mut is_escaped = false;
        let mut is_literal = false;
        let mut is_date = false;
        let mut is_time = false;
        let mut is_bracket = false;
        for character in format.chars() {
            match character {
                _ if is_escaped => is_escaped = false,
                '_' | '\\' => is_escaped = true,

                '"' if is_literal => is_literal = false,
                '"' if !is_bracket => is_literal = true,

                ']' if is_bracket => is_bracket = false,
                '[' if !is_literal => is_bracket = true,
                _ if is_literal || is_bracket => (),

                'Y' | 'y' | 'D' | 'd' => is_date = true,
                'H' | 'h' | 'S' | 's' => is_time = true,
                _ => (),
            }
        }

        match (is_date, is_time, is_1904) {
            (true, true, false) => Self::NumberDateTime1900,
            (true, true, true) => Self::NumberDateTime1904,
            (true, false, false) => Self::NumberDate1900,
            (true, false, true) => Self::NumberDate1904,
            (false, true, false) => Self::NumberTime1900,
            (false, true, true) => Self::NumberTime1904,
            (false, false, _) => Self::Number,
        }
    }

    fn is_1904(&self) -> bool {
        matches!(
            self,
            CellType::NumberDateTime1904 | CellType::NumberDate1904 | CellType::NumberTime1904
        )
    }
}

/// Represents a single cell in a spreadsheet with position, type, and raw value.
#[derive(Clone, Debug)]
pub(crate) struct Cell {
    /// Row index (0-based)
    pub(crate) row: usize,
    /// Column index (0-based)
    pub(crate) col: usize,
    /// Cell data type
    pub(crate) kind: CellType,
    /// Cell value as stored in the worksheet
    pub(crate) value: String,
}

impl Cell {
    /// Converts the raw cell into a table value. Values that cannot be
    /// interpreted in their declared type become text or missing, never errors.
    pub(crate) fn to_value(&self, shared_strings: &[String]) -> Value {
        let value = match self.kind {
            CellType::Empty | CellType::Error => Value::Missing,
            CellType::Boolean => Value::Bool(self.value == "1" || self.value.eq_ignore_ascii_case("true")),
            CellType::Number => match self.value.trim().parse::<f64>() {
                Ok(number) => Value::Number(number),
                Err(_) => Value::Text(self.value.to_owned()),
            },
            CellType::NumberDateTime1900
            | CellType::NumberDate1900
            | CellType::NumberDateTime1904
            | CellType::NumberDate1904 => self
                .value
                .trim()
                .parse::<f64>()
                .ok()
                .and_then(|serial| serial_to_datetime(serial, self.kind.is_1904()))
                .map(Value::Date)
                .unwrap_or_default(),
            CellType::NumberTime1900 | CellType::NumberTime1904 => self
                .value
                .trim()
                .parse::<f64>()
                .map(|fraction| Value::Text(to_time_string(fraction)))
                .unwrap_or_default(),
            CellType::IsoDateTime => parse_iso_datetime(&self.value)
                .map(Value::Date)
                .unwrap_or_else(|| Value::Text(self.value.to_owned())),
            CellType::InlineString => Value::Text(self.value.to_owned()),
            CellType::SharedString => self
                .value
                .trim()
                .parse::<usize>()
                .ok()
                .and_then(|index| shared_strings.get(index))
                .map(|text| Value::Text(text.to_owned()))
                .unwrap_or_default(),
        };
        match value {
            Value::Text(text) if text.is_empty() => Value::Missing,
            value => value,
        }
    }
}

/// Converts an Excel serial number to a date and time.
/// Handles the Lotus 1-2-3 leap year bug of the 1900 date system.
pub(crate) fn serial_to_datetime(serial: f64, is_1904: bool) -> Option<NaiveDateTime> {
    if !(0.0..=MAX_DATE_SERIAL).contains(&serial) {
        return None;
    }
    let days = serial.trunc() as i64;
    let offset = if is_1904 {
        1462
    } else if days < 60 {
        1
    } else {
        0
    };
    let date = NaiveDate::from_ymd_opt(1899, 12, 30)? + Duration::days(days + offset);
    let milliseconds = (serial.fract() * 86_400_000f64).round() as i64;
    Some(date.and_time(NaiveTime::MIN) + Duration::milliseconds(milliseconds))
}

/// Converts an Excel time fraction to an `HH:MM:SS` string.
pub(crate) fn to_time_string(fraction: f64) -> String {
    let mut seconds = (fraction.fract().abs() * 86_400f64).round() as i64;
    let hours = seconds / 3600;
    seconds %= 3600;
    let minutes = seconds / 60;
    seconds %= 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}

fn parse_iso_datetime(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .map(|date| date.and_time(NaiveTime::MIN))
        })
}
