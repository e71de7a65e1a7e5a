//! DATETIME and TIMESTAMP values.
//!
//! The binary form is one length byte followed by the shortest body that
//! keeps every non-zero field:
//!
//! ```text
//! 0  -> (nothing)                         zero date
//! 4  -> year(2) month day                 midnight
//! 7  -> year(2) month day hour min sec    whole seconds
//! 11 -> ... micros(4)                     sub-second
//! ```

use bytes::BufMut;
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Timelike, Utc};

use crate::codec::{encode_u16, encode_u32};
use crate::error::{BindError, BindResult};

/// A calendar moment as sent to the server. Fields are not range-checked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Datetime {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    pub micros: u32,
}

/// A moment whose column value the server assigns (TIMESTAMP).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Timestamp(pub Datetime);

impl Datetime {
    /// Midnight on the given date.
    pub fn date(year: u16, month: u8, day: u8) -> Self {
        Self {
            year,
            month,
            day,
            ..Self::default()
        }
    }

    pub fn with_time(mut self, hour: u8, minute: u8, second: u8) -> Self {
        self.hour = hour;
        self.minute = minute;
        self.second = second;
        self
    }

    pub fn with_micros(mut self, micros: u32) -> Self {
        self.micros = micros;
        self
    }

    /// `0000-00-00 00:00:00`
    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }

    /// Convert to chrono. `None` for the zero date and out-of-range fields.
    pub fn to_naive(&self) -> Option<NaiveDateTime> {
        NaiveDate::from_ymd_opt(self.year as i32, self.month as u32, self.day as u32)?
            .and_hms_micro_opt(
                self.hour as u32,
                self.minute as u32,
                self.second as u32,
                self.micros,
            )
    }

    /// Body length of the binary encoding (the length byte itself excluded).
    pub fn body_len(&self) -> usize {
        if self.micros != 0 {
            11
        } else if self.hour != 0 || self.minute != 0 || self.second != 0 {
            7
        } else if self.year != 0 || self.month != 0 || self.day != 0 {
            4
        } else {
            0
        }
    }
}

impl Timestamp {
    pub fn moment(&self) -> &Datetime {
        &self.0
    }
}

/// Largest year a DATETIME or TIMESTAMP column holds.
pub const MAX_YEAR: u16 = 9999;

fn wire_year(year: i32) -> BindResult<u16> {
    u16::try_from(year)
        .ok()
        .filter(|y| *y <= MAX_YEAR)
        .ok_or_else(|| BindError::out_of_range(format!("year {} is outside 0..={}", year, MAX_YEAR)))
}

impl TryFrom<NaiveDate> for Datetime {
    type Error = BindError;

    fn try_from(d: NaiveDate) -> BindResult<Self> {
        Ok(Datetime::date(wire_year(d.year())?, d.month() as u8, d.day() as u8))
    }
}

impl TryFrom<NaiveDateTime> for Datetime {
    type Error = BindError;

    fn try_from(dt: NaiveDateTime) -> BindResult<Self> {
        // Leap seconds show up as nanosecond >= 1e9; keep the fraction in range.
        let micros = (dt.nanosecond() % 1_000_000_000) / 1_000;
        Ok(Datetime::try_from(dt.date())?
            .with_time(dt.hour() as u8, dt.minute() as u8, dt.second() as u8)
            .with_micros(micros))
    }
}

impl From<Datetime> for Timestamp {
    fn from(d: Datetime) -> Self {
        Timestamp(d)
    }
}

impl TryFrom<DateTime<Utc>> for Timestamp {
    type Error = BindError;

    fn try_from(dt: DateTime<Utc>) -> BindResult<Self> {
        Ok(Timestamp(Datetime::try_from(dt.naive_utc())?))
    }
}

/// Total encoded size of `d`, length byte included.
pub fn datetime_len(d: &Datetime) -> usize {
    1 + d.body_len()
}

/// Write the length byte and body for `d`, returning the bytes written.
pub fn encode_datetime<B: BufMut + ?Sized>(buf: &mut B, d: &Datetime) -> usize {
    let body = d.body_len();
    buf.put_u8(body as u8);
    if body >= 4 {
        buf.put_slice(&encode_u16(d.year));
        buf.put_u8(d.month);
        buf.put_u8(d.day);
    }
    if body >= 7 {
        buf.put_u8(d.hour);
        buf.put_u8(d.minute);
        buf.put_u8(d.second);
    }
    if body == 11 {
        buf.put_slice(&encode_u32(d.micros));
    }
    1 + body
}
