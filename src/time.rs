//! UTC epochs and time-standard conversions.
//!
//! Spacecraft and image times are carried as [`Epoch`] tuples of
//! `(year, day_of_year, seconds_of_day)`, the layout the ancillary data
//! uses. All time arithmetic between models is done in seconds with
//! explicit epoch deltas; converting an epoch into the Julian-date time
//! standards (UT1, TT, TDB) needs only the UT1−UTC correction supplied by
//! the earth-orientation lookup.
//!
//! # Time scale relationships
//!
//! - **TT = TAI + 32.184 s** (exact constant)
//! - **TAI = UTC + leap seconds** (IERS Bulletin C table)
//! - **UT1 = UTC + (UT1−UTC)** (sub-second, from the calibration file)
//! - **TDB = TT + periodic term** (≤ 1.7 ms)

use chrono::{Datelike, NaiveDate};

use crate::error::{LosError, Result};

/// Julian Date of the J2000.0 epoch: 2000 January 1.5 TT.
pub const JD2000: f64 = 2451545.0;

/// Offset between full and Modified Julian Dates.
pub const MJD_OFFSET: f64 = 2400000.5;

/// Seconds per day.
pub const SECONDS_PER_DAY: f64 = 86400.0;

/// TT-TAI offset in seconds (exact constant defined by the IAU).
const TT_TAI_SECONDS: f64 = 32.184;

/// Leap second table with cumulative TAI-UTC offsets, from IERS Bulletin C
/// announcements. The offset holds until the next insertion date.
static LEAP_SECOND_TABLE: &[(i32, u32, u32, f64)] = &[
    // (year, month, day, tai_utc_offset)
    (1972, 1, 1, 10.0),
    (1972, 7, 1, 11.0),
    (1973, 1, 1, 12.0),
    (1974, 1, 1, 13.0),
    (1975, 1, 1, 14.0),
    (1976, 1, 1, 15.0),
    (1977, 1, 1, 16.0),
    (1978, 1, 1, 17.0),
    (1979, 1, 1, 18.0),
    (1980, 1, 1, 19.0),
    (1981, 7, 1, 20.0),
    (1982, 7, 1, 21.0),
    (1983, 7, 1, 22.0),
    (1985, 7, 1, 23.0),
    (1988, 1, 1, 24.0),
    (1990, 1, 1, 25.0),
    (1991, 1, 1, 26.0),
    (1992, 7, 1, 27.0),
    (1993, 7, 1, 28.0),
    (1994, 7, 1, 29.0),
    (1996, 1, 1, 30.0),
    (1997, 7, 1, 31.0),
    (1999, 1, 1, 32.0),
    (2006, 1, 1, 33.0),
    (2009, 1, 1, 34.0),
    (2012, 7, 1, 35.0),
    (2015, 7, 1, 36.0),
    (2017, 1, 1, 37.0),
];

/// Get the TAI-UTC offset in effect on a date.
pub fn tai_utc_offset_for_date(date: NaiveDate) -> f64 {
    let mut current_offset = 10.0;
    for &(year, month, day, offset) in LEAP_SECOND_TABLE {
        let leap_date = NaiveDate::from_ymd_opt(year, month, day).unwrap();
        if date >= leap_date {
            current_offset = offset;
        } else {
            break;
        }
    }
    current_offset
}

/// A UTC instant expressed as year, day of year, and seconds of day.
///
/// Invariant: `1 <= day_of_year <= 366` and `0 <= seconds_of_day < 86400`.
/// The day of year is whole-number valued; sub-day time lives entirely in
/// `seconds_of_day`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Epoch {
    pub year: i32,
    pub day_of_year: f64,
    pub seconds_of_day: f64,
}

impl Epoch {
    /// Build an epoch, checking the day-of-year / seconds-of-day invariant.
    pub fn new(year: i32, day_of_year: f64, seconds_of_day: f64) -> Result<Epoch> {
        let epoch = Epoch {
            year,
            day_of_year,
            seconds_of_day,
        };
        epoch.validate()?;
        Ok(epoch)
    }

    fn validate(&self) -> Result<()> {
        if !(1.0..=366.0).contains(&self.day_of_year) {
            return Err(LosError::InvalidEpoch {
                year: self.year,
                day_of_year: self.day_of_year,
                seconds_of_day: self.seconds_of_day,
                reason: "day of year outside 1..=366",
            });
        }
        if !(0.0..SECONDS_PER_DAY).contains(&self.seconds_of_day) {
            return Err(LosError::InvalidEpoch {
                year: self.year,
                day_of_year: self.day_of_year,
                seconds_of_day: self.seconds_of_day,
                reason: "seconds of day outside 0..86400",
            });
        }
        self.naive_date()?;
        Ok(())
    }

    /// The calendar date of this epoch.
    pub fn naive_date(&self) -> Result<NaiveDate> {
        NaiveDate::from_yo_opt(self.year, self.day_of_year as u32).ok_or(LosError::InvalidEpoch {
            year: self.year,
            day_of_year: self.day_of_year,
            seconds_of_day: self.seconds_of_day,
            reason: "day of year does not exist in this year",
        })
    }

    /// Calendar month and day for this epoch's day of year.
    pub fn month_day(&self) -> Result<(u32, u32)> {
        let date = self.naive_date()?;
        Ok((date.month(), date.day()))
    }

    /// Add (or with a negative argument, subtract) seconds, normalising the
    /// result across day and year boundaries. The returned epoch always
    /// satisfies the type invariant.
    pub fn add_seconds(&self, seconds: f64) -> Result<Epoch> {
        let date = self.naive_date()?;
        let total = self.seconds_of_day + seconds;
        let mut day_shift = (total / SECONDS_PER_DAY).floor();
        let mut sod = total - day_shift * SECONDS_PER_DAY;
        // Guard the open upper bound against rounding at day boundaries.
        if sod >= SECONDS_PER_DAY {
            sod -= SECONDS_PER_DAY;
            day_shift += 1.0;
        }
        if sod < 0.0 {
            sod += SECONDS_PER_DAY;
            day_shift -= 1.0;
        }
        let new_date = date
            .checked_add_signed(chrono::Duration::days(day_shift as i64))
            .ok_or(LosError::InvalidEpoch {
                year: self.year,
                day_of_year: self.day_of_year,
                seconds_of_day: self.seconds_of_day,
                reason: "date overflow adding seconds",
            })?;
        Ok(Epoch {
            year: new_date.year(),
            day_of_year: new_date.ordinal() as f64,
            seconds_of_day: sod,
        })
    }

    /// Exact number of seconds from `other` to `self` (positive when
    /// `self` is later).
    pub fn seconds_since(&self, other: &Epoch) -> Result<f64> {
        let d1 = self.naive_date()?;
        let d2 = other.naive_date()?;
        let days = (d1 - d2).num_days() as f64;
        Ok(days * SECONDS_PER_DAY + self.seconds_of_day - other.seconds_of_day)
    }

    /// Full Julian Date of this UTC epoch, fractional day included.
    pub fn julian_date(&self) -> Result<f64> {
        let jd_midnight = julian_date_ymd(self.year, 1, 1) + (self.day_of_year - 1.0);
        Ok(jd_midnight + self.seconds_of_day / SECONDS_PER_DAY)
    }

    /// Modified Julian Date: full JD − 2400000.5.
    pub fn modified_julian_date(&self) -> Result<f64> {
        Ok(self.julian_date()? - MJD_OFFSET)
    }

    /// Convert this UTC epoch to the `(jd_ut1, jd_tdb, jd_tt)` Julian-date
    /// time standards, given the UT1−UTC correction in seconds.
    pub fn to_time_standards(&self, ut1_utc: f64) -> Result<(f64, f64, f64)> {
        let jd_utc = self.julian_date()?;
        let jd_ut1 = jd_utc + ut1_utc / SECONDS_PER_DAY;
        let tai_utc = tai_utc_offset_for_date(self.naive_date()?);
        let jd_tt = jd_utc + (tai_utc + TT_TAI_SECONDS) / SECONDS_PER_DAY;
        // TDB differs from TT by a small periodic term; evaluating the
        // series at TT instead of TDB is below the term's own accuracy.
        let (_, secdiff) = crate::novas::tdb2tt(jd_tt);
        let jd_tdb = jd_tt + secdiff / SECONDS_PER_DAY;
        Ok((jd_ut1, jd_tdb, jd_tt))
    }
}

/// Julian Date at 00:00 UTC of a calendar date.
///
/// Proleptic Gregorian, per Meeus *Astronomical Algorithms* chapter 7.
pub fn julian_date_ymd(year: i32, month: u32, day: u32) -> f64 {
    let mut y = year;
    let mut m = month as i32;
    if m <= 2 {
        y -= 1;
        m += 12;
    }
    let a = (y as f64 / 100.0).floor();
    let b = 2.0 - a + (a / 4.0).floor();
    (365.25 * (y as f64 + 4716.0)).floor() + (30.6001 * ((m + 1) as f64)).floor() + day as f64 + b
        - 1524.5
}
