//! Civil time, Julian Day and sidereal time conversions.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, TimeZone, Timelike, Utc};
use chrono_tz::Tz;
use std::f64::consts::TAU;

use crate::{JulianDay, J2000};

const LOCAL_FORMAT: &str = "%Y-%m-%d %H:%M";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Resolve a civil date/time in an IANA timezone to UTC.
///
/// A wall time that occurs twice around a fall-back transition
/// resolves to its standard-time occurrence (the later instant).
/// Returns `None` when the strings do not parse, the timezone name is
/// unknown, or the clock time was skipped by a spring-forward
/// transition.
pub fn local_to_utc(date: &str, time: &str, timezone: &str) -> Option<DateTime<Utc>> {
    let naive = NaiveDateTime::parse_from_str(&format!("{} {}", date, time), LOCAL_FORMAT).ok()?;
    let tz: Tz = timezone.parse().ok()?;
    let local = tz.from_local_datetime(&naive).latest()?;
    Some(local.with_timezone(&Utc))
}

/// Noon UTC on the given calendar date, or `None` if the date string
/// does not parse.
pub fn noon_utc(date: &str) -> Option<DateTime<Utc>> {
    let day = NaiveDate::parse_from_str(date, DATE_FORMAT).ok()?;
    let naive = day.and_hms_opt(12, 0, 0)?;
    Some(Utc.from_utc_datetime(&naive))
}

/// Julian Day for a Gregorian calendar date and fractional hour (UT).
pub fn julian_day(year: i32, month: u32, day: u32, hour: f64) -> JulianDay {
    let (y, m) = if month <= 2 {
        (year - 1, month + 12)
    } else {
        (year, month)
    };
    let a = (y as f64 / 100.0).floor();
    let b = 2.0 - a + (a / 4.0).floor();
    (365.25 * (y as f64 + 4716.0)).floor()
        + (30.6001 * (m as f64 + 1.0)).floor()
        + day as f64
        + hour / 24.0
        + b
        - 1524.5
}

/// Julian Day for a UTC timestamp.
///
/// The fractional hour is built from hours and minutes only; the chart
/// pipeline carries minute precision, so seconds never contribute.
pub fn datetime_to_julian_day(dt: DateTime<Utc>) -> JulianDay {
    let hour = dt.hour() as f64 + dt.minute() as f64 / 60.0;
    julian_day(dt.year(), dt.month(), dt.day(), hour)
}

/// Estimated TT - UT in seconds (Espenak-Meeus polynomial fits).
///
/// Covers 1900-2150 with the published segments and falls back to the
/// long-term parabola outside that range.
pub fn delta_t_seconds(year: f64) -> f64 {
    if (1900.0..1920.0).contains(&year) {
        let t = year - 1900.0;
        -2.79 + 1.494119 * t - 0.0598939 * t * t + 0.0061966 * t.powi(3) - 0.000197 * t.powi(4)
    } else if (1920.0..1941.0).contains(&year) {
        let t = year - 1920.0;
        21.20 + 0.84493 * t - 0.076100 * t * t + 0.0020936 * t.powi(3)
    } else if (1941.0..1961.0).contains(&year) {
        let t = year - 1950.0;
        29.07 + 0.407 * t - t * t / 233.0 + t.powi(3) / 2547.0
    } else if (1961.0..1986.0).contains(&year) {
        let t = year - 1975.0;
        45.45 + 1.067 * t - t * t / 260.0 - t.powi(3) / 718.0
    } else if (1986.0..2005.0).contains(&year) {
        let t = year - 2000.0;
        63.86 + 0.3345 * t - 0.060374 * t * t
            + 0.0017275 * t.powi(3)
            + 0.000651814 * t.powi(4)
            + 0.00002373599 * t.powi(5)
    } else if (2005.0..2050.0).contains(&year) {
        let t = year - 2000.0;
        62.92 + 0.32217 * t + 0.005589 * t * t
    } else if (2050.0..2150.0).contains(&year) {
        let u = (year - 1820.0) / 100.0;
        -20.0 + 32.0 * u * u - 0.5628 * (2150.0 - year)
    } else {
        let u = (year - 1820.0) / 100.0;
        -20.0 + 32.0 * u * u
    }
}

/// Julian Day on the TT scale for a UT Julian Day.
pub fn julian_day_tt(jd_ut: JulianDay) -> JulianDay {
    let year = 2000.0 + (jd_ut - J2000) / 365.25;
    jd_ut + delta_t_seconds(year) / 86400.0
}

/// Julian centuries of TT since J2000.0.
pub fn julian_centuries_tt(jd_ut: JulianDay) -> f64 {
    (julian_day_tt(jd_ut) - J2000) / 36525.0
}

/// Earth Rotation Angle in radians (Capitaine et al. 2003).
pub fn earth_rotation_angle_rad(jd_ut: JulianDay) -> f64 {
    let du = jd_ut - J2000;
    (TAU * (0.7790572732640 + 1.00273781191135448 * du)).rem_euclid(TAU)
}

/// Greenwich mean sidereal time in radians.
pub fn gmst_rad(jd_ut: JulianDay) -> f64 {
    let t = julian_centuries_tt(jd_ut);
    // ERA plus the accumulated-precession polynomial, arcseconds.
    let poly = 0.014506
        + 4612.156534 * t
        + 1.3915817 * t * t
        - 0.00000044 * t.powi(3)
        - 0.000029956 * t.powi(4)
        - 0.0000000368 * t.powi(5);
    (earth_rotation_angle_rad(jd_ut) + (poly / 3600.0).to_radians()).rem_euclid(TAU)
}

/// Local mean sidereal time in radians for an east longitude in degrees.
pub fn lst_rad(jd_ut: JulianDay, east_longitude_deg: f64) -> f64 {
    (gmst_rad(jd_ut) + east_longitude_deg.to_radians()).rem_euclid(TAU)
}
