//! Chart assembly: the single pipeline from a birth record to a
//! `Chart`.
//!
//! Civil time is localized with the record's IANA timezone and reduced
//! to a Julian Day, every body in the fixed list is queried once, the
//! South Node is derived from the North Node, and the four angles come
//! from one Placidus house computation. A house failure is captured
//! into the chart rather than propagated.

use std::collections::HashMap;

use crate::ephemeris::Ephemeris;
use crate::houses;
use crate::time;
use crate::{
    normalize_degrees, round6, BirthData, CelestialBody, Chart, ChartAngle, ChartError, Placement,
};

/// Build a natal chart for a birth record.
///
/// The only fatal input error is an unparseable date; a bad clock
/// time or timezone falls back to noon UTC on the date. A failed
/// house computation leaves the angles out and records the reason in
/// [`Chart::error`].
pub fn build_chart(eph: &Ephemeris, data: &BirthData) -> Result<Chart, ChartError> {
    let latitude = data.location.lat;
    // Longitudes east of the antimeridian wrap into [-180, 180).
    let longitude = if data.location.lon > 180.0 {
        data.location.lon - 360.0
    } else {
        data.location.lon
    };

    let utc = match time::local_to_utc(&data.date, &data.time, &data.location.timezone) {
        Some(utc) => utc,
        None => {
            log::warn!(
                "could not localize '{} {}' in '{}', falling back to noon UTC",
                data.date,
                data.time,
                data.location.timezone
            );
            time::noon_utc(&data.date).ok_or_else(|| ChartError::InvalidDate {
                date: data.date.clone(),
            })?
        }
    };
    let julian_day = time::datetime_to_julian_day(utc);

    let mut placements = HashMap::new();
    for body in CelestialBody::iter() {
        let pos = eph
            .position(julian_day, body)
            .map_err(|source| ChartError::Calculation {
                body: body.to_string(),
                source,
            })?;
        placements.insert(body.to_string(), Placement::from_position(&pos));
    }

    // Antipode of the reported (already rounded) North Node.
    let north_node = placements[&CelestialBody::NorthNode.to_string()].longitude;
    placements.insert(
        "South Node".to_string(),
        Placement::derived(normalize_degrees(north_node + 180.0)),
    );

    let (houses, error) = match houses::houses(julian_day, latitude, longitude) {
        Ok(wheel) => {
            let asc = round6(wheel.ascendant);
            let mc = round6(wheel.midheaven);
            placements.insert(ChartAngle::Ascendant.to_string(), Placement::derived(asc));
            placements.insert(ChartAngle::Midheaven.to_string(), Placement::derived(mc));
            placements.insert(
                ChartAngle::Descendant.to_string(),
                Placement::derived(normalize_degrees(asc + 180.0)),
            );
            placements.insert(
                ChartAngle::ImumCoeli.to_string(),
                Placement::derived(normalize_degrees(mc + 180.0)),
            );
            (Some(wheel.cusps.map(round6)), None)
        }
        Err(e) => {
            log::debug!("house computation failed, chart continues without angles: {e}");
            (
                None,
                Some(format!("Houses/angles could not be calculated: {e}")),
            )
        }
    };

    Ok(Chart {
        name: data.name.clone(),
        birth_date: data.date.clone(),
        birth_time_local: data.time.clone(),
        latitude,
        longitude,
        timezone: data.location.timezone.clone(),
        julian_day,
        placements,
        houses,
        error,
    })
}
