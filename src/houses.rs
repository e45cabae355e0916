//! Angles and Placidus house cusps.
//!
//! The ascendant and midheaven come from their closed forms; the
//! intermediate cusps from iterative semi-arc trisection. Everything
//! is referred to the apparent equinox of date (true obliquity and the
//! equation of the equinoxes applied to the sidereal time).

use std::f64::consts::{PI, TAU};

use crate::coords;
use crate::time;
use crate::{normalize_degrees, CalcError, JulianDay};

/// Placidus degenerates where ecliptic degrees can be circumpolar, so
/// latitudes beyond this limit are rejected.
pub const MAX_PLACIDUS_LATITUDE_DEG: f64 = 66.5;

const CUSP_ITERATIONS: usize = 50;
const CUSP_CONVERGENCE_RAD: f64 = 1e-10;

/// Twelve Placidus cusp longitudes, house 1 first, plus the two
/// directly measured angles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HouseCusps {
    pub cusps: [f64; 12],
    pub ascendant: f64,
    pub midheaven: f64,
}

/// Placidus cusps and angles for an instant and geographic position.
///
/// `geo_lon_deg` is east-positive. Fails with
/// [`CalcError::PolarLatitude`] beyond the Placidus latitude limit.
pub fn houses(jd_ut: JulianDay, geo_lat_deg: f64, geo_lon_deg: f64) -> Result<HouseCusps, CalcError> {
    if geo_lat_deg.abs() > MAX_PLACIDUS_LATITUDE_DEG {
        return Err(CalcError::PolarLatitude {
            latitude: geo_lat_deg,
        });
    }

    let t = time::julian_centuries_tt(jd_ut);
    let (dpsi, _) = coords::nutation_deg(t);
    let eps = coords::true_obliquity_deg(t).to_radians();
    // Apparent sidereal time: mean plus the equation of the equinoxes.
    let ramc =
        (time::lst_rad(jd_ut, geo_lon_deg) + (dpsi.to_radians() * eps.cos())).rem_euclid(TAU);
    let phi = geo_lat_deg.to_radians();

    let asc = ascendant_rad(ramc, phi, eps).to_degrees();
    let mc = midheaven_rad(ramc, eps).to_degrees();

    let mut cusps = [0.0; 12];
    cusps[0] = asc;
    cusps[3] = normalize_degrees(mc + 180.0);
    cusps[6] = normalize_degrees(asc + 180.0);
    cusps[9] = mc;

    // Houses 11, 12: diurnal semi-arc trisection east of the MC.
    cusps[10] = placidus_cusp(ramc, phi, eps, 1.0 / 3.0, true);
    cusps[11] = placidus_cusp(ramc, phi, eps, 2.0 / 3.0, true);

    // Houses 2, 3: nocturnal semi-arc trisection between Asc and IC.
    cusps[1] = placidus_cusp(ramc, phi, eps, 2.0 / 3.0, false);
    cusps[2] = placidus_cusp(ramc, phi, eps, 1.0 / 3.0, false);

    // Opposite cusps.
    cusps[4] = normalize_degrees(cusps[10] + 180.0);
    cusps[5] = normalize_degrees(cusps[11] + 180.0);
    cusps[7] = normalize_degrees(cusps[1] + 180.0);
    cusps[8] = normalize_degrees(cusps[2] + 180.0);

    Ok(HouseCusps {
        cusps,
        ascendant: asc,
        midheaven: mc,
    })
}

/// Ecliptic longitude rising on the eastern horizon.
///
/// `asc = atan2(cos(ramc), -(sin(ramc)*cos(eps) + tan(phi)*sin(eps)))`
fn ascendant_rad(ramc: f64, phi: f64, eps: f64) -> f64 {
    f64::atan2(ramc.cos(), -(ramc.sin() * eps.cos() + phi.tan() * eps.sin())).rem_euclid(TAU)
}

/// Ecliptic longitude on the upper meridian.
///
/// `mc = atan2(sin(ramc), cos(ramc)*cos(eps))`
fn midheaven_rad(ramc: f64, eps: f64) -> f64 {
    f64::atan2(ramc.sin(), ramc.cos() * eps.cos()).rem_euclid(TAU)
}

/// One Placidus cusp by iterative semi-arc trisection.
///
/// Diurnal cusps solve `ra = ramc + fraction*semi_arc(dec(ra))`,
/// nocturnal cusps `ra = ramc + pi - fraction*semi_arc(dec(ra))`, then
/// the converged right ascension is projected onto the ecliptic.
fn placidus_cusp(ramc: f64, phi: f64, eps: f64, fraction: f64, above_horizon: bool) -> f64 {
    let mut ra = if above_horizon {
        ramc + fraction * PI / 2.0
    } else {
        ramc + PI - fraction * PI / 2.0
    };

    for _ in 0..CUSP_ITERATIONS {
        let dec = ecliptic_declination_rad(ra, eps);
        let semi_arc = semi_arc_rad(dec, phi, above_horizon);
        let new_ra = if above_horizon {
            ramc + fraction * semi_arc
        } else {
            ramc + PI - fraction * semi_arc
        };

        if (new_ra - ra).abs() < CUSP_CONVERGENCE_RAD {
            ra = new_ra;
            break;
        }
        ra = new_ra;
    }

    normalize_degrees(ra_to_ecliptic_longitude_rad(ra, eps).to_degrees())
}

/// Declination of the ecliptic point with right ascension `ra`:
/// `tan(dec) = tan(eps) * sin(ra)`.
fn ecliptic_declination_rad(ra: f64, eps: f64) -> f64 {
    (eps.tan() * ra.sin()).atan()
}

/// Diurnal or nocturnal semi-arc in radians.
///
/// `semi_arc = acos(-tan(dec) * tan(lat))`; the nocturnal arc is its
/// complement to pi.
fn semi_arc_rad(dec: f64, lat: f64, diurnal: bool) -> f64 {
    let cos_ha = -(dec.tan() * lat.tan());
    let ha = cos_ha.clamp(-1.0, 1.0).acos();
    if diurnal {
        ha
    } else {
        PI - ha
    }
}

/// Ecliptic longitude of the ecliptic point with right ascension `ra`:
/// `tan(lon) = tan(ra) / cos(eps)`, quadrant-safe.
fn ra_to_ecliptic_longitude_rad(ra: f64, eps: f64) -> f64 {
    f64::atan2(ra.sin(), ra.cos() * eps.cos()).rem_euclid(TAU)
}
