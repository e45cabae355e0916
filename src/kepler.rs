//! Two-body Keplerian propagation for bodies outside the planetary
//! theory (Pluto, Chiron).
//!
//! Elements follow the Standish (1992) convention: values at J2000.0
//! with linear rates per Julian century, referred to the mean ecliptic
//! and equinox of J2000.0.

use crate::coords;
use crate::{JulianDay, J2000};

/// Osculating orbital elements with secular rates.
///
/// Angles in degrees, semi-major axis in AU, rates per Julian century.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitalElements {
    pub a: f64,
    pub a_dot: f64,
    pub e: f64,
    pub e_dot: f64,
    pub i: f64,
    pub i_dot: f64,
    /// Mean longitude L = M + peri.
    pub l: f64,
    pub l_dot: f64,
    /// Longitude of perihelion (node + argument of perihelion).
    pub peri: f64,
    pub peri_dot: f64,
    /// Longitude of the ascending node.
    pub node: f64,
    pub node_dot: f64,
}

/// Pluto, from the Standish approximate-elements table (1800-2050).
pub const PLUTO: OrbitalElements = OrbitalElements {
    a: 39.48211675,
    a_dot: -0.00031596,
    e: 0.24882730,
    e_dot: 0.00005170,
    i: 17.14001206,
    i_dot: 0.00004818,
    l: 238.92903833,
    l_dot: 145.20780515,
    peri: 224.06891629,
    peri_dot: -0.04062942,
    node: 110.30393684,
    node_dot: -0.01183482,
};

/// 2060 Chiron, two-body elements reduced to J2000 from the JPL
/// small-body osculating set. Good to well under a degree across the
/// surrounding decades, which serves sign- and house-level placement.
pub const CHIRON: OrbitalElements = OrbitalElements {
    a: 13.6816,
    a_dot: 0.0,
    e: 0.37945,
    e_dot: 0.0,
    i: 6.9352,
    i_dot: 0.0,
    l: 216.322,
    l_dot: 711.33,
    peri: 188.722,
    peri_dot: 0.0,
    node: 209.288,
    node_dot: 0.0,
};

/// Solve Kepler's equation E - e sin E = M by Newton-Raphson.
pub fn solve_kepler(mean_anomaly_rad: f64, e: f64) -> f64 {
    let m = mean_anomaly_rad;
    let mut ecc_anomaly = m + e * m.sin();
    for _ in 0..15 {
        let delta = (m - (ecc_anomaly - e * ecc_anomaly.sin())) / (1.0 - e * ecc_anomaly.cos());
        ecc_anomaly += delta;
        if delta.abs() < 1e-12 {
            break;
        }
    }
    ecc_anomaly
}

/// Heliocentric rectangular coordinates in the J2000 ecliptic frame.
pub fn heliocentric_rect_j2000(el: &OrbitalElements, jd_tt: JulianDay) -> [f64; 3] {
    let t = (jd_tt - J2000) / 36525.0;

    let a = el.a + el.a_dot * t;
    let e = el.e + el.e_dot * t;
    let i = (el.i + el.i_dot * t).to_radians();
    let l = el.l + el.l_dot * t;
    let peri = el.peri + el.peri_dot * t;
    let node_deg = el.node + el.node_dot * t;
    let node = node_deg.to_radians();

    let arg_peri = (peri - node_deg).to_radians();
    let m = (l - peri).rem_euclid(360.0).to_radians();
    let ecc_anomaly = solve_kepler(m, e);

    // Position in the orbital plane, perihelion along +x.
    let xp = a * (ecc_anomaly.cos() - e);
    let yp = a * (1.0 - e * e).sqrt() * ecc_anomaly.sin();

    let (sin_w, cos_w) = arg_peri.sin_cos();
    let (sin_o, cos_o) = node.sin_cos();
    let (sin_i, cos_i) = i.sin_cos();

    [
        (cos_w * cos_o - sin_w * sin_o * cos_i) * xp + (-sin_w * cos_o - cos_w * sin_o * cos_i) * yp,
        (cos_w * sin_o + sin_w * cos_o * cos_i) * xp + (-sin_w * sin_o + cos_w * cos_o * cos_i) * yp,
        (sin_w * sin_i) * xp + (cos_w * sin_i) * yp,
    ]
}

/// Heliocentric ecliptic spherical coordinates (J2000 frame),
/// degrees and AU.
pub fn heliocentric_ecliptic_j2000(el: &OrbitalElements, jd_tt: JulianDay) -> (f64, f64, f64) {
    coords::rect_to_ecliptic(heliocentric_rect_j2000(el, jd_tt))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn kepler_circular_orbit() {
        assert_relative_eq!(solve_kepler(1.234, 0.0), 1.234, epsilon = 1e-12);
    }

    #[test]
    fn kepler_residual_vanishes() {
        let e = 0.4;
        let m = 2.0;
        let ecc = solve_kepler(m, e);
        assert!((ecc - e * ecc.sin() - m).abs() < 1e-10);
    }

    #[test]
    fn kepler_high_eccentricity() {
        let e = 0.9;
        let m = 0.3;
        let ecc = solve_kepler(m, e);
        assert!((ecc - e * ecc.sin() - m).abs() < 1e-9);
    }

    #[test]
    fn circular_zero_inclination_tracks_mean_longitude() {
        let el = OrbitalElements {
            a: 1.0,
            a_dot: 0.0,
            e: 0.0,
            e_dot: 0.0,
            i: 0.0,
            i_dot: 0.0,
            l: 123.4,
            l_dot: 0.0,
            peri: 0.0,
            peri_dot: 0.0,
            node: 0.0,
            node_dot: 0.0,
        };
        let (lon, lat, r) = heliocentric_ecliptic_j2000(&el, J2000);
        assert_relative_eq!(lon, 123.4, epsilon = 1e-9);
        assert_relative_eq!(lat, 0.0, epsilon = 1e-9);
        assert_relative_eq!(r, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn pluto_heliocentric_at_j2000() {
        let (lon, lat, r) = heliocentric_ecliptic_j2000(&PLUTO, J2000);
        assert_relative_eq!(lon, 250.5, epsilon = 1.5);
        assert_relative_eq!(lat, 11.2, epsilon = 1.5);
        assert_relative_eq!(r, 30.22, epsilon = 0.3);
    }

    #[test]
    fn chiron_near_aphelion_in_2020() {
        // 2020-12-17, shortly before the 2021 aphelion passage.
        let (_, _, r) = heliocentric_ecliptic_j2000(&CHIRON, 2459200.5);
        assert_relative_eq!(r, 18.87, epsilon = 0.25);
    }
}
