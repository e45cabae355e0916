//! Analytic ephemeris engine.
//!
//! Planetary positions come from the VSOP87D theory (`vsop87` crate),
//! the Moon from the `astro` crate's lunar theory, Pluto and Chiron
//! from two-body element propagation, and the mean lunar node and
//! apogee from their mean-element polynomials. All reported positions
//! are apparent ecliptic-of-date coordinates: light-time, solar
//! aberration and nutation in longitude are applied where they matter
//! at chart precision.

use vsop87::vsop87d;

use crate::coords;
use crate::kepler;
use crate::time;
use crate::{normalize_degrees, BodyPosition, CalcError, CelestialBody, JulianDay};

/// Step used for the central-difference longitude speed, in days.
const SPEED_STEP_DAYS: f64 = 0.005;

/// Supported epoch window, years 1000-3000.
const SUPPORTED_JD_MIN: f64 = 2086307.5;
const SUPPORTED_JD_MAX: f64 = 2816787.5;

/// Conventional mean geocentric distances for the node points, AU.
const MEAN_NODE_DISTANCE_AU: f64 = 0.002569;
const MEAN_APOGEE_DISTANCE_AU: f64 = 0.002710;

/// Stateless analytic ephemeris. Construct once and share; every
/// method takes `&self`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ephemeris;

impl Ephemeris {
    pub fn new() -> Self {
        log::debug!("analytic ephemeris engine ready");
        Ephemeris
    }

    /// Apparent ecliptic position and longitude speed of a body.
    pub fn position(
        &self,
        jd_ut: JulianDay,
        body: CelestialBody,
    ) -> Result<BodyPosition, CalcError> {
        if !(SUPPORTED_JD_MIN..=SUPPORTED_JD_MAX).contains(&jd_ut) {
            return Err(CalcError::OutOfRange { jd: jd_ut });
        }
        let (longitude, latitude, distance_au) = self.apparent_position(jd_ut, body);
        let speed = self.longitude_speed(jd_ut, body);
        Ok(BodyPosition {
            longitude,
            latitude,
            distance_au,
            speed,
        })
    }

    /// Longitude speed in degrees per day, central difference with
    /// wrap-safe angular subtraction.
    fn longitude_speed(&self, jd_ut: JulianDay, body: CelestialBody) -> f64 {
        let before = self.apparent_position(jd_ut - SPEED_STEP_DAYS, body).0;
        let after = self.apparent_position(jd_ut + SPEED_STEP_DAYS, body).0;
        signed_arc_deg(after - before) / (2.0 * SPEED_STEP_DAYS)
    }

    /// Apparent (longitude, latitude, distance) of a body, degrees/AU.
    fn apparent_position(&self, jd_ut: JulianDay, body: CelestialBody) -> (f64, f64, f64) {
        let jd_tt = time::julian_day_tt(jd_ut);
        let t = time::julian_centuries_tt(jd_ut);
        let (dpsi, _) = coords::nutation_deg(t);

        match body {
            CelestialBody::Sun => self.sun_position(jd_tt, dpsi),
            CelestialBody::Moon => self.moon_position(jd_tt, dpsi),
            CelestialBody::Mercury => self.planet_position(jd_tt, dpsi, vsop87d::mercury),
            CelestialBody::Venus => self.planet_position(jd_tt, dpsi, vsop87d::venus),
            CelestialBody::Mars => self.planet_position(jd_tt, dpsi, vsop87d::mars),
            CelestialBody::Jupiter => self.planet_position(jd_tt, dpsi, vsop87d::jupiter),
            CelestialBody::Saturn => self.planet_position(jd_tt, dpsi, vsop87d::saturn),
            CelestialBody::Uranus => self.planet_position(jd_tt, dpsi, vsop87d::uranus),
            CelestialBody::Neptune => self.planet_position(jd_tt, dpsi, vsop87d::neptune),
            CelestialBody::Pluto => self.kepler_position(jd_tt, t, dpsi, &kepler::PLUTO),
            CelestialBody::Chiron => self.kepler_position(jd_tt, t, dpsi, &kepler::CHIRON),
            CelestialBody::NorthNode => (
                normalize_degrees(mean_lunar_node_deg(t) + dpsi),
                0.0,
                MEAN_NODE_DISTANCE_AU,
            ),
            CelestialBody::Lilith => (
                normalize_degrees(mean_lunar_apogee_deg(t) + dpsi),
                0.0,
                MEAN_APOGEE_DISTANCE_AU,
            ),
        }
    }

    /// Geocentric Sun from the heliocentric Earth, with the combined
    /// light-time/aberration term folded into the longitude.
    fn sun_position(&self, jd_tt: JulianDay, dpsi: f64) -> (f64, f64, f64) {
        let earth = vsop87d::earth(jd_tt);
        let dist = earth.distance();
        let lon = normalize_degrees(
            earth.longitude().to_degrees() + 180.0 + dpsi + coords::solar_aberration_deg(dist),
        );
        let lat = -earth.latitude().to_degrees();
        (lon, lat, dist)
    }

    fn moon_position(&self, jd_tt: JulianDay, dpsi: f64) -> (f64, f64, f64) {
        let (ecl, dist_km) = astro::lunar::geocent_ecl_pos(jd_tt);
        let lon = normalize_degrees(ecl.long.to_degrees() + dpsi);
        let lat = ecl.lat.to_degrees();
        (lon, lat, dist_km / coords::AU_KM)
    }

    /// Geocentric planet from VSOP87D with one light-time iteration.
    fn planet_position(
        &self,
        jd_tt: JulianDay,
        dpsi: f64,
        theory: fn(f64) -> vsop87::SphericalCoordinates,
    ) -> (f64, f64, f64) {
        let earth = vsop_rect(vsop87d::earth(jd_tt));
        let first = sub(vsop_rect(theory(jd_tt)), earth);
        let tau = coords::LIGHT_TIME_DAYS_PER_AU * norm(first);
        let geo = sub(vsop_rect(theory(jd_tt - tau)), earth);
        let (lon, lat, dist) = coords::rect_to_ecliptic(geo);
        (normalize_degrees(lon + dpsi), lat, dist)
    }

    /// Geocentric position for a Kepler-propagated body. The J2000
    /// heliocentric vector is precessed to the ecliptic of date before
    /// the Earth vector is subtracted.
    fn kepler_position(
        &self,
        jd_tt: JulianDay,
        t: f64,
        dpsi: f64,
        elements: &kepler::OrbitalElements,
    ) -> (f64, f64, f64) {
        let earth = vsop_rect(vsop87d::earth(jd_tt));
        let of_date = |jd: JulianDay| -> [f64; 3] {
            let (lon0, lat0, r) =
                coords::rect_to_ecliptic(kepler::heliocentric_rect_j2000(elements, jd));
            let (lon, lat) = coords::precess_ecliptic_from_j2000(lon0, lat0, t);
            coords::ecliptic_to_rect(lon, lat, r)
        };
        let first = sub(of_date(jd_tt), earth);
        let tau = coords::LIGHT_TIME_DAYS_PER_AU * norm(first);
        let geo = sub(of_date(jd_tt - tau), earth);
        let (lon, lat, dist) = coords::rect_to_ecliptic(geo);
        (normalize_degrees(lon + dpsi), lat, dist)
    }
}

/// Mean longitude of the Moon's ascending node, degrees of date.
fn mean_lunar_node_deg(t: f64) -> f64 {
    normalize_degrees(
        125.0445479 - 1934.1362891 * t + 0.0020754 * t * t + t.powi(3) / 467441.0
            - t.powi(4) / 60616000.0,
    )
}

/// Mean longitude of the lunar apogee: mean perigee plus 180 degrees.
fn mean_lunar_apogee_deg(t: f64) -> f64 {
    normalize_degrees(
        83.3532465 + 4069.0137287 * t - 0.0103200 * t * t - t.powi(3) / 80053.0
            + t.powi(4) / 18999000.0
            + 180.0,
    )
}

/// Shortest signed arc in degrees, in [-180, 180).
fn signed_arc_deg(d: f64) -> f64 {
    normalize_degrees(d + 180.0) - 180.0
}

fn vsop_rect(p: vsop87::SphericalCoordinates) -> [f64; 3] {
    let (lon, lat, r) = (p.longitude(), p.latitude(), p.distance());
    [
        r * lat.cos() * lon.cos(),
        r * lat.cos() * lon.sin(),
        r * lat.sin(),
    ]
}

fn sub(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

fn norm(v: [f64; 3]) -> f64 {
    (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::J2000;
    use approx::assert_relative_eq;

    const EPH: Ephemeris = Ephemeris;

    #[test]
    fn sun_apparent_longitude_1992_reference() {
        // 1992-10-13.0 TD: apparent longitude 199.906 deg,
        // distance 0.9976 AU.
        let pos = EPH.position(2448908.5, CelestialBody::Sun).unwrap();
        assert_relative_eq!(pos.longitude, 199.906, epsilon = 0.02);
        assert_relative_eq!(pos.distance_au, 0.99761, epsilon = 2e-4);
        assert!(pos.latitude.abs() < 0.01);
        assert!((0.95..1.02).contains(&pos.speed));
    }

    #[test]
    fn moon_position_1992_reference() {
        // 1992-04-12.0 TD: apparent longitude 133.1673 deg,
        // latitude -3.2291 deg, distance 368409.7 km.
        let pos = EPH.position(2448724.5, CelestialBody::Moon).unwrap();
        assert_relative_eq!(pos.longitude, 133.1673, epsilon = 0.01);
        assert_relative_eq!(pos.latitude, -3.2291, epsilon = 0.03);
        assert_relative_eq!(pos.distance_au, 0.0024627, epsilon = 1e-5);
        assert!((11.5..15.5).contains(&pos.speed));
    }

    #[test]
    fn venus_apparent_longitude_1992_reference() {
        // 1992-12-20.0 TD: apparent longitude 313.081 deg.
        let pos = EPH.position(2448976.5, CelestialBody::Venus).unwrap();
        assert_relative_eq!(pos.longitude, 313.081, epsilon = 0.03);
        assert_relative_eq!(pos.distance_au, 0.9109, epsilon = 5e-3);
    }

    #[test]
    fn mean_element_polynomials_at_j2000() {
        assert_relative_eq!(mean_lunar_node_deg(0.0), 125.0445479, epsilon = 1e-6);
        assert_relative_eq!(mean_lunar_apogee_deg(0.0), 263.3532465, epsilon = 1e-6);
    }

    #[test]
    fn north_node_at_j2000() {
        let pos = EPH.position(J2000, CelestialBody::NorthNode).unwrap();
        assert_relative_eq!(pos.longitude, 125.04, epsilon = 0.03);
        assert_relative_eq!(pos.speed, -0.0529, epsilon = 0.005);
        assert_relative_eq!(pos.latitude, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn node_always_regresses_apogee_always_advances() {
        for jd in [2415020.5, 2433282.5, 2451545.0, 2460000.5, 2470000.5] {
            let node = EPH.position(jd, CelestialBody::NorthNode).unwrap();
            let apogee = EPH.position(jd, CelestialBody::Lilith).unwrap();
            assert!(node.speed < 0.0, "node speed at {} = {}", jd, node.speed);
            assert!(
                apogee.speed > 0.0,
                "apogee speed at {} = {}",
                jd,
                apogee.speed
            );
        }
    }

    #[test]
    fn lilith_at_j2000() {
        let pos = EPH.position(J2000, CelestialBody::Lilith).unwrap();
        assert_relative_eq!(pos.longitude, 263.35, epsilon = 0.03);
        assert_relative_eq!(pos.speed, 0.1114, epsilon = 0.005);
    }

    #[test]
    fn pluto_geocentric_at_j2000() {
        // Mid-Sagittarius at the turn of the millennium.
        let pos = EPH.position(J2000, CelestialBody::Pluto).unwrap();
        assert_relative_eq!(pos.longitude, 251.4, epsilon = 0.7);
        assert_relative_eq!(pos.latitude, 10.7, epsilon = 1.2);
        assert!((29.0..32.0).contains(&pos.distance_au));
    }

    #[test]
    fn chiron_conjunct_pluto_at_j2000() {
        // The late-1999 Pluto-Chiron conjunction happened around
        // 11.4 deg Sagittarius.
        let pos = EPH.position(J2000, CelestialBody::Chiron).unwrap();
        assert_relative_eq!(pos.longitude, 251.4, epsilon = 1.2);
        assert!((9.5..11.5).contains(&pos.distance_au));
    }

    #[test]
    fn jupiter_distance_plausible() {
        let pos = EPH.position(J2000, CelestialBody::Jupiter).unwrap();
        assert!((3.9..6.5).contains(&pos.distance_au));
    }

    #[test]
    fn sun_faster_near_perihelion() {
        let january = EPH.position(2451545.0, CelestialBody::Sun).unwrap();
        let july = EPH.position(2451727.0, CelestialBody::Sun).unwrap();
        assert!(january.speed > july.speed);
    }

    #[test]
    fn epoch_guard_rejects_remote_dates() {
        assert!(matches!(
            EPH.position(1_000_000.0, CelestialBody::Sun),
            Err(CalcError::OutOfRange { .. })
        ));
    }

    #[test]
    fn signed_arc_handles_wrap() {
        assert_relative_eq!(signed_arc_deg(359.9 - 0.1), -0.2, epsilon = 1e-9);
        assert_relative_eq!(signed_arc_deg(0.1 - 359.9), 0.2, epsilon = 1e-9);
    }
}
