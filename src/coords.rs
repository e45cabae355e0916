//! Ecliptic reference-frame corrections and coordinate transforms.
//!
//! Angles are degrees at the API surface; trigonometry is done in
//! radians internally. `t` arguments are Julian centuries of TT since
//! J2000.0.

/// Kilometres per astronomical unit (IAU 2012).
pub const AU_KM: f64 = 149_597_870.7;

/// Light travel time across one AU, in days.
pub const LIGHT_TIME_DAYS_PER_AU: f64 = 0.0057755183;

/// Mean obliquity of the ecliptic (IAU 1980 polynomial), degrees.
pub fn mean_obliquity_deg(t: f64) -> f64 {
    23.43929111 - (46.8150 * t + 0.00059 * t * t - 0.001813 * t.powi(3)) / 3600.0
}

/// Nutation in longitude and obliquity, degrees.
///
/// Principal-term series; accurate to about half an arcsecond, which
/// is far below the reporting precision of the chart.
pub fn nutation_deg(t: f64) -> (f64, f64) {
    let omega = (125.04452 - 1934.136261 * t).to_radians();
    let l_sun = (280.4665 + 36000.7698 * t).to_radians();
    let l_moon = (218.3165 + 481267.8813 * t).to_radians();

    let dpsi_arcsec = -17.20 * omega.sin()
        - 1.32 * (2.0 * l_sun).sin()
        - 0.23 * (2.0 * l_moon).sin()
        + 0.21 * (2.0 * omega).sin();
    let deps_arcsec = 9.20 * omega.cos()
        + 0.57 * (2.0 * l_sun).cos()
        + 0.10 * (2.0 * l_moon).cos()
        - 0.09 * (2.0 * omega).cos();

    (dpsi_arcsec / 3600.0, deps_arcsec / 3600.0)
}

/// True obliquity (mean plus nutation in obliquity), degrees.
pub fn true_obliquity_deg(t: f64) -> f64 {
    mean_obliquity_deg(t) + nutation_deg(t).1
}

/// Precess ecliptic coordinates from J2000.0 to the ecliptic of date.
///
/// Rigorous rotation (Meeus Ch. 21): `eta` is the angle between the
/// two ecliptics, `pi` the J2000 longitude of their intersection and
/// `p` the accumulated general precession.
pub fn precess_ecliptic_from_j2000(lon_deg: f64, lat_deg: f64, t: f64) -> (f64, f64) {
    let eta = ((47.0029 * t - 0.03302 * t * t + 0.000060 * t.powi(3)) / 3600.0).to_radians();
    let pi = (174.876384 + (-869.8089 * t + 0.03536 * t * t) / 3600.0).to_radians();
    let p = ((5029.0966 * t + 1.11113 * t * t - 0.000006 * t.powi(3)) / 3600.0).to_radians();

    let lon = lon_deg.to_radians();
    let lat = lat_deg.to_radians();

    let a = eta.cos() * lat.cos() * (pi - lon).sin() - eta.sin() * lat.sin();
    let b = lat.cos() * (pi - lon).cos();
    let c = eta.cos() * lat.sin() + eta.sin() * lat.cos() * (pi - lon).sin();

    let new_lon = (p + pi - f64::atan2(a, b)).to_degrees().rem_euclid(360.0);
    let new_lat = c.asin().to_degrees();
    (new_lon, new_lat)
}

/// Ecliptic spherical (degrees, AU) to rectangular coordinates.
pub fn ecliptic_to_rect(lon_deg: f64, lat_deg: f64, r: f64) -> [f64; 3] {
    let lon = lon_deg.to_radians();
    let lat = lat_deg.to_radians();
    [
        r * lat.cos() * lon.cos(),
        r * lat.cos() * lon.sin(),
        r * lat.sin(),
    ]
}

/// Rectangular ecliptic coordinates back to spherical (degrees, AU).
pub fn rect_to_ecliptic(v: [f64; 3]) -> (f64, f64, f64) {
    let r = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
    let lon = f64::atan2(v[1], v[0]).to_degrees().rem_euclid(360.0);
    let lat = (v[2] / r).asin().to_degrees();
    (lon, lat, r)
}

/// Annual aberration in solar longitude, degrees (add to the
/// geometric longitude). `distance_au` is the Sun-Earth distance.
pub fn solar_aberration_deg(distance_au: f64) -> f64 {
    -20.4898 / 3600.0 / distance_au
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    // Julian centuries for 1987-04-10.0 TD, a standard reference epoch.
    const T_1987: f64 = (2446895.5 - 2451545.0) / 36525.0;

    #[test]
    fn mean_obliquity_at_j2000() {
        assert_relative_eq!(mean_obliquity_deg(0.0), 23.4392911, epsilon = 1e-6);
    }

    #[test]
    fn mean_obliquity_1987_reference() {
        // 23 deg 26' 27.407"
        assert_relative_eq!(mean_obliquity_deg(T_1987), 23.440946, epsilon = 1e-5);
    }

    #[test]
    fn nutation_1987_reference() {
        // Full-series values: dpsi = -3.788", deps = +9.443"
        let (dpsi, deps) = nutation_deg(T_1987);
        assert_relative_eq!(dpsi * 3600.0, -3.788, epsilon = 0.5);
        assert_relative_eq!(deps * 3600.0, 9.443, epsilon = 0.5);
    }

    #[test]
    fn precession_identity_at_epoch() {
        let (lon, lat) = precess_ecliptic_from_j2000(100.0, 5.0, 0.0);
        assert_relative_eq!(lon, 100.0, epsilon = 1e-9);
        assert_relative_eq!(lat, 5.0, epsilon = 1e-9);
    }

    #[test]
    fn precession_quarter_century_rate() {
        // 25 years of general precession, about 0.349 degrees.
        let (lon, lat) = precess_ecliptic_from_j2000(0.0, 0.0, 0.25);
        assert_relative_eq!(lon, 0.3493, epsilon = 1e-3);
        assert!(lat.abs() < 1e-3);
    }

    #[test]
    fn rect_spherical_roundtrip() {
        let rect = ecliptic_to_rect(123.4, -4.5, 2.3);
        let (lon, lat, r) = rect_to_ecliptic(rect);
        assert_relative_eq!(lon, 123.4, epsilon = 1e-9);
        assert_relative_eq!(lat, -4.5, epsilon = 1e-9);
        assert_relative_eq!(r, 2.3, epsilon = 1e-9);
    }

    #[test]
    fn aberration_at_one_au() {
        assert_relative_eq!(solar_aberration_deg(1.0), -0.0056916, epsilon = 1e-6);
    }
}
