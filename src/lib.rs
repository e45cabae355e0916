//! Natal chart engine.
//!
//! Computes an astrological chart for a birth moment: apparent
//! ecliptic positions for the classical bodies, the lunar nodes and
//! apogee, and the four angles from a Placidus house wheel.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod chart;
pub mod coords;
pub mod ephemeris;
pub mod houses;
pub mod kepler;
pub mod time;

pub use chart::build_chart;
pub use ephemeris::Ephemeris;
pub use houses::{HouseCusps, MAX_PLACIDUS_LATITUDE_DEG};

/// Julian Day on the UT scale.
pub type JulianDay = f64;

/// J2000.0 reference epoch.
pub const J2000: JulianDay = 2451545.0;

// ---------------------------
// ## Enumerations
// ---------------------------

/// Bodies carried in every chart, in chart order. Discriminants are
/// the conventional ephemeris body numbers.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum CelestialBody {
    Sun = 0,
    Moon = 1,
    Mercury = 2,
    Venus = 3,
    Mars = 4,
    Jupiter = 5,
    Saturn = 6,
    Uranus = 7,
    Neptune = 8,
    Pluto = 9,
    NorthNode = 10,
    Lilith = 12,
    Chiron = 15,
}

impl CelestialBody {
    /// The fixed body list of a chart, in reporting order.
    pub fn iter() -> impl Iterator<Item = CelestialBody> {
        [
            CelestialBody::Sun,
            CelestialBody::Moon,
            CelestialBody::Mercury,
            CelestialBody::Venus,
            CelestialBody::Mars,
            CelestialBody::Jupiter,
            CelestialBody::Saturn,
            CelestialBody::Uranus,
            CelestialBody::Neptune,
            CelestialBody::Pluto,
            CelestialBody::NorthNode,
            CelestialBody::Chiron,
            CelestialBody::Lilith,
        ]
        .iter()
        .copied()
    }
}

impl fmt::Display for CelestialBody {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            CelestialBody::Sun => "Sun",
            CelestialBody::Moon => "Moon",
            CelestialBody::Mercury => "Mercury",
            CelestialBody::Venus => "Venus",
            CelestialBody::Mars => "Mars",
            CelestialBody::Jupiter => "Jupiter",
            CelestialBody::Saturn => "Saturn",
            CelestialBody::Uranus => "Uranus",
            CelestialBody::Neptune => "Neptune",
            CelestialBody::Pluto => "Pluto",
            CelestialBody::NorthNode => "North Node",
            CelestialBody::Lilith => "Lilith",
            CelestialBody::Chiron => "Chiron",
        };
        write!(f, "{}", name)
    }
}

/// The four angular chart points derived from the house wheel.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ChartAngle {
    Ascendant,
    Midheaven,
    Descendant,
    ImumCoeli,
}

impl fmt::Display for ChartAngle {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            ChartAngle::Ascendant => "Ascendant",
            ChartAngle::Midheaven => "Midheaven",
            ChartAngle::Descendant => "Descendant",
            ChartAngle::ImumCoeli => "IC",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ZodiacSign {
    Aries = 0,
    Taurus,
    Gemini,
    Cancer,
    Leo,
    Virgo,
    Libra,
    Scorpio,
    Sagittarius,
    Capricorn,
    Aquarius,
    Pisces,
}

impl ZodiacSign {
    /// The twelve signs in zodiacal order, 30 degrees each from Aries.
    pub const ALL: [ZodiacSign; 12] = [
        ZodiacSign::Aries,
        ZodiacSign::Taurus,
        ZodiacSign::Gemini,
        ZodiacSign::Cancer,
        ZodiacSign::Leo,
        ZodiacSign::Virgo,
        ZodiacSign::Libra,
        ZodiacSign::Scorpio,
        ZodiacSign::Sagittarius,
        ZodiacSign::Capricorn,
        ZodiacSign::Aquarius,
        ZodiacSign::Pisces,
    ];

    pub fn from_longitude(longitude: f64) -> Self {
        let normalized_longitude = longitude.rem_euclid(360.0);
        // rem_euclid of a tiny negative rounds to 360.0 itself, so the
        // index wraps rather than bounds-checks.
        Self::ALL[(normalized_longitude / 30.0) as usize % 12]
    }
}

impl fmt::Display for ZodiacSign {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let sign_str = match self {
            ZodiacSign::Aries => "Aries",
            ZodiacSign::Taurus => "Taurus",
            ZodiacSign::Gemini => "Gemini",
            ZodiacSign::Cancer => "Cancer",
            ZodiacSign::Leo => "Leo",
            ZodiacSign::Virgo => "Virgo",
            ZodiacSign::Libra => "Libra",
            ZodiacSign::Scorpio => "Scorpio",
            ZodiacSign::Sagittarius => "Sagittarius",
            ZodiacSign::Capricorn => "Capricorn",
            ZodiacSign::Aquarius => "Aquarius",
            ZodiacSign::Pisces => "Pisces",
        };
        write!(f, "{}", sign_str)
    }
}

// ---------------------------
// ## Structures
// ---------------------------

/// Geographic position with its IANA timezone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
    pub timezone: String,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64, timezone: &str) -> Self {
        GeoPoint {
            lat,
            lon,
            timezone: timezone.to_string(),
        }
    }

    pub fn edmonton() -> Self {
        GeoPoint::new(53.54, -113.49, "America/Edmonton")
    }

    pub fn london() -> Self {
        GeoPoint::new(51.5074, -0.1278, "Europe/London")
    }

    pub fn new_york() -> Self {
        GeoPoint::new(40.7128, -74.0060, "America/New_York")
    }

    pub fn delhi() -> Self {
        GeoPoint::new(28.6139, 77.2090, "Asia/Kolkata")
    }
}

impl Default for GeoPoint {
    fn default() -> Self {
        GeoPoint::new(0.0, 0.0, "UTC")
    }
}

fn default_name() -> String {
    "Unknown".to_string()
}

/// Birth record: civil date and clock time as entered, plus location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BirthData {
    #[serde(default = "default_name")]
    pub name: String,
    /// Calendar date, `YYYY-MM-DD`.
    pub date: String,
    /// Local clock time, `HH:MM`.
    pub time: String,
    #[serde(default)]
    pub location: GeoPoint,
}

/// Full-precision apparent position of a body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyPosition {
    /// Ecliptic longitude of date, degrees in [0, 360).
    pub longitude: f64,
    /// Ecliptic latitude, degrees.
    pub latitude: f64,
    /// Geocentric distance, AU.
    pub distance_au: f64,
    /// Longitude speed, degrees per day.
    pub speed: f64,
}

/// One reported chart point, rounded to reporting precision.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub longitude: f64,
    pub latitude: f64,
    pub distance_au: f64,
    pub speed: f64,
    pub retrograde: bool,
}

impl Placement {
    /// Reported form of a computed body position. The retrograde flag
    /// comes from the full-precision speed, before rounding.
    pub fn from_position(pos: &BodyPosition) -> Self {
        Placement {
            longitude: round6(pos.longitude),
            latitude: round6(pos.latitude),
            distance_au: round6(pos.distance_au),
            speed: round6(pos.speed),
            retrograde: pos.speed < 0.0,
        }
    }

    /// A derived point (node antipode or angle): longitude only, with
    /// placeholder zeros for the quantities that do not apply.
    pub fn derived(longitude: f64) -> Self {
        Placement {
            longitude,
            latitude: 0.0,
            distance_au: 0.0,
            speed: 0.0,
            retrograde: false,
        }
    }

    pub fn sign(&self) -> ZodiacSign {
        ZodiacSign::from_longitude(self.longitude)
    }

    /// Degrees into the placement's sign, in [0, 30).
    pub fn degree_in_sign(&self) -> f64 {
        normalize_degrees(self.longitude) % 30.0
    }
}

/// A computed chart. `placements` is keyed by body/point name and its
/// key set is fixed once the chart is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chart {
    pub name: String,
    pub birth_date: String,
    pub birth_time_local: String,
    pub latitude: f64,
    pub longitude: f64,
    pub timezone: String,
    pub julian_day: JulianDay,
    pub placements: HashMap<String, Placement>,
    /// Twelve Placidus cusp longitudes, house 1 first; absent when
    /// the house computation failed.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub houses: Option<[f64; 12]>,
    /// Human-readable reason the angles are missing, when they are.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error: Option<String>,
}

// ---------------------------
// ## Error Handling
// ---------------------------

/// Fatal chart construction failures.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChartError {
    /// The date string is unusable even for the noon fallback.
    #[error("birth date '{date}' could not be parsed")]
    InvalidDate { date: String },
    /// A body position could not be computed.
    #[error("calculation failed for {body}: {source}")]
    Calculation {
        body: String,
        #[source]
        source: CalcError,
    },
}

/// Engine and house computation failures.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum CalcError {
    #[error("julian day {jd} is outside the supported range")]
    OutOfRange { jd: JulianDay },
    #[error("latitude {latitude} is beyond the 66.5 degree house system limit")]
    PolarLatitude { latitude: f64 },
}

// ---------------------------
// ## Utility Functions
// ---------------------------

/// Wrap a longitude into [0, 360).
pub fn normalize_degrees(degrees: f64) -> f64 {
    degrees.rem_euclid(360.0)
}

/// Round to the six-decimal reporting precision of the chart.
pub fn round6(value: f64) -> f64 {
    (value * 1e6).round() / 1e6
}

/// Format an ecliptic longitude as degrees-minutes-seconds within its
/// zodiac sign, e.g. `11°24'00" Sagittarius`.
pub fn format_zodiacal(longitude: f64) -> String {
    let normalized = normalize_degrees(longitude);
    let sign = ZodiacSign::from_longitude(normalized);
    let in_sign = normalized % 30.0;
    let degrees = in_sign.floor();
    let minutes_full = (in_sign - degrees) * 60.0;
    let minutes = minutes_full.floor();
    let seconds = ((minutes_full - minutes) * 60.0).round();
    // Carry can push seconds to 60 at the edge of a minute.
    let (minutes, seconds) = if seconds >= 60.0 {
        (minutes + 1.0, 0.0)
    } else {
        (minutes, seconds)
    };
    let (degrees, minutes) = if minutes >= 60.0 {
        (degrees + 1.0, 0.0)
    } else {
        (degrees, minutes)
    };
    format!(
        "{}\u{b0}{:02}'{:02}\" {}",
        degrees as i64, minutes as i64, seconds as i64, sign
    )
}
