use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coord {
    pub lat: f64,
    pub lon: f64,
}

impl Coord {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KioskId(pub String);

impl From<&str> for KioskId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl std::fmt::Display for KioskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A kiosk record as served by the kiosk store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Kiosk {
    #[serde(default)]
    pub id: KioskId,

    #[serde(rename = "stationName", default, deserialize_with = "null_as_empty")]
    pub station_name: String,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub line: String,

    #[serde(rename = "detailLocation", default)]
    pub detail_location: Option<String>,

    #[serde(default)]
    pub contractor: Option<String>,

    #[serde(default)]
    pub phone: Option<String>,

    #[serde(default)]
    pub latitude: Option<f64>,

    #[serde(default)]
    pub longitude: Option<f64>,

    #[serde(rename = "deviceType", default, skip_serializing_if = "Option::is_none")]
    pub device_type: Option<String>,

    #[serde(rename = "locationType", default, skip_serializing_if = "Option::is_none")]
    pub location_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub floor: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub district: Option<String>,
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl Kiosk {
    /// Stored coordinate, if the kiosk is coordinate-resolved.
    ///
    /// Zero on either axis means "absent": the store writes `0.0` when its
    /// own geocoding failed, and no kiosk sits at the origin.
    pub fn coord(&self) -> Option<Coord> {
        let lat = self.latitude?;
        let lon = self.longitude?;

        if lat == 0.0 || lon == 0.0 || !lat.is_finite() || !lon.is_finite() {
            return None;
        }

        Some(Coord { lat, lon })
    }

    pub fn is_resolved(&self) -> bool {
        self.coord().is_some()
    }

    pub fn detail(&self) -> &str {
        self.detail_location.as_deref().unwrap_or("")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filter {
    #[serde(default)]
    pub keyword: String,

    #[serde(default)]
    pub line: String,
}

impl Filter {
    pub fn new(keyword: impl Into<String>, line: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            line: line.into(),
        }
    }
}

/// A kiosk with a concrete position, ready to be placed on the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedMarker {
    pub kiosk: Kiosk,
    pub coord: Coord,

    /// Geocoding query that produced `coord`; `None` when the store already had it.
    pub query: Option<String>,
}

/// The kiosk closest to a reference point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearestKiosk {
    pub kiosk: Kiosk,
    pub coord: Coord,

    #[serde(rename = "distanceKm")]
    pub distance_km: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub city: String,
    pub district: String,
}
