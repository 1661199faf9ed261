use serde::{Deserialize, Serialize};

use crate::model::{Coord, Region};

#[derive(Serialize, Deserialize)]
pub struct KeywordSearchResponse {
    pub documents: Vec<Place>,
}

/// One keyword search hit. Coordinates come back as decimal strings.
#[derive(Serialize, Deserialize)]
pub struct Place {
    #[serde(default)]
    pub place_name: String,

    /// Longitude.
    pub x: String,

    /// Latitude.
    pub y: String,
}

impl Place {
    pub fn coord(&self) -> Option<Coord> {
        let lon: f64 = self.x.trim().parse().ok()?;
        let lat: f64 = self.y.trim().parse().ok()?;

        (lat.is_finite() && lon.is_finite()).then_some(Coord { lat, lon })
    }
}

#[derive(Serialize, Deserialize)]
pub struct CoordToAddressResponse {
    pub documents: Vec<AddressDocument>,
}

impl CoordToAddressResponse {
    /// Region of the first document; `None` when it has no address.
    pub fn region(self) -> Option<Region> {
        self.documents
            .into_iter()
            .next()
            .and_then(|d| d.address)
            .map(Region::from)
    }
}

#[derive(Serialize, Deserialize)]
pub struct AddressDocument {
    pub address: Option<Address>,
}

#[derive(Serialize, Deserialize)]
pub struct Address {
    pub region_1depth_name: String,
    pub region_2depth_name: String,
}

impl From<Address> for Region {
    fn from(value: Address) -> Self {
        Region {
            city: value.region_1depth_name,
            district: value.region_2depth_name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_keyword_search() {
        let json = r#"{
            "meta": {"total_count": 2},
            "documents": [
                {"place_name": "잠실역 2호선", "x": "127.100555", "y": "37.513119", "category_name": "교통"},
                {"place_name": "broken", "x": "", "y": "37.5"}
            ]
        }"#;

        let response: KeywordSearchResponse = serde_json::from_str(json).unwrap();
        let coords: Vec<_> = response.documents.iter().filter_map(Place::coord).collect();

        assert_eq!(coords, [Coord::new(37.513119, 127.100555)]);
    }

    #[test]
    fn decodes_region() {
        let json = r#"{
            "documents": [{
                "address": {
                    "address_name": "서울 강남구 역삼동 858",
                    "region_1depth_name": "서울",
                    "region_2depth_name": "강남구",
                    "region_3depth_name": "역삼동"
                },
                "road_address": null
            }]
        }"#;

        let response: CoordToAddressResponse = serde_json::from_str(json).unwrap();
        let region = response.region().unwrap();

        assert_eq!(region.city, "서울");
        assert_eq!(region.district, "강남구");
    }

    #[test]
    fn region_only_from_first_document() {
        let json = r#"{
            "documents": [
                {"address": null, "road_address": null},
                {"address": {"region_1depth_name": "서울", "region_2depth_name": "송파구"}}
            ]
        }"#;

        let response: CoordToAddressResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.region(), None);

        let empty: CoordToAddressResponse = serde_json::from_str(r#"{"documents": []}"#).unwrap();
        assert_eq!(empty.region(), None);
    }
}
