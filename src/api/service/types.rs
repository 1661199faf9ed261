use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::model::{Filter, NearestKiosk, Region, ResolvedMarker};

#[derive(Serialize, Deserialize)]
pub struct MarkersRequest {
    #[serde(default)]
    pub keyword: String,

    #[serde(default)]
    pub line: String,

    pub city: Option<String>,
    pub district: Option<String>,
}

impl MarkersRequest {
    pub fn filter(&self) -> Filter {
        Filter::new(self.keyword.clone(), self.line.clone())
    }
}

#[derive(Serialize, Deserialize)]
pub struct MarkersResponse {
    pub markers: Vec<ResolvedMarker>,
}

#[derive(Serialize, Deserialize)]
pub struct NearestRequest {
    pub lat: f64,
    pub lon: f64,

    #[serde(default)]
    pub keyword: String,

    #[serde(default)]
    pub line: String,
}

#[derive(Serialize, Deserialize)]
pub struct NearestResponse {
    pub nearest: Option<NearestKiosk>,
}

#[derive(Serialize, Deserialize)]
pub struct RegionRequest {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Serialize, Deserialize)]
pub struct RegionResponse {
    pub region: Option<Region>,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub message: String,

    #[serde(skip)]
    pub status: StatusCode,
}
