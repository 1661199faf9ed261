use anyhow::anyhow;
use reqwest::Url;

use super::types::*;
use crate::geocode::Geocoder;
use crate::model::{Coord, Region};

pub const DEFAULT_BASE: &str = "https://dapi.kakao.com";

const KEYWORD_SEARCH_PATH: &str = "/v2/local/search/keyword.json";
const COORD_TO_ADDRESS_PATH: &str = "/v2/local/geo/coord2address.json";

/// Kakao Local API client.
#[derive(Clone)]
pub struct Client {
    inner: reqwest::Client,
    base: Url,
    authorization: String,
}

impl Client {
    pub fn new(base: &str, api_key: &str) -> anyhow::Result<Self> {
        let client = reqwest::Client::new();
        let base = base
            .parse()
            .map_err(|e| anyhow!("{} is not a valid url: {}", base, e))?;

        Ok(Self {
            inner: client,
            base,
            authorization: format!("KakaoAK {api_key}"),
        })
    }

    fn url(&self, path: &str) -> anyhow::Result<Url> {
        self.base
            .join(path)
            .map_err(|e| anyhow!("error joining url: {e}"))
    }

    pub async fn keyword_search(&self, query: &str) -> anyhow::Result<KeywordSearchResponse> {
        let url = self.url(KEYWORD_SEARCH_PATH)?;

        let response = self
            .inner
            .get(url)
            .header(reqwest::header::AUTHORIZATION, &self.authorization)
            .query(&[("query", query)])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(response)
    }

    /// City and district containing `coord`, if the provider knows it.
    pub async fn region(&self, coord: Coord) -> anyhow::Result<Option<Region>> {
        let url = self.url(COORD_TO_ADDRESS_PATH)?;

        let response: CoordToAddressResponse = self
            .inner
            .get(url)
            .header(reqwest::header::AUTHORIZATION, &self.authorization)
            .query(&[("x", coord.lon), ("y", coord.lat)])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(response.region())
    }
}

impl Geocoder for Client {
    async fn search(&self, query: &str) -> anyhow::Result<Vec<Coord>> {
        let response = self.keyword_search(query).await?;

        Ok(response
            .documents
            .iter()
            .filter_map(Place::coord)
            .collect())
    }
}
