use anyhow::anyhow;
use reqwest::{StatusCode, Url};

use crate::model::Kiosk;

const KIOSKS_PATH: &str = "/api/machines";
const SEARCH_PATH: &str = "/api/machines/search";

/// Client for the kiosk store.
#[derive(Clone)]
pub struct Client {
    inner: reqwest::Client,
    base: Url,
}

impl Client {
    pub fn new(base: &str) -> anyhow::Result<Self> {
        let client = reqwest::Client::new();
        let base = base
            .parse()
            .map_err(|e| anyhow!("{} is not a valid url: {}", base, e))?;

        Ok(Self {
            inner: client,
            base,
        })
    }

    /// Every kiosk in the store, in store order.
    pub async fn list(&self) -> anyhow::Result<Vec<Kiosk>> {
        let url = self
            .base
            .join(KIOSKS_PATH)
            .map_err(|e| anyhow!("error joining url: {e}"))?;

        self.fetch(url).await
    }

    /// Kiosks in `city` (and `district`), filtered by the store itself.
    ///
    /// Blank arguments count as absent; with neither given this is [`Client::list`].
    pub async fn search(
        &self,
        city: Option<&str>,
        district: Option<&str>,
    ) -> anyhow::Result<Vec<Kiosk>> {
        match self.search_url(city, district)? {
            Some(url) => self.fetch(url).await,
            None => self.list().await,
        }
    }

    fn search_url(&self, city: Option<&str>, district: Option<&str>) -> anyhow::Result<Option<Url>> {
        let city = city.map(str::trim).filter(|c| !c.is_empty());
        let district = district.map(str::trim).filter(|d| !d.is_empty());

        if city.is_none() && district.is_none() {
            return Ok(None);
        }

        let mut url = self
            .base
            .join(SEARCH_PATH)
            .map_err(|e| anyhow!("error joining url: {e}"))?;

        {
            let mut query = url.query_pairs_mut();
            query.append_pair("city", city.unwrap_or(""));
            if let Some(district) = district {
                query.append_pair("district", district);
            }
        }

        Ok(Some(url))
    }

    async fn fetch(&self, url: Url) -> anyhow::Result<Vec<Kiosk>> {
        let response = self.inner.get(url).send().await?;

        // the store answers 204 instead of an empty array
        if response.status() == StatusCode::NO_CONTENT {
            return Ok(Vec::new());
        }

        let kiosks = response.error_for_status()?.json().await?;

        Ok(kiosks)
    }
}
