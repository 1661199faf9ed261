use std::env::VarError;

use anyhow::anyhow;

use crate::api::kakao;
use crate::geocode::DEFAULT_CITY_PREFIX;

pub const REQUIRED_VARIABLES: &[&str] = &["STORE_URL", "KAKAO_API_KEY"];

const DEFAULT_LISTEN_PORT: u16 = 8080;

pub struct Config {
    pub store_url: String,
    pub kakao_api_key: String,
    pub kakao_url: String,
    pub listen_port: u16,
    pub city_prefix: String,
}

impl Config {
    pub fn env() -> anyhow::Result<Self> {
        Self::from_lookup(|name| std::env::var(name))
    }

    fn from_lookup(lookup: impl Fn(&str) -> Result<String, VarError>) -> anyhow::Result<Self> {
        let store_url = required(&lookup, "STORE_URL")?;
        let kakao_api_key = required(&lookup, "KAKAO_API_KEY")?;

        let kakao_url = optional(&lookup, "KAKAO_URL")?
            .unwrap_or_else(|| kakao::client::DEFAULT_BASE.to_string());
        let city_prefix = optional(&lookup, "CITY_PREFIX")?
            .unwrap_or_else(|| DEFAULT_CITY_PREFIX.to_string());

        let listen_port = match optional(&lookup, "LISTEN_PORT")? {
            Some(port) => port
                .parse()
                .map_err(|e| anyhow!("LISTEN_PORT {port:?} is not a valid port: {e}"))?,
            None => DEFAULT_LISTEN_PORT,
        };

        Ok(Self {
            store_url,
            kakao_api_key,
            kakao_url,
            listen_port,
            city_prefix,
        })
    }

    pub fn log(&self) {
        log::info!("STORE_URL = {}", self.store_url);
        log::info!("KAKAO_URL = {}", self.kakao_url);
        log::info!("LISTEN_PORT = {}", self.listen_port);
        log::info!("CITY_PREFIX = {}", self.city_prefix);
    }
}

fn required(lookup: impl Fn(&str) -> Result<String, VarError>, name: &str) -> anyhow::Result<String> {
    optional(lookup, name)?.ok_or_else(|| anyhow!("{name} not set"))
}

fn optional(
    lookup: impl Fn(&str) -> Result<String, VarError>,
    name: &str,
) -> anyhow::Result<Option<String>> {
    match lookup(name) {
        Ok(value) => Ok(Some(value)),
        Err(VarError::NotPresent) => Ok(None),
        Err(VarError::NotUnicode(_)) => Err(anyhow!("{name} value is not valid unicode")),
    }
}
