use std::collections::BTreeMap;

use camino::Utf8Path;
use config::{Config, File, FileFormat};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{SwitchError, SwitchResult};

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Z2mConfig {
    #[serde(default)]
    pub servers: BTreeMap<String, Z2mServer>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Z2mServer {
    pub url: Url,
    pub disable_tls_verify: Option<bool>,
}

impl Z2mServer {
    /// Websocket url, with the `/api` path that z2m 2.x requires
    #[must_use]
    pub fn get_url(&self) -> Url {
        let mut url = self.url.clone();
        if matches!(url.path(), "" | "/") {
            url.set_path("/api");
        }
        url
    }

    /// Websocket url with the auth token masked, for logging
    #[must_use]
    pub fn get_sanitized_url(&self) -> Url {
        let mut url = self.get_url();
        if url.query_pairs().any(|(key, _)| key == "token") {
            let pairs: Vec<(String, String)> = url
                .query_pairs()
                .map(|(key, value)| {
                    let value = if key == "token" { "<redacted>".into() } else { value };
                    (key.into_owned(), value.into_owned())
                })
                .collect();
            url.query_pairs_mut().clear().extend_pairs(pairs);
        }
        url
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeviceConfig {
    #[serde(default = "DeviceConfig::default_friendly_name")]
    pub friendly_name: String,
    #[serde(default = "DeviceConfig::default_endpoints")]
    pub endpoints: u8,
    #[serde(default = "DeviceConfig::default_first_endpoint")]
    pub first_endpoint: u8,
}

impl DeviceConfig {
    fn default_friendly_name() -> String {
        "hello_switch".to_string()
    }

    const fn default_endpoints() -> u8 {
        1
    }

    const fn default_first_endpoint() -> u8 {
        2
    }
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            friendly_name: Self::default_friendly_name(),
            endpoints: Self::default_endpoints(),
            first_endpoint: Self::default_first_endpoint(),
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub z2m: Z2mConfig,
    #[serde(default)]
    pub device: DeviceConfig,
}

impl AppConfig {
    pub fn server(&self, name: &str) -> SwitchResult<&Z2mServer> {
        self.z2m
            .servers
            .get(name)
            .ok_or_else(|| SwitchError::UnknownServer(name.to_string()))
    }
}

pub fn parse(filename: &Utf8Path) -> SwitchResult<AppConfig> {
    if !filename.is_file() {
        return Err(SwitchError::ConfigMissing(filename.to_path_buf()));
    }

    let settings = Config::builder()
        .add_source(File::new(filename.as_str(), FileFormat::Yaml))
        .build()?;

    Ok(settings.try_deserialize()?)
}

pub fn parse_str(text: &str) -> SwitchResult<AppConfig> {
    let settings = Config::builder()
        .add_source(File::from_str(text, FileFormat::Yaml))
        .build()?;

    Ok(settings.try_deserialize()?)
}
