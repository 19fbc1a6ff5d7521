use reqwest::Url;

use crate::error::{Result, WatchError};

/// Separates the address from the extraction rule inside a store key.
pub const KEY_DELIMITER: &str = "\n\n###\n\n";

/// One watched resource, decoded from a store key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub address: String,
    pub extraction_rule: String,
}

impl Target {
    /// Decode a store key into its address and extraction rule.
    pub fn resolve(key: &str) -> Result<Self> {
        let parts: Vec<&str> = key.split(KEY_DELIMITER).collect();
        match parts.as_slice() {
            [address, rule] if !address.is_empty() && !rule.is_empty() => Ok(Self {
                address: address.to_string(),
                extraction_rule: rule.to_string(),
            }),
            _ => Err(WatchError::MalformedKey(key.to_string())),
        }
    }

    /// Retrieval URL with a cache-busting query parameter appended.
    ///
    /// Any query already present on the address is preserved.
    pub fn locator(&self, param: &str, token: &str) -> Result<Url> {
        let mut url = Url::parse(&self.address).map_err(|e| WatchError::FetchFailed {
            url: self.address.clone(),
            reason: format!("invalid address: {}", e),
        })?;
        url.query_pairs_mut().append_pair(param, token);
        Ok(url)
    }
}
