use conoha_api::{Credentials, DEFAULT_REGION, Endpoints};

use crate::{Error, Result};

/// Account credentials and service endpoints.
#[derive(Debug, Clone)]
pub struct ConohaConfig {
    pub credentials: Credentials,
    pub region: String,
    pub endpoints: Endpoints,
}

impl ConohaConfig {
    /// Load from env vars (a `.env` file is read first if present):
    ///
    /// - `OS_USERNAME`, `OS_PASSWORD`, `OS_TENANT_ID` (required)
    /// - `CONOHA_REGION` (default: `"tyo2"`)
    /// - `CONOHA_IDENTITY_URL`, `CONOHA_COMPUTE_URL`, `CONOHA_ACCOUNT_URL`
    ///   (optional, override the region-derived URLs)
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let required = |key: &str| {
            lookup(key)
                .filter(|value| !value.is_empty())
                .ok_or_else(|| Error::MissingEnv(key.into()))
        };

        let credentials = Credentials {
            username: required("OS_USERNAME")?,
            password: required("OS_PASSWORD")?,
            tenant_id: required("OS_TENANT_ID")?,
        };

        let region = lookup("CONOHA_REGION").unwrap_or_else(|| DEFAULT_REGION.into());

        let mut endpoints = Endpoints::for_region(&region, &credentials.tenant_id);
        if let Some(url) = lookup("CONOHA_IDENTITY_URL") {
            endpoints.identity = url;
        }
        if let Some(url) = lookup("CONOHA_COMPUTE_URL") {
            endpoints.compute = url;
        }
        if let Some(url) = lookup("CONOHA_ACCOUNT_URL") {
            endpoints.account = url;
        }

        Ok(Self {
            credentials,
            region,
            endpoints,
        })
    }
}
