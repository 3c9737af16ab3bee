//! EC2 provider configuration.

use std::fmt;
use std::time::Duration;

use reqwest::Url;

use crate::ProviderError;

/// Region used when neither `AWS_REGION` nor `AWS_DEFAULT_REGION` is set.
pub const DEFAULT_REGION: &str = "us-east-1";

/// Request timeout used when `KINDLE_EC2_TIMEOUT_SECS` is not set.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Static AWS credentials used to sign requests.
#[derive(Clone)]
#[non_exhaustive]
pub struct AwsCredentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    /// Present for temporary credentials, such as those of a function role.
    pub session_token: Option<String>,
}

impl AwsCredentials {
    #[must_use]
    pub fn new(
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
        session_token: Option<String>,
    ) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            session_token,
        }
    }
}

impl fmt::Debug for AwsCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AwsCredentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .field("session_token", &self.session_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Configuration for [`Ec2Provider`](crate::Ec2Provider).
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct Ec2Config {
    /// Region the instance lives in; also the SigV4 signing region.
    pub region: String,

    /// Query API endpoint, normally `https://ec2.<region>.amazonaws.com/`.
    pub endpoint: Url,

    pub credentials: AwsCredentials,

    /// Upper bound on one `StartInstances` round trip.
    pub timeout: Duration,
}

impl Ec2Config {
    /// Create a config for the public endpoint of `region`.
    ///
    /// # Errors
    /// Returns [`ProviderError::Config`] if the region does not form a valid URL.
    pub fn new(region: impl Into<String>, credentials: AwsCredentials) -> Result<Self, ProviderError> {
        let region = region.into();
        let endpoint = default_endpoint(&region)?;
        Ok(Self { region, endpoint, credentials, timeout: DEFAULT_TIMEOUT })
    }

    /// Replace the endpoint, e.g. with a VPC endpoint or a local test server.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: Url) -> Self {
        self.endpoint = endpoint;
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build a config from environment-style variables.
    ///
    /// Reads `AWS_REGION` (falling back to `AWS_DEFAULT_REGION`),
    /// `AWS_ACCESS_KEY_ID`, `AWS_SECRET_ACCESS_KEY`, `AWS_SESSION_TOKEN`,
    /// `KINDLE_EC2_ENDPOINT` and `KINDLE_EC2_TIMEOUT_SECS`. Empty values count
    /// as unset.
    ///
    /// # Errors
    /// Returns [`ProviderError::Credentials`] if the access key or secret is
    /// missing, and [`ProviderError::Config`] if the endpoint or timeout is malformed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ProviderError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        let region = get("AWS_REGION")
            .or_else(|| get("AWS_DEFAULT_REGION"))
            .unwrap_or_else(|| DEFAULT_REGION.to_owned());

        let access_key_id = get("AWS_ACCESS_KEY_ID")
            .ok_or_else(|| ProviderError::Credentials("AWS_ACCESS_KEY_ID is not set".to_owned()))?;
        let secret_access_key = get("AWS_SECRET_ACCESS_KEY").ok_or_else(|| {
            ProviderError::Credentials("AWS_SECRET_ACCESS_KEY is not set".to_owned())
        })?;
        let credentials =
            AwsCredentials::new(access_key_id, secret_access_key, get("AWS_SESSION_TOKEN"));

        let mut config = Self::new(region, credentials)?;

        if let Some(raw) = get("KINDLE_EC2_ENDPOINT") {
            let endpoint = Url::parse(&raw).map_err(|e| {
                ProviderError::Config(format!("KINDLE_EC2_ENDPOINT {raw:?} is not a URL: {e}"))
            })?;
            config = config.with_endpoint(endpoint);
        }

        if let Some(raw) = get("KINDLE_EC2_TIMEOUT_SECS") {
            let secs: u64 = raw.parse().map_err(|e| {
                ProviderError::Config(format!("KINDLE_EC2_TIMEOUT_SECS {raw:?}: {e}"))
            })?;
            config = config.with_timeout(Duration::from_secs(secs));
        }

        Ok(config)
    }
}

fn default_endpoint(region: &str) -> Result<Url, ProviderError> {
    Url::parse(&format!("https://ec2.{region}.amazonaws.com/"))
        .map_err(|e| ProviderError::Config(format!("invalid region {region:?}: {e}")))
}
