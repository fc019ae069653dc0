//! Hosted service base URL type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use url::Url;

use crate::error::{Error, InvalidInputError};

/// A validated base URL for the hosted auth + data service.
///
/// Network URLs must use HTTPS (or HTTP for localhost, which the mock
/// servers used in tests rely on).
///
/// # Example
///
/// ```
/// use sesame_core::ServiceUrl;
///
/// let service = ServiceUrl::new("https://project-ref.example.co").unwrap();
/// assert_eq!(service.auth_endpoint("token"),
///            "https://project-ref.example.co/auth/v1/token");
/// assert_eq!(service.rest_endpoint("profiles"),
///            "https://project-ref.example.co/rest/v1/profiles");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ServiceUrl(Url);

impl ServiceUrl {
    /// Create a new service URL from a string, validating the format.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is not valid or doesn't meet requirements.
    pub fn new(s: impl AsRef<str>) -> Result<Self, Error> {
        let s = s.as_ref();
        let url = Url::parse(s).map_err(|e| InvalidInputError::ServiceUrl {
            value: s.to_string(),
            reason: e.to_string(),
        })?;

        Self::validate(&url, s)?;

        // Normalize: remove trailing slash
        let normalized = if url.path() == "/" {
            let mut u = url.clone();
            u.set_path("");
            u
        } else {
            url
        };

        Ok(Self(normalized))
    }

    /// Returns the auth API endpoint URL for a given path.
    pub fn auth_endpoint(&self, path: &str) -> String {
        // The URL crate always adds a trailing slash to root paths,
        // so trim it off before appending the API path
        let base = self.0.as_str().trim_end_matches('/');
        format!("{}/auth/v1/{}", base, path)
    }

    /// Returns the tabular REST endpoint URL for a given table.
    pub fn rest_endpoint(&self, table: &str) -> String {
        let base = self.0.as_str().trim_end_matches('/');
        format!("{}/rest/v1/{}", base, table)
    }

    /// Returns the base URL as a string.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Returns the host string.
    pub fn host(&self) -> Option<&str> {
        self.0.host_str()
    }

    fn validate(url: &Url, original: &str) -> Result<(), Error> {
        // Must be absolute
        if url.cannot_be_a_base() {
            return Err(InvalidInputError::ServiceUrl {
                value: original.to_string(),
                reason: "must be an absolute URL".to_string(),
            }
            .into());
        }

        // Must be HTTPS (or HTTP for localhost)
        let is_localhost = url
            .host_str()
            .is_some_and(|h| h == "localhost" || h == "127.0.0.1" || h == "::1");

        let scheme = url.scheme();
        if scheme != "https" && !(scheme == "http" && is_localhost) {
            return Err(InvalidInputError::ServiceUrl {
                value: original.to_string(),
                reason: "must use HTTPS (HTTP allowed only for localhost)".to_string(),
            }
            .into());
        }

        // Must have a host
        if url.host_str().is_none() {
            return Err(InvalidInputError::ServiceUrl {
                value: original.to_string(),
                reason: "must have a host".to_string(),
            }
            .into());
        }

        Ok(())
    }
}

impl fmt::Display for ServiceUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ServiceUrl {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl Serialize for ServiceUrl {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.0.as_str())
    }
}

impl<'de> Deserialize<'de> for ServiceUrl {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        ServiceUrl::new(&s).map_err(serde::de::Error::custom)
    }
}

impl AsRef<str> for ServiceUrl {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}
