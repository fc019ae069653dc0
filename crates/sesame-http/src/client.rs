//! HTTP client for the hosted auth + data service.

use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, instrument, trace};

use sesame_core::error::{ApiError, Error, TransportError};
use sesame_core::{AccessToken, ServiceUrl};

use crate::endpoints::ApiErrorBody;

/// Header carrying the project's publishable API key.
const API_KEY_HEADER: &str = "apikey";

/// Accept value asking the tabular API for exactly one object.
///
/// With this header a zero-row result comes back as an error carrying the
/// not-found code instead of an empty array.
const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";

/// HTTP client for auth and tabular REST requests.
#[derive(Debug, Clone)]
pub struct RestClient {
    client: reqwest::Client,
    service: ServiceUrl,
    api_key: String,
}

impl RestClient {
    /// Create a new client for the given service.
    pub fn new(service: ServiceUrl, api_key: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(concat!("sesame/", env!("CARGO_PKG_VERSION")))
            .build()
            .expect("failed to build HTTP client");

        Self {
            client,
            service,
            api_key: api_key.into(),
        }
    }

    /// Returns the service URL this client is configured for.
    pub fn service(&self) -> &ServiceUrl {
        &self.service
    }

    /// Make an auth API procedure (POST request).
    #[instrument(skip(self, body, token), fields(service = %self.service))]
    pub async fn auth_procedure<B, R>(
        &self,
        path: &str,
        query: &[(&str, &str)],
        body: &B,
        token: Option<&AccessToken>,
    ) -> Result<R, Error>
    where
        B: Serialize,
        R: DeserializeOwned,
    {
        let url = self.service.auth_endpoint(path);
        debug!(path, "auth procedure");
        trace!(?query, "query parameters");

        let response = self
            .client
            .post(&url)
            .query(query)
            .json(body)
            .headers(self.headers(token))
            .send()
            .await
            .map_err(transport)?;

        self.handle_response(response).await
    }

    /// Make an auth API procedure with no request body and no response body.
    #[instrument(skip(self, token), fields(service = %self.service))]
    pub async fn auth_procedure_empty(
        &self,
        path: &str,
        token: Option<&AccessToken>,
    ) -> Result<(), Error> {
        let url = self.service.auth_endpoint(path);
        debug!(path, "auth procedure (empty)");

        let response = self
            .client
            .post(&url)
            .headers(self.headers(token))
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(Error::Api(self.parse_error_response(response).await))
        }
    }

    /// Query the tabular API for zero-or-one row of a table.
    ///
    /// Returns `Ok(None)` when the service reports the not-found status for
    /// a single-object request; any other error is propagated.
    #[instrument(skip(self, token), fields(service = %self.service, table))]
    pub async fn select_single<R>(
        &self,
        table: &str,
        columns: &str,
        filters: &[(&str, String)],
        token: Option<&AccessToken>,
    ) -> Result<Option<R>, Error>
    where
        R: DeserializeOwned,
    {
        let url = self.service.rest_endpoint(table);
        debug!(table, "single-row select");
        trace!(?filters, columns, "select parameters");

        let mut headers = self.headers(token);
        headers.insert(ACCEPT, HeaderValue::from_static(SINGLE_OBJECT));

        let response = self
            .client
            .get(&url)
            .query(&[("select", columns)])
            .query(filters)
            .headers(headers)
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        if status.is_success() {
            let row = response.json::<R>().await.map_err(transport)?;
            return Ok(Some(row));
        }

        let error = self.parse_error_response(response).await;
        if error.is_not_found() {
            debug!(table, "no row matched");
            Ok(None)
        } else {
            Err(Error::Api(error))
        }
    }

    /// Create request headers: API key plus bearer auth.
    ///
    /// Unauthenticated requests carry the API key as the bearer token, as
    /// the service expects.
    fn headers(&self, token: Option<&AccessToken>) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_static(API_KEY_HEADER),
            HeaderValue::from_str(&self.api_key).expect("invalid api key characters"),
        );
        let bearer = match token {
            Some(token) => format!("Bearer {}", token.as_str()),
            None => format!("Bearer {}", self.api_key),
        };
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&bearer).expect("invalid token characters"),
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers
    }

    /// Handle a service response, parsing the body or error.
    async fn handle_response<R: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<R, Error> {
        let status = response.status();
        trace!(status = %status, "service response");

        if status.is_success() {
            let body = response.json::<R>().await.map_err(transport)?;
            Ok(body)
        } else {
            Err(Error::Api(self.parse_error_response(response).await))
        }
    }

    /// Parse a service error response.
    async fn parse_error_response(&self, response: reqwest::Response) -> ApiError {
        let status = response.status().as_u16();

        match response.json::<ApiErrorBody>().await {
            Ok(body) => ApiError::new(status, body.error_code(), body.error_message()),
            Err(_) => ApiError::new(status, None, None),
        }
    }
}

/// Map a reqwest error onto the crate's transport error.
pub(crate) fn transport(err: reqwest::Error) -> Error {
    if err.is_timeout() {
        Error::Transport(TransportError::Timeout)
    } else if err.is_connect() {
        Error::Transport(TransportError::Connection {
            message: err.to_string(),
        })
    } else {
        Error::Transport(TransportError::Http {
            message: err.to_string(),
        })
    }
}
