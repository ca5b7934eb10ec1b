use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use url::Url;
use valuta_core::{BulletinFetcher, CancellationToken, FetchError};

/// English-language daily bulletin endpoint of the Central Bank of Russia.
pub const DEFAULT_BASE_URL: &str = "http://www.cbr.ru/scripts/XML_daily_eng.asp";

/// Per-request timeout applied unless overridden.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Fetches one daily bulletin per request over HTTP.
///
/// The requested day is sent as `date_req=DD/MM/YYYY`. A 2xx response yields its body
/// verbatim (possibly empty); any other status becomes `FetchError::Status`.
#[derive(Debug, Clone)]
pub struct CbrFetcher {
    client: Client,
    base_url: Url,
    request_timeout: Option<Duration>,
}

impl CbrFetcher {
    /// Identifier used in logs.
    pub const KEY: &'static str = "valuta-cbr";

    /// Create a fetcher for `base_url` with a default client.
    ///
    /// # Errors
    /// Returns `FetchError::InvalidUrl` if `base_url` does not parse or is not http(s).
    pub fn new(base_url: &str) -> Result<Self, FetchError> {
        let invalid = |msg: String| FetchError::InvalidUrl {
            url: base_url.to_string(),
            msg,
        };
        let parsed = Url::parse(base_url).map_err(|e| invalid(e.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme '{}'", parsed.scheme())));
        }
        Ok(Self {
            client: Client::new(),
            base_url: parsed,
            request_timeout: Some(DEFAULT_REQUEST_TIMEOUT),
        })
    }

    /// Use a preconfigured `reqwest::Client` (proxies, TLS roots, user agent).
    #[must_use]
    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    /// Override the per-request timeout. `None` leaves requests bounded only by
    /// cancellation and the client's own settings.
    #[must_use]
    pub const fn request_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// The configured base URL.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Full request URL for `date`.
    #[must_use]
    pub fn request_url(&self, date: NaiveDate) -> Url {
        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .append_pair("date_req", &date.format("%d/%m/%Y").to_string());
        url
    }

    async fn get(&self, date: NaiveDate) -> Result<Vec<u8>, FetchError> {
        let mut request = self.client.get(self.request_url(date));
        if let Some(timeout) = self.request_timeout {
            request = request.timeout(timeout);
        }
        let response = request
            .send()
            .await
            .map_err(|e| FetchError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::Body(e.to_string()))?;
        Ok(body.to_vec())
    }
}

#[async_trait]
impl BulletinFetcher for CbrFetcher {
    fn name(&self) -> &'static str {
        Self::KEY
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "valuta_cbr::fetch",
            skip(self, cancel),
            fields(url = %self.request_url(date)),
            err(level = "debug"),
        )
    )]
    async fn fetch(
        &self,
        date: NaiveDate,
        cancel: &CancellationToken,
    ) -> Result<Vec<u8>, FetchError> {
        tokio::select! {
            biased;
            () = cancel.cancelled() => Err(FetchError::Cancelled),
            result = self.get(date) => result,
        }
    }
}
