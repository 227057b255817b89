//! Client layer: orchestrates signing, transport calls and response mapping.

use std::collections::HashMap;
use std::error::Error as StdError;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use log::{debug, warn};
use reqwest::header::CONTENT_TYPE;
use serde_json::Value;

use crate::domain::{
    ApiRequest, Credentials, KeyCase, RegionId, SendSms, SendSmsResponse, ValidationError,
    normalize_keys,
};
use crate::transport;

/// Default Dysms endpoint. Plain HTTP, as published by the vendor.
pub const DEFAULT_ENDPOINT: &str = "http://dysmsapi.aliyuncs.com/";

/// Applied to the whole request (connect, send, and read of the body).
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

pub const ALIBABA_CLOUD_ACCESS_KEY_ID: &str = "ALIBABA_CLOUD_ACCESS_KEY_ID";
pub const ALIBABA_CLOUD_ACCESS_KEY_SECRET: &str = "ALIBABA_CLOUD_ACCESS_KEY_SECRET";

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded; charset=UTF-8";

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

#[derive(Debug, Clone)]
struct HttpResponse {
    status: u16,
    body: String,
}

trait HttpTransport: Send + Sync {
    fn post_form<'a>(
        &'a self,
        url: &'a str,
        body: String,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>>;
}

#[derive(Debug, Clone)]
struct ReqwestTransport {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpTransport for ReqwestTransport {
    fn post_form<'a>(
        &'a self,
        url: &'a str,
        body: String,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>> {
        Box::pin(async move {
            let response = self
                .client
                .post(url)
                .timeout(self.timeout)
                .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
                .body(body)
                .send()
                .await?;
            let status = response.status().as_u16();
            let body = response.text().await?;
            Ok(HttpResponse { status, body })
        })
    }
}

#[derive(Debug, thiserror::Error)]
/// Errors returned by [`DysmsClient`].
///
/// Each variant names the pipeline stage that failed; nothing is retried.
pub enum DysmsError {
    /// Missing/empty credentials or an unusable endpoint.
    #[error("configuration error: {0}")]
    Configuration(#[source] ValidationError),

    /// A request builder rejected its input.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// HTTP client / transport failure (DNS, connect, TLS, timeouts, etc).
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn StdError + Send + Sync>),

    /// Non-successful HTTP status with a body that is not JSON.
    #[error("unexpected HTTP status: {status}")]
    HttpStatus { status: u16, body: Option<String> },

    /// Response body could not be decoded.
    #[error("decode error: {0}")]
    Decode(#[source] Box<dyn StdError + Send + Sync>),

    /// The API answered with a failure `Code` (or a non-2xx status with a JSON body).
    #[error("API error: {code:?} {message:?} (request id {request_id:?})")]
    RemoteApi {
        status: u16,
        code: Option<String>,
        message: Option<String>,
        request_id: Option<String>,
        body: Value,
    },
}

// No `Debug`: the builder holds the raw secret.
#[derive(Clone, Default)]
/// Builder for [`DysmsClient`].
///
/// Credentials may be given as a validated [`Credentials`] value, as raw strings,
/// or picked up from the environment with [`DysmsClientBuilder::load_from_env`].
/// Validation happens in [`DysmsClientBuilder::build`], before any I/O.
pub struct DysmsClientBuilder {
    access_key_id: Option<String>,
    access_key_secret: Option<String>,
    endpoint: Option<String>,
    region_id: Option<String>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
    key_case: Option<KeyCase>,
    accept_invalid_certs: bool,
}

impl DysmsClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.access_key_id = Some(credentials.access_key_id().as_str().to_owned());
        self.access_key_secret = Some(credentials.access_key_secret().expose().to_owned());
        self
    }

    pub fn access_key_id(mut self, value: impl Into<String>) -> Self {
        self.access_key_id = Some(value.into());
        self
    }

    pub fn access_key_secret(mut self, value: impl Into<String>) -> Self {
        self.access_key_secret = Some(value.into());
        self
    }

    /// Fill credentials that were not set explicitly from
    /// [`ALIBABA_CLOUD_ACCESS_KEY_ID`] and [`ALIBABA_CLOUD_ACCESS_KEY_SECRET`].
    pub fn load_from_env(self) -> Self {
        let envs = std::env::vars().collect::<HashMap<_, _>>();
        self.load_from_vars(&envs)
    }

    fn load_from_vars(mut self, envs: &HashMap<String, String>) -> Self {
        if let Some(value) = envs.get(ALIBABA_CLOUD_ACCESS_KEY_ID) {
            self.access_key_id.get_or_insert_with(|| value.clone());
        }
        if let Some(value) = envs.get(ALIBABA_CLOUD_ACCESS_KEY_SECRET) {
            self.access_key_secret.get_or_insert_with(|| value.clone());
        }
        self
    }

    /// Override the API endpoint (`http` or `https`).
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Override the `RegionId` public parameter.
    pub fn region_id(mut self, region_id: impl Into<String>) -> Self {
        self.region_id = Some(region_id.into());
        self
    }

    /// Set the per-request timeout (default [`DEFAULT_TIMEOUT`]).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Override the HTTP `User-Agent` header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Normalize every object key of [`DysmsClient::execute`] results to `case`.
    ///
    /// Off by default: responses are returned exactly as the server sent them.
    pub fn response_key_case(mut self, case: KeyCase) -> Self {
        self.key_case = Some(case);
        self
    }

    /// Disable TLS certificate and hostname verification for `https` endpoints.
    ///
    /// This exposes credentials and messages to anyone able to intercept the
    /// connection. Only use it against test endpoints.
    pub fn danger_accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }

    /// Build a [`DysmsClient`].
    ///
    /// Fails with [`DysmsError::Configuration`] when a credential is missing or empty,
    /// the region is blank, or the endpoint is not an `http`/`https` URL.
    pub fn build(self) -> Result<DysmsClient, DysmsError> {
        // Unset credentials are reported like empty ones.
        let credentials = Credentials::new(
            self.access_key_id.unwrap_or_default(),
            self.access_key_secret.unwrap_or_default(),
        )
        .map_err(DysmsError::Configuration)?;

        let region_id = match self.region_id {
            Some(region_id) => RegionId::new(region_id).map_err(DysmsError::Configuration)?,
            None => RegionId::default(),
        };

        let endpoint = self
            .endpoint
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_owned());
        validate_endpoint(&endpoint).map_err(DysmsError::Configuration)?;

        let mut builder = reqwest::Client::builder();
        if let Some(user_agent) = self.user_agent {
            builder = builder.user_agent(user_agent);
        }
        if self.accept_invalid_certs {
            warn!("TLS certificate verification is disabled for {endpoint}");
            builder = builder.danger_accept_invalid_certs(true);
        }

        let client = builder
            .build()
            .map_err(|err| DysmsError::Transport(Box::new(err)))?;

        Ok(DysmsClient {
            credentials,
            endpoint,
            region_id,
            key_case: self.key_case,
            http: Arc::new(ReqwestTransport {
                client,
                timeout: self.timeout.unwrap_or(DEFAULT_TIMEOUT),
            }),
        })
    }
}

fn validate_endpoint(endpoint: &str) -> Result<(), ValidationError> {
    let invalid = || ValidationError::InvalidEndpoint {
        input: endpoint.to_owned(),
    };
    let url = url::Url::parse(endpoint).map_err(|_| invalid())?;
    match url.scheme() {
        "http" | "https" if url.host_str().is_some() => Ok(()),
        _ => Err(invalid()),
    }
}

#[derive(Clone)]
/// High-level Dysms client.
///
/// Each call assembles the public parameters, signs the merged parameter set with
/// HMAC-SHA1 and sends it as one form POST to the endpoint (by default
/// `http://dysmsapi.aliyuncs.com/`). The client holds no per-call state and can be
/// shared across tasks.
pub struct DysmsClient {
    credentials: Credentials,
    endpoint: String,
    region_id: RegionId,
    key_case: Option<KeyCase>,
    http: Arc<dyn HttpTransport>,
}

impl DysmsClient {
    /// Create a client with the default endpoint, region and timeout.
    ///
    /// For more customization, use [`DysmsClient::builder`].
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            endpoint: DEFAULT_ENDPOINT.to_owned(),
            region_id: RegionId::default(),
            key_case: None,
            http: Arc::new(ReqwestTransport {
                client: reqwest::Client::new(),
                timeout: DEFAULT_TIMEOUT,
            }),
        }
    }

    /// Start building a client with custom settings.
    pub fn builder() -> DysmsClientBuilder {
        DysmsClientBuilder::new()
    }

    /// Build a default client from `ALIBABA_CLOUD_ACCESS_KEY_ID` / `ALIBABA_CLOUD_ACCESS_KEY_SECRET`.
    pub fn from_env() -> Result<Self, DysmsError> {
        DysmsClientBuilder::new().load_from_env().build()
    }

    /// Sign and send `request`, returning the decoded JSON body.
    ///
    /// Errors:
    /// - [`DysmsError::Transport`] when the HTTP exchange fails,
    /// - [`DysmsError::Decode`] when a 2xx body is not JSON,
    /// - [`DysmsError::HttpStatus`] when a non-2xx body is not JSON,
    /// - [`DysmsError::RemoteApi`] when the body carries a `Code` other than `OK`
    ///   or the status is non-2xx.
    pub async fn execute<R>(&self, request: &R) -> Result<Value, DysmsError>
    where
        R: ApiRequest + ?Sized,
    {
        let body = self.execute_raw(request).await?;
        Ok(match self.key_case {
            Some(case) => normalize_keys(body, case),
            None => body,
        })
    }

    /// Send an SMS and decode the typed response.
    ///
    /// Returns [`DysmsError::Validation`] without any network call when a required
    /// field (`PhoneNumbers`, `SignName`, `TemplateCode`) is missing.
    pub async fn send_sms(&self, request: &SendSms) -> Result<SendSmsResponse, DysmsError> {
        request.validate()?;
        let body = self.execute_raw(request).await?;
        transport::decode_send_sms_response(&body)
            .map_err(|err| DysmsError::Decode(Box::new(err)))
    }

    async fn execute_raw<R>(&self, request: &R) -> Result<Value, DysmsError>
    where
        R: ApiRequest + ?Sized,
    {
        let params = transport::signed_params(
            &self.credentials,
            &self.region_id,
            request,
            chrono::Utc::now(),
            transport::new_nonce(),
        );
        debug!("calling {} at {}", request.action(), self.endpoint);

        let response = self
            .http
            .post_form(&self.endpoint, transport::encode_form(&params))
            .await
            .map_err(DysmsError::Transport)?;
        debug!("{} responded with HTTP {}", request.action(), response.status);

        let success = (200..=299).contains(&response.status);
        let body = match transport::decode_json_response(&response.body) {
            Ok(body) => body,
            Err(err) if success => return Err(DysmsError::Decode(Box::new(err))),
            Err(_) => {
                let body = if response.body.trim().is_empty() {
                    None
                } else {
                    Some(response.body)
                };
                return Err(DysmsError::HttpStatus {
                    status: response.status,
                    body,
                });
            }
        };

        let failure = if success {
            transport::remote_failure(&body)
        } else {
            Some(transport::remote_failure_fields(&body))
        };
        if let Some(failure) = failure {
            return Err(DysmsError::RemoteApi {
                status: response.status,
                code: failure.code,
                message: failure.message,
                request_id: failure.request_id,
                body,
            });
        }

        Ok(body)
    }
}
