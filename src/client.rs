//! The Freespee API facade.
//!
//! [`Client`] builds each request URL, reads the stored credentials, hands
//! both to its [`Transport`], and maps the parsed body into domain types.

use serde_json::Value;
use std::time::Instant;

use crate::config::{ApiOptions, Credentials};
use crate::models::{CallCollection, Customer, CustomerRecord};
use crate::params::Params;
use crate::response::{self, CdrsResponse, CustomerCountResponse, CustomersResponse};
use crate::transport::{HttpTransport, Transport};
use crate::Result;

const CUSTOMERS_PATH: &str = "/customers";
const CDRS_PATH: &str = "/statistics/cdrs";

/// Client for the Freespee customer and call statistics API.
///
/// Every operation performs exactly one GET through the transport and waits
/// for it. Nothing is retried or cached, and paging is left to the caller.
///
/// Credentials and the base URL are read from the [`ApiOptions`] on
/// construction and can be overridden afterwards. The setters take
/// `&mut self`, so they can never run while a request is in flight.
///
/// # Examples
///
/// ```no_run
/// use freespee::{ApiOptions, Client, Params};
///
/// # async fn example() -> Result<(), freespee::Error> {
/// let options = ApiOptions::from_json(
///     r#"{"api_url": "https://api.freespee.com/1.0", "username": "me", "password": "secret"}"#,
/// )?;
/// let client = Client::with_http(options)?;
///
/// if let Some(customer) = client.find_customer(42).await? {
///     let calls = client
///         .find_calls(&customer, Params::new().with("extended", 1))
///         .await?;
///     println!("{} calls for {:?}", calls.total, customer.name);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Client<T = HttpTransport> {
    config: ApiOptions,
    api_url: String,
    credentials: Credentials,
    transport: T,
}

impl Client<HttpTransport> {
    /// Creates a client backed by a default [`HttpTransport`].
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn with_http(config: ApiOptions) -> Result<Self> {
        Ok(Self::new(config, HttpTransport::builder().build()?))
    }
}

impl<T: Transport> Client<T> {
    pub fn new(config: ApiOptions, transport: T) -> Self {
        let api_url = config.api_url();
        let credentials = config.credentials();
        Self {
            config,
            api_url,
            credentials,
            transport,
        }
    }

    /// Lists one page of customers, in API order.
    pub async fn find_all_customers(&self, page: u32) -> Result<Vec<Customer>> {
        let value = self.api(CUSTOMERS_PATH, &Params::new().with("page", page)).await?;
        let response: CustomersResponse = response::decode(value)?;

        Ok(response.customers.into_iter().map(Customer::from).collect())
    }

    /// Returns the account's `total` as the API sent it, usually a number.
    pub async fn get_total_number_of_customers(&self) -> Result<Value> {
        let value = self.api(CUSTOMERS_PATH, &Params::new()).await?;
        let response: CustomerCountResponse = response::decode(value)?;

        Ok(response.total)
    }

    /// Looks up a single customer.
    ///
    /// Returns `Ok(None)` when the body has no first entry under
    /// `customers`. Only that entry is mapped.
    pub async fn find_customer(&self, id: i64) -> Result<Option<Customer>> {
        let value = self
            .api(CUSTOMERS_PATH, &Params::new().with("customer_id", id))
            .await?;

        let first = match value.get("customers").and_then(|customers| customers.get(0)) {
            None | Some(Value::Null) => return Ok(None),
            Some(first) => first.clone(),
        };
        let record: CustomerRecord = response::decode(first)?;

        Ok(Some(Customer::from(record)))
    }

    /// Fetches one page of call detail records for `customer`.
    ///
    /// `customer_id` is set from `customer`, overriding any value already in
    /// `params`. Extended call data is mapped only when `params` carries a
    /// truthy `extended` entry.
    pub async fn find_calls(&self, customer: &Customer, mut params: Params) -> Result<CallCollection> {
        params.insert("customer_id", customer.id);
        let extended = params.is_truthy("extended");

        let value = self.api(CDRS_PATH, &params).await?;
        let response: CdrsResponse = response::decode(value)?;

        CallCollection::from_response(response, extended)
    }

    /// Performs a raw GET against `path` and returns the parsed body.
    ///
    /// The query string is only appended when `params` is non-empty. Fails
    /// with [`Error::Credentials`](crate::Error::Credentials) before touching
    /// the transport if the username or password is missing.
    pub async fn api(&self, path: &str, params: &Params) -> Result<Value> {
        let url = self.url(path, params);
        let credentials = self.credentials.transport_string().map_err(|e| {
            tracing::error!(path = %path, "Missing credentials");
            e
        })?;

        tracing::debug!(url = %url, "Calling Freespee API");

        let start_time = Instant::now();
        let raw = self.transport.fetch(&url, &credentials).await.map_err(|e| {
            tracing::warn!(error = %e, path = %path, "Transport failed");
            e
        })?;

        tracing::info!(
            path = %path,
            latency_ms = start_time.elapsed().as_millis() as u64,
            bytes = raw.len(),
            "Received API response"
        );

        response::parse(&raw)
    }

    /// Renders `params` as `key:value` strings.
    pub fn format_parameters(&self, params: &Params) -> Vec<String> {
        params.format_parameters()
    }

    /// Overrides the credentials taken from the options.
    pub fn set_credentials(&mut self, username: impl Into<String>, password: impl Into<String>) {
        self.credentials = Credentials::new(username, password);
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Overrides the base URL taken from the options.
    pub fn set_api_url(&mut self, api_url: impl Into<String>) {
        self.api_url = api_url.into();
    }

    pub fn config(&self) -> &ApiOptions {
        &self.config
    }

    /// Replaces the stored options.
    ///
    /// The base URL and credentials already in use are kept.
    pub fn set_config(&mut self, config: ApiOptions) {
        self.config = config;
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn url(&self, path: &str, params: &Params) -> String {
        if params.is_empty() {
            format!("{}{}", self.api_url, path)
        } else {
            format!("{}{}?{}", self.api_url, path, params.to_query_string())
        }
    }
}
