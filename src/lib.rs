//! # Freespee - a typed client for the Freespee statistics API
//!
//! Reads customers and call detail records (CDRs) from the Freespee REST API
//! and maps them into typed domain objects.
//!
//! ## Quick Start
//!
//! ```no_run
//! use freespee::{ApiOptions, Client, Params};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), freespee::Error> {
//!     let options = ApiOptions::from_json(
//!         r#"{"api_url": "https://api.freespee.com/1.0", "username": "me", "password": "secret"}"#,
//!     )?;
//!     let client = Client::with_http(options)?;
//!
//!     println!("{} customers", client.get_total_number_of_customers().await?);
//!
//!     for customer in client.find_all_customers(0).await? {
//!         let calls = client
//!             .find_calls(&customer, Params::new().with("extended", 1))
//!             .await?;
//!         for call in &calls.results {
//!             println!("{} {:?} -> {:?} ({}s)", call.start, call.anum, call.bnum, call.duration);
//!         }
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Pluggable transport** - [`Client`] only needs a [`Transport`]; [`HttpTransport`] is the `reqwest`-backed default
//! - **Typed responses** - every endpoint is decoded into a schema, so missing or malformed fields fail at the boundary
//! - **UTC timestamps** - call start and expiry times are always [`chrono::DateTime<Utc>`](chrono::DateTime)
//! - **Explicit outcomes** - API errors, credential problems and "not found" are all distinct
//! - **Logging** - structured `tracing` events for every request
//!
//! ## Error Handling
//!
//! ```no_run
//! use freespee::{ApiOptions, Client, Error};
//!
//! # async fn example() -> Result<(), Error> {
//! # let client = Client::with_http(ApiOptions::default())?;
//! match client.find_customer(42).await {
//!     Ok(Some(customer)) => println!("{:?}", customer.name),
//!     Ok(None) => println!("No customer 42"),
//!     Err(Error::ApiCall { payload }) => eprintln!("API rejected the call: {}", payload),
//!     Err(Error::DeserializationFailed { raw_response, serde_error }) => {
//!         eprintln!("Unexpected body: {}", raw_response);
//!         eprintln!("  Error: {}", serde_error);
//!     }
//!     Err(e) => eprintln!("Other error: {}", e),
//! }
//! # Ok(())
//! # }
//! ```

mod client;
mod config;
mod de;
mod error;
pub mod models;
mod params;
pub mod response;
mod transport;

pub use client::Client;
pub use config::{ApiOptions, Credentials};
pub use error::{Error, Result};
pub use models::{Call, CallCollection, Customer, CustomerAddress, ExtendedCallData};
pub use params::Params;
pub use transport::{HttpTransport, HttpTransportBuilder, Transport};
