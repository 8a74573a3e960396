//! Domain entities and their mapping from the API's JSON records.
//!
//! Each entity has a `*Record` counterpart that mirrors the wire shape
//! (`custnr`, `address_*`, `pagesize`...). Records are decoded with serde,
//! which fails on any missing key, and then converted into the entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::response::CdrsResponse;
use crate::{de, Error, Result};

/// A Freespee customer account.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Customer {
    pub id: i64,
    pub name: Option<String>,
    pub customer_number: Option<String>,
    pub corporate_id: Option<String>,
    pub email: Option<String>,
    pub uuid: Option<String>,
    pub receive_monthly_report: bool,
    pub freespee_caller_id: Option<String>,
    pub address: CustomerAddress,
}

/// Postal address of a [`Customer`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CustomerAddress {
    pub street: Option<String>,
    pub zip: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
}

/// A call detail record.
///
/// `extended` is only populated when the request asked for extended data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Call {
    pub cdr_id: i64,
    pub start: DateTime<Utc>,
    pub duration: i64,
    pub duration_adjusted: i64,
    pub anum: Option<String>,
    /// Hash of the A number as sent by the API.
    pub anum_md5: Option<String>,
    pub bnum: Option<String>,
    pub cnum: Option<String>,
    pub customer_id: i64,
    pub source_id: i64,
    pub customer_number: Option<String>,
    pub answered: bool,
    pub quarantined: bool,
    /// Name resolved for the A number's area code.
    pub anum_ndc_name: Option<String>,
    pub extended: Option<ExtendedCallData>,
}

/// Attribution and billing data returned for `extended` call queries.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExtendedCallData {
    pub expire: Option<DateTime<Utc>>,
    pub source_name: Option<String>,
    pub source_media: Option<String>,
    pub class: Option<String>,
    pub publisher_id: Option<i64>,
    pub partner_publisher_id: Option<i64>,
    pub campaign_id: Option<i64>,
    pub partner_campaign_id: Option<i64>,
    pub pricing_model_id: Option<i64>,
    pub commission: Option<f64>,
    pub cli_id: Option<i64>,
    pub order_id: Option<i64>,
    pub recording_id: Option<String>,
}

/// One page of call detail records.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CallCollection {
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
    pub number_of_pages: i64,
    pub results: Vec<Call>,
}

impl CallCollection {
    /// Maps a decoded `/statistics/cdrs` page, keeping the order of `cdrs`.
    pub(crate) fn from_response(response: CdrsResponse, extended: bool) -> Result<Self> {
        let results = response
            .cdrs
            .into_iter()
            .map(|raw| Call::from_value(raw, extended))
            .collect::<Result<Vec<_>>>()?;

        Ok(CallCollection {
            total: response.total,
            page: response.page,
            page_size: response.page_size,
            number_of_pages: response.number_of_pages,
            results,
        })
    }
}

impl Call {
    fn from_value(raw: Value, extended: bool) -> Result<Self> {
        let extended = if extended {
            let record: ExtendedCdrRecord = serde_json::from_value(raw.clone())
                .map_err(|e| Error::deserialization(raw.to_string(), e))?;
            Some(ExtendedCallData::from(record))
        } else {
            None
        };

        let record: CdrRecord =
            serde_json::from_value(raw.clone()).map_err(|e| Error::deserialization(raw.to_string(), e))?;

        Ok(Call {
            cdr_id: record.cdr_id,
            start: record.start,
            duration: record.duration,
            duration_adjusted: record.duration_adjusted,
            anum: record.anum,
            anum_md5: record.anum_md5,
            bnum: record.bnum,
            cnum: record.cnum,
            customer_id: record.customer_id,
            source_id: record.source_id,
            customer_number: record.custnr,
            answered: record.answered,
            quarantined: record.quarantined,
            anum_ndc_name: record.anum_ndc_name,
            extended,
        })
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct CustomerRecord {
    #[serde(deserialize_with = "de::integer")]
    customer_id: i64,
    #[serde(deserialize_with = "de::optional_text")]
    name: Option<String>,
    #[serde(deserialize_with = "de::optional_text")]
    custnr: Option<String>,
    #[serde(deserialize_with = "de::optional_text")]
    corporateid: Option<String>,
    #[serde(deserialize_with = "de::optional_text")]
    email: Option<String>,
    #[serde(deserialize_with = "de::optional_text")]
    uuid: Option<String>,
    #[serde(deserialize_with = "de::flag")]
    receive_monthly_report: bool,
    #[serde(deserialize_with = "de::optional_text")]
    freespee_caller_id: Option<String>,
    #[serde(deserialize_with = "de::optional_text")]
    address_street: Option<String>,
    #[serde(deserialize_with = "de::optional_text")]
    address_zip: Option<String>,
    #[serde(deserialize_with = "de::optional_text")]
    address_city: Option<String>,
    #[serde(deserialize_with = "de::optional_text")]
    address_state: Option<String>,
    #[serde(deserialize_with = "de::optional_text")]
    address_country: Option<String>,
}

impl From<CustomerRecord> for Customer {
    fn from(record: CustomerRecord) -> Self {
        Customer {
            id: record.customer_id,
            name: record.name,
            customer_number: record.custnr,
            corporate_id: record.corporateid,
            email: record.email,
            uuid: record.uuid,
            receive_monthly_report: record.receive_monthly_report,
            freespee_caller_id: record.freespee_caller_id,
            address: CustomerAddress {
                street: record.address_street,
                zip: record.address_zip,
                city: record.address_city,
                state: record.address_state,
                country: record.address_country,
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct CdrRecord {
    #[serde(deserialize_with = "de::integer")]
    cdr_id: i64,
    #[serde(deserialize_with = "de::utc_datetime")]
    start: DateTime<Utc>,
    #[serde(deserialize_with = "de::integer")]
    duration: i64,
    #[serde(deserialize_with = "de::integer")]
    duration_adjusted: i64,
    #[serde(deserialize_with = "de::optional_text")]
    anum: Option<String>,
    #[serde(deserialize_with = "de::optional_text")]
    anum_md5: Option<String>,
    #[serde(deserialize_with = "de::optional_text")]
    bnum: Option<String>,
    #[serde(deserialize_with = "de::optional_text")]
    cnum: Option<String>,
    #[serde(deserialize_with = "de::integer")]
    customer_id: i64,
    #[serde(deserialize_with = "de::integer")]
    source_id: i64,
    #[serde(deserialize_with = "de::optional_text")]
    custnr: Option<String>,
    #[serde(deserialize_with = "de::flag")]
    answered: bool,
    #[serde(deserialize_with = "de::flag")]
    quarantined: bool,
    #[serde(deserialize_with = "de::optional_text")]
    anum_ndc_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ExtendedCdrRecord {
    #[serde(deserialize_with = "de::optional_utc_datetime")]
    expire: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "de::optional_text")]
    source_name: Option<String>,
    #[serde(deserialize_with = "de::optional_text")]
    source_media: Option<String>,
    #[serde(deserialize_with = "de::optional_text")]
    class: Option<String>,
    #[serde(deserialize_with = "de::optional_integer")]
    publisher_id: Option<i64>,
    #[serde(deserialize_with = "de::optional_integer")]
    partner_publisher_id: Option<i64>,
    #[serde(deserialize_with = "de::optional_integer")]
    campaign_id: Option<i64>,
    #[serde(deserialize_with = "de::optional_integer")]
    partner_campaign_id: Option<i64>,
    #[serde(deserialize_with = "de::optional_integer")]
    pricing_model_id: Option<i64>,
    #[serde(deserialize_with = "de::optional_decimal")]
    commission: Option<f64>,
    #[serde(deserialize_with = "de::optional_integer")]
    cli_id: Option<i64>,
    #[serde(deserialize_with = "de::optional_integer")]
    order_id: Option<i64>,
    #[serde(deserialize_with = "de::optional_text")]
    recording_id: Option<String>,
}

impl From<ExtendedCdrRecord> for ExtendedCallData {
    fn from(record: ExtendedCdrRecord) -> Self {
        ExtendedCallData {
            expire: record.expire,
            source_name: record.source_name,
            source_media: record.source_media,
            class: record.class,
            publisher_id: record.publisher_id,
            partner_publisher_id: record.partner_publisher_id,
            campaign_id: record.campaign_id,
            partner_campaign_id: record.partner_campaign_id,
            pricing_model_id: record.pricing_model_id,
            commission: record.commission,
            cli_id: record.cli_id,
            order_id: record.order_id,
            recording_id: record.recording_id,
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use serde_json::{json, Value};

    pub(crate) fn customer(id: i64, name: &str) -> Value {
        json!({
            "customer_id": id,
            "name": name,
            "custnr": format!("C-{}", id),
            "corporateid": "556677-8899",
            "email": "billing@example.com",
            "uuid": "5f0c2a7e-8a4b-4d1e-9a8e-0f7c1d2b3a4c",
            "receive_monthly_report": "1",
            "freespee_caller_id": null,
            "address_street": "Drottninggatan 1",
            "address_zip": "111 51",
            "address_city": "Stockholm",
            "address_state": null,
            "address_country": "SE"
        })
    }

    pub(crate) fn cdr(id: i64) -> Value {
        json!({
            "cdr_id": id,
            "start": "2020-01-15 10:30:00",
            "duration": 125,
            "duration_adjusted": 120,
            "anum": "46701234567",
            "anum_md5": "0cc175b9c0f1b6a831c399e269772661",
            "bnum": "46812345678",
            "cnum": "46898765432",
            "customer_id": 42,
            "source_id": "7",
            "custnr": "C-42",
            "answered": 1,
            "quarantined": 0,
            "anum_ndc_name": "Stockholm",
            "expire": "2020-02-15 10:30:00",
            "source_name": "Google Ads",
            "source_media": "search",
            "class": "lead",
            "publisher_id": 3,
            "partner_publisher_id": null,
            "campaign_id": "11",
            "partner_campaign_id": null,
            "pricing_model_id": 2,
            "commission": "12.50",
            "cli_id": 9,
            "order_id": null,
            "recording_id": "rec-123"
        })
    }
}
