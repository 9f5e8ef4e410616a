//! Upstream countries API client.
//!
//! One GraphQL POST per call against a fixed query template. No caching, no
//! retry: a failed remote call surfaces as `UpstreamError` and the caller
//! decides what to do with it (in practice: a generic 502).

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("upstream returned errors: {0}")]
    Graphql(String),

    #[error("upstream response missing data")]
    MissingData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Continent {
    pub code: String,
    pub name: String,
}

/// Pass-through record from the upstream API. Only `continent.code` is
/// inspected locally (for the derived continent views).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Country {
    pub code: String,
    pub name: String,
    pub capital: Option<String>,
    pub currency: Option<String>,
    pub emoji: String,
    pub continent: Continent,
}

const COUNTRY_QUERY: &str = r#"
query GetCountry($code: ID!) {
  country(code: $code) {
    code
    name
    capital
    currency
    emoji
    continent {
      code
      name
    }
  }
}"#;

const COUNTRIES_QUERY: &str = r#"
query {
  countries {
    code
    name
    capital
    currency
    emoji
    continent {
      code
      name
    }
  }
}"#;

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphqlError>,
}

#[derive(Debug, Deserialize)]
struct GraphqlError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct CountryData {
    country: Option<Country>,
}

#[derive(Debug, Deserialize)]
struct CountriesData {
    countries: Vec<Country>,
}

pub struct CountriesClient {
    http: reqwest::Client,
    endpoint: Url,
}

impl CountriesClient {
    pub fn new(endpoint: Url, timeout: std::time::Duration) -> Result<Self, UpstreamError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http, endpoint })
    }

    /// One country by code. An unknown code is `Ok(None)`, not an error.
    pub async fn fetch_one(&self, code: &str) -> Result<Option<Country>, UpstreamError> {
        let data: CountryData = self
            .execute(COUNTRY_QUERY, serde_json::json!({ "code": code }))
            .await?;
        Ok(data.country)
    }

    /// The full country list, in upstream order.
    pub async fn fetch_all(&self) -> Result<Vec<Country>, UpstreamError> {
        let data: CountriesData = self
            .execute(COUNTRIES_QUERY, serde_json::Value::Null)
            .await?;
        Ok(data.countries)
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        query: &'static str,
        variables: serde_json::Value,
    ) -> Result<T, UpstreamError> {
        let body = serde_json::json!({
            "query": query,
            "variables": variables,
        });

        let envelope: Envelope<T> = self
            .http
            .post(self.endpoint.clone())
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if !envelope.errors.is_empty() {
            let messages = envelope
                .errors
                .iter()
                .map(|e| e.message.as_str())
                .collect::<Vec<_>>()
                .join("; ");
            return Err(UpstreamError::Graphql(messages));
        }

        envelope.data.ok_or(UpstreamError::MissingData)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_country_decodes_to_none() {
        let envelope: Envelope<CountryData> =
            serde_json::from_str(r#"{"data":{"country":null}}"#).expect("must decode");
        assert!(envelope.errors.is_empty());
        assert!(envelope.data.expect("data present").country.is_none());
    }

    #[test]
    fn country_record_decodes_with_optional_fields_missing() {
        let json = r#"{
            "data": {
                "country": {
                    "code": "AQ",
                    "name": "Antarctica",
                    "capital": null,
                    "currency": null,
                    "emoji": "🇦🇶",
                    "continent": { "code": "AN", "name": "Antarctica" }
                }
            }
        }"#;
        let envelope: Envelope<CountryData> = serde_json::from_str(json).expect("must decode");
        let country = envelope
            .data
            .expect("data present")
            .country
            .expect("country present");
        assert_eq!(country.code, "AQ");
        assert!(country.capital.is_none());
        assert_eq!(country.continent.code, "AN");
    }

    #[test]
    fn graphql_errors_are_collected() {
        let envelope: Envelope<CountriesData> = serde_json::from_str(
            r#"{"data":null,"errors":[{"message":"boom"},{"message":"again"}]}"#,
        )
        .expect("must decode");
        assert_eq!(envelope.errors.len(), 2);
        assert_eq!(envelope.errors[0].message, "boom");
    }
}
