//! Aggregation/filter layer over the upstream client.
//!
//! Each exposed operation maps to one upstream fetch; the derived views
//! filter the full list in memory, single pass, upstream order preserved.
//! Authorization already happened at the gate, so the RequestContext is
//! carried but never branched on here.

use crate::services::auth::gate::RequestContext;
use crate::services::countries::client::{CountriesClient, Country, UpstreamError};

const EUROPE_CONTINENT_CODE: &str = "EU";

/// Simple proxy: one country by code; absence is `Ok(None)`.
pub async fn country(
    client: &CountriesClient,
    _ctx: &RequestContext,
    code: &str,
) -> Result<Option<Country>, UpstreamError> {
    client.fetch_one(code).await
}

/// Full list, unmodified.
pub async fn countries(
    client: &CountriesClient,
    _ctx: &RequestContext,
) -> Result<Vec<Country>, UpstreamError> {
    client.fetch_all().await
}

/// Derived view: only European countries.
pub async fn european_countries(
    client: &CountriesClient,
    _ctx: &RequestContext,
) -> Result<Vec<Country>, UpstreamError> {
    let all = client.fetch_all().await?;
    Ok(filter_by_continent(all, EUROPE_CONTINENT_CODE))
}

/// Derived view: countries on the given continent. Unknown codes yield an
/// empty list, not an error.
pub async fn countries_by_continent(
    client: &CountriesClient,
    _ctx: &RequestContext,
    continent_code: &str,
) -> Result<Vec<Country>, UpstreamError> {
    let all = client.fetch_all().await?;
    Ok(filter_by_continent(all, continent_code))
}

// Exact, case-sensitive match on continent code; no normalization, no dedup.
fn filter_by_continent(countries: Vec<Country>, continent_code: &str) -> Vec<Country> {
    countries
        .into_iter()
        .filter(|c| c.continent.code == continent_code)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::countries::client::Continent;

    fn record(code: &str, name: &str, continent_code: &str, continent_name: &str) -> Country {
        Country {
            code: code.to_string(),
            name: name.to_string(),
            capital: None,
            currency: None,
            emoji: String::new(),
            continent: Continent {
                code: continent_code.to_string(),
                name: continent_name.to_string(),
            },
        }
    }

    fn fixture() -> Vec<Country> {
        vec![
            record("DE", "Germany", "EU", "Europe"),
            record("JP", "Japan", "AS", "Asia"),
            record("FR", "France", "EU", "Europe"),
            record("EG", "Egypt", "AF", "Africa"),
            record("ES", "Spain", "EU", "Europe"),
        ]
    }

    #[test]
    fn european_filter_keeps_exactly_the_eu_records_in_order() {
        let filtered = filter_by_continent(fixture(), EUROPE_CONTINENT_CODE);
        let codes: Vec<&str> = filtered.iter().map(|c| c.code.as_str()).collect();
        assert_eq!(codes, vec!["DE", "FR", "ES"]);
    }

    #[test]
    fn unknown_continent_yields_empty_not_error() {
        let filtered = filter_by_continent(fixture(), "SA");
        assert!(filtered.is_empty());
    }

    #[test]
    fn continent_match_is_case_sensitive() {
        let filtered = filter_by_continent(fixture(), "eu");
        assert!(filtered.is_empty());
    }

    #[test]
    fn empty_upstream_list_filters_to_empty() {
        let filtered = filter_by_continent(Vec::new(), EUROPE_CONTINENT_CODE);
        assert!(filtered.is_empty());
    }
}
