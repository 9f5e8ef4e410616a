/*
 * Responsibility
 * - Thin handlers for the country query operations
 * - Authorization already happened in the gate middleware; handlers only
 *   carry the RequestContext through to the resolver layer
 */
use axum::{
    Json,
    extract::{Path, State},
};

use crate::api::v1::extractors::RequestCtx;
use crate::error::AppError;
use crate::services::countries::client::Country;
use crate::services::countries::resolver;
use crate::state::AppState;

/// GET /countries/{code}
///
/// An unknown code is a `null` body, not a 404: absence of a record is a
/// regular answer from the upstream, not an error.
pub async fn get_country(
    State(state): State<AppState>,
    RequestCtx(ctx): RequestCtx,
    Path(code): Path<String>,
) -> Result<Json<Option<Country>>, AppError> {
    let country = resolver::country(&state.countries, &ctx, &code).await?;
    Ok(Json(country))
}

/// GET /countries
pub async fn list_countries(
    State(state): State<AppState>,
    RequestCtx(ctx): RequestCtx,
) -> Result<Json<Vec<Country>>, AppError> {
    let countries = resolver::countries(&state.countries, &ctx).await?;
    Ok(Json(countries))
}

/// GET /countries/european
pub async fn european_countries(
    State(state): State<AppState>,
    RequestCtx(ctx): RequestCtx,
) -> Result<Json<Vec<Country>>, AppError> {
    let countries = resolver::european_countries(&state.countries, &ctx).await?;
    Ok(Json(countries))
}

/// GET /continents/{code}/countries
pub async fn countries_by_continent(
    State(state): State<AppState>,
    RequestCtx(ctx): RequestCtx,
    Path(code): Path<String>,
) -> Result<Json<Vec<Country>>, AppError> {
    let countries = resolver::countries_by_continent(&state.countries, &ctx, &code).await?;
    Ok(Json(countries))
}
