/*
 * Responsibility
 * - v1 URL structure
 * - Every route under here goes through the auth gate (applied in app.rs)
 */
use axum::{Router, routing::get};

use crate::state::AppState;

use crate::api::v1::handlers::countries::{
    countries_by_continent, european_countries, get_country, list_countries,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/countries", get(list_countries))
        .route("/countries/european", get(european_countries))
        .route("/countries/{code}", get(get_country))
        .route("/continents/{code}/countries", get(countries_by_continent))
}
