/*
 * Responsibility
 * - Shared application context attached to the Router (AppState)
 * - Clone is cheap (everything behind Arc)
 */
use std::sync::Arc;

use crate::services::{auth::gate::AuthGate, countries::client::CountriesClient};

#[derive(Clone)]
pub struct AppState {
    pub gate: Arc<AuthGate>,
    pub countries: Arc<CountriesClient>,
}

impl AppState {
    pub fn new(gate: Arc<AuthGate>, countries: Arc<CountriesClient>) -> Self {
        Self { gate, countries }
    }
}
