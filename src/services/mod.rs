/*
 * Responsibility
 * - Process-level services shared via AppState
 */
pub mod auth;
pub mod countries;
