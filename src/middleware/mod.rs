/*
 * Responsibility
 * - Public interface for middleware (re-export)
 * - auth gate, CORS, HTTP-level plumbing
 */
pub mod auth;
pub mod cors;
pub mod http;
