/*
 * Responsibility
 * - Upstream countries API access
 * - client:   GraphQL transport (fixed query templates, UpstreamError)
 * - resolver: exposed operations, including the derived continent views
 */
pub mod client;
pub mod resolver;
