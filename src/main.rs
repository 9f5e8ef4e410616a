/*
 * Responsibility
 * - tokio runtime entry point
 * - delegate to app::run() (no logic here)
 */
use anyhow::Result;

use countries_gateway::app;

#[tokio::main]
async fn main() -> Result<()> {
    app::run().await
}
