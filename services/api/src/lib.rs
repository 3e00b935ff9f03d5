mod cli;
mod infra;
mod report;
mod routes;
mod server;

use risk_radar::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
