mod cli;
mod infra;
mod routes;
mod scripts;
mod server;

use country_config::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
