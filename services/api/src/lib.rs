mod cli;
mod demo;
mod infra;
mod printer;
mod routes;
mod server;

use inventory_inspection::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
