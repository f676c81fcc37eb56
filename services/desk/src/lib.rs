mod cli;
mod commands;
mod demo;
mod infra;

use home_alloc::error::AppError;

pub fn run() -> Result<(), AppError> {
    cli::run()
}
