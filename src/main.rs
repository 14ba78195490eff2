use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    tour_frontend::run().await
}
