use timesheet::commands::Cli;
use timesheet::libs::messages::macros::init_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    init_tracing();
    Cli::menu().await
}
