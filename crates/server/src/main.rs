#[tokio::main]
async fn main() -> anyhow::Result<()> {
    ichidan_server::start().await
}
