#[tokio::main]
async fn main() -> std::io::Result<()> {
    stay_client::run().await
}
