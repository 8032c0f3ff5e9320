#[tokio::main]
async fn main() -> anyhow::Result<()> {
    literacy_content_backend::run().await
}
