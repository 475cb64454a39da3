use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    keyindex_cli::main_entry().await
}
