use anyhow::Result;
use vault_client::{crank, ClientConfig, VaultClient};

#[tokio::main]
async fn main() -> Result<()> {
    let config = ClientConfig::from_env()?;
    println!(
        "interest crank: program {} on {}",
        config.program_id, config.rpc_url
    );

    let client = VaultClient::new(&config)?;
    let report = crank::run(&client).await?;

    println!(
        "done: {} paid, {} failed, {} skipped",
        report.paid.len(),
        report.failed.len(),
        report.skipped
    );
    if !report.failed.is_empty() {
        anyhow::bail!("{} interest payments failed", report.failed.len());
    }
    Ok(())
}
