//! Interest crank: pay interest into every vault that has some due.

use anyhow::Result;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;
use vault::derivation::{RuntimeDeriver, VaultAddresses};
use vault::Vault;

use crate::rpc::VaultClient;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InterestPayment {
    pub vault: Pubkey,
    pub owner: Pubkey,
    pub mint: Pubkey,
    pub amount: u64,
}

#[derive(Debug, Default)]
pub struct CrankReport {
    pub paid: Vec<(InterestPayment, Signature)>,
    pub failed: Vec<(InterestPayment, String)>,
    pub skipped: usize,
}

/// Decide which vaults to pay. A vault is skipped when it is not initialized,
/// when it has no interest due, or when its address does not match the one
/// rebuilt from its own record (the program would reject the contribution).
pub fn plan_interest(program_id: &Pubkey, vaults: &[(Pubkey, Vault)]) -> Vec<InterestPayment> {
    vaults
        .iter()
        .filter(|(address, record)| {
            record.initialized && derives_to(program_id, address, record)
        })
        .filter_map(|(address, record)| {
            let amount = record.interest_due();
            (amount > 0).then_some(InterestPayment {
                vault: *address,
                owner: record.owner,
                mint: record.mint,
                amount,
            })
        })
        .collect()
}

fn derives_to(program_id: &Pubkey, address: &Pubkey, record: &Vault) -> bool {
    VaultAddresses::from_bumps(
        &record.owner,
        &record.mint,
        record.bumps,
        program_id,
        &RuntimeDeriver,
    )
    .map_or(false, |addresses| &addresses.vault == address)
}

/// One pass over all vaults. A failed payment is recorded and the pass
/// moves on to the next vault.
pub async fn run(client: &VaultClient) -> Result<CrankReport> {
    let vaults = client.list_vaults().await?;
    let plan = plan_interest(&client.program_id(), &vaults);
    println!(
        "found {} vaults, {} with interest due, paying from {}",
        vaults.len(),
        plan.len(),
        client.payer()
    );

    let mut report = CrankReport {
        skipped: vaults.len() - plan.len(),
        ..CrankReport::default()
    };
    for payment in plan {
        match client.send_interest(&payment.owner, &payment.mint).await {
            Ok(signature) => {
                println!(
                    "paid {} interest into vault {}: {}",
                    payment.amount, payment.vault, signature
                );
                report.paid.push((payment, signature));
            }
            Err(e) => {
                eprintln!("vault {}: {:#}", payment.vault, e);
                report.failed.push((payment, format!("{e:#}")));
            }
        }
    }
    Ok(report)
}
