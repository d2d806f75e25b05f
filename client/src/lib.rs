pub mod config;
pub mod crank;
pub mod instructions;
pub mod rpc;

pub use config::ClientConfig;
pub use crank::{plan_interest, CrankReport, InterestPayment};
pub use rpc::VaultClient;
