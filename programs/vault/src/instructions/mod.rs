pub mod initialize_vault;
pub mod deposit;
pub mod withdraw;
pub mod send_interest;

pub use initialize_vault::*;
pub use deposit::*;
pub use withdraw::*;
pub use send_interest::*;
