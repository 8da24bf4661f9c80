mod account;
mod ledger;
mod money;
mod seed;
mod transaction;
mod usage;

pub use account::*;
pub use ledger::*;
pub use money::*;
pub use seed::*;
pub use transaction::*;
pub use usage::*;
