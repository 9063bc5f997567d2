//! Data types shared across ledger backends

pub mod call;
pub mod farmer;
pub mod produce;
pub mod record;
pub mod tx;

pub use call::*;
pub use farmer::Farmer;
pub use produce::Produce;
pub use record::*;
pub use tx::*;
