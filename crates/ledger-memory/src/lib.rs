//! In-process AgroSafe ledger
//!
//! Implements the `Ledger` trait from `agrosafe-ledger-trait` without a
//! chain. The contract's rules are enforced (admin-only verification and
//! certification, one farmer per wallet, only verified farmers record
//! produce, pausing), submitted transactions sit in a pending pool until a
//! receipt is requested, and every call is counted so callers can assert how
//! many round trips an operation made.
//!
//! Several handles can share one ledger under different signing identities:
//!
//! ```ignore
//! let admin = MemoryLedger::deploy(contract, ADMIN);
//! let farmer = admin.connect_as(FARMER);
//! let anonymous = admin.read_only();
//! ```

pub mod contract;
pub mod ledger;

pub use contract::{AgroSafeContract, revert};
pub use ledger::{CallCounts, MemoryLedger, RecordEncoding};
