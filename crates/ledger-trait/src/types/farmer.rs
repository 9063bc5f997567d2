//! Farmer record

use super::record::{FieldSpec, RawRecord};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Output layout of `farmers(uint256)`
pub mod schema {
    use super::FieldSpec;

    pub const ID: FieldSpec = FieldSpec { name: "id", index: 0 };
    pub const NAME: FieldSpec = FieldSpec { name: "name", index: 1 };
    pub const WALLET: FieldSpec = FieldSpec { name: "wallet", index: 2 };
    pub const LOCATION: FieldSpec = FieldSpec { name: "location", index: 3 };
    pub const VERIFIED: FieldSpec = FieldSpec { name: "verified", index: 4 };

    /// All fields in tuple order
    pub const FIELDS: [FieldSpec; 5] = [ID, NAME, WALLET, LOCATION, VERIFIED];
}

/// A registered farmer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Farmer {
    /// Ledger-assigned id, starts at 1
    pub id: u64,
    pub name: String,
    /// Wallet that registered the farmer, lowercase hex
    pub wallet: String,
    pub location: String,
    /// Set by an admin via `verifyFarmer`
    pub verified: bool,
}

impl Farmer {
    /// Decode a `farmers(uint256)` result
    ///
    /// Returns `None` for the contract's default record (id 0), which is how
    /// the ledger answers for ids that were never assigned.
    pub fn decode(record: &RawRecord) -> Result<Option<Self>> {
        const ENTITY: &str = "farmer";

        let id = record.u64_field(ENTITY, schema::ID)?;
        if id == 0 {
            return Ok(None);
        }

        Ok(Some(Self {
            id,
            name: record.string_field(ENTITY, schema::NAME)?,
            wallet: record.address_field(ENTITY, schema::WALLET)?,
            location: record.string_field(ENTITY, schema::LOCATION)?,
            verified: record.bool_field(ENTITY, schema::VERIFIED)?,
        }))
    }
}

impl fmt::Display for Farmer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Farmer #{} {} ({}) wallet {} [{}]",
            self.id,
            self.name,
            self.location,
            self.wallet,
            if self.verified { "verified" } else { "unverified" }
        )
    }
}
