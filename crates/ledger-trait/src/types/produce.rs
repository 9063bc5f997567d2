//! Produce record

use super::record::{FieldSpec, RawRecord};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Output layout of `produce(uint256)`
///
/// `farmerId` sits right after `id`, in the same order as the arguments of
/// `recordProduce` follow it on chain.
pub mod schema {
    use super::FieldSpec;

    pub const ID: FieldSpec = FieldSpec { name: "id", index: 0 };
    pub const FARMER_ID: FieldSpec = FieldSpec { name: "farmerId", index: 1 };
    pub const CROP_TYPE: FieldSpec = FieldSpec { name: "cropType", index: 2 };
    pub const HARVEST_DATE: FieldSpec = FieldSpec { name: "harvestDate", index: 3 };
    pub const CERTIFIED: FieldSpec = FieldSpec { name: "certified", index: 4 };

    /// All fields in tuple order
    pub const FIELDS: [FieldSpec; 5] = [ID, FARMER_ID, CROP_TYPE, HARVEST_DATE, CERTIFIED];
}

/// A recorded batch of produce
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Produce {
    pub id: u64,
    /// Farmer who recorded it
    pub farmer_id: u64,
    pub crop_type: String,
    /// `YYYY-MM-DD`
    pub harvest_date: String,
    /// Set by an admin via `certifyProduce`
    pub certified: bool,
}

impl Produce {
    /// Decode a `produce(uint256)` result, `None` for the default record
    pub fn decode(record: &RawRecord) -> Result<Option<Self>> {
        const ENTITY: &str = "produce";

        let id = record.u64_field(ENTITY, schema::ID)?;
        if id == 0 {
            return Ok(None);
        }

        Ok(Some(Self {
            id,
            farmer_id: record.u64_field(ENTITY, schema::FARMER_ID)?,
            crop_type: record.string_field(ENTITY, schema::CROP_TYPE)?,
            harvest_date: record.string_field(ENTITY, schema::HARVEST_DATE)?,
            certified: record.bool_field(ENTITY, schema::CERTIFIED)?,
        }))
    }
}

impl fmt::Display for Produce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Produce #{} {} harvested {} by farmer #{} [{}]",
            self.id,
            self.crop_type,
            self.harvest_date,
            self.farmer_id,
            if self.certified { "certified" } else { "uncertified" }
        )
    }
}
