//! Mutating contract calls

use serde::{Deserialize, Serialize};
use std::fmt;

/// One mutating call, arguments in contract order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "call", rename_all = "camelCase")]
pub enum LedgerCall {
    /// `registerFarmer(string name, string location)`
    RegisterFarmer { name: String, location: String },
    /// `verifyFarmer(uint256 farmerId, bool status)`
    VerifyFarmer { farmer_id: u64, status: bool },
    /// `recordProduce(string cropType, string harvestDate)`
    RecordProduce {
        crop_type: String,
        harvest_date: String,
    },
    /// `certifyProduce(uint256 produceId, bool certified)`
    CertifyProduce { produce_id: u64, certified: bool },
    /// `pause()`
    Pause,
    /// `unpause()`
    Unpause,
}

impl LedgerCall {
    /// Contract function name
    pub fn function_name(&self) -> &'static str {
        match self {
            Self::RegisterFarmer { .. } => "registerFarmer",
            Self::VerifyFarmer { .. } => "verifyFarmer",
            Self::RecordProduce { .. } => "recordProduce",
            Self::CertifyProduce { .. } => "certifyProduce",
            Self::Pause => "pause",
            Self::Unpause => "unpause",
        }
    }

    /// Check if the contract restricts this call to its admin
    pub fn requires_admin(&self) -> bool {
        matches!(
            self,
            Self::VerifyFarmer { .. } | Self::CertifyProduce { .. } | Self::Pause | Self::Unpause
        )
    }
}

impl fmt::Display for LedgerCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RegisterFarmer { name, location } => {
                write!(f, "registerFarmer({:?}, {:?})", name, location)
            }
            Self::VerifyFarmer { farmer_id, status } => {
                write!(f, "verifyFarmer({}, {})", farmer_id, status)
            }
            Self::RecordProduce {
                crop_type,
                harvest_date,
            } => write!(f, "recordProduce({:?}, {:?})", crop_type, harvest_date),
            Self::CertifyProduce {
                produce_id,
                certified,
            } => write!(f, "certifyProduce({}, {})", produce_id, certified),
            Self::Pause => write!(f, "pause()"),
            Self::Unpause => write!(f, "unpause()"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_function_names() {
        let call = LedgerCall::RegisterFarmer {
            name: "Ada".into(),
            location: "Kent".into(),
        };
        assert_eq!(call.function_name(), "registerFarmer");
        assert_eq!(LedgerCall::Pause.function_name(), "pause");
    }

    #[test]
    fn test_requires_admin() {
        assert!(
            LedgerCall::VerifyFarmer {
                farmer_id: 1,
                status: true
            }
            .requires_admin()
        );
        assert!(
            !LedgerCall::RecordProduce {
                crop_type: "Wheat".into(),
                harvest_date: "2024-01-01".into()
            }
            .requires_admin()
        );
    }

    #[test]
    fn test_display() {
        let call = LedgerCall::CertifyProduce {
            produce_id: 3,
            certified: true,
        };
        assert_eq!(call.to_string(), "certifyProduce(3, true)");
    }
}
