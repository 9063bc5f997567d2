//! AgroSafe contract bindings
//!
//! Writes and counters go through the typed `sol!` interface. The two record
//! getters are called dynamically against a [`JsonAbi`] so the same code
//! handles both output shapes: the built-in human-readable ABI has unnamed
//! outputs (positional results), a compiled artifact usually names them.

use agrosafe_ledger_trait::{LedgerError, Result};
use alloy::json_abi::{Function, JsonAbi};
use alloy::sol;
use std::path::Path;

sol! {
    #[allow(missing_docs)]
    #[sol(rpc)]
    #[derive(Debug)]
    interface IAgroSafe {
        function registerFarmer(string name, string location) external;
        function verifyFarmer(uint256 farmerId, bool status) external;
        function recordProduce(string cropType, string harvestDate) external;
        function certifyProduce(uint256 produceId, bool certified) external;
        function pause() external;
        function unpause() external;

        function totalFarmers() external view returns (uint256);
        function totalProduce() external view returns (uint256);
        function farmerIdByWallet(address wallet) external view returns (uint256);
    }
}

/// `farmers(uint256)` getter
pub const FARMERS_FN: &str = "farmers";

/// `produce(uint256)` getter
pub const PRODUCE_FN: &str = "produce";

/// Record getters with unnamed outputs, in contract tuple order
const RECORD_SIGNATURES: [&str; 2] = [
    "function farmers(uint256) view returns (uint256, string, address, string, bool)",
    "function produce(uint256) view returns (uint256, uint256, string, string, bool)",
];

/// Human-readable ABI for the record getters
pub fn builtin_record_abi() -> Result<JsonAbi> {
    JsonAbi::parse(RECORD_SIGNATURES)
        .map_err(|e| LedgerError::Configuration(format!("Invalid built-in ABI: {}", e)))
}

/// Load the ABI from a compiled artifact or a bare ABI array
///
/// Both getters must be present.
pub fn load_artifact_abi(path: &Path) -> Result<JsonAbi> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        LedgerError::Configuration(format!("Failed to read ABI {}: {}", path.display(), e))
    })?;
    parse_artifact_abi(&content)
        .map_err(|e| LedgerError::Configuration(format!("{} in {}", e, path.display())))
}

fn parse_artifact_abi(content: &str) -> std::result::Result<JsonAbi, String> {
    let value: serde_json::Value =
        serde_json::from_str(content).map_err(|e| format!("Invalid ABI JSON: {}", e))?;

    // Foundry and Hardhat wrap the ABI in an artifact object
    let abi_value = match value.get("abi") {
        Some(abi) => abi.clone(),
        None => value,
    };

    let abi: JsonAbi =
        serde_json::from_value(abi_value).map_err(|e| format!("Invalid ABI: {}", e))?;

    for name in [FARMERS_FN, PRODUCE_FN] {
        if abi.function(name).is_none() {
            return Err(format!("ABI has no `{}` function", name));
        }
    }

    Ok(abi)
}

/// First overload of `name`
pub fn record_getter<'a>(abi: &'a JsonAbi, name: &str) -> Result<&'a Function> {
    abi.function(name)
        .and_then(|overloads| overloads.first())
        .ok_or_else(|| LedgerError::Configuration(format!("ABI has no `{}` function", name)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ARTIFACT: &str = r#"{
        "abi": [
            {
                "type": "function",
                "name": "farmers",
                "stateMutability": "view",
                "inputs": [{ "name": "", "type": "uint256", "internalType": "uint256" }],
                "outputs": [
                    { "name": "id", "type": "uint256", "internalType": "uint256" },
                    { "name": "name", "type": "string", "internalType": "string" },
                    { "name": "wallet", "type": "address", "internalType": "address" },
                    { "name": "location", "type": "string", "internalType": "string" },
                    { "name": "verified", "type": "bool", "internalType": "bool" }
                ]
            },
            {
                "type": "function",
                "name": "produce",
                "stateMutability": "view",
                "inputs": [{ "name": "", "type": "uint256", "internalType": "uint256" }],
                "outputs": [
                    { "name": "id", "type": "uint256", "internalType": "uint256" },
                    { "name": "farmerId", "type": "uint256", "internalType": "uint256" },
                    { "name": "cropType", "type": "string", "internalType": "string" },
                    { "name": "harvestDate", "type": "string", "internalType": "string" },
                    { "name": "certified", "type": "bool", "internalType": "bool" }
                ]
            }
        ],
        "bytecode": { "object": "0x" }
    }"#;

    #[test]
    fn test_builtin_abi_is_positional() {
        let abi = builtin_record_abi().unwrap();
        let farmers = record_getter(&abi, FARMERS_FN).unwrap();
        assert_eq!(farmers.outputs.len(), 5);
        assert!(farmers.outputs.iter().all(|p| p.name.is_empty()));

        let produce = record_getter(&abi, PRODUCE_FN).unwrap();
        let types: Vec<_> = produce.outputs.iter().map(|p| p.ty.as_str()).collect();
        assert_eq!(types, ["uint256", "uint256", "string", "string", "bool"]);
    }

    #[test]
    fn test_artifact_abi_is_named() {
        let abi = parse_artifact_abi(ARTIFACT).unwrap();
        let produce = record_getter(&abi, PRODUCE_FN).unwrap();
        let names: Vec<_> = produce.outputs.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["id", "farmerId", "cropType", "harvestDate", "certified"]);
    }

    #[test]
    fn test_bare_abi_array() {
        let value: serde_json::Value = serde_json::from_str(ARTIFACT).unwrap();
        let bare = value["abi"].to_string();
        assert!(parse_artifact_abi(&bare).is_ok());
    }

    #[test]
    fn test_artifact_missing_getter() {
        let err = parse_artifact_abi(r#"{ "abi": [] }"#).unwrap_err();
        assert!(err.contains("farmers"));
    }

    #[test]
    fn test_missing_file_is_configuration_error() {
        let err = load_artifact_abi(Path::new("/nonexistent/AgroSafe.json")).unwrap_err();
        assert!(err.is_configuration_error());
    }
}
