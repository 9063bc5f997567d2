//! Conversions between Solidity values and ledger record types

use agrosafe_ledger_trait::{LedgerError, LedgerValue, RawRecord, Result};
use alloy::dyn_abi::DynSolValue;
use alloy::json_abi::Param;
use alloy::primitives::{Address, TxHash, U256};

/// Convert Alloy Address to lowercase hex string with 0x prefix
pub fn address_to_string(addr: Address) -> String {
    format!("0x{:x}", addr)
}

/// Format transaction hash for return as String
pub fn tx_hash_to_string(hash: TxHash) -> String {
    format!("0x{:x}", hash)
}

/// Convert a Solidity counter to u64, rejecting values that do not fit
pub fn u256_to_u64(value: U256) -> Result<u64> {
    if value > U256::from(u64::MAX) {
        return Err(LedgerError::Decode(format!("{} does not fit in u64", value)));
    }
    Ok(value.to::<u64>())
}

fn u256_to_u128(value: U256) -> Result<u128> {
    if value > U256::from(u128::MAX) {
        return Err(LedgerError::Decode(format!("{} does not fit in u128", value)));
    }
    Ok(value.to::<u128>())
}

/// Convert one decoded output to a ledger value
pub fn ledger_value(value: DynSolValue) -> Result<LedgerValue> {
    match value {
        DynSolValue::Uint(v, _) => u256_to_u128(v).map(LedgerValue::Uint),
        DynSolValue::Bool(b) => Ok(LedgerValue::Bool(b)),
        DynSolValue::String(s) => Ok(LedgerValue::Text(s)),
        DynSolValue::Address(a) => Ok(LedgerValue::Address(address_to_string(a))),
        other => Err(LedgerError::Decode(format!(
            "unsupported value in ledger record: {:?}",
            other
        ))),
    }
}

/// Build a raw record from a getter's outputs
///
/// A getter may return its fields as separate outputs or as one tuple output.
/// The record is named only when every field has a name in the ABI.
pub fn record_from_outputs(outputs: &[Param], values: Vec<DynSolValue>) -> Result<RawRecord> {
    let single_tuple =
        outputs.len() == 1 && matches!(values.as_slice(), [DynSolValue::Tuple(_)]);

    let (params, values) = if single_tuple {
        let Some(DynSolValue::Tuple(fields)) = values.into_iter().next() else {
            return Err(LedgerError::Decode("empty tuple output".to_string()));
        };
        (outputs[0].components.as_slice(), fields)
    } else {
        (outputs, values)
    };

    let converted = values
        .into_iter()
        .map(ledger_value)
        .collect::<Result<Vec<_>>>()?;

    let named = !params.is_empty()
        && params.len() == converted.len()
        && params.iter().all(|p| !p.name.is_empty());

    if named {
        Ok(RawRecord::Named(
            params
                .iter()
                .map(|p| p.name.clone())
                .zip(converted)
                .collect(),
        ))
    } else {
        Ok(RawRecord::Positional(converted))
    }
}
