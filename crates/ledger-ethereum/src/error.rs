//! Mapping of Alloy failures onto `LedgerError`
//!
//! Alloy surfaces node-side reverts inside transport error messages, so the
//! classification works on the rendered message.

use agrosafe_ledger_trait::{LedgerError, extract_revert_reason};
use std::fmt::Display;

/// Classify a failed contract call or transaction submission
pub fn contract_error(e: impl Display) -> LedgerError {
    classify(e.to_string())
}

/// Failure of a plain RPC request (block number, receipt, chain id)
pub fn rpc_error(e: impl Display) -> LedgerError {
    LedgerError::Transport(e.to_string())
}

/// Revert reason carried by the error of a replayed call, if the node gave one
pub fn replayed_revert_reason(e: impl Display) -> Option<String> {
    extract_revert_reason(&e.to_string())
}

fn classify(message: String) -> LedgerError {
    if let Some(reason) = extract_revert_reason(&message) {
        return LedgerError::ContractRevert { reason };
    }

    let lower = message.to_ascii_lowercase();

    if lower.contains("revert") {
        return LedgerError::ContractRevert { reason: message };
    }

    if ["abi decod", "abi encod", "could not decode", "decoding failed", "buffer overrun"]
        .iter()
        .any(|marker| lower.contains(marker))
    {
        return LedgerError::Decode(message);
    }

    LedgerError::Transport(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use agrosafe_ledger_trait::ErrorKind;

    #[test]
    fn test_revert_with_reason() {
        let err = contract_error(
            "server returned an error response: error code 3: execution reverted: Only admin, data: \"0x08c379a0\"",
        );
        assert_eq!(
            err,
            LedgerError::ContractRevert {
                reason: "Only admin".to_string()
            }
        );
    }

    #[test]
    fn test_revert_without_reason_keeps_message() {
        let err = contract_error("server returned an error response: execution reverted");
        assert_eq!(err.kind(), ErrorKind::ContractRevert);
        assert!(err.to_string().contains("execution reverted"));
    }

    #[test]
    fn test_replayed_revert_reason() {
        assert_eq!(
            replayed_revert_reason(
                "server returned an error response: error code 3: execution reverted: revert: Farmer not verified, data: \"0x08c379a0\""
            ),
            Some("Farmer not verified".to_string())
        );
        assert_eq!(
            replayed_revert_reason("server returned an error response: execution reverted"),
            None
        );
        assert_eq!(replayed_revert_reason("connection refused"), None);
    }

    #[test]
    fn test_decode_failure() {
        let err = contract_error("ABI decoding failed: buffer overrun while deserializing");
        assert!(matches!(err, LedgerError::Decode(_)));
        assert!(!err.is_retriable());
    }

    #[test]
    fn test_words_containing_abi_stay_transport() {
        for message in [
            "node lacks the capability to serve this request",
            "upstream unavailable with high probability, retry later",
        ] {
            let err = contract_error(message);
            assert!(matches!(err, LedgerError::Transport(_)), "{}", message);
            assert!(err.is_retriable());
        }

        let err = contract_error("ABI decoding failed: buffer overrun while deserializing");
        assert!(matches!(err, LedgerError::Decode(_)));
    }

    #[test]
    fn test_connection_failure_is_transport() {
        let err = contract_error("error sending request for url (http://localhost:8545/)");
        assert!(matches!(err, LedgerError::Transport(_)));
        assert!(err.is_retriable());

        assert!(rpc_error("connection refused").is_network_error());
    }
}
