//! Human-readable and JSON rendering of command results

use crate::error::Result;
use agrosafe_adapter::{Farmer, LedgerSummary, Produce, ProduceTrace, Submitted, TxStatus};
use serde::Serialize;
use std::fmt::Write;

#[derive(Debug, Clone, Copy, Default)]
pub struct Output {
    pub json: bool,
}

impl Output {
    pub fn new(json: bool) -> Self {
        Self { json }
    }

    /// Pretty JSON when `--json` is set, otherwise whatever `human` produces
    pub fn render<T, F>(&self, value: &T, human: F) -> Result<String>
    where
        T: Serialize + ?Sized,
        F: FnOnce(&T) -> String,
    {
        if self.json {
            Ok(serde_json::to_string_pretty(value)?)
        } else {
            Ok(human(value))
        }
    }
}

pub fn farmer(farmer: &Farmer) -> String {
    format!(
        "Farmer #{} {{\n  name: {}\n  location: {}\n  wallet: {}\n  verified: {}\n}}",
        farmer.id, farmer.name, farmer.location, farmer.wallet, farmer.verified
    )
}

pub fn produce(produce: &Produce) -> String {
    format!(
        "Produce #{} {{\n  farmer_id: {}\n  crop_type: {}\n  harvest_date: {}\n  certified: {}\n}}",
        produce.id, produce.farmer_id, produce.crop_type, produce.harvest_date, produce.certified
    )
}

pub fn trace(trace: &ProduceTrace) -> String {
    let mut out = produce(&trace.produce);
    match &trace.farmer {
        Some(record) => {
            out.push_str("\nRecorded by ");
            out.push_str(&farmer(record));
        }
        None => {
            let _ = write!(
                out,
                "\n⚠️  Farmer #{} not found on the ledger",
                trace.produce.farmer_id
            );
        }
    }
    out
}

pub fn farmers(farmers: &[Farmer]) -> String {
    if farmers.is_empty() {
        return "No farmers found".to_string();
    }

    let mut out = format!("📊 {} farmer(s)", farmers.len());
    for farmer in farmers {
        let _ = write!(
            out,
            "\n  #{:<5} {:<30} {:<30} {}",
            farmer.id,
            farmer.name,
            farmer.location,
            if farmer.verified { "✅ verified" } else { "unverified" }
        );
    }
    out
}

pub fn produce_list(produce: &[Produce]) -> String {
    if produce.is_empty() {
        return "No produce found".to_string();
    }

    let mut out = format!("📊 {} produce record(s)", produce.len());
    for record in produce {
        let _ = write!(
            out,
            "\n  #{:<5} farmer #{:<5} {:<20} {} {}",
            record.id,
            record.farmer_id,
            record.crop_type,
            record.harvest_date,
            if record.certified { "✅ certified" } else { "uncertified" }
        );
    }
    out
}

pub fn summary(summary: &LedgerSummary) -> String {
    format!(
        "📊 Ledger summary\n  Farmers: {}\n  Produce: {}",
        summary.total_farmers, summary.total_produce
    )
}

pub fn submitted(submitted: &Submitted) -> String {
    format!(
        "📤 {} submitted\n  Transaction: {}\n  Run `agrosafe confirm {}` to wait for it",
        submitted.call.function_name(),
        submitted.tx_hash,
        submitted.tx_hash
    )
}

pub fn status(status: &TxStatus) -> String {
    match status {
        TxStatus::Confirmed {
            tx_hash,
            block_number,
        } => format!(
            "✅ Confirmed\n  Transaction: {}\n  Block: {}",
            tx_hash, block_number
        ),
        TxStatus::Reverted { tx_hash, reason } => format!(
            "❌ Reverted\n  Transaction: {}\n  Reason: {}",
            tx_hash,
            reason.as_deref().unwrap_or("not reported")
        ),
        TxStatus::Submitted { tx_hash } => format!(
            "⏳ Still pending, it may be included later\n  Transaction: {}",
            tx_hash
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agrosafe_adapter::LedgerCall;

    fn ada() -> Farmer {
        Farmer {
            id: 1,
            name: "Ada Lovelace".into(),
            wallet: "0x70997970c51812dc3a010c7d01b50e0d17dc79c8".into(),
            location: "Kent, UK".into(),
            verified: true,
        }
    }

    fn wheat() -> Produce {
        Produce {
            id: 4,
            farmer_id: 1,
            crop_type: "Wheat".into(),
            harvest_date: "2025-05-20".into(),
            certified: false,
        }
    }

    #[test]
    fn test_json_output() {
        let rendered = Output::new(true).render(&ada(), farmer).unwrap();
        let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(value["id"], 1);
        assert_eq!(value["verified"], true);
    }

    #[test]
    fn test_human_output() {
        let rendered = Output::new(false).render(&ada(), farmer).unwrap();
        assert!(rendered.starts_with("Farmer #1 {"));
        assert!(rendered.contains("name: Ada Lovelace"));
    }

    #[test]
    fn test_trace_without_farmer() {
        let rendered = trace(&ProduceTrace {
            produce: wheat(),
            farmer: None,
        });
        assert!(rendered.contains("Farmer #1 not found"));
    }

    #[test]
    fn test_empty_lists() {
        assert_eq!(farmers(&[]), "No farmers found");
        assert_eq!(produce_list(&[]), "No produce found");
    }

    #[test]
    fn test_status_json_is_tagged() {
        let status = TxStatus::Reverted {
            tx_hash: format!("0x{}", "ab".repeat(32)),
            reason: Some("ONLY_ADMIN".into()),
        };
        let rendered = Output::new(true).render(&status, super::status).unwrap();
        let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(value["status"], "reverted");
        assert_eq!(value["reason"], "ONLY_ADMIN");
    }

    #[test]
    fn test_submitted_mentions_confirm() {
        let rendered = submitted(&Submitted {
            tx_hash: "0xabc".into(),
            call: LedgerCall::Pause,
        });
        assert!(rendered.contains("pause submitted"));
        assert!(rendered.contains("agrosafe confirm 0xabc"));
    }
}
