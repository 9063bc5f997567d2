//! Contract state and rules

use agrosafe_ledger_trait::{Farmer, LedgerCall, Produce};
use std::collections::HashMap;

/// Revert reasons, matching the deployed contract's require messages
pub mod revert {
    pub const ONLY_ADMIN: &str = "Only admin";
    pub const ALREADY_REGISTERED: &str = "Farmer already registered";
    pub const NOT_REGISTERED: &str = "Not a registered farmer";
    pub const NOT_VERIFIED: &str = "Farmer not verified";
    pub const FARMER_NOT_FOUND: &str = "Farmer does not exist";
    pub const PRODUCE_NOT_FOUND: &str = "Produce does not exist";
    pub const PAUSED: &str = "Pausable: paused";
    pub const NOT_PAUSED: &str = "Pausable: not paused";
}

/// Storage of the AgroSafe contract
#[derive(Debug, Clone)]
pub struct AgroSafeContract {
    admin: String,
    paused: bool,
    farmers: Vec<Farmer>,
    produce: Vec<Produce>,
    farmer_by_wallet: HashMap<String, u64>,
}

impl AgroSafeContract {
    /// Fresh deployment owned by `admin`
    pub fn new(admin: &str) -> Self {
        Self {
            admin: admin.to_ascii_lowercase(),
            paused: false,
            farmers: Vec::new(),
            produce: Vec::new(),
            farmer_by_wallet: HashMap::new(),
        }
    }

    pub fn admin(&self) -> &str {
        &self.admin
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn total_farmers(&self) -> u64 {
        self.farmers.len() as u64
    }

    pub fn total_produce(&self) -> u64 {
        self.produce.len() as u64
    }

    /// Farmer by 1-based id
    pub fn farmer(&self, farmer_id: u64) -> Option<&Farmer> {
        index(farmer_id).and_then(|i| self.farmers.get(i))
    }

    /// Produce by 1-based id
    pub fn produce(&self, produce_id: u64) -> Option<&Produce> {
        index(produce_id).and_then(|i| self.produce.get(i))
    }

    /// Farmer id registered for `wallet`, 0 when none
    pub fn farmer_id_by_wallet(&self, wallet: &str) -> u64 {
        self.farmer_by_wallet
            .get(&wallet.to_ascii_lowercase())
            .copied()
            .unwrap_or(0)
    }

    /// Execute `call` as `sender`
    ///
    /// On revert the state is left untouched and the require message is
    /// returned.
    pub fn apply(&mut self, sender: &str, call: &LedgerCall) -> Result<(), String> {
        let sender = sender.to_ascii_lowercase();

        match call {
            LedgerCall::Pause => {
                self.only_admin(&sender)?;
                if self.paused {
                    return Err(revert::PAUSED.to_string());
                }
                self.paused = true;
            }
            LedgerCall::Unpause => {
                self.only_admin(&sender)?;
                if !self.paused {
                    return Err(revert::NOT_PAUSED.to_string());
                }
                self.paused = false;
            }
            LedgerCall::RegisterFarmer { name, location } => {
                self.when_not_paused()?;
                if self.farmer_by_wallet.contains_key(&sender) {
                    return Err(revert::ALREADY_REGISTERED.to_string());
                }
                let id = self.total_farmers() + 1;
                self.farmers.push(Farmer {
                    id,
                    name: name.clone(),
                    wallet: sender.clone(),
                    location: location.clone(),
                    verified: false,
                });
                self.farmer_by_wallet.insert(sender, id);
            }
            LedgerCall::VerifyFarmer { farmer_id, status } => {
                self.when_not_paused()?;
                self.only_admin(&sender)?;
                let farmer = index(*farmer_id)
                    .and_then(|i| self.farmers.get_mut(i))
                    .ok_or_else(|| revert::FARMER_NOT_FOUND.to_string())?;
                farmer.verified = *status;
            }
            LedgerCall::RecordProduce {
                crop_type,
                harvest_date,
            } => {
                self.when_not_paused()?;
                let farmer_id = self.farmer_id_by_wallet(&sender);
                let farmer = self
                    .farmer(farmer_id)
                    .ok_or_else(|| revert::NOT_REGISTERED.to_string())?;
                if !farmer.verified {
                    return Err(revert::NOT_VERIFIED.to_string());
                }
                let id = self.total_produce() + 1;
                self.produce.push(Produce {
                    id,
                    farmer_id,
                    crop_type: crop_type.clone(),
                    harvest_date: harvest_date.clone(),
                    certified: false,
                });
            }
            LedgerCall::CertifyProduce {
                produce_id,
                certified,
            } => {
                self.when_not_paused()?;
                self.only_admin(&sender)?;
                let produce = index(*produce_id)
                    .and_then(|i| self.produce.get_mut(i))
                    .ok_or_else(|| revert::PRODUCE_NOT_FOUND.to_string())?;
                produce.certified = *certified;
            }
        }

        Ok(())
    }

    fn only_admin(&self, sender: &str) -> Result<(), String> {
        if sender == self.admin {
            Ok(())
        } else {
            Err(revert::ONLY_ADMIN.to_string())
        }
    }

    fn when_not_paused(&self) -> Result<(), String> {
        if self.paused {
            Err(revert::PAUSED.to_string())
        } else {
            Ok(())
        }
    }
}

fn index(id: u64) -> Option<usize> {
    id.checked_sub(1).and_then(|i| usize::try_from(i).ok())
}
