use solana_sdk::pubkey::Pubkey;

use crate::scanner::EmptyAccount;

/// Addresses marked for closure, in the order they were picked.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Selection {
    addresses: Vec<Pubkey>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flips `address` in or out of the selection. Returns whether it is now selected.
    pub fn toggle(&mut self, address: Pubkey) -> bool {
        if let Some(index) = self.addresses.iter().position(|key| *key == address) {
            self.addresses.remove(index);
            false
        } else {
            self.addresses.push(address);
            true
        }
    }

    pub fn clear(&mut self) {
        self.addresses.clear();
    }

    /// Drops every address that is no longer in `snapshot`.
    pub fn retain(&mut self, snapshot: &[EmptyAccount]) {
        self.addresses
            .retain(|key| snapshot.iter().any(|account| account.address == *key));
    }

    pub fn contains(&self, address: &Pubkey) -> bool {
        self.addresses.contains(address)
    }

    pub fn len(&self) -> usize {
        self.addresses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Pubkey> {
        self.addresses.iter()
    }
}
