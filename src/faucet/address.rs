// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Destination classification for faucet payouts.
//!
//! A destination is either a plain bitcoin address or a sidechain deposit
//! address `s<slot>_<address>_<checksum>`: exactly three fields, so the
//! sidechain-side address itself never contains an underscore. `slot`
//! numbers the sidechain and `checksum` is the first six hex characters of
//! SHA-256 over everything before the final underscore. The mainchain
//! interpretation always wins; only destinations that fail it are read as
//! deposits.

use std::str::FromStr;

use bitcoin::{Address, Network};
use sha2::{Digest, Sha256};

use crate::blockchain::types::TransferType;

const CHECKSUM_LEN: usize = 6;

#[derive(Debug, thiserror::Error)]
#[error("{address} is not a valid bitcoin address nor sidechain deposit address")]
pub struct UnknownAddressFormat {
    pub address: String,
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum DepositAddressError {
    #[error("deposit address must look like s<slot>_<address>_<checksum>")]
    Format,

    #[error("deposit address slot is not a number between 0 and 255")]
    Slot,

    #[error("deposit address checksum does not match")]
    Checksum,
}

/// Classify a payout destination, trying the mainchain reading first.
pub fn classify_destination(destination: &str) -> Result<TransferType, UnknownAddressFormat> {
    if is_mainchain_address(destination) {
        return Ok(TransferType::Mainchain);
    }
    if let Ok(slot) = deposit_slot(destination) {
        return Ok(TransferType::Sidechain { slot });
    }
    Err(UnknownAddressFormat {
        address: destination.to_string(),
    })
}

fn is_mainchain_address(destination: &str) -> bool {
    match Address::from_str(destination) {
        Ok(address) => address.require_network(Network::Bitcoin).is_ok(),
        Err(_) => false,
    }
}

/// Validate a sidechain deposit address and return the slot it targets.
pub fn deposit_slot(address: &str) -> Result<u8, DepositAddressError> {
    let (prefix, checksum) = address
        .rsplit_once('_')
        .ok_or(DepositAddressError::Format)?;

    if checksum.len() != CHECKSUM_LEN || !checksum.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(DepositAddressError::Format);
    }

    let after_tag = prefix.strip_prefix('s').ok_or(DepositAddressError::Format)?;
    let (slot_digits, inner) = after_tag.split_once('_').ok_or(DepositAddressError::Format)?;
    if inner.is_empty() || inner.contains('_') {
        return Err(DepositAddressError::Format);
    }

    let slot = slot_digits
        .parse::<u8>()
        .map_err(|_| DepositAddressError::Slot)?;

    if checksum != checksum_of(prefix) {
        return Err(DepositAddressError::Checksum);
    }

    Ok(slot)
}

/// Build the deposit address for `slot` paying `inner` on the sidechain.
pub fn format_deposit_address(slot: u8, inner: &str) -> String {
    let prefix = format!("s{slot}_{inner}");
    let checksum = checksum_of(&prefix);
    format!("{prefix}_{checksum}")
}

fn checksum_of(prefix: &str) -> String {
    let digest = Sha256::digest(prefix.as_bytes());
    hex::encode(digest)[..CHECKSUM_LEN].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_known_mainchain_addresses() {
        // P2PKH, P2SH and bech32 all count as mainchain.
        for addr in [
            "1A1zP1eP5QGefi2DMPTfTL5SLmv7DivfNa",
            "3J98t1WpEZ73CNmQviecrnyiWrnqRhWNLy",
            "bc1qw508d6qejxtdg4y5r3zarvary0c5xw7kv8f3t4",
        ] {
            assert_eq!(classify_destination(addr).unwrap(), TransferType::Mainchain);
        }
    }

    #[test]
    fn rejects_addresses_for_other_networks() {
        let err = classify_destination("tb1qw508d6qejxtdg4y5r3zarvary0c5xw7kxpjzsx").unwrap_err();
        assert!(err.to_string().contains("not a valid bitcoin address"));
    }

    #[test]
    fn classifies_formatted_deposit_addresses() {
        let addr = format_deposit_address(5, "tmFauAddr123");
        assert_eq!(
            classify_destination(&addr).unwrap(),
            TransferType::Sidechain { slot: 5 }
        );
    }

    #[test]
    fn rejects_garbage_and_empty_destinations() {
        assert!(classify_destination("hello world").is_err());
        assert!(classify_destination("").is_err());
    }

    #[test]
    fn deposit_slot_round_trips_through_formatting() {
        for slot in [0u8, 1, 42, 255] {
            let addr = format_deposit_address(slot, "someaddress");
            assert_eq!(deposit_slot(&addr).unwrap(), slot);
        }
    }

    #[test]
    fn deposit_slot_rejects_tampered_checksums() {
        let addr = format_deposit_address(3, "someaddress");
        let last = addr.chars().last().unwrap();
        let flipped = if last == '0' { '1' } else { '0' };
        let tampered = format!("{}{flipped}", &addr[..addr.len() - 1]);
        assert_ne!(addr, tampered);

        assert_eq!(deposit_slot(&tampered), Err(DepositAddressError::Checksum));
        assert!(classify_destination(&tampered).is_err());
    }

    #[test]
    fn deposit_slot_rejects_out_of_range_slots() {
        let prefix = "s300_someaddress";
        let addr = format!("{prefix}_{}", checksum_of(prefix));
        assert_eq!(deposit_slot(&addr), Err(DepositAddressError::Slot));
    }

    #[test]
    fn deposit_slot_rejects_structural_noise() {
        assert_eq!(deposit_slot("s5_abc"), Err(DepositAddressError::Format));
        assert_eq!(deposit_slot("x5_abc_012345"), Err(DepositAddressError::Format));
        assert_eq!(deposit_slot("s5abcdef_012345"), Err(DepositAddressError::Format));
        assert_eq!(deposit_slot("s5__012345"), Err(DepositAddressError::Format));
    }

    #[test]
    fn deposit_slot_rejects_underscores_inside_the_inner_address() {
        // Even with a checksum computed over the whole prefix, a fourth
        // field means this is not a deposit address.
        let prefix = "s5_abc_def";
        let addr = format!("{prefix}_{}", checksum_of(prefix));
        assert_eq!(deposit_slot(&addr), Err(DepositAddressError::Format));
        assert!(classify_destination(&addr).is_err());
    }
}
