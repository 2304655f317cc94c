//! Server-held admin credential.

use std::fmt;

use ed25519_dalek::{Signer, SigningKey};
use sha3::{Digest, Sha3_256};

use crate::error::StakingError;
use crate::state::AccountAddress;

/// Authentication scheme byte appended to single-key Ed25519 public keys.
const ED25519_SCHEME: u8 = 0x00;

/// Prefix of AIP-80 formatted private keys.
const AIP80_PREFIX: &str = "ed25519-priv-";

/// Ed25519 key that signs admin transactions.
///
/// The account address is derived the way Aptos derives a fresh account's
/// authentication key: `sha3_256(public_key || 0x00)`.
pub struct AdminSigner {
    key: SigningKey,
    address: AccountAddress,
}

impl AdminSigner {
    /// Parse a 32-byte private key from hex, accepting `0x` and AIP-80 prefixes.
    pub fn from_hex(text: &str) -> Result<Self, StakingError> {
        let trimmed = text.trim();
        let trimmed = trimmed.strip_prefix(AIP80_PREFIX).unwrap_or(trimmed);
        let digits = trimmed.strip_prefix("0x").unwrap_or(trimmed);

        let mut secret = [0u8; 32];
        hex::decode_to_slice(digits, &mut secret)
            .map_err(|e| StakingError::InvalidAdminKey(e.to_string()))?;
        Ok(Self::from_bytes(&secret))
    }

    pub fn from_bytes(secret: &[u8; 32]) -> Self {
        let key = SigningKey::from_bytes(secret);

        let mut hasher = Sha3_256::new();
        hasher.update(key.verifying_key().as_bytes());
        hasher.update([ED25519_SCHEME]);
        let address = AccountAddress::new(hasher.finalize().into());

        Self { key, address }
    }

    pub fn address(&self) -> AccountAddress {
        self.address
    }

    pub fn public_key_hex(&self) -> String {
        format!("0x{}", hex::encode(self.key.verifying_key().as_bytes()))
    }

    /// Sign raw bytes, returning the 0x-prefixed hex signature.
    pub fn sign_hex(&self, message: &[u8]) -> String {
        format!("0x{}", hex::encode(self.key.sign(message).to_bytes()))
    }
}

impl fmt::Debug for AdminSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminSigner")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}
