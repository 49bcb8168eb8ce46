//! In-memory signing identity

use kokka_crypto::{public_key_to_address, sign, PrivateKey, PublicKey, Signature};
use kokka_primitives::{Address, H256};
use rand::rngs::OsRng;
use zeroize::Zeroize;

use crate::SdkError;

/// Private key plus its derived address.
///
/// Not `Clone`: share it through `Arc`. `Debug` prints the address only.
/// Keys are never persisted or logged.
pub struct Wallet {
    private_key: PrivateKey,
    address: Address,
}

impl Wallet {
    /// Create a new random wallet
    pub fn new_random() -> Self {
        Self::from_signing_key(PrivateKey::random(&mut OsRng))
    }

    fn from_signing_key(private_key: PrivateKey) -> Self {
        let address = public_key_to_address(private_key.verifying_key());
        Self {
            private_key,
            address,
        }
    }

    /// Create a wallet from a 32-byte private key
    pub fn from_private_key(key: &[u8; 32]) -> Result<Self, SdkError> {
        PrivateKey::from_slice(key)
            .map(Self::from_signing_key)
            .map_err(|_| SdkError::Signing("private key is not a valid secp256k1 scalar".to_string()))
    }

    /// Create a wallet from hex, with or without `0x`. Error messages never
    /// echo the input.
    pub fn from_private_key_hex(hex: &str) -> Result<Self, SdkError> {
        let hex = hex.trim();
        let hex = hex.strip_prefix("0x").unwrap_or(hex);
        let mut bytes = hex::decode(hex)
            .map_err(|_| SdkError::Signing("private key is not valid hex".to_string()))?;
        if bytes.len() != 32 {
            let len = bytes.len();
            bytes.zeroize();
            return Err(SdkError::Signing(format!(
                "private key must be 32 bytes, got {}",
                len
            )));
        }

        let mut key = [0u8; 32];
        key.copy_from_slice(&bytes);
        bytes.zeroize();

        let result = Self::from_private_key(&key);
        key.zeroize();
        result
    }

    /// Wallet address
    pub fn address(&self) -> &Address {
        &self.address
    }

    /// Public key
    pub fn public_key(&self) -> &PublicKey {
        self.private_key.verifying_key()
    }

    pub(crate) fn private_key(&self) -> &PrivateKey {
        &self.private_key
    }

    /// Sign a 32-byte digest
    pub fn sign_hash(&self, hash: &H256) -> Result<Signature, SdkError> {
        Ok(sign(hash, &self.private_key)?)
    }
}

impl std::fmt::Debug for Wallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Wallet")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HARDHAT_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    #[test]
    fn test_wallet_from_hex() {
        let wallet = Wallet::from_private_key_hex(HARDHAT_KEY).unwrap();
        assert_eq!(
            wallet.address().to_hex(),
            "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266"
        );
        let bare = Wallet::from_private_key_hex(&HARDHAT_KEY[2..]).unwrap();
        assert_eq!(wallet.address(), bare.address());
    }

    #[test]
    fn test_wallet_rejects_bad_keys() {
        assert!(matches!(
            Wallet::from_private_key_hex("0x1234"),
            Err(SdkError::Signing(_))
        ));
        assert!(Wallet::from_private_key_hex("0xnothex").is_err());
        // zero is not a valid scalar
        assert!(Wallet::from_private_key(&[0u8; 32]).is_err());
    }

    #[test]
    fn test_error_does_not_echo_key() {
        let bad = format!("{}zz", &HARDHAT_KEY[..64]);
        let err = Wallet::from_private_key_hex(&bad).unwrap_err().to_string();
        assert!(!err.contains(&HARDHAT_KEY[2..20]));
        assert!(!err.contains("zz"));
    }

    #[test]
    fn test_sign_hash_low_s() {
        let wallet = Wallet::new_random();
        let signature = wallet.sign_hash(&H256::from_bytes([0x42; 32])).unwrap();
        assert!(signature.is_low_s());
        assert!(signature.v == 27 || signature.v == 28);
    }

    #[test]
    fn test_wallet_debug_hides_key() {
        let wallet = Wallet::from_private_key_hex(HARDHAT_KEY).unwrap();
        let debug = format!("{:?}", wallet);
        assert!(debug.contains("address"));
        assert!(!debug.contains("private_key"));
        assert!(!debug.contains(&HARDHAT_KEY[2..]));
    }
}
