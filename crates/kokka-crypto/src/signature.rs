//! Recoverable ECDSA over secp256k1

use k256::ecdsa::signature::hazmat::PrehashVerifier;
use k256::ecdsa::{RecoveryId, Signature as K256Signature, SigningKey, VerifyingKey};
use kokka_primitives::{Address, H256};

use crate::{keccak256, CryptoError};

/// Public key
pub type PublicKey = VerifyingKey;

/// Private key
pub type PrivateKey = SigningKey;

/// Signature over a 32-byte digest, always in low-s form.
///
/// `v` is the recovery id offset by 27. Transaction encoding rewrites it
/// into the EIP-155 form.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Signature {
    /// r component
    pub r: [u8; 32],
    /// s component
    pub s: [u8; 32],
    /// 27 or 28
    pub v: u8,
}

impl Signature {
    /// Build from a raw recovery id (0 or 1)
    pub fn from_parts(r: [u8; 32], s: [u8; 32], recovery_id: u8) -> Result<Self, CryptoError> {
        if recovery_id > 1 {
            return Err(CryptoError::InvalidRecoveryId(recovery_id as u64));
        }
        Ok(Signature { r, s, v: recovery_id + 27 })
    }

    /// Recovery id (0 or 1)
    pub fn recovery_id(&self) -> u8 {
        self.v.saturating_sub(27)
    }

    /// r || s || v
    pub fn to_bytes(&self) -> [u8; 65] {
        let mut bytes = [0u8; 65];
        bytes[..32].copy_from_slice(&self.r);
        bytes[32..64].copy_from_slice(&self.s);
        bytes[64] = self.v;
        bytes
    }

    fn to_k256(self) -> Result<K256Signature, CryptoError> {
        K256Signature::from_scalars(self.r, self.s)
            .map_err(|e| CryptoError::MalformedSignature(e.to_string()))
    }

    /// EIP-2: s must not exceed half the curve order
    pub fn is_low_s(&self) -> bool {
        match self.to_k256() {
            Ok(sig) => sig.normalize_s().is_none(),
            Err(_) => false,
        }
    }
}

/// Sign a 32-byte digest. RFC 6979 nonces make the result deterministic,
/// and s is normalized to the lower half of the curve order.
pub fn sign(digest: &H256, key: &PrivateKey) -> Result<Signature, CryptoError> {
    let (sig, recid) = key
        .sign_prehash_recoverable(digest.as_bytes())
        .map_err(|e| CryptoError::SigningFailed(e.to_string()))?;

    // Negating s mirrors R across the x axis, so the y parity flips
    let (sig, recid) = match sig.normalize_s() {
        Some(normalized) => {
            let flipped = RecoveryId::from_byte(recid.to_byte() ^ 1)
                .ok_or(CryptoError::InvalidRecoveryId(recid.to_byte() as u64))?;
            (normalized, flipped)
        }
        None => (sig, recid),
    };

    let (r, s) = sig.split_bytes();
    Signature::from_parts(r.into(), s.into(), recid.to_byte())
}

/// Verify a signature against a digest and public key. High-s signatures
/// are rejected.
pub fn verify(digest: &H256, signature: &Signature, key: &PublicKey) -> Result<bool, CryptoError> {
    if !signature.is_low_s() {
        return Ok(false);
    }
    let sig = signature.to_k256()?;
    Ok(key.verify_prehash(digest.as_bytes(), &sig).is_ok())
}

/// Recover the public key that produced `signature` over `digest`
pub fn recover_public_key(digest: &H256, signature: &Signature) -> Result<PublicKey, CryptoError> {
    let sig = signature.to_k256()?;
    let recid = RecoveryId::from_byte(signature.recovery_id())
        .ok_or(CryptoError::InvalidRecoveryId(signature.v as u64))?;
    VerifyingKey::recover_from_prehash(digest.as_bytes(), &sig, recid)
        .map_err(|e| CryptoError::RecoveryFailed(e.to_string()))
}

/// Recover the signer's address
pub fn recover_address(digest: &H256, signature: &Signature) -> Result<Address, CryptoError> {
    recover_public_key(digest, signature).map(|key| public_key_to_address(&key))
}

/// Last 20 bytes of keccak256 over the uncompressed key without its 0x04 tag
pub fn public_key_to_address(key: &PublicKey) -> Address {
    let point = key.to_encoded_point(false);
    let hash = keccak256(&point.as_bytes()[1..]);
    let mut addr = [0u8; 20];
    addr.copy_from_slice(&hash.as_bytes()[12..]);
    Address::from_bytes(addr)
}
