//! Keccak-256 hashing

use kokka_primitives::H256;
use sha3::{Digest, Keccak256};

/// Compute the Keccak-256 digest of `data`
pub fn keccak256(data: &[u8]) -> H256 {
    let digest: [u8; 32] = Keccak256::digest(data).into();
    H256::from_bytes(digest)
}

/// First four bytes of the Keccak-256 digest of a canonical function
/// signature such as `transfer(address,uint256)`
pub fn function_selector(signature: &str) -> [u8; 4] {
    let hash = keccak256(signature.as_bytes());
    let mut selector = [0u8; 4];
    selector.copy_from_slice(&hash.as_bytes()[..4]);
    selector
}
