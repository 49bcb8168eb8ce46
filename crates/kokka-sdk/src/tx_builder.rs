//! Transaction intents and offline signing

use bytes::Bytes;
use kokka_primitives::{Address, U256};
use kokka_types::{LegacyTx, SignedTransaction};

use crate::{SdkError, Wallet};

/// What the caller wants sent. Omitted optionals are resolved from live
/// chain state by [`TransactionSigner`](crate::TransactionSigner).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxIntent {
    /// Recipient or contract
    pub to: Address,
    /// Value in wei
    pub value: U256,
    /// Call-data, empty for plain transfers
    pub data: Bytes,
    /// Explicit gas limit
    pub gas_limit: Option<u64>,
    /// Explicit gas price in wei
    pub gas_price: Option<u128>,
    /// Explicit nonce
    pub nonce: Option<u64>,
}

impl TxIntent {
    /// Zero-value transaction to `to` with empty call-data
    pub fn new(to: Address) -> Self {
        Self {
            to,
            value: U256::zero(),
            data: Bytes::new(),
            gas_limit: None,
            gas_price: None,
            nonce: None,
        }
    }

    /// Contract call with `data`
    pub fn call(to: Address, data: impl Into<Bytes>) -> Self {
        Self::new(to).data(data)
    }

    /// Set the value in wei
    pub fn value(mut self, value: U256) -> Self {
        self.value = value;
        self
    }

    /// Set the call-data
    pub fn data(mut self, data: impl Into<Bytes>) -> Self {
        self.data = data.into();
        self
    }

    /// Set the gas limit
    pub fn gas_limit(mut self, limit: u64) -> Self {
        self.gas_limit = Some(limit);
        self
    }

    /// Set the gas price
    pub fn gas_price(mut self, price: u128) -> Self {
        self.gas_price = Some(price);
        self
    }

    /// Set the nonce
    pub fn nonce(mut self, nonce: u64) -> Self {
        self.nonce = Some(nonce);
        self
    }

    /// Build an unsigned transaction once every optional is resolved
    pub fn into_legacy(self, nonce: u64, gas_limit: u64, gas_price: u128) -> LegacyTx {
        LegacyTx {
            nonce,
            gas_price,
            gas_limit,
            to: self.to,
            value: self.value,
            data: self.data,
        }
    }
}

/// Sign a fully specified transaction without touching the network.
/// Chain id 0 is rejected.
pub fn sign_legacy(
    tx: LegacyTx,
    chain_id: u64,
    wallet: &Wallet,
) -> Result<SignedTransaction, SdkError> {
    if chain_id == 0 {
        return Err(SdkError::InvalidArgument(
            "chain id 0 gives no replay protection".to_string(),
        ));
    }
    Ok(tx.sign(chain_id, wallet.private_key())?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wallet() -> Wallet {
        Wallet::from_private_key_hex(
            "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80",
        )
        .unwrap()
    }

    #[test]
    fn test_intent_builder() {
        let to = Address::from_bytes([0xAA; 20]);
        let intent = TxIntent::new(to)
            .value(U256::from(5))
            .data(vec![0xde, 0xad])
            .gas_limit(50_000)
            .gas_price(7)
            .nonce(3);

        assert_eq!(intent.to, to);
        assert_eq!(intent.value, U256::from(5));
        assert_eq!(intent.data.as_ref(), &[0xde, 0xad]);
        assert_eq!(intent.gas_limit, Some(50_000));
        assert_eq!(intent.gas_price, Some(7));
        assert_eq!(intent.nonce, Some(3));
    }

    #[test]
    fn test_intent_defaults() {
        let intent = TxIntent::new(Address::ZERO);
        assert!(intent.value.is_zero());
        assert!(intent.data.is_empty());
        assert!(intent.gas_limit.is_none() && intent.gas_price.is_none() && intent.nonce.is_none());
    }

    #[test]
    fn test_sign_legacy_offline() {
        let wallet = wallet();
        let tx = TxIntent::new(Address::from_bytes([0xBB; 20]))
            .value(U256::from(1000))
            .into_legacy(0, 21_000, 1_000_000_000);

        let signed = sign_legacy(tx, 1337, &wallet).unwrap();
        assert_eq!(signed.chain_id(), Some(1337));
        assert_eq!(signed.recover_sender_for_chain(1337).unwrap(), *wallet.address());
    }

    #[test]
    fn test_sign_legacy_rejects_chain_zero() {
        let tx = TxIntent::new(Address::ZERO).into_legacy(0, 21_000, 1);
        assert!(matches!(
            sign_legacy(tx, 0, &wallet()),
            Err(SdkError::InvalidArgument(_))
        ));
    }
}
