//! Legacy transactions with EIP-155 replay protection

use bytes::Bytes;
use kokka_crypto::{keccak256, recover_address, sign, PrivateKey, Signature};
use kokka_primitives::{Address, H256, U256};
use rlp::{Rlp, RlpStream};

use crate::TxError;

/// Gas used by a plain value transfer with no call-data
pub const BASE_TRANSFER_GAS: u64 = 21_000;

/// Unsigned legacy transaction (type 0). Contract creation is not supported,
/// so `to` is always present.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LegacyTx {
    /// Sender nonce
    pub nonce: u64,
    /// Gas price in wei
    pub gas_price: u128,
    /// Gas limit
    pub gas_limit: u64,
    /// Recipient or contract address
    pub to: Address,
    /// Value in wei
    pub value: U256,
    /// Call-data
    pub data: Bytes,
}

impl LegacyTx {
    fn append_body(&self, s: &mut RlpStream) {
        s.append(&self.nonce);
        s.append(&self.gas_price);
        s.append(&self.gas_limit);
        s.append(&self.to);
        s.append(&self.value);
        s.append(&self.data.to_vec());
    }

    /// RLP preimage signed under EIP-155:
    /// `[nonce, gasPrice, gas, to, value, data, chainId, 0, 0]`.
    /// Without a chain id this is the six-field pre-EIP-155 preimage.
    pub fn signing_payload(&self, chain_id: Option<u64>) -> Vec<u8> {
        let mut s = RlpStream::new();
        match chain_id {
            Some(chain_id) => {
                s.begin_list(9);
                self.append_body(&mut s);
                s.append(&chain_id);
                s.append(&0u8);
                s.append(&0u8);
            }
            None => {
                s.begin_list(6);
                self.append_body(&mut s);
            }
        }
        s.out().to_vec()
    }

    /// Digest the sender signs
    pub fn signing_hash(&self, chain_id: Option<u64>) -> H256 {
        keccak256(&self.signing_payload(chain_id))
    }

    /// Sign for `chain_id`. Chain id 0 is rejected.
    pub fn sign(self, chain_id: u64, key: &PrivateKey) -> Result<SignedTransaction, TxError> {
        if chain_id == 0 {
            return Err(TxError::InvalidChainId(chain_id));
        }
        let digest = self.signing_hash(Some(chain_id));
        let signature = sign(&digest, key)?;
        let signature = TxSignature::from_eip155(&signature, chain_id)?;
        Ok(SignedTransaction::new(self, signature))
    }
}

/// Transaction signature as carried on the wire
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TxSignature {
    /// `recovery_id + 27`, or `recovery_id + chain_id * 2 + 35` under EIP-155
    pub v: u64,
    /// R component
    pub r: H256,
    /// S component
    pub s: H256,
}

impl TxSignature {
    /// Create a new signature
    pub fn new(v: u64, r: H256, s: H256) -> Self {
        Self { v, r, s }
    }

    /// Fold `chain_id` into `v`
    pub fn from_eip155(signature: &Signature, chain_id: u64) -> Result<Self, TxError> {
        let v = chain_id
            .checked_mul(2)
            .and_then(|v| v.checked_add(35 + signature.recovery_id() as u64))
            .ok_or(TxError::InvalidChainId(chain_id))?;
        Ok(Self::new(v, H256::from_bytes(signature.r), H256::from_bytes(signature.s)))
    }

    /// Chain id encoded in `v`, `None` for pre-EIP-155 signatures
    pub fn chain_id(&self) -> Option<u64> {
        if self.v >= 35 {
            Some((self.v - 35) / 2)
        } else {
            None
        }
    }

    /// Recovery id (0 or 1)
    pub fn recovery_id(&self) -> Result<u8, TxError> {
        match self.v {
            27 | 28 => Ok((self.v - 27) as u8),
            v if v >= 35 => Ok(((v - 35) % 2) as u8),
            v => Err(TxError::InvalidV(v)),
        }
    }

    fn to_crypto(self) -> Result<Signature, TxError> {
        let recovery_id = self.recovery_id()?;
        Ok(Signature::from_parts(*self.r.as_bytes(), *self.s.as_bytes(), recovery_id)?)
    }
}

/// Immutable signed legacy transaction
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignedTransaction {
    tx: LegacyTx,
    signature: TxSignature,
}

impl SignedTransaction {
    /// Pair a transaction with its signature
    pub fn new(tx: LegacyTx, signature: TxSignature) -> Self {
        Self { tx, signature }
    }

    /// Unsigned body
    pub fn tx(&self) -> &LegacyTx {
        &self.tx
    }

    /// Signature
    pub fn signature(&self) -> &TxSignature {
        &self.signature
    }

    /// Chain id the signature commits to
    pub fn chain_id(&self) -> Option<u64> {
        self.signature.chain_id()
    }

    /// Raw bytes: `rlp([nonce, gasPrice, gas, to, value, data, v, r, s])`.
    /// r and s are encoded as integers, without leading zero bytes.
    pub fn encode(&self) -> Vec<u8> {
        let mut s = RlpStream::new_list(9);
        self.tx.append_body(&mut s);
        s.append(&self.signature.v);
        s.append(&U256::from_big_endian(self.signature.r.as_bytes()));
        s.append(&U256::from_big_endian(self.signature.s.as_bytes()));
        s.out().to_vec()
    }

    /// `0x`-prefixed hex of [`encode`](Self::encode), as sent to
    /// `eth_sendRawTransaction`
    pub fn encode_hex(&self) -> String {
        format!("0x{}", hex::encode(self.encode()))
    }

    /// Decode raw bytes
    pub fn decode(raw: &[u8]) -> Result<Self, TxError> {
        let rlp = Rlp::new(raw);
        let count = rlp.item_count()?;
        if count != 9 {
            return Err(TxError::ItemCount { expected: 9, got: count });
        }

        let data: Vec<u8> = rlp.val_at(5)?;
        let tx = LegacyTx {
            nonce: rlp.val_at(0)?,
            gas_price: rlp.val_at(1)?,
            gas_limit: rlp.val_at(2)?,
            to: rlp.val_at(3)?,
            value: rlp.val_at(4)?,
            data: Bytes::from(data),
        };

        let v: u64 = rlp.val_at(6)?;
        let r: U256 = rlp.val_at(7)?;
        let s: U256 = rlp.val_at(8)?;
        let signature = TxSignature::new(v, u256_to_h256(r), u256_to_h256(s));
        signature.recovery_id()?;

        Ok(Self::new(tx, signature))
    }

    /// Local keccak256 of the raw bytes. The node's returned hash remains
    /// authoritative after broadcast.
    pub fn hash(&self) -> H256 {
        keccak256(&self.encode())
    }

    /// Recover the sender using whatever chain id `v` encodes
    pub fn recover_sender(&self) -> Result<Address, TxError> {
        let digest = self.tx.signing_hash(self.chain_id());
        Ok(recover_address(&digest, &self.signature.to_crypto()?)?)
    }

    /// Recover the sender, failing unless the signature commits to `chain_id`
    pub fn recover_sender_for_chain(&self, chain_id: u64) -> Result<Address, TxError> {
        let actual = self.chain_id();
        if actual != Some(chain_id) {
            return Err(TxError::ChainIdMismatch { expected: chain_id, actual });
        }
        self.recover_sender()
    }
}

fn u256_to_h256(value: U256) -> H256 {
    let mut bytes = [0u8; 32];
    value.to_big_endian(&mut bytes);
    H256::from_bytes(bytes)
}
