//! Contract bindings: an interface paired with encode/decode helpers

use std::sync::{Arc, OnceLock};

use bytes::Bytes;
use kokka_primitives::Address;

use crate::abi::{decode, encode_function_call, Function, Interface, Token};
use crate::tx_builder::TxIntent;
use crate::types::{BlockId, CallRequest};
use crate::{KokkaClient, SdkError};

const TOKEN_ABI: &str = include_str!("../abi/token.json");
const SWAP_ABI: &str = include_str!("../abi/swap.json");

/// Encodes calls and decodes results for one contract interface.
///
/// Holds no address and no connection, so one binding serves every
/// deployment of the same contract and is shared freely across tasks.
#[derive(Debug, Clone)]
pub struct ContractBinding {
    interface: Arc<Interface>,
}

impl ContractBinding {
    /// Bind a shared interface
    pub fn new(interface: Arc<Interface>) -> Self {
        Self { interface }
    }

    /// Parse a JSON ABI and bind it
    pub fn from_json(json: &str) -> Result<Self, SdkError> {
        Ok(Self::new(Arc::new(Interface::from_json(json)?)))
    }

    /// Binding for the embedded ERC20/VNDX token interface
    pub fn token() -> Result<Self, SdkError> {
        static TOKEN: OnceLock<Result<Arc<Interface>, String>> = OnceLock::new();
        embedded(&TOKEN, TOKEN_ABI).map(Self::new)
    }

    /// Binding for the embedded fixed-rate swap interface
    pub fn swap() -> Result<Self, SdkError> {
        static SWAP: OnceLock<Result<Arc<Interface>, String>> = OnceLock::new();
        embedded(&SWAP, SWAP_ABI).map(Self::new)
    }

    /// The bound interface
    pub fn interface(&self) -> &Interface {
        &self.interface
    }

    fn function(&self, name: &str) -> Option<&Function> {
        self.interface.function(name)
    }

    /// Selector followed by the encoded arguments
    pub fn encode_call(&self, name: &str, args: &[Token]) -> Result<Bytes, SdkError> {
        let function = self
            .function(name)
            .ok_or_else(|| SdkError::Encoding(format!("unknown function: {}", name)))?;
        let data = encode_function_call(function.selector, &function.inputs, args)
            .map_err(|e| SdkError::Encoding(format!("{}: {}", function.signature, strip(e))))?;
        Ok(Bytes::from(data))
    }

    /// Decode the declared outputs of `name`
    pub fn decode_result(&self, name: &str, data: &[u8]) -> Result<Vec<Token>, SdkError> {
        let function = self
            .function(name)
            .ok_or_else(|| SdkError::Decoding(format!("unknown function: {}", name)))?;
        decode(&function.outputs, data)
            .map_err(|e| SdkError::Decoding(format!("{}: {}", function.signature, strip(e))))
    }

    /// Read path: encode, `eth_call` at the latest block, decode
    pub async fn query(
        &self,
        client: &KokkaClient,
        contract: Address,
        name: &str,
        args: &[Token],
    ) -> Result<Vec<Token>, SdkError> {
        let data = self.encode_call(name, args)?;
        let result = client
            .call(&CallRequest::new(contract, data), BlockId::Latest)
            .await?;
        self.decode_result(name, &result)
    }

    /// Write path, first half: an intent carrying the encoded call
    pub fn transaction(
        &self,
        contract: Address,
        name: &str,
        args: &[Token],
    ) -> Result<TxIntent, SdkError> {
        Ok(TxIntent::call(contract, self.encode_call(name, args)?))
    }
}

fn embedded(
    cell: &OnceLock<Result<Arc<Interface>, String>>,
    json: &str,
) -> Result<Arc<Interface>, SdkError> {
    cell.get_or_init(|| {
        Interface::from_json(json)
            .map(Arc::new)
            .map_err(|e| e.to_string())
    })
    .clone()
    .map_err(SdkError::Configuration)
}

// Keep only the message when re-wrapping an abi error
fn strip(error: SdkError) -> String {
    match error {
        SdkError::Encoding(msg) | SdkError::Decoding(msg) => msg,
        other => other.to_string(),
    }
}

/// First output as an integer
pub(crate) fn expect_uint(tokens: Vec<Token>, what: &str) -> Result<kokka_primitives::U256, SdkError> {
    first(tokens, what)?
        .into_uint()
        .ok_or_else(|| SdkError::Decoding(format!("{}: expected uint", what)))
}

/// First output as an address
pub(crate) fn expect_address(tokens: Vec<Token>, what: &str) -> Result<Address, SdkError> {
    first(tokens, what)?
        .into_address()
        .ok_or_else(|| SdkError::Decoding(format!("{}: expected address", what)))
}

/// First output as a string
pub(crate) fn expect_string(tokens: Vec<Token>, what: &str) -> Result<String, SdkError> {
    first(tokens, what)?
        .into_string()
        .ok_or_else(|| SdkError::Decoding(format!("{}: expected string", what)))
}

fn first(tokens: Vec<Token>, what: &str) -> Result<Token, SdkError> {
    tokens
        .into_iter()
        .next()
        .ok_or_else(|| SdkError::Decoding(format!("{}: no return value", what)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abi::ParamType;
    use kokka_primitives::U256;

    #[test]
    fn test_embedded_token_interface() {
        let token = ContractBinding::token().unwrap();
        let iface = token.interface();
        for name in [
            "approve", "burn", "burnFrom", "mint", "permit", "transfer", "transferFrom",
            "allowance", "balanceOf", "decimals", "DOMAIN_SEPARATOR", "name", "nonces",
            "owner", "symbol", "totalSupply",
        ] {
            assert!(iface.function(name).is_some(), "missing {}", name);
        }
        assert_eq!(iface.function("mint").unwrap().selector, [0x40, 0xc1, 0x0f, 0x19]);
        assert_eq!(iface.function("burn").unwrap().selector, [0x42, 0x96, 0x6c, 0x68]);
        assert_eq!(iface.function("decimals").unwrap().outputs, vec![ParamType::Uint(8)]);
        // events and errors are skipped
        assert!(iface.function("Transfer").is_none());
        assert!(iface.function("ERC20InsufficientBalance").is_none());
    }

    #[test]
    fn test_embedded_swap_interface() {
        let swap = ContractBinding::swap().unwrap();
        let reserves = swap.interface().function("getReserves").unwrap();
        assert_eq!(reserves.outputs, vec![ParamType::Uint(256), ParamType::Uint(256)]);
        assert!(reserves.read_only);
        assert!(!swap.interface().function("swapAforB").unwrap().read_only);
    }

    #[test]
    fn test_encode_transfer() {
        let token = ContractBinding::token().unwrap();
        let to = Address::from_bytes([0x12; 20]);
        let data = token
            .encode_call("transfer", &[Token::Address(to), Token::Uint(U256::from(1000))])
            .unwrap();
        assert_eq!(&data[..4], &[0xa9, 0x05, 0x9c, 0xbb]);
        assert_eq!(data.len(), 68);
    }

    #[test]
    fn test_encode_errors() {
        let token = ContractBinding::token().unwrap();
        assert!(matches!(token.encode_call("unknown", &[]), Err(SdkError::Encoding(_))));
        assert!(matches!(
            token.encode_call("transfer", &[Token::Address(Address::ZERO)]),
            Err(SdkError::Encoding(_))
        ));
        assert!(matches!(
            token.encode_call("burn", &[Token::Bool(true)]),
            Err(SdkError::Encoding(_))
        ));
    }

    #[test]
    fn test_decode_result() {
        let token = ContractBinding::token().unwrap();
        let mut data = [0u8; 32];
        data[31] = 100;
        let tokens = token.decode_result("balanceOf", &data).unwrap();
        assert_eq!(tokens, vec![Token::Uint(U256::from(100))]);
        assert!(matches!(token.decode_result("balanceOf", &[]), Err(SdkError::Decoding(_))));
    }

    #[test]
    fn test_transaction_intent() {
        let token = ContractBinding::token().unwrap();
        let contract = Address::from_bytes([0xAA; 20]);
        let intent = token
            .transaction(contract, "burn", &[Token::Uint(U256::from(5))])
            .unwrap();
        assert_eq!(intent.to, contract);
        assert_eq!(&intent.data[..4], &[0x42, 0x96, 0x6c, 0x68]);
        assert!(intent.value.is_zero());
    }
}
