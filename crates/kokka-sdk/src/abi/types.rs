//! ABI type definitions

use std::fmt;
use std::str::FromStr;

use kokka_primitives::{Address, U256};

use crate::SdkError;

/// ABI value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Address (20 bytes)
    Address(Address),
    /// Unsigned integer of any declared width
    Uint(U256),
    /// Boolean
    Bool(bool),
    /// `bytesN`, exactly N bytes
    FixedBytes(Vec<u8>),
    /// Dynamic bytes
    Bytes(Vec<u8>),
    /// UTF-8 string
    String(String),
}

/// ABI parameter type. Tuples and arrays are not supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
    /// address
    Address,
    /// uintN, N in 8..=256 and a multiple of 8
    Uint(usize),
    /// bool
    Bool,
    /// bytesN, N in 1..=32
    FixedBytes(usize),
    /// bytes
    Bytes,
    /// string
    String,
}

impl ParamType {
    /// Dynamic types live in the tail behind an offset
    pub fn is_dynamic(&self) -> bool {
        matches!(self, ParamType::Bytes | ParamType::String)
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamType::Address => f.write_str("address"),
            ParamType::Uint(bits) => write!(f, "uint{}", bits),
            ParamType::Bool => f.write_str("bool"),
            ParamType::FixedBytes(size) => write!(f, "bytes{}", size),
            ParamType::Bytes => f.write_str("bytes"),
            ParamType::String => f.write_str("string"),
        }
    }
}

impl FromStr for ParamType {
    type Err = SdkError;

    /// Parse a canonical type name. `uint` is an alias of `uint256`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let unsupported = || SdkError::Configuration(format!("unsupported abi type: {}", s));

        match s {
            "address" => return Ok(ParamType::Address),
            "bool" => return Ok(ParamType::Bool),
            "string" => return Ok(ParamType::String),
            "bytes" => return Ok(ParamType::Bytes),
            "uint" => return Ok(ParamType::Uint(256)),
            _ => {}
        }

        if let Some(rest) = s.strip_prefix("uint") {
            let bits: usize = rest.parse().map_err(|_| unsupported())?;
            if bits == 0 || bits > 256 || bits % 8 != 0 {
                return Err(unsupported());
            }
            return Ok(ParamType::Uint(bits));
        }

        if let Some(rest) = s.strip_prefix("bytes") {
            let size: usize = rest.parse().map_err(|_| unsupported())?;
            if size == 0 || size > 32 {
                return Err(unsupported());
            }
            return Ok(ParamType::FixedBytes(size));
        }

        Err(unsupported())
    }
}

impl Token {
    /// Does this value fit `param`? Integers must fit the declared width and
    /// fixed bytes must have the declared length.
    pub fn matches(&self, param: &ParamType) -> bool {
        match (self, param) {
            (Token::Address(_), ParamType::Address) => true,
            (Token::Uint(value), ParamType::Uint(bits)) => value.bits() <= *bits,
            (Token::Bool(_), ParamType::Bool) => true,
            (Token::FixedBytes(bytes), ParamType::FixedBytes(size)) => bytes.len() == *size,
            (Token::Bytes(_), ParamType::Bytes) => true,
            (Token::String(_), ParamType::String) => true,
            _ => false,
        }
    }

    /// Short kind name for error messages
    pub fn kind(&self) -> &'static str {
        match self {
            Token::Address(_) => "address",
            Token::Uint(_) => "uint",
            Token::Bool(_) => "bool",
            Token::FixedBytes(_) => "fixed bytes",
            Token::Bytes(_) => "bytes",
            Token::String(_) => "string",
        }
    }

    /// Address value
    pub fn into_address(self) -> Option<Address> {
        match self {
            Token::Address(a) => Some(a),
            _ => None,
        }
    }

    /// Integer value
    pub fn into_uint(self) -> Option<U256> {
        match self {
            Token::Uint(v) => Some(v),
            _ => None,
        }
    }

    /// Boolean value
    pub fn into_bool(self) -> Option<bool> {
        match self {
            Token::Bool(b) => Some(b),
            _ => None,
        }
    }

    /// String value
    pub fn into_string(self) -> Option<String> {
        match self {
            Token::String(s) => Some(s),
            _ => None,
        }
    }

    /// Fixed or dynamic bytes
    pub fn into_bytes(self) -> Option<Vec<u8>> {
        match self {
            Token::FixedBytes(b) | Token::Bytes(b) => Some(b),
            _ => None,
        }
    }
}

impl From<Address> for Token {
    fn from(a: Address) -> Self {
        Token::Address(a)
    }
}

impl From<U256> for Token {
    fn from(v: U256) -> Self {
        Token::Uint(v)
    }
}

impl From<bool> for Token {
    fn from(b: bool) -> Self {
        Token::Bool(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_types() {
        assert_eq!("address".parse::<ParamType>().unwrap(), ParamType::Address);
        assert_eq!("uint256".parse::<ParamType>().unwrap(), ParamType::Uint(256));
        assert_eq!("uint".parse::<ParamType>().unwrap(), ParamType::Uint(256));
        assert_eq!("uint8".parse::<ParamType>().unwrap(), ParamType::Uint(8));
        assert_eq!("bytes32".parse::<ParamType>().unwrap(), ParamType::FixedBytes(32));
        assert_eq!("bytes".parse::<ParamType>().unwrap(), ParamType::Bytes);
    }

    #[test]
    fn test_unsupported_types() {
        for ty in ["int256", "uint7", "uint264", "bytes33", "bytes0", "tuple", "address[]", "uint256[2]"] {
            assert!(matches!(ty.parse::<ParamType>(), Err(SdkError::Configuration(_))), "{}", ty);
        }
    }

    #[test]
    fn test_display_is_canonical() {
        assert_eq!(ParamType::Uint(256).to_string(), "uint256");
        assert_eq!(ParamType::FixedBytes(32).to_string(), "bytes32");
    }

    #[test]
    fn test_token_matches_width() {
        assert!(Token::Uint(U256::from(255)).matches(&ParamType::Uint(8)));
        assert!(!Token::Uint(U256::from(256)).matches(&ParamType::Uint(8)));
        assert!(Token::Uint(U256::MAX).matches(&ParamType::Uint(256)));
        assert!(Token::FixedBytes(vec![0; 32]).matches(&ParamType::FixedBytes(32)));
        assert!(!Token::FixedBytes(vec![0; 31]).matches(&ParamType::FixedBytes(32)));
        assert!(!Token::Bool(true).matches(&ParamType::Uint(256)));
    }
}
