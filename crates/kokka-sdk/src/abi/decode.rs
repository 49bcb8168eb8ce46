//! ABI decoding

use kokka_primitives::{Address, U256};

use super::types::{ParamType, Token};
use crate::SdkError;

/// Decode `data` as the declared `types`.
///
/// Strict about what a well-behaved contract returns: padding must be
/// zero, booleans must be 0 or 1, integers must fit their width, and
/// offsets and lengths must stay inside `data`.
pub fn decode(types: &[ParamType], data: &[u8]) -> Result<Vec<Token>, SdkError> {
    if types.is_empty() {
        return Ok(Vec::new());
    }
    if data.is_empty() {
        return Err(SdkError::Decoding(
            "empty return data (no contract at address, or call reverted)".to_string(),
        ));
    }
    check_length(data, 32 * types.len())?;

    types
        .iter()
        .enumerate()
        .map(|(i, param)| decode_token(param, data, i * 32))
        .collect()
}

fn decode_token(param: &ParamType, data: &[u8], offset: usize) -> Result<Token, SdkError> {
    let slot = read_word(data, offset)?;
    match param {
        ParamType::Address => {
            require_zero(&slot[..12], "address")?;
            let mut addr = [0u8; 20];
            addr.copy_from_slice(&slot[12..]);
            Ok(Token::Address(Address::from_bytes(addr)))
        }
        ParamType::Uint(bits) => {
            let value = U256::from_big_endian(slot);
            if value.bits() > *bits {
                return Err(SdkError::Decoding(format!("value overflows uint{}", bits)));
            }
            Ok(Token::Uint(value))
        }
        ParamType::Bool => {
            require_zero(&slot[..31], "bool")?;
            match slot[31] {
                0 => Ok(Token::Bool(false)),
                1 => Ok(Token::Bool(true)),
                other => Err(SdkError::Decoding(format!("invalid bool byte {}", other))),
            }
        }
        ParamType::FixedBytes(size) => {
            require_zero(&slot[*size..], "fixed bytes")?;
            Ok(Token::FixedBytes(slot[..*size].to_vec()))
        }
        ParamType::Bytes => Ok(Token::Bytes(decode_tail(data, slot)?)),
        ParamType::String => {
            let bytes = decode_tail(data, slot)?;
            String::from_utf8(bytes)
                .map(Token::String)
                .map_err(|e| SdkError::Decoding(format!("invalid UTF-8: {}", e)))
        }
    }
}

/// Follow a head offset to a length-prefixed payload
fn decode_tail(data: &[u8], offset_word: &[u8]) -> Result<Vec<u8>, SdkError> {
    let offset = to_usize(offset_word, "offset")?;
    let len = to_usize(read_word(data, offset)?, "length")?;
    let start = offset + 32;
    let end = start
        .checked_add(len)
        .ok_or_else(|| SdkError::Decoding("length overflows".to_string()))?;
    check_length(data, end)?;
    Ok(data[start..end].to_vec())
}

fn read_word(data: &[u8], offset: usize) -> Result<&[u8], SdkError> {
    let end = offset
        .checked_add(32)
        .ok_or_else(|| SdkError::Decoding("offset overflows".to_string()))?;
    check_length(data, end)?;
    Ok(&data[offset..end])
}

fn to_usize(word: &[u8], what: &str) -> Result<usize, SdkError> {
    let value = U256::from_big_endian(word);
    if value > U256::from(u32::MAX) {
        return Err(SdkError::Decoding(format!("{} {} out of range", what, value)));
    }
    Ok(value.as_usize())
}

fn require_zero(padding: &[u8], what: &str) -> Result<(), SdkError> {
    if padding.iter().any(|b| *b != 0) {
        return Err(SdkError::Decoding(format!("non-zero padding in {}", what)));
    }
    Ok(())
}

fn check_length(data: &[u8], required: usize) -> Result<(), SdkError> {
    if data.len() < required {
        return Err(SdkError::Decoding(format!(
            "insufficient data: need {} bytes, have {}",
            required,
            data.len()
        )));
    }
    Ok(())
}
