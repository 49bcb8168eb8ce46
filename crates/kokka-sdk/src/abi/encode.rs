//! ABI encoding

use kokka_primitives::U256;

use super::types::{ParamType, Token};
use crate::SdkError;

/// Encode `tokens` against the declared `types`. Arity, kind, integer
/// width and fixed-bytes length are all checked.
pub fn encode(types: &[ParamType], tokens: &[Token]) -> Result<Vec<u8>, SdkError> {
    if types.len() != tokens.len() {
        return Err(SdkError::Encoding(format!(
            "expected {} arguments, got {}",
            types.len(),
            tokens.len()
        )));
    }
    for (i, (param, token)) in types.iter().zip(tokens).enumerate() {
        if !token.matches(param) {
            return Err(SdkError::Encoding(format!(
                "argument {}: {} value does not fit {}",
                i,
                token.kind(),
                param
            )));
        }
    }

    // Every supported head slot is one word
    let head_size = 32 * types.len();
    let mut head = Vec::with_capacity(head_size);
    let mut tail = Vec::new();

    for (param, token) in types.iter().zip(tokens) {
        if param.is_dynamic() {
            head.extend_from_slice(&word(U256::from(head_size + tail.len())));
            tail.extend(encode_dynamic(token));
        } else {
            head.extend_from_slice(&encode_static(token));
        }
    }

    head.extend(tail);
    Ok(head)
}

/// Selector followed by the encoded arguments
pub fn encode_function_call(
    selector: [u8; 4],
    types: &[ParamType],
    tokens: &[Token],
) -> Result<Vec<u8>, SdkError> {
    let mut out = selector.to_vec();
    out.extend(encode(types, tokens)?);
    Ok(out)
}

fn word(value: U256) -> [u8; 32] {
    let mut buf = [0u8; 32];
    value.to_big_endian(&mut buf);
    buf
}

fn encode_static(token: &Token) -> [u8; 32] {
    let mut buf = [0u8; 32];
    match token {
        Token::Address(addr) => buf[12..].copy_from_slice(addr.as_bytes()),
        Token::Uint(value) => buf = word(*value),
        Token::Bool(b) => buf[31] = *b as u8,
        Token::FixedBytes(bytes) => buf[..bytes.len()].copy_from_slice(bytes),
        Token::Bytes(_) | Token::String(_) => {}
    }
    buf
}

fn encode_dynamic(token: &Token) -> Vec<u8> {
    let data: &[u8] = match token {
        Token::Bytes(bytes) => bytes.as_slice(),
        Token::String(s) => s.as_bytes(),
        _ => &[],
    };
    let mut out = word(U256::from(data.len())).to_vec();
    out.extend_from_slice(data);
    out.resize(32 + data.len().div_ceil(32) * 32, 0);
    out
}
