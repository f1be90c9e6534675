// Turning structural codes into digit vectors.
//
// Two policies live side by side:
// - `parse_digits` is lenient. Unreadable, negative and out-of-alphabet tokens
//   are skipped without complaint, parsing stops once `order` digits are
//   collected, and a short code is padded with zeros. Every code that ever
//   round-tripped through a persistence layer keeps loading, whatever it looks
//   like.
// - `parse_digits_strict` refuses anything the lenient parser would have to
//   skip, pad or truncate, and says why via `CodeError`.
//
// Both accept packed and flat codes.

use crate::codec::{expand, token_count};
use crate::error::CodeError;

/// Every token that reads as a signed integer, in order. Unreadable tokens
/// are skipped; negative values are kept.
pub fn parse_values(code: &str) -> Vec<i64> {
    expand(code)
        .filter_map(|token| token.parse::<i64>().ok())
        .collect()
}

/// Leniently parse exactly `order` digits in `[0, degree)` from a code.
pub fn parse_digits(code: &str, order: usize, degree: u32) -> Vec<u32> {
    let mut digits: Vec<u32> = expand(code)
        .filter_map(|token| token.parse::<i64>().ok())
        .filter_map(|value| u32::try_from(value).ok())
        .filter(|&digit| digit < degree)
        .take(order)
        .collect();
    digits.resize(order, 0);
    digits
}

/// Parse exactly `order` digits in `[0, degree)`, rejecting anything else.
pub fn parse_digits_strict(code: &str, order: usize, degree: u32) -> Result<Vec<u32>, CodeError> {
    let found = token_count(code);
    if found != order {
        return Err(CodeError::DigitCount {
            expected: order,
            found,
        });
    }

    let mut digits = Vec::with_capacity(order);
    for (index, token) in expand(code).enumerate() {
        let value = token.parse::<i64>().map_err(|_| CodeError::Malformed {
            index,
            token: token.to_string(),
        })?;
        if value < 0 {
            return Err(CodeError::Negative { index, value });
        }
        match u32::try_from(value) {
            Ok(digit) if digit < degree => digits.push(digit),
            _ => {
                return Err(CodeError::OutOfAlphabet {
                    index,
                    value,
                    degree,
                });
            }
        }
    }
    Ok(digits)
}
