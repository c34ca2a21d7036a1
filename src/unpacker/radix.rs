use super::UnpackError;

const ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Encode `n` in base `radix` using the digits `0-9a-z`.
///
/// This mirrors JavaScript's `Number.prototype.toString(radix)` for
/// non-negative integers, which is how packers name their tokens.
pub fn to_base(mut n: usize, radix: u32) -> Result<String, UnpackError> {
    if !(2..=36).contains(&radix) {
        return Err(UnpackError::UnsupportedRadix(radix));
    }

    if n == 0 {
        return Ok("0".to_string());
    }

    let radix = radix as usize;
    let mut digits = Vec::new();
    while n > 0 {
        digits.push(ALPHABET[n % radix]);
        n /= radix;
    }
    digits.reverse();

    // Every byte comes from ALPHABET, so this is always ASCII.
    Ok(digits.into_iter().map(char::from).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_is_literal_zero() {
        assert_eq!(to_base(0, 36).unwrap(), "0");
        assert_eq!(to_base(0, 2).unwrap(), "0");
    }

    #[test]
    fn test_base_36() {
        assert_eq!(to_base(9, 36).unwrap(), "9");
        assert_eq!(to_base(10, 36).unwrap(), "a");
        assert_eq!(to_base(35, 36).unwrap(), "z");
        assert_eq!(to_base(36, 36).unwrap(), "10");
        assert_eq!(to_base(1295, 36).unwrap(), "zz");
    }

    #[test]
    fn test_small_bases() {
        assert_eq!(to_base(5, 2).unwrap(), "101");
        assert_eq!(to_base(12, 10).unwrap(), "12");
        assert_eq!(to_base(255, 16).unwrap(), "ff");
    }

    #[test]
    fn test_rejects_unsupported_radix() {
        assert!(matches!(to_base(3, 1), Err(UnpackError::UnsupportedRadix(1))));
        assert!(matches!(to_base(3, 62), Err(UnpackError::UnsupportedRadix(62))));
    }
}
