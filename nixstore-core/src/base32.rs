// SPDX-FileCopyrightText: 2026 nixstore contributors
// SPDX-License-Identifier: MIT

//! Nix base32 encoding/decoding.
//!
//! Nix uses its own alphabet (no `e`, `o`, `u`, `t`) and writes the encoded
//! string in reverse order compared to a plain LSB-first base32 encoding.

use std::sync::LazyLock;

use data_encoding::{BitOrder, DecodeError, Encoding, Specification};

/// The 32-character alphabet used by Nix's base32 encoding.
pub const ALPHABET: &str = "0123456789abcdfghijklmnpqrsvwxyz";

static NIX_BASE32: LazyLock<Encoding> = LazyLock::new(|| {
    let mut spec = Specification::new();
    spec.symbols.push_str(ALPHABET);
    spec.bit_order = BitOrder::LeastSignificantFirst;
    spec.encoding().unwrap()
});

/// Length of the encoding of `len` bytes.
pub const fn encode_len(len: usize) -> usize {
    (8 * len).div_ceil(5)
}

/// Whether `c` belongs to the nix-base32 alphabet.
pub fn is_valid_char(c: char) -> bool {
    c.is_ascii() && ALPHABET.as_bytes().contains(&(c as u8))
}

pub fn encode_string(input: &[u8]) -> String {
    NIX_BASE32.encode(input).chars().rev().collect()
}

/// Decode `input` into `output`, which must be exactly as long as the
/// decoded data.
pub fn decode_mut(input: &[u8], output: &mut [u8]) -> Result<usize, DecodeError> {
    let mut reversed = input.to_vec();
    reversed.reverse();

    NIX_BASE32
        .decode_mut(&reversed, output)
        .map_err(|err| DecodeError {
            position: input.len() - err.error.position - 1,
            kind: err.error.kind,
        })
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::empty("", &[])]
    #[case::one_0("00", &[0x00])]
    #[case::one_1f("0z", &[0x1f])]
    #[case::one_20("10", &[0x20])]
    #[case::two("0bqz", &[0x1f, 0x2f])]
    #[case::three("gy003", &[0x03, 0x00, 0xff])]
    #[case::sha1(
        "x0xf8v9fxf3jk8zln1cwlsrmhqvp0f88",
        &[0x08, 0x39, 0x70, 0x37, 0x86, 0x35, 0x6b, 0xca, 0x59, 0xb0,
          0xf4, 0xa3, 0x29, 0x87, 0xeb, 0x2e, 0x6d, 0xe4, 0x3a, 0xe8]
    )]
    fn encode_matches_nix(#[case] expected: &str, #[case] data: &[u8]) {
        assert_eq!(encode_string(data), expected);
        assert_eq!(expected.len(), encode_len(data.len()));

        let mut output = vec![0u8; data.len()];
        decode_mut(expected.as_bytes(), &mut output).unwrap();
        assert_eq!(output, data);
    }

    #[rstest]
    #[case::letter_e('e', false)]
    #[case::letter_o('o', false)]
    #[case::letter_u('u', false)]
    #[case::letter_t('t', false)]
    #[case::dash('-', false)]
    #[case::upper('A', false)]
    #[case::digit('7', true)]
    #[case::letter_z('z', true)]
    fn alphabet_membership(#[case] c: char, #[case] valid: bool) {
        assert_eq!(is_valid_char(c), valid);
    }

    proptest! {
        #[test]
        fn proptest_digest_roundtrip(data in proptest::array::uniform20(any::<u8>())) {
            let encoded = encode_string(&data);
            let mut decoded = [0u8; 20];
            decode_mut(encoded.as_bytes(), &mut decoded).unwrap();
            prop_assert_eq!(data, decoded);
        }
    }
}
