//! # Hasher
//!
//! SHA-256 over canonical JSON. Block digests and chain digests both go
//! through [`hash_canonical`], which serialises a projection struct with
//! `serde_json` (compact, fields in declaration order) and hashes the UTF-8
//! bytes. Field order is therefore part of the contract: the projection
//! structs in `storage::block` and `network::consensus` must never be
//! reordered.
//!
//! Numbers inside projections follow JavaScript printing rules (see
//! [`serialize_js_number`]) so digests agree with the browser rendition of
//! the same ledger.

use serde::ser::Error as _;
use serde::{Serialize, Serializer};
use serde_json::value::RawValue;
use sha2::{Digest, Sha256};

/// Decimal exponent above which JavaScript switches to exponential notation.
const JS_MAX_DECIMAL_EXPONENT: i32 = 21;
/// Decimal exponent at or below which JavaScript switches to exponential notation.
const JS_MIN_DECIMAL_EXPONENT: i32 = -6;

/// Compute the SHA-256 hash of the input data.
///
/// # Example
///
/// ```
/// use ledgerlab_protocol::crypto::sha256;
///
/// let hash = sha256(b"ledger");
/// assert_eq!(hash.len(), 32);
/// ```
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Compute the SHA-256 hash of a string and return it as lowercase hex.
///
/// This is the `hash(input) -> hex-digest` contract every stored block hash
/// and chain digest is built on.
pub fn sha256_hex(input: &str) -> String {
    hex::encode(sha256(input.as_bytes()))
}

/// Serialise a projection into its canonical compact JSON form.
///
/// Projections contain only strings, integers and finite-or-null numbers,
/// none of which can fail to serialise, so a failure degrades to an empty
/// string rather than an error.
pub fn canonical_json<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_default()
}

/// Hash a projection: `sha256_hex(canonical_json(value))`.
pub fn hash_canonical<T: Serialize + ?Sized>(value: &T) -> String {
    sha256_hex(&canonical_json(value))
}

/// Format a finite `f64` the way JavaScript's `Number.prototype.toString`
/// does.
///
/// Starts from the shortest round-trip digits and places the decimal point
/// by JavaScript's rules: plain digits for decimal exponents in `(-6, 21]`,
/// otherwise `d.ddde±x`. `-0` prints as `0`.
pub fn js_number_string(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }

    let sign = if value < 0.0 { "-" } else { "" };
    let scientific = format!("{:e}", value.abs());
    let (mantissa, exponent) = match scientific.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => (scientific.as_str(), 0),
    };
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();
    let k = digits.len() as i32;
    // Position of the decimal point relative to the first digit.
    let n = exponent + 1;

    let body = if k <= n && n <= JS_MAX_DECIMAL_EXPONENT {
        format!("{}{}", digits, "0".repeat((n - k) as usize))
    } else if 0 < n && n <= JS_MAX_DECIMAL_EXPONENT {
        let (int, frac) = digits.split_at(n as usize);
        format!("{}.{}", int, frac)
    } else if JS_MIN_DECIMAL_EXPONENT < n && n <= 0 {
        format!("0.{}{}", "0".repeat((-n) as usize), digits)
    } else {
        let e = n - 1;
        let e_sign = if e < 0 { '-' } else { '+' };
        let (lead, rest) = digits.split_at(1);
        if rest.is_empty() {
            format!("{}e{}{}", lead, e_sign, e.abs())
        } else {
            format!("{}.{}e{}{}", lead, rest, e_sign, e.abs())
        }
    };

    format!("{}{}", sign, body)
}

/// Serialise an `f64` the way `JSON.stringify` prints a number.
///
/// Finite values are written as [`js_number_string`] renders them (`10`,
/// not `10.0`; `0.000001`, not `1e-6`; `1e+21`, not `1e21`). Non-finite
/// values become `null`.
pub fn serialize_js_number<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    let v = *value;
    if !v.is_finite() {
        return serializer.serialize_none();
    }
    let raw = RawValue::from_string(js_number_string(v)).map_err(S::Error::custom)?;
    raw.serialize(serializer)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Sample {
        #[serde(serialize_with = "serialize_js_number")]
        n: f64,
    }

    fn js(n: f64) -> String {
        canonical_json(&Sample { n })
    }

    #[test]
    fn test_sha256_known_vector() {
        assert_eq!(
            sha256_hex("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_sha256_empty_input() {
        assert_eq!(
            sha256_hex(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn sha256_deterministic() {
        assert_eq!(sha256(b"same input"), sha256(b"same input"));
        assert_ne!(sha256(b"input a"), sha256(b"input b"));
    }

    #[test]
    fn hex_digest_is_lowercase_and_64_chars() {
        let digest = sha256_hex("ledger");
        assert_eq!(digest.len(), crate::config::HASH_HEX_LENGTH);
        assert!(digest.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }

    #[test]
    fn integral_numbers_have_no_fraction() {
        assert_eq!(js(10.0), r#"{"n":10}"#);
        assert_eq!(js(-3.0), r#"{"n":-3}"#);
        assert_eq!(js(-0.0), r#"{"n":0}"#);
    }

    #[test]
    fn fractional_numbers_use_shortest_form() {
        assert_eq!(js(10.5), r#"{"n":10.5}"#);
        assert_eq!(js(0.1), r#"{"n":0.1}"#);
    }

    #[test]
    fn small_magnitudes_stay_decimal_down_to_micro() {
        assert_eq!(js(0.000001), r#"{"n":0.000001}"#);
        assert_eq!(js(0.0000123), r#"{"n":0.0000123}"#);
        assert_eq!(js(1e-7), r#"{"n":1e-7}"#);
        assert_eq!(js(-2.5e-8), r#"{"n":-2.5e-8}"#);
    }

    #[test]
    fn large_integers_print_every_digit_below_1e21() {
        assert_eq!(js(1e16), r#"{"n":10000000000000000}"#);
        assert_eq!(js(9_007_199_254_740_992.0), r#"{"n":9007199254740992}"#);
        assert_eq!(js(1e20), r#"{"n":100000000000000000000}"#);
        assert_eq!(js(1e21), r#"{"n":1e+21}"#);
        assert_eq!(js(1.5e300), r#"{"n":1.5e+300}"#);
    }

    #[test]
    fn digest_hashes_javascript_number_text() {
        assert_ne!(hash_canonical(&Sample { n: 0.000001 }), sha256_hex(r#"{"n":1e-6}"#));
        assert_eq!(
            hash_canonical(&Sample { n: 0.000001 }),
            sha256_hex(r#"{"n":0.000001}"#)
        );
    }

    #[test]
    fn non_finite_numbers_become_null() {
        assert_eq!(js(f64::INFINITY), r#"{"n":null}"#);
        assert_eq!(js(f64::NAN), r#"{"n":null}"#);
    }

    #[test]
    fn hash_canonical_hashes_the_compact_json() {
        let sample = Sample { n: 1.0 };
        assert_eq!(hash_canonical(&sample), sha256_hex(r#"{"n":1}"#));
    }
}
