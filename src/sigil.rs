//! The sigil table: the reserved single-entry-object keys that disambiguate
//! a plain JSON shape from a typed Jolt value.

/// Lower bound of the safe integer band: an `Int` at or above this value may
/// be emitted as a bare JSON number.
pub const SAFE_INT_LO: i64 = -(1i64 << 31);

/// Upper bound of the safe integer band (`2^31 - 1`).
pub const SAFE_INT_HI: i64 = (1i64 << 31) - 1;

pub const SIGIL_BIG_INT: &str = "Z";
pub const SIGIL_FLOAT: &str = "R";
pub const SIGIL_TEMPORAL: &str = "T";
pub const SIGIL_BYTES: &str = "#";
pub const SIGIL_MAP: &str = "{}";
pub const SIGIL_GRAPH: &str = "G";
pub const SIGIL_POINT_PREFIX: &str = "@";

/// Sigils the source implementation left as unspecified placeholders.
/// A compliant decoder must reject them rather than guess their semantics.
pub const RESERVED_SIGILS: &[&str] = &["()", "->", "--"];

/// Is `n` within the range that may be emitted as a bare JSON integer?
pub fn is_safe_int(n: i64) -> bool {
    (SAFE_INT_LO..=SAFE_INT_HI).contains(&n)
}

/// Does `key` look like it could be (or collide with) a sigil, such that a
/// one-entry Map with this key must be disambiguated with the `{}` wrapper?
pub fn looks_like_sigil(key: &str) -> bool {
    matches!(
        key,
        SIGIL_BIG_INT | SIGIL_FLOAT | SIGIL_TEMPORAL | SIGIL_BYTES | SIGIL_MAP | SIGIL_GRAPH
    ) || is_point_sigil(key)
        || RESERVED_SIGILS.contains(&key)
}

/// `@<digits>` — a Point sigil for some SRID.
pub fn is_point_sigil(key: &str) -> bool {
    parse_point_sigil(key).is_some()
}

/// Parse `@<srid>` into the numeric SRID, if `key` has that shape.
pub fn parse_point_sigil(key: &str) -> Option<i64> {
    let digits = key.strip_prefix(SIGIL_POINT_PREFIX)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse::<i64>().ok()
}
