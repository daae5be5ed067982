//! Optional-scalar adapter.
//!
//! The configuration model holds every optional scalar as `Option<T>`. The
//! wire model uses two representations:
//! - explicit presence (`Option<T>` on the wire), mapped `None ⇄ None` and
//!   `Some(v) ⇄ Some(v)` with no transformation;
//! - implicit presence, where the type's zero value is the "unset" sentinel.
//!
//! The only value transformation allowed here is integer narrowing, which
//! clamps out-of-range values to absent instead of failing.

/// Scalars whose zero value doubles as the "unset" sentinel on the wire.
pub trait OptionalScalar: Sized + Default + PartialEq {
    /// Returns true when the value equals the unset sentinel.
    fn is_unset(&self) -> bool {
        *self == Self::default()
    }
}

impl OptionalScalar for String {}
impl OptionalScalar for i64 {}

/// Reads an implicit-presence wire scalar: the zero value means absent.
pub fn from_implicit<T: OptionalScalar>(value: T) -> Option<T> {
    if value.is_unset() { None } else { Some(value) }
}

/// Writes an implicit-presence wire scalar: absent becomes the zero value.
pub fn to_implicit<T: OptionalScalar>(value: Option<T>) -> T {
    value.unwrap_or_default()
}

/// Narrows a 64-bit configuration integer to its 32-bit wire field.
///
/// Values outside `[i32::MIN, i32::MAX]` are left absent rather than failing.
/// The affected fields are advisory, so callers that need strict validation
/// must check the range before converting.
///
/// # Example
/// ```rust
/// use declsync_core::optional::narrow_i64;
///
/// assert_eq!(narrow_i64("port", Some(5432)), Some(5432));
/// assert_eq!(narrow_i64("port", Some(1 << 31)), None);
/// assert_eq!(narrow_i64("port", None), None);
/// ```
pub fn narrow_i64(field: &str, value: Option<i64>) -> Option<i32> {
    let value = value?;
    match i32::try_from(value) {
        Ok(narrowed) => Some(narrowed),
        Err(_) => {
            tracing::warn!(field, value, "value outside 32-bit range; leaving it absent");
            None
        }
    }
}

/// Widens a 32-bit wire integer into the 64-bit configuration model.
pub fn widen_i32(value: Option<i32>) -> Option<i64> {
    value.map(i64::from)
}

/// Clamps a signed 64-bit value into an unsigned 32-bit wire field.
///
/// Negative values become 0 and values above `u32::MAX` saturate.
pub fn clamp_to_u32(field: &str, value: i64) -> u32 {
    match u32::try_from(value) {
        Ok(clamped) => clamped,
        Err(_) if value < 0 => {
            tracing::debug!(field, value, "negative value clamped to 0");
            0
        }
        Err(_) => {
            tracing::warn!(field, value, "value above u32::MAX saturated");
            u32::MAX
        }
    }
}

/// Returns the string when it is non-empty.
pub fn non_empty(value: &str) -> Option<&str> {
    if value.is_empty() { None } else { Some(value) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Some(0), Some(0))]
    #[case(Some(5432), Some(5432))]
    #[case(Some(i64::from(i32::MAX)), Some(i32::MAX))]
    #[case(Some(i64::from(i32::MIN)), Some(i32::MIN))]
    #[case(Some(1 << 31), None)]
    #[case(Some(-(1 << 31) - 1), None)]
    #[case(Some(i64::MAX), None)]
    #[case(None, None)]
    fn test_narrow_i64(#[case] input: Option<i64>, #[case] expected: Option<i32>) {
        assert_eq!(narrow_i64("port", input), expected);
    }

    #[test]
    fn test_widen_is_lossless() {
        assert_eq!(widen_i32(Some(i32::MIN)), Some(i64::from(i32::MIN)));
        assert_eq!(widen_i32(None), None);
    }

    #[rstest]
    #[case(-5, 0)]
    #[case(0, 0)]
    #[case(7, 7)]
    #[case(i64::from(u32::MAX) + 1, u32::MAX)]
    fn test_clamp_to_u32(#[case] input: i64, #[case] expected: u32) {
        assert_eq!(clamp_to_u32("priority", input), expected);
    }

    #[test]
    fn test_implicit_presence() {
        assert_eq!(from_implicit(String::new()), None);
        assert_eq!(from_implicit("db".to_string()), Some("db".to_string()));
        assert_eq!(from_implicit(0_i64), None);
        assert_eq!(to_implicit::<i64>(None), 0);
        assert_eq!(to_implicit(Some(22_i64)), 22);
        assert_eq!(to_implicit::<String>(None), "");
    }

    #[test]
    fn test_non_empty() {
        assert_eq!(non_empty(""), None);
        assert_eq!(non_empty("x"), Some("x"));
    }
}
