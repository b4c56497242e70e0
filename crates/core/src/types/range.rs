//! Series range type.

use core::fmt;

/// Errors that can occur when parsing a [`SeriesRange`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RangeError {
    /// A range bound contains no digits at all.
    #[error("range bound must contain at least one digit")]
    NoDigits,
    /// A range bound has more digits than fit in a 64-bit value.
    #[error("range bound must be at most {max} digits")]
    TooManyDigits {
        /// Maximum allowed digit count.
        max: usize,
    },
    /// The start of the range is numerically greater than the end.
    #[error("range start {from} is greater than range end {to}")]
    Inverted {
        /// Normalized start label.
        from: String,
        /// Normalized end label.
        to: String,
    },
}

/// An inclusive numeric series range with zero-padded display labels.
///
/// Bounds are kept in two synchronized representations: a padded string
/// label for display and storage (e.g. `"00007"`) and the parsed numeric
/// value used for every comparison. Labels are never compared
/// lexicographically, so `"00100"` and `"99"` order correctly.
///
/// ## Constraints
///
/// - Each bound must contain at least one ASCII digit (all other
///   characters are stripped before parsing)
/// - Bounds are limited to 18 digits so the parsed value fits an `i64`
/// - The start must not exceed the end
///
/// ## Examples
///
/// ```
/// use stockroom_core::SeriesRange;
///
/// let range = SeriesRange::parse("7", "12").unwrap();
/// assert_eq!(range.from_label(), "00007");
/// assert_eq!(range.to_label(), "00012");
/// assert_eq!(range.quantity(), 6);
///
/// // Inverted bounds are rejected
/// assert!(SeriesRange::parse("10", "2").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SeriesRange {
    from_label: String,
    to_label: String,
    from_value: i64,
    to_value: i64,
}

impl SeriesRange {
    /// Width labels are zero-padded to. Longer inputs keep their own width.
    pub const PAD_WIDTH: usize = 5;

    /// Maximum digits per bound. 18 decimal digits always fit an `i64`.
    pub const MAX_DIGITS: usize = 18;

    /// Parse a `SeriesRange` from raw `from`/`to` bounds.
    ///
    /// Each bound is normalized first: non-digit characters are stripped
    /// and the remaining digits are left-padded with zeros to
    /// [`Self::PAD_WIDTH`]. The inclusive-range check uses the numeric
    /// values, not the labels.
    ///
    /// # Errors
    ///
    /// Returns an error if either bound:
    /// - Contains no digits
    /// - Has more than 18 digits
    ///
    /// or if the normalized `from` is numerically greater than `to`.
    pub fn parse(from: &str, to: &str) -> Result<Self, RangeError> {
        let (from_label, from_value) = Self::normalize(from)?;
        let (to_label, to_value) = Self::normalize(to)?;

        if from_value > to_value {
            return Err(RangeError::Inverted {
                from: from_label,
                to: to_label,
            });
        }

        Ok(Self {
            from_label,
            to_label,
            from_value,
            to_value,
        })
    }

    /// Normalize one bound into its padded label and numeric value.
    fn normalize(raw: &str) -> Result<(String, i64), RangeError> {
        let digits: String = raw.chars().filter(char::is_ascii_digit).collect();

        if digits.is_empty() {
            return Err(RangeError::NoDigits);
        }

        if digits.len() > Self::MAX_DIGITS {
            return Err(RangeError::TooManyDigits {
                max: Self::MAX_DIGITS,
            });
        }

        // Infallible after the digit/length checks above.
        let value = digits
            .bytes()
            .fold(0_i64, |acc, b| acc * 10 + i64::from(b - b'0'));
        let label = format!("{digits:0>width$}", width = Self::PAD_WIDTH);

        Ok((label, value))
    }

    /// Padded label of the range start (e.g. `"00001"`).
    #[must_use]
    pub fn from_label(&self) -> &str {
        &self.from_label
    }

    /// Padded label of the range end (e.g. `"00010"`).
    #[must_use]
    pub fn to_label(&self) -> &str {
        &self.to_label
    }

    /// Numeric value of the range start.
    #[must_use]
    pub const fn from_value(&self) -> i64 {
        self.from_value
    }

    /// Numeric value of the range end.
    #[must_use]
    pub const fn to_value(&self) -> i64 {
        self.to_value
    }

    /// Number of units covered by the inclusive range.
    #[must_use]
    pub const fn quantity(&self) -> i64 {
        self.to_value - self.from_value + 1
    }

    /// Whether two inclusive ranges share at least one value.
    #[must_use]
    pub const fn overlaps(&self, other: &Self) -> bool {
        self.from_value <= other.to_value && other.from_value <= self.to_value
    }
}

impl fmt::Display for SeriesRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}–{}", self.from_label, self.to_label)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pads_short_bounds() {
        let range = SeriesRange::parse("1", "10").unwrap();
        assert_eq!(range.from_label(), "00001");
        assert_eq!(range.to_label(), "00010");
        assert_eq!(range.from_value(), 1);
        assert_eq!(range.to_value(), 10);
    }

    #[test]
    fn test_parse_preserves_leading_zeros() {
        let range = SeriesRange::parse("00007", "00012").unwrap();
        assert_eq!(range.from_label(), "00007");
        assert_eq!(range.from_value(), 7);
    }

    #[test]
    fn test_parse_keeps_width_of_long_bounds() {
        let range = SeriesRange::parse("100000", "200000").unwrap();
        assert_eq!(range.from_label(), "100000");
        assert_eq!(range.to_label(), "200000");
    }

    #[test]
    fn test_parse_strips_non_digits() {
        let range = SeriesRange::parse("A-17", "A-23").unwrap();
        assert_eq!(range.from_label(), "00017");
        assert_eq!(range.to_label(), "00023");
    }

    #[test]
    fn test_parse_no_digits() {
        assert!(matches!(
            SeriesRange::parse("abc", "10"),
            Err(RangeError::NoDigits)
        ));
        assert!(matches!(
            SeriesRange::parse("", "10"),
            Err(RangeError::NoDigits)
        ));
    }

    #[test]
    fn test_parse_too_many_digits() {
        let long = "9".repeat(19);
        assert!(matches!(
            SeriesRange::parse(&long, &long),
            Err(RangeError::TooManyDigits { max: 18 })
        ));
    }

    #[test]
    fn test_parse_eighteen_digits_ok() {
        let bound = "9".repeat(18);
        let range = SeriesRange::parse(&bound, &bound).unwrap();
        assert_eq!(range.from_value(), 999_999_999_999_999_999);
    }

    #[test]
    fn test_parse_inverted() {
        let err = SeriesRange::parse("10", "2").unwrap_err();
        assert_eq!(
            err,
            RangeError::Inverted {
                from: "00010".to_owned(),
                to: "00002".to_owned(),
            }
        );
    }

    #[test]
    fn test_numeric_comparison_across_widths() {
        // "99" < "00100" numerically even though it is greater as a string
        assert!(SeriesRange::parse("99", "00100").is_ok());
        assert!(SeriesRange::parse("00100", "99").is_err());
    }

    #[test]
    fn test_single_value_range() {
        let range = SeriesRange::parse("5", "5").unwrap();
        assert_eq!(range.quantity(), 1);
    }

    #[test]
    fn test_quantity() {
        let range = SeriesRange::parse("1", "10").unwrap();
        assert_eq!(range.quantity(), 10);
    }

    #[test]
    fn test_overlaps() {
        let base = SeriesRange::parse("10", "20").unwrap();

        // Fully inside, partial, touching at each endpoint, containing
        assert!(base.overlaps(&SeriesRange::parse("12", "18").unwrap()));
        assert!(base.overlaps(&SeriesRange::parse("5", "10").unwrap()));
        assert!(base.overlaps(&SeriesRange::parse("20", "25").unwrap()));
        assert!(base.overlaps(&SeriesRange::parse("1", "100").unwrap()));

        // Strictly before and strictly after
        assert!(!base.overlaps(&SeriesRange::parse("1", "9").unwrap()));
        assert!(!base.overlaps(&SeriesRange::parse("21", "30").unwrap()));
    }

    #[test]
    fn test_overlaps_is_symmetric() {
        let a = SeriesRange::parse("10", "20").unwrap();
        let b = SeriesRange::parse("15", "25").unwrap();
        assert_eq!(a.overlaps(&b), b.overlaps(&a));
    }

    #[test]
    fn test_display() {
        let range = SeriesRange::parse("1", "10").unwrap();
        assert_eq!(format!("{range}"), "00001–00010");
    }
}
