//! Record limit policy applied when records are emitted.

use crate::value::{KeyValue, Value};

/// Limits applied to each log record at emit time.
///
/// The provider reads its limits from a supplier on every emit rather than
/// caching them per logger, so a policy source may change values between
/// reads.
///
/// # Examples
///
/// ```rust
/// use lumen_logs::LogRecordLimits;
///
/// let limits = LogRecordLimits::default()
///     .with_max_attributes(32)
///     .with_max_attribute_value_length(256);
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[must_use]
pub struct LogRecordLimits {
    max_attributes: usize,
    max_attribute_value_length: Option<usize>,
}

impl Default for LogRecordLimits {
    /// At most 128 attributes, with unlimited value length.
    fn default() -> Self {
        Self {
            max_attributes: 128,
            max_attribute_value_length: None,
        }
    }
}

impl LogRecordLimits {
    /// Sets the maximum number of attributes kept per record; the rest are
    /// dropped and counted.
    pub fn with_max_attributes(mut self, max_attributes: usize) -> Self {
        self.max_attributes = max_attributes;
        self
    }

    /// Sets the maximum length (in bytes) of string attribute values;
    /// longer values are truncated on a character boundary.
    pub fn with_max_attribute_value_length(mut self, max_length: usize) -> Self {
        self.max_attribute_value_length = Some(max_length);
        self
    }

    /// The maximum number of attributes kept per record.
    pub fn max_attributes(&self) -> usize {
        self.max_attributes
    }

    /// The maximum string attribute value length, if limited.
    pub fn max_attribute_value_length(&self) -> Option<usize> {
        self.max_attribute_value_length
    }

    /// Applies the limits to an attribute list in place, returning the
    /// number of dropped attributes.
    pub(crate) fn apply(&self, attributes: &mut Vec<KeyValue>) -> u32 {
        let dropped = attributes.len().saturating_sub(self.max_attributes);
        attributes.truncate(self.max_attributes);

        if let Some(max_length) = self.max_attribute_value_length {
            for attribute in attributes.iter_mut() {
                if let Value::String(value) = &mut attribute.value {
                    truncate_to_boundary(value, max_length);
                }
            }
        }

        dropped as u32
    }
}

/// Truncates `value` to at most `max_length` bytes without splitting a
/// character.
fn truncate_to_boundary(value: &mut String, max_length: usize) {
    if value.len() <= max_length {
        return;
    }

    let mut end = max_length;
    while !value.is_char_boundary(end) {
        end -= 1;
    }
    value.truncate(end);
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test]
    fn drops_attributes_beyond_the_count_limit() {
        let limits = LogRecordLimits::default().with_max_attributes(2);
        let mut attributes = vec![
            KeyValue::new("a", 1),
            KeyValue::new("b", 2),
            KeyValue::new("c", 3),
        ];

        let dropped = limits.apply(&mut attributes);

        assert_eq!(dropped, 1);
        assert_eq!(attributes.len(), 2);
        assert_eq!(attributes[0].key, "a");
        assert_eq!(attributes[1].key, "b");
    }

    #[test_case("hello world", 5, "hello"; "ascii cut")]
    #[test_case("hello", 16, "hello"; "under the limit")]
    #[test_case("héllo", 2, "h"; "multi-byte boundary")]
    #[test_case("日本語", 4, "日"; "cjk boundary")]
    fn truncates_string_values_on_char_boundaries(input: &str, limit: usize, expected: &str) {
        let limits = LogRecordLimits::default().with_max_attribute_value_length(limit);
        let mut attributes = vec![KeyValue::new("text", input)];

        let dropped = limits.apply(&mut attributes);

        assert_eq!(dropped, 0);
        assert_eq!(attributes[0].value, Value::String(expected.into()));
    }

    #[test]
    fn non_string_values_are_untouched_by_length_limits() {
        let limits = LogRecordLimits::default().with_max_attribute_value_length(1);
        let mut attributes = vec![KeyValue::new("count", 123_456)];

        limits.apply(&mut attributes);

        assert_eq!(attributes[0].value, Value::I64(123_456));
    }
}
