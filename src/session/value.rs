//! Session value cell.

use std::fmt;

/// A value stored in a session. Always holds a string.
///
/// Assigning a string replaces the content ([`set_value`](Self::set_value));
/// assigning any other displayable value appends its textual form
/// ([`append_converted`](Self::append_converted)). The two are kept as
/// separate methods so callers choose explicitly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct SessionValue(String);

impl SessionValue {
    /// Create an empty value.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the content.
    pub fn set_value(&mut self, value: impl Into<String>) -> &mut Self {
        self.0 = value.into();
        self
    }

    /// Append the `Display` form of `value` to the current content.
    ///
    /// ```
    /// use sessionfile::SessionValue;
    ///
    /// let mut v = SessionValue::from("x");
    /// v.append_converted(5);
    /// assert_eq!(v.as_str(), "x5");
    /// ```
    pub fn append_converted(&mut self, value: impl fmt::Display) -> &mut Self {
        use fmt::Write as _;
        // Writing into a String cannot fail.
        let _ = write!(self.0, "{value}");
        self
    }

    /// Get the current content.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check if the value is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consume the value, returning the inner string.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<&str> for SessionValue {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for SessionValue {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl AsRef<str> for SessionValue {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for SessionValue {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for SessionValue {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl fmt::Display for SessionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replace_overwrites() {
        let mut v = SessionValue::new();
        v.set_value("x");
        v.set_value("y");
        assert_eq!(v.as_str(), "y");
    }

    #[test]
    fn test_append_after_replace() {
        let mut v = SessionValue::new();
        v.set_value("x");
        v.append_converted(5);
        assert_eq!(v, "x5");
    }

    #[test]
    fn test_append_various_types() {
        let mut v = SessionValue::new();
        v.append_converted(1u8)
            .append_converted(-2i64)
            .append_converted(true)
            .append_converted('c')
            .append_converted(1.5f64);
        assert_eq!(v.as_str(), "1-2truec1.5");
    }

    #[test]
    fn test_replace_after_append() {
        let mut v = SessionValue::from("abc");
        v.append_converted(42);
        v.set_value(String::from("fresh"));
        assert_eq!(v.as_str(), "fresh");
    }

    #[test]
    fn test_conversions() {
        assert_eq!(SessionValue::from("a").into_string(), "a");
        assert_eq!(SessionValue::from(String::from("b")).to_string(), "b");
        assert!(SessionValue::default().is_empty());
    }
}
