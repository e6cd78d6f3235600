//! Explicit fetched / not-fetched state for lazily loaded attributes.

use crate::{Error, Result};

/// An attribute that is populated by an explicit fetch.
///
/// Reading a [`Fetchable::NotFetched`] value through [`get`](Self::get)
/// fails with [`Error::NotFetched`] instead of looking like an empty value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Fetchable<T> {
    /// Never fetched.
    #[default]
    NotFetched,
    /// Fetched value.
    Fetched(T),
}

impl<T> Fetchable<T> {
    /// Borrow the value, or fail naming the attribute.
    pub fn get(&self, attribute: &'static str) -> Result<&T> {
        match self {
            Fetchable::Fetched(value) => Ok(value),
            Fetchable::NotFetched => Err(Error::NotFetched(attribute)),
        }
    }

    /// Store a fetched value, replacing any previous one.
    pub fn set(&mut self, value: T) {
        *self = Fetchable::Fetched(value);
    }

    /// Whether a value is present.
    pub fn is_fetched(&self) -> bool {
        matches!(self, Fetchable::Fetched(_))
    }

    /// The value, if fetched.
    pub fn as_option(&self) -> Option<&T> {
        match self {
            Fetchable::Fetched(value) => Some(value),
            Fetchable::NotFetched => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_fetched_errors() {
        let name: Fetchable<String> = Fetchable::default();
        assert!(!name.is_fetched());
        assert!(matches!(name.get("name"), Err(Error::NotFetched("name"))));
    }

    #[test]
    fn test_set_then_get() {
        let mut name = Fetchable::NotFetched;
        name.set("Builders".to_string());
        assert!(name.is_fetched());
        assert_eq!(name.get("name").unwrap(), "Builders");
        assert_eq!(name.as_option().map(String::as_str), Some("Builders"));
    }

    #[test]
    fn test_fetched_empty_is_not_an_error() {
        let members: Fetchable<Vec<u8>> = Fetchable::Fetched(Vec::new());
        assert!(members.get("members").unwrap().is_empty());
    }

    #[test]
    fn test_set_replaces_previous_value() {
        let mut name = Fetchable::Fetched("Old".to_string());
        name.set("New".to_string());
        assert_eq!(name, Fetchable::Fetched("New".to_string()));
    }
}
