//! Tracked city list - ordered, no duplicates, grows only through `add`

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum AddCityError {
    #[error("Enter a city name")]
    Empty,
    #[error("{0} is already on the board")]
    Duplicate(String),
}

/// Ordered list of city identifiers.
///
/// Identifiers are compared exactly (case-sensitive, no normalization) after
/// trimming surrounding whitespace on the way in.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct CityList(Vec<String>);

impl CityList {
    /// Build a list from an initial set, dropping blank and repeated names
    pub fn new<I, S>(initial: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut list = Self::default();
        for city in initial {
            let _ = list.add(city.as_ref());
        }
        list
    }

    /// Append a city, returning the trimmed identifier that was stored.
    ///
    /// The list is left untouched when the name is blank or already tracked.
    pub fn add<'a>(&mut self, candidate: &'a str) -> Result<&'a str, AddCityError> {
        let city = candidate.trim();
        if city.is_empty() {
            return Err(AddCityError::Empty);
        }
        if self.contains(city) {
            return Err(AddCityError::Duplicate(city.to_string()));
        }
        self.0.push(city.to_string());
        Ok(city)
    }

    pub fn contains(&self, city: &str) -> bool {
        self.0.iter().any(|c| c == city)
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }

    pub fn position(&self, city: &str) -> Option<usize> {
        self.0.iter().position(|c| c == city)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
