//! Person entity and its sub-records.

use crate::model::{Handle, new_handle};

/// Recorded sex of a person.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Gender {
    Female,
    Male,
    #[default]
    Unknown,
}

/// One part of a (possibly compound) surname.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Surname {
    pub surname: String,
}

impl Surname {
    pub fn new(surname: impl Into<String>) -> Self {
        Self { surname: surname.into() }
    }
}

/// The name a person is primarily known by.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PrimaryName {
    /// Given name(s), space separated.
    pub given: String,
    /// Ordered surname parts; empty when the name has no surname.
    pub surnames: Vec<Surname>,
    /// The name the person is called by; usually the first given name.
    pub call: String,
    /// Generational or honorific suffix such as `Jr.`.
    pub suffix: String,
}

impl PrimaryName {
    /// Creates a name with the call name defaulted to the first given name.
    pub fn new(given: impl Into<String>, surname: impl Into<String>) -> Self {
        let given = given.into();
        let surname = surname.into();
        let surnames = if surname.trim().is_empty() {
            Vec::new()
        } else {
            vec![Surname::new(surname)]
        };
        Self {
            call: default_call_name(&given),
            given,
            surnames,
            suffix: String::new(),
        }
    }

    /// Sets the suffix.
    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    /// All surname parts joined with a single space.
    pub fn surname_text(&self) -> String {
        self.surnames
            .iter()
            .map(|s| s.surname.as_str())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Returns true if no part of the name carries text.
    pub fn is_empty(&self) -> bool {
        self.given.is_empty() && self.suffix.is_empty() && self.surname_text().is_empty()
    }
}

/// First space-delimited token of a given name.
pub fn default_call_name(given: &str) -> String {
    given.split_whitespace().next().unwrap_or("").to_string()
}

/// A dated, placed life event (birth or death).
///
/// Dates are opaque strings; no date grammar is interpreted here.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Event {
    pub date: Option<String>,
    pub place: Option<String>,
}

impl Event {
    /// Blank dates and places are stored as `None`.
    pub fn new(date: Option<&str>, place: Option<&str>) -> Self {
        let present = |v: &&str| !v.trim().is_empty();
        Self {
            date: date.filter(present).map(str::to_string),
            place: place.filter(present).map(str::to_string),
        }
    }

    /// Returns true if neither date nor place carries text.
    pub fn is_empty(&self) -> bool {
        self.date.as_deref().is_none_or(str::is_empty)
            && self.place.as_deref().is_none_or(str::is_empty)
    }
}

/// An individual (`INDI` record).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Person {
    pub handle: Handle,
    /// Human-facing sequential id such as `I0001`.
    pub id: String,
    pub gender: Gender,
    pub name: PrimaryName,
    pub birth: Event,
    pub death: Event,
    /// Families this person belongs to, as child or as spouse, in file order.
    pub families: Vec<Handle>,
}

impl Person {
    /// Creates an unnamed person with a fresh handle.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            handle: new_handle(),
            id: id.into(),
            gender: Gender::Unknown,
            name: PrimaryName::default(),
            birth: Event::default(),
            death: Event::default(),
            families: Vec::new(),
        }
    }
}
