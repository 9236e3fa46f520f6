//! Families and the supporting record types.

use crate::model::{Handle, new_handle};

/// A family unit (`FAM` record).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Family {
    pub handle: Handle,
    pub id: String,
    pub father: Option<Handle>,
    pub mother: Option<Handle>,
    /// Children in birth/file order.
    pub children: Vec<Handle>,
}

impl Family {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            handle: new_handle(),
            id: id.into(),
            father: None,
            mother: None,
            children: Vec::new(),
        }
    }

    /// Returns true if `person` is the father or mother of this family.
    pub fn is_parent(&self, person: &Handle) -> bool {
        self.father.as_ref() == Some(person) || self.mother.as_ref() == Some(person)
    }
}

/// A source of genealogical evidence (`SOUR` record).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Source {
    pub handle: Handle,
    pub id: String,
    pub title: String,
    pub author: String,
    pub publication: String,
    /// Repositories holding this source.
    pub repositories: Vec<Handle>,
}

impl Source {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            handle: new_handle(),
            id: id.into(),
            title: String::new(),
            author: String::new(),
            publication: String::new(),
            repositories: Vec::new(),
        }
    }
}

/// An archive or library (`REPO` record).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Repository {
    pub handle: Handle,
    pub id: String,
    pub name: String,
}

impl Repository {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            handle: new_handle(),
            id: id.into(),
            name: String::new(),
        }
    }
}

/// A note record (`NOTE`; 7.0 may also use the shared-note `SNOTE`).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Note {
    pub handle: Handle,
    pub id: String,
    /// Note body; may contain embedded newlines.
    pub text: String,
}

impl Note {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            handle: new_handle(),
            id: id.into(),
            text: String::new(),
        }
    }
}

/// A multimedia object (`OBJE` record).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Media {
    pub handle: Handle,
    pub id: String,
    pub path: String,
    pub description: String,
}

impl Media {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            handle: new_handle(),
            id: id.into(),
            path: String::new(),
            description: String::new(),
        }
    }
}
