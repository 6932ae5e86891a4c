// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Emergency contacts and the in-memory contact registry.

use crate::ModelError;

/// Opaque contact identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct ContactId(String);

impl ContactId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ContactId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl std::fmt::Display for ContactId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A person to notify when an alert is dispatched.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct EmergencyContact {
    pub id: ContactId,
    pub name: String,
    pub phone_number: String,
    pub is_primary: bool,
    pub is_active: bool,
}

impl EmergencyContact {
    /// Creates an active, non-primary contact.
    pub fn new(
        id: impl Into<ContactId>,
        name: impl Into<String>,
        phone_number: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            phone_number: phone_number.into(),
            is_primary: false,
            is_active: true,
        }
    }

    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }

    pub fn primary(mut self) -> Self {
        self.is_primary = true;
        self
    }
}

impl From<String> for ContactId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// An ordered contact registry.
///
/// Invariant: at most one contact has `is_primary == true`. Adding or
/// promoting a primary contact demotes the previous one.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct ContactList {
    contacts: Vec<EmergencyContact>,
}

impl ContactList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a list from existing contacts, keeping only the last primary.
    pub fn from_contacts(contacts: impl IntoIterator<Item = EmergencyContact>) -> Result<Self, ModelError> {
        let mut list = Self::new();
        for c in contacts {
            list.add(c)?;
        }
        Ok(list)
    }

    /// Registers a contact. Ids must be unique.
    pub fn add(&mut self, contact: EmergencyContact) -> Result<(), ModelError> {
        if self.get(&contact.id).is_some() {
            return Err(ModelError::DuplicateContact(contact.id.to_string()));
        }
        if contact.is_primary {
            self.clear_primary();
        }
        self.contacts.push(contact);
        Ok(())
    }

    pub fn remove(&mut self, id: &ContactId) -> Result<EmergencyContact, ModelError> {
        let pos = self
            .contacts
            .iter()
            .position(|c| &c.id == id)
            .ok_or_else(|| ModelError::UnknownContact(id.to_string()))?;
        Ok(self.contacts.remove(pos))
    }

    /// Makes `id` the single primary contact.
    pub fn set_primary(&mut self, id: &ContactId) -> Result<(), ModelError> {
        if self.get(id).is_none() {
            return Err(ModelError::UnknownContact(id.to_string()));
        }
        for c in &mut self.contacts {
            c.is_primary = &c.id == id;
        }
        Ok(())
    }

    pub fn set_active(&mut self, id: &ContactId, active: bool) -> Result<(), ModelError> {
        let contact = self
            .contacts
            .iter_mut()
            .find(|c| &c.id == id)
            .ok_or_else(|| ModelError::UnknownContact(id.to_string()))?;
        contact.is_active = active;
        Ok(())
    }

    pub fn get(&self, id: &ContactId) -> Option<&EmergencyContact> {
        self.contacts.iter().find(|c| &c.id == id)
    }

    pub fn primary(&self) -> Option<&EmergencyContact> {
        self.contacts.iter().find(|c| c.is_primary)
    }

    /// Returns a copy of every registered contact, active or not.
    pub fn snapshot(&self) -> Vec<EmergencyContact> {
        self.contacts.clone()
    }

    /// Returns the active contacts, primary first.
    pub fn active(&self) -> Vec<EmergencyContact> {
        let mut active: Vec<_> = self.contacts.iter().filter(|c| c.is_active).cloned().collect();
        active.sort_by_key(|c| !c.is_primary);
        active
    }

    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }

    fn clear_primary(&mut self) {
        for c in &mut self.contacts {
            c.is_primary = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list() -> ContactList {
        ContactList::from_contacts([
            EmergencyContact::new("a", "Alice", "+100").primary(),
            EmergencyContact::new("b", "Bob", "+200"),
            EmergencyContact::new("c", "Carol", "+300").inactive(),
        ])
        .unwrap()
    }

    #[test]
    fn test_single_primary_on_add() {
        let mut l = list();
        l.add(EmergencyContact::new("d", "Dan", "+400").primary()).unwrap();
        let primaries: Vec<_> = l.snapshot().into_iter().filter(|c| c.is_primary).collect();
        assert_eq!(primaries.len(), 1);
        assert_eq!(primaries[0].id.as_str(), "d");
    }

    #[test]
    fn test_set_primary_demotes_previous() {
        let mut l = list();
        l.set_primary(&"b".into()).unwrap();
        assert_eq!(l.primary().unwrap().id.as_str(), "b");
        assert!(!l.get(&"a".into()).unwrap().is_primary);
    }

    #[test]
    fn test_active_excludes_inactive_primary_first() {
        let mut l = list();
        l.set_primary(&"b".into()).unwrap();
        let ids: Vec<_> = l.active().into_iter().map(|c| c.id.to_string()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn test_duplicate_rejected() {
        let mut l = list();
        let err = l.add(EmergencyContact::new("a", "Again", "+1")).unwrap_err();
        assert!(matches!(err, ModelError::DuplicateContact(_)));
    }

    #[test]
    fn test_unknown_contact() {
        let mut l = list();
        assert!(l.set_active(&"zz".into(), false).is_err());
        assert!(l.remove(&"zz".into()).is_err());
        l.remove(&"c".into()).unwrap();
        assert_eq!(l.len(), 2);
    }
}
