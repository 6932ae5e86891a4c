// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for the safety data model.

/// Errors raised when a model value violates its invariants.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ModelError {
    /// A monitoring setting is outside its permitted range.
    #[error("invalid setting '{field}': {detail}")]
    InvalidSettings { field: &'static str, detail: String },

    /// A contact id was not found in the registry.
    #[error("unknown contact: {0}")]
    UnknownContact(String),

    /// A contact with the same id is already registered.
    #[error("duplicate contact id: {0}")]
    DuplicateContact(String),
}
