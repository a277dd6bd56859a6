//! Button layouts sent to the chat visitor.

use serde::Serialize;

/// A single keyboard button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Button<B> {
    /// Button id reported back when the visitor presses it
    pub id: B,
    /// Caption shown to the visitor
    pub text: String,
}

impl<B> Button<B> {
    /// Creates a button.
    pub fn new(id: B, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
        }
    }
}

/// An ordered set of button rows.
///
/// Serializes as an array of arrays of `{id, text}` objects. Built once
/// per handler with [`Keyboard::with_row`] and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Keyboard<B> {
    rows: Vec<Vec<Button<B>>>,
}

impl<B> Keyboard<B> {
    /// Creates a keyboard from rows. Empty rows are dropped.
    #[must_use]
    pub fn new(rows: Vec<Vec<Button<B>>>) -> Self {
        rows.into_iter()
            .fold(Self { rows: Vec::new() }, Self::with_row)
    }

    /// Appends a row. An empty row is ignored.
    #[must_use]
    pub fn with_row(mut self, row: Vec<Button<B>>) -> Self {
        if !row.is_empty() {
            self.rows.push(row);
        }
        self
    }

    /// Returns the rows in display order.
    #[must_use]
    pub fn rows(&self) -> &[Vec<Button<B>>] {
        &self.rows
    }
}
