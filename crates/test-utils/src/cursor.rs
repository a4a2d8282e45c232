// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Cursor markers in test documents
//!
//! Context tests write the cursor inline, e.g. `SELECT | FROM account`.

/// Character marking the cursor position
pub const CURSOR_MARKER: char = '|';

/// Byte offset of the cursor marker, if any
pub fn get_cursor_position(input: &str) -> Option<usize> {
    input.find(CURSOR_MARKER)
}

/// Input with the first cursor marker removed
pub fn remove_cursor_marker(input: &str) -> String {
    input.replacen(CURSOR_MARKER, "", 1)
}

/// Split a marked document into its text and the cursor offset
///
/// # Panics
///
/// Panics if `marked` has no cursor marker.
pub fn split_cursor(marked: &str) -> (String, usize) {
    let offset = get_cursor_position(marked)
        .unwrap_or_else(|| panic!("no cursor marker '{}' in {:?}", CURSOR_MARKER, marked));
    (remove_cursor_marker(marked), offset)
}
