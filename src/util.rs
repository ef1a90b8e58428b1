// SPDX-FileCopyrightText: 2023 Jonathan Haigh <jonathanhaigh@gmail.com>
//
// SPDX-License-Identifier: MIT

//! General utilities

/// Return early if an `OptResult<T>` expression is `Ok(None)` or `Err(_)`.
///
/// # Parameters
/// - `$x`: an `OptResult<T>` expression.
///
/// # Behaviour
/// - if `$x` is `Ok(Some(value))`, evaluates to the unwrapped `value`.
/// - if `$x` is `Ok(None)`, causes an early return of `Ok(None)`.
/// - if `$x` is `Err(e)`, causes an early return of `Err(e)`.
macro_rules! return_none_or_err {
    ($x:expr) => {
        match $x {
            Ok(Some(v)) => v,
            Ok(None) => return Ok(None),
            Err(e) => return Err(e),
        }
    };
}
pub(crate) use return_none_or_err;

/// Escape text for use as XML character data or as an attribute value.
pub fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Capitalize the first letter of a word and lowercase the rest.
///
/// E.g. `AND` becomes `And`.
pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
