//! Client-side address validation.
//!
//! Checks run in a fixed priority order so that an address failing several
//! rules always reports the same, first failing rule.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::messages::{ADDRESS_ERROR_LETTERS, ADDRESS_ERROR_NUMBER, ADDRESS_ERROR_SPACE};

/// Minimum number of letters an address must contain.
pub const MIN_ADDRESS_LETTERS: usize = 5;

/// Characters of the Unicode `Letter` general category.
static LETTER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\p{L}").expect("letter pattern is valid"));

/// Reasons an address is rejected before any request is made.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AddressError {
    #[error("{}", letters_message(.min))]
    TooFewLetters { min: usize },
    #[error("{}", ADDRESS_ERROR_NUMBER)]
    MissingNumber,
    #[error("{}", ADDRESS_ERROR_SPACE)]
    MissingSpace,
}

fn letters_message(min: &usize) -> String {
    ADDRESS_ERROR_LETTERS.replace("{min}", &min.to_string())
}

/// Validates an address against the letter, number and space rules.
pub fn validate_address(address: &str) -> Result<(), AddressError> {
    // Actual letters, without digits, spaces, punctuation or letter-like symbols.
    let letters = LETTER.find_iter(address).count();
    if letters < MIN_ADDRESS_LETTERS {
        return Err(AddressError::TooFewLetters {
            min: MIN_ADDRESS_LETTERS,
        });
    }

    if !address.chars().any(|c| c.is_ascii_digit()) {
        return Err(AddressError::MissingNumber);
    }

    if !address.trim().chars().any(char::is_whitespace) {
        return Err(AddressError::MissingSpace);
    }

    Ok(())
}

/// Returns the user-facing error message, or an empty string for a valid address.
pub fn validation_message(address: &str) -> String {
    match validate_address(address) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}
