//! User-facing messages shown on the offers page.

/// Shown when the address has fewer letters than required. `{min}` is
/// substituted with the threshold.
pub const ADDRESS_ERROR_LETTERS: &str = "Address needs to contain at least {min} letters.";
pub const ADDRESS_ERROR_NUMBER: &str = "Address must include a number.";
pub const ADDRESS_ERROR_SPACE: &str = "Address must include a space.";
pub const ADDRESS_NO_OFFERS: &str =
    "No offers were found for the provided address, please try a different one.";
/// For cases when the user can not do much to resolve the issue.
pub const FETCH_ERROR_GENERAL: &str = "Your request could not be processed. Please try again later.";
pub const FETCH_ERROR_ADDRESS_TOO_LONG: &str = "Provided address is too long, please try again.";
