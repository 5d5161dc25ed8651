use serde::Deserialize;
use validator::Validate;

use crate::forms::FormError;

/// Longest address accepted from the form before it is sent to the backend.
pub const MAX_ADDRESS_LENGTH: u64 = 256;

#[derive(Debug, Default, Deserialize, Validate)]
/// Address lookup form submitted with `GET /`.
pub struct AddressForm {
    /// Raw address as typed; absent on the plain landing page.
    #[validate(length(max = MAX_ADDRESS_LENGTH))]
    pub address: Option<String>,
    /// Offer card whose description should be shown expanded.
    pub expand: Option<usize>,
}

impl AddressForm {
    /// Checks the form bounds, returning the submitted address if any.
    pub fn submitted_address(&self) -> Result<Option<&str>, FormError> {
        self.validate()?;
        Ok(self.address.as_deref())
    }
}
