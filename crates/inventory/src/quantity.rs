use core::num::NonZeroU32;

use serde::{Deserialize, Serialize};

use stockflow_core::{DomainError, DomainResult, ValueObject};

/// Quantity held by a stock lot. Always strictly positive.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Quantity(NonZeroU32);

impl ValueObject for Quantity {}

impl Quantity {
    /// Returns `None` for zero.
    pub fn new(value: u32) -> Option<Self> {
        NonZeroU32::new(value).map(Self)
    }

    pub fn get(self) -> u32 {
        self.0.get()
    }

    /// Take `amount` out of this quantity.
    ///
    /// Returns the remainder, or `None` when `amount` drains it completely.
    /// Taking more than is held is a validation error.
    pub fn split(self, amount: Quantity) -> DomainResult<Option<Quantity>> {
        if amount > self {
            return Err(DomainError::validation(format!(
                "cannot take {amount} from {self} available"
            )));
        }
        Ok(Quantity::new(self.get() - amount.get()))
    }
}

impl TryFrom<u32> for Quantity {
    type Error = DomainError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Quantity::new(value).ok_or_else(|| DomainError::invariant("quantity must be positive"))
    }
}

impl From<Quantity> for u32 {
    fn from(value: Quantity) -> Self {
        value.get()
    }
}

impl core::fmt::Display for Quantity {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}
