//! Parsing of raw user input (form fields, prompts).

use stockflow_core::{DomainError, DomainResult};

use crate::quantity::Quantity;

/// Parse a quantity field.
///
/// Accepts a whole number greater than zero, surrounded by optional
/// whitespace. Everything else (empty, fractional, negative, zero, overflow)
/// is a validation error.
pub fn parse_quantity(input: &str) -> DomainResult<Quantity> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(DomainError::validation("quantity is required"));
    }

    let value: u32 = trimmed
        .parse()
        .map_err(|_| DomainError::validation(format!("'{trimmed}' is not a whole number")))?;

    Quantity::new(value).ok_or_else(|| DomainError::validation("quantity must be greater than zero"))
}

/// Parse an item name field. Returns the trimmed name.
pub fn parse_name(input: &str) -> DomainResult<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(DomainError::validation("name cannot be empty"));
    }
    Ok(trimmed.to_string())
}
