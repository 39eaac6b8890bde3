// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Kubernetes resource quantity parsing
//!
//! Accepts `<sign><number><suffix>` where the suffix is binary SI (`Ki`..`Ei`),
//! decimal SI (`n`, `u`, `m`, none, `k`, `M`..`E`) or an exponent (`e3`, `E-2`).

use crate::error::{PopulateError, Result};
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;

const BINARY_SI: [&str; 6] = ["Ki", "Mi", "Gi", "Ti", "Pi", "Ei"];
const DECIMAL_SI: [&str; 10] = ["n", "u", "m", "", "k", "M", "G", "T", "P", "E"];

/// Validate `input` as a quantity
pub fn parse_quantity(input: &str) -> Result<Quantity> {
    let invalid = |reason: &str| PopulateError::InvalidQuantity {
        quantity: input.to_string(),
        reason: reason.to_string(),
    };

    if input.is_empty() {
        return Err(invalid("quantity is empty"));
    }

    let unsigned = input.strip_prefix(['+', '-']).unwrap_or(input);
    let number_len = unsigned
        .find(|c: char| !c.is_ascii_digit() && c != '.')
        .unwrap_or(unsigned.len());
    let (number, suffix) = unsigned.split_at(number_len);

    if !is_number(number) {
        return Err(invalid("expected a decimal number"));
    }
    if !is_suffix(suffix) {
        return Err(invalid("unknown suffix"));
    }

    Ok(Quantity(input.to_string()))
}

/// Digits with at most one decimal point, and at least one digit
fn is_number(number: &str) -> bool {
    number.chars().filter(|c| *c == '.').count() <= 1 && number.chars().any(|c| c.is_ascii_digit())
}

fn is_suffix(suffix: &str) -> bool {
    if BINARY_SI.contains(&suffix) || DECIMAL_SI.contains(&suffix) {
        return true;
    }

    suffix
        .strip_prefix(['e', 'E'])
        .map(|exponent| exponent.strip_prefix(['+', '-']).unwrap_or(exponent))
        .is_some_and(|digits| !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_quantities() {
        for input in [
            "1Gi", "500Mi", "2", "0.5", ".5", "5.", "100m", "+1k", "-3Ki", "1e3", "1E-2", "2E", "1.5Ti",
        ] {
            assert_eq!(parse_quantity(input).unwrap(), Quantity(input.to_string()), "{}", input);
        }
    }

    #[test]
    fn test_parse_invalid_quantities() {
        for input in ["", "Gi", "1GB", "1.2.3Mi", "1 Gi", "e3", "1e", "1e+", "-", "1gi", "."] {
            assert!(
                matches!(parse_quantity(input), Err(PopulateError::InvalidQuantity { .. })),
                "expected {:?} to be rejected",
                input
            );
        }
    }
}
