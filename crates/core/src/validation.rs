//! Input checks run before anything is priced or persisted.
//!
//! Violations are collected rather than returned on first failure so a caller
//! can correct every field in one round trip.

use rust_decimal::Decimal;

use crate::domain::customer::CustomerInfo;
use crate::domain::opening::Opening;
use crate::domain::quotation::SubmitRequest;
use crate::errors::{DomainError, FieldViolation};

/// Upper bound on either opening dimension, in inches.
pub const MAX_DIMENSION_INCHES: Decimal = Decimal::from_parts(10_000, 0, 0, false, 0);
/// Upper bound on the per-square-foot rate.
pub const MAX_BASE_COST: Decimal = Decimal::from_parts(100_000, 0, 0, false, 0);

fn check_measure(
    violations: &mut Vec<FieldViolation>,
    field: String,
    value: Decimal,
    max: Decimal,
) {
    if value <= Decimal::ZERO {
        violations.push(FieldViolation::new(field, "must be greater than zero"));
    } else if value > max {
        violations.push(FieldViolation::new(field, format!("must not exceed {max}")));
    }
}

pub fn opening_violations(index: usize, opening: &Opening) -> Vec<FieldViolation> {
    let mut violations = Vec::new();
    let path = |field: &str| format!("openings[{index}].{field}");

    check_measure(&mut violations, path("width"), opening.width, MAX_DIMENSION_INCHES);
    check_measure(&mut violations, path("height"), opening.height, MAX_DIMENSION_INCHES);
    check_measure(&mut violations, path("base_cost"), opening.base_cost, MAX_BASE_COST);
    if opening.quantity == 0 {
        violations.push(FieldViolation::new(path("quantity"), "must be at least 1"));
    }

    violations
}

fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    }
}

pub fn customer_violations(customer: &CustomerInfo) -> Vec<FieldViolation> {
    let mut violations = Vec::new();

    for (field, value) in [
        ("customer.first_name", &customer.first_name),
        ("customer.last_name", &customer.last_name),
        ("customer.email", &customer.email),
    ] {
        if value.trim().is_empty() {
            violations.push(FieldViolation::new(field, "is required"));
        }
    }

    if !customer.email.trim().is_empty() && !is_plausible_email(&customer.email) {
        violations.push(FieldViolation::new("customer.email", "is not a valid email address"));
    }

    violations
}

/// Checks openings for a price computation. An empty list is allowed.
pub fn validate_openings(openings: &[Opening]) -> Result<(), DomainError> {
    let violations: Vec<FieldViolation> = openings
        .iter()
        .enumerate()
        .flat_map(|(index, opening)| opening_violations(index, opening))
        .collect();

    if violations.is_empty() {
        Ok(())
    } else {
        Err(DomainError::Validation(violations))
    }
}

pub fn validate_submission(request: &SubmitRequest) -> Result<(), DomainError> {
    let mut violations = customer_violations(&request.customer);

    if request.openings.is_empty() {
        violations.push(FieldViolation::new("openings", "at least one opening is required"));
    }
    violations.extend(
        request
            .openings
            .iter()
            .enumerate()
            .flat_map(|(index, opening)| opening_violations(index, opening)),
    );
    if request.total_cost < Decimal::ZERO {
        violations.push(FieldViolation::new("total_cost", "must not be negative"));
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(DomainError::Validation(violations))
    }
}
