use std::fs;
use std::path::Path;

use serde::Deserialize;
use shutterquote_core::domain::opening::Opening;
use shutterquote_core::domain::surcharge::SurchargeSelections;
use shutterquote_core::pricing::{DeterministicPricingEngine, PricingEngine};
use shutterquote_core::validation::validate_openings;

use crate::commands::CommandResult;

/// Offline input for `shutterquote price`: the same shape the pricing endpoint accepts.
#[derive(Debug, Deserialize)]
struct PriceInput {
    openings: Vec<Opening>,
    #[serde(default)]
    surcharges: SurchargeSelections,
}

pub fn run(path: &Path) -> CommandResult {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(error) => {
            return CommandResult::failure(
                "price",
                "input_read",
                format!("could not read `{}`: {error}", path.display()),
                2,
            );
        }
    };

    let input: PriceInput = match serde_json::from_str(&raw) {
        Ok(input) => input,
        Err(error) => {
            return CommandResult::failure(
                "price",
                "input_parse",
                format!("could not parse `{}`: {error}", path.display()),
                2,
            );
        }
    };

    if let Err(error) = validate_openings(&input.openings) {
        return CommandResult::failure("price", "validation", error.to_string(), 3);
    }

    let breakdown = DeterministicPricingEngine.price(&input.openings, &input.surcharges);
    let message = format!(
        "{} openings, {} units, total {}",
        breakdown.opening_lines.len(),
        breakdown.total_units,
        breakdown.total
    );

    match serde_json::to_value(&breakdown) {
        Ok(data) => CommandResult::success_with_data("price", message, data),
        Err(error) => CommandResult::failure("price", "serialization", error.to_string(), 6),
    }
}
