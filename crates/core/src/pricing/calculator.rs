//! Shutter pricing arithmetic.
//!
//! Every function here is pure and total over structurally valid input; range
//! checks belong to [`crate::validation`]. Amounts are `Decimal` dollars, and
//! any figure that can pick up sub-cent digits is rounded to cents with
//! banker's rounding before it is summed.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::domain::opening::{FrameStyle, MountType, Opening};
use crate::domain::surcharge::{CountedSurcharge, PercentSurcharge, SurchargeSelections};
use crate::pricing::{OpeningLine, PricingBreakdown, SurchargeLine};

pub const MIN_WIDTH_INCHES: Decimal = Decimal::from_parts(24, 0, 0, false, 0);
pub const MIN_HEIGHT_INCHES: Decimal = Decimal::from_parts(36, 0, 0, false, 0);
/// Added to both dimensions of an inside-mounted trim frame.
pub const TRIM_FRAME_ALLOWANCE_INCHES: Decimal = Decimal::from_parts(2375, 0, 0, false, 3);
pub const SQUARE_INCHES_PER_SQUARE_FOOT: Decimal = Decimal::from_parts(144, 0, 0, false, 0);
/// Minimum fabrication charge, applied per opening.
pub const MIN_BILLABLE_SQUARE_FEET: Decimal = Decimal::from_parts(6, 0, 0, false, 0);
pub const FREIGHT_FIRST_UNIT: Decimal = Decimal::from_parts(75, 0, 0, false, 0);
pub const FREIGHT_ADDITIONAL_UNIT: Decimal = Decimal::from_parts(25, 0, 0, false, 0);

pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven)
}

fn frame_allowance(opening: &Opening) -> Decimal {
    match (opening.mount_type, opening.frame_style) {
        (MountType::InsideMount, FrameStyle::TrimFrame) => TRIM_FRAME_ALLOWANCE_INCHES,
        _ => Decimal::ZERO,
    }
}

/// Billable geometry and cost for a single opening.
pub fn price_opening(position: usize, opening: &Opening) -> OpeningLine {
    let allowance = frame_allowance(opening);
    let billed_width = (opening.width.max(MIN_WIDTH_INCHES) + allowance).ceil();
    let billed_height = (opening.height.max(MIN_HEIGHT_INCHES) + allowance).ceil();

    let square_feet = (billed_width * billed_height / SQUARE_INCHES_PER_SQUARE_FOOT).ceil();
    let billable_square_feet = square_feet.max(MIN_BILLABLE_SQUARE_FEET);
    let cost =
        round_money(billable_square_feet * opening.base_cost * Decimal::from(opening.quantity));

    OpeningLine {
        position,
        billed_width,
        billed_height,
        square_feet,
        billable_square_feet,
        quantity: opening.quantity,
        rate: opening.base_cost,
        cost,
    }
}

pub fn opening_cost(opening: &Opening) -> Decimal {
    price_opening(0, opening).cost
}

pub fn base_cost(openings: &[Opening]) -> Decimal {
    openings.iter().map(opening_cost).sum()
}

pub fn surcharge_lines(base: Decimal, selections: &SurchargeSelections) -> Vec<SurchargeLine> {
    let counted = CountedSurcharge::ALL.into_iter().filter_map(|surcharge| {
        let units = selections.count(surcharge);
        (units > 0).then(|| SurchargeLine {
            name: surcharge.as_str().to_string(),
            units: Some(units),
            rate: surcharge.unit_rate(),
            amount: surcharge.unit_rate() * Decimal::from(units),
        })
    });

    // Every percentage applies to the same base figure, so selections stack
    // additively instead of compounding.
    let percent = PercentSurcharge::ALL.into_iter().filter_map(|surcharge| {
        selections.is_selected(surcharge).then(|| SurchargeLine {
            name: surcharge.as_str().to_string(),
            units: None,
            rate: surcharge.rate(),
            amount: round_money(base * surcharge.rate()),
        })
    });

    counted.chain(percent).collect()
}

pub fn surcharge_cost(base: Decimal, selections: &SurchargeSelections) -> Decimal {
    surcharge_lines(base, selections).iter().map(|line| line.amount).sum()
}

pub fn total_units(openings: &[Opening]) -> u64 {
    openings.iter().map(|opening| u64::from(opening.quantity)).sum()
}

pub fn freight_cost(openings: &[Opening]) -> Decimal {
    match total_units(openings) {
        0 => Decimal::ZERO,
        units => FREIGHT_FIRST_UNIT + FREIGHT_ADDITIONAL_UNIT * Decimal::from(units - 1),
    }
}

pub fn compute_total(openings: &[Opening], selections: &SurchargeSelections) -> PricingBreakdown {
    let opening_lines: Vec<OpeningLine> = openings
        .iter()
        .enumerate()
        .map(|(position, opening)| price_opening(position, opening))
        .collect();
    let base: Decimal = opening_lines.iter().map(|line| line.cost).sum();

    let surcharge_lines = surcharge_lines(base, selections);
    let surcharge: Decimal = surcharge_lines.iter().map(|line| line.amount).sum();
    let freight = freight_cost(openings);

    PricingBreakdown {
        base,
        surcharge,
        freight,
        total: base + surcharge + freight,
        total_units: total_units(openings),
        opening_lines,
        surcharge_lines,
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::{
        base_cost, compute_total, freight_cost, opening_cost, price_opening, surcharge_cost,
    };
    use crate::domain::opening::{FrameStyle, MountType, Opening, OpeningType, OperatingSystem};
    use crate::domain::surcharge::SurchargeSelections;

    fn window(width: i64, height: i64, mount_type: MountType, frame_style: FrameStyle) -> Opening {
        Opening {
            kind: OpeningType::Window,
            width: Decimal::from(width),
            height: Decimal::from(height),
            quantity: 1,
            mount_type,
            frame_style,
            operating_system: OperatingSystem::TiltBar,
            base_cost: Decimal::from(22),
        }
    }

    fn with_quantity(mut opening: Opening, quantity: u32) -> Opening {
        opening.quantity = quantity;
        opening
    }

    #[test]
    fn inside_mounted_trim_frame_gets_allowance_before_rounding() {
        let line = price_opening(0, &window(20, 30, MountType::InsideMount, FrameStyle::TrimFrame));

        assert_eq!(line.billed_width, Decimal::from(27));
        assert_eq!(line.billed_height, Decimal::from(39));
        assert_eq!(line.square_feet, Decimal::from(8));
        assert_eq!(line.cost, Decimal::from(176));
    }

    #[test]
    fn small_opening_is_billed_at_minimum_area() {
        let cost = opening_cost(&window(10, 10, MountType::OutsideMount, FrameStyle::LFrame));

        assert_eq!(cost, Decimal::from(132));
    }

    #[test]
    fn allowance_requires_both_inside_mount_and_trim_frame() {
        let outside_trim =
            price_opening(0, &window(20, 30, MountType::OutsideMount, FrameStyle::TrimFrame));
        let inside_deluxe =
            price_opening(0, &window(20, 30, MountType::InsideMount, FrameStyle::DeluxeTrimFrame));

        assert_eq!(outside_trim.billed_width, Decimal::from(24));
        assert_eq!(outside_trim.billed_height, Decimal::from(36));
        assert_eq!(inside_deluxe.billed_width, Decimal::from(24));
        assert_eq!(inside_deluxe.cost, Decimal::from(132));
    }

    #[test]
    fn fractional_dimensions_round_up_and_quantity_multiplies() {
        let mut large = window(50, 60, MountType::InsideMount, FrameStyle::LFrame);
        large.width = Decimal::new(5025, 2);
        large.base_cost = Decimal::from(25);
        let line = price_opening(3, &with_quantity(large, 2));

        // 51 x 60 = 3060 sq in = 21.25 sq ft, billed as 22.
        assert_eq!(line.position, 3);
        assert_eq!(line.billed_width, Decimal::from(51));
        assert_eq!(line.billable_square_feet, Decimal::from(22));
        assert_eq!(line.cost, Decimal::from(1100));
    }

    #[test]
    fn sub_cent_rates_round_to_cents_per_line() {
        let mut odd_rate = window(10, 10, MountType::OutsideMount, FrameStyle::NoFrame);
        odd_rate.base_cost = Decimal::new(22_125, 3);

        assert_eq!(opening_cost(&odd_rate), Decimal::new(13275, 2));
        // 42 sq ft at 22.1234 = 929.1828
        odd_rate.base_cost = Decimal::new(221_234, 4);
        assert_eq!(opening_cost(&with_quantity(odd_rate, 7)), Decimal::new(92_918, 2));
    }

    #[test]
    fn freight_is_flat_first_unit_plus_linear_remainder() {
        let unit = window(30, 40, MountType::OutsideMount, FrameStyle::ZFrame);

        assert_eq!(freight_cost(&[]), Decimal::ZERO);
        assert_eq!(freight_cost(&[unit.clone()]), Decimal::from(75));
        assert_eq!(freight_cost(&[with_quantity(unit.clone(), 2), unit]), Decimal::from(125));
    }

    #[test]
    fn counted_surcharges_use_fixed_unit_rates() {
        let selections = SurchargeSelections {
            double_hung: 1,
            extensions: 2,
            stainless_hinges: 4,
            deluxe_valance: 3,
            french_door_cutouts: 1,
            extension_poles: 1,
            specialty_shapes: 2,
            ..SurchargeSelections::default()
        };

        // 60 + 80 + 20 + 30 + 150 + 55 + 30
        assert_eq!(surcharge_cost(Decimal::ZERO, &selections), Decimal::from(425));
    }

    #[test]
    fn percentage_surcharges_stack_against_the_same_base() {
        let selections = SurchargeSelections {
            casing_frame: true,
            clearview: true,
            hidden_tilt: true,
            ..SurchargeSelections::default()
        };

        assert_eq!(surcharge_cost(Decimal::from(1000), &selections), Decimal::from(350));
    }

    #[test]
    fn total_is_sum_of_base_surcharge_and_freight() {
        let openings = vec![
            window(20, 30, MountType::InsideMount, FrameStyle::TrimFrame),
            with_quantity(window(10, 10, MountType::OutsideMount, FrameStyle::LFrame), 2),
        ];
        let selections = SurchargeSelections {
            double_hung: 1,
            hidden_tilt: true,
            ..SurchargeSelections::default()
        };

        let breakdown = compute_total(&openings, &selections);

        assert_eq!(breakdown.base, Decimal::from(440));
        assert_eq!(base_cost(&openings), breakdown.base);
        // 60 + 15% of 440
        assert_eq!(breakdown.surcharge, Decimal::from(126));
        assert_eq!(breakdown.freight, Decimal::from(125));
        assert_eq!(breakdown.total, Decimal::from(691));
        assert_eq!(breakdown.total_units, 3);
        assert_eq!(breakdown.opening_lines.len(), 2);
        assert_eq!(breakdown.surcharge_lines.len(), 2);
        assert_eq!(breakdown.surcharge_lines[1].name, "hidden_tilt");
    }

    #[test]
    fn empty_quotation_still_charges_counted_surcharges() {
        let selections =
            SurchargeSelections { extension_poles: 1, clearview: true, ..Default::default() };
        let breakdown = compute_total(&[], &selections);

        assert_eq!(breakdown.base, Decimal::ZERO);
        assert_eq!(breakdown.freight, Decimal::ZERO);
        assert_eq!(breakdown.total, Decimal::from(55));
    }
}
