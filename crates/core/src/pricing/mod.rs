pub mod calculator;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::opening::Opening;
use crate::domain::surcharge::SurchargeSelections;
use crate::errors::DomainError;

/// Billable geometry and cost of one opening, in submission order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpeningLine {
    pub position: usize,
    pub billed_width: Decimal,
    pub billed_height: Decimal,
    /// Rounded-up area before the minimum charge is applied.
    pub square_feet: Decimal,
    pub billable_square_feet: Decimal,
    pub quantity: u32,
    pub rate: Decimal,
    pub cost: Decimal,
}

/// One selected surcharge. `units` is `None` for percentage surcharges, where
/// `rate` is the fraction of base cost.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurchargeLine {
    pub name: String,
    pub units: Option<u32>,
    pub rate: Decimal,
    pub amount: Decimal,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingBreakdown {
    pub base: Decimal,
    pub surcharge: Decimal,
    pub freight: Decimal,
    pub total: Decimal,
    pub total_units: u64,
    pub opening_lines: Vec<OpeningLine>,
    pub surcharge_lines: Vec<SurchargeLine>,
}

pub trait PricingEngine: Send + Sync {
    fn price(&self, openings: &[Opening], surcharges: &SurchargeSelections) -> PricingBreakdown;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct DeterministicPricingEngine;

impl PricingEngine for DeterministicPricingEngine {
    fn price(&self, openings: &[Opening], surcharges: &SurchargeSelections) -> PricingBreakdown {
        calculator::compute_total(openings, surcharges)
    }
}

/// Rejects a client-computed total that drifted from the server's figure by
/// more than `tolerance` dollars in either direction.
pub fn verify_submitted_total(
    breakdown: &PricingBreakdown,
    submitted: Decimal,
    tolerance: Decimal,
) -> Result<(), DomainError> {
    if (breakdown.total - submitted).abs() > tolerance {
        return Err(DomainError::StaleTotal { submitted, computed: breakdown.total });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::{
        verify_submitted_total, DeterministicPricingEngine, PricingBreakdown, PricingEngine,
    };
    use crate::domain::opening::{FrameStyle, MountType, Opening};
    use crate::domain::surcharge::SurchargeSelections;
    use crate::errors::DomainError;

    struct FlatRateEngine;

    impl PricingEngine for FlatRateEngine {
        fn price(&self, openings: &[Opening], _: &SurchargeSelections) -> PricingBreakdown {
            let total = Decimal::from(openings.len() as u64 * 100);
            PricingBreakdown {
                base: total,
                surcharge: Decimal::ZERO,
                freight: Decimal::ZERO,
                total,
                total_units: openings.len() as u64,
                opening_lines: Vec::new(),
                surcharge_lines: Vec::new(),
            }
        }
    }

    fn sample_opening() -> Opening {
        Opening {
            width: Decimal::from(20),
            height: Decimal::from(30),
            mount_type: MountType::InsideMount,
            frame_style: FrameStyle::TrimFrame,
            ..Opening::default()
        }
    }

    #[test]
    fn deterministic_engine_prices_single_trim_frame_window() {
        let breakdown =
            DeterministicPricingEngine.price(&[sample_opening()], &SurchargeSelections::default());

        assert_eq!(breakdown.base, Decimal::from(176));
        assert_eq!(breakdown.freight, Decimal::from(75));
        assert_eq!(breakdown.total, Decimal::from(251));
    }

    #[test]
    fn engine_can_be_swapped_behind_the_trait() {
        let engine: Box<dyn PricingEngine> = Box::new(FlatRateEngine);
        let openings = [sample_opening(), sample_opening()];
        let breakdown = engine.price(&openings, &SurchargeSelections::default());

        assert_eq!(breakdown.total, Decimal::from(200));
    }

    #[test]
    fn submitted_total_within_tolerance_is_accepted() {
        let breakdown =
            DeterministicPricingEngine.price(&[sample_opening()], &SurchargeSelections::default());
        let tolerance = Decimal::new(1, 2);

        assert!(verify_submitted_total(&breakdown, Decimal::new(25_101, 2), tolerance).is_ok());
        assert!(verify_submitted_total(&breakdown, Decimal::new(25_099, 2), tolerance).is_ok());
    }

    #[test]
    fn submitted_total_outside_tolerance_is_stale() {
        let breakdown =
            DeterministicPricingEngine.price(&[sample_opening()], &SurchargeSelections::default());

        let error = verify_submitted_total(&breakdown, Decimal::from(200), Decimal::new(1, 2))
            .expect_err("stale total must be rejected");

        assert_eq!(
            error,
            DomainError::StaleTotal { submitted: Decimal::from(200), computed: Decimal::from(251) }
        );
    }
}
