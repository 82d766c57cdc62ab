//! In-progress quotation edited one typed change at a time.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::opening::{FrameStyle, MountType, Opening, OpeningType, OperatingSystem};
use crate::domain::surcharge::{CountedSurcharge, PercentSurcharge, SurchargeSelections};
use crate::errors::DomainError;
use crate::pricing::{PricingBreakdown, PricingEngine};
use crate::validation::validate_openings;

/// Stable handle for an opening within one draft. Ids are never reused, so
/// removing an opening does not shift the others.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DraftOpeningId(pub u32);

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum OpeningChange {
    Kind(OpeningType),
    Width(Decimal),
    Height(Decimal),
    Quantity(u32),
    MountType(MountType),
    FrameStyle(FrameStyle),
    OperatingSystem(OperatingSystem),
    BaseCost(Decimal),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurchargeChange {
    Count(CountedSurcharge, u32),
    Toggle(PercentSurcharge, bool),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DraftEdit {
    AddOpening,
    RemoveOpening(DraftOpeningId),
    Opening { id: DraftOpeningId, change: OpeningChange },
    Surcharge(SurchargeChange),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuotationDraft {
    openings: Vec<(DraftOpeningId, Opening)>,
    surcharges: SurchargeSelections,
    next_id: u32,
}

impl Default for QuotationDraft {
    fn default() -> Self {
        Self::new()
    }
}

impl QuotationDraft {
    /// A new draft starts with one default opening.
    pub fn new() -> Self {
        let mut draft =
            Self { openings: Vec::new(), surcharges: SurchargeSelections::default(), next_id: 0 };
        draft.add_opening();
        draft
    }

    fn add_opening(&mut self) -> DraftOpeningId {
        let id = DraftOpeningId(self.next_id);
        self.next_id += 1;
        self.openings.push((id, Opening::default()));
        id
    }

    fn opening_mut(&mut self, id: DraftOpeningId) -> Result<&mut Opening, DomainError> {
        self.openings
            .iter_mut()
            .find(|(candidate, _)| *candidate == id)
            .map(|(_, opening)| opening)
            .ok_or(DomainError::UnknownDraftOpening(id.0))
    }

    /// Applies one edit. `AddOpening` reports the new opening's id.
    pub fn apply(&mut self, edit: DraftEdit) -> Result<Option<DraftOpeningId>, DomainError> {
        match edit {
            DraftEdit::AddOpening => return Ok(Some(self.add_opening())),
            DraftEdit::RemoveOpening(id) => {
                let before = self.openings.len();
                self.openings.retain(|(candidate, _)| *candidate != id);
                if self.openings.len() == before {
                    return Err(DomainError::UnknownDraftOpening(id.0));
                }
            }
            DraftEdit::Opening { id, change } => {
                let opening = self.opening_mut(id)?;
                match change {
                    OpeningChange::Kind(kind) => opening.kind = kind,
                    OpeningChange::Width(width) => opening.width = width,
                    OpeningChange::Height(height) => opening.height = height,
                    OpeningChange::Quantity(quantity) => opening.quantity = quantity,
                    OpeningChange::MountType(mount_type) => opening.mount_type = mount_type,
                    OpeningChange::FrameStyle(frame_style) => opening.frame_style = frame_style,
                    OpeningChange::OperatingSystem(system) => opening.operating_system = system,
                    OpeningChange::BaseCost(base_cost) => opening.base_cost = base_cost,
                }
            }
            DraftEdit::Surcharge(SurchargeChange::Count(surcharge, count)) => {
                self.surcharges.set_count(surcharge, count);
            }
            DraftEdit::Surcharge(SurchargeChange::Toggle(surcharge, selected)) => {
                self.surcharges.set_selected(surcharge, selected);
            }
        }
        Ok(None)
    }

    pub fn opening_ids(&self) -> Vec<DraftOpeningId> {
        self.openings.iter().map(|(id, _)| *id).collect()
    }

    pub fn openings(&self) -> Vec<Opening> {
        self.openings.iter().map(|(_, opening)| opening.clone()).collect()
    }

    pub fn surcharges(&self) -> &SurchargeSelections {
        &self.surcharges
    }

    /// Prices the draft once every opening passes validation. A fresh draft
    /// fails here until its default opening is given a width and height.
    pub fn price(&self, engine: &dyn PricingEngine) -> Result<PricingBreakdown, DomainError> {
        let openings = self.openings();
        validate_openings(&openings)?;
        Ok(engine.price(&openings, &self.surcharges))
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::{DraftEdit, DraftOpeningId, OpeningChange, QuotationDraft, SurchargeChange};
    use crate::domain::opening::{FrameStyle, MountType, DEFAULT_BASE_COST};
    use crate::domain::surcharge::{CountedSurcharge, PercentSurcharge};
    use crate::errors::DomainError;
    use crate::pricing::DeterministicPricingEngine;

    fn set(draft: &mut QuotationDraft, id: DraftOpeningId, change: OpeningChange) {
        draft.apply(DraftEdit::Opening { id, change }).expect("edit applies");
    }

    #[test]
    fn new_draft_has_one_default_opening() {
        let draft = QuotationDraft::new();
        let openings = draft.openings();

        assert_eq!(openings.len(), 1);
        assert_eq!(openings[0].quantity, 1);
        assert_eq!(openings[0].base_cost, DEFAULT_BASE_COST);
        assert_eq!(openings[0].mount_type, MountType::Unspecified);
        assert_eq!(openings[0].frame_style, FrameStyle::Unspecified);
    }

    #[test]
    fn typed_edits_reprice_the_draft() {
        let mut draft = QuotationDraft::new();
        let first = draft.opening_ids()[0];
        set(&mut draft, first, OpeningChange::Width(Decimal::from(20)));
        set(&mut draft, first, OpeningChange::Height(Decimal::from(30)));
        set(&mut draft, first, OpeningChange::MountType(MountType::InsideMount));
        set(&mut draft, first, OpeningChange::FrameStyle(FrameStyle::TrimFrame));

        let second = draft.apply(DraftEdit::AddOpening).expect("add").expect("new id");
        set(&mut draft, second, OpeningChange::Width(Decimal::from(10)));
        set(&mut draft, second, OpeningChange::Height(Decimal::from(10)));
        set(&mut draft, second, OpeningChange::Quantity(2));
        let hidden_tilt = SurchargeChange::Toggle(PercentSurcharge::HiddenTilt, true);
        draft.apply(DraftEdit::Surcharge(hidden_tilt)).expect("toggle");
        draft
            .apply(DraftEdit::Surcharge(SurchargeChange::Count(CountedSurcharge::DoubleHung, 1)))
            .expect("count");

        let breakdown = draft.price(&DeterministicPricingEngine).expect("valid draft");
        // 176 + 2 * 132, then 60 + 15% surcharge and 3-unit freight.
        assert_eq!(breakdown.base, Decimal::from(440));
        assert_eq!(breakdown.surcharge, Decimal::from(126));
        assert_eq!(breakdown.freight, Decimal::from(125));
    }

    #[test]
    fn fresh_draft_is_not_priced_until_dimensions_are_set() {
        let draft = QuotationDraft::new();

        let Err(DomainError::Validation(violations)) = draft.price(&DeterministicPricingEngine)
        else {
            panic!("expected validation failure");
        };
        let fields: Vec<&str> = violations.iter().map(|v| v.field.as_str()).collect();
        assert_eq!(fields, vec!["openings[0].width", "openings[0].height"]);
    }

    #[test]
    fn oversized_draft_dimensions_are_rejected_before_pricing() {
        let mut draft = QuotationDraft::new();
        let first = draft.opening_ids()[0];
        let huge = Decimal::from(1_000_000_000_000_000u64);
        set(&mut draft, first, OpeningChange::Width(huge));
        set(&mut draft, first, OpeningChange::Height(huge));

        let Err(DomainError::Validation(violations)) = draft.price(&DeterministicPricingEngine)
        else {
            panic!("expected validation failure");
        };
        let fields: Vec<&str> = violations.iter().map(|v| v.field.as_str()).collect();
        assert_eq!(fields, vec!["openings[0].width", "openings[0].height"]);
    }

    #[test]
    fn removing_an_opening_keeps_other_ids_stable() {
        let mut draft = QuotationDraft::new();
        let first = draft.opening_ids()[0];
        let second = draft.apply(DraftEdit::AddOpening).expect("add").expect("id");
        let third = draft.apply(DraftEdit::AddOpening).expect("add").expect("id");

        draft.apply(DraftEdit::RemoveOpening(second)).expect("remove");
        assert_eq!(draft.opening_ids(), vec![first, third]);

        set(&mut draft, third, OpeningChange::BaseCost(Decimal::from(30)));
        assert_eq!(draft.openings()[1].base_cost, Decimal::from(30));
    }

    #[test]
    fn edits_to_unknown_openings_are_rejected() {
        let mut draft = QuotationDraft::new();

        assert_eq!(
            draft.apply(DraftEdit::RemoveOpening(DraftOpeningId(9))),
            Err(DomainError::UnknownDraftOpening(9))
        );
        assert_eq!(
            draft.apply(DraftEdit::Opening {
                id: DraftOpeningId(9),
                change: OpeningChange::Quantity(3),
            }),
            Err(DomainError::UnknownDraftOpening(9))
        );
    }

    #[test]
    fn edits_deserialize_from_tagged_json() {
        let edit: DraftEdit = serde_json::from_str(
            r#"{"opening":{"id":0,"change":{"field":"frame_style","value":"trim_frame"}}}"#,
        )
        .expect("edit json");

        assert_eq!(
            edit,
            DraftEdit::Opening {
                id: DraftOpeningId(0),
                change: OpeningChange::FrameStyle(FrameStyle::TrimFrame),
            }
        );
    }
}
