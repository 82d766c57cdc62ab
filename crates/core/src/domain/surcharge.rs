use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Add-ons priced at a fixed dollar rate per unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CountedSurcharge {
    DoubleHung,
    Extensions,
    StainlessHinges,
    DeluxeValance,
    FrenchDoorCutouts,
    ExtensionPoles,
    SpecialtyShapes,
}

impl CountedSurcharge {
    pub const ALL: [Self; 7] = [
        Self::DoubleHung,
        Self::Extensions,
        Self::StainlessHinges,
        Self::DeluxeValance,
        Self::FrenchDoorCutouts,
        Self::ExtensionPoles,
        Self::SpecialtyShapes,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DoubleHung => "double_hung",
            Self::Extensions => "extensions",
            Self::StainlessHinges => "stainless_hinges",
            Self::DeluxeValance => "deluxe_valance",
            Self::FrenchDoorCutouts => "french_door_cutouts",
            Self::ExtensionPoles => "extension_poles",
            Self::SpecialtyShapes => "specialty_shapes",
        }
    }

    pub fn unit_rate(&self) -> Decimal {
        let dollars = match self {
            Self::DoubleHung => 60,
            Self::Extensions => 40,
            Self::StainlessHinges => 5,
            Self::DeluxeValance => 10,
            Self::FrenchDoorCutouts => 150,
            Self::ExtensionPoles => 55,
            Self::SpecialtyShapes => 15,
        };
        Decimal::from(dollars)
    }
}

/// Add-ons priced as a share of the base cost.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PercentSurcharge {
    CasingFrame,
    Clearview,
    HiddenTilt,
}

impl PercentSurcharge {
    pub const ALL: [Self; 3] = [Self::CasingFrame, Self::Clearview, Self::HiddenTilt];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CasingFrame => "casing_frame",
            Self::Clearview => "clearview",
            Self::HiddenTilt => "hidden_tilt",
        }
    }

    /// Fraction of base cost, e.g. `0.10` for ten percent.
    pub fn rate(&self) -> Decimal {
        match self {
            Self::CasingFrame | Self::Clearview => Decimal::new(10, 2),
            Self::HiddenTilt => Decimal::new(15, 2),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurchargeSelections {
    pub double_hung: u32,
    pub extensions: u32,
    pub stainless_hinges: u32,
    pub deluxe_valance: u32,
    pub french_door_cutouts: u32,
    pub extension_poles: u32,
    pub specialty_shapes: u32,
    pub casing_frame: bool,
    pub clearview: bool,
    pub hidden_tilt: bool,
}

impl SurchargeSelections {
    pub fn count(&self, surcharge: CountedSurcharge) -> u32 {
        match surcharge {
            CountedSurcharge::DoubleHung => self.double_hung,
            CountedSurcharge::Extensions => self.extensions,
            CountedSurcharge::StainlessHinges => self.stainless_hinges,
            CountedSurcharge::DeluxeValance => self.deluxe_valance,
            CountedSurcharge::FrenchDoorCutouts => self.french_door_cutouts,
            CountedSurcharge::ExtensionPoles => self.extension_poles,
            CountedSurcharge::SpecialtyShapes => self.specialty_shapes,
        }
    }

    pub fn set_count(&mut self, surcharge: CountedSurcharge, count: u32) {
        let slot = match surcharge {
            CountedSurcharge::DoubleHung => &mut self.double_hung,
            CountedSurcharge::Extensions => &mut self.extensions,
            CountedSurcharge::StainlessHinges => &mut self.stainless_hinges,
            CountedSurcharge::DeluxeValance => &mut self.deluxe_valance,
            CountedSurcharge::FrenchDoorCutouts => &mut self.french_door_cutouts,
            CountedSurcharge::ExtensionPoles => &mut self.extension_poles,
            CountedSurcharge::SpecialtyShapes => &mut self.specialty_shapes,
        };
        *slot = count;
    }

    pub fn is_selected(&self, surcharge: PercentSurcharge) -> bool {
        match surcharge {
            PercentSurcharge::CasingFrame => self.casing_frame,
            PercentSurcharge::Clearview => self.clearview,
            PercentSurcharge::HiddenTilt => self.hidden_tilt,
        }
    }

    pub fn set_selected(&mut self, surcharge: PercentSurcharge, selected: bool) {
        let slot = match surcharge {
            PercentSurcharge::CasingFrame => &mut self.casing_frame,
            PercentSurcharge::Clearview => &mut self.clearview,
            PercentSurcharge::HiddenTilt => &mut self.hidden_tilt,
        };
        *slot = selected;
    }
}
