use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpeningType {
    #[default]
    Window,
    BypassDoor,
    BiFoldDoor,
    FrenchDoor,
    Other,
}

impl OpeningType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Window => "window",
            Self::BypassDoor => "bypass_door",
            Self::BiFoldDoor => "bi_fold_door",
            Self::FrenchDoor => "french_door",
            Self::Other => "other",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "window" => Some(Self::Window),
            "bypass_door" => Some(Self::BypassDoor),
            "bi_fold_door" => Some(Self::BiFoldDoor),
            "french_door" => Some(Self::FrenchDoor),
            "other" => Some(Self::Other),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MountType {
    InsideMount,
    OutsideMount,
    #[default]
    Unspecified,
}

impl MountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InsideMount => "inside_mount",
            Self::OutsideMount => "outside_mount",
            Self::Unspecified => "unspecified",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "inside_mount" => Some(Self::InsideMount),
            "outside_mount" => Some(Self::OutsideMount),
            "unspecified" => Some(Self::Unspecified),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameStyle {
    LFrame,
    ZFrame,
    BullnoseZFrame,
    TrimFrame,
    DeluxeTrimFrame,
    CasingFrame,
    SFrame,
    DoorFrame,
    NoFrame,
    #[default]
    Unspecified,
}

impl FrameStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LFrame => "l_frame",
            Self::ZFrame => "z_frame",
            Self::BullnoseZFrame => "bullnose_z_frame",
            Self::TrimFrame => "trim_frame",
            Self::DeluxeTrimFrame => "deluxe_trim_frame",
            Self::CasingFrame => "casing_frame",
            Self::SFrame => "s_frame",
            Self::DoorFrame => "door_frame",
            Self::NoFrame => "no_frame",
            Self::Unspecified => "unspecified",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "l_frame" => Some(Self::LFrame),
            "z_frame" => Some(Self::ZFrame),
            "bullnose_z_frame" => Some(Self::BullnoseZFrame),
            "trim_frame" => Some(Self::TrimFrame),
            "deluxe_trim_frame" => Some(Self::DeluxeTrimFrame),
            "casing_frame" => Some(Self::CasingFrame),
            "s_frame" => Some(Self::SFrame),
            "door_frame" => Some(Self::DoorFrame),
            "no_frame" => Some(Self::NoFrame),
            "unspecified" => Some(Self::Unspecified),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperatingSystem {
    #[default]
    TiltBar,
    ClearView,
    Gear,
}

impl OperatingSystem {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TiltBar => "tilt_bar",
            Self::ClearView => "clear_view",
            Self::Gear => "gear",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "tilt_bar" => Some(Self::TiltBar),
            "clear_view" => Some(Self::ClearView),
            "gear" => Some(Self::Gear),
            _ => None,
        }
    }
}

/// Dollars per square foot applied to a freshly added opening.
pub const DEFAULT_BASE_COST: Decimal = Decimal::from_parts(22, 0, 0, false, 0);

/// One physical window or door unit being quoted. Dimensions are inches.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Opening {
    #[serde(rename = "type", default)]
    pub kind: OpeningType,
    pub width: Decimal,
    pub height: Decimal,
    pub quantity: u32,
    #[serde(default)]
    pub mount_type: MountType,
    #[serde(default)]
    pub frame_style: FrameStyle,
    #[serde(default)]
    pub operating_system: OperatingSystem,
    pub base_cost: Decimal,
}

impl Default for Opening {
    fn default() -> Self {
        Self {
            kind: OpeningType::default(),
            width: Decimal::ZERO,
            height: Decimal::ZERO,
            quantity: 1,
            mount_type: MountType::default(),
            frame_style: FrameStyle::default(),
            operating_system: OperatingSystem::default(),
            base_cost: DEFAULT_BASE_COST,
        }
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::{FrameStyle, MountType, Opening, OpeningType, OperatingSystem};

    #[test]
    fn storage_names_parse_back_to_the_same_variant() {
        for kind in [
            OpeningType::Window,
            OpeningType::BypassDoor,
            OpeningType::BiFoldDoor,
            OpeningType::FrenchDoor,
            OpeningType::Other,
        ] {
            assert_eq!(OpeningType::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(FrameStyle::parse("Bullnose_Z_Frame"), Some(FrameStyle::BullnoseZFrame));
        assert_eq!(MountType::parse(" inside_mount "), Some(MountType::InsideMount));
        assert_eq!(OperatingSystem::parse("hidden"), None);
    }

    #[test]
    fn opening_deserializes_with_defaults_for_optional_selects() {
        let opening: Opening = serde_json::from_str(
            r#"{"type":"french_door","width":30.5,"height":"80","quantity":2,"base_cost":22}"#,
        )
        .expect("opening json");

        assert_eq!(opening.kind, OpeningType::FrenchDoor);
        assert_eq!(opening.width, Decimal::new(305, 1));
        assert_eq!(opening.height, Decimal::from(80));
        assert_eq!(opening.mount_type, MountType::Unspecified);
        assert_eq!(opening.frame_style, FrameStyle::Unspecified);
        assert_eq!(opening.operating_system, OperatingSystem::TiltBar);
    }

    #[test]
    fn new_openings_start_at_the_house_rate() {
        let opening = Opening::default();
        assert_eq!(opening.base_cost, Decimal::from(22));
        assert_eq!(opening.quantity, 1);
    }
}
