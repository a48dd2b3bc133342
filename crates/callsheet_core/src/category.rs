//! The fixed production-element taxonomy.

use serde::{Deserialize, Serialize};

/// Families grouping the 21 breakdown categories.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CategoryFamily {
    /// On-screen people: principal cast, extras, stunt performers, crew roles
    People,
    /// Items handled or worn by performers
    HandheldItems,
    /// The physical world of the scene: set, vehicles, locations
    SetAndEnvironment,
    /// Effects work and production services
    EffectsAndServices,
}

/// One of the 21 fixed breakdown categories.
///
/// The set follows the standard breakdown-sheet layout used by production
/// software; identifiers are stable wire names and the declaration order is
/// the canonical tie-break order for sheet sorting.
///
/// # Examples
///
/// ```
/// use callsheet_core::{Category, CategoryFamily};
/// use std::str::FromStr;
///
/// assert_eq!(Category::Props.family(), CategoryFamily::HandheldItems);
/// assert_eq!(Category::Props.to_string(), "props");
/// assert_eq!(Category::from_str("set_dressing").unwrap(), Category::SetDressing);
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumIter,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Category {
    /// Principal speaking cast
    Cast,
    /// Background performers
    Extras,
    /// Stunt performers and stunt coordination
    Stunts,
    /// On-set security personnel
    Security,
    /// Additional crew labor
    AdditionalLabor,
    /// Hand props
    Props,
    /// Costumes
    Wardrobe,
    /// Makeup and hair
    Makeup,
    /// Food and drink prepared for camera
    FoodStyling,
    /// Set dressing
    SetDressing,
    /// Plants and greenery
    Greenery,
    /// Picture vehicles
    Vehicles,
    /// Animals and wrangling
    Animals,
    /// Shooting locations
    Location,
    /// Special rigs and equipment
    SpecialEquipment,
    /// Practical special effects
    SpecialEffects,
    /// Post-production visual effects flagged at breakdown time
    VisualEffects,
    /// Mechanical effects (rain, wind, fire bars)
    MechanicalEffects,
    /// Production sound requirements
    Sound,
    /// Source music and playback
    Music,
    /// Camera and lighting notes
    CameraLighting,
}

impl Category {
    /// The family this category belongs to.
    pub fn family(&self) -> CategoryFamily {
        match self {
            Category::Cast
            | Category::Extras
            | Category::Stunts
            | Category::Security
            | Category::AdditionalLabor => CategoryFamily::People,
            Category::Props | Category::Wardrobe | Category::Makeup | Category::FoodStyling => {
                CategoryFamily::HandheldItems
            }
            Category::SetDressing
            | Category::Greenery
            | Category::Vehicles
            | Category::Animals
            | Category::Location
            | Category::SpecialEquipment => CategoryFamily::SetAndEnvironment,
            Category::SpecialEffects
            | Category::VisualEffects
            | Category::MechanicalEffects
            | Category::Sound
            | Category::Music
            | Category::CameraLighting => CategoryFamily::EffectsAndServices,
        }
    }

    /// Arabic display name used in element descriptions and sheet headers.
    ///
    /// The source material is Arabic-language screenplays; display names
    /// follow the conventions of the breakdown sheets the reports feed.
    pub fn display_name(&self) -> &'static str {
        match self {
            Category::Cast => "طاقم التمثيل",
            Category::Extras => "مجاميع",
            Category::Stunts => "مشاهد خطرة",
            Category::Security => "أمن الموقع",
            Category::AdditionalLabor => "عمالة إضافية",
            Category::Props => "دعائم",
            Category::Wardrobe => "أزياء",
            Category::Makeup => "مكياج وشعر",
            Category::FoodStyling => "طعام ومشروبات",
            Category::SetDressing => "تأثيث الموقع",
            Category::Greenery => "نباتات",
            Category::Vehicles => "مركبات",
            Category::Animals => "حيوانات",
            Category::Location => "موقع التصوير",
            Category::SpecialEquipment => "معدات خاصة",
            Category::SpecialEffects => "مؤثرات خاصة",
            Category::VisualEffects => "مؤثرات بصرية",
            Category::MechanicalEffects => "مؤثرات ميكانيكية",
            Category::Sound => "صوت",
            Category::Music => "موسيقى",
            Category::CameraLighting => "كاميرا وإضاءة",
        }
    }
}
