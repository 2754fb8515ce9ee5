//! Enumeration types for districts and voter blocs.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// BlocCategory
// ---------------------------------------------------------------------------

/// Socio-economic category of a voter bloc, used to target policy effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum BlocCategory {
    /// No specific category; general policy offsets apply to every bloc.
    #[default]
    General,
    /// Students and young learners.
    Students,
    /// Retired citizens.
    Retirees,
    /// Farmers and agrarian labour.
    Farmers,
    /// Business owners and managers.
    Business,
    /// Knowledge workers and technical professionals.
    Professionals,
    /// Industrial, service and trades workers.
    Workers,
}

/// Ordered keyword table for category inference. The first group with a
/// keyword contained in the lowercase bloc name wins.
pub const CATEGORY_KEYWORDS: [(&[&str], BlocCategory); 6] = [
    (&["student"], BlocCategory::Students),
    (&["retire"], BlocCategory::Retirees),
    (&["farm", "agrarian"], BlocCategory::Farmers),
    (&["manager", "business"], BlocCategory::Business),
    (&["knowledge", "professional", "tech"], BlocCategory::Professionals),
    (&["worker", "labour", "trades", "precariat"], BlocCategory::Workers),
];

impl BlocCategory {
    /// Every category in declaration order.
    pub const ALL: [Self; 7] = [
        Self::General,
        Self::Students,
        Self::Retirees,
        Self::Farmers,
        Self::Business,
        Self::Professionals,
        Self::Workers,
    ];

    /// Infer a category from a free-text bloc name.
    pub fn infer_from_name(name: &str) -> Self {
        let lowered = name.trim().to_lowercase();
        if lowered.is_empty() {
            return Self::General;
        }
        CATEGORY_KEYWORDS
            .iter()
            .find(|(keywords, _)| keywords.iter().any(|k| lowered.contains(k)))
            .map_or(Self::General, |(_, category)| *category)
    }

    /// Canonical name used as the suffix of per-category effect keys.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::General => "General",
            Self::Students => "Students",
            Self::Retirees => "Retirees",
            Self::Farmers => "Farmers",
            Self::Business => "Business",
            Self::Professionals => "Professionals",
            Self::Workers => "Workers",
        }
    }

    /// Parse a category token case-insensitively.
    pub fn parse(token: &str) -> Option<Self> {
        let token = token.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(token))
    }
}

// ---------------------------------------------------------------------------
// PopulationDensity
// ---------------------------------------------------------------------------

/// Population density tier of a district tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum PopulationDensity {
    /// Sparse countryside.
    Rural,
    /// Towns and mid-sized cities.
    #[default]
    Urban,
    /// Dense metropolitan core.
    Metro,
}

impl PopulationDensity {
    /// Fixed media access for tiles of this density.
    pub const fn media_access(self) -> f64 {
        match self {
            Self::Rural => 0.2,
            Self::Urban => 0.6,
            Self::Metro => 0.9,
        }
    }
}

// ---------------------------------------------------------------------------
// IndustryType
// ---------------------------------------------------------------------------

/// Dominant industry of a district tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum IndustryType {
    /// Farming and food production.
    Agriculture,
    /// Manufacturing, mining and heavy industry.
    HeavyIndustry,
    /// Retail, hospitality and public services.
    #[default]
    Services,
    /// Technology sector.
    Tech,
}
