use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Lowest score a vote or review sub-rating may carry.
pub const MIN_SCORE: i16 = 0;

/// Highest score a vote or review sub-rating may carry.
pub const MAX_SCORE: i16 = 10;

/// Score a dimension holds while nothing contributes to it: the midpoint of the 0–10 scale.
pub const NEUTRAL_SCORE: Decimal = Decimal::from_parts(50, 0, 0, false, 1);

/// One independently scored facet of a company.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
    sqlx::Type,
)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "score_dimension", rename_all = "snake_case")]
pub enum Dimension {
    Ethics,
    Credibility,
    Delivery,
    Security,
    Innovation,
}

impl Dimension {
    pub const ALL: [Dimension; 5] = [
        Dimension::Ethics,
        Dimension::Credibility,
        Dimension::Delivery,
        Dimension::Security,
        Dimension::Innovation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ethics => "ethics",
            Self::Credibility => "credibility",
            Self::Delivery => "delivery",
            Self::Security => "security",
            Self::Innovation => "innovation",
        }
    }

    /// Position of the dimension in [`Dimension::ALL`].
    pub fn index(&self) -> usize {
        match self {
            Self::Ethics => 0,
            Self::Credibility => 1,
            Self::Delivery => 2,
            Self::Security => 3,
            Self::Innovation => 4,
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dimension {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ethics" => Ok(Self::Ethics),
            "credibility" => Ok(Self::Credibility),
            "delivery" => Ok(Self::Delivery),
            "security" => Ok(Self::Security),
            "innovation" => Ok(Self::Innovation),
            other => Err(format!("unknown score dimension '{other}'")),
        }
    }
}
