use std::{fmt, str::FromStr};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::TrackerError;

/// Closed text-backed enumeration. The label is both the JSON value and the
/// column value stored by the `store` module.
macro_rules! labelled_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $label:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $label)] $variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = TrackerError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str() == s)
                    .ok_or_else(|| {
                        TrackerError::Malformed(format!("unknown {} `{}`", stringify!($name), s))
                    })
            }
        }
    };
}

labelled_enum!(FlowIntensity {
    Light => "light",
    Moderate => "moderate",
    Heavy => "heavy",
    Spotting => "spotting",
});

impl Default for FlowIntensity {
    fn default() -> Self {
        FlowIntensity::Moderate
    }
}

labelled_enum!(
    /// Declaration order is the order of the mood histogram.
    Mood {
        Great => "great",
        Good => "good",
        Okay => "okay",
        Bad => "bad",
        Terrible => "terrible",
    }
);

impl Default for Mood {
    fn default() -> Self {
        Mood::Okay
    }
}

labelled_enum!(Exercise {
    None => "none",
    Light => "light",
    Moderate => "moderate",
    Intense => "intense",
});

impl Default for Exercise {
    fn default() -> Self {
        Exercise::None
    }
}

labelled_enum!(SymptomName {
    // physical
    Cramps => "cramps",
    Bloating => "bloating",
    Headache => "headache",
    Fatigue => "fatigue",
    Acne => "acne",
    HairLoss => "hair_loss",
    WeightGain => "weight_gain",
    Nausea => "nausea",
    BackPain => "back_pain",
    BreastTenderness => "breast_tenderness",
    // emotional
    MoodSwings => "mood_swings",
    Anxiety => "anxiety",
    Depression => "depression",
    Irritability => "irritability",
    BrainFog => "brain_fog",
    // pcod specific
    IrregularPeriod => "irregular_period",
    HeavyBleeding => "heavy_bleeding",
    Spotting => "spotting",
    PelvicPain => "pelvic_pain",
    IncreasedHairGrowth => "increased_hair_growth",
    SleepIssues => "sleep_issues",
    FoodCravings => "food_cravings",
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CycleRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    /// Days since the start of the previous actual cycle.
    pub cycle_length: Option<u32>,
    /// Inclusive span of `start_date..=end_date`.
    pub period_length: Option<u32>,
    pub flow_intensity: FlowIntensity,
    pub notes: Option<String>,
    pub is_predicted: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymptomEntry {
    pub name: SymptomName,
    pub severity: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymptomLog {
    pub id: Uuid,
    pub user_id: Uuid,
    pub date: NaiveDate,
    pub symptoms: Vec<SymptomEntry>,
    pub mood: Option<Mood>,
    pub energy_level: Option<u8>,
    pub sleep_hours: Option<f64>,
    pub water_intake: u32,
    pub exercise: Exercise,
    pub notes: Option<String>,
}
