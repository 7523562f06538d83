use serde::{Deserialize, Serialize};
use tracing::warn;

/// Severity levels in ascending order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SeverityLevel {
    #[serde(rename = "Licht")]
    Mild,
    #[serde(rename = "Matig")]
    Moderate,
    #[serde(rename = "Ernstig")]
    Severe,
    #[serde(rename = "Zeer ernstig")]
    VerySevere,
}

impl SeverityLevel {
    pub const fn label(self) -> &'static str {
        match self {
            SeverityLevel::Mild => "Licht",
            SeverityLevel::Moderate => "Matig",
            SeverityLevel::Severe => "Ernstig",
            SeverityLevel::VerySevere => "Zeer ernstig",
        }
    }
}

/// Named severity band with an inclusive score range and advice text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassificationTier {
    pub level: SeverityLevel,
    pub min: u32,
    pub max: u32,
    pub description: &'static str,
    pub urgency: &'static str,
}

impl ClassificationTier {
    pub fn contains(&self, score: u32) -> bool {
        self.min <= score && score <= self.max
    }
}

/// Return the first tier whose range contains `score`.
///
/// A score no tier covers falls back to the least severe tier. That only happens
/// when the tier table is misconfigured, so the fallback is logged. Returns
/// `None` only for an empty slice.
pub fn classify(score: u32, tiers: &[ClassificationTier]) -> Option<&ClassificationTier> {
    if let Some(tier) = tiers.iter().find(|tier| tier.contains(score)) {
        return Some(tier);
    }

    let fallback = tiers.iter().min_by_key(|tier| tier.level)?;
    warn!(
        score,
        fallback = fallback.level.label(),
        "score outside configured tier ranges"
    );
    Some(fallback)
}

/// Tier list checked to partition `[0, max_score]` in ascending order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TierTable {
    tiers: Vec<ClassificationTier>,
}

impl TierTable {
    pub fn new(tiers: Vec<ClassificationTier>, max_score: u32) -> Result<Self, TierTableError> {
        let first = tiers.first().ok_or(TierTableError::Empty)?;
        if first.min != 0 {
            return Err(TierTableError::DoesNotStartAtZero { min: first.min });
        }

        for tier in &tiers {
            if tier.min > tier.max {
                return Err(TierTableError::InvertedRange { level: tier.level });
            }
        }

        for pair in tiers.windows(2) {
            let (lower, upper) = (&pair[0], &pair[1]);
            if lower.max.checked_add(1) != Some(upper.min) {
                return Err(TierTableError::NotContiguous {
                    lower: lower.level,
                    upper: upper.level,
                });
            }
        }

        let last_max = tiers.last().map(|tier| tier.max).unwrap_or(0);
        if last_max != max_score {
            return Err(TierTableError::CoverageMismatch {
                covered: last_max,
                max_score,
            });
        }

        Ok(Self { tiers })
    }

    /// Four-band table for the standard catalog (maximum 70).
    pub fn standard() -> Self {
        Self {
            tiers: standard_tiers(),
        }
    }

    pub fn tiers(&self) -> &[ClassificationTier] {
        &self.tiers
    }

    pub fn classify(&self, score: u32) -> &ClassificationTier {
        classify(score, &self.tiers).unwrap_or(&self.tiers[0])
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TierTableError {
    #[error("tier table must contain at least one tier")]
    Empty,
    #[error("lowest tier starts at {min} instead of 0")]
    DoesNotStartAtZero { min: u32 },
    #[error("tier {level:?} has min above max")]
    InvertedRange { level: SeverityLevel },
    #[error("tiers {lower:?} and {upper:?} leave a gap or overlap")]
    NotContiguous {
        lower: SeverityLevel,
        upper: SeverityLevel,
    },
    #[error("tiers cover up to {covered} but the catalog maximum is {max_score}")]
    CoverageMismatch { covered: u32, max_score: u32 },
}

pub fn standard_tiers() -> Vec<ClassificationTier> {
    vec![
        ClassificationTier {
            level: SeverityLevel::Mild,
            min: 0,
            max: 20,
            description: "Uw score duidt op een lichte mate van beperking. De pijn is aanwezig maar heeft een minimale impact op uw dagelijks leven.",
            urgency: "U hoeft zich geen zorgen te maken, maar laat een fysiotherapeut meekijken als dit aanhoudt.",
        },
        ClassificationTier {
            level: SeverityLevel::Moderate,
            min: 21,
            max: 40,
            description: "Uw score geeft aan dat de nekpijn een matige impact heeft. Bepaalde activiteiten kunnen al lastig zijn.",
            urgency: "Plan deze week nog een intake om verergering te voorkomen.",
        },
        ClassificationTier {
            level: SeverityLevel::Severe,
            min: 41,
            max: 60,
            description: "Uw score wijst op een ernstige beperking. De pijn heeft waarschijnlijk een aanzienlijke invloed op uw functioneren.",
            urgency: "Wacht niet langer, een persoonlijk behandelplan kan snel verlichting geven.",
        },
        ClassificationTier {
            level: SeverityLevel::VerySevere,
            min: 61,
            max: 70,
            description: "Uw score is zeer hoog, wat duidt op een zeer ernstige beperking. Uw dagelijks leven wordt waarschijnlijk sterk beïnvloed door de pijn.",
            urgency: "Neem binnen enkele dagen contact op met onze manueel therapeut.",
        },
    ]
}
