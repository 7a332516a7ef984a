use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RatingTier {
    pub min: i64,
    pub class: &'static str,
    pub color: &'static str
}

/// Ordered from highest to lowest
pub const RATING_TIERS: [RatingTier; 14] = [
    RatingTier { min: 3000, class: "elo-3000-plus", color: "#8b0000" },
    RatingTier { min: 2700, class: "elo-2700-3000", color: "#ff0000" },
    RatingTier { min: 2500, class: "elo-2500-2700", color: "#ff7575" },
    RatingTier { min: 2300, class: "elo-2300-2500", color: "#ffaa00" },
    RatingTier { min: 2100, class: "elo-2100-2300", color: "#fbff00" },
    RatingTier { min: 1900, class: "elo-1900-2100", color: "#aa00aa" },
    RatingTier { min: 1750, class: "elo-1750-1900", color: "#7900fa" },
    RatingTier { min: 1600, class: "elo-1600-1750", color: "#55aaff" },
    RatingTier { min: 1500, class: "elo-1500-1600", color: "#15d0ff" },
    RatingTier { min: 1400, class: "elo-1400-1500", color: "#00aaaa" },
    RatingTier { min: 1200, class: "elo-1200-1400", color: "#00aa00" },
    RatingTier { min: 800, class: "elo-800-1200", color: "#aa5500" },
    RatingTier { min: 400, class: "elo-400-800", color: "#aaaaaa" },
    RatingTier { min: 0, class: "elo-0-400", color: "#ffffff" }
];

const TITLES: [(i64, &str); 9] = [
    (3000, "Legendary master"),
    (2700, "Grandmaster"),
    (2500, "International master"),
    (2300, "National master"),
    (2100, "Master"),
    (1900, "Candidate master"),
    (1600, "Expert"),
    (1400, "Specialist"),
    (1200, "Pupil")
];

/// Tier of a displayed rating. Non-finite and negative values fall into the lowest tier.
pub fn tier_for(elo: f64) -> &'static RatingTier {
    let lowest = &RATING_TIERS[RATING_TIERS.len() - 1];
    if !elo.is_finite() {
        return lowest;
    }

    RATING_TIERS.iter().find(|t| elo >= t.min as f64).unwrap_or(lowest)
}

pub fn title_for(elo: f64) -> &'static str {
    if !elo.is_finite() {
        return "Newbie";
    }

    TITLES
        .iter()
        .find(|(min, _)| elo >= *min as f64)
        .map(|(_, title)| *title)
        .unwrap_or("Newbie")
}
