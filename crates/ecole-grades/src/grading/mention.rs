use serde::Serialize;

/// Appreciation printed next to an average on a report card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Mention {
    pub label: &'static str,
    pub emoji: &'static str,
    pub observation: &'static str,
    pub recommendation: &'static str,
}

/// Tiers keyed by inclusive lower bound, highest first.
const MENTION_TIERS: [(f64, Mention); 6] = [
    (
        18.0,
        Mention {
            label: "Excellent",
            emoji: "🏆",
            observation: "Travail remarquable, résultats excellents dans l'ensemble.",
            recommendation: "Maintenir cet excellent niveau et viser l'approfondissement.",
        },
    ),
    (
        16.0,
        Mention {
            label: "Très Bien",
            emoji: "🌟",
            observation: "Très bon travail, élève sérieux et appliqué.",
            recommendation: "Continuer sur cette lancée avec la même rigueur.",
        },
    ),
    (
        14.0,
        Mention {
            label: "Bien",
            emoji: "👍",
            observation: "Bon travail, les acquis sont solides.",
            recommendation: "Persévérer pour atteindre un niveau encore supérieur.",
        },
    ),
    (
        12.0,
        Mention {
            label: "Assez Bien",
            emoji: "🙂",
            observation: "Travail satisfaisant avec quelques points à consolider.",
            recommendation: "Renforcer le travail personnel dans les matières plus faibles.",
        },
    ),
    (
        10.0,
        Mention {
            label: "Passable",
            emoji: "😐",
            observation: "Résultats justes, le niveau minimum est atteint.",
            recommendation: "Fournir plus d'efforts et de régularité dans le travail.",
        },
    ),
    (
        8.0,
        Mention {
            label: "Insuffisant",
            emoji: "⚠️",
            observation: "Résultats insuffisants, des lacunes importantes subsistent.",
            recommendation: "Mettre en place un suivi régulier et revoir les bases.",
        },
    ),
];

const LOWEST_TIER: Mention = Mention {
    label: "Très Insuffisant",
    emoji: "🚨",
    observation: "Résultats très insuffisants, l'élève est en grande difficulté.",
    recommendation: "Un accompagnement soutenu et un entretien avec la famille s'imposent.",
};

/// Every input maps to exactly one tier; NaN lands in the lowest one.
pub fn classify_mention(average: f64) -> Mention {
    MENTION_TIERS
        .iter()
        .find(|(floor, _)| average >= *floor)
        .map(|(_, mention)| *mention)
        .unwrap_or(LOWEST_TIER)
}

/// Every mention, best first.
pub fn mention_scale() -> Vec<(Option<f64>, Mention)> {
    MENTION_TIERS
        .iter()
        .map(|(floor, mention)| (Some(*floor), *mention))
        .chain(std::iter::once((None, LOWEST_TIER)))
        .collect()
}
