use crate::text::normalize_label;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, IntoStaticStr};

/// Stage of the tender lifecycle a consultation phase belongs to
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, IntoStaticStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum PhaseType {
    Preparation,
    Publication,
    Opening,
    Evaluation,
    Award,
    Execution,
    Closure,
    Other,
}

impl PhaseType {
    /// Keywords matched against the normalized French designation, first match wins
    const RULES: [(Self, &'static [&'static str]); 7] = [
        (Self::Preparation, &["prepar"]),
        (Self::Publication, &["publi", "lancement"]),
        (Self::Opening, &["ouverture", "depouill"]),
        (Self::Evaluation, &["evaluat", "analyse"]),
        (Self::Award, &["attribu", "adjudic"]),
        (Self::Execution, &["execut", "realis"]),
        (Self::Closure, &["clotur", "achev"]),
    ];

    pub fn classify(designation_fr: &str) -> Self {
        let label = normalize_label(designation_fr);

        Self::RULES
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|k| label.contains(k)))
            .map(|(phase, _)| *phase)
            .unwrap_or(Self::Other)
    }
}
