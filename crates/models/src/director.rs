use crate::text::normalize_label;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, IntoStaticStr};

/// Kind of realization director, inferred from the French title
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, IntoStaticStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum DirectorType {
    Deputy,
    General,
    Regional,
    Central,
    Interim,
    Other,
}

impl DirectorType {
    // "adjoint" must be checked first: "Directeur général adjoint" is a deputy
    const RULES: [(Self, &'static [&'static str]); 5] = [
        (Self::Deputy, &["adjoint"]),
        (Self::General, &["general"]),
        (Self::Regional, &["region"]),
        (Self::Central, &["central"]),
        (Self::Interim, &["interim"]),
    ];

    pub fn classify(designation_fr: &str) -> Self {
        let label = normalize_label(designation_fr);

        Self::RULES
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|k| label.contains(k)))
            .map(|(kind, _)| *kind)
            .unwrap_or(Self::Other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_every_variant_is_reachable() {
        for variant in DirectorType::iter() {
            let keyword = DirectorType::RULES
                .iter()
                .find(|(v, _)| *v == variant)
                .map(|(_, keywords)| keywords[0])
                .unwrap_or("sans rapport");
            assert_eq!(DirectorType::classify(keyword), variant, "keyword: {keyword}");
        }
    }

    #[test]
    fn test_every_rule() {
        assert_eq!(
            DirectorType::classify("Directeur général adjoint"),
            DirectorType::Deputy
        );
        assert_eq!(DirectorType::classify("Directeur Général"), DirectorType::General);
        assert_eq!(
            DirectorType::classify("Direction régionale Est"),
            DirectorType::Regional
        );
        assert_eq!(
            DirectorType::classify("Direction centrale des achats"),
            DirectorType::Central
        );
        assert_eq!(DirectorType::classify("Directeur par intérim"), DirectorType::Interim);
        assert_eq!(DirectorType::classify("Chef de projet"), DirectorType::Other);
    }
}
