use crate::text::normalize_label;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, IntoStaticStr};

/// Ground on which a provider can be excluded from public procurement
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, IntoStaticStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ExclusionCategory {
    Fraud,
    Tax,
    Social,
    Judicial,
    Insolvency,
    Performance,
    Other,
}

impl ExclusionCategory {
    const RULES: [(Self, &'static [&'static str]); 6] = [
        (Self::Fraud, &["fraude", "corruption"]),
        (Self::Tax, &["fiscal", "impot"]),
        (Self::Social, &["social", "cotisation"]),
        (Self::Judicial, &["judiciaire", "condamn"]),
        (Self::Insolvency, &["faillite", "liquidation"]),
        (Self::Performance, &["defaillance", "inexecution", "retard"]),
    ];

    pub fn classify(designation_fr: &str) -> Self {
        let label = normalize_label(designation_fr);

        Self::RULES
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|k| label.contains(k)))
            .map(|(category, _)| *category)
            .unwrap_or(Self::Other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    fn check(label: &str, expected: ExclusionCategory) {
        assert_eq!(ExclusionCategory::classify(label), expected, "label: {label}");
    }

    #[test]
    fn test_every_variant_is_reachable() {
        for variant in ExclusionCategory::iter() {
            let keyword = ExclusionCategory::RULES
                .iter()
                .find(|(v, _)| *v == variant)
                .map(|(_, keywords)| keywords[0])
                .unwrap_or("sans rapport");
            assert_eq!(ExclusionCategory::classify(keyword), variant, "keyword: {keyword}");
        }
    }

    #[test]
    fn test_every_rule() {
        check("Fraude avérée", ExclusionCategory::Fraud);
        check("Actes de corruption", ExclusionCategory::Fraud);
        check("Situation fiscale irrégulière", ExclusionCategory::Tax);
        check("Impôts non payés", ExclusionCategory::Tax);
        check("Non affiliation sociale", ExclusionCategory::Social);
        check("Cotisations impayées", ExclusionCategory::Social);
        check("Casier judiciaire", ExclusionCategory::Judicial);
        check("Condamnation définitive", ExclusionCategory::Judicial);
        check("Faillite", ExclusionCategory::Insolvency);
        check("Liquidation judiciaire", ExclusionCategory::Judicial);
        check("Défaillance dans l'exécution", ExclusionCategory::Performance);
        check("Inexécution des obligations", ExclusionCategory::Performance);
        check("Retard de livraison", ExclusionCategory::Performance);
        check("Fausse déclaration", ExclusionCategory::Other);
    }
}
