use crate::text::normalize_label;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, IntoStaticStr};

/// Procurement procedure family derived from an award method's French labels
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, IntoStaticStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum AwardMethodCategory {
    /// Open or restricted call for tenders
    AppelOffres,
    /// Design contest
    Concours,
    /// Simple consultation of several providers
    Consultation,
    /// Negotiated, single-source procedure
    GreAGre,
    Autre,
}

impl AwardMethodCategory {
    /// Rule table, evaluated top to bottom. A rule matches when the upper-cased
    /// French acronym starts with one of its prefixes, or when the normalized
    /// French designation contains one of its keywords.
    const RULES: [(Self, &'static [&'static str], &'static [&'static str]); 4] = [
        (Self::AppelOffres, &["AO"], &["appel d'offres", "appel d'offre"]),
        (Self::Concours, &["CONC"], &["concours"]),
        (Self::Consultation, &["CONS"], &["consultation"]),
        (Self::GreAGre, &["GG"], &["gre a gre", "negoci"]),
    ];

    pub fn classify(acronym_fr: Option<&str>, designation_fr: Option<&str>) -> Self {
        let acronym = acronym_fr.map(|a| a.trim().to_uppercase()).unwrap_or_default();
        let label = designation_fr.map(normalize_label).unwrap_or_default();

        Self::RULES
            .iter()
            .find(|(_, prefixes, keywords)| {
                (!acronym.is_empty() && prefixes.iter().any(|p| acronym.starts_with(p)))
                    || keywords.iter().any(|k| label.contains(k))
            })
            .map(|(category, _, _)| *category)
            .unwrap_or(Self::Autre)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_every_variant_is_reachable() {
        for variant in AwardMethodCategory::iter() {
            let rule = AwardMethodCategory::RULES.iter().find(|(v, _, _)| *v == variant);
            let (acronym, label) = rule
                .map(|(_, prefixes, keywords)| (prefixes[0], keywords[0]))
                .unwrap_or(("ZZ", "sans rapport"));
            assert_eq!(AwardMethodCategory::classify(Some(acronym), None), variant);
            assert_eq!(AwardMethodCategory::classify(None, Some(label)), variant);
        }
    }

    #[test]
    fn test_open_tender_by_acronym() {
        assert_eq!(
            AwardMethodCategory::classify(Some("AOO"), Some("Appel d'offres ouvert")),
            AwardMethodCategory::AppelOffres
        );
        assert_eq!(
            AwardMethodCategory::classify(Some("aor"), None),
            AwardMethodCategory::AppelOffres
        );
        assert_eq!(AwardMethodCategory::AppelOffres.to_string(), "APPEL_OFFRES");
    }

    #[test]
    fn test_open_tender_by_label() {
        assert_eq!(
            AwardMethodCategory::classify(None, Some("Appel d’offres restreint")),
            AwardMethodCategory::AppelOffres
        );
    }

    #[test]
    fn test_contest() {
        assert_eq!(
            AwardMethodCategory::classify(Some("CONC"), None),
            AwardMethodCategory::Concours
        );
        assert_eq!(
            AwardMethodCategory::classify(None, Some("Concours d'architecture")),
            AwardMethodCategory::Concours
        );
    }

    #[test]
    fn test_consultation() {
        assert_eq!(
            AwardMethodCategory::classify(Some("CONS-S"), None),
            AwardMethodCategory::Consultation
        );
        assert_eq!(
            AwardMethodCategory::classify(Some("X"), Some("Consultation sélective")),
            AwardMethodCategory::Consultation
        );
    }

    #[test]
    fn test_negotiated() {
        assert_eq!(
            AwardMethodCategory::classify(Some("GGS"), None),
            AwardMethodCategory::GreAGre
        );
        assert_eq!(
            AwardMethodCategory::classify(None, Some("Gré à gré simple")),
            AwardMethodCategory::GreAGre
        );
        assert_eq!(
            AwardMethodCategory::classify(None, Some("Procédure négociée")),
            AwardMethodCategory::GreAGre
        );
    }

    #[test]
    fn test_fallback() {
        assert_eq!(AwardMethodCategory::classify(None, None), AwardMethodCategory::Autre);
        assert_eq!(
            AwardMethodCategory::classify(Some("  "), Some("Marché à commandes")),
            AwardMethodCategory::Autre
        );
    }

    #[test]
    fn test_serialized_names() {
        let json = serde_json::to_string(&AwardMethodCategory::GreAGre).unwrap();
        assert_eq!(json, "\"GRE_A_GRE\"");
        let name: &'static str = AwardMethodCategory::GreAGre.into();
        assert_eq!(name, "GRE_A_GRE");
    }
}
