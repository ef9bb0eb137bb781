/// Trims the value and drops it entirely when nothing is left
pub fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

/// Lower-cases a French label and folds accented letters to ASCII so that
/// keyword rules can be written without accents
pub fn normalize_label(label: &str) -> String {
    label
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'à' | 'â' | 'ä' => 'a',
            'é' | 'è' | 'ê' | 'ë' => 'e',
            'î' | 'ï' => 'i',
            'ô' | 'ö' => 'o',
            'ù' | 'û' | 'ü' => 'u',
            'ç' => 'c',
            '’' => '\'',
            other => other,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank(Some("  x ".to_string())), Some("x".to_string()));
        assert_eq!(non_blank(Some("  ".to_string())), None);
        assert_eq!(non_blank(None), None);
    }

    #[test]
    fn test_normalize_label() {
        assert_eq!(normalize_label(" Gré à Gré "), "gre a gre");
        assert_eq!(normalize_label("Évaluation des offres"), "evaluation des offres");
        assert_eq!(normalize_label("Appel d’offres"), "appel d'offres");
        assert_eq!(normalize_label("Clôture"), "cloture");
    }
}
