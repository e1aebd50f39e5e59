//! Kecamatan name normalization.
//!
//! The boundary dataset and the RTH spreadsheets spell several district
//! names differently (casing, stray whitespace, and a handful of genuine
//! spelling variants). Normalization is applied symmetrically to both
//! sides of the join so records can be matched by name.

/// Known spelling variants in the source datasets, applied after casing
/// and whitespace cleanup. Order matters only in that each pair is a
/// whole-phrase substitution on the already-normalized string.
const ALIASES: &[(&str, &str)] = &[
    ("bojonglea", "bojongloa"),
    ("bandung wetan", "bandung timur"),
    ("bandung kulon", "bandung barat"),
    ("ujung berung", "ujungberung"),
];

/// Normalizes a kecamatan name for matching.
///
/// Trims, lowercases, collapses internal whitespace runs to a single
/// space, then applies the fixed alias table. Pure and idempotent:
/// `normalize(normalize(x)) == normalize(x)`.
#[must_use]
pub fn normalize(raw: &str) -> String {
    let mut name = raw
        .trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");

    for (variant, canonical) in ALIASES {
        if name.contains(variant) {
            name = name.replace(variant, canonical);
        }
    }

    name
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_and_lowercases() {
        assert_eq!(normalize(" Sukajadi "), "sukajadi");
        assert_eq!(normalize("SUKAJADI"), "sukajadi");
    }

    #[test]
    fn collapses_internal_whitespace() {
        assert_eq!(normalize("Sumur   Bandung"), "sumur bandung");
        assert_eq!(normalize("\tAstana  Anyar\n"), "astana anyar");
    }

    #[test]
    fn applies_alias_corrections() {
        assert_eq!(normalize("Bojonglea Kaler"), "bojongloa kaler");
        assert_eq!(normalize("Bandung Wetan"), "bandung timur");
        assert_eq!(normalize("Ujung Berung"), "ujungberung");
    }

    #[test]
    fn is_idempotent() {
        for raw in [" Sukajadi ", "BOJONGLEA  KALER", "Ujung Berung", "Cibiru"] {
            let once = normalize(raw);
            assert_eq!(normalize(&once), once, "not idempotent for {raw:?}");
        }
    }

    #[test]
    fn case_and_whitespace_insensitive() {
        assert_eq!(normalize(" Sukajadi "), normalize("SUKAJADI"));
    }

    #[test]
    fn empty_input_stays_empty() {
        assert_eq!(normalize("   "), "");
    }
}
