// src/skills.rs
// Skill-name normalization. The site is not consistent about skill labels
// between the roster table and the scout report, so both sides go through
// `normalize` before any lookup.

/// Alias spellings seen in scout reports, mapped to the roster's labels.
const ALIASES: &[(&str, &str)] = &[
    ("goalkeeping", "keeping"),
    ("defence", "defending"),
    ("defense", "defending"),
    ("shooting", "scoring"),
    ("free kicks", "set pieces"),
    ("pace", "speed"),
];

/// Canonical key for a raw skill label: trim, ASCII-lowercase, collapse
/// whitespace, then alias lookup. Total — unmapped names pass through.
pub fn normalize(raw: &str) -> String {
    let key = crate::core::sanitize::normalize_ws(&raw.to_ascii_lowercase());
    for (alias, canonical) in ALIASES {
        if key == *alias {
            return (*canonical).to_string();
        }
    }
    key
}

#[cfg(test)]
mod tests {
    use super::normalize;

    #[test]
    fn aliases_map_to_roster_labels() {
        assert_eq!(normalize("Goalkeeping"), "keeping");
        assert_eq!(normalize(" Free  Kicks "), "set pieces");
    }

    #[test]
    fn unmapped_names_pass_through_lowercased() {
        assert_eq!(normalize("  Passing "), "passing");
        assert_eq!(normalize("Brutality"), "brutality");
    }

    #[test]
    fn normalize_is_idempotent() {
        for raw in ["Goalkeeping", "  PACE ", "Passing", "free kicks"] {
            let once = normalize(raw);
            assert_eq!(normalize(&once), once);
        }
    }
}
