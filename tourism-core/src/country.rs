//! Loose country-name equality used to drop attractions across a border.

/// Standard name and the spellings that refer to the same country.
const COUNTRY_ALIASES: &[(&str, &[&str])] = &[
    ("united states", &["usa", "united states of america", "us", "united states"]),
    ("united kingdom", &["uk", "great britain", "britain", "england", "united kingdom"]),
    ("russian federation", &["russia"]),
    ("south korea", &["korea", "republic of korea"]),
    ("north korea", &["korea", "democratic people's republic of korea"]),
    ("united arab emirates", &["uae", "emirates", "united arab emirates"]),
];

/// True when both names refer to the same country.
///
/// Besides exact aliases, a name containing a standard name matches a name
/// containing any of its aliases, so matching is deliberately permissive.
pub fn countries_match(a: &str, b: &str) -> bool {
    let a = a.trim().to_lowercase();
    let b = b.trim().to_lowercase();

    if a == b {
        return true;
    }

    COUNTRY_ALIASES.iter().any(|(standard, aliases)| {
        let is_alias = |name: &str| aliases.contains(&name);
        let contains_alias = |name: &str| aliases.iter().any(|alias| name.contains(alias));

        (a == *standard && is_alias(&b))
            || (b == *standard && is_alias(&a))
            || (is_alias(&a) && is_alias(&b))
            || (a.contains(standard) && contains_alias(&b))
            || (b.contains(standard) && contains_alias(&a))
    })
}
