use smol_str::SmolStr;

#[inline(always)]
pub fn lower_case(s: &str) -> SmolStr {
    s.chars()
        .map(|c| c.to_lowercase().collect::<String>())
        .collect::<SmolStr>()
}

/// The first character of `s` in lower case, if it lower-cases to a single
/// character. Most scripts have no case, so this is usually the character
/// itself.
pub fn first_char_lower(s: &str) -> Option<char> {
    let first = s.chars().next()?;
    let mut lower = first.to_lowercase();
    match (lower.next(), lower.next()) {
        (Some(c), None) => Some(c),
        _ => Some(first),
    }
}

pub fn has_upper(s: &str) -> bool {
    s.chars().any(char::is_uppercase)
}
