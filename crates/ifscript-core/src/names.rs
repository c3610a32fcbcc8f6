//! Fork-name normalization: "lowercased, whitespace-stripped" (spec.md §3,
//! §6: "Fork names are compared case-insensitively with whitespace removed").

/// Normalize a fork name for table lookup / comparison.
pub fn normalize_fork_name(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Normalize a variable identifier: "lowercase, no whitespace" (spec.md §3).
pub fn normalize_ident(raw: &str) -> String {
    normalize_fork_name(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_whitespace_and_lowercases() {
        assert_eq!(normalize_fork_name(" My  Fork "), "myfork");
        assert_eq!(normalize_fork_name("START"), "start");
    }
}
