use thiserror::Error;

/// Why a player-entered clue was refused before submission. Display strings
/// are shown to the player as typed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClueRejection {
    #[error("Please enter a clue")]
    Empty,
    #[error("Clue must be a single word")]
    MultipleWords,
    #[error("Cannot use the secret word as a clue!")]
    SecretWord,
    #[error("Clue is too similar to the secret word!")]
    TooSimilar,
    #[error("Clue must be at least 2 characters")]
    TooShort,
    #[error("Clue is too long (max 20 characters)")]
    TooLong,
}

/// Normalize a clue the way the session records it.
pub fn normalize_clue(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Validate a human-entered clue and return the normalized form.
/// `secret_word` is supplied for civilians; the impostor does not know it,
/// so similarity checks are skipped for them.
pub fn validate_clue(raw: &str, secret_word: Option<&str>) -> Result<String, ClueRejection> {
    let clue = normalize_clue(raw);

    if clue.is_empty() {
        return Err(ClueRejection::Empty);
    }
    if clue.contains(' ') {
        return Err(ClueRejection::MultipleWords);
    }
    if let Some(secret) = secret_word {
        let secret = secret.to_lowercase();
        if clue == secret {
            return Err(ClueRejection::SecretWord);
        }
        if secret.contains(&clue) || clue.contains(&secret) {
            return Err(ClueRejection::TooSimilar);
        }
    }
    if clue.chars().count() < 2 {
        return Err(ClueRejection::TooShort);
    }
    if clue.chars().count() > 20 {
        return Err(ClueRejection::TooLong);
    }

    Ok(clue)
}

/// Sanitize an oracle-produced clue: lowercase, letters only, length 2-20,
/// never the secret word. Returns None when the response is unusable and the
/// caller should fall back.
pub fn sanitize_oracle_clue(response: &str, secret_word: Option<&str>) -> Option<String> {
    let clue: String = response
        .trim()
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase())
        .collect();

    if clue.len() < 2 || clue.len() > 20 {
        return None;
    }
    if let Some(secret) = secret_word {
        if clue == secret.to_lowercase() {
            return None;
        }
    }

    Some(clue)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_trims_and_lowercases() {
        assert_eq!(normalize_clue("  Trunk "), "trunk");
    }

    #[test]
    fn test_validate_accepts_reasonable_clue() {
        assert_eq!(
            validate_clue("Trunk", Some("elephant")),
            Ok("trunk".to_string())
        );
    }

    #[test]
    fn test_validate_rejects_empty() {
        assert_eq!(validate_clue("   ", Some("pizza")), Err(ClueRejection::Empty));
    }

    #[test]
    fn test_validate_rejects_multiple_words() {
        assert_eq!(
            validate_clue("big ears", Some("elephant")),
            Err(ClueRejection::MultipleWords)
        );
    }

    #[test]
    fn test_validate_rejects_secret_word() {
        assert_eq!(
            validate_clue("Elephant", Some("elephant")),
            Err(ClueRejection::SecretWord)
        );
    }

    #[test]
    fn test_validate_rejects_containment_both_ways() {
        assert_eq!(
            validate_clue("elephants", Some("elephant")),
            Err(ClueRejection::TooSimilar)
        );
        assert_eq!(
            validate_clue("robo", Some("robot")),
            Err(ClueRejection::TooSimilar)
        );
    }

    #[test]
    fn test_validate_skips_similarity_without_secret() {
        // The impostor does not know the word, so anything well-formed goes.
        assert_eq!(validate_clue("elephant", None), Ok("elephant".to_string()));
    }

    #[test]
    fn test_validate_length_bounds() {
        assert_eq!(validate_clue("x", Some("pizza")), Err(ClueRejection::TooShort));
        assert_eq!(
            validate_clue("abcdefghijklmnopqrstu", Some("pizza")),
            Err(ClueRejection::TooLong)
        );
        assert!(validate_clue("ab", Some("pizza")).is_ok());
        assert!(validate_clue("abcdefghijklmnopqrst", Some("pizza")).is_ok());
    }

    #[test]
    fn test_sanitize_strips_non_letters() {
        assert_eq!(
            sanitize_oracle_clue("  \"Trunk!\" ", Some("elephant")),
            Some("trunk".to_string())
        );
        assert_eq!(
            sanitize_oracle_clue("A clue: slice.", Some("pizza")),
            Some("aclueslice".to_string())
        );
    }

    #[test]
    fn test_sanitize_rejects_garbage() {
        assert_eq!(sanitize_oracle_clue("", Some("pizza")), None);
        assert_eq!(sanitize_oracle_clue("42!?", Some("pizza")), None);
        assert_eq!(sanitize_oracle_clue("x", Some("pizza")), None);
    }

    #[test]
    fn test_sanitize_rejects_secret_word() {
        assert_eq!(sanitize_oracle_clue("Pizza!", Some("pizza")), None);
        // Without a secret word the same response is fine.
        assert_eq!(sanitize_oracle_clue("Pizza!", None), Some("pizza".to_string()));
    }
}
