//! Common utilities for LLM providers
//!
//! Helpers shared by every backend for keeping credentials out of logs and
//! error messages.

/// Minimum key length to display partial key
const MIN_KEY_LENGTH_FOR_PARTIAL_DISPLAY: usize = 8;

/// Number of characters to show at start/end of masked key
const KEY_MASK_VISIBLE_CHARS: usize = 4;

/// Longest provider error body kept verbatim
const MAX_ERROR_LENGTH: usize = 300;

/// Mask API key for safe display in logs
///
/// Shows first 4 and last 4 characters for keys longer than 8 characters,
/// otherwise shows "****".
///
/// # Examples
/// ```
/// use duelbench_llm::util::mask_api_key;
/// assert_eq!(mask_api_key("nvapi-1234567890abcdef"), "nvap...cdef");
/// assert_eq!(mask_api_key("short"), "****");
/// ```
#[must_use]
pub fn mask_api_key(key: &str) -> String {
    if key.len() <= MIN_KEY_LENGTH_FOR_PARTIAL_DISPLAY || !key.is_ascii() {
        return "****".to_string();
    }
    format!(
        "{}...{}",
        &key[..KEY_MASK_VISIBLE_CHARS],
        &key[key.len() - KEY_MASK_VISIBLE_CHARS..]
    )
}

/// Truncate to at most `max_chars` characters on a char boundary
#[must_use]
pub fn truncate_safe(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Sanitize a provider error body before it is wrapped in an `Error`
///
/// Authentication failures are collapsed to a fixed message so keys echoed
/// back by a provider never reach logs. Long bodies are truncated.
#[must_use]
pub fn sanitize_api_error(error: &str) -> String {
    let lower = error.to_lowercase();

    if lower.contains("api key")
        || lower.contains("api_key")
        || lower.contains("apikey")
        || lower.contains("invalid key")
        || lower.contains("unauthorized")
        || lower.contains("authentication")
        || lower.contains("bearer")
    {
        return "API authentication error. Please check the provider API key.".to_string();
    }

    if error.chars().count() > MAX_ERROR_LENGTH {
        format!("{}...(truncated)", truncate_safe(error, MAX_ERROR_LENGTH))
    } else {
        error.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_api_key_long() {
        let key = "sk-1234567890abcdefghij";
        let masked = mask_api_key(key);
        assert_eq!(masked, "sk-1...ghij");
        assert!(!masked.contains("567890"));
    }

    #[test]
    fn test_mask_api_key_short() {
        assert_eq!(mask_api_key("short"), "****");
        assert_eq!(mask_api_key("12345678"), "****");
        assert_eq!(mask_api_key(""), "****");
    }

    #[test]
    fn test_sanitize_error_with_api_key() {
        let sanitized = sanitize_api_error("Invalid API key: nvapi-abcdef123456");
        assert!(!sanitized.contains("nvapi"));
        assert!(sanitized.contains("authentication"));
    }

    #[test]
    fn test_sanitize_error_safe() {
        let error = "model not found";
        assert_eq!(sanitize_api_error(error), error);
    }

    #[test]
    fn test_sanitize_error_truncates() {
        let long = "x".repeat(1000);
        let sanitized = sanitize_api_error(&long);
        assert!(sanitized.ends_with("...(truncated)"));
        assert!(sanitized.len() < 400);
    }

    #[test]
    fn test_truncate_safe_multibyte() {
        assert_eq!(truncate_safe("héllo", 2), "hé");
        assert_eq!(truncate_safe("hi", 10), "hi");
    }
}
