//! Unit tests for `mask_token`.
//! Verifies that API keys are masked for safe logging: first 7 + "***" + last 4 chars;
//! keys of length <= 11 are fully masked as "***".

use llm_client::mask_token;

#[test]
fn mask_token_short_returns_all_star() {
    assert_eq!(mask_token(""), "***");
    assert_eq!(mask_token("a"), "***");
    assert_eq!(mask_token("sk-or-12"), "***");
    assert_eq!(mask_token("sk-or-v1-12"), "***");
}

#[test]
fn mask_token_long_shows_head_and_tail() {
    assert_eq!(mask_token("sk-or-v1-abcdefghijklmnop"), "sk-or-v***mnop");
    assert_eq!(mask_token("sk-or-v1xyzw"), "sk-or-v***xyzw");
}

#[test]
fn mask_token_non_ascii_does_not_panic() {
    let masked = mask_token("ключ-очень-длинный-123");
    assert!(masked.starts_with("ключ-оч"));
    assert!(masked.ends_with("-123"));
}
