//! Utility functions.
//!
//! Collection of helper functions used across the bot.

pub mod http;

pub use http::HttpClient;

use crate::identity::Jid;

/// Format a JID as an in-message mention token.
pub fn mention(jid: &Jid) -> String {
    format!("@{}", jid.user)
}

/// Keep only the digits of a user-supplied phone number
/// (`"+254 700-000000"` and `"@254700000000"` both normalize).
pub fn phone_digits(input: &str) -> String {
    input.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// True with probability `p`.
pub fn chance(p: f64) -> bool {
    rand::random::<f64>() < p
}

/// Truncate text for notices, on a char boundary, with an ellipsis.
pub fn preview(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars).collect();
    format!("{cut}…")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phone_digits_strips_noise() {
        assert_eq!(phone_digits("+254 700-000000"), "254700000000");
        assert_eq!(phone_digits("@254700000000"), "254700000000");
        assert_eq!(phone_digits("no digits"), "");
    }

    #[test]
    fn preview_respects_char_boundaries() {
        assert_eq!(preview("short", 10), "short");
        assert_eq!(preview("héllo wörld", 5), "héllo…");
    }

    #[test]
    fn mention_uses_user_part() {
        assert_eq!(mention(&Jid::phone("254700000001")), "@254700000001");
    }
}
