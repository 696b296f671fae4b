//! Text munging for Discord: mention stripping and reply chunking.

use regex::Regex;
use std::sync::OnceLock;

/// Matches one or more (possibly nested) `<@id>` / `<@!id>` mention tokens.
fn mention_regex() -> &'static Regex {
    static MENTION: OnceLock<Regex> = OnceLock::new();
    MENTION.get_or_init(|| Regex::new(r"(<+@!?)+[0-9]+>").expect("mention pattern is valid"))
}

/// Remove all user mentions from a message, leaving the remaining text
/// unchanged apart from surrounding whitespace.
pub fn strip_mentions(input: &str) -> String {
    mention_regex().replace_all(input, "").trim().to_string()
}

/// Split a reply on the last whitespace boundary at or before `limit`
/// characters, repeatedly, producing ordered chunks.
///
/// A single token longer than the limit has no boundary to split on and is
/// emitted whole as an oversized chunk. Splits always land on `char`
/// boundaries.
pub fn split_message(text: &str, limit: usize) -> Vec<String> {
    debug_assert!(limit > 0);

    let mut chunks = Vec::new();
    let mut rest = text.trim();

    loop {
        if rest.chars().count() <= limit {
            chunks.push(rest.to_string());
            return chunks;
        }

        // Byte offset just past the first `limit` characters.
        let window_end = rest
            .char_indices()
            .nth(limit)
            .map(|(idx, _)| idx)
            .unwrap_or(rest.len());

        let split_at = match rest[..window_end].rfind(char::is_whitespace) {
            Some(idx) => idx,
            // No boundary inside the window: take the whole token.
            None => rest[window_end..]
                .find(char::is_whitespace)
                .map(|offset| window_end + offset)
                .unwrap_or(rest.len()),
        };

        chunks.push(rest[..split_at].to_string());
        rest = rest[split_at..].trim_start();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_a_single_mention() {
        assert_eq!(strip_mentions("<@123456789> hello there"), "hello there");
    }

    #[test]
    fn strips_multiple_and_nickname_mentions() {
        assert_eq!(strip_mentions("<@111> tell <@!222> a joke"), "tell  a joke");
    }

    #[test]
    fn strips_nested_mentions() {
        assert_eq!(strip_mentions("<<@123> what is rust?"), "what is rust?");
    }

    #[test]
    fn leaves_plain_text_untouched() {
        assert_eq!(strip_mentions("  no mentions here  "), "no mentions here");
    }

    #[test]
    fn short_input_is_a_single_chunk() {
        let chunks = split_message("a short reply", 1950);
        assert_eq!(chunks, vec!["a short reply".to_string()]);
    }

    #[test]
    fn splits_on_the_last_space_before_the_limit() {
        // Words of 4 chars + space; limit forces a split near the middle.
        let input = "aaaa bbbb cccc dddd";
        let chunks = split_message(input, 10);
        assert_eq!(chunks, vec!["aaaa bbbb".to_string(), "cccc dddd".to_string()]);
        for chunk in &chunks {
            assert!(chunk.chars().count() <= 10);
        }
        assert_eq!(chunks.join(" "), input);
    }

    #[test]
    fn double_length_input_rejoins_to_the_original() {
        let word = "word ";
        let input = word.repeat(20).trim_end().to_string(); // 99 chars
        let chunks = split_message(&input, 50);
        assert_eq!(chunks.len(), 2);
        for chunk in &chunks {
            assert!(chunk.chars().count() <= 50);
        }
        assert_eq!(chunks.join(" "), input);
    }

    #[test]
    fn oversized_token_is_emitted_whole() {
        let token = "x".repeat(30);
        let chunks = split_message(&token, 10);
        assert_eq!(chunks, vec![token]);
    }

    #[test]
    fn oversized_token_in_the_middle_stays_intact() {
        let token = "y".repeat(25);
        let input = format!("intro {} outro", token);
        let chunks = split_message(&input, 10);
        assert_eq!(chunks, vec!["intro".to_string(), token, "outro".to_string()]);
    }

    #[test]
    fn never_splits_inside_a_char() {
        let input = "héllo wörld ünïcode tèxt rêply hére";
        let chunks = split_message(input, 12);
        assert!(chunks.len() > 1);
        assert_eq!(chunks.join(" "), input);
        for chunk in &chunks {
            assert!(chunk.chars().count() <= 12);
        }
    }
}
