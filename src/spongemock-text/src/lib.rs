//! Alternating-case ("mocking spongebob") text transformation.
//!
//! Two entry points:
//! - [`mock_word`] mocks a single word.
//! - [`mock_text`] splits a message on single spaces and mocks every word.
//!
//! Case is decided by the zero-based position of each character inside its
//! word. Even positions are upper-cased, odd positions stay lower-case, with
//! two fixed exceptions: `i` is never upper-cased and `l` is always
//! upper-cased. Characters outside ASCII are never changed but still take up
//! a position.
//!
//! ```rust
//! use spongemock_text::mock_text;
//!
//! assert_eq!(mock_text("hey @user, how's it going?"), "HeY @user, HoW'S it GoinG?");
//! ```

/// Leading characters that mark Slack mention or channel syntax.
pub const EXEMPT_PREFIXES: [char; 3] = ['#', '@', '<'];

/// Returns `true` when the word starts with a mention/channel marker and must
/// be left untouched.
pub fn is_exempt(word: &str) -> bool {
    word.chars()
        .next()
        .is_some_and(|first| EXEMPT_PREFIXES.contains(&first))
}

/// Mock a single word.
///
/// The output always has the same number of characters as the input.
pub fn mock_word(word: &str) -> String {
    if is_exempt(word) {
        return word.to_string();
    }

    word.chars()
        .enumerate()
        .map(|(position, c)| mock_char(c.to_ascii_lowercase(), position))
        .collect()
}

/// Mock a whole message, word by word.
///
/// Splitting happens on single spaces and keeps empty tokens, so runs of
/// spaces survive unchanged.
pub fn mock_text(text: &str) -> String {
    text.split(' ').map(mock_word).collect::<Vec<_>>().join(" ")
}

// `c` is already lower-cased.
fn mock_char(c: char, position: usize) -> char {
    if !c.is_ascii_alphabetic() {
        return c;
    }

    if position % 2 == 0 {
        match c {
            'i' => c,
            _ => c.to_ascii_uppercase(),
        }
    } else {
        match c {
            'l' => 'L',
            _ => c,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SAMPLES: &[&str] = &[
        "",
        "test",
        "こんにちは",
        "swaこんg",
        "hey @user, how's it going?",
        "the party is happening in #party-room",
        "<USERID|User>",
        "ALL CAPS SHOUTING",
        "tabs\tand\nnewlines",
        "  test  ",
        "İstanbul ÉLAN",
    ];

    #[test]
    fn test_mock_word_basic() {
        assert_eq!(mock_word("test"), "TeSt");
        assert_eq!(mock_word("TEST"), "TeSt");
        assert_eq!(mock_word("hey"), "HeY");
    }

    #[test]
    fn test_mock_word_empty() {
        assert_eq!(mock_word(""), "");
        assert_eq!(mock_text(""), "");
    }

    #[test]
    fn test_i_stays_lower_on_even_positions() {
        assert_eq!(mock_word("it"), "it");
        assert_eq!(mock_word("is"), "is");
        assert_eq!(mock_word("going"), "GoinG");
    }

    #[test]
    fn test_l_goes_upper_on_odd_positions() {
        assert_eq!(mock_word("hello"), "HeLLO");
        assert_eq!(mock_word("ll"), "LL");
    }

    #[test]
    fn test_exempt_prefixes() {
        for word in ["#channel", "@user", "<@U123>", "<USERID|User>", "#party-room"] {
            assert!(is_exempt(word));
            assert_eq!(mock_word(word), word);
        }
        assert!(!is_exempt(""));
        assert!(!is_exempt("user@host"));
    }

    #[test]
    fn test_digits_unchanged() {
        assert_eq!(mock_word("20"), "20");
        assert_eq!(mock_word("2020"), "2020");
    }

    #[test]
    fn test_non_ascii_keeps_position() {
        assert_eq!(mock_word("こんにちは"), "こんにちは");
        assert_eq!(mock_word("swaこんg"), "SwAこんg");
    }

    #[test]
    fn test_punctuation_advances_position() {
        assert_eq!(mock_word("how's"), "HoW'S");
        assert_eq!(mock_word("a.b"), "A.B");
    }

    #[test]
    fn test_mock_text_sentences() {
        assert_eq!(
            mock_text("hey @user, how's it going?"),
            "HeY @user, HoW'S it GoinG?"
        );
        assert_eq!(
            mock_text("the party is happening in #party-room"),
            "ThE PaRtY is HaPpEninG in #party-room"
        );
        assert_eq!(mock_text("<USERID|User>"), "<USERID|User>");
    }

    #[test]
    fn test_mock_text_counter_resets_per_word() {
        assert_eq!(mock_text("ab ab"), "Ab Ab");
        assert_eq!(mock_text("a @b c"), "A @b C");
    }

    #[test]
    fn test_mock_text_preserves_space_runs() {
        assert_eq!(mock_text("  test  "), "  TeSt  ");
        assert_eq!(mock_text("a  b"), "A  B");
    }

    #[test]
    fn test_length_preserved() {
        for sample in SAMPLES {
            assert_eq!(
                mock_text(sample).chars().count(),
                sample.chars().count(),
                "length changed for {sample:?}"
            );
        }
    }

    #[test]
    fn test_non_letters_unchanged_in_place() {
        for sample in SAMPLES {
            let mocked = mock_text(sample);
            for (original, out) in sample.chars().zip(mocked.chars()) {
                if original.is_ascii_alphabetic() {
                    assert!(out.eq_ignore_ascii_case(&original));
                } else {
                    assert_eq!(out, original, "changed non-letter in {sample:?}");
                }
            }
        }
    }
}
