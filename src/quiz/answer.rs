use unicode_normalization::UnicodeNormalization;

use crate::quiz::Verdict;

// Combining Diacritical Marks block
const COMBINING_MARKS: std::ops::RangeInclusive<char> = '\u{0300}'..='\u{036f}';

/// Lower-cases `s`, strips the accents off every letter and trims it.
///
/// Accented letters are decomposed (NFD) and the combining marks dropped, so
/// "é" becomes "e". The tilde goes too, meaning "ñ" and "n" compare equal here.
///
/// Trimming happens after the marks are dropped, so a stray mark after
/// trailing whitespace ("hablo \u{301}") vanishes along with the space.
/// Trimming first would leave "a \u{301}" as "a " and make a second pass
/// change the result.
pub fn normalize(s: &str) -> String {
    let stripped: String = s
        .to_lowercase()
        .nfd()
        .filter(|c| !COMBINING_MARKS.contains(c))
        .collect();
    stripped.trim().to_string()
}

/// Checks a typed answer against the reference conjugation.
///
/// Only surrounding whitespace is forgiven. When the answer is the right word
/// but differs in accents or letter case, it is an accent error rather than
/// correct.
pub fn compare(user_answer: &str, correct_answer: &str) -> Verdict {
    let user_trimmed = user_answer.trim();
    let correct_trimmed = correct_answer.trim();

    let (is_correct, is_accent_error) = if normalize(user_trimmed) != normalize(correct_trimmed) {
        (false, false)
    } else if user_trimmed == correct_trimmed {
        (true, false)
    } else {
        (false, true)
    };

    Verdict {
        is_correct,
        is_accent_error,
        correct_answer: correct_answer.to_string(),
        user_answer: user_answer.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(user: &str, correct: &str) -> (bool, bool) {
        let verdict = compare(user, correct);
        (verdict.is_correct, verdict.is_accent_error)
    }

    #[test]
    fn exact_answer_is_correct() {
        assert_eq!(outcome("hablo", "hablo"), (true, false));
    }

    #[test]
    fn identical_strings_are_always_correct() {
        for word in ["hablo", "hablé", "comió", "Él", "año", "vivís", "fuimos a casa"] {
            assert_eq!(outcome(word, word), (true, false), "{word}");
        }
    }

    #[test]
    fn missing_accent_is_an_accent_error() {
        assert_eq!(outcome("hable", "hablé"), (false, true));
        assert_eq!(outcome("comio", "comió"), (false, true));
    }

    #[test]
    fn extra_accent_is_an_accent_error() {
        assert_eq!(outcome("hábló", "hablo"), (false, true));
    }

    #[test]
    fn case_difference_is_an_accent_error() {
        assert_eq!(outcome("Hablo", "hablo"), (false, true));
    }

    #[test]
    fn tilde_is_treated_like_an_accent() {
        assert_eq!(outcome("ano", "año"), (false, true));
    }

    #[test]
    fn different_word_is_a_mismatch() {
        assert_eq!(outcome("como", "hablo"), (false, false));
        assert_eq!(outcome("hablamos", "hablo"), (false, false));
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        assert_eq!(outcome("  hablo  ", "hablo"), (true, false));
        assert_eq!(outcome("hablo", "\thablo\n"), (true, false));
    }

    #[test]
    fn internal_whitespace_is_kept() {
        assert_eq!(outcome("hab lo", "hablo"), (false, false));
    }

    #[test]
    fn empty_answer_only_matches_empty_reference() {
        assert_eq!(outcome("", "hablo"), (false, false));
        assert_eq!(outcome("   ", "hablo"), (false, false));
        assert_eq!(outcome("", ""), (true, false));
    }

    #[test]
    fn verdict_keeps_both_answers_verbatim() {
        let verdict = compare(" Hable ", "hablé");
        assert_eq!(verdict.user_answer, " Hable ");
        assert_eq!(verdict.correct_answer, "hablé");
    }

    #[test]
    fn stray_mark_after_trailing_space_is_an_accent_error() {
        assert_eq!(normalize("hablo \u{301}"), "hablo");
        assert_eq!(outcome("hablo \u{301}", "hablo"), (false, true));
    }

    #[test]
    fn precomposed_and_decomposed_accents_are_the_same_word() {
        // "é" as U+00E9 vs "e" + U+0301
        assert_eq!(outcome("hable\u{301}", "habl\u{e9}"), (false, true));
    }

    #[test]
    fn normalize_strips_accents_and_case() {
        assert_eq!(normalize("  ÉL COMIÓ  "), "el comio");
        assert_eq!(normalize("Ñandú"), "nandu");
        assert_eq!(normalize("pingüino"), "pinguino");
    }

    #[test]
    fn normalize_is_idempotent() {
        let samples = [
            "",
            "  ",
            "Hablé",
            "  ÉL COMIÓ  ",
            "año",
            "a \u{301}",
            "İstanbul",
            "Ellos/Ellas/Ustedes",
            "pingüino",
            "\u{1e9e}",
        ];
        for sample in samples {
            let once = normalize(sample);
            assert_eq!(normalize(&once), once, "{sample:?}");
        }
    }
}
