use super::*;
use proptest::prelude::*;

fn sorted_chars(text: &str) -> Vec<char> {
    let mut chars: Vec<char> = text.chars().collect();
    chars.sort_unstable();
    chars
}

// Mixed Latin, Hebrew, Arabic, digits and punctuation
const MIXED: &str = "[a-zA-Z0-9 ,.!?\u{5d0}-\u{5ea}\u{627}-\u{64a}]{0,48}";

// Property: reordering only permutes characters
proptest! {
    #[test]
    fn prop_visual_is_a_permutation(s in MIXED) {
        let bidi = BidiNormalizer::new().normalize(&s, BaseDirection::Auto).unwrap();
        prop_assert_eq!(sorted_chars(&bidi.visual), sorted_chars(&s));
        prop_assert_eq!(bidi.logical, s);
    }
}

// Property: the runs tile the logical text exactly once
proptest! {
    #[test]
    fn prop_runs_cover_the_text(s in MIXED) {
        let bidi = BidiNormalizer::new().normalize(&s, BaseDirection::Auto).unwrap();

        let mut ranges: Vec<(usize, usize)> = bidi.runs.iter().map(|run| run.range).collect();
        ranges.sort_unstable();

        let mut expected_start = 0;
        for (start, end) in ranges {
            prop_assert_eq!(start, expected_start);
            prop_assert!(end > start);
            expected_start = end;
        }
        prop_assert_eq!(expected_start, s.len());

        for run in &bidi.runs {
            prop_assert_eq!(run.text.as_str(), &s[run.range.0..run.range.1]);
        }
    }
}

// Property: left-to-right-only text never moves
proptest! {
    #[test]
    fn prop_latin_is_unchanged(s in "[a-zA-Z0-9 ,.!?]{0,64}") {
        let bidi = BidiNormalizer::new().normalize(&s, BaseDirection::Auto).unwrap();
        prop_assert_eq!(bidi.visual, s);
        prop_assert_eq!(bidi.base_direction, Direction::LeftToRight);
    }
}

// Property: purely right-to-left letters are fully reversed
proptest! {
    #[test]
    fn prop_hebrew_is_reversed(s in "[\u{5d0}-\u{5ea}]{1,32}") {
        let bidi = BidiNormalizer::new().normalize(&s, BaseDirection::Auto).unwrap();
        let reversed: String = s.chars().rev().collect();
        prop_assert_eq!(bidi.visual, reversed);
        prop_assert_eq!(bidi.base_direction, Direction::RightToLeft);
    }
}
