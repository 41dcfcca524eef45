use super::lines::{LineTable, TEXT1_MAX_LINES, TEXT2_MAX_LINES};
use super::solve::{self, SeqDiff};
use super::*;
use crate::settings::Settings;
use std::time::Instant;

fn eq(text: &str) -> Diff {
    Diff::equal(text)
}

fn del(text: &str) -> Diff {
    Diff::delete(text)
}

fn ins(text: &str) -> Diff {
    Diff::insert(text)
}

fn chars(s: &str) -> Vec<char> {
    s.chars().collect()
}

fn no_timeout() -> Settings {
    Settings {
        diff_timeout: None,
        ..Settings::default()
    }
}

#[test]
fn common_prefix_lengths() {
    assert_eq!(common_prefix("abc", "xyz"), 0);
    assert_eq!(common_prefix("1234abcdef", "1234xyz"), 4);
    assert_eq!(common_prefix("1234", "1234xyz"), 4);
    assert_eq!(common_prefix("abc", "abc"), 3);
}

#[test]
fn common_suffix_lengths() {
    assert_eq!(common_suffix("abc", "xyz"), 0);
    assert_eq!(common_suffix("abcdef1234", "xyz1234"), 4);
    assert_eq!(common_suffix("1234", "xyz1234"), 4);
    assert_eq!(common_suffix("abc", "abc"), 3);
}

#[test]
fn common_overlap_lengths() {
    assert_eq!(common_overlap("", "abcd"), 0);
    assert_eq!(common_overlap("abc", "abcd"), 3);
    assert_eq!(common_overlap("123456", "abcd"), 0);
    assert_eq!(common_overlap("123456xxx", "xxxabcd"), 3);
    // A ligature is not its decomposition.
    assert_eq!(common_overlap("fi", "\u{fb01}i"), 0);
}

fn half(text1: &str, text2: &str) -> Option<(String, String, String, String, String)> {
    let settings = Settings::default();
    let text1 = chars(text1);
    let text2 = chars(text2);
    solve::half_match(&settings, &text1, &text2).map(|hm| {
        (
            hm.text1_a.iter().collect(),
            hm.text1_b.iter().collect(),
            hm.text2_a.iter().collect(),
            hm.text2_b.iter().collect(),
            hm.common.iter().collect(),
        )
    })
}

fn owned(
    parts: (&str, &str, &str, &str, &str),
) -> Option<(String, String, String, String, String)> {
    Some((
        parts.0.to_string(),
        parts.1.to_string(),
        parts.2.to_string(),
        parts.3.to_string(),
        parts.4.to_string(),
    ))
}

#[test]
fn half_match_rejects_short_or_disjoint_inputs() {
    assert_eq!(half("1234567890", "abcdef"), None);
    assert_eq!(half("12345", "23"), None);
}

#[test]
fn half_match_single_matches() {
    assert_eq!(
        half("1234567890", "a345678z"),
        owned(("12", "90", "a", "z", "345678"))
    );
    assert_eq!(
        half("a345678z", "1234567890"),
        owned(("a", "z", "12", "90", "345678"))
    );
    assert_eq!(
        half("abc56789z", "1234567890"),
        owned(("abc", "z", "1234", "0", "56789"))
    );
    assert_eq!(
        half("a23456xyz", "1234567890"),
        owned(("a", "xyz", "1", "7890", "23456"))
    );
}

#[test]
fn half_match_multiple_matches() {
    assert_eq!(
        half("121231234123451234123121", "a1234123451234z"),
        owned(("12123", "123121", "a", "z", "1234123451234"))
    );
}

#[test]
fn half_match_may_be_non_optimal() {
    // An optimal diff of these would not use this split at all.
    assert_eq!(
        half("qHilloHelloHew", "xHelloHeHulloy"),
        owned(("qHillo", "w", "x", "Hulloy", "HelloHe"))
    );
}

#[test]
fn half_match_is_disabled_without_a_timeout() {
    let settings = no_timeout();
    let text1 = chars("qHilloHelloHew");
    let text2 = chars("xHelloHeHulloy");
    assert_eq!(solve::half_match(&settings, &text1, &text2), None);
}

#[test]
fn line_table_interns_shared_lines() {
    let text1 = "alpha\nbeta\nalpha\n";
    let text2 = "beta\nalpha\nbeta\n";
    let mut table = LineTable::new();
    let tokens1 = table.encode(text1, TEXT1_MAX_LINES);
    let tokens2 = table.encode(text2, TEXT2_MAX_LINES);
    assert_eq!(tokens1, vec![1, 2, 1]);
    assert_eq!(tokens2, vec![2, 1, 2]);

    let decoded = table.decode(vec![
        SeqDiff::equal(tokens1),
        SeqDiff::insert(tokens2),
    ]);
    assert_eq!(decoded, vec![eq(text1), ins(text2)]);
}

#[test]
fn line_table_handles_missing_final_newline() {
    let mut table = LineTable::new();
    assert_eq!(table.encode("a", TEXT1_MAX_LINES), vec![1]);
    assert_eq!(table.encode("b", TEXT2_MAX_LINES), vec![2]);
}

#[test]
fn line_table_collapses_past_the_cap_without_losing_text() {
    let text: String = (0..66_000).map(|i| format!("{i}\n")).collect();

    let mut table = LineTable::new();
    let tokens = table.encode(&text, TEXT1_MAX_LINES);
    assert_eq!(tokens.len(), TEXT1_MAX_LINES);
    let decoded = table.decode(vec![SeqDiff::equal(tokens)]);
    assert_eq!(decoded[0].text, text);

    let mut table = LineTable::new();
    let tokens = table.encode(&text, TEXT2_MAX_LINES);
    assert_eq!(tokens.len(), TEXT2_MAX_LINES);
    let decoded = table.decode(vec![SeqDiff::equal(tokens)]);
    assert_eq!(decoded[0].text, text);
}

#[test]
fn cleanup_merge_cases() {
    let mut diffs = vec![];
    cleanup_merge(&mut diffs);
    assert_eq!(diffs, vec![]);

    let mut diffs = vec![eq("a"), del("b"), ins("c")];
    cleanup_merge(&mut diffs);
    assert_eq!(diffs, vec![eq("a"), del("b"), ins("c")]);

    let mut diffs = vec![eq("a"), del("b"), eq("c")];
    cleanup_merge(&mut diffs);
    assert_eq!(diffs, vec![eq("a"), del("b"), eq("c")]);

    let mut diffs = vec![eq("a"), eq("b"), eq("c")];
    cleanup_merge(&mut diffs);
    assert_eq!(diffs, vec![eq("abc")]);

    let mut diffs = vec![del("a"), del("b"), del("c")];
    cleanup_merge(&mut diffs);
    assert_eq!(diffs, vec![del("abc")]);

    let mut diffs = vec![ins("a"), ins("b"), ins("c")];
    cleanup_merge(&mut diffs);
    assert_eq!(diffs, vec![ins("abc")]);

    let mut diffs = vec![del("a"), ins("b"), del("c"), ins("d"), eq("e"), eq("f")];
    cleanup_merge(&mut diffs);
    assert_eq!(diffs, vec![del("ac"), ins("bd"), eq("ef")]);
}

#[test]
fn cleanup_merge_factors_common_affixes() {
    let mut diffs = vec![del("a"), ins("abc"), del("dc")];
    cleanup_merge(&mut diffs);
    assert_eq!(diffs, vec![eq("a"), del("d"), ins("b"), eq("c")]);

    let mut diffs = vec![eq("x"), del("a"), ins("abc"), del("dc"), eq("y")];
    cleanup_merge(&mut diffs);
    assert_eq!(diffs, vec![eq("xa"), del("d"), ins("b"), eq("cy")]);
}

#[test]
fn cleanup_merge_slides_edits_over_equalities() {
    let mut diffs = vec![eq("a"), ins("ba"), eq("c")];
    cleanup_merge(&mut diffs);
    assert_eq!(diffs, vec![ins("ab"), eq("ac")]);

    let mut diffs = vec![eq("c"), ins("ab"), eq("a")];
    cleanup_merge(&mut diffs);
    assert_eq!(diffs, vec![eq("ca"), ins("ba")]);

    let mut diffs = vec![eq("a"), del("b"), eq("c"), del("ac"), eq("x")];
    cleanup_merge(&mut diffs);
    assert_eq!(diffs, vec![del("abc"), eq("acx")]);

    let mut diffs = vec![eq("x"), del("ca"), eq("c"), del("b"), eq("a")];
    cleanup_merge(&mut diffs);
    assert_eq!(diffs, vec![eq("xca"), del("cba")]);
}

#[test]
fn cleanup_merge_removes_empty_entries() {
    let mut diffs = vec![del("b"), ins("ab"), eq("c")];
    cleanup_merge(&mut diffs);
    assert_eq!(diffs, vec![ins("a"), eq("bc")]);

    let mut diffs = vec![eq(""), ins("a"), eq("b")];
    cleanup_merge(&mut diffs);
    assert_eq!(diffs, vec![ins("a"), eq("b")]);
}

#[test]
fn lossless_cleanup_is_a_no_op_on_trivial_scripts() {
    let mut diffs = vec![];
    cleanup_semantic_lossless(&mut diffs);
    assert_eq!(diffs, vec![]);
}

#[test]
fn lossless_cleanup_prefers_blank_lines() {
    let mut diffs = vec![
        eq("AAA\r\n\r\nBBB"),
        ins("\r\nDDD\r\n\r\nBBB"),
        eq("\r\nEEE"),
    ];
    cleanup_semantic_lossless(&mut diffs);
    assert_eq!(
        diffs,
        vec![
            eq("AAA\r\n\r\n"),
            ins("BBB\r\nDDD\r\n\r\n"),
            eq("BBB\r\nEEE"),
        ]
    );
}

#[test]
fn lossless_cleanup_prefers_line_boundaries() {
    let mut diffs = vec![eq("AAA\r\nBBB"), ins(" DDD\r\nBBB"), eq(" EEE")];
    cleanup_semantic_lossless(&mut diffs);
    assert_eq!(
        diffs,
        vec![eq("AAA\r\n"), ins("BBB DDD\r\n"), eq("BBB EEE")]
    );
}

#[test]
fn lossless_cleanup_prefers_word_boundaries() {
    let mut diffs = vec![eq("The c"), ins("ow and the c"), eq("at.")];
    cleanup_semantic_lossless(&mut diffs);
    assert_eq!(diffs, vec![eq("The "), ins("cow and the "), eq("cat.")]);
}

#[test]
fn lossless_cleanup_prefers_alphanumeric_boundaries() {
    let mut diffs = vec![eq("The-c"), ins("ow-and-the-c"), eq("at.")];
    cleanup_semantic_lossless(&mut diffs);
    assert_eq!(diffs, vec![eq("The-"), ins("cow-and-the-"), eq("cat.")]);
}

#[test]
fn lossless_cleanup_hits_the_edges() {
    let mut diffs = vec![eq("a"), del("a"), eq("ax")];
    cleanup_semantic_lossless(&mut diffs);
    assert_eq!(diffs, vec![del("a"), eq("aax")]);

    let mut diffs = vec![eq("xa"), del("a"), eq("a")];
    cleanup_semantic_lossless(&mut diffs);
    assert_eq!(diffs, vec![eq("xaa"), del("a")]);
}

#[test]
fn lossless_cleanup_prefers_sentence_boundaries() {
    let mut diffs = vec![eq("The xxx. The "), ins("zzz. The "), eq("yyy.")];
    cleanup_semantic_lossless(&mut diffs);
    assert_eq!(
        diffs,
        vec![eq("The xxx."), ins(" The zzz."), eq(" The yyy.")]
    );
}

#[test]
fn semantic_cleanup_trivial_cases() {
    let mut diffs = vec![];
    cleanup_semantic(&mut diffs);
    assert_eq!(diffs, vec![]);

    let mut diffs = vec![del("ab"), ins("cd"), eq("12"), del("e")];
    cleanup_semantic(&mut diffs);
    assert_eq!(diffs, vec![del("ab"), ins("cd"), eq("12"), del("e")]);

    let mut diffs = vec![del("abc"), ins("ABC"), eq("1234"), del("wxyz")];
    cleanup_semantic(&mut diffs);
    assert_eq!(diffs, vec![del("abc"), ins("ABC"), eq("1234"), del("wxyz")]);
}

#[test]
fn semantic_cleanup_simple_elimination() {
    let mut diffs = vec![del("a"), eq("b"), del("c")];
    cleanup_semantic(&mut diffs);
    assert_eq!(diffs, vec![del("abc"), ins("b")]);
}

#[test]
fn semantic_cleanup_backpass_elimination() {
    let mut diffs = vec![del("ab"), eq("cd"), del("e"), eq("f"), ins("g")];
    cleanup_semantic(&mut diffs);
    assert_eq!(diffs, vec![del("abcdef"), ins("cdfg")]);
}

#[test]
fn semantic_cleanup_multiple_eliminations() {
    let mut diffs = vec![
        ins("1"),
        eq("A"),
        del("B"),
        ins("2"),
        eq("_"),
        ins("1"),
        eq("A"),
        del("B"),
        ins("2"),
    ];
    cleanup_semantic(&mut diffs);
    assert_eq!(diffs, vec![del("AB_AB"), ins("1A2_1A2")]);
}

#[test]
fn semantic_cleanup_lands_on_word_boundaries() {
    let mut diffs = vec![eq("The c"), del("ow and the c"), eq("at.")];
    cleanup_semantic(&mut diffs);
    assert_eq!(diffs, vec![eq("The "), del("cow and the "), eq("cat.")]);
}

#[test]
fn semantic_cleanup_overlap_eliminations() {
    let mut diffs = vec![del("abcxx"), ins("xxdef")];
    cleanup_semantic(&mut diffs);
    assert_eq!(diffs, vec![del("abcxx"), ins("xxdef")]);

    let mut diffs = vec![del("abcxxx"), ins("xxxdef")];
    cleanup_semantic(&mut diffs);
    assert_eq!(diffs, vec![del("abc"), eq("xxx"), ins("def")]);

    let mut diffs = vec![del("xxxabc"), ins("defxxx")];
    cleanup_semantic(&mut diffs);
    assert_eq!(diffs, vec![ins("def"), eq("xxx"), del("abc")]);

    let mut diffs = vec![
        del("abcd1212"),
        ins("1212efghi"),
        eq("----"),
        del("A3"),
        ins("3BC"),
    ];
    cleanup_semantic(&mut diffs);
    assert_eq!(
        diffs,
        vec![
            del("abcd"),
            eq("1212"),
            ins("efghi"),
            eq("----"),
            del("A"),
            eq("3"),
            ins("BC"),
        ]
    );
}

#[test]
fn efficiency_cleanup_cases() {
    let settings = Settings::default();

    let mut diffs = vec![];
    cleanup_efficiency(&settings, &mut diffs);
    assert_eq!(diffs, vec![]);

    let mut diffs = vec![del("ab"), ins("12"), eq("wxyz"), del("cd"), ins("34")];
    cleanup_efficiency(&settings, &mut diffs);
    assert_eq!(
        diffs,
        vec![del("ab"), ins("12"), eq("wxyz"), del("cd"), ins("34")]
    );

    let mut diffs = vec![del("ab"), ins("12"), eq("xyz"), del("cd"), ins("34")];
    cleanup_efficiency(&settings, &mut diffs);
    assert_eq!(diffs, vec![del("abxyzcd"), ins("12xyz34")]);

    let mut diffs = vec![ins("12"), eq("x"), del("cd"), ins("34")];
    cleanup_efficiency(&settings, &mut diffs);
    assert_eq!(diffs, vec![del("xcd"), ins("12x34")]);

    let mut diffs = vec![
        del("ab"),
        ins("12"),
        eq("xy"),
        ins("34"),
        eq("z"),
        del("cd"),
        ins("56"),
    ];
    cleanup_efficiency(&settings, &mut diffs);
    assert_eq!(diffs, vec![del("abxyzcd"), ins("12xy34z56")]);
}

#[test]
fn efficiency_cleanup_with_a_higher_edit_cost() {
    let settings = Settings {
        diff_edit_cost: 5,
        ..Settings::default()
    };
    let mut diffs = vec![del("ab"), ins("12"), eq("wxyz"), del("cd"), ins("34")];
    cleanup_efficiency(&settings, &mut diffs);
    assert_eq!(diffs, vec![del("abwxyzcd"), ins("12wxyz34")]);
}

#[test]
fn pretty_html_escapes_markup() {
    let diffs = vec![eq("a\n"), del("<B>b</B>"), ins("c&d")];
    assert_eq!(
        pretty_html(&diffs),
        "<span>a&para;<br></span><del style=\"background:#ffe6e6;\">&lt;B&gt;b&lt;/B&gt;</del><ins style=\"background:#e6ffe6;\">c&amp;d</ins>"
    );
}

#[test]
fn text_reconstruction() {
    let diffs = vec![
        eq("jump"),
        del("s"),
        ins("ed"),
        eq(" over "),
        del("the"),
        ins("a"),
        eq(" lazy"),
    ];
    assert_eq!(original_text(&diffs), "jumps over the lazy");
    assert_eq!(modified_text(&diffs), "jumped over a lazy");
}

#[test]
fn delta_round_trip() {
    let diffs = vec![
        eq("jump"),
        del("s"),
        ins("ed"),
        eq(" over "),
        del("the"),
        ins("a"),
        eq(" lazy"),
        ins("old dog"),
    ];
    let text1 = original_text(&diffs);
    assert_eq!(text1, "jumps over the lazy");

    let delta = to_delta(&diffs);
    assert_eq!(delta, "=4\t-1\t+ed\t=6\t-3\t+a\t=5\t+old dog");
    assert_eq!(from_delta(&text1, &delta).unwrap(), diffs);
}

#[test]
fn delta_length_mismatches_are_rejected() {
    let diffs = vec![eq("jump"), del("s"), ins("ed")];
    let text1 = original_text(&diffs);
    let delta = to_delta(&diffs);

    let long = format!("{text1}x");
    assert!(matches!(
        from_delta(&long, &delta),
        Err(ParseDeltaError::LengthMismatch { .. })
    ));
    assert!(matches!(
        from_delta(&text1[1..], &delta),
        Err(ParseDeltaError::LengthMismatch { .. })
    ));
}

#[test]
fn delta_bad_tokens_are_rejected() {
    assert!(matches!(
        from_delta("", "+%c3%xy"),
        Err(ParseDeltaError::InvalidEscape { .. })
    ));
    assert!(matches!(
        from_delta("abc", "=x"),
        Err(ParseDeltaError::InvalidCount { .. })
    ));
    assert!(matches!(
        from_delta("abc", "=-1"),
        Err(ParseDeltaError::InvalidCount { .. })
    ));
    assert!(matches!(
        from_delta("abc", "y3"),
        Err(ParseDeltaError::UnknownOperation { op: 'y', .. })
    ));
}

#[test]
fn delta_handles_unicode_and_control_characters() {
    let diffs = vec![
        eq("\u{0680} \x00 \t %"),
        del("\u{0681} \x01 \n ^"),
        ins("\u{0682} \x02 \\ |"),
    ];
    let text1 = original_text(&diffs);
    assert_eq!(text1.chars().count(), 14);

    let delta = to_delta(&diffs);
    assert_eq!(delta, "=7\t-7\t+%da%82 %02 %5c %7c");
    assert_eq!(from_delta(&text1, &delta).unwrap(), diffs);
}

#[test]
fn empty_delta() {
    let diffs: Vec<Diff> = vec![];
    assert_eq!(to_delta(&diffs), "");
    assert_eq!(from_delta("", "").unwrap(), diffs);
}

#[test]
fn position_translation() {
    let diffs = vec![del("a"), ins("1234"), eq("xyz")];
    assert_eq!(translate_position(&diffs, 2), 5);

    let diffs = vec![eq("a"), del("1234"), eq("xyz")];
    assert_eq!(translate_position(&diffs, 3), 1);
}

#[test]
fn levenshtein_counts_substitutions_once() {
    assert_eq!(levenshtein(&[del("abc"), ins("1234"), eq("xyz")]), 4);
    assert_eq!(levenshtein(&[eq("xyz"), del("abc"), ins("1234")]), 4);
    assert_eq!(levenshtein(&[del("abc"), eq("xyz"), ins("1234")]), 7);
    assert_eq!(levenshtein(&[eq("xyz")]), 0);
}

#[test]
fn bisect_splits_at_the_middle_snake() {
    let settings = no_timeout();
    let diffs = myers::bisect(&settings, &chars("cat"), &chars("map"), None);
    assert_eq!(
        from_seq(diffs),
        vec![del("c"), ins("m"), eq("a"), del("t"), ins("p")]
    );
}

#[test]
fn bisect_degrades_when_the_deadline_has_passed() {
    let settings = no_timeout();
    let deadline = Some(Instant::now());
    let diffs = myers::bisect(&settings, &chars("cat"), &chars("map"), deadline);
    assert_eq!(from_seq(diffs), vec![del("cat"), ins("map")]);
}

#[test]
fn diff_trivial_cases() {
    let settings = Settings::default();
    assert_eq!(diff(&settings, "", "", false), vec![]);
    assert_eq!(diff(&settings, "abc", "abc", false), vec![eq("abc")]);
    assert_eq!(
        diff(&settings, "abc", "ab123c", false),
        vec![eq("ab"), ins("123"), eq("c")]
    );
    assert_eq!(
        diff(&settings, "a123bc", "abc", false),
        vec![eq("a"), del("123"), eq("bc")]
    );
    assert_eq!(
        diff(&settings, "abc", "a123b456c", false),
        vec![eq("a"), ins("123"), eq("b"), ins("456"), eq("c")]
    );
    assert_eq!(
        diff(&settings, "a123b456c", "abc", false),
        vec![eq("a"), del("123"), eq("b"), del("456"), eq("c")]
    );
}

#[test]
fn diff_real_changes_without_a_timeout() {
    let settings = no_timeout();
    assert_eq!(diff(&settings, "a", "b", false), vec![del("a"), ins("b")]);
    assert_eq!(
        diff(
            &settings,
            "Apples are a fruit.",
            "Bananas are also fruit.",
            false
        ),
        vec![
            del("Apple"),
            ins("Banana"),
            eq("s are a"),
            ins("lso"),
            eq(" fruit."),
        ]
    );
    assert_eq!(
        diff(&settings, "ax\t", "\u{0680}x\0", false),
        vec![del("a"), ins("\u{0680}"), eq("x"), del("\t"), ins("\0")]
    );
}

#[test]
fn diff_with_overlaps() {
    let settings = no_timeout();
    assert_eq!(
        diff(&settings, "1ayb2", "abxab", false),
        vec![del("1"), eq("a"), del("y"), eq("b"), del("2"), ins("xab")]
    );
    assert_eq!(
        diff(&settings, "abcy", "xaxcxabc", false),
        vec![ins("xaxcx"), eq("abc"), del("y")]
    );
    assert_eq!(
        diff(
            &settings,
            "ABCDa=bcd=efghijklmnopqrsEFGHIJKLMNOefg",
            "a-bcd-efghijklmnopqrs",
            false
        ),
        vec![
            del("ABCD"),
            eq("a"),
            del("="),
            ins("-"),
            eq("bcd"),
            del("="),
            ins("-"),
            eq("efghijklmnopqrs"),
            del("EFGHIJKLMNOefg"),
        ]
    );
    assert_eq!(
        diff(
            &settings,
            "a [[Pennsylvania]] and [[New",
            " and [[Pennsylvania]]",
            false
        ),
        vec![
            ins(" "),
            eq("a"),
            ins("nd"),
            eq(" [[Pennsylvania]]"),
            del(" and [[New"),
        ]
    );
}

#[test]
fn diff_reconstructs_both_inputs() {
    let settings = Settings::default();
    for (old, new) in [
        ("", "abc"),
        ("abc", ""),
        ("the quick brown fox", "the slow brown dog"),
        ("mouse", "sofas"),
        ("\u{0680}ab\u{0681}", "ab\u{fb01}"),
    ] {
        for check_lines in [false, true] {
            let diffs = diff(&settings, old, new, check_lines);
            assert_eq!(original_text(&diffs), old);
            assert_eq!(modified_text(&diffs), new);
        }
    }
}

#[test]
fn line_mode_agrees_with_character_mode_on_simple_inputs() {
    let settings = Settings::default();
    let old = "1234567890\n".repeat(13);
    let new = "abcdefghij\n".repeat(13);
    assert_eq!(
        diff(&settings, &old, &new, true),
        diff(&settings, &old, &new, false)
    );

    let old = "1234567890".repeat(13);
    let new = "abcdefghij".repeat(13);
    assert_eq!(
        diff(&settings, &old, &new, true),
        diff(&settings, &old, &new, false)
    );
}

#[test]
fn line_mode_reconstructs_interleaved_changes() {
    let settings = Settings::default();
    let old = "1234567890\n".repeat(13);
    let new = "abcdefghij\n1234567890\n1234567890\n1234567890\nabcdefghij\n1234567890\n1234567890\n1234567890\nabcdefghij\n1234567890\n1234567890\n1234567890\nabcdefghij\n";
    let diffs = diff(&settings, &old, new, true);
    assert_eq!(original_text(&diffs), old);
    assert_eq!(modified_text(&diffs), new);
}

#[test]
fn merge_invariants_hold_after_a_diff() {
    let settings = Settings::default();
    let old = "The quick brown fox jumps over the lazy dog.";
    let new = "That quick brown fox jumped over a lazy dog.";
    let diffs = diff(&settings, old, new, false);
    for pair in diffs.windows(2) {
        assert_ne!(pair[0].op, pair[1].op);
        if pair[0].op == Op::Delete && pair[1].op == Op::Insert {
            assert_eq!(common_prefix(&pair[0].text, &pair[1].text), 0);
            assert_eq!(common_suffix(&pair[0].text, &pair[1].text), 0);
        }
    }
    for d in &diffs {
        if d.op == Op::Equal {
            assert!(!d.text.is_empty());
        }
    }
}
