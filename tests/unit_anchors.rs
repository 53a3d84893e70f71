// Unit tests for anchor resolution and article vectorization.
//
// Everything runs against small hand-built embedding spaces, so expected
// vectors can be computed by hand.

use slant::embedding::vector::cosine_similarity;
use slant::embedding::{EmbeddingLookup, WordVectors};
use slant::engine::anchors::AnchorResolver;
use slant::engine::vectorize::vectorize;
use slant::tokenize::{DictionaryTokenizer, Tokenizer};

fn space() -> WordVectors {
    WordVectors::from_entries(
        3,
        vec![
            ("growth", vec![1.0, 0.0, 0.0]),
            ("welfare", vec![0.0, 1.0, 0.0]),
            ("equality", vec![0.0, 0.0, 1.0]),
            ("labor", vec![0.2, 0.6, 0.2]),
            ("union", vec![0.0, 0.8, 0.4]),
            ("minimum wage", vec![0.1, 0.7, 0.5]),
            ("tax", vec![0.5, 0.5, 0.0]),
        ],
    )
    .unwrap()
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn assert_close(a: &[f64], b: &[f64]) {
    assert_eq!(a.len(), b.len());
    for (x, y) in a.iter().zip(b) {
        assert!((x - y).abs() < 1e-6, "{a:?} != {b:?}");
    }
}

// ============================================================
// Antonym anchors
// ============================================================

#[test]
fn antonym_anchor_is_the_mean_of_resolvable_antonyms() {
    let v = space();
    let t = DictionaryTokenizer::new();
    let r = AnchorResolver::new(&v, &t);

    let a = r
        .resolve_antonym_anchor("growth", &strings(&["welfare", "equality"]))
        .unwrap();
    assert_close(&a.vector, &[0.0, 0.5, 0.5]);
    assert_eq!(a.sources, strings(&["welfare", "equality"]));
}

#[test]
fn antonym_order_does_not_change_the_anchor() {
    let v = space();
    let t = DictionaryTokenizer::new();
    let r = AnchorResolver::new(&v, &t);

    let forward = r
        .resolve_antonym_anchor("growth", &strings(&["welfare", "equality", "labor union", "tax"]))
        .unwrap();
    let reversed = r
        .resolve_antonym_anchor("growth", &strings(&["tax", "labor union", "equality", "welfare"]))
        .unwrap();
    assert_close(&forward.vector, &reversed.vector);
}

#[test]
fn resolution_is_bit_identical_across_calls() {
    let v = space();
    let t = DictionaryTokenizer::new();
    let r = AnchorResolver::new(&v, &t);
    let antonyms = strings(&["welfare", "labor union", "nonsense"]);

    let first = r.resolve_antonym_anchor("growth", &antonyms).unwrap();
    let second = r.resolve_antonym_anchor("growth", &antonyms).unwrap();
    assert_eq!(first, second);
}

#[test]
fn unresolvable_antonym_is_dropped_not_zero_filled() {
    let v = space();
    let t = DictionaryTokenizer::new();
    let r = AnchorResolver::new(&v, &t);

    let with_junk = r
        .resolve_antonym_anchor("growth", &strings(&["welfare", "zzz qqq"]))
        .unwrap();
    // Zero-filling would have produced (0, 0.5, 0)
    assert_close(&with_junk.vector, &[0.0, 1.0, 0.0]);
}

#[test]
fn multi_word_antonym_uses_whole_entry_when_present() {
    let v = space();
    let mut t = DictionaryTokenizer::new();
    t.add_term("minimum wage");
    let r = AnchorResolver::new(&v, &t);

    let a = r
        .resolve_antonym_anchor("growth", &strings(&["minimum wage"]))
        .unwrap();
    assert_close(&a.vector, &[0.1, 0.7, 0.5]);
    assert_eq!(a.resolved_subject(), "minimum wage");
}

#[test]
fn multi_word_antonym_falls_back_to_sub_tokens() {
    let v = space();
    let mut t = DictionaryTokenizer::new();
    t.add_term("labor union");
    let r = AnchorResolver::new(&v, &t);

    let a = r
        .resolve_antonym_anchor("growth", &strings(&["labor union"]))
        .unwrap();
    assert_close(&a.vector, &[0.1, 0.7, 0.3]);
    assert_eq!(a.resolved_subject(), "labor union");
}

#[test]
fn all_unresolvable_antonyms_give_no_anchor() {
    let v = space();
    let t = DictionaryTokenizer::new();
    let r = AnchorResolver::new(&v, &t);
    assert!(r
        .resolve_antonym_anchor("growth", &strings(&["zzz", "qqq www"]))
        .is_none());
}

// ============================================================
// Target and free-term anchors
// ============================================================

#[test]
fn target_anchor_is_the_literal_keyword_vector() {
    let v = space();
    let t = DictionaryTokenizer::new();
    let r = AnchorResolver::new(&v, &t);

    let a = r.target_anchor("tax").unwrap();
    assert_close(&a.vector, &[0.5, 0.5, 0.0]);
    assert!(r.target_anchor("tax reform").is_none());
}

#[test]
fn free_term_falls_back_where_target_does_not() {
    let v = space();
    let t = DictionaryTokenizer::new();
    let r = AnchorResolver::new(&v, &t);

    let a = r.resolve_free_term_anchor("tax reform").unwrap();
    assert_close(&a.vector, &[0.5, 0.5, 0.0]);
    assert_eq!(a.sources, strings(&["tax"]));
    assert!(r.resolve_free_term_anchor("reform").is_none());
}

// ============================================================
// Article vectorization
// ============================================================

#[test]
fn empty_article_has_no_vector() {
    let v = space();
    let t = DictionaryTokenizer::new();
    assert!(vectorize(&v, &t, "", "").is_none());
}

#[test]
fn surrounding_whitespace_does_not_matter() {
    let v = space();
    let t = DictionaryTokenizer::new();
    let plain = vectorize(&v, &t, "growth", "welfare").unwrap();
    let padded = vectorize(&v, &t, "   growth \t", "\n welfare  ").unwrap();
    assert_eq!(plain.vector, padded.vector);
}

#[test]
fn token_order_does_not_change_the_direction() {
    let v = space();
    let t = DictionaryTokenizer::new();
    let a = vectorize(&v, &t, "growth welfare equality", "tax").unwrap();
    let b = vectorize(&v, &t, "tax equality", "welfare growth").unwrap();
    assert_close(&a.vector, &b.vector);
    let sim = cosine_similarity(&a.vector, &b.vector).unwrap();
    assert!((sim - 1.0).abs() < 1e-12);
}

#[test]
fn registered_phrase_counts_as_one_token() {
    let v = space();
    let mut t = DictionaryTokenizer::new();
    t.add_term("minimum wage");
    let a = vectorize(&v, &t, "minimum wage debate", "").unwrap();
    assert_eq!(a.tokens, strings(&["minimum wage"]));
    assert_eq!(t.tokenize("minimum wage"), strings(&["minimum wage"]));
}

#[test]
fn article_of_only_stop_words_has_no_vector() {
    let v = WordVectors::from_entries(
        2,
        vec![
            ("the", vec![1.0, 0.0]),
            ("and", vec![0.0, 1.0]),
            ("growth", vec![0.5, 0.5]),
        ],
    )
    .unwrap();
    let t = DictionaryTokenizer::english();

    assert!(vectorize(&v, &t, "The and", "the AND the").is_none());
    // The same words count once stop-word filtering is off
    assert!(vectorize(&v, &DictionaryTokenizer::new(), "the and", "").is_some());
    assert_eq!(vectorize(&v, &t, "the growth", "").unwrap().tokens, strings(&["growth"]));
}

#[test]
fn synthetic_space_reports_its_width() {
    assert_eq!(space().dimensionality(), 3);
}
