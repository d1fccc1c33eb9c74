//! Integration tests for the text query language
//!
//! Tests end-to-end query execution from parsing through to results.

use serde_json::json;

use catalog_index::{Entry, Filters, IndexSettings, QueryEngine, TokenizerConfig};

fn setup_test_index() -> QueryEngine {
    let docs = vec![
        json!({"id": "d1", "name": "llama chat", "tags": ["text generation", "chat"], "license": "llama2"}),
        json!({"id": "d2", "name": "mistral", "tags": ["text generation"], "license": "apache"}),
        json!({"id": "d3", "name": "bert-base", "tags": ["embeddings", "nlp"], "license": "apache"}),
        json!({"id": "d4", "name": "whisper", "tags": ["audio", "speech"], "license": "mit"}),
        json!({"id": "d5", "name": "tinyllama", "tags": ["chat", "generation text"], "license": "apache"}),
    ];
    let entries: Vec<Entry> = docs
        .into_iter()
        .map(|d| Entry::try_from(d).unwrap())
        .collect();

    let mut engine = QueryEngine::with_defaults(entries).unwrap();
    engine.register_filters(["tags", "license"]);
    engine
}

fn ids(engine: &QueryEngine, query: &str) -> Vec<String> {
    engine
        .search(query)
        .unwrap()
        .ids()
        .into_iter()
        .map(String::from)
        .collect()
}

fn sorted_ids(engine: &QueryEngine, query: &str) -> Vec<String> {
    let mut found = ids(engine, query);
    found.sort();
    found
}

#[test]
fn test_term_query() {
    let engine = setup_test_index();
    assert_eq!(sorted_ids(&engine, "chat"), vec!["d1", "d5"]);
}

#[test]
fn test_optional_terms_or() {
    let engine = setup_test_index();
    assert_eq!(sorted_ids(&engine, "whisper mistral"), vec!["d2", "d4"]);
}

#[test]
fn test_required_terms() {
    let engine = setup_test_index();
    assert_eq!(ids(&engine, "+chat +llama"), vec!["d1"]);
    assert!(ids(&engine, "+chat +whisper").is_empty());
}

#[test]
fn test_prohibited_terms() {
    let engine = setup_test_index();
    assert_eq!(ids(&engine, "chat -tinyllama"), vec!["d1"]);
}

#[test]
fn test_negation_only_query() {
    let engine = setup_test_index();
    let results = engine.search("-chat").unwrap();
    assert_eq!(results.ids(), vec!["d2", "d3", "d4"]);
    assert!(results.hits.iter().all(|h| h.score == Some(0.0)));
}

#[test]
fn test_phrase_query() {
    let engine = setup_test_index();
    assert_eq!(sorted_ids(&engine, "\"text generation\""), vec!["d1", "d2"]);
    assert_eq!(sorted_ids(&engine, "text generation"), vec!["d1", "d2", "d5"]);
}

#[test]
fn test_phrase_stays_within_one_list_element() {
    let engine = setup_test_index();
    // d1 tags ["text generation", "chat"], d5 tags ["chat", "generation text"]
    assert!(ids(&engine, "\"generation chat\"").is_empty());
    assert!(ids(&engine, "\"chat generation\"").is_empty());
    assert_eq!(ids(&engine, "\"generation text\""), vec!["d5"]);
}

#[test]
fn test_prefix_query() {
    let engine = setup_test_index();
    assert_eq!(ids(&engine, "whis*"), vec!["d4"]);
    assert_eq!(sorted_ids(&engine, "emb*"), vec!["d3"]);
}

#[test]
fn test_prefix_is_not_infix() {
    let engine = setup_test_index();
    // "llama" occurs inside "tinyllama" but does not start it
    assert_eq!(ids(&engine, "llam*"), vec!["d1"]);
}

#[test]
fn test_fuzzy_query() {
    let engine = setup_test_index();
    assert_eq!(ids(&engine, "wisper~1"), vec!["d4"]);
    assert_eq!(ids(&engine, "wisper~"), vec!["d4"]);
    assert!(ids(&engine, "wispr~1").is_empty());
    assert_eq!(ids(&engine, "wispr~2"), vec!["d4"]);
}

#[test]
fn test_exact_match_outranks_fuzzy_match() {
    let settings = IndexSettings::default().with_tokenizer_config(TokenizerConfig::plain());
    let entries = vec![
        Entry::new().with("id", "x1").with("name", "mistral"),
        Entry::new().with("id", "x2").with("name", "mistrel"),
    ];
    let engine = QueryEngine::build(entries, settings).unwrap();

    let results = engine.search("mistral~1").unwrap();
    assert_eq!(results.ids(), vec!["x1", "x2"]);
    assert!(results.hits[0].score > results.hits[1].score);
}

#[test]
fn test_boost_changes_order() {
    let entries = vec![
        Entry::new().with("id", "x1").with("name", "llama"),
        Entry::new().with("id", "x2").with("name", "mistral"),
    ];
    let engine = QueryEngine::with_defaults(entries).unwrap();

    let even = engine.search("llama mistral").unwrap();
    assert_eq!(even.ids(), vec!["x1", "x2"]);
    assert_eq!(even.hits[0].score, even.hits[1].score);

    let boosted = engine.search("llama mistral^3").unwrap();
    assert_eq!(boosted.ids(), vec!["x2", "x1"]);
}

#[test]
fn test_field_qualifier() {
    let engine = setup_test_index();
    assert_eq!(sorted_ids(&engine, "chat"), vec!["d1", "d5"]);

    let results = engine.search("name:chat").unwrap();
    assert_eq!(results.ids(), vec!["d1"]);
    assert_eq!(results.matched_fields, vec!["name".to_string()]);
}

#[test]
fn test_field_attribution_in_field_order() {
    let engine = setup_test_index();
    let results = engine.search("chat").unwrap();
    assert_eq!(
        results.matched_fields,
        vec!["name".to_string(), "tags".to_string()]
    );

    let results = engine.search("apache").unwrap();
    assert_eq!(results.matched_fields, vec!["license".to_string()]);
}

#[test]
fn test_scoring_order() {
    let engine = setup_test_index();
    // d1 has "chat" in both name and tags, d5 only in tags
    let results = engine.search("chat").unwrap();
    assert_eq!(results.ids(), vec!["d1", "d5"]);
    assert!(results.hits[0].score > results.hits[1].score);
}

#[test]
fn test_no_results() {
    let engine = setup_test_index();
    assert!(engine.search("nonexistent").unwrap().is_empty());
    assert!(engine.search("!!!").unwrap().is_empty());
}

#[test]
fn test_malformed_queries_degrade() {
    let engine = setup_test_index();
    for query in ["(whisper", "whisper)", "\"whisper", "whisper AND", "color:whisper", ":whisper"] {
        assert_eq!(ids(&engine, query), vec!["d4"], "query {:?}", query);
    }
    for query in ["~", "^", "+", "-", "*", "\"", ":"] {
        let _ = engine.search(query).unwrap();
    }
}

#[test]
fn test_query_with_filters() {
    let engine = setup_test_index();
    let results = engine
        .get_filtered_data(Some("chat"), &Filters::new().with("license", "apache"))
        .unwrap();
    assert_eq!(results.ids(), vec!["d5"]);
    assert_eq!(
        results.matched_fields,
        vec!["name".to_string(), "tags".to_string()]
    );
}
