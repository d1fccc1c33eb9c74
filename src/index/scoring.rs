/// Scoring functions for text search

/// BM25 parameters
pub const BM25_K1: f32 = 1.2;
pub const BM25_B: f32 = 0.75;

/// Weight of a prefix expansion that is longer than the prefix itself
pub const PREFIX_EXPANSION_WEIGHT: f32 = 0.5;

/// Compute BM25 score for a term in a document field
///
/// # Arguments
/// * `tf` - Term frequency in the field
/// * `df` - Document frequency (how many documents contain the term in this field)
/// * `total_docs` - Total number of documents in the index
/// * `doc_len` - Length of the field (in tokens)
/// * `avg_doc_len` - Average length of this field across documents
///
/// # Returns
/// BM25 relevance score
pub fn bm25_score(tf: f32, df: f32, total_docs: f32, doc_len: f32, avg_doc_len: f32) -> f32 {
    // Inverse document frequency
    let idf = ((total_docs - df + 0.5) / (df + 0.5) + 1.0).ln();

    // Length normalization
    let avg = if avg_doc_len > 0.0 { avg_doc_len } else { 1.0 };
    let norm = 1.0 - BM25_B + BM25_B * (doc_len / avg);

    idf * (tf * (BM25_K1 + 1.0)) / (tf + BM25_K1 * norm)
}

/// Weight of an index term reached through fuzzy expansion at `distance`
pub fn fuzzy_weight(distance: u32) -> f32 {
    1.0 / (1.0 + distance as f32)
}

/// Weight of an index term reached through prefix expansion
pub fn prefix_weight(prefix: &str, term: &str) -> f32 {
    if term == prefix {
        1.0
    } else {
        PREFIX_EXPANSION_WEIGHT
    }
}
