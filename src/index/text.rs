//! Ranked full-text index over the searchable fields

use ordered_float::OrderedFloat;
use roaring::RoaringBitmap;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, trace};

use super::fuzzy::within_distance;
use super::postings::PostingList;
use super::scoring::{bm25_score, fuzzy_weight, prefix_weight};
use crate::config::IndexSettings;
use crate::models::{DocNo, Entry};
use crate::query::{self, Clause, ClauseKind, Occur};
use crate::store::normalize::value_leaves;
use crate::store::EntryStore;
use crate::tokenizer::Tokenizer;

/// A ranked document
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScoredDoc {
    pub docno: DocNo,
    pub score: f32,
}

/// Ranked hits plus the fields positive clauses matched in
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TextSearchResult {
    pub hits: Vec<ScoredDoc>,
    pub matched_fields: Vec<String>,
}

impl TextSearchResult {
    pub fn docnos(&self) -> impl Iterator<Item = DocNo> + '_ {
        self.hits.iter().map(|h| h.docno)
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }
}

/// Inverted index of a single field
#[derive(Debug)]
struct FieldIndex {
    name: String,
    terms: BTreeMap<String, PostingList>,
    doc_lengths: HashMap<DocNo, u32>,
    total_length: u64,
}

impl FieldIndex {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            terms: BTreeMap::new(),
            doc_lengths: HashMap::new(),
            total_length: 0,
        }
    }

    fn add(&mut self, docno: DocNo, positions: HashMap<String, Vec<u32>>) {
        let length: u32 = positions.values().map(|p| p.len() as u32).sum();
        if length == 0 {
            return;
        }

        if let Some(old) = self.doc_lengths.insert(docno, length) {
            self.total_length -= old as u64;
        }
        self.total_length += length as u64;

        for (term, term_positions) in positions {
            self.terms
                .entry(term)
                .or_default()
                .add_document(docno, term_positions);
        }
    }

    fn doc_length(&self, docno: DocNo) -> f32 {
        self.doc_lengths.get(&docno).copied().unwrap_or(0) as f32
    }

    fn avg_length(&self) -> f32 {
        if self.doc_lengths.is_empty() {
            0.0
        } else {
            self.total_length as f32 / self.doc_lengths.len() as f32
        }
    }
}

/// Accumulates field postings during ingestion
pub struct TextIndexBuilder {
    tokenizer: Tokenizer,
    fields: Vec<FieldIndex>,
    docs: RoaringBitmap,
    settings: IndexSettings,
}

impl TextIndexBuilder {
    pub fn new(settings: &IndexSettings) -> Self {
        Self {
            tokenizer: Tokenizer::new(&settings.tokenizer_config),
            fields: settings
                .searchable_fields
                .iter()
                .map(|f| FieldIndex::new(f))
                .collect(),
            docs: RoaringBitmap::new(),
            settings: settings.clone(),
        }
    }

    /// Analyze and post the searchable fields of one entry
    ///
    /// Each leaf of a list or map value is tokenized on its own, so a
    /// phrase never spans two elements.
    ///
    /// Adding a docno again posts the new content alongside whatever was
    /// posted for it before; nothing is retracted. A term present in both
    /// versions takes the new positions while terms only in the old version
    /// keep theirs, so a phrase may match words drawn from both.
    pub fn add(&mut self, docno: DocNo, entry: &Entry) {
        for field in &mut self.fields {
            if let Some(value) = entry.get(&field.name) {
                let leaves = value_leaves(value);
                field.add(docno, self.tokenizer.tokenize_values_with_positions(&leaves));
            }
        }
        self.docs.insert(docno);
    }

    pub fn build(self) -> TextIndex {
        TextIndex {
            tokenizer: self.tokenizer,
            fields: self.fields,
            docs: self.docs,
            settings: self.settings,
        }
    }
}

/// How one analyzed query term is matched against a field's terms
#[derive(Debug)]
enum Matcher {
    Exact(String),
    Prefix(String),
    Fuzzy(String, u32),
    /// Terms with their offsets relative to the first one
    Phrase(Vec<(String, u32)>),
}

/// A query clause after analysis, bound to concrete fields
#[derive(Debug)]
struct CompiledClause {
    occur: Occur,
    boost: f32,
    fields: Vec<usize>,
    matcher: Matcher,
}

/// Documents and scores one compiled clause produced
struct ClauseMatch {
    docs: RoaringBitmap,
    field_docs: Vec<(usize, RoaringBitmap)>,
    scores: HashMap<DocNo, f32>,
}

/// Ranked full-text index
pub struct TextIndex {
    tokenizer: Tokenizer,
    fields: Vec<FieldIndex>,
    docs: RoaringBitmap,
    settings: IndexSettings,
}

impl TextIndex {
    /// Index every record currently held by a store
    pub fn build(store: &EntryStore, settings: &IndexSettings) -> Self {
        let mut builder = TextIndexBuilder::new(settings);
        for (docno, entry) in store.iter_docs() {
            builder.add(docno, entry);
        }
        builder.build()
    }

    /// Number of indexed documents
    pub fn doc_count(&self) -> u64 {
        self.docs.len()
    }

    /// Number of distinct terms across all fields
    pub fn term_count(&self) -> usize {
        self.fields.iter().map(|f| f.terms.len()).sum()
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    /// Run a query string and return ranked hits
    ///
    /// Never fails: syntax the parser does not understand degrades to plain
    /// terms, and a query that analyzes to nothing returns no hits.
    pub fn search(&self, query_str: &str) -> TextSearchResult {
        let parsed = query::parse(query_str);
        let clauses: Vec<CompiledClause> = parsed
            .clauses
            .iter()
            .flat_map(|c| self.compile(c))
            .collect();

        if clauses.is_empty() {
            debug!(query = query_str, "query has no searchable terms");
            return TextSearchResult::default();
        }
        trace!(clauses = ?clauses, "compiled query");

        let matches: Vec<ClauseMatch> = clauses.iter().map(|c| self.evaluate(c)).collect();

        let has_required = clauses.iter().any(|c| c.occur == Occur::Must);
        let has_optional = clauses.iter().any(|c| c.occur == Occur::Should);

        let mut candidates = if has_required {
            let mut required = clauses
                .iter()
                .zip(&matches)
                .filter(|(c, _)| c.occur == Occur::Must)
                .map(|(_, m)| &m.docs);
            let mut acc = required.next().cloned().unwrap_or_default();
            for docs in required {
                acc &= docs;
            }
            acc
        } else if has_optional {
            let mut acc = RoaringBitmap::new();
            for (_, m) in clauses
                .iter()
                .zip(&matches)
                .filter(|(c, _)| c.occur == Occur::Should)
            {
                acc |= &m.docs;
            }
            acc
        } else {
            self.docs.clone()
        };

        for (_, m) in clauses
            .iter()
            .zip(&matches)
            .filter(|(c, _)| c.occur == Occur::MustNot)
        {
            candidates -= &m.docs;
        }

        let mut hits: Vec<ScoredDoc> = candidates
            .iter()
            .map(|docno| {
                let score = clauses
                    .iter()
                    .zip(&matches)
                    .filter(|(c, _)| c.occur != Occur::MustNot)
                    .filter_map(|(_, m)| m.scores.get(&docno))
                    .sum();
                ScoredDoc { docno, score }
            })
            .collect();

        hits.sort_by(|a, b| {
            OrderedFloat(b.score)
                .cmp(&OrderedFloat(a.score))
                .then_with(|| a.docno.cmp(&b.docno))
        });

        let matched_fields = self.attribute_fields(&clauses, &matches, &candidates);

        debug!(
            query = query_str,
            clauses = clauses.len(),
            hits = hits.len(),
            "text search"
        );

        TextSearchResult {
            hits,
            matched_fields,
        }
    }

    /// Fields, in index order, where a positive clause matched a returned hit
    fn attribute_fields(
        &self,
        clauses: &[CompiledClause],
        matches: &[ClauseMatch],
        hits: &RoaringBitmap,
    ) -> Vec<String> {
        let mut matched = vec![false; self.fields.len()];
        for (clause, m) in clauses.iter().zip(matches) {
            if clause.occur == Occur::MustNot {
                continue;
            }
            for (idx, docs) in &m.field_docs {
                if !docs.is_disjoint(hits) {
                    matched[*idx] = true;
                }
            }
        }

        self.fields
            .iter()
            .zip(matched)
            .filter(|(_, m)| *m)
            .map(|(f, _)| f.name.clone())
            .collect()
    }

    /// Analyze a parsed clause into one compiled clause per query term
    fn compile(&self, clause: &Clause) -> Vec<CompiledClause> {
        let fields = self.resolve_fields(clause.field.as_deref());

        let matchers: Vec<Matcher> = match &clause.kind {
            ClauseKind::Term(text) => self
                .tokenizer
                .tokenize(text)
                .into_iter()
                .map(Matcher::Exact)
                .collect(),
            ClauseKind::Prefix(text) => {
                self.compile_last_word(text, Matcher::Prefix)
            }
            ClauseKind::Fuzzy { term, distance } => {
                let distance = self.settings.fuzzy_distance(*distance);
                self.compile_last_word(term, |word| Matcher::Fuzzy(word, distance))
            }
            ClauseKind::Phrase(text) => {
                let tokens = self.tokenizer.tokenize_with_positions_ordered(text);
                match tokens.len() {
                    0 => Vec::new(),
                    1 => tokens
                        .into_iter()
                        .map(|(term, _)| Matcher::Exact(term))
                        .collect(),
                    _ => {
                        let first = tokens[0].1;
                        vec![Matcher::Phrase(
                            tokens
                                .into_iter()
                                .map(|(term, pos)| (term, pos - first))
                                .collect(),
                        )]
                    }
                }
            }
        };

        matchers
            .into_iter()
            .map(|matcher| CompiledClause {
                occur: clause.occur,
                boost: clause.boost,
                fields: fields.clone(),
                matcher,
            })
            .collect()
    }

    /// Leading words match exactly; the last word gets the clause operator
    fn compile_last_word<F>(&self, text: &str, last: F) -> Vec<Matcher>
    where
        F: FnOnce(String) -> Matcher,
    {
        let mut words = self.tokenizer.split_words(text);
        let Some(tail) = words.pop() else {
            return Vec::new();
        };

        let mut matchers: Vec<Matcher> = words
            .iter()
            .filter_map(|w| self.tokenizer.normalize_word(w))
            .map(Matcher::Exact)
            .collect();
        matchers.push(last(tail));
        matchers
    }

    /// Field indexes a clause searches; an unknown qualifier means all fields
    fn resolve_fields(&self, qualifier: Option<&str>) -> Vec<usize> {
        if let Some(name) = qualifier {
            if let Some(idx) = self
                .fields
                .iter()
                .position(|f| f.name.eq_ignore_ascii_case(name))
            {
                return vec![idx];
            }
        }
        (0..self.fields.len()).collect()
    }

    fn evaluate(&self, clause: &CompiledClause) -> ClauseMatch {
        let total_docs = self.docs.len() as f32;
        let mut result = ClauseMatch {
            docs: RoaringBitmap::new(),
            field_docs: Vec::new(),
            scores: HashMap::new(),
        };

        for &idx in &clause.fields {
            let field = &self.fields[idx];
            let avg_len = field.avg_length();
            let mut field_docs = RoaringBitmap::new();

            let score_term = |list: &PostingList, docno: DocNo, weight: f32| -> f32 {
                let tf = list.get(docno).map(|p| p.frequency).unwrap_or(0) as f32;
                bm25_score(
                    tf,
                    list.document_frequency() as f32,
                    total_docs,
                    field.doc_length(docno),
                    avg_len,
                ) * weight
                    * clause.boost
            };

            match &clause.matcher {
                Matcher::Phrase(terms) => {
                    let lists: Option<Vec<&PostingList>> =
                        terms.iter().map(|(t, _)| field.terms.get(t)).collect();
                    if let Some(lists) = lists {
                        for (docno, _) in lists[0].iter() {
                            if !phrase_matches(terms, &lists, docno) {
                                continue;
                            }
                            let score: f32 =
                                lists.iter().map(|l| score_term(l, docno, 1.0)).sum();
                            field_docs.insert(docno);
                            *result.scores.entry(docno).or_insert(0.0) += score;
                        }
                    }
                }
                matcher => {
                    for (list, weight) in expand(field, matcher) {
                        for (docno, _) in list.iter() {
                            let score = score_term(list, docno, weight);
                            field_docs.insert(docno);
                            *result.scores.entry(docno).or_insert(0.0) += score;
                        }
                    }
                }
            }

            if !field_docs.is_empty() {
                result.docs |= &field_docs;
                result.field_docs.push((idx, field_docs));
            }
        }

        result
    }
}

/// Index terms a single-term matcher reaches, with their expansion weights
fn expand<'a>(field: &'a FieldIndex, matcher: &Matcher) -> Vec<(&'a PostingList, f32)> {
    match matcher {
        Matcher::Exact(term) => field
            .terms
            .get(term)
            .map(|list| vec![(list, 1.0)])
            .unwrap_or_default(),
        Matcher::Prefix(prefix) => field
            .terms
            .range(prefix.clone()..)
            .take_while(|(term, _)| term.starts_with(prefix.as_str()))
            .map(|(term, list)| (list, prefix_weight(prefix, term)))
            .collect(),
        Matcher::Fuzzy(word, distance) => field
            .terms
            .iter()
            .filter_map(|(term, list)| {
                within_distance(word, term, *distance).map(|d| (list, fuzzy_weight(d)))
            })
            .collect(),
        Matcher::Phrase(_) => Vec::new(),
    }
}

/// True if every phrase term occurs at its offset from some start position
fn phrase_matches(terms: &[(String, u32)], lists: &[&PostingList], docno: DocNo) -> bool {
    let postings: Option<Vec<_>> = lists.iter().map(|l| l.get(docno)).collect();
    let Some(postings) = postings else {
        return false;
    };

    postings[0].positions.iter().any(|&start| {
        terms
            .iter()
            .zip(&postings)
            .all(|((_, offset), posting)| posting.positions.binary_search(&(start + offset)).is_ok())
    })
}
