use roaring::RoaringBitmap;
use std::collections::BTreeMap;

use crate::models::DocNo;

/// Occurrences of one term in one document field
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Posting {
    pub frequency: u32,
    pub positions: Vec<u32>,
}

/// Inverted index entry: every document a term occurs in, ordered by docno
#[derive(Clone, Debug, Default)]
pub struct PostingList {
    postings: BTreeMap<DocNo, Posting>,
}

impl PostingList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record positions of the term in a document
    ///
    /// Adding the same docno again replaces its posting. Other terms of that
    /// docno are untouched, so their positions may come from an older version
    /// of the document.
    pub fn add_document(&mut self, docno: DocNo, positions: Vec<u32>) {
        let posting = Posting {
            frequency: positions.len() as u32,
            positions,
        };
        self.postings.insert(docno, posting);
    }

    pub fn get(&self, docno: DocNo) -> Option<&Posting> {
        self.postings.get(&docno)
    }

    pub fn iter(&self) -> impl Iterator<Item = (DocNo, &Posting)> {
        self.postings.iter().map(|(d, p)| (*d, p))
    }

    /// Documents containing the term
    pub fn docs(&self) -> RoaringBitmap {
        self.postings.keys().copied().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.postings.is_empty()
    }

    /// Number of documents containing this term
    pub fn document_frequency(&self) -> usize {
        self.postings.len()
    }
}
