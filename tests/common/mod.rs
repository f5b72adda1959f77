// Shared fixtures for integration tests

use std::collections::HashMap;

use wordcluster::core::{Embedding, TextItem};
use wordcluster::error::{GroupingError, Result};
use wordcluster::models::Embedder;

pub const DIM: usize = 8;

/// Fixed vectors: vegetables lean slightly off a shared axis, the apple
/// leans much further, so vegetables sit ~0.08 apart and ~0.29 from the apple.
pub struct TableEmbedder {
    table: HashMap<&'static str, Embedding>,
    pub calls: usize,
}

fn leaning(axis: usize, amount: f32) -> Embedding {
    let mut v = vec![0.0; DIM];
    v[0] = 1.0;
    v[axis] = amount;
    Embedding::new(v)
}

impl TableEmbedder {
    pub fn new() -> Self {
        let mut table = HashMap::new();
        for (axis, word) in ["大根", "人参", "野菜", "白菜", "キャベツ"].into_iter().enumerate() {
            table.insert(word, leaning(axis + 1, 0.3));
        }
        table.insert("りんご", leaning(DIM - 1, 0.9));
        Self { table, calls: 0 }
    }
}

impl Embedder for TableEmbedder {
    fn embed(&mut self, text: &str) -> Result<Embedding> {
        self.calls += 1;
        self.table
            .get(text)
            .cloned()
            .ok_or_else(|| GroupingError::embedding(format!("unknown word: {}", text)))
    }
}

pub fn snapshot(words: &[&str]) -> Vec<TextItem> {
    words
        .iter()
        .enumerate()
        .map(|(i, w)| TextItem::new((i + 1).to_string(), *w))
        .collect()
}

pub const WORDS: [&str; 6] = ["大根", "人参", "野菜", "白菜", "りんご", "キャベツ"];
