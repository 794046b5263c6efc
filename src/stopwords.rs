use std::collections::HashSet;

use stop_words::{get, LANGUAGE};

/// Words that never become terms. Stored lowercase, matched case-insensitively.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Stopwords {
    words: HashSet<String>,
}

impl Stopwords {
    /// The English list shipped with the `stop-words` crate.
    pub fn english() -> Self {
        Self {
            words: get(LANGUAGE::English)
                .iter()
                .map(|word| word.to_lowercase())
                .collect(),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_list<S: AsRef<str>>(words: &[S]) -> Self {
        let mut stopwords = Self::empty();
        stopwords.extend(words);
        stopwords
    }

    /// Function words that jieba emits as standalone tokens.
    pub fn chinese() -> Self {
        Self::from_list(&[
            "的", "是", "在", "有", "和", "与", "或", "不", "了", "也", "就", "都", "而", "及",
            "这", "那", "个", "为", "以", "等", "但", "被", "给", "让", "把", "从", "到", "对",
            "将", "于", "能", "会", "可", "要", "很", "还", "更", "最", "只", "已", "又", "再",
            "一个", "我们", "他们", "你们", "自己", "什么", "没有", "因为", "所以", "这个",
        ])
    }

    pub fn with_words<S: AsRef<str>>(mut self, words: &[S]) -> Self {
        self.extend(words);
        self
    }

    pub fn extend<S: AsRef<str>>(&mut self, words: &[S]) {
        self.words.extend(
            words
                .iter()
                .map(|word| word.as_ref().trim().to_lowercase())
                .filter(|word| !word.is_empty()),
        );
    }

    pub fn merge(mut self, other: Stopwords) -> Self {
        self.words.extend(other.words);
        self
    }

    pub fn contains(&self, word: &str) -> bool {
        if self.words.contains(word) {
            return true;
        }
        let lower_case = word.to_lowercase();
        lower_case != word && self.words.contains(&lower_case)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
