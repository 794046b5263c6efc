use std::collections::BTreeMap;

use jieba_rs::Jieba;
use regex::Regex;

use crate::error::ConfigError;
use crate::stopwords::Stopwords;

pub struct Tokenizer {
    //分词正则
    regex: Regex,
    jieba: Option<Jieba>,
    pub stopwords: Stopwords,
    pub min_term_length: usize,
    pub exclude_numbers: bool,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Tokenizer::new(Stopwords::english())
    }
}

impl Tokenizer {
    pub fn new(stopwords: Stopwords) -> Self {
        let regex = Regex::new(r"[\p{L}\p{N}]+").expect("Unable to compile tokenization regex");

        Tokenizer {
            regex,
            jieba: None,
            stopwords,
            min_term_length: 2,
            exclude_numbers: false,
        }
    }

    pub fn with_stopwords(mut self, stopwords: Stopwords) -> Self {
        self.stopwords = stopwords;
        self
    }

    pub fn with_min_term_length(mut self, size: usize) -> Self {
        self.min_term_length = size;
        self
    }

    pub fn with_exclude_numbers(mut self, value: bool) -> Self {
        self.exclude_numbers = value;
        self
    }

    /// Cut runs of Han characters into words with jieba instead of keeping
    /// each run as a single token.
    pub fn with_cjk_segmentation(mut self, value: bool) -> Self {
        self.jieba = match (value, self.jieba.take()) {
            (true, Some(jieba)) => Some(jieba),
            (true, None) => Some(Jieba::new()),
            (false, _) => None,
        };
        self
    }

    /// Adds a word to the segmentation dictionary, enabling segmentation if needed.
    pub fn with_word(mut self, word: &str) -> Self {
        self.jieba
            .get_or_insert_with(Jieba::new)
            .add_word(word, None, None);
        self
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.min_term_length == 0 {
            return Err(ConfigError::ZeroMinTermLength);
        }
        Ok(())
    }

    /// Splits a document into its terms, in document order. Repeated terms
    /// are kept, so the result is the document's term multiset.
    pub fn tokenize(&self, document: &str) -> Vec<String> {
        let mut terms = Vec::new();

        for token in self.regex.find_iter(document).map(|mat| mat.as_str()) {
            match &self.jieba {
                Some(jieba) if token.chars().any(is_han) => {
                    for word in jieba.cut(token, false) {
                        self.push_term(word, &mut terms);
                    }
                }
                _ => self.push_term(token, &mut terms),
            }
        }

        terms
    }

    /// Occurrence count per term, keyed in lexicographic order.
    pub fn term_counts(&self, document: &str) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for term in self.tokenize(document) {
            *counts.entry(term).or_insert(0) += 1;
        }
        counts
    }

    fn push_term(&self, token: &str, terms: &mut Vec<String>) {
        if token.chars().count() < self.min_term_length {
            return;
        }
        if self.exclude_numbers && token.chars().all(char::is_numeric) {
            return;
        }

        let term = token.to_lowercase();
        if !self.stopwords.contains(&term) {
            terms.push(term);
        }
    }
}

fn is_han(c: char) -> bool {
    matches!(c as u32,
        0x3400..=0x4DBF | 0x4E00..=0x9FFF | 0xF900..=0xFAFF | 0x20000..=0x2A6DF)
}

#[cfg(test)]
mod tests {
    use super::Tokenizer;
    use crate::stopwords::Stopwords;

    fn plain() -> Tokenizer {
        Tokenizer::new(Stopwords::empty())
    }

    #[test]
    fn lowercases_and_splits_on_punctuation() {
        let terms = plain().tokenize("Silver PRICE, rises!!! #silver_price");
        assert_eq!(terms, vec!["silver", "price", "rises", "silver", "price"]);
    }

    #[test]
    fn drops_short_tokens_and_stopwords() {
        let tokenizer = Tokenizer::new(Stopwords::from_list(&["the"]));
        let terms = tokenizer.tokenize("The a I gold is up");
        assert_eq!(terms, vec!["gold", "is", "up"]);
    }

    #[test]
    fn empty_document_has_no_terms() {
        assert!(plain().tokenize("").is_empty());
        assert!(plain().tokenize("  ... !! ").is_empty());
    }

    #[test]
    fn numbers_are_kept_unless_excluded() {
        assert_eq!(plain().tokenize("gold 2024"), vec!["gold", "2024"]);
        let tokenizer = plain().with_exclude_numbers(true);
        assert_eq!(tokenizer.tokenize("gold 2024"), vec!["gold"]);
    }

    #[test]
    fn min_term_length_counts_chars_not_bytes() {
        let tokenizer = plain().with_min_term_length(3);
        assert_eq!(tokenizer.tokenize("über ab café"), vec!["über", "café"]);
    }

    #[test]
    fn term_counts_are_keyed_lexicographically() {
        let counts = plain().term_counts("silver gold silver");
        let keys: Vec<_> = counts.keys().cloned().collect();
        assert_eq!(keys, vec!["gold", "silver"]);
        assert_eq!(counts["silver"], 2);
    }

    #[test]
    fn zero_min_length_is_rejected() {
        assert!(plain().with_min_term_length(0).validate().is_err());
        assert!(plain().validate().is_ok());
    }

    #[test]
    fn segments_han_runs_with_jieba() {
        let tokenizer = plain().with_cjk_segmentation(true);
        let terms = tokenizer.tokenize("我们中出了一个叛徒");
        assert!(terms.contains(&"叛徒".to_string()));
        assert!(terms.iter().all(|term| term.chars().count() >= 2));
    }

    #[test]
    fn custom_words_stay_whole() {
        let tokenizer = plain().with_word("悟空传");
        assert!(tokenizer.tokenize("我喜欢悟空传").contains(&"悟空传".to_string()));
    }
}
