use std::cmp::Ordering;

/// A (search key, token) association submitted to the index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pair {
    pub value: String,
    pub token: String,
}

impl Pair {
    pub fn new(value: impl Into<String>, token: impl Into<String>) -> Self {
        Self { value: value.into(), token: token.into() }
    }

    /// Byte-order comparison of the search keys; tokens are ignored.
    pub fn cmp_key(&self, other: &Pair) -> Ordering {
        self.value.as_str().cmp(other.value.as_str())
    }

    pub fn precedes(&self, other: &Pair) -> bool {
        self.cmp_key(other) == Ordering::Less
    }

    pub fn same_key(&self, other: &Pair) -> bool {
        self.value == other.value
    }
}

/// One distinct search key and every token recorded under it, in insertion order.
#[derive(Debug)]
pub struct Node {
    pub(crate) left: Option<Box<Node>>,
    pub(crate) right: Option<Box<Node>>,
    pub(crate) value: String,
    pub(crate) tokens: Vec<String>,
}

impl Node {
    pub fn from_pair(pair: Pair) -> Self {
        let mut node = Self {
            left: None,
            right: None,
            value: pair.value.clone(),
            tokens: Vec::new(),
        };
        node.insert_pair(pair);
        node
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Append the pair's token.
    ///
    /// # Panics
    ///
    /// If the pair's value differs from this node's key. Routing a pair to the
    /// wrong node is a caller bug and would corrupt the index.
    pub fn insert_pair(&mut self, pair: Pair) {
        assert!(
            self.value == pair.value,
            "cannot insert pair {:?} into node {:?}: values differ",
            pair.value,
            self.value
        );
        self.tokens.push(pair.token);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_pair_records_key_and_token() {
        let n = Node::from_pair(Pair::new("hello", "world"));
        assert_eq!(n.value(), "hello");
        assert_eq!(n.tokens(), ["world"]);
        assert!(n.left.is_none() && n.right.is_none());
    }

    #[test]
    fn insert_pair_keeps_duplicates_in_order() {
        let mut node = Node::from_pair(Pair::new("hello", "doc1"));
        node.insert_pair(Pair::new("hello", "doc2"));
        node.insert_pair(Pair::new("hello", "doc1"));
        assert_eq!(node.tokens(), ["doc1", "doc2", "doc1"]);
    }

    #[test]
    #[should_panic(expected = "values differ")]
    fn insert_pair_rejects_foreign_key() {
        let mut node = Node::from_pair(Pair::new("hello", "doc1"));
        node.insert_pair(Pair::new("help", "doc2"));
    }

    #[test]
    fn pair_ordering_is_by_key_bytes() {
        let mut p1 = Pair::new("abc", "");
        let mut p2 = Pair::new("bcd", "");
        assert!(p1.precedes(&p2));
        assert!(!p1.same_key(&p2));

        p2.value = "abb".into();
        assert!(!p1.precedes(&p2));

        p1.value = "abd".into();
        p2.value = "abd".into();
        assert!(!p1.precedes(&p2));
        assert!(p1.same_key(&p2));

        // Uppercase sorts before lowercase; no case folding happens here.
        assert!(Pair::new("Zebra", "").precedes(&Pair::new("apple", "")));
    }
}
