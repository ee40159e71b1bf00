use indexmap::IndexMap;

/// Attribute name/value pairs of a service message, kept in insertion order.
///
/// Inserting an existing name replaces its value in place, so the position a
/// name was first seen at is the position it is written back at. Equality
/// ignores order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Attributes {
    pairs: IndexMap<String, String>,
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            pairs: IndexMap::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.pairs.contains_key(name)
    }

    /// Returns the previous value when `name` was already present.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.pairs.insert(name.into(), value.into())
    }

    /// Remove `name`, keeping the order of the rest.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.pairs.shift_remove(name)
    }

    pub fn extend<I, K, V>(&mut self, iter: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let iter = iter.into_iter();
        self.pairs.reserve(iter.size_hint().0);
        for (name, value) in iter {
            self.insert(name, value);
        }
    }

    pub fn clear(&mut self) {
        self.pairs.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.pairs.keys().map(String::as_str)
    }
}

impl<K, V> FromIterator<(K, V)> for Attributes
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut attributes = Attributes::new();
        attributes.extend(iter);
        attributes
    }
}

impl IntoIterator for Attributes {
    type Item = (String, String);
    type IntoIter = indexmap::map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.pairs.into_iter()
    }
}

impl<'a> IntoIterator for &'a Attributes {
    type Item = (&'a str, &'a str);
    type IntoIter = std::iter::Map<
        indexmap::map::Iter<'a, String, String>,
        fn((&'a String, &'a String)) -> (&'a str, &'a str),
    >;

    fn into_iter(self) -> Self::IntoIter {
        let as_refs: fn((&'a String, &'a String)) -> (&'a str, &'a str) =
            |(n, v)| (n.as_str(), v.as_str());
        self.pairs.iter().map(as_refs)
    }
}

#[cfg(test)]
mod tests {
    use super::Attributes;

    #[test]
    fn insert_keeps_first_position() {
        let mut attrs = Attributes::new();
        attrs.insert("a", "1");
        attrs.insert("b", "2");
        assert_eq!(attrs.insert("a", "3"), Some("1".to_string()));

        let pairs: Vec<_> = attrs.iter().collect();
        assert_eq!(pairs, vec![("a", "3"), ("b", "2")]);
    }

    #[test]
    fn remove() {
        let mut attrs: Attributes = [("a", "1"), ("b", "2"), ("c", "3")].into_iter().collect();
        assert_eq!(attrs.remove("b").as_deref(), Some("2"));
        assert_eq!(attrs.remove("b"), None);
        assert_eq!(attrs.names().collect::<Vec<_>>(), vec!["a", "c"]);
    }

    #[test]
    fn equality_ignores_order() {
        let a: Attributes = [("x", "1"), ("y", "2")].into_iter().collect();
        let b: Attributes = [("y", "2"), ("x", "1")].into_iter().collect();
        let c: Attributes = [("y", "2")].into_iter().collect();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn owned_iteration_keeps_order() {
        let attrs: Attributes = [("b", "1"), ("a", "2"), ("b", "3")].into_iter().collect();
        let pairs: Vec<(String, String)> = attrs.into_iter().collect();
        assert_eq!(
            pairs,
            vec![
                ("b".to_string(), "3".to_string()),
                ("a".to_string(), "2".to_string()),
            ]
        );
    }

    #[test]
    fn many_names() {
        let attrs: Attributes = (0..10_000).map(|i| (format!("n{i}"), i.to_string())).collect();
        assert_eq!(attrs.len(), 10_000);
        assert_eq!(attrs.get("n9999"), Some("9999"));
        assert_eq!(attrs.names().nth(42), Some("n42"));
    }
}
