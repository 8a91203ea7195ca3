use serde::{Deserialize, Serialize};

/// A `{count, next, previous, results}` page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    #[serde(default)]
    pub count: Option<u64>,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
}

/// List endpoints answer either with a page envelope or a bare array,
/// depending on whether pagination is enabled server side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Paginated<T> {
    Page(Page<T>),
    List(Vec<T>),
}

impl<T> Paginated<T> {
    pub fn into_items(self) -> Vec<T> {
        match self {
            Paginated::Page(p) => p.results,
            Paginated::List(items) => items,
        }
    }

    pub fn items(&self) -> &[T] {
        match self {
            Paginated::Page(p) => &p.results,
            Paginated::List(items) => items,
        }
    }

    /// Server-side total when known, otherwise the local item count.
    pub fn total(&self) -> u64 {
        match self {
            Paginated::Page(p) => p.count.unwrap_or(p.results.len() as u64),
            Paginated::List(items) => items.len() as u64,
        }
    }

    pub fn has_next(&self) -> bool {
        matches!(self, Paginated::Page(Page { next: Some(_), .. }))
    }
}

impl<T> Default for Paginated<T> {
    fn default() -> Self {
        Paginated::List(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn both_shapes_deserialize() {
        let page: Paginated<u32> =
            serde_json::from_value(json!({"count": 5, "next": "http://x/?page=2", "previous": null, "results": [1, 2]}))
                .unwrap();
        assert_eq!(page.total(), 5);
        assert!(page.has_next());
        assert_eq!(page.into_items(), vec![1, 2]);

        let list: Paginated<u32> = serde_json::from_value(json!([3, 4, 5])).unwrap();
        assert_eq!(list.total(), 3);
        assert!(!list.has_next());
        assert_eq!(list.items(), &[3, 4, 5]);
    }

    #[test]
    fn envelope_without_results_is_empty() {
        let page: Paginated<u32> = serde_json::from_value(json!({"count": 0})).unwrap();
        assert!(page.into_items().is_empty());
    }
}
