//! Path addressing into configuration trees.
//!
//! Paths are slash-delimited section names ending in a section or a value,
//! e.g. `/server/adapters/Demo.TcpAdapter/endpoint`. Empty segments are
//! ignored, so `/A/B`, `A/B/` and `//A//B` all address the same element.
//!
//! The last segment may use the bracket form `section<key>`, which is the
//! same as `section/key`. This reads naturally when the section name is
//! computed at runtime: `format!("/db/{host}<ip>")`.

use indexmap::IndexMap;

use crate::{Element, Error, Result};

/// Split `path` into the section and value names it addresses.
pub fn split_path(path: &str) -> Vec<String> {
    let mut segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    let mut tail = Vec::with_capacity(2);
    if let Some(last) = segments.pop() {
        let mut pair = last.split('<');
        match (pair.next(), pair.next(), pair.next()) {
            (Some(section), Some(key), None) => {
                tail.push(section);
                tail.push(key.trim_matches('>'));
            }
            _ => tail.push(last),
        }
    }

    segments
        .into_iter()
        .chain(tail)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Walk from `root` to the element addressed by `path`.
///
/// An empty path addresses `root` itself.
///
/// # Errors
///
/// Returns [`Error::NotFound`] naming the first segment that does not exist.
pub fn resolve<'t>(root: &'t Element, path: &str) -> Result<&'t Element> {
    let mut target = root;
    for segment in split_path(path) {
        target = match target.find_child(&segment) {
            Some(child) => child,
            None => {
                return Err(Error::NotFound {
                    segment,
                    path: path.to_string(),
                });
            }
        };
    }
    Ok(target)
}

/// The value stored at `path`; empty when the path names a section.
pub fn get_value(root: &Element, path: &str) -> Result<String> {
    resolve(root, path).map(|element| element.value().to_string())
}

/// Names of the sections directly under `path`, in document order.
pub fn get_domain(root: &Element, path: &str) -> Result<Vec<String>> {
    let target = resolve(root, path)?;
    Ok(target
        .children()
        .filter(|child| child.is_node())
        .map(|child| child.name().to_string())
        .collect())
}

/// The values directly under `path`, keyed by name.
///
/// Nested sections are not included. A missing path yields an empty map.
pub fn get_map(root: &Element, path: &str) -> IndexMap<String, String> {
    let Ok(target) = resolve(root, path) else {
        return IndexMap::new();
    };

    target
        .children()
        .filter(|child| child.is_leaf())
        .map(|child| (child.name().to_string(), child.value().to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    fn sample() -> Element {
        parse(
            "<A>
                k=v
                n=1
                <B>
                    x=1
                    y=2
                    <C>deep=1</C>
                </B>
                <host1>Ip=10.0.0.1</host1>
            </A>",
        )
        .unwrap()
    }

    #[test]
    fn test_split_plain_path() {
        assert_eq!(split_path("/A/B/C"), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_split_drops_empty_segments() {
        assert_eq!(split_path("//A///B/"), vec!["A", "B"]);
        assert_eq!(split_path("A/B"), vec!["A", "B"]);
        assert!(split_path("").is_empty());
        assert!(split_path("/").is_empty());
    }

    #[test]
    fn test_split_bracket_suffix() {
        assert_eq!(split_path("/A/B<Ip>"), vec!["A", "B", "Ip"]);
        assert_eq!(split_path("/A/<Ip>"), vec!["A", "Ip"]);
        assert_eq!(split_path("/A/B<Ip>/"), vec!["A", "B", "Ip"]);
    }

    #[test]
    fn test_split_bracket_only_in_last_segment() {
        assert_eq!(split_path("/A<x>/B"), vec!["A<x>", "B"]);
    }

    #[test]
    fn test_split_more_than_one_bracket_is_literal() {
        assert_eq!(split_path("/A/B<x<y>"), vec!["A", "B<x<y>"]);
    }

    #[test]
    fn test_resolve_root() {
        let root = sample();
        assert_eq!(resolve(&root, "/").unwrap().name(), "root");
        assert_eq!(resolve(&root, "").unwrap().name(), "root");
    }

    #[test]
    fn test_resolve_missing_reports_segment() {
        let root = sample();
        match resolve(&root, "/A/missing/k") {
            Err(Error::NotFound { segment, path }) => {
                assert_eq!(segment, "missing");
                assert_eq!(path, "/A/missing/k");
            }
            other => panic!("expected NotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_resolve_is_case_sensitive() {
        let root = sample();
        assert!(resolve(&root, "/a/b").is_err());
    }

    #[test]
    fn test_get_value() {
        let root = sample();
        assert_eq!(get_value(&root, "/A/k").unwrap(), "v");
        assert_eq!(get_value(&root, "/A/B/y").unwrap(), "2");
        // Sections carry no value.
        assert_eq!(get_value(&root, "/A/B").unwrap(), "");
        assert!(get_value(&root, "/A/zzz").unwrap_err().is_lookup());
    }

    #[test]
    fn test_bracket_matches_slash_form() {
        let root = sample();
        assert_eq!(
            get_value(&root, "/A/host1<Ip>").unwrap(),
            get_value(&root, "/A/host1/Ip").unwrap()
        );
        assert_eq!(get_value(&root, "/A/host1<Ip>").unwrap(), "10.0.0.1");
    }

    #[test]
    fn test_get_domain_lists_sections_only() {
        let root = sample();
        assert_eq!(get_domain(&root, "/A").unwrap(), vec!["B", "host1"]);
        assert_eq!(get_domain(&root, "/").unwrap(), vec!["A"]);
        assert!(get_domain(&root, "/A/B/C").unwrap().is_empty());
    }

    #[test]
    fn test_get_domain_missing_path_fails() {
        let root = sample();
        assert!(get_domain(&root, "/nope").unwrap_err().is_lookup());
    }

    #[test]
    fn test_get_map_is_shallow() {
        let root = sample();
        let map = get_map(&root, "/A/B");
        assert_eq!(map.len(), 2);
        assert_eq!(map.get("x").map(String::as_str), Some("1"));
        assert_eq!(map.get("y").map(String::as_str), Some("2"));
        assert!(!map.contains_key("C"));
        assert!(!map.contains_key("deep"));
        assert!(!map.contains_key("k"));
    }

    #[test]
    fn test_get_map_missing_path_is_empty() {
        let root = sample();
        assert!(get_map(&root, "/A/nope").is_empty());
    }
}
