use std::collections::HashMap;

use async_graphql::parser::types::{DocumentOperations, ExecutableDocument, Selection, SelectionSet};
use async_graphql::{Name, Value};

/// Reorders every object in `data` so its keys follow the order in which the
/// operation selected them. Root fields complete concurrently and arrive in
/// completion order.
pub fn restore_selection_order(
    data: &mut Value,
    document: &ExecutableDocument,
    operation_name: Option<&str>,
) {
    let operation = match &document.operations {
        DocumentOperations::Single(operation) => operation,
        DocumentOperations::Multiple(operations) => {
            let found = match operation_name {
                Some(name) => operations.get(name),
                None if operations.len() == 1 => operations.values().next(),
                None => None,
            };
            match found {
                Some(operation) => operation,
                None => return,
            }
        }
    };
    reorder(data, &[&operation.node.selection_set.node], document);
}

fn reorder<'d>(value: &mut Value, sets: &[&'d SelectionSet], document: &'d ExecutableDocument) {
    match value {
        Value::List(items) => {
            for item in items {
                reorder(item, sets, document);
            }
        }
        Value::Object(map) => {
            let mut keys = Vec::new();
            let mut children = HashMap::new();
            for set in sets {
                collect_keys(set, document, &mut keys, &mut children);
            }

            map.sort_by(|a, _, b, _| rank(&keys, a).cmp(&rank(&keys, b)));
            for (key, child) in map.iter_mut() {
                if let Some(child_sets) = children.get(key.as_str()) {
                    reorder(child, child_sets, document);
                }
            }
        }
        _ => {}
    }
}

/// Response keys of `set` in first-seen order, with the sub-selections
/// merged under each key. Fragments are flattened in place.
fn collect_keys<'d>(
    set: &'d SelectionSet,
    document: &'d ExecutableDocument,
    keys: &mut Vec<&'d str>,
    children: &mut HashMap<&'d str, Vec<&'d SelectionSet>>,
) {
    for selection in &set.items {
        match &selection.node {
            Selection::Field(field) => {
                let key = field.node.response_key().node.as_str();
                if !children.contains_key(key) {
                    keys.push(key);
                }
                children
                    .entry(key)
                    .or_default()
                    .push(&field.node.selection_set.node);
            }
            Selection::FragmentSpread(spread) => {
                if let Some(fragment) = document.fragments.get(&spread.node.fragment_name.node) {
                    collect_keys(&fragment.node.selection_set.node, document, keys, children);
                }
            }
            Selection::InlineFragment(fragment) => {
                collect_keys(&fragment.node.selection_set.node, document, keys, children);
            }
        }
    }
}

fn rank(keys: &[&str], key: &Name) -> usize {
    keys.iter()
        .position(|k| *k == key.as_str())
        .unwrap_or(usize::MAX)
}

#[cfg(test)]
mod tests {
    use async_graphql::parser::parse_query;
    use serde_json::json;

    use super::*;

    fn keys(value: &Value) -> Vec<String> {
        match value {
            Value::Object(map) => map.keys().map(|k| k.to_string()).collect(),
            other => panic!("expected an object, got {other:?}"),
        }
    }

    fn value(json: serde_json::Value) -> Value {
        Value::from_json(json).unwrap()
    }

    #[test]
    fn root_and_nested_keys_follow_selection() {
        let document = parse_query("{ b { y x } a }").unwrap();
        let mut data = value(json!({ "a": 1, "b": { "x": 1, "y": 2 } }));

        restore_selection_order(&mut data, &document, None);

        assert_eq!(keys(&data), vec!["b", "a"]);
        let Value::Object(map) = &data else { unreachable!() };
        assert_eq!(keys(&map[&Name::new("b")]), vec!["y", "x"]);
    }

    #[test]
    fn aliases_lists_and_fragments() {
        let document = parse_query(
            r#"
            query Q { second: item { ...Parts } first: item { id } }
            fragment Parts on Item { children { label id } ... on Item { id } }
            "#,
        )
        .unwrap();
        let mut data = value(json!({
            "first": { "id": 1 },
            "second": { "id": 2, "children": [{ "id": 3, "label": "c" }] }
        }));

        restore_selection_order(&mut data, &document, Some("Q"));

        assert_eq!(keys(&data), vec!["second", "first"]);
        let Value::Object(root) = &data else { unreachable!() };
        let second = &root[&Name::new("second")];
        assert_eq!(keys(second), vec!["children", "id"]);
        let Value::Object(second) = second else { unreachable!() };
        let Value::List(children) = &second[&Name::new("children")] else {
            unreachable!()
        };
        assert_eq!(keys(&children[0]), vec!["label", "id"]);
    }

    #[test]
    fn unknown_operation_leaves_data_untouched() {
        let document = parse_query("query A { b a } query B { a b }").unwrap();
        let mut data = value(json!({ "a": 1, "b": 2 }));
        let before = keys(&data);

        restore_selection_order(&mut data, &document, None);

        assert_eq!(keys(&data), before);
    }
}
