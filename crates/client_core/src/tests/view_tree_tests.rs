use super::*;
use chrono::{TimeZone, Utc};
use proptest::{prelude::*, sample::Index};
use shared::{domain::ViewType, protocol::RepeatedView};

use crate::view::ViewIndex;

fn view(id: &str, belong_to_id: &str, belongings: Vec<View>) -> View {
    View {
        id: ViewId::from(id),
        belong_to_id: belong_to_id.to_string(),
        name: id.to_uppercase(),
        description: String::new(),
        view_type: ViewType::Blank,
        version: 0,
        belongings: RepeatedView::from(belongings),
        modified_time: Utc.timestamp_opt(0, 0).unwrap(),
        create_time: Utc.timestamp_opt(0, 0).unwrap(),
    }
}

fn sample() -> View {
    view(
        "root",
        "workspace",
        vec![
            view("a", "root", vec![view("a1", "a", Vec::new())]),
            view("b", "root", Vec::new()),
        ],
    )
}

#[test]
fn walk_is_pre_order_with_depths() {
    let tree = sample();
    let visited = tree
        .walk()
        .map(|(view, depth)| (view.id.as_str().to_string(), depth))
        .collect::<Vec<_>>();

    assert_eq!(
        visited,
        vec![
            ("root".to_string(), 0),
            ("a".to_string(), 1),
            ("a1".to_string(), 2),
            ("b".to_string(), 1),
        ]
    );
    assert_eq!(tree.node_count(), 4);
}

#[test]
fn find_locates_nested_views() {
    let tree = sample();
    assert_eq!(tree.find(&ViewId::from("a1")).map(|v| v.name.as_str()), Some("A1"));
    assert!(tree.find(&ViewId::from("missing")).is_none());
}

#[test]
fn well_formed_tree_validates() {
    assert_eq!(sample().validate(), Ok(()));
}

#[test]
fn repeated_id_is_rejected() {
    let tree = view(
        "root",
        "workspace",
        vec![view("a", "root", vec![view("root", "a", Vec::new())])],
    );
    assert_eq!(
        tree.validate(),
        Err(ViewTreeError::DuplicateId(ViewId::from("root")))
    );
}

#[test]
fn child_must_name_its_container() {
    let tree = view("root", "workspace", vec![view("a", "elsewhere", Vec::new())]);
    assert!(matches!(
        tree.validate(),
        Err(ViewTreeError::MisplacedChild { id, .. }) if id == ViewId::from("a")
    ));
}

#[test]
fn self_parent_is_rejected() {
    let tree = view("root", "root", Vec::new());
    assert_eq!(
        tree.validate(),
        Err(ViewTreeError::SelfParent(ViewId::from("root")))
    );
}

#[test]
fn equality_is_by_id() {
    let mut renamed = view("a", "root", Vec::new());
    renamed.name = "Renamed".into();
    renamed.version = 9;
    assert_eq!(renamed, view("a", "root", Vec::new()));
    assert_ne!(renamed, view("b", "root", Vec::new()));
}

/// `parents[i - 1]` is the parent of node `i`; node 0 is the root.
fn parent_strategy() -> impl Strategy<Value = Vec<usize>> {
    (1usize..24).prop_flat_map(|n| (1..n).map(|i| 0..i).collect::<Vec<_>>())
}

fn node_id(i: usize) -> String {
    format!("v{i}")
}

fn build(
    node: usize,
    belong_to_id: &str,
    children: &[Vec<usize>],
    extra: Option<(usize, usize)>,
) -> View {
    let id = node_id(node);
    let mut belongings = children[node]
        .iter()
        .map(|&child| build(child, &id, children, extra))
        .collect::<Vec<_>>();
    if let Some((parent, copied)) = extra {
        if parent == node {
            belongings.push(view(&node_id(copied), &id, Vec::new()));
        }
    }
    view(&id, belong_to_id, belongings)
}

fn generated_tree(parents: &[usize], extra: Option<(usize, usize)>) -> View {
    let mut children = vec![Vec::new(); parents.len() + 1];
    for (offset, &parent) in parents.iter().enumerate() {
        children[parent].push(offset + 1);
    }
    build(0, "workspace", &children, extra)
}

proptest! {
    #[test]
    fn generated_trees_hold_their_invariants(parents in parent_strategy()) {
        let tree = generated_tree(&parents, None);
        let n = parents.len() + 1;

        prop_assert_eq!(tree.validate(), Ok(()));
        prop_assert_eq!(tree.node_count(), n);

        let ids = tree
            .walk()
            .map(|(view, _)| view.id.clone())
            .collect::<HashSet<_>>();
        prop_assert_eq!(ids.len(), n);

        for (ancestor, _) in tree.walk() {
            for (descendant, _) in ancestor.belongings.iter().flat_map(|child| child.walk()) {
                prop_assert_ne!(&descendant.id, &ancestor.id);
            }
        }

        let index = ViewIndex::from_tree(&tree).expect("index");
        prop_assert_eq!(index.len(), n);
        for (offset, &parent) in parents.iter().enumerate() {
            let parent_id = ViewId::from(node_id(parent));
            let found = index
                .parent_of(&ViewId::from(node_id(offset + 1)))
                .map(|view| &view.id);
            prop_assert_eq!(found, Some(&parent_id));
        }
    }

    #[test]
    fn repeating_any_id_is_caught(
        parents in parent_strategy().prop_filter("needs two nodes", |parents| !parents.is_empty()),
        at in any::<Index>(),
        copy in any::<Index>()
    ) {
        let n = parents.len() + 1;
        let parent = at.index(n);
        let mut copied = copy.index(n - 1);
        if copied >= parent {
            copied += 1;
        }

        let tree = generated_tree(&parents, Some((parent, copied)));
        prop_assert_eq!(
            tree.validate(),
            Err(ViewTreeError::DuplicateId(ViewId::from(node_id(copied))))
        );
        prop_assert!(ViewIndex::from_tree(&tree).is_err());
    }
}
