use super::*;
use crate::drawable::effect::Filter;
use crate::drawable::foundation::ImageFile;
use crate::foundation::core::{Gravity, Offset};
use crate::layer::model::LayerOpts;

fn named(id: &str, overlays: Vec<Layer>) -> Layer {
    Layer::new(
        ImageFile::new(format!("{id}.png")),
        LayerOpts {
            overlays,
            id: Some(id.to_string()),
            ..LayerOpts::default()
        },
    )
    .unwrap()
}

//        a
//      / | \
//     b  e  f
//    / \     \
//   c   d     g
fn sample_tree() -> Layer {
    named(
        "a",
        vec![
            named("b", vec![named("c", vec![]), named("d", vec![])]),
            named("e", vec![]),
            named("f", vec![named("g", vec![])]),
        ],
    )
}

fn ids(flat: &[FlatLayer<'_>]) -> Vec<String> {
    flat.iter().map(|n| n.layer.label()).collect()
}

#[test]
fn flatten_is_preorder_in_overlay_order() {
    let tree = sample_tree();
    let flat = flatten(&tree).unwrap();
    assert_eq!(ids(&flat), vec!["a", "b", "c", "d", "e", "f", "g"]);

    let indices: Vec<usize> = flat.iter().map(|n| n.index).collect();
    assert_eq!(indices, (0..7).collect::<Vec<_>>());
}

#[test]
fn flatten_records_parents_depths_and_paths() {
    let tree = sample_tree();
    let flat = flatten(&tree).unwrap();

    let parents: Vec<Option<usize>> = flat.iter().map(|n| n.parent).collect();
    assert_eq!(
        parents,
        vec![None, Some(0), Some(1), Some(1), Some(0), Some(0), Some(5)]
    );
    let depths: Vec<usize> = flat.iter().map(|n| n.depth).collect();
    assert_eq!(depths, vec![0, 1, 2, 2, 1, 1, 2]);
    assert_eq!(flat[3].path.to_string(), "root/0/1");
    assert_eq!(flat[6].path.to_string(), "root/2/0");
    assert_eq!(flat[0].path, LayerPath::root());
}

#[test]
fn every_root_is_visited_before_its_subtree() {
    let tree = sample_tree();
    let flat = flatten(&tree).unwrap();
    for node in &flat {
        if let Some(parent) = node.parent {
            assert!(parent < node.index, "parent must precede child");
        }
    }
}

#[test]
fn single_layer_flattens_to_itself() {
    let leaf = Layer::leaf(ImageFile::new("x.png"));
    let flat = flatten(&leaf).unwrap();
    assert_eq!(flat.len(), 1);
    assert!(flat[0].parent.is_none());
}

#[test]
fn group_by_parent_collects_siblings() {
    let tree = sample_tree();
    let flat = flatten(&tree).unwrap();
    let groups = group_by_parent(&flat);
    assert_eq!(
        groups,
        vec![
            SiblingGroup {
                parent: None,
                members: vec![0],
            },
            SiblingGroup {
                parent: Some(0),
                members: vec![1, 4, 5],
            },
            SiblingGroup {
                parent: Some(1),
                members: vec![2, 3],
            },
            SiblingGroup {
                parent: Some(5),
                members: vec![6],
            },
        ]
    );
}

#[test]
fn relationships_list_every_edge() {
    let tree = sample_tree();
    let flat = flatten(&tree).unwrap();
    let edges = relationships(&flat);
    assert_eq!(edges.len(), flat.len() - 1);
    assert_eq!(
        edges[0],
        Relationship {
            parent: 0,
            child: 1
        }
    );
    assert_eq!(
        edges.last().copied(),
        Some(Relationship {
            parent: 5,
            child: 6
        })
    );
}

#[test]
fn layer_path_children_extend_the_parent() {
    let p = LayerPath::root().child(2).child(0);
    assert_eq!(p.indices(), &[2, 0]);
    assert_eq!(p.depth(), 2);
    assert_eq!(p.to_string(), "root/2/0");
}

#[test]
fn describe_hierarchy_indents_by_depth() {
    let tree = Layer::new(
        ImageFile::new("bg.png"),
        LayerOpts {
            overlays: vec![
                Layer::new(
                    ImageFile::new("logo.png"),
                    LayerOpts {
                        offset: Offset::new(5, -5),
                        effects: vec![Box::new(Filter::new("blur", "0x1"))],
                        ..LayerOpts::default()
                    },
                )
                .unwrap(),
            ],
            gravity: Gravity::Center,
            id: Some("scene".to_string()),
            ..LayerOpts::default()
        },
    )
    .unwrap();

    let text = describe_hierarchy(&tree).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(
        lines,
        vec![
            "root image(bg.png) #scene effects=0 primitives=0 overlays=1 gravity=Center",
            "  root/0 image(logo.png) at +5-5 effects=1 primitives=0 overlays=0 gravity=NorthWest",
        ]
    );
}

#[test]
fn describe_hierarchy_writes_one_line_per_layer() {
    let mut tree = Layer::leaf(ImageFile::new("leaf.png"));
    for _ in 0..3 {
        tree = Layer::new(
            ImageFile::new("node.png"),
            LayerOpts {
                overlays: vec![tree],
                ..LayerOpts::default()
            },
        )
        .unwrap();
    }

    let text = describe_hierarchy(&tree).unwrap();
    assert!(text.ends_with('\n'));
    assert_eq!(text.lines().count(), 4);
    let deepest = text.lines().next_back().unwrap();
    assert!(deepest.starts_with("      root/0/0/0 image(leaf.png)"));
}
