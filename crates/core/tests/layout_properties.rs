use proptest::prelude::*;
use treemap_core::{Layout, Node, RenderContext, SortOrder, TilingRule, Tree, TreemapConfig};

fn grouped(groups: &[Vec<u32>]) -> Node {
    Node::group(
        "root",
        groups
            .iter()
            .enumerate()
            .map(|(g, values)| {
                Node::group(
                    format!("g{g}"),
                    values
                        .iter()
                        .enumerate()
                        .map(|(i, v)| Node::leaf(format!("g{g}-{i}"), format!("g{g}"), *v as f64))
                        .collect(),
                )
            })
            .collect(),
    )
}

fn compute(root: &Node, w: f64, h: f64, config: TreemapConfig) -> Layout {
    let ctx = RenderContext::new(w, h, config.clone()).unwrap();
    let tree = Tree::from_node(root, config.sort).unwrap();
    Layout::compute(&tree, &ctx, None).unwrap()
}

fn groups_strategy() -> impl Strategy<Value = Vec<Vec<u32>>> {
    prop::collection::vec(prop::collection::vec(1u32..10_000, 1..12), 1..8)
}

proptest! {
    #[test]
    fn leaves_tile_the_canvas(
        groups in groups_strategy(),
        w in 50.0f64..1200.0,
        h in 50.0f64..800.0,
    ) {
        let layout = compute(&grouped(&groups), w, h, TreemapConfig::default());
        let total: f64 = layout.leaves().map(|n| n.rect.area()).sum();
        prop_assert!((total - w * h).abs() < 1e-6 * w * h, "area {} vs {}", total, w * h);
    }

    #[test]
    fn leaves_stay_inside_and_do_not_overlap(
        groups in groups_strategy(),
        padding in 0.0f64..6.0,
    ) {
        let config = TreemapConfig { padding, ..TreemapConfig::default() };
        let layout = compute(&grouped(&groups), 640.0, 480.0, config);
        let rects: Vec<_> = layout.leaves().map(|n| n.rect).collect();
        let eps = 1e-9;
        for r in &rects {
            prop_assert!(r.x0 >= -eps && r.y0 >= -eps);
            prop_assert!(r.x1 <= 640.0 + eps && r.y1 <= 480.0 + eps);
            prop_assert!(r.width() >= 0.0 && r.height() >= 0.0);
        }
        for (i, a) in rects.iter().enumerate() {
            for b in &rects[i + 1..] {
                let shrunk_a = a.inset(eps);
                let shrunk_b = b.inset(eps);
                prop_assert!(!shrunk_a.overlaps(&shrunk_b), "{:?} overlaps {:?}", a, b);
            }
        }
    }

    #[test]
    fn children_areas_match_their_value_share(
        groups in groups_strategy(),
    ) {
        let layout = compute(&grouped(&groups), 900.0, 600.0, TreemapConfig::default());
        for node in layout.nodes.iter().filter(|n| !n.children.is_empty()) {
            let parent_area = node.rect.area();
            for c in &node.children {
                let child = layout.get(*c);
                let expected = parent_area * child.value / node.value;
                prop_assert!((child.rect.area() - expected).abs() < 1e-6 * parent_area.max(1.0));
            }
        }
    }

    #[test]
    fn layout_is_deterministic(
        groups in groups_strategy(),
        rule in prop_oneof![Just(TilingRule::Squarify), Just(TilingRule::Resquarify)],
        sort in prop_oneof![Just(SortOrder::Value), Just(SortOrder::HeightThenValue)],
        round in any::<bool>(),
    ) {
        let config = TreemapConfig { tiling: rule, sort, round, padding: 1.0, ..TreemapConfig::default() };
        let root = grouped(&groups);
        let a = compute(&root, 777.0, 333.0, config.clone());
        let b = compute(&root, 777.0, 333.0, config);
        let ra: Vec<_> = a.nodes.iter().map(|n| n.rect).collect();
        let rb: Vec<_> = b.nodes.iter().map(|n| n.rect).collect();
        prop_assert_eq!(ra, rb);
    }

    #[test]
    fn rounded_layout_still_tiles(
        groups in groups_strategy(),
        w in 100u32..1000,
        h in 100u32..800,
    ) {
        let config = TreemapConfig { round: true, ..TreemapConfig::default() };
        let layout = compute(&grouped(&groups), w as f64, h as f64, config);
        let total: f64 = layout.leaves().map(|n| n.rect.area()).sum();
        prop_assert_eq!(total, (w * h) as f64);
    }

    #[test]
    fn resquarify_after_resize_still_tiles(
        groups in groups_strategy(),
        w in 100.0f64..1000.0,
        h in 100.0f64..800.0,
    ) {
        let config = TreemapConfig { tiling: TilingRule::Resquarify, ..TreemapConfig::default() };
        let tree = Tree::from_node(&grouped(&groups), SortOrder::Value).unwrap();
        let first = Layout::compute(&tree, &RenderContext::new(640.0, 480.0, config.clone()).unwrap(), None).unwrap();
        let second = Layout::compute(&tree, &RenderContext::new(w, h, config).unwrap(), Some(&first)).unwrap();
        let total: f64 = second.leaves().map(|n| n.rect.area()).sum();
        prop_assert!((total - w * h).abs() < 1e-6 * w * h);
        prop_assert_eq!(first.rows(tree.root), second.rows(tree.root));
    }
}

#[test]
fn two_leaves_are_exactly_proportional() {
    let root = Node::group("root", vec![Node::leaf("a", "X", 3.0), Node::leaf("b", "X", 1.0)]);
    let layout = compute(&root, 400.0, 100.0, TreemapConfig { ratio: 1.0, ..TreemapConfig::default() });
    let areas: Vec<f64> = layout.leaves().map(|n| n.rect.area()).collect();
    assert!((areas[0] / areas[1] - 3.0).abs() < 1e-12);
}
