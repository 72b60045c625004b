//! Squarified treemap layout.
//!
//! Siblings are packed into rows, each row laid along the shorter side of the
//! space left in the parent. A row keeps growing while its worst aspect ratio
//! does not get worse (Bruls, Huizing and van Wijk, "Squarified Treemaps").
//!
//! Naming follows the usual treemap vocabulary: *dice* splits a rectangle
//! along x, *slice* splits it along y.

use serde::{Deserialize, Serialize};

use crate::config::TilingRule;
use crate::context::RenderContext;
use crate::error::{Error, Result};
use crate::hierarchy::SortOrder;
use crate::model::{Node, NodeId, Tree};

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl Rect {
    pub const fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self { x0, y0, x1, y1 }
    }

    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f64 {
        self.y1 - self.y0
    }

    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x0 && x < self.x1 && y >= self.y0 && y < self.y1
    }

    /// True when the open interiors intersect; shared edges do not count.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x0 < other.x1 && other.x0 < self.x1 && self.y0 < other.y1 && other.y0 < self.y1
    }

    /// Moves every edge inwards by `d` (outwards when negative). An axis that
    /// would invert collapses to its midpoint.
    pub fn inset(&self, d: f64) -> Rect {
        let (mut x0, mut y0, mut x1, mut y1) = (self.x0 + d, self.y0 + d, self.x1 - d, self.y1 - d);
        if x1 < x0 {
            x0 = (x0 + x1) / 2.0;
            x1 = x0;
        }
        if y1 < y0 {
            y0 = (y0 + y1) / 2.0;
            y1 = y0;
        }
        Rect { x0, y0, x1, y1 }
    }

    pub fn round(&self) -> Rect {
        Rect {
            x0: self.x0.round(),
            y0: self.y0.round(),
            x1: self.x1.round(),
            y1: self.y1.round(),
        }
    }
}

/// A run of consecutive siblings laid out together.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    /// Row spans the full width and its members are split along x.
    pub dice: bool,
    pub len: usize,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Tiling {
    pub rows: Vec<Row>,
    pub rects: Vec<Rect>,
}

/// Packs `values` (in the given order) into `bounds`.
///
/// `ratio` is the target aspect ratio of a row: 1 favours squares, larger
/// values accept longer tiles.
pub fn squarify(values: &[f64], bounds: Rect, ratio: f64) -> Tiling {
    let n = values.len();
    let mut rects = Vec::with_capacity(n);
    let mut rows = Vec::new();
    let mut remaining: f64 = values.iter().sum();
    let mut area = bounds;
    let mut i0 = 0;

    while i0 < n {
        let (dx, dy) = (area.width(), area.height());
        let mut i1 = i0;
        let mut sum = 0.0;

        if remaining > 0.0 && dx > 0.0 && dy > 0.0 {
            // Leading zeros ride along with the next non-empty value.
            while i1 < n {
                sum += values[i1];
                i1 += 1;
                if sum > 0.0 {
                    break;
                }
            }
            if sum > 0.0 {
                let (mut lo, mut hi) = (sum, sum);
                let alpha = (dy / dx).max(dx / dy) / (remaining * ratio);
                let beta = sum * sum * alpha;
                let mut best = (hi / beta).max(beta / lo);
                while i1 < n {
                    let v = values[i1];
                    let (next_lo, next_hi) = (lo.min(v), hi.max(v));
                    let beta = (sum + v) * (sum + v) * alpha;
                    let worst = (next_hi / beta).max(beta / next_lo);
                    if worst > best {
                        break;
                    }
                    sum += v;
                    lo = next_lo;
                    hi = next_hi;
                    best = worst;
                    i1 += 1;
                }
            } else {
                i1 = n;
            }
        } else {
            // Nothing left to share out: one degenerate row takes the rest.
            sum = values[i0..].iter().sum();
            i1 = n;
        }

        let row = Row {
            dice: dx < dy,
            len: i1 - i0,
        };
        area = place_row(&values[i0..i1], sum, row.dice, area, remaining, i1 == n, &mut rects);
        remaining -= sum;
        rows.push(row);
        i0 = i1;
    }

    Tiling { rows, rects }
}

/// Lays `values` out with an existing row structure, re-splitting each row by
/// the current values.
pub fn resquarify(values: &[f64], rows: &[Row], bounds: Rect) -> Vec<Rect> {
    let mut rects = Vec::with_capacity(values.len());
    let mut remaining: f64 = values.iter().sum();
    let mut area = bounds;
    let mut i0 = 0;
    for (j, row) in rows.iter().enumerate() {
        let members = &values[i0..i0 + row.len];
        let sum: f64 = members.iter().sum();
        area = place_row(members, sum, row.dice, area, remaining, j + 1 == rows.len(), &mut rects);
        remaining -= sum;
        i0 += row.len;
    }
    rects
}

/// Places one row at the leading edge of `area` and returns what is left.
fn place_row(
    values: &[f64],
    sum: f64,
    dice: bool,
    area: Rect,
    remaining: f64,
    last: bool,
    out: &mut Vec<Rect>,
) -> Rect {
    let share = if last || remaining <= 0.0 {
        1.0
    } else {
        (sum / remaining).min(1.0)
    };
    if dice {
        let y = if share >= 1.0 { area.y1 } else { area.y0 + area.height() * share };
        split_x(values, sum, Rect::new(area.x0, area.y0, area.x1, y), out);
        Rect::new(area.x0, y, area.x1, area.y1)
    } else {
        let x = if share >= 1.0 { area.x1 } else { area.x0 + area.width() * share };
        split_y(values, sum, Rect::new(area.x0, area.y0, x, area.y1), out);
        Rect::new(x, area.y0, area.x1, area.y1)
    }
}

fn split_x(values: &[f64], total: f64, r: Rect, out: &mut Vec<Rect>) {
    let k = if total > 0.0 { r.width() / total } else { 0.0 };
    let mut x = r.x0;
    for (i, v) in values.iter().enumerate() {
        let x1 = if total > 0.0 && i + 1 == values.len() { r.x1 } else { x + v * k };
        out.push(Rect::new(x, r.y0, x1, r.y1));
        x = x1;
    }
}

fn split_y(values: &[f64], total: f64, r: Rect, out: &mut Vec<Rect>) {
    let k = if total > 0.0 { r.height() / total } else { 0.0 };
    let mut y = r.y0;
    for (i, v) in values.iter().enumerate() {
        let y1 = if total > 0.0 && i + 1 == values.len() { r.y1 } else { y + v * k };
        out.push(Rect::new(r.x0, y, r.x1, y1));
        y = y1;
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct PositionedNode {
    pub id: NodeId,
    pub parent: Option<NodeId>,
    pub name: String,
    pub category: Option<String>,
    pub value: f64,
    pub depth: u32,
    pub height: u32,
    pub leaf: bool,
    pub rect: Rect,
    pub children: Vec<NodeId>,
}

/// A laid-out tree. Every node of the source [`Tree`] has a rectangle.
#[derive(Clone, Debug)]
pub struct Layout {
    pub root: NodeId,
    pub nodes: Vec<PositionedNode>,
    pub width: f64,
    pub height: f64,
    order: Vec<NodeId>,
    rows: Vec<Vec<Row>>,
    ratio: f64,
}

impl Layout {
    /// Positions every node of `tree` inside the canvas of `ctx`.
    ///
    /// With [`TilingRule::Resquarify`], rows recorded in `previous` are reused
    /// for each group whose shape is unchanged.
    pub fn compute(tree: &Tree, ctx: &RenderContext, previous: Option<&Layout>) -> Result<Layout> {
        if tree.leaf_count() == 0 {
            return Err(Error::invalid("tree has no leaves"));
        }
        let cfg = ctx.config();
        let half = cfg.padding / 2.0;
        let reuse = match (cfg.tiling, previous) {
            (TilingRule::Resquarify, Some(prev))
                if prev.ratio == cfg.ratio && prev.nodes.len() == tree.len() =>
            {
                Some(prev)
            }
            _ => None,
        };

        let order = tree.pre_order();
        let mut rects = vec![Rect::default(); tree.len()];
        let mut rows: Vec<Vec<Row>> = vec![Vec::new(); tree.len()];
        rects[tree.root.index()] = Rect::new(0.0, 0.0, ctx.width(), ctx.height());
        let mut reused = 0usize;

        for &id in &order {
            let node = tree.get(id);
            let p = if id == tree.root { 0.0 } else { half };
            let rect = rects[id.index()].inset(p);
            rects[id.index()] = rect;
            if node.children.is_empty() {
                continue;
            }

            let inner = rect.inset(cfg.padding_outer - half);
            let values: Vec<f64> = node.children.iter().map(|c| tree.get(*c).value).collect();
            let prior = reuse
                .map(|prev| &prev.rows[id.index()])
                .filter(|r| !r.is_empty() && r.iter().map(|row| row.len).sum::<usize>() == values.len());

            let (node_rows, child_rects) = match prior {
                Some(prior) => {
                    reused += 1;
                    (prior.clone(), resquarify(&values, prior, inner))
                }
                None => {
                    let tiling = squarify(&values, inner, cfg.ratio);
                    (tiling.rows, tiling.rects)
                }
            };
            for (cid, r) in node.children.iter().zip(child_rects) {
                rects[cid.index()] = r;
            }
            rows[id.index()] = node_rows;
        }

        if cfg.round {
            for r in &mut rects {
                *r = r.round();
            }
        }

        let nodes = tree
            .nodes
            .iter()
            .zip(rects)
            .map(|(n, rect)| PositionedNode {
                id: n.id,
                parent: n.parent,
                name: n.name.clone(),
                category: n.category.clone(),
                value: n.value,
                depth: n.depth,
                height: n.height,
                leaf: n.is_leaf(),
                rect,
                children: n.children.clone(),
            })
            .collect();

        tracing::debug!(
            width = ctx.width(),
            height = ctx.height(),
            nodes = tree.len(),
            reused_groups = reused,
            tiling = ?cfg.tiling,
            "treemap laid out"
        );

        Ok(Layout {
            root: tree.root,
            nodes,
            width: ctx.width(),
            height: ctx.height(),
            order,
            rows,
            ratio: cfg.ratio,
        })
    }

    pub fn get(&self, id: NodeId) -> &PositionedNode {
        &self.nodes[id.index()]
    }

    pub fn root(&self) -> &PositionedNode {
        self.get(self.root)
    }

    /// Leaves in layout order (pre-order over sorted children).
    pub fn leaves(&self) -> impl Iterator<Item = &PositionedNode> + '_ {
        self.order.iter().map(move |id| self.get(*id)).filter(|n| n.leaf)
    }

    /// Row structure chosen for a group, empty for leaves.
    pub fn rows(&self, id: NodeId) -> &[Row] {
        &self.rows[id.index()]
    }
}

/// Lays out a document with default settings and the given inner padding.
pub fn layout(root: &Node, width: f64, height: f64, padding: f64) -> Result<Layout> {
    let config = crate::config::TreemapConfig {
        padding,
        ..Default::default()
    };
    let ctx = RenderContext::new(width, height, config)?;
    let tree = Tree::from_node(root, SortOrder::Value)?;
    Layout::compute(&tree, &ctx, None)
}
