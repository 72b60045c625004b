use anyhow::Context as _;
use crossbeam_channel::{unbounded, Receiver};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use treemap_core::datasets::{DatasetId, Heading};
use treemap_core::loader::{LoadMsg, Loader, RequestId, RequestTracker};
use treemap_core::{Layout, NodeId, RenderContext, Scene, Tree, TreemapConfig};

/// Settings kept between runs.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Prefs {
    pub dataset: DatasetId,
    pub data_dir: PathBuf,
    pub config: TreemapConfig,
}

impl Default for Prefs {
    fn default() -> Self {
        Self {
            dataset: DatasetId::default(),
            data_dir: PathBuf::from("data"),
            config: TreemapConfig::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Source {
    Dataset(DatasetId),
    File(PathBuf),
}

impl Source {
    pub fn heading(&self) -> Heading {
        match self {
            Source::Dataset(id) => (*id).into(),
            Source::File(path) => Heading {
                title: path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or("Treemap")
                    .to_string(),
                description: path.display().to_string(),
            },
        }
    }
}

pub struct AppState {
    pub prefs: Prefs,
    /// Last requested source.
    pub source: Source,
    /// Source of the tree currently drawn.
    shown: Option<Source>,
    loader: Loader,
    load_rx: Receiver<LoadMsg>,
    pub pending: Option<RequestId>,
    pub tree: Option<Tree>,
    pub render: Option<RenderContext>,
    pub layout: Option<Layout>,
    pub scene: Option<Scene>,
    pub error: Option<String>,
    /// The current error came from laying out, not from loading.
    layout_failed: bool,
    viewport: (f64, f64),
    /// Tile under the pointer, and the last one shown while the tooltip fades out.
    pub hovered: Option<NodeId>,
    pub tooltip_tile: Option<NodeId>,
    pub pointer: (f64, f64),
}

impl AppState {
    pub fn new(prefs: Prefs) -> Self {
        let (tx, rx) = unbounded();
        let source = Source::Dataset(prefs.dataset);
        Self {
            prefs,
            source,
            shown: None,
            loader: Loader::new(RequestTracker::new(), tx),
            load_rx: rx,
            pending: None,
            tree: None,
            render: None,
            layout: None,
            scene: None,
            error: None,
            layout_failed: false,
            viewport: (1280.0, 800.0),
            hovered: None,
            tooltip_tile: None,
            pointer: (0.0, 0.0),
        }
    }

    pub fn load_dataset(&mut self, id: DatasetId) {
        self.prefs.dataset = id;
        self.source = Source::Dataset(id);
        self.reload();
    }

    pub fn open_file(&mut self, path: PathBuf) {
        self.source = Source::File(path);
        self.reload();
    }

    /// Issues a new load; replies to earlier loads will be ignored.
    pub fn reload(&mut self) {
        let path = match &self.source {
            Source::Dataset(id) => id.path_in(&self.prefs.data_dir),
            Source::File(path) => path.clone(),
        };
        self.error = None;
        self.layout_failed = false;
        self.pending = Some(self.loader.load(path));
    }

    /// Drains finished loads. Returns true if anything changed.
    pub fn poll_loads(&mut self) -> bool {
        let mut changed = false;
        while let Ok(msg) = self.load_rx.try_recv() {
            let Some(msg) = self.loader.tracker().accept(msg) else { continue; };
            self.pending = None;
            changed = true;
            match msg {
                LoadMsg::Loaded { root, .. } => match Tree::from_node(&root, self.prefs.config.sort) {
                    Ok(tree) => {
                        self.tree = Some(tree);
                        self.shown = Some(self.source.clone());
                        // A new dataset never reuses rows from the old one.
                        self.layout = None;
                        self.render = None;
                        self.relayout();
                    }
                    Err(e) => self.fail(e.to_string()),
                },
                LoadMsg::Failed { error, .. } => {
                    let mut msg = error.to_string();
                    if let Source::Dataset(id) = &self.source {
                        msg.push_str(&format!("\nDownload it from {}", id.source_url()));
                    }
                    // Keep the previous drawing and go back to its source.
                    self.error = Some(msg);
                    if let Some(shown) = &self.shown {
                        self.source = shown.clone();
                        if let Source::Dataset(id) = shown {
                            self.prefs.dataset = *id;
                        }
                    }
                }
            }
        }
        changed
    }

    fn fail(&mut self, msg: String) {
        self.error = Some(msg);
        self.shown = None;
        self.tree = None;
        self.layout = None;
        self.scene = None;
        self.render = None;
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        if self.viewport != (width, height) {
            self.viewport = (width, height);
            self.relayout();
        }
    }

    pub fn set_config(&mut self, config: TreemapConfig) {
        let resort = config.sort != self.prefs.config.sort;
        self.prefs.config = config;
        if resort {
            self.reload();
        } else {
            self.relayout();
        }
    }

    /// Lays the current tree out for the current viewport and settings.
    pub fn relayout(&mut self) {
        let Some(tree) = &self.tree else { return; };
        let (w, h) = self.viewport;
        // Minimized window.
        if w <= 0.0 || h <= 0.0 {
            return;
        }
        let ctx = match RenderContext::for_viewport(w, h, self.prefs.config.clone()) {
            Ok(ctx) => ctx,
            Err(e) => {
                self.error = Some(e.to_string());
                self.layout_failed = true;
                return;
            }
        };
        if self.render.as_ref() == Some(&ctx) && self.scene.is_some() {
            return;
        }
        match Layout::compute(tree, &ctx, self.layout.as_ref()) {
            Ok(layout) => {
                let heading = self.shown.as_ref().unwrap_or(&self.source).heading();
                let scene = Scene::build(&layout, &ctx).with_heading(heading);
                if self.layout_failed {
                    self.error = None;
                    self.layout_failed = false;
                }
                self.scene = Some(scene);
                self.layout = Some(layout);
                self.render = Some(ctx);
                self.hovered = None;
                self.tooltip_tile = None;
            }
            Err(e) => self.fail(e.to_string()),
        }
    }

    pub fn export_svg(&self, path: &Path) -> anyhow::Result<()> {
        let scene = self.scene.as_ref().context("nothing rendered yet")?;
        treemap_core::svg::save(scene, path)
            .with_context(|| format!("writing {}", path.display()))?;
        Ok(())
    }
}
