use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use treemap_core::datasets::DatasetId;
use treemap_core::error::ExportError;
use treemap_core::human::compact_value;
use treemap_core::loader::{LoadMsg, Loader, RequestTracker};
use treemap_core::{Layout, RenderContext, Scene, SortOrder, TilingRule, Tree, TreemapConfig};

#[derive(Parser, Debug)]
#[command(name = "treemap-cli", about = "Squarified treemap renderer")]
struct Args {
    /// Dataset name (movies, videogames, kickstarter) or path to a JSON document
    #[arg(default_value = "movies")]
    source: String,
    /// Directory holding the downloaded dataset files
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,
    /// JSON config file; flags below override it
    #[arg(short, long)]
    config: Option<PathBuf>,
    #[arg(long)]
    width: Option<f64>,
    #[arg(long)]
    height: Option<f64>,
    /// Gap between sibling tiles in pixels
    #[arg(long)]
    padding: Option<f64>,
    #[arg(long)]
    padding_outer: Option<f64>,
    /// squarify or resquarify
    #[arg(long)]
    tiling: Option<TilingRule>,
    /// Target aspect ratio of squarify rows
    #[arg(long)]
    ratio: Option<f64>,
    /// Sibling order: value, height-then-value or input
    #[arg(long)]
    sort: Option<SortOrder>,
    /// Shorthand for --sort height-then-value
    #[arg(long, conflicts_with = "sort")]
    by_height: bool,
    /// Keep fractional coordinates
    #[arg(long)]
    no_round: bool,
    /// Output SVG path
    #[arg(long)]
    svg: Option<PathBuf>,
    /// Output JSON report path
    #[arg(short, long)]
    json: Option<PathBuf>,
    /// Output CSV path
    #[arg(long)]
    csv: Option<PathBuf>,
    /// Output PDF path
    #[arg(long)]
    pdf: Option<PathBuf>,
}

impl Args {
    fn config(&self) -> treemap_core::Result<TreemapConfig> {
        let mut cfg = match &self.config {
            Some(path) => TreemapConfig::from_path(path)?,
            None => TreemapConfig {
                round: true,
                ..TreemapConfig::default()
            },
        };
        // A command line render has no viewport to follow.
        cfg.responsive = false;
        if let Some(w) = self.width {
            cfg.width = w;
        }
        if let Some(h) = self.height {
            cfg.height = h;
        }
        if let Some(p) = self.padding {
            cfg.padding = p;
        }
        if let Some(p) = self.padding_outer {
            cfg.padding_outer = p;
        }
        if let Some(t) = self.tiling {
            cfg.tiling = t;
        }
        if let Some(r) = self.ratio {
            cfg.ratio = r;
        }
        if let Some(order) = self.sort {
            cfg.sort = order;
        }
        if self.by_height {
            cfg.sort = SortOrder::HeightThenValue;
        }
        if self.no_round {
            cfg.round = false;
        }
        Ok(cfg)
    }

    fn resolve(&self) -> (PathBuf, Option<DatasetId>) {
        match self.source.parse::<DatasetId>() {
            Ok(id) => (id.path_in(&self.data_dir), Some(id)),
            Err(_) => (PathBuf::from(&self.source), None),
        }
    }
}

fn main() -> ExitCode {
    treemap_core::logging::init("info");
    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            if let (treemap_core::Error::FetchFailure { .. }, Ok(id)) =
                (&e, args.source.parse::<DatasetId>())
            {
                eprintln!(
                    "download it from {} into {}",
                    id.source_url(),
                    args.data_dir.display()
                );
            }
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> treemap_core::Result<()> {
    let config = args.config()?;
    let ctx = RenderContext::new(config.width, config.height, config.clone())?;
    let (path, dataset) = args.resolve();

    let (tx, rx) = crossbeam_channel::unbounded::<LoadMsg>();
    let loader = Loader::new(RequestTracker::new(), tx);
    loader.load(path);

    let root = loop {
        let Ok(msg) = rx.recv() else {
            return Err(treemap_core::Error::InvalidInput("loader stopped".into()));
        };
        match loader.tracker().accept(msg) {
            Some(LoadMsg::Loaded { root, .. }) => break root,
            Some(LoadMsg::Failed { error, .. }) => return Err(error),
            None => continue,
        }
    };

    let tree = Tree::from_node(&root, config.sort)?;
    let layout = Layout::compute(&tree, &ctx, None)?;
    let mut scene = Scene::build(&layout, &ctx);
    if let Some(id) = dataset {
        scene = scene.with_heading(id);
    }

    if let Some(path) = &args.svg {
        treemap_core::svg::save(&scene, path)?;
    }
    if let Some(path) = &args.json {
        let json = treemap_core::export::to_json(&layout, &scene, &config);
        let text = serde_json::to_string_pretty(&json).map_err(ExportError::from)?;
        std::fs::write(path, text).map_err(ExportError::from)?;
    }
    if let Some(path) = &args.csv {
        let file = std::fs::File::create(path).map_err(ExportError::from)?;
        treemap_core::export::to_csv(&scene, file).map_err(ExportError::from)?;
    }
    if let Some(path) = &args.pdf {
        treemap_core::export::to_pdf(&scene, path)?;
    }

    println!(
        "{} tiles, {} categories, total {} on {}x{}",
        scene.tiles.len(),
        scene.legend.items.len(),
        compact_value(layout.root().value),
        ctx.width(),
        ctx.height()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_flag_selects_input_order() {
        let args = Args::parse_from(["treemap-cli", "movies", "--sort", "input"]);
        assert_eq!(args.config().unwrap().sort, SortOrder::Input);
    }

    #[test]
    fn by_height_is_a_sort_shorthand() {
        let args = Args::parse_from(["treemap-cli", "--by-height"]);
        let cfg = args.config().unwrap();
        assert_eq!(cfg.sort, SortOrder::HeightThenValue);
        assert!(cfg.round);
        assert!(!cfg.responsive);
    }

    #[test]
    fn unknown_sort_is_rejected() {
        assert!(Args::try_parse_from(["treemap-cli", "--sort", "size"]).is_err());
    }
}
