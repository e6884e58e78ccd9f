use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use media_panel::{BlobRegistry, MediaResolver, PanelOptions, RowIndex, Viewport, frame};
use tracing::{error, info};

#[derive(Parser)]
struct Opts {
    #[clap(short, long, env = "MEDIA_PANEL_OPTIONS")]
    options: PathBuf,
    #[clap(short, long, env = "MEDIA_PANEL_DATA")]
    data: PathBuf,
    #[clap(long, default_value_t = 0)]
    width: u32,
    #[clap(long, default_value_t = 0)]
    height: u32,
    /// Render a single row instead of all of them.
    #[clap(short, long)]
    row: Option<usize>,
}

fn run(opts: Opts) -> anyhow::Result<()> {
    let options = PanelOptions::load(&opts.options)
        .with_context(|| format!("load options from {}", opts.options.display()))?;
    let frames = frame::load_frames(&opts.data)
        .with_context(|| format!("load dataset from {}", opts.data.display()))?;
    info!(
        frames = frames.len(),
        rows = frame::row_count(&frames),
        "loaded dataset"
    );

    let blobs = BlobRegistry::new();
    let resolver = MediaResolver::new(&options, &blobs);
    let viewport = Viewport::new(opts.width, opts.height);
    let output = match opts.row {
        Some(row) => serde_json::to_string_pretty(&resolver.render_row(
            &frames,
            viewport,
            RowIndex::At(row),
        )),
        None => serde_json::to_string_pretty(&resolver.render_all(&frames, viewport)),
    }
    .with_context(|| "serialize rows")?;
    println!("{output}");
    Ok(())
}

fn main() {
    let opts = Opts::parse();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
    if let Err(e) = run(opts) {
        error!(?e, "critical error");
        std::process::exit(1);
    }
}
