use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "printzone", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Export one view's print region as a PNG.
    Export(ExportArgs),
    /// Render the product mockup of one view as a PNG.
    Preview(PreviewArgs),
    /// Export every view and write the resulting design state as JSON.
    Snapshot(SnapshotArgs),
}

#[derive(Parser, Debug)]
struct SessionArgs {
    /// Product descriptor JSON. Asset paths resolve relative to its directory.
    #[arg(long)]
    product: PathBuf,

    /// Stored design state JSON. A blank design is used when omitted.
    #[arg(long)]
    design: Option<PathBuf>,

    /// Extra directory of font files.
    #[arg(long)]
    fonts: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct ExportArgs {
    #[command(flatten)]
    session: SessionArgs,

    /// View id.
    #[arg(long)]
    view: String,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Pixels per artwork unit.
    #[arg(long)]
    multiplier: Option<u32>,
}

#[derive(Parser, Debug)]
struct PreviewArgs {
    #[command(flatten)]
    session: SessionArgs,

    /// View id.
    #[arg(long)]
    view: String,

    /// Color variant id.
    #[arg(long)]
    color: Option<String>,

    /// Composite without the displacement warp.
    #[arg(long)]
    no_warp: bool,

    /// Draw the dashed print-zone outline.
    #[arg(long)]
    outline: bool,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct SnapshotArgs {
    #[command(flatten)]
    session: SessionArgs,

    /// Output JSON path.
    #[arg(long)]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Export(args) => cmd_export(args),
        Command::Preview(args) => cmd_preview(args),
        Command::Snapshot(args) => cmd_snapshot(args),
    }
}

struct Session {
    engine: printzone::DesignEngine,
    reader: printzone::DirAssetReader,
}

impl Session {
    fn open(args: &SessionArgs, config: printzone::EngineConfig) -> anyhow::Result<Self> {
        let json = std::fs::read_to_string(&args.product)
            .with_context(|| format!("read product '{}'", args.product.display()))?;
        let product = printzone::ProductDescriptor::from_json(&json)
            .with_context(|| format!("parse product '{}'", args.product.display()))?;

        let documents = match &args.design {
            Some(path) => read_design(path)?
                .views
                .into_iter()
                .map(|(id, design)| (id, design.scene))
                .collect(),
            None => BTreeMap::new(),
        };

        let fonts = printzone::FontCache::with_system_fonts();
        if let Some(dir) = &args.fonts {
            fonts.load_dir(dir);
        }

        let root = args.product.parent().unwrap_or_else(|| Path::new("."));
        let mut session = Self {
            engine: printzone::DesignEngine::with_design(
                product,
                config,
                Arc::new(fonts),
                &documents,
            )?,
            reader: printzone::DirAssetReader::new(root),
        };
        let events = session.engine.open();
        session.pump(events);
        Ok(session)
    }

    fn run(&mut self, command: printzone::Command) {
        let events = self.engine.dispatch(command);
        self.pump(events);
    }

    /// Fulfil load requests until the engine stops asking.
    fn pump(&mut self, mut events: Vec<printzone::EngineEvent>) {
        while !events.is_empty() {
            let mut next = Vec::new();
            for event in events {
                match event {
                    printzone::EngineEvent::LoadRequested(request) => {
                        // Families resolve through the font cache, not the asset directory.
                        if matches!(request.ticket.kind, printzone::LoadKind::Font { .. }) {
                            continue;
                        }
                        let result = self
                            .reader
                            .read(&request.reference)
                            .map_err(|err| err.to_string());
                        next.extend(self.engine.complete_load(request.ticket, result));
                    }
                    printzone::EngineEvent::AssetFailed { reference, message } => {
                        eprintln!("warning: asset '{reference}': {message}");
                    }
                    printzone::EngineEvent::ExportFailed { view_id, message } => {
                        eprintln!("warning: export of view '{view_id}' failed: {message}");
                    }
                    _ => {}
                }
            }
            events = next;
        }
    }

    fn mount(&mut self, view: &str) -> anyhow::Result<()> {
        if self.engine.product().view(view).is_none() {
            anyhow::bail!("product has no view '{view}'");
        }
        self.run(printzone::Command::SwitchView(view.to_string()));
        Ok(())
    }
}

fn read_design(path: &Path) -> anyhow::Result<printzone::DesignState> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("read design '{}'", path.display()))?;
    printzone::DesignState::from_json(&json)
        .with_context(|| format!("parse design '{}'", path.display()))
}

fn write_output(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(path, bytes).with_context(|| format!("write '{}'", path.display()))?;
    eprintln!("wrote {}", path.display());
    Ok(())
}

fn cmd_export(args: ExportArgs) -> anyhow::Result<()> {
    let mut config = printzone::EngineConfig::from_env();
    if let Some(m) = args.multiplier {
        config.export_multiplier = m;
    }
    let mut session = Session::open(&args.session, config)?;
    session.mount(&args.view)?;

    let capture = match session.engine.capture(&args.view) {
        Some(printzone::Capture::Ready(capture)) => capture,
        Some(printzone::Capture::Unavailable(reason)) => {
            anyhow::bail!("view '{}' cannot be exported: {reason}", args.view)
        }
        None => anyhow::bail!("view '{}' was not exported", args.view),
    };
    let png = capture.raster.to_png()?;
    write_output(&args.out, &png)
}

fn cmd_preview(args: PreviewArgs) -> anyhow::Result<()> {
    let mut config = printzone::EngineConfig::from_env();
    if args.no_warp {
        config.capabilities.reliable_filters = false;
    }
    config.show_zone_outline = args.outline;

    let mut session = Session::open(&args.session, config)?;
    session.mount(&args.view)?;
    if let Some(color) = &args.color {
        if session.engine.product().color_variant(color).is_none() {
            anyhow::bail!("product has no color variant '{color}'");
        }
        session.run(printzone::Command::SwitchColor(color.clone()));
    }

    let frame = session.engine.render_preview()?.into_straight();
    let png = printzone::encode_png(&frame.data, frame.width, frame.height)?;
    write_output(&args.out, &png)
}

fn cmd_snapshot(args: SnapshotArgs) -> anyhow::Result<()> {
    let mut session = Session::open(&args.session, printzone::EngineConfig::from_env())?;
    let view_ids: Vec<String> = session
        .engine
        .product()
        .views
        .iter()
        .map(|v| v.id.clone())
        .collect();
    for view in &view_ids {
        session.mount(view)?;
    }

    let json = session.engine.snapshot().to_json()?;
    write_output(&args.out, json.as_bytes())
}
