use std::{
    fs::File,
    io::BufWriter,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use modkit::{
    AssetKey, BulkEvent, BulkOperation, CancelToken, ColorAdjust, EditorConfig, EditorSession,
    MediaKind, Rgba8, SessionDocument, parse_manifest,
};

#[derive(Parser, Debug)]
#[command(name = "modkit", version)]
struct Cli {
    /// Editor config JSON (archive layout, encoder settings, threading).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log debug output to stderr.
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List every asset with its kind, size and edit state.
    Inspect(InputArgs),
    /// Apply one bulk operation to the selected assets and save the session.
    Apply(ApplyArgs),
    /// Write the edited bundle as a ZIP archive.
    Export(ExportArgs),
}

#[derive(Args, Debug)]
struct InputArgs {
    /// Image list JSON: {collection: [file, ...]}.
    #[arg(long)]
    images_list: Option<PathBuf>,

    /// Image structure JSON: {collection: {file: base64}}.
    #[arg(long)]
    images_structure: Option<PathBuf>,

    /// Audio list JSON.
    #[arg(long)]
    audio_list: Option<PathBuf>,

    /// Audio structure JSON.
    #[arg(long)]
    audio_structure: Option<PathBuf>,

    /// Session JSON to restore before doing anything else.
    #[arg(long)]
    session: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct ApplyArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Asset to select, as `collection/file`. Repeatable.
    #[arg(long = "select")]
    select: Vec<String>,

    /// Select every asset of this kind's family (jpg, png or mp3).
    #[arg(long)]
    select_all: Option<MediaKind>,

    /// Where to write the resulting session JSON.
    #[arg(long)]
    session_out: PathBuf,

    #[command(subcommand)]
    op: OpCommand,
}

#[derive(Args, Debug)]
struct ExportArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Output ZIP path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Subcommand, Debug)]
enum OpCommand {
    /// Brightness/contrast/saturation, as percentages (100 = unchanged).
    Adjust {
        #[arg(long, default_value_t = 100.0)]
        saturation: f32,
        #[arg(long, default_value_t = 100.0)]
        brightness: f32,
        #[arg(long, default_value_t = 100.0)]
        contrast: f32,
    },
    /// Blend towards a color.
    Recolor {
        #[arg(long)]
        color: Rgba8,
        /// 0..=1
        #[arg(long, default_value_t = 0.5)]
        strength: f32,
    },
    /// Replace with a solid color texture.
    Generate {
        #[arg(long)]
        color: Rgba8,
        #[arg(long)]
        width: Option<u32>,
        #[arg(long)]
        height: Option<u32>,
    },
    /// Replace with an image file.
    ReplaceImage {
        #[arg(long)]
        file: PathBuf,
    },
    /// Convert to another raster format, optionally resizing.
    Convert {
        #[arg(long)]
        to: MediaKind,
        #[arg(long)]
        width: Option<u32>,
        #[arg(long)]
        height: Option<u32>,
    },
    /// Replace with an audio file (any decodable format), optionally trimmed.
    ReplaceAudio {
        #[arg(long)]
        file: PathBuf,
        #[arg(long)]
        start: Option<f64>,
        #[arg(long)]
        end: Option<f64>,
    },
    /// Trim clips to [start, end) seconds.
    TrimAudio {
        #[arg(long)]
        start: f64,
        #[arg(long)]
        end: f64,
    },
    /// Flip the excluded flag.
    Exclude,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match &cli.config {
        Some(path) => EditorConfig::load(path)?,
        None => EditorConfig::default(),
    };

    match cli.cmd {
        Command::Inspect(args) => cmd_inspect(config, args),
        Command::Apply(args) => cmd_apply(config, args),
        Command::Export(args) => cmd_export(config, args),
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn read_text(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("read '{}'", path.display()))
}

fn open_session(config: EditorConfig, input: &InputArgs) -> anyhow::Result<EditorSession> {
    let mut session = EditorSession::new(config);

    let sources = [
        (&input.images_list, &input.images_structure, MediaKind::Png),
        (&input.audio_list, &input.audio_structure, MediaKind::Mp3),
    ];
    for (list, structure, default_kind) in sources {
        match (list, structure) {
            (Some(list), Some(structure)) => {
                let entries =
                    parse_manifest(&read_text(list)?, &read_text(structure)?, default_kind)?;
                let report = session.load(entries)?;
                if !report.skipped.is_empty() {
                    eprintln!("skipped {} undecodable manifest entries", report.skipped.len());
                }
            }
            (None, None) => {}
            _ => anyhow::bail!("list and structure files must be given together"),
        }
    }

    if let Some(path) = &input.session {
        let doc = SessionDocument::from_json(&read_text(path)?)?;
        let report = session.import_session(&doc);
        for key in &report.skipped {
            eprintln!("session entry skipped: {key}");
        }
    }
    Ok(session)
}

fn cmd_inspect(config: EditorConfig, args: InputArgs) -> anyhow::Result<()> {
    let session = open_session(config, &args)?;
    for record in session.registry().list_all() {
        let state = match (record.is_excluded(), record.content_changed()) {
            (true, _) => "excluded",
            (false, true) => "edited",
            (false, false) => "original",
        };
        println!(
            "{}\t{}\t{}\t{}",
            record.key(),
            record.current_kind(),
            record.current_bytes().len(),
            state
        );
    }
    Ok(())
}

fn cmd_apply(config: EditorConfig, args: ApplyArgs) -> anyhow::Result<()> {
    let mut session = open_session(config, &args.input)?;
    let op = build_op(args.op)?;

    session.set_mode(op.required_mode());
    for raw in &args.select {
        let key = AssetKey::parse(raw)?;
        session
            .toggle(&key)
            .with_context(|| format!("select '{key}'"))?;
    }
    if let Some(kind) = args.select_all {
        session.select_all(kind);
    }
    if session.selection().is_empty() {
        anyhow::bail!("nothing selected; use --select or --select-all");
    }

    let report = session.apply_with(&op, &CancelToken::new(), &mut |event| {
        if let BulkEvent::Progress {
            processed,
            total,
            current,
            succeeded,
        } = event
        {
            let mark = if *succeeded { "ok" } else { "FAILED" };
            eprintln!("[{processed}/{total}] {current} {mark}");
        }
    })?;
    for failure in &report.failures {
        eprintln!("{}: {}", failure.key, failure.error);
    }
    for key in &report.skipped {
        eprintln!("{key}: not applicable to {}", report.operation);
    }

    let doc = session.export_session();
    if let Some(parent) = args.session_out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(&args.session_out, doc.to_json()?)
        .with_context(|| format!("write session '{}'", args.session_out.display()))?;

    eprintln!(
        "{}: {} succeeded, {} failed; wrote {}",
        report.operation,
        report.success_count(),
        report.failures.len(),
        args.session_out.display()
    );
    Ok(())
}

fn cmd_export(config: EditorConfig, args: ExportArgs) -> anyhow::Result<()> {
    let session = open_session(config, &args.input)?;

    if let Some(parent) = args.out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    let file =
        File::create(&args.out).with_context(|| format!("create '{}'", args.out.display()))?;
    session.write_archive(BufWriter::new(file))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn build_op(op: OpCommand) -> anyhow::Result<BulkOperation> {
    let read_file = |path: &Path| -> anyhow::Result<Arc<Vec<u8>>> {
        let bytes = std::fs::read(path).with_context(|| format!("read '{}'", path.display()))?;
        Ok(Arc::new(bytes))
    };

    Ok(match op {
        OpCommand::Adjust {
            saturation,
            brightness,
            contrast,
        } => BulkOperation::ColorAdjust(ColorAdjust::from_percent(
            saturation, brightness, contrast,
        )),
        OpCommand::Recolor { color, strength } => BulkOperation::Recolor { color, strength },
        OpCommand::Generate {
            color,
            width,
            height,
        } => BulkOperation::Generate {
            color,
            width,
            height,
        },
        OpCommand::ReplaceImage { file } => BulkOperation::ReplaceImage {
            bytes: read_file(&file)?,
        },
        OpCommand::Convert { to, width, height } => BulkOperation::ConvertFormat {
            kind: to,
            width,
            height,
        },
        OpCommand::ReplaceAudio { file, start, end } => BulkOperation::ReplaceAudio {
            bytes: read_file(&file)?,
            start_secs: start,
            end_secs: end,
        },
        OpCommand::TrimAudio { start, end } => BulkOperation::TrimAudio {
            start_secs: start,
            end_secs: end,
        },
        OpCommand::Exclude => BulkOperation::ToggleExclusion,
    })
}
