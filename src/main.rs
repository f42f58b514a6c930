//! cadeia-dominial CLI entry point.

use std::fmt::Display;
use std::fs;
use std::io::{self, Read, Write};
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use cadeia_dominial::config::{LayoutConfig, LayoutMode, Orientation};
use cadeia_dominial::interaction::{ChainScope, GraphSession, MemoryBackend, SequenceSelection};
use cadeia_dominial::model::TreeData;
use cadeia_dominial::renderers::{OutlineRenderer, Renderer};
use cadeia_dominial::{OutputFormat, parsers, render_payload};

/// Chain-of-title graph engine for land registry documents.
#[derive(Parser, Debug)]
#[command(name = "cadeia-dominial", version = env!("CADEIA_DOMINIAL_VERSION"))]
struct Cli {
    /// Layout configuration (JSON); flags override individual fields
    #[arg(short = 'c', long = "config", global = true)]
    config: Option<String>,

    /// Log pipeline stages to stderr
    #[arg(short = 'v', long = "verbose", global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a tree-data payload
    Render {
        /// Payload file (reads from stdin if not provided)
        input: Option<String>,

        #[arg(short = 'f', long = "format", value_enum, default_value = "svg")]
        format: FormatArg,

        #[arg(short = 'm', long = "mode", value_enum)]
        mode: Option<ModeArg>,

        #[arg(long = "orientation", value_enum)]
        orientation: Option<OrientationArg>,

        /// Write output to this file instead of stdout
        #[arg(short = 'o', long = "output")]
        output: Option<String>,
    },
    /// Make ORIGIN the chosen origin of DOCUMENT and save the payload
    ChooseOrigin {
        input: String,
        #[arg(long = "document")]
        document: String,
        #[arg(long = "origin")]
        origin: String,
    },
    /// Pin a document's level, or return it to automatic
    #[command(allow_negative_numbers = true)]
    SetLevel {
        input: String,
        #[arg(long = "document")]
        document: String,
        #[arg(long = "level", conflicts_with = "auto", required_unless_present = "auto")]
        level: Option<i64>,
        #[arg(long = "auto")]
        auto: bool,
    },
    /// Create the document for an identified origin and save the payload
    CreateDocument { input: String, code: String },
    /// Print the export query for the given documents, in order
    Export {
        input: String,
        #[arg(required = true)]
        codes: Vec<String>,
        /// Export endpoint; prints the full URL instead of the query
        #[arg(long = "endpoint")]
        endpoint: Option<String>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum FormatArg {
    Svg,
    Json,
    Outline,
    Table,
}

impl From<FormatArg> for OutputFormat {
    fn from(f: FormatArg) -> Self {
        match f {
            FormatArg::Svg => OutputFormat::Svg,
            FormatArg::Json => OutputFormat::Json,
            FormatArg::Outline => OutputFormat::Outline,
            FormatArg::Table => OutputFormat::Table,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ModeArg {
    Rows,
    Tree,
    Radial,
}

impl From<ModeArg> for LayoutMode {
    fn from(m: ModeArg) -> Self {
        match m {
            ModeArg::Rows => LayoutMode::Rows,
            ModeArg::Tree => LayoutMode::Tree,
            ModeArg::Radial => LayoutMode::Radial,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum OrientationArg {
    Vertical,
    Horizontal,
}

impl From<OrientationArg> for Orientation {
    fn from(o: OrientationArg) -> Self {
        match o {
            OrientationArg::Vertical => Orientation::Vertical,
            OrientationArg::Horizontal => Orientation::Horizontal,
        }
    }
}

fn fail(message: impl Display) -> ! {
    eprintln!("error: {}", message);
    process::exit(1);
}

fn read_input(path: Option<&str>) -> String {
    match path {
        Some(path) => fs::read_to_string(path)
            .unwrap_or_else(|e| fail(format!("cannot read '{}': {}", path, e))),
        None => {
            let mut buf = String::new();
            if let Err(e) = io::stdin().read_to_string(&mut buf) {
                fail(format!("cannot read stdin: {}", e));
            }
            buf
        }
    }
}

fn load_config(path: Option<&str>) -> LayoutConfig {
    let Some(path) = path else {
        return LayoutConfig::default();
    };
    let text =
        fs::read_to_string(path).unwrap_or_else(|e| fail(format!("cannot read '{}': {}", path, e)));
    serde_json::from_str(&text).unwrap_or_else(|e| fail(format!("invalid config '{}': {}", path, e)))
}

fn write_output(path: Option<&str>, text: &str) {
    match path {
        Some(path) => {
            if let Err(e) = fs::write(path, text) {
                fail(format!("cannot write '{}': {}", path, e));
            }
        }
        None => {
            let mut stdout = io::stdout();
            if let Err(e) = writeln!(stdout, "{}", text).and_then(|()| stdout.flush()) {
                fail(format!("cannot write stdout: {}", e));
            }
        }
    }
}

/// Open `path` in a session backed by memory, apply `mutate`, write the
/// updated payload back and print the new outline.
fn mutate_file<F>(path: &str, config: LayoutConfig, mutate: F)
where
    F: FnOnce(&mut GraphSession<MemoryBackend>) -> Result<(), cadeia_dominial::error::ChainError>,
{
    let data = parsers::parse(&read_input(Some(path))).unwrap_or_else(|e| fail(e));
    let mut session = GraphSession::open(MemoryBackend::new(data), ChainScope::new(0, 0), config)
        .unwrap_or_else(|e| fail(e));
    if let Err(e) = mutate(&mut session) {
        fail(e);
    }
    let outline = OutlineRenderer.render(session.view());
    let updated: TreeData = session.into_backend().into_inner();
    let json = serde_json::to_string_pretty(&updated).unwrap_or_else(|e| fail(e));
    write_output(Some(path), &json);
    write_output(None, &outline);
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let mut config = load_config(cli.config.as_deref());

    match cli.command {
        Command::Render {
            input,
            format,
            mode,
            orientation,
            output,
        } => {
            if let Some(mode) = mode {
                config.mode = mode.into();
            }
            if let Some(orientation) = orientation {
                config.orientation = orientation.into();
            }
            let text = read_input(input.as_deref());
            let rendered =
                render_payload(&text, format.into(), &config).unwrap_or_else(|e| fail(e));
            write_output(output.as_deref(), &rendered);
        }
        Command::ChooseOrigin {
            input,
            document,
            origin,
        } => mutate_file(&input, config, |session| {
            session.choose_origin(&document, &origin).map(|_| ())
        }),
        Command::SetLevel {
            input,
            document,
            level,
            auto,
        } => {
            let level = if auto { None } else { level };
            mutate_file(&input, config, |session| {
                session.set_manual_level(&document, level).map(|_| ())
            })
        }
        Command::CreateDocument { input, code } => mutate_file(&input, config, |session| {
            session.create_origin_document(&code).map(|_| ())
        }),
        Command::Export {
            input,
            codes,
            endpoint,
        } => {
            let data = parsers::parse(&read_input(Some(&input))).unwrap_or_else(|e| fail(e));
            let mut selection =
                SequenceSelection::from_codes(&data, codes.as_slice()).unwrap_or_else(|e| fail(e));
            let text = match endpoint {
                Some(endpoint) => {
                    let url = url::Url::parse(&endpoint)
                        .unwrap_or_else(|e| fail(format!("invalid endpoint '{}': {}", endpoint, e)));
                    selection.export(&url).to_string()
                }
                None => selection.query(),
            };
            write_output(None, &text);
        }
    }
}
