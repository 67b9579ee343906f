//! Command-line interface for nanolp-pub
//! This binary links the chunk references of an HTML document rendered from a literate program.
//!
//! Usage:
//!   nanolp-pub `<input>`                                 - Print the linked document
//!   nanolp-pub `<input>` -o `<output>`                   - Write it to a file
//!   nanolp-pub `<input>` --in-place                      - Overwrite the input
//!   nanolp-pub `<input>` --map `<commands.json>` -o ...  - Link across documents (mapped policy)

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use nanolp_config::{ConfigLoadError, Loader, NanolpConfig};
use nanolp_html::{
    publish, read_source, write_default_stylesheet, PublishArtifact, PublishSpec, SourceUrls,
};
use nanolp_refs::Policy;
use std::error::Error;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// String flags and the configuration keys they override.
const STRING_OVERRIDES: &[(&str, &str)] = &[
    ("policy", "resolve.policy"),
    ("map", "resolve.command_map"),
    ("base-url", "resolve.base_url"),
    ("left", "delimiters.left"),
    ("right", "delimiters.right"),
    ("stylesheet", "publish.stylesheet"),
];

const LOG_TARGETS: &[&str] = &["nanolp_refs", "nanolp_html", "nanolp_config", "nanolp_pub"];

fn main() {
    let matches = cli().get_matches();
    init_logging(matches.get_flag("verbose"));

    if let Err(err) = run(&matches) {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

fn cli() -> Command {
    Command::new("nanolp-pub")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Turns chunk markers of a rendered literate program into hyperlinks")
        .arg_required_else_help(true)
        .arg(
            Arg::new("input")
                .help("Path to the HTML document")
                .required(true)
                .value_parser(value_parser!(PathBuf))
                .index(1),
        )
        .arg(
            Arg::new("output")
                .long("output")
                .short('o')
                .help("Write the linked document here instead of stdout")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("in-place")
                .long("in-place")
                .help("Overwrite the input document")
                .action(ArgAction::SetTrue)
                .conflicts_with("output"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .help("Configuration file layered over the defaults")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("policy")
                .long("policy")
                .help("Where pastes look for chunks (default: in-page, or mapped with --map)")
                .value_parser(["in-page", "mapped"]),
        )
        .arg(
            Arg::new("map")
                .long("map")
                .short('m')
                .help("JSON command map {chunk name: source location}"),
        )
        .arg(
            Arg::new("left")
                .long("left")
                .help("Left marker delimiter")
                .allow_hyphen_values(true),
        )
        .arg(
            Arg::new("right")
                .long("right")
                .help("Right marker delimiter")
                .allow_hyphen_values(true),
        )
        .arg(
            Arg::new("base-url")
                .long("base-url")
                .help("URL prefix for source files of the command map"),
        )
        .arg(
            Arg::new("stylesheet")
                .long("stylesheet")
                .help("Stylesheet href to link from the document head"),
        )
        .arg(
            Arg::new("write-css")
                .long("write-css")
                .help("Write the default stylesheet next to the output unless one exists")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("force")
                .long("force")
                .help("Link documents that were already processed")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Log what is linked")
                .action(ArgAction::SetTrue),
        )
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let directives = LOG_TARGETS
        .iter()
        .map(|target| format!("{}={}", target, level))
        .collect::<Vec<_>>()
        .join(",");

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| directives.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load_config(matches: &ArgMatches) -> Result<NanolpConfig, ConfigLoadError> {
    let mut loader = Loader::new();
    if let Some(path) = matches.get_one::<PathBuf>("config") {
        loader = loader.with_file(path);
    }

    for (arg, key) in STRING_OVERRIDES {
        if let Some(value) = matches.get_one::<String>(arg) {
            loader = loader.set_override(key, value.as_str())?;
        }
    }
    if matches.contains_id("map") && !matches.contains_id("policy") {
        loader = loader.set_override("resolve.policy", "mapped")?;
    }
    if matches.get_flag("force") {
        loader = loader.set_override("publish.force", true)?;
    }

    Ok(loader.build()?)
}

fn run(matches: &ArgMatches) -> Result<(), Box<dyn Error>> {
    let input = matches
        .get_one::<PathBuf>("input")
        .expect("input is a required argument");
    let output = if matches.get_flag("in-place") {
        Some(input.clone())
    } else {
        matches.get_one::<PathBuf>("output").cloned()
    };
    let out_dir = output
        .as_deref()
        .and_then(Path::parent)
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or(Path::new("."))
        .to_path_buf();

    let config = load_config(matches)?;
    let mut resolve = config.resolve_config()?;

    let rebased = match &resolve.policy {
        Policy::Mapped(commands) => Some(
            SourceUrls::new(&out_dir)
                .with_base_url(&config.resolve.base_url)
                .with_document(input)
                .rebase(commands)?,
        ),
        Policy::InPage => None,
    };
    if let Some(commands) = rebased {
        tracing::debug!(chunks = commands.len(), "loaded command map");
        resolve.policy = Policy::Mapped(commands);
    }

    let source = read_source(input)?;
    let mut spec = PublishSpec::new(&source, &resolve)
        .with_stylesheet(config.publish.stylesheet.clone())
        .force(config.publish.force);
    if let Some(path) = &output {
        spec = spec.with_output_path(path);
    }

    let result = publish(spec)?;
    tracing::info!(
        input = %input.display(),
        definitions = result.report.definitions,
        pastes = result.report.pastes,
        "linked document"
    );

    match result.artifact {
        PublishArtifact::InMemory(html) => print!("{}", html),
        PublishArtifact::File(path) => tracing::info!(path = %path.display(), "wrote document"),
    }

    if matches.get_flag("write-css") {
        if let Some(path) = write_default_stylesheet(&out_dir)? {
            tracing::info!(path = %path.display(), "wrote stylesheet");
        }
    }

    Ok(())
}
