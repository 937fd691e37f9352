// Command-line interface for mindmark
//
// This binary converts mind-map trees to and from Markdown, and inspects how Markdown is read into
// a tree.
//
// The core capabilities use the mindmark-babel crate. This crate is only the shell around it:
// argument parsing, configuration, file IO and exit codes.
//
// Converting:
//
// The conversion needs a to and from pair. The from can be auto-detected from the file extension,
// while being overwrittable by an explicit --from flag.
// Usage:
//  mindmark <input> --to <format> [--from <format>] [--output <file>]          - Convert between formats (default)
//  mindmark convert <input> --to <format> [--from <format>] [--output <file>]  - Same as above (explicit)
//  mindmark inspect <path> [<transform>]     - Execute a transform (defaults to "tree-treeviz")
//  mindmark --list-formats                   - List conversion formats and transforms
//
// Markdown output restores the blank lines of the Markdown the tree came from when that Markdown
// is known: pass it with --original, or convert markdown to markdown.
//
// Extra Parameters:
//
// Format-specific parameters can be passed using --extra-<parameter-name> <value>.
// The CLI layer strips the "extra-" prefix and passes the parameters to the format/transform.
// Example:
//  mindmark map.json --to markdown --extra-start-header-level 2

mod transforms;

use clap::{Arg, ArgAction, Command, ValueHint};
use mindmark_babel::FormatRegistry;
use mindmark_config::{Loader, MindmarkConfig};
use std::collections::HashMap;
use std::fs;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Parse extra-* arguments from command line args
/// Returns (cleaned_args_without_extras, extra_params_map)
///
/// Supports both:
/// - `--extra-<key> <value>` (explicit value)
/// - `--extra-<key>` (boolean flag, defaults to "true")
/// - `--extras-<key>` (alias for `--extra-<key>`)
fn parse_extra_args(args: &[String]) -> (Vec<String>, HashMap<String, String>) {
    let mut cleaned_args = Vec::new();
    let mut extra_params = HashMap::new();
    let mut i = 0;

    while i < args.len() {
        let arg = &args[i];

        let key_opt = if let Some(key) = arg.strip_prefix("--extra-") {
            Some(key)
        } else {
            arg.strip_prefix("--extras-")
        };

        if let Some(key) = key_opt {
            // A following arg that is not a flag is this key's value
            let has_value = args
                .get(i + 1)
                .is_some_and(|next| !next.starts_with('-'));

            if has_value {
                extra_params.insert(key.to_string(), args[i + 1].clone());
                i += 2;
            } else {
                extra_params.insert(key.to_string(), "true".to_string());
                i += 1;
            }
            continue;
        }

        cleaned_args.push(arg.clone());
        i += 1;
    }

    (cleaned_args, extra_params)
}

fn build_cli() -> Command {
    Command::new("mindmark")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Convert mind-map trees to and from Markdown")
        .long_about(
            "mindmark converts mind-map outline trees (JSON or clipboard HTML) to Markdown and back.\n\n\
            Commands:\n  \
            - convert: Transform between formats (markdown, json, clipboard, text, treeviz)\n  \
            - inspect: View how a Markdown file is read into a tree\n\n\
            Extra Parameters:\n  \
            Use --extra-<name> [value] to pass format-specific options.\n  \
            Boolean flags can omit the value (defaults to 'true').\n\n\
            Examples:\n  \
            mindmark map.json --to markdown                   # Tree JSON to Markdown (stdout)\n  \
            mindmark notes.md --to json -o map.json           # Markdown to tree JSON file\n  \
            mindmark paste.html --to markdown                 # Clipboard payload to Markdown\n  \
            mindmark inspect notes.md                         # Tree visualization of a Markdown file"
        )
        .arg_required_else_help(true)
        .subcommand_required(false)
        .arg(
            Arg::new("list-formats")
                .long("list-formats")
                .help("List conversion formats and inspect transforms")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .help("Path to a mindmark.toml configuration file")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .subcommand(
            Command::new("inspect")
                .about("Inspect how a Markdown file is read into a tree")
                .long_about(
                    "View the structure mindmark reads from a Markdown file.\n\n\
                    Transforms (stage-format):\n  \
                    - tree-treeviz:  Parsed tree as tree visualization (default)\n  \
                    - tree-json:     Parsed tree as pretty JSON\n  \
                    - line-classes:  Class and indent level of every source line\n\n\
                    Extra Parameters:\n  \
                    --extra-show-indent   Append the source indent level of list nodes (treeviz)\n\n\
                    Examples:\n  \
                    mindmark inspect notes.md                          # Tree visualization (default)\n  \
                    mindmark inspect notes.md line-classes             # Line classification\n  \
                    mindmark inspect notes.md --extra-show-indent      # Tree with indent levels"
                )
                .arg(
                    Arg::new("path")
                        .help("Path to the Markdown file")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("transform")
                        .help("Transform to apply (stage-format). Defaults to 'tree-treeviz'")
                        .required(false)
                        .value_parser(clap::builder::PossibleValuesParser::new(
                            transforms::AVAILABLE_TRANSFORMS,
                        ))
                        .index(2)
                        .value_hint(ValueHint::Other),
                ),
        )
        .subcommand(
            Command::new("convert")
                .about("Convert between formats (default command)")
                .long_about(
                    "Convert between mind-map trees and Markdown.\n\n\
                    Supported formats:\n  \
                    - markdown:  Markdown outline (.md)\n  \
                    - json:      Tree JSON (.json)\n  \
                    - clipboard: Clipboard HTML with a data-mind-map attribute (.html)\n  \
                    - text:      Indented plain text, output only (.txt)\n  \
                    - treeviz:   Tree visualization, output only\n\n\
                    The source format is auto-detected from the file extension.\n\
                    Output goes to stdout by default, or use -o to specify a file.\n\n\
                    Examples:\n  \
                    mindmark convert map.json --to markdown                        # JSON to Markdown\n  \
                    mindmark convert map.json --to markdown --original notes.md    # Keep the notes.md layout\n  \
                    mindmark notes.md --to clipboard -o paste.html                 # 'convert' is optional"
                )
                .arg(
                    Arg::new("input")
                        .help("Input file path")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("from")
                        .long("from")
                        .help("Source format (auto-detected from file extension if not specified)")
                        .value_hint(ValueHint::Other),
                )
                .arg(
                    Arg::new("to")
                        .long("to")
                        .help("Target format (required)")
                        .required(true)
                        .value_hint(ValueHint::Other),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .help("Output file path (defaults to stdout)")
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("original")
                        .long("original")
                        .value_name("PATH")
                        .help("Markdown the tree was made from, to restore its blank lines")
                        .value_hint(ValueHint::FilePath),
                ),
        )
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mindmark=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() {
    init_tracing();

    let args: Vec<String> = std::env::args().collect();

    // Parse extra-* arguments before clap processing
    let (cleaned_args, mut extra_params) = parse_extra_args(&args);

    // If no subcommand is provided, inject "convert"
    let cli = build_cli();
    let matches = match cli.clone().try_get_matches_from(&cleaned_args) {
        Ok(m) => m,
        Err(e) => {
            if cleaned_args.len() > 1
                && !cleaned_args[1].starts_with('-')
                && cleaned_args[1] != "inspect"
                && cleaned_args[1] != "convert"
                && cleaned_args[1] != "help"
            {
                let mut new_args = vec![cleaned_args[0].clone(), "convert".to_string()];
                new_args.extend_from_slice(&cleaned_args[1..]);

                match cli.try_get_matches_from(&new_args) {
                    Ok(m) => m,
                    Err(e2) => e2.exit(),
                }
            } else {
                e.exit();
            }
        }
    };

    if matches.get_flag("list-formats") {
        handle_list_formats_command();
        return;
    }

    let mut config = load_cli_config(matches.get_one::<String>("config").map(|s| s.as_str()));
    apply_config_overrides(&mut config, &mut extra_params);

    match matches.subcommand() {
        Some(("inspect", sub_matches)) => {
            let path = sub_matches
                .get_one::<String>("path")
                .expect("path is required");
            let transform = sub_matches
                .get_one::<String>("transform")
                .map(|s| s.as_str())
                .unwrap_or("tree-treeviz");
            handle_inspect_command(path, transform, &extra_params, &config);
        }
        Some(("convert", sub_matches)) => {
            let input = sub_matches
                .get_one::<String>("input")
                .expect("input is required");
            let to = sub_matches.get_one::<String>("to").expect("to is required");

            let from = match sub_matches.get_one::<String>("from") {
                Some(f) => f.to_string(),
                None => {
                    let registry = FormatRegistry::default();
                    match registry.detect_format_from_filename(input) {
                        Some(detected) => detected,
                        None => {
                            eprintln!("Error: Could not detect format from filename '{input}'");
                            eprintln!("Please specify --from explicitly");
                            std::process::exit(1);
                        }
                    }
                }
            };

            let request = ConvertRequest {
                input,
                from: &from,
                to,
                output: sub_matches.get_one::<String>("output").map(|s| s.as_str()),
                original: sub_matches
                    .get_one::<String>("original")
                    .map(|s| s.as_str()),
            };
            handle_convert_command(&request, &extra_params, &config);
        }
        _ => {
            eprintln!("Unknown subcommand. Use --help for usage information.");
            std::process::exit(1);
        }
    }
}

/// Handle the inspect command
fn handle_inspect_command(
    path: &str,
    transform: &str,
    extra_params: &HashMap<String, String>,
    config: &MindmarkConfig,
) {
    let source = read_file(path);
    let params = build_inspect_params(config, transform, extra_params);

    let output = transforms::execute_transform(&source, transform, &params).unwrap_or_else(|e| {
        eprintln!("Execution error: {e}");
        std::process::exit(1);
    });

    print!("{output}");
}

struct ConvertRequest<'a> {
    input: &'a str,
    from: &'a str,
    to: &'a str,
    output: Option<&'a str>,
    original: Option<&'a str>,
}

/// Handle the convert command
fn handle_convert_command(
    request: &ConvertRequest,
    extra_params: &HashMap<String, String>,
    config: &MindmarkConfig,
) {
    let registry = FormatRegistry::default();

    for name in [request.from, request.to] {
        if let Err(e) = registry.get(name) {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }

    let source = read_file(request.input);
    let format_options = build_format_options(config, request, &source, extra_params);
    debug!(
        input = request.input,
        options = format_options.len(),
        "converting"
    );

    let mut result = registry
        .convert(&source, request.from, request.to, &format_options)
        .unwrap_or_else(|e| {
            eprintln!("Error: {e}");
            std::process::exit(1);
        });
    if !result.ends_with('\n') {
        result.push('\n');
    }

    match request.output {
        Some(path) => {
            fs::write(path, result).unwrap_or_else(|e| {
                eprintln!("Error writing file '{path}': {e}");
                std::process::exit(1);
            });
        }
        None => print!("{result}"),
    }
}

/// Options for the target format: configuration first, then the original Markdown, then
/// `--extra-*` parameters.
fn build_format_options(
    config: &MindmarkConfig,
    request: &ConvertRequest,
    source: &str,
    extra_params: &HashMap<String, String>,
) -> HashMap<String, String> {
    let mut options = config.format_options(request.to);

    if request.to == "markdown" {
        let original = match request.original {
            Some(path) => Some(read_file(path)),
            None if request.from == "markdown" => Some(source.to_string()),
            None => None,
        };
        if let Some(original) = original {
            options.insert("original".to_string(), original);
        }
    } else if request.original.is_some() {
        eprintln!("Error: --original only applies when converting to markdown");
        std::process::exit(1);
    }

    for (key, value) in extra_params {
        options.insert(key.clone(), value.clone());
    }
    options
}

/// Handle the list-formats command
fn handle_list_formats_command() {
    println!("Conversion formats:");
    let registry = FormatRegistry::default();
    let parsers = registry.parsers();
    for format_name in registry.list_formats() {
        let description = registry
            .get(&format_name)
            .map(|format| format.description().to_string())
            .unwrap_or_default();
        let direction = if parsers.contains(&format_name) {
            "in/out"
        } else {
            "out"
        };
        println!("  {format_name:<10} {direction:<7} {description}");
    }

    println!("\nInspect transforms:");
    for transform_name in transforms::AVAILABLE_TRANSFORMS {
        println!("  {transform_name}");
    }
}

fn read_file(path: &str) -> String {
    fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading file '{path}': {e}");
        std::process::exit(1);
    })
}

fn load_cli_config(explicit_path: Option<&str>) -> MindmarkConfig {
    let loader = Loader::new().with_optional_file("mindmark.toml");
    let loader = if let Some(path) = explicit_path {
        loader.with_file(path)
    } else {
        loader
    };

    loader.build().unwrap_or_else(|err| {
        eprintln!("Failed to load configuration: {err}");
        std::process::exit(1);
    })
}

/// Fold `--extra-*` parameters that mirror configuration keys into the configuration.
///
/// Everything left in `extra_params` is passed through to the format untouched.
fn apply_config_overrides(config: &mut MindmarkConfig, extra_params: &mut HashMap<String, String>) {
    if let Some(raw) = take_override(extra_params, &["start-header-level", "header-level"]) {
        config.markdown.start_header_level = raw.parse().unwrap_or_else(|_| {
            eprintln!("Invalid number '{raw}' for --extra-start-header-level");
            std::process::exit(1);
        });
    }
    if let Some(raw) = take_override(extra_params, &["preserve-line-format"]) {
        config.markdown.preserve_line_format = parse_bool_arg("preserve-line-format", &raw);
    }
    if let Some(raw) = take_override(extra_params, &["pretty"]) {
        config.json.pretty = parse_bool_arg("pretty", &raw);
    }
    if let Some(raw) = take_override(extra_params, &["indent", "indent-string"]) {
        config.text.indent_string = raw;
    }
    if let Some(raw) = take_override(extra_params, &["show-indent"]) {
        config.inspect.treeviz.show_indent = parse_bool_arg("show-indent", &raw);
    }
}

fn build_inspect_params(
    config: &MindmarkConfig,
    transform: &str,
    overrides: &HashMap<String, String>,
) -> HashMap<String, String> {
    let mut params = HashMap::new();

    if transform == "tree-treeviz" {
        params = config.format_options("treeviz");
    }

    for (key, value) in overrides {
        params.insert(key.clone(), value.clone());
    }

    params
}

fn take_override(map: &mut HashMap<String, String>, keys: &[&str]) -> Option<String> {
    for key in keys {
        if let Some(value) = map.remove(*key) {
            return Some(value);
        }
    }
    None
}

fn parse_bool_arg(flag: &str, raw: &str) -> bool {
    match raw.to_lowercase().as_str() {
        "true" | "1" | "yes" | "y" => true,
        "false" | "0" | "no" | "n" => false,
        other => {
            eprintln!("Invalid boolean value '{other}' for --extra-{flag}");
            std::process::exit(1);
        }
    }
}
