// Command-line interface for lyxconv
//
// This binary converts LyX documents to other formats and offers an inspect
// command to look at the intermediate container trees.
//
// Converting:
//
// The target format defaults to html. It is taken from the extension of the
// output file when -o is given, and --to always wins.
// Usage:
//  lyxconv <input> [--to <format>] [--output <file>]          - Convert (default)
//  lyxconv convert <input> [--to <format>] [--output <file>]  - Same as above (explicit)
//  lyxconv inspect <path> [<transform>]                       - Execute a transform (defaults to "final-treeviz")
//  lyxconv --list-formats | --list-kinds | --list-transforms
//
// The input "-" reads from stdin.
//
// Extra Parameters:
//
// Format-specific parameters can be passed using --extra-<parameter-name> <value>.
// The CLI layer strips the "extra-" prefix and passes the parameters to the format/transform.
// Example:
//  lyxconv inspect file.lyx --extra-tree-full --extra-show-linum false

use lyxconv_cli::transforms;

use clap::{Arg, ArgAction, Command, ValueHint};
use log::{debug, LevelFilter};
use lyxconv_config::{Loader, LyxconvConfig};
use lyxconv_core::{
    convert, ContainerConfig, ContainerKind, ConvertOptions, Converter, LineReader,
    RenderOptions,
};
use std::collections::HashMap;
use std::fs;
use std::io::{self, BufReader, Read, Write};

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
            let has_value = i + 1 < args.len() && !args[i + 1].starts_with('-');

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

const SUBCOMMANDS: &[&str] = &["inspect", "convert", "generate-css", "help"];

fn build_cli() -> Command {
    Command::new("lyxconv")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Convert LyX documents to HTML and other formats")
        .long_about(
            "lyxconv reads LyX documents line by line, rebuilds their structure and\n\
            renders it in another format.\n\n\
            Commands:\n  \
            - convert: Convert a document (default command)\n  \
            - inspect: View intermediate representations (dispatch, trees)\n\n\
            Extra Parameters:\n  \
            Use --extra-<name> [value] to pass format-specific options.\n  \
            Boolean flags can omit the value (defaults to 'true').\n\n\
            Examples:\n  \
            lyxconv paper.lyx                       # HTML to stdout\n  \
            lyxconv paper.lyx -o paper.html         # HTML to a file\n  \
            lyxconv paper.lyx --to treeviz          # Tree of the finalized document\n  \
            lyxconv inspect paper.lyx line-dispatch # Kind of every line"
        )
        .arg_required_else_help(true)
        .subcommand_required(false)
        .arg(
            Arg::new("list-formats")
                .long("list-formats")
                .help("List available output formats")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("list-kinds")
                .long("list-kinds")
                .help("List container kinds and their start markers")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("list-transforms")
                .long("list-transforms")
                .help("List available inspect transforms")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .help("Path to a lyxconv.toml configuration file")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Log more (repeat for more detail)")
                .action(ArgAction::Count)
                .global(true),
        )
        .subcommand(
            Command::new("inspect")
                .about("Inspect intermediate representations of LyX files")
                .long_about(
                    "View the structure of LyX files at different processing stages.\n\n\
                    Transforms (stage-format):\n  \
                    - line-dispatch:  kind selected for every input line\n  \
                    - parse-treeviz:  container tree after local processing\n  \
                    - parse-json:     same, as JSON\n  \
                    - parse-order:    order of local processing\n  \
                    - final-treeviz:  container tree after postprocessing (default)\n  \
                    - final-json:     same, as JSON\n\n\
                    Extra Parameters:\n  \
                    --extra-tree-full         List the parameters of every container\n  \
                    --extra-show-linum false  Hide source line numbers\n\n\
                    Examples:\n  \
                    lyxconv inspect file.lyx                    # Tree visualization (default)\n  \
                    lyxconv inspect file.lyx parse-order        # Local processing order\n  \
                    lyxconv inspect file.lyx --extra-tree-full  # Tree with parameters"
                )
                .arg(
                    Arg::new("path")
                        .help("Path to the LyX file")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("transform")
                        .help("Transform to apply (stage-format). Defaults to 'final-treeviz'")
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
                .about("Convert a LyX document (default command)")
                .long_about(
                    "Convert a LyX document to another format.\n\n\
                    Formats:\n  \
                    - html:     HTML5 page with embedded CSS (default)\n  \
                    - raw:      the input lines, unchanged\n  \
                    - treeviz:  tree of the finalized containers\n  \
                    - json:     one JSON tree per top-level container\n\n\
                    Output goes to stdout by default, or use -o to specify a file.\n\
                    Nothing is written when the conversion fails.\n\n\
                    Examples:\n  \
                    lyxconv convert input.lyx -o out.html          # Generate HTML\n  \
                    lyxconv input.lyx --to html --filter-header-footer  # Body fragment only\n  \
                    cat input.lyx | lyxconv - --to raw             # Read from stdin"
                )
                .arg(
                    Arg::new("input")
                        .help("Input file path, or - for stdin")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("to")
                        .long("to")
                        .help("Target format (defaults to the output extension, then html)")
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
                    Arg::new("filter-header-footer")
                        .long("filter-header-footer")
                        .help("Leave the document header and footer out of the output")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("generate-css")
                .about("Output the default CSS used for HTML export")
                .long_about(
                    "Outputs the stylesheet embedded in HTML output.\n\n\
                    Use this as a starting point for custom styling, then pass the\n\
                    file via --extra-css to extend the default styles.\n\n\
                    Examples:\n  \
                    lyxconv generate-css > custom.css"
                ),
        )
}

fn main() {
    let args: Vec<String> = std::env::args().collect();

    // Parse extra-* arguments before clap processing
    let (cleaned_args, mut extra_params) = parse_extra_args(&args);

    let cli = build_cli();
    let matches = match cli.clone().try_get_matches_from(&cleaned_args) {
        Ok(m) => m,
        Err(e) => {
            // A first argument that is not a subcommand is the input of an
            // implicit convert
            if cleaned_args.len() > 1
                && (!cleaned_args[1].starts_with('-') || cleaned_args[1] == "-")
                && !SUBCOMMANDS.contains(&cleaned_args[1].as_str())
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

    init_logging(matches.get_count("verbose"));

    let mut config = load_cli_config(matches.get_one::<String>("config").map(|s| s.as_str()));
    apply_config_overrides(&mut config, &mut extra_params);
    let converter = build_converter(&config);

    if matches.get_flag("list-formats") {
        handle_list_formats_command(&converter);
        return;
    }
    if matches.get_flag("list-kinds") {
        handle_list_kinds_command(converter.config());
        return;
    }
    if matches.get_flag("list-transforms") {
        handle_list_transforms_command();
        return;
    }

    match matches.subcommand() {
        Some(("inspect", sub_matches)) => {
            let path = sub_matches
                .get_one::<String>("path")
                .expect("path is required");
            let transform = sub_matches
                .get_one::<String>("transform")
                .map(|s| s.as_str())
                .unwrap_or(transforms::DEFAULT_TRANSFORM);
            handle_inspect_command(path, transform, &extra_params, &config, &converter);
        }
        Some(("convert", sub_matches)) => {
            let input = sub_matches
                .get_one::<String>("input")
                .expect("input is required");
            let output = sub_matches.get_one::<String>("output").map(|s| s.as_str());
            let to = match sub_matches.get_one::<String>("to") {
                Some(to) => to.clone(),
                None => output
                    .and_then(|path| converter.formats().detect_format_from_filename(path))
                    .unwrap_or_else(|| "html".to_string()),
            };
            if sub_matches.get_flag("filter-header-footer") {
                config.convert.filter_header_footer = true;
            }
            handle_convert_command(input, &to, output, &extra_params, &config, &converter);
        }
        Some(("generate-css", _)) => {
            print!("{}", lyxconv_core::formats::default_css());
        }
        _ => {
            eprintln!("Unknown subcommand. Use --help for usage information.");
            std::process::exit(1);
        }
    }
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .format_timestamp(None)
        .init();
}

fn build_converter(config: &LyxconvConfig) -> Converter {
    let containers = ContainerConfig::from(&config.containers);
    match Converter::new(containers) {
        Ok(converter) => converter.with_default_language(config.document.language.clone()),
        Err(e) => {
            eprintln!("Error: invalid container configuration: {e}");
            std::process::exit(1);
        }
    }
}

/// Handle the inspect command
fn handle_inspect_command(
    path: &str,
    transform: &str,
    extra_params: &HashMap<String, String>,
    config: &LyxconvConfig,
    converter: &Converter,
) {
    let source = read_source(path);
    let params = build_inspect_params(config, extra_params);

    let output = transforms::execute_transform(&source, transform, &params, converter)
        .unwrap_or_else(|e| {
            eprintln!("Execution error: {e}");
            std::process::exit(1);
        });

    print!("{output}");
}

/// Handle the convert command
fn handle_convert_command(
    input: &str,
    to: &str,
    output: Option<&str>,
    extra_params: &HashMap<String, String>,
    config: &LyxconvConfig,
    converter: &Converter,
) {
    if let Err(e) = converter.formats().get(to) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }

    let mut render = RenderOptions::from(&config.convert.html);
    render.extra = extra_params.clone();
    let options = ConvertOptions {
        format: to.to_string(),
        filter_header_footer: config.convert.filter_header_footer,
        render,
    };

    let reader: Box<dyn Read> = if input == "-" {
        Box::new(io::stdin())
    } else {
        match fs::File::open(input) {
            Ok(file) => Box::new(file),
            Err(e) => {
                eprintln!("Error reading file '{input}': {e}");
                std::process::exit(1);
            }
        }
    };
    let mut source = LineReader::new(BufReader::new(reader));

    let mut buffer = Vec::new();
    match convert(&mut source, &mut buffer, converter, &options) {
        Ok(report) => debug!(
            "converted {} lines into {} top-level containers",
            report.lines, report.top_level
        ),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }

    let written = match output {
        Some(path) => fs::write(path, &buffer),
        None => io::stdout().lock().write_all(&buffer),
    };
    if let Err(e) = written {
        eprintln!("Error writing output: {e}");
        std::process::exit(1);
    }
}

fn read_source(path: &str) -> String {
    let result = if path == "-" {
        let mut text = String::new();
        io::stdin().read_to_string(&mut text).map(|_| text)
    } else {
        fs::read_to_string(path)
    };
    result.unwrap_or_else(|e| {
        eprintln!("Error reading file '{path}': {e}");
        std::process::exit(1);
    })
}

fn handle_list_formats_command(converter: &Converter) {
    println!("Available formats:\n");
    for (name, description) in converter.formats().descriptions() {
        println!("  {name:<10} {description}");
    }
}

fn handle_list_kinds_command(config: &ContainerConfig) {
    println!("Container kinds:\n");
    for kind in ContainerKind::ALL {
        let starts: Vec<&str> = config
            .kinds
            .iter()
            .filter(|def| def.kind == kind)
            .flat_map(|def| def.starts.iter().map(String::as_str))
            .collect();
        let ending = config.ending(kind).unwrap_or("-");
        println!("  {:<13} ending: {ending}", kind.name());
        for start in starts {
            println!("      {start}");
        }
    }
}

fn handle_list_transforms_command() {
    println!("Available transforms:\n");
    for transform_name in transforms::AVAILABLE_TRANSFORMS {
        println!("  {transform_name}");
    }
}

fn load_cli_config(explicit_path: Option<&str>) -> LyxconvConfig {
    let loader = Loader::new().with_optional_file("lyxconv.toml");
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

fn apply_config_overrides(config: &mut LyxconvConfig, extra_params: &mut HashMap<String, String>) {
    if let Some(raw) = extra_params.remove("tree-full") {
        config.inspect.treeviz.include_all_parameters = parse_bool_arg("tree-full", &raw);
    }
    if let Some(raw) = extra_params.remove("show-linum") {
        config.inspect.treeviz.show_line_numbers = parse_bool_arg("show-linum", &raw);
    }
    if let Some(raw) = take_override(extra_params, &["filter", "filter-header-footer"]) {
        config.convert.filter_header_footer = parse_bool_arg("filter", &raw);
    }
    if let Some(raw) = take_override(extra_params, &["language", "lang"]) {
        config.document.language = raw;
    }
    if let Some(title) = extra_params.remove("title") {
        config.convert.html.title = title;
    }
    if let Some(path) = take_override(extra_params, &["css", "css-path"]) {
        match fs::read_to_string(&path) {
            Ok(css) => config.convert.html.custom_css = css,
            Err(e) => {
                eprintln!("Error reading CSS file '{path}': {e}");
                std::process::exit(1);
            }
        }
    }
}

fn build_inspect_params(
    config: &LyxconvConfig,
    overrides: &HashMap<String, String>,
) -> HashMap<String, String> {
    let mut params = HashMap::new();

    if config.inspect.treeviz.include_all_parameters {
        params.insert("tree-full".to_string(), "true".to_string());
    }
    params.insert(
        "show-linum".to_string(),
        config.inspect.treeviz.show_line_numbers.to_string(),
    );
    params.insert(
        "filter-header-footer".to_string(),
        config.convert.filter_header_footer.to_string(),
    );

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
