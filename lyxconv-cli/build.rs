use clap::{Arg, ArgAction, Command, ValueHint};
use clap_complete::{generate_to, shells::*};
use std::env;
use std::io::Error;

// Mirror of the transforms from src/transforms.rs
// We need to duplicate this here since build scripts can't access src/ modules
const AVAILABLE_TRANSFORMS: &[&str] = &[
    "line-dispatch",
    "parse-treeviz",
    "parse-json",
    "parse-order",
    "final-treeviz",
    "final-json",
];

const FORMATS: &[&str] = &["html", "json", "raw", "treeviz"];

fn main() -> Result<(), Error> {
    let outdir = match env::var_os("OUT_DIR") {
        None => return Ok(()),
        Some(outdir) => outdir,
    };

    let input = || {
        Arg::new("input")
            .help("Path to the LyX file")
            .required(true)
            .index(1)
            .value_hint(ValueHint::FilePath)
    };

    let mut cmd = Command::new("lyxconv")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Convert LyX documents to HTML and other formats")
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .action(ArgAction::Count)
                .global(true),
        )
        .arg(Arg::new("list-formats").long("list-formats").action(ArgAction::SetTrue))
        .arg(Arg::new("list-kinds").long("list-kinds").action(ArgAction::SetTrue))
        .arg(Arg::new("list-transforms").long("list-transforms").action(ArgAction::SetTrue))
        .subcommand(
            Command::new("convert")
                .about("Convert a LyX document (default command)")
                .arg(input())
                .arg(
                    Arg::new("to")
                        .long("to")
                        .value_parser(clap::builder::PossibleValuesParser::new(FORMATS)),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("filter-header-footer")
                        .long("filter-header-footer")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("inspect")
                .about("Inspect intermediate representations of LyX files")
                .arg(input())
                .arg(
                    Arg::new("transform")
                        .help("Transform to apply (stage-format, e.g., 'parse-treeviz')")
                        .value_parser(clap::builder::PossibleValuesParser::new(
                            AVAILABLE_TRANSFORMS,
                        ))
                        .index(2)
                        .value_hint(ValueHint::Other),
                ),
        )
        .subcommand(Command::new("generate-css").about("Output the default CSS used for HTML export"));

    // Generate completions for bash
    generate_to(Bash, &mut cmd, "lyxconv", &outdir)?;

    // Generate completions for zsh
    generate_to(Zsh, &mut cmd, "lyxconv", &outdir)?;

    // Generate completions for fish
    generate_to(Fish, &mut cmd, "lyxconv", &outdir)?;

    println!("cargo:warning=Shell completions generated in {outdir:?}");

    Ok(())
}
