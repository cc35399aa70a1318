use clap::{App, Arg, SubCommand};
use favico::{IconAssembler, IconSize, TracingDiagnostics};
use std::io;
use std::path::PathBuf;
use std::process;

//===========================================================================//

fn main() {
    tracing_subscriber::fmt().with_writer(io::stderr).init();
    let matches = App::new("favicotool")
        .version("0.1")
        .about("Builds favicon ICO files")
        .subcommand(
            SubCommand::with_name("create")
                .about("Creates an ICO file from PNG files")
                .arg(
                    Arg::with_name("output")
                        .takes_value(true)
                        .value_name("PATH")
                        .short("o")
                        .long("output")
                        .help("Sets output path"),
                )
                .arg(
                    Arg::with_name("size")
                        .takes_value(true)
                        .multiple(true)
                        .number_of_values(1)
                        .value_name("SIZE")
                        .short("s")
                        .long("size")
                        .help("Adds a layer size, e.g. 48 or 310x150"),
                )
                .arg(
                    Arg::with_name("stdout")
                        .long("stdout")
                        .help("Writes a CGI-style response to stdout"),
                )
                .arg(Arg::with_name("image").multiple(true).required(true)),
        )
        .get_matches();
    if let Some(submatches) = matches.subcommand_matches("create") {
        let mut sizes = Vec::new();
        if let Some(values) = submatches.values_of("size") {
            for value in values {
                match parse_size(value) {
                    Some(size) => sizes.push(size),
                    None => {
                        eprintln!("Invalid size: {:?}", value);
                        process::exit(2);
                    }
                }
            }
        }
        if sizes.is_empty() {
            sizes.extend_from_slice(IconSize::DEFAULTS);
        }
        let mut icon =
            IconAssembler::builder().diagnostics(TracingDiagnostics).build();
        if let Some(paths) = submatches.values_of("image") {
            for path in paths {
                eprintln!("Adding {:?}", path);
                icon.add(path, &sizes);
            }
        }
        let ok = if submatches.is_present("stdout") {
            match icon.render() {
                Some(response) => response.write_to(io::stdout()).is_ok(),
                None => false,
            }
        } else {
            let out_path = submatches
                .value_of("output")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("favicon.ico"));
            icon.save(&out_path)
        };
        if !ok {
            process::exit(1);
        }
    }
}

fn parse_size(value: &str) -> Option<IconSize> {
    match value.split_once('x') {
        Some((width, height)) => {
            Some(IconSize::new(width.parse().ok()?, height.parse().ok()?))
        }
        None => value.parse().ok().map(IconSize::square),
    }
}

//===========================================================================//
