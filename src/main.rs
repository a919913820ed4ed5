use std::process::exit;

use svg2progmem::{Options, PathSelector};

const RED: &str = "\x1b[31m";
const RESET: &str = "\x1b[0m";

pub const HELP: &str = "svg2progmem

USAGE:
    svg2progmem -i <input_file> -v <output_variable_name> [OPTIONS]

OPTIONS:
    -i, --input <FILE>\tSVG file to convert
    -v, --var <NAME>\tName of the generated array
    --id <ID>\t\tUse the path element with this id
    --at <I/J/...>\tUse the path element at these child positions (default: 2/0)
    --axis-lines\t\tAlso encode horizontal and vertical line commands
    -h, --help\t\tPrint this message

Prints a PROGMEM uint8_t array to stdout.";

/// Print a highlighted error plus the usage text and exit with status 1.
fn usage_error(msg: &str) -> ! {
    println!("{}Error! {}{}", RED, msg, RESET);
    println!("\n{}\n", HELP);
    exit(1);
}

struct Args {
    input: String,
    var_name: String,
    options: Options,
}

fn parse_args() -> Args {
    let mut input = None;
    let mut var_name = None;
    let mut id = None;
    let mut position = None;
    let mut axis_lines = false;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                println!("{}", HELP);
                exit(0);
            }
            "-i" | "--input" => input = args.next(),
            "-v" | "--var" => var_name = args.next(),
            "--id" => {
                id = Some(args.next().unwrap_or_else(|| usage_error("No id given for --id!")));
            }
            "--at" => {
                position = Some(args.next().unwrap_or_else(|| usage_error("No position given for --at!")));
            }
            "--axis-lines" => axis_lines = true,
            other => usage_error(&format!("Unknown argument \"{}\"", other)),
        }
    }

    let input = input.unwrap_or_else(|| usage_error("No input file indicated!"));
    let var_name = var_name.unwrap_or_else(|| usage_error("No output variable name specified!"));

    let selector = match (id, position) {
        (Some(_), Some(_)) => usage_error("--id and --at cannot be combined!"),
        (Some(id), None) => PathSelector::Id(id),
        (None, Some(position)) => {
            PathSelector::parse_position(&position).unwrap_or_else(|e| usage_error(&e))
        }
        (None, None) => PathSelector::default(),
    };

    Args {
        input,
        var_name,
        options: Options { selector, axis_lines },
    }
}

fn main() {
    fn inner(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
        let svg = std::fs::read_to_string(&args.input).map_err(svg2progmem::Error::from)?;
        let out = svg2progmem::convert(&svg, &args.options, &args.input, &args.var_name)?;
        println!("{}", out);
        Ok(())
    }

    env_logger::init();

    let args = parse_args();
    if let Err(e) = inner(&args) {
        eprintln!("{}", e);
        exit(2);
    }
}
