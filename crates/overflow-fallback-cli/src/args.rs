//! Command line arguments

use std::path::PathBuf;

use anyhow::{bail, Result};
use getopts::Options;
use serde_json::{Map, Value};

const BRIEF: &str = "\
Usage: overflow-fallback [OPTIONS] [INPUT]

Inserts fallbacks before `overflow: clip` and `overflow: overlay`.
Reads INPUT (or stdin when INPUT is absent or `-`) and writes CSS to stdout.
Set RUST_LOG=debug to see every inserted fallback.";

/// Flags that switch one option key off
const DISABLE_FLAGS: [(&str, &str, &str); 3] = [
    ("no-overlay-fallback", "addOverlayFallback", "Do not insert `auto` before `overlay`"),
    ("no-clip-fallback", "addClipFallback", "Do not insert `hidden` before `clip`"),
    ("no-double-values", "operateOnDoubleValues", "Leave two-keyword `overflow` values alone"),
];

/// What the binary was asked to do
#[derive(Debug, PartialEq)]
pub enum Command {
    Run(CliArgs),
    Help,
    Version,
}

#[derive(Debug, Default, PartialEq)]
pub struct CliArgs {
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub config: Option<PathBuf>,
    /// Option keys forced to a value by flags, applied over the config file
    pub overrides: Map<String, Value>,
}

impl CliArgs {
    /// Merge flag overrides over the config file contents
    pub fn options_value(&self, config: Option<Value>) -> Result<Value> {
        let mut object = match config {
            None | Some(Value::Null) => Map::new(),
            Some(Value::Object(object)) => object,
            Some(_) => bail!("config file must contain a JSON object"),
        };
        object.extend(self.overrides.clone());
        Ok(Value::Object(object))
    }
}

fn options() -> Options {
    let mut opts = Options::new();
    opts.optopt("o", "output", "Write the result to PATH", "PATH");
    opts.optopt("c", "config", "Load options from a JSON file", "PATH");
    for (flag, _, description) in DISABLE_FLAGS {
        opts.optflag("", flag, description);
    }
    opts.optflag("h", "help", "Print this help");
    opts.optflag("V", "version", "Print the version");
    opts
}

/// Help text listing every option
pub fn usage() -> String {
    options().usage(BRIEF)
}

pub fn parse<I>(args: I) -> Result<Command>
where
    I: IntoIterator<Item = String>,
{
    let matches = match options().parse(args) {
        Ok(matches) => matches,
        Err(fail) => bail!("{fail}\n\n{}", usage()),
    };

    if matches.opt_present("h") {
        return Ok(Command::Help);
    }
    if matches.opt_present("V") {
        return Ok(Command::Version);
    }

    let mut parsed = CliArgs {
        output: matches.opt_str("o").map(PathBuf::from),
        config: matches.opt_str("c").map(PathBuf::from),
        ..Default::default()
    };
    for (flag, key, _) in DISABLE_FLAGS {
        if matches.opt_present(flag) {
            parsed.overrides.insert(key.into(), Value::Bool(false));
        }
    }

    match matches.free.as_slice() {
        [] => {}
        [input] if input == "-" => {}
        [input] => parsed.input = Some(PathBuf::from(input)),
        _ => bail!("only one input may be given"),
    }

    Ok(Command::Run(parsed))
}
