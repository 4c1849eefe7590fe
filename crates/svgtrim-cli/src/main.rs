use serde_json::Value;
use svgtrim::{Locator, Preset, TrimConfig, Trimmed};

#[derive(Debug)]
enum CliError {
    Help(&'static str),
    Usage(&'static str),
    Io(std::io::Error),
    Trim(svgtrim::Error),
    Json(serde_json::Error),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Help(msg) | CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Trim(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<svgtrim::Error> for CliError {
    fn from(value: svgtrim::Error) -> Self {
        Self::Trim(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug, Default)]
struct Args {
    input: Option<String>,
    preset: Preset,
    config: Option<String>,
    keep: Option<usize>,
    locator: Option<Locator>,
    streak: Option<u64>,
    out: Option<String>,
    strict: bool,
}

fn usage() -> &'static str {
    "svgtrim\n\
\n\
USAGE:\n\
  svgtrim [--preset crop|keep-two|reserve-top] [--config <file.json>] [--keep <n>] [--locator scan|tree|verified] [--streak <n>] [--out <path>|-] [--strict] <svg-file>\n\
\n\
NOTES:\n\
  - The input file is overwritten in place unless --out is given ('-' writes to stdout).\n\
  - --config layers a JSON object over the chosen preset (keys as in TrimConfig, camelCase).\n\
  - --streak injects the streak badge; without it only the preset's crop is applied.\n\
  - Failures are reported but exit 0 unless --strict is given.\n\
  - Set SVGTRIM_LOG (e.g. SVGTRIM_LOG=debug) for diagnostics on stderr.\n\
"
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args::default();

    let mut it = argv.iter().skip(1);
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Help(usage())),
            "--strict" => args.strict = true,
            "--preset" => {
                let Some(name) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.preset = name
                    .parse::<Preset>()
                    .map_err(|_| CliError::Usage(usage()))?;
            }
            "--config" => {
                let Some(path) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.config = Some(path.clone());
            }
            "--keep" => {
                let Some(n) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                let n = n.parse::<usize>().map_err(|_| CliError::Usage(usage()))?;
                if n == 0 {
                    return Err(CliError::Usage(usage()));
                }
                args.keep = Some(n);
            }
            "--locator" => {
                let Some(name) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.locator = Some(
                    name.parse::<Locator>()
                        .map_err(|_| CliError::Usage(usage()))?,
                );
            }
            "--streak" => {
                let Some(n) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.streak = Some(n.parse::<u64>().map_err(|_| CliError::Usage(usage()))?);
            }
            "--out" => {
                let Some(out) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.out = Some(out.clone());
            }
            "--" => {
                if let Some(rest) = it.next() {
                    if args.input.is_some() {
                        return Err(CliError::Usage(usage()));
                    }
                    args.input = Some(rest.clone());
                }
                if it.next().is_some() {
                    return Err(CliError::Usage(usage()));
                }
            }
            other if other.starts_with('-') => return Err(CliError::Usage(usage())),
            path => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some(path.to_string());
            }
        }
    }

    if args.input.is_none() {
        return Err(CliError::Usage(usage()));
    }
    Ok(args)
}

fn build_config(args: &Args) -> Result<TrimConfig, CliError> {
    let mut config = args.preset.config();
    if let Some(path) = args.config.as_deref() {
        let overrides: Value = serde_json::from_str(&std::fs::read_to_string(path)?)?;
        config = config.with_json_overrides(overrides)?;
    }
    if let Some(keep) = args.keep {
        config.keep_groups = keep;
    }
    if let Some(locator) = args.locator {
        config.locator = locator;
    }
    config.validate()?;
    Ok(config)
}

fn run(args: &Args, path: &str) -> Result<Trimmed, CliError> {
    let config = build_config(args)?;
    tracing::debug!(
        preset = args.preset.name(),
        keep = config.keep_groups,
        locator = ?config.locator,
        "trimming {path}"
    );

    let content = std::fs::read_to_string(path)?;
    let trimmed = svgtrim::trim_document(&content, &config, args.streak)?;

    match args.out.as_deref() {
        Some("-") => {
            use std::io::Write;
            std::io::stdout().lock().write_all(trimmed.text.as_bytes())?;
        }
        Some(out) => std::fs::write(out, &trimmed.text)?,
        None => std::fs::write(path, &trimmed.text)?,
    }
    Ok(trimmed)
}

fn success_message(path: &str, streak: Option<u64>) -> String {
    match streak {
        Some(n) => format!("Successfully stripped {path} (streak: {n})"),
        None => format!("Successfully stripped {path}"),
    }
}

fn failure_message(path: &str, err: &CliError) -> String {
    match err {
        CliError::Trim(svgtrim::Error::RootNotFound { tag }) => {
            format!("No <{tag}> tag found in {path}")
        }
        CliError::Trim(svgtrim::Error::BoundaryNotFound { required, found }) => format!(
            "Could not find top-level group {required} in {path} (only {found} resolved)"
        ),
        other => format!("Could not strip {path}: {other}"),
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_env("SVGTRIM_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_tracing();

    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(CliError::Help(msg)) => {
            print!("{msg}");
            return;
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };
    let path = args.input.clone().unwrap_or_default();

    // The SVG itself owns stdout with `--out -`.
    let to_stdout = args.out.as_deref() == Some("-");
    let report = |line: String| {
        if to_stdout {
            eprintln!("{line}");
        } else {
            println!("{line}");
        }
    };

    match run(&args, &path) {
        Ok(trimmed) => {
            tracing::info!(
                removed = trimmed.groups_removed,
                resized = trimmed.resized,
                overlay = trimmed.overlay,
                "stripped {path}"
            );
            report(success_message(&path, args.streak));
        }
        Err(err) => {
            report(failure_message(&path, &err));
            if args.strict {
                std::process::exit(1);
            }
        }
    }
}
