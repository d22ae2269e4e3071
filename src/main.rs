mod trace_report;

use keycalc::{Options, format_with_commas, run_verbose_with, run_with};
use std::io::{self, IsTerminal, Read};
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "KEYCALC_LOG";

fn main() {
    init_logging();

    let config = match parse_args() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };

    if config.keypad {
        trace_report::print_keypad(config.color);
        return;
    }

    let outcome = if config.trace {
        run_verbose_with(&config.input, &config.options)
            .map(|res| trace_report::print_run(&config.input, &res, config.color))
    } else {
        run_with(&config.input, &config.options).map(|res| {
            let value = if config.group { format_with_commas(&res.value) } else { res.value };
            println!("{value}");
        })
    };

    if let Err(err) = outcome {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).init();
}

struct CliConfig {
    input: String,
    options: Options,
    color: bool,
    trace: bool,
    group: bool,
    keypad: bool,
}

fn parse_args() -> Result<CliConfig, String> {
    let mut input: Option<String> = None;
    let mut options = Options::default();
    let mut color = io::stdout().is_terminal();
    let mut trace = false;
    let mut group = false;
    let mut keypad = false;
    let mut args = std::env::args().skip(1);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "-V" | "--version" => {
                println!("keycalc {}", env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            "--color" => color = true,
            "--no-color" => color = false,
            "--trace" | "-t" => trace = true,
            "--group" | "-g" => group = true,
            "--keypad" => keypad = true,
            "--precision" => {
                let value = args.next().ok_or_else(|| "error: --precision expects a value".to_string())?;
                options.precision = parse_precision(&value)?;
            }
            "--input" | "-i" => {
                let value = args.next().ok_or_else(|| "error: --input expects a value".to_string())?;
                if input.is_some() {
                    return Err("error: input provided multiple times".to_string());
                }
                input = Some(value);
            }
            "--" => {
                let rest = args.collect::<Vec<_>>().join(" ");
                if !rest.trim().is_empty() {
                    if input.is_some() {
                        return Err("error: input provided multiple times".to_string());
                    }
                    input = Some(rest);
                }
                break;
            }
            _ if arg.starts_with("--precision=") => {
                options.precision = parse_precision(arg.trim_start_matches("--precision="))?;
            }
            _ if arg.starts_with("--input=") => {
                let value = arg.trim_start_matches("--input=");
                if input.is_some() {
                    return Err("error: input provided multiple times".to_string());
                }
                input = Some(value.to_string());
            }
            // `-` and `-5` are keys, not options.
            _ if arg.starts_with("--") || is_short_flag(&arg) => {
                return Err(format!("error: unknown option '{arg}'"));
            }
            _ => {
                let rest = std::iter::once(arg).chain(args).collect::<Vec<_>>().join(" ");
                if input.is_some() {
                    return Err("error: input provided multiple times".to_string());
                }
                input = Some(rest);
                break;
            }
        }
    }

    if keypad {
        return Ok(CliConfig { input: String::new(), options, color, trace, group, keypad });
    }

    let input = match input {
        Some(value) => value,
        None => read_stdin_input()?,
    };

    if input.trim().is_empty() {
        return Err(format!("error: no keys provided\n\n{}", help_text()));
    }

    Ok(CliConfig { input, options, color, trace, group, keypad })
}

fn is_short_flag(arg: &str) -> bool {
    arg.starts_with('-') && arg.chars().nth(1).is_some_and(|c| c.is_ascii_alphabetic())
}

fn read_stdin_input() -> Result<String, String> {
    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer).map_err(|err| format!("error: failed to read stdin: {err}"))?;
    Ok(buffer)
}

fn parse_precision(value: &str) -> Result<u32, String> {
    match value.parse::<u32>() {
        Ok(precision) if precision <= 17 => Ok(precision),
        _ => Err(format!("error: invalid --precision '{value}' (expected 0..=17)")),
    }
}

fn print_help() {
    println!("{}", help_text());
}

fn help_text() -> String {
    format!(
        "keycalc {version}

Keypad calculator CLI. Replays key presses and prints the display.

Usage:
  keycalc [OPTIONS] [--] <keys...>
  keycalc [OPTIONS] --input <keys>

Keys:
  0-9  + - × ÷ (or * x /)  .  %  +/- (or ±)  =  AC (or C)  ⌫ (or < BS)
  Whitespace is ignored, e.g. \"2 + 3 = =\".

Options:
  -i, --input <keys>         Keys to press. If omitted, reads remaining args
                             or stdin when no args are provided.
  -t, --trace                Print the display after every key.
  -g, --group                Group thousands in the final value (1,234.5).
  --precision <n>            Decimal places kept in results (0..=17).
                             Default: {default_precision}
  --keypad                   Print the keypad layout and exit.
  --color                    Force ANSI color output.
  --no-color                 Disable ANSI color output.
  -h, --help                 Show this help message.
  -V, --version              Print version information.

Environment:
  {log_env}                 tracing filter, e.g. keycalc=debug.

Exit codes:
  0  Success.
  1  Unknown key in the input.
  2  Invalid arguments or missing input.
",
        version = env!("CARGO_PKG_VERSION"),
        default_precision = Options::default().precision,
        log_env = LOG_ENV,
    )
}
