use keycalc::{KEYPAD, Mode, RunResultVerbose, Step};

mod ansi {
    pub const RESET: &str = "\x1b[0m";
    pub const DIM: &str = "\x1b[2m";
    pub const BOLD: &str = "\x1b[1m";

    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const BLUE: &str = "\x1b[34m";
    pub const RED: &str = "\x1b[31m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GRAY: &str = "\x1b[90m";

    pub struct Palette {
        enabled: bool,
    }

    impl Palette {
        pub fn new(enabled: bool) -> Self {
            Self { enabled }
        }

        pub fn paint(&self, s: impl AsRef<str>, color: &str) -> String {
            if self.enabled { format!("{}{}{}", color, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn bold(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", BOLD, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn dim(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", DIM, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }
    }
}

pub fn print_run(input: &str, res: &RunResultVerbose, color: bool) {
    let palette = ansi::Palette::new(color);
    println!("\n{}", palette.bold(palette.paint(format!("⌨  Keys: \"{}\"", input.trim()), ansi::CYAN)));

    println!("\n{}", palette.paint("━━━ Steps ━━━", ansi::GRAY));
    if res.details.steps.is_empty() {
        println!("{}", palette.dim("  No keys pressed"));
    }
    for (idx, step) in res.details.steps.iter().enumerate() {
        println!("  {} {}", palette.paint(format!("[{:>2}]", idx), ansi::GRAY), fmt_step(step, &palette));
    }

    println!("\n{}", palette.paint("━━━ Result ━━━", ansi::GRAY));
    println!("  {}", palette.bold(palette.paint(&res.value, ansi::GREEN)));

    println!("\n{}", palette.paint("━━━ Timing ━━━", ansi::GRAY));
    println!(
        "  Total: {}  │  Evaluator: {} ({} calls)",
        palette.paint(format!("{:?}", res.details.total), ansi::GREEN),
        palette.paint(format!("{:?}", res.details.evaluation_time), ansi::CYAN),
        palette.dim(res.details.evaluations.to_string()),
    );
    println!();
}

pub fn print_keypad(color: bool) {
    let palette = ansi::Palette::new(color);
    for row in KEYPAD {
        let cells: Vec<String> = row
            .iter()
            .map(|cell| match cell {
                Some(key) => palette.paint(format!("[{:^5}]", key.label()), ansi::BLUE),
                None => palette.dim("       "),
            })
            .collect();
        println!("{}", cells.join(" "));
    }
}

fn fmt_step(step: &Step, palette: &ansi::Palette) -> String {
    let mode = match &step.mode {
        Mode::Composing => palette.dim("composing"),
        Mode::Result(_) => palette.paint("result", ansi::GREEN),
        Mode::Error => palette.paint("error", ansi::RED),
    };
    format!(
        "{} {} {} {} {}",
        palette.paint(format!("{:<3}", step.key.label()), ansi::YELLOW),
        palette.dim("→"),
        palette.bold(&step.value),
        palette.dim("│"),
        mode
    )
}
