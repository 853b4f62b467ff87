// Copyright (c) 2026 oxyzenq

use std::io::IsTerminal;

use clap::Parser;

pub fn color_enabled_stdout() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if matches!(std::env::var("CLICOLOR").ok().as_deref(), Some("0")) {
        return false;
    }
    std::io::stdout().is_terminal()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EffectKind {
    Rain,
    Grove,
}

impl EffectKind {
    pub fn other(self) -> Self {
        match self {
            EffectKind::Rain => EffectKind::Grove,
            EffectKind::Grove => EffectKind::Rain,
        }
    }
}

pub fn parse_effect(s: &str) -> Result<EffectKind, String> {
    match s.trim().to_ascii_lowercase().as_str() {
        "rain" | "matrix" => Ok(EffectKind::Rain),
        "grove" | "tree" => Ok(EffectKind::Grove),
        _ => Err(format!("invalid effect: {} (see --list-effects)", s)),
    }
}

pub fn print_list_effects() {
    println!("EFFECTS:");
    println!("  rain   Falling-glyph matrix rain (themeable: dark, light)");
    println!("  grove  Procedurally grown branching structure");
    println!();
    println!("KEYS:");
    println!("  q, Esc   quit");
    println!("  Space    restart the current effect");
    println!("  Tab      switch between rain and grove");
    println!("  t        toggle the rain theme (full restart)");
    println!("  p        pause / resume");
}

#[derive(Parser, Debug, Clone)]
#[command(name = "glowfall", version, disable_version_flag = true)]
pub struct Args {
    #[arg(
        short = 'e',
        long = "effect",
        default_value = "rain",
        help_heading = "GENERAL",
        help = "Effect to run (rain, grove)"
    )]
    pub effect: String,

    #[arg(
        short = 't',
        long = "theme",
        default_value = "dark",
        help_heading = "APPEARANCE",
        help = "Rain theme (dark, light); the grove is theme-independent"
    )]
    pub theme: String,

    #[arg(
        long = "colormode",
        help_heading = "APPEARANCE",
        help = "Force color depth (0=mono, 8=256-color, 24=truecolor)"
    )]
    pub colormode: Option<u8>,

    #[arg(
        short = 'd',
        long = "duration",
        help_heading = "GENERAL",
        help = "Exit after SECS seconds (min 0.1 max 86400)"
    )]
    pub duration: Option<f64>,

    #[arg(
        long = "seed",
        help_heading = "GENERAL",
        help = "Seed the simulator RNG for a reproducible run"
    )]
    pub seed: Option<u64>,

    #[arg(
        short = 's',
        long = "screensaver",
        help_heading = "GENERAL",
        help = "Exit on the first key press"
    )]
    pub screensaver: bool,

    #[arg(
        long = "list-effects",
        help_heading = "HELP",
        help = "List effects and key bindings, then exit"
    )]
    pub list_effects: bool,

    #[arg(
        long = "check-color",
        help_heading = "HELP",
        help = "Print detected color support and exit"
    )]
    pub check_color: bool,

    #[arg(
        short = 'v',
        long = "version",
        help_heading = "HELP",
        help = "Print version and exit"
    )]
    pub version: bool,

    #[arg(
        long = "info",
        help_heading = "HELP",
        help = "Print version and build info, then exit"
    )]
    pub info: bool,
}
