//! air_drummer: interactive entry point.

use std::path::{Path, PathBuf};

use air_drummer::app::run;
use air_drummer::config::AppConfig;
use air_drummer::logging;
use anyhow::{bail, Context, Result};

const DEFAULT_CONFIG: &str = "drummer.toml";

const USAGE: &str = "\
usage: air_drummer [--config <file>] [--sounds <dir>] [--quick]

  --config <file>   settings file (default: drummer.toml when present)
  --sounds <dir>    directory holding <zone>.wav for every zone
  --quick           ignore any settings file, use the built-in kit";

#[derive(Debug, Default, PartialEq)]
struct Args {
    config: Option<PathBuf>,
    sounds: Option<PathBuf>,
    quick:  bool,
    help:   bool,
}

fn parse_args(mut it: impl Iterator<Item = String>) -> Result<Args> {
    let mut args = Args::default();
    while let Some(a) = it.next() {
        match a.as_str() {
            "--config"      => args.config = Some(it.next().context("--config needs a path")?.into()),
            "--sounds"      => args.sounds = Some(it.next().context("--sounds needs a directory")?.into()),
            "--quick"       => args.quick = true,
            "-h" | "--help" => args.help = true,
            other           => bail!("unknown argument `{other}`\n\n{USAGE}"),
        }
    }
    Ok(args)
}

fn load_config(args: &Args) -> Result<AppConfig> {
    let mut cfg = if args.quick {
        println!("  Quick-start: reference kit, pointer as hand\n");
        AppConfig::default()
    } else if let Some(path) = &args.config {
        AppConfig::load(path)?
    } else if Path::new(DEFAULT_CONFIG).is_file() {
        AppConfig::load(Path::new(DEFAULT_CONFIG))?
    } else {
        AppConfig::default()
    };
    if let Some(dir) = &args.sounds {
        cfg.audio.sounds_dir = dir.clone();
    }
    Ok(cfg)
}

/// Show what the sound directory holds before loading from it; missing
/// files are the usual reason the kit refuses to start.
fn list_sounds(dir: &Path) {
    println!("  Sounds: {}", dir.display());
    match std::fs::read_dir(dir) {
        Ok(entries) => {
            let mut names: Vec<String> = entries
                .filter_map(|e| e.ok())
                .map(|e| e.file_name().to_string_lossy().into_owned())
                .collect();
            names.sort();
            if names.is_empty() {
                println!("    (empty)");
            }
            for n in names {
                println!("    {n}");
            }
        }
        Err(e) => println!("    (not readable: {e})"),
    }
    println!();
}

fn try_main() -> Result<()> {
    let args = parse_args(std::env::args().skip(1))?;
    if args.help {
        println!("{USAGE}");
        return Ok(());
    }

    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║            Air Drummer - camera-driven drum kit              ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();

    #[cfg(feature = "camera")]
    println!("  Frames: webcam (OpenCV)");
    #[cfg(not(feature = "camera"))]
    println!("  Frames: synthetic  (use --features camera for a webcam)");

    let cfg = load_config(&args)?;
    logging::init(&cfg.logging);

    println!("  Hands:  {:?}", cfg.tracking.source);
    list_sounds(&cfg.audio.sounds_dir);

    println!("  Opening window… (Q or Escape to quit)");
    println!();

    run(&cfg).context("air drummer stopped")?;
    Ok(())
}

fn main() {
    if let Err(e) = try_main() {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Result<Args> {
        parse_args(list.iter().map(|s| s.to_string()))
    }

    #[test]
    fn no_arguments() {
        assert_eq!(args(&[]).unwrap(), Args::default());
    }

    #[test]
    fn all_flags() {
        let a = args(&["--config", "kit.toml", "--sounds", "/opt/kit", "--quick"]).unwrap();
        assert_eq!(a.config, Some(PathBuf::from("kit.toml")));
        assert_eq!(a.sounds, Some(PathBuf::from("/opt/kit")));
        assert!(a.quick);
    }

    #[test]
    fn flag_missing_its_value() {
        assert!(args(&["--sounds"]).is_err());
    }

    #[test]
    fn unknown_flag() {
        let err = args(&["--loud"]).unwrap_err().to_string();
        assert!(err.contains("--loud"));
    }

    #[test]
    fn sounds_override_applies_to_quick_start() {
        let a = args(&["--quick", "--sounds", "elsewhere"]).unwrap();
        let cfg = load_config(&a).unwrap();
        assert_eq!(cfg.audio.sounds_dir, PathBuf::from("elsewhere"));
    }
}
