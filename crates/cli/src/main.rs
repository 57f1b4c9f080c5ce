use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use facetkit::format::real;
use facetkit::{ErrorMode, Hyperplane, NumericCfg, NumericContext, PointGenerator};
use serde::Serialize;
use std::fmt::Write as _;
use std::path::PathBuf;
use tracing_subscriber::fmt::SubscriberBuilder;

mod config;

#[derive(Parser)]
#[command(name = "cli")]
#[command(about = "Generate point sets and evaluate hyperplanes")]
struct Cmd {
    /// JSON file with `distance_eps` and/or `angle_eps`
    #[arg(long, global = true)]
    tolerances: Option<PathBuf>,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Run generation commands in order and print the accumulated points
    Generate {
        /// Generation command such as "10 D3 s t1"; repeatable
        #[arg(long = "command", short = 'c', required = true)]
        commands: Vec<String>,
        /// Print JSON instead of rbox-style text
        #[arg(long)]
        json: bool,
        /// Keep going after a failed command and report its status
        #[arg(long)]
        record_errors: bool,
    },
    /// Signed distance of every generated point to a hyperplane
    Distance {
        /// Normal coordinates, comma separated
        #[arg(long, value_delimiter = ',', allow_hyphen_values = true, required = true)]
        normal: Vec<f64>,
        #[arg(long, allow_hyphen_values = true)]
        offset: f64,
        #[arg(long)]
        command: String,
    },
    /// Print version and active tolerances as JSON
    Report,
}

fn main() -> Result<()> {
    SubscriberBuilder::default()
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
    let cmd = Cmd::parse();
    let cfg = config::load(cmd.tolerances.as_deref())?;
    let out = match cmd.action {
        Action::Generate {
            commands,
            json,
            record_errors,
        } => generate(cfg, &commands, json, record_errors)?,
        Action::Distance {
            normal,
            offset,
            command,
        } => distance(cfg, &normal, offset, &command)?,
        Action::Report => report(cfg)?,
    };
    print!("{out}");
    Ok(())
}

#[derive(Serialize)]
struct PointsReport<'a> {
    dimension: usize,
    count: usize,
    points: Vec<&'a [f64]>,
    status: i32,
    diagnostics: &'a str,
}

fn generate(cfg: NumericCfg, commands: &[String], json: bool, record_errors: bool) -> Result<String> {
    let mode = if record_errors {
        ErrorMode::Record
    } else {
        ErrorMode::Raise
    };
    let mut pg = PointGenerator::with_context(NumericContext::new(cfg), mode);
    for command in commands {
        pg.append_points(command)
            .with_context(|| format!("generating '{command}'"))?;
        tracing::info!(command, generated = pg.new_count(), total = pg.count(), "generate");
    }
    if json {
        let doc = PointsReport {
            dimension: pg.dimension(),
            count: pg.count(),
            points: pg.points().map(|p| p.coordinates()).collect(),
            status: pg.status(),
            diagnostics: pg.message(),
        };
        return Ok(serde_json::to_string_pretty(&doc)? + "\n");
    }
    if pg.has_message() {
        eprint!("{}", pg.message());
    }
    let mut out = String::new();
    writeln!(out, "{}", pg.dimension())?;
    writeln!(out, "{}", pg.count())?;
    for p in pg.points() {
        let row: Vec<String> = p.coordinates().iter().map(|&x| real(x)).collect();
        writeln!(out, "{}", row.join(" "))?;
    }
    Ok(out)
}

fn distance(cfg: NumericCfg, normal: &[f64], offset: f64, command: &str) -> Result<String> {
    let mut pg = PointGenerator::with_context(NumericContext::new(cfg), ErrorMode::Raise);
    pg.append_points(command)
        .with_context(|| format!("generating '{command}'"))?;
    if pg.dimension() != normal.len() {
        bail!(
            "normal has {} coordinates but '{command}' produced dimension {}",
            normal.len(),
            pg.dimension()
        );
    }
    let h = Hyperplane::new(pg.context(), normal, offset);
    tracing::info!(points = pg.count(), norm = h.norm(), "distance");
    let mut out = h.print(Some("hyperplane:"), Some(" offset:")).to_string();
    for (i, p) in pg.points().enumerate() {
        writeln!(out, "{i} {}", real(h.distance(&p)))?;
    }
    Ok(out)
}

fn report(cfg: NumericCfg) -> Result<String> {
    let doc = serde_json::json!({
        "version": facetkit::VERSION,
        "tolerances": cfg,
    });
    Ok(serde_json::to_string_pretty(&doc)? + "\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_repeated_commands_and_negative_offset() {
        let cmd = Cmd::try_parse_from([
            "cli", "distance", "--normal", "0,0,-1", "--offset", "-5", "--command", "4 D3",
        ])
        .unwrap();
        match cmd.action {
            Action::Distance { normal, offset, .. } => {
                assert_eq!(normal, vec![0.0, 0.0, -1.0]);
                assert_eq!(offset, -5.0);
            }
            _ => panic!("expected distance"),
        }
        let cmd = Cmd::try_parse_from(["cli", "generate", "-c", "2 D2", "-c", "3 D2", "--json"])
            .unwrap();
        assert!(matches!(
            cmd.action,
            Action::Generate { ref commands, json: true, .. } if commands.len() == 2
        ));
    }

    #[test]
    fn text_output_has_header_and_rows() {
        let out = generate(
            NumericCfg::default(),
            &["0 c D2 B1".to_string()],
            false,
            false,
        )
        .unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "2");
        assert_eq!(lines[1], "4");
        assert_eq!(lines[2], "-1 -1");
        assert_eq!(lines.len(), 6);

        let out = generate(
            NumericCfg::default(),
            &["D2 P0.3333333333,1234567".to_string()],
            false,
            false,
        )
        .unwrap();
        assert_eq!(out, "2\n1\n0.333333 1.23457e+06\n");
    }

    #[test]
    fn json_output_records_failures() {
        let out = generate(
            NumericCfg::default(),
            &["2 D3".to_string(), "2 D3 q".to_string()],
            true,
            true,
        )
        .unwrap();
        let v: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(v["count"], 2);
        assert_ne!(v["status"], 0);
        assert!(v["diagnostics"].as_str().unwrap().contains("rbox error"));
    }

    #[test]
    fn raise_mode_surfaces_engine_error() {
        let err = generate(NumericCfg::default(), &["D0".to_string()], false, false).unwrap_err();
        assert!(format!("{err:#}").contains("dimension must be at least 1"));
    }

    #[test]
    fn distances_to_cube_face() {
        let out = distance(NumericCfg::default(), &[0.0, 0.0, 1.0], -1.0, "0 c D3 B1").unwrap();
        let mut lines = out.lines();
        assert_eq!(lines.next(), Some("hyperplane: 0 0 1 offset: -1"));
        let d: Vec<&str> = lines.map(|l| l.split_once(' ').unwrap().1).collect();
        assert_eq!(d, vec!["-2", "-2", "-2", "-2", "0", "0", "0", "0"]);
        assert!(distance(NumericCfg::default(), &[1.0], 0.0, "2 D3").is_err());
    }

    #[test]
    fn report_lists_tolerances() {
        let v: serde_json::Value = serde_json::from_str(&report(NumericCfg::new(1e-3, 1e-4)).unwrap()).unwrap();
        assert_eq!(v["tolerances"]["distance_eps"], 1e-3);
        assert_eq!(v["version"], facetkit::VERSION);
    }
}
