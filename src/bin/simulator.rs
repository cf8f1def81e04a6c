// Line-protocol bridge for a host UI process. Commands arrive on stdin, one
// per line; answers go to stdout. Logs go to stderr only.
//
//   RESIZE <width> <height>
//   TRACE <x> <y> [<x> <y> ...]
//   TIMED_TRACE <seconds> <x> <y> [<x> <y> ...]
//   EXIT
use gesture_core::core::layout::KeyboardLayout;
use gesture_core::{CandidateResult, EngineConfig, Gesture, GestureEngine, Point, Size};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

const MAX_CANDIDATES: usize = 10;

fn get_snapshot_path() -> PathBuf {
    let mut path = dirs::cache_dir().unwrap_or_else(|| PathBuf::from("target"));
    path.push("kana-gesture-engine");
    path.push("simulator_index.bin");
    path
}

fn main() -> gesture_core::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .target(env_logger::Target::Stderr)
        .init();
    log::info!("--- Kana gesture engine simulator starting ---");

    let vocabulary_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("data/vocabulary.txt"));

    let mut engine = GestureEngine::from_snapshot_or_vocabulary(
        EngineConfig::default(),
        KeyboardLayout::default(),
        Size::new(300.0, 400.0),
        &get_snapshot_path(),
        &vocabulary_path,
    )?;

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let input = line?;
        log::debug!("<- {:?}", input);
        let parts: Vec<&str> = input.split_whitespace().collect();
        let command = parts.first().copied().unwrap_or("");

        match command {
            "RESIZE" => match parse_numbers(&parts[1..]).as_deref() {
                Some(&[width, height]) => {
                    engine.resize(Size::new(width, height));
                    writeln!(stdout, "OK")?;
                }
                _ => writeln!(stdout, "ERROR bad RESIZE arguments")?,
            },
            "TRACE" | "TIMED_TRACE" => {
                let Some(numbers) = parse_numbers(&parts[1..]) else {
                    writeln!(stdout, "ERROR bad coordinates")?;
                    stdout.flush()?;
                    continue;
                };
                let gesture = if command == "TIMED_TRACE" {
                    match numbers.split_first() {
                        Some((&seconds, coords)) => Gesture::new(to_points(coords)).with_duration(seconds),
                        None => Gesture::default(),
                    }
                } else {
                    Gesture::new(to_points(&numbers))
                };
                let candidates = engine.recognize_gesture(&gesture);
                write_candidates(&candidates, &mut stdout)?;
            }
            "EXIT" => {
                log::info!("Received EXIT");
                break;
            }
            _ => {
                log::warn!("Unknown command {:?}", command);
                writeln!(stdout, "ERROR unknown command")?;
            }
        }
        stdout.flush()?;
    }
    log::info!("Shutting down");
    Ok(())
}

fn parse_numbers(fields: &[&str]) -> Option<Vec<f64>> {
    fields.iter().map(|f| f.parse().ok()).collect()
}

/// Pairs up a flat coordinate list; a dangling x is ignored.
fn to_points(coords: &[f64]) -> Vec<Point> {
    coords
        .chunks_exact(2)
        .map(|xy| Point::new(xy[0], xy[1]))
        .collect()
}

fn write_candidates(candidates: &[CandidateResult], stdout: &mut io::Stdout) -> io::Result<()> {
    let shown = &candidates[..candidates.len().min(MAX_CANDIDATES)];
    writeln!(stdout, "CANDIDATES {}", shown.len())?;
    for (i, candidate) in shown.iter().enumerate() {
        writeln!(stdout, "CANDIDATE {} {} {:.6}", i, candidate.text, candidate.confidence)?;
    }
    writeln!(stdout, "END")
}
