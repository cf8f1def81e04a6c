use crossterm::cursor::MoveTo;
use crossterm::execute;
use crossterm::style::Stylize;
use crossterm::terminal::{Clear, ClearType};
use gesture_core::core::layout::KeyboardLayout;
use gesture_core::core::phonetic::consonant_of;
use gesture_core::{CandidateResult, EngineConfig, GestureEngine, Point, Size};
use std::io::{stdin, stdout, Write};
use std::path::Path;

const SNAPSHOT_PATH: &str = "index.bin";
const DEFAULT_VOCABULARY_PATH: &str = "data/vocabulary.txt";
const SURFACE: Size = Size::new(300.0, 400.0);

fn main() -> gesture_core::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let vocabulary_path = args.next().unwrap_or_else(|| DEFAULT_VOCABULARY_PATH.to_string());
    let config = match args.next() {
        Some(path) => EngineConfig::from_json_file(Path::new(&path))?,
        None => EngineConfig::default(),
    };

    let engine = GestureEngine::from_snapshot_or_vocabulary(
        config,
        KeyboardLayout::default(),
        SURFACE,
        Path::new(SNAPSHOT_PATH),
        Path::new(&vocabulary_path),
    )?;

    let mut last: Vec<CandidateResult> = Vec::new();
    let mut status = String::from("Ready.");

    loop {
        print_ui(&engine, &status, &last)?;

        let mut input = String::new();
        if stdin().read_line(&mut input)? == 0 {
            break;
        }
        let cmd = input.trim();

        match cmd {
            "exit" => break,
            "" => {}
            s if s.starts_with(":word ") => {
                // Draw the ideal path of a spelling and see what comes back.
                let kana = s[":word ".len()..].trim();
                let trace = spelled_trace(&engine, kana);
                last = engine.recognize(&trace);
                status = format!("Traced '{}' over {} keys", kana, trace.len());
            }
            s => match parse_trace(s) {
                Some(trace) => {
                    last = engine.recognize(&trace);
                    status = format!("Recognized a {}-point trace", trace.len());
                }
                None => status = format!("Could not parse '{}'", s),
            },
        }
    }

    println!("\nSaving index snapshot...");
    if let Err(e) = engine.save_index(Path::new(SNAPSHOT_PATH)) {
        eprintln!("[ERROR] Could not save index snapshot: {}", e);
    } else {
        println!("Index saved to '{}'", SNAPSHOT_PATH);
    }
    Ok(())
}

/// Parses "x,y x,y ..." into points.
fn parse_trace(line: &str) -> Option<Vec<Point>> {
    line.split_whitespace()
        .map(|pair| {
            let (x, y) = pair.split_once(',')?;
            Some(Point::new(x.trim().parse().ok()?, y.trim().parse().ok()?))
        })
        .collect()
}

fn spelled_trace(engine: &GestureEngine, kana: &str) -> Vec<Point> {
    let layout = engine.resolved_layout();
    kana.chars()
        .filter_map(consonant_of)
        .filter_map(|row| layout.position_of(row))
        .collect()
}

fn print_ui(
    engine: &GestureEngine,
    status: &str,
    candidates: &[CandidateResult],
) -> std::io::Result<()> {
    let mut out = stdout();
    execute!(out, Clear(ClearType::All), MoveTo(0, 0))?;
    println!("{}", "Kana Gesture Keyboard Simulator".bold());
    println!("---------------------------------------------------------------");
    println!("Enter a trace as 'x,y x,y ...', or ':word <kana>' to trace a spelling.");
    println!("'exit' to save and quit.\n");

    let surface = engine.resolved_layout().surface();
    println!(
        "Keyboard {}x{}, {} words indexed",
        surface.width,
        surface.height,
        engine.index().len()
    );
    for key in engine.resolved_layout().keys() {
        print!("  {} ({:.0},{:.0})", key.consonant, key.position.x, key.position.y);
    }
    println!("\n\n{}", status.italic());

    if candidates.is_empty() {
        println!("\nNo candidates.");
    } else {
        println!("\nCandidates:");
        for (i, candidate) in candidates.iter().enumerate() {
            println!(
                "  {:>2}: {} ({:.4})",
                i + 1,
                candidate.text.as_str().green(),
                candidate.confidence
            );
        }
    }
    print!("\n> ");
    out.flush()
}
