use gesture_core::core::index::{spawn_build, BuildEvent};
use gesture_core::core::layout::KeyboardLayout;
use gesture_core::core::phonetic::{consonant_of, Consonant};
use gesture_core::core::vocabulary::RawEntry;
use gesture_core::source::parse_vocabulary;
use gesture_core::{EngineConfig, GestureEngine, Point, Size};
use pretty_assertions::assert_eq;
use std::path::Path;
use tempfile::TempDir;

const SURFACE: Size = Size::new(300.0, 400.0);

const VOCABULARY: &str = "\
さくら,120,桜
さら,80,皿
さかな,150,魚
すし,200,寿司
かさ,110,傘
はし,140,橋
はし,100,箸
ひと,300,人
あめ,180,雨
";

fn engine() -> GestureEngine {
    let mut engine =
        GestureEngine::new(EngineConfig::default(), KeyboardLayout::default(), SURFACE)
            .expect("engine");
    engine.load_entries(parse_vocabulary(VOCABULARY), |_| {});
    engine
}

/// Key centers visited while spelling `kana`, as a user would draw them.
fn spelled(engine: &GestureEngine, kana: &str) -> Vec<Point> {
    kana.chars()
        .filter_map(consonant_of)
        .filter_map(|row| engine.resolved_layout().position_of(row))
        .collect()
}

fn row_of_word(word: &str) -> (Consonant, Consonant) {
    let kana = match word {
        "桜" => "さくら",
        "皿" => "さら",
        "魚" => "さかな",
        "寿司" => "すし",
        "傘" => "かさ",
        "橋" | "箸" => "はし",
        "人" => "ひと",
        "雨" => "あめ",
        other => panic!("unknown word {other}"),
    };
    let rows: Vec<Consonant> = kana.chars().filter_map(consonant_of).collect();
    (rows[0], *rows.last().unwrap())
}

#[test]
fn narrowing_restricts_results_to_endpoint_rows() {
    let engine = engine();
    // さ key down to the ら key, wobbling on the way.
    let trace = vec![
        Point::new(252.0, 48.0),
        Point::new(200.0, 60.0),
        Point::new(160.0, 55.0),
        Point::new(210.0, 150.0),
        Point::new(247.0, 246.0),
    ];
    let results = engine.recognize(&trace);

    assert!(!results.is_empty());
    for result in &results {
        assert_eq!(row_of_word(&result.text), (Consonant::S, Consonant::R));
    }
}

#[test]
fn spelled_traces_rank_their_word_first() {
    let engine = engine();
    for (kana, word) in [("さくら", "桜"), ("さかな", "魚"), ("ひと", "人")] {
        let results = engine.recognize(&spelled(&engine, kana));
        assert_eq!(results[0].text, word, "tracing {kana}");
    }
}

#[test]
fn frequency_breaks_ties_between_homophones() {
    let engine = engine();
    let results = engine.recognize(&spelled(&engine, "はし"));
    let texts: Vec<&str> = results.iter().map(|r| r.text.as_str()).collect();
    assert_eq!(texts, vec!["橋", "箸"]);

    let total: f64 = results.iter().map(|r| r.confidence).sum();
    assert!((total - 1.0).abs() < 1e-9);
    assert!((results[0].confidence - 140.0 / 240.0).abs() < 1e-9);
}

#[test]
fn results_are_sorted_and_above_threshold() {
    let engine = engine();
    let results = engine.recognize(&spelled(&engine, "さら"));
    assert!(results
        .windows(2)
        .all(|w| w[0].confidence >= w[1].confidence));
    assert!(results
        .iter()
        .all(|r| r.confidence > engine.config().min_confidence && r.confidence <= 1.0));
}

#[test]
fn trace_far_from_any_key_end_finds_nothing() {
    let engine = engine();
    // Ends in the gap between rows, more than 50 units from every key.
    let trace = vec![Point::new(250.0, 50.0), Point::new(100.0, 100.0)];
    assert!(engine.recognize(&trace).is_empty());
}

#[test]
fn background_build_can_be_installed() {
    let engine =
        GestureEngine::new(EngineConfig::default(), KeyboardLayout::default(), SURFACE)
            .expect("engine");
    assert!(engine.recognize(&spelled(&engine, "すし")).is_empty());

    let events = spawn_build(
        engine.resolved_layout().clone(),
        engine.config().trace_params(),
        vec![RawEntry::new("すし", "寿司", 1.0)],
    )
    .expect("spawn");

    let mut last_progress = 0.0;
    for event in events {
        match event {
            BuildEvent::Progress(fraction) => {
                assert!(fraction >= last_progress);
                last_progress = fraction;
            }
            BuildEvent::Finished(index) => engine.install_index(index),
        }
    }

    assert_eq!(last_progress, 1.0);
    let results = engine.recognize(&spelled(&engine, "すし"));
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].text, "寿司");
}

fn open_engine(surface: Size, snapshot: &Path, vocabulary: &Path) -> GestureEngine {
    GestureEngine::from_snapshot_or_vocabulary(
        EngineConfig::default(),
        KeyboardLayout::default(),
        surface,
        snapshot,
        vocabulary,
    )
    .expect("engine")
}

#[test]
fn snapshot_is_reused_for_the_same_vocabulary() {
    let dir = TempDir::new().expect("tempdir");
    let vocabulary = dir.path().join("vocabulary.txt");
    let snapshot = dir.path().join("cache").join("index.bin");
    std::fs::write(&vocabulary, VOCABULARY).expect("write vocabulary");

    let first = open_engine(SURFACE, &snapshot, &vocabulary);
    assert_eq!(first.index().len(), 9);
    assert!(snapshot.exists());

    let second = open_engine(SURFACE, &snapshot, &vocabulary);
    assert_eq!(second.index().entries(), first.index().entries());
    assert_eq!(second.recognize(&spelled(&second, "さくら"))[0].text, "桜");
}

#[test]
fn edited_vocabulary_replaces_the_snapshot() {
    let dir = TempDir::new().expect("tempdir");
    let vocabulary = dir.path().join("vocabulary.txt");
    let snapshot = dir.path().join("index.bin");

    std::fs::write(&vocabulary, "さくら,10,桜\n").expect("write vocabulary");
    let first = open_engine(SURFACE, &snapshot, &vocabulary);
    assert_eq!(first.index().len(), 1);

    std::fs::write(&vocabulary, "さくら,10,桜\nさら,10,皿\n").expect("rewrite vocabulary");
    let second = open_engine(SURFACE, &snapshot, &vocabulary);
    assert_eq!(second.index().len(), 2);
    let texts: Vec<String> = second
        .recognize(&spelled(&second, "さら"))
        .into_iter()
        .map(|r| r.text)
        .collect();
    assert!(texts.contains(&"皿".to_string()));

    // A changed frequency alone is an edit too.
    std::fs::write(&vocabulary, "さくら,10,桜\nさら,99,皿\n").expect("rewrite vocabulary");
    let third = open_engine(SURFACE, &snapshot, &vocabulary);
    let frequencies: Vec<f64> = third.index().entries().iter().map(|e| e.frequency()).collect();
    assert_eq!(frequencies, vec![10.0, 99.0]);
}

#[test]
fn empty_rebuild_keeps_the_existing_snapshot() {
    let dir = TempDir::new().expect("tempdir");
    let vocabulary = dir.path().join("vocabulary.txt");
    let snapshot = dir.path().join("index.bin");
    std::fs::write(&vocabulary, VOCABULARY).expect("write vocabulary");
    open_engine(SURFACE, &snapshot, &vocabulary);
    let saved = std::fs::read(&snapshot).expect("read snapshot");

    std::fs::remove_file(&vocabulary).expect("remove vocabulary");

    // Same surface, vocabulary gone: nothing to recognize, cache untouched.
    let same = open_engine(SURFACE, &snapshot, &vocabulary);
    assert!(same.index().is_empty());
    assert!(same.recognize(&spelled(&same, "さくら")).is_empty());
    assert_eq!(std::fs::read(&snapshot).expect("read snapshot"), saved);

    // Stale for the new surface, and still nothing to rebuild it from.
    let resized = open_engine(Size::new(600.0, 800.0), &snapshot, &vocabulary);
    assert!(resized.index().is_empty());
    assert_eq!(std::fs::read(&snapshot).expect("read snapshot"), saved);
}
