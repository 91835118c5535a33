use std::fs;
use std::path::Path;

use surprisal::n_gram::config::PipelineConfig;
use surprisal::pipeline::{run, select_from_corpus, train_from_text, ModelSource};
use surprisal::scorer::SelectionOutcome;
use surprisal::SurprisalModel;

const TRAINING: &str = "\
The quick brown fox jumps over the lazy dog while the farmer watches from the old red barn. \
The farmer walks to the market with a basket of apples and a jar of honey for the baker. \
A small bird sings on the fence near the barn as the sun rises over the quiet green hills.

The baker bakes bread every morning before the market opens and the town wakes up slowly.
";

fn covered_line(i: usize) -> String {
    // every line is a training sentence, so coverage holds
    match i % 3 {
        0 => String::from("The quick brown fox jumps over the lazy dog while the farmer watches from the old red barn."),
        1 => String::from("The farmer walks to the market with a basket of apples and a jar of honey for the baker."),
        _ => String::from("A small bird sings on the fence near the barn as the sun rises over the quiet green hills."),
    }
}

fn write(dir: &Path, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}

fn config_for(out: &Path) -> PipelineConfig {
    let mut config = PipelineConfig::default();
    config.output.directory = out.to_path_buf();
    config
}

#[test]
fn three_qualifying_sentences_exhaust_the_corpus() {
    let dir = tempfile::tempdir().unwrap();
    let train = write(dir.path(), "train.txt", TRAINING);
    let test = write(
        dir.path(),
        "test.txt",
        &[
            "= Valkyria Chronicles III =",
            covered_line(0).as_str(),
            "The farmer walks.",
            "",
            covered_line(1).as_str(),
            "The quick brown fox jumps over the lazy bird while the farmer watches from the old red barn.",
            " = = Gameplay = = ",
            covered_line(2).as_str(),
        ]
        .join("\n"),
    );
    let out = dir.path().join("out");

    let selection = run(ModelSource::Train(&train), &test, &config_for(&out), None).unwrap();

    assert_eq!(selection.records.len(), 3);
    assert_eq!(selection.outcome, SelectionOutcome::CorpusExhausted { found: 3, quota: 10 });
    for record in &selection.records {
        let score = record.surprisal.unwrap();
        assert!(score.is_finite() && score > 0.0);
    }

    for (i, record) in selection.records.iter().enumerate() {
        let text = fs::read_to_string(out.join(format!("{}.txt", i + 1))).unwrap();
        assert_eq!(text, covered_line(i));
        assert_eq!(record.text, covered_line(i));
    }
    assert!(!out.join("4.txt").exists());

    let mut reader = csv::Reader::from_path(out.join("surprisal.csv")).unwrap();
    let headers: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
    assert_eq!(headers, vec!["Sentence", "Surprisal"]);
    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 3);
    for (row, record) in rows.iter().zip(&selection.records) {
        assert_eq!(&row[0], covered_line(record.index - 1).to_lowercase());
        let parsed: f64 = row[1].parse().unwrap();
        assert_eq!(Some(parsed), record.surprisal);
    }
}

#[test]
fn selection_stops_after_the_quota() {
    let dir = tempfile::tempdir().unwrap();
    let model = train_from_text(TRAINING, 2).unwrap();
    let lines: Vec<String> = (0..30).map(covered_line).collect();
    let test = write(dir.path(), "test.txt", &lines.join("\n"));

    let mut config = config_for(&dir.path().join("out"));
    config.scorer.quota = 10;
    let selection = select_from_corpus(&test, &model, &config).unwrap();

    assert_eq!(selection.outcome, SelectionOutcome::QuotaFilled);
    assert_eq!(selection.records.len(), 10);
    let indices: Vec<usize> = selection.records.iter().map(|r| r.index).collect();
    assert_eq!(indices, (1..=10).collect::<Vec<usize>>());
    for (i, record) in selection.records.iter().enumerate() {
        assert_eq!(record.text, covered_line(i));
    }
}

#[test]
fn saved_model_reproduces_the_selection() {
    let dir = tempfile::tempdir().unwrap();
    let train = write(dir.path(), "train.txt", TRAINING);
    let lines: Vec<String> = (0..5).map(covered_line).collect();
    let test = write(dir.path(), "test.txt", &lines.join("\n"));
    let model_path = dir.path().join("model.csv");

    let first = run(
        ModelSource::Train(&train),
        &test,
        &config_for(&dir.path().join("first")),
        Some(model_path.as_path()),
    )
    .unwrap();
    let second = run(
        ModelSource::Load(&model_path),
        &test,
        &config_for(&dir.path().join("second")),
        None,
    )
    .unwrap();

    assert_eq!(first, second);
    assert_eq!(
        fs::read_to_string(dir.path().join("first/surprisal.csv")).unwrap(),
        fs::read_to_string(dir.path().join("second/surprisal.csv")).unwrap()
    );
}

#[test]
fn training_is_idempotent_across_thread_counts() {
    let one = train_from_text(TRAINING, 1).unwrap();
    let again = train_from_text(TRAINING, 1).unwrap();
    let four = train_from_text(TRAINING, 4).unwrap();
    assert_eq!(one, again);
    assert_eq!(one, four);
    assert!(!one.is_empty());
}

#[test]
fn missing_inputs_are_errors() {
    let dir = tempfile::tempdir().unwrap();
    let test = write(dir.path(), "test.txt", "");
    let absent = dir.path().join("absent.txt");
    let config = config_for(&dir.path().join("out"));

    assert!(run(ModelSource::Train(&absent), &test, &config, None).is_err());
    let model = SurprisalModel::default();
    assert!(select_from_corpus(&absent, &model, &config).is_err());
}

#[test]
fn empty_test_corpus_selects_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let train = write(dir.path(), "train.txt", TRAINING);
    let test = write(dir.path(), "test.txt", "");
    let out = dir.path().join("out");

    let selection = run(ModelSource::Train(&train), &test, &config_for(&out), None).unwrap();
    assert!(selection.records.is_empty());
    assert_eq!(selection.outcome, SelectionOutcome::CorpusExhausted { found: 0, quota: 10 });
    assert_eq!(fs::read_to_string(out.join("surprisal.csv")).unwrap(), "Sentence,Surprisal\n");
}
