use std::fs;

use hmmtag::{
    decode, evaluate_files, read_sentences, Error, HmmModel, HmmTagger, Outcome, Runner,
    StringTable, Tagger,
};

const MODEL: &str = "tests/data/hmmmodel.txt";
const SENTENCES: &str = "tests/data/sentences.txt";
const REFERENCE: &str = "tests/data/reference.txt";

#[test]
fn test_open_model() {
    let model = HmmModel::from_path(MODEL).unwrap();
    assert_eq!(model.num_tags(), 6);
    assert_eq!(model.num_words(), 7);
    assert_eq!(model.open_tags().collect::<Vec<_>>(), vec!["NN", "VB", "RB"]);
}

#[test]
fn test_open_not_existing_model_does_not_panic() {
    match HmmModel::from_path("tests/data/does-not-exist.txt") {
        Err(Error::Io(..)) => {}
        other => panic!("test fail: {:?}", other),
    }
}

#[test]
fn test_malformed_model() {
    let text = fs::read_to_string(MODEL).unwrap();
    let truncated: Vec<&str> = text.lines().take(10).collect();
    match truncated.join("\n").parse::<HmmModel>() {
        Err(Error::MalformedModel { line: 11, .. }) => {}
        other => panic!("test fail: {:?}", other),
    }
}

#[test]
fn test_tag() {
    let model = HmmModel::from_path(MODEL).unwrap();
    let tagger = HmmTagger::new(&model);
    assert_eq!(tagger.tag(&["the", "dog", "runs", "fast"]).unwrap(), vec!["DT", "NN", "VB", "RB"]);
    assert_eq!(tagger.tag(&["the", "bird", "sings"]).unwrap(), vec!["DT", "NN", "VB"]);
    assert_eq!(tagger.tag(&["fast", "fast"]).unwrap(), vec!["RB", "RB"]);

    let path = tagger.viterbi(&["the", "dog", "runs"]).unwrap();
    assert!((path.score - -4.554595900025158).abs() < 1e-9, "{}", path.score);
}

#[test]
fn test_tags_are_never_sentinels() {
    let model = HmmModel::from_path(MODEL).unwrap();
    let words = ["zzz", "the", "qqq", "dog", "a", "fast", "yyy"];
    for n in 1..=words.len() {
        // DT never ends a sentence
        let path = match decode(&model, &words[..n]) {
            Ok(path) => path,
            Err(Error::UnscoreableSentence { .. }) => {
                assert!(matches!(words[n - 1], "the" | "a"));
                continue;
            }
            Err(e) => panic!("test fail: {e}"),
        };
        assert_eq!(path.tags.len(), n);
        for tag in path.tags {
            let label = model.tags().to_str(tag).unwrap();
            assert!(label != "q0" && label != "qN", "{label}");
        }
    }
}

#[test]
fn test_run_and_evaluate() {
    let model = HmmModel::from_path(MODEL).unwrap();
    let tagger = HmmTagger::new(&model);
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("hmmoutput.txt");

    let stats = Runner::new(&tagger).run_file(SENTENCES, &output).unwrap();
    assert_eq!((stats.tagged, stats.unscoreable, stats.empty), (4, 0, 1));

    let written = fs::read_to_string(&output).unwrap();
    let expected = fs::read_to_string(REFERENCE).unwrap();
    assert_eq!(written, expected);

    let report = evaluate_files(&output, REFERENCE).unwrap();
    assert_eq!(report.item_total_num, 14);
    assert_eq!(report.item_accuracy, 1.0);
}

#[test]
fn test_evaluate_against_noisy_reference() {
    let dir = tempfile::tempdir().unwrap();
    let prediction = dir.path().join("prediction.txt");
    let reference = dir.path().join("reference.txt");
    fs::write(&prediction, "a/X b/Y\n").unwrap();
    fs::write(&reference, "a/X b/Z\n").unwrap();
    let report = evaluate_files(&prediction, &reference).unwrap();
    assert_eq!(report.item_accuracy, 0.5);

    fs::write(&reference, "a/X b/Z\nc/X\n").unwrap();
    match evaluate_files(&prediction, &reference) {
        Err(Error::AlignmentMismatch { line: 0, expected: 2, found: 1 }) => {}
        other => panic!("test fail: {:?}", other),
    }

    fs::write(&reference, "a/X\n").unwrap();
    match evaluate_files(&prediction, &reference) {
        Err(Error::AlignmentMismatch { line: 1, expected: 1, found: 2 }) => {}
        other => panic!("test fail: {:?}", other),
    }
}

#[test]
fn test_output_length_matches_input() {
    let model = HmmModel::from_path(MODEL).unwrap();
    let tagger = HmmTagger::new(&model);
    let sentences = read_sentences(SENTENCES).unwrap();
    let outcomes = Runner::new(&tagger).run(&sentences);
    assert_eq!(outcomes.len(), sentences.len());
    for (sentence, outcome) in sentences.iter().zip(&outcomes) {
        match outcome {
            Outcome::Tagged { words, tags } => {
                assert_eq!(words, &sentence.words);
                assert_eq!(tags.len(), sentence.len());
            }
            Outcome::Empty => assert!(sentence.is_empty()),
            Outcome::Unscoreable { .. } => panic!("unexpected unscoreable sentence"),
        }
    }
}
