mod common;

use common::{mono, random_paragraph, rng};
use folio::job::Job;
use folio::{Element, ExecutorImpl, FolioError, ParagraphBuilder, Strategy, TextAlign, Typesetter};
use rand::Rng;

const TEXT: &str = "It was the best of times, it was the worst of times, it was the age of \
wisdom, it was the age of foolishness, it was the epoch of belief, it was the epoch of \
incredulity, it was the season of Light, it was the season of Darkness.";

fn paragraphs() -> Vec<Vec<Element>> {
    let mut rng = rng(11);
    (0..64)
        .map(|_| {
            let count = rng.random_range(1..120);
            random_paragraph(&mut rng, count, true)
        })
        .collect()
}

#[test]
fn test_parallel_and_sequential_results_match() {
    let sequential = Typesetter::default()
        .with_executor(ExecutorImpl::sequential())
        .break_all(paragraphs(), 320);
    let parallel = Typesetter::default().break_all(paragraphs(), 320);

    assert_eq!(sequential.len(), parallel.len());
    for (a, b) in sequential.iter().zip(&parallel) {
        assert_eq!(a.as_ref().unwrap(), b.as_ref().unwrap());
    }
}

#[test]
fn test_results_follow_input_order() {
    let widths: Vec<i32> = (1..=20).map(|k| k * 10).collect();
    let sources: Vec<Vec<Element>> = widths.iter().map(|w| vec![Element::boxed(*w)]).collect();
    let results = Typesetter::default().break_all(sources, 1_000);

    for (result, width) in results.iter().zip(&widths) {
        let result = result.as_ref().unwrap();
        assert_eq!(result.segments[0].natural.width, *width);
    }
}

#[test]
fn test_paragraphs_in_every_alignment() {
    let sources: Vec<ParagraphBuilder> = [TextAlign::Justify, TextAlign::Left, TextAlign::Right, TextAlign::Center]
        .into_iter()
        .map(|align| ParagraphBuilder::new(TEXT, mono).align(align))
        .collect();
    let results = Typesetter::default().break_all(sources, 400);

    for result in results {
        let result = result.unwrap();
        assert!(result.len() > 3);
        assert!(!result.degraded());
    }
}

#[test]
fn test_greedy_strategy_is_reported_per_unit() {
    let results = Typesetter::default()
        .with_strategy(Strategy::FirstFit)
        .break_all(vec![ParagraphBuilder::new(TEXT, mono)], 400);

    let result = results[0].as_ref().unwrap();
    assert_eq!(result.pass, folio::BreakPass::FirstFit);
    assert!(result.len() > 3);
}

#[test]
fn test_job_file_round_trip() {
    let json = r#"{
        "config": { "looseness": 0 },
        "widths": [300, 400],
        "height": 120,
        "advance": 10,
        "units": [
            { "text": "A short paragraph that still needs more than one line to set.", "align": "left" },
            { "elements": [{ "type": "box", "width": 10000 }] },
            { "blocks": [{ "lines": [12, 12, 12, 12], "footnotes": [[1, [{ "type": "box", "width": 24 }]]] }], "ragged_bottom": 60 }
        ]
    }"#;
    let job = Job::from_json(json).unwrap();
    let typesetter = Typesetter::new(job.config.breaking).with_page_config(job.config);
    let report = job.run(&typesetter).unwrap();

    assert_eq!(report.units.len(), 3);
    let text = report.units[0].outcome.as_ref().unwrap();
    assert!(text.boundaries.len() > 2);
    assert!(!text.degraded);
    let oversized = report.units[1].outcome.as_ref().unwrap();
    assert!(oversized.degraded);
    let flow = report.units[2].outcome.as_ref().unwrap();
    let pages = flow.pages.as_ref().unwrap();
    assert_eq!(pages[0].footnotes, vec![(0, 0, 1)]);

    let value = serde_json::to_value(&report).unwrap();
    assert_eq!(value["units"][1]["pass"], "force-everywhere");
}

#[test]
fn test_malformed_job_is_a_json_error() {
    let err = Job::from_json("{ \"units\": 3 }").unwrap_err();
    assert!(matches!(err, FolioError::Json(_)));
}
