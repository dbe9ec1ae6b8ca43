//! Batch runs over real files.

use mdsplit_content::{SegmentOptions, SplitOptions};
use mdsplit_core::Error;
use mdsplit_ingest::{Aggregator, expand_patterns, process_file};
use serde_json::json;

use crate::common::{DocTree, GUIDE, ORPHAN};

#[tokio::test]
async fn test_process_file_reads_and_splits() {
    let tree = DocTree::new();
    let path = tree.write("guide.md", GUIDE);

    let group = process_file(&path, &SplitOptions::default()).await.unwrap();

    assert_eq!(group.path, path);
    assert_eq!(group.len(), 2);
    assert_eq!(group.items[0].title, "Install");
    assert_eq!(group.items[0].body, "Run the installer.\n");
    assert_eq!(group.items[0].metadata["order"], json!(1));
    assert_eq!(group.items[1].metadata.get("order"), None);
    assert_eq!(group.items[1].metadata["section"], json!("guide"));
}

#[tokio::test]
async fn test_groups_follow_input_order() {
    let tree = DocTree::new();
    for (name, title) in [("a.md", "A"), ("b.md", "B"), ("c.md", "C"), ("d.md", "D")] {
        tree.write(name, &format!("# {title}\n"));
    }
    let paths = expand_patterns(&[tree.pattern("*.md")]).unwrap();

    let report = Aggregator::new()
        .with_concurrency(3)
        .run(paths.clone())
        .await
        .unwrap();

    let titles: Vec<&str> = report
        .groups
        .iter()
        .map(|group| group.items[0].title.as_str())
        .collect();
    assert_eq!(titles, ["A", "B", "C", "D"]);
    assert_eq!(
        report.groups.iter().map(|g| g.path.clone()).collect::<Vec<_>>(),
        paths
    );
}

#[tokio::test]
async fn test_failing_file_is_isolated() {
    let tree = DocTree::new();
    let good = tree.write("good.md", GUIDE);
    let bad = tree.write("orphan.md", ORPHAN);
    let missing = tree.write("zz.md", "# Z\n");
    std::fs::remove_file(&missing).unwrap();

    let report = Aggregator::new()
        .run([good.clone(), bad.clone(), missing.clone()])
        .await
        .unwrap();

    assert_eq!(report.groups.len(), 1);
    assert_eq!(report.groups[0].path, good);
    assert_eq!(report.item_count(), 2);

    assert_eq!(report.failures.len(), 2);
    assert_eq!(report.failures[0].path, bad);
    assert!(matches!(
        report.failures[0].error,
        Error::StructuralPrecondition { .. }
    ));
    assert_eq!(report.failures[1].path, missing);
    assert!(matches!(report.failures[1].error, Error::Io { .. }));
    assert!(!report.is_success());
}

#[tokio::test]
async fn test_fail_fast_returns_first_error() {
    let tree = DocTree::new();
    let bad = tree.write("a.md", ORPHAN);
    let good = tree.write("b.md", GUIDE);

    let err = Aggregator::new()
        .with_fail_fast(true)
        .run([bad, good])
        .await
        .unwrap_err();

    assert!(matches!(err, Error::StructuralPrecondition { .. }));
}

#[tokio::test]
async fn test_lenient_options_reach_every_file() {
    let tree = DocTree::new();
    let path = tree.write("orphan.md", ORPHAN);

    let options = SplitOptions {
        segment: SegmentOptions::lenient(),
        ..SplitOptions::default()
    };
    let report = Aggregator::new()
        .with_split_options(options)
        .run([path])
        .await
        .unwrap();

    assert!(report.is_success());
    assert_eq!(report.groups[0].items[0].title, "Late");
}

#[tokio::test]
async fn test_empty_batch() {
    let report = Aggregator::new()
        .run(Vec::<std::path::PathBuf>::new())
        .await
        .unwrap();
    assert!(report.groups.is_empty());
    assert!(report.is_success());
}
