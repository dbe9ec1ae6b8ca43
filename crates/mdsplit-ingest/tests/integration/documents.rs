//! Flattening processed files into index documents.

use mdsplit_content::SplitOptions;
use mdsplit_ingest::{Aggregator, expand_patterns, to_documents};
use serde_json::{Value, json};

use crate::common::{DocTree, GUIDE};

#[tokio::test]
async fn test_documents_from_tree() {
    let tree = DocTree::new();
    tree.write("guides/guide.md", GUIDE);
    tree.write("guides/notes.txt", "# Not markdown\n");

    let paths = expand_patterns(&[tree.pattern("**/*.md")]).unwrap();
    let report = Aggregator::new()
        .with_split_options(SplitOptions::default())
        .run(paths)
        .await
        .unwrap();
    let docs = to_documents(&report.groups);

    assert_eq!(docs.len(), 2);
    assert_eq!(docs[0].id(), "guide-install");
    assert_eq!(docs[1].id(), "guide-configure");

    let first = Value::Object(docs[0].fields().clone());
    assert_eq!(first["section"], json!("guide"));
    assert_eq!(first["order"], json!(1));
    assert_eq!(first["title"], json!("Install"));
    assert!(first["path"].as_str().unwrap().ends_with("guide.md"));

    let line = docs[1].to_json_line().unwrap();
    let parsed: Value = serde_json::from_str(&line).unwrap();
    assert_eq!(parsed["body"], json!("Edit the config file.\n"));
}
