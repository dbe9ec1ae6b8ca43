//! End-to-end behaviour of `split_document`.

use mdsplit_content::markdown::{MarkdownOptions, Node, parse_nodes, render_blocks};
use mdsplit_content::{Policy, SegmentOptions, SplitOptions, split_document};
use mdsplit_core::Error;
use serde_json::{Value, json};

fn metadata_of(text: &str) -> Vec<Value> {
    split_document(text, &SplitOptions::default())
        .unwrap()
        .into_iter()
        .map(|item| Value::Object(item.metadata))
        .collect()
}

// ----------------------------------------------------------------------------
// Documented examples
// ----------------------------------------------------------------------------

#[test]
fn test_two_items_with_front_matter() {
    let text = "---\ntags: [a]\n---\n# Title1\nHello\n```toml metadata\nkey=1\n```\n# Title2\nWorld";
    let items = split_document(text, &SplitOptions::default()).unwrap();

    assert_eq!(items.len(), 2);
    assert_eq!(items[0].title, "Title1");
    assert_eq!(items[0].body, "Hello\n");
    assert_eq!(
        Value::Object(items[0].metadata.clone()),
        json!({"tags": ["a"], "key": 1})
    );
    assert_eq!(items[1].title, "Title2");
    assert_eq!(items[1].body, "World\n");
    assert_eq!(
        Value::Object(items[1].metadata.clone()),
        json!({"tags": ["a"]})
    );
}

#[test]
fn test_single_heading_without_front_matter() {
    let items = split_document("# Only\nBody text.", &SplitOptions::default()).unwrap();

    assert_eq!(items.len(), 1);
    assert_eq!(items[0].title, "Only");
    assert_eq!(items[0].body, "Body text.\n");
    assert!(items[0].metadata.is_empty());
}

// ----------------------------------------------------------------------------
// Metadata precedence
// ----------------------------------------------------------------------------

#[test]
fn test_embedded_block_beats_front_matter() {
    let text = "+++\nk = \"front\"\n+++\n# A\n```yaml metadata\nk: block\n```\n";
    assert_eq!(metadata_of(text), [json!({"k": "block"})]);
}

#[test]
fn test_blocks_apply_in_document_order() {
    let text = "# A\n```toml metadata\nk = 1\nx = true\n```\ntext\n```toml metadata\nk = 2\n```\n";
    assert_eq!(metadata_of(text), [json!({"k": 2, "x": true})]);
}

#[test]
fn test_sibling_items_do_not_share_metadata() {
    let text = "---\nbase: 0\n---\n\
                # A\n```toml metadata\na = 1\n```\n\
                # B\n```toml metadata\nb = 2\n```\n\
                # C\n";
    assert_eq!(
        metadata_of(text),
        [
            json!({"base": 0, "a": 1}),
            json!({"base": 0, "b": 2}),
            json!({"base": 0}),
        ]
    );
}

// ----------------------------------------------------------------------------
// Failures and policies
// ----------------------------------------------------------------------------

#[test]
fn test_zero_headings_zero_items() {
    let text = "---\nk: v\n---\nNo headings here.\n\n## Not level one\n";
    assert!(
        split_document(text, &SplitOptions::default())
            .unwrap()
            .is_empty()
    );
}

#[test]
fn test_metadata_before_heading() {
    let text = "```yaml metadata\nk: v\n```\n# A\nbody\n";

    let err = split_document(text, &SplitOptions::default()).unwrap_err();
    assert!(matches!(err, Error::StructuralPrecondition { .. }));

    let options = SplitOptions {
        segment: SegmentOptions {
            orphan_metadata: Policy::Skip,
            ..SegmentOptions::default()
        },
        ..SplitOptions::default()
    };
    let items = split_document(text, &options).unwrap();
    assert_eq!(items.len(), 1);
    assert!(items[0].metadata.is_empty());
}

#[test]
fn test_bad_block_reports_format() {
    let err = split_document("# A\n```yaml metadata\nkey: [unclosed\n```\n", &SplitOptions::default())
        .unwrap_err();
    let Error::MetadataBlock { format, .. } = err else {
        unreachable!("Expected MetadataBlock error variant");
    };
    assert_eq!(format, "yaml");
}

// ----------------------------------------------------------------------------
// Rendering stability
// ----------------------------------------------------------------------------

#[test]
fn test_rendered_body_is_a_fixed_point() {
    let text = "# A\n\
                Intro with *emphasis*, `code` and a [link](https://example.com).\n\n\
                * one\n* two\n    * nested\n\n\
                ```rust\nfn main() {}\n```\n\n\
                | a | b |\n|---|---|\n| 1 | 2 |\n";
    let items = split_document(text, &SplitOptions::default()).unwrap();
    let body = &items[0].body;

    let options = MarkdownOptions::default();
    let reparsed = parse_nodes(body, &options);
    assert_eq!(render_blocks(&reparsed), *body);
    assert_eq!(
        reparsed
            .iter()
            .map(|node| match node {
                Node::Heading(_) => "heading",
                Node::FencedCode(_) => "code",
                Node::Other(_) => "other",
            })
            .collect::<Vec<_>>(),
        ["other", "other", "code", "other"]
    );
}
