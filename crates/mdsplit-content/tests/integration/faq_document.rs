//! A realistic FAQ page with front matter, metadata blocks and mixed content.

use mdsplit_content::{SplitOptions, split_document};
use serde_json::{Value, json};

const FAQ: &str = include_str!("../fixtures/faq.md");

#[test]
fn test_faq_titles_in_order() {
    let items = split_document(FAQ, &SplitOptions::default()).unwrap();
    let titles: Vec<&str> = items.iter().map(|item| item.title.as_str()).collect();
    assert_eq!(
        titles,
        ["How do refunds work?", "Which currencies are supported?"]
    );
}

#[test]
fn test_faq_metadata_per_item() {
    let items = split_document(FAQ, &SplitOptions::default()).unwrap();

    assert_eq!(
        Value::Object(items[0].metadata.clone()),
        json!({"category": "faq", "tags": ["billing", "refunds"], "weight": 10})
    );
    assert_eq!(
        Value::Object(items[1].metadata.clone()),
        json!({
            "category": "faq",
            "tags": ["billing"],
            "weight": 20,
            "currencies": ["EUR", "USD"]
        })
    );
}

#[test]
fn test_faq_bodies_are_canonical() {
    let items = split_document(FAQ, &SplitOptions::default()).unwrap();

    assert_eq!(
        items[0].body,
        "Refunds are issued to the original payment method.\n\n\
         1. Open the order page.\n\
         2. Click **Request refund**.\n"
    );
    assert_eq!(
        items[1].body,
        "| Currency | Symbol |\n\
         | -------- | :----: |\n\
         | Euro     | €      |\n\
         | Dollar   | $      |\n\
         \n\
         ## Exchange rates\n\
         \n\
         Rates are updated daily, see [the rates page](https://example.com/rates).\n\
         \n\
         ```sh\n\
         curl https://example.com/rates\n\
         ```\n"
    );
}

#[test]
fn test_faq_preamble_not_in_any_item() {
    let items = split_document(FAQ, &SplitOptions::default()).unwrap();
    assert!(
        items
            .iter()
            .all(|item| !item.body.contains("introduction"))
    );
}
