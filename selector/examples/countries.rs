//! Country picker backed by a simulated remote collection.
//!
//! Run with: cargo run -p selector --example countries

use std::time::Duration;

use selectdom::Document;
use selector::prelude::*;
use simplelog::{Config, LevelFilter, WriteLogger};

fn print_control(control: &selectdom::Element) {
    for option in control.options() {
        let marker = if option.attribute("value") == Some(control.value()) {
            ">"
        } else {
            " "
        };
        println!(
            "  {marker} {} ({})",
            option.text(),
            option.attribute("value").unwrap_or_default()
        );
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    WriteLogger::init(LevelFilter::Debug, Config::default(), std::io::stderr())
        .expect("Failed to initialize logger");

    let doc = Document::new();
    let form = doc.create_element("form");
    let control = doc.create_element("select");
    form.append_child(&control).expect("fresh nodes");

    let options = SelectorOptions::from_json(
        r#"{"group_by_attribute": "region", "selected_id": "jp", "base_url": "/api"}"#,
    )
    .expect("valid options");

    let countries = MemoryCollection::new();
    let mut selector = Selector::builder(countries.clone(), control.clone())
        .options(options)
        .on_selection_change(|value, record| {
            let name = record
                .and_then(|r| r.get("value"))
                .map(ToString::to_string)
                .unwrap_or_default();
            println!("selected '{value}' {name}");
        })
        .build();

    selector.populate_from("countries");

    // Stand-in for a backend answering the fetch a little later
    let backend = countries.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        for request in backend.pending_fetches() {
            println!("serving {}", request.url);
            let records = MemoryCollection::from_json(
                r#"[
                    {"key": "be", "value": "Belgium", "region": "Europe"},
                    {"key": "jp", "value": "Japan", "region": "Asia"},
                    {"key": "nl", "value": "Netherlands", "region": "Europe"}
                ]"#,
            )
            .expect("valid records");
            backend.complete_fetch(request.id, records.records());
        }
    });

    selector.next_event().await;
    print_control(&control);

    control.choose("nl").expect("control is mounted");
    selector.next_event().await;
    print_control(&control);
}
