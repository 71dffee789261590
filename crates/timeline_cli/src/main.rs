//! CLI smoke entry point.
//!
//! # Responsibility
//! - Load one document file through `timeline_core` and print a summary.
//! - Keep output deterministic for quick local sanity checks.

use timeline_core::EditorOptions;

fn main() {
    println!("timeline_core version={}", timeline_core::core_version());

    let Some(path) = std::env::args().nth(1) else {
        eprintln!("usage: timeline_cli <document.json>");
        std::process::exit(2);
    };

    let (store, report) = match EditorOptions::new(path).open() {
        Ok(opened) => opened,
        Err(err) => {
            eprintln!("failed to open editor: {err}");
            std::process::exit(1);
        }
    };

    if let Some(reason) = &report.fallback {
        println!("document=empty reason={reason}");
    }
    if !report.backfilled.is_empty() {
        println!("backfilled={}", report.backfilled.join(","));
    }
    if let Some(document) = store.document() {
        println!(
            "groups={} items={} categories={} eras={} markers={}",
            timeline_core::model::group::flatten_forest(&document.groups).len(),
            document.items.len(),
            document.categories.len(),
            document.eras.len(),
            document.markers.len()
        );
    }
}
