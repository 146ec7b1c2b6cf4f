use std::path::PathBuf;

use rubric::{
    grade::{self, Report},
    rubrics::bulma::{self, BulmaPage, RUBRIC_NAME},
};
use uuid::Uuid;

fn fixture_root(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("fixtures")
        .join("web")
        .join(name)
}

fn grade_fixture(name: &str) -> Report {
    let rubric = bulma::rubric().expect("build rubric");
    let mut page = BulmaPage::load(fixture_root(name), "index.html");
    grade::run(&rubric, &mut page)
}

fn points(report: &Report) -> Vec<f64> {
    report.entries().iter().map(|e| e.points()).collect()
}

#[test]
fn rubric_declares_eleven_ordered_steps() {
    let rubric = bulma::rubric().expect("build rubric");
    assert_eq!(rubric.name(), RUBRIC_NAME);
    assert_eq!(rubric.steps().len(), 11);
    assert_eq!(rubric.max_points(), 10.0);
    assert!(
        rubric
            .steps()
            .windows(2)
            .all(|w| w[0].order() < w[1].order())
    );
}

#[test]
fn complete_page_earns_full_credit() {
    let report = grade_fixture("complete");

    assert_eq!(report.entries().len(), 11);
    assert_eq!(report.total(), 10.0);
    assert!(!report.stopped());
    assert_eq!(report.entries()[0].points(), 0.5);
    assert_eq!(report.entries()[1].text(), "it should use the Bulma css library");
    assert!(
        report
            .entries()
            .iter()
            .all(|e| !e.text().contains("unable to grade"))
    );
}

#[test]
fn missing_file_stops_after_first_step() {
    let empty = std::env::temp_dir().join(format!("rubric-missing-{}", Uuid::new_v4()));
    std::fs::create_dir_all(&empty).expect("create temp dir");

    let rubric = bulma::rubric().expect("build rubric");
    let mut page = BulmaPage::load(&empty, "index.html");
    let report = grade::run(&rubric, &mut page);

    let texts: Vec<&str> = report.entries().iter().map(|e| e.text()).collect();
    assert_eq!(texts, vec!["cannot find the file", "it should have a <head/> and a <body/>"]);
    assert_eq!(report.total(), 0.0);
    assert!(report.stopped());

    let _ = std::fs::remove_dir_all(empty);
}

#[test]
fn page_without_stylesheet_faults_on_the_link_check_and_continues() {
    let report = grade_fixture("no-stylesheet");

    assert_eq!(report.entries().len(), 6);
    assert_eq!(
        report.entries()[1].text(),
        "it should use the Bulma css library (unable to grade)"
    );
    assert_eq!(points(&report), vec![0.5, 0.0, 1.0, 1.0, 1.0, 0.0]);
    assert_eq!(report.total(), 3.5);
    assert!(report.stopped());
}

#[test]
fn wrong_body_layout_stops_grading() {
    let report = grade_fixture("broken-layout");

    assert_eq!(points(&report), vec![0.5, 0.5, 0.0]);
    assert_eq!(report.total(), 1.0);
    assert!(report.stopped());
}

#[test]
fn section_without_class_is_ungraded() {
    let report = grade_fixture("missing-classes");

    let texts: Vec<&str> = report.entries().iter().map(|e| e.text()).collect();
    assert_eq!(texts[3], "One section with class top and one with class bottom (unable to grade)");
    assert_eq!(points(&report), vec![0.5, 0.5, 1.0, 0.0, 1.0, 0.0]);
    assert_eq!(report.total(), 3.0);
}

/// A landing page with one card per button style, titled by `title`.
fn landing_page(title: impl Fn(usize, &str) -> String) -> String {
    let cards = bulma::BUTTON_STYLES
        .iter()
        .enumerate()
        .map(|(idx, style)| {
            let title = title(idx, style);
            format!(
                r#"<div class="column"><div class="card">
                     <header class="card-header"><p class="card-header-title">{title}</p></header>
                     <div class="card-content">text <button class="button is-{style}">b</button></div>
                   </div></div>"#
            )
        })
        .collect::<String>();
    format!(
        r#"<html><head><link href="bulma.css"></head><body>
             <header></header>
             <section class="top"><img src="cat.jpg"></section>
             <section class="bottom"><div class="columns">{cards}</div></section>
             <footer><a href="mailto:a@b.c">A</a></footer>
           </body></html>"#
    )
}

fn grade_source(source: &str) -> Report {
    let rubric = bulma::rubric().expect("build rubric");
    let mut page = BulmaPage::from_source(source);
    grade::run(&rubric, &mut page)
}

#[test]
fn titles_must_match_button_styles() {
    // Swap the first two titles so their buttons no longer match.
    let source = landing_page(|idx, style| {
        match idx {
            0 => "link",
            1 => "primary",
            _ => style,
        }
        .to_string()
    });

    let report = grade_source(&source);

    assert_eq!(points(&report), vec![0.5, 0.5, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 0.0, 1.0]);
    assert_eq!(report.total(), 9.0);
}

#[test]
fn titles_written_with_inline_markup_still_match() {
    let source = landing_page(|_, style| {
        let (first, rest) = style.split_at(1);
        format!("<strong>{}</strong>{rest}", first.to_uppercase())
    });

    let report = grade_source(&source);

    assert_eq!(report.entries()[9].points(), 1.0);
    assert_eq!(report.total(), 10.0);
}

#[test]
fn too_few_columns_stop_grading() {
    let report = grade_fixture("five-columns");

    assert_eq!(points(&report), vec![0.5, 0.5, 1.0, 1.0, 1.0, 0.0]);
    assert_eq!(report.entries()[5].text(), "The bottom section should contain 6 columns");
    assert_eq!(report.total(), 4.0);
    assert!(report.stopped());
}

#[test]
fn column_without_card_stops_grading() {
    let report = grade_fixture("column-without-card");

    assert_eq!(points(&report), vec![0.5, 0.5, 1.0, 1.0, 1.0, 1.0, 0.0]);
    assert_eq!(report.entries()[6].text(), "Each column should contain a card");
    assert_eq!(report.total(), 5.0);
    assert!(report.stopped());
}

#[test]
fn footer_anchor_without_href_is_ungraded() {
    let report = grade_fixture("anchor-without-href");

    assert_eq!(report.entries().len(), 11);
    assert!(report.entries()[10].text().ends_with(" (unable to grade)"));
    assert_eq!(report.entries()[10].points(), 0.0);
    assert_eq!(report.total(), 9.0);
    assert!(!report.stopped());
}
