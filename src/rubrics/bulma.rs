#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Rubric for the Bulma landing page assignment: a page with a header, a
//! "top" section holding a cat picture, a "bottom" section with six cards in
//! six columns (one per Bulma button style), and a footer with a mailto link.

use std::{
    collections::HashSet,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, anyhow};

use crate::{
    document::{DocumentError, HtmlDocument, NodeId, Selector, TreeQuery},
    grade::{Rubric, RubricError, Scorer, Step, StepFlow},
};

/// Bulma button styles, one expected per column.
pub const BUTTON_STYLES: [&str; 6] = ["primary", "link", "info", "success", "warning", "danger"];

/// Name of the rubric as shown in reports.
pub const RUBRIC_NAME: &str = "Bulma landing page";

/// Tag sequence the body must consist of.
const LAYOUT: [&str; 4] = ["header", "section", "section", "footer"];

/// State shared by the steps of the Bulma rubric.
///
/// Later steps read what earlier steps recorded; each step lists the fields
/// it needs.
#[derive(Debug)]
pub struct BulmaPage {
    /// Where the page was loaded from.
    path:     PathBuf,
    /// The parsed page, or why there is none.
    document: Result<HtmlDocument, DocumentError>,
    /// Element children of `<body>`, recorded by the layout step.
    sections: Vec<NodeId>,
    /// Column elements of the bottom section, recorded by the columns step.
    columns:  Vec<NodeId>,
    /// One card per column, recorded by the cards step.
    cards:    Vec<NodeId>,
}

impl BulmaPage {
    /// Wraps an already loaded (or failed) document.
    pub fn new(path: impl Into<PathBuf>, document: Result<HtmlDocument, DocumentError>) -> Self {
        Self {
            path: path.into(),
            document,
            sections: Vec::new(),
            columns: Vec::new(),
            cards: Vec::new(),
        }
    }

    /// Loads `file_name` from `folder`. Load failures are kept for the first
    /// step to report.
    pub fn load(folder: impl AsRef<Path>, file_name: &str) -> Self {
        let path = folder.as_ref().join(file_name);
        let document = HtmlDocument::load(&path);
        Self::new(path, document)
    }

    /// Parses `source` as if it were loaded from `index.html`.
    pub fn from_source(source: &str) -> Self {
        Self::new("index.html", HtmlDocument::parse(source))
    }

    /// Path of the graded file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The parsed document. Fails when loading failed.
    fn doc(&self) -> Result<&HtmlDocument> {
        self.document
            .as_ref()
            .map_err(|e| anyhow!("{} is not available: {e}", self.path.display()))
    }

    /// Child `idx` of `<body>`. Requires the layout step.
    fn section(&self, idx: usize) -> Result<NodeId> {
        self.sections
            .get(idx)
            .copied()
            .with_context(|| format!("Body child {idx} was not recorded"))
    }
}

/// Step 1: the file exists, parses, and has both `<head>` and `<body>`.
fn check_head_and_body(page: &mut BulmaPage, scorer: &mut Scorer<'_>) -> Result<StepFlow> {
    let passed = match &page.document {
        Err(DocumentError::NotFound(_)) => {
            scorer.comment("cannot find the file", 0.0);
            false
        }
        Err(_) => {
            scorer.comment("file cannot be read or parsed", 0.0);
            false
        }
        Ok(doc) => {
            doc.exists(doc.root(), &Selector::tag("head"))
                && doc.exists(doc.root(), &Selector::tag("body"))
        }
    };

    Ok(StepFlow::stop_unless(scorer.award_if(passed, 0.5)))
}

/// Step 2: the first `<link>` points at a Bulma stylesheet.
fn check_stylesheet(page: &mut BulmaPage, scorer: &mut Scorer<'_>) -> Result<StepFlow> {
    let doc = page.doc()?;
    let link = doc.require(doc.root(), &Selector::tag("link"))?;
    let href = doc.require_attr(link, "href")?.to_lowercase();
    let passed = href.contains("bulma") && href.ends_with(".css");

    Ok(StepFlow::stop_unless(scorer.award_if(passed, 0.5)))
}

/// Step 3: the body is a header, two sections and a footer, in that order.
/// Records `sections`.
fn check_layout(page: &mut BulmaPage, scorer: &mut Scorer<'_>) -> Result<StepFlow> {
    let doc = page.doc()?;
    let body = doc.require(doc.root(), &Selector::tag("body"))?;
    let children = doc.children(body);
    let passed = children.len() == LAYOUT.len()
        && children
            .iter()
            .zip(LAYOUT)
            .all(|(child, tag)| doc.tag(*child) == tag);

    page.sections = children;
    Ok(StepFlow::stop_unless(scorer.award_if(passed, 1.0)))
}

/// Step 4: the sections carry the classes `top` and `bottom`. Requires
/// `sections`.
fn check_section_classes(page: &mut BulmaPage, scorer: &mut Scorer<'_>) -> Result<StepFlow> {
    let doc = page.doc()?;
    let top = doc.require_attr(page.section(1)?, "class")?;
    let bottom = doc.require_attr(page.section(2)?, "class")?;
    let passed = top.split_whitespace().any(|c| c == "top")
        && bottom.split_whitespace().any(|c| c == "bottom");

    scorer.award_if(passed, 1.0);
    Ok(StepFlow::Continue)
}

/// Step 5: the top section holds an image. Requires `sections`.
fn check_top_image(page: &mut BulmaPage, scorer: &mut Scorer<'_>) -> Result<StepFlow> {
    let doc = page.doc()?;
    let passed = doc.exists(page.section(1)?, &Selector::tag("img"));

    scorer.award_if(passed, 1.0);
    Ok(StepFlow::Continue)
}

/// Step 6: the bottom section has a `div.columns` with six `.column`
/// children. Requires `sections`; records `columns`.
fn check_columns(page: &mut BulmaPage, scorer: &mut Scorer<'_>) -> Result<StepFlow> {
    let doc = page.doc()?;
    let columns = doc
        .find(page.section(2)?, &Selector::tag("div").class("columns"))
        .map(|c| doc.children(c))
        .unwrap_or_default();

    let mut passed = columns.len() == BUTTON_STYLES.len();
    if passed {
        for column in &columns {
            let classes = doc.require_attr(*column, "class")?;
            if !classes.split_whitespace().any(|c| c == "column") {
                passed = false;
                break;
            }
        }
    }

    page.columns = columns;
    Ok(StepFlow::stop_unless(scorer.award_if(passed, 1.0)))
}

/// Step 7: every column holds a `div.card`. Requires `columns`; records
/// `cards`.
fn check_cards(page: &mut BulmaPage, scorer: &mut Scorer<'_>) -> Result<StepFlow> {
    let doc = page.doc()?;
    let card = Selector::tag("div").class("card");
    let cards = page
        .columns
        .iter()
        .map(|column| doc.find(*column, &card))
        .collect::<Option<Vec<_>>>();

    let passed = cards.is_some();
    page.cards = cards.unwrap_or_default();
    Ok(StepFlow::stop_unless(scorer.award_if(passed, 1.0)))
}

/// Step 8: every card has a header and a content block. Requires `cards`.
fn check_card_parts(page: &mut BulmaPage, scorer: &mut Scorer<'_>) -> Result<StepFlow> {
    let doc = page.doc()?;
    let header = Selector::any().class("card-header");
    let content = Selector::any().class("card-content");
    let passed = page
        .cards
        .iter()
        .all(|card| doc.exists(*card, &header) && doc.exists(*card, &content));

    scorer.award_if(passed, 1.0);
    Ok(StepFlow::Continue)
}

/// Bulma style of the first `button` in `card`, if it is styled as one.
fn button_style(doc: &HtmlDocument, card: NodeId) -> Result<Option<&'static str>> {
    let Some(button) = doc.find(card, &Selector::tag("button")) else {
        return Ok(None);
    };
    let classes = doc
        .require_attr(button, "class")?
        .split_whitespace()
        .collect::<Vec<_>>();
    if !classes.contains(&"button") {
        return Ok(None);
    }

    Ok(BUTTON_STYLES
        .into_iter()
        .find(|style| classes.contains(&format!("is-{style}").as_str())))
}

/// Step 9: the six card buttons cover the six Bulma button styles. Requires
/// `cards`.
fn check_button_styles(page: &mut BulmaPage, scorer: &mut Scorer<'_>) -> Result<StepFlow> {
    let doc = page.doc()?;
    let mut styles = HashSet::new();
    for card in &page.cards {
        if let Some(style) = button_style(doc, *card)? {
            styles.insert(style);
        }
    }
    let passed = styles == HashSet::from(BUTTON_STYLES);

    scorer.award_if(passed, 1.0);
    Ok(StepFlow::Continue)
}

/// Step 10: each card title names the style of the card's button. Requires
/// `cards`.
fn check_card_titles(page: &mut BulmaPage, scorer: &mut Scorer<'_>) -> Result<StepFlow> {
    let doc = page.doc()?;
    let title = Selector::any().class("card-header-title");
    let mut remaining = BUTTON_STYLES.to_vec();
    let mut matched = 0;

    for card in &page.cards {
        let Some(node) = doc.find(*card, &title) else {
            continue;
        };
        let name = doc.text(node).trim().to_lowercase();
        if let Some(pos) = remaining.iter().position(|s| *s == name) {
            remaining.remove(pos);
            let button = Selector::tag("button").class(format!("is-{name}"));
            if doc.exists(*card, &button) {
                matched += 1;
            }
        }
    }

    scorer.award_if(matched == BUTTON_STYLES.len(), 1.0);
    Ok(StepFlow::Continue)
}

/// Step 11: the footer links to a `mailto:` address. Requires `sections`.
fn check_footer_link(page: &mut BulmaPage, scorer: &mut Scorer<'_>) -> Result<StepFlow> {
    let doc = page.doc()?;
    let mut passed = false;
    for link in doc.find_all(page.section(3)?, &Selector::tag("a")) {
        if doc.require_attr(link, "href")?.starts_with("mailto:") {
            passed = true;
            break;
        }
    }

    scorer.award_if(passed, 1.0);
    Ok(StepFlow::Continue)
}

/// Builds the Bulma landing page rubric.
pub fn rubric() -> Result<Rubric<BulmaPage>, RubricError> {
    Rubric::new(RUBRIC_NAME, [
        Step::builder()
            .order(1)
            .description("it should have a <head/> and a <body/>")
            .out_of(0.5)
            .body(check_head_and_body)
            .build(),
        Step::builder()
            .order(2)
            .description("it should use the Bulma css library")
            .out_of(0.5)
            .body(check_stylesheet)
            .build(),
        Step::builder()
            .order(3)
            .description("it should contain a <header/> a <footer/> and two <section/>s in between")
            .out_of(1.0)
            .body(check_layout)
            .build(),
        Step::builder()
            .order(4)
            .description("One section with class top and one with class bottom")
            .out_of(1.0)
            .body(check_section_classes)
            .build(),
        Step::builder()
            .order(5)
            .description(
                "The top section should contain an <img/> that fills the page horizontally and \
                 show the image of a cat",
            )
            .out_of(1.0)
            .body(check_top_image)
            .build(),
        Step::builder()
            .order(6)
            .description("The bottom section should contain 6 columns")
            .out_of(1.0)
            .body(check_columns)
            .build(),
        Step::builder()
            .order(7)
            .description("Each column should contain a card")
            .out_of(1.0)
            .body(check_cards)
            .build(),
        Step::builder()
            .order(8)
            .description("each card should have a header and content")
            .out_of(1.0)
            .body(check_card_parts)
            .build(),
        Step::builder()
            .order(9)
            .description(
                "each card content the cards be some text of your choice followed by a button. \
                 In total there should 6 buttons, one per column, one of each of the Bulma styles",
            )
            .out_of(1.0)
            .body(check_button_styles)
            .build(),
        Step::builder()
            .order(10)
            .description(
                "each card header should have title with the name of the style of the \
                 corresponding button.",
            )
            .out_of(1.0)
            .body(check_card_titles)
            .build(),
        Step::builder()
            .order(11)
            .description(
                "the footer contain a link that, on click, will open the user's default email app \
                 with To: field equal to your email address. The text of the link should be your \
                 name.",
            )
            .out_of(1.0)
            .body(check_footer_link)
            .build(),
    ])
}
