//! Rule-based validator engine: the QA quality checklist.
//!
//! Each check is a pure function `(document, policy) -> findings` registered
//! in a fixed ordered list, grouped by category. A finding is either an
//! issue (hard failure, forces `FAIL`) or a note (advisory, at most
//! `PASS WITH NOTES`). Evaluation is deterministic: the same document text
//! always yields the same verdict.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::verdict::{DocumentStats, Verdict};

/// Filler phrases that must never appear in a report. Case-insensitive
/// substring match; each hit is a hard failure.
pub const FILLER_PHRASES: &[&str] = &[
    "it's worth noting",
    "it is worth noting",
    "interestingly",
    "furthermore",
    "additionally",
    "in conclusion",
    "in this section",
    "we will discuss",
    "it can be observed",
    "it should be noted",
    "needless to say",
    "as we can see",
    "it goes without saying",
    "in today's world",
    "at the end of the day",
    "moving forward",
    "paradigm shift",
    "leverage synergies",
    "deep dive",
    "unpack",
    "holistic approach",
    "game-changer",
    "cutting-edge",
    "it's important to note",
    "as mentioned earlier",
    "in summary",
];

/// Serif font tokens accepted as a body font.
const SERIF_FONTS: &[&str] = &["garamond", "georgia", "baskerville", "crimson", "times"];

/// Sans-serif tokens banned in a font-family context.
const BANNED_FONTS: &[&str] = &["inter", "roboto", "arial", "helvetica", "calibri", "system-ui"];

static HEX_COLOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#[0-9a-fA-F]{6}").expect("hex color regex"));
static CLASS_ATTR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"class="([^"]+)""#).expect("class attr regex"));
static BANNED_FONT_FAMILY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"font-family[^;}]*?\b(inter|roboto|arial|helvetica|calibri|system-ui)\b")
        .expect("font family regex")
});
static NEON_COLOR_RES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [r"#[0-9a-f]{4}ff", r"#ff[0-9a-f]{4}"]
        .into_iter()
        .map(|pattern| Regex::new(pattern).expect("neon color regex"))
        .collect()
});

/// Policy constants for the checklist thresholds.
///
/// The defaults are the curated values the checklist was written against;
/// they are configuration (see `io::config`), not law.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct QaPolicy {
    /// Soft ceiling on distinct significant hex colors.
    pub max_palette_colors: usize,
    /// Minimum distinct CSS class names before the design looks generic.
    pub min_css_classes: usize,
    /// Minimum `<img` tags (hard requirement).
    pub min_images: usize,
    /// Minimum `<figcaption` tags (advisory).
    pub min_captions: usize,
    /// Soft ceiling on average list items per list group.
    pub max_items_per_list: usize,
}

impl Default for QaPolicy {
    fn default() -> Self {
        Self {
            max_palette_colors: 15,
            min_css_classes: 15,
            min_images: 5,
            min_captions: 5,
            max_items_per_list: 7,
        }
    }
}

/// Parsed document text with the lowercase view precomputed.
#[derive(Debug, Clone)]
pub struct Document {
    text: String,
    lower: String,
}

impl Document {
    pub fn parse(text: impl Into<String>) -> Self {
        let text = text.into();
        let lower = text.to_lowercase();
        Self { text, lower }
    }

    fn count(&self, token: &str) -> usize {
        self.text.matches(token).count()
    }

    fn class_names(&self) -> BTreeSet<&str> {
        CLASS_ATTR_RE
            .captures_iter(&self.text)
            .flat_map(|cap| {
                cap.get(1)
                    .map(|m| m.as_str().split_whitespace())
                    .into_iter()
                    .flatten()
            })
            .collect()
    }

    /// Distinct 6-digit hex literals, excluding pure white and black.
    fn significant_colors(&self) -> BTreeSet<String> {
        HEX_COLOR_RE
            .find_iter(&self.text)
            .map(|m| m.as_str().to_lowercase())
            .filter(|c| c != "#ffffff" && c != "#000000")
            .collect()
    }

    pub fn stats(&self) -> DocumentStats {
        DocumentStats {
            images: self.count("<img"),
            figure_captions: self.count("<figcaption"),
            list_groups: self.count("<ul") + self.count("<ol"),
            list_items: self.count("<li"),
            h2_sections: self.count("<h2"),
            h3_subsections: self.count("<h3"),
            css_classes: self.class_names().len(),
        }
    }
}

/// A single rule outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Finding {
    Issue(String),
    Note(String),
}

type Rule = fn(&Document, &QaPolicy) -> Vec<Finding>;

/// The checklist: fixed evaluation order, grouped by category.
const RULES: &[(&str, Rule)] = &[
    ("typography", serif_body_font),
    ("typography", banned_fonts),
    ("typography", font_loading),
    ("layout", page_rules),
    ("layout", page_break_controls),
    ("layout", widow_orphan_controls),
    ("layout", print_color_adjust),
    ("color", palette_size),
    ("color", neon_colors),
    ("content", filler_phrases),
    ("content", list_density),
    ("content", heading_mix),
    ("structure", cover_page),
    ("structure", image_minimum),
    ("structure", caption_minimum),
    ("structure", comparison_table),
    ("structure", class_variety),
];

/// Evaluate the full checklist against a document.
pub fn evaluate(doc: &Document, policy: &QaPolicy) -> Verdict {
    let mut issues = Vec::new();
    let mut notes = Vec::new();
    for (_category, rule) in RULES {
        for finding in rule(doc, policy) {
            match finding {
                Finding::Issue(msg) => issues.push(msg),
                Finding::Note(msg) => notes.push(msg),
            }
        }
    }
    Verdict::from_findings(issues, notes, doc.stats())
}

fn issue(msg: impl Into<String>) -> Vec<Finding> {
    vec![Finding::Issue(msg.into())]
}

fn note(msg: impl Into<String>) -> Vec<Finding> {
    vec![Finding::Note(msg.into())]
}

fn serif_body_font(doc: &Document, _policy: &QaPolicy) -> Vec<Finding> {
    if SERIF_FONTS.iter().any(|f| doc.lower.contains(f)) {
        return Vec::new();
    }
    issue(
        "TYPOGRAPHY: No serif body font detected. \
         Body must use serif (Georgia, Garamond, Libre Baskerville, etc.)",
    )
}

fn banned_fonts(doc: &Document, _policy: &QaPolicy) -> Vec<Finding> {
    let in_family: BTreeSet<&str> = BANNED_FONT_FAMILY_RE
        .captures_iter(&doc.lower)
        .filter_map(|cap| cap.get(1).map(|m| m.as_str()))
        .collect();
    BANNED_FONTS
        .iter()
        .filter(|font| in_family.contains(**font) || doc.lower.contains(&format!("'{font}'")))
        .map(|font| Finding::Issue(format!("TYPOGRAPHY: Banned font detected: {font}")))
        .collect()
}

fn font_loading(doc: &Document, _policy: &QaPolicy) -> Vec<Finding> {
    if doc.text.contains("fonts.googleapis.com") {
        return Vec::new();
    }
    note("TYPOGRAPHY: No Google Fonts link found. Ensure fonts are available locally or embedded.")
}

fn page_rules(doc: &Document, _policy: &QaPolicy) -> Vec<Finding> {
    if doc.text.contains("@page") {
        return Vec::new();
    }
    issue("LAYOUT: Missing @page CSS rules for print formatting")
}

fn page_break_controls(doc: &Document, _policy: &QaPolicy) -> Vec<Finding> {
    if doc.text.contains("page-break") || doc.text.contains("break-") {
        return Vec::new();
    }
    issue("LAYOUT: Missing page-break controls")
}

fn widow_orphan_controls(doc: &Document, _policy: &QaPolicy) -> Vec<Finding> {
    if doc.text.contains("orphans") && doc.text.contains("widows") {
        return Vec::new();
    }
    issue("LAYOUT: Missing orphans/widows control on paragraphs")
}

fn print_color_adjust(doc: &Document, _policy: &QaPolicy) -> Vec<Finding> {
    if doc.text.contains("print-color-adjust") {
        return Vec::new();
    }
    note("LAYOUT: Missing print-color-adjust: exact (backgrounds may not print)")
}

fn palette_size(doc: &Document, policy: &QaPolicy) -> Vec<Finding> {
    let significant = doc.significant_colors().len();
    if significant <= policy.max_palette_colors {
        return Vec::new();
    }
    note(format!(
        "COLOR: {significant} distinct hex colors found. Verify palette stays within 3-color limit."
    ))
}

fn neon_colors(doc: &Document, _policy: &QaPolicy) -> Vec<Finding> {
    NEON_COLOR_RES
        .iter()
        .filter(|re| re.is_match(&doc.lower))
        .map(|_| {
            Finding::Note(
                "COLOR: Potentially bright/neon color detected. Verify it's intentional."
                    .to_string(),
            )
        })
        .collect()
}

fn filler_phrases(doc: &Document, _policy: &QaPolicy) -> Vec<Finding> {
    FILLER_PHRASES
        .iter()
        .filter(|phrase| doc.lower.contains(**phrase))
        .map(|phrase| Finding::Issue(format!("CONTENT: AI filler phrase detected: \"{phrase}\"")))
        .collect()
}

fn list_density(doc: &Document, policy: &QaPolicy) -> Vec<Finding> {
    let groups = doc.count("<ul") + doc.count("<ol");
    if groups == 0 {
        return Vec::new();
    }
    let average = doc.count("<li") as f64 / groups as f64;
    if average <= policy.max_items_per_list as f64 {
        return Vec::new();
    }
    note(format!(
        "CONTENT: Average {average:.1} items per list. Max recommended is 5."
    ))
}

fn heading_mix(doc: &Document, _policy: &QaPolicy) -> Vec<Finding> {
    let h2 = doc.count("<h2");
    let h3 = doc.count("<h3");
    if h2 == 0 || h3 == 0 {
        return Vec::new();
    }
    note(format!(
        "CONTENT: {h2} H2 sections, {h3} H3 subsections. Verify structural variety."
    ))
}

fn cover_page(doc: &Document, _policy: &QaPolicy) -> Vec<Finding> {
    if doc.lower.contains("cover") {
        return Vec::new();
    }
    issue("STRUCTURE: No cover page detected")
}

fn image_minimum(doc: &Document, policy: &QaPolicy) -> Vec<Finding> {
    let images = doc.count("<img");
    if images >= policy.min_images {
        return Vec::new();
    }
    issue(format!(
        "STRUCTURE: Only {images} images found. Expected {}+ (billboard variants + logo)",
        policy.min_images
    ))
}

fn caption_minimum(doc: &Document, policy: &QaPolicy) -> Vec<Finding> {
    let captions = doc.count("<figcaption");
    if captions >= policy.min_captions {
        return Vec::new();
    }
    note(format!(
        "STRUCTURE: {captions} figure captions found. Expected {} (one per variant).",
        policy.min_captions
    ))
}

fn comparison_table(doc: &Document, _policy: &QaPolicy) -> Vec<Finding> {
    if doc.text.contains("<table") {
        return Vec::new();
    }
    note("STRUCTURE: No comparison table found. Expected comparative matrix.")
}

fn class_variety(doc: &Document, policy: &QaPolicy) -> Vec<Finding> {
    if doc.class_names().len() >= policy.min_css_classes {
        return Vec::new();
    }
    note("DESIGN: Limited CSS class variety. May look generic.")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::verdict::Status;

    /// A document that clears every check in the list.
    fn clean_html() -> String {
        let figures: String = (0..5)
            .map(|i| {
                format!(
                    "<figure><img src=\"assets/billboard-{i}.png\">\
                     <figcaption>Billboard variant {i}</figcaption></figure>"
                )
            })
            .collect();
        let blocks: String = (0..16)
            .map(|i| format!("<div class=\"panel-{i}\">Panel {i}</div>"))
            .collect();
        format!(
            "<html><head>\
             <link href=\"https://fonts.googleapis.com/css2?family=Libre+Baskerville\" \
             rel=\"stylesheet\">\
             <style>@page {{ size: letter; margin: 0; }} \
             body {{ font-family: 'Libre Baskerville', Georgia, serif; color: #1a2b3c; }} \
             p {{ orphans: 3; widows: 3; print-color-adjust: exact; }} \
             .section {{ page-break-inside: avoid; }}</style></head>\
             <body><div class=\"cover\">The Annual Review</div>\
             {figures}{blocks}\
             <table><tr><td>Criteria</td><td>Result</td></tr></table>\
             </body></html>"
        )
    }

    #[test]
    fn clean_document_passes() {
        let doc = Document::parse(clean_html());
        let verdict = evaluate(&doc, &QaPolicy::default());
        assert_eq!(verdict.issues, Vec::<String>::new());
        assert_eq!(verdict.notes, Vec::<String>::new());
        assert_eq!(verdict.status, Status::Pass);
    }

    #[test]
    fn evaluation_is_idempotent() {
        let doc = Document::parse(clean_html());
        let first = evaluate(&doc, &QaPolicy::default());
        let second = evaluate(&doc, &QaPolicy::default());
        assert_eq!(first, second);
    }

    /// No @page, no serif token, and a filler phrase: exactly the layout,
    /// typography, and content failures, with stats reflecting real counts.
    #[test]
    fn missing_page_rules_serif_and_filler_yield_three_issues() {
        let html = "<html><head><style>\
             body { font-family: 'Quicksand'; } \
             p { orphans: 3; widows: 3; } \
             .section { page-break-inside: avoid; }</style></head>\
             <body><div class=\"cover\">Cover</div>\
             <p>Time for a deep dive into the numbers.</p>\
             <img a><img b><img c><img d><img e>\
             </body></html>";
        let doc = Document::parse(html);
        let verdict = evaluate(&doc, &QaPolicy::default());

        assert_eq!(verdict.status, Status::Fail);
        assert_eq!(verdict.issues.len(), 3);
        assert!(verdict.issues.iter().any(|i| i.starts_with("LAYOUT:")));
        assert!(verdict.issues.iter().any(|i| i.starts_with("TYPOGRAPHY:")));
        assert!(verdict.issues.iter().any(|i| i.contains("\"deep dive\"")));
        assert_eq!(verdict.stats.images, 5);
    }

    /// Hard-fail thresholds are strict: an otherwise clean document with
    /// three images still fails the five-image minimum.
    #[test]
    fn image_minimum_is_strict() {
        let html = clean_html().replacen(
            "<figure><img src=\"assets/billboard-0.png\">\
             <figcaption>Billboard variant 0</figcaption></figure>\
             <figure><img src=\"assets/billboard-1.png\">\
             <figcaption>Billboard variant 1</figcaption></figure>",
            "",
            1,
        );
        let doc = Document::parse(html);
        assert_eq!(doc.stats().images, 3);

        let verdict = evaluate(&doc, &QaPolicy::default());
        assert_eq!(verdict.status, Status::Fail);
        assert_eq!(verdict.issues.len(), 1);
        assert!(verdict.issues[0].contains("Only 3 images found"));
    }

    #[test]
    fn filler_phrase_forces_fail_and_names_the_phrase() {
        for phrase in ["deep dive", "Paradigm Shift", "in conclusion"] {
            let html = format!("{} <p>Let us {phrase} here.</p>", clean_html());
            let doc = Document::parse(html);
            let verdict = evaluate(&doc, &QaPolicy::default());
            assert_eq!(verdict.status, Status::Fail);
            assert!(
                verdict
                    .issues
                    .iter()
                    .any(|i| i.contains(&phrase.to_lowercase())),
                "expected issue naming {phrase:?}, got {:?}",
                verdict.issues
            );
        }
    }

    #[test]
    fn banned_font_in_family_context_is_flagged() {
        let html = clean_html().replace(
            "font-family: 'Libre Baskerville', Georgia, serif",
            "font-family: Roboto, Georgia, serif",
        );
        let doc = Document::parse(html);
        let verdict = evaluate(&doc, &QaPolicy::default());
        assert!(
            verdict
                .issues
                .iter()
                .any(|i| i.contains("Banned font detected: roboto"))
        );
    }

    #[test]
    fn excess_palette_is_a_note_not_an_issue() {
        let colors: String = (0..18)
            .map(|i| format!("<i style=\"color: #0a0b{i:02}\"></i>"))
            .collect();
        let html = format!("{}{colors}", clean_html());
        let doc = Document::parse(html);
        let verdict = evaluate(&doc, &QaPolicy::default());
        assert_eq!(verdict.status, Status::PassWithNotes);
        assert!(verdict.notes.iter().any(|n| n.starts_with("COLOR:")));
    }

    #[test]
    fn white_and_black_are_not_significant_colors() {
        let html = format!(
            "{}<i style=\"color: #ffffff; background: #000000\"></i>",
            clean_html()
        );
        let doc = Document::parse(html);
        assert_eq!(doc.significant_colors().len(), 1); // only #1a2b3c
    }

    #[test]
    fn class_names_are_split_not_counted_per_attribute() {
        let doc = Document::parse("<div class=\"a b c\"></div><div class=\"a d\"></div>");
        assert_eq!(doc.class_names().len(), 4);
    }

    #[test]
    fn long_bullet_lists_are_noted() {
        let items = "<li>x</li>".repeat(16);
        let html = format!("{}<ul>{items}</ul><ol></ol>", clean_html());
        let doc = Document::parse(html);
        let verdict = evaluate(&doc, &QaPolicy::default());
        assert!(
            verdict
                .notes
                .iter()
                .any(|n| n.contains("items per list")),
            "notes: {:?}",
            verdict.notes
        );
        assert_eq!(verdict.status, Status::PassWithNotes);
    }
}
