//! Extractor for the mobile used-car catalog layout
//!
//! List pages carry one anchor card per vehicle; detail pages carry a
//! label/value specification table, an option list and a photo gallery.

use crate::extract::{DetailRecord, Extractor, ListingRecord};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

const CARD_PATTERN: &str = concat!(
    r#"(?s)<a href="/\?m=sale&(?:amp;)?s=detail&(?:amp;)?seq=(\d+)".+?"#,
    r#"<img[^>]+src="([^"]+)"[^>]*>.+?"#,
    r#"<div class="cartitle">(.*?)</div>.+?"#,
    r#"<div class="carinfo">(.*?)</div>.+?"#,
    r#"<div><div class="money">(.*?)</div>"#,
);

const INFO_PATTERN: &str =
    r"(?i)(\d{4}).*?([\d,]+)\s*km.*?(Automatic|Manual|CVT|DCT|Stick|오토|수동)";

/// Specification labels and the detail field each one fills
const LABELS: &[(&str, DetailField)] = &[
    ("모델", DetailField::Model),
    ("차종", DetailField::Model),
    ("model", DetailField::Model),
    ("최초등록일", DetailField::RegistrationDate),
    ("등록일", DetailField::RegistrationDate),
    ("first registration", DetailField::RegistrationDate),
    ("registration date", DetailField::RegistrationDate),
    ("변속기", DetailField::Transmission),
    ("transmission", DetailField::Transmission),
    ("색상", DetailField::Color),
    ("color", DetailField::Color),
    ("연식", DetailField::Year),
    ("year", DetailField::Year),
    ("주행거리", DetailField::Mileage),
    ("mileage", DetailField::Mileage),
    ("연료", DetailField::Fuel),
    ("fuel", DetailField::Fuel),
    ("차량번호", DetailField::Plate),
    ("plate", DetailField::Plate),
    ("plate number", DetailField::Plate),
    ("사고유무", DetailField::Accident),
    ("사고이력", DetailField::Accident),
    ("accident history", DetailField::Accident),
];

#[derive(Debug, Clone, Copy)]
enum DetailField {
    Model,
    RegistrationDate,
    Transmission,
    Color,
    Year,
    Mileage,
    Fuel,
    Plate,
    Accident,
}

/// Regex/DOM extractor for the used-car catalog
pub struct SiteExtractor {
    card: Regex,
    info: Regex,
    digits: Regex,
}

impl SiteExtractor {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            card: Regex::new(CARD_PATTERN)?,
            info: Regex::new(INFO_PATTERN)?,
            digits: Regex::new(r"[\d,]+")?,
        })
    }

    fn parse_card(&self, caps: &regex::Captures<'_>) -> ListingRecord {
        let id = caps[1].to_string();
        let image_url = caps[2].to_string();
        let title = clean_html(&caps[3]);
        let summary = clean_html(&caps[4]);

        let (year, mileage, transmission) = self
            .info
            .captures(&summary.replace('ㆍ', " "))
            .map(|m| (m[1].to_string(), m[2].to_string(), m[3].to_string()))
            .unwrap_or_default();

        let price = self
            .digits
            .find(&caps[5])
            .map(|m| m.as_str().replace(',', ""))
            .unwrap_or_default();

        ListingRecord {
            id,
            title,
            summary,
            price,
            image_url,
            year,
            mileage,
            transmission,
        }
    }
}

impl Extractor for SiteExtractor {
    fn extract_listings(&self, content: &str) -> Vec<ListingRecord> {
        self.card
            .captures_iter(content)
            .map(|caps| self.parse_card(&caps))
            .collect()
    }

    fn extract_detail(&self, content: &str) -> Option<DetailRecord> {
        let document = Html::parse_document(content);
        let mut detail = DetailRecord::default();
        let mut matched = false;

        for (label, value) in spec_pairs(&document) {
            if let Some(field) = lookup_label(&label) {
                if !value.is_empty() {
                    set_field(&mut detail, field, value);
                    matched = true;
                }
            }
        }

        if detail.model.is_empty() {
            if let Some(name) = first_text(&document, ".car-name, h1.title") {
                detail.model = name;
            }
        }

        if let Ok(selector) = Selector::parse("ul.options li, .option-list li") {
            detail.features = document
                .select(&selector)
                .map(element_text)
                .filter(|s| !s.is_empty())
                .collect();
        }

        if let Ok(selector) = Selector::parse(".gallery img, .photo-list img") {
            for img in document.select(&selector) {
                let src = img
                    .value()
                    .attr("data-src")
                    .or_else(|| img.value().attr("src"))
                    .map(str::trim)
                    .unwrap_or("");
                if !src.is_empty() && !detail.image_urls.iter().any(|u| u == src) {
                    detail.image_urls.push(src.to_string());
                }
            }
        }

        if !matched && detail.features.is_empty() && detail.image_urls.is_empty() {
            return None;
        }

        Some(detail)
    }
}

/// Collects label/value pairs from `th`/`td` rows and `dt`/`dd` lists
fn spec_pairs(document: &Html) -> Vec<(String, String)> {
    let mut pairs = Vec::new();

    if let (Ok(row), Ok(th), Ok(td)) = (
        Selector::parse("tr"),
        Selector::parse("th"),
        Selector::parse("td"),
    ) {
        for tr in document.select(&row) {
            let labels = tr.select(&th).map(element_text);
            let values = tr.select(&td).map(element_text);
            pairs.extend(labels.zip(values));
        }
    }

    if let Ok(dl) = Selector::parse("dl") {
        for list in document.select(&dl) {
            let mut label: Option<String> = None;
            for child in list.children().filter_map(ElementRef::wrap) {
                match child.value().name() {
                    "dt" => label = Some(element_text(child)),
                    "dd" => {
                        if let Some(l) = label.take() {
                            pairs.push((l, element_text(child)));
                        }
                    }
                    _ => {}
                }
            }
        }
    }

    pairs
}

fn lookup_label(label: &str) -> Option<DetailField> {
    let label = label.trim().trim_end_matches(':').trim().to_lowercase();
    LABELS
        .iter()
        .find(|(key, _)| *key == label)
        .map(|(_, field)| *field)
}

fn set_field(detail: &mut DetailRecord, field: DetailField, value: String) {
    let slot = match field {
        DetailField::Model => &mut detail.model,
        DetailField::RegistrationDate => &mut detail.registration_date,
        DetailField::Transmission => &mut detail.transmission,
        DetailField::Color => &mut detail.color,
        DetailField::Year => &mut detail.year,
        DetailField::Mileage => &mut detail.mileage,
        DetailField::Fuel => &mut detail.fuel,
        DetailField::Plate => &mut detail.identifier_plate,
        DetailField::Accident => &mut detail.accident_history,
    };
    if slot.is_empty() {
        *slot = value;
    }
}

fn first_text(document: &Html, selector: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;
    document
        .select(&selector)
        .map(element_text)
        .find(|s| !s.is_empty())
}

fn element_text(element: ElementRef<'_>) -> String {
    collapse_whitespace(&element.text().collect::<String>())
}

/// Strips tags and entities from a markup fragment and collapses whitespace
pub fn clean_html(fragment: &str) -> String {
    let parsed = Html::parse_fragment(fragment);
    collapse_whitespace(&parsed.root_element().text().collect::<String>())
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
