//! Record types produced by extraction and written to storage

/// Column order of the persisted record store
pub const RECORD_COLUMNS: [&str; 16] = [
    "id",
    "url",
    "title",
    "info",
    "price",
    "model",
    "registration_date",
    "transmission",
    "color",
    "manufacturer_year",
    "mileage",
    "fuel",
    "identifier_plate",
    "accident_history",
    "features",
    "image_urls",
];

/// Summary of one catalog item, parsed from a list page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingRecord {
    /// Natural key used for deduplication
    pub id: String,
    pub title: String,
    /// Free-form summary line (year, mileage, transmission, ...)
    pub summary: String,
    /// Price with separators removed
    pub price: String,
    pub image_url: String,

    // Parsed out of `summary` when the layout allows it
    pub year: String,
    pub mileage: String,
    pub transmission: String,
}

/// Full attribute set of one catalog item, parsed from its detail page
///
/// Fields the page does not carry are left empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetailRecord {
    pub model: String,
    pub registration_date: String,
    pub transmission: String,
    pub color: String,
    pub year: String,
    pub mileage: String,
    pub fuel: String,
    pub identifier_plate: String,
    pub accident_history: String,
    pub features: Vec<String>,
    pub image_urls: Vec<String>,
}

/// A listing merged with its (optional) detail record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichedRecord {
    pub listing: ListingRecord,
    pub detail: Option<DetailRecord>,
    /// Derived asset URL for this item
    pub url: String,
}

impl EnrichedRecord {
    pub fn new(listing: ListingRecord, detail: Option<DetailRecord>, url: String) -> Self {
        Self {
            listing,
            detail,
            url,
        }
    }

    pub fn id(&self) -> &str {
        &self.listing.id
    }

    /// Flattens the record into the persisted column order
    ///
    /// Detail values take precedence; listing-derived values fill the gaps.
    pub fn to_row(&self) -> Vec<String> {
        let listing = &self.listing;
        let empty = DetailRecord::default();
        let detail = self.detail.as_ref().unwrap_or(&empty);

        let image_urls = if detail.image_urls.is_empty() && !listing.image_url.is_empty() {
            listing.image_url.clone()
        } else {
            detail.image_urls.join(",")
        };

        vec![
            listing.id.clone(),
            self.url.clone(),
            listing.title.clone(),
            listing.summary.clone(),
            listing.price.clone(),
            detail.model.clone(),
            detail.registration_date.clone(),
            prefer(&detail.transmission, &listing.transmission),
            detail.color.clone(),
            prefer(&detail.year, &listing.year),
            prefer(&detail.mileage, &listing.mileage),
            detail.fuel.clone(),
            detail.identifier_plate.clone(),
            detail.accident_history.clone(),
            detail.features.join(","),
            image_urls,
        ]
    }
}

fn prefer(primary: &str, fallback: &str) -> String {
    if primary.is_empty() {
        fallback.to_string()
    } else {
        primary.to_string()
    }
}
