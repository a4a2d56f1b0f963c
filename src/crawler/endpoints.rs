//! URL construction for the list, detail and asset endpoints

use crate::config::{CrawlerConfig, DetailMode};
use url::Url;

/// Parsed endpoint bases plus the query parameter names they take
#[derive(Debug, Clone)]
pub struct Endpoints {
    list: Url,
    detail: Option<Url>,
    asset: Url,
    asset_token: String,
    page_param: String,
    id_param: String,
}

impl Endpoints {
    /// Parses the endpoint bases from the crawler configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Endpoints)` - All three bases parsed
    /// * `Err(url::ParseError)` - One of the bases is not an absolute URL
    pub fn new(config: &CrawlerConfig) -> Result<Self, url::ParseError> {
        Ok(Self {
            list: Url::parse(&config.list_url)?,
            detail: match config.detail_mode {
                DetailMode::None => None,
                _ => Some(Url::parse(&config.detail_url)?),
            },
            asset: Url::parse(&config.asset_url)?,
            asset_token: config.asset_token.clone(),
            page_param: config.page_param.clone(),
            id_param: config.id_param.clone(),
        })
    }

    /// `<list-url>?page=<page>`
    pub fn list_page(&self, page: u32) -> String {
        let mut url = self.list.clone();
        url.query_pairs_mut()
            .append_pair(&self.page_param, &page.to_string());
        url.into()
    }

    /// `<detail-url>?id=<id>`, or `None` when detail pages are disabled
    pub fn detail(&self, id: &str) -> Option<String> {
        let mut url = self.detail.clone()?;
        url.query_pairs_mut().append_pair(&self.id_param, id);
        Some(url.into())
    }

    /// `<asset-url>?id=<id>&token=<asset-token>`; the token is omitted when unset
    pub fn asset(&self, id: &str) -> String {
        let mut url = self.asset.clone();
        {
            let mut query = url.query_pairs_mut();
            query.append_pair(&self.id_param, id);
            if !self.asset_token.is_empty() {
                query.append_pair("token", &self.asset_token);
            }
        }
        url.into()
    }
}
