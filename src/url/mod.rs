//! URL handling module for Farmstats
//!
//! This module builds the three kinds of URL the pipeline fetches: farm pages,
//! listing pages, and the recents feed, all relative to one configured site.

use crate::config::SourceConfig;
use crate::farm_id::FarmId;
use crate::{UrlError, UrlResult};
use url::Url;

/// Sort order requested from the listing
pub const LISTING_SORT: &str = "recent";

/// URL builder for the configured source site
#[derive(Debug, Clone)]
pub struct SourceEndpoints {
    base: Url,
    listing_path: String,
    recents_path: String,
}

impl SourceEndpoints {
    /// Creates endpoints from the source configuration
    ///
    /// # Errors
    ///
    /// * `UrlError::Parse` - base URL does not parse
    /// * `UrlError::InvalidScheme` - base URL is not http or https
    /// * `UrlError::CannotBeABase` - base URL cannot have path segments
    ///
    /// # Examples
    ///
    /// ```
    /// use farmstats::config::SourceConfig;
    /// use farmstats::url::SourceEndpoints;
    /// use farmstats::FarmId;
    ///
    /// let source = SourceConfig {
    ///     base_url: "https://upload.farm".to_string(),
    ///     listing_path: "all".to_string(),
    ///     recents_path: "_mini_recents".to_string(),
    ///     required_prefix: '1',
    /// };
    /// let endpoints = SourceEndpoints::new(&source).unwrap();
    /// assert_eq!(
    ///     endpoints.farm_url(&FarmId::new("1H0thB")).as_str(),
    ///     "https://upload.farm/1H0thB"
    /// );
    /// ```
    pub fn new(source: &SourceConfig) -> UrlResult<Self> {
        let base = Url::parse(&source.base_url)
            .map_err(|e| UrlError::Parse(format!("{}: {}", source.base_url, e)))?;

        if base.scheme() != "http" && base.scheme() != "https" {
            return Err(UrlError::InvalidScheme(base.scheme().to_string()));
        }

        if base.cannot_be_a_base() {
            return Err(UrlError::CannotBeABase(source.base_url.clone()));
        }

        Ok(Self {
            base,
            listing_path: source.listing_path.clone(),
            recents_path: source.recents_path.clone(),
        })
    }

    /// URL of the page for one farm
    ///
    /// The id always lands in a single path segment.
    pub fn farm_url(&self, farm_id: &FarmId) -> Url {
        let mut url = self.with_path("");
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(farm_id.as_str());
        }
        url
    }

    /// URL of one listing page, most recent farms first
    pub fn listing_url(&self, page: u32) -> Url {
        let mut url = self.with_path(&self.listing_path);
        url.query_pairs_mut()
            .append_pair("sort", LISTING_SORT)
            .append_pair("p", &page.to_string());
        url
    }

    /// URL of the recents JSON feed
    pub fn recents_url(&self) -> Url {
        self.with_path(&self.recents_path)
    }

    /// Appends `path` to the base URL, one segment per `/`-separated part
    fn with_path(&self, path: &str) -> Url {
        let mut url = self.base.clone();
        url.set_query(None);
        url.set_fragment(None);
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(path.split('/').filter(|s| !s.is_empty()));
        }
        url
    }
}
