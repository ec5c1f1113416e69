//! Catalog listing parser
//!
//! This module extracts from one catalog page:
//! - The book detail-page links, in catalog order
//! - The link to the next catalog page, when one exists

use crate::ParseError;
use scraper::{Html, Selector};
use url::Url;

/// Book entry marker on a catalog page
const BOOK_ENTRY: &str = ".d_book";

/// Detail link inside a book entry
const ENTRY_LINK: &str = "a[href]";

/// Next-page link: the pager entry right after the current-page marker
const NEXT_PAGE: &str = ".npage_select + .npage";

/// One parsed catalog page
#[derive(Debug, Clone)]
pub struct BookListing {
    /// Detail-page URLs in catalog order
    pub book_urls: Vec<Url>,

    /// The next catalog page; absent on the last page
    pub next_page: Option<Url>,
}

pub(crate) fn selector(css: &'static str) -> Result<Selector, ParseError> {
    Selector::parse(css).map_err(|_| ParseError::Selector(css))
}

pub(crate) fn resolve(base_url: &Url, href: &str) -> Result<Url, ParseError> {
    base_url.join(href).map_err(|source| ParseError::InvalidLink {
        href: href.to_string(),
        source,
    })
}

/// Extracts the book listing from a catalog page
///
/// Relative links are resolved against `base_url`. A page without any
/// book entries yields an empty listing rather than an error; a book
/// entry that lacks its link is a `ParseError`, since the page structure
/// can no longer be trusted. A missing next-page marker means the
/// catalog's last page was reached.
///
/// # Arguments
///
/// * `html` - The catalog page markup
/// * `base_url` - The URL the page was fetched from
///
/// # Returns
///
/// * `Ok(BookListing)` - Detail links and the optional next page
/// * `Err(ParseError)` - A book entry is missing its link
pub fn extract_listing(html: &str, base_url: &Url) -> Result<BookListing, ParseError> {
    let document = Html::parse_document(html);

    let entry_selector = selector(BOOK_ENTRY)?;
    let link_selector = selector(ENTRY_LINK)?;
    let next_selector = selector(NEXT_PAGE)?;

    let mut book_urls = Vec::new();
    for entry in document.select(&entry_selector) {
        let href = entry
            .select(&link_selector)
            .next()
            .and_then(|a| a.value().attr("href"))
            .ok_or(ParseError::MissingMarker("book entry link"))?;

        book_urls.push(resolve(base_url, href)?);
    }

    let next_page = match document.select(&next_selector).next() {
        Some(element) => match element.value().attr("href") {
            Some(href) => Some(resolve(base_url, href)?),
            None => None,
        },
        None => None,
    };

    Ok(BookListing {
        book_urls,
        next_page,
    })
}
