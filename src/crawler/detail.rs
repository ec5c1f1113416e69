//! Book detail-page parser
//!
//! This module turns one detail page's markup into a [`BookRecord`]:
//! - Title and author from the page heading
//! - Reader comments and genre names (tolerant of zero matches)
//! - Cover image and text-download links, resolved absolute
//! - Deterministic destination paths for both assets

use crate::crawler::listing::{resolve, selector};
use crate::download::sanitize_filename;
use crate::ParseError;
use scraper::Html;
use serde::{Deserialize, Serialize};
use url::Url;

/// Title/author heading marker
const HEADING: &str = "h1";

/// Separator between title and author inside the heading
const HEADING_SEPARATOR: &str = "::";

/// Reader comment texts
const COMMENT_TEXT: &str = ".texts .black";

/// Info block that carries the genre links
const GENRE_BLOCK: &str = ".d_book";

/// Label that identifies the genre block among the info blocks
const GENRE_LABEL: &str = "Жанр книги:";

/// Cover image inside its frame
const COVER_IMAGE: &str = ".bookimage img";

/// Anchor text of the plain-text download link, as the catalog renders it
const TEXT_LINK_LABEL: &str = "скачать txt";

/// Fixed destination root for book texts
pub(crate) const BOOKS_ROOT: &str = "books";

/// Fixed destination root for cover images
pub(crate) const IMAGES_ROOT: &str = "images";

/// Structured metadata for one harvested book
///
/// Field order matches the serialized dataset. `book_path` and `img_path`
/// are relative to the destination root and always live under the fixed
/// `books/` and `images/` roots; both are sanitized for the filesystem at
/// derivation time, so they name the files actually written. `book_src`
/// and `img_src` are absolute URLs resolved against the detail page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookRecord {
    pub title: String,
    pub author: String,
    pub book_path: String,
    pub book_src: String,
    pub comments: Vec<String>,
    pub genres: Vec<String>,
    pub img_path: String,
    pub img_src: String,
}

impl BookRecord {
    /// Filename component of `book_path`
    pub fn book_filename(&self) -> &str {
        self.book_path.rsplit('/').next().unwrap_or(&self.book_path)
    }

    /// Filename component of `img_path`
    pub fn img_filename(&self) -> &str {
        self.img_path.rsplit('/').next().unwrap_or(&self.img_path)
    }
}

/// Parses a book detail page into a [`BookRecord`]
///
/// The heading, the cover image, and the text-download anchor are
/// required structural markers; each absence is a `ParseError`. A book
/// without a text source cannot be downloaded, so a missing download
/// anchor fails the whole record rather than just that field. Comments
/// and genres tolerate zero matches.
///
/// # Arguments
///
/// * `html` - The detail page markup
/// * `page_url` - The URL the page was fetched from, for link resolution
///
/// # Returns
///
/// * `Ok(BookRecord)` - The extracted record
/// * `Err(ParseError)` - A required marker is missing or malformed
pub fn parse_book_page(html: &str, page_url: &Url) -> Result<BookRecord, ParseError> {
    let document = Html::parse_document(html);

    let (title, author) = extract_heading(&document)?;
    let comments = extract_comments(&document)?;
    let genres = extract_genres(&document)?;
    let img_src = extract_cover(&document, page_url)?;
    let book_src = extract_text_link(&document, page_url)?;

    let book_path = format!("{}/{}.txt", BOOKS_ROOT, sanitize_filename(&title));
    let img_path = format!("{}/{}", IMAGES_ROOT, cover_filename(&img_src)?);

    Ok(BookRecord {
        title,
        author,
        book_path,
        book_src: book_src.to_string(),
        comments,
        genres,
        img_path,
        img_src: img_src.to_string(),
    })
}

/// Splits the page heading into trimmed title and author
///
/// The heading reads `Title :: Author`; exactly one separator is
/// required, and both halves must be non-empty after trimming.
fn extract_heading(document: &Html) -> Result<(String, String), ParseError> {
    let heading_selector = selector(HEADING)?;

    let heading = document
        .select(&heading_selector)
        .next()
        .ok_or(ParseError::MissingMarker("title/author heading"))?
        .text()
        .collect::<String>();

    let parts: Vec<&str> = heading.split(HEADING_SEPARATOR).collect();
    let (title, author) = match parts.as_slice() {
        [title, author] => (title.trim(), author.trim()),
        _ => {
            return Err(ParseError::MalformedHeading {
                heading: heading.trim().to_string(),
            })
        }
    };

    if title.is_empty() || author.is_empty() {
        return Err(ParseError::MalformedHeading {
            heading: heading.trim().to_string(),
        });
    }

    Ok((title.to_string(), author.to_string()))
}

/// Collects reader comment texts, in page order
fn extract_comments(document: &Html) -> Result<Vec<String>, ParseError> {
    let comment_selector = selector(COMMENT_TEXT)?;

    Ok(document
        .select(&comment_selector)
        .map(|element| element.text().collect::<String>())
        .collect())
}

/// Collects genre names from the labeled info block
///
/// Detail pages reuse the info-block class for several sections; the
/// genre section is the one carrying the genre label. No such section
/// means no genres, not a broken page.
fn extract_genres(document: &Html) -> Result<Vec<String>, ParseError> {
    let block_selector = selector(GENRE_BLOCK)?;
    let anchor_selector = selector("a")?;

    let genre_block = document
        .select(&block_selector)
        .find(|block| block.text().collect::<String>().contains(GENRE_LABEL));

    match genre_block {
        Some(block) => Ok(block
            .select(&anchor_selector)
            .map(|anchor| anchor.text().collect::<String>())
            .collect()),
        None => Ok(Vec::new()),
    }
}

/// Resolves the cover image source to an absolute URL
fn extract_cover(document: &Html, page_url: &Url) -> Result<Url, ParseError> {
    let cover_selector = selector(COVER_IMAGE)?;

    let src = document
        .select(&cover_selector)
        .next()
        .and_then(|img| img.value().attr("src"))
        .ok_or(ParseError::MissingMarker("cover image"))?;

    resolve(page_url, src)
}

/// Locates the plain-text download link by its anchor text
fn extract_text_link(document: &Html, page_url: &Url) -> Result<Url, ParseError> {
    let anchor_selector = selector("a")?;

    let href = document
        .select(&anchor_selector)
        .find(|anchor| anchor.text().collect::<String>().trim() == TEXT_LINK_LABEL)
        .and_then(|anchor| anchor.value().attr("href"))
        .ok_or(ParseError::MissingMarker("text download link"))?;

    resolve(page_url, href)
}

/// Derives the cover filename from the final path segment of its URL
///
/// The segment is percent-decoded before sanitization so covers with
/// encoded non-ASCII names keep their readable form on disk.
fn cover_filename(img_src: &Url) -> Result<String, ParseError> {
    let segment = img_src
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|segment| !segment.is_empty())
        .ok_or(ParseError::MissingMarker("cover filename"))?;

    let decoded = urlencoding::decode(segment)
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| segment.to_string());

    Ok(sanitize_filename(&decoded))
}
