//! Raw provider record -> [`BookRecord`].
//!
//! Records without a title or a usable ISBN yield `None`. Blank strings
//! count as missing.

use super::types::{GoogleBooksItem, OpenBdRecord};
use crate::search::{normalize_isbn, BookRecord, ProviderTag};

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn isbn_of(value: Option<&str>) -> Option<String> {
    value.map(normalize_isbn).filter(|isbn| !isbn.is_empty())
}

/// Normalize an openBD record. The summary carries no description.
pub fn normalize_openbd(record: &OpenBdRecord, unknown_author: &str) -> Option<BookRecord> {
    let summary = record.summary.as_ref()?;

    let title = non_blank(summary.title.as_deref())?;
    let isbn = isbn_of(summary.isbn.as_deref())?;
    let author = non_blank(summary.author.as_deref()).unwrap_or(unknown_author);

    Some(BookRecord {
        title: title.to_string(),
        author: author.to_string(),
        isbn,
        cover_image_url: non_blank(summary.cover.as_deref()).map(str::to_string),
        description: None,
        publisher: non_blank(summary.publisher.as_deref()).map(str::to_string),
        published_date: non_blank(summary.pubdate.as_deref()).map(str::to_string),
        source: ProviderTag::DomesticCatalog,
    })
}

/// Normalize a Google Books volume. The ISBN is the first `ISBN_13`
/// identifier; other identifier kinds are ignored.
pub fn normalize_google_books(item: &GoogleBooksItem, unknown_author: &str) -> Option<BookRecord> {
    let info = &item.volume_info;

    let title = non_blank(info.title.as_deref())?;
    let isbn = info
        .industry_identifiers
        .as_ref()?
        .iter()
        .find(|id| id.kind == "ISBN_13")
        .and_then(|id| isbn_of(Some(&id.identifier)))?;

    let author = match &info.authors {
        Some(authors) if !authors.is_empty() => authors.join(", "),
        _ => unknown_author.to_string(),
    };

    Some(BookRecord {
        title: title.to_string(),
        author,
        isbn,
        cover_image_url: info
            .image_links
            .as_ref()
            .and_then(|links| non_blank(links.thumbnail.as_deref()))
            .map(str::to_string),
        description: non_blank(info.description.as_deref()).map(str::to_string),
        publisher: non_blank(info.publisher.as_deref()).map(str::to_string),
        published_date: non_blank(info.published_date.as_deref()).map(str::to_string),
        source: ProviderTag::GlobalCatalog,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::external_catalog::{ImageLinks, IndustryIdentifier, OpenBdSummary, VolumeInfo};

    const UNKNOWN: &str = "author unknown";

    fn openbd(title: Option<&str>, author: Option<&str>, isbn: Option<&str>) -> OpenBdRecord {
        OpenBdRecord {
            summary: Some(OpenBdSummary {
                isbn: isbn.map(String::from),
                title: title.map(String::from),
                author: author.map(String::from),
                publisher: Some("Iwanami".to_string()),
                pubdate: Some("20200101".to_string()),
                cover: Some("https://cover.openbd.jp/9784000000000.jpg".to_string()),
            }),
            onix: None,
        }
    }

    fn volume(
        title: Option<&str>,
        authors: Option<Vec<&str>>,
        ids: Vec<(&str, &str)>,
    ) -> GoogleBooksItem {
        GoogleBooksItem {
            id: "vol1".to_string(),
            volume_info: VolumeInfo {
                title: title.map(String::from),
                authors: authors.map(|a| a.into_iter().map(String::from).collect()),
                publisher: Some("No Starch".to_string()),
                published_date: Some("2019".to_string()),
                description: Some("About Rust".to_string()),
                industry_identifiers: Some(
                    ids.into_iter()
                        .map(|(kind, identifier)| IndustryIdentifier {
                            kind: kind.to_string(),
                            identifier: identifier.to_string(),
                        })
                        .collect(),
                ),
                image_links: Some(ImageLinks {
                    small_thumbnail: Some("http://books.example/s.jpg".to_string()),
                    thumbnail: Some("http://books.example/t.jpg".to_string()),
                }),
            },
        }
    }

    #[test]
    fn test_openbd_full_record() {
        let record = openbd(Some("Sample"), Some("Natsume Soseki"), Some("9784000000000"));
        let book = normalize_openbd(&record, UNKNOWN).unwrap();

        assert_eq!(book.title, "Sample");
        assert_eq!(book.author, "Natsume Soseki");
        assert_eq!(book.isbn, "9784000000000");
        assert_eq!(book.publisher.as_deref(), Some("Iwanami"));
        assert_eq!(book.published_date.as_deref(), Some("20200101"));
        assert!(book.cover_image_url.is_some());
        assert!(book.description.is_none());
        assert_eq!(book.source, ProviderTag::DomesticCatalog);
    }

    #[test]
    fn test_openbd_missing_author_uses_placeholder() {
        let book = normalize_openbd(&openbd(Some("Sample"), None, Some("9784000000000")), UNKNOWN)
            .unwrap();
        assert_eq!(book.author, UNKNOWN);

        let book = normalize_openbd(
            &openbd(Some("Sample"), Some(""), Some("9784000000000")),
            UNKNOWN,
        )
        .unwrap();
        assert_eq!(book.author, UNKNOWN);
    }

    #[test]
    fn test_openbd_missing_mandatory_fields() {
        let isbn = Some("9784000000000");
        assert!(normalize_openbd(&openbd(None, Some("A"), isbn), UNKNOWN).is_none());
        assert!(normalize_openbd(&openbd(Some("  "), Some("A"), isbn), UNKNOWN).is_none());
        assert!(normalize_openbd(&openbd(Some("T"), Some("A"), None), UNKNOWN).is_none());
        assert!(normalize_openbd(&OpenBdRecord::default(), UNKNOWN).is_none());
    }

    #[test]
    fn test_openbd_isbn_is_normalized() {
        let book = normalize_openbd(&openbd(Some("T"), None, Some("978-4-00-000000-0")), UNKNOWN)
            .unwrap();
        assert_eq!(book.isbn, "9784000000000");
    }

    #[test]
    fn test_openbd_blank_cover_dropped() {
        let mut record = openbd(Some("T"), None, Some("9784000000000"));
        if let Some(summary) = record.summary.as_mut() {
            summary.cover = Some(String::new());
        }
        let book = normalize_openbd(&record, UNKNOWN).unwrap();
        assert!(book.cover_image_url.is_none());
    }

    #[test]
    fn test_google_books_full_record() {
        let item = volume(
            Some("The Rust Programming Language"),
            Some(vec!["Steve Klabnik", "Carol Nichols"]),
            vec![("ISBN_10", "1718500440"), ("ISBN_13", "9781718500440")],
        );
        let book = normalize_google_books(&item, UNKNOWN).unwrap();

        assert_eq!(book.title, "The Rust Programming Language");
        assert_eq!(book.author, "Steve Klabnik, Carol Nichols");
        assert_eq!(book.isbn, "9781718500440");
        assert_eq!(book.cover_image_url.as_deref(), Some("http://books.example/t.jpg"));
        assert_eq!(book.description.as_deref(), Some("About Rust"));
        assert_eq!(book.publisher.as_deref(), Some("No Starch"));
        assert_eq!(book.published_date.as_deref(), Some("2019"));
        assert_eq!(book.source, ProviderTag::GlobalCatalog);
    }

    #[test]
    fn test_google_books_first_isbn13_wins() {
        let item = volume(
            Some("T"),
            None,
            vec![("ISBN_13", "9780000000002"), ("ISBN_13", "9780000000019")],
        );
        let book = normalize_google_books(&item, UNKNOWN).unwrap();
        assert_eq!(book.isbn, "9780000000002");
        assert_eq!(book.author, UNKNOWN);
    }

    #[test]
    fn test_google_books_empty_author_list_uses_placeholder() {
        let item = volume(Some("T"), Some(vec![]), vec![("ISBN_13", "9780000000002")]);
        assert_eq!(normalize_google_books(&item, UNKNOWN).unwrap().author, UNKNOWN);
    }

    #[test]
    fn test_google_books_without_isbn13_is_rejected() {
        let item = volume(Some("T"), None, vec![("ISBN_10", "1718500440")]);
        assert!(normalize_google_books(&item, UNKNOWN).is_none());

        let mut item = volume(Some("T"), None, vec![]);
        item.volume_info.industry_identifiers = None;
        assert!(normalize_google_books(&item, UNKNOWN).is_none());
    }

    #[test]
    fn test_google_books_without_title_is_rejected() {
        let item = volume(None, Some(vec!["A"]), vec![("ISBN_13", "9780000000002")]);
        assert!(normalize_google_books(&item, UNKNOWN).is_none());
    }
}
