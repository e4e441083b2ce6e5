use serde::Serialize;

use super::errors::ValidationError;
use super::value_objects::{BookId, required_text};

/// 書籍
///
/// `available` は派生状態：貸出中（Active）の貸出が参照していない限り true。
/// 貸出の作成・返却・削除以外で変更されることはない。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Book {
    pub id: BookId,
    #[serde(flatten)]
    pub details: BookDetails,
    pub available: bool,
}

/// 書籍の書誌情報（作成・更新の入力）
///
/// コンストラクタで検証済みの値のみを保持する。
/// ISBNの一意性は強制しない（同じISBNの複本を別レコードとして登録できる）。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookDetails {
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub publication_year: i32,
    pub category: String,
}

const TITLE_MAX_LEN: usize = 255;
const AUTHOR_MAX_LEN: usize = 255;
const ISBN_MAX_LEN: usize = 32;
const CATEGORY_MAX_LEN: usize = 100;

impl BookDetails {
    pub fn new(
        title: &str,
        author: &str,
        isbn: &str,
        publication_year: i32,
        category: &str,
    ) -> Result<Self, ValidationError> {
        if !(1..=9999).contains(&publication_year) {
            return Err(ValidationError::InvalidPublicationYear(publication_year));
        }

        Ok(Self {
            title: required_text("title", title, TITLE_MAX_LEN)?,
            author: required_text("author", author, AUTHOR_MAX_LEN)?,
            isbn: required_text("isbn", isbn, ISBN_MAX_LEN)?,
            publication_year,
            category: required_text("category", category, CATEGORY_MAX_LEN)?,
        })
    }
}

/// 書籍一覧の絞り込み条件
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookFilter {
    pub available: Option<bool>,
    pub category: Option<String>,
}

impl BookFilter {
    pub fn matches(&self, book: &Book) -> bool {
        self.available.is_none_or(|available| book.available == available)
            && self
                .category
                .as_deref()
                .is_none_or(|category| book.details.category == category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn details() -> BookDetails {
        BookDetails::new("Rayuela", "Julio Cortázar", "978-84-376-0494-7", 1963, "Novela")
            .unwrap()
    }

    #[test]
    fn test_book_details_trims_fields() {
        let details = BookDetails::new(" Ficciones ", "Borges", "isbn", 1944, " Cuento ").unwrap();
        assert_eq!(details.title, "Ficciones");
        assert_eq!(details.category, "Cuento");
    }

    #[test]
    fn test_book_details_rejects_blank_author() {
        let result = BookDetails::new("Ficciones", "  ", "isbn", 1944, "Cuento");
        assert_eq!(result, Err(ValidationError::Blank("author")));
    }

    #[test]
    fn test_book_details_rejects_long_isbn() {
        let isbn = "9".repeat(200);
        let result = BookDetails::new("Ficciones", "Borges", &isbn, 1944, "Cuento");
        assert_eq!(
            result,
            Err(ValidationError::TooLong {
                field: "isbn",
                max_len: 32
            })
        );
    }

    #[test]
    fn test_book_details_rejects_year_zero() {
        let result = BookDetails::new("Ficciones", "Borges", "isbn", 0, "Cuento");
        assert_eq!(result, Err(ValidationError::InvalidPublicationYear(0)));
    }

    #[test]
    fn test_book_serializes_flat() {
        let book = Book {
            id: BookId::new(1),
            details: details(),
            available: true,
        };
        let value = serde_json::to_value(&book).unwrap();
        assert_eq!(value["id"], 1);
        assert_eq!(value["title"], "Rayuela");
        assert_eq!(value["available"], true);
    }

    #[test]
    fn test_filter_matches_availability_and_category() {
        let book = Book {
            id: BookId::new(1),
            details: details(),
            available: false,
        };

        assert!(BookFilter::default().matches(&book));
        assert!(
            BookFilter {
                available: Some(false),
                category: Some("Novela".to_string()),
            }
            .matches(&book)
        );
        assert!(
            !BookFilter {
                available: Some(true),
                category: None,
            }
            .matches(&book)
        );
        assert!(
            !BookFilter {
                available: None,
                category: Some("Poesía".to_string()),
            }
            .matches(&book)
        );
    }
}
