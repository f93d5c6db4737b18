//! User-facing messages for search outcomes, in English or Japanese.

use axum::http::{header, HeaderMap};
use readlog_core::SearchOutcome;

/// Response language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    English,
    Japanese,
}

impl Language {
    /// Pick a language from `Accept-Language`. Only the first listed range
    /// matters: `ja*` selects Japanese, anything else English.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let first = headers
            .get(header::ACCEPT_LANGUAGE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(|v| v.trim().to_ascii_lowercase());

        match first {
            Some(tag) if tag.starts_with("ja") => Language::Japanese,
            _ => Language::English,
        }
    }
}

/// Message for an outcome; `None` for success.
pub fn outcome_message(outcome: &SearchOutcome, lang: Language) -> Option<String> {
    let message = match (outcome, lang) {
        (SearchOutcome::Success { .. }, _) => return None,
        (SearchOutcome::NotFound, Language::English) => "Book not found".to_string(),
        (SearchOutcome::NotFound, Language::Japanese) => {
            "書籍が見つかりませんでした".to_string()
        }
        (SearchOutcome::NetworkUnavailable, Language::English) => {
            "A network error occurred".to_string()
        }
        (SearchOutcome::NetworkUnavailable, Language::Japanese) => {
            "ネットワークエラーが発生しました".to_string()
        }
        (SearchOutcome::RateLimitExceeded, Language::English) => {
            "Too many requests. Please wait a moment".to_string()
        }
        (SearchOutcome::RateLimitExceeded, Language::Japanese) => {
            "リクエストが多すぎます。しばらくお待ちください".to_string()
        }
        (SearchOutcome::DailyLimitExceeded, Language::English) => {
            "Today's search limit has been reached".to_string()
        }
        (SearchOutcome::DailyLimitExceeded, Language::Japanese) => {
            "本日の検索上限に達しました".to_string()
        }
        (SearchOutcome::ApiError { message }, Language::English) => {
            format!("An error occurred: {}", message)
        }
        (SearchOutcome::ApiError { message }, Language::Japanese) => {
            format!("エラーが発生しました: {}", message)
        }
    };
    Some(message)
}

pub fn blank_isbn(lang: Language) -> String {
    match lang {
        Language::English => "Please enter an ISBN".to_string(),
        Language::Japanese => "ISBNを入力してください".to_string(),
    }
}

pub fn malformed_isbn(isbn: &str, lang: Language) -> String {
    match lang {
        Language::English => format!("Not a valid ISBN-10 or ISBN-13: {}", isbn),
        Language::Japanese => format!("ISBNの形式が正しくありません: {}", isbn),
    }
}
