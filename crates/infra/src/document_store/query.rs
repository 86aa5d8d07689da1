//! Filter / sort / paginate over a materialized set of documents.
//!
//! Used by the in-memory store; hosted backends do this server-side.

use core::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde_json::Value as JsonValue;

use super::r#trait::{Document, DocumentStoreError, ListQuery, Page, SortDirection};

/// Hard cap on a single page, whatever the caller asks for.
pub const MAX_PAGE_SIZE: u32 = 500;

const TOKEN_PREFIX: &str = "off:";

pub fn encode_page_token(offset: usize) -> String {
    format!("{TOKEN_PREFIX}{offset}")
}

pub fn decode_page_token(token: &str) -> Result<usize, DocumentStoreError> {
    token
        .strip_prefix(TOKEN_PREFIX)
        .and_then(|rest| rest.parse::<usize>().ok())
        .ok_or_else(|| DocumentStoreError::InvalidQuery(format!("malformed page token '{token}'")))
}

pub fn matches_filters(doc: &Document, query: &ListQuery) -> bool {
    query
        .filters
        .iter()
        .all(|f| doc.data.get(&f.field) == Some(&f.value))
}

/// Total order over JSON field values.
///
/// RFC 3339 strings compare as instants (chrono emits a variable number of
/// fractional digits, so plain string order is wrong). Missing values sort
/// first.
pub fn compare_values(a: Option<&JsonValue>, b: Option<&JsonValue>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(JsonValue::Number(x)), Some(JsonValue::Number(y))) => {
            let x = x.as_f64().unwrap_or(0.0);
            let y = y.as_f64().unwrap_or(0.0);
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Some(JsonValue::String(x)), Some(JsonValue::String(y))) => {
            match (x.parse::<DateTime<Utc>>(), y.parse::<DateTime<Utc>>()) {
                (Ok(x), Ok(y)) => x.cmp(&y),
                _ => x.cmp(y),
            }
        }
        (Some(JsonValue::Bool(x)), Some(JsonValue::Bool(y))) => x.cmp(y),
        (Some(x), Some(y)) => x.to_string().cmp(&y.to_string()),
    }
}

/// Apply filters, sort (ties broken by id) and pagination.
pub fn run_query(mut docs: Vec<Document>, query: &ListQuery) -> Result<Page, DocumentStoreError> {
    if query.page_size == 0 {
        return Err(DocumentStoreError::InvalidQuery("page_size must be positive".to_string()));
    }
    let page_size = query.page_size.min(MAX_PAGE_SIZE) as usize;
    let offset = match &query.page_token {
        Some(token) => decode_page_token(token)?,
        None => 0,
    };

    docs.retain(|d| matches_filters(d, query));

    docs.sort_by(|a, b| {
        let by_field = match &query.sort {
            Some(sort) => {
                let ord = compare_values(a.data.get(&sort.field), b.data.get(&sort.field));
                match sort.direction {
                    SortDirection::Asc => ord,
                    SortDirection::Desc => ord.reverse(),
                }
            }
            None => Ordering::Equal,
        };
        by_field.then_with(|| a.id.cmp(&b.id))
    });

    let total = docs.len();
    let documents: Vec<Document> = docs.into_iter().skip(offset).take(page_size).collect();
    let next = offset + documents.len();
    let next_page_token = (next < total && !documents.is_empty()).then(|| encode_page_token(next));

    Ok(Page {
        documents,
        next_page_token,
    })
}
