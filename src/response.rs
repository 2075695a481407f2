//! Success envelope: `{ "data": ... }`, plus `meta.count` for lists.

use axum::{http::StatusCode, Json};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    meta: Option<ListMeta>,
}

#[derive(Debug, Serialize)]
struct ListMeta {
    count: usize,
}

/// Handler return shape: status plus JSON envelope.
pub type Reply<T> = (StatusCode, Json<Envelope<T>>);

fn reply<T>(status: StatusCode, data: T, meta: Option<ListMeta>) -> Reply<T> {
    (status, Json(Envelope { data, meta }))
}

/// 201 with the new resource.
pub fn created<T: Serialize>(data: T) -> Reply<T> {
    reply(StatusCode::CREATED, data, None)
}

/// 200 with one resource.
pub fn single<T: Serialize>(data: T) -> Reply<T> {
    reply(StatusCode::OK, data, None)
}

/// 200 with every item and their count. Empty is still 200.
pub fn many<T: Serialize>(items: Vec<T>) -> Reply<Vec<T>> {
    let meta = ListMeta { count: items.len() };
    reply(StatusCode::OK, items, Some(meta))
}

#[derive(Debug, Serialize)]
pub struct Deleted {
    deleted: String,
}

/// `{ "data": { "deleted": key } }`
pub fn deleted(key: impl ToString) -> Reply<Deleted> {
    single(Deleted {
        deleted: key.to_string(),
    })
}
