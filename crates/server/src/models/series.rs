//! Series allocation models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockroom_core::{ItemId, SeriesId, SeriesKind, SeriesRange};

use crate::models::item::Item;

/// A serial-number range allocated against an item.
///
/// `from`/`to` carry the zero-padded labels; `quantity` is derived from
/// the numeric bounds, never stored independently.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Series {
    /// Unique series ID.
    pub id: SeriesId,
    /// Item the range is allocated against.
    pub item_id: ItemId,
    /// Padded lower bound label (e.g. "00001").
    pub from: String,
    /// Padded upper bound label (e.g. "00010").
    pub to: String,
    /// Whether the series deposited or withdrew its quantity.
    #[serde(rename = "type")]
    pub kind: SeriesKind,
    /// Units covered by the inclusive range.
    pub quantity: i64,
    /// When the series was created.
    pub created_at: DateTime<Utc>,
}

/// A raw series bound as it arrives on the wire.
///
/// Clients send bounds as either JSON numbers or strings; both normalize
/// through [`SeriesRange::parse`].
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SeriesEndpoint {
    Number(i64),
    Text(String),
}

impl SeriesEndpoint {
    /// The bound as raw text for range parsing.
    #[must_use]
    pub fn as_raw(&self) -> String {
        match self {
            Self::Number(n) => n.to_string(),
            Self::Text(s) => s.clone(),
        }
    }
}

/// Input for creating a series.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSeriesInput {
    /// Item to allocate against.
    pub item_id: ItemId,
    /// Lower bound, number or string.
    pub from: SeriesEndpoint,
    /// Upper bound, number or string.
    pub to: SeriesEndpoint,
    /// Optional explicit quantity; must match the range size if given.
    pub quantity: Option<i64>,
    /// Deposit or withdraw.
    #[serde(rename = "type")]
    pub kind: SeriesKind,
}

/// Validated insert parameters for a series.
#[derive(Debug, Clone)]
pub struct NewSeries {
    pub item_id: ItemId,
    pub range: SeriesRange,
    pub kind: SeriesKind,
}

/// Creation result: the new series plus the item with adjusted stock.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesWithItem {
    pub series: Series,
    pub item: Item,
}
