//! Services module - conversion, export and editing logic.
//!
//! Everything here is free of CLI concerns so it can be driven from tests or
//! another front end.
//!
//! # Components
//!
//! - [`converter`]: the line-stream parser. Tokenizes a raw dump into classified
//!   lines, walks them with [`PairResolver`], and assembles a [`Config`](crate::models::Config).
//! - [`coercion`]: per-key typing of value lines (strings, booleans, numbers,
//!   embedded JSON, whitespace-stripped drives).
//! - [`export`]: [`ExportService`] wraps conversions in an export envelope and
//!   names the container via an injected [`GameNameLookup`].
//! - [`game_lookup`]: the lookup trait, the offline [`NoLookup`] and the Steam
//!   store implementation.
//! - [`editor`] / [`fields`]: re-import of exported JSON and codecs for packed
//!   string fields.
//!
//! # Usage Example
//!
//! ```ignore
//! use gamenative_config::services::ExportService;
//!
//! let service = ExportService::offline();
//! let export = service.preview("wineVersion\n8.0\nshowFPS\ntrue")?;
//! println!("{}", export.to_json_pretty()?);
//! ```
//!
//! Conversion is synchronous and all-or-nothing; only container naming is async.

pub mod coercion;
pub mod converter;
pub mod editor;
pub mod export;
pub mod fields;
pub mod game_lookup;

pub use coercion::{coerce_binding, coerce_value, coerce_with_policy};
pub use converter::{
    convert, convert_with_stats, tokenize, ClassifiedLine, ConversionStats, ConvertError,
    PairResolver, Resolved,
};
pub use editor::{import_export_json, EditableConfig, ImportError};
pub use export::{steam_app_id, ExportService};
pub use game_lookup::{GameNameLookup, LookupError, NoLookup, SteamStoreLookup};
