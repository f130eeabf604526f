//! Panchang engine: fetch, decode, extract and export.
mod assemble;
mod connectivity;
mod decode;
mod engine;
mod export;
mod extract;
mod fetch;
mod persist;
mod types;

pub use assemble::{assemble_report, build_result};
pub use connectivity::{is_connected, ConnectivityProbe, ProbeSettings, TcpProbe};
pub use decode::{decode_html, DecodedHtml};
pub use engine::PanchangEngine;
pub use export::{export_workbook, ExportError, ExportSettings, SHEET_NAMES};
pub use extract::PanchangDocument;
pub use fetch::{page_url, FetchSettings, Fetcher, ReqwestFetcher, DEFAULT_ENDPOINT};
pub use persist::{ensure_output_dir, AtomicFileWriter, PersistError};
pub use types::{FailureKind, FetchError, FetchResult, RawDocument, NO_CONNECTIVITY_MESSAGE};
