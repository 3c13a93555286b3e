//! MatchdayLive - Match Tracker
//!
//! Jádro celé věci:
//!   1. `discovery` vybere LIVE zápasy a založí jim záznam (první pozorování vyhrává)
//!   2. `vocabulary` přeloží číselné kódy feedu na kategorie a periody
//!   3. `timeline` pustí dál jen události novější než watermark zápasu
//!   4. `cycle` to celé spojí, posune watermarky a uloží cache
//!
//! Watermark se po každém cyklu posune na nejnovější zpracovanou událost,
//! takže stejná událost se nikdy nenahlásí dvakrát.

pub mod cycle;
pub mod discovery;
pub mod record;
pub mod store;
pub mod timeline;
pub mod vocabulary;

pub use cycle::{CycleError, CycleReport, MatchTracker, TrackerSettings};
pub use discovery::{discover, Discovery};
pub use record::{MatchCache, MatchRecord};
pub use store::{JsonFileStore, MatchStore, SqliteStore, StoreError};
pub use timeline::{format_event, is_new, next_watermark, process_timeline};
pub use vocabulary::{classify, classify_period, EventCategory, EventType, MatchStatus, Period};
