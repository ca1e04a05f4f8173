//! Expodoc Core
//!
//! Documentary status tracking for export shipments:
//! - Classifies each shipment (dispatched, on time, at risk, critical)
//! - Flags shipments whose invoice is overdue
//! - Merges operator comments into freshly uploaded data
//! - Reconciles edited comments back into a durable store
//!
//! # Flow
//!
//! ```text
//! Dataset ──► Enricher ──► EnrichedDataset ──► (filter / summary / edit)
//!               ▲                                        │
//!               │                                        ▼
//!          CommentStore ◄──────────── reconcile ◄── Annotations
//!               │
//!               ▼
//!          StoreBackend (JSON file, atomic replace)
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use expodoc_core::{AnnotationSession, JsonFileBackend};
//!
//! let mut session = AnnotationSession::open(JsonFileBackend::new("comentarios.json"))?;
//! let mut enriched = session.enrich(&dataset, chrono::Local::now().date_naive())?;
//! enriched.set_comment("100", "waiting on certificate of origin");
//! session.reconcile(&enriched)?;
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

// Core modules
pub mod billing;
pub mod config;
pub mod dates;
pub mod enrich;
pub mod error;
pub mod filter;
pub mod reconcile;
pub mod session;
pub mod status;
pub mod store;
pub mod summary;
pub mod table;

// Re-exports for convenience
pub use billing::{is_billing_overdue, INVOICE_GRACE_DAYS};
pub use config::{ColumnMap, ReportConfig, DEFAULT_STORE_FILE};
pub use enrich::{enrich, EnrichedDataset, EnrichedRecord, Enricher, ShipmentRecord};
pub use error::{
    ConfigError, DateParseError, PersistenceError, ReconcileError, ReportError, ReportResult,
    SchemaError, StoreLoadError,
};
pub use filter::{FilterOptions, RecordFilter};
pub use reconcile::{
    annotations_from_enriched, annotations_from_table, apply_annotations, reconcile, Annotation,
    ReconcileReport,
};
pub use session::AnnotationSession;
pub use status::{classify, DocumentaryStatus, UnknownStatus};
pub use store::{CommentStore, JsonFileBackend, MemoryBackend, StoreBackend};
pub use summary::{PeriodDistribution, Report, StatusDistribution, Summary};
pub use table::{Cell, Dataset, Row};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with Expodoc Core
    pub use crate::{
        AnnotationSession, Cell, ColumnMap, CommentStore, Dataset, DocumentaryStatus,
        EnrichedDataset, Enricher, JsonFileBackend, RecordFilter, Report, Row, StoreBackend,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
