//! relflat - flatten relative layouts into absolute offsets
//!
//! Elements in a RelativeLayout document are positioned against their
//! container or against each other. This library resolves those anchors,
//! one axis at a time, into offsets measured from the container's origin
//! and rewrites the document so no element depends on a sibling.
//!
//! Documents are Android layout XML, or the same attributes written as TOML.
//!
//! # Example
//!
//! ```rust
//! use relflat::flatten;
//!
//! let flat = flatten(r#"
//! <RelativeLayout xmlns:android="http://schemas.android.com/apk/res/android">
//!     <TextView
//!         android:id="@+id/title"
//!         android:layout_width="100dp"
//!         android:layout_height="20dp"
//!         android:layout_alignParentLeft="true"
//!         android:layout_alignParentTop="true" />
//!     <ImageView
//!         android:id="@+id/icon"
//!         android:layout_width="20dp"
//!         android:layout_height="20dp"
//!         android:layout_toRightOf="@id/title"
//!         android:layout_marginLeft="5dp"
//!         android:layout_alignTop="@id/title" />
//! </RelativeLayout>
//! "#).unwrap();
//!
//! assert!(flat.contains(r#"android:layout_marginLeft="105dp""#));
//! assert!(!flat.contains("layout_toRightOf"));
//! ```

pub mod config;
pub mod document;
pub mod error;
pub mod layout;

pub use config::{ConfigError, FlattenConfig};
pub use document::{ApplyReport, DocumentFormat, LayoutDocument, Warning};
pub use error::DocumentError;
pub use layout::{
    Axis, AxisLayout, ElementRecord, FlattenOutcome, LayoutConfig, LayoutError, Placement,
};

use log::debug;
use thiserror::Error;

use layout::{NoopObserver, TreeDumper};

/// Errors that can occur during the flatten pipeline
#[derive(Debug, Error)]
pub enum FlattenError {
    /// Error reading or writing the document
    #[error("document error: {0}")]
    Document(#[from] DocumentError),

    /// Fatal error on one axis
    #[error("{axis} layout error: {source}")]
    Layout {
        axis: Axis,
        #[source]
        source: LayoutError,
    },
}

/// A document after flattening, with everything the run found out
#[derive(Debug, Clone)]
pub struct FlattenedDocument {
    /// The rewritten document. Failed axes are left relative.
    pub document: LayoutDocument,
    pub outcome: FlattenOutcome,
    pub report: ApplyReport,
    /// Tree dumps, only filled when `FlattenConfig::debug` is set
    pub dumps: Vec<String>,
}

impl FlattenedDocument {
    /// Fail with the first axis error, if any axis failed
    pub fn check(&self) -> Result<(), FlattenError> {
        match self.outcome.failures().into_iter().next() {
            Some((axis, e)) => Err(FlattenError::Layout {
                axis,
                source: e.clone(),
            }),
            None => Ok(()),
        }
    }
}

/// Run both axis pipelines over element records
pub fn flatten_records(records: &[ElementRecord], config: &LayoutConfig) -> FlattenOutcome {
    layout::run_both(records, config, &mut NoopObserver)
}

/// Flatten a parsed document with custom configuration.
///
/// Axis failures do not make this fail; they are recorded in the outcome and
/// the report. Use [`FlattenedDocument::check`] to turn them into an error.
pub fn flatten_document(
    mut doc: LayoutDocument,
    config: &FlattenConfig,
) -> Result<FlattenedDocument, FlattenError> {
    let records = doc.records(&config.unit)?;
    for record in &records {
        debug!(target: "relflat", "{}", document::describe(record));
    }

    let mut dumper = TreeDumper::default();
    let outcome = if config.debug {
        layout::run_both(&records, &config.layout, &mut dumper)
    } else {
        flatten_records(&records, &config.layout)
    };

    let report = document::apply(&mut doc, &outcome, &config.unit);

    Ok(FlattenedDocument {
        document: doc,
        outcome,
        report,
        dumps: dumper.dumps,
    })
}

/// Flatten document source (XML or TOML, told apart by content) with
/// custom configuration
pub fn flatten_source(
    source: &str,
    config: &FlattenConfig,
) -> Result<FlattenedDocument, FlattenError> {
    let document = LayoutDocument::parse(source, DocumentFormat::sniff(source))?;
    flatten_document(document, config)
}

/// Flatten document source with default configuration.
///
/// Fails if either axis fails; returns the rewritten document in the format
/// it was read in.
pub fn flatten(source: &str) -> Result<String, FlattenError> {
    let flat = flatten_source(source, &FlattenConfig::default())?;
    flat.check()?;
    Ok(flat.document.render(DocumentFormat::sniff(source))?)
}
