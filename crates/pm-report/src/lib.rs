//! Preventive maintenance report compilation engine.
//!
//! Takes a snapshot of maintenance tasks, filters and classifies them, and
//! produces a paginated, print-ready [`DocumentModel`]. Rendering is a
//! separate step behind the [`Renderer`] trait; [`HtmlRenderer`] produces a
//! standalone preview.
//!
//! # Pipeline
//!
//! - Filter: [`filter::build_predicate_on`] over independent optional criteria
//! - Status: [`status::resolve_on`] with a fixed reference day
//! - Statistics: [`stats::aggregate_on`]
//! - Evidence: [`classifier::classify`] then [`layout::select_layout`]
//! - Paging: [`paging::group`]
//! - Composition: [`ReportComposer`]
//!
//! # Example
//!
//! ```no_run
//! use pm_report::{ExportOptions, FilterCriteria, HtmlRenderer, Renderer, ReportComposer};
//!
//! let batch = pm_common::normalize_records("[]").unwrap();
//! let composer = ReportComposer::new(ExportOptions::default().with_images(true));
//! let document = composer.compose(&batch.tasks, &FilterCriteria::default());
//! let html = HtmlRenderer::new().render(&document).unwrap();
//! ```

pub mod classifier;
pub mod composer;
pub mod config;
pub mod error;
pub mod export;
pub mod filter;
pub mod layout;
pub mod pages;
pub mod paging;
pub mod render;
pub mod stats;
pub mod status;

pub use classifier::{classify, classify_with_overrides, ClassifiedEvidence, EvidenceOverrides};
pub use composer::{compose, ReportComposer};
pub use config::ExportOptions;
pub use error::{ReportError, Result};
pub use export::{export_filename, slugify};
pub use filter::{build_predicate, build_predicate_on, AppliedFilter, FilterCriteria};
pub use layout::{select_layout, LayoutPlan};
pub use pages::{DocumentModel, Page, PageKind};
pub use paging::group;
pub use render::{HtmlRenderer, Renderer};
pub use stats::{aggregate, aggregate_on, ReportStats};
pub use status::{resolve, resolve_on};
