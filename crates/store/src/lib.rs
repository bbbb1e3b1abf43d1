//! Collaborators around the export core: where invoice records live and how
//! they are sent to a remote record store.
//!
//! - [`InMemoryDocumentStore`] and [`JsonFileDocumentStore`] implement
//!   [`folio_traits::DocumentStore`].
//! - [`RecordFilter`] and [`StatusCounts`] back a dashboard listing.
//! - [`build_submission`] turns a document into a multipart
//!   [`folio_traits::SubmissionPayload`]; [`HttpSubmitter`] posts it as a
//!   reqwest multipart form built by [`to_form`].

mod file;
mod ids;
mod memory;
mod multipart;
mod query;
mod submission;

pub use file::JsonFileDocumentStore;
pub use ids::generate_record_id;
pub use memory::InMemoryDocumentStore;
pub use multipart::{to_form, HttpSubmitter, RecordingSubmitter};
pub use query::{RecordFilter, StatusCounts};
pub use submission::{build_submission, COMPANY_SIGNATURE_FILE, CUSTOMER_SIGNATURE_FILE};
