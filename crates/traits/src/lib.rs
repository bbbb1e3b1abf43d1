pub mod raster;
pub mod resource;
pub mod store;
pub mod submit;

pub use raster::{RasterError, RasterOptions, RasterResult, Rasterizer};
pub use resource::{InMemoryResourceProvider, ResourceError, ResourceProvider, SharedResourceData};
pub use store::{DocumentStore, StoreError};
pub use submit::{
    RecordSubmitter, SubmissionFile, SubmissionPayload, SubmissionReceipt, SubmitError,
};
