pub mod entities;
pub mod errors;
pub mod parameters;
pub mod value_objects;

pub use entities::{CertificationResult, CertificationSession};
pub use errors::{DomainError, DomainResult};
pub use parameters::{SignableParameters, SignedRequest};
pub use value_objects::{CertificationProduct, SignType};
