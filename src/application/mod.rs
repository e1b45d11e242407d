pub mod certification_service;
pub mod dto;
pub mod requests;
pub mod response;
pub mod validation;

pub use certification_service::CertificationService;
pub use dto::{
    AuthQueryParams, CertifyParams, ErrorResponse, InitializeParams, LinkResponse,
    MutualViewParams,
};
pub use requests::{
    AuthQueryRequest, CertifyRequest, GatewayContext, InitializeRequest, MutualViewApplyRequest,
    QueryRequest, Signable,
};
