pub(crate) mod client;
pub(crate) mod models;
pub(crate) mod ops;
pub(crate) mod params;
pub(crate) mod rpc;
pub(crate) mod session;

pub use client::ZbxClient;
pub use models::{
    AcknowledgeActions, Problem, ProblemAcknowledge, ProblemSuppression, Recovery, Tag,
};
pub use params::{GetParameters, ProblemGetParams, TagFilter};
pub use session::{ApiObject, Session, Transport};
