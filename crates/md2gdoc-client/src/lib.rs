pub mod credentials;
pub mod error;
pub mod fs;
pub mod plan;
pub mod publish;
pub mod service;
pub mod types;

pub use credentials::{default_scopes, Credentials, TokenClaims, DEFAULT_SCOPES};
pub use error::{ClientError, ClientResult, ExitCode};
pub use plan::PlanService;
pub use publish::{publish, PublishOutcome, PublishRequest, ShareTarget, DEFAULT_TITLE};
pub use service::{DocumentService, FailurePoint, InMemoryService, StoredDocument};
pub use types::{DocumentId, EmailAddress, Role};
