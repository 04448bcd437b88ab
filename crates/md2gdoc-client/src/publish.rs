use md2gdoc::{translate, TranslateOptions};

use crate::error::ClientResult;
use crate::service::DocumentService;
use crate::types::{DocumentId, EmailAddress, Role};

pub const DEFAULT_TITLE: &str = "Product Team Sync";

#[derive(Debug, Clone)]
pub struct ShareTarget {
    pub principal: EmailAddress,
    pub role: Role,
}

#[derive(Debug, Clone)]
pub struct PublishRequest {
    pub title: String,
    pub markdown: String,
    pub options: TranslateOptions,
    pub share: Option<ShareTarget>,
}

#[derive(Debug, Clone)]
pub struct PublishOutcome {
    pub document_id: DocumentId,
    pub url: String,
    pub operations: usize,
    pub shared_with: Option<ShareTarget>,
}

/// Runs create, translate, apply and share against `service`. The first
/// failure stops the run; nothing already sent is undone or retried.
pub fn publish<S>(service: &mut S, request: PublishRequest) -> ClientResult<PublishOutcome>
where
    S: DocumentService + ?Sized,
{
    let document_id = service.create_document(&request.title)?;
    log::info!("Created document with ID: {document_id}");

    let translation = translate(&request.markdown, request.options);
    service.apply_operations(&document_id, &translation.operations)?;
    let url = document_id.url();
    log::info!("Document updated successfully: {url}");

    if let Some(target) = &request.share {
        service.share_document(&document_id, &target.principal, target.role)?;
        log::info!("Shared document with {} as {}", target.principal, target.role);
    }

    Ok(PublishOutcome {
        document_id,
        url,
        operations: translation.operations.len(),
        shared_with: request.share,
    })
}
