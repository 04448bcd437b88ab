use md2gdoc::{EditOperation, StyleSpec};

use crate::error::{ClientError, ClientResult};
use crate::types::{DocumentId, EmailAddress, Role};

/// The hosted document service as seen by the publish pipeline.
pub trait DocumentService {
    fn create_document(&mut self, title: &str) -> ClientResult<DocumentId>;

    /// Applies `operations` in slice order. Offsets are not validated or
    /// reordered beyond what the service itself enforces.
    fn apply_operations(&mut self, id: &DocumentId, operations: &[EditOperation])
        -> ClientResult<()>;

    fn share_document(
        &mut self,
        id: &DocumentId,
        principal: &EmailAddress,
        role: Role,
    ) -> ClientResult<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePoint {
    Create,
    Apply,
    Share,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledRange {
    pub start: usize,
    pub end: usize,
    pub style: StyleSpec,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Permission {
    pub principal: EmailAddress,
    pub role: Role,
}

/// A document held by [`InMemoryService`]. The body is kept in UTF-16 units;
/// `body[i - 1]` is document index `i`.
#[derive(Debug, Clone)]
pub struct StoredDocument {
    pub id: DocumentId,
    pub title: String,
    pub styles: Vec<StyledRange>,
    pub permissions: Vec<Permission>,
    body: Vec<u16>,
}

impl StoredDocument {
    fn new(id: DocumentId, title: &str) -> Self {
        Self {
            id,
            title: title.to_string(),
            styles: Vec::new(),
            permissions: Vec::new(),
            body: "\n".encode_utf16().collect(),
        }
    }

    pub fn text(&self) -> String {
        String::from_utf16_lossy(&self.body)
    }

    /// Text covered by the half-open index range `start..end`.
    pub fn slice(&self, start: usize, end: usize) -> Option<String> {
        if start == 0 || start > end {
            return None;
        }
        self.body
            .get(start - 1..end - 1)
            .map(String::from_utf16_lossy)
    }

    fn apply(&mut self, operation: &EditOperation) -> ClientResult<()> {
        let end_of_segment = self.body.len();
        match operation {
            EditOperation::InsertText { at, text } => {
                if *at == 0 || *at > end_of_segment {
                    return Err(ClientError::Service(format!(
                        "insertion index {at} must be within 1..={end_of_segment}"
                    )));
                }
                let tail = self.body.split_off(at - 1);
                self.body.extend(format!("{text}\n").encode_utf16());
                self.body.extend(tail);
            }
            EditOperation::StyleRange { start, end, style } => {
                if *start == 0 || start > end || *end > end_of_segment {
                    return Err(ClientError::Service(format!(
                        "style range {start}..{end} is outside 1..{end_of_segment}"
                    )));
                }
                self.styles.push(StyledRange {
                    start: *start,
                    end: *end,
                    style: *style,
                });
            }
        }
        Ok(())
    }
}

/// Document service that keeps documents in memory and applies batches the way
/// the hosted service does: in order, and all-or-nothing per batch.
#[derive(Debug, Default)]
pub struct InMemoryService {
    documents: Vec<StoredDocument>,
    fail_on: Option<FailurePoint>,
}

impl InMemoryService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(point: FailurePoint) -> Self {
        Self {
            documents: Vec::new(),
            fail_on: Some(point),
        }
    }

    pub fn document(&self, id: &DocumentId) -> Option<&StoredDocument> {
        self.documents.iter().find(|doc| &doc.id == id)
    }

    pub fn documents(&self) -> &[StoredDocument] {
        &self.documents
    }

    fn check(&self, point: FailurePoint) -> ClientResult<()> {
        if self.fail_on == Some(point) {
            return Err(ClientError::Service(format!("injected failure on {point:?}")));
        }
        Ok(())
    }

    fn document_mut(&mut self, id: &DocumentId) -> ClientResult<&mut StoredDocument> {
        self.documents
            .iter_mut()
            .find(|doc| &doc.id == id)
            .ok_or_else(|| ClientError::Service(format!("document {id} not found")))
    }
}

impl DocumentService for InMemoryService {
    fn create_document(&mut self, title: &str) -> ClientResult<DocumentId> {
        self.check(FailurePoint::Create)?;
        let id = DocumentId::new(format!("doc-{}", self.documents.len() + 1));
        self.documents.push(StoredDocument::new(id.clone(), title));
        Ok(id)
    }

    fn apply_operations(
        &mut self,
        id: &DocumentId,
        operations: &[EditOperation],
    ) -> ClientResult<()> {
        self.check(FailurePoint::Apply)?;
        let document = self.document_mut(id)?;
        let mut staged = document.clone();
        for operation in operations {
            staged.apply(operation)?;
        }
        *document = staged;
        Ok(())
    }

    fn share_document(
        &mut self,
        id: &DocumentId,
        principal: &EmailAddress,
        role: Role,
    ) -> ClientResult<()> {
        self.check(FailurePoint::Share)?;
        let document = self.document_mut(id)?;
        document.permissions.push(Permission {
            principal: principal.clone(),
            role,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use md2gdoc::{translate, TranslateOptions};

    #[test]
    fn applies_translated_operations_in_order() {
        let mut service = InMemoryService::new();
        let id = service.create_document("Sync").unwrap();
        let translation = translate("# Title\n- item\nplain", TranslateOptions::default());

        service
            .apply_operations(&id, &translation.operations)
            .unwrap();

        let doc = service.document(&id).unwrap();
        assert_eq!(doc.text(), "Title\n\u{2022} item\nplain\n\n");
        assert_eq!(doc.styles.len(), 1);
        assert_eq!(doc.slice(doc.styles[0].start, doc.styles[0].end).unwrap(), "Title");
    }

    #[test]
    fn rejects_whole_batch_on_bad_offset() {
        let mut service = InMemoryService::new();
        let id = service.create_document("Sync").unwrap();
        let operations = vec![
            EditOperation::InsertText {
                at: 1,
                text: "ok".into(),
            },
            EditOperation::InsertText {
                at: 99,
                text: "lost".into(),
            },
        ];

        let err = service.apply_operations(&id, &operations).unwrap_err();

        assert!(matches!(err, ClientError::Service(_)));
        assert_eq!(service.document(&id).unwrap().text(), "\n");
    }

    #[test]
    fn unknown_document_is_a_service_error() {
        let mut service = InMemoryService::new();
        let email = EmailAddress::parse("a@example.com").unwrap();
        let err = service
            .share_document(&DocumentId::new("nope"), &email, Role::Reader)
            .unwrap_err();
        assert!(matches!(err, ClientError::Service(_)));
    }
}
