//! A document service that records the request bodies a publish run would
//! send instead of sending them.

use std::fs;
use std::path::{Path, PathBuf};

use md2gdoc::{BatchUpdate, EditOperation};
use serde::Serialize;
use serde_json::json;

use crate::credentials::Credentials;
use crate::error::{ClientError, ClientResult};
use crate::fs::write_atomic;
use crate::service::DocumentService;
use crate::types::{DocumentId, EmailAddress, Role};

pub const TOKEN_FILE: &str = "00-token-claims.json";
pub const CREATE_FILE: &str = "01-create.json";
pub const BATCH_UPDATE_FILE: &str = "02-batch-update.json";
pub const PERMISSION_FILE: &str = "03-permission.json";

#[derive(Debug)]
pub struct PlanService {
    dir: PathBuf,
    credentials: Credentials,
    written: Vec<PathBuf>,
}

impl PlanService {
    pub fn new(dir: impl Into<PathBuf>, credentials: Credentials) -> ClientResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| ClientError::Io {
            path: dir.clone(),
            source,
        })?;

        let mut service = Self {
            dir,
            credentials,
            written: Vec::new(),
        };
        let claims = service.credentials.claims();
        service.write(TOKEN_FILE, &claims)?;
        Ok(service)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    fn write<T: Serialize>(&mut self, name: &str, body: &T) -> ClientResult<()> {
        let path = self.dir.join(name);
        let rendered = serde_json::to_string_pretty(body)
            .map_err(|err| ClientError::Service(format!("failed to encode {name}: {err}")))?;
        write_atomic(&path, &format!("{rendered}\n"))?;
        log::debug!("wrote {}", path.display());
        self.written.push(path);
        Ok(())
    }
}

impl DocumentService for PlanService {
    fn create_document(&mut self, title: &str) -> ClientResult<DocumentId> {
        self.write(CREATE_FILE, &json!({ "title": title }))?;
        Ok(DocumentId::new("planned"))
    }

    fn apply_operations(
        &mut self,
        id: &DocumentId,
        operations: &[EditOperation],
    ) -> ClientResult<()> {
        log::debug!("planning {} operations for {id}", operations.len());
        self.write(BATCH_UPDATE_FILE, &BatchUpdate::from_operations(operations))
    }

    fn share_document(
        &mut self,
        id: &DocumentId,
        principal: &EmailAddress,
        role: Role,
    ) -> ClientResult<()> {
        self.write(
            PERMISSION_FILE,
            &json!({
                "fileId": id,
                "fields": "id",
                "body": {
                    "type": "user",
                    "role": role,
                    "emailAddress": principal,
                },
            }),
        )
    }
}
