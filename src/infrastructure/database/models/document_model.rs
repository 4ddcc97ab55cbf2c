use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::entities::Document as DomainDocument;
use crate::domain::value_objects::ContentHash;
use crate::infrastructure::database::schema::documents;

#[derive(Debug, Clone, Queryable, Selectable, Serialize, Identifiable)]
#[diesel(table_name = documents)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct DocumentModel {
    pub id: Uuid,
    pub filename: String,
    pub total_pages: i32,
    pub content_hash: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = documents)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewDocumentModel {
    pub id: Uuid,
    pub filename: String,
    pub total_pages: i32,
    pub content_hash: String,
    pub created_at: DateTime<Utc>,
}

impl From<&DomainDocument> for NewDocumentModel {
    fn from(document: &DomainDocument) -> Self {
        Self {
            id: document.id(),
            filename: document.filename().to_string(),
            total_pages: document.total_pages(),
            content_hash: document.content_hash().as_str().to_string(),
            created_at: document.created_at(),
        }
    }
}

impl TryFrom<DocumentModel> for DomainDocument {
    type Error = String;

    fn try_from(model: DocumentModel) -> Result<Self, Self::Error> {
        Ok(DomainDocument::restore(
            model.id,
            model.filename,
            model.total_pages,
            ContentHash::new(model.content_hash)?,
            model.created_at,
        ))
    }
}
