use async_trait::async_trait;
use serde::Serialize;

use simulado_core::model::{QuestionHash, SimuladoId};

use super::{HttpStore, check_status, connection, decode};
use crate::repository::{BookmarkRecord, BookmarkRepository, StorageError};

#[derive(Serialize)]
struct BookmarkDeleteRequest<'a> {
    simulado_id: &'a str,
    question_hash: String,
}

#[async_trait]
impl BookmarkRepository for HttpStore {
    async fn save_bookmark(&self, record: &BookmarkRecord) -> Result<(), StorageError> {
        let response = self
            .client()
            .post(self.url("/user/bookmark"))
            .json(record)
            .send()
            .await
            .map_err(connection)?;
        check_status(&response)
    }

    async fn delete_bookmark(
        &self,
        id: &SimuladoId,
        hash: QuestionHash,
    ) -> Result<(), StorageError> {
        let payload = BookmarkDeleteRequest {
            simulado_id: id.as_str(),
            question_hash: hash.value().to_string(),
        };
        let response = self
            .client()
            .delete(self.url("/user/bookmark"))
            .json(&payload)
            .send()
            .await
            .map_err(connection)?;
        check_status(&response)
    }

    async fn all_bookmarks(&self) -> Result<Vec<BookmarkRecord>, StorageError> {
        let response = self
            .client()
            .get(self.url("/user/bookmarks"))
            .send()
            .await
            .map_err(connection)?;
        check_status(&response)?;
        response.json().await.map_err(decode)
    }
}
