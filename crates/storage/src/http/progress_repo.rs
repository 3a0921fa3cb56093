use async_trait::async_trait;
use serde_json::Value;

use simulado_core::model::SimuladoId;

use super::{HttpStore, check_status, connection, decode};
use crate::repository::{ProgressRecord, ProgressRepository, StorageError, StoredProgress};

#[async_trait]
impl ProgressRepository for HttpStore {
    async fn load_progress(
        &self,
        id: &SimuladoId,
    ) -> Result<Option<ProgressRecord>, StorageError> {
        let response = self
            .client()
            .get(self.url(&format!("/user/progress/{}", id.as_str())))
            .send()
            .await
            .map_err(connection)?;
        check_status(&response)?;

        // The backend answers `{}` when nothing is stored; an empty object is
        // also what a clear writes, so both mean "no saved progress".
        let value: Value = response.json().await.map_err(decode)?;
        match &value {
            Value::Null => Ok(None),
            Value::Object(map) if map.is_empty() => Ok(None),
            _ => serde_json::from_value(value)
                .map(Some)
                .map_err(|e| StorageError::Serialization(e.to_string())),
        }
    }

    async fn save_progress(
        &self,
        id: &SimuladoId,
        record: &ProgressRecord,
    ) -> Result<(), StorageError> {
        let response = self
            .client()
            .post(self.url(&format!("/user/progress/{}", id.as_str())))
            .json(record)
            .send()
            .await
            .map_err(connection)?;
        check_status(&response)
    }

    async fn clear_progress(&self, id: &SimuladoId) -> Result<(), StorageError> {
        let response = self
            .client()
            .post(self.url(&format!("/user/progress/{}", id.as_str())))
            .json(&Value::Object(serde_json::Map::new()))
            .send()
            .await
            .map_err(connection)?;
        check_status(&response)
    }

    async fn all_progress(&self) -> Result<Vec<StoredProgress>, StorageError> {
        let response = self
            .client()
            .get(self.url("/user/progress"))
            .send()
            .await
            .map_err(connection)?;
        check_status(&response)?;
        response.json().await.map_err(decode)
    }
}
