use async_trait::async_trait;

use simulado_core::model::IncorrectLog;

use super::{HttpStore, check_status, connection, decode};
use crate::repository::{IncorrectLogRecord, IncorrectLogRepository, StorageError};

#[async_trait]
impl IncorrectLogRepository for HttpStore {
    async fn load_log(&self) -> Result<IncorrectLog, StorageError> {
        let response = self
            .client()
            .get(self.url("/user/incorrect_answers"))
            .send()
            .await
            .map_err(connection)?;
        check_status(&response)?;

        let record: IncorrectLogRecord = response.json().await.map_err(decode)?;
        Ok(record.into_log())
    }

    async fn save_log(&self, log: &IncorrectLog) -> Result<(), StorageError> {
        let response = self
            .client()
            .post(self.url("/user/incorrect_answers"))
            .json(&IncorrectLogRecord::from_log(log))
            .send()
            .await
            .map_err(connection)?;
        check_status(&response)
    }

    async fn flush_stats(&self, log: &IncorrectLog) -> Result<(), StorageError> {
        let response = self
            .client()
            .post(self.url("/user/stats"))
            .json(&IncorrectLogRecord::from_log(log))
            .send()
            .await
            .map_err(connection)?;
        check_status(&response)
    }
}
