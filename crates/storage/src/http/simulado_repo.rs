use async_trait::async_trait;

use simulado_core::model::{Simulado, SimuladoId};

use super::{HttpStore, check_status, connection, decode};
use crate::repository::{SimuladoRecord, SimuladoRepository, SimuladoSummary, StorageError};

#[async_trait]
impl SimuladoRepository for HttpStore {
    async fn list_simulados(&self) -> Result<Vec<SimuladoSummary>, StorageError> {
        let response = self
            .client()
            .get(self.url("/simulados"))
            .send()
            .await
            .map_err(connection)?;
        check_status(&response)?;
        response.json().await.map_err(decode)
    }

    async fn get_simulado(&self, id: &SimuladoId) -> Result<Simulado, StorageError> {
        let response = self
            .client()
            .get(self.url(&format!("/simulados/{}", id.as_str())))
            .send()
            .await
            .map_err(connection)?;
        check_status(&response)?;

        let record: SimuladoRecord = response.json().await.map_err(decode)?;
        record
            .into_simulado()
            .map_err(|e| StorageError::Serialization(e.to_string()))
    }
}
