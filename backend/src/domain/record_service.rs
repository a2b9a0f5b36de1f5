//! Weight and health records kept per animal.
//!
//! Weights come back oldest first for growth charts, health records newest
//! first.

use std::sync::Arc;

use shared::{
    HealthRecord, HealthRecordUpdate, NewHealthRecord, NewWeightRecord, SortDirection,
    WeightRecord, WeightRecordUpdate,
};
use tracing::info;

use crate::storage::{collections, Query, QueryResult, Repository, RowStore};

#[derive(Clone)]
pub struct RecordService {
    weights: Repository<WeightRecord>,
    health: Repository<HealthRecord>,
}

impl RecordService {
    pub fn new(store: Arc<dyn RowStore>) -> Self {
        Self {
            weights: Repository::new(Arc::clone(&store), collections::WEIGHT_RECORDS),
            health: Repository::new(store, collections::HEALTH_RECORDS),
        }
    }

    pub async fn get_weight_records(&self, animal_id: &str) -> QueryResult<Vec<WeightRecord>> {
        info!("Listing weight records for animal {}", animal_id);
        let query = Query::new()
            .eq("animal_id", animal_id)
            .order("weight_date", SortDirection::Asc);
        QueryResult::logged("list weight records", self.weights.list(&query).await)
    }

    pub async fn add_weight_record(&self, record: &NewWeightRecord) -> QueryResult<WeightRecord> {
        info!("Adding weight {} for animal {}", record.weight, record.animal_id);
        QueryResult::logged("add weight record", self.weights.create(record).await)
    }

    pub async fn update_weight_record(
        &self,
        record_id: &str,
        update: &WeightRecordUpdate,
    ) -> QueryResult<WeightRecord> {
        info!("Updating weight record {}", record_id);
        QueryResult::logged("update weight record", self.weights.update(record_id, update).await)
    }

    pub async fn delete_weight_record(&self, record_id: &str) -> QueryResult<()> {
        info!("Deleting weight record {}", record_id);
        QueryResult::logged("delete weight record", self.weights.delete(record_id).await)
    }

    pub async fn get_health_records(&self, animal_id: &str) -> QueryResult<Vec<HealthRecord>> {
        info!("Listing health records for animal {}", animal_id);
        let query = Query::new()
            .eq("animal_id", animal_id)
            .order("date", SortDirection::Desc);
        QueryResult::logged("list health records", self.health.list(&query).await)
    }

    pub async fn add_health_record(&self, record: &NewHealthRecord) -> QueryResult<HealthRecord> {
        info!("Adding {} record for animal {}", record.record_type, record.animal_id);
        QueryResult::logged("add health record", self.health.create(record).await)
    }

    pub async fn update_health_record(
        &self,
        record_id: &str,
        update: &HealthRecordUpdate,
    ) -> QueryResult<HealthRecord> {
        info!("Updating health record {}", record_id);
        QueryResult::logged("update health record", self.health.update(record_id, update).await)
    }

    pub async fn delete_health_record(&self, record_id: &str) -> QueryResult<()> {
        info!("Deleting health record {}", record_id);
        QueryResult::logged("delete health record", self.health.delete(record_id).await)
    }
}
