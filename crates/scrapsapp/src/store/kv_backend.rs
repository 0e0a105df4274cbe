use super::{upsert, StorageBackend};
use crate::error::{Result, ScrapsError};
use crate::kv::{get_or, KeyValueStore, ITEMS_KEY};
use crate::model::{BackendKind, ScrapId, ScrapRecord};
use std::rc::Rc;
use tracing::debug;

/// Global backend: the whole collection under [`ITEMS_KEY`].
///
/// Each operation reads the full list, changes it in memory and writes it back in one
/// `update`, so a failed write leaves the previous collection intact.
pub struct KeyValueBackend<K: KeyValueStore> {
    store: Rc<K>,
}

impl<K: KeyValueStore> KeyValueBackend<K> {
    pub fn new(store: Rc<K>) -> Self {
        Self { store }
    }

    fn write_all(&self, records: &[ScrapRecord]) -> Result<()> {
        let value = serde_json::to_value(records).map_err(ScrapsError::Serialization)?;
        self.store.update(ITEMS_KEY, Some(value))?;
        debug!(count = records.len(), "wrote global scraps");
        Ok(())
    }
}

impl<K: KeyValueStore> StorageBackend for KeyValueBackend<K> {
    fn kind(&self) -> BackendKind {
        BackendKind::KeyValueStore
    }

    fn initialize(&self) -> Result<()> {
        Ok(())
    }

    fn list(&self) -> Result<Vec<ScrapRecord>> {
        get_or(self.store.as_ref(), ITEMS_KEY, Vec::new())
    }

    fn save(&self, record: &ScrapRecord) -> Result<()> {
        record.check_timestamps()?;
        let mut records = self.list()?;
        upsert(&mut records, record);
        self.write_all(&records)
    }

    fn delete(&self, id: &ScrapId) -> Result<()> {
        let mut records = self.list()?;
        let before = records.len();
        records.retain(|record| record.id != *id);
        if records.len() == before {
            return Ok(());
        }
        self.write_all(&records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::memory::MemoryKv;
    use crate::model::ScrapPatch;

    fn make_backend() -> (Rc<MemoryKv>, KeyValueBackend<MemoryKv>) {
        let kv = Rc::new(MemoryKv::new());
        let backend = KeyValueBackend::new(kv.clone());
        (kv, backend)
    }

    #[test]
    fn test_initialize_writes_nothing() {
        let (kv, backend) = make_backend();
        backend.initialize().unwrap();
        backend.initialize().unwrap();
        assert!(kv.keys().unwrap().is_empty());
    }

    #[test]
    fn test_list_empty_initially() {
        let (_kv, backend) = make_backend();
        assert!(backend.list().unwrap().is_empty());
    }

    #[test]
    fn test_save_and_get_returns_equal_record() {
        let (_kv, backend) = make_backend();
        let record = ScrapRecord::new("Test Scrap", "{\"test\": true}");

        backend.save(&record).unwrap();

        assert_eq!(backend.get(&record.id).unwrap(), Some(record));
    }

    #[test]
    fn test_save_is_upsert() {
        let (_kv, backend) = make_backend();
        let mut record = ScrapRecord::new("Original", "{}");
        backend.save(&record).unwrap();

        record.label = "Changed".to_string();
        backend.save(&record).unwrap();

        let all = backend.list().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].label, "Changed");
    }

    #[test]
    fn test_list_preserves_insertion_order() {
        let (_kv, backend) = make_backend();
        let first = ScrapRecord::new("Scrap 1", "{}");
        let second = ScrapRecord::new("Scrap 2", "{}");
        backend.save(&first).unwrap();
        backend.save(&second).unwrap();

        let ids: Vec<ScrapId> = backend.list().unwrap().into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![first.id.clone(), second.id.clone()]);
    }

    #[test]
    fn test_save_keeps_records_with_non_uuid_ids() {
        let (kv, backend) = make_backend();
        let kept = ScrapRecord::new("Kept B", "{}");
        kv.update(
            ITEMS_KEY,
            Some(serde_json::json!([
                {
                    "id": "test-id",
                    "label": "Kept A",
                    "content": "{}",
                    "createdAt": "2024-05-01T10:00:00.000Z",
                    "updatedAt": "2024-05-01T10:00:00.000Z"
                },
                kept
            ])),
        )
        .unwrap();

        assert_eq!(backend.list().unwrap().len(), 2);
        backend.save(&ScrapRecord::new("New", "{}")).unwrap();

        let labels: Vec<String> = backend.list().unwrap().into_iter().map(|r| r.label).collect();
        assert_eq!(labels, vec!["Kept A", "Kept B", "New"]);
        assert_eq!(
            backend.get(&ScrapId::from("test-id")).unwrap().unwrap().label,
            "Kept A"
        );
    }

    #[test]
    fn test_update_changes_only_label_and_timestamp() {
        let (_kv, backend) = make_backend();
        let record = ScrapRecord::new("Original", "body");
        backend.save(&record).unwrap();

        let updated = backend
            .update(&record.id, ScrapPatch::label("Updated"))
            .unwrap();

        assert_eq!(updated.label, "Updated");
        assert_eq!(updated.content, record.content);
        assert_eq!(updated.created_at, record.created_at);
        assert_eq!(updated.id, record.id);
        assert!(updated.updated_at >= record.updated_at);
        assert_eq!(backend.get(&record.id).unwrap(), Some(updated));
    }

    #[test]
    fn test_update_missing_is_not_found() {
        let (_kv, backend) = make_backend();
        let err = backend
            .update(&ScrapId::new(), ScrapPatch::label("Test"))
            .unwrap_err();
        assert!(err.is_not_found());
        assert!(err.to_string().contains("not found"));
        assert!(backend.list().unwrap().is_empty());
    }

    #[test]
    fn test_delete_removes_and_tolerates_missing() {
        let (kv, backend) = make_backend();
        let record = ScrapRecord::new("To Delete", "{}");
        backend.save(&record).unwrap();
        backend.delete(&record.id).unwrap();
        assert_eq!(backend.get(&record.id).unwrap(), None);

        let writes = kv.write_count();
        backend.delete(&record.id).unwrap();
        assert_eq!(kv.write_count(), writes);
    }

    #[test]
    fn test_failed_write_keeps_previous_collection() {
        let (kv, backend) = make_backend();
        let kept = ScrapRecord::new("Kept", "{}");
        backend.save(&kept).unwrap();

        kv.set_simulate_write_error(true);
        assert!(backend.save(&ScrapRecord::new("Lost", "{}")).is_err());

        kv.set_simulate_write_error(false);
        assert_eq!(backend.list().unwrap(), vec![kept]);
    }
}
