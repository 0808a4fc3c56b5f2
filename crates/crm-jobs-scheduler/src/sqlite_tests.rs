
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn job_attributes(class_name: &str) -> Attributes {
        let mut attributes = Attributes::new();
        attributes.insert("className".to_string(), json!(class_name));
        attributes.insert("queue".to_string(), json!("q0"));
        attributes.insert("data".to_string(), json!({"targetId": "123", "foo": "bar"}));
        attributes
    }

    #[tokio::test]
    async fn test_sqlite_store_create_and_get() {
        let store = SqliteEntityStore::in_memory().await.unwrap();

        let created = store.create_entity("Job", job_attributes("Cleanup")).await.unwrap();
        assert_eq!(created.id.len(), crate::store::ENTITY_ID_LENGTH);

        let loaded = store.get_entity("Job", &created.id).await.unwrap().unwrap();
        assert_eq!(loaded, created);
        assert_eq!(loaded.get("data"), Some(&json!({"targetId": "123", "foo": "bar"})));
    }

    #[tokio::test]
    async fn test_sqlite_store_get_nonexistent() {
        let store = SqliteEntityStore::in_memory().await.unwrap();

        let created = store.create_entity("Job", job_attributes("Cleanup")).await.unwrap();
        assert!(store.get_entity("Job", "00000000000000000").await.unwrap().is_none());
        assert!(store.get_entity("Lead", &created.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_sqlite_store_list_in_insertion_order() {
        let store = SqliteEntityStore::in_memory().await.unwrap();

        for name in ["first", "second", "third"] {
            store.create_entity("Job", job_attributes(name)).await.unwrap();
        }
        store.create_entity("Lead", Attributes::new()).await.unwrap();

        let jobs = store.list_entities("Job").await.unwrap();
        let names: Vec<_> = jobs.iter().filter_map(|e| e.get_str("className")).collect();
        assert_eq!(names, vec!["first", "second", "third"]);
    }

    #[tokio::test]
    async fn test_sqlite_store_persists_across_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("jobs.db");

        let id = {
            let store = SqliteEntityStore::open(&path).await.unwrap();
            store.create_entity("Job", job_attributes("Cleanup")).await.unwrap().id
        };

        let reopened = SqliteEntityStore::open(&path).await.unwrap();
        let loaded = reopened.get_entity("Job", &id).await.unwrap().unwrap();
        assert_eq!(loaded.get_str("className"), Some("Cleanup"));
        assert_eq!(reopened.list_entities("Job").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_sqlite_store_open_bad_path() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing").join("jobs.db");

        let result = SqliteEntityStore::open(&path).await;
        assert!(matches!(result, Err(StoreError::Connection(_))));
    }
