#[cfg(test)]
mod tests {
    use crate::InMemoryStore;
    use chrono::{Duration, Utc};
    use papertrade_core::errors::{DatabaseError, Error};
    use papertrade_core::portfolios::{Portfolio, PortfolioRepositoryTrait};
    use uuid::Uuid;

    fn portfolio(user_id: Uuid, name: &str, age_days: i64) -> Portfolio {
        Portfolio::new(
            Uuid::new_v4(),
            user_id,
            name,
            "USD",
            Utc::now() - Duration::days(age_days),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let store = InMemoryStore::new();
        let created = store
            .create(portfolio(Uuid::new_v4(), "Main", 1))
            .await
            .unwrap();
        let loaded = store.get_by_id(created.id()).unwrap().unwrap();
        assert_eq!(loaded.name(), "Main");
        assert_eq!(loaded.version(), 0);
        assert!(store.get_by_id(Uuid::new_v4()).unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_id_is_rejected() {
        let store = InMemoryStore::new();
        let p = portfolio(Uuid::new_v4(), "Main", 1);
        store.create(p.clone()).await.unwrap();
        assert!(matches!(
            store.create(p).await,
            Err(Error::Database(DatabaseError::UniqueViolation(_)))
        ));
    }

    #[tokio::test]
    async fn test_update_changes_name_only() {
        let store = InMemoryStore::new();
        let p = store
            .create(portfolio(Uuid::new_v4(), "Main", 1))
            .await
            .unwrap();
        let renamed = store.update(p.rename("Renamed").unwrap()).await.unwrap();
        assert_eq!(renamed.name(), "Renamed");
        assert_eq!(store.get_by_id(p.id()).unwrap().unwrap().name(), "Renamed");

        let missing = portfolio(Uuid::new_v4(), "Ghost", 1);
        assert!(matches!(
            store.update(missing).await,
            Err(Error::Database(DatabaseError::NotFound(_)))
        ));
    }

    #[tokio::test]
    async fn test_list_by_user_is_oldest_first() {
        let store = InMemoryStore::new();
        let user = Uuid::new_v4();
        store.create(portfolio(user, "Newer", 1)).await.unwrap();
        store.create(portfolio(user, "Older", 5)).await.unwrap();
        store
            .create(portfolio(Uuid::new_v4(), "Other", 3))
            .await
            .unwrap();

        let names: Vec<String> = store
            .list_by_user(user)
            .unwrap()
            .iter()
            .map(|p| p.name().to_string())
            .collect();
        assert_eq!(names, vec!["Older", "Newer"]);
    }
}
