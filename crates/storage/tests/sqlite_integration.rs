use civics_core::model::{AppSettings, Theme};
use storage::repository::AppSettingsRepository;
use storage::sqlite::SqliteRepository;

#[tokio::test]
async fn sqlite_persists_theme_preference() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_theme?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    assert!(repo.get_settings().await.unwrap().is_none());

    repo.save_settings(&AppSettings::new(Theme::Dark))
        .await
        .unwrap();
    let stored = repo.get_settings().await.unwrap().expect("stored");
    assert_eq!(stored.theme(), Theme::Dark);

    repo.save_settings(&AppSettings::new(Theme::Light))
        .await
        .unwrap();
    let stored = repo.get_settings().await.unwrap().expect("stored");
    assert_eq!(stored.theme(), Theme::Light);
}

#[tokio::test]
async fn sqlite_migrations_are_idempotent() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_migrate?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("first migrate");
    repo.migrate().await.expect("second migrate");

    repo.save_settings(&AppSettings::default()).await.unwrap();
    let stored = repo.get_settings().await.unwrap().expect("stored");
    assert_eq!(stored.theme(), Theme::Light);
}

#[tokio::test]
async fn sqlite_rejects_corrupted_theme() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_corrupt?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    sqlx::query("INSERT INTO app_settings (key, value, updated_at) VALUES ('theme', 'sepia', '')")
        .execute(repo.pool())
        .await
        .unwrap();

    let err = repo.get_settings().await.unwrap_err();
    assert!(matches!(
        err,
        storage::repository::StorageError::Serialization(_)
    ));
}
