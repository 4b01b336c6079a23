use cardamom::{FlowError, RecipeFlow};

// Runs in its own test binary: the environment variable below would break
// configuration loading for any other test in the same process.
#[tokio::test]
async fn test_upload_removed_when_config_fails_to_load() {
    std::env::set_var("CARDAMOM__SCRAPER__TIMEOUT_SECS", "not-a-number");

    let dir = tempfile::tempdir().unwrap();
    let upload = dir.path().join("upload-stew.txt");
    std::fs::write(&upload, "Beef Stew\n\nIngredients:\n- 1 lb beef\n").unwrap();

    let result = RecipeFlow::builder()
        .without_illustration()
        .file(&upload)
        .build()
        .await;

    std::env::remove_var("CARDAMOM__SCRAPER__TIMEOUT_SECS");

    assert!(matches!(result, Err(FlowError::ConfigError(_))));
    assert!(!upload.exists());
}
