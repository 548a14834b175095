use anyhow::Result;
use vocab_quiz_bot::config::DEFAULT_EXPOSURE_THRESHOLD;
use vocab_quiz_bot::database::{connection::DatabaseManager, error::StoreError, models::*};
use tempfile::{tempdir, TempDir};

async fn setup_test_db() -> Result<(DatabaseManager, TempDir)> {
    let temp_dir = tempdir()?;
    let db_path = temp_dir.path().join("test.db");
    let database_url = format!("sqlite:{}", db_path.display());

    let db_manager = DatabaseManager::new(&database_url).await?;
    db_manager.run_migrations().await?;

    Ok((db_manager, temp_dir))
}

async fn seed_words(db: &DatabaseManager, count: usize) -> Result<Vec<i64>> {
    let mut ids = Vec::new();
    for i in 0..count {
        ids.push(Word::create(&db.pool, &format!("слово{i}"), &format!("word{i}")).await?);
    }
    Ok(ids)
}

#[tokio::test]
async fn test_user_creation_and_retrieval() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;

    let user = User::create(&db.pool, "Ann", 42).await?;
    assert_eq!(user.external_id, 42);
    assert_eq!(user.name, "Ann");
    assert_eq!(user.score, 0);

    let found = User::find_by_external_id(&db.pool, 42).await?;
    assert!(found.is_some());
    let found = found.unwrap();
    assert_eq!(found.id, user.id);
    assert_eq!(found.name, "Ann");

    Ok(())
}

#[tokio::test]
async fn test_user_not_found() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;

    let result = User::find_by_external_id(&db.pool, 99999).await?;
    assert!(result.is_none());

    Ok(())
}

#[tokio::test]
async fn test_duplicate_user_is_rejected() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;

    User::create(&db.pool, "Ann", 42).await?;
    let result = User::create(&db.pool, "Other", 42).await;
    assert!(matches!(result, Err(StoreError::Duplicate(_))));

    // Original row untouched
    let user = User::find_by_external_id(&db.pool, 42).await?.unwrap();
    assert_eq!(user.name, "Ann");

    Ok(())
}

#[tokio::test]
async fn test_adjust_score_goes_both_ways_without_floor() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;
    User::create(&db.pool, "Ann", 42).await?;

    User::adjust_score(&db.pool, 42, 1, true).await?;
    assert_eq!(User::find_by_external_id(&db.pool, 42).await?.unwrap().score, 1);

    User::adjust_score(&db.pool, 42, 3, false).await?;
    User::adjust_score(&db.pool, 42, 3, false).await?;
    assert_eq!(User::find_by_external_id(&db.pool, 42).await?.unwrap().score, -5);

    Ok(())
}

#[tokio::test]
async fn test_adjust_score_for_unknown_user() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;

    let result = User::adjust_score(&db.pool, 7, 1, true).await;
    assert!(matches!(result, Err(StoreError::NotFound(_))));

    Ok(())
}

#[tokio::test]
async fn test_concurrent_score_updates_are_not_lost() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;
    User::create(&db.pool, "Ann", 42).await?;

    let handles: Vec<_> = (0..10)
        .map(|_| {
            let pool = db.pool.clone();
            tokio::spawn(async move { User::adjust_score(&pool, 42, 1, true).await })
        })
        .collect();
    for handle in handles {
        handle.await??;
    }

    assert_eq!(User::find_by_external_id(&db.pool, 42).await?.unwrap().score, 10);
    Ok(())
}

#[tokio::test]
async fn test_word_save_and_find() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;

    assert!(Word::find_id_by_text(&db.pool, "Мир").await?.is_none());

    let id = Word::create(&db.pool, "Мир", "World").await?;
    assert_eq!(Word::find_id_by_text(&db.pool, "Мир").await?, Some(id));

    // Exact match only
    assert!(Word::find_id_by_text(&db.pool, "мир").await?.is_none());

    Ok(())
}

#[tokio::test]
async fn test_duplicate_word_is_rejected() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;

    Word::create(&db.pool, "Мир", "World").await?;
    let result = Word::create(&db.pool, "Мир", "Peace").await;
    assert!(matches!(result, Err(StoreError::Duplicate(_))));
    assert_eq!(Word::count(&db.pool).await?, 1);

    Ok(())
}

#[tokio::test]
async fn test_record_exposure_counts_calls() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;
    let user = User::create(&db.pool, "Ann", 42).await?;
    let word_id = Word::create(&db.pool, "Мир", "World").await?;

    assert_eq!(Exposure::times_shown(&db.pool, user.id, word_id).await?, 0);

    for n in 1..=5 {
        Exposure::record(&db.pool, user.id, word_id).await?;
        assert_eq!(Exposure::times_shown(&db.pool, user.id, word_id).await?, n);
    }

    // Still one row for the pair
    let rows = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM exposures WHERE user_id = ? AND word_id = ?"
    )
    .bind(user.id)
    .bind(word_id)
    .fetch_one(&db.pool)
    .await?;
    assert_eq!(rows, 1);

    Ok(())
}

#[tokio::test]
async fn test_ensure_exposure_never_changes_count() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;
    let user = User::create(&db.pool, "Ann", 42).await?;
    let word_id = Word::create(&db.pool, "Мир", "World").await?;

    Exposure::ensure(&db.pool, user.id, word_id).await?;
    assert_eq!(Exposure::times_shown(&db.pool, user.id, word_id).await?, 0);

    Exposure::record(&db.pool, user.id, word_id).await?;
    Exposure::record(&db.pool, user.id, word_id).await?;
    Exposure::ensure(&db.pool, user.id, word_id).await?;
    assert_eq!(Exposure::times_shown(&db.pool, user.id, word_id).await?, 2);

    Ok(())
}

#[tokio::test]
async fn test_draw_unexhausted_excludes_retired_words() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;
    let user = User::create(&db.pool, "Ann", 42).await?;
    let ids = seed_words(&db, 6).await?;

    // Retire the first three words
    for word_id in &ids[..3] {
        for _ in 0..DEFAULT_EXPOSURE_THRESHOLD {
            Exposure::record(&db.pool, user.id, *word_id).await?;
        }
    }
    // One below the threshold stays eligible
    for _ in 0..DEFAULT_EXPOSURE_THRESHOLD - 1 {
        Exposure::record(&db.pool, user.id, ids[3]).await?;
    }

    for _ in 0..10 {
        let drawn = Word::draw_unexhausted(&db.pool, user.id, 4, DEFAULT_EXPOSURE_THRESHOLD).await?;
        assert_eq!(drawn.len(), 3);
        for word in &drawn {
            assert!(!ids[..3].contains(&word.id));
            assert!(Exposure::times_shown(&db.pool, user.id, word.id).await? < DEFAULT_EXPOSURE_THRESHOLD);
        }
    }

    Ok(())
}

#[tokio::test]
async fn test_draw_unexhausted_is_per_user() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;
    let ann = User::create(&db.pool, "Ann", 42).await?;
    let bob = User::create(&db.pool, "Bob", 43).await?;
    let ids = seed_words(&db, 2).await?;

    for _ in 0..DEFAULT_EXPOSURE_THRESHOLD {
        Exposure::record(&db.pool, ann.id, ids[0]).await?;
    }

    let for_ann = Word::draw_unexhausted(&db.pool, ann.id, 4, DEFAULT_EXPOSURE_THRESHOLD).await?;
    let for_bob = Word::draw_unexhausted(&db.pool, bob.id, 4, DEFAULT_EXPOSURE_THRESHOLD).await?;
    assert_eq!(for_ann.len(), 1);
    assert_eq!(for_bob.len(), 2);

    let exhausted = Word::exhausted_texts(&db.pool, ann.id, DEFAULT_EXPOSURE_THRESHOLD).await?;
    assert_eq!(exhausted.len(), 1);
    assert!(exhausted.contains("слово0"));
    assert!(Word::exhausted_texts(&db.pool, bob.id, DEFAULT_EXPOSURE_THRESHOLD).await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_draw_unexhausted_limits_and_shortage() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;
    let user = User::create(&db.pool, "Ann", 42).await?;

    assert!(Word::draw_unexhausted(&db.pool, user.id, 4, DEFAULT_EXPOSURE_THRESHOLD).await?.is_empty());

    seed_words(&db, 10).await?;
    let drawn = Word::draw_unexhausted(&db.pool, user.id, 4, DEFAULT_EXPOSURE_THRESHOLD).await?;
    assert_eq!(drawn.len(), 4);

    let mut ids: Vec<i64> = drawn.iter().map(|w| w.id).collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), 4);

    assert!(Word::draw_unexhausted(&db.pool, user.id, 0, DEFAULT_EXPOSURE_THRESHOLD).await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_all_by_score_orders_descending() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;
    for (external_id, name, score) in [(1, "A", 2), (2, "B", 9), (3, "C", -1), (4, "D", 9)] {
        User::create(&db.pool, name, external_id).await?;
        User::adjust_score(&db.pool, external_id, score, true).await?;
    }

    let users = User::all_by_score(&db.pool).await?;
    let scores: Vec<i64> = users.iter().map(|u| u.score).collect();
    assert_eq!(scores, vec![9, 9, 2, -1]);
    assert_eq!(User::count(&db.pool).await?, 4);

    Ok(())
}
