use foodgram_shared::PageArgs;
use temp_dir::TempDir;

mod helpers;

#[tokio::test]
async fn test_subscriptions_with_recipes() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let path = dir.child("db.sqlite3");
    let state = helpers::setup_test_state(path).await?;
    let john = helpers::create_user(&state, "john").await?;
    let albert = helpers::create_user(&state, "albert").await?;
    let zoe = helpers::create_user(&state, "zoe").await?;

    for name in ["bread", "latte", "omelette"] {
        helpers::create_recipe(&state, albert, name, vec![("flour", 1)]).await?;
    }

    let users = foodgram_user::Command::new(state.state.clone());
    users.subscribe(john, albert).await?;
    users.subscribe(john, zoe).await?;

    let page = state
        .query
        .subscriptions(john, PageArgs::default(), Some(2))
        .await?;
    assert_eq!(page.count, 2);

    let first = &page.results[0];
    assert_eq!(first.profile.username, "albert");
    assert!(first.profile.is_subscribed);
    assert_eq!(first.recipes_count, 3);
    assert_eq!(first.recipes.len(), 2);

    let second = &page.results[1];
    assert_eq!(second.profile.username, "zoe");
    assert_eq!(second.recipes_count, 0);
    assert!(second.recipes.is_empty());

    let author = state.query.author(albert, Some(john), None).await?.unwrap();
    assert_eq!(author.recipes.len(), 3);
    assert!(author.profile.is_subscribed);

    let json = serde_json::to_value(&author)?;
    assert_eq!(json["username"], "albert");
    assert_eq!(json["recipes_count"], 3);

    assert!(state.query.author(zoe + 1, None, None).await?.is_none());

    Ok(())
}
