use foodgram_shared::Error;
use temp_dir::TempDir;

mod helpers;

#[tokio::test]
async fn validate_unique_emails() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let path = dir.child("db.sqlite3");
    let state = helpers::setup_test_state(path).await?;
    let cmd = foodgram_user::Command::new(state);
    cmd.register(helpers::register_input("john")).await?;

    let mut input = helpers::register_input("johnny");
    input.email = "JOHN@foodgram.localhost".to_owned();
    let user_2 = cmd.register(input).await;

    assert_eq!(user_2.unwrap_err().to_string(), "Email already exists");

    Ok(())
}

#[tokio::test]
async fn validate_unique_usernames() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let path = dir.child("db.sqlite3");
    let state = helpers::setup_test_state(path).await?;
    let cmd = foodgram_user::Command::new(state);
    cmd.register(helpers::register_input("john")).await?;

    let mut input = helpers::register_input("John");
    input.email = "other@foodgram.localhost".to_owned();
    let user_2 = cmd.register(input).await;

    assert_eq!(user_2.unwrap_err().to_string(), "Username already used");

    Ok(())
}

#[tokio::test]
async fn reject_invalid_input() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let path = dir.child("db.sqlite3");
    let state = helpers::setup_test_state(path).await?;
    let cmd = foodgram_user::Command::new(state);

    let mut input = helpers::register_input("john");
    input.username = "john doe!".to_owned();
    assert!(matches!(
        cmd.register(input).await.unwrap_err(),
        Error::Validate(_)
    ));

    let mut input = helpers::register_input("john");
    input.email = "not-an-email".to_owned();
    assert!(matches!(
        cmd.register(input).await.unwrap_err(),
        Error::Validate(_)
    ));

    let mut input = helpers::register_input("john");
    input.password = "short".to_owned();
    assert!(matches!(
        cmd.register(input).await.unwrap_err(),
        Error::Validate(_)
    ));

    let resp = cmd.register(helpers::register_input("me")).await;
    assert_eq!(resp.unwrap_err().to_string(), "Username \"me\" is reserved");

    Ok(())
}
