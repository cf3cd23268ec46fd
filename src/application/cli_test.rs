use anyhow::Result;

use super::build;
use super::parse_matches;

#[tokio::test]
async fn it_does_not_start_chat_after_completions() -> Result<()> {
    let matches = build().try_get_matches_from(["socialsync", "completions", "-s", "bash"])?;
    assert!(!parse_matches(matches).await?);

    return Ok(());
}

#[tokio::test]
async fn it_does_not_start_chat_after_debug_commands() -> Result<()> {
    let matches = build().try_get_matches_from(["socialsync", "debug", "enum-config"])?;
    assert!(!parse_matches(matches).await?);

    return Ok(());
}

#[tokio::test]
async fn it_does_not_start_chat_after_config_default() -> Result<()> {
    let matches = build().try_get_matches_from(["socialsync", "config", "default"])?;
    assert!(!parse_matches(matches).await?);

    return Ok(());
}

#[test]
fn it_requires_a_shell_for_completions() {
    let res = build().try_get_matches_from(["socialsync", "completions"]);
    assert!(res.is_err());
}
