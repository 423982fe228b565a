use anyhow::Result;
use pretty_assertions::assert_eq;

use crate::{CliTest, run};

#[test]
fn test_init_creates_config() -> Result<()> {
    let test = CliTest::new()?;

    let (code, stdout, _) = run(test.command().arg("init"))?;

    assert_eq!(code, 0);
    assert!(stdout.contains("Created .poscanrc.json"), "stdout: {stdout}");

    let config = test.read_file(".poscanrc.json")?;
    assert!(config.contains("localeRoot"), "config: {config}");
    assert!(config.contains("catalogExtension"), "config: {config}");

    Ok(())
}

#[test]
fn test_init_refuses_to_overwrite() -> Result<()> {
    let test = CliTest::with_file(".poscanrc.json", "{}")?;

    let (code, _, stderr) = run(test.command().arg("init"))?;

    assert_eq!(code, 2);
    assert!(stderr.contains("already exists"), "stderr: {stderr}");

    Ok(())
}
