use anyhow::Result;
use pretty_assertions::assert_eq;

use crate::{CliTest, run};

#[test]
fn test_count_per_locale() -> Result<()> {
    let test = CliTest::with_file(
        "locale/de/app.po",
        concat!(
            "msgid \"\"\n",
            "msgstr \"\"\n",
            "\"Language: de\\n\"\n",
            "\n",
            "msgid \"Hello\"\n",
            "msgstr \"Hallo\"\n",
            "\n",
            "msgid \"Goodbye\"\n",
            "msgstr \"Tschüss\"\n",
            "\n",
            "msgid \"Untranslated\"\n",
            "msgstr \"\"\n",
        ),
    )?;
    test.write_file(
        "locale/fr/app.po",
        "msgid \"Hello\"\nmsgstr \"Bonjour\"\n",
    )?;

    let (code, stdout, stderr) = run(&mut test.count_command())?;

    assert_eq!(code, 0, "stderr: {stderr}");
    assert!(stdout.contains("de: 2 strings"), "stdout: {stdout}");
    assert!(stdout.contains("fr: 1 strings"), "stdout: {stdout}");
    assert!(
        stdout.contains("Total: 3 translated strings"),
        "stdout: {stdout}"
    );

    Ok(())
}

#[test]
fn test_count_missing_locale_dir_fails() -> Result<()> {
    let test = CliTest::new()?;

    let (code, _, stderr) = run(&mut test.count_command())?;

    assert_eq!(code, 2);
    assert!(stderr.contains("does not exist"), "stderr: {stderr}");

    Ok(())
}

#[test]
fn test_count_ignores_other_extensions() -> Result<()> {
    let test = CliTest::with_file(
        "locale/de/app.po",
        "msgid \"Hello\"\nmsgstr \"Hallo\"\n",
    )?;
    test.write_file("locale/de/app.pot", "msgid \"Hello\"\nmsgstr \"Hallo\"\n")?;
    test.write_file("locale/de/notes.txt", "not a catalog\n")?;

    let (code, stdout, _) = run(&mut test.count_command())?;

    assert_eq!(code, 0);
    assert!(
        stdout.contains("Total: 1 translated strings"),
        "stdout: {stdout}"
    );

    Ok(())
}
