use anyhow::Result;
use pretty_assertions::assert_eq;

use crate::{CliTest, run};

const CATALOG: &str = concat!(
    "msgid \"\"\n",
    "msgstr \"\"\n",
    "\"Language: de\\n\"\n",
    "\n",
    "msgid \"Hello\"\n",
    "msgstr \"Hallo\"\n",
    "\n",
    "msgid \"Goodbye\"\n",
    "msgstr \"Tschüss\"\n",
);

const DIFF: &str = concat!(
    "diff --git a/locale/de/app.po b/locale/de/app.po\n",
    "--- a/locale/de/app.po\n",
    "+++ b/locale/de/app.po\n",
    "@@ -5,2 +5,2 @@\n",
    " msgid \"Hello\"\n",
    "-msgstr \"\"\n",
    "+msgstr \"Hallo\"\n",
);

#[test]
fn test_scan_reports_changed_entry() -> Result<()> {
    let test = CliTest::with_file("locale/de/app.po", CATALOG)?;
    test.write_file("changes.diff", DIFF)?;

    let (code, stdout, stderr) = run(test.scan_command().args(["--diff", "changes.diff"]))?;

    assert_eq!(code, 0, "stderr: {stderr}");
    assert!(stdout.contains("changed: \"Hello\""), "stdout: {stdout}");
    assert!(stdout.contains("locale/de/app.po:5"), "stdout: {stdout}");
    assert!(
        stdout.contains("translation (de): \"Hallo\""),
        "stdout: {stdout}"
    );
    assert!(
        stdout.contains("Found 1 changed translation in 1 catalog file."),
        "stdout: {stdout}"
    );
    // The untouched entry is not reported.
    assert!(!stdout.contains("Goodbye"), "stdout: {stdout}");

    Ok(())
}

#[test]
fn test_scan_json_output() -> Result<()> {
    let test = CliTest::with_file("locale/de/app.po", CATALOG)?;
    test.write_file("changes.diff", DIFF)?;

    let (code, stdout, stderr) = run(test
        .scan_command()
        .args(["--diff", "changes.diff", "--format", "json"]))?;

    assert_eq!(code, 0, "stderr: {stderr}");
    let report: serde_json::Value = serde_json::from_str(&stdout)?;
    assert_eq!(report["filesScanned"], 1);

    let changed = report["changed"]
        .as_array()
        .expect("changed array in report");
    assert_eq!(changed.len(), 1);
    assert_eq!(changed[0]["msgid"], "Hello");
    assert_eq!(changed[0]["msgstr"], "Hallo");
    assert_eq!(changed[0]["locale"], "de");
    assert_eq!(changed[0]["fuzzy"], false);
    assert_eq!(changed[0]["line"], 5);
    assert_eq!(
        changed[0]["changedFields"],
        serde_json::json!(["msgstr"]),
    );

    Ok(())
}

#[test]
fn test_scan_falls_back_to_diff_reconstruction() -> Result<()> {
    // No working tree copy of the file: the full entry is visible in the
    // hunk, so scan reconstructs it from the diff's own lines.
    let test = CliTest::new()?;
    let diff = concat!(
        "diff --git a/locale/fr/app.po b/locale/fr/app.po\n",
        "--- a/locale/fr/app.po\n",
        "+++ b/locale/fr/app.po\n",
        "@@ -1,2 +1,2 @@\n",
        " msgid \"Hello\"\n",
        "-msgstr \"\"\n",
        "+msgstr \"Bonjour\"\n",
    );
    test.write_file("changes.diff", diff)?;

    let (code, stdout, stderr) = run(test
        .scan_command()
        .args(["--diff", "changes.diff", "--verbose"]))?;

    assert_eq!(code, 0, "stderr: {stderr}");
    assert!(stdout.contains("changed: \"Hello\""), "stdout: {stdout}");
    assert!(
        stdout.contains("translation (fr): \"Bonjour\""),
        "stdout: {stdout}"
    );
    assert!(
        stderr.contains("reconstructed from diff"),
        "stderr: {stderr}"
    );

    Ok(())
}

#[test]
fn test_scan_ignores_files_outside_locale_root() -> Result<()> {
    let test = CliTest::new()?;
    let diff = concat!(
        "diff --git a/src/gui.py b/src/gui.py\n",
        "--- a/src/gui.py\n",
        "+++ b/src/gui.py\n",
        "@@ -1,1 +1,1 @@\n",
        "-old = 1\n",
        "+new = 2\n",
    );
    test.write_file("changes.diff", diff)?;

    let (code, stdout, _) = run(test.scan_command().args(["--diff", "changes.diff"]))?;

    assert_eq!(code, 0);
    assert!(
        stdout.contains("Found 0 changed translations in 0 catalog files."),
        "stdout: {stdout}"
    );

    Ok(())
}

#[test]
fn test_scan_empty_diff() -> Result<()> {
    let test = CliTest::with_file("changes.diff", "\n")?;

    let (code, stdout, _) = run(test.scan_command().args(["--diff", "changes.diff"]))?;

    assert_eq!(code, 0);
    assert!(
        stdout.contains("Empty diff, nothing to check."),
        "stdout: {stdout}"
    );

    Ok(())
}

#[test]
fn test_scan_malformed_hunk_exits_nonzero() -> Result<()> {
    let test = CliTest::new()?;
    let diff = concat!(
        "diff --git a/locale/de/app.po b/locale/de/app.po\n",
        "--- a/locale/de/app.po\n",
        "+++ b/locale/de/app.po\n",
        "@@ -1,5 +1,5 @@\n",
        " msgid \"Hello\"\n",
    );
    test.write_file("changes.diff", diff)?;

    let (code, _, stderr) = run(test.scan_command().args(["--diff", "changes.diff"]))?;

    assert_eq!(code, 1);
    assert!(stderr.contains("warning"), "stderr: {stderr}");

    Ok(())
}

#[test]
fn test_scan_translated_only_skips_emptied_msgstr() -> Result<()> {
    let catalog = "msgid \"Hello\"\nmsgstr \"\"\n";
    let diff = concat!(
        "diff --git a/locale/de/app.po b/locale/de/app.po\n",
        "--- a/locale/de/app.po\n",
        "+++ b/locale/de/app.po\n",
        "@@ -1,2 +1,2 @@\n",
        " msgid \"Hello\"\n",
        "-msgstr \"Hallo\"\n",
        "+msgstr \"\"\n",
    );
    let test = CliTest::with_file("locale/de/app.po", catalog)?;
    test.write_file("changes.diff", diff)?;

    let (code, stdout, _) = run(test
        .scan_command()
        .args(["--diff", "changes.diff", "--translated-only"]))?;
    assert_eq!(code, 0);
    assert!(
        stdout.contains("Found 0 changed translations"),
        "stdout: {stdout}"
    );

    // Without the flag the emptied entry is still reported.
    let (code, stdout, _) = run(test.scan_command().args(["--diff", "changes.diff"]))?;
    assert_eq!(code, 0);
    assert!(
        stdout.contains("Found 1 changed translation"),
        "stdout: {stdout}"
    );
    assert!(stdout.contains("translation (de): empty"), "stdout: {stdout}");

    Ok(())
}

#[test]
fn test_scan_respects_config_locale_root() -> Result<()> {
    let test = CliTest::with_file(
        "po/de/app.po",
        "msgid \"Hello\"\nmsgstr \"Hallo\"\n",
    )?;
    test.write_file(".poscanrc.json", r#"{ "localeRoot": "po" }"#)?;
    let diff = concat!(
        "diff --git a/po/de/app.po b/po/de/app.po\n",
        "--- a/po/de/app.po\n",
        "+++ b/po/de/app.po\n",
        "@@ -2,1 +2,1 @@\n",
        "-msgstr \"\"\n",
        "+msgstr \"Hallo\"\n",
    );
    test.write_file("changes.diff", diff)?;

    let (code, stdout, stderr) = run(test.scan_command().args(["--diff", "changes.diff"]))?;

    assert_eq!(code, 0, "stderr: {stderr}");
    assert!(stdout.contains("changed: \"Hello\""), "stdout: {stdout}");

    Ok(())
}

#[test]
fn test_scan_without_diff_input_fails() -> Result<()> {
    let test = CliTest::new()?;

    let (code, _, stderr) = run(&mut test.scan_command())?;

    assert_eq!(code, 2);
    assert!(stderr.contains("--diff"), "stderr: {stderr}");

    Ok(())
}

#[test]
fn test_help() -> Result<()> {
    let test = CliTest::new()?;

    let (code, stdout, _) = run(test.command().arg("--help"))?;

    assert_eq!(code, 0);
    assert!(stdout.contains("scan"), "stdout: {stdout}");
    assert!(stdout.contains("count"), "stdout: {stdout}");

    Ok(())
}
