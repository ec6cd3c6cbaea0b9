#![cfg(unix)]

use cascade::exec::shell_command;
use cascade::{Engine, EngineError, RuleBody};

type TestResult = Result<(), Box<dyn std::error::Error>>;

#[tokio::test]
async fn successful_command_completes_the_rule() -> TestResult {
    let engine = Engine::new();
    engine.rule("ok", shell_command("ok", "true"));

    engine.run("ok").await?;
    Ok(())
}

#[tokio::test]
async fn failing_command_fails_the_invocation() {
    let engine = Engine::new();
    engine.rule("broken", shell_command("broken", "exit 3"));

    let err = engine.run("broken").await.unwrap_err();
    match err {
        EngineError::ActionFailed { rule, source } => {
            assert_eq!(rule, "broken");
            assert!(source.to_string().contains("exited with code 3"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn command_output_is_observable_through_the_filesystem() -> TestResult {
    let dir = tempfile::tempdir()?;
    let marker = dir.path().join("ran.txt");
    let cmd = format!("echo done > {}", marker.display());

    let engine = Engine::new();
    engine.rule("touch", shell_command("touch", &cmd));
    engine.rule("check", {
        let marker = marker.clone();
        RuleBody::immediate(move || {
            anyhow::ensure!(marker.exists(), "marker file missing");
            Ok(())
        })
    });

    // The command must have fully exited before the next stage runs.
    engine.run("touch > check").await?;

    assert!(marker.exists());
    Ok(())
}
