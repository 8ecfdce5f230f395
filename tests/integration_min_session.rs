// Drives the compiled binary through a pseudo terminal.
// Unix only and ignored by default; run with
// `cargo test --test integration_min_session -- --ignored`.

#![cfg(unix)]

use std::time::Duration;

use expectrl::{spawn, Eof};

#[test]
#[ignore]
fn minimal_session_completes_and_exits() -> Result<(), Box<dyn std::error::Error>> {
    let data_dir = tempfile::tempdir()?;
    let bin = assert_cmd::cargo::cargo_bin("typerank");
    let cmd = format!("{} --data-dir {} -p hi", bin.display(), data_dir.path().display());

    let mut p = spawn(cmd)?;

    std::thread::sleep(Duration::from_millis(200));
    p.send("h")?;
    std::thread::sleep(Duration::from_millis(100));
    p.send("i")?;
    std::thread::sleep(Duration::from_millis(200));

    // ESC quits from the results screen
    p.send("\x1b")?;
    p.expect(Eof)?;

    assert!(data_dir.path().join("typerank.log").exists());
    Ok(())
}
