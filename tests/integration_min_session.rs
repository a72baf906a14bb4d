// Drives the compiled binary through a pseudo terminal.
//
// Requires a TTY; ignored by default.
// Run manually via: `cargo test --test integration_min_session -- --ignored`.

#![cfg(unix)]

use std::time::Duration;

use expectrl::{spawn, Eof};

#[test]
#[ignore]
fn tui_session_completes_and_exits() -> Result<(), Box<dyn std::error::Error>> {
    let home = tempfile::tempdir()?;
    let bin = assert_cmd::cargo::cargo_bin("tango");
    let cmd = format!(
        "env HOME={home} XDG_CONFIG_HOME={home}/.config {bin} -s 0 -u 1",
        home = home.path().display(),
        bin = bin.display()
    );

    let mut p = spawn(cmd)?;
    std::thread::sleep(Duration::from_millis(200));

    // Confirm the prefilled window, then answer the only word.
    p.send("\r")?;
    std::thread::sleep(Duration::from_millis(100));
    p.send("水\r")?;
    std::thread::sleep(Duration::from_millis(200));

    p.send("q")?;
    p.expect(Eof)?;
    Ok(())
}
