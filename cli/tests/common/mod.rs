use std::ffi::OsString;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use std::time::Duration;
use tokio::process::Command;

pub static AWAKE_BINARY: LazyLock<PathBuf> =
    LazyLock::new(|| PathBuf::from(env!("CARGO_BIN_EXE_awake")));

/// Build an `awake` command whose `PATH` starts with `dir`.
pub fn awake(dir: &Path) -> Command {
    let mut path = OsString::from(dir.as_os_str());
    path.push(":/usr/bin:/bin");

    let mut cmd = Command::new(&*AWAKE_BINARY);
    cmd.env("PATH", path)
        .env_remove("AWAKE_BACKGROUND")
        .env_remove("RUST_LOG")
        .kill_on_drop(true);
    cmd
}

/// Write a fake `caffeinate` into `dir`.
///
/// It records `<args>|<AWAKE_BACKGROUND>` into `record` (atomically, via a
/// rename) and then either exits or, with `linger`, sleeps until killed.
#[cfg(unix)]
pub fn fake_caffeinate(dir: &Path, record: &Path, linger: bool) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join("caffeinate");
    let record = record.display();
    let mut script = format!(
        "#!/bin/sh\necho \"$@|$AWAKE_BACKGROUND\" > '{record}.tmp'\nmv '{record}.tmp' '{record}'\n"
    );
    if linger {
        script.push_str("exec sleep 30\n");
    }

    {
        let mut file = File::create(&path).unwrap();
        file.write_all(script.as_bytes()).unwrap();
        file.sync_all().unwrap();
    }

    let mut perms = fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms).unwrap();

    path
}

/// Poll until `path` exists and return its contents.
pub async fn wait_for_file(path: &Path, timeout: Duration) -> String {
    let deadline = tokio::time::Instant::now() + timeout;
    loop {
        if let Ok(contents) = fs::read_to_string(path) {
            return contents;
        }
        if tokio::time::Instant::now() >= deadline {
            panic!("{} was not written within {:?}", path.display(), timeout);
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
}
