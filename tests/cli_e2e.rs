use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

struct Env {
    dir: TempDir,
}

impl Env {
    fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    fn db(&self) -> std::path::PathBuf {
        self.dir.path().join("db.json")
    }

    /// `nestkv <db> <args...>` isolated from the user's config.
    fn cmd(&self, args: &[&str]) -> Command {
        let mut cmd = Command::cargo_bin("nestkv").unwrap();
        cmd.env("NESTKV_CONFIG", self.dir.path().join("config.json"))
            .env("NO_COLOR", "1")
            .env_remove("NESTKV_LOG")
            .arg(self.db())
            .args(args);
        cmd
    }

    fn ok(&self, args: &[&str]) {
        self.cmd(args).assert().success();
    }
}

#[test]
fn listing_a_missing_database_fails() {
    let env = Env::new();
    env.cmd(&["buckets"])
        .assert()
        .failure()
        .stderr(predicate::str::starts_with("Error: database"))
        .stderr(predicate::str::contains("does not exist"));
    assert!(!env.db().exists());
}

#[test]
fn add_creates_nested_buckets() {
    let env = Env::new();
    env.cmd(&["add", "-b", "foo", "-b", "bar"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Bucket ready: foo -> bar"));

    env.cmd(&["buckets"]).assert().success().stdout("foo\n");
    env.cmd(&["buckets", "-b", "foo"])
        .assert()
        .success()
        .stdout("bar\n");
}

#[test]
fn set_from_argument_and_get_raw() {
    let env = Env::new();
    env.ok(&["add", "-b", "foo", "-b", "bar"]);
    env.ok(&["set", "-b", "foo", "-b", "bar", "-k", "buz", "0x[010203]"]);

    let output = env
        .cmd(&["get", "-b", "foo", "-b", "bar", "-k", "buz"])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(output.stdout, vec![1, 2, 3]);

    env.cmd(&["get", "-b", "foo", "-b", "bar", "-k", "buz", "--format", "HEX"])
        .assert()
        .success()
        .stdout("010203\n");
}

#[test]
fn set_reads_stdin_when_data_is_absent() {
    let env = Env::new();
    env.cmd(&["set", "-k", "file.name"])
        .write_stdin("hello\x00world")
        .assert()
        .success();

    let output = env.cmd(&["get", "-k", "file.name"]).output().unwrap();
    assert_eq!(output.stdout, b"hello\x00world");
}

#[test]
fn binary_key_names_are_stringified() {
    let env = Env::new();
    env.ok(&["set", "-k", "[a, 0x[0000]]", "v"]);
    env.ok(&["set", "-k", "foo bar", "v"]);

    env.cmd(&["keys", "--format", "stringify"])
        .assert()
        .success()
        .stdout("[a, 0x[0000]]\n'foo bar'\n");
    env.cmd(&["keys", "--format", "text"])
        .assert()
        .success()
        .stdout("[a, 0x[0000]]\nfoo bar\n");
}

#[test]
fn get_without_key_streams_records() {
    let env = Env::new();
    env.ok(&["add", "-b", "files"]);
    env.ok(&["set", "-b", "files", "-k", "a", "1"]);
    env.ok(&["set", "-b", "files", "-k", "b", "2"]);

    env.cmd(&["get", "-b", "files"])
        .assert()
        .success()
        .stdout("a\t1\nb\t2\n");
    env.cmd(&["get", "-b", "files", "--match", "^b", "--output", "json", "--format", "text"])
        .assert()
        .success()
        .stdout("{\"key\":\"b\",\"value\":\"2\"}\n");
}

#[test]
fn missing_key_prints_nothing() {
    let env = Env::new();
    env.ok(&["add", "-b", "foo"]);
    env.cmd(&["get", "-b", "foo", "-k", "nope"])
        .assert()
        .success()
        .stdout("");
}

#[test]
fn keys_skip_buckets_and_honor_match() {
    let env = Env::new();
    env.ok(&["add", "-b", "sub"]);
    env.ok(&["set", "-k", "block", "x"]);
    env.ok(&["set", "-k", "able", "x"]);

    env.cmd(&["keys"])
        .assert()
        .success()
        .stdout("able\nblock\n");
    env.cmd(&["keys", "--match", "^bl"])
        .assert()
        .success()
        .stdout("block\n");
}

#[test]
fn missing_bucket_names_the_path() {
    let env = Env::new();
    env.ok(&["add", "-b", "foo"]);
    env.cmd(&["buckets", "-b", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "invalid path, root bucket does not contain bucket nope",
        ));
    env.cmd(&["keys", "-b", "foo", "-b", "0x[00]"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "invalid path, bucket foo does not contain bucket 0x[00]",
        ));
}

#[test]
fn delete_key_and_bucket() {
    let env = Env::new();
    env.ok(&["add", "-b", "a", "-b", "b"]);
    env.ok(&["set", "-b", "a", "-k", "k", "v"]);

    env.cmd(&["delete", "-b", "a", "-k", "k"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted key k"));
    env.cmd(&["keys", "-b", "a"]).assert().success().stdout("");

    env.ok(&["delete", "-b", "a", "-b", "b"]);
    env.cmd(&["buckets", "-b", "a"]).assert().success().stdout("");

    env.cmd(&["delete", "-b", "a", "-b", "b"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("bucket b does not exist"));
}

#[test]
fn unsupported_format_is_rejected_before_opening() {
    let env = Env::new();
    env.cmd(&["keys", "--format", "base64"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported format"));
}

#[test]
fn read_only_refuses_writes() {
    let env = Env::new();
    env.ok(&["add", "-b", "foo"]);
    env.cmd(&["--read-only", "add", "-b", "bar"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("read-only"));
    env.cmd(&["--read-only", "buckets"])
        .assert()
        .success()
        .stdout("foo\n");
}

#[test]
fn must_exist_config_blocks_creation() {
    let env = Env::new();
    std::fs::write(env.dir.path().join("config.json"), r#"{"must_exist": true}"#).unwrap();
    env.cmd(&["add", "-b", "foo"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));
    assert!(!env.db().exists());
}

#[test]
fn stat_and_info() {
    let env = Env::new();
    env.ok(&["add", "-b", "a", "-b", "b"]);
    env.ok(&["set", "-b", "a", "-k", "k", "value"]);

    env.cmd(&["stat", "--output", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"key_n\":1"))
        .stdout(predicate::str::contains("\"bucket_n\":2"));
    env.cmd(&["stat", "-b", "a"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Value bytes:  5"));
    env.cmd(&["info"])
        .assert()
        .success()
        .stdout("root (0 keys)\n  a (1 key)\n    b (0 keys)\n");
}

#[test]
fn invalid_pattern_is_reported() {
    let env = Env::new();
    env.ok(&["add", "-b", "foo"]);
    env.cmd(&["buckets", "--match", "("])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid match pattern"));
}
