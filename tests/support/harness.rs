use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

use vendor_risk::config::Config;
use vendor_risk::repository::{JsonFileRepository, Store, VendorRepository};
use vendor_risk::storage::{LocalDocumentStore, UrlSigner};

/// TestHarness provides an isolated vendor-risk project in a temporary directory.
///
/// The binary is always run with the global config pointed at a file that does
/// not exist and with the signing key taken from `.vendor-risk/.signing-key`,
/// so the developer's own environment never leaks into a test.
pub struct TestHarness {
    pub dir: TempDir,
    pub binary: PathBuf,
}

impl TestHarness {
    /// Creates an empty directory; run `init` yourself or use [`TestHarness::initialized`].
    pub fn new() -> Self {
        TestHarness {
            dir: TempDir::new().expect("Failed to create temp dir"),
            binary: PathBuf::from(env!("CARGO_BIN_EXE_vendor-risk")),
        }
    }

    /// Creates a project initialized through `vendor-risk init`.
    pub fn initialized() -> Self {
        let harness = Self::new();
        let output = harness.run(&["init", "--name", "Allnex", "--reviewer", "Security Team"]);
        assert!(output.status.success(), "init failed: {}", stderr(&output));
        harness
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Executes the vendor-risk binary with the given arguments in the project.
    pub fn run(&self, args: &[&str]) -> Output {
        Command::new(&self.binary)
            .args(args)
            .current_dir(self.path())
            .env("VENDOR_RISK_GLOBAL_CONFIG", self.path().join("no-global-config.md"))
            .env_remove("VENDOR_RISK_SIGNING_KEY")
            .env_remove("VENDOR_RISK_QUIET")
            .env_remove("RUST_LOG")
            .env("NO_COLOR", "1")
            .output()
            .expect("Failed to run vendor-risk")
    }

    /// Runs a command that must succeed and returns its stdout.
    pub fn run_ok(&self, args: &[&str]) -> String {
        let output = self.run(args);
        assert!(
            output.status.success(),
            "vendor-risk {:?} failed:\nstdout: {}\nstderr: {}",
            args,
            stdout(&output),
            stderr(&output)
        );
        stdout(&output)
    }

    /// Runs a command with `--json` output and parses it.
    pub fn run_json(&self, args: &[&str]) -> serde_json::Value {
        let out = self.run_ok(args);
        serde_json::from_str(&out).unwrap_or_else(|e| panic!("Invalid JSON ({}): {}", e, out))
    }

    /// Writes a file relative to the project root and returns its absolute path.
    pub fn write_file(&self, relative: &str, content: &[u8]) -> PathBuf {
        let path = self.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dir");
        }
        fs::write(&path, content).expect("Failed to write file");
        path
    }

    pub fn repository(&self) -> JsonFileRepository {
        JsonFileRepository::new(
            self.path().join(".vendor-risk/store.json"),
            self.path().join(".vendor-risk/.locks"),
        )
    }

    pub fn store(&self) -> Store {
        self.repository().load().expect("Failed to load store")
    }
}

pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

/// A library-level project: a config, a JSON store, and a document store,
/// all rooted in one temporary directory.
pub struct LibraryProject {
    pub dir: TempDir,
    pub config: Config,
    pub repo: JsonFileRepository,
    pub documents: LocalDocumentStore,
}

impl LibraryProject {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let mut config = Config::with_organization("Allnex");
        config.storage.uploads_dir = dir.path().join("uploads");

        let repo = JsonFileRepository::new(dir.path().join("store.json"), dir.path().join(".locks"));
        let signer = UrlSigner::new(b"integration-test-key").expect("Failed to create signer");
        let documents =
            LocalDocumentStore::new(&config.storage, signer).expect("Failed to create document store");

        LibraryProject {
            dir,
            config,
            repo,
            documents,
        }
    }

    /// Writes a file into the project directory and returns its path.
    pub fn file(&self, name: &str, content: &[u8]) -> PathBuf {
        let path = self.dir.path().join(name);
        fs::write(&path, content).expect("Failed to write file");
        path
    }
}
