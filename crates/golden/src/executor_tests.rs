#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
use super::*;

use std::collections::HashMap;
use std::future::Future;
use std::path::Path;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use tempfile::TempDir;

use crate::runner::CapturedOutput;
use crate::suite::Configuration;

#[derive(Clone, Debug, PartialEq, Eq)]
enum Event {
    Built(Configuration),
    Ran(PathBuf),
}

type Log = Arc<Mutex<Vec<Event>>>;

struct FakeBuilder {
    log: Log,
    fail_on: Option<Configuration>,
}

impl Builder for FakeBuilder {
    fn ensure<'a>(
        &'a self,
        configuration: Configuration,
    ) -> Pin<Box<dyn Future<Output = Result<(), HarnessError>> + Send + 'a>> {
        Box::pin(async move {
            self.log.lock().unwrap().push(Event::Built(configuration));
            if self.fail_on == Some(configuration) {
                return Err(HarnessError::Build {
                    configuration,
                    stderr: "link error\n".to_string(),
                });
            }
            Ok(())
        })
    }
}

/// Interpreter double whose stdout per file can be changed between runs
struct FakeRunner {
    log: Log,
    stdout: Mutex<HashMap<PathBuf, String>>,
}

impl FakeRunner {
    fn set(&self, test: &Path, stdout: &str) {
        self.stdout
            .lock()
            .unwrap()
            .insert(test.to_path_buf(), stdout.to_string());
    }
}

impl Runner for FakeRunner {
    fn run<'a>(
        &'a self,
        test: &'a Path,
    ) -> Pin<Box<dyn Future<Output = Result<CapturedOutput, HarnessError>> + Send + 'a>> {
        Box::pin(async move {
            self.log.lock().unwrap().push(Event::Ran(test.to_path_buf()));
            let stdout = self
                .stdout
                .lock()
                .unwrap()
                .get(test)
                .cloned()
                .unwrap_or_default();
            Ok(CapturedOutput {
                stdout,
                stderr: String::new(),
                exit_code: Some(0),
            })
        })
    }
}

struct Harness {
    dir: TempDir,
    log: Log,
    builder: FakeBuilder,
    runner: FakeRunner,
    normalizer: Normalizer,
    store: BaselineStore,
}

impl Harness {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("tests/dbg")).unwrap();
        let log: Log = Arc::default();
        Self {
            dir,
            builder: FakeBuilder {
                log: log.clone(),
                fail_on: None,
            },
            runner: FakeRunner {
                log: log.clone(),
                stdout: Mutex::default(),
            },
            log,
            normalizer: Normalizer::new(),
            store: BaselineStore::default(),
        }
    }

    fn file(&self, rel: &str, stdout: &str) -> TestFile {
        let path = self.dir.path().join(rel);
        std::fs::write(&path, "").unwrap();
        self.runner.set(&path, stdout);
        TestFile::classify(path, Path::new("tests/dbg"), self.dir.path())
    }

    async fn run(&self, files: &[TestFile], mode: Mode, policy: MissingBaselinePolicy) -> BatchOutcome {
        self.try_run(files, mode, policy).await.unwrap()
    }

    async fn try_run(
        &self,
        files: &[TestFile],
        mode: Mode,
        policy: MissingBaselinePolicy,
    ) -> Result<BatchOutcome, HarnessError> {
        let options = ExecutorOptions {
            missing_baseline: policy,
            ..ExecutorOptions::default()
        };
        BatchExecutor::new(&self.builder, &self.runner, &self.normalizer, &self.store, options)
            .execute(files, mode)
            .await
    }

    fn events(&self) -> Vec<Event> {
        self.log.lock().unwrap().clone()
    }

    fn clear_events(&self) {
        self.log.lock().unwrap().clear();
    }

    fn baseline(&self, test: &TestFile) -> String {
        std::fs::read_to_string(self.store.path_for(test.path())).unwrap()
    }
}

#[tokio::test]
async fn bake_writes_normalized_baseline() {
    let h = Harness::new();
    let test = h.file("tests/obj.st", "Obj-1a2b3c\n");

    let outcome = h.run(&[test.clone()], Mode::Bake, MissingBaselinePolicy::Autobake).await;

    assert_eq!(h.baseline(&test), "STDOUT:\nObj-hash\nSTDERR:\n");
    assert_eq!(outcome.baked, vec![h.store.path_for(test.path())]);
    assert_eq!(outcome.total, 1);
    assert!(outcome.is_clean());
}

#[tokio::test]
async fn changed_hash_still_passes() {
    let h = Harness::new();
    let test = h.file("tests/obj.st", "Obj-1a2b3c\n");
    h.run(&[test.clone()], Mode::Bake, MissingBaselinePolicy::Autobake).await;

    h.runner.set(test.path(), "Obj-9f8e7d\n");
    let outcome = h.run(&[test], Mode::Test, MissingBaselinePolicy::Strict).await;

    assert!(outcome.is_clean());
    assert_eq!(outcome.passed(), 1);
}

#[tokio::test]
async fn baking_twice_is_idempotent() {
    let h = Harness::new();
    let test = h.file("tests/a.st", "List-00ff [1, 2]\n");

    h.run(&[test.clone()], Mode::Bake, MissingBaselinePolicy::Autobake).await;
    let first = h.baseline(&test);
    h.runner.set(test.path(), "List-abcd [1, 2]\n");
    h.run(&[test.clone()], Mode::Bake, MissingBaselinePolicy::Autobake).await;

    assert_eq!(h.baseline(&test), first);
}

#[tokio::test]
async fn unchanged_rerun_reports_no_failures() {
    let h = Harness::new();
    let files = vec![
        h.file("tests/a.st", "1\n"),
        h.file("tests/dbg/b.st", "2\n"),
        h.file("tests/c.st", "3\n"),
    ];
    h.run(&files, Mode::Bake, MissingBaselinePolicy::Autobake).await;

    let outcome = h.run(&files, Mode::Test, MissingBaselinePolicy::Strict).await;
    assert_eq!(outcome.total, 3);
    assert_eq!(outcome.passed(), 3);
    assert_eq!(outcome.failed(), 0);
}

#[tokio::test]
async fn regression_yields_exactly_one_failure() {
    let h = Harness::new();
    let stable = h.file("tests/stable.st", "same\n");
    let changed = h.file("tests/changed.st", "before\n");
    let files = vec![stable, changed.clone()];
    h.run(&files, Mode::Bake, MissingBaselinePolicy::Autobake).await;

    h.runner.set(changed.path(), "after\n");
    let outcome = h.run(&files, Mode::Test, MissingBaselinePolicy::Autobake).await;

    assert_eq!(
        outcome.failures,
        vec![FailureRecord {
            test: changed.path().to_path_buf(),
            expected: "STDOUT:\nbefore\nSTDERR:\n".to_string(),
            actual: "STDOUT:\nafter\nSTDERR:\n".to_string(),
        }]
    );
    assert_eq!(outcome.passed(), 1);
    // Test mode never rewrites an existing baseline.
    assert_eq!(h.baseline(&changed), "STDOUT:\nbefore\nSTDERR:\n");
}

#[tokio::test]
async fn every_test_is_evaluated_after_a_failure() {
    let h = Harness::new();
    let files: Vec<_> = (0..4)
        .map(|i| h.file(&format!("tests/t{i}.st"), "old\n"))
        .collect();
    h.run(&files, Mode::Bake, MissingBaselinePolicy::Autobake).await;
    for f in &files {
        h.runner.set(f.path(), "new\n");
    }
    h.clear_events();

    let outcome = h.run(&files, Mode::Test, MissingBaselinePolicy::Autobake).await;
    assert_eq!(outcome.failed(), 4);
    let runs = h.events().iter().filter(|e| matches!(e, Event::Ran(_))).count();
    assert_eq!(runs, 4);
}

#[tokio::test]
async fn autobake_creates_missing_baseline() {
    let h = Harness::new();
    let test = h.file("tests/new.st", "fresh\n");

    let outcome = h.run(&[test.clone()], Mode::Test, MissingBaselinePolicy::Autobake).await;

    assert!(h.store.exists(test.path()));
    assert_eq!(h.baseline(&test), "STDOUT:\nfresh\nSTDERR:\n");
    assert!(outcome.failures.is_empty());
    assert!(outcome.errors.is_empty());
    assert_eq!(outcome.passed(), 1);
    assert_eq!(outcome.baked.len(), 1);
}

#[tokio::test]
async fn strict_policy_records_error_entry() {
    let h = Harness::new();
    let test = h.file("tests/new.st", "fresh\n");
    let other = h.file("tests/old.st", "kept\n");
    h.run(&[other.clone()], Mode::Bake, MissingBaselinePolicy::Autobake).await;

    let outcome = h
        .run(&[test.clone(), other], Mode::Test, MissingBaselinePolicy::Strict)
        .await;

    assert!(!h.store.exists(test.path()));
    assert_eq!(
        outcome.errors,
        vec![MissingBaseline {
            test: test.path().to_path_buf()
        }]
    );
    assert_eq!(outcome.failed(), 0);
    assert_eq!(outcome.unbaked(), 1);
    assert_eq!(outcome.passed(), 1);
    assert!(!outcome.is_clean());
}

#[tokio::test]
async fn builds_once_per_configuration_debug_first() {
    let h = Harness::new();
    let files = vec![
        h.file("tests/r1.st", ""),
        h.file("tests/dbg/d1.st", ""),
        h.file("tests/r2.st", ""),
        h.file("tests/dbg/d2.st", ""),
    ];

    h.run(&files, Mode::Bake, MissingBaselinePolicy::Autobake).await;

    let path = |rel: &str| h.dir.path().join(rel);
    assert_eq!(
        h.events(),
        vec![
            Event::Built(Configuration::Debug),
            Event::Ran(path("tests/dbg/d1.st")),
            Event::Ran(path("tests/dbg/d2.st")),
            Event::Built(Configuration::Release),
            Event::Ran(path("tests/r1.st")),
            Event::Ran(path("tests/r2.st")),
        ]
    );
}

#[tokio::test]
async fn empty_subset_is_not_built() {
    let h = Harness::new();
    let files = vec![h.file("tests/a.st", ""), h.file("tests/b.st", "")];

    h.run(&files, Mode::Test, MissingBaselinePolicy::Autobake).await;

    let builds: Vec<_> = h
        .events()
        .into_iter()
        .filter(|e| matches!(e, Event::Built(_)))
        .collect();
    assert_eq!(builds, vec![Event::Built(Configuration::Release)]);
}

#[tokio::test]
async fn empty_batch_does_nothing() {
    let h = Harness::new();
    let outcome = h.run(&[], Mode::Test, MissingBaselinePolicy::Autobake).await;
    assert_eq!(outcome.total, 0);
    assert!(h.events().is_empty());
}

#[tokio::test]
async fn build_failure_aborts_before_running_tests() {
    let mut h = Harness::new();
    h.builder.fail_on = Some(Configuration::Debug);
    let files = vec![h.file("tests/dbg/d.st", "x\n"), h.file("tests/r.st", "y\n")];

    let err = h
        .try_run(&files, Mode::Test, MissingBaselinePolicy::Autobake)
        .await
        .unwrap_err();

    assert!(matches!(err, HarnessError::Build { configuration: Configuration::Debug, .. }));
    assert_eq!(h.events(), vec![Event::Built(Configuration::Debug)]);
    assert!(!h.store.exists(files[0].path()));
}

#[tokio::test]
async fn stderr_is_part_of_the_comparison() {
    struct StderrRunner(Mutex<String>);
    impl Runner for StderrRunner {
        fn run<'a>(
            &'a self,
            _test: &'a Path,
        ) -> Pin<Box<dyn Future<Output = Result<CapturedOutput, HarnessError>> + Send + 'a>>
        {
            let stderr = self.0.lock().unwrap().clone();
            Box::pin(async move {
                Ok(CapturedOutput {
                    stdout: String::new(),
                    stderr,
                    exit_code: Some(1),
                })
            })
        }
    }

    let h = Harness::new();
    let test = h.file("tests/err.st", "");
    let runner = StderrRunner(Mutex::new("Error in Frame-77aa\n".to_string()));
    let exec = BatchExecutor::new(
        &h.builder,
        &runner,
        &h.normalizer,
        &h.store,
        ExecutorOptions::default(),
    );

    exec.execute(std::slice::from_ref(&test), Mode::Bake)
        .await
        .unwrap();
    assert_eq!(h.baseline(&test), "STDOUT:\nSTDERR:\nError in Frame-hash\n");

    *runner.0.lock().unwrap() = "Different error\n".to_string();
    let outcome = exec
        .execute(std::slice::from_ref(&test), Mode::Test)
        .await
        .unwrap();
    assert_eq!(outcome.failed(), 1);
}
