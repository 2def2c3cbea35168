//! End-to-end coverage of §8's task graph ordering scenario and the
//! `--no-requires` / independent-tasks flag, run through the full
//! `Engine::run` path against a registered language backend.

use builder_cache::FileCache;
use builder_core::GlobalOptions;
use builder_engine::Engine;
use builder_project::{Project, ProjectCache};
use builder_registry::{Language, LanguageRegistry, Task};
use std::cell::RefCell;
use std::sync::{Arc, Mutex};

thread_local! {
    /// `LanguageDefiner` is a bare `fn(&mut Language)`, with no closure
    /// environment, so the per-test invocation log is threaded through here
    /// instead: each test sets it immediately before building the engine
    /// that will call `define_demo` on the same thread.
    static DEMO_LOG: RefCell<Option<Arc<Mutex<Vec<String>>>>> = RefCell::new(None);
}

fn define_demo(language: &mut Language) {
    let log = DEMO_LOG.with(|cell| cell.borrow().clone()).expect("log installed by caller");
    register_demo(language, log);
}

/// Registers `compile`, `compile-tests` (requires `compile`), `test`
/// (requires `compile-tests`), and `package` (requires `test`) against the
/// `demo` tag, each appending its own name to `log` when invoked.
fn register_demo(language: &mut Language, log: Arc<Mutex<Vec<String>>>) {
    let push = |log: Arc<Mutex<Vec<String>>>, name: &'static str| {
        Arc::new(move |_: &dyn builder_registry::TaskContext| {
            log.lock().unwrap().push(name.to_string());
            Ok(())
        })
    };

    language.add_task(Task::new("compile").with_function(push(Arc::clone(&log), "compile")));
    language.add_task(
        Task::new("compile-tests")
            .with_require(["compile"])
            .with_function(push(Arc::clone(&log), "compile-tests")),
    );
    language.add_task(Task::new("test").with_require(["compile-tests"]).with_function(push(Arc::clone(&log), "test")));
    language.add_task(Task::new("package").with_require(["test"]).with_function(push(Arc::clone(&log), "package")));
}

fn build_engine(log: Arc<Mutex<Vec<String>>>, no_requires: bool) -> (Engine, tempfile::TempDir) {
    DEMO_LOG.with(|cell| *cell.borrow_mut() = Some(Arc::clone(&log)));

    let mut registry = LanguageRegistry::new();
    registry.register("demo", define_demo);

    let dir = tempfile::tempdir().unwrap();
    let mut options = GlobalOptions::new();
    options.no_requires = no_requires;

    let project = Project::from_dir(dir.path(), Some("demo-project"), None, Some("demo"), &registry, &options, ProjectCache::empty()).unwrap();

    let cache = FileCache::with_base(dir.path().join(".cache")).unwrap();
    let engine = Engine::new(Arc::new(project), Arc::new(registry), Arc::new(options), Arc::new(cache));
    (engine, dir)
}

#[test]
fn expands_prerequisites_in_post_order() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let (engine, _dir) = build_engine(Arc::clone(&log), false);

    let code = engine.run(&["package".to_string(), "compile".to_string()]);

    assert_eq!(code, 0);
    assert_eq!(*log.lock().unwrap(), vec!["compile", "compile-tests", "test", "package"]);
}

#[test]
fn independent_flag_runs_exactly_the_listed_tasks() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let (engine, _dir) = build_engine(Arc::clone(&log), true);

    let code = engine.run(&["package".to_string(), "compile".to_string()]);

    assert_eq!(code, 0);
    assert_eq!(*log.lock().unwrap(), vec!["package", "compile"]);
}

#[test]
fn no_tasks_specified_exits_with_code_one() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let (engine, _dir) = build_engine(log, false);

    let code = engine.run(&[]);

    assert_eq!(code, 1);
}
