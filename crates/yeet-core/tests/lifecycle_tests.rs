//! End-to-end lifecycle tests for the bin: yeet → sweep → restore/empty,
//! driven through the public API with a frozen clock.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use yeet_core::listing::{EMPTY_LISTING, render_listing};
use yeet_core::{
    BinLayout, Clock, Error, FixedClock, RETENTION_SECS, TrashBin, TrashError,
};

const T: i64 = 1_700_000_000;

struct Env {
    _tmp: TempDir,
    root: PathBuf,
    proj: PathBuf,
}

impl Env {
    fn new() -> Self {
        let tmp = TempDir::new().expect("create temp dir");
        let root = tmp.path().join(".yeet");
        let proj = tmp.path().join("home/u/proj");
        fs::create_dir_all(&proj).expect("create project dir");
        Self {
            _tmp: tmp,
            root,
            proj,
        }
    }

    /// Open the bin the way the CLI does: read the clock once, then sweep.
    fn invocation(&self, clock: &dyn Clock) -> TrashBin {
        let bin = TrashBin::open(BinLayout::new(&self.root), clock.now()).expect("open bin");
        bin.sweep().expect("sweep");
        bin
    }

    fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.proj.join(name);
        fs::write(&path, content).expect("write fixture");
        path
    }
}

fn held(bin: &TrashBin, name: &str) -> PathBuf {
    bin.layout().held_path(name)
}

fn read(path: &Path) -> String {
    fs::read_to_string(path).expect("read file")
}

#[test]
fn yeet_then_restore_round_trips_content_and_path() {
    let env = Env::new();
    let original = env.write("notes.txt", "remember the milk");

    let bin = env.invocation(&FixedClock(T));
    bin.yeet(&env.proj, "notes.txt").unwrap();
    assert!(!original.exists());

    let bin = env.invocation(&FixedClock(T + 60));
    let outcome = bin.restore("notes.txt").unwrap();

    assert_eq!(outcome.destination, original);
    assert_eq!(read(&original), "remember the milk");
    assert!(!bin.records().unwrap().contains("notes.txt"));
}

#[test]
fn yeet_scenario_creates_expected_record() {
    let env = Env::new();
    env.write("notes.txt", "x");

    let bin = env.invocation(&FixedClock(T));
    bin.yeet(&env.proj, "notes.txt").unwrap();

    let records = bin.records().unwrap();
    let record = records.get("notes.txt").unwrap();
    assert_eq!(record.original_path, env.proj.join("notes.txt"));
    assert_eq!(record.expires_at, T + 604_800);
    assert!(held(&bin, "notes.txt").is_file());
}

#[test]
fn duplicate_yeet_leaves_single_record_and_single_move() {
    let env = Env::new();
    env.write("dup.txt", "one");
    let bin = env.invocation(&FixedClock(T));
    bin.yeet(&env.proj, "dup.txt").unwrap();
    env.write("dup.txt", "two");

    let bin = env.invocation(&FixedClock(T + 1));
    let err = bin.yeet(&env.proj, "dup.txt").unwrap_err();

    assert!(matches!(err, Error::Trash(TrashError::AlreadyTracked(ref n)) if n == "dup.txt"));
    assert_eq!(bin.records().unwrap().len(), 1);
    assert_eq!(bin.records().unwrap().get("dup.txt").unwrap().expires_at, T + RETENTION_SECS);
    assert_eq!(read(&env.proj.join("dup.txt")), "two");
    assert_eq!(read(&held(&bin, "dup.txt")), "one");
}

#[test]
fn restore_blocked_by_recreated_file_leaves_state_alone() {
    let env = Env::new();
    env.write("notes.txt", "yeeted");
    env.invocation(&FixedClock(T)).yeet(&env.proj, "notes.txt").unwrap();
    env.write("notes.txt", "recreated");

    let bin = env.invocation(&FixedClock(T + 10));
    let err = bin.restore("notes.txt").unwrap_err();

    assert!(matches!(
        err,
        Error::Trash(TrashError::DestinationOccupied { ref path, .. }) if *path == env.proj.join("notes.txt")
    ));
    assert!(bin.records().unwrap().contains("notes.txt"));
    assert_eq!(read(&held(&bin, "notes.txt")), "yeeted");
    assert_eq!(read(&env.proj.join("notes.txt")), "recreated");
}

#[test]
fn sweep_after_retention_deletes_record_and_file() {
    let env = Env::new();
    env.write("notes.txt", "x");
    env.invocation(&FixedClock(T)).yeet(&env.proj, "notes.txt").unwrap();

    let bin = TrashBin::open(BinLayout::new(&env.root), T + 604_801).unwrap();
    let report = bin.sweep().unwrap();

    assert_eq!(report.expired, ["notes.txt"]);
    assert!(bin.records().unwrap().is_empty());
    assert!(!held(&bin, "notes.txt").exists());
}

#[test]
fn sweep_boundary_is_exact() {
    let env = Env::new();
    env.write("edge.txt", "x");
    env.invocation(&FixedClock(T)).yeet(&env.proj, "edge.txt").unwrap();
    let expires_at = T + RETENTION_SECS;

    let bin = TrashBin::open(BinLayout::new(&env.root), expires_at - 1).unwrap();
    assert!(!bin.sweep().unwrap().any_expired());
    assert!(bin.records().unwrap().contains("edge.txt"));

    let bin = TrashBin::open(BinLayout::new(&env.root), expires_at).unwrap();
    assert_eq!(bin.sweep().unwrap().expired, ["edge.txt"]);
}

#[test]
fn restore_in_same_invocation_is_not_swept_out_from_under_it() {
    let env = Env::new();
    env.write("late.txt", "x");
    env.invocation(&FixedClock(T)).yeet(&env.proj, "late.txt").unwrap();

    // The sweep runs first, so an expired record is already gone by the
    // time restore looks for it.
    let bin = env.invocation(&FixedClock(T + RETENTION_SECS));
    let err = bin.restore("late.txt").unwrap_err();
    assert!(matches!(err, Error::Trash(TrashError::NotTracked(_))));
    assert!(!env.proj.join("late.txt").exists());
}

#[test]
fn empty_on_empty_bin_is_a_no_op() {
    let env = Env::new();
    let bin = env.invocation(&FixedClock(T));

    bin.empty().unwrap();
    bin.empty().unwrap();

    assert!(bin.records().unwrap().is_empty());
    assert!(bin.layout().holding_dir.is_dir());
}

#[test]
fn empty_makes_yeeted_files_unrecoverable() {
    let env = Env::new();
    env.write("a.txt", "a");
    env.write("b.txt", "b");
    let bin = env.invocation(&FixedClock(T));
    bin.yeet(&env.proj, "a.txt").unwrap();
    bin.yeet(&env.proj, "b.txt").unwrap();

    let outcome = bin.empty().unwrap();

    assert_eq!(outcome.removed, 2);
    assert!(matches!(
        bin.restore("a.txt").unwrap_err(),
        Error::Trash(TrashError::NotTracked(_))
    ));
    assert!(!held(&bin, "a.txt").exists());
}

#[test]
fn listing_empty_bin_does_not_mutate_store() {
    let env = Env::new();
    let bin = env.invocation(&FixedClock(T));
    let before = fs::read(&bin.layout().store_path).unwrap();

    let text = render_listing(&bin.records().unwrap());

    assert_eq!(text.trim_end(), EMPTY_LISTING);
    assert_eq!(fs::read(&bin.layout().store_path).unwrap(), before);
}

#[test]
fn listing_reflects_yeet_order() {
    let env = Env::new();
    env.write("second.txt", "x");
    env.write("first.txt", "x");
    let bin = env.invocation(&FixedClock(T));
    bin.yeet(&env.proj, "second.txt").unwrap();
    bin.yeet(&env.proj, "first.txt").unwrap();

    let text = render_listing(&bin.records().unwrap());

    assert!(text.find("second.txt:").unwrap() < text.find("first.txt:").unwrap());
    assert!(text.contains("  Expiry: 21/11/2023 at 22:13:20"));
}

#[test]
fn corrupt_store_is_fatal_for_sweep() {
    let env = Env::new();
    let layout = BinLayout::new(&env.root);
    layout.initialize().unwrap();
    fs::write(&layout.store_path, "{\"broken\": ").unwrap();

    let bin = TrashBin::open(layout.clone(), T).unwrap();
    let err = bin.sweep().unwrap_err();

    assert!(!err.is_user_facing());
    assert!(matches!(err, Error::Store(yeet_core::StoreError::Corrupt { .. })));
    assert_eq!(fs::read_to_string(&layout.store_path).unwrap(), "{\"broken\": ");
}

#[test]
fn directory_entries_expire_recursively() {
    let env = Env::new();
    fs::create_dir_all(env.proj.join("target/debug")).unwrap();
    fs::write(env.proj.join("target/debug/app"), "bin").unwrap();
    env.invocation(&FixedClock(T)).yeet(&env.proj, "target").unwrap();

    let bin = env.invocation(&FixedClock(T + RETENTION_SECS));

    assert!(bin.records().unwrap().is_empty());
    assert!(!held(&bin, "target").exists());
}
