//! Stress tests for concurrent logging
//!
//! These tests verify:
//! - No record is lost or torn when many threads share one logger tree
//! - De-dup sets stay consistent under concurrent readers and writers
//! - Task ids from `start` do not collide
//! - Size rotation keeps every record under concurrent writers

use logtee::appenders::{MemoryWriter, RotatingFileWriter, RotationPolicy, WriterAppender};
use logtee::{
    shared_writer, Encoder, Field, FieldKeySet, LevelRouter, LogLevel, Logger, OutputFormat,
    TimeFormat, WriterHook, TASK_ID_KEY,
};
use std::collections::HashSet;
use std::fs;
use std::sync::Arc;
use std::thread;
use tempfile::TempDir;

const THREADS: usize = 8;
const RECORDS_PER_THREAD: usize = 1000;

fn memory_logger(level: LogLevel) -> (Logger, MemoryWriter) {
    let memory = MemoryWriter::new();
    let logger = Logger::builder()
        .level(level)
        .json(true)
        .hide_console(true)
        .hook(WriterHook::new(memory.shared(), LogLevel::Debug))
        .build()
        .expect("Failed to build logger");
    (logger, memory)
}

/// Every record from every thread arrives as one intact JSON line
#[test]
fn test_concurrent_logging_no_loss() {
    let (root, memory) = memory_logger(LogLevel::Debug);

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let logger = root.derive(&format!("worker{}", t));
            thread::spawn(move || {
                for i in 0..RECORDS_PER_THREAD {
                    logger.info("tick", [Field::new("thread", t), Field::new("seq", i)]);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("Thread panicked");
    }

    let lines = memory.lines();
    assert_eq!(lines.len(), THREADS * RECORDS_PER_THREAD);

    let mut per_thread = vec![0usize; THREADS];
    for line in &lines {
        let record: serde_json::Value =
            serde_json::from_str(line).expect("Record should be intact JSON");
        let thread = record["thread"].as_u64().unwrap() as usize;
        assert_eq!(record["logger"], format!("worker{}", thread));
        per_thread[thread] += 1;
    }
    assert!(per_thread.iter().all(|&n| n == RECORDS_PER_THREAD));

    assert_eq!(
        root.metrics().unwrap().total_logged(),
        (THREADS * RECORDS_PER_THREAD) as u64
    );
}

/// Re-leveled siblings and the original tree log concurrently to shared sinks
#[test]
fn test_concurrent_logging_across_snapshots() {
    let (root, memory) = memory_logger(LogLevel::Warn);

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let base = root.derive("job");
            let logger = if t % 2 == 0 {
                base.set_level(LogLevel::Debug)
            } else {
                base
            };
            thread::spawn(move || {
                for _ in 0..RECORDS_PER_THREAD {
                    logger.info("info", []);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("Thread panicked");
    }

    // The hook takes everything, so both snapshots deliver all records
    assert_eq!(memory.lines().len(), THREADS * RECORDS_PER_THREAD);
}

#[test]
fn test_concurrent_field_key_set() {
    let set = Arc::new(FieldKeySet::new());

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let set = Arc::clone(&set);
            thread::spawn(move || {
                for i in 0..RECORDS_PER_THREAD {
                    let key = format!("k{}", i % 100);
                    set.set(key.clone());
                    assert!(set.exists(&key));
                    if i % 50 == 0 {
                        let snapshot = set.copy();
                        assert!(snapshot.len() <= 100);
                    }
                }
                t
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("Thread panicked");
    }

    assert_eq!(set.len(), 100);
}

#[test]
fn test_concurrent_with_when_not_exist_branches() {
    let (root, memory) = memory_logger(LogLevel::Info);
    let shared = root.derive("shared");

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let branch = shared.derive(&format!("b{}", t));
            thread::spawn(move || {
                let mut logger = branch;
                for i in 0..100 {
                    logger = logger.with_when_not_exist("owner", Field::new("owner", i));
                }
                logger.info("done", []);
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("Thread panicked");
    }

    let lines = memory.lines();
    assert_eq!(lines.len(), THREADS);
    for line in &lines {
        assert_eq!(line.matches("\"owner\"").count(), 1);
        assert!(line.contains("\"owner\":0"));
    }
}

#[test]
fn test_start_ids_do_not_collide() {
    let root = Logger::detached();
    let mut ids = HashSet::with_capacity(100_000);

    for _ in 0..100_000 {
        let task = root.start();
        let id = task
            .fields()
            .iter()
            .find(|f| f.key == TASK_ID_KEY)
            .map(|f| f.value.to_string())
            .unwrap();
        assert!(ids.insert(id), "duplicate task id");
    }
}

#[test]
fn test_rotation_under_concurrent_writers() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("stress.log");

    let policy = RotationPolicy::new()
        .with_max_bytes(16 * 1024)
        .with_max_backups(500)
        .with_compression(false);
    let writer = RotatingFileWriter::with_policy(&path, policy).expect("Failed to open file");

    let appender = WriterAppender::new(
        "rotating",
        Arc::new(Encoder::new(OutputFormat::Json, TimeFormat::default())),
        shared_writer(writer),
        LevelRouter::at_least(LogLevel::Debug),
    );

    let root = Logger::builder()
        .hide_console(true)
        .appender(appender)
        .build()
        .expect("Failed to build logger");

    let threads = 4;
    let per_thread = 500;
    let handles: Vec<_> = (0..threads)
        .map(|t| {
            let logger = root.derive("rotor");
            thread::spawn(move || {
                for i in 0..per_thread {
                    logger.warn("rotating record with some padding text", [
                        Field::new("thread", t),
                        Field::new("seq", i),
                    ]);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("Thread panicked");
    }
    root.flush().expect("Failed to flush");

    let mut total = 0;
    let mut files = 0;
    for entry in fs::read_dir(temp_dir.path()).unwrap() {
        let content = fs::read_to_string(entry.unwrap().path()).unwrap();
        for line in content.lines() {
            serde_json::from_str::<serde_json::Value>(line).expect("Record should be intact JSON");
            total += 1;
        }
        files += 1;
    }

    assert_eq!(total, threads * per_thread);
    assert!(files > 1, "Expected at least one rotation");
}
