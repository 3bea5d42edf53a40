use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

use mindstack_core::{ACTIVE_RECORD, BACKLOG_RECORD, StateObserver, Task, TaskQueue};

pub fn mindstack_home() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".mindstack"))
}

pub fn ensure_mindstack_home() -> Result<PathBuf> {
    let dir = mindstack_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

fn record_path(record: &str) -> Result<PathBuf> {
    Ok(ensure_mindstack_home()?.join(format!("{record}.json")))
}

/// Read one tier record. A missing, unreadable, or unparsable file is an
/// empty tier, never a startup failure.
fn read_record(record: &str) -> Result<Vec<Task>> {
    let p = record_path(record)?;
    if !p.exists() {
        return Ok(Vec::new());
    }
    match fs::read_to_string(&p) {
        Ok(raw) => Ok(mindstack_core::decode_tasks(&raw)),
        Err(e) => {
            eprintln!("warning: could not read {}: {e}", p.display());
            Ok(Vec::new())
        }
    }
}

/// Hydrate the engine from the two stored records and attach the
/// file-backed observer so every mutation is written straight back.
pub fn load_queue(capacity: usize) -> Result<TaskQueue> {
    let active = read_record(ACTIVE_RECORD)?;
    let backlog = read_record(BACKLOG_RECORD)?;

    let mut queue = TaskQueue::with_state(capacity, active, backlog);
    queue.set_observer(Box::new(FileStore::new()?));
    Ok(queue)
}

/// Writes both records after each engine mutation.
///
/// Write failures are non-fatal: the session keeps running in memory and
/// the user gets a stderr warning instead of a crash.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new() -> Result<Self> {
        Ok(Self {
            dir: ensure_mindstack_home()?,
        })
    }

    fn write_record(&self, record: &str, tasks: &[Task]) -> Result<()> {
        let p = self.dir.join(format!("{record}.json"));
        let json = mindstack_core::encode_tasks(tasks)?;
        fs::write(&p, json).with_context(|| format!("write {}", p.display()))?;
        Ok(())
    }
}

impl StateObserver for FileStore {
    fn state_changed(&mut self, active: &[Task], backlog: &[Task]) {
        for (record, tier) in [(ACTIVE_RECORD, active), (BACKLOG_RECORD, backlog)] {
            if let Err(e) = self.write_record(record, tier) {
                eprintln!("warning: could not persist {record}: {e:#}");
            }
        }
    }
}
