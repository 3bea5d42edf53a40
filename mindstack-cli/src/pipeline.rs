//! The voice command pipeline: transcript -> resolved intent -> engine.
//!
//! Three stages with typed payloads; only the last one touches engine
//! state, so a failure in capture or classification leaves the queue
//! exactly as it was. Every completed round is appended to a daily command
//! log under ~/.mindstack/commands/.

use anyhow::Result;
use std::path::PathBuf;

use mindstack_core::TaskQueue;

use crate::llm::LlmConfig;
use crate::resolver;

#[derive(Debug, Clone)]
pub struct CommandOutcome {
    pub transcript: String,
    pub acknowledgement: String,
    /// False when the resolver recognized nothing (the acknowledgement then
    /// explains the miss instead of an action).
    pub executed: bool,
}

pub struct CommandLog {
    path: PathBuf,
}

impl CommandLog {
    pub fn open_today() -> Result<Self> {
        let home = crate::state::ensure_mindstack_home()?;
        let dir = home.join("commands");
        std::fs::create_dir_all(&dir)?;
        let today = chrono::Utc::now().format("%Y-%m-%d").to_string();
        let path = dir.join(format!("{today}.md"));
        Ok(Self { path })
    }

    pub fn append(&mut self, kind: &str, msg: &str) -> Result<()> {
        use std::io::Write;
        let mut f = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(
            f,
            "- {} [{}] {}",
            chrono::Utc::now().to_rfc3339(),
            kind,
            msg.replace('\n', " ")
        )?;
        Ok(())
    }
}

/// Classify one transcript and execute the result.
///
/// Errors mean the resolver service failed (network, malformed reply);
/// a clean "didn't understand" is a successful outcome with
/// `executed == false`.
pub fn run_transcript(
    queue: &mut TaskQueue,
    llm_cfg: &LlmConfig,
    transcript: &str,
) -> Result<CommandOutcome> {
    let mut log = CommandLog::open_today()?;
    log.append("transcript", transcript)?;

    let intent = match resolver::resolve_intent(llm_cfg, transcript) {
        Ok(intent) => intent,
        Err(e) => {
            log.append("error", &format!("{e:#}"))?;
            return Err(e);
        }
    };

    let executed = intent.apply(queue);
    let kind = if executed { "executed" } else { "unrecognized" };
    log.append(kind, &intent.acknowledgement)?;

    Ok(CommandOutcome {
        transcript: transcript.to_string(),
        acknowledgement: intent.acknowledgement,
        executed,
    })
}
