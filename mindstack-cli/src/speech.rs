//! Transcript capture: record a bounded WAV, then transcribe it locally.
//!
//! Both stages shell out — recording to whichever of `rec`/`sox`/`arecord`
//! is installed, transcription to a local Whisper binary. Recordings land
//! under ~/.mindstack/recordings/ so a session leaves a trail. Everything
//! here is blocking: one recording session at a time, finished before the
//! engine is touched.

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::config::SpeechSection;
use crate::state::ensure_mindstack_home;

fn recordings_dir() -> Result<PathBuf> {
    let dir = ensure_mindstack_home()?.join("recordings");
    std::fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

/// Record one command from the default microphone.
pub fn record_wav(seconds: u32) -> Result<PathBuf> {
    let stamp = chrono::Utc::now().format("%Y%m%d-%H%M%S");
    let out = recordings_dir()?.join(format!("{stamp}.wav"));
    let secs = seconds.max(1).to_string();

    // Prefer sox-style recorders; fall back to ALSA.
    let argv: Vec<String> = if which::which("rec").is_ok() {
        vec!["rec".into(), out.display().to_string(), "trim".into(), "0".into(), secs]
    } else if which::which("sox").is_ok() {
        vec![
            "sox".into(),
            "-d".into(),
            out.display().to_string(),
            "trim".into(),
            "0".into(),
            secs,
        ]
    } else if which::which("arecord").is_ok() {
        vec![
            "arecord".into(),
            "-f".into(),
            "cd".into(),
            "-d".into(),
            secs,
            out.display().to_string(),
        ]
    } else {
        bail!("no recorder found; install sox (rec) or alsa-utils (arecord)");
    };

    let (bin, args) = argv.split_first().context("empty recorder argv")?;
    let status = Command::new(bin)
        .args(args)
        .status()
        .with_context(|| format!("running {bin}"))?;
    if !status.success() {
        bail!("{bin} exited with status {status}");
    }
    Ok(out)
}

#[derive(Debug, Deserialize)]
struct WhisperOutput {
    text: String,
}

/// Transcribe a WAV with the local Whisper binary (`WHISPER_PATH` env
/// overrides the lookup). Yields the trimmed transcript text.
pub fn transcribe_wav(wav: &Path, model: &str) -> Result<String> {
    let whisper = match std::env::var("WHISPER_PATH") {
        Ok(p) => PathBuf::from(p),
        Err(_) => which::which("whisper").context("whisper binary not found (set WHISPER_PATH)")?,
    };

    let out_dir = wav
        .parent()
        .context("wav path has no parent directory")?
        .to_path_buf();

    let output = Command::new(&whisper)
        .arg(wav)
        .args(["--model", model])
        .args(["--output_format", "json"])
        .args(["--output_dir"])
        .arg(&out_dir)
        .args(["--language", "en"])
        .output()
        .with_context(|| format!("running {}", whisper.display()))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!("whisper failed: {stderr}");
    }

    let stem = wav
        .file_stem()
        .context("wav path has no file stem")?
        .to_string_lossy();
    let json_path = out_dir.join(format!("{stem}.json"));
    let raw = std::fs::read_to_string(&json_path)
        .with_context(|| format!("read {}", json_path.display()))?;
    let parsed: WhisperOutput = serde_json::from_str(&raw).context("parse whisper JSON")?;

    let text = parsed.text.trim().to_string();
    if text.is_empty() {
        bail!("transcription came back empty — didn't catch anything");
    }
    Ok(text)
}

/// One full capture: record, then transcribe.
pub fn capture_transcript(speech: &SpeechSection) -> Result<String> {
    let wav = record_wav(speech.record_seconds)?;
    transcribe_wav(&wav, &speech.whisper_model)
}
