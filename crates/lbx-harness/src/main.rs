#![forbid(unsafe_code)]

//! Scenario replay tool.
//!
//! # Running
//!
//! ```sh
//! cargo run -p lbx-harness --bin lbx-replay -- crates/lbx-harness/scenarios/*.json
//! ```
//!
//! Transcripts go to stdout as JSONL, or to `$LBX_TRANSCRIPT_DIR/<name>.jsonl`
//! when that variable is set. Build with `--features tracing-json` to get
//! engine logs on stderr, filtered by `LBX_LOG`.
//!
//! Exit status: 0 when every scenario replays, 1 when any fails, 2 on usage
//! errors.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use lbx_harness::{ScenarioError, load, replay, transcript_dir};

fn run(path: &Path, out_dir: Option<&Path>, stdout: &mut impl Write) -> Result<(), ScenarioError> {
    let scenario = load(path)?;
    let transcript = replay(&scenario)?;
    match out_dir {
        Some(dir) => {
            let written = transcript.write_jsonl(dir)?;
            eprintln!("{} -> {}", path.display(), written.display());
        }
        None => {
            let jsonl = transcript.to_jsonl()?;
            stdout
                .write_all(jsonl.as_bytes())
                .map_err(|source| ScenarioError::Io {
                    path: PathBuf::from("<stdout>"),
                    source,
                })?;
        }
    }
    Ok(())
}

fn main() -> io::Result<()> {
    #[cfg(feature = "tracing-json")]
    lbx_core::logging::init_json("lbx_select=debug,lbx_harness=info");

    let paths: Vec<PathBuf> = std::env::args_os().skip(1).map(PathBuf::from).collect();
    if paths.is_empty() {
        eprintln!("usage: lbx-replay <scenario.json>...");
        std::process::exit(2);
    }

    let out_dir = transcript_dir();
    let stdout = io::stdout();
    let mut stdout = stdout.lock();
    let mut failed = 0usize;

    for path in &paths {
        if let Err(err) = run(path, out_dir.as_deref(), &mut stdout) {
            eprintln!("{}: [{}] {err}", path.display(), err.code());
            failed += 1;
        }
    }
    stdout.flush()?;

    if failed > 0 {
        eprintln!("{failed} of {} scenario(s) failed", paths.len());
        std::process::exit(1);
    }
    Ok(())
}
