#![forbid(unsafe_code)]

//! Scripted interaction replay for select controls.
//!
//! A [`Scenario`] is a JSON document describing one control (options,
//! configuration, initial value) and a list of steps a user or host performs.
//! [`replay`] drives a [`Select`] through the steps and records what happened
//! after each one. The resulting [`Transcript`] exports as JSONL for CI logs
//! and diffing.
//!
//! # Scenario format
//!
//! ```json
//! {
//!   "name": "keyboard_single",
//!   "options": [{"value": "a", "label": "Alpha"}, {"value": "b", "label": "Beta"}],
//!   "config": {"placeholder": "Choose"},
//!   "steps": [{"do": "key", "key": "ArrowDown"}, {"do": "key", "key": "Enter"}]
//! }
//! ```
//!
//! # JSONL Schema
//!
//! ```json
//! {"event":"start","scenario":"keyboard_single","steps":2}
//! {"event":"step","step":0,"input":"key","handled":true,"effects":[...],"state":{...}}
//! {"event":"complete","records":2,"value":"a","view":{...}}
//! ```

use std::fmt;
use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use lbx_core::{debug, info};
use lbx_select::{
    Effect, KeyCode, Options, Select, SelectConfig, SelectEvent, SelectView, SelectionValue,
};
use serde::{Deserialize, Serialize};

/// Environment variable naming the directory transcripts are written to.
pub const TRANSCRIPT_DIR_ENV: &str = "LBX_TRANSCRIPT_DIR";

// ============================================================================
// Errors
// ============================================================================

/// Failure to load or replay a scenario.
#[derive(Debug)]
pub enum ScenarioError {
    /// Reading the scenario or writing the transcript failed.
    Io {
        /// File involved.
        path: PathBuf,
        /// Underlying error.
        source: io::Error,
    },
    /// The scenario is not valid JSON for the expected shape.
    Json(serde_json::Error),
    /// A click step names a value no option has.
    UnknownOption {
        /// Zero-based step number.
        step: usize,
        /// The unknown value.
        value: String,
    },
    /// A key step names a key the harness cannot map.
    UnknownKey {
        /// Zero-based step number.
        step: usize,
        /// The unknown key name.
        key: String,
    },
}

impl ScenarioError {
    /// Stable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Io { .. } => "io",
            Self::Json(_) => "json",
            Self::UnknownOption { .. } => "unknown_option",
            Self::UnknownKey { .. } => "unknown_key",
        }
    }
}

impl fmt::Display for ScenarioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "{}: {source}", path.display()),
            Self::Json(err) => write!(f, "invalid scenario: {err}"),
            Self::UnknownOption { step, value } => {
                write!(f, "step {step}: no option with value {value:?}")
            }
            Self::UnknownKey { step, key } => write!(f, "step {step}: unknown key {key:?}"),
        }
    }
}

impl std::error::Error for ScenarioError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json(err) => Some(err),
            Self::UnknownOption { .. } | Self::UnknownKey { .. } => None,
        }
    }
}

impl From<serde_json::Error> for ScenarioError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

// ============================================================================
// Scenario
// ============================================================================

/// One control and the steps to drive it through.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// Name used in logs and as the transcript file stem.
    pub name: String,
    /// Option tree, flat or grouped.
    pub options: Options,
    /// Behaviour flags and labels.
    #[serde(default)]
    pub config: SelectConfig,
    /// Initial value (default value, or the host's value when controlled).
    #[serde(default)]
    pub value: Option<SelectionValue>,
    /// Whether the harness plays the host owning the value.
    #[serde(default)]
    pub controlled: bool,
    /// Steps in order.
    pub steps: Vec<ScenarioStep>,
}

impl Scenario {
    /// Parse a scenario from JSON text.
    pub fn from_json(text: &str) -> Result<Self, ScenarioError> {
        Ok(serde_json::from_str(text)?)
    }
}

/// One scripted action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "do", rename_all = "snake_case")]
pub enum ScenarioStep {
    /// Click the trigger.
    Activate,
    /// Press a named key (`"ArrowDown"`, `"Enter"`, `"a"`, ...).
    Key {
        /// Key name.
        key: String,
    },
    /// Type text one character at a time.
    Type {
        /// Text to type.
        text: String,
    },
    /// Replace the search text at once.
    Search {
        /// New search text.
        text: String,
    },
    /// Paste text.
    Paste {
        /// Pasted text.
        text: String,
    },
    /// Click the option with `value` (`""` = pseudo-option).
    Click {
        /// Option value.
        value: String,
    },
    /// Use the clear-selection action.
    ClearSelection,
    /// Use the clear-search action.
    ClearSearch,
    /// Focus enters the control.
    Focus,
    /// Focus leaves the control.
    Blur,
    /// The host pushes a new value (controlled scenarios).
    Observe {
        /// New value.
        value: SelectionValue,
    },
    /// The host enables or disables the control.
    SetDisabled {
        /// New disabled flag.
        disabled: bool,
    },
}

impl ScenarioStep {
    /// Short stable name, used in transcripts.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Activate => "activate",
            Self::Key { .. } => "key",
            Self::Type { .. } => "type",
            Self::Search { .. } => "search",
            Self::Paste { .. } => "paste",
            Self::Click { .. } => "click",
            Self::ClearSelection => "clear_selection",
            Self::ClearSearch => "clear_search",
            Self::Focus => "focus",
            Self::Blur => "blur",
            Self::Observe { .. } => "observe",
            Self::SetDisabled { .. } => "set_disabled",
        }
    }
}

/// Map a key name to a key code. Single characters map to themselves.
#[must_use]
pub fn parse_key(name: &str) -> Option<KeyCode> {
    let code = match name {
        "ArrowDown" | "Down" => KeyCode::Down,
        "ArrowUp" | "Up" => KeyCode::Up,
        "Enter" => KeyCode::Enter,
        "Escape" | "Esc" => KeyCode::Escape,
        "Backspace" => KeyCode::Backspace,
        "Tab" => KeyCode::Tab,
        "Home" => KeyCode::Home,
        "End" => KeyCode::End,
        "Space" => KeyCode::Char(' '),
        other => {
            let mut chars = other.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => KeyCode::Char(c),
                _ => return None,
            }
        }
    };
    Some(code)
}

/// Read and parse a scenario file.
pub fn load(path: &Path) -> Result<Scenario, ScenarioError> {
    let text = fs::read_to_string(path).map_err(|source| ScenarioError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Scenario::from_json(&text)
}

// ============================================================================
// Transcript
// ============================================================================

/// Interaction state after a step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    /// Listbox visibility.
    pub open: bool,
    /// Focused flattened position.
    pub focus: Option<usize>,
    /// Search text.
    pub search: String,
    /// Current value.
    pub value: SelectionValue,
    /// Trigger text.
    pub display_label: String,
}

impl Snapshot {
    fn of(select: &Select) -> Self {
        Self {
            open: select.is_open(),
            focus: select.visual_focus(),
            search: select.search().to_owned(),
            value: select.value().clone(),
            display_label: select.display_label(),
        }
    }
}

/// What one step did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    /// Zero-based step number.
    pub step: usize,
    /// Step name.
    pub input: &'static str,
    /// Whether the control consumed any of the step's events.
    pub handled: bool,
    /// Effects of all events the step produced, in order.
    pub effects: Vec<Effect>,
    /// State after the step.
    pub state: Snapshot,
}

/// Result of replaying a scenario.
#[derive(Debug, Clone)]
pub struct Transcript {
    /// Scenario name.
    pub scenario: String,
    /// One record per step.
    pub records: Vec<Record>,
    /// The control after the last step.
    pub select: Select,
}

#[derive(Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
enum Line<'a> {
    Start {
        scenario: &'a str,
        steps: usize,
    },
    Step(&'a Record),
    Complete {
        records: usize,
        value: &'a SelectionValue,
        view: &'a SelectView,
    },
}

impl Transcript {
    /// Final render-ready view.
    #[must_use]
    pub fn view(&self) -> SelectView {
        self.select.view()
    }

    /// All effects across the transcript, in order.
    pub fn effects(&self) -> impl Iterator<Item = &Effect> {
        self.records.iter().flat_map(|record| record.effects.iter())
    }

    /// Serialize as JSONL: a start line, one line per step, a completion line.
    pub fn to_jsonl(&self) -> Result<String, ScenarioError> {
        let view = self.view();
        let mut lines = Vec::with_capacity(self.records.len() + 2);
        lines.push(serde_json::to_string(&Line::Start {
            scenario: &self.scenario,
            steps: self.records.len(),
        })?);
        for record in &self.records {
            lines.push(serde_json::to_string(&Line::Step(record))?);
        }
        lines.push(serde_json::to_string(&Line::Complete {
            records: self.records.len(),
            value: self.select.value(),
            view: &view,
        })?);

        let mut out = lines.join("\n");
        out.push('\n');
        Ok(out)
    }

    /// Write `<dir>/<scenario>.jsonl`, creating `dir` if needed.
    pub fn write_jsonl(&self, dir: &Path) -> Result<PathBuf, ScenarioError> {
        let path = dir.join(format!("{}.jsonl", file_stem(&self.scenario)));
        let io_err = |source| ScenarioError::Io {
            path: path.clone(),
            source,
        };

        let jsonl = self.to_jsonl()?;
        fs::create_dir_all(dir).map_err(io_err)?;
        let file = fs::File::create(&path).map_err(io_err)?;
        let mut writer = BufWriter::new(file);
        writer.write_all(jsonl.as_bytes()).map_err(io_err)?;
        writer.flush().map_err(io_err)?;
        Ok(path)
    }
}

/// Directory from [`TRANSCRIPT_DIR_ENV`], if set and non-blank.
#[must_use]
pub fn transcript_dir() -> Option<PathBuf> {
    std::env::var(TRANSCRIPT_DIR_ENV).ok().and_then(|value| {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(PathBuf::from(trimmed))
        }
    })
}

fn file_stem(name: &str) -> String {
    let stem: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
        .collect();
    if stem.is_empty() { "scenario".to_owned() } else { stem }
}

// ============================================================================
// Replay
// ============================================================================

/// Drive a fresh control through `scenario`.
pub fn replay(scenario: &Scenario) -> Result<Transcript, ScenarioError> {
    let options = scenario.options.clone();
    let config = scenario.config.clone();
    let mut select = if scenario.controlled {
        let value = scenario
            .value
            .clone()
            .unwrap_or_else(|| SelectionValue::empty(config.multiple));
        Select::controlled(options, config, value)
    } else {
        Select::uncontrolled(options, config, scenario.value.clone())
    };

    let mut records = Vec::with_capacity(scenario.steps.len());
    for (step, action) in scenario.steps.iter().enumerate() {
        let mut effects = Vec::new();
        let mut handled = false;

        match action {
            ScenarioStep::Observe { value } => {
                handled = select.observe(value.clone());
            }
            ScenarioStep::SetDisabled { disabled } => {
                let transition = select.set_disabled(*disabled);
                handled = transition.handled;
                effects.extend(transition.effects);
            }
            _ => {
                for event in step_events(step, action, &select)? {
                    let transition = select.handle(event);
                    handled |= transition.handled;
                    effects.extend(transition.effects);
                }
            }
        }

        debug!(step, input = action.name(), handled, effects = effects.len(), "step replayed");
        records.push(Record {
            step,
            input: action.name(),
            handled,
            effects,
            state: Snapshot::of(&select),
        });
    }

    info!(scenario = %scenario.name, steps = records.len(), "replay complete");
    Ok(Transcript {
        scenario: scenario.name.clone(),
        records,
        select,
    })
}

fn step_events(
    step: usize,
    action: &ScenarioStep,
    select: &Select,
) -> Result<Vec<SelectEvent>, ScenarioError> {
    let events = match action {
        ScenarioStep::Activate => vec![SelectEvent::Activate],
        ScenarioStep::Key { key } => {
            let code = parse_key(key).ok_or_else(|| ScenarioError::UnknownKey {
                step,
                key: key.clone(),
            })?;
            vec![SelectEvent::key(code)]
        }
        ScenarioStep::Type { text } => text
            .chars()
            .map(|c| SelectEvent::key(KeyCode::Char(c)))
            .collect(),
        ScenarioStep::Search { text } => vec![SelectEvent::SearchInput(text.clone())],
        ScenarioStep::Paste { text } => vec![SelectEvent::Paste(text.clone())],
        ScenarioStep::Click { value } => {
            if !value.is_empty() && select.options().find(value).is_none() {
                return Err(ScenarioError::UnknownOption {
                    step,
                    value: value.clone(),
                });
            }
            vec![SelectEvent::click(value.clone())]
        }
        ScenarioStep::ClearSelection => vec![SelectEvent::ClearSelection],
        ScenarioStep::ClearSearch => vec![SelectEvent::ClearSearch],
        ScenarioStep::Focus => vec![SelectEvent::Focus],
        ScenarioStep::Blur => vec![SelectEvent::Blur],
        ScenarioStep::Observe { .. } | ScenarioStep::SetDisabled { .. } => Vec::new(),
    };
    Ok(events)
}
