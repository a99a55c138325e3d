#![forbid(unsafe_code)]

//! Interaction state machine.
//!
//! The machine has two states, closed and open; while open it tracks the
//! visual focus and the search text. [`transition`] is a pure function from
//! `(context, state, event)` to a [`Step`]: the next state, the value to
//! commit (if any) and the ordered effects. [`Select`] owns one control's
//! data and applies steps.
//!
//! # Invariants
//!
//! 1. Closing always clears the visual focus.
//! 2. Changing the search text clears the visual focus, because positions
//!    computed against the previous projection no longer mean anything.
//! 3. `focus` never exceeds the last navigable index of the displayed tree.
//! 4. A disabled control ignores everything except blur.
//!
//! # Usage
//!
//! ```
//! use lbx_select::prelude::*;
//!
//! let options = vec![SelectOption::new("a", "Alpha"), SelectOption::new("b", "Beta")];
//! let mut select = Select::new(options, SelectConfig::new());
//!
//! select.handle(SelectEvent::key(KeyCode::Down));
//! let transition = select.handle(SelectEvent::key(KeyCode::Enter));
//!
//! assert_eq!(select.value(), &SelectionValue::single("a"));
//! assert!(!select.is_open());
//! assert_eq!(transition.change().map(|c| c.error.is_none()), Some(true));
//! ```

use lbx_core::event::{Event, KeyCode, KeyEvent};
use lbx_core::{debug, debug_span, trace, warn};
use unicode_segmentation::UnicodeSegmentation;

use crate::config::SelectConfig;
use crate::effect::{Effect, Effects, Transition, ValueEvent};
use crate::error::{SelectError, check_required};
use crate::filter::filter_by_search;
use crate::index::{FlatIndex, Resolved};
use crate::nav::{last_selectable_index, next_index, previous_index, shows_pseudo_option};
use crate::option::{Options, SelectOption};
use crate::value::{Selection, SelectionValue, ValueSource, selected_option};

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// Everything a host can tell a select control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectEvent {
    /// Click (or equivalent) on the trigger.
    Activate,
    /// A key press on the control.
    Key(KeyEvent),
    /// Text pasted into the control.
    Paste(String),
    /// The search field's text was replaced.
    SearchInput(String),
    /// An option row was clicked, identified by value. `""` is the
    /// pseudo-option.
    OptionClicked(String),
    /// The clear-selection action (multiple mode).
    ClearSelection,
    /// The clear-search action (searchable mode).
    ClearSearch,
    /// Focus entered the control.
    Focus,
    /// Focus left the control entirely.
    Blur,
}

impl SelectEvent {
    /// A plain key press.
    #[must_use]
    pub const fn key(code: KeyCode) -> Self {
        Self::Key(KeyEvent::new(code))
    }

    /// A click on the option with `value`.
    pub fn click(value: impl Into<String>) -> Self {
        Self::OptionClicked(value.into())
    }

    /// Short stable name, used in logs and transcripts.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Activate => "activate",
            Self::Key(_) => "key",
            Self::Paste(_) => "paste",
            Self::SearchInput(_) => "search_input",
            Self::OptionClicked(_) => "option_clicked",
            Self::ClearSelection => "clear_selection",
            Self::ClearSearch => "clear_search",
            Self::Focus => "focus",
            Self::Blur => "blur",
        }
    }
}

impl From<Event> for SelectEvent {
    fn from(event: Event) -> Self {
        match event {
            Event::Key(key) => Self::Key(key),
            Event::Paste(paste) => Self::Paste(paste.text),
            Event::Focus(true) => Self::Focus,
            Event::Focus(false) => Self::Blur,
        }
    }
}

impl From<KeyEvent> for SelectEvent {
    fn from(key: KeyEvent) -> Self {
        Self::Key(key)
    }
}

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

/// Ephemeral interaction state. `Default` is the closed baseline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct InteractionState {
    /// Listbox visibility.
    pub open: bool,
    /// Focused flattened position in the displayed tree.
    pub focus: Option<usize>,
    /// Search text; empty means no filter.
    pub search: String,
}

/// Read-only inputs of a transition.
#[derive(Debug, Clone, Copy)]
pub struct Context<'a> {
    /// The full option tree.
    pub options: &'a Options,
    /// What the listbox shows: the filtered tree when searchable.
    pub displayed: &'a Options,
    /// Index table built from `displayed`.
    pub index: &'a FlatIndex,
    /// Behaviour flags and labels.
    pub config: &'a SelectConfig,
    /// The current value, owned or observed.
    pub value: &'a SelectionValue,
    /// The synthetic "no selection" option.
    pub pseudo: &'a SelectOption,
}

impl<'a> Context<'a> {
    /// Last navigable position in the displayed tree.
    #[must_use]
    pub fn last_index(&self) -> Option<usize> {
        let last = last_selectable_index(
            self.options,
            self.displayed,
            self.config.searchable,
            self.config.optional,
            self.config.multiple,
        );
        debug_assert_eq!(last, self.index.last(), "index built from another tree");
        last
    }

    /// Whether the listbox may open.
    #[must_use]
    pub fn can_open(&self) -> bool {
        !self.config.disabled && self.options.has_any_selectable()
    }

    /// The option(s) the current value points at.
    #[must_use]
    pub fn selection(&self) -> Selection<'a> {
        selected_option(self.value, self.options, self.config.optional, self.pseudo)
    }

    fn required_error(&self, value: &SelectionValue) -> Option<SelectError> {
        check_required(
            value,
            self.config.optional,
            &self.config.labels.required_value_error,
        )
    }
}

/// Outcome of [`transition`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    /// Interaction state after the event.
    pub state: InteractionState,
    /// Value to commit. Owned values take it; observed values ignore it.
    pub commit: Option<SelectionValue>,
    /// Effects in the order they happened.
    pub effects: Effects,
    /// Whether the control consumed the event.
    pub handled: bool,
}

// ---------------------------------------------------------------------------
// Transition function
// ---------------------------------------------------------------------------

/// Compute the step for `event` without mutating anything.
#[must_use]
pub fn transition(ctx: &Context<'_>, state: &InteractionState, event: &SelectEvent) -> Step {
    let mut draft = Draft::new(ctx, state);

    if ctx.config.disabled && !matches!(event, SelectEvent::Blur) {
        trace!(event = event.name(), "ignored: control disabled");
        return draft.finish();
    }

    match event {
        SelectEvent::Activate => draft.activate(),
        SelectEvent::Key(key) => draft.key(*key),
        SelectEvent::Paste(text) => draft.paste(text),
        SelectEvent::SearchInput(text) => {
            if ctx.config.searchable {
                draft.search_input(text.clone());
            }
        }
        SelectEvent::OptionClicked(value) => draft.option_clicked(value),
        SelectEvent::ClearSelection => draft.clear_selection(),
        SelectEvent::ClearSearch => {
            if ctx.config.searchable {
                draft.handled = true;
                draft.set_search(String::new());
            }
        }
        SelectEvent::Focus => {
            draft.handled = true;
            if ctx.config.searchable {
                draft.effects.push(Effect::FocusSearchInput);
            }
        }
        SelectEvent::Blur => draft.blur(),
    }

    draft.finish()
}

/// Step under construction.
struct Draft<'c, 'a> {
    ctx: &'c Context<'a>,
    state: InteractionState,
    commit: Option<SelectionValue>,
    effects: Effects,
    handled: bool,
}

impl<'c, 'a> Draft<'c, 'a> {
    fn new(ctx: &'c Context<'a>, state: &InteractionState) -> Self {
        Self {
            ctx,
            state: state.clone(),
            commit: None,
            effects: Effects::new(),
            handled: false,
        }
    }

    fn finish(self) -> Step {
        Step {
            state: self.state,
            commit: self.commit,
            effects: self.effects,
            handled: self.handled,
        }
    }

    fn multiple(&self) -> bool {
        self.ctx.config.multiple
    }

    // --- State cells ---

    fn open(&mut self) {
        if !self.state.open && self.ctx.can_open() {
            self.state.open = true;
            self.effects.push(Effect::Opened);
        }
    }

    fn close(&mut self) {
        if self.state.open {
            self.state.open = false;
            self.state.focus = None;
            self.effects.push(Effect::Closed);
        }
    }

    fn set_focus(&mut self, index: Option<usize>) {
        if self.state.focus != index {
            self.state.focus = index;
            self.effects.push(Effect::FocusMoved { index });
        }
    }

    fn set_search(&mut self, text: String) {
        if self.state.search != text {
            self.state.search.clone_from(&text);
            self.effects.push(Effect::SearchChanged { text });
            self.set_focus(None);
        }
    }

    fn commit(&mut self, option: &SelectOption) {
        let next = self.ctx.value.committed(option);
        let error = self.ctx.required_error(&next);
        debug!(
            value = ?next,
            error = error.is_some(),
            "selection committed"
        );
        self.effects.push(Effect::Changed(ValueEvent {
            value: next.clone(),
            error,
        }));
        self.commit = Some(next);
    }

    // --- Event handlers ---

    fn activate(&mut self) {
        self.handled = true;
        if self.ctx.config.searchable {
            self.effects.push(Effect::FocusSearchInput);
        }
        if self.state.open {
            self.close();
            self.set_search(String::new());
        } else {
            self.open();
        }
    }

    fn key(&mut self, key: KeyEvent) {
        if !key.is_actionable() {
            return;
        }
        match key.code {
            KeyCode::Down => self.arrow(next_index),
            KeyCode::Up => self.arrow(previous_index),
            KeyCode::Home => self.edge(|_| 0),
            KeyCode::End => self.edge(|last| last),
            KeyCode::Escape => self.escape(),
            KeyCode::Enter => self.enter(),
            KeyCode::Backspace if self.ctx.config.searchable => {
                let mut graphemes: Vec<&str> = self.state.search.graphemes(true).collect();
                if graphemes.pop().is_some() {
                    let text = graphemes.concat();
                    self.search_input(text);
                }
            }
            _ => {
                if self.ctx.config.searchable
                    && let Some(c) = key.text_char()
                {
                    let mut text = self.state.search.clone();
                    text.push(c);
                    self.search_input(text);
                }
            }
        }
    }

    /// Arrow navigation. A real single selection inside the navigable range
    /// wins over stepping while the listbox is closed or unfocused.
    fn arrow(&mut self, step: fn(Option<usize>, usize) -> usize) {
        self.handled = true;
        if let Some(last) = self.ctx.last_index() {
            let unfocused = !self.state.open || self.state.focus.is_none();
            let target = match self.ctx.selection().jump_target() {
                Some(selected) if unfocused && selected <= last => selected,
                _ => step(self.state.focus, last),
            };
            self.set_focus(Some(target));
        }
        self.open();
    }

    /// Home/End: focus the first or last navigable row.
    fn edge(&mut self, pick: fn(usize) -> usize) {
        self.handled = true;
        if let Some(last) = self.ctx.last_index() {
            self.set_focus(Some(pick(last)));
        }
        self.open();
    }

    fn escape(&mut self) {
        self.handled = true;
        if self.state.open {
            self.effects.push(Effect::StopPropagation);
            self.close();
        }
        self.set_search(String::new());
    }

    fn enter(&mut self) {
        let ctx = self.ctx;
        let Some(focus) = self.state.focus.filter(|_| self.state.open) else {
            return;
        };
        self.handled = true;

        match ctx.index.resolve(ctx.displayed, focus) {
            Some(Resolved::Pseudo) => self.commit(ctx.pseudo),
            Some(Resolved::Option(option)) if option.disabled => {
                trace!(value = %option.value, "ignored: option disabled");
                return;
            }
            Some(Resolved::Option(option)) => self.commit(option),
            None => {
                trace!(focus, "focused position resolves to nothing");
            }
        }

        if !self.multiple() {
            self.close();
        }
        self.set_search(String::new());
    }

    fn search_input(&mut self, text: String) {
        if !self.ctx.can_open() {
            trace!("ignored: nothing to search");
            return;
        }
        self.handled = true;
        self.set_search(text);
        self.set_focus(None);
        self.open();
    }

    fn paste(&mut self, text: &str) {
        if !self.ctx.config.searchable {
            return;
        }
        let pasted: String = text.chars().filter(|c| !c.is_control()).collect();
        if pasted.is_empty() {
            return;
        }
        let mut next = self.state.search.clone();
        next.push_str(&pasted);
        self.search_input(next);
    }

    fn option_clicked(&mut self, value: &str) {
        let ctx = self.ctx;
        let option = if value.is_empty() && ctx.config.has_pseudo_option() {
            Some(ctx.pseudo)
        } else {
            ctx.options.find(value).map(|(_, option)| option)
        };
        let Some(option) = option else {
            warn!(value, "click on unknown option ignored");
            return;
        };
        self.handled = true;
        if option.disabled {
            trace!(value, "ignored: option disabled");
            return;
        }

        self.commit(option);
        if !self.multiple() {
            self.close();
        }
        self.set_search(String::new());
    }

    fn clear_selection(&mut self) {
        if !self.multiple() {
            return;
        }
        self.handled = true;
        let next = SelectionValue::empty(true);
        let error = self.ctx.required_error(&next);
        debug!(error = error.is_some(), "selection cleared");
        self.effects.push(Effect::Changed(ValueEvent {
            value: next.clone(),
            error,
        }));
        self.commit = Some(next);
    }

    fn blur(&mut self) {
        self.handled = true;
        self.close();
        self.set_search(String::new());
        let value = self.ctx.value.clone();
        let error = self.ctx.required_error(&value);
        self.effects.push(Effect::Blurred(ValueEvent { value, error }));
    }
}

// ---------------------------------------------------------------------------
// Select control
// ---------------------------------------------------------------------------

/// One select control: options, configuration, value and interaction state.
///
/// The displayed tree and its [`FlatIndex`] are rebuilt whenever the options
/// or the search text change, never during navigation.
#[derive(Debug, Clone)]
pub struct Select {
    options: Options,
    config: SelectConfig,
    source: ValueSource,
    pseudo: SelectOption,
    state: InteractionState,
    /// Filtered tree; `None` when the control is not searchable.
    filtered: Option<Options>,
    index: FlatIndex,
    last_error: Option<SelectError>,
}

impl Select {
    /// Create an uncontrolled control starting from the empty value.
    pub fn new(options: impl Into<Options>, config: SelectConfig) -> Self {
        Self::uncontrolled(options, config, None)
    }

    /// Create an uncontrolled control. The engine owns the value from now on.
    pub fn uncontrolled(
        options: impl Into<Options>,
        config: SelectConfig,
        default_value: Option<SelectionValue>,
    ) -> Self {
        let value = default_value.unwrap_or_else(|| SelectionValue::empty(config.multiple));
        Self::with_source(options, config, ValueSource::Owned(value))
    }

    /// Create a controlled control. The host owns `value` and feeds changes
    /// back through [`Select::observe`].
    pub fn controlled(
        options: impl Into<Options>,
        config: SelectConfig,
        value: SelectionValue,
    ) -> Self {
        Self::with_source(options, config, ValueSource::Observed(value))
    }

    /// Create a control from an explicit value source.
    pub fn with_source(options: impl Into<Options>, config: SelectConfig, source: ValueSource) -> Self {
        let multiple = config.multiple;
        let source = match source {
            ValueSource::Owned(value) => ValueSource::Owned(value.conform(multiple)),
            ValueSource::Observed(value) => ValueSource::Observed(value.conform(multiple)),
        };
        let mut select = Self {
            options: options.into(),
            pseudo: config.pseudo_option(),
            config,
            source,
            state: InteractionState::default(),
            filtered: None,
            index: FlatIndex::default(),
            last_error: None,
        };
        select.reproject();
        select
    }

    // --- Accessors ---

    /// The full option tree.
    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// What the listbox shows: filtered when searchable.
    #[must_use]
    pub fn displayed(&self) -> &Options {
        self.filtered.as_ref().unwrap_or(&self.options)
    }

    /// Index table of the displayed tree.
    #[must_use]
    pub fn index(&self) -> &FlatIndex {
        &self.index
    }

    /// Configuration.
    #[must_use]
    pub fn config(&self) -> &SelectConfig {
        &self.config
    }

    /// Current value (owned or observed).
    #[must_use]
    pub fn value(&self) -> &SelectionValue {
        self.source.current()
    }

    /// Whether the host owns the value.
    #[must_use]
    pub fn is_controlled(&self) -> bool {
        self.source.is_controlled()
    }

    /// Interaction state.
    #[must_use]
    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    /// Whether the listbox is open.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.state.open
    }

    /// Focused flattened position.
    #[must_use]
    pub fn visual_focus(&self) -> Option<usize> {
        self.state.focus
    }

    /// Current search text.
    #[must_use]
    pub fn search(&self) -> &str {
        &self.state.search
    }

    /// The synthetic "no selection" option.
    #[must_use]
    pub fn pseudo_option(&self) -> &SelectOption {
        &self.pseudo
    }

    /// Error attached to the most recent change or blur notification.
    #[must_use]
    pub fn last_error(&self) -> Option<&SelectError> {
        self.last_error.as_ref()
    }

    /// Last navigable position in the displayed tree.
    #[must_use]
    pub fn last_index(&self) -> Option<usize> {
        self.context().last_index()
    }

    /// The option(s) the current value points at.
    #[must_use]
    pub fn selection(&self) -> Selection<'_> {
        self.context().selection()
    }

    /// Read-only transition inputs.
    #[must_use]
    pub fn context(&self) -> Context<'_> {
        Context {
            options: &self.options,
            displayed: self.displayed(),
            index: &self.index,
            config: &self.config,
            value: self.source.current(),
            pseudo: &self.pseudo,
        }
    }

    // --- Transitions ---

    /// Handle one event and apply the resulting step.
    pub fn handle(&mut self, event: impl Into<SelectEvent>) -> Transition {
        let event = event.into();
        let _span = debug_span!("select_event", id = %self.config.id, event = event.name()).entered();

        let step = transition(&self.context(), &self.state, &event);
        let search_changed = step.state.search != self.state.search;
        self.state = step.state;

        if let Some(next) = step.commit
            && !self.source.apply(next)
        {
            trace!("controlled value: change proposed, not applied");
        }
        for effect in &step.effects {
            if let Effect::Changed(notification) | Effect::Blurred(notification) = effect {
                self.last_error.clone_from(&notification.error);
            }
        }
        if search_changed {
            self.reproject();
        }

        Transition {
            effects: step.effects,
            handled: step.handled,
        }
    }

    /// Accept a new value from the host (controlled controls only).
    ///
    /// Returns `false`, leaving the value untouched, for uncontrolled
    /// controls: their ownership cannot flip after construction.
    pub fn observe(&mut self, value: SelectionValue) -> bool {
        let accepted = self.source.observe(value.conform(self.config.multiple));
        if !accepted {
            warn!(id = %self.config.id, "observe() on an uncontrolled select ignored");
        }
        accepted
    }

    /// Replace the option tree (a new render with different options).
    ///
    /// Focus is cleared when it no longer addresses a row. When nothing is
    /// left to select the control drops back to its closed baseline.
    pub fn set_options(&mut self, options: impl Into<Options>) -> Transition {
        self.options = options.into();
        let mut effects = Effects::new();
        if self.options.has_any_selectable() {
            self.reproject();
            let fits = matches!(
                (self.state.focus, self.index.last()),
                (Some(focus), Some(last)) if focus <= last
            );
            if self.state.focus.is_some() && !fits {
                self.state.focus = None;
                effects.push(Effect::FocusMoved { index: None });
            }
        } else {
            self.reset_to_closed(&mut effects);
        }
        Transition {
            effects,
            handled: true,
        }
    }

    /// Enable or disable the control. Disabling closes an open listbox.
    pub fn set_disabled(&mut self, disabled: bool) -> Transition {
        self.config.disabled = disabled;
        let mut effects = Effects::new();
        if disabled {
            self.reset_to_closed(&mut effects);
        }
        Transition {
            effects,
            handled: true,
        }
    }

    /// Close the listbox and clear the search, reprojecting the options.
    fn reset_to_closed(&mut self, effects: &mut Effects) {
        if self.state.open {
            self.state.open = false;
            self.state.focus = None;
            effects.push(Effect::Closed);
        }
        if !self.state.search.is_empty() {
            self.state.search.clear();
            effects.push(Effect::SearchChanged {
                text: String::new(),
            });
        }
        self.reproject();
    }

    fn reproject(&mut self) {
        self.filtered = self
            .config
            .searchable
            .then(|| filter_by_search(&self.options, &self.state.search));
        let displayed = self.filtered.as_ref().unwrap_or(&self.options);
        let with_pseudo =
            shows_pseudo_option(displayed, self.config.optional, self.config.multiple);
        self.index = FlatIndex::build(displayed, with_pseudo);
    }
}
