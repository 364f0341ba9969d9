//! The single-page form: password, input path, output path and action button.
//!
//! [`FormController`] owns the form state and is the only thing that mutates
//! it. An operation (picking a file or running the binary) holds a
//! [`BusyGuard`] for its whole duration; while the guard lives every field is
//! read-only and the action button is disabled, and dropping the guard puts
//! the form back to idle on every exit path, `?` included.

use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};

use log::{debug, info, warn};
use serde::Serialize;
use zeroize::Zeroizing;

use crate::error::Error;
use crate::labels::Labels;
use crate::picker::Picked;
use crate::process::LineSource;

/// Suffix of files produced by the encrypt sub-command.
pub const ARCHIVE_SUFFIX: &str = ".zip";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Encrypt,
    Decrypt,
}

impl Mode {
    pub fn for_input(path: &str) -> Self {
        if is_decrypt(path) {
            Mode::Decrypt
        } else {
            Mode::Encrypt
        }
    }

    pub fn subcommand(self) -> &'static str {
        match self {
            Mode::Encrypt => "e",
            Mode::Decrypt => "d",
        }
    }
}

pub fn is_decrypt(path: &str) -> bool {
    path.ends_with(ARCHIVE_SUFFIX)
}

/// Output path suggested for `input`: the archive suffix stripped for
/// decryption, appended for encryption.
pub fn derive_output(input: &str) -> String {
    match input.strip_suffix(ARCHIVE_SUFFIX) {
        Some(stem) => stem.to_string(),
        None => format!("{input}{ARCHIVE_SUFFIX}"),
    }
}

pub fn input_is_valid(input: &str) -> bool {
    !input.is_empty()
}

/// What the form talks to: the file-open dialog and the streaming runner.
pub trait Backend {
    type Lines: LineSource + Send;

    fn pick_file(&self) -> impl Future<Output = Result<Picked, Error>> + Send;

    fn run_streaming(
        &self,
        args: &[String],
    ) -> impl Future<Output = Result<Self::Lines, Error>> + Send;
}

/// Snapshot of the form as a view renders it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormView {
    pub input: String,
    pub output: String,
    /// Mode the action label was derived for at the last file selection.
    pub mode: Mode,
    pub action_label: &'static str,
    pub enabled: bool,
    pub busy: bool,
    pub input_valid: bool,
    pub can_run: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub mode: Mode,
    pub lines: usize,
}

struct FormState {
    password: Zeroizing<String>,
    input: String,
    output: String,
    label_mode: Mode,
    busy: bool,
}

impl FormState {
    fn select_input(&mut self, path: String) {
        self.label_mode = Mode::for_input(&path);
        self.output = derive_output(&path);
        self.input = path;
    }
}

type Listener = Box<dyn Fn(&FormView) + Send + Sync>;

pub struct FormController<B> {
    backend: B,
    labels: Labels,
    state: Mutex<FormState>,
    listener: Option<Listener>,
}

/// Held for the duration of one operation; the form is idle again once it
/// is dropped.
pub struct BusyGuard<'a, B> {
    form: &'a FormController<B>,
}

impl<B> BusyGuard<'_, B> {
    fn apply(&self, f: impl FnOnce(&mut FormState)) {
        f(&mut self.form.state());
        self.form.changed();
    }
}

impl<B> Drop for BusyGuard<'_, B> {
    fn drop(&mut self) {
        self.form.state().busy = false;
        self.form.changed();
    }
}

impl<B> FormController<B> {
    pub fn new(backend: B, labels: Labels) -> Self {
        Self {
            backend,
            labels,
            state: Mutex::new(FormState {
                password: Zeroizing::new(String::new()),
                input: String::new(),
                output: String::new(),
                label_mode: Mode::Encrypt,
                busy: false,
            }),
            listener: None,
        }
    }

    /// Registers a callback invoked with a fresh snapshot after every change,
    /// including entering and leaving the busy state.
    pub fn with_listener(mut self, listener: impl Fn(&FormView) + Send + Sync + 'static) -> Self {
        self.listener = Some(Box::new(listener));
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn labels(&self) -> &Labels {
        &self.labels
    }

    fn state(&self) -> MutexGuard<'_, FormState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn changed(&self) {
        if let Some(listener) = &self.listener {
            listener(&self.view());
        }
    }

    pub fn view(&self) -> FormView {
        let state = self.state();
        let input_valid = input_is_valid(&state.input);
        FormView {
            input: state.input.clone(),
            output: state.output.clone(),
            mode: state.label_mode,
            action_label: self.labels.action(state.label_mode),
            enabled: !state.busy,
            busy: state.busy,
            input_valid,
            can_run: input_valid && !state.busy,
        }
    }

    pub fn is_busy(&self) -> bool {
        self.state().busy
    }

    fn acquire(&self) -> Result<BusyGuard<'_, B>, Error> {
        {
            let mut state = self.state();
            if state.busy {
                return Err(Error::Busy);
            }
            state.busy = true;
        }
        self.changed();
        Ok(BusyGuard { form: self })
    }

    fn edit(&self, f: impl FnOnce(&mut FormState)) -> Result<FormView, Error> {
        {
            let mut state = self.state();
            if state.busy {
                return Err(Error::Busy);
            }
            f(&mut state);
        }
        self.changed();
        Ok(self.view())
    }

    pub fn set_password(&self, password: &str) -> Result<FormView, Error> {
        self.edit(|state| {
            state.password.clear();
            state.password.push_str(password);
        })
    }

    /// Edits the input path without touching the output path or the label.
    pub fn set_input(&self, input: &str) -> Result<FormView, Error> {
        self.edit(|state| state.input = input.to_string())
    }

    pub fn set_output(&self, output: &str) -> Result<FormView, Error> {
        self.edit(|state| state.output = output.to_string())
    }

    /// Takes `path` as if the file dialog had returned it.
    pub fn select_file(&self, path: &str) -> Result<FormView, Error> {
        self.edit(|state| state.select_input(path.to_string()))
    }
}

impl<B: Backend + Sync> FormController<B> {
    /// Shows the file dialog and, when a file was chosen, fills in the input
    /// path, the suggested output path and the action label.
    ///
    /// A dialog error leaves the form untouched and is not returned.
    pub async fn choose_file(&self) -> Result<FormView, Error> {
        let guard = self.acquire()?;
        match self.backend.pick_file().await? {
            Picked::Path(path) => {
                debug!("picked {path}");
                guard.apply(|state| state.select_input(path));
            }
            Picked::Failed(diagnostic) => {
                warn!("file dialog failed: {}", diagnostic.trim_end());
            }
        }
        drop(guard);
        Ok(self.view())
    }

    /// Runs the encrypt or decrypt sub-command for the current fields and
    /// feeds every progress line to `on_line`.
    ///
    /// The mode is taken from the input path at call time. The exit status of
    /// the binary is not consulted.
    pub async fn run<F>(&self, mut on_line: F) -> Result<RunSummary, Error>
    where
        F: FnMut(&str) + Send,
    {
        let guard = self.acquire()?;
        let (mode, args) = {
            let state = self.state();
            if !input_is_valid(&state.input) {
                return Err(Error::MissingInput);
            }
            let mode = Mode::for_input(&state.input);
            let args = Zeroizing::new(vec![
                mode.subcommand().to_string(),
                state.input.clone(),
                state.output.clone(),
                state.password.to_string(),
            ]);
            (mode, args)
        };
        info!("{mode:?}: {} -> {}", args[1], args[2]);

        let mut lines = self.backend.run_streaming(&args).await?;
        let mut count = 0;
        while let Some(line) = lines.next_line().await? {
            on_line(&line);
            count += 1;
        }
        info!("{mode:?} finished after {count} progress lines");

        drop(guard);
        Ok(RunSummary { mode, lines: count })
    }
}
