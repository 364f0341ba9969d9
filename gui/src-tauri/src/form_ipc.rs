use std::sync::atomic::{AtomicU64, Ordering};

use age_gui::{AgeBinary, Config, FormController, FormView, Labels, Mode};
use serde::Serialize;
use tauri::{AppHandle, Emitter, State};
use zeroize::Zeroizing;

pub struct AgeState {
    form: FormController<AgeBinary>,
    next_id: AtomicU64,
}

impl AgeState {
    pub fn new(app: AppHandle, config: &Config) -> Self {
        let form = FormController::new(config.backend(), config.labels()).with_listener(
            move |view: &FormView| {
                let _ = app.emit("age/form", view);
            },
        );
        Self {
            form,
            next_id: AtomicU64::new(0),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LogEvent {
    pub id: u64,
    pub line: String,
}

#[derive(Debug, Serialize)]
pub struct PageState {
    pub labels: Labels,
    pub form: FormView,
}

#[derive(Debug, Serialize)]
pub struct RunResult {
    pub id: u64,
    pub mode: Mode,
    pub lines: usize,
    pub form: FormView,
}

#[tauri::command]
pub fn form_state(state: State<'_, AgeState>) -> PageState {
    PageState {
        labels: state.form.labels().clone(),
        form: state.form.view(),
    }
}

#[tauri::command]
pub fn set_password(state: State<'_, AgeState>, mut password: String) -> Result<FormView, String> {
    let password = Zeroizing::new(std::mem::take(&mut password));
    state
        .form
        .set_password(&password)
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub fn set_input(state: State<'_, AgeState>, input: String) -> Result<FormView, String> {
    state.form.set_input(&input).map_err(|e| e.to_string())
}

#[tauri::command]
pub fn set_output(state: State<'_, AgeState>, output: String) -> Result<FormView, String> {
    state.form.set_output(&output).map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn choose_file(state: State<'_, AgeState>) -> Result<FormView, String> {
    state.form.choose_file().await.map_err(|e| {
        log::error!("file dialog: {e}");
        e.to_string()
    })
}

#[tauri::command]
pub async fn run_action(app: AppHandle, state: State<'_, AgeState>) -> Result<RunResult, String> {
    let id = state.next_id.fetch_add(1, Ordering::Relaxed) + 1;
    let summary = state
        .form
        .run(|line| {
            log::info!("[{id}] {line}");
            let _ = app.emit(
                "age/log",
                LogEvent {
                    id,
                    line: line.to_string(),
                },
            );
        })
        .await
        .map_err(|e| {
            log::error!("run {id}: {e}");
            e.to_string()
        })?;

    Ok(RunResult {
        id,
        mode: summary.mode,
        lines: summary.lines,
        form: state.form.view(),
    })
}
