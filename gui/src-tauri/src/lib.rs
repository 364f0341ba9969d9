mod form_ipc;

use age_gui::Config;
use clap::Parser;
use form_ipc::{choose_file, form_state, run_action, set_input, set_output, set_password, AgeState};
use tauri::{Manager, WebviewUrl, WebviewWindowBuilder};

#[derive(Parser, Debug)]
#[command(name = "age-gui-desktop", version)]
struct Cli {
    #[command(flatten)]
    config: Config,
}

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    run_with(Cli::parse().config);
}

pub fn run_with(config: Config) {
    tauri::Builder::default()
        .setup(move |app| {
            if cfg!(debug_assertions) {
                app.handle().plugin(
                    tauri_plugin_log::Builder::default()
                        .level(log::LevelFilter::Info)
                        .build(),
                )?;
            }
            log::info!("using external binary {}", config.binary);
            app.manage(AgeState::new(app.handle().clone(), &config));

            WebviewWindowBuilder::new(app, "main", WebviewUrl::App("index.html".into()))
                .title(&config.title)
                .inner_size(f64::from(config.width), f64::from(config.height))
                .resizable(false)
                .center()
                .build()?;
            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            form_state,
            set_password,
            set_input,
            set_output,
            choose_file,
            run_action
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
