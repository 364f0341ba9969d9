use age_gui::Config;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "age-gui", version)]
#[command(about = "Pick, encrypt and decrypt files through the age binary.")]
pub struct Cli {
    #[command(flatten)]
    pub config: Config,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve the form page on --host/--port for the desktop window.
    ServeUi,
    /// Open the file dialog and show the resulting form.
    Pick,
    /// Encrypt or decrypt INPUT, depending on its suffix.
    Run {
        input: String,
        /// Defaults to the path derived from INPUT.
        #[arg(long)]
        output: Option<String>,
        /// Prompted for when omitted.
        #[arg(long)]
        password: Option<String>,
    },
}
