use age_gui::{ui_server, AgeBinary, Error, FormController, FormView, Labels};
use log::info;
use zeroize::Zeroizing;

use crate::cli::{Cli, Command};

pub async fn run(cli: Cli) -> Result<(), Error> {
    let form = FormController::new(cli.config.backend(), cli.config.labels());
    match cli.command {
        Command::ServeUi => ui_server::serve(ui_server::bind(&cli.config).await?).await,
        Command::Pick => pick(&form).await,
        Command::Run {
            input,
            output,
            password,
        } => execute(&form, &input, output.as_deref(), password).await,
    }
}

fn print_form(labels: &Labels, view: &FormView) {
    println!("{}: {}", labels.input, view.input);
    println!("{}: {}", labels.output, view.output);
    println!("[{}]", view.action_label);
}

async fn pick(form: &FormController<AgeBinary>) -> Result<(), Error> {
    let view = form.choose_file().await?;
    if view.input_valid {
        print_form(form.labels(), &view);
    }
    Ok(())
}

fn prompt_password(labels: &Labels) -> Result<Zeroizing<String>, Error> {
    rpassword::prompt_password(format!("{}: ", labels.password))
        .map(Zeroizing::new)
        .map_err(|_| Error::Password)
}

async fn execute(
    form: &FormController<AgeBinary>,
    input: &str,
    output: Option<&str>,
    password: Option<String>,
) -> Result<(), Error> {
    form.select_file(input)?;
    if let Some(output) = output {
        form.set_output(output)?;
    }
    let password = match password {
        Some(password) => Zeroizing::new(password),
        None => prompt_password(form.labels())?,
    };
    form.set_password(&password)?;
    drop(password);

    print_form(form.labels(), &form.view());
    let summary = form.run(|line| eprintln!("{line}")).await?;
    info!(
        "{} finished ({} progress lines)",
        form.backend().program(),
        summary.lines
    );
    Ok(())
}
