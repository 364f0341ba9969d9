use std::collections::VecDeque;
use std::io;
use std::sync::{Arc, Mutex};

use age_gui::form::{derive_output, input_is_valid, is_decrypt};
use age_gui::{
    Backend, Error, FormController, FormView, Labels, Lang, LineSource, Mode, Picked,
};
use tokio::sync::oneshot;

enum Step {
    Line(&'static str),
    Fault,
}

struct FakeLines {
    steps: VecDeque<Step>,
    gate: Option<oneshot::Receiver<()>>,
}

impl LineSource for FakeLines {
    async fn next_line(&mut self) -> Result<Option<String>, Error> {
        if let Some(gate) = self.gate.take() {
            let _ = gate.await;
        }
        match self.steps.pop_front() {
            Some(Step::Line(line)) => Ok(Some(line.to_string())),
            Some(Step::Fault) => Err(Error::Io(io::Error::other("pipe closed"))),
            None => Ok(None),
        }
    }
}

struct FakeBackend {
    picked: Picked,
    lines: Vec<&'static str>,
    fault: bool,
    launch_fails: bool,
    gate: Mutex<Option<oneshot::Receiver<()>>>,
    calls: Mutex<Vec<Vec<String>>>,
}

impl Default for FakeBackend {
    fn default() -> Self {
        Self {
            picked: Picked::Failed("cancelled".into()),
            lines: vec!["reading", "writing"],
            fault: false,
            launch_fails: false,
            gate: Mutex::new(None),
            calls: Mutex::new(Vec::new()),
        }
    }
}

impl Backend for FakeBackend {
    type Lines = FakeLines;

    async fn pick_file(&self) -> Result<Picked, Error> {
        Ok(self.picked.clone())
    }

    async fn run_streaming(&self, args: &[String]) -> Result<FakeLines, Error> {
        self.calls.lock().unwrap().push(args.to_vec());
        if self.launch_fails {
            return Err(Error::Spawn {
                program: "age".into(),
                source: io::Error::from(io::ErrorKind::NotFound),
            });
        }
        let mut steps: VecDeque<Step> = self.lines.iter().copied().map(Step::Line).collect();
        if self.fault {
            steps.push_back(Step::Fault);
        }
        Ok(FakeLines {
            steps,
            gate: self.gate.lock().unwrap().take(),
        })
    }
}

fn form(backend: FakeBackend) -> FormController<FakeBackend> {
    FormController::new(backend, Labels::for_lang(Lang::En))
}

fn picking(path: &str) -> FakeBackend {
    FakeBackend {
        picked: Picked::Path(path.into()),
        ..FakeBackend::default()
    }
}

fn calls(form: &FormController<FakeBackend>) -> Vec<Vec<String>> {
    form.backend().calls.lock().unwrap().clone()
}

#[test]
fn archive_suffix_selects_decrypt_and_strips() {
    for p in ["/tmp/secret.zip", "a.zip", ".zip", "dir.zip/file.zip", "相册.zip"] {
        assert!(is_decrypt(p), "{p}");
        assert_eq!(Mode::for_input(p), Mode::Decrypt);
        let out = derive_output(p);
        assert_eq!(out, p[..p.len() - 4]);
        assert_eq!(format!("{out}.zip"), p);
    }
}

#[test]
fn other_paths_select_encrypt_and_append() {
    for p in ["/tmp/report.pdf", "archive.ZIP", "zip", "a.zip.bak", "报告.txt"] {
        assert!(!is_decrypt(p), "{p}");
        assert_eq!(Mode::for_input(p), Mode::Encrypt);
        let out = derive_output(p);
        assert_eq!(out, format!("{p}.zip"));
        assert_eq!(&out[..out.len() - 4], p);
    }
}

#[test]
fn subcommands() {
    assert_eq!(Mode::Encrypt.subcommand(), "e");
    assert_eq!(Mode::Decrypt.subcommand(), "d");
}

#[test]
fn empty_input_disables_button() {
    assert!(!input_is_valid(""));
    assert!(input_is_valid(" "));

    let form = form(FakeBackend::default());
    let view = form.view();
    assert!(view.enabled);
    assert!(!view.busy);
    assert!(!view.input_valid);
    assert!(!view.can_run);
    assert_eq!(view.action_label, "Encrypt");
}

#[tokio::test]
async fn cancelled_picker_leaves_form_untouched() {
    let form = form(FakeBackend::default());
    form.set_output("/keep/me").unwrap();

    let view = form.choose_file().await.unwrap();
    assert_eq!(view.input, "");
    assert_eq!(view.output, "/keep/me");
    assert!(!view.busy);
    assert!(view.enabled);
    assert!(!view.can_run);
}

#[tokio::test]
async fn picking_an_archive_selects_decrypt() {
    let form = form(picking("/tmp/secret.zip"));
    let view = form.choose_file().await.unwrap();
    assert_eq!(view.input, "/tmp/secret.zip");
    assert_eq!(view.output, "/tmp/secret");
    assert_eq!(view.mode, Mode::Decrypt);
    assert_eq!(view.action_label, "Decrypt");
    assert!(view.can_run);
}

#[tokio::test]
async fn picking_a_plain_file_selects_encrypt() {
    let form = form(picking("/tmp/report.pdf"));
    let view = form.choose_file().await.unwrap();
    assert_eq!(view.input, "/tmp/report.pdf");
    assert_eq!(view.output, "/tmp/report.pdf.zip");
    assert_eq!(view.mode, Mode::Encrypt);
    assert_eq!(view.action_label, "Encrypt");
    assert!(view.can_run);
}

#[tokio::test]
async fn picking_goes_busy_then_idle() {
    let seen: Arc<Mutex<Vec<FormView>>> = Arc::default();
    let sink = Arc::clone(&seen);
    let form = form(picking("/tmp/report.pdf"))
        .with_listener(move |view| sink.lock().unwrap().push(view.clone()));

    form.choose_file().await.unwrap();

    let seen = seen.lock().unwrap();
    let first = seen.first().unwrap();
    assert!(first.busy);
    assert!(!first.enabled);
    assert!(!first.can_run);
    let last = seen.last().unwrap();
    assert!(!last.busy);
    assert!(last.can_run);
    assert_eq!(last.input, "/tmp/report.pdf");
}

#[tokio::test]
async fn run_passes_fixed_argument_order() {
    let form = form(picking("/tmp/report.pdf"));
    form.choose_file().await.unwrap();
    form.set_password("x").unwrap();

    let mut lines = Vec::new();
    let summary = form.run(|line| lines.push(line.to_string())).await.unwrap();

    assert_eq!(
        calls(&form),
        vec![vec!["e", "/tmp/report.pdf", "/tmp/report.pdf.zip", "x"]]
    );
    assert_eq!(summary.mode, Mode::Encrypt);
    assert_eq!(summary.lines, 2);
    assert_eq!(lines, ["reading", "writing"]);
    assert!(!form.is_busy());
    assert!(form.view().can_run);
}

#[tokio::test]
async fn run_uses_edited_output() {
    let form = form(picking("/tmp/secret.zip"));
    form.choose_file().await.unwrap();
    form.set_output("/home/me/secret").unwrap();
    form.set_password("pw").unwrap();

    form.run(|_| {}).await.unwrap();
    assert_eq!(
        calls(&form),
        vec![vec!["d", "/tmp/secret.zip", "/home/me/secret", "pw"]]
    );
}

#[tokio::test]
async fn run_rederives_mode_from_edited_input() {
    let form = form(picking("/tmp/report.pdf"));
    form.choose_file().await.unwrap();

    let view = form.set_input("/tmp/other.zip").unwrap();
    assert_eq!(view.action_label, "Encrypt");
    assert_eq!(view.output, "/tmp/report.pdf.zip");

    let summary = form.run(|_| {}).await.unwrap();
    assert_eq!(summary.mode, Mode::Decrypt);
    assert_eq!(calls(&form)[0][0], "d");
}

#[tokio::test]
async fn fields_reject_edits_while_running() {
    let form = form(picking("/tmp/report.pdf"));
    form.choose_file().await.unwrap();

    let mut probes = Vec::new();
    form.run(|_| {
        let view = form.view();
        probes.push((
            matches!(form.set_password("y"), Err(Error::Busy)),
            matches!(form.set_input("/x"), Err(Error::Busy)),
            matches!(form.set_output("/y"), Err(Error::Busy)),
            matches!(form.select_file("/z"), Err(Error::Busy)),
            view.busy && !view.enabled && !view.can_run,
        ));
    })
    .await
    .unwrap();

    assert_eq!(probes, vec![(true, true, true, true, true); 2]);
    let view = form.view();
    assert_eq!(view.input, "/tmp/report.pdf");
    assert_eq!(view.output, "/tmp/report.pdf.zip");
    assert!(form.set_password("y").is_ok());
}

#[tokio::test]
async fn stream_fault_still_releases_form() {
    let form = form(FakeBackend {
        fault: true,
        ..picking("/tmp/report.pdf")
    });
    form.choose_file().await.unwrap();

    let mut busy_during = Vec::new();
    let err = form
        .run(|_| busy_during.push(form.is_busy()))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Io(_)));
    assert_eq!(busy_during, [true, true]);
    assert!(!form.is_busy());
    assert!(form.view().can_run);
}

#[tokio::test]
async fn launch_failure_propagates_and_releases() {
    let form = form(FakeBackend {
        launch_fails: true,
        ..picking("/tmp/report.pdf")
    });
    form.choose_file().await.unwrap();

    let err = form.run(|_| {}).await.unwrap_err();
    assert!(matches!(err, Error::Spawn { .. }));
    assert!(!form.is_busy());
    assert!(form.view().enabled);
}

#[tokio::test]
async fn run_without_input_is_rejected() {
    let form = form(FakeBackend::default());
    let err = form.run(|_| {}).await.unwrap_err();
    assert!(matches!(err, Error::MissingInput));
    assert!(calls(&form).is_empty());
    assert!(!form.is_busy());
}

#[tokio::test]
async fn second_operation_while_busy_is_rejected() {
    let (release, gate) = oneshot::channel();
    let form = form(FakeBackend {
        gate: Mutex::new(Some(gate)),
        ..picking("/tmp/report.pdf")
    });
    form.select_file("/tmp/report.pdf").unwrap();

    let running = form.run(|_| {});
    let competing = async {
        let picked = form.choose_file().await;
        let ran = form.run(|_| {}).await;
        let _ = release.send(());
        (picked, ran)
    };
    let (summary, (picked, ran)) = tokio::join!(running, competing);

    assert_eq!(summary.unwrap().lines, 2);
    assert!(matches!(picked, Err(Error::Busy)));
    assert!(matches!(ran, Err(Error::Busy)));
    assert_eq!(calls(&form).len(), 1);
    assert!(!form.is_busy());
}
