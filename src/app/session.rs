use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use super::event_handler::{copy_output, handle_backend_event};
use super::pipeline::{translate_all, translate_unit};
use super::state::{AppState, BackendEvent, UnitId, UNIT_COUNT};
use crate::ui::grid::{render_grid, render_notice, render_unit, unit_label};
use crate::ui::repl::{parse_command, Command, HELP, PASTE_END};

/// Apply completion events until no unit is loading.
pub async fn wait_until_idle(state: &mut AppState, rx: &async_channel::Receiver<BackendEvent>) {
    while !state.units.is_idle() {
        match rx.recv().await {
            Ok(event) => {
                handle_backend_event(&mut state.units, event);
            }
            Err(_) => {
                log::warn!("Backend channel closed with {} unit(s) in flight", state.units.in_flight());
                break;
            }
        }
    }
}

/// Outcome counts of a batch run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub translated: usize,
    pub failed: usize,
    pub skipped: usize,
}

/// Load one file per unit, translate everything, and write out the results.
///
/// With `out_dir` each successful unit is written under its source file name
/// (prefixed with its unit number when two inputs share a name);
/// otherwise outputs go to stdout under a unit header.
pub async fn run_batch(
    state: &mut AppState,
    rx: &async_channel::Receiver<BackendEvent>,
    files: &[PathBuf],
    out_dir: Option<&Path>,
    copy: Option<UnitId>,
) -> anyhow::Result<BatchReport> {
    if files.len() > UNIT_COUNT {
        bail!("at most {UNIT_COUNT} files can be translated at once, got {}", files.len());
    }

    for (id, path) in files.iter().enumerate() {
        let html = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("reading {}", path.display()))?;
        state.units.set_input(id, html);
    }

    translate_all(state);
    wait_until_idle(state, rx).await;

    if let Some(dir) = out_dir {
        tokio::fs::create_dir_all(dir)
            .await
            .with_context(|| format!("creating {}", dir.display()))?;
    }

    let names = output_names(files);
    let mut report = BatchReport::default();
    for (id, path) in files.iter().enumerate() {
        let Some(unit) = state.units.get(id) else {
            continue;
        };
        if !unit.has_input() {
            log::info!("{}: {} is empty, skipped", unit_label(id), path.display());
            report.skipped += 1;
            continue;
        }
        if let Some(ref err) = unit.error {
            eprintln!("{} ({}): {err}", unit_label(id), path.display());
            report.failed += 1;
            continue;
        }

        match out_dir {
            Some(dir) => {
                let target = dir.join(&names[id]);
                tokio::fs::write(&target, &unit.output_html)
                    .await
                    .with_context(|| format!("writing {}", target.display()))?;
                log::info!("{}: wrote {}", unit_label(id), target.display());
            }
            None => {
                println!("==== {} ({}) ====", unit_label(id), path.display());
                println!("{}", unit.output_html);
            }
        }
        report.translated += 1;
    }

    if let Some(id) = copy {
        match copy_output(&state.units, id) {
            Ok(true) => eprintln!("{} output copied to clipboard", unit_label(id)),
            Ok(false) => eprintln!("{} has no output to copy", unit_label(id)),
            Err(e) => log::error!("Clipboard error: {e}"),
        }
    }

    Ok(report)
}

/// File name each unit is written under. Names shared by several inputs get a
/// `unit-<n>-` prefix so no output overwrites another.
fn output_names(files: &[PathBuf]) -> Vec<PathBuf> {
    let base: Vec<Option<&std::ffi::OsStr>> = files.iter().map(|p| p.file_name()).collect();
    base.iter()
        .enumerate()
        .map(|(id, name)| match name {
            Some(name) if base.iter().filter(|b| *b == &Some(*name)).count() == 1 => {
                PathBuf::from(*name)
            }
            Some(name) => PathBuf::from(format!("unit-{}-{}", id + 1, name.to_string_lossy())),
            None => PathBuf::from(format!("unit-{}.html", id + 1)),
        })
        .collect()
}

/// Interactive front end over any line source (stdin in the binary).
///
/// Completions are applied as they arrive, between commands. At end of input
/// the loop waits for in-flight units; `quit` leaves immediately.
pub async fn run_interactive<R>(
    state: &mut AppState,
    rx: &async_channel::Receiver<BackendEvent>,
    input: R,
) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();
    let mut paste: Option<(UnitId, String)> = None;

    println!("{HELP}");
    println!("Target language: {}", state.target_language);

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    if let Some((id, buf)) = paste.take() {
                        println!(
                            "Input ended before '{PASTE_END}': discarded {} bytes pasted for {}",
                            buf.len(),
                            unit_label(id)
                        );
                    }
                    if state.units.in_flight() > 0 {
                        println!("Waiting for {} unit(s)...", state.units.in_flight());
                    }
                    wait_until_idle(state, rx).await;
                    break;
                };

                if let Some((id, mut buf)) = paste.take() {
                    if line.trim_end() == PASTE_END {
                        println!("{}: {} bytes of input", unit_label(id), buf.len());
                        state.units.set_input(id, buf);
                    } else {
                        if !buf.is_empty() {
                            buf.push('\n');
                        }
                        buf.push_str(&line);
                        paste = Some((id, buf));
                    }
                    continue;
                }

                match parse_command(&line) {
                    Ok(Some(Command::Quit)) => {
                        if state.units.in_flight() > 0 {
                            println!("Leaving {} translation(s) unfinished", state.units.in_flight());
                        }
                        break;
                    }
                    Ok(Some(cmd)) => execute(state, cmd, &mut paste).await,
                    Ok(None) => {}
                    Err(e) => println!("{e}"),
                }
            }
            event = rx.recv() => {
                if let Ok(event) = event {
                    if let Some(id) = handle_backend_event(&mut state.units, event) {
                        if let Some(unit) = state.units.get(id) {
                            println!("{}", render_notice(unit));
                        }
                    }
                }
            }
        }
    }

    Ok(())
}

async fn execute(state: &mut AppState, cmd: Command, paste: &mut Option<(UnitId, String)>) {
    match cmd {
        Command::Load(id, path) => match tokio::fs::read_to_string(&path).await {
            Ok(html) => {
                println!("{}: loaded {} bytes from {}", unit_label(id), html.len(), path.display());
                state.units.set_input(id, html);
            }
            Err(e) => println!("Cannot read {}: {e}", path.display()),
        },
        Command::Paste(id) => {
            println!("Paste HTML for {}, end with a line containing only '{PASTE_END}'", unit_label(id));
            *paste = Some((id, String::new()));
        }
        Command::Clear(id) => {
            state.units.set_input(id, String::new());
        }
        Command::Lang(language) => {
            state.target_language = language;
            println!("Target language: {language}");
        }
        Command::Translate(id) => {
            let busy = state.units.get(id).is_some_and(|u| u.is_loading);
            if busy {
                println!("{} is already translating", unit_label(id));
            } else if translate_unit(state, id) {
                println!("{}: Translating...", unit_label(id));
            } else {
                println!("{} has no input", unit_label(id));
            }
        }
        Command::All => {
            let n = translate_all(state);
            println!("Translating {n} unit(s) into {}", state.target_language);
        }
        Command::Status => print!("{}", render_grid(&state.units, state.target_language)),
        Command::Show(id) => {
            if let Some(unit) = state.units.get(id) {
                print!("{}", render_unit(unit));
            }
        }
        Command::Copy(id) => match copy_output(&state.units, id) {
            Ok(true) => println!("{} output copied", unit_label(id)),
            Ok(false) => println!("{} has no output yet", unit_label(id)),
            Err(e) => println!("Clipboard error: {e}"),
        },
        Command::Help => println!("{HELP}"),
        Command::Quit => {}
    }
}
