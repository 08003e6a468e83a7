mod app;
mod cli;
mod clipboard;
mod config;
mod error;
mod language;
mod prompt;
mod translator;
mod ui;

use std::sync::Arc;

use clap::Parser;

use app::{AppState, BackendEvent};
use cli::{Cli, Commands};
use config::Config;
use language::TargetLanguage;
use translator::GeminiTranslator;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let cli = Cli::parse();
    let mut config = Config::load();

    match cli.command {
        Commands::Batch {
            files,
            lang,
            out_dir,
            copy,
        } => {
            let (mut state, rx) = build_state(&config, lang);
            let copy = copy.map(|n| usize::from(n) - 1);
            let report = app::run_batch(&mut state, &rx, &files, out_dir.as_deref(), copy).await?;
            log::info!(
                "Batch finished: {} translated, {} failed, {} skipped",
                report.translated,
                report.failed,
                report.skipped
            );
            if report.failed > 0 {
                anyhow::bail!("{} unit(s) failed to translate", report.failed);
            }
        }
        Commands::Interactive { lang } => {
            let (mut state, rx) = build_state(&config, lang);
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            app::run_interactive(&mut state, &rx, stdin).await?;
        }
        Commands::Languages => {
            for language in TargetLanguage::ALL {
                println!("{:<8} {}", language.name(), language.code());
            }
        }
        Commands::Config {
            api_key,
            model,
            lang,
        } => {
            let changed = api_key.is_some() || model.is_some() || lang.is_some();
            if let Some(key) = api_key {
                config.gemini_api_key = key;
            }
            if let Some(model) = model {
                config.model = model;
            }
            if let Some(lang) = lang {
                config.target_language = lang;
            }
            if changed {
                if let Err(e) = config.save() {
                    anyhow::bail!("Failed to save config: {e}");
                }
            }
            println!("config file:     {}", Config::path().display());
            println!("api key:         {}", config.masked_api_key());
            println!("model:           {}", config.model);
            println!("target language: {}", config.target_language);
        }
    }

    Ok(())
}

fn build_state(
    config: &Config,
    lang: Option<TargetLanguage>,
) -> (AppState, async_channel::Receiver<BackendEvent>) {
    let api_key = config.api_key();
    if api_key.trim().is_empty() {
        log::warn!("No Gemini API key configured; every translation will fail");
    }
    let translator = Arc::new(GeminiTranslator::new(api_key, config.model.clone()));
    let (tx, rx) = async_channel::unbounded::<BackendEvent>();
    let state = AppState::new(translator, lang.unwrap_or(config.target_language), tx);
    (state, rx)
}
