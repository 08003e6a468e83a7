use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::language::TargetLanguage;

#[derive(Parser)]
#[command(name = "html-translate")]
#[command(version)]
#[command(about = "Translate the text of HTML snippets with Gemini, keeping the markup intact", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Translate up to 20 HTML files at once, one unit per file
    Batch {
        /// HTML files; each fills one unit in order
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Target language (defaults to the configured one)
        #[arg(short, long)]
        lang: Option<TargetLanguage>,

        /// Write each translation here under its source file name instead of printing it
        #[arg(short, long)]
        out_dir: Option<PathBuf>,

        /// Copy the output of this unit (1-20) to the clipboard afterwards
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=20))]
        copy: Option<u8>,
    },

    /// Work with the 20 units from an interactive prompt
    Interactive {
        /// Target language (defaults to the configured one)
        #[arg(short, long)]
        lang: Option<TargetLanguage>,
    },

    /// List the supported target languages
    Languages,

    /// Show or update the stored configuration
    Config {
        /// Gemini API key to store
        #[arg(long)]
        api_key: Option<String>,

        /// Gemini model name
        #[arg(long)]
        model: Option<String>,

        /// Default target language
        #[arg(long)]
        lang: Option<TargetLanguage>,
    },
}
