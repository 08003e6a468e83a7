use std::path::PathBuf;

use crate::app::{UnitId, UNIT_COUNT};
use crate::language::TargetLanguage;

pub const HELP: &str = "\
Commands (units are numbered 1-20):
  load <n> <path>   fill unit n with the contents of a file
  paste <n>         type or paste HTML for unit n, finish with a line containing only '.'
  clear <n>         empty the input of unit n
  lang <language>   set the target language for all units
  translate <n>     translate unit n
  all               translate every unit that has input and is not busy
  status            show all units
  show <n>          show input and output of unit n
  copy <n>          copy the output of unit n to the clipboard
  help              show this text
  quit              exit (waits for nothing)";

/// Terminator line for `paste`.
pub const PASTE_END: &str = ".";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Load(UnitId, PathBuf),
    Paste(UnitId),
    Clear(UnitId),
    Lang(TargetLanguage),
    Translate(UnitId),
    All,
    Status,
    Show(UnitId),
    Copy(UnitId),
    Help,
    Quit,
}

/// Parse a 1-based unit number into a unit id.
pub fn parse_unit(arg: Option<&str>) -> Result<UnitId, String> {
    let arg = arg.ok_or_else(|| "missing unit number".to_string())?;
    match arg.parse::<usize>() {
        Ok(n) if (1..=UNIT_COUNT).contains(&n) => Ok(n - 1),
        _ => Err(format!("unit must be a number from 1 to {UNIT_COUNT}, got '{arg}'")),
    }
}

/// Parse one input line. Blank lines yield `Ok(None)`.
pub fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(None);
    };

    let cmd = match verb.to_ascii_lowercase().as_str() {
        "load" => {
            let id = parse_unit(words.next())?;
            let path: Vec<&str> = words.collect();
            if path.is_empty() {
                return Err("usage: load <n> <path>".into());
            }
            Command::Load(id, PathBuf::from(path.join(" ")))
        }
        "paste" => Command::Paste(parse_unit(words.next())?),
        "clear" => Command::Clear(parse_unit(words.next())?),
        "lang" | "language" => {
            let name = words.next().ok_or("usage: lang <language>")?;
            Command::Lang(name.parse::<TargetLanguage>().map_err(|e| e.to_string())?)
        }
        "translate" | "t" => Command::Translate(parse_unit(words.next())?),
        "all" => Command::All,
        "status" | "ls" => Command::Status,
        "show" => Command::Show(parse_unit(words.next())?),
        "copy" => Command::Copy(parse_unit(words.next())?),
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => return Err(format!("unknown command '{other}' (try 'help')")),
    };
    Ok(Some(cmd))
}
