use crate::language::TargetLanguage;

/// Build the instruction sent to the model for one HTML snippet.
pub fn build_prompt(html: &str, language: TargetLanguage) -> String {
    format!(
        r#"Translate the following HTML from English into {language}.

Rules:
1. Translate ONLY the human-readable text nodes.
2. Keep every tag, attribute, class name, whitespace run and indentation exactly as it is.
3. Return ONLY the translated HTML. No explanations, no preamble, and no markdown code fences (```html ... ```).

HTML to translate:
{html}"#
    )
}

/// Strip a markdown code fence the model may have wrapped around its answer.
///
/// Only an exact leading fence (```` ```html ```` with an optional newline, or a bare
/// ```` ``` ```` followed by a newline) and an exact trailing fence (optionally
/// preceded by a newline) are removed. Anything else is left as-is apart from
/// trimming surrounding whitespace.
///
/// The text is trimmed before the fences are matched, so a fence followed or
/// preceded by stray whitespace is still removed. A plain pattern match on the
/// raw text would leave e.g. `"<p>x</p>\n```\n"` untouched; here the trailing
/// fence is stripped.
pub fn sanitize(raw: &str) -> String {
    let mut text = raw.trim();

    if let Some(rest) = text.strip_prefix("```html") {
        text = rest.strip_prefix('\n').unwrap_or(rest);
    } else if let Some(rest) = text.strip_prefix("```\n") {
        text = rest;
    }

    if let Some(rest) = text.strip_suffix("```") {
        text = rest.strip_suffix('\n').unwrap_or(rest);
    }

    text.trim().to_string()
}
