// src/patch.rs
//! Builds the Python runtime preamble injected ahead of every user script,
//! plus the optional auto-runner epilogue and the stdout-synthesis fallback
//! script.
//!
//! Rather than monkey-patching `FPDF` methods in place, the preamble defines a
//! wrapper subclass embedding the shimmed behavior and rebinds the module-level
//! name before any user code runs. A marker attribute keeps the rebind
//! idempotent if the preamble is ever evaluated twice. Because each submission
//! runs in its own child process, installation always happens exactly once and
//! before the first library call.

use crate::models::PreparedScript;
use regex::Regex;

/// Default filename handed to one-argument entry-point candidates and used by
/// the synthesis script.
pub const DEFAULT_OUTPUT_NAME: &str = "output.pdf";

/// Shims wrapping `multi_cell` and `normalize_text`:
/// - auto-width: sentinel width 0 expands to the remaining usable page width,
///   with a forced line break when fewer than 5 layout units remain;
/// - encoding fallback: on a known encoding failure, degrade the text argument
///   to latin-1 with replacement and retry once; a failed retry re-raises the
///   original error;
/// - normalization: `normalize_text` failures degrade instead of propagating.
const RUNTIME_PREAMBLE: &str = r#"import fpdf as _fpdf_module
from fpdf import FPDF as _BaseFPDF

_ENCODING_FAILURES = ("outside the range", "codec can't encode", "character map")

if not getattr(_BaseFPDF, "_inkpress_wrapped", False):
    class _WrappedFPDF(_BaseFPDF):
        _inkpress_wrapped = True

        def multi_cell(self, *args, **kwargs):
            w = kwargs.get("w")
            if w is None and len(args) > 0:
                w = args[0]
            if w == 0:
                available = self.w - self.r_margin - self.x
                if available < 5:
                    self.ln()
                    available = self.w - self.r_margin - self.x
                if kwargs.get("w") is not None:
                    kwargs["w"] = available
                elif len(args) > 0:
                    args = (available,) + args[1:]
            try:
                return super().multi_cell(*args, **kwargs)
            except Exception as exc:
                message = str(exc).lower()
                if any(marker in message for marker in _ENCODING_FAILURES):
                    text = kwargs.get("text") or kwargs.get("txt")
                    text_index = -1
                    if text is None and len(args) >= 3:
                        text = args[2]
                        text_index = 2
                    if text is not None:
                        degraded = text.encode("latin-1", "replace").decode("latin-1")
                        if kwargs.get("text") is not None:
                            kwargs["text"] = degraded
                        elif kwargs.get("txt") is not None:
                            kwargs["txt"] = degraded
                        elif text_index != -1:
                            args = args[:text_index] + (degraded,) + args[text_index + 1:]
                        try:
                            return super().multi_cell(*args, **kwargs)
                        except Exception:
                            pass
                raise exc

        def normalize_text(self, text):
            try:
                return super().normalize_text(text)
            except Exception:
                return text.encode("latin-1", "replace").decode("latin-1")

    _fpdf_module.FPDF = _WrappedFPDF

FPDF = _fpdf_module.FPDF
"#;

/// An entry-point candidate discovered in the user's source: a top-level
/// function taking zero or one parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryPoint {
    pub name: String,
    pub arity: usize,
}

/// Scans cleaned user source for top-level `def` statements and keeps those
/// with zero or one parameter, in definition order. Discovery happens here at
/// assembly time so the generated epilogue carries an explicit candidate list
/// instead of reflecting over runtime globals; shim names and imported symbols
/// are never candidates.
pub fn scan_entry_points(code: &str) -> Vec<EntryPoint> {
    let def_re = Regex::new(r"(?m)^def\s+(\w+)\s*\(([^)]*)\)").unwrap();
    def_re
        .captures_iter(code)
        .filter_map(|caps| {
            let name = caps[1].to_string();
            let params = caps[2].trim();
            let arity = if params.is_empty() {
                0
            } else {
                params.split(',').filter(|p| !p.trim().is_empty()).count()
            };
            (arity <= 1).then_some(EntryPoint { name, arity })
        })
        .collect()
}

/// Renders the auto-runner epilogue for the given candidates. Runs only when
/// the user code finished without leaving a document in the working directory:
/// zero-argument candidates are called bare, one-argument candidates get the
/// default output filename, invocation failures are swallowed, and the loop
/// stops at the first candidate that leaves an artifact behind.
fn auto_runner_epilogue(candidates: &[EntryPoint]) -> String {
    let listing = candidates
        .iter()
        .map(|c| format!("(\"{}\", {})", c.name, c.arity))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        r#"

import os as _os

def _inkpress_has_artifact():
    return any(name.lower().endswith(".pdf") for name in _os.listdir("."))

if not _inkpress_has_artifact():
    for _name, _arity in [{listing}]:
        _candidate = globals().get(_name)
        if not callable(_candidate):
            continue
        try:
            if _arity == 0:
                _candidate()
            else:
                _candidate("{output}")
        except Exception:
            continue
        if _inkpress_has_artifact():
            break
"#,
        listing = listing,
        output = DEFAULT_OUTPUT_NAME,
    )
}

/// Assembles the final script: preamble first, cleaned user code, and, when
/// the auto-runner is enabled and the source defines usable candidates, the
/// fallback epilogue last.
pub fn assemble(cleaned_code: &str, auto_run: bool) -> PreparedScript {
    let mut text = format!("{}\n{}", RUNTIME_PREAMBLE, cleaned_code);
    if auto_run {
        let candidates = scan_entry_points(cleaned_code);
        if !candidates.is_empty() {
            text.push_str(&auto_runner_epilogue(&candidates));
        }
    }
    PreparedScript::new(text)
}

/// Builds the stdout-synthesis fallback script: renders the captured text as
/// plain monospaced content through the same shimmed pipeline and saves it
/// under the default output name. The text is embedded as a JSON string
/// literal, which Python parses unchanged.
pub fn synthesis_script(stdout: &str) -> PreparedScript {
    let literal = serde_json::to_string(stdout).unwrap_or_else(|_| "\"\"".to_string());
    let body = format!(
        r#"pdf = FPDF()
pdf.set_auto_page_break(auto=True, margin=15)
pdf.add_page()
pdf.set_font("Courier", size=11)
pdf.multi_cell(0, 5, {literal})
pdf.output("{output}")
"#,
        literal = literal,
        output = DEFAULT_OUTPUT_NAME,
    );
    PreparedScript::new(format!("{}\n{}", RUNTIME_PREAMBLE, body))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preamble_comes_first_and_is_guarded() {
        let prepared = assemble("pdf = FPDF()", false);
        assert!(prepared.text().starts_with("import fpdf as _fpdf_module"));
        assert!(prepared.text().contains("_inkpress_wrapped"));
        assert!(prepared.text().contains("def multi_cell"));
        assert!(prepared.text().contains("def normalize_text"));
        assert!(prepared.text().ends_with("pdf = FPDF()"));
    }

    #[test]
    fn encoding_markers_present() {
        let prepared = assemble("", false);
        for marker in ["outside the range", "codec can't encode", "character map"] {
            assert!(prepared.text().contains(marker));
        }
    }

    #[test]
    fn scans_top_level_defs_in_order() {
        let code = "def build_report():\n    pass\n\ndef save(path):\n    pass\n";
        let found = scan_entry_points(code);
        assert_eq!(
            found,
            vec![
                EntryPoint { name: "build_report".into(), arity: 0 },
                EntryPoint { name: "save".into(), arity: 1 },
            ]
        );
    }

    #[test]
    fn ignores_nested_defs_and_wide_arities() {
        let code = "class Doc:\n    def render(self, path):\n        pass\n\ndef helper(a, b):\n    pass\n";
        assert!(scan_entry_points(code).is_empty());
    }

    #[test]
    fn epilogue_appended_only_in_extended_variant() {
        let code = "def main():\n    pass";
        let plain = assemble(code, false);
        let extended = assemble(code, true);
        assert!(!plain.text().contains("_inkpress_has_artifact"));
        assert!(extended.text().contains("_inkpress_has_artifact"));
        assert!(extended.text().contains("(\"main\", 0)"));
    }

    #[test]
    fn no_epilogue_without_candidates() {
        let prepared = assemble("pdf = FPDF()\npdf.output(\"a.pdf\")", true);
        assert!(!prepared.text().contains("_inkpress_has_artifact"));
    }

    #[test]
    fn one_arg_candidate_receives_default_filename() {
        let prepared = assemble("def render(path):\n    pass", true);
        assert!(prepared.text().contains("(\"render\", 1)"));
        assert!(prepared.text().contains("_candidate(\"output.pdf\")"));
    }

    #[test]
    fn synthesis_script_embeds_text_and_uses_monospace() {
        let prepared = synthesis_script("Report body\nline \"two\"");
        assert!(prepared.text().contains("\"Report body\\nline \\\"two\\\"\""));
        assert!(prepared.text().contains("Courier"));
        assert!(prepared.text().contains("pdf.output(\"output.pdf\")"));
        assert!(prepared.text().starts_with("import fpdf as _fpdf_module"));
    }
}
