// src/preprocess.rs
use regex::Regex;

/// Normalizes a submitted script: strips markdown code fences and citation
/// markers, and optionally rewrites font-size literals at the known fpdf /
/// reportlab call sites.
pub fn clean_script(code: &str, font_size: Option<u32>) -> String {
    // Remove markdown code fences, wherever they occur
    let fence_re = Regex::new(r"```python|```").unwrap();
    let mut code = fence_re.replace_all(code, "").into_owned();

    // Remove citation markers like [cite_start], [cite: 1], [cite_end]
    let cite_start_re = Regex::new(r"\[cite_start\]").unwrap();
    let cite_ref_re = Regex::new(r"\[cite: \d+\]").unwrap();
    let cite_end_re = Regex::new(r"\[cite_end\]").unwrap();
    code = cite_start_re.replace_all(&code, "").into_owned();
    code = cite_ref_re.replace_all(&code, "").into_owned();
    code = cite_end_re.replace_all(&code, "").into_owned();

    if let Some(size) = font_size {
        code = rewrite_font_sizes(&code, size);
    }

    code.trim().to_string()
}

/// Replaces the numeric size literal at four call shapes, leaving every other
/// character intact. Literals outside these shapes are never touched.
fn rewrite_font_sizes(code: &str, size: u32) -> String {
    // FPDF: set_font_size(12) -> set_font_size(18)
    let size_only_re = Regex::new(r"(\.set_font_size\s*\()\s*\d+").unwrap();
    // ${1} keeps the digits of the new size out of the group reference
    let mut code = size_only_re
        .replace_all(code, format!("${{1}}{}", size))
        .into_owned();

    // FPDF: set_font(..., size=12) -> set_font(..., size=18) (keyword arg)
    let keyword_re = Regex::new(r"(\.set_font\s*\([^)]*?size\s*=\s*)\d+").unwrap();
    code = keyword_re
        .replace_all(&code, format!("${{1}}{}", size))
        .into_owned();

    // FPDF: set_font("Arial", 12) or set_font("Arial", "B", 12) (positional,
    // size last before the closing paren)
    let positional_re = Regex::new(r"(\.set_font\s*\((?:[^()=]+,)\s*)\d+(\s*\))").unwrap();
    code = positional_re
        .replace_all(&code, format!("${{1}}{}${{2}}", size))
        .into_owned();

    // ReportLab: setFont("Name", 12) -> setFont("Name", 18)
    let setfont_re = Regex::new(r"(\.setFont\s*\([^,]+,\s*)\d+").unwrap();
    code = setfont_re
        .replace_all(&code, format!("${{1}}{}", size))
        .into_owned();

    code
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_code_fences_anywhere() {
        let input = "```python\npdf = FPDF()\npdf.add_page()\n```";
        let cleaned = clean_script(input, None);
        assert!(!cleaned.contains("```"));
        assert_eq!(cleaned, "pdf = FPDF()\npdf.add_page()");
    }

    #[test]
    fn strips_citation_markers_only() {
        let input = "[cite_start]x = data[0][cite: 12]\ny = data[1][cite_end]";
        let cleaned = clean_script(input, None);
        assert_eq!(cleaned, "x = data[0]\ny = data[1]");
    }

    #[test]
    fn leaves_other_bracketed_text_alone() {
        let input = "rows = table[\"cite\"]\nprint(rows[3])";
        assert_eq!(clean_script(input, None), input);
    }

    #[test]
    fn rewrites_size_only_call() {
        let cleaned = clean_script("pdf.set_font_size(12)", Some(18));
        assert_eq!(cleaned, "pdf.set_font_size(18)");
    }

    #[test]
    fn rewrites_keyword_size() {
        let cleaned = clean_script("pdf.set_font(\"Arial\", style=\"B\", size=12)", Some(16));
        assert_eq!(cleaned, "pdf.set_font(\"Arial\", style=\"B\", size=16)");
    }

    #[test]
    fn rewrites_trailing_positional_size() {
        let cleaned = clean_script("pdf.set_font(\"Arial\", \"B\", 12)", Some(16));
        assert_eq!(cleaned, "pdf.set_font(\"Arial\", \"B\", 16)");
    }

    #[test]
    fn rewrites_reportlab_setfont() {
        let cleaned = clean_script("canvas.setFont(\"Helvetica\", 10)", Some(14));
        assert_eq!(cleaned, "canvas.setFont(\"Helvetica\", 14)");
    }

    #[test]
    fn preserves_whitespace_around_rewritten_literal() {
        let cleaned = clean_script("pdf.set_font( \"Arial\", 12 )", Some(9));
        assert_eq!(cleaned, "pdf.set_font( \"Arial\", 9 )");
    }

    #[test]
    fn unrelated_numeric_literals_untouched() {
        let input = "pdf.cell(40, 10, str(12))\nn = 12";
        assert_eq!(clean_script(input, Some(18)), input);
    }

    #[test]
    fn no_override_is_byte_identical_apart_from_stripping() {
        let input = "pdf.set_font_size(12)\npdf.multi_cell(0, 5, text)";
        assert_eq!(clean_script(input, None), input);
    }

    #[test]
    fn result_is_trimmed() {
        assert_eq!(clean_script("\n\n  x = 1  \n\n", None), "x = 1");
    }
}
