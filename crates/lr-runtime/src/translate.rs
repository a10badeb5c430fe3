use std::sync::OnceLock;

use lr_core::Diagnostic;
use regex::Regex;

pub const UNKNOWN_ERROR_MESSAGE: &str = "Unknown error";
pub const RUNTIME_ERROR_MESSAGE: &str = "Runtime error";

/// Source-name markers the interpreter strips when it prints a chunk identity.
const SOURCE_MARKERS: &[char] = &['@', '='];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadlineMatch {
    pub chunk_name: Option<String>,
    pub line: Option<usize>,
    pub message: String,
}

/// One known layout of an interpreter error headline.
#[derive(Debug)]
pub struct HeadlineShape {
    name: &'static str,
    pattern: Regex,
}

impl HeadlineShape {
    fn new(name: &'static str, pattern: &str) -> Self {
        Self {
            name,
            pattern: Regex::new(pattern).expect("headline shape regex should compile"),
        }
    }

    pub fn parse(&self, headline: &str) -> Option<HeadlineMatch> {
        let captures = self.pattern.captures(headline)?;
        Some(HeadlineMatch {
            chunk_name: captures
                .name("chunk")
                .map(|found| found.as_str().to_string())
                .filter(|name| !name.is_empty()),
            line: captures
                .name("line")
                .and_then(|found| found.as_str().parse().ok()),
            message: captures
                .name("message")
                .map(|found| found.as_str().to_string())
                .unwrap_or_default(),
        })
    }
}

/// Headline shapes in the order they are tried.
pub fn headline_shapes() -> &'static [HeadlineShape] {
    static SHAPES: OnceLock<Vec<HeadlineShape>> = OnceLock::new();
    SHAPES.get_or_init(|| {
        vec![
            HeadlineShape::new(
                "quoted-chunk",
                r#"^\[string "(?P<chunk>.*?)"\]:(?P<line>\d+):(?P<message>.*)$"#,
            ),
            HeadlineShape::new(
                "direct-chunk",
                r"^(?P<chunk>.+?):(?P<line>\d+):(?P<message>.*)$",
            ),
        ]
    })
}

/// Turns raw interpreter error text into diagnostics. Always yields exactly one.
pub fn translate(raw: &str, fallback_chunk_name: &str) -> Vec<Diagnostic> {
    vec![translate_headline(raw, fallback_chunk_name)]
}

fn translate_headline(raw: &str, fallback_chunk_name: &str) -> Diagnostic {
    if raw.trim().is_empty() {
        return Diagnostic::error(fallback_chunk_name, UNKNOWN_ERROR_MESSAGE);
    }

    let mut lines = raw.lines();
    let headline = lines.next().unwrap_or_default();
    let rest = lines.collect::<Vec<_>>();
    let stack = (!rest.is_empty()).then(|| rest.join("\n"));

    let Some(found) = headline_shapes().iter().find_map(|shape| {
        let found = shape.parse(headline.trim())?;
        tracing::trace!(shape = shape.name, "error headline recognized");
        Some(found)
    }) else {
        let mut diagnostic = Diagnostic::error(fallback_chunk_name, headline);
        diagnostic.stack = stack;
        return diagnostic;
    };

    let chunk_name = found
        .chunk_name
        .as_deref()
        .map(strip_source_marker)
        .filter(|name| !name.is_empty())
        .unwrap_or(fallback_chunk_name);
    let message = found.message.trim();
    let message = if message.is_empty() {
        RUNTIME_ERROR_MESSAGE
    } else {
        message
    };

    let mut diagnostic = Diagnostic::error(chunk_name, message);
    diagnostic.line = found.line;
    diagnostic.stack = stack;
    diagnostic
}

fn strip_source_marker(name: &str) -> &str {
    name.strip_prefix(SOURCE_MARKERS).unwrap_or(name)
}

#[cfg(test)]
mod translate_tests {
    use super::*;
    use lr_core::Severity;

    fn single(raw: &str, fallback: &str) -> Diagnostic {
        let mut diagnostics = translate(raw, fallback);
        assert_eq!(diagnostics.len(), 1);
        diagnostics.remove(0)
    }

    #[test]
    fn quoted_chunk_headline_is_parsed() {
        let diagnostic = single("[string \"X\"]:12: boom", "fallback");
        assert_eq!(diagnostic.chunk_name, "X");
        assert_eq!(diagnostic.line, Some(12));
        assert_eq!(diagnostic.message, "boom");
        assert_eq!(diagnostic.severity, Severity::Error);
        assert!(diagnostic.stack.is_none());
    }

    #[test]
    fn direct_chunk_headline_is_parsed() {
        let diagnostic = single("myfile.luau:3: nil index", "fallback");
        assert_eq!(diagnostic.chunk_name, "myfile.luau");
        assert_eq!(diagnostic.line, Some(3));
        assert_eq!(diagnostic.message, "nil index");
    }

    #[test]
    fn empty_text_yields_generic_diagnostic() {
        for raw in ["", "   \n\t "] {
            let diagnostic = single(raw, "main.luau");
            assert_eq!(diagnostic.message, UNKNOWN_ERROR_MESSAGE);
            assert_eq!(diagnostic.chunk_name, "main.luau");
            assert!(diagnostic.line.is_none());
        }
    }

    #[test]
    fn trailing_lines_become_stack() {
        let raw = "main.luau:7: bad thing\nstack traceback:\r\n\tmain.luau:7 function f\n\tmain.luau:9";
        let diagnostic = single(raw, "fallback");
        assert_eq!(diagnostic.message, "bad thing");
        assert_eq!(
            diagnostic.stack.as_deref(),
            Some("stack traceback:\n\tmain.luau:7 function f\n\tmain.luau:9")
        );
    }

    #[test]
    fn unrecognized_headline_is_kept_verbatim() {
        let diagnostic = single("attempt to call a nil value\ntrailer", "main.luau");
        assert_eq!(diagnostic.message, "attempt to call a nil value");
        assert_eq!(diagnostic.chunk_name, "main.luau");
        assert!(diagnostic.line.is_none());
        assert_eq!(diagnostic.stack.as_deref(), Some("trailer"));
    }

    #[test]
    fn unrecognized_headline_keeps_surrounding_whitespace() {
        let diagnostic = single("  custom failure \n\tdetail  ", "main.luau");
        assert_eq!(diagnostic.message, "  custom failure ");
        assert_eq!(diagnostic.stack.as_deref(), Some("\tdetail  "));
    }

    #[test]
    fn indented_headline_is_still_recognized() {
        let diagnostic = single("  main.luau:2: boom\n", "fallback");
        assert_eq!(diagnostic.chunk_name, "main.luau");
        assert_eq!(diagnostic.line, Some(2));
        assert_eq!(diagnostic.message, "boom");
        assert!(diagnostic.stack.is_none());
    }

    #[test]
    fn source_marker_is_stripped_from_identity() {
        assert_eq!(single("@internal:4: oops", "f").chunk_name, "internal");
        assert_eq!(single("[string \"=setup\"]:2: oops", "f").chunk_name, "setup");
        assert_eq!(single("[string \"\"]:2: oops", "f").chunk_name, "f");
    }

    #[test]
    fn empty_message_uses_runtime_placeholder() {
        let diagnostic = single("main.luau:5:   ", "f");
        assert_eq!(diagnostic.message, RUNTIME_ERROR_MESSAGE);
        assert_eq!(diagnostic.line, Some(5));
    }

    #[test]
    fn drive_letter_paths_keep_full_identity() {
        let diagnostic = single(r"C:\game\init.luau:14: nope", "f");
        assert_eq!(diagnostic.chunk_name, r"C:\game\init.luau");
        assert_eq!(diagnostic.line, Some(14));
        assert_eq!(diagnostic.message, "nope");
    }

    #[test]
    fn shapes_are_tried_in_priority_order() {
        let names = headline_shapes()
            .iter()
            .map(|shape| shape.name)
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["quoted-chunk", "direct-chunk"]);

        let quoted = headline_shapes()[0]
            .parse("[string \"a:1: b\"]:2: c")
            .expect("quoted shape should match");
        assert_eq!(quoted.chunk_name.as_deref(), Some("a:1: b"));
        assert_eq!(quoted.line, Some(2));
        assert_eq!(quoted.message, " c");
    }

    #[test]
    fn overflowing_line_number_is_absent() {
        let diagnostic = single("main.luau:99999999999999999999999: huge", "f");
        assert_eq!(diagnostic.chunk_name, "main.luau");
        assert!(diagnostic.line.is_none());
        assert_eq!(diagnostic.message, "huge");
    }
}
