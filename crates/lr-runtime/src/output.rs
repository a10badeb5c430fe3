use std::cell::RefCell;
use std::rc::Rc;

use crate::Interpreter;

pub const PRINT_HOOK: &str = "print";
pub const WARN_HOOK: &str = "warn";
pub const WARN_PREFIX: &str = "[warn] ";

/// Ordered log lines captured during one run. Clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    lines: Rc<RefCell<Vec<String>>>,
}

impl Transcript {
    pub fn push(&self, line: String) {
        self.lines.borrow_mut().push(line);
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.borrow().clone()
    }
}

pub fn format_line(prefix: &str, args: &[String]) -> String {
    format!("{}{}", prefix, args.join("\t"))
}

/// Replaces the interpreter's `print` and `warn` with hooks that append to `transcript`.
pub fn install_output_bridge<I: Interpreter>(
    interpreter: &I,
    transcript: &Transcript,
) -> Result<(), String> {
    for (name, prefix) in [(PRINT_HOOK, ""), (WARN_HOOK, WARN_PREFIX)] {
        let sink = transcript.clone();
        interpreter.register_native(
            name,
            Box::new(move |args| sink.push(format_line(prefix, &args))),
        )?;
    }
    Ok(())
}
