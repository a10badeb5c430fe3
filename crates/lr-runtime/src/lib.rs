mod interpreter;
mod luau;
mod orchestrator;
mod output;
mod translate;

pub use interpreter::{Interpreter, NativeCallback};
pub use luau::LuauInterpreter;
pub use orchestrator::{chunk_identity, run, run_with};
pub use output::{
    format_line, install_output_bridge, Transcript, PRINT_HOOK, WARN_HOOK, WARN_PREFIX,
};
pub use translate::{
    headline_shapes, translate, HeadlineMatch, HeadlineShape, RUNTIME_ERROR_MESSAGE,
    UNKNOWN_ERROR_MESSAGE,
};
