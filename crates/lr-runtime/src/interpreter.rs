/// Native function reachable from script code. Receives every argument already
/// coerced to its display string.
pub type NativeCallback = Box<dyn Fn(Vec<String>) + 'static>;

/// Capabilities the orchestrator needs from an embedded interpreter.
///
/// Every fallible operation reports the interpreter's error value coerced to
/// text, ready for translation.
pub trait Interpreter: Sized {
    /// A compiled chunk ready to be called.
    type Unit;

    /// Creates an isolated state with the standard library installed.
    fn create() -> Result<Self, String>;

    /// Installs `callback` as a global function named `name`. The function
    /// accepts any number of arguments and returns nothing.
    fn register_native(&self, name: &str, callback: NativeCallback) -> Result<(), String>;

    fn compile(&self, code: &str, identity: &str) -> Result<Self::Unit, String>;

    /// Calls a compiled chunk with no arguments, discarding its return values.
    fn execute(&self, unit: Self::Unit) -> Result<(), String>;
}
