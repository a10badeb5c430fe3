use mlua::{ChunkMode, Error as LuaError, Function, Lua, LuaOptions, StdLib, Value, Variadic};

use crate::{Interpreter, NativeCallback};

/// One Luau state. Closed when dropped.
pub struct LuauInterpreter {
    lua: Lua,
}

impl Interpreter for LuauInterpreter {
    type Unit = Function;

    fn create() -> Result<Self, String> {
        let lua = Lua::new_with(StdLib::ALL_SAFE, LuaOptions::default())
            .map_err(|error| error_text(&error))?;
        Ok(Self { lua })
    }

    fn register_native(&self, name: &str, callback: NativeCallback) -> Result<(), String> {
        let function = self
            .lua
            .create_function(move |_, args: Variadic<Value>| {
                callback(args.iter().map(display_string).collect());
                Ok(())
            })
            .map_err(|error| error_text(&error))?;
        self.lua
            .globals()
            .set(name, function)
            .map_err(|error| error_text(&error))
    }

    fn compile(&self, code: &str, identity: &str) -> Result<Function, String> {
        self.lua
            .load(code)
            .set_name(identity)
            .set_mode(ChunkMode::Text)
            .into_function()
            .map_err(|error| error_text(&error))
    }

    fn execute(&self, unit: Function) -> Result<(), String> {
        unit.call::<()>(()).map_err(|error| error_text(&error))
    }
}

/// Same coercion `tostring` applies, including `__tostring` metamethods.
fn display_string(value: &Value) -> String {
    match value {
        Value::String(text) => text.to_string_lossy().to_string(),
        other => other
            .to_string()
            .unwrap_or_else(|_| other.type_name().to_string()),
    }
}

/// Raw error text as the interpreter reported it, without mlua's wrapping prefixes.
pub(crate) fn error_text(error: &LuaError) -> String {
    match error {
        LuaError::SyntaxError { message, .. } => message.clone(),
        LuaError::RuntimeError(message) | LuaError::MemoryError(message) => message.clone(),
        LuaError::CallbackError { traceback, cause } => {
            format!("{}\n{}", error_text(cause), traceback)
        }
        other => other.to_string(),
    }
}

#[cfg(test)]
mod luau_tests {
    use super::*;

    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn compile_reports_chunk_identity_in_syntax_errors() {
        let interpreter = LuauInterpreter::create().expect("state should open");
        let error = interpreter
            .compile("local = 1", "@broken.luau")
            .err()
            .expect("invalid source should not compile");
        assert!(error.starts_with("broken.luau:1:"), "unexpected text: {error}");
    }

    #[test]
    fn execute_reports_runtime_error_text() {
        let interpreter = LuauInterpreter::create().expect("state should open");
        let unit = interpreter
            .compile("\nerror(\"boom\")", "@main.luau")
            .expect("source should compile");
        let error = interpreter
            .execute(unit)
            .expect_err("error() should fail the call");
        assert!(error.starts_with("main.luau:2: boom"), "unexpected text: {error}");
    }

    #[test]
    fn register_native_passes_display_strings() {
        let interpreter = LuauInterpreter::create().expect("state should open");
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        interpreter
            .register_native("capture", Box::new(move |args| sink.borrow_mut().push(args)))
            .expect("native should register");

        let unit = interpreter
            .compile(
                "capture('a', 1, 2.5, true, nil)\ncapture(setmetatable({}, { __tostring = function() return 'custom' end }))\ncapture()",
                "@main.luau",
            )
            .expect("source should compile");
        interpreter.execute(unit).expect("source should run");

        let seen = seen.borrow();
        assert_eq!(seen[0], vec!["a", "1", "2.5", "true", "nil"]);
        assert_eq!(seen[1], vec!["custom"]);
        assert!(seen[2].is_empty());
    }

    #[test]
    fn execute_discards_return_values() {
        let interpreter = LuauInterpreter::create().expect("state should open");
        let unit = interpreter
            .compile("return 1, 2, 3", "@main.luau")
            .expect("source should compile");
        interpreter.execute(unit).expect("returned values should be ignored");
    }
}
