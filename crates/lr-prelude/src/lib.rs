//! Synthesizes the stand-in engine environment that runs before any user chunk.
//!
//! The generated Luau source installs a `game` root whose `GetService` returns a
//! permissive stub for every known service name and an empty table for anything
//! else, plus no-op scheduling helpers and value-type constructors.

use std::collections::BTreeSet;

/// Host services stubbed when the caller does not supply its own list.
pub const DEFAULT_SERVICES: &[&str] = &[
    "Players",
    "Workspace",
    "ReplicatedStorage",
    "ReplicatedFirst",
    "ServerStorage",
    "ServerScriptService",
    "StarterGui",
    "StarterPack",
    "StarterPlayer",
    "Lighting",
    "SoundService",
    "Teams",
    "Chat",
    "RunService",
    "UserInputService",
    "ContextActionService",
    "TweenService",
    "HttpService",
    "DataStoreService",
    "MarketplaceService",
    "CollectionService",
    "Debris",
    "PathfindingService",
    "PhysicsService",
    "TextService",
    "TeleportService",
    "GuiService",
    "MessagingService",
];

/// Globals exposed as constructor tables (`Vector3.new(...)`, `CFrame.Angles(...)`).
pub const VALUE_TYPES: &[&str] = &[
    "Vector2",
    "Vector3",
    "CFrame",
    "Color3",
    "UDim",
    "UDim2",
    "BrickColor",
    "TweenInfo",
    "Ray",
    "Rect",
    "NumberRange",
    "NumberSequence",
    "ColorSequence",
];

pub fn default_services() -> Vec<String> {
    DEFAULT_SERVICES.iter().map(|name| name.to_string()).collect()
}

const STUB_FACTORY: &str = r#"
local function never()
    return false
end

local function makeStub(name)
    local meta = {}
    local function derive()
        return makeStub(name)
    end
    meta.__index = function(self, key)
        if type(key) ~= "string" then
            return nil
        end
        if key == "Name" or key == "ClassName" then
            return name
        end
        local child = makeStub(name .. "." .. key)
        rawset(self, key, child)
        return child
    end
    meta.__call = function()
        return makeStub(name .. "()")
    end
    meta.__tostring = function()
        return name
    end
    meta.__concat = function(left, right)
        return tostring(left) .. tostring(right)
    end
    meta.__len = function()
        return 0
    end
    meta.__add = derive
    meta.__sub = derive
    meta.__mul = derive
    meta.__div = derive
    meta.__mod = derive
    meta.__pow = derive
    meta.__unm = derive
    meta.__lt = never
    meta.__le = never
    return setmetatable({}, meta)
end

local function makeValueType(name)
    local valueType = {
        new = function()
            return makeStub(name)
        end,
    }
    return setmetatable(valueType, {
        __index = function(self, key)
            local child = makeStub(name .. "." .. tostring(key))
            rawset(self, key, child)
            return child
        end,
    })
end
"#;

const SERVICE_LOOKUP: &str = r#"
local serviceCache = {}
local function getService(_, serviceName)
    local cached = serviceCache[serviceName]
    if cached ~= nil then
        return cached
    end
    local service
    if knownServices[serviceName] then
        service = makeStub(tostring(serviceName))
    else
        service = {}
    end
    serviceCache[serviceName] = service
    return service
end

game = makeStub("game")
local gameMeta = getmetatable(game)
local childIndex = gameMeta.__index
gameMeta.__index = function(self, key)
    if knownServices[key] then
        return getService(self, key)
    end
    return childIndex(self, key)
end
rawset(game, "GetService", getService)
rawset(game, "FindService", getService)
Game = game
workspace = getService(game, "Workspace")
Workspace = workspace
script = makeStub("script")
shared = {}
Instance = {
    new = function(className)
        return makeStub(tostring(className))
    end,
}
Enum = makeStub("Enum")
"#;

const SCHEDULING: &str = r#"
task = {
    wait = function(seconds)
        return seconds or 0
    end,
    spawn = function() end,
    defer = function() end,
    delay = function() end,
    cancel = function() end,
}
wait = function(seconds)
    return seconds or 0, os.clock()
end
spawn = function() end
delay = function() end
tick = function()
    return os.clock()
end
time = tick
elapsedTime = tick
"#;

/// Produces Luau source that installs the stand-in environment for `services`.
///
/// Duplicate names are collapsed; an empty list still yields a working `game`
/// root whose lookups all return empty tables.
pub fn build_environment_source(services: &[String]) -> String {
    let mut source = String::from("local knownServices = {\n");
    let mut seen = BTreeSet::new();
    for service in services {
        if seen.insert(service.as_str()) {
            source.push_str(&format!("    [{}] = true,\n", lua_string_literal(service)));
        }
    }
    source.push_str("}\n");
    source.push_str(STUB_FACTORY);
    source.push_str(SERVICE_LOOKUP);
    source.push('\n');
    for value_type in VALUE_TYPES {
        source.push_str(&format!(
            "{value_type} = makeValueType({})\n",
            lua_string_literal(value_type)
        ));
    }
    source.push_str(SCHEDULING);
    source
}

pub(crate) fn lua_string_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for ch in value.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            ch if ch.is_control() => {
                let mut buf = [0u8; 4];
                for byte in ch.encode_utf8(&mut buf).bytes() {
                    out.push_str(&format!("\\{:03}", byte));
                }
            }
            ch => out.push(ch),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod prelude_tests {
    use super::*;

    #[test]
    fn default_services_mirror_constant_list() {
        let services = default_services();
        assert_eq!(services.len(), DEFAULT_SERVICES.len());
        assert!(services.iter().any(|name| name == "Players"));
        assert!(services.iter().any(|name| name == "Workspace"));
    }

    #[test]
    fn lua_string_literal_escapes_quotes_and_controls() {
        assert_eq!(lua_string_literal("Players"), "\"Players\"");
        assert_eq!(lua_string_literal("a\"b"), "\"a\\\"b\"");
        assert_eq!(lua_string_literal("a\\b"), "\"a\\\\b\"");
        assert_eq!(lua_string_literal("a\nb\t"), "\"a\\nb\\t\"");
        assert_eq!(lua_string_literal("\u{1}"), "\"\\001\"");
    }

    #[test]
    fn build_environment_source_lists_each_service_once() {
        let source = build_environment_source(&[
            "Players".to_string(),
            "Custom \"Service\"".to_string(),
            "Players".to_string(),
        ]);
        assert_eq!(source.matches("[\"Players\"] = true").count(), 1);
        assert!(source.contains("[\"Custom \\\"Service\\\"\"] = true"));
        assert!(source.contains("rawset(game, \"GetService\", getService)"));
    }

    #[test]
    fn build_environment_source_declares_value_types() {
        let source = build_environment_source(&[]);
        for value_type in VALUE_TYPES {
            assert!(source.contains(&format!("{value_type} = makeValueType(\"{value_type}\")")));
        }
        assert!(source.starts_with("local knownServices = {\n}\n"));
    }
}
