//! Testing utilities for the berth workspace
//!
//! Shared fixtures: a module with a realistic template set and a platform
//! with one deployment and schema-uniform instances.

#![allow(missing_docs)]

use berth_model::{
    DeployedModule, Instance, KeyValue, Module, Platform, PlatformKey, Template, VersionedKey,
};
use berth_property::{module_model, PropertyParser};

pub fn parser() -> PropertyParser {
    PropertyParser::default()
}

pub fn server_template() -> Template {
    Template::new(
        "server",
        "server.conf",
        "/etc/webapp",
        "listen {{port|@default 8080}} on {{host|@required}}\ntimeout {{timeout|@pattern \"[0-9]+\"}}\n",
    )
}

/// Working-copy module declaring `port`, `host` and `timeout`
pub fn webapp_module() -> Module {
    let mut module = Module::new(VersionedKey::working_copy("webapp", "1.0.0"));
    module.add_template(server_template()).unwrap();
    module.properties = module_model(&module.templates, &parser()).unwrap();
    module
}

pub fn key_values(pairs: &[(&str, &str)]) -> Vec<KeyValue> {
    pairs
        .iter()
        .map(|(name, value)| KeyValue::new(*name, *value))
        .collect()
}

/// Platform "shop/prod" with one deployment of the released webapp module
/// and two instances sharing the `{port, host}` schema
pub fn webapp_platform() -> Platform {
    let mut deployed = DeployedModule::new(
        1,
        VersionedKey::release("webapp", "1.0.0"),
        "#GROUP",
        "/webapp",
    );
    deployed.values = key_values(&[("timeout", "30")]);
    deployed.instances = vec![
        Instance::new("primary", key_values(&[("port", "9090"), ("host", "a")])),
        Instance::new("secondary", key_values(&[("port", "9091"), ("host", "b")])),
    ];

    Platform {
        deployed_modules: vec![deployed],
        ..Platform::new(PlatformKey::new("shop", "prod"), "1.0")
    }
}
