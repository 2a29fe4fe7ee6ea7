use crate::constants::{params, plugin};
use crate::models::{ActionDescriptor, AlertEndpointDescriptor, ParamDescriptor, PluginDescriptor};

pub const TIMEOUT_PARAM: ParamDescriptor = ParamDescriptor {
    key: params::TIMEOUT,
    param_type: "number",
    default: "0",
    required: true,
    description: plugin::TIMEOUT_PARAM_DESCRIPTION,
};

const NO_ALERT_ENDPOINTS: &[AlertEndpointDescriptor] = &[];

/// Catalog entry the host renders in its flow editor
pub const INTERACTION_DESCRIPTOR: PluginDescriptor = PluginDescriptor {
    name: plugin::NAME,
    plugin_type: plugin::TYPE,
    version: plugin::VERSION,
    author: plugin::AUTHOR,
    actions: ActionDescriptor {
        name: plugin::NAME,
        description: plugin::ACTION_DESCRIPTION,
        plugin: plugin::ACTION_ID,
        icon: plugin::ACTION_ICON,
        category: plugin::ACTION_CATEGORY,
        params: &[TIMEOUT_PARAM],
    },
    endpoints: NO_ALERT_ENDPOINTS,
};

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_descriptor_wire_shape() {
        let value = serde_json::to_value(INTERACTION_DESCRIPTOR).unwrap();
        assert_eq!(
            value,
            json!({
                "name": "Interaction",
                "type": "action",
                "version": "1.1.1",
                "author": "JustNZ",
                "actions": {
                    "name": "Interaction",
                    "description": "Wait for user interaction to continue",
                    "plugin": "interaction",
                    "icon": "solar:hand-shake-linear",
                    "category": "Utility",
                    "params": [{
                        "key": "Timeout",
                        "type": "number",
                        "default": "0",
                        "required": true,
                        "description": "Continue to the next step after the specified time (in seconds). 0 to disable",
                    }],
                },
                "endpoints": [],
            })
        );
    }

    #[test]
    fn test_version_matches_crate() {
        assert_eq!(INTERACTION_DESCRIPTOR.version, env!("CARGO_PKG_VERSION"));
    }
}
