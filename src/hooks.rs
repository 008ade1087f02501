//! Which host platform hooks this service answers, and on which route.
//!
//! Nothing is bound implicitly. The host reads this table from `GET /v1/hooks` and
//! registers a callback per entry; the routes in `startup::configure_routes` are the
//! only receivers.

use serde::Serialize;

use crate::integration::IntegrationRegistry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HookKind {
    /// Fire and forget.
    Action,
    /// Receives a value and must return it, possibly extended.
    Filter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HostHook {
    MetaboxRegistration,
    MetaboxFieldsSave,
    SettingsBuild,
    CheckoutRender,
    PaymentCreated,
    PaymentCompleted,
}

const DEFAULT_PRIORITY: u32 = 10;

impl HostHook {
    pub const ALL: [HostHook; 6] = [
        HostHook::MetaboxRegistration,
        HostHook::MetaboxFieldsSave,
        HostHook::SettingsBuild,
        HostHook::CheckoutRender,
        HostHook::PaymentCreated,
        HostHook::PaymentCompleted,
    ];

    pub fn host_name(self) -> &'static str {
        match self {
            HostHook::MetaboxRegistration => "add_meta_boxes",
            HostHook::MetaboxFieldsSave => "edd_metabox_fields_save",
            HostHook::SettingsBuild => "edd_settings_extensions",
            HostHook::CheckoutRender => "edd_purchase_form_before_submit",
            HostHook::PaymentCreated => "edd_insert_payment",
            HostHook::PaymentCompleted => "edd_complete_purchase",
        }
    }

    pub fn kind(self) -> HookKind {
        match self {
            HostHook::MetaboxFieldsSave | HostHook::SettingsBuild => HookKind::Filter,
            _ => HookKind::Action,
        }
    }

    /// The checkout box goes after every other checkout field.
    pub fn priority(self) -> u32 {
        match self {
            HostHook::CheckoutRender => 100,
            _ => DEFAULT_PRIORITY,
        }
    }

    pub fn method(self) -> &'static str {
        match self {
            HostHook::MetaboxRegistration | HostHook::CheckoutRender => "GET",
            _ => "POST",
        }
    }

    fn path(self) -> &'static str {
        match self {
            HostHook::MetaboxRegistration => {
                "/v1/providers/{provider_id}/products/{product_id}/metabox"
            }
            HostHook::MetaboxFieldsSave => "/v1/hooks/metabox-fields",
            HostHook::SettingsBuild => "/v1/hooks/settings",
            HostHook::CheckoutRender => "/v1/checkout/fields",
            HostHook::PaymentCreated => "/v1/events/payment-created",
            HostHook::PaymentCompleted => "/v1/events/payment-completed",
        }
    }

    /// Metabox registration is per provider; every other hook fans out to all
    /// integrations behind one route.
    fn is_per_provider(self) -> bool {
        matches!(self, HostHook::MetaboxRegistration)
    }
}

/// One host callback to register.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HookBinding {
    pub hook: HostHook,
    pub host_name: &'static str,
    pub kind: HookKind,
    pub priority: u32,
    pub method: &'static str,
    pub path: String,
}

impl HookBinding {
    fn new(hook: HostHook, path: String) -> Self {
        Self {
            hook,
            host_name: hook.host_name(),
            kind: hook.kind(),
            priority: hook.priority(),
            method: hook.method(),
            path,
        }
    }
}

/// The full wiring table for the configured integrations, in `HostHook::ALL` order
/// and, for per-provider hooks, configuration order.
pub fn bindings(registry: &IntegrationRegistry) -> Vec<HookBinding> {
    let mut bindings = Vec::new();
    for hook in HostHook::ALL {
        if hook.is_per_provider() {
            bindings.extend(registry.iter().map(|integration| {
                let path = hook
                    .path()
                    .replace("{provider_id}", integration.identity().id().as_ref());
                HookBinding::new(hook, path)
            }));
        } else if !registry.is_empty() {
            bindings.push(HookBinding::new(hook, hook.path().to_string()));
        }
    }
    bindings
}
