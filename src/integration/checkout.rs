use askama::Template;
use serde_json::Value;

use super::{IntegrationError, NewsletterIntegration};
use crate::repository::is_truthy;

#[derive(Template)]
#[template(
    source = r#"<fieldset id="{{ element_id }}">
	<p>
		<input name="{{ field_name }}" id="{{ field_name }}" type="checkbox"{% if checked %} checked="checked"{% endif %}/>
		<label for="{{ field_name }}">{{ label }}</label>
	</p>
</fieldset>
"#,
    ext = "html"
)]
struct CheckoutSignupTemplate<'a> {
    element_id: String,
    field_name: String,
    checked: bool,
    label: &'a str,
}

impl NewsletterIntegration {
    /// Markup for the checkout signup box, or an empty string when the provider
    /// hides it.
    #[tracing::instrument(
        name = "Render checkout signup",
        skip_all,
        fields(provider = %self.identity().id())
    )]
    pub async fn render_checkout_checkbox(&self) -> Result<String, IntegrationError> {
        if !self.provider.should_show_checkout_signup() {
            return Ok(String::new());
        }

        let identity = self.identity();

        let checked = match self
            .store
            .get_option(&identity.option_key("checkout_signup_checked"))
            .await?
        {
            Some(value) => is_truthy(Some(&value)),
            None => self.options.default_checkbox_checked,
        };

        let stored_label = self.store.get_option(&identity.option_key("label")).await?;
        let label = match &stored_label {
            Some(Value::String(label)) if !label.trim().is_empty() => label.as_str(),
            _ => self.checkout_label(),
        };

        let markup = CheckoutSignupTemplate {
            element_id: identity.element_id(),
            field_name: identity.checkout_field_name(),
            checked,
            label,
        }
        .render()?;

        Ok(markup)
    }
}
