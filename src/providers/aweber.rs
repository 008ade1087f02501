use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, Url};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{Span, field};

use super::{NewsletterProvider, ProviderError};
use crate::domain::{
    CustomerInfo, ListCatalog, ListId, MailingList, ProviderIdentity, SettingField,
};

// AWeber pages list collections; a broken `next_collection_link` must not loop forever.
const MAX_LIST_PAGES: usize = 50;

#[derive(Debug)]
pub struct AweberClient {
    identity: ProviderIdentity,
    http_client: Client,
    base_url: Url,
    account_id: String,
    access_token: Secret<String>,
    default_list_id: Option<ListId>,
    show_checkout_signup: bool,
}

#[derive(Deserialize)]
struct ListCollection {
    #[serde(default)]
    entries: Vec<ListEntry>,
    next_collection_link: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RemoteId {
    Number(u64),
    Text(String),
}

impl From<RemoteId> for String {
    fn from(value: RemoteId) -> Self {
        match value {
            RemoteId::Number(n) => n.to_string(),
            RemoteId::Text(s) => s,
        }
    }
}

#[derive(Deserialize)]
struct ListEntry {
    id: RemoteId,
    name: String,
}

#[derive(Serialize)]
struct AddSubscriberRequest<'a> {
    email: &'a str,
    #[serde(skip_serializing_if = "String::is_empty")]
    name: String,
    // makes a repeated subscribe for the same address a no-op on AWeber's side
    update_existing: &'a str,
}

impl AweberClient {
    pub fn new(
        identity: ProviderIdentity,
        mut base_url: Url,
        account_id: String,
        access_token: Secret<String>,
        default_list_id: Option<ListId>,
        show_checkout_signup: bool,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        if base_url.cannot_be_a_base() {
            return Err(ProviderError::UnusableBaseUrl(base_url.to_string()));
        }
        // keeps `https://api.aweber.com/1.0` and `.../1.0/` equivalent
        if let Ok(mut segments) = base_url.path_segments_mut() {
            segments.pop_if_empty();
        }

        let http_client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            identity,
            http_client,
            base_url,
            account_id,
            access_token,
            default_list_id,
            show_checkout_signup,
        })
    }

    /// `base_url` followed by `segments`, each percent-encoded as a single segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ProviderError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ProviderError::UnusableBaseUrl(self.base_url.to_string()))?
            .extend(segments);
        Ok(url)
    }

    async fn get_list_page(&self, url: Url) -> Result<ListCollection, ProviderError> {
        let response = self
            .http_client
            .get(url)
            .bearer_auth(self.access_token.expose_secret())
            .header("Accept", "application/json")
            .send()
            .await?;

        Ok(ensure_success(response).await?.json().await?)
    }
}

async fn ensure_success(response: Response) -> Result<Response, ProviderError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(ProviderError::Rejected {
        status: status.as_u16(),
        body,
    })
}

#[async_trait]
impl NewsletterProvider for AweberClient {
    fn identity(&self) -> &ProviderIdentity {
        &self.identity
    }

    #[tracing::instrument(
        name = "Fetch AWeber lists",
        skip_all,
        fields(account_id = %self.account_id)
    )]
    async fn list_available_lists(&self) -> Result<ListCatalog, ProviderError> {
        let mut catalog = ListCatalog::default();
        let mut next = Some(self.endpoint(&["accounts", &self.account_id, "lists"])?);

        for _ in 0..MAX_LIST_PAGES {
            let Some(url) = next.take() else {
                break;
            };

            let page = self.get_list_page(url).await?;
            for entry in page.entries {
                match ListId::parse(entry.id.into()) {
                    Ok(list_id) => catalog.insert(MailingList {
                        list_id,
                        list_name: entry.name,
                    }),
                    Err(e) => tracing::warn!(error = %e, "Skipping an AWeber list without a usable id"),
                }
            }

            next = page
                .next_collection_link
                .map(|link| Url::parse(&link))
                .transpose()?;
        }

        Ok(catalog)
    }

    fn should_show_checkout_signup(&self) -> bool {
        self.show_checkout_signup
    }

    #[tracing::instrument(
        name = "Subscribe customer via AWeber",
        skip_all,
        fields(customer_email = %customer.email, list_id = field::Empty)
    )]
    async fn subscribe(
        &self,
        customer: &CustomerInfo,
        list_id: Option<&ListId>,
    ) -> Result<(), ProviderError> {
        let list_id = list_id
            .or(self.default_list_id.as_ref())
            .ok_or(ProviderError::NoDefaultList)?;
        Span::current().record("list_id", field::display(list_id));

        let url = self.endpoint(&[
            "accounts",
            &self.account_id,
            "lists",
            list_id.as_ref(),
            "subscribers",
        ])?;

        let request_body = AddSubscriberRequest {
            email: customer.email.as_ref(),
            name: customer.full_name(),
            update_existing: "true",
        };

        let response = self
            .http_client
            .post(url)
            .bearer_auth(self.access_token.expose_secret())
            .json(&request_body)
            .send()
            .await?;
        ensure_success(response).await?;

        Ok(())
    }

    async fn register_settings(&self, mut settings: Vec<Value>) -> Vec<Value> {
        let list_options = match self.list_available_lists().await {
            Ok(catalog) => catalog
                .iter()
                .map(|list| (list.list_id.to_string(), list.list_name.clone()))
                .collect(),
            Err(e) => {
                tracing::warn!(
                    error.cause_chain = ?e,
                    "Could not load AWeber lists for the settings screen"
                );
                Vec::new()
            }
        };

        let identity = &self.identity;
        settings.extend([
            SettingField::header(identity.option_key("settings"), "AWeber Settings").into_value(),
            SettingField::select(identity.option_key("list"), "Choose a list", list_options)
                .with_desc("Select the list you wish to subscribe buyers to")
                .into_value(),
            SettingField::text(identity.option_key("label"), "Checkout Label", None)
                .with_desc("This is the text shown next to the signup option")
                .into_value(),
            SettingField::checkbox(
                identity.option_key("checkout_signup_checked"),
                "Signup Checked by Default",
            )
            .with_desc("Should the newsletter signup checkbox be checked by default?")
            .into_value(),
        ]);
        settings
    }
}
