use super::AzureClient;
use crate::client_defaults::RESOURCES_API_VERSION;
use crate::error::Error;
use crate::models::Provider;

impl AzureClient {
    /// Retrieves a resource provider and its registration state.
    pub fn get_provider(&self, subscription_id: &str, namespace: &str) -> Result<Provider, Error> {
        let url = self.management_url(
            "",
            &["subscriptions", subscription_id, "providers", namespace],
        )?;
        let resp = self
            .management_get(url)
            .query(&[("api-version", RESOURCES_API_VERSION)])
            .send()?;
        self.expect_ok_json(resp)
    }

    /// Starts registration of a resource provider in the subscription.
    pub fn register_provider(
        &self,
        subscription_id: &str,
        namespace: &str,
    ) -> Result<Provider, Error> {
        let url = self.management_url(
            "",
            &[
                "subscriptions",
                subscription_id,
                "providers",
                namespace,
                "register",
            ],
        )?;
        let resp = self
            .management_post(url)
            .query(&[("api-version", RESOURCES_API_VERSION)])
            .send()?;
        self.expect_ok_json(resp)
    }
}
