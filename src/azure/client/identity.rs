use super::AzureClient;
use crate::catalog::IdentitySource;
use crate::error::Error;
use crate::models::Principal;

impl AzureClient {
    /// Retrieves the signed-in principal from Graph `/me`.
    pub fn get_signed_in_principal(&self) -> Result<Principal, Error> {
        let url = self.graph_url(&["me"])?;
        let resp = self.graph_get(url).send()?;
        self.expect_ok_json(resp)
    }
}

impl IdentitySource for AzureClient {
    fn signed_in_principal(&self) -> Result<Principal, Error> {
        let principal = self
            .get_signed_in_principal()
            .map_err(|err| Error::MissingPrincipal(err.to_string()))?;
        if principal.id.is_empty() {
            return Err(Error::MissingPrincipal(
                "identity lookup returned no object id".to_string(),
            ));
        }
        Ok(principal)
    }
}
