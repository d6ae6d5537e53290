//! REST client for the back-office server.
//!
//! The calculator and the conversion table never talk to the network; the
//! wizard hands this client the payloads they produce. Persistence failures
//! are opaque pass-through errors: the client surfaces the server's message
//! verbatim and never interprets error payloads beyond that. There is no
//! retry or backoff; a failed save is reported to the operator, who may
//! resubmit, and the last successful save wins.

use crate::{
    api::types::{
        ApiErrorBody, PriceRange, ProductHit, ProviderHit, SaveProductRequest, SavedProduct,
    },
    config::api::ApiConfig,
    errors::{Error, Result},
};
use reqwest::Response;
use tracing::{debug, info};
use url::Url;

/// Thin HTTP client over the server's product endpoints.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    /// Builds a client from the given configuration.
    ///
    /// # Errors
    /// Returns an error when the base URL is invalid or the underlying HTTP
    /// client cannot be constructed.
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url)?;
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { http, base_url })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url.join(path).map_err(Into::into)
    }

    /// Turns a non-2xx response into [`Error::Api`], surfacing the server's
    /// message when one is present.
    async fn check(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response
            .json::<ApiErrorBody>()
            .await
            .ok()
            .and_then(|body| body.message)
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_string());
        Err(Error::Api {
            status: status.as_u16(),
            message,
        })
    }

    /// Creates the product when `request.id` is `None`, updates it otherwise.
    /// The conversion and price graphs travel inside the same request.
    pub async fn save_product(&self, request: &SaveProductRequest) -> Result<SavedProduct> {
        let response = match request.id {
            Some(id) => {
                debug!("Updating product {id}");
                self.http
                    .put(self.endpoint(&format!("products/{id}"))?)
                    .json(request)
                    .send()
                    .await?
            }
            None => {
                debug!("Creating product '{}'", request.name);
                self.http
                    .post(self.endpoint("products")?)
                    .json(request)
                    .send()
                    .await?
            }
        };
        let saved: SavedProduct = Self::check(response).await?.json().await?;
        info!("Product '{}' saved with id {}", saved.name, saved.id);
        Ok(saved)
    }

    /// Lists the price-range rows of a product.
    pub async fn list_price_ranges(&self, product_id: i64) -> Result<Vec<PriceRange>> {
        let response = self
            .http
            .get(self.endpoint(&format!("products/{product_id}/price-ranges"))?)
            .send()
            .await?;
        Self::check(response).await?.json().await.map_err(Into::into)
    }

    /// Creates a price-range row for a product.
    pub async fn create_price_range(&self, range: &PriceRange) -> Result<PriceRange> {
        let response = self
            .http
            .post(self.endpoint(&format!("products/{}/price-ranges", range.product_id))?)
            .json(range)
            .send()
            .await?;
        Self::check(response).await?.json().await.map_err(Into::into)
    }

    /// Updates an existing price-range row.
    ///
    /// # Errors
    /// Returns a `Config` error when the row has no server id yet.
    pub async fn update_price_range(&self, range: &PriceRange) -> Result<PriceRange> {
        let id = range.id.ok_or_else(|| Error::Config {
            message: "Cannot update a price range that has not been created".to_string(),
        })?;
        let response = self
            .http
            .put(self.endpoint(&format!("price-ranges/{id}"))?)
            .json(range)
            .send()
            .await?;
        Self::check(response).await?.json().await.map_err(Into::into)
    }

    /// Deletes a price-range row.
    pub async fn delete_price_range(&self, id: i64) -> Result<()> {
        let response = self
            .http
            .delete(self.endpoint(&format!("price-ranges/{id}"))?)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    /// Searches products by free text (name or barcode).
    pub async fn search_products(&self, query: &str) -> Result<Vec<ProductHit>> {
        let mut url = self.endpoint("products/search")?;
        url.query_pairs_mut().append_pair("q", query);
        let response = self.http.get(url).send().await?;
        Self::check(response).await?.json().await.map_err(Into::into)
    }

    /// Searches providers by free text.
    pub async fn search_providers(&self, query: &str) -> Result<Vec<ProviderHit>> {
        let mut url = self.endpoint("providers/search")?;
        url.query_pairs_mut().append_pair("q", query);
        let response = self.http.get(url).send().await?;
        Self::check(response).await?.json().await.map_err(Into::into)
    }
}
