use reqwest::Method;

use crate::domain::{NewWishlist, TransportFailure, Wishlist};
use crate::interface_adapters::protocol::EndpointGroup;
use crate::interface_adapters::transport::TransportClient;

// Wishlist endpoints. Raw endpoint group: no envelope on success or failure.
#[derive(Clone)]
pub struct WishlistClient {
    transport: TransportClient,
}

impl WishlistClient {
    pub fn new(transport: TransportClient) -> Self {
        Self { transport }
    }

    pub async fn list(&self) -> Result<Vec<Wishlist>, TransportFailure> {
        self.transport
            .fetch::<(), Option<Vec<Wishlist>>>(EndpointGroup::Wishlists, Method::GET, "", None)
            .await
            .map(|wishlists| wishlists.flatten().unwrap_or_default())
    }

    pub async fn create(&self, req: &NewWishlist) -> Result<Wishlist, TransportFailure> {
        self.transport
            .fetch::<_, Wishlist>(EndpointGroup::Wishlists, Method::POST, "", Some(req))
            .await?
            .ok_or_else(|| TransportFailure::Local {
                message: "wishlist creation returned no body".to_string(),
            })
    }
}
