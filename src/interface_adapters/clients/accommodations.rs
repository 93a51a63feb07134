use reqwest::Method;

use crate::domain::{Accommodation, TransportFailure};
use crate::interface_adapters::protocol::EndpointGroup;
use crate::interface_adapters::transport::TransportClient;

// Listing detail. Enveloped endpoint group.
#[derive(Clone)]
pub struct AccommodationClient {
    transport: TransportClient,
}

impl AccommodationClient {
    pub fn new(transport: TransportClient) -> Self {
        Self { transport }
    }

    // `None` when the backend answered with an empty `data`.
    pub async fn get(&self, id: u64) -> Result<Option<Accommodation>, TransportFailure> {
        self.transport
            .fetch::<(), Accommodation>(
                EndpointGroup::Accommodations,
                Method::GET,
                &format!("/{id}"),
                None,
            )
            .await
    }
}
