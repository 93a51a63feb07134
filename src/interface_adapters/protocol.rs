use serde::Deserialize;

use crate::domain::NormalizedError;

// `{success, data, error}` wrapper returned by most endpoints.
#[derive(Debug, Deserialize)]
pub struct ApiEnvelope<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<NormalizedError>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseShape {
    // Payload under `data`; failures under `error`, even on a 2xx status.
    Enveloped,
    // Payload is the whole body; failures are a bare error object.
    Raw,
}

// Endpoint groups of the backend. The backend is inconsistent about response
// shapes, so the shape is pinned here per group rather than sniffed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointGroup {
    Auth,
    Members,
    Accommodations,
    Reservations,
    Payments,
    Reviews,
    Wishlists,
}

impl EndpointGroup {
    pub const ALL: [EndpointGroup; 7] = [
        EndpointGroup::Auth,
        EndpointGroup::Members,
        EndpointGroup::Accommodations,
        EndpointGroup::Reservations,
        EndpointGroup::Payments,
        EndpointGroup::Reviews,
        EndpointGroup::Wishlists,
    ];

    pub fn shape(self) -> ResponseShape {
        match self {
            EndpointGroup::Auth
            | EndpointGroup::Members
            | EndpointGroup::Accommodations
            | EndpointGroup::Reservations => ResponseShape::Enveloped,
            EndpointGroup::Payments | EndpointGroup::Reviews | EndpointGroup::Wishlists => {
                ResponseShape::Raw
            }
        }
    }

    pub fn prefix(self) -> &'static str {
        match self {
            EndpointGroup::Auth => "/auth",
            EndpointGroup::Members => "/members",
            EndpointGroup::Accommodations => "/accommodations",
            EndpointGroup::Reservations => "/reservations",
            EndpointGroup::Payments => "/payments",
            EndpointGroup::Reviews => "/reviews",
            EndpointGroup::Wishlists => "/wishlists",
        }
    }
}
