use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr, PickFirst};
use utility::id::HasId;

#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    pub make: String,
    pub model: String,
    /// Model year. Sent as a string, accepted either way.
    #[serde_as(as = "PickFirst<(DisplayFromStr, _)>")]
    pub vintage: u16,
    pub vin: String,
}

impl HasId for Vehicle {
    type IdType = String;
}
