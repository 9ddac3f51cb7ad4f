mod amount;

mod secret;

pub use amount::{Amount, AmountConversionError};
pub use secret::Secret;
