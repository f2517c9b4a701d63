pub mod account;
pub mod catalog;
pub mod devices;
pub mod home;

pub use account::{details_get, details_post, logout};
pub use catalog::{models, search, search_weight};
pub use devices::{device, device_model, mydevices, repair};
pub use home::home;
